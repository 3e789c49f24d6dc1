//! Container-neutral tags
//!
//! Claims tags the backend already identified with a [`StandardKey`], and
//! the lower-case generic keys that container demuxers emit.

use super::{claim_by_rules, convert_language, KeyRule, MetadataParser};
use crate::mapped::{Field, MappedMetadata, ParserKind};
use cadence_core::{RawTag, StandardKey};

/// Standard keys in precedence order; `Date` outranks the other dates
static STANDARD_RULES: &[(StandardKey, KeyRule)] = &[
    (StandardKey::TrackTitle, KeyRule::essential("title", Field::Title)),
    (StandardKey::Artist, KeyRule::essential("artist", Field::Artist)),
    (StandardKey::Album, KeyRule::essential("album", Field::Album)),
    (StandardKey::AlbumArtist, KeyRule::essential("album_artist", Field::AlbumArtist)),
    (StandardKey::Genre, KeyRule::essential("genre", Field::Genre)),
    (StandardKey::Date, KeyRule::essential("date", Field::Year)),
    (StandardKey::ReleaseDate, KeyRule::essential("release_date", Field::Year)),
    (StandardKey::OriginalDate, KeyRule::essential("original_date", Field::Year)),
    (StandardKey::TrackNumber, KeyRule::essential("track", Field::TrackNumber)),
    (StandardKey::TrackTotal, KeyRule::essential("track_total", Field::TrackTotal)),
    (StandardKey::DiscNumber, KeyRule::essential("disc", Field::DiscNumber)),
    (StandardKey::DiscTotal, KeyRule::essential("disc_total", Field::DiscTotal)),
    (StandardKey::Lyrics, KeyRule::essential("lyrics", Field::Lyrics)),
    (StandardKey::Composer, KeyRule::essential("composer", Field::Composer)),
    (StandardKey::Conductor, KeyRule::essential("conductor", Field::Conductor)),
    (StandardKey::Performer, KeyRule::essential("performer", Field::Performer)),
    (StandardKey::Lyricist, KeyRule::essential("lyricist", Field::Lyricist)),
    (StandardKey::Bpm, KeyRule::essential("bpm", Field::Bpm)),
    (StandardKey::ReplayGainTrackGain, KeyRule::essential("replaygain_track_gain", Field::TrackGain)),
    (StandardKey::ReplayGainTrackPeak, KeyRule::essential("replaygain_track_peak", Field::TrackPeak)),
    (StandardKey::ReplayGainAlbumGain, KeyRule::essential("replaygain_album_gain", Field::AlbumGain)),
    (StandardKey::ReplayGainAlbumPeak, KeyRule::essential("replaygain_album_peak", Field::AlbumPeak)),
    (StandardKey::Comment, KeyRule::generic("comment", "Comment")),
    (StandardKey::Copyright, KeyRule::generic("copyright", "Copyright")),
    (StandardKey::Description, KeyRule::generic("description", "Description")),
    (StandardKey::EncodedBy, KeyRule::generic("encoded_by", "Encoded By")),
    (StandardKey::Encoder, KeyRule::generic("encoder", "Encoder")),
    (StandardKey::Label, KeyRule::generic("label", "Label")),
    (StandardKey::Language, KeyRule::generic("language", "Language").converted(convert_language)),
    (StandardKey::Isrc, KeyRule::generic("isrc", "ISRC")),
    (StandardKey::Compilation, KeyRule::generic("compilation", "Compilation")),
    (StandardKey::Grouping, KeyRule::generic("grouping", "Grouping")),
    (StandardKey::Mood, KeyRule::generic("mood", "Mood")),
    (StandardKey::Arranger, KeyRule::generic("arranger", "Arranger")),
    (StandardKey::Producer, KeyRule::generic("producer", "Producer")),
    (StandardKey::Engineer, KeyRule::generic("engineer", "Engineer")),
    (StandardKey::Remixer, KeyRule::generic("remixer", "Remixer")),
    (StandardKey::MusicBrainzRecordingId, KeyRule::generic("musicbrainz_trackid", "MusicBrainz Recording Id")),
    (StandardKey::MusicBrainzAlbumId, KeyRule::generic("musicbrainz_albumid", "MusicBrainz Album Id")),
    (StandardKey::MusicBrainzArtistId, KeyRule::generic("musicbrainz_artistid", "MusicBrainz Artist Id")),
];

/// Lower-case keys as written by generic demuxers, matched exactly
static GENERIC_RULES: &[KeyRule] = &[
    KeyRule::essential("title", Field::Title).case_sensitive(),
    KeyRule::essential("artist", Field::Artist).case_sensitive(),
    KeyRule::essential("album", Field::Album).case_sensitive(),
    KeyRule::essential("album_artist", Field::AlbumArtist).case_sensitive(),
    KeyRule::essential("genre", Field::Genre).case_sensitive(),
    KeyRule::essential("date", Field::Year).case_sensitive(),
    KeyRule::essential("year", Field::Year).case_sensitive(),
    KeyRule::essential("track", Field::TrackNumber).case_sensitive(),
    KeyRule::essential("disc", Field::DiscNumber).case_sensitive(),
    KeyRule::essential("lyrics", Field::Lyrics).case_sensitive(),
    KeyRule::essential("composer", Field::Composer).case_sensitive(),
    KeyRule::essential("performer", Field::Performer).case_sensitive(),
    KeyRule::generic("comment", "Comment").case_sensitive(),
    KeyRule::generic("copyright", "Copyright").case_sensitive(),
    KeyRule::generic("description", "Description").case_sensitive(),
    KeyRule::generic("encoder", "Encoder").case_sensitive(),
    KeyRule::generic("encoded_by", "Encoded By").case_sensitive(),
    KeyRule::generic("publisher", "Publisher").case_sensitive(),
    KeyRule::generic("language", "Language")
        .case_sensitive()
        .converted(convert_language),
    KeyRule::generic("creation_time", "Creation Time").case_sensitive(),
    KeyRule::generic("grouping", "Grouping").case_sensitive(),
    KeyRule::generic("compilation", "Compilation").case_sensitive(),
];

/// Parser for standard and generic container keys
pub struct CommonParser;

impl MetadataParser for CommonParser {
    fn kind(&self) -> ParserKind {
        ParserKind::Common
    }

    fn map_metadata(&self, map: &mut MappedMetadata) {
        let claimed = map.claim(|tag| tag.std_key.is_some());

        let mut assigned: Vec<(usize, &RawTag)> = claimed
            .iter()
            .filter_map(|tag| {
                let std_key = tag.std_key?;
                STANDARD_RULES
                    .iter()
                    .position(|(key, _)| *key == std_key)
                    .map(|i| (i, tag))
            })
            .collect();
        assigned.sort_by_key(|(i, _)| *i);

        for (i, tag) in assigned {
            STANDARD_RULES[i].1.store(map, self.kind(), tag);
        }

        claim_by_rules(map, self.kind(), GENERIC_RULES);
    }
}

//! Vorbis comments (FLAC, Ogg Vorbis, Opus, DSD)

use super::{claim_by_rules, convert_language, KeyRule, MetadataParser};
use crate::mapped::{Field, MappedMetadata, ParserKind};

/// Opus output gain is relative to -23 LUFS, ReplayGain 2.0 to -18 LUFS
const R128_TO_REPLAYGAIN_DB: f64 = 5.0;

/// Convert an Opus `R128_*_GAIN` value (Q7.8 fixed point) to a ReplayGain
/// 2.0 gain string
fn convert_r128_gain(value: &str) -> Option<String> {
    let q78 = value.trim().parse::<i32>().ok()?;
    let gain = f64::from(q78) / 256.0 + R128_TO_REPLAYGAIN_DB;
    Some(format!("{gain:.2} dB"))
}

static RULES: &[KeyRule] = &[
    KeyRule::essential("TITLE", Field::Title),
    KeyRule::essential("ARTIST", Field::Artist),
    KeyRule::essential("ALBUM", Field::Album),
    KeyRule::essential("ALBUMARTIST", Field::AlbumArtist),
    KeyRule::essential("ALBUM ARTIST", Field::AlbumArtist),
    KeyRule::essential("ALBUM_ARTIST", Field::AlbumArtist),
    KeyRule::essential("GENRE", Field::Genre),
    KeyRule::essential("DATE", Field::Year),
    KeyRule::essential("YEAR", Field::Year),
    KeyRule::essential("ORIGINALDATE", Field::Year),
    KeyRule::essential("TRACKNUMBER", Field::TrackNumber),
    KeyRule::essential("TRACKTOTAL", Field::TrackTotal),
    KeyRule::essential("TOTALTRACKS", Field::TrackTotal),
    KeyRule::essential("DISCNUMBER", Field::DiscNumber),
    KeyRule::essential("DISCTOTAL", Field::DiscTotal),
    KeyRule::essential("TOTALDISCS", Field::DiscTotal),
    KeyRule::essential("LYRICS", Field::Lyrics),
    KeyRule::essential("UNSYNCEDLYRICS", Field::Lyrics),
    KeyRule::essential("COMPOSER", Field::Composer),
    KeyRule::essential("CONDUCTOR", Field::Conductor),
    KeyRule::essential("PERFORMER", Field::Performer),
    KeyRule::essential("LYRICIST", Field::Lyricist),
    KeyRule::essential("BPM", Field::Bpm),
    KeyRule::essential("REPLAYGAIN_TRACK_GAIN", Field::TrackGain),
    KeyRule::essential("REPLAYGAIN_TRACK_PEAK", Field::TrackPeak),
    KeyRule::essential("REPLAYGAIN_ALBUM_GAIN", Field::AlbumGain),
    KeyRule::essential("REPLAYGAIN_ALBUM_PEAK", Field::AlbumPeak),
    KeyRule::essential("R128_TRACK_GAIN", Field::TrackGain).converted(convert_r128_gain),
    KeyRule::essential("R128_ALBUM_GAIN", Field::AlbumGain).converted(convert_r128_gain),
    KeyRule::generic("COMMENT", "Comment"),
    KeyRule::generic("DESCRIPTION", "Description"),
    KeyRule::generic("COPYRIGHT", "Copyright"),
    KeyRule::generic("LICENSE", "License"),
    KeyRule::generic("ORGANIZATION", "Organization"),
    KeyRule::generic("LABEL", "Label"),
    KeyRule::generic("CATALOGNUMBER", "Catalog Number"),
    KeyRule::generic("ISRC", "ISRC"),
    KeyRule::generic("LANGUAGE", "Language").converted(convert_language),
    KeyRule::generic("ENCODER", "Encoder"),
    KeyRule::generic("ENCODED-BY", "Encoded By"),
    KeyRule::generic("ENCODEDBY", "Encoded By"),
    KeyRule::generic("LOCATION", "Location"),
    KeyRule::generic("CONTACT", "Contact"),
    KeyRule::generic("VERSION", "Version"),
    KeyRule::generic("GROUPING", "Grouping"),
    KeyRule::generic("MOOD", "Mood"),
    KeyRule::generic("COMPILATION", "Compilation"),
    KeyRule::generic("ARRANGER", "Arranger"),
    KeyRule::generic("PRODUCER", "Producer"),
    KeyRule::generic("ENGINEER", "Engineer"),
    KeyRule::generic("REMIXER", "Remixer"),
    KeyRule::generic("WEBSITE", "Website"),
    KeyRule::generic("MEDIA", "Media Type"),
    KeyRule::generic("RELEASETYPE", "Release Type"),
    KeyRule::generic("SOURCEMEDIA", "Source Media"),
    KeyRule::generic("BARCODE", "Barcode"),
    KeyRule::generic("MUSICBRAINZ_TRACKID", "MusicBrainz Recording Id"),
    KeyRule::generic("MUSICBRAINZ_ALBUMID", "MusicBrainz Album Id"),
    KeyRule::generic("MUSICBRAINZ_ARTISTID", "MusicBrainz Artist Id"),
    KeyRule::generic("MUSICBRAINZ_ALBUMARTISTID", "MusicBrainz Album Artist Id"),
    KeyRule::generic("MUSICBRAINZ_RELEASEGROUPID", "MusicBrainz Release Group Id"),
];

/// Parser for Vorbis comment fields
pub struct VorbisParser;

impl MetadataParser for VorbisParser {
    fn kind(&self) -> ParserKind {
        ParserKind::Vorbis
    }

    fn map_metadata(&self, map: &mut MappedMetadata) {
        claim_by_rules(map, self.kind(), RULES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::RawTag;

    #[test]
    fn fields_are_case_insensitive() {
        let mut map = MappedMetadata::from_tags(
            "flac",
            vec![
                RawTag::new("title", "Song"),
                RawTag::new("TrackNumber", "7"),
                RawTag::new("TRACKTOTAL", "9"),
                RawTag::new("Album Artist", "Various"),
            ],
        );
        VorbisParser.map_metadata(&mut map);

        assert_eq!(VorbisParser.title(&map).as_deref(), Some("Song"));
        assert_eq!(VorbisParser.track_number(&map), (Some(7), None));
        assert_eq!(VorbisParser.total_tracks(&map), Some(9));
        assert_eq!(VorbisParser.album_artist(&map).as_deref(), Some("Various"));
    }

    #[test]
    fn opus_r128_gain_converts_to_replay_gain() {
        // -1280 / 256 = -5 dB relative to -23 LUFS, i.e. 0 dB at -18 LUFS
        assert_eq!(convert_r128_gain("-1280").as_deref(), Some("0.00 dB"));
        assert_eq!(convert_r128_gain("-2560").as_deref(), Some("-5.00 dB"));
        assert_eq!(convert_r128_gain("abc"), None);

        let mut map = MappedMetadata::from_tags(
            "opus",
            vec![RawTag::new("R128_TRACK_GAIN", "-2560")],
        );
        VorbisParser.map_metadata(&mut map);

        let rg = VorbisParser.replay_gain(&map).unwrap();
        assert!((rg.track_gain.unwrap() + 5.0).abs() < 1e-9);
    }

    #[test]
    fn replaygain_tags_outrank_r128() {
        let mut map = MappedMetadata::from_tags(
            "opus",
            vec![
                RawTag::new("R128_TRACK_GAIN", "0"),
                RawTag::new("REPLAYGAIN_TRACK_GAIN", "-2.50 dB"),
            ],
        );
        VorbisParser.map_metadata(&mut map);

        let rg = VorbisParser.replay_gain(&map).unwrap();
        assert_eq!(rg.track_gain, Some(-2.5));
    }
}

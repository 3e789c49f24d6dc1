//! Windows Media (ASF) attributes

use super::{
    claim_by_rules, convert_drm_marker, convert_flag, convert_language, KeyRule, MetadataParser,
};
use crate::mapped::{Field, MappedMetadata, ParserKind};
use crate::values::parse_u32;

/// `WM/Track` counts from zero, unlike `WM/TrackNumber`
fn convert_zero_based_track(value: &str) -> Option<String> {
    parse_u32(value).map(|n| (n + 1).to_string())
}

static RULES: &[KeyRule] = &[
    KeyRule::essential("Title", Field::Title),
    KeyRule::essential("Author", Field::Artist),
    KeyRule::essential("WM/AlbumTitle", Field::Album),
    KeyRule::essential("WM/AlbumArtist", Field::AlbumArtist),
    KeyRule::essential("WM/Genre", Field::Genre),
    KeyRule::essential("WM/Year", Field::Year),
    KeyRule::essential("WM/OriginalReleaseYear", Field::Year),
    KeyRule::essential("WM/TrackNumber", Field::TrackNumber),
    KeyRule::essential("WM/Track", Field::TrackNumber).converted(convert_zero_based_track),
    KeyRule::essential("TotalTracks", Field::TrackTotal),
    KeyRule::essential("WM/PartOfSet", Field::DiscNumber),
    KeyRule::essential("TotalDiscs", Field::DiscTotal),
    KeyRule::essential("WM/Lyrics", Field::Lyrics),
    KeyRule::essential("WM/Composer", Field::Composer),
    KeyRule::essential("WM/Conductor", Field::Conductor),
    KeyRule::essential("WM/Writer", Field::Lyricist),
    KeyRule::essential("WM/BeatsPerMinute", Field::Bpm),
    KeyRule::essential("replaygain_track_gain", Field::TrackGain),
    KeyRule::essential("replaygain_track_peak", Field::TrackPeak),
    KeyRule::essential("replaygain_album_gain", Field::AlbumGain),
    KeyRule::essential("replaygain_album_peak", Field::AlbumPeak),
    KeyRule::essential("Is_Protected", Field::Protected).converted(convert_flag),
    KeyRule::essential("WM/Protected", Field::Protected).converted(convert_flag),
    KeyRule::essential("DRM_", Field::Protected)
        .prefix()
        .converted(convert_drm_marker),
    KeyRule::generic("Copyright", "Copyright"),
    KeyRule::generic("Description", "Comment"),
    KeyRule::generic("WM/Publisher", "Publisher"),
    KeyRule::generic("WM/Language", "Language").converted(convert_language),
    KeyRule::generic("WM/ISRC", "ISRC"),
    KeyRule::generic("WM/EncodedBy", "Encoded By"),
    KeyRule::generic("WM/ToolName", "Encoder"),
    KeyRule::generic("WM/ToolVersion", "Encoder Version"),
    KeyRule::generic("WM/EncodingSettings", "Encoder Settings"),
    KeyRule::generic("WM/Mood", "Mood"),
    KeyRule::generic("WM/InitialKey", "Initial Key"),
    KeyRule::generic("WM/ContentGroupDescription", "Grouping"),
    KeyRule::generic("WM/SubTitle", "Subtitle"),
    KeyRule::generic("WM/OriginalArtist", "Original Artist"),
    KeyRule::generic("WM/OriginalAlbumTitle", "Original Album"),
    KeyRule::generic("WM/OriginalLyricist", "Original Lyricist"),
    KeyRule::generic("WM/Producer", "Producer"),
    KeyRule::generic("WM/ModifiedBy", "Remixer"),
    KeyRule::generic("WM/Provider", "Provider"),
    KeyRule::generic("WM/AuthorURL", "Artist Website"),
    KeyRule::generic("WM/MediaStationName", "Radio Station"),
    KeyRule::generic("WM/SharedUserRating", "Rating"),
    KeyRule::generic("WM/MusicBrainz/Track Id", "MusicBrainz Recording Id"),
    KeyRule::generic("MusicBrainz/Track Id", "MusicBrainz Recording Id"),
    KeyRule::generic("MusicBrainz/Album Id", "MusicBrainz Album Id"),
    KeyRule::generic("MusicBrainz/Artist Id", "MusicBrainz Artist Id"),
];

/// Parser for Windows Media attributes
pub struct WmaParser;

impl MetadataParser for WmaParser {
    fn kind(&self) -> ParserKind {
        ParserKind::Wm
    }

    fn map_metadata(&self, map: &mut MappedMetadata) {
        claim_by_rules(map, self.kind(), RULES);
    }
}

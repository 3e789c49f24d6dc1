//! ID3v2 frames (v2.2 three-letter and v2.3/v2.4 four-letter ids)

use super::{claim_by_rules, convert_language, KeyRule, MetadataParser};
use crate::genres::resolve_id3_genre;
use crate::mapped::{Field, MappedMetadata, ParserKind};

fn convert_genre(value: &str) -> Option<String> {
    Some(resolve_id3_genre(value))
}

static RULES: &[KeyRule] = &[
    KeyRule::essential("TIT2", Field::Title),
    KeyRule::essential("TT2", Field::Title),
    KeyRule::essential("TPE1", Field::Artist),
    KeyRule::essential("TP1", Field::Artist),
    KeyRule::essential("TALB", Field::Album),
    KeyRule::essential("TAL", Field::Album),
    KeyRule::essential("TPE2", Field::AlbumArtist),
    KeyRule::essential("TP2", Field::AlbumArtist),
    KeyRule::essential("TCON", Field::Genre).converted(convert_genre),
    KeyRule::essential("TCO", Field::Genre).converted(convert_genre),
    KeyRule::essential("TDRC", Field::Year),
    KeyRule::essential("TYER", Field::Year),
    KeyRule::essential("TYE", Field::Year),
    KeyRule::essential("TDRL", Field::Year),
    KeyRule::essential("TDOR", Field::Year),
    KeyRule::essential("TORY", Field::Year),
    KeyRule::essential("TOR", Field::Year),
    KeyRule::essential("TRCK", Field::TrackNumber),
    KeyRule::essential("TRK", Field::TrackNumber),
    KeyRule::essential("TPOS", Field::DiscNumber),
    KeyRule::essential("TPA", Field::DiscNumber),
    KeyRule::essential("USLT", Field::Lyrics),
    KeyRule::essential("USLT:", Field::Lyrics).prefix(),
    KeyRule::essential("ULT", Field::Lyrics),
    KeyRule::essential("TCOM", Field::Composer),
    KeyRule::essential("TCM", Field::Composer),
    KeyRule::essential("TPE3", Field::Conductor),
    KeyRule::essential("TP3", Field::Conductor),
    KeyRule::essential("TEXT", Field::Lyricist),
    KeyRule::essential("TXT", Field::Lyricist),
    KeyRule::essential("TBPM", Field::Bpm),
    KeyRule::essential("TBP", Field::Bpm),
    KeyRule::essential("TXXX:REPLAYGAIN_TRACK_GAIN", Field::TrackGain),
    KeyRule::essential("TXXX:REPLAYGAIN_TRACK_PEAK", Field::TrackPeak),
    KeyRule::essential("TXXX:REPLAYGAIN_ALBUM_GAIN", Field::AlbumGain),
    KeyRule::essential("TXXX:REPLAYGAIN_ALBUM_PEAK", Field::AlbumPeak),
    KeyRule::essential("TXXX:TOTALTRACKS", Field::TrackTotal),
    KeyRule::essential("TXXX:TRACKTOTAL", Field::TrackTotal),
    KeyRule::essential("TXXX:TOTALDISCS", Field::DiscTotal),
    KeyRule::essential("TXXX:DISCTOTAL", Field::DiscTotal),
    KeyRule::generic("COMM", "Comment"),
    KeyRule::generic("COMM:", "Comment").prefix(),
    KeyRule::generic("COM", "Comment"),
    KeyRule::generic("TCOP", "Copyright"),
    KeyRule::generic("TCR", "Copyright"),
    KeyRule::generic("TENC", "Encoded By"),
    KeyRule::generic("TEN", "Encoded By"),
    KeyRule::generic("TSSE", "Encoder Settings"),
    KeyRule::generic("TSS", "Encoder Settings"),
    KeyRule::generic("TPUB", "Publisher"),
    KeyRule::generic("TPB", "Publisher"),
    KeyRule::generic("TLAN", "Language").converted(convert_language),
    KeyRule::generic("TLA", "Language").converted(convert_language),
    KeyRule::generic("TSRC", "ISRC"),
    KeyRule::generic("TRC", "ISRC"),
    KeyRule::generic("TIT1", "Grouping"),
    KeyRule::generic("TT1", "Grouping"),
    KeyRule::generic("TIT3", "Subtitle"),
    KeyRule::generic("TT3", "Subtitle"),
    KeyRule::generic("TMOO", "Mood"),
    KeyRule::generic("TKEY", "Initial Key"),
    KeyRule::generic("TKE", "Initial Key"),
    KeyRule::generic("TLEN", "Length"),
    KeyRule::generic("TLE", "Length"),
    KeyRule::generic("TMED", "Media Type"),
    KeyRule::generic("TMT", "Media Type"),
    KeyRule::generic("TOPE", "Original Artist"),
    KeyRule::generic("TOA", "Original Artist"),
    KeyRule::generic("TOAL", "Original Album"),
    KeyRule::generic("TOT", "Original Album"),
    KeyRule::generic("TOLY", "Original Lyricist"),
    KeyRule::generic("TOL", "Original Lyricist"),
    KeyRule::generic("TOWN", "File Owner"),
    KeyRule::generic("TRSN", "Radio Station"),
    KeyRule::generic("TPE4", "Remixer"),
    KeyRule::generic("TP4", "Remixer"),
    KeyRule::generic("TCMP", "Compilation"),
    KeyRule::generic("TCP", "Compilation"),
    KeyRule::generic("TDEN", "Encoding Time"),
    KeyRule::generic("TDTG", "Tagging Time"),
    KeyRule::generic("TFLT", "File Type"),
    KeyRule::generic("TFT", "File Type"),
    KeyRule::generic("TIPL", "Involved People"),
    KeyRule::generic("IPLS", "Involved People"),
    KeyRule::generic("TMCL", "Musician Credits"),
    KeyRule::generic("TSOA", "Album Sort Order"),
    KeyRule::generic("TSOP", "Performer Sort Order"),
    KeyRule::generic("TSOT", "Title Sort Order"),
    KeyRule::generic("WOAR", "Artist Website"),
    KeyRule::generic("WCOP", "Copyright Information"),
    KeyRule::generic("WPUB", "Publisher Website"),
    KeyRule::user_defined("WXXX:"),
    KeyRule::user_defined("TXXX:"),
];

/// Parser for ID3v2 frames
pub struct Id3Parser;

impl MetadataParser for Id3Parser {
    fn kind(&self) -> ParserKind {
        ParserKind::Id3
    }

    fn map_metadata(&self, map: &mut MappedMetadata) {
        claim_by_rules(map, self.kind(), RULES);
    }
}

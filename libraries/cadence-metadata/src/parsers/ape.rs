//! APEv2 items (Monkey's Audio, Musepack, WavPack, tagged MP3)

use super::{claim_by_rules, convert_language, KeyRule, MetadataParser};
use crate::mapped::{Field, MappedMetadata, ParserKind};

static RULES: &[KeyRule] = &[
    KeyRule::essential("Title", Field::Title),
    KeyRule::essential("Artist", Field::Artist),
    KeyRule::essential("Album", Field::Album),
    KeyRule::essential("Album Artist", Field::AlbumArtist),
    KeyRule::essential("AlbumArtist", Field::AlbumArtist),
    KeyRule::essential("Genre", Field::Genre),
    KeyRule::essential("Year", Field::Year),
    KeyRule::essential("Record Date", Field::Year),
    KeyRule::essential("Track", Field::TrackNumber),
    KeyRule::essential("Disc", Field::DiscNumber),
    KeyRule::essential("Lyrics", Field::Lyrics),
    KeyRule::essential("Composer", Field::Composer),
    KeyRule::essential("Conductor", Field::Conductor),
    KeyRule::essential("Performer", Field::Performer),
    KeyRule::essential("Lyricist", Field::Lyricist),
    KeyRule::essential("BPM", Field::Bpm),
    KeyRule::essential("REPLAYGAIN_TRACK_GAIN", Field::TrackGain),
    KeyRule::essential("REPLAYGAIN_TRACK_PEAK", Field::TrackPeak),
    KeyRule::essential("REPLAYGAIN_ALBUM_GAIN", Field::AlbumGain),
    KeyRule::essential("REPLAYGAIN_ALBUM_PEAK", Field::AlbumPeak),
    KeyRule::generic("Comment", "Comment"),
    KeyRule::generic("Copyright", "Copyright"),
    KeyRule::generic("Publisher", "Publisher"),
    KeyRule::generic("Label", "Label"),
    KeyRule::generic("Catalog", "Catalog Number"),
    KeyRule::generic("CatalogNumber", "Catalog Number"),
    KeyRule::generic("EAN/UPC", "Barcode"),
    KeyRule::generic("ISRC", "ISRC"),
    KeyRule::generic("Language", "Language").converted(convert_language),
    KeyRule::generic("Subtitle", "Subtitle"),
    KeyRule::generic("Media", "Media Type"),
    KeyRule::generic("Record Location", "Record Location"),
    KeyRule::generic("Mood", "Mood"),
    KeyRule::generic("Encoded By", "Encoded By"),
    KeyRule::generic("Tool Name", "Encoder"),
    KeyRule::generic("Tool Version", "Encoder Version"),
    KeyRule::generic("Related", "Related"),
    KeyRule::generic("Abstract", "Abstract"),
    KeyRule::generic("Bibliography", "Bibliography"),
    KeyRule::generic("Debut Album", "Debut Album"),
    KeyRule::generic("File", "File Location"),
    KeyRule::generic("Arranger", "Arranger"),
    KeyRule::generic("Compilation", "Compilation"),
    KeyRule::generic("Grouping", "Grouping"),
];

/// Parser for APEv2 items
pub struct ApeParser;

impl MetadataParser for ApeParser {
    fn kind(&self) -> ParserKind {
        ParserKind::Ape
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
    fn items_are_recognised() {
        let mut map = MappedMetadata::from_tags(
            "ape",
            vec![
                RawTag::new("Title", "Song"),
                RawTag::new("Track", "2/8"),
                RawTag::new("Record Date", "2011-03-01"),
                RawTag::new("EAN/UPC", "0123456789012"),
                RawTag::new("Unknown Item", "x"),
            ],
        );
        ApeParser.map_metadata(&mut map);

        assert!(ApeParser.has_essential_metadata(&map));
        assert_eq!(ApeParser.track_number(&map), (Some(2), Some(8)));
        assert_eq!(ApeParser.year(&map), Some(2011));

        let aux = ApeParser.auxiliary_metadata(&map);
        assert_eq!(aux.len(), 1);
        assert_eq!(aux[0].key, "Barcode");
        assert_eq!(map.unclaimed()[0].key, "Unknown Item");
    }
}

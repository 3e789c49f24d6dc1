//! Fallback for any key no other convention claimed

use super::MetadataParser;
use crate::mapped::{Field, MappedMetadata, ParserKind};
use crate::values::parse_flag;

/// Essential field suggested by a key's wording, if any
fn field_for_key(key: &str) -> Option<Field> {
    let normalized: String = key
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let has = |word: &str| normalized.contains(word);

    if has("sort") {
        return None;
    }

    let field = if has("drm") || has("encrypt") || has("protected") {
        Field::Protected
    } else if has("lyric") {
        Field::Lyrics
    } else if has("albumartist") {
        Field::AlbumArtist
    } else if has("artist") {
        Field::Artist
    } else if has("album") {
        Field::Album
    } else if has("genre") {
        Field::Genre
    } else if has("title") {
        Field::Title
    } else if has("year") || has("date") {
        Field::Year
    } else if has("track") {
        if has("total") || has("count") {
            Field::TrackTotal
        } else {
            Field::TrackNumber
        }
    } else if has("disc") || has("disk") {
        if has("total") || has("count") {
            Field::DiscTotal
        } else {
            Field::DiscNumber
        }
    } else {
        return None;
    };

    Some(field)
}

/// Parser that claims every leftover key
pub struct DefaultParser;

impl MetadataParser for DefaultParser {
    fn kind(&self) -> ParserKind {
        ParserKind::Default
    }

    fn map_metadata(&self, map: &mut MappedMetadata) {
        let claimed = map.claim(|_| true);
        let section = map.section_mut(self.kind());

        for tag in &claimed {
            match field_for_key(&tag.key) {
                // Only flag-like values count as a protection marker
                Some(Field::Protected) => match parse_flag(&tag.value) {
                    Some(flag) => {
                        section.insert_essential(Field::Protected, &flag.to_string());
                    }
                    None => {
                        section.insert_generic(&tag.key, &tag.value);
                    }
                },
                Some(field) => {
                    section.insert_essential(field, &tag.value);
                }
                None => {
                    section.insert_generic(&tag.key, &tag.value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::RawTag;

    #[test]
    fn keywords_pick_fields() {
        assert_eq!(field_for_key("Song Title"), Some(Field::Title));
        assert_eq!(field_for_key("ALBUM_ARTIST"), Some(Field::AlbumArtist));
        assert_eq!(field_for_key("track_count"), Some(Field::TrackTotal));
        assert_eq!(field_for_key("Disk#"), Some(Field::DiscNumber));
        assert_eq!(field_for_key("RecordingDate"), Some(Field::Year));
        assert_eq!(field_for_key("TITLESORT"), None);
        assert_eq!(field_for_key("Rating"), None);
    }

    #[test]
    fn every_leftover_is_claimed() {
        let mut map = MappedMetadata::from_tags(
            "xyz",
            vec![
                RawTag::new("SongTitle", "Untitled"),
                RawTag::new("Rating", "5"),
                RawTag::new("encrypted", "yes"),
                RawTag::new("drm_license", "https://example.invalid"),
            ],
        );
        DefaultParser.map_metadata(&mut map);

        assert!(map.unclaimed().is_empty());
        assert_eq!(DefaultParser.title(&map).as_deref(), Some("Untitled"));
        assert_eq!(DefaultParser.is_drm_protected(&map), Some(true));

        let aux = DefaultParser.auxiliary_metadata(&map);
        let keys: Vec<&str> = aux.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Rating", "drm_license"]);
        assert_eq!(aux[0].format, cadence_core::MetadataFormat::Other);
    }
}

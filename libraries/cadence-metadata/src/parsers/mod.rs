//! Tag parsers, one per tag convention
//!
//! Every parser claims raw tags from the shared [`MappedMetadata`] into its
//! own section. The typed getters are provided methods that read that
//! section, so conventions only differ in which keys they claim and how
//! values are normalised while claiming.

mod ape;
mod common;
mod default;
mod id3;
mod vorbis;
mod wma;

pub use ape::ApeParser;
pub use common::CommonParser;
pub use default::DefaultParser;
pub use id3::Id3Parser;
pub use vorbis::VorbisParser;
pub use wma::WmaParser;

use crate::mapped::{Field, MappedMetadata, ParserKind};
use crate::values::{
    clean, parse_bpm, parse_flag, parse_gain, parse_number_pair, parse_peak, parse_u32, parse_year,
};
use cadence_core::{MetadataEntry, RawTag, ReplayGain};

/// A tag convention that claims raw keys and exposes typed fields
pub trait MetadataParser: Send + Sync {
    fn kind(&self) -> ParserKind;

    /// Claim every unclaimed tag this convention recognises
    fn map_metadata(&self, map: &mut MappedMetadata);

    fn has_essential_metadata(&self, map: &MappedMetadata) -> bool {
        map.section(self.kind()).has_essential()
    }

    fn title(&self, map: &MappedMetadata) -> Option<String> {
        self.text(map, Field::Title)
    }

    fn artist(&self, map: &MappedMetadata) -> Option<String> {
        self.text(map, Field::Artist)
    }

    fn album(&self, map: &MappedMetadata) -> Option<String> {
        self.text(map, Field::Album)
    }

    fn album_artist(&self, map: &MappedMetadata) -> Option<String> {
        self.text(map, Field::AlbumArtist)
    }

    fn genre(&self, map: &MappedMetadata) -> Option<String> {
        self.text(map, Field::Genre)
    }

    fn composer(&self, map: &MappedMetadata) -> Option<String> {
        self.text(map, Field::Composer)
    }

    fn conductor(&self, map: &MappedMetadata) -> Option<String> {
        self.text(map, Field::Conductor)
    }

    fn performer(&self, map: &MappedMetadata) -> Option<String> {
        self.text(map, Field::Performer)
    }

    fn lyricist(&self, map: &MappedMetadata) -> Option<String> {
        self.text(map, Field::Lyricist)
    }

    fn lyrics(&self, map: &MappedMetadata) -> Option<String> {
        self.text(map, Field::Lyrics)
    }

    fn year(&self, map: &MappedMetadata) -> Option<i32> {
        self.raw(map, Field::Year).and_then(parse_year)
    }

    fn bpm(&self, map: &MappedMetadata) -> Option<u32> {
        self.raw(map, Field::Bpm).and_then(parse_bpm)
    }

    /// Track number and the total given alongside it ("5/12")
    fn track_number(&self, map: &MappedMetadata) -> (Option<u32>, Option<u32>) {
        self.raw(map, Field::TrackNumber)
            .map_or((None, None), parse_number_pair)
    }

    /// Standalone track total
    fn total_tracks(&self, map: &MappedMetadata) -> Option<u32> {
        self.raw(map, Field::TrackTotal).and_then(parse_u32)
    }

    /// Disc number and the total given alongside it ("1/2")
    fn disc_number(&self, map: &MappedMetadata) -> (Option<u32>, Option<u32>) {
        self.raw(map, Field::DiscNumber)
            .map_or((None, None), parse_number_pair)
    }

    /// Standalone disc total
    fn total_discs(&self, map: &MappedMetadata) -> Option<u32> {
        self.raw(map, Field::DiscTotal).and_then(parse_u32)
    }

    fn replay_gain(&self, map: &MappedMetadata) -> Option<ReplayGain> {
        ReplayGain::from_parts(
            self.raw(map, Field::TrackGain).and_then(parse_gain),
            self.raw(map, Field::TrackPeak).and_then(parse_peak),
            self.raw(map, Field::AlbumGain).and_then(parse_gain),
            self.raw(map, Field::AlbumPeak).and_then(parse_peak),
        )
    }

    fn is_drm_protected(&self, map: &MappedMetadata) -> Option<bool> {
        self.raw(map, Field::Protected).and_then(parse_flag)
    }

    /// Recognised non-essential values as auxiliary entries
    fn auxiliary_metadata(&self, map: &MappedMetadata) -> Vec<MetadataEntry> {
        let format = self.kind().metadata_format();
        map.section(self.kind())
            .generic
            .iter()
            .map(|(key, value)| MetadataEntry::new(format, key.as_str(), value.as_str()))
            .collect()
    }

    /// Stored value of an essential field
    fn raw<'m>(&self, map: &'m MappedMetadata, field: Field) -> Option<&'m str> {
        map.section(self.kind()).essential(field)
    }

    /// Trimmed text of an essential field
    fn text(&self, map: &MappedMetadata, field: Field) -> Option<String> {
        self.raw(map, field).and_then(clean)
    }
}

/// How a raw key is matched against a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyMatch {
    /// Case-insensitive equality
    Exact,
    /// Case-sensitive equality
    ExactCase,
    /// Case-insensitive prefix
    Prefix,
}

/// Where a claimed value is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Essential(Field),
    /// Generic entry under a readable name
    Generic(&'static str),
    /// Generic entry named by the key with the rule's prefix removed
    UserDefined,
}

/// One raw key a convention understands
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeyRule {
    key: &'static str,
    matching: KeyMatch,
    target: Target,
    convert: Option<fn(&str) -> Option<String>>,
}

impl KeyRule {
    pub(crate) const fn essential(key: &'static str, field: Field) -> Self {
        Self {
            key,
            matching: KeyMatch::Exact,
            target: Target::Essential(field),
            convert: None,
        }
    }

    pub(crate) const fn generic(key: &'static str, name: &'static str) -> Self {
        Self {
            key,
            matching: KeyMatch::Exact,
            target: Target::Generic(name),
            convert: None,
        }
    }

    /// Claim every key starting with `prefix`, named by the remainder
    pub(crate) const fn user_defined(prefix: &'static str) -> Self {
        Self {
            key: prefix,
            matching: KeyMatch::Prefix,
            target: Target::UserDefined,
            convert: None,
        }
    }

    pub(crate) const fn case_sensitive(mut self) -> Self {
        self.matching = KeyMatch::ExactCase;
        self
    }

    pub(crate) const fn prefix(mut self) -> Self {
        self.matching = KeyMatch::Prefix;
        self
    }

    /// Normalise the value while claiming; `None` drops it
    pub(crate) const fn converted(mut self, convert: fn(&str) -> Option<String>) -> Self {
        self.convert = Some(convert);
        self
    }

    pub(crate) fn matches(&self, key: &str) -> bool {
        match self.matching {
            KeyMatch::Exact => key.eq_ignore_ascii_case(self.key),
            KeyMatch::ExactCase => key == self.key,
            KeyMatch::Prefix => {
                key.len() > self.key.len()
                    && key.is_char_boundary(self.key.len())
                    && key[..self.key.len()].eq_ignore_ascii_case(self.key)
            }
        }
    }

    fn store(&self, map: &mut MappedMetadata, kind: ParserKind, tag: &RawTag) {
        let value = match self.convert {
            Some(convert) => match convert(&tag.value) {
                Some(value) => value,
                None => return,
            },
            None => tag.value.clone(),
        };

        let section = map.section_mut(kind);
        match self.target {
            Target::Essential(field) => {
                section.insert_essential(field, &value);
            }
            Target::Generic(name) => {
                section.insert_generic(name, &value);
            }
            Target::UserDefined => {
                let name = tag.key[self.key.len()..].trim();
                if !name.is_empty() {
                    section.insert_generic(name, &value);
                }
            }
        }
    }
}

/// Claim every tag matched by `rules`. Each tag goes to the first rule
/// matching it; values are stored in rule order, so earlier rules take
/// precedence for the same field.
pub(crate) fn claim_by_rules(map: &mut MappedMetadata, kind: ParserKind, rules: &[KeyRule]) {
    let claimed = map.claim(|tag| rules.iter().any(|r| r.matches(&tag.key)));

    let mut assigned: Vec<(usize, &RawTag)> = claimed
        .iter()
        .filter_map(|tag| {
            rules
                .iter()
                .position(|r| r.matches(&tag.key))
                .map(|i| (i, tag))
        })
        .collect();
    assigned.sort_by_key(|(i, _)| *i);

    for (i, tag) in assigned {
        rules[i].store(map, kind, tag);
    }
}

/// Map a language tag value to display names
pub(crate) fn convert_language(value: &str) -> Option<String> {
    clean(&crate::language::render_language(value))
}

/// Any non-empty value marks the file as protected
pub(crate) fn convert_drm_marker(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| "true".to_string())
}

/// Keep only values that read as a flag
pub(crate) fn convert_flag(value: &str) -> Option<String> {
    parse_flag(value).map(|b| b.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &[KeyRule] = &[
        KeyRule::essential("TITLE", Field::Title),
        KeyRule::essential("ALT_TITLE", Field::Title),
        KeyRule::generic("COPYRIGHT", "Copyright"),
        KeyRule::user_defined("USER:"),
        KeyRule::essential("lower", Field::Album).case_sensitive(),
    ];

    #[test]
    fn rules_match_by_kind() {
        assert!(RULES[0].matches("title"));
        assert!(RULES[3].matches("user:Mood"));
        assert!(!RULES[3].matches("USER:"));
        assert!(RULES[4].matches("lower"));
        assert!(!RULES[4].matches("LOWER"));
    }

    #[test]
    fn earlier_rules_take_precedence() {
        let mut map = MappedMetadata::from_tags(
            "flac",
            vec![
                RawTag::new("ALT_TITLE", "Alternate"),
                RawTag::new("Title", "Main"),
                RawTag::new("USER:Mood", "Calm"),
                RawTag::new("LOWER", "Unclaimed"),
            ],
        );

        claim_by_rules(&mut map, ParserKind::Vorbis, RULES);

        let section = map.section(ParserKind::Vorbis);
        assert_eq!(section.essential(Field::Title), Some("Main"));
        assert_eq!(section.generic["Mood"], "Calm");
        assert_eq!(map.unclaimed().len(), 1);
    }

    #[test]
    fn conversions() {
        assert_eq!(convert_language("eng"), Some("English".to_string()));
        assert_eq!(convert_drm_marker("  "), None);
        assert_eq!(convert_drm_marker("abc"), Some("true".to_string()));
        assert_eq!(convert_flag("Yes"), Some("true".to_string()));
        assert_eq!(convert_flag("???"), None);
    }
}

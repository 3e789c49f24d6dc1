//! Shared per-file view over raw tags, partitioned by parser
//!
//! Each parser claims the raw tags it recognises. A claimed tag leaves the
//! unclaimed set, so later parsers never see it, and each field of a
//! section is written at most once.

use cadence_core::{
    AttachedPicture, AudioStreamParams, ContainerInfo, MetadataFormat, RawChapter, RawTag,
};
use std::collections::BTreeMap;

/// Tag conventions, one per parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParserKind {
    Common,
    Id3,
    Wm,
    Vorbis,
    Ape,
    Default,
}

impl ParserKind {
    pub const ALL: [ParserKind; 6] = [
        Self::Common,
        Self::Id3,
        Self::Wm,
        Self::Vorbis,
        Self::Ape,
        Self::Default,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Format recorded on auxiliary entries from this parser
    pub fn metadata_format(self) -> MetadataFormat {
        match self {
            Self::Common => MetadataFormat::Common,
            Self::Id3 => MetadataFormat::Id3,
            Self::Wm => MetadataFormat::Wm,
            Self::Vorbis => MetadataFormat::Vorbis,
            Self::Ape => MetadataFormat::Ape,
            Self::Default => MetadataFormat::Other,
        }
    }
}

/// Typed fields a parser resolves for the primary record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Genre,
    Year,
    TrackNumber,
    TrackTotal,
    DiscNumber,
    DiscTotal,
    Lyrics,
    Composer,
    Conductor,
    Performer,
    Lyricist,
    Bpm,
    TrackGain,
    TrackPeak,
    AlbumGain,
    AlbumPeak,
    Protected,
}

impl Field {
    /// Whether holding this field makes a parser relevant. Replay gain
    /// values are stored but never count on their own.
    pub const fn is_essential(self) -> bool {
        !matches!(
            self,
            Self::TrackGain | Self::TrackPeak | Self::AlbumGain | Self::AlbumPeak
        )
    }
}

/// Values claimed by one parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSection {
    /// Essential fields, first value wins
    pub essential: BTreeMap<Field, String>,
    /// Recognised non-essential values keyed by readable name, first value wins
    pub generic: BTreeMap<String, String>,
}

impl ParsedSection {
    pub fn insert_essential(&mut self, field: Field, value: &str) -> bool {
        let Some(value) = crate::values::clean(value) else {
            return false;
        };
        if self.essential.contains_key(&field) {
            return false;
        }
        self.essential.insert(field, value);
        true
    }

    pub fn insert_generic(&mut self, name: &str, value: &str) -> bool {
        let Some(value) = crate::values::clean(value) else {
            return false;
        };
        if self.generic.contains_key(name) {
            return false;
        }
        self.generic.insert(name.to_string(), value);
        true
    }

    pub fn essential(&self, field: Field) -> Option<&str> {
        self.essential.get(&field).map(String::as_str)
    }

    /// True if any stored field is essential
    pub fn has_essential(&self) -> bool {
        self.essential.keys().any(|field| field.is_essential())
    }
}

/// Raw tags of one file plus the parse results of every parser
#[derive(Debug, Clone, Default)]
pub struct MappedMetadata {
    /// Lower-cased file extension
    pub file_type: String,
    /// Duration in seconds
    pub duration: f64,
    pub chapters: Vec<RawChapter>,
    pub picture: Option<AttachedPicture>,
    pub audio_stream: Option<AudioStreamParams>,
    unclaimed: Vec<RawTag>,
    sections: [ParsedSection; 6],
}

impl MappedMetadata {
    pub fn new(info: &ContainerInfo) -> Self {
        Self {
            file_type: info.file_type(),
            duration: info.duration,
            chapters: info.chapters.clone(),
            picture: info.best_picture().cloned(),
            audio_stream: info.audio_stream.clone(),
            unclaimed: info.tags.clone(),
            sections: Default::default(),
        }
    }

    /// Build a view directly from raw tags
    pub fn from_tags(file_type: &str, tags: Vec<RawTag>) -> Self {
        Self {
            file_type: file_type.to_lowercase(),
            unclaimed: tags,
            ..Self::default()
        }
    }

    /// Tags no parser has claimed yet
    pub fn unclaimed(&self) -> &[RawTag] {
        &self.unclaimed
    }

    /// Remove and return every unclaimed tag matching `predicate`,
    /// preserving their order
    pub fn claim(&mut self, mut predicate: impl FnMut(&RawTag) -> bool) -> Vec<RawTag> {
        let (claimed, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.unclaimed).into_iter().partition(|t| predicate(t));
        self.unclaimed = rest;
        claimed
    }

    pub fn section(&self, kind: ParserKind) -> &ParsedSection {
        &self.sections[kind.index()]
    }

    pub fn section_mut(&mut self, kind: ParserKind) -> &mut ParsedSection {
        &mut self.sections[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claiming_removes_tags() {
        let mut map = MappedMetadata::from_tags(
            "MP3",
            vec![RawTag::new("TIT2", "Song"), RawTag::new("TXXX:foo", "bar")],
        );
        assert_eq!(map.file_type, "mp3");

        let claimed = map.claim(|t| t.key == "TIT2");
        assert_eq!(claimed.len(), 1);
        assert_eq!(map.unclaimed().len(), 1);
        assert_eq!(map.unclaimed()[0].key, "TXXX:foo");

        assert!(map.claim(|t| t.key == "TIT2").is_empty());
    }

    #[test]
    fn section_fields_are_write_once() {
        let mut map = MappedMetadata::default();
        let section = map.section_mut(ParserKind::Vorbis);

        assert!(section.insert_essential(Field::Title, " First "));
        assert!(!section.insert_essential(Field::Title, "Second"));
        assert!(!section.insert_essential(Field::Artist, "   "));
        assert!(section.insert_generic("Copyright", "2001"));
        assert!(!section.insert_generic("Copyright", "2002"));

        let section = map.section(ParserKind::Vorbis);
        assert_eq!(section.essential(Field::Title), Some("First"));
        assert_eq!(section.essential(Field::Artist), None);
        assert_eq!(section.generic["Copyright"], "2001");
        assert!(map.section(ParserKind::Id3).essential.is_empty());
    }

    #[test]
    fn replay_gain_alone_is_not_essential() {
        let mut section = ParsedSection::default();
        section.insert_essential(Field::TrackGain, "-6.20 dB");
        section.insert_essential(Field::AlbumPeak, "0.98");
        assert!(!section.has_essential());

        section.insert_essential(Field::Genre, "Jazz");
        assert!(section.has_essential());
    }

    #[test]
    fn sections_are_indexed_by_kind() {
        for (i, kind) in ParserKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}

//! Which parsers run for a file type, and in what order

use crate::parsers::{
    ApeParser, CommonParser, DefaultParser, Id3Parser, MetadataParser, VorbisParser, WmaParser,
};

static COMMON: CommonParser = CommonParser;
static ID3: Id3Parser = Id3Parser;
static WMA: WmaParser = WmaParser;
static VORBIS: VorbisParser = VorbisParser;
static APE: ApeParser = ApeParser;
static DEFAULT: DefaultParser = DefaultParser;

static ALL_PARSERS: [&dyn MetadataParser; 6] = [&COMMON, &ID3, &VORBIS, &APE, &WMA, &DEFAULT];
static WMA_PARSERS: [&dyn MetadataParser; 6] = [&COMMON, &WMA, &ID3, &VORBIS, &APE, &DEFAULT];
static VORBIS_PARSERS: [&dyn MetadataParser; 6] =
    [&COMMON, &VORBIS, &APE, &ID3, &WMA, &DEFAULT];
static APE_PARSERS: [&dyn MetadataParser; 6] = [&COMMON, &APE, &VORBIS, &ID3, &WMA, &DEFAULT];

const VORBIS_EXTENSIONS: &[&str] = &["flac", "dsf", "dsd", "dff", "ogg", "oga", "opus"];
const APE_EXTENSIONS: &[&str] = &["ape", "mpc"];

/// Parser orderings keyed by file extension
pub struct ParserSet;

impl ParserSet {
    /// Parsers for a lower-cased extension, highest priority first.
    ///
    /// The common parser always comes first and the default parser last.
    pub fn parsers_for_extension(extension: &str) -> &'static [&'static dyn MetadataParser] {
        if extension == "wma" {
            &WMA_PARSERS
        } else if VORBIS_EXTENSIONS.contains(&extension) {
            &VORBIS_PARSERS
        } else if APE_EXTENSIONS.contains(&extension) {
            &APE_PARSERS
        } else {
            &ALL_PARSERS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapped::ParserKind;

    fn kinds(extension: &str) -> Vec<ParserKind> {
        ParserSet::parsers_for_extension(extension)
            .iter()
            .map(|p| p.kind())
            .collect()
    }

    #[test]
    fn wma_prefers_windows_media() {
        use ParserKind::*;
        assert_eq!(kinds("wma"), vec![Common, Wm, Id3, Vorbis, Ape, Default]);
    }

    #[test]
    fn vorbis_family() {
        use ParserKind::*;
        for ext in ["flac", "dsf", "dsd", "dff", "ogg", "oga", "opus"] {
            assert_eq!(kinds(ext), vec![Common, Vorbis, Ape, Id3, Wm, Default], "{ext}");
        }
    }

    #[test]
    fn ape_family() {
        use ParserKind::*;
        for ext in ["ape", "mpc"] {
            assert_eq!(kinds(ext), vec![Common, Ape, Vorbis, Id3, Wm, Default], "{ext}");
        }
    }

    #[test]
    fn everything_else_uses_the_full_order() {
        use ParserKind::*;
        for ext in ["mp3", "m4a", "wav", "aiff", ""] {
            assert_eq!(kinds(ext), vec![Common, Id3, Vorbis, Ape, Wm, Default], "{ext}");
        }
    }
}

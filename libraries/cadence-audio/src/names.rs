//! Container format names keyed by file extension

/// (extensions, short name, long name)
static FORMATS: &[(&[&str], &str, &str)] = &[
    (&["aac", "m4a", "m4b", "m4r", "mp4"], "mov,mp4,m4a", "QuickTime / MOV"),
    (&["aif", "aifc", "aiff"], "aiff", "Audio IFF"),
    (&["ape"], "ape", "Monkey's Audio"),
    (&["caf"], "caf", "Apple CAF (Core Audio Format)"),
    (&["dff", "dsd"], "iff", "IFF (Interchange File Format)"),
    (&["dsf"], "dsf", "DSD Stream File (DSF)"),
    (&["flac"], "flac", "raw FLAC"),
    (&["mka", "mkv", "webm"], "matroska,webm", "Matroska / WebM"),
    (&["mp2", "mp3"], "mp3", "MP2/3 (MPEG audio layer 2/3)"),
    (&["mpc"], "mpc", "Musepack"),
    (&["oga", "ogg", "opus"], "ogg", "Ogg"),
    (&["wav", "wave"], "wav", "WAV / WAVE (Waveform Audio)"),
    (&["wma"], "asf", "ASF (Advanced / Active Streaming Format)"),
    (&["wv"], "wv", "WavPack"),
];

/// Short and long container names for a lower-cased extension
pub(crate) fn format_names(extension: &str) -> Option<(&'static str, &'static str)> {
    FORMATS
        .iter()
        .find(|(exts, _, _)| exts.contains(&extension))
        .map(|(_, short, long)| (*short, *long))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_resolve() {
        assert_eq!(format_names("flac"), Some(("flac", "raw FLAC")));
        assert_eq!(format_names("m4a").map(|n| n.0), Some("mov,mp4,m4a"));
        assert_eq!(format_names("xyz"), None);
    }
}

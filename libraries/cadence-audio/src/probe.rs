//! Symphonia probing shared by the container backend and decode sessions

use crate::error::{AudioError, Result};
use std::path::Path;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::{FormatOptions, FormatReader, Track};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::{Hint, ProbeResult};

/// Probe a file, using its extension as a format hint
pub(crate) fn probe_file(path: &Path) -> Result<ProbeResult> {
    if !path.exists() {
        return Err(AudioError::FileNotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let format_opts = FormatOptions {
        enable_gapless: true,
        ..Default::default()
    };

    symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &MetadataOptions::default())
        .map_err(|e| AudioError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// The best audio track: the default track if it is decodable, otherwise
/// the first track with a known codec
pub(crate) fn best_audio_track(format: &dyn FormatReader) -> Option<&Track> {
    format
        .default_track()
        .filter(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .or_else(|| {
            format
                .tracks()
                .iter()
                .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probing_a_missing_file_fails() {
        let result = probe_file(Path::new("/nonexistent/file.flac"));
        assert!(matches!(result, Err(AudioError::FileNotFound(_))));
    }

    #[test]
    fn probing_garbage_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, [0u8; 64]).unwrap();

        let result = probe_file(&path);
        assert!(matches!(result, Err(AudioError::UnsupportedFormat { .. })));
    }
}

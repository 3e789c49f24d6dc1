/// Audio-specific errors
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types
#[derive(Error, Debug)]
pub enum AudioError {
    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Container could not be probed
    #[error("Unsupported format for '{}': {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// No decodable audio stream
    #[error("No audio stream found in '{}'", .0.display())]
    NoAudioStream(PathBuf),

    /// Decoder could not be created
    #[error("Decoder error: {0}")]
    DecoderError(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Symphonia error
    #[error("Symphonia error: {0}")]
    Symphonia(#[from] symphonia::core::errors::Error),

    /// Lofty error
    #[error("Lofty error: {0}")]
    Lofty(#[from] lofty::error::LoftyError),
}

impl AudioError {
    fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileNotFound(path)
            | Self::NoAudioStream(path)
            | Self::UnsupportedFormat { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<AudioError> for cadence_core::CadenceError {
    fn from(err: AudioError) -> Self {
        match err.path() {
            Some(path) => {
                cadence_core::CadenceError::format_initialization(path.clone(), err.to_string())
            }
            None => cadence_core::CadenceError::audio(err.to_string()),
        }
    }
}

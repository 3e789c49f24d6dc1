/// Core error types for Cadence
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using `CadenceError`
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Core error type for Cadence
#[derive(Error, Debug)]
pub enum CadenceError {
    /// The container could not be opened or lacks stream information
    #[error("Unable to initialize format context for file '{}': {reason}", path.display())]
    FormatInitialization { path: PathBuf, reason: String },

    /// The file is DRM-protected and cannot be read
    #[error("File is DRM-protected: '{}'", path.display())]
    DrmProtected { path: PathBuf },

    /// Audio decoding errors
    #[error("Audio error: {0}")]
    Audio(String),

    /// Metadata parsing errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Loudness analysis errors
    #[error("Loudness error: {0}")]
    Loudness(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CadenceError {
    /// Create a format initialization error for a file
    pub fn format_initialization(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::FormatInitialization {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a DRM protection error for a file
    pub fn drm_protected(path: impl AsRef<Path>) -> Self {
        Self::DrmProtected {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Create a metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create a loudness error
    pub fn loudness(msg: impl Into<String>) -> Self {
        Self::Loudness(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error reports a DRM-protected file
    pub fn is_drm_protected(&self) -> bool {
        matches!(self, Self::DrmProtected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_file() {
        let err = CadenceError::format_initialization("/music/broken.mp3", "no audio stream");
        assert_eq!(
            err.to_string(),
            "Unable to initialize format context for file '/music/broken.mp3': no audio stream"
        );

        let err = CadenceError::drm_protected("/music/locked.wma");
        assert!(err.is_drm_protected());
        assert!(err.to_string().contains("/music/locked.wma"));
    }
}

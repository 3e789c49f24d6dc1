/// Metadata-specific errors
use cadence_core::CadenceError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The container could not be opened or probed
    #[error("Unable to initialize format context for file '{}': {reason}", path.display())]
    FormatInitialization { path: PathBuf, reason: String },

    /// The file is DRM-protected and yields no record
    #[error("File is DRM-protected: '{}'", path.display())]
    DrmProtected { path: PathBuf },

    /// Scan root does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    /// Wrap a backend failure for `path`
    pub(crate) fn from_backend(path: impl Into<PathBuf>, err: CadenceError) -> Self {
        match err {
            CadenceError::FormatInitialization { path, reason } => {
                Self::FormatInitialization { path, reason }
            }
            CadenceError::DrmProtected { path } => Self::DrmProtected { path },
            other => Self::FormatInitialization {
                path: path.into(),
                reason: other.to_string(),
            },
        }
    }
}

impl From<MetadataError> for CadenceError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::FormatInitialization { path, reason } => {
                CadenceError::FormatInitialization { path, reason }
            }
            MetadataError::DrmProtected { path } => CadenceError::DrmProtected { path },
            MetadataError::Io(e) => CadenceError::Io(e),
            other @ MetadataError::FileNotFound(_) => CadenceError::metadata(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_become_format_initialization() {
        let err = MetadataError::from_backend("/a.mp3", CadenceError::audio("no decoder"));
        assert!(matches!(
            err,
            MetadataError::FormatInitialization { ref reason, .. } if reason.contains("no decoder")
        ));
    }

    #[test]
    fn drm_survives_conversion_to_core() {
        let err: CadenceError = MetadataError::DrmProtected {
            path: PathBuf::from("/a.wma"),
        }
        .into();
        assert!(err.is_drm_protected());
    }
}

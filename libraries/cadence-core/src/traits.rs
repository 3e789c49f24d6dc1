/// Core traits for Cadence
use crate::error::Result;
use crate::types::{ContainerInfo, CoverArt, PrimaryMetadata};
use std::path::Path;

/// Container/decode backend
///
/// Implementers open a media file and describe it as a [`ContainerInfo`]
/// snapshot. A failure to open must be reported as
/// [`CadenceError::FormatInitialization`](crate::CadenceError::FormatInitialization).
pub trait ContainerBackend: Send + Sync {
    /// Open a container and read its tags and stream parameters
    ///
    /// # Errors
    /// Returns an error if the file is not a readable audio container
    fn open(&self, path: &Path) -> Result<ContainerInfo>;

    /// Compute the duration by walking every packet of the audio stream
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or read
    fn brute_force_duration(&self, path: &Path) -> Result<f64>;
}

/// Metadata reader trait
///
/// Implementers assemble [`PrimaryMetadata`] for a single file.
pub trait MetadataReader: Send + Sync {
    /// Read the primary metadata of a file
    ///
    /// # Errors
    /// Returns an error if the container cannot be opened or is DRM-protected
    fn read(&self, path: &Path) -> Result<PrimaryMetadata>;

    /// Read embedded cover art, if any
    fn read_art(&self, path: &Path) -> Option<CoverArt> {
        self.read(path).ok().and_then(|m| m.art)
    }

    /// Compute an accurate duration for files whose duration is estimated
    fn compute_accurate_duration(&self, path: &Path) -> Option<f64> {
        let _ = path;
        None
    }
}

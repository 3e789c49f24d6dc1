//! Cadence Core
//!
//! Platform-agnostic types, traits, and error handling shared by the
//! Cadence metadata and loudness crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Container snapshot**: `ContainerInfo`, `RawTag`, `AudioStreamParams`
//! - **Records**: `PrimaryMetadata`, `AudioInfo`, `Chapter`, `ReplayGain`
//! - **Core Traits**: `ContainerBackend`, `MetadataReader`
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{ContainerInfo, RawTag, StandardKey};
//!
//! let mut info = ContainerInfo::new("/music/song.flac");
//! info.tags.push(RawTag::new("TITLE", "My Song").with_std_key(StandardKey::TrackTitle));
//!
//! assert_eq!(info.file_type(), "flac");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CadenceError, Result};
pub use traits::{ContainerBackend, MetadataReader};

pub use types::{
    AttachedPicture, AudioInfo, AudioStreamParams, ChannelLayout, Chapter, ContainerInfo,
    CoverArt, DurationEstimation, MetadataEntry, MetadataFormat, PrimaryMetadata, RawChapter,
    RawTag, ReplayGain, SampleFormat, StandardKey, REPLAYGAIN_REFERENCE_LUFS,
};

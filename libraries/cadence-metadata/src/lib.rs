//! Cadence Metadata
//!
//! Tag parsing and primary metadata assembly for Cadence.
//!
//! This crate provides:
//! - One parser per tag convention (common, ID3, Windows Media, Vorbis
//!   comments, APEv2 and a catch-all default)
//! - Per-extension parser ordering
//! - [`FileReader`], which reconciles every parser into a single
//!   [`PrimaryMetadata`](cadence_core::PrimaryMetadata) record
//! - A library scanner with progress reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_metadata::FileReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = FileReader::new();
//! let metadata = reader.get_primary_metadata(Path::new("/music/song.mp3"))?;
//!
//! println!("{:?} by {:?}", metadata.title, metadata.artist);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod audio_info;
mod error;
pub mod genres;
pub mod language;
mod mapped;
mod ordering;
pub mod parsers;
mod reader;
mod scanner;
mod values;

pub use audio_info::derive_audio_info;
pub use error::{MetadataError, Result};
pub use mapped::{Field, MappedMetadata, ParsedSection, ParserKind};
pub use ordering::ParserSet;
pub use parsers::MetadataParser;
pub use reader::FileReader;
pub use scanner::{
    default_extensions, AnalysisHook, LibraryScanner, ScanConfig, ScanProgress, ScanStats,
};

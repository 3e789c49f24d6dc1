//! Cadence Audio
//!
//! Container probing and PCM decoding for Cadence, built on Symphonia.
//!
//! This crate provides:
//! - [`SymphoniaBackend`], the [`ContainerBackend`](cadence_core::ContainerBackend)
//!   used by the metadata reader (raw tags, duration, chapters, pictures,
//!   stream parameters)
//! - [`SymphoniaSession`], a [`DecodeSession`] over the best audio stream,
//!   consumed by the loudness scanner
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_audio::SymphoniaBackend;
//! use cadence_core::ContainerBackend;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SymphoniaBackend::new();
//! let info = backend.open(Path::new("/music/song.flac"))?;
//!
//! println!("{} tags, {:.1}s", info.tags.len(), info.duration);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod backend;
pub mod error;
mod names;
mod probe;
pub mod session;

pub use backend::SymphoniaBackend;
pub use error::{AudioError, Result};
pub use session::{DecodeSession, PcmFrame, StreamError, StreamErrorKind, SymphoniaSession};

/// Sample types a [`PcmFrame`] can be converted to
pub use symphonia::core::conv::{ConvertibleSample, FromSample};

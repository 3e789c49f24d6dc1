//! Loudness scanning for Cadence
//!
//! This crate provides:
//! - EBU R128 loudness measurement (integrated LUFS, loudness range, true
//!   and sample peak)
//! - A loudness scanner that drives any [`DecodeSession`](cadence_audio::DecodeSession)
//!   through a read → decode → convert → accumulate cycle
//! - ReplayGain 2.0 track gain derived from the measurement
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐     ┌──────────────────┐     ┌───────────────┐
//! │ DecodeSession │ ──► │ LoudnessScanner  │ ──► │ LoudnessInfo  │
//! └───────────────┘     │  SampleConverter │     └───────────────┘
//!                       │  Analyzer        │             │
//!                       └──────────────────┘             ▼
//!                                                 ┌───────────────┐
//!                                                 │  ReplayGain   │
//!                                                 └───────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::ReplayGain;
//! use cadence_loudness::{LoudnessScanner, SampleWidth};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut scanner = LoudnessScanner::for_file(Path::new("/music/song.flac"), SampleWidth::F32)?;
//!
//! if let Some(info) = scanner.scan()? {
//!     println!("{info}");
//!     let rg = ReplayGain::from(&info);
//!     println!("Track gain: {:.2} dB", rg.track_gain.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod analyzer;
mod convert;
mod error;
mod replaygain;
mod scanner;

pub use analyzer::{AnalysisSample, LoudnessAnalyzer, LoudnessInfo};
pub use convert::{SampleConverter, SampleWidth};
pub use error::{LoudnessError, Result};
pub use replaygain::ReplayGainCalculator;
pub use scanner::{scan_file, LoudnessScanner, ScanPhase, MAX_CONSECUTIVE_ERRORS};

pub use cadence_core::REPLAYGAIN_REFERENCE_LUFS;

//! Interleaved sample conversion for the analyzer

use cadence_audio::{ConvertibleSample, PcmFrame};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sample type decoded frames are converted to before analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleWidth {
    I16,
    I32,
    #[default]
    F32,
}

impl fmt::Display for SampleWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::F32 => f.write_str("f32"),
        }
    }
}

impl FromStr for SampleWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i16" | "s16" => Ok(Self::I16),
            "i32" | "s32" => Ok(Self::I32),
            "f32" | "float" => Ok(Self::F32),
            other => Err(format!("unknown sample width '{other}' (expected i16, i32 or f32)")),
        }
    }
}

/// Reusable interleaving buffer
///
/// The buffer only ever grows: a frame that fits in the current allocation
/// is written in place.
#[derive(Debug, Clone)]
pub struct SampleConverter<S> {
    buffer: Vec<S>,
}

impl<S: ConvertibleSample> SampleConverter<S> {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Interleave `frame` and return exactly its samples
    pub fn convert<F: PcmFrame>(&mut self, frame: &F) -> &[S] {
        let needed = frame.frame_count() * frame.channel_count();
        if self.buffer.len() < needed {
            self.buffer.resize(needed, S::MID);
        }

        let out = &mut self.buffer[..needed];
        frame.write_interleaved(out);
        out
    }

    /// Allocated capacity in samples
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl<S: ConvertibleSample> Default for SampleConverter<S> {
    fn default() -> Self {
        Self::new()
    }
}

//! Error types for loudness analysis

use cadence_audio::AudioError;
use thiserror::Error;

/// Result type for loudness operations
pub type Result<T> = std::result::Result<T, LoudnessError>;

/// Errors that can occur during loudness analysis
#[derive(Error, Debug)]
pub enum LoudnessError {
    /// Invalid sample rate
    #[error("Invalid sample rate: {0} Hz (must be between 8000 and 384000)")]
    InvalidSampleRate(u32),

    /// Invalid channel count
    #[error("Invalid channel count: {0} (must be 1-8)")]
    InvalidChannelCount(u32),

    /// EBU R128 analysis error
    #[error("EBU R128 analysis failed: {0}")]
    AnalysisError(String),

    /// No samples were provided for analysis
    #[error("No audio samples provided for analysis")]
    NoSamples,

    /// Audio is completely silent
    #[error("Audio is silent (no loudness data available)")]
    SilentAudio,

    /// The scan already reached a terminal state
    #[error("Loudness scan already finished")]
    ScanFinished,

    /// The decode session could not be opened
    #[error(transparent)]
    Backend(#[from] AudioError),
}

impl From<ebur128::Error> for LoudnessError {
    fn from(err: ebur128::Error) -> Self {
        Self::AnalysisError(format!("{:?}", err))
    }
}

impl From<LoudnessError> for cadence_core::CadenceError {
    fn from(err: LoudnessError) -> Self {
        match err {
            LoudnessError::Backend(e) => e.into(),
            other => cadence_core::CadenceError::loudness(other.to_string()),
        }
    }
}

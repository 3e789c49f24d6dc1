//! EBU R128 loudness analysis
//!
//! Measures integrated loudness (LUFS), loudness range (LU), true peak
//! (dBTP, 4x oversampled below 96 kHz) and sample peak (dBFS) with the
//! ebur128 crate.

use crate::error::{LoudnessError, Result};
use cadence_audio::ConvertibleSample;
use ebur128::{EbuR128, Mode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loudness characteristics of an analysed track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoudnessInfo {
    /// Integrated loudness in LUFS
    pub integrated_lufs: f64,

    /// Loudness range in LU; lower values mean more compressed audio
    pub loudness_range_lu: f64,

    /// Maximum inter-sample peak in dBTP
    pub true_peak_dbfs: f64,

    /// Maximum sample value in dBFS
    pub sample_peak_dbfs: f64,

    /// Duration of the analysed audio in seconds
    pub duration_seconds: f64,

    pub sample_rate: u32,
    pub channels: u32,
}

impl LoudnessInfo {
    /// Whether applying `gain_db` would push the true peak above 0 dBTP
    pub fn will_clip_at_gain(&self, gain_db: f64) -> bool {
        self.true_peak_dbfs + gain_db > 0.0
    }
}

impl fmt::Display for LoudnessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loudness: {:.1} LUFS, Range: {:.1} LU, True Peak: {:.1} dBTP, Sample Peak: {:.1} dBFS",
            self.integrated_lufs,
            self.loudness_range_lu,
            self.true_peak_dbfs,
            self.sample_peak_dbfs
        )
    }
}

/// Interleaved sample types the analyzer accepts
pub trait AnalysisSample: ConvertibleSample {
    /// Feed interleaved samples to an EBU R128 state
    fn add_to(state: &mut EbuR128, samples: &[Self]) -> std::result::Result<(), ebur128::Error>;
}

impl AnalysisSample for i16 {
    fn add_to(state: &mut EbuR128, samples: &[Self]) -> std::result::Result<(), ebur128::Error> {
        state.add_frames_i16(samples)
    }
}

impl AnalysisSample for i32 {
    fn add_to(state: &mut EbuR128, samples: &[Self]) -> std::result::Result<(), ebur128::Error> {
        state.add_frames_i32(samples)
    }
}

impl AnalysisSample for f32 {
    fn add_to(state: &mut EbuR128, samples: &[Self]) -> std::result::Result<(), ebur128::Error> {
        state.add_frames_f32(samples)
    }
}

fn linear_to_dbfs(linear: f64) -> f64 {
    if linear > 0.0 {
        20.0 * linear.log10()
    } else {
        f64::NEG_INFINITY
    }
}

/// EBU R128 loudness analyzer
///
/// # Example
///
/// ```ignore
/// use cadence_loudness::LoudnessAnalyzer;
///
/// let mut analyzer = LoudnessAnalyzer::new(44100, 2)?;
/// analyzer.add_frames(&interleaved_f32)?;
///
/// let info = analyzer.finalize()?;
/// println!("Integrated loudness: {:.1} LUFS", info.integrated_lufs);
/// ```
pub struct LoudnessAnalyzer {
    ebur128: EbuR128,
    sample_rate: u32,
    channels: u32,
    /// Interleaved samples accepted so far
    samples_processed: usize,
}

impl LoudnessAnalyzer {
    /// Create an analyzer for `channels` (1-8) at `sample_rate` (8000-384000 Hz)
    ///
    /// # Errors
    /// Returns error if sample rate or channel count is out of range
    pub fn new(sample_rate: u32, channels: u32) -> Result<Self> {
        if !(8000..=384000).contains(&sample_rate) {
            return Err(LoudnessError::InvalidSampleRate(sample_rate));
        }
        if !(1..=8).contains(&channels) {
            return Err(LoudnessError::InvalidChannelCount(channels));
        }

        let mode = Mode::I | Mode::LRA | Mode::SAMPLE_PEAK | Mode::TRUE_PEAK;
        let ebur128 = EbuR128::new(channels, sample_rate, mode)?;

        Ok(Self {
            ebur128,
            sample_rate,
            channels,
            samples_processed: 0,
        })
    }

    /// Add interleaved samples (L R L R... for stereo)
    ///
    /// # Errors
    /// Returns error if the sample count is not a whole number of frames
    pub fn add_frames<S: AnalysisSample>(&mut self, samples: &[S]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        if samples.len() % self.channels as usize != 0 {
            return Err(LoudnessError::AnalysisError(format!(
                "Sample count {} is not divisible by channel count {}",
                samples.len(),
                self.channels
            )));
        }

        S::add_to(&mut self.ebur128, samples)?;
        self.samples_processed += samples.len();

        Ok(())
    }

    /// Finish the analysis
    ///
    /// # Errors
    /// [`LoudnessError::NoSamples`] if nothing was added,
    /// [`LoudnessError::SilentAudio`] if the audio never rose above the gate
    pub fn finalize(self) -> Result<LoudnessInfo> {
        if self.samples_processed == 0 {
            return Err(LoudnessError::NoSamples);
        }

        let frames = self.samples_processed / self.channels as usize;
        let duration_seconds = frames as f64 / f64::from(self.sample_rate);

        // ebur128 reports -inf for audio that never passes the gate
        let integrated_lufs = self.ebur128.loudness_global()?;
        if !integrated_lufs.is_finite() {
            return Err(LoudnessError::SilentAudio);
        }

        let loudness_range_lu = self.ebur128.loudness_range().unwrap_or(0.0);

        let (true_peak, sample_peak) = (0..self.channels).fold((0.0_f64, 0.0_f64), |acc, ch| {
            (
                acc.0.max(self.ebur128.true_peak(ch).unwrap_or(0.0)),
                acc.1.max(self.ebur128.sample_peak(ch).unwrap_or(0.0)),
            )
        });

        Ok(LoudnessInfo {
            integrated_lufs,
            loudness_range_lu,
            true_peak_dbfs: linear_to_dbfs(true_peak),
            sample_peak_dbfs: linear_to_dbfs(sample_peak),
            duration_seconds,
            sample_rate: self.sample_rate,
            channels: self.channels,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Number of interleaved samples processed
    pub fn samples_processed(&self) -> usize {
        self.samples_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(sample_rate: u32, channels: u32, amplitude: f32, secs: f32) -> Vec<f32> {
        let frames = (sample_rate as f32 * secs) as usize;
        let mut samples = Vec::with_capacity(frames * channels as usize);
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let s = amplitude * (2.0 * std::f32::consts::PI * 1000.0 * t).sin();
            for _ in 0..channels {
                samples.push(s);
            }
        }
        samples
    }

    #[test]
    fn test_analyzer_creation() {
        assert!(LoudnessAnalyzer::new(44100, 2).is_ok());
        assert!(LoudnessAnalyzer::new(8000, 1).is_ok());
        assert!(LoudnessAnalyzer::new(96000, 6).is_ok());

        assert!(matches!(
            LoudnessAnalyzer::new(100, 2),
            Err(LoudnessError::InvalidSampleRate(100))
        ));
        assert!(LoudnessAnalyzer::new(500000, 2).is_err());

        assert!(matches!(
            LoudnessAnalyzer::new(44100, 0),
            Err(LoudnessError::InvalidChannelCount(0))
        ));
        assert!(LoudnessAnalyzer::new(44100, 10).is_err());
    }

    #[test]
    fn test_silent_audio() {
        let mut analyzer = LoudnessAnalyzer::new(44100, 2).unwrap();
        analyzer.add_frames(&vec![0.0_f32; 44100 * 2]).unwrap();

        assert!(matches!(analyzer.finalize(), Err(LoudnessError::SilentAudio)));
    }

    #[test]
    fn test_no_samples_error() {
        let analyzer = LoudnessAnalyzer::new(44100, 2).unwrap();
        assert!(matches!(analyzer.finalize(), Err(LoudnessError::NoSamples)));
    }

    #[test]
    fn test_partial_frame_is_rejected() {
        let mut analyzer = LoudnessAnalyzer::new(44100, 2).unwrap();
        assert!(analyzer.add_frames(&[0.1_f32; 5]).is_err());
        assert!(analyzer.add_frames(&[100_i16; 3]).is_err());
        assert_eq!(analyzer.samples_processed(), 0);
    }

    #[test]
    fn test_sine_wave_loudness() {
        // -20 dBFS sine, 3 seconds so the gated measurement settles
        let mut analyzer = LoudnessAnalyzer::new(44100, 2).unwrap();
        analyzer.add_frames(&sine(44100, 2, 0.1, 3.0)).unwrap();
        let info = analyzer.finalize().unwrap();

        assert!(
            info.integrated_lufs > -30.0 && info.integrated_lufs < -15.0,
            "Expected loudness around -20 LUFS, got {:.1}",
            info.integrated_lufs
        );
        assert!(
            info.true_peak_dbfs > -25.0 && info.true_peak_dbfs < -15.0,
            "Expected true peak around -20 dBTP, got {:.1}",
            info.true_peak_dbfs
        );
        assert!((info.duration_seconds - 3.0).abs() < 0.001);
        assert_eq!(info.channels, 2);
    }

    #[test]
    fn test_integer_widths_agree_with_float() {
        let float = sine(48000, 1, 0.25, 2.0);
        let as_i16: Vec<i16> = float.iter().map(|s| (s * f32::from(i16::MAX)) as i16).collect();
        let as_i32: Vec<i32> = float
            .iter()
            .map(|s| (f64::from(*s) * f64::from(i32::MAX)) as i32)
            .collect();

        let measure = |add: &dyn Fn(&mut LoudnessAnalyzer)| {
            let mut analyzer = LoudnessAnalyzer::new(48000, 1).unwrap();
            add(&mut analyzer);
            analyzer.finalize().unwrap().integrated_lufs
        };

        let f = measure(&|a| a.add_frames(&float).unwrap());
        let i16_lufs = measure(&|a| a.add_frames(&as_i16).unwrap());
        let i32_lufs = measure(&|a| a.add_frames(&as_i32).unwrap());

        assert!((f - i16_lufs).abs() < 0.1, "{f} vs {i16_lufs}");
        assert!((f - i32_lufs).abs() < 0.1, "{f} vs {i32_lufs}");
    }

    #[test]
    fn test_clipping_check() {
        let info = LoudnessInfo {
            integrated_lufs: -14.0,
            loudness_range_lu: 5.0,
            true_peak_dbfs: -1.0,
            sample_peak_dbfs: -1.5,
            duration_seconds: 180.0,
            sample_rate: 44100,
            channels: 2,
        };

        assert!(info.will_clip_at_gain(2.0));
        assert!(!info.will_clip_at_gain(-1.0));
    }
}

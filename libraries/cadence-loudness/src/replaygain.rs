//! ReplayGain 2.0 values from a loudness analysis
//!
//! Track gain is the reference level (-18 LUFS) minus the integrated
//! loudness. The peak is the true peak as a linear amplitude, the form
//! ReplayGain tags use.

use crate::analyzer::LoudnessInfo;
use cadence_core::{ReplayGain, REPLAYGAIN_REFERENCE_LUFS};

/// Converts loudness measurements to ReplayGain values
#[derive(Debug, Clone, Copy)]
pub struct ReplayGainCalculator {
    /// Reference loudness level in LUFS
    reference_lufs: f64,
}

impl ReplayGainCalculator {
    /// Calculator for the ReplayGain 2.0 reference level
    pub fn new() -> Self {
        Self {
            reference_lufs: REPLAYGAIN_REFERENCE_LUFS,
        }
    }

    pub fn with_reference(reference_lufs: f64) -> Self {
        Self { reference_lufs }
    }

    pub fn reference_lufs(&self) -> f64 {
        self.reference_lufs
    }

    /// Track gain and peak; album fields stay empty
    pub fn track_gain(&self, info: &LoudnessInfo) -> ReplayGain {
        let peak = 10.0_f64.powf(info.true_peak_dbfs / 20.0);

        ReplayGain {
            track_gain: Some(self.reference_lufs - info.integrated_lufs),
            track_peak: peak.is_finite().then_some(peak),
            album_gain: None,
            album_peak: None,
        }
    }
}

impl Default for ReplayGainCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Replay gain from analysis at the ReplayGain 2.0 reference level
impl From<&LoudnessInfo> for ReplayGain {
    fn from(info: &LoudnessInfo) -> Self {
        ReplayGainCalculator::new().track_gain(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_loudness_info(integrated_lufs: f64, true_peak_dbfs: f64) -> LoudnessInfo {
        LoudnessInfo {
            integrated_lufs,
            loudness_range_lu: 5.0,
            true_peak_dbfs,
            sample_peak_dbfs: true_peak_dbfs - 0.5,
            duration_seconds: 180.0,
            sample_rate: 44100,
            channels: 2,
        }
    }

    #[test]
    fn test_track_gain_quiet() {
        let rg = ReplayGain::from(&make_loudness_info(-23.0, -6.0));

        // -18 - (-23) = +5 dB
        assert!((rg.track_gain.unwrap() - 5.0).abs() < 0.001);
        assert!((rg.track_peak.unwrap() - 0.501).abs() < 0.001);
        assert_eq!(rg.album_gain, None);
    }

    #[test]
    fn test_track_gain_loud() {
        let rg = ReplayGain::from(&make_loudness_info(-10.0, 0.0));

        assert!((rg.track_gain.unwrap() + 8.0).abs() < 0.001);
        assert!((rg.track_peak.unwrap() - 1.0).abs() < f64::EPSILON);
        assert!(rg.track_peak_db().unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_custom_reference() {
        let calc = ReplayGainCalculator::with_reference(-14.0);
        let rg = calc.track_gain(&make_loudness_info(-20.0, -3.0));
        assert!((rg.track_gain.unwrap() - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_silent_peak_maps_to_zero() {
        let rg = ReplayGain::from(&make_loudness_info(-40.0, f64::NEG_INFINITY));
        assert_eq!(rg.track_peak, Some(0.0));
    }
}

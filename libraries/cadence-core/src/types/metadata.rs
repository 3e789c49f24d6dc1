/// Track metadata types
use crate::types::audio::AudioInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// ReplayGain 2.0 reference loudness level (-18 LUFS)
pub const REPLAYGAIN_REFERENCE_LUFS: f64 = -18.0;

/// ReplayGain values, read from tags or derived from analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayGain {
    /// Track gain in dB
    pub track_gain: Option<f64>,
    /// Track peak (linear, 0.0-1.0+)
    pub track_peak: Option<f64>,
    /// Album gain in dB
    pub album_gain: Option<f64>,
    /// Album peak (linear, 0.0-1.0+)
    pub album_peak: Option<f64>,
}

impl ReplayGain {
    /// Build a value from optional parts; `None` when no gain is present.
    ///
    /// Peaks without a matching gain carry no normalization information.
    pub fn from_parts(
        track_gain: Option<f64>,
        track_peak: Option<f64>,
        album_gain: Option<f64>,
        album_peak: Option<f64>,
    ) -> Option<Self> {
        if track_gain.is_none() && album_gain.is_none() {
            return None;
        }

        Some(Self {
            track_gain,
            track_peak,
            album_gain,
            album_peak,
        })
    }

    /// Track peak in dBFS
    pub fn track_peak_db(&self) -> Option<f64> {
        self.track_peak.filter(|p| *p > 0.0).map(|p| 20.0 * p.log10())
    }

    /// Album peak in dBFS
    pub fn album_peak_db(&self) -> Option<f64> {
        self.album_peak.filter(|p| *p > 0.0).map(|p| 20.0 * p.log10())
    }
}

/// Tag convention an auxiliary entry was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataFormat {
    Common,
    Id3,
    Wm,
    Vorbis,
    Ape,
    Other,
}

impl fmt::Display for MetadataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Common => "Common",
            Self::Id3 => "ID3",
            Self::Wm => "Windows Media",
            Self::Vorbis => "Vorbis Comment",
            Self::Ape => "APE",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A non-essential tag value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub format: MetadataFormat,
    /// Human-readable key, e.g. "Copyright"
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(format: MetadataFormat, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            format,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A chapter marker within a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: Option<String>,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    pub duration: f64,
}

impl Chapter {
    pub fn new(title: Option<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            title,
            start_time,
            end_time,
            duration: (end_time - start_time).max(0.0),
        }
    }
}

/// Embedded cover art
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverArt {
    /// Raw image data
    pub data: Vec<u8>,
    /// MIME type as stated by the container, if any
    pub mime_type: Option<String>,
}

impl CoverArt {
    pub fn new(data: Vec<u8>, mime_type: Option<String>) -> Self {
        Self { data, mime_type }
    }

    /// Stated MIME type, or one detected from the image magic bytes
    pub fn detect_mime_type(&self) -> Option<&str> {
        if let Some(mime) = self
            .mime_type
            .as_deref()
            .filter(|m| !m.is_empty() && *m != "application/octet-stream")
        {
            return Some(mime);
        }

        let data = self.data.as_slice();
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some("image/jpeg")
        } else if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some("image/png")
        } else if data.starts_with(b"GIF") {
            Some("image/gif")
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some("image/webp")
        } else if data.starts_with(b"BM") {
            Some("image/bmp")
        } else {
            None
        }
    }
}

/// Track metadata assembled from a file's tags and stream parameters
///
/// Built once per file; the persistence layer decides how to store it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,

    pub composer: Option<String>,
    pub conductor: Option<String>,
    pub performer: Option<String>,
    pub lyricist: Option<String>,

    pub track_number: Option<u32>,
    pub total_tracks: Option<u32>,

    pub disc_number: Option<u32>,
    pub total_discs: Option<u32>,

    /// Duration in seconds
    pub duration: f64,
    pub duration_is_accurate: bool,
    pub is_protected: Option<bool>,

    pub bpm: Option<u32>,
    pub lyrics: Option<String>,

    pub chapters: Vec<Chapter>,
    pub replay_gain: Option<ReplayGain>,

    /// Non-essential tags keyed by their readable name
    pub auxiliary_metadata: BTreeMap<String, MetadataEntry>,

    #[serde(skip)]
    pub art: Option<CoverArt>,

    pub audio_info: AudioInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_gain_requires_a_gain() {
        assert!(ReplayGain::from_parts(None, Some(0.9), None, Some(0.95)).is_none());

        let rg = ReplayGain::from_parts(Some(-6.5), Some(1.0), None, None).unwrap();
        assert_eq!(rg.track_gain, Some(-6.5));
        assert_eq!(rg.track_peak_db(), Some(0.0));
        assert_eq!(rg.album_peak_db(), None);
    }

    #[test]
    fn chapter_duration_is_derived() {
        let chapter = Chapter::new(Some("Intro".to_string()), 10.0, 42.5);
        assert!((chapter.duration - 32.5).abs() < f64::EPSILON);

        let inverted = Chapter::new(None, 5.0, 1.0);
        assert_eq!(inverted.duration, 0.0);
    }

    #[test]
    fn cover_art_mime_detection() {
        let jpeg = CoverArt::new(vec![0xFF, 0xD8, 0xFF, 0xE0], None);
        assert_eq!(jpeg.detect_mime_type(), Some("image/jpeg"));

        let png = CoverArt::new(vec![0x89, 0x50, 0x4E, 0x47, 0x0D], None);
        assert_eq!(png.detect_mime_type(), Some("image/png"));

        let stated = CoverArt::new(vec![0x00], Some("image/webp".to_string()));
        assert_eq!(stated.detect_mime_type(), Some("image/webp"));

        let unknown = CoverArt::new(vec![0x00, 0x01], Some("application/octet-stream".to_string()));
        assert_eq!(unknown.detect_mime_type(), None);
    }

    #[test]
    fn primary_metadata_serializes_without_art() {
        let mut metadata = PrimaryMetadata::default();
        metadata.title = Some("Song".to_string());
        metadata.art = Some(CoverArt::new(vec![1, 2, 3], None));

        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("\"title\":\"Song\""));
        assert!(!json.contains("\"art\""));
    }
}

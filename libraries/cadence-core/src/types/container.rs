/// Container snapshot types produced by a backend
use crate::types::audio::{ChannelLayout, SampleFormat};
use crate::types::metadata::ReplayGain;
use std::path::{Path, PathBuf};

/// Backend-neutral meaning of a raw tag, when the demuxer knows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardKey {
    TrackTitle,
    Artist,
    Album,
    AlbumArtist,
    Genre,
    Date,
    OriginalDate,
    ReleaseDate,
    TrackNumber,
    TrackTotal,
    DiscNumber,
    DiscTotal,
    Lyrics,
    Composer,
    Conductor,
    Performer,
    Lyricist,
    Bpm,
    Comment,
    Copyright,
    Description,
    EncodedBy,
    Encoder,
    Label,
    Language,
    Isrc,
    Compilation,
    Grouping,
    Mood,
    Arranger,
    Producer,
    Engineer,
    Remixer,
    ReplayGainTrackGain,
    ReplayGainTrackPeak,
    ReplayGainAlbumGain,
    ReplayGainAlbumPeak,
    MusicBrainzRecordingId,
    MusicBrainzAlbumId,
    MusicBrainzArtistId,
}

/// A tag exactly as the container stores it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    /// Key in the container's own convention, e.g. "TIT2" or "TITLE"
    pub key: String,
    pub std_key: Option<StandardKey>,
    pub value: String,
}

impl RawTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            std_key: None,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn with_std_key(mut self, std_key: StandardKey) -> Self {
        self.std_key = Some(std_key);
        self
    }
}

/// How the backend arrived at the container duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationEstimation {
    /// Read from stream headers or timestamps
    FromStream,
    /// Extrapolated from file size and bit rate
    FromBitrate,
    #[default]
    Unknown,
}

impl DurationEstimation {
    pub fn is_accurate(&self) -> bool {
        matches!(self, Self::FromStream)
    }
}

/// A chapter as listed by the container
#[derive(Debug, Clone, PartialEq)]
pub struct RawChapter {
    pub title: Option<String>,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
}

/// An image stream or embedded picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedPicture {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
    /// Whether the container marks it as the front cover
    pub is_front_cover: bool,
}

/// Codec parameters of the best audio stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioStreamParams {
    pub codec_name: Option<String>,
    pub codec_long_name: Option<String>,
    pub sample_rate: Option<u32>,
    pub channel_count: Option<u32>,
    pub sample_format: Option<SampleFormat>,
    pub channel_layout: Option<ChannelLayout>,
    /// Replay gain carried in codec side data rather than tags
    pub replay_gain: Option<ReplayGain>,
}

/// Everything a backend knows about an opened container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerInfo {
    pub path: PathBuf,
    /// Short format name, e.g. "flac"
    pub format_name: String,
    /// Long format name, e.g. "FLAC (Free Lossless Audio Codec)"
    pub format_long_name: Option<String>,
    /// Duration in seconds
    pub duration: f64,
    pub duration_estimation: DurationEstimation,
    /// Overall bit rate in bits per second
    pub bit_rate: Option<u64>,
    pub tags: Vec<RawTag>,
    pub chapters: Vec<RawChapter>,
    pub pictures: Vec<AttachedPicture>,
    pub audio_stream: Option<AudioStreamParams>,
    /// Channel layout of the decoder output, when a decoder was opened
    pub playback_channel_layout: Option<String>,
}

impl ContainerInfo {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Lower-cased file extension
    pub fn file_type(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    /// Whether the duration can be trusted as-is
    pub fn estimated_duration_is_accurate(&self) -> bool {
        self.duration_estimation.is_accurate()
    }

    /// Front cover if one is marked, otherwise the first picture
    pub fn best_picture(&self) -> Option<&AttachedPicture> {
        self.pictures
            .iter()
            .find(|p| p.is_front_cover)
            .or_else(|| self.pictures.first())
    }
}

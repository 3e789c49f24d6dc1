/// Audio stream types
use crate::types::metadata::ReplayGain;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sample format of an encoded or decoded audio stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleFormat {
    U8,
    S8,
    U16,
    S16,
    U24,
    S24,
    U32,
    S32,
    F32,
    F64,
}

impl SampleFormat {
    /// Infer a signed integer format from a bit depth
    pub fn from_bits_per_sample(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::U8),
            16 => Some(Self::S16),
            24 => Some(Self::S24),
            32 => Some(Self::S32),
            _ => None,
        }
    }

    /// Number of bits per sample
    pub fn bits(&self) -> u32 {
        match self {
            Self::U8 | Self::S8 => 8,
            Self::U16 | Self::S16 => 16,
            Self::U24 | Self::S24 => 24,
            Self::U32 | Self::S32 | Self::F32 => 32,
            Self::F64 => 64,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_signed(&self) -> bool {
        !matches!(self, Self::U8 | Self::U16 | Self::U24 | Self::U32)
    }

    /// Human-readable description, e.g. "Signed 16-bit Integer"
    pub fn description(&self) -> String {
        if self.is_float() {
            format!("{}-bit Floating Point", self.bits())
        } else if self.is_signed() {
            format!("Signed {}-bit Integer", self.bits())
        } else {
            format!("Unsigned {}-bit Integer", self.bits())
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Speaker positions as a WAVE-style channel bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelLayout(pub u32);

impl ChannelLayout {
    pub const FRONT_LEFT: u32 = 0x0001;
    pub const FRONT_RIGHT: u32 = 0x0002;
    pub const FRONT_CENTRE: u32 = 0x0004;
    pub const LFE: u32 = 0x0008;
    pub const REAR_LEFT: u32 = 0x0010;
    pub const REAR_RIGHT: u32 = 0x0020;
    pub const FRONT_LEFT_CENTRE: u32 = 0x0040;
    pub const FRONT_RIGHT_CENTRE: u32 = 0x0080;
    pub const REAR_CENTRE: u32 = 0x0100;
    pub const SIDE_LEFT: u32 = 0x0200;
    pub const SIDE_RIGHT: u32 = 0x0400;

    pub const MONO: Self = Self(Self::FRONT_CENTRE);
    pub const STEREO: Self = Self(Self::FRONT_LEFT | Self::FRONT_RIGHT);
    pub const SURROUND_5_1: Self = Self(
        Self::FRONT_LEFT
            | Self::FRONT_RIGHT
            | Self::FRONT_CENTRE
            | Self::LFE
            | Self::SIDE_LEFT
            | Self::SIDE_RIGHT,
    );

    /// Create a layout from a channel bitmask
    #[must_use]
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Number of channels in the layout
    pub fn channel_count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Human-readable description, e.g. "5.1 Surround"
    pub fn description(&self) -> String {
        const FL: u32 = ChannelLayout::FRONT_LEFT;
        const FR: u32 = ChannelLayout::FRONT_RIGHT;
        const FC: u32 = ChannelLayout::FRONT_CENTRE;
        const LFE: u32 = ChannelLayout::LFE;
        const RL: u32 = ChannelLayout::REAR_LEFT;
        const RR: u32 = ChannelLayout::REAR_RIGHT;
        const RC: u32 = ChannelLayout::REAR_CENTRE;
        const SL: u32 = ChannelLayout::SIDE_LEFT;
        const SR: u32 = ChannelLayout::SIDE_RIGHT;

        let name = match self.0 {
            FL | FC => "Mono",
            x if x == FL | FR => "Stereo",
            x if x == FL | FR | LFE => "2.1",
            x if x == FL | FR | FC => "3.0",
            x if x == FL | FR | RC => "3.0 (Back)",
            x if x == FL | FR | FC | LFE => "3.1",
            x if x == FL | FR | FC | RC => "4.0",
            x if x == FL | FR | RL | RR => "Quadraphonic",
            x if x == FL | FR | SL | SR => "Quadraphonic (Side)",
            x if x == FL | FR | FC | SL | SR => "5.0 Surround",
            x if x == FL | FR | FC | RL | RR => "5.0 Surround (Back)",
            x if x == FL | FR | FC | LFE | SL | SR => "5.1 Surround",
            x if x == FL | FR | FC | LFE | RL | RR => "5.1 Surround (Back)",
            x if x == FL | FR | FC | LFE | RC | SL | SR => "6.1 Surround",
            x if x == FL | FR | FC | LFE | RL | RR | SL | SR => "7.1 Surround",
            _ => return format!("{} Channels", self.channel_count()),
        };

        name.to_string()
    }

    /// Default layout for a bare channel count
    pub fn default_for_channel_count(count: u32) -> Option<Self> {
        match count {
            1 => Some(Self::MONO),
            2 => Some(Self::STEREO),
            6 => Some(Self::SURROUND_5_1),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Derived characteristics of a track's audio stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Total number of frames in the track
    pub frames: Option<i64>,

    /// Sample rate in Hz
    pub sample_rate: Option<u32>,

    /// e.g. "32-bit Floating Point" or "Signed 16-bit Integer"
    pub sample_format: Option<String>,

    pub num_channels: Option<u32>,

    /// Bit rate in kbps
    pub bit_rate: Option<u32>,

    /// Container format (e.g. "FLAC (Free Lossless Audio Codec)")
    pub format: Option<String>,

    /// Codec used to decode the track
    pub codec: Option<String>,

    /// e.g. "5.1 Surround"
    pub channel_layout: Option<String>,

    pub replay_gain_from_metadata: Option<ReplayGain>,
    pub replay_gain_from_analysis: Option<ReplayGain>,
}

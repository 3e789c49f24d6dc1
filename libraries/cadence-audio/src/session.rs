//! Decode sessions over the best audio stream of a file
//!
//! A session hands out compressed packets and decodes them into PCM frames.
//! Frames convert themselves to whatever interleaved sample type the
//! consumer asks for, so analysis code never touches Symphonia buffers.

use crate::error::{AudioError, Result};
use crate::probe::{best_audio_track, probe_file};
use std::fmt;
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::conv::{ConvertibleSample, FromSample};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatReader, Packet};
use symphonia::core::sample::Sample;
use tracing::{debug, trace};

/// Where in the decode loop a stream error happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamErrorKind {
    PacketRead,
    Decode,
}

impl fmt::Display for StreamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PacketRead => f.write_str("packet read"),
            Self::Decode => f.write_str("decode"),
        }
    }
}

/// Error from reading or decoding a packet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct StreamError {
    pub kind: StreamErrorKind,
    /// The stream has no more data
    pub eof: bool,
    pub message: String,
}

impl StreamError {
    pub fn new(kind: StreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            eof: false,
            message: message.into(),
        }
    }

    pub fn end_of_stream(kind: StreamErrorKind) -> Self {
        Self {
            kind,
            eof: true,
            message: "end of stream".to_string(),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }
}

/// A block of decoded PCM audio
pub trait PcmFrame {
    /// Number of frames (samples per channel)
    fn frame_count(&self) -> usize;

    fn channel_count(&self) -> usize;

    /// Write samples interleaved into `out`, which holds at least
    /// `frame_count() * channel_count()` samples
    fn write_interleaved<S: ConvertibleSample>(&self, out: &mut [S]);
}

/// A packet source paired with a decoder
pub trait DecodeSession {
    type Packet;
    type Frame<'a>: PcmFrame
    where
        Self: 'a;

    fn sample_rate(&self) -> u32;

    fn channel_count(&self) -> usize;

    /// Next packet of the analysed stream. `Ok(None)` means the source
    /// produced nothing usable this time.
    fn read_packet(&mut self) -> std::result::Result<Option<Self::Packet>, StreamError>;

    /// Decode one packet into zero or more frames
    fn decode(
        &mut self,
        packet: &Self::Packet,
    ) -> std::result::Result<Vec<Self::Frame<'_>>, StreamError>;
}

/// Decode session backed by Symphonia
pub struct SymphoniaSession {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: usize,
}

impl SymphoniaSession {
    /// Open the best audio stream of a file and create its decoder
    pub fn open(path: &Path) -> Result<Self> {
        let probed = probe_file(path)?;
        let format = probed.format;

        let track = best_audio_track(format.as_ref())
            .ok_or_else(|| AudioError::NoAudioStream(path.to_path_buf()))?;

        let track_id = track.id;
        let params = track.codec_params.clone();

        let sample_rate = params
            .sample_rate
            .ok_or_else(|| AudioError::DecoderError("Unknown sample rate".to_string()))?;
        let channels = params
            .channels
            .map(|c| c.count())
            .or_else(|| params.channel_layout.map(|l| l.into_channels().count()))
            .ok_or_else(|| AudioError::DecoderError("Unknown channel count".to_string()))?;

        let decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(|e| AudioError::DecoderError(e.to_string()))?;

        debug!(
            "Opened decode session for '{}': {} Hz, {} channels",
            path.display(),
            sample_rate,
            channels
        );

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            channels,
        })
    }
}

impl DecodeSession for SymphoniaSession {
    type Packet = Packet;
    type Frame<'a> = AudioBufferRef<'a>;

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channel_count(&self) -> usize {
        self.channels
    }

    fn read_packet(&mut self) -> std::result::Result<Option<Packet>, StreamError> {
        loop {
            match self.format.next_packet() {
                Ok(packet) if packet.track_id() != self.track_id => continue,
                Ok(packet) => return Ok(Some(packet)),
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Err(StreamError::end_of_stream(StreamErrorKind::PacketRead));
                }
                Err(SymphoniaError::ResetRequired) => {
                    trace!("Stream reset, resetting decoder");
                    self.decoder.reset();
                }
                Err(e) => return Err(StreamError::new(StreamErrorKind::PacketRead, e.to_string())),
            }
        }
    }

    fn decode(&mut self, packet: &Packet) -> std::result::Result<Vec<AudioBufferRef<'_>>, StreamError> {
        match self.decoder.decode(packet) {
            Ok(decoded) => Ok(vec![decoded]),
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(StreamError::end_of_stream(StreamErrorKind::Decode))
            }
            Err(e) => Err(StreamError::new(StreamErrorKind::Decode, e.to_string())),
        }
    }
}

impl PcmFrame for AudioBufferRef<'_> {
    fn frame_count(&self) -> usize {
        self.frames()
    }

    fn channel_count(&self) -> usize {
        self.spec().channels.count()
    }

    fn write_interleaved<S: ConvertibleSample>(&self, out: &mut [S]) {
        match self {
            AudioBufferRef::U8(buf) => interleave(&**buf, out),
            AudioBufferRef::U16(buf) => interleave(&**buf, out),
            AudioBufferRef::U24(buf) => interleave(&**buf, out),
            AudioBufferRef::U32(buf) => interleave(&**buf, out),
            AudioBufferRef::S8(buf) => interleave(&**buf, out),
            AudioBufferRef::S16(buf) => interleave(&**buf, out),
            AudioBufferRef::S24(buf) => interleave(&**buf, out),
            AudioBufferRef::S32(buf) => interleave(&**buf, out),
            AudioBufferRef::F32(buf) => interleave(&**buf, out),
            AudioBufferRef::F64(buf) => interleave(&**buf, out),
        }
    }
}

/// Copy planar channels into an interleaved slice, converting each sample
fn interleave<T, S>(buf: &AudioBuffer<T>, out: &mut [S])
where
    T: Sample,
    S: FromSample<T>,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();

    for ch in 0..channels {
        for (i, sample) in buf.chan(ch).iter().take(frames).enumerate() {
            out[i * channels + ch] = S::from_sample(*sample);
        }
    }
}

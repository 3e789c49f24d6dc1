//! Loudness scan over a decode session
//!
//! The scan reads packets, decodes them, converts each frame to the chosen
//! sample width and feeds the analyzer until the stream ends or too many
//! consecutive steps fail.

use crate::analyzer::{AnalysisSample, LoudnessAnalyzer, LoudnessInfo};
use crate::convert::{SampleConverter, SampleWidth};
use crate::error::{LoudnessError, Result};
use cadence_audio::{DecodeSession, PcmFrame, SymphoniaSession};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Consecutive failures after which a scan gives up
pub const MAX_CONSECUTIVE_ERRORS: usize = 3;

/// Position of a scan in its read → decode → convert → accumulate cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Reading,
    Decoding,
    Converting,
    Accumulating,
    /// The stream ended; the analyzer holds the whole track
    EndOfStream,
    /// Too many consecutive failures
    Aborted,
}

impl ScanPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::EndOfStream | Self::Aborted)
    }
}

/// One converter per supported width
enum Accumulator {
    I16(SampleConverter<i16>),
    I32(SampleConverter<i32>),
    F32(SampleConverter<f32>),
}

impl Accumulator {
    fn new(width: SampleWidth) -> Self {
        match width {
            SampleWidth::I16 => Self::I16(SampleConverter::new()),
            SampleWidth::I32 => Self::I32(SampleConverter::new()),
            SampleWidth::F32 => Self::F32(SampleConverter::new()),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            Self::I16(c) => c.capacity(),
            Self::I32(c) => c.capacity(),
            Self::F32(c) => c.capacity(),
        }
    }

    fn accumulate<F: PcmFrame>(
        &mut self,
        frame: &F,
        analyzer: &mut LoudnessAnalyzer,
        phase: &mut ScanPhase,
    ) -> Result<()> {
        match self {
            Self::I16(c) => feed(c, frame, analyzer, phase),
            Self::I32(c) => feed(c, frame, analyzer, phase),
            Self::F32(c) => feed(c, frame, analyzer, phase),
        }
    }
}

fn feed<S: AnalysisSample, F: PcmFrame>(
    converter: &mut SampleConverter<S>,
    frame: &F,
    analyzer: &mut LoudnessAnalyzer,
    phase: &mut ScanPhase,
) -> Result<()> {
    if frame.channel_count() != analyzer.channels() as usize {
        return Err(LoudnessError::AnalysisError(format!(
            "Frame has {} channels, stream has {}",
            frame.channel_count(),
            analyzer.channels()
        )));
    }

    *phase = ScanPhase::Converting;
    let samples = converter.convert(frame);

    *phase = ScanPhase::Accumulating;
    analyzer.add_frames(samples)
}

/// Measures the loudness of one stream
///
/// The analyzer and conversion buffer are owned by the scanner and released
/// with it, whichever way the scan ends.
pub struct LoudnessScanner<D: DecodeSession = SymphoniaSession> {
    session: D,
    analyzer: Option<LoudnessAnalyzer>,
    accumulator: Accumulator,
    width: SampleWidth,
    phase: ScanPhase,
    consecutive_errors: usize,
}

impl LoudnessScanner<SymphoniaSession> {
    /// Open the best audio stream of a file for scanning
    ///
    /// # Errors
    /// Returns an error if the file cannot be decoded or its stream
    /// parameters are outside the analyzer's range
    pub fn for_file(path: &Path, width: SampleWidth) -> Result<Self> {
        let session = SymphoniaSession::open(path)?;
        debug!("Scanning loudness of '{}' as {}", path.display(), width);
        Self::new(session, width)
    }
}

impl<D: DecodeSession> LoudnessScanner<D> {
    /// # Errors
    /// Returns an error if the session's sample rate or channel count is
    /// not supported by the analyzer
    pub fn new(session: D, width: SampleWidth) -> Result<Self> {
        let analyzer =
            LoudnessAnalyzer::new(session.sample_rate(), session.channel_count() as u32)?;

        Ok(Self {
            session,
            analyzer: Some(analyzer),
            accumulator: Accumulator::new(width),
            width,
            phase: ScanPhase::Reading,
            consecutive_errors: 0,
        })
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn width(&self) -> SampleWidth {
        self.width
    }

    /// Capacity of the conversion buffer in samples
    pub fn buffer_capacity(&self) -> usize {
        self.accumulator.capacity()
    }

    pub fn session(&self) -> &D {
        &self.session
    }

    /// Run the scan to its end.
    ///
    /// Returns `Ok(None)` when the scan aborted after
    /// [`MAX_CONSECUTIVE_ERRORS`] consecutive failures.
    ///
    /// # Errors
    /// [`LoudnessError::ScanFinished`] if called again after a scan ended;
    /// otherwise whatever finalizing the analyzer reports, e.g.
    /// [`LoudnessError::SilentAudio`]
    pub fn scan(&mut self) -> Result<Option<LoudnessInfo>> {
        let Some(mut analyzer) = self.analyzer.take() else {
            return Err(LoudnessError::ScanFinished);
        };

        while !self.phase.is_terminal() {
            self.step(&mut analyzer);
        }

        if self.phase == ScanPhase::Aborted {
            warn!(
                "Loudness scan aborted after {} consecutive errors",
                self.consecutive_errors
            );
            return Ok(None);
        }

        debug!(
            "Loudness scan reached end of stream after {} samples",
            analyzer.samples_processed()
        );
        analyzer.finalize().map(Some)
    }

    /// One read → decode → convert → accumulate cycle
    fn step(&mut self, analyzer: &mut LoudnessAnalyzer) {
        self.phase = ScanPhase::Reading;
        let packet = match self.session.read_packet() {
            Ok(Some(packet)) => packet,
            Ok(None) => {
                trace!("No packet for the analysed stream");
                record_error(&mut self.consecutive_errors, &mut self.phase);
                return;
            }
            Err(e) if e.is_eof() => {
                self.phase = ScanPhase::EndOfStream;
                return;
            }
            Err(e) => {
                debug!("{}", e);
                record_error(&mut self.consecutive_errors, &mut self.phase);
                return;
            }
        };

        self.phase = ScanPhase::Decoding;
        let frames = match self.session.decode(&packet) {
            Ok(frames) => frames,
            Err(e) if e.is_eof() => {
                self.phase = ScanPhase::EndOfStream;
                return;
            }
            Err(e) => {
                debug!("{}", e);
                record_error(&mut self.consecutive_errors, &mut self.phase);
                return;
            }
        };

        for frame in &frames {
            match self.accumulator.accumulate(frame, analyzer, &mut self.phase) {
                Ok(()) => self.consecutive_errors = 0,
                Err(e) => warn!("Skipping frame of {} samples: {}", frame.frame_count(), e),
            }
        }

        self.phase = ScanPhase::Reading;
    }
}

fn record_error(consecutive_errors: &mut usize, phase: &mut ScanPhase) {
    *consecutive_errors += 1;
    if *consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
        *phase = ScanPhase::Aborted;
    }
}

/// Scan a file at `width`
///
/// # Errors
/// See [`LoudnessScanner::for_file`] and [`LoudnessScanner::scan`]
pub fn scan_file(path: &Path, width: SampleWidth) -> Result<Option<LoudnessInfo>> {
    LoudnessScanner::for_file(path, width)?.scan()
}

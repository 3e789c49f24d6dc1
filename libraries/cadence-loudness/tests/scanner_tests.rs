//! Loudness scanner state machine against scripted decode sessions

use cadence_audio::{
    ConvertibleSample, DecodeSession, FromSample, PcmFrame, StreamError, StreamErrorKind,
};
use cadence_loudness::{
    LoudnessError, LoudnessScanner, SampleWidth, ScanPhase, MAX_CONSECUTIVE_ERRORS,
};
use proptest::prelude::*;
use std::collections::VecDeque;

const RATE: u32 = 48000;
const PACKET_FRAMES: usize = 4800;

/// A 1 kHz tone block at -12 dBFS
#[derive(Debug, Clone)]
struct ToneFrame {
    start: usize,
    frames: usize,
    channels: usize,
}

impl PcmFrame for ToneFrame {
    fn frame_count(&self) -> usize {
        self.frames
    }

    fn channel_count(&self) -> usize {
        self.channels
    }

    fn write_interleaved<S: ConvertibleSample>(&self, out: &mut [S]) {
        for i in 0..self.frames {
            let t = (self.start + i) as f32 / RATE as f32;
            let sample = 0.25 * (2.0 * std::f32::consts::PI * 1000.0 * t).sin();
            for ch in 0..self.channels {
                out[i * self.channels + ch] = <S as FromSample<f32>>::from_sample(sample);
            }
        }
    }
}

/// One scripted step of the session
#[derive(Debug, Clone)]
enum Step {
    Tone(Vec<ToneFrame>),
    ReadError,
    NoPacket,
    DecodeError,
    DecodeEof,
}

struct ScriptedSession {
    channels: usize,
    steps: VecDeque<Step>,
    cursor: usize,
}

impl ScriptedSession {
    fn new(channels: usize) -> Self {
        Self {
            channels,
            steps: VecDeque::new(),
            cursor: 0,
        }
    }

    /// Queue `packets` packets of tone, each holding `frame_sizes` frames
    fn tone(mut self, packets: usize, frame_sizes: &[usize], channels: usize) -> Self {
        for _ in 0..packets {
            let mut frames = Vec::new();
            for &size in frame_sizes {
                frames.push(ToneFrame {
                    start: self.cursor,
                    frames: size,
                    channels,
                });
                self.cursor += size;
            }
            self.steps.push_back(Step::Tone(frames));
        }
        self
    }

    fn then(mut self, step: Step) -> Self {
        self.steps.push_back(step);
        self
    }

    fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl DecodeSession for ScriptedSession {
    type Packet = Step;
    type Frame<'a> = ToneFrame;

    fn sample_rate(&self) -> u32 {
        RATE
    }

    fn channel_count(&self) -> usize {
        self.channels
    }

    fn read_packet(&mut self) -> Result<Option<Step>, StreamError> {
        match self.steps.pop_front() {
            None => Err(StreamError::end_of_stream(StreamErrorKind::PacketRead)),
            Some(Step::ReadError) => Err(StreamError::new(StreamErrorKind::PacketRead, "bad sync")),
            Some(Step::NoPacket) => Ok(None),
            Some(step) => Ok(Some(step)),
        }
    }

    fn decode(&mut self, packet: &Step) -> Result<Vec<ToneFrame>, StreamError> {
        match packet {
            Step::Tone(frames) => Ok(frames.clone()),
            Step::DecodeEof => Err(StreamError::end_of_stream(StreamErrorKind::Decode)),
            _ => Err(StreamError::new(StreamErrorKind::Decode, "corrupt packet")),
        }
    }
}

fn scanner(session: ScriptedSession, width: SampleWidth) -> LoudnessScanner<ScriptedSession> {
    LoudnessScanner::new(session, width).unwrap()
}

#[test]
fn fewer_than_three_errors_complete_the_scan() {
    let session = ScriptedSession::new(1)
        .then(Step::ReadError)
        .then(Step::DecodeError)
        .tone(10, &[PACKET_FRAMES], 1)
        .then(Step::NoPacket)
        .then(Step::ReadError)
        .tone(20, &[PACKET_FRAMES], 1);

    let mut scanner = scanner(session, SampleWidth::F32);
    let info = scanner.scan().unwrap().expect("scan should complete");

    assert_eq!(scanner.phase(), ScanPhase::EndOfStream);
    assert!((info.duration_seconds - 3.0).abs() < 1e-9);
    assert!(
        info.integrated_lufs > -20.0 && info.integrated_lufs < -10.0,
        "unexpected loudness {:.1}",
        info.integrated_lufs
    );
}

#[test]
fn three_consecutive_errors_abort() {
    let session = ScriptedSession::new(1)
        .tone(10, &[PACKET_FRAMES], 1)
        .then(Step::ReadError)
        .then(Step::NoPacket)
        .then(Step::DecodeError)
        .tone(20, &[PACKET_FRAMES], 1);

    let mut scanner = scanner(session, SampleWidth::F32);

    assert!(scanner.scan().unwrap().is_none());
    assert_eq!(scanner.phase(), ScanPhase::Aborted);
    // Nothing after the third error was read
    assert_eq!(scanner.session().remaining(), 20);
}

#[test]
fn three_errors_before_any_audio_abort() {
    let session = ScriptedSession::new(2)
        .then(Step::DecodeError)
        .then(Step::ReadError)
        .then(Step::NoPacket)
        .tone(30, &[PACKET_FRAMES], 2);

    let mut scanner = scanner(session, SampleWidth::I16);

    assert!(matches!(scanner.scan(), Ok(None)));
    assert_eq!(scanner.phase(), ScanPhase::Aborted);
    assert_eq!(scanner.session().remaining(), 30);
}

#[test]
fn frames_with_another_channel_count_are_skipped() {
    // A mono frame whose sample count is even would still fit a stereo
    // analyzer, so the channel count itself must be checked
    let mono = ToneFrame {
        start: 0,
        frames: PACKET_FRAMES,
        channels: 1,
    };

    let session = ScriptedSession::new(2)
        .tone(15, &[PACKET_FRAMES], 2)
        .then(Step::Tone(vec![mono.clone(), mono]))
        .tone(15, &[PACKET_FRAMES], 2);

    let mut scanner = scanner(session, SampleWidth::F32);
    let info = scanner.scan().unwrap().unwrap();

    assert_eq!(scanner.phase(), ScanPhase::EndOfStream);
    assert!((info.duration_seconds - 3.0).abs() < 1e-9);
}

#[test]
fn skipped_frames_do_not_reset_the_error_count() {
    // A three-channel frame in a stereo session cannot be accumulated
    let bad = ToneFrame {
        start: 0,
        frames: 101,
        channels: 3,
    };

    let session = ScriptedSession::new(2)
        .tone(10, &[PACKET_FRAMES], 2)
        .then(Step::ReadError)
        .then(Step::ReadError)
        .then(Step::Tone(vec![bad]))
        .then(Step::ReadError)
        .tone(10, &[PACKET_FRAMES], 2);

    let mut scanner = scanner(session, SampleWidth::I16);

    assert!(scanner.scan().unwrap().is_none());
    assert_eq!(scanner.phase(), ScanPhase::Aborted);
    assert_eq!(MAX_CONSECUTIVE_ERRORS, 3);
}

#[test]
fn decode_end_of_stream_finishes_normally() {
    let session = ScriptedSession::new(1)
        .tone(30, &[PACKET_FRAMES], 1)
        .then(Step::DecodeEof)
        .tone(5, &[PACKET_FRAMES], 1);

    let mut scanner = scanner(session, SampleWidth::I32);
    let info = scanner.scan().unwrap().unwrap();

    assert_eq!(scanner.phase(), ScanPhase::EndOfStream);
    assert!((info.duration_seconds - 3.0).abs() < 1e-9);
}

#[test]
fn conversion_buffer_is_reused() {
    let large_then_small = ScriptedSession::new(2)
        .tone(10, &[PACKET_FRAMES], 2)
        .tone(20, &[1000, 480, 2000], 2);
    let large_only = ScriptedSession::new(2).tone(30, &[PACKET_FRAMES], 2);

    let mut mixed = scanner(large_then_small, SampleWidth::F32);
    let mut uniform = scanner(large_only, SampleWidth::F32);
    mixed.scan().unwrap().unwrap();
    uniform.scan().unwrap().unwrap();

    assert!(uniform.buffer_capacity() >= PACKET_FRAMES * 2);
    assert_eq!(mixed.buffer_capacity(), uniform.buffer_capacity());
}

#[test]
fn widths_measure_the_same_loudness() {
    let measure = |width| {
        let session = ScriptedSession::new(2).tone(30, &[PACKET_FRAMES], 2);
        scanner(session, width).scan().unwrap().unwrap().integrated_lufs
    };

    let float = measure(SampleWidth::F32);
    for width in [SampleWidth::I16, SampleWidth::I32] {
        let lufs = measure(width);
        assert!((float - lufs).abs() < 0.1, "{width}: {lufs} vs {float}");
    }
}

#[test]
fn a_finished_scan_cannot_run_again() {
    let mut scanner = scanner(ScriptedSession::new(1).tone(30, &[PACKET_FRAMES], 1), SampleWidth::F32);
    scanner.scan().unwrap();

    assert!(matches!(scanner.scan(), Err(LoudnessError::ScanFinished)));
}

#[test]
fn silent_or_empty_streams_report_finalize_errors() {
    let mut empty = scanner(ScriptedSession::new(1), SampleWidth::F32);
    assert!(matches!(empty.scan(), Err(LoudnessError::NoSamples)));
}

#[test]
fn unsupported_stream_parameters_are_rejected() {
    assert!(matches!(
        LoudnessScanner::new(ScriptedSession::new(0), SampleWidth::F32),
        Err(LoudnessError::InvalidChannelCount(0))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Runs of up to two failures between good packets never abort a scan
    #[test]
    fn short_error_runs_never_abort(runs in prop::collection::vec(0_usize..MAX_CONSECUTIVE_ERRORS, 1..12)) {
        let mut session = ScriptedSession::new(1);
        for run in &runs {
            for i in 0..*run {
                session = session.then(if i % 2 == 0 { Step::ReadError } else { Step::NoPacket });
            }
            session = session.tone(1, &[PACKET_FRAMES], 1);
        }
        session = session.tone(30, &[PACKET_FRAMES], 1);

        let mut scanner = scanner(session, SampleWidth::F32);
        let info = scanner.scan().unwrap();

        prop_assert!(info.is_some());
        prop_assert_eq!(scanner.phase(), ScanPhase::EndOfStream);
    }
}

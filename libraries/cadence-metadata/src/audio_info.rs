//! Stream characteristics derived from a container snapshot

use cadence_core::{AudioInfo, ContainerInfo};

/// Derive [`AudioInfo`] from a container snapshot.
///
/// Replay gain fields are left for the caller to fill.
pub fn derive_audio_info(info: &ContainerInfo) -> AudioInfo {
    let stream = info.audio_stream.as_ref();

    let codec = stream
        .and_then(|s| s.codec_long_name.clone().or_else(|| s.codec_name.clone()))
        .or_else(|| Some(info.format_name.clone()).filter(|n| !n.is_empty()));

    let sample_rate = stream.and_then(|s| s.sample_rate);

    let frames = sample_rate
        .filter(|_| info.duration > 0.0)
        .map(|rate| (f64::from(rate) * info.duration).floor() as i64);

    let channel_layout = info.playback_channel_layout.clone().or_else(|| {
        stream
            .and_then(|s| s.channel_layout)
            .map(|layout| layout.description())
    });

    AudioInfo {
        frames,
        sample_rate,
        sample_format: stream.and_then(|s| s.sample_format).map(|f| f.description()),
        num_channels: stream.and_then(|s| s.channel_count),
        bit_rate: info.bit_rate.map(|bps| (bps as f64 / 1024.0).round() as u32),
        format: info
            .format_long_name
            .clone()
            .or_else(|| Some(info.format_name.clone()).filter(|n| !n.is_empty())),
        codec,
        channel_layout,
        replay_gain_from_metadata: None,
        replay_gain_from_analysis: None,
    }
}

//! Container backend built on Symphonia
//!
//! Symphonia demuxes and decodes; lofty supplements APEv2 tags (which
//! Symphonia never surfaces) and describes containers Symphonia cannot
//! demux at all, such as Monkey's Audio or Musepack.

use crate::error::{AudioError, Result};
use crate::names;
use crate::probe::{best_audio_track, probe_file};
use cadence_core::{
    AttachedPicture, AudioStreamParams, ChannelLayout, ContainerBackend, ContainerInfo,
    DurationEstimation, RawChapter, RawTag, SampleFormat, StandardKey,
};
use lofty::{AudioFile, TagType, TaggedFileExt};
use std::path::Path;
use symphonia::core::codecs::{CodecParameters, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::meta::{MetadataRevision, StandardTagKey, StandardVisualKey, Value};
use symphonia::core::units::TimeBase;
use tracing::{debug, trace};

/// Container backend using Symphonia, with lofty as a tag supplement
pub struct SymphoniaBackend {
    /// Read APEv2 tags with lofty in addition to Symphonia's tags
    read_ape_tags: bool,
    /// Describe files Symphonia cannot demux using lofty's properties
    lofty_fallback: bool,
}

impl SymphoniaBackend {
    pub fn new() -> Self {
        Self {
            read_ape_tags: true,
            lofty_fallback: true,
        }
    }

    /// Disable the lofty supplements (Symphonia only)
    #[must_use]
    pub fn symphonia_only(mut self) -> Self {
        self.read_ape_tags = false;
        self.lofty_fallback = false;
        self
    }

    /// Build a container snapshot from a Symphonia probe
    fn probe_container(&self, path: &Path) -> Result<ContainerInfo> {
        let mut probed = probe_file(path)?;
        let mut info = ContainerInfo::new(path);
        let ext = info.file_type();

        let (short_name, long_name) = names::format_names(&ext).unwrap_or(("unknown", "Unknown"));
        info.format_name = short_name.to_string();
        info.format_long_name = Some(long_name.to_string());

        // Tags found while probing (e.g. ID3v2 ahead of MP3 frames)
        if let Some(metadata_log) = probed.metadata.get() {
            if let Some(revision) = metadata_log.current() {
                collect_revision(revision, &mut info);
            }
        }

        // Tags found inside the container (e.g. Vorbis comments)
        {
            let format_metadata = probed.format.metadata();
            if let Some(revision) = format_metadata.current() {
                collect_revision(revision, &mut info);
            }
        }

        let track = best_audio_track(probed.format.as_ref())
            .ok_or_else(|| AudioError::NoAudioStream(path.to_path_buf()))?;
        let params = track.codec_params.clone();

        let (duration, estimation) = stream_duration(&params);
        info.duration = duration;
        info.duration_estimation = estimation;

        if duration > 0.0 {
            let file_size = std::fs::metadata(path)?.len();
            info.bit_rate = Some((file_size as f64 * 8.0 / duration).round() as u64);
        }

        info.chapters = cue_chapters(probed.format.cues(), params.time_base, params.sample_rate, duration);
        info.audio_stream = Some(stream_params(&params));

        // The decoder's output layout stands in for the playback format
        match symphonia::default::get_codecs().make(&params, &DecoderOptions::default()) {
            Ok(_) => {
                info.playback_channel_layout = params
                    .channels
                    .map(|c| ChannelLayout::from_bits(c.bits()).description());
            }
            Err(e) => debug!("No decoder for '{}': {}", path.display(), e),
        }

        if self.read_ape_tags {
            append_ape_tags(path, &mut info);
        }

        Ok(info)
    }

    /// Build a container snapshot from lofty alone
    fn lofty_container(path: &Path) -> Result<ContainerInfo> {
        let tagged_file = lofty::read_from_path(path)?;
        let properties = tagged_file.properties();

        let mut info = ContainerInfo::new(path);
        let ext = info.file_type();
        let (short_name, long_name) = names::format_names(&ext).unwrap_or(("unknown", "Unknown"));
        info.format_name = short_name.to_string();
        info.format_long_name = Some(long_name.to_string());

        info.duration = properties.duration().as_secs_f64();
        info.duration_estimation = if info.duration > 0.0 {
            DurationEstimation::FromBitrate
        } else {
            DurationEstimation::Unknown
        };
        info.bit_rate = properties.overall_bitrate().map(|kbps| u64::from(kbps) * 1000);

        for tag in tagged_file.tags() {
            let tag_type = tag.tag_type();
            for item in tag.items() {
                let (Some(key), Some(value)) = (item.key().map_key(tag_type, true), item.value().text())
                else {
                    continue;
                };
                if !value.trim().is_empty() {
                    info.tags.push(RawTag::new(key, value));
                }
            }

            for picture in tag.pictures() {
                info.pictures.push(AttachedPicture {
                    data: picture.data().to_vec(),
                    mime_type: None,
                    is_front_cover: picture.pic_type() == lofty::PictureType::CoverFront,
                });
            }
        }

        let channel_count = properties.channels().map(u32::from);
        info.audio_stream = Some(AudioStreamParams {
            codec_name: Some(short_name.to_string()),
            codec_long_name: Some(long_name.to_string()),
            sample_rate: properties.sample_rate(),
            channel_count,
            sample_format: properties
                .bit_depth()
                .and_then(|bits| SampleFormat::from_bits_per_sample(u32::from(bits))),
            channel_layout: channel_count.and_then(ChannelLayout::default_for_channel_count),
            replay_gain: None,
        });

        Ok(info)
    }
}

impl Default for SymphoniaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBackend for SymphoniaBackend {
    fn open(&self, path: &Path) -> cadence_core::Result<ContainerInfo> {
        match self.probe_container(path) {
            Ok(info) => {
                trace!(
                    "Opened '{}': {} tags, {:.3}s",
                    path.display(),
                    info.tags.len(),
                    info.duration
                );
                Ok(info)
            }
            Err(err @ AudioError::FileNotFound(_)) => Err(err.into()),
            Err(err) if self.lofty_fallback => {
                debug!("Symphonia could not open '{}' ({}), trying lofty", path.display(), err);
                Self::lofty_container(path).map_err(|fallback_err| {
                    cadence_core::CadenceError::format_initialization(
                        path,
                        format!("{err}; {fallback_err}"),
                    )
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn brute_force_duration(&self, path: &Path) -> cadence_core::Result<f64> {
        let mut probed = probe_file(path)?;
        let track = best_audio_track(probed.format.as_ref())
            .ok_or_else(|| AudioError::NoAudioStream(path.to_path_buf()))?;

        let track_id = track.id;
        let time_base = track.codec_params.time_base;
        let sample_rate = track.codec_params.sample_rate;

        let mut end_ts: u64 = 0;
        loop {
            match probed.format.next_packet() {
                Ok(packet) => {
                    if packet.track_id() == track_id {
                        end_ts = end_ts.max(packet.ts() + packet.dur());
                    }
                }
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => continue,
                Err(e) => return Err(AudioError::from(e).into()),
            }
        }

        Ok(ts_to_seconds(end_ts, time_base, sample_rate).unwrap_or(0.0))
    }
}

fn ts_to_seconds(ts: u64, time_base: Option<TimeBase>, sample_rate: Option<u32>) -> Option<f64> {
    if let Some(tb) = time_base {
        let time = tb.calc_time(ts);
        Some(time.seconds as f64 + time.frac)
    } else {
        sample_rate
            .filter(|rate| *rate > 0)
            .map(|rate| ts as f64 / f64::from(rate))
    }
}

fn stream_duration(params: &CodecParameters) -> (f64, DurationEstimation) {
    match params
        .n_frames
        .and_then(|n| ts_to_seconds(n, params.time_base, params.sample_rate))
    {
        Some(duration) if duration > 0.0 => (duration, DurationEstimation::FromStream),
        _ => (0.0, DurationEstimation::Unknown),
    }
}

fn stream_params(params: &CodecParameters) -> AudioStreamParams {
    let descriptor = symphonia::default::get_codecs().get_codec(params.codec);

    let channel_layout = params
        .channels
        .map(|c| ChannelLayout::from_bits(c.bits()))
        .or_else(|| {
            params
                .channel_layout
                .map(|layout| ChannelLayout::from_bits(layout.into_channels().bits()))
        });

    AudioStreamParams {
        codec_name: descriptor.map(|d| d.short_name.to_string()),
        codec_long_name: descriptor.map(|d| d.long_name.to_string()),
        sample_rate: params.sample_rate,
        channel_count: channel_layout.map(|l| l.channel_count()),
        sample_format: params
            .sample_format
            .map(convert_sample_format)
            .or_else(|| params.bits_per_sample.and_then(SampleFormat::from_bits_per_sample)),
        channel_layout,
        replay_gain: None,
    }
}

fn convert_sample_format(format: symphonia::core::sample::SampleFormat) -> SampleFormat {
    use symphonia::core::sample::SampleFormat as Sf;
    match format {
        Sf::U8 => SampleFormat::U8,
        Sf::U16 => SampleFormat::U16,
        Sf::U24 => SampleFormat::U24,
        Sf::U32 => SampleFormat::U32,
        Sf::S8 => SampleFormat::S8,
        Sf::S16 => SampleFormat::S16,
        Sf::S24 => SampleFormat::S24,
        Sf::S32 => SampleFormat::S32,
        Sf::F32 => SampleFormat::F32,
        Sf::F64 => SampleFormat::F64,
    }
}

/// Cue points become chapters ending where the next one starts
fn cue_chapters(
    cues: &[symphonia::core::formats::Cue],
    time_base: Option<TimeBase>,
    sample_rate: Option<u32>,
    duration: f64,
) -> Vec<RawChapter> {
    let starts: Vec<f64> = cues
        .iter()
        .map(|cue| ts_to_seconds(cue.start_ts, time_base, sample_rate).unwrap_or(0.0))
        .collect();

    cues.iter()
        .enumerate()
        .map(|(i, cue)| {
            let title = cue
                .tags
                .iter()
                .find(|t| {
                    t.std_key == Some(StandardTagKey::TrackTitle)
                        || t.key.eq_ignore_ascii_case("title")
                })
                .map(|t| tag_value_text(&t.value))
                .filter(|s| !s.is_empty());

            RawChapter {
                title,
                start_time: starts[i],
                end_time: starts.get(i + 1).copied().unwrap_or(duration),
            }
        })
        .collect()
}

fn collect_revision(revision: &MetadataRevision, info: &mut ContainerInfo) {
    for tag in revision.tags() {
        let value = tag_value_text(&tag.value);
        if value.is_empty() {
            continue;
        }

        let mut raw = RawTag::new(tag.key.clone(), value);
        raw.std_key = tag.std_key.and_then(standard_key);
        info.tags.push(raw);
    }

    for visual in revision.visuals() {
        info.pictures.push(AttachedPicture {
            data: visual.data.to_vec(),
            mime_type: Some(visual.media_type.clone()).filter(|m| !m.is_empty()),
            is_front_cover: visual.usage == Some(StandardVisualKey::FrontCover),
        });
    }
}

/// APEv2 items that Symphonia did not already report
fn append_ape_tags(path: &Path, info: &mut ContainerInfo) {
    let tagged_file = match lofty::read_from_path(path) {
        Ok(file) => file,
        Err(e) => {
            trace!("lofty could not read '{}': {}", path.display(), e);
            return;
        }
    };

    let Some(tag) = tagged_file.tag(TagType::Ape) else {
        return;
    };

    let mut added = 0usize;
    for item in tag.items() {
        let (Some(key), Some(value)) = (item.key().map_key(TagType::Ape, true), item.value().text())
        else {
            continue;
        };

        if value.trim().is_empty() || info.tags.iter().any(|t| t.key.eq_ignore_ascii_case(key)) {
            continue;
        }
        info.tags.push(RawTag::new(key, value));
        added += 1;
    }

    trace!("Added {} APE items from '{}'", added, path.display());
}

/// Extract string value from a Symphonia tag value
fn tag_value_text(value: &Value) -> String {
    match value {
        Value::Binary(_) | Value::Flag => String::new(),
        Value::Boolean(b) => b.to_string(),
        Value::Float(f) => f.to_string(),
        Value::SignedInt(i) => i.to_string(),
        Value::UnsignedInt(u) => u.to_string(),
        Value::String(s) => s.trim().to_string(),
    }
}

fn standard_key(key: StandardTagKey) -> Option<StandardKey> {
    let mapped = match key {
        StandardTagKey::TrackTitle => StandardKey::TrackTitle,
        StandardTagKey::Artist => StandardKey::Artist,
        StandardTagKey::Album => StandardKey::Album,
        StandardTagKey::AlbumArtist => StandardKey::AlbumArtist,
        StandardTagKey::Genre => StandardKey::Genre,
        StandardTagKey::Date => StandardKey::Date,
        StandardTagKey::OriginalDate => StandardKey::OriginalDate,
        StandardTagKey::ReleaseDate => StandardKey::ReleaseDate,
        StandardTagKey::TrackNumber => StandardKey::TrackNumber,
        StandardTagKey::TrackTotal => StandardKey::TrackTotal,
        StandardTagKey::DiscNumber => StandardKey::DiscNumber,
        StandardTagKey::DiscTotal => StandardKey::DiscTotal,
        StandardTagKey::Lyrics => StandardKey::Lyrics,
        StandardTagKey::Composer => StandardKey::Composer,
        StandardTagKey::Conductor => StandardKey::Conductor,
        StandardTagKey::Performer => StandardKey::Performer,
        StandardTagKey::Lyricist | StandardTagKey::Writer => StandardKey::Lyricist,
        StandardTagKey::Bpm => StandardKey::Bpm,
        StandardTagKey::Comment => StandardKey::Comment,
        StandardTagKey::Copyright => StandardKey::Copyright,
        StandardTagKey::Description => StandardKey::Description,
        StandardTagKey::EncodedBy => StandardKey::EncodedBy,
        StandardTagKey::Encoder => StandardKey::Encoder,
        StandardTagKey::Label => StandardKey::Label,
        StandardTagKey::Language => StandardKey::Language,
        StandardTagKey::IdentIsrc => StandardKey::Isrc,
        StandardTagKey::Compilation => StandardKey::Compilation,
        StandardTagKey::ContentGroup => StandardKey::Grouping,
        StandardTagKey::Mood => StandardKey::Mood,
        StandardTagKey::Arranger => StandardKey::Arranger,
        StandardTagKey::Producer => StandardKey::Producer,
        StandardTagKey::Engineer => StandardKey::Engineer,
        StandardTagKey::Remixer => StandardKey::Remixer,
        StandardTagKey::ReplayGainTrackGain => StandardKey::ReplayGainTrackGain,
        StandardTagKey::ReplayGainTrackPeak => StandardKey::ReplayGainTrackPeak,
        StandardTagKey::ReplayGainAlbumGain => StandardKey::ReplayGainAlbumGain,
        StandardTagKey::ReplayGainAlbumPeak => StandardKey::ReplayGainAlbumPeak,
        StandardTagKey::MusicBrainzRecordingId => StandardKey::MusicBrainzRecordingId,
        StandardTagKey::MusicBrainzAlbumId => StandardKey::MusicBrainzAlbumId,
        StandardTagKey::MusicBrainzArtistId => StandardKey::MusicBrainzArtistId,
        _ => return None,
    };

    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_convert_with_time_base() {
        let tb = TimeBase::new(1, 44100);
        let secs = ts_to_seconds(441_000, Some(tb), None).unwrap();
        assert!((secs - 10.0).abs() < 1e-9);
    }

    #[test]
    fn timestamps_fall_back_to_sample_rate() {
        let secs = ts_to_seconds(96_000, None, Some(48_000)).unwrap();
        assert!((secs - 2.0).abs() < 1e-9);
        assert_eq!(ts_to_seconds(96_000, None, None), None);
        assert_eq!(ts_to_seconds(96_000, None, Some(0)), None);
    }

    #[test]
    fn tag_values_render_as_text() {
        assert_eq!(tag_value_text(&Value::String("  Title ".to_string())), "Title");
        assert_eq!(tag_value_text(&Value::UnsignedInt(7)), "7");
        assert_eq!(tag_value_text(&Value::Flag), "");
    }

    #[test]
    fn standard_keys_map_to_core_keys() {
        assert_eq!(standard_key(StandardTagKey::TrackTitle), Some(StandardKey::TrackTitle));
        assert_eq!(standard_key(StandardTagKey::Writer), Some(StandardKey::Lyricist));
        assert_eq!(standard_key(StandardTagKey::SortArtist), None);
    }

    #[test]
    fn open_missing_file_is_format_initialization_error() {
        let backend = SymphoniaBackend::new();
        let err = backend.open(Path::new("/nonexistent/file.flac")).unwrap_err();
        assert!(matches!(
            err,
            cadence_core::CadenceError::FormatInitialization { .. }
        ));
    }
}

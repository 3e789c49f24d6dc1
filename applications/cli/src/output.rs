/// Text and JSON rendering of results
use crate::config::OutputSettings;
use cadence_core::{PrimaryMetadata, ReplayGain};
use cadence_loudness::LoudnessInfo;
use cadence_metadata::ScanStats;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Serialize `value` as JSON, pretty or compact per settings
pub fn to_json<T: Serialize>(value: &T, settings: &OutputSettings) -> serde_json::Result<String> {
    if settings.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[derive(Serialize)]
pub struct InspectReport<'a> {
    pub path: &'a Path,
    #[serde(flatten)]
    pub metadata: &'a PrimaryMetadata,
}

#[derive(Serialize)]
pub struct LoudnessReport<'a> {
    pub path: &'a Path,
    /// `None` when the scan gave up on a damaged stream
    pub loudness: Option<&'a LoudnessInfo>,
    pub replay_gain: Option<ReplayGain>,
}

fn line(out: &mut String, label: &str, value: Option<impl std::fmt::Display>) {
    if let Some(value) = value {
        let _ = writeln!(out, "  {label:<14} {value}");
    }
}

fn number_of(number: Option<u32>, total: Option<u32>) -> Option<String> {
    match (number, total) {
        (Some(n), Some(t)) => Some(format!("{n}/{t}")),
        (Some(n), None) => Some(n.to_string()),
        _ => None,
    }
}

/// Human-readable summary of a record
pub fn render_metadata(path: &Path, metadata: &PrimaryMetadata) -> String {
    let mut out = format!("{}\n", path.display());

    line(&mut out, "Title", metadata.title.as_deref());
    line(&mut out, "Artist", metadata.artist.as_deref());
    line(&mut out, "Album", metadata.album.as_deref());
    line(&mut out, "Album artist", metadata.album_artist.as_deref());
    line(&mut out, "Genre", metadata.genre.as_deref());
    line(&mut out, "Year", metadata.year);
    line(&mut out, "Track", number_of(metadata.track_number, metadata.total_tracks));
    line(&mut out, "Disc", number_of(metadata.disc_number, metadata.total_discs));
    line(&mut out, "Composer", metadata.composer.as_deref());
    line(&mut out, "BPM", metadata.bpm);

    let accuracy = if metadata.duration_is_accurate { "" } else { " (estimated)" };
    let _ = writeln!(out, "  {:<14} {:.2}s{}", "Duration", metadata.duration, accuracy);

    let audio = &metadata.audio_info;
    line(&mut out, "Codec", audio.codec.as_deref());
    line(&mut out, "Sample rate", audio.sample_rate.map(|r| format!("{r} Hz")));
    line(&mut out, "Sample format", audio.sample_format.as_deref());
    line(&mut out, "Channels", audio.channel_layout.as_deref());
    line(&mut out, "Bit rate", audio.bit_rate.map(|b| format!("{b} kbps")));

    if let Some(rg) = &metadata.replay_gain {
        line(&mut out, "Track gain", rg.track_gain.map(|g| format!("{g:+.2} dB")));
        line(&mut out, "Album gain", rg.album_gain.map(|g| format!("{g:+.2} dB")));
    }
    if let Some(rg) = &audio.replay_gain_from_analysis {
        line(&mut out, "Analysed gain", rg.track_gain.map(|g| format!("{g:+.2} dB")));
    }

    for (i, chapter) in metadata.chapters.iter().enumerate() {
        let _ = writeln!(
            out,
            "  Chapter {:<6} {:.2}s-{:.2}s {}",
            i + 1,
            chapter.start_time,
            chapter.end_time,
            chapter.title.as_deref().unwrap_or("")
        );
    }

    for entry in metadata.auxiliary_metadata.values() {
        let _ = writeln!(out, "  {:<14} {} [{}]", entry.key, entry.value, entry.format);
    }

    if let Some(art) = &metadata.art {
        let mime = art.detect_mime_type().unwrap_or("unknown type");
        let _ = writeln!(out, "  {:<14} {} bytes, {}", "Cover art", art.data.len(), mime);
    }

    out
}

/// Human-readable loudness result
pub fn render_loudness(path: &Path, info: Option<&LoudnessInfo>) -> String {
    match info {
        Some(info) => {
            let rg = ReplayGain::from(info);
            format!(
                "{}\n  {}\n  Track gain: {:+.2} dB, peak {:.6}\n",
                path.display(),
                info,
                rg.track_gain.unwrap_or_default(),
                rg.track_peak.unwrap_or_default()
            )
        }
        None => format!("{}\n  Loudness scan aborted: too many decode errors\n", path.display()),
    }
}

/// Human-readable scan totals
pub fn render_stats(stats: &ScanStats) -> String {
    let mut out = format!(
        "Scanned {} of {} files ({} DRM-protected, {} errors)\n",
        stats.files_scanned,
        stats.files_discovered,
        stats.drm_protected,
        stats.errors.len()
    );
    for (path, error) in &stats.errors {
        let _ = writeln!(out, "  {}: {}", path.display(), error);
    }
    out
}

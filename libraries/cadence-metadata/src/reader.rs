/// Primary metadata assembly over a container backend
use crate::audio_info::derive_audio_info;
use crate::error::{MetadataError, Result};
use crate::mapped::MappedMetadata;
use crate::ordering::ParserSet;
use crate::parsers::MetadataParser;
use cadence_audio::SymphoniaBackend;
use cadence_core::{
    AudioInfo, Chapter, ContainerBackend, CoverArt, MetadataReader, PrimaryMetadata,
};
use std::path::Path;
use tracing::{debug, trace};

/// First value any relevant parser yields
fn first<T>(
    parsers: &[&dyn MetadataParser],
    mut get: impl FnMut(&dyn MetadataParser) -> Option<T>,
) -> Option<T> {
    parsers.iter().find_map(|p| get(*p))
}

/// Resolve a number and its total. The pair comes whole from the first
/// parser holding a number; a standalone total only fills in when that
/// parser gave no combined "N/M" total.
fn reconcile_total(
    pair: (Option<u32>, Option<u32>),
    standalone_total: impl FnOnce() -> Option<u32>,
) -> (Option<u32>, Option<u32>) {
    match pair {
        (Some(number), None) => (Some(number), standalone_total()),
        other => other,
    }
}

/// Reads primary metadata through a [`ContainerBackend`]
pub struct FileReader<B = SymphoniaBackend> {
    backend: B,
}

impl FileReader<SymphoniaBackend> {
    /// Create a reader using the Symphonia backend
    pub fn new() -> Self {
        Self {
            backend: SymphoniaBackend::new(),
        }
    }
}

impl Default for FileReader<SymphoniaBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ContainerBackend> FileReader<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Assemble the primary metadata record of a file.
    ///
    /// # Errors
    /// [`MetadataError::FormatInitialization`] if the container cannot be
    /// opened, [`MetadataError::DrmProtected`] if any relevant parser flags
    /// the file as protected, whatever the other parsers report.
    pub fn get_primary_metadata(&self, path: &Path) -> Result<PrimaryMetadata> {
        let info = self
            .backend
            .open(path)
            .map_err(|e| MetadataError::from_backend(path, e))?;

        let mut map = MappedMetadata::new(&info);
        let parsers = ParserSet::parsers_for_extension(&map.file_type);

        for parser in parsers {
            parser.map_metadata(&mut map);
        }

        let relevant: Vec<&dyn MetadataParser> = parsers
            .iter()
            .copied()
            .filter(|p| p.has_essential_metadata(&map))
            .collect();

        debug!(
            "'{}': {} of {} parsers hold essential metadata",
            path.display(),
            relevant.len(),
            parsers.len()
        );

        if relevant
            .iter()
            .any(|p| p.is_drm_protected(&map) == Some(true))
        {
            debug!("'{}' is DRM-protected", path.display());
            return Err(MetadataError::DrmProtected {
                path: path.to_path_buf(),
            });
        }

        let mut metadata = PrimaryMetadata {
            title: first(&relevant, |p| p.title(&map)),
            artist: first(&relevant, |p| p.artist(&map)),
            album: first(&relevant, |p| p.album(&map)),
            album_artist: first(&relevant, |p| p.album_artist(&map)),
            genre: first(&relevant, |p| p.genre(&map)),
            year: first(&relevant, |p| p.year(&map)),
            composer: first(&relevant, |p| p.composer(&map)),
            conductor: first(&relevant, |p| p.conductor(&map)),
            performer: first(&relevant, |p| p.performer(&map)),
            lyricist: first(&relevant, |p| p.lyricist(&map)),
            bpm: first(&relevant, |p| p.bpm(&map)),
            lyrics: first(&relevant, |p| p.lyrics(&map)),
            is_protected: first(&relevant, |p| p.is_drm_protected(&map)),
            ..PrimaryMetadata::default()
        };

        (metadata.track_number, metadata.total_tracks) = reconcile_total(
            first(&relevant, |p| {
                let pair = p.track_number(&map);
                pair.0.is_some().then_some(pair)
            })
            .unwrap_or_default(),
            || first(&relevant, |p| p.total_tracks(&map)),
        );

        (metadata.disc_number, metadata.total_discs) = reconcile_total(
            first(&relevant, |p| {
                let pair = p.disc_number(&map);
                pair.0.is_some().then_some(pair)
            })
            .unwrap_or_default(),
            || first(&relevant, |p| p.total_discs(&map)),
        );

        metadata.duration = map.duration;
        metadata.duration_is_accurate = map.duration > 0.0 && info.estimated_duration_is_accurate();

        metadata.chapters = map
            .chapters
            .iter()
            .map(|c| Chapter::new(c.title.clone(), c.start_time, c.end_time))
            .collect();

        metadata.replay_gain = map
            .audio_stream
            .as_ref()
            .and_then(|s| s.replay_gain)
            .or_else(|| first(&relevant, |p| p.replay_gain(&map)));

        // Later parsers overwrite earlier ones key by key
        for parser in &relevant {
            for entry in parser.auxiliary_metadata(&map) {
                metadata.auxiliary_metadata.insert(entry.key.clone(), entry);
            }
        }

        metadata.art = map
            .picture
            .as_ref()
            .map(|p| CoverArt::new(p.data.clone(), p.mime_type.clone()));

        metadata.audio_info = derive_audio_info(&info);
        metadata.audio_info.replay_gain_from_metadata = metadata.replay_gain;

        trace!(
            "'{}': {} auxiliary entries, {} chapters",
            path.display(),
            metadata.auxiliary_metadata.len(),
            metadata.chapters.len()
        );

        Ok(metadata)
    }

    /// Embedded cover art, or `None` if the file cannot be opened
    pub fn get_art(&self, path: &Path) -> Option<CoverArt> {
        match self.backend.open(path) {
            Ok(info) => info
                .best_picture()
                .map(|p| CoverArt::new(p.data.clone(), p.mime_type.clone())),
            Err(e) => {
                debug!("No art for '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// Duration found by walking every packet, or `None` on failure
    pub fn compute_accurate_duration(&self, path: &Path) -> Option<f64> {
        match self.backend.brute_force_duration(path) {
            Ok(duration) if duration > 0.0 => Some(duration),
            Ok(_) => None,
            Err(e) => {
                debug!("Brute-force duration failed for '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// Stream characteristics alone, without tag parsing
    ///
    /// # Errors
    /// [`MetadataError::FormatInitialization`] if the container cannot be opened
    pub fn get_audio_info(&self, path: &Path) -> Result<AudioInfo> {
        let info = self
            .backend
            .open(path)
            .map_err(|e| MetadataError::from_backend(path, e))?;

        let mut audio = derive_audio_info(&info);
        audio.replay_gain_from_metadata = info.audio_stream.as_ref().and_then(|s| s.replay_gain);
        Ok(audio)
    }
}

impl<B: ContainerBackend> MetadataReader for FileReader<B> {
    fn read(&self, path: &Path) -> cadence_core::Result<PrimaryMetadata> {
        Ok(self.get_primary_metadata(path)?)
    }

    fn read_art(&self, path: &Path) -> Option<CoverArt> {
        self.get_art(path)
    }

    fn compute_accurate_duration(&self, path: &Path) -> Option<f64> {
        FileReader::<B>::compute_accurate_duration(self, path)
    }
}

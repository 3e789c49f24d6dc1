/// Library scanner implementation
use crate::error::{MetadataError, Result};
use crate::reader::FileReader;
use cadence_core::{MetadataReader, PrimaryMetadata, ReplayGain};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Per-file analysis run after metadata extraction, e.g. a loudness scan
pub type AnalysisHook = Arc<dyn Fn(&Path) -> Option<ReplayGain> + Send + Sync>;

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of files processed concurrently (default: num_cpus)
    pub workers: usize,

    /// Follow symbolic links while walking (default: false)
    pub follow_links: bool,

    /// Supported audio file extensions
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            follow_links: false,
            extensions: default_extensions(),
        }
    }
}

/// Extensions scanned when none are configured
pub fn default_extensions() -> Vec<String> {
    [
        "aac", "aif", "aiff", "ape", "dff", "dsf", "flac", "m4a", "mp3", "mpc", "oga", "ogg",
        "opus", "wav", "wma", "wv",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Scan progress updates
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// Scanning started
    Started { total_files: usize },

    /// File scanned
    FileScanned {
        path: PathBuf,
        metadata: Option<Box<PrimaryMetadata>>,
        error: Option<String>,
    },

    /// Scanning completed
    Completed { stats: ScanStats },
}

/// Scan statistics
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Number of files discovered
    pub files_discovered: usize,

    /// Number of files that produced a record
    pub files_scanned: usize,

    /// Number of files skipped as DRM-protected
    pub drm_protected: usize,

    /// Errors encountered
    pub errors: Vec<(PathBuf, String)>,
}

/// Library scanner
pub struct LibraryScanner<R: MetadataReader + 'static = FileReader> {
    reader: Arc<R>,
    config: ScanConfig,
    analysis: Option<AnalysisHook>,
}

impl LibraryScanner<FileReader> {
    /// Create a new library scanner
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    /// Create a scanner with custom configuration
    pub fn with_config(config: ScanConfig) -> Self {
        Self::with_reader(FileReader::new(), config)
    }
}

impl Default for LibraryScanner<FileReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MetadataReader + 'static> LibraryScanner<R> {
    pub fn with_reader(reader: R, config: ScanConfig) -> Self {
        Self {
            reader: Arc::new(reader),
            config,
            analysis: None,
        }
    }

    /// Run `hook` on every file that yields a record; its result becomes
    /// the record's replay gain from analysis
    #[must_use]
    pub fn with_analysis(mut self, hook: AnalysisHook) -> Self {
        self.analysis = Some(hook);
        self
    }

    /// Scan a directory for audio files
    ///
    /// # Arguments
    /// * `path` - Directory (or single file) to scan
    /// * `progress_tx` - Optional channel for progress updates
    ///
    /// # Errors
    /// Returns an error if `path` does not exist
    pub async fn scan(
        &self,
        path: &Path,
        progress_tx: Option<mpsc::Sender<ScanProgress>>,
    ) -> Result<ScanStats> {
        let mut stats = ScanStats::default();

        let files = self.discover_files(path)?;
        stats.files_discovered = files.len();
        info!("Scanning {} files under '{}'", files.len(), path.display());

        if let Some(ref tx) = progress_tx {
            let _ = tx
                .send(ScanProgress::Started {
                    total_files: files.len(),
                })
                .await;
        }

        let semaphore = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut tasks = JoinSet::new();

        for file_path in files {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };

            let reader = Arc::clone(&self.reader);
            let analysis = self.analysis.clone();
            let tx = progress_tx.clone();

            tasks.spawn_blocking(move || {
                let _permit = permit;
                let result = scan_file(reader.as_ref(), analysis.as_deref(), &file_path);

                if let Some(tx) = tx {
                    let event = match &result {
                        Ok(metadata) => ScanProgress::FileScanned {
                            path: file_path.clone(),
                            metadata: Some(Box::new(metadata.clone())),
                            error: None,
                        },
                        Err(e) => ScanProgress::FileScanned {
                            path: file_path.clone(),
                            metadata: None,
                            error: Some(e.to_string()),
                        },
                    };
                    let _ = tx.blocking_send(event);
                }

                (file_path, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(_))) => stats.files_scanned += 1,
                Ok((file_path, Err(e))) if e.is_drm_protected() => {
                    debug!("Skipping DRM-protected '{}'", file_path.display());
                    stats.drm_protected += 1;
                }
                Ok((file_path, Err(e))) => {
                    stats.errors.push((file_path, e.to_string()));
                }
                Err(e) => warn!("Scan worker failed: {}", e),
            }
        }

        if let Some(ref tx) = progress_tx {
            let _ = tx
                .send(ScanProgress::Completed {
                    stats: stats.clone(),
                })
                .await;
        }

        Ok(stats)
    }

    /// Discover audio files in a directory recursively
    fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.to_path_buf()));
        }

        let mut files = Vec::new();

        if path.is_file() {
            if self.is_supported_file(path) {
                files.push(path.to_path_buf());
            }
            return Ok(files);
        }

        for entry in walkdir::WalkDir::new(path)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            let path = entry.path();
            if path.is_file() && self.is_supported_file(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Check if file is a supported audio format
    fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| {
                let e = e.to_lowercase();
                self.config.extensions.iter().any(|ext| ext.eq_ignore_ascii_case(&e))
            })
    }
}

/// Read one file's record and run the analysis hook on it
fn scan_file<R: MetadataReader + ?Sized>(
    reader: &R,
    analysis: Option<&(dyn Fn(&Path) -> Option<ReplayGain> + Send + Sync)>,
    path: &Path,
) -> cadence_core::Result<PrimaryMetadata> {
    let mut metadata = reader.read(path)?;

    if let Some(analyze) = analysis {
        metadata.audio_info.replay_gain_from_analysis = analyze(path);
    }

    Ok(metadata)
}

/// Cadence - track metadata and loudness inspection
mod config;
mod output;

use anyhow::Context;
use cadence_core::ReplayGain;
use cadence_loudness::{scan_file, SampleWidth};
use cadence_metadata::{FileReader, LibraryScanner, MetadataError, ScanProgress};
use clap::{Parser, Subcommand};
use crate::config::Settings;
use crate::output::{InspectReport, LoudnessReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Read track metadata and measure loudness", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./cadence.toml if present)
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the metadata record of one or more files
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Walk every packet when the container duration is only estimated
        #[arg(long)]
        accurate_duration: bool,
    },
    /// Measure the loudness of a file
    Loudness {
        file: PathBuf,

        /// Sample width fed to the analyzer (i16, i32 or f32)
        #[arg(short, long, value_parser = parse_width)]
        width: Option<SampleWidth>,
    },
    /// Scan a directory for audio files
    Scan {
        path: PathBuf,

        /// Also measure the loudness of every file
        #[arg(long)]
        loudness: bool,
    },
}

fn parse_width(value: &str) -> Result<SampleWidth, String> {
    value.parse()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.json {
        settings.output.json = true;
    }

    match cli.command {
        Commands::Inspect {
            files,
            accurate_duration,
        } => inspect(&settings, &files, accurate_duration).await?,
        Commands::Loudness { file, width } => {
            let width = width.unwrap_or(settings.loudness.sample_width);
            loudness(&settings, file, width).await?;
        }
        Commands::Scan { path, loudness } => {
            scan(&settings, &path, loudness || settings.loudness.enabled).await?;
        }
    }

    Ok(())
}

async fn inspect(settings: &Settings, files: &[PathBuf], accurate_duration: bool) -> anyhow::Result<()> {
    let mut failures = 0;

    for path in files {
        let owned = path.clone();
        let result = tokio::task::spawn_blocking(move || {
            let reader = FileReader::new();
            let mut metadata = reader.get_primary_metadata(&owned)?;

            if accurate_duration && !metadata.duration_is_accurate {
                if let Some(duration) = reader.compute_accurate_duration(&owned) {
                    metadata.duration = duration;
                    metadata.duration_is_accurate = true;
                }
            }

            Ok::<_, MetadataError>(metadata)
        })
        .await
        .context("Metadata worker failed")?;

        match result {
            Ok(metadata) if settings.output.json => {
                let report = InspectReport {
                    path,
                    metadata: &metadata,
                };
                println!("{}", output::to_json(&report, &settings.output)?);
            }
            Ok(metadata) => print!("{}", output::render_metadata(path, &metadata)),
            Err(e) => {
                tracing::error!("{}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} files could not be read", files.len());
    }

    Ok(())
}

async fn loudness(settings: &Settings, file: PathBuf, width: SampleWidth) -> anyhow::Result<()> {
    tracing::info!("Measuring loudness of '{}' as {}", file.display(), width);

    let path = file.clone();
    let info = tokio::task::spawn_blocking(move || scan_file(&path, width))
        .await
        .context("Loudness worker failed")?
        .with_context(|| format!("Loudness scan of '{}' failed", file.display()))?;

    if settings.output.json {
        let report = LoudnessReport {
            path: &file,
            loudness: info.as_ref(),
            replay_gain: info.as_ref().map(ReplayGain::from),
        };
        println!("{}", output::to_json(&report, &settings.output)?);
    } else {
        print!("{}", output::render_loudness(&file, info.as_ref()));
    }

    Ok(())
}

async fn scan(settings: &Settings, path: &Path, with_loudness: bool) -> anyhow::Result<()> {
    let mut scanner = LibraryScanner::with_config(settings.scan_config());

    if with_loudness {
        let width = settings.loudness.sample_width;
        scanner = scanner.with_analysis(Arc::new(move |file: &Path| {
            match scan_file(file, width) {
                Ok(info) => info.as_ref().map(ReplayGain::from),
                Err(e) => {
                    tracing::warn!("Loudness scan of '{}' failed: {}", file.display(), e);
                    None
                }
            }
        }));
    }

    let (tx, mut rx) = mpsc::channel(100);
    let output_settings = settings.output.clone();

    let printer = tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            match progress {
                ScanProgress::Started { total_files } => {
                    tracing::info!("Found {} audio files", total_files);
                }
                ScanProgress::FileScanned {
                    path,
                    metadata: Some(metadata),
                    ..
                } => {
                    if output_settings.json {
                        let report = InspectReport {
                            path: &path,
                            metadata: &metadata,
                        };
                        // One record per line
                        match serde_json::to_string(&report) {
                            Ok(json) => println!("{json}"),
                            Err(e) => tracing::error!("{}", e),
                        }
                    } else {
                        print!("{}", output::render_metadata(&path, &metadata));
                    }
                }
                ScanProgress::FileScanned { path, error, .. } => {
                    tracing::debug!(
                        "Skipped '{}': {}",
                        path.display(),
                        error.unwrap_or_default()
                    );
                }
                ScanProgress::Completed { .. } => {}
            }
        }
    });

    let stats = scanner.scan(path, Some(tx)).await?;
    printer.await.context("Progress printer failed")?;

    if settings.output.json {
        tracing::info!(
            "Scanned {} of {} files ({} DRM-protected, {} errors)",
            stats.files_scanned,
            stats.files_discovered,
            stats.drm_protected,
            stats.errors.len()
        );
    } else {
        print!("{}", output::render_stats(&stats));
    }

    Ok(())
}

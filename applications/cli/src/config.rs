/// CLI configuration
use anyhow::Context;
use cadence_loudness::SampleWidth;
use cadence_metadata::{default_extensions, ScanConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

/// Prefix of environment overrides, e.g. `CADENCE_SCAN__WORKERS=4`
pub const ENV_PREFIX: &str = "CADENCE";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_scan")]
    pub scan: ScanSettings,

    #[serde(default = "default_loudness")]
    pub loudness: LoudnessSettings,

    #[serde(default = "default_output")]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScanSettings {
    /// Files processed concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub follow_links: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoudnessSettings {
    /// Run a loudness scan on every file during `scan`
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub sample_width: SampleWidth,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputSettings {
    /// Print JSON instead of text
    #[serde(default)]
    pub json: bool,

    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Settings {
    /// Load defaults, then the config file, then `CADENCE_*` variables.
    ///
    /// An explicit `path` must exist; the default `cadence.toml` is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Settings::load`], reading overrides from `env` instead of the
    /// process environment when given
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path.to_path_buf())),
            None => builder
                .add_source(config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("scan.extensions")
                .source(env),
        );

        let settings = builder.build().context("Failed to read configuration")?;
        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Library scanner configuration
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            workers: self.scan.workers.max(1),
            follow_links: self.scan.follow_links,
            extensions: self
                .scan
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }
}

// Default values
fn default_scan() -> ScanSettings {
    ScanSettings {
        workers: default_workers(),
        extensions: default_extensions(),
        follow_links: false,
    }
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_loudness() -> LoudnessSettings {
    LoudnessSettings {
        enabled: false,
        sample_width: SampleWidth::default(),
    }
}

fn default_output() -> OutputSettings {
    OutputSettings {
        json: false,
        pretty: default_pretty(),
    }
}

fn default_pretty() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scan: default_scan(),
            loudness: default_loudness(),
            output: default_output(),
        }
    }
}

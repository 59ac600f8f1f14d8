use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use paywatch_core::DEFAULT_SIGNAL_COUNT;
use paywatch_engine::EngineSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "paywatch.ron";

#[derive(Debug, Default, Parser)]
#[command(
    name = "paywatch",
    version,
    about = "Watch a live payment signal stream and render its analysis"
)]
pub struct Cli {
    /// RON config file (defaults to ./paywatch.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Server base URL, e.g. http://localhost:8000.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Number of signals to request per session.
    #[arg(long)]
    pub count: Option<u32>,
    /// Write an HTML report after each completed analysis.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Start immediately and exit when the session ends.
    #[arg(long)]
    pub once: bool,
    /// Log at debug level.
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub signal_count: u32,
    pub connect_timeout_ms: u64,
    pub analysis_timeout_ms: u64,
    pub log_destination: LogDestination,
    pub report_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            base_url: engine.base_url,
            signal_count: DEFAULT_SIGNAL_COUNT,
            connect_timeout_ms: engine.connect_timeout.as_millis() as u64,
            analysis_timeout_ms: engine.analysis_timeout.as_millis() as u64,
            log_destination: LogDestination::default(),
            report_path: None,
        }
    }
}

impl ClientConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            analysis_timeout: Duration::from_millis(self.analysis_timeout_ms),
        }
    }

    fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(count) = cli.count {
            self.signal_count = count;
        }
        if let Some(report) = &cli.report {
            self.report_path = Some(report.clone());
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("signal count must be at least 1")]
    ZeroSignals,
}

/// Resolves the effective configuration: defaults, then file, then CLI flags.
pub fn load(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                read_config(fallback)?
            } else {
                ClientConfig::default()
            }
        }
    };
    config.apply_overrides(cli);
    if config.signal_count == 0 {
        return Err(ConfigError::ZeroSignals);
    }
    Ok(config)
}

fn read_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

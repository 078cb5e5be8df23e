//! Replay configuration.

use device_replay_delivery::{HttpSinkConfig, DEFAULT_SERVER_URL};
use device_replay_events::ReplaySpeed;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings read from a TOML configuration file.
///
/// Every field is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Endpoint events are POSTed to.
    pub server_url: Option<String>,
    /// Speed factor.
    pub speed: Option<f64>,
    /// Skip all pacing.
    pub fast_mode: Option<bool>,
    /// Log filter.
    pub log_level: Option<String>,
    /// Extra request headers.
    pub headers: HashMap<String, String>,
}

/// Fully resolved options for one replay run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOptions {
    /// JSON file with the recorded events.
    pub input: PathBuf,
    /// Endpoint events are POSTed to.
    pub server_url: String,
    /// Speed factor (1.0 = real time).
    pub speed_factor: f64,
    /// Skip all pacing.
    pub fast_mode: bool,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Extra request headers.
    pub headers: HashMap<String, String>,
}

impl ReplayOptions {
    /// Options for an input file with every other setting at its default.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            speed_factor: 1.0,
            fast_mode: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            headers: HashMap::new(),
        }
    }

    /// Merges defaults, the optional config file and command-line flags.
    pub fn resolve(cli: Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => load_config(path)?,
            None => FileConfig::default(),
        };
        let options = Self::merge(cli, file);
        options.validate()?;
        Ok(options)
    }

    fn merge(cli: Cli, file: FileConfig) -> Self {
        let defaults = Self::new(cli.json_file);

        let mut headers = file.headers;
        headers.extend(cli.headers);

        Self {
            server_url: cli
                .server_url
                .or(file.server_url)
                .unwrap_or(defaults.server_url),
            speed_factor: cli.speed.or(file.speed).unwrap_or(defaults.speed_factor),
            fast_mode: cli
                .fast_mode
                .or(file.fast_mode)
                .unwrap_or(defaults.fast_mode),
            log_level: cli
                .log_level
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
            headers,
            input: defaults.input,
        }
    }

    /// Checks the options before any I/O happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.speed().map(|_| ())
    }

    /// The replay speed.
    pub fn speed(&self) -> Result<ReplaySpeed, ConfigError> {
        ReplaySpeed::from_options(self.speed_factor, self.fast_mode)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// The delivery sink configuration.
    pub fn sink_config(&self) -> HttpSinkConfig {
        HttpSinkConfig::new(self.server_url.clone()).headers(self.headers.clone())
    }
}

/// Loads configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid option: {0}")]
    Invalid(String),
}

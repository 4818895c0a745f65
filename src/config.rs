// Configuration: settings from a TOML file with `RSVP_*` environment
// overrides on top. CLI flags are applied last by the binary.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://eventapi.buddyforevents.com";
pub const DEFAULT_GUEST_BASE: &str = "http://event.buddyforevents.com";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub links: LinksConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the RSVP API lives
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base")]
    pub base_url: String,

    /// Request timeout; reqwest's default when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            timeout_secs: None,
        }
    }
}

/// Base of the guest links handed out to invitees
#[derive(Debug, Clone, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_guest_base")]
    pub guest_base_url: String,
}

fn default_guest_base() -> String {
    DEFAULT_GUEST_BASE.to_string()
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            guest_base_url: default_guest_base(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("failed to parse config {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Something worth logging that happened while resolving the config.
/// Logging is not set up yet at that point, so the binary emits these once
/// it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigNote {
    Loaded(PathBuf),
    Skipped { path: PathBuf, error: String },
    InvalidEnv { key: &'static str, value: String },
}

impl ConfigNote {
    pub fn log(&self) {
        match self {
            ConfigNote::Loaded(path) => tracing::info!("Loaded config from {:?}", path),
            ConfigNote::Skipped { path, error } => {
                tracing::warn!("Skipping config {:?}: {}", path, error)
            }
            ConfigNote::InvalidEnv { key, value } => {
                tracing::warn!("Ignoring invalid {}={:?}", key, value)
            }
        }
    }
}

/// Effective configuration plus what happened while building it.
#[derive(Debug)]
pub struct Resolved {
    pub config: Config,
    pub notes: Vec<ConfigNote>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must load. Otherwise the default locations are tried
    /// in order and unreadable files are skipped with a note. Environment
    /// overrides are applied in every case.
    pub fn resolve(explicit: Option<&Path>) -> Result<Resolved, ConfigError> {
        let mut notes = Vec::new();
        let mut config = match explicit {
            Some(path) => {
                let config = Self::load(path)?;
                notes.push(ConfigNote::Loaded(path.to_path_buf()));
                config
            }
            None => Self::load_first(&Self::default_paths(), &mut notes),
        };
        notes.extend(config.apply_env_overrides());
        Ok(Resolved { config, notes })
    }

    fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("rsvp").join("config.toml")),
            Some(PathBuf::from("./rsvp.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// First existing file of `paths` that loads, or the defaults.
    fn load_first(paths: &[PathBuf], notes: &mut Vec<ConfigNote>) -> Self {
        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load(path) {
                Ok(config) => {
                    notes.push(ConfigNote::Loaded(path.clone()));
                    return config;
                }
                Err(e) => notes.push(ConfigNote::Skipped {
                    path: path.clone(),
                    error: e.to_string(),
                }),
            }
        }

        Config::default()
    }

    /// Apply `RSVP_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> Vec<ConfigNote> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<ConfigNote> {
        let mut notes = Vec::new();
        if let Some(url) = lookup("RSVP_API_URL") {
            self.api.base_url = url;
        }
        if let Some(secs) = lookup("RSVP_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.api.timeout_secs = Some(secs),
                Err(_) => notes.push(ConfigNote::InvalidEnv {
                    key: "RSVP_TIMEOUT_SECS",
                    value: secs,
                }),
            }
        }
        if let Some(url) = lookup("RSVP_GUEST_BASE_URL") {
            self.links.guest_base_url = url;
        }
        if let Some(level) = lookup("RSVP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("RSVP_LOG_FORMAT") {
            self.logging.format = format;
        }
        notes
    }
}

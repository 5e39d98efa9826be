//! Runtime configuration.
//!
//! Values are resolved in layers: built-in defaults, then the optional JSON
//! file at `{config_dir}/tianji/config.json`, then environment variables:
//! - `TIANJI_API_KEY` (or `GEMINI_API_KEY`) - provider API key
//! - `TIANJI_BASE_URL` - provider base URL
//! - `TIANJI_MODEL` - model identifier
//! - `TIANJI_TIMEOUT_SECS` - request timeout, `0` disables it
//! - `TIANJI_EXPORT_DIR` - where saved scrolls go

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dirs::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const APP_NAME: &str = "tianji";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key configured; set TIANJI_API_KEY or GEMINI_API_KEY")]
    MissingApiKey,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// `0` means no timeout.
    pub timeout_secs: u64,
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            export_dir: PathBuf::from("."),
        }
    }
}

/// On-disk shape. Every field is optional so a file only overrides what it names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub export_dir: Option<PathBuf>,
}

impl Config {
    /// Resolve configuration from the user's config file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = default_config_path() {
            if path.exists() {
                config.apply_file(FileConfig::read(&path)?);
            }
        }
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn apply_file(&mut self, file: FileConfig) {
        if file.api_key.is_some() {
            self.api_key = file.api_key;
        }
        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(dir) = file.export_dir {
            self.export_dir = dir;
        }
    }

    /// Apply overrides from an environment lookup. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("TIANJI_API_KEY").or_else(|| get("GEMINI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(base_url) = get("TIANJI_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(model) = get("TIANJI_MODEL") {
            self.model = model;
        }
        if let Some(raw) = get("TIANJI_TIMEOUT_SECS") {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "TIANJI_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
        }
        if let Some(dir) = get("TIANJI_EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    let mut path = config_dir()?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Some(path)
}

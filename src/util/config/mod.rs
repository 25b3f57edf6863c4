//! elm-infer configuration
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high -> low):
//! 1. CLI arguments
//! 2. Environment variables (ELM_INFER_LOG)
//! 3. Project-level file (elm-infer.toml, or --config <PATH>)
//! 4. Default values
//! ```
//!
//! # Example
//!
//! ```toml
//! [infer]
//! max_depth = 256
//!
//! [log]
//! level = "debug"
//!
//! [diagnostic]
//! colors = false
//! ```

use crate::util::logger::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project-level config file name
pub const CONFIG_FILE: &str = "elm-infer.toml";

/// Environment variable overriding the log level
pub const LOG_ENV: &str = "ELM_INFER_LOG";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InferConfig {
    /// Inference settings
    #[serde(default)]
    pub infer: InferSection,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
    /// Diagnostic rendering settings
    #[serde(default)]
    pub diagnostic: DiagnosticConfig,
}

/// Inference configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferSection {
    /// Maximum expression / pattern nesting depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    crate::frontend::typecheck::DEFAULT_MAX_DEPTH
}

impl Default for InferSection {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// One of `debug`, `info`, `warn`, `error`
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LogConfig {
    /// Parsed log level, falling back to `warn` for unknown names
    pub fn log_level(&self) -> LogLevel {
        self.level.parse().unwrap_or(LogLevel::Warn)
    }
}

/// Diagnostic configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticConfig {
    /// Use ANSI colors in text output
    #[serde(default = "default_colors")]
    pub colors: bool,
}

fn default_colors() -> bool {
    true
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
        }
    }
}

impl InferConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Render configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var(LOG_ENV) {
            if !level.trim().is_empty() {
                self.log.level = level.trim().to_lowercase();
            }
        }
        self
    }
}

/// Load configuration from an explicit file
pub fn load_config(path: &Path) -> Result<InferConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    InferConfig::from_toml(&content)
}

/// Load configuration from `path`, or from `elm-infer.toml` in `dir` when no
/// path is given; a missing default file yields the defaults
pub fn load_or_default(
    path: Option<&Path>,
    dir: &Path,
) -> Result<InferConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = dir.join(CONFIG_FILE);
            if default_path.exists() {
                load_config(&default_path)
            } else {
                Ok(InferConfig::default())
            }
        }
    }
}

/// Save configuration
pub fn save_config(
    config: &InferConfig,
    path: &Path,
) -> Result<(), ConfigError> {
    let content = config.to_toml()?;
    fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

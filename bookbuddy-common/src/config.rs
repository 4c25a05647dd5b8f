//! Bootstrap configuration loading and data folder resolution
//!
//! Server settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`BOOKBUDDY_*`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 arrive together as [`SettingsOverrides`] (the binary's
//! argument parser reads both). The admin key is deliberately absent from
//! the TOML file and is only taken from the environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Default HTTP port for the feedback service
pub const DEFAULT_PORT: u16 = 5730;

/// Default bind address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; missing values fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    /// Directory holding `feedback.json`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a TOML bootstrap file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig, ConfigError> {
    let toml_err = |message: String| ConfigError::Toml {
        path: path.to_path_buf(),
        message,
    };

    let content = std::fs::read_to_string(path).map_err(|e| toml_err(e.to_string()))?;
    toml::from_str(&content).map_err(|e| toml_err(e.to_string()))
}

/// Platform config file location (`~/.config/bookbuddy/config.toml` on Linux)
///
/// Returns `None` when the platform has no config dir or the file is absent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("bookbuddy").join("config.toml"))
        .filter(|p| p.exists())
}

/// Locate and load the TOML file, if any
///
/// An explicitly named file must exist; the platform default is optional.
pub fn load_bootstrap(explicit: Option<&Path>) -> Result<Option<TomlConfig>, ConfigError> {
    match explicit {
        Some(path) => load_toml_config(path).map(Some),
        None => match default_config_path() {
            Some(path) => {
                debug!("Using config file {}", path.display());
                load_toml_config(&path).map(Some)
            }
            None => Ok(None),
        },
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
}

/// Fully resolved server settings
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub admin_key: String,
}

impl std::fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("log_level", &self.log_level)
            .field("admin_key", &"<redacted>")
            .finish()
    }
}

impl ServerSettings {
    /// Merge overrides, TOML and defaults
    pub fn resolve(
        overrides: SettingsOverrides,
        toml: Option<TomlConfig>,
        admin_key: String,
    ) -> Self {
        let toml = toml.unwrap_or_default();

        Self {
            host: overrides
                .host
                .or(toml.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            data_dir: overrides
                .data_dir
                .or(toml.data_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            log_level: toml.logging.level,
            admin_key,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

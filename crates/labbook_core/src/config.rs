//! Application configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Resolved directories are absolute.

use crate::logging::{default_log_level, LogLevel, LoggingError};
use crate::store::StoreLocation;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "LABBOOK_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "LABBOOK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "LABBOOK_LOG_DIR";

const DEFAULT_DATA_DIR_NAME: &str = "labbook";
const LOG_DIR_NAME: &str = "logs";

/// Invalid configuration value.
#[derive(Debug)]
pub enum ConfigError {
    InvalidLogLevel(LoggingError),
    RelativePath { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(err) => write!(f, "{LOG_LEVEL_ENV}: {err}"),
            Self::RelativePath { key, value } => {
                write!(f, "{key} must be an absolute path, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(err) => Some(err),
            Self::RelativePath { .. } => None,
        }
    }
}

/// Settings the composition root needs to build logging and the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the store file.
    pub data_dir: PathBuf,
    pub log_level: LogLevel,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Reads `LABBOOK_DATA_DIR`, `LABBOOK_LOG_LEVEL` and `LABBOOK_LOG_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = match read(DATA_DIR_ENV) {
            Some(value) => absolute_path(DATA_DIR_ENV, value)?,
            None => std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME),
        };

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(value) => value.parse().map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = match read(LOG_DIR_ENV) {
            Some(value) => absolute_path(LOG_DIR_ENV, value)?,
            None => data_dir.join(LOG_DIR_NAME),
        };

        Ok(Self {
            data_dir,
            log_level,
            log_dir,
        })
    }

    pub fn store_location(&self) -> StoreLocation {
        StoreLocation::directory(self.data_dir.clone())
    }
}

fn absolute_path(key: &'static str, value: String) -> Result<PathBuf, ConfigError> {
    let path = PathBuf::from(&value);
    if !path.is_absolute() {
        return Err(ConfigError::RelativePath { key, value });
    }
    Ok(path)
}

//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve storage location, storage key, page size and logging options.
//! - Apply defaults for everything left unset.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - `page_size` is always positive.

use crate::logging::default_log_level;
use crate::repo::student_repo::DEFAULT_STORAGE_KEY;
use crate::search::page::DEFAULT_PAGE_SIZE;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "STUDENT_REGISTRY_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "STUDENT_REGISTRY_STORAGE_KEY";
pub const ENV_PAGE_SIZE: &str = "STUDENT_REGISTRY_PAGE_SIZE";
pub const ENV_LOG_LEVEL: &str = "STUDENT_REGISTRY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STUDENT_REGISTRY_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "student_registry.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPageSize(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPageSize(value) => write!(
                f,
                "{ENV_PAGE_SIZE} must be a positive integer, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// SQLite file holding the key-value slots.
    pub db_path: PathBuf,
    /// Slot key the record list is stored under.
    pub storage_key: String,
    pub page_size: usize,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl RegistryConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = var(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = var(ENV_STORAGE_KEY) {
            config.storage_key = key;
        }
        if let Some(raw) = var(ENV_PAGE_SIZE) {
            config.page_size = match raw.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidPageSize(raw)),
            };
        }
        if let Some(level) = var(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = var(ENV_LOG_DIR).map(PathBuf::from);
        Ok(config)
    }
}

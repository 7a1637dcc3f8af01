use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::DEFAULT_USERNAME_LENGTH;

/// Runtime settings for a provisioning run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InjectConfig {
    pub store_path: PathBuf,
    pub session_path: PathBuf,
    pub artifact_path: Option<PathBuf>, // None means the running executable
    pub admin_url: String,
    pub multisite: bool,
    pub username_length: usize,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("accounts.dat"),
            session_path: PathBuf::from("session.token"),
            artifact_path: None,
            admin_url: "/admin/".to_string(),
            multisite: false,
            username_length: DEFAULT_USERNAME_LENGTH,
            log_file: PathBuf::from("inject-admin.log"),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read configuration: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse configuration: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl InjectConfig {
    /// Read a JSON file; missing keys fall back to defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username_length == 0 {
            return Err(ConfigError::Invalid(
                "username_length must be at least 1".to_string(),
            ));
        }
        if self.admin_url.trim().is_empty() {
            return Err(ConfigError::Invalid("admin_url is empty".to_string()));
        }
        self.log_level_filter()?;
        Ok(())
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::Invalid(format!("unknown log level {:?}", self.log_level)))
    }
}

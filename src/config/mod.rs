use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one data file per calendar month.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Fixed data file; when set the monthly layout is bypassed.
    #[serde(default)]
    pub database: Option<String>,
    /// Create unknown projects (rate 0) when an entry or timer names them.
    #[serde(default = "default_auto_create")]
    pub auto_create_project: bool,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_data_dir() -> String {
    Config::config_dir()
        .join("data")
        .to_string_lossy()
        .to_string()
}
fn default_file_prefix() -> String {
    "time-tracking".to_string()
}
fn default_auto_create() -> bool {
    true
}
fn default_currency() -> String {
    "EUR".to_string()
}
fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_prefix: default_file_prefix(),
            database: None,
            auto_create_project: default_auto_create(),
            currency: default_currency(),
            bind_address: default_bind_address(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rtimebilling")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rtimebilling")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtimebilling.conf")
    }

    pub fn data_dir_path(&self) -> PathBuf {
        expand_tilde(&self.data_dir)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir()).map_err(|_| AppError::ConfigSave)?;
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(Self::config_file(), yaml).map_err(|_| AppError::ConfigSave)
    }

    /// Initialize configuration and data directory.
    /// In test mode the config file is left untouched.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let mut config = Self::load()?;

        if let Some(db) = custom_db {
            config.database = Some(db);
        }

        fs::create_dir_all(config.data_dir_path())?;

        if !is_test {
            config.save()?;
        }

        Ok(config)
    }
}

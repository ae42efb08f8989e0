// src/config.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::ranking::{SortDirection, SortKey, SortState};

pub const DEFAULT_CONFIG_PATH: &str = "screener.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenerConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON file produced by the sync job
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("public/data.json")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_sort_key")]
    pub sort_key: SortKey,

    #[serde(default = "default_sort_direction")]
    pub sort_direction: SortDirection,

    #[serde(default)]
    pub format: OutputFormat,

    /// Maximum rows shown; all rows when unset
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sort_key: default_sort_key(),
            sort_direction: default_sort_direction(),
            format: OutputFormat::default(),
            limit: None,
        }
    }
}

impl DisplayConfig {
    pub fn sort_state(&self) -> SortState {
        SortState::new(self.sort_key, self.sort_direction)
    }
}

fn default_sort_key() -> SortKey {
    SortState::default().key
}

fn default_sort_direction() -> SortDirection {
    SortState::default().direction
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "dividend_screener=info,warn".to_string()
}

impl ScreenerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Loads an explicit path, or the default path if it exists, or falls back to defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match fs::read_to_string(DEFAULT_CONFIG_PATH) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no {} found, using defaults", DEFAULT_CONFIG_PATH);
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

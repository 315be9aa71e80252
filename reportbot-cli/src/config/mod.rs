//! Configuration and persistence
//!
//! Settings are read from `~/.config/reportbot/config.toml` (or `--config`),
//! then overridden by `REPORTBOT_*` environment variables. Every field has a
//! default so a missing file is not an error.

pub mod database;
pub mod repository;

pub use database::Database;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DATABASE_URL_VAR: &str = "REPORTBOT_DATABASE_URL";
const EXPORT_PATH_VAR: &str = "REPORTBOT_EXPORT_PATH";

/// Top-level application settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub export: ExportConfig,
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite://reportbot.db`
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://reportbot.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Where the daily dispatch CSV is written
    pub path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("envios_realizados.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportsConfig {
    /// Rows shown by `reports recent`
    pub recent_limit: u32,
    /// Rows per page in `reports list`
    pub page_size: u32,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            recent_limit: 5,
            page_size: 20,
        }
    }
}

impl AppConfig {
    /// Load settings from an explicit path, or the default location if present
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    log::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `REPORTBOT_*` overrides using the given variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.database.url = url;
        }
        if let Some(path) = lookup(EXPORT_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            self.export.path = PathBuf::from(path);
        }
    }
}

/// `~/.config/reportbot/config.toml` on Linux, the platform equivalent elsewhere
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reportbot").join("config.toml"))
}

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::columns::ViewMode;
use crate::controller::ViewOptions;
use crate::error::{Result, SalesError};
use crate::fmt::Locale;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    #[serde(default)]
    pub default_mode: ViewMode,
    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,
    #[serde(default = "default_page_length")]
    pub page_length: usize,
    #[serde(default)]
    pub locale: Locale,
}

fn default_currency_prefix() -> String {
    "$".to_string()
}

fn default_page_length() -> usize {
    25
}

fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir_string(),
            default_mode: ViewMode::default(),
            currency_prefix: default_currency_prefix(),
            page_length: default_page_length(),
            locale: Locale::default(),
        }
    }
}

impl Settings {
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            currency_prefix: self.currency_prefix.clone(),
            page_length: self.page_length,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("royalties")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("royalties")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "unreadable settings, using defaults"
            );
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SalesError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}

//! Configuration management for Tailor Tutor

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::DEFAULT_BASE_URL;
use crate::theme::Theme;

/// Environment variable overriding the configured API URL
pub const API_URL_ENV: &str = "TUTOR_API_URL";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the tutor API, including the `/api` prefix
    pub api_url: String,

    /// Selected theme name
    pub theme: String,

    /// Vim mode enabled
    pub vim_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            theme: "Tokyo Night".to_string(),
            vim_mode: true,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, writing defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {:?}", path))
        } else {
            debug!("Writing default config to {:?}", path);
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Pick the API URL: command line, then environment, then this file
    pub fn resolve_api_url(&self, cli: Option<&str>, env: Option<&str>) -> String {
        [cli, env]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(self.api_url.trim())
            .to_string()
    }

    /// Apply command line and environment overrides in place
    pub fn apply_overrides(&mut self, cli_api_url: Option<&str>) {
        let env = std::env::var(API_URL_ENV).ok();
        self.api_url = self.resolve_api_url(cli_api_url, env.as_deref());
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "tailor-tutor").context("Failed to determine config directory")
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Log file written while the terminal UI is running
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("tutor.log"))
    }

    /// Get the active theme
    pub fn active_theme(&self) -> Theme {
        Theme::by_name(&self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_points_at_local_server() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000/api");
        assert_eq!(config.theme, "Tokyo Night");
        assert!(config.vim_mode);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"vim_mode":false}"#).unwrap();
        assert_eq!(config.api_url, DEFAULT_BASE_URL);
        assert!(!config.vim_mode);
    }

    #[test]
    fn load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            api_url: "https://tutor.example.org/api".into(),
            theme: "Tokyo Night".into(),
            vim_mode: false,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn api_url_precedence() {
        let config = Config { api_url: "http://file/api".into(), ..Config::default() };
        assert_eq!(
            config.resolve_api_url(Some("http://cli/api"), Some("http://env/api")),
            "http://cli/api"
        );
        assert_eq!(config.resolve_api_url(None, Some("http://env/api")), "http://env/api");
        assert_eq!(config.resolve_api_url(None, Some("  ")), "http://file/api");
        assert_eq!(config.resolve_api_url(None, None), "http://file/api");
    }
}

//! Configuration Management
//!
//! Handles persistent configuration storage for bqctl.

use crate::gcp::auth::{get_default_project, validate_project_id};
use crate::gcp::client::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the API endpoint (e.g. for an emulator)
pub const BASE_URL_ENV: &str = "BQREST_BASE_URL";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Default project for commands
    #[serde(default)]
    pub project_id: Option<String>,
    /// API endpoint, defaults to the public BigQuery v2 endpoint
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Page size sent as `maxResults` when a command doesn't set one
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bqrest").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults when
    /// it is missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Get effective project (CLI > config > environment / gcloud default)
    pub fn effective_project(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.project_id.clone())
            .or_else(get_default_project)
    }

    /// Get effective endpoint (CLI > environment > config > public endpoint)
    pub fn effective_base_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Set project and save
    pub fn set_project(&mut self, project_id: &str) -> Result<()> {
        if !validate_project_id(project_id) {
            anyhow::bail!("Invalid project ID: {}", project_id);
        }
        self.project_id = Some(project_id.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("bqrest-config-{}", std::process::id()));
        let path = dir.join("config.json");

        let config = Config {
            project_id: Some("analytics-prod".into()),
            base_url: Some("http://localhost:9050/bigquery/v2/".into()),
            timeout_secs: Some(30),
            max_results: None,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.timeout(), Some(Duration::from_secs(30)));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_or_malformed_file_gives_default() {
        let dir = std::env::temp_dir().join(format!("bqrest-config-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        assert_eq!(Config::load_from(&dir.join("absent.json")), Config::default());

        let bad = dir.join("bad.json");
        std::fs::write(&bad, "{ nope").unwrap();
        assert_eq!(Config::load_from(&bad), Config::default());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_cli_project_wins() {
        let config = Config {
            project_id: Some("from-config".into()),
            ..Default::default()
        };
        assert_eq!(
            config.effective_project(Some("from-cli")).as_deref(),
            Some("from-cli")
        );
        assert_eq!(config.effective_project(None).as_deref(), Some("from-config"));
    }

    #[test]
    fn test_cli_base_url_wins() {
        let config = Config {
            base_url: Some("http://from-config/".into()),
            ..Default::default()
        };
        assert_eq!(config.effective_base_url(Some("http://cli/")), "http://cli/");
    }
}

//! Configuration Management
//!
//! Handles persistent configuration storage for ckan-connect.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no base URL is configured
pub const BASE_URL_ENV: &str = "CKAN_URL";

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Catalog base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Resource definitions file
    #[serde(default)]
    pub definitions: Option<PathBuf>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ckan-connect").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file is missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective base URL (CLI > config > environment > default)
    pub fn effective_base_url(&self, cli: Option<&str>) -> String {
        self.resolve_base_url(cli, std::env::var(BASE_URL_ENV).ok())
    }

    fn resolve_base_url(&self, cli: Option<&str>, env: Option<String>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.base_url.clone())
            .or_else(|| env.filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get effective definitions file (CLI > config)
    pub fn effective_definitions(&self, cli: Option<&Path>) -> Option<PathBuf> {
        cli.map(Path::to_path_buf)
            .or_else(|| self.definitions.clone())
    }

    /// Set base URL and save
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.apply_base_url(base_url)?;
        self.save()
    }

    /// Validate and store the base URL without saving
    fn apply_base_url(&mut self, base_url: &str) -> Result<()> {
        url::Url::parse(base_url).with_context(|| format!("Invalid base URL '{}'", base_url))?;
        self.base_url = Some(base_url.to_string());
        Ok(())
    }

    /// Set definitions file and save
    pub fn set_definitions(&mut self, path: &Path) -> Result<()> {
        self.definitions = Some(path.to_path_buf());
        self.save()
    }
}

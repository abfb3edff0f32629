//! Configuration Management
//!
//! Handles persistent configuration storage for the stripekit CLI.

use crate::stripe::client::{ClientConfig, DEFAULT_API_BASE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// API host override (e.g. a local stripe-mock)
    #[serde(default)]
    pub api_base: Option<String>,
    /// Pinned API version
    #[serde(default)]
    pub api_version: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stripekit").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`; a missing or unreadable file yields the defaults
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
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective API host (CLI > config > default)
    pub fn effective_api_base(&self, cli: Option<&str>) -> String {
        cli.map(|s| s.to_string())
            .or_else(|| self.api_base.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    /// Get effective API version (CLI > config > account default)
    pub fn effective_api_version(&self, cli: Option<&str>) -> Option<String> {
        cli.map(|s| s.to_string()).or_else(|| self.api_version.clone())
    }

    /// Build the transport settings for this configuration
    pub fn client_config(&self, api_base: Option<&str>, api_version: Option<&str>) -> ClientConfig {
        let mut config = ClientConfig::default().with_api_base(&self.effective_api_base(api_base));
        config.api_version = self.effective_api_version(api_version);
        config
    }

    /// Record CLI overrides so later runs pick them up
    pub fn apply_overrides(&mut self, api_base: Option<&str>, api_version: Option<&str>) {
        if let Some(base) = api_base {
            self.api_base = Some(base.to_string());
        }
        if let Some(version) = api_version {
            self.api_version = Some(version.to_string());
        }
    }
}

//! Configuration Management
//!
//! Handles persistent configuration storage for the client and `tfctl`.
//! Values resolve as CLI flag > environment variable > config file > default.

use crate::api::client::{Client, ClientOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "TRACEFORCE_API_KEY";
/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "TRACEFORCE_BASE_URL";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// API key sent as a bearer token
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the control-plane API
    #[serde(default)]
    pub base_url: Option<String>,
    /// Constant headers added to every request
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("traceforce").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config {:?}: {:#}", path, e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Apply `TRACEFORCE_API_KEY` / `TRACEFORCE_BASE_URL` on top of the file
    pub fn with_env(mut self) -> Self {
        self.apply_env(|name| std::env::var(name).ok());
        self
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.base_url = Some(url);
        }
    }

    /// Client options derived from this configuration
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            extra_headers: self.extra_headers.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Build a client from this configuration. Fails when no API key is set.
    pub fn build_client(&self) -> Result<Client> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .with_context(|| format!("No API key configured. Set {} or pass --api-key", API_KEY_ENV))?;

        Client::new(api_key, self.base_url.as_deref(), self.client_options())
            .context("Failed to create Traceforce client")
    }
}

//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the page origin, the storage backend, the notification
//! texts and the last used email address.
//!
//! Configuration is stored at `~/.config/loginform/config.json`. After
//! loading, `LOGINFORM_ORIGIN` and `LOGINFORM_STORAGE` from the environment
//! override the file.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::storage::{FileStorage, KeyringStorage, MemoryStorage, Storage};

/// Application name used for config/data directory paths
const APP_NAME: &str = "loginform";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Origin the login page is served from by default
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Connexion réussie";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Erreur lors de la connexion";

const ORIGIN_ENV: &str = "LOGINFORM_ORIGIN";
const STORAGE_ENV: &str = "LOGINFORM_STORAGE";

/// Where the auth token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "keyring" => Ok(StorageBackend::Keyring),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub origin: String,
    pub storage: StorageBackend,
    pub request_timeout_secs: u64,
    /// Ignore submits while a login request is already in flight
    pub single_flight: bool,
    pub success_message: String,
    pub failure_message: String,
    pub log_dir: Option<PathBuf>,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            storage: StorageBackend::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            single_flight: false,
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            log_dir: None,
            last_email: None,
        }
    }
}

impl Config {
    /// Load the config file and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load the config file as stored, without environment overrides
    pub fn load_file() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply environment overrides, read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(origin) = lookup(ORIGIN_ENV).filter(|v| !v.trim().is_empty()) {
            self.origin = origin.trim().to_string();
        }
        if let Some(storage) = lookup(STORAGE_ENV).filter(|v| !v.trim().is_empty()) {
            self.storage = storage.parse()?;
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding per-origin storage files
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.origin).with_context(|| format!("Invalid origin URL: {}", self.origin))
    }

    /// Open the configured storage backend, scoped to the configured origin
    pub fn open_storage(&self) -> Result<Arc<dyn Storage>> {
        let origin = self.origin_url()?;
        let storage: Arc<dyn Storage> = match self.storage {
            StorageBackend::File => Arc::new(FileStorage::for_origin(&Self::data_dir()?, &origin)),
            StorageBackend::Keyring => Arc::new(KeyringStorage::for_origin(&origin)),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        Ok(storage)
    }
}

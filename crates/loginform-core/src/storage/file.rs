use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use super::{origin_key, Storage};

/// Storage file name inside the per-origin directory
const STORAGE_FILE: &str = "local_storage.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredItem {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl StoredItem {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Storage persisted as one JSON document per origin.
/// Items live until removed or the file is deleted.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Storage for `origin` under `data_dir`
    pub fn for_origin(data_dir: &Path, origin: &Url) -> Self {
        Self::at_path(data_dir.join(origin_key(origin)).join(STORAGE_FILE))
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full record for `key`, including when it was last written
    pub fn item(&self, key: &str) -> Result<Option<StoredItem>> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Storage lock poisoned"))?;
        Ok(self.load()?.remove(key))
    }

    fn load(&self) -> Result<BTreeMap<String, StoredItem>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage file: {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse storage file: {}", self.path.display()))
    }

    /// Write to a temp file in the same directory, then rename it over the
    /// old document so readers never see a partial write.
    fn save(&self, items: &BTreeMap<String, StoredItem>) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let contents = serde_json::to_string_pretty(items)?;
        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to write storage file: {}", self.path.display()))?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.item(key)?.map(|item| item.value))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Storage lock poisoned"))?;
        let mut items = self.load()?;
        items.insert(key.to_string(), StoredItem::new(value));
        self.save(&items)?;
        debug!(path = %self.path.display(), key, "Stored item");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Storage lock poisoned"))?;
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.save(&items)?;
        }
        Ok(())
    }
}

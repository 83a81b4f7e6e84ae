use anyhow::{Context, Result};
use keyring::Entry;
use reqwest::Url;
use tracing::debug;

use super::{origin_key, Storage};

const SERVICE_NAME: &str = "loginform";

/// Storage backed by the OS keychain. Each key is one keychain entry,
/// named `<origin>#<key>` under the `loginform` service.
pub struct KeyringStorage {
    scope: String,
}

impl KeyringStorage {
    pub fn for_origin(origin: &Url) -> Self {
        Self {
            scope: origin_key(origin),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &format!("{}#{}", self.scope, key))
            .context("Failed to create keyring entry")
    }
}

impl Storage for KeyringStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read item from keychain"),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .context("Failed to store item in keychain")?;
        debug!(scope = %self.scope, key, "Stored item in keychain");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete item from keychain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TOKEN_KEY;

    fn storage() -> KeyringStorage {
        // Mock entries keep no shared state, so each lookup starts empty
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeyringStorage::for_origin(&Url::parse("http://localhost:8080").unwrap())
    }

    #[test]
    fn test_entry_name_is_origin_scoped() {
        let storage = storage();
        assert_eq!(storage.scope, "http_localhost_8080");
        assert!(storage.entry(TOKEN_KEY).is_ok());
    }

    #[test]
    fn test_absent_item_reads_as_none() {
        assert_eq!(storage().get_item(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_remove_absent_item() {
        storage().remove_item(TOKEN_KEY).unwrap();
    }

    #[test]
    fn test_set_item() {
        let storage = storage();
        storage.set_item(TOKEN_KEY, "abc123").unwrap();

        // Read back through the same entry
        let entry = storage.entry(TOKEN_KEY).unwrap();
        entry.set_password("abc123").unwrap();
        assert_eq!(entry.get_password().unwrap(), "abc123");
    }
}

//! Persistent client storage for the auth token.
//!
//! This module provides the `Storage` trait, a key/value interface scoped to
//! one page origin, and three backends:
//! - `MemoryStorage`: in-process map, lost on exit
//! - `FileStorage`: JSON document per origin under the data directory
//! - `KeyringStorage`: OS keychain entries via keyring
//!
//! The submit handler writes the token under [`TOKEN_KEY`] and never reads
//! it back.

pub mod file;
pub mod keychain;
pub mod memory;

use anyhow::Result;
use reqwest::Url;

pub use file::{FileStorage, StoredItem};
pub use keychain::KeyringStorage;
pub use memory::MemoryStorage;

/// Storage key the auth token is written under
pub const TOKEN_KEY: &str = "token";

/// Origin-scoped key/value store.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite `key`
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Filesystem- and keychain-safe name for an origin, e.g.
/// `http://localhost:8080` becomes `http_localhost_8080`.
pub fn origin_key(origin: &Url) -> String {
    let serialized = origin.origin().ascii_serialization();
    let mut key = String::with_capacity(serialized.len());
    for c in serialized.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            key.push(c);
        } else if !key.ends_with('_') {
            key.push('_');
        }
    }
    key
}

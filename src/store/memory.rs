// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory configuration store.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::store::ConfigStore;

/// A configuration store backed by an in-memory map.
///
/// Useful in tests and for embedders that already hold the configuration
/// in memory. Lookups never fail.
///
/// # Examples
///
/// ```
/// use dimctl_lib::store::MemoryStore;
///
/// let store = MemoryStore::new()
///     .with_entry("remote-dimmer-config", "[]")
///     .with_entry("hall-creds", r#"{"id": "admin", "pw": "secret"}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, builder-style.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Inserts an entry, replacing any previous value under the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.entries.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_stored_value() {
        let store = MemoryStore::new().with_entry("k", "v");
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn get_absent_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[test]
    fn insert_replaces() {
        let mut store = MemoryStore::new().with_entry("k", "old");
        store.insert("k", "new");
        assert_eq!(store.len(), 1);
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File-backed configuration store.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::ConfigError;
use crate::store::ConfigStore;

/// A configuration store read once from a JSON file.
///
/// The file holds a single JSON object mapping keys to values. String
/// values are returned as the bare string; any other value is returned as
/// its JSON text, so a binding list can be stored either as a JSON array
/// directly or as a pre-encoded string.
///
/// The file is read at construction and never re-read: the store is
/// read-only for the life of the process.
///
/// # Examples
///
/// ```no_run
/// use dimctl_lib::store::FileStore;
///
/// let store = FileStore::open("/etc/dimctl/store.json")?;
/// # Ok::<(), dimctl_lib::error::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Reads the store file and decodes it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unavailable`] if the file cannot be read and
    /// [`ConfigError::Invalid`] if it is not a JSON object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Unavailable(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Decodes a store from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the text is not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: HashMap<String, Value> = serde_json::from_str(text)?;
        let entries = raw
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();
        Ok(Self { entries })
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

impl ConfigStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.entries.get(key).cloned())
    }
}

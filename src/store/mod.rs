// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host configuration store interface.
//!
//! The binding list and indirect credentials live in the host's persistent
//! key-value store. This module defines the narrow read interface the
//! library consumes, plus two implementations:
//!
//! - [`FileStore`]: one JSON object read from disk at construction
//! - [`MemoryStore`]: an in-memory map, for tests and embedders that
//!   already hold the configuration
//!
//! The store is read-only for the life of the process: bindings are loaded
//! once at startup and never re-read.

mod file;
mod memory;

use std::future::Future;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::ConfigError;

/// Read access to the host's key-value configuration store.
///
/// Returned futures are `Send` because credential lookups for different
/// bindings run concurrently in spawned tasks.
pub trait ConfigStore {
    /// Looks up the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent: absence is an ordinary
    /// outcome (an optional credential that was never provisioned), not a
    /// store failure.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unavailable`] when the store itself cannot
    /// be read.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, ConfigError>> + Send;
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binding list loading.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::{ResolvedBinding, parse_bindings, resolver::resolve_credentials};
use crate::error::ConfigError;
use crate::protocol::Credentials;
use crate::store::ConfigStore;

/// Store key under which the binding list lives.
pub const BINDINGS_KEY: &str = "remote-dimmer-config";

/// Loads, validates and credential-resolves the binding list.
///
/// One store lookup fetches the list; a failure there (or an invalid list)
/// aborts loading and no bindings activate. Credential resolution then
/// fans out: every binding's resolution runs as its own task, and the
/// loader completes only once the whole set has drained, success or
/// failure alike. A failed resolution demotes that binding to
/// unauthenticated; it never blocks the others.
///
/// The returned list preserves configuration order.
///
/// # Errors
///
/// Returns [`ConfigError::Unavailable`] when the store cannot be read,
/// [`ConfigError::MissingBindingList`] when the key is absent, and the
/// validation errors of [`parse_bindings`] for a malformed list.
pub async fn load_bindings<S>(store: Arc<S>) -> Result<Vec<ResolvedBinding>, ConfigError>
where
    S: ConfigStore + Send + Sync + 'static,
{
    let text = store
        .get(BINDINGS_KEY)
        .await?
        .ok_or_else(|| ConfigError::MissingBindingList(BINDINGS_KEY.to_string()))?;

    let bindings = parse_bindings(&text)?;

    tracing::debug!(count = bindings.len(), "Loaded binding list");

    let mut resolutions: JoinSet<(usize, Option<Credentials>)> = JoinSet::new();
    for (idx, binding) in bindings.iter().enumerate() {
        let store = Arc::clone(&store);
        let id = binding.id.clone();
        let auth = binding.device.auth.clone();
        resolutions.spawn(async move {
            (idx, resolve_credentials(&*store, &id, auth.as_ref()).await)
        });
    }

    let mut credentials: Vec<Option<Credentials>> = vec![None; bindings.len()];
    while let Some(joined) = resolutions.join_next().await {
        match joined {
            Ok((idx, resolved)) => credentials[idx] = resolved,
            Err(e) => tracing::warn!(error = %e, "credential resolution task failed"),
        }
    }

    Ok(bindings
        .into_iter()
        .zip(credentials)
        .map(|(binding, credentials)| ResolvedBinding {
            binding,
            credentials,
        })
        .collect())
}

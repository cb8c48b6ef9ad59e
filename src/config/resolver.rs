// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Credential resolution for bindings.

use serde::Deserialize;

use crate::config::AuthSpec;
use crate::protocol::Credentials;
use crate::store::ConfigStore;

/// Stored shape of an indirect credential entry.
#[derive(Debug, Deserialize)]
struct StoredCredentials {
    id: String,
    pw: String,
}

/// Resolves a binding's declared authentication into a concrete credential
/// pair.
///
/// Inline credentials pass straight through; an indirect reference costs
/// one store lookup. Resolution failure is never fatal: a store error, an
/// absent key, or an undecodable value is logged and the binding proceeds
/// unauthenticated. References are resolved once, at load time, and never
/// cached across bindings: two bindings sharing a reference each fetch it.
///
/// # Examples
///
/// ```
/// use dimctl_lib::config::{AuthSpec, resolve_credentials};
/// use dimctl_lib::store::MemoryStore;
///
/// # async fn example() {
/// let store = MemoryStore::new().with_entry("hall-creds", r#"{"id": "admin", "pw": "s"}"#);
/// let spec = AuthSpec::Reference("hall-creds".to_string());
/// let creds = resolve_credentials(&store, "hall", Some(&spec)).await;
/// assert_eq!(creds.unwrap().username, "admin");
/// # }
/// ```
pub async fn resolve_credentials<S: ConfigStore + Sync>(
    store: &S,
    binding_id: &str,
    auth: Option<&AuthSpec>,
) -> Option<Credentials> {
    match auth {
        None => None,
        Some(AuthSpec::Inline(credentials)) => Some(credentials.clone()),
        Some(AuthSpec::Reference(key)) => {
            let value = match store.get(key).await {
                Ok(Some(value)) => value,
                Ok(None) => {
                    tracing::warn!(
                        binding = %binding_id,
                        key = %key,
                        "credential key absent from store, proceeding unauthenticated"
                    );
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        binding = %binding_id,
                        key = %key,
                        error = %e,
                        "credential lookup failed, proceeding unauthenticated"
                    );
                    return None;
                }
            };

            match serde_json::from_str::<StoredCredentials>(&value) {
                Ok(stored) => Some(Credentials {
                    username: stored.id,
                    password: stored.pw,
                }),
                Err(e) => {
                    tracing::warn!(
                        binding = %binding_id,
                        key = %key,
                        error = %e,
                        "credential value is not an id/pw object, proceeding unauthenticated"
                    );
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn absent_auth_resolves_to_none() {
        let store = MemoryStore::new();
        assert!(resolve_credentials(&store, "b", None).await.is_none());
    }

    #[tokio::test]
    async fn inline_auth_passes_through() {
        let store = MemoryStore::new();
        let spec = AuthSpec::Inline(Credentials {
            username: "admin".to_string(),
            password: "secret".to_string(),
        });
        let creds = resolve_credentials(&store, "b", Some(&spec)).await.unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "secret");
    }

    #[tokio::test]
    async fn reference_is_fetched_from_store() {
        let store = MemoryStore::new().with_entry("k", r#"{"id": "u", "pw": "p"}"#);
        let spec = AuthSpec::Reference("k".to_string());
        let creds = resolve_credentials(&store, "b", Some(&spec)).await.unwrap();
        assert_eq!(creds.username, "u");
        assert_eq!(creds.password, "p");
    }

    #[tokio::test]
    async fn absent_reference_key_resolves_to_none() {
        let store = MemoryStore::new();
        let spec = AuthSpec::Reference("missing".to_string());
        assert!(resolve_credentials(&store, "b", Some(&spec)).await.is_none());
    }

    #[tokio::test]
    async fn undecodable_reference_value_resolves_to_none() {
        let store = MemoryStore::new().with_entry("k", "not an object");
        let spec = AuthSpec::Reference("k".to_string());
        assert!(resolve_credentials(&store, "b", Some(&spec)).await.is_none());
    }
}

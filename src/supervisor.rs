// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process-wide orchestration.
//!
//! The [`Supervisor`] is the entry point a host embeds: it loads the
//! binding list from the configuration store, builds one device client
//! and one controller per binding, and registers each controller with the
//! input router. The host then feeds its input notifications into
//! [`Supervisor::dispatch`] (or hands clones of the router around).

use std::sync::Arc;

use crate::config::{ResolvedBinding, load_bindings};
use crate::controller::{DimmerController, MachineState};
use crate::error::Error;
use crate::protocol::EndpointConfig;
use crate::router::{HostEvent, InputRouter};
use crate::store::ConfigStore;

/// Orchestrates one controller per configured binding.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use dimctl_lib::store::FileStore;
/// use dimctl_lib::supervisor::Supervisor;
///
/// # async fn example() -> dimctl_lib::Result<()> {
/// let store = Arc::new(FileStore::open("/etc/dimctl/store.json")?);
/// let supervisor = Supervisor::start(store).await?;
///
/// // Feed host input notifications:
/// let event = serde_json::from_str(r#"{"component": "input:0", "delta": {"state": true}}"#)
///     .expect("host event");
/// supervisor.dispatch(&event).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Supervisor {
    router: Arc<InputRouter>,
    controllers: Vec<DimmerController>,
}

impl Supervisor {
    /// Loads bindings and spawns one controller per binding.
    ///
    /// A load failure is fatal for this run: no controllers are created
    /// and the error is returned for the host to log. The host process
    /// itself keeps running; nothing here panics.
    ///
    /// # Errors
    ///
    /// Returns the loader's [`ConfigError`](crate::error::ConfigError)
    /// when the binding list cannot be read or validated, and a
    /// [`ClientError`](crate::error::ClientError) when a device client
    /// cannot be constructed.
    pub async fn start<S>(store: Arc<S>) -> Result<Self, Error>
    where
        S: ConfigStore + Send + Sync + 'static,
    {
        let bindings = load_bindings(store).await.map_err(|e| {
            tracing::error!(error = %e, "binding load failed, no controllers created");
            e
        })?;

        let router = Arc::new(InputRouter::new());
        let mut controllers = Vec::with_capacity(bindings.len());

        for ResolvedBinding {
            binding,
            credentials,
        } in bindings
        {
            let client = EndpointConfig::new(&binding.device.addr)
                .with_resolved_credentials(credentials)
                .into_client()
                .map_err(Error::Client)?;

            let controller = DimmerController::spawn(&binding, client);
            router.register(
                binding.id.clone(),
                binding.buttons.channels().collect(),
                controller.edge_sender(),
            );

            tracing::info!(
                binding = %binding.id,
                device = %binding.device.addr,
                "controller active"
            );
            controllers.push(controller);
        }

        Ok(Self {
            router,
            controllers,
        })
    }

    /// Returns the input router, for hosts that deliver events from
    /// several places.
    #[must_use]
    pub fn router(&self) -> Arc<InputRouter> {
        Arc::clone(&self.router)
    }

    /// Dispatches one host input event; returns how many controllers it
    /// reached.
    pub async fn dispatch(&self, event: &HostEvent) -> usize {
        self.router.dispatch(event).await
    }

    /// Returns the ids of all active bindings, in configuration order.
    #[must_use]
    pub fn binding_ids(&self) -> Vec<&str> {
        self.controllers
            .iter()
            .map(DimmerController::id)
            .collect()
    }

    /// Returns the machine state of one binding's controller.
    #[must_use]
    pub fn machine_state(&self, binding_id: &str) -> Option<MachineState> {
        self.controllers
            .iter()
            .find(|controller| controller.id() == binding_id)
            .map(DimmerController::machine_state)
    }

    /// Stops all controllers and waits for their tasks to exit.
    pub async fn shutdown(self) {
        // Routes hold edge-sender clones; drop them first so the
        // controller queues actually close.
        self.router.clear();
        for controller in self.controllers {
            controller.shutdown().await;
        }
    }
}

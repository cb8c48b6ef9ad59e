// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input event routing.
//!
//! The host delivers a notification for every input channel state change.
//! The router filters those down to `input:`-prefixed components and
//! forwards a [`ButtonEdge`] to every registered controller whose button
//! map claims the channel. With validated configuration that is exactly
//! one controller; channels nobody claims are dropped quietly, as hosts
//! routinely carry inputs this process does not care about.

use parking_lot::RwLock;
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::controller::ButtonEdge;

/// Component prefix the router listens for.
const INPUT_PREFIX: &str = "input:";

/// A raw input notification as the host delivers it.
///
/// # Examples
///
/// ```
/// use dimctl_lib::router::HostEvent;
///
/// let event: HostEvent =
///     serde_json::from_str(r#"{"component": "input:0", "delta": {"state": true}}"#).unwrap();
/// assert_eq!(event.component, "input:0");
/// assert!(event.delta.state);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct HostEvent {
    /// Source component, e.g. `input:0`.
    pub component: String,
    /// The state change that occurred.
    pub delta: EdgeDelta,
}

/// The changed state within a [`HostEvent`].
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EdgeDelta {
    /// New two-state value of the channel: true is pressed.
    pub state: bool,
}

/// One registered controller and the channels it claims.
#[derive(Debug)]
struct Route {
    binding_id: String,
    channels: Vec<u8>,
    edge_tx: mpsc::Sender<ButtonEdge>,
}

/// Dispatches host input events to the controllers that claim them.
#[derive(Debug, Default)]
pub struct InputRouter {
    routes: RwLock<Vec<Route>>,
}

impl InputRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller for a set of channels.
    pub fn register(
        &self,
        binding_id: impl Into<String>,
        channels: Vec<u8>,
        edge_tx: mpsc::Sender<ButtonEdge>,
    ) {
        let binding_id = binding_id.into();
        tracing::debug!(binding = %binding_id, channels = ?channels, "route registered");
        self.routes.write().push(Route {
            binding_id,
            channels,
            edge_tx,
        });
    }

    /// Removes all routes, dropping the held edge senders.
    pub fn clear(&self) {
        self.routes.write().clear();
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    /// Returns true if no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }

    /// Dispatches one host event.
    ///
    /// Returns the number of controllers the edge was delivered to.
    /// Non-input components and unclaimed channels return 0.
    pub async fn dispatch(&self, event: &HostEvent) -> usize {
        let Some(channel) = parse_channel(&event.component) else {
            tracing::trace!(component = %event.component, "not an input component, ignored");
            return 0;
        };

        let edge = ButtonEdge {
            channel,
            pressed: event.delta.state,
        };

        // Collect matching senders first: the lock must not be held
        // across the sends.
        let targets: Vec<(String, mpsc::Sender<ButtonEdge>)> = self
            .routes
            .read()
            .iter()
            .filter(|route| route.channels.contains(&channel))
            .map(|route| (route.binding_id.clone(), route.edge_tx.clone()))
            .collect();

        let mut delivered = 0;
        for (binding_id, edge_tx) in targets {
            if edge_tx.send(edge).await.is_ok() {
                delivered += 1;
            } else {
                tracing::warn!(binding = %binding_id, "controller gone, edge dropped");
            }
        }

        if delivered == 0 {
            tracing::trace!(channel, "no controller claims this channel");
        }
        delivered
    }
}

/// Extracts the channel index from an `input:<index>` component name.
fn parse_channel(component: &str) -> Option<u8> {
    component.strip_prefix(INPUT_PREFIX)?.parse().ok()
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `DimCtl` Lib - drive remote dimmable lights from physical buttons.
//!
//! This library turns raw two-state button edges into light control: a
//! short press toggles the light on or off, a long press starts a
//! continuous brightness ramp in the button's configured direction, and
//! releasing stops it. Commands go to the light over its HTTP control
//! API; the library is purely an initiator, never a server.
//!
//! # How it fits together
//!
//! - A binding associates one or two input channels (up/down) with one
//!   device endpoint. Bindings live in the host's key-value store under
//!   `remote-dimmer-config` and are loaded once at startup; credentials
//!   may be inline or indirect `@key` references resolved at load time.
//! - One [`controller::DimmerController`] runs per binding, owning a
//!   small state machine that survives device latency and failure: a
//!   release always wins over whatever request is still in flight.
//! - The [`router::InputRouter`] fans host input notifications out to the
//!   controllers that claim them, and the
//!   [`supervisor::Supervisor`] wires all of it up.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use dimctl_lib::store::FileStore;
//! use dimctl_lib::supervisor::Supervisor;
//!
//! #[tokio::main]
//! async fn main() -> dimctl_lib::Result<()> {
//!     let store = Arc::new(FileStore::open("/etc/dimctl/store.json")?);
//!     let supervisor = Supervisor::start(store).await?;
//!
//!     // Wherever the host surfaces input notifications:
//!     let event = serde_json::from_str(
//!         r#"{"component": "input:0", "delta": {"state": true}}"#,
//!     ).expect("host event");
//!     supervisor.dispatch(&event).await;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Driving a single device directly
//!
//! ```no_run
//! use dimctl_lib::protocol::{EndpointConfig, LightApi};
//! use dimctl_lib::types::PowerAction;
//!
//! #[tokio::main]
//! async fn main() -> dimctl_lib::Result<()> {
//!     let client = EndpointConfig::new("192.168.1.40")
//!         .with_credentials("admin", "secret")
//!         .into_client()
//!         .map_err(dimctl_lib::Error::Client)?;
//!
//!     let status = client.set_power(PowerAction::Toggle).await
//!         .map_err(dimctl_lib::Error::Client)?;
//!     println!("light is now {status}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod protocol;
pub mod router;
pub mod store;
pub mod supervisor;
pub mod types;

pub use config::{
    AuthSpec, BINDINGS_KEY, Binding, ButtonMap, DeviceSpec, RampMode, ResolvedBinding, Tuning,
    load_bindings, parse_bindings, resolve_credentials,
};
pub use controller::{ButtonEdge, DimmerController, MachineState};
pub use error::{ClientError, ConfigError, Error, Result, ValueError};
pub use protocol::{Credentials, EndpointConfig, LightApi, LightClient};
pub use router::{EdgeDelta, HostEvent, InputRouter};
pub use store::{ConfigStore, FileStore, MemoryStore};
pub use supervisor::Supervisor;
pub use types::{Brightness, DimDirection, DimMotion, LightStatus, PowerAction};

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for light control.
//!
//! This module provides type-safe representations of values exchanged with
//! dimmable light devices. Each type ensures values are within their valid
//! ranges at construction time, preventing runtime errors.
//!
//! # Types
//!
//! - [`PowerAction`] - on/off/toggle actions for power control
//! - [`Brightness`] - brightness level (0-100%)
//! - [`DimDirection`] - configured ramp direction for a button channel
//! - [`DimMotion`] - ramp verb sent on the wire (up/down/stop)
//! - [`LightStatus`] - the state a device reports about itself

mod brightness;
mod direction;
mod power;
mod status;

pub use brightness::Brightness;
pub use direction::{DimDirection, DimMotion};
pub use power::PowerAction;
pub use status::LightStatus;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementation for communicating with dimmable light devices.
//!
//! This module provides the HTTP client for the four light-control
//! operations, plus the [`LightApi`] seam the controller is written
//! against.
//!
//! All operations are single in-flight requests: no retry is performed
//! automatically, callers decide whether to retry or abandon.

mod http;

use std::future::Future;

pub use http::{Credentials, EndpointConfig, LightClient};

use crate::error::ClientError;
use crate::types::{Brightness, DimMotion, LightStatus, PowerAction};

/// The light-control operations a device endpoint offers.
///
/// [`LightClient`] is the HTTP implementation; tests substitute scripted
/// fakes. Returned futures are `Send` because the controller runs each
/// call in a spawned task so that button edges stay responsive while a
/// request is in flight.
pub trait LightApi {
    /// Fetches the device's current status.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unreachable`] on transport failure,
    /// [`ClientError::Status`] on a non-2xx answer, and
    /// [`ClientError::MalformedBody`] if the body does not decode.
    fn status(&self) -> impl Future<Output = Result<LightStatus, ClientError>> + Send;

    /// Applies a power action and returns the device-reported state after
    /// the action.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`status`](Self::status).
    fn set_power(
        &self,
        action: PowerAction,
    ) -> impl Future<Output = Result<LightStatus, ClientError>> + Send;

    /// Sets an absolute brightness level and returns the device-reported
    /// state after the change.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`status`](Self::status).
    fn set_brightness(
        &self,
        level: Brightness,
    ) -> impl Future<Output = Result<LightStatus, ClientError>> + Send;

    /// Starts or stops a device-resident brightness ramp.
    ///
    /// The device keeps ramping autonomously until told to stop, so the
    /// response carries no state worth reading; only the acknowledgement
    /// matters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unreachable`] on transport failure and
    /// [`ClientError::Status`] on a non-2xx answer.
    fn dim(&self, motion: DimMotion, step: u8) -> impl Future<Output = Result<(), ClientError>> + Send;
}

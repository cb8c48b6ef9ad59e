// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `DimCtl` library.
//!
//! This module provides the error hierarchy for failures across the library:
//! value validation, device communication, and configuration loading.
//!
//! Rejected state-machine transitions are deliberately NOT represented here.
//! A transition request that is not reachable from the current state is an
//! expected race (a stale asynchronous completion arriving after a reset) and
//! is ignored as a no-op rather than surfaced as an error.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while communicating with a device.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// Error occurred while loading or validating configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An invalid power action string was provided.
    #[error("invalid power action: {0}")]
    InvalidPowerAction(String),

    /// An invalid dim direction string was provided.
    #[error("invalid dim direction: {0}")]
    InvalidDirection(String),
}

/// Errors related to device communication.
///
/// Transport failures and HTTP-level failures are normalized into this
/// uniform outcome. Callers never retry automatically; the next physical
/// button interaction is the implicit retry mechanism.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The device could not be reached (connect failure, timeout, broken
    /// transfer).
    #[error("device unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The device answered with a non-success HTTP status.
    #[error("device returned HTTP {code}")]
    Status {
        /// The HTTP status code reported by the device.
        code: u16,
    },

    /// The device answered 2xx but the body did not decode as a status
    /// report.
    #[error("malformed status body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// The configured endpoint address could not be turned into a URL.
    #[error("invalid endpoint address: {0}")]
    InvalidAddress(String),
}

/// Errors related to loading and validating the binding configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration store could not be read at all.
    #[error("configuration store unavailable: {0}")]
    Unavailable(String),

    /// The store has no value under the binding-list key.
    #[error("no binding list under key {0:?}")]
    MissingBindingList(String),

    /// The stored value did not decode as the expected JSON shape.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    /// An input channel is claimed more than once, either twice within one
    /// binding or by two different bindings.
    #[error("channel {channel} claimed more than once (seen again in binding {binding:?})")]
    ChannelOverlap {
        /// The contested channel index.
        channel: u8,
        /// The binding in which the duplicate claim was found.
        binding: String,
    },

    /// Two channels within one binding map to the same direction.
    #[error("binding {binding:?} maps direction {direction:?} more than once")]
    DuplicateDirection {
        /// The offending binding.
        binding: String,
        /// The direction that was mapped twice.
        direction: String,
    },

    /// An `auth` string value did not start with `@`.
    ///
    /// String-valued auth entries are indirect store references and must
    /// carry the `@` prefix; anything else is a configuration mistake, not
    /// a secret.
    #[error("auth reference {reference:?} in binding {binding:?} must start with '@'")]
    BadAuthReference {
        /// The offending binding.
        binding: String,
        /// The raw string found in the configuration.
        reference: String,
    },

    /// A field value was recognized syntactically but is semantically
    /// invalid for this binding.
    #[error("binding {binding:?}: invalid {field}: {message}")]
    InvalidField {
        /// The offending binding.
        binding: String,
        /// The field that failed validation.
        field: &'static str,
        /// Description of the failure.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

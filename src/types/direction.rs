// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimming direction and ramp motion types.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A configured dimming direction for a button channel.
///
/// This is what a binding's button map assigns to a channel: holding that
/// button ramps brightness up or down.
///
/// # Examples
///
/// ```
/// use dimctl_lib::types::DimDirection;
///
/// let dir: DimDirection = "up".parse().unwrap();
/// assert_eq!(dir, DimDirection::Up);
/// assert_eq!(dir.as_str(), "up");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimDirection {
    /// Ramp brightness towards 100%.
    Up,
    /// Ramp brightness towards the configured floor.
    Down,
}

impl DimDirection {
    /// Returns the configuration/wire word for this direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for DimDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DimDirection {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(ValueError::InvalidDirection(s.to_string())),
        }
    }
}

/// A motion command for a device-resident ramp.
///
/// Unlike [`DimDirection`], which is a configuration value, `DimMotion` is
/// the verb sent on the wire in the `dim=` query parameter: it includes
/// `Stop`, which ends a running ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimMotion {
    /// Start ramping up.
    Up,
    /// Start ramping down.
    Down,
    /// Stop a running ramp.
    Stop,
}

impl DimMotion {
    /// Returns the wire word used in the device's `dim=` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for DimMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<DimDirection> for DimMotion {
    fn from(direction: DimDirection) -> Self {
        match direction {
            DimDirection::Up => Self::Up,
            DimDirection::Down => Self::Down,
        }
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power actions for dimmable light devices.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A power action to apply to a light.
///
/// # Examples
///
/// ```
/// use dimctl_lib::types::PowerAction;
///
/// assert_eq!(PowerAction::On.as_str(), "on");
/// assert_eq!(PowerAction::Off.as_str(), "off");
/// assert_eq!(PowerAction::Toggle.as_str(), "toggle");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerAction {
    /// Turn the light off.
    Off,
    /// Turn the light on.
    On,
    /// Invert the current power state.
    Toggle,
}

impl PowerAction {
    /// Returns the wire word used in the device's `turn=` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Toggle => "toggle",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerAction {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "0" | "false" => Ok(Self::Off),
            "on" | "1" | "true" => Ok(Self::On),
            "toggle" => Ok(Self::Toggle),
            _ => Err(ValueError::InvalidPowerAction(s.to_string())),
        }
    }
}

impl From<bool> for PowerAction {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-reported light status.

use std::fmt;

use serde::Deserialize;

use crate::types::Brightness;

/// The state a light device reports about itself.
///
/// Decoded from the device's status JSON body, which uses the `ison` and
/// `brightness` fields; any other fields the device includes are ignored.
///
/// # Examples
///
/// ```
/// use dimctl_lib::types::LightStatus;
///
/// let status: LightStatus =
///     serde_json::from_str(r#"{"ison": true, "brightness": 40, "mode": "white"}"#).unwrap();
/// assert!(status.is_on);
/// assert_eq!(status.brightness.value(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LightStatus {
    /// Whether the light is currently on.
    #[serde(rename = "ison")]
    pub is_on: bool,
    /// Current brightness level.
    pub brightness: Brightness,
}

impl fmt::Display for LightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on {
            write!(f, "on at {}", self.brightness)
        } else {
            write!(f, "off at {}", self.brightness)
        }
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for dimmable lights.
//!
//! This module provides a type-safe representation of brightness values,
//! ensuring values are always within the valid range of 0-100%.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::DimDirection;

/// Brightness level as a percentage (0-100).
///
/// Dimmable light devices report and accept brightness as a percentage,
/// where 0 is fully dimmed and 100 is full brightness.
///
/// # Examples
///
/// ```
/// use dimctl_lib::types::Brightness;
///
/// // Create a brightness at 75%
/// let level = Brightness::new(75).unwrap();
/// assert_eq!(level.value(), 75);
///
/// // Use predefined values
/// let min = Brightness::MIN;
/// let max = Brightness::MAX;
/// assert_eq!(min.value(), 0);
/// assert_eq!(max.value(), 100);
///
/// // Invalid values return error
/// assert!(Brightness::new(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Brightness(u8);

impl Brightness {
    /// Minimum brightness value (0%).
    pub const MIN: Self = Self(0);

    /// Maximum brightness value (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new brightness value.
    ///
    /// # Arguments
    ///
    /// * `value` - The brightness percentage (0-100)
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a brightness value, clamping to the valid range.
    ///
    /// Values above 100 are clamped to 100.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Returns the brightness percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns this level nudged by `step` in `direction`, clamped to
    /// `[floor, 100]`.
    ///
    /// Stepping up saturates at 100; stepping down never goes below
    /// `floor`. When the result equals the current level, the clamp
    /// boundary has been reached and no further change is possible.
    ///
    /// # Examples
    ///
    /// ```
    /// use dimctl_lib::types::{Brightness, DimDirection};
    ///
    /// let floor = Brightness::new(10).unwrap();
    /// let level = Brightness::new(95).unwrap();
    ///
    /// let up = level.stepped(DimDirection::Up, 10, floor);
    /// assert_eq!(up, Brightness::MAX);
    ///
    /// let down = Brightness::new(12).unwrap().stepped(DimDirection::Down, 10, floor);
    /// assert_eq!(down, floor);
    /// ```
    #[must_use]
    pub fn stepped(self, direction: DimDirection, step: u8, floor: Self) -> Self {
        match direction {
            DimDirection::Up => Self::clamped(self.0.saturating_add(step)),
            DimDirection::Down => {
                let lowered = self.0.saturating_sub(step);
                if lowered < floor.0 { floor } else { Self(lowered) }
            }
        }
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Brightness {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Brightness> for u8 {
    fn from(value: Brightness) -> Self {
        value.0
    }
}

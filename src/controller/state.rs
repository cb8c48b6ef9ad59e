// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller machine states and the transition table.

use std::fmt;

/// The phases a dimmer controller moves through for one press cycle.
///
/// `Idle` is both the initial and the terminal state; every other state
/// belongs to exactly one in-flight press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MachineState {
    /// No press cycle in flight.
    #[default]
    Idle,
    /// A press arrived; the device status fetch is in flight.
    FetchingStatus,
    /// Status known; waiting out the remainder of the long-press
    /// threshold.
    AwaitingLongPress,
    /// Threshold elapsed; turning the light on if it was off.
    EnsuringOn,
    /// Ramping brightness until release or a clamp boundary.
    Dimming,
}

impl MachineState {
    /// Returns whether this state may transition to `to`.
    ///
    /// This adjacency check runs on every transition request, whatever
    /// prompted it. Asynchronous completions re-validate through it, so a
    /// stale callback arriving after the machine was reset finds its
    /// transition no longer permitted and becomes a no-op instead of
    /// corrupting a newer cycle.
    #[must_use]
    pub const fn permits(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::FetchingStatus | Self::Idle)
                | (Self::FetchingStatus, Self::AwaitingLongPress | Self::Idle)
                | (Self::AwaitingLongPress, Self::EnsuringOn | Self::Idle)
                | (Self::EnsuringOn, Self::Dimming | Self::Idle)
                | (Self::Dimming, Self::Dimming | Self::Idle)
        )
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::FetchingStatus => "fetching-status",
            Self::AwaitingLongPress => "awaiting-long-press",
            Self::EnsuringOn => "ensuring-on",
            Self::Dimming => "dimming",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::MachineState::{AwaitingLongPress, Dimming, EnsuringOn, FetchingStatus, Idle};

    const ALL: [super::MachineState; 5] =
        [Idle, FetchingStatus, AwaitingLongPress, EnsuringOn, Dimming];

    #[test]
    fn every_state_may_reset_to_idle() {
        for state in ALL {
            assert!(state.permits(Idle), "{state} must permit reset");
        }
    }

    #[test]
    fn forward_chain_is_permitted() {
        assert!(Idle.permits(FetchingStatus));
        assert!(FetchingStatus.permits(AwaitingLongPress));
        assert!(AwaitingLongPress.permits(EnsuringOn));
        assert!(EnsuringOn.permits(Dimming));
        assert!(Dimming.permits(Dimming));
    }

    #[test]
    fn stale_completions_are_rejected() {
        // A status fetch that completes after a reset must not re-enter
        // the waiting phase.
        assert!(!Idle.permits(AwaitingLongPress));
        // A power-on that completes after a reset must not start dimming.
        assert!(!Idle.permits(Dimming));
        // A long-press timer firing after a reset must not start the
        // ensure-on phase.
        assert!(!Idle.permits(EnsuringOn));
    }

    #[test]
    fn no_skipping_forward() {
        assert!(!Idle.permits(Dimming));
        assert!(!FetchingStatus.permits(EnsuringOn));
        assert!(!FetchingStatus.permits(Dimming));
        assert!(!AwaitingLongPress.permits(Dimming));
    }

    #[test]
    fn no_moving_backward() {
        assert!(!Dimming.permits(EnsuringOn));
        assert!(!Dimming.permits(AwaitingLongPress));
        assert!(!EnsuringOn.permits(FetchingStatus));
        assert!(!AwaitingLongPress.permits(FetchingStatus));
    }

    #[test]
    fn only_idle_and_dimming_self_loop() {
        for state in ALL {
            let expected = matches!(state, Idle | Dimming);
            assert_eq!(state.permits(state), expected, "{state} self-loop");
        }
    }
}

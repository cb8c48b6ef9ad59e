// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-binding dimmer controllers.
//!
//! Each configured binding gets one [`DimmerController`]: a state machine
//! that turns the binding's button edges into device commands. A press
//! starts a status fetch; a release before the long-press threshold
//! toggles the light; holding past the threshold ensures the light is on
//! and ramps brightness in the button's direction until release.
//!
//! The machine's five states and their legal transitions live in
//! [`MachineState`]; everything that asks for a transition, including
//! late-arriving completions of device calls, is checked against that
//! table and silently dropped when the machine has since moved on.

mod machine;
mod state;

pub use machine::{ButtonEdge, DimmerController};
pub use state::MachineState;

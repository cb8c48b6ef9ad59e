// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binding configuration: the button-pair-to-device associations.
//!
//! Bindings are stored as a JSON array under the [`BINDINGS_KEY`] store
//! key. Each element looks like:
//!
//! ```json
//! {
//!   "id": "hall",
//!   "btn": {"0": "up", "1": "down"},
//!   "dev": {"addr": "192.168.1.40", "auth": "@hall-creds"},
//!   "long_press_ms": 500,
//!   "dim": {"mode": "client", "step": 10, "step_interval_ms": 100, "min_brightness": 10}
//! }
//! ```
//!
//! `auth` is `null`, an inline `{"id": ..., "pw": ...}` object, or a
//! string starting with `@` naming another store key holding such an
//! object. `id`, `long_press_ms` and `dim` are optional.
//!
//! Bindings are loaded once at startup and are immutable for the life of
//! the process.

mod loader;
mod resolver;

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use serde::Deserialize;

pub use loader::{BINDINGS_KEY, load_bindings};
pub use resolver::resolve_credentials;

use crate::error::ConfigError;
use crate::protocol::Credentials;
use crate::types::{Brightness, DimDirection};

/// A binding's declared authentication, before resolution.
#[derive(Debug, Clone)]
pub enum AuthSpec {
    /// Credentials written directly into the binding.
    Inline(Credentials),
    /// The name of another store key holding the credentials
    /// (the `@` prefix already stripped).
    Reference(String),
}

/// How a binding ramps brightness during a long press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RampMode {
    /// One start command; the device ramps autonomously until told to
    /// stop.
    #[default]
    Device,
    /// The controller nudges brightness by a fixed step on a repeating
    /// timer.
    Client,
}

/// Per-binding timing and ramp tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning {
    /// Press duration that separates a toggle from a dim.
    pub long_press: Duration,
    /// Ramp strategy.
    pub ramp: RampMode,
    /// Brightness step per ramp command or tick.
    pub step: u8,
    /// Interval between client-driven ramp ticks.
    pub step_interval: Duration,
    /// Lowest brightness the ramp will dim down to.
    pub min_brightness: Brightness,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            long_press: Duration::from_millis(500),
            ramp: RampMode::Device,
            step: 10,
            step_interval: Duration::from_millis(100),
            min_brightness: Brightness::clamped(10),
        }
    }
}

/// Mapping from input channels to dimming directions.
///
/// Within one binding, at most one channel maps to each direction; a
/// binding may define a single direction only.
#[derive(Debug, Clone, Default)]
pub struct ButtonMap {
    entries: Vec<(u8, DimDirection)>,
}

impl ButtonMap {
    /// Builds a map from channel/direction pairs.
    ///
    /// Maps coming out of [`parse_bindings`] are already validated for
    /// overlap; embedders constructing bindings programmatically are
    /// trusted to pass distinct channels and directions.
    #[must_use]
    pub fn new(entries: Vec<(u8, DimDirection)>) -> Self {
        Self { entries }
    }

    /// Returns the direction mapped to `channel`, if any.
    #[must_use]
    pub fn direction(&self, channel: u8) -> Option<DimDirection> {
        self.entries
            .iter()
            .find(|(ch, _)| *ch == channel)
            .map(|(_, dir)| *dir)
    }

    /// Returns true if `channel` is mapped.
    #[must_use]
    pub fn contains(&self, channel: u8) -> bool {
        self.direction(channel).is_some()
    }

    /// Iterates over the mapped channel indices.
    pub fn channels(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().map(|(ch, _)| *ch)
    }

    /// Returns the number of mapped channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no channel is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The device half of a binding.
#[derive(Debug, Clone)]
pub struct DeviceSpec {
    /// Endpoint address (host, `host:port`, or full URL prefix).
    pub addr: String,
    /// Declared authentication, not yet resolved.
    pub auth: Option<AuthSpec>,
}

/// One configured button-pair-to-device association.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Unique binding identifier, human-assigned or index-derived.
    pub id: String,
    /// Which input channels drive which directions.
    pub buttons: ButtonMap,
    /// The target device.
    pub device: DeviceSpec,
    /// Timing and ramp tuning.
    pub tuning: Tuning,
}

/// A binding whose credentials have been resolved.
#[derive(Debug, Clone)]
pub struct ResolvedBinding {
    /// The binding as configured.
    pub binding: Binding,
    /// The resolved credential pair, or `None` when absent or
    /// unresolvable (the binding proceeds unauthenticated).
    pub credentials: Option<Credentials>,
}

// ============================================================================
// Raw JSON shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawBinding {
    #[serde(default)]
    id: Option<String>,
    btn: BTreeMap<String, String>,
    dev: RawDevice,
    #[serde(default)]
    long_press_ms: Option<u64>,
    #[serde(default)]
    dim: Option<RawDim>,
}

#[derive(Debug, Deserialize)]
struct RawDevice {
    addr: String,
    #[serde(default)]
    auth: Option<RawAuth>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAuth {
    Inline { id: String, pw: String },
    Reference(String),
}

#[derive(Debug, Default, Deserialize)]
struct RawDim {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    step: Option<u8>,
    #[serde(default)]
    step_interval_ms: Option<u64>,
    #[serde(default)]
    min_brightness: Option<u8>,
}

// ============================================================================
// Parsing + validation
// ============================================================================

/// Decodes and validates a binding list from its stored JSON text.
///
/// A channel index claimed by more than one binding is rejected: silently
/// letting the last-loaded binding win would leave one button dead with no
/// trace of why.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for JSON-shape problems and the more
/// specific variants for semantic ones (channel overlap, duplicate
/// direction, bad auth reference, out-of-range tuning values).
pub fn parse_bindings(text: &str) -> Result<Vec<Binding>, ConfigError> {
    let raw: Vec<RawBinding> = serde_json::from_str(text)?;

    let mut seen_ids = HashSet::new();
    let mut seen_channels = HashSet::new();
    let mut bindings = Vec::with_capacity(raw.len());

    for (idx, raw_binding) in raw.into_iter().enumerate() {
        let id = raw_binding
            .id
            .unwrap_or_else(|| format!("binding{idx}"));

        if !seen_ids.insert(id.clone()) {
            return Err(ConfigError::InvalidField {
                binding: id,
                field: "id",
                message: "duplicate binding id".to_string(),
            });
        }

        let buttons = parse_button_map(&id, &raw_binding.btn, &mut seen_channels)?;
        let auth = parse_auth(&id, raw_binding.dev.auth)?;
        let tuning = parse_tuning(&id, raw_binding.long_press_ms, raw_binding.dim)?;

        bindings.push(Binding {
            id,
            buttons,
            device: DeviceSpec {
                addr: raw_binding.dev.addr,
                auth,
            },
            tuning,
        });
    }

    Ok(bindings)
}

fn parse_button_map(
    id: &str,
    raw: &BTreeMap<String, String>,
    seen_channels: &mut HashSet<u8>,
) -> Result<ButtonMap, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::InvalidField {
            binding: id.to_string(),
            field: "btn",
            message: "at least one channel must be mapped".to_string(),
        });
    }

    let mut entries = Vec::with_capacity(raw.len());
    let mut seen_directions = HashSet::new();

    for (channel_text, direction_text) in raw {
        let channel: u8 =
            channel_text
                .parse()
                .map_err(|_| ConfigError::InvalidField {
                    binding: id.to_string(),
                    field: "btn",
                    message: format!("channel {channel_text:?} is not a valid index"),
                })?;
        let direction: DimDirection =
            direction_text
                .parse()
                .map_err(|_| ConfigError::InvalidField {
                    binding: id.to_string(),
                    field: "btn",
                    message: format!("direction {direction_text:?} is not up or down"),
                })?;

        if !seen_channels.insert(channel) {
            return Err(ConfigError::ChannelOverlap {
                channel,
                binding: id.to_string(),
            });
        }
        if !seen_directions.insert(direction) {
            return Err(ConfigError::DuplicateDirection {
                binding: id.to_string(),
                direction: direction.as_str().to_string(),
            });
        }

        entries.push((channel, direction));
    }

    Ok(ButtonMap { entries })
}

fn parse_auth(id: &str, raw: Option<RawAuth>) -> Result<Option<AuthSpec>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(RawAuth::Inline { id: username, pw }) => Ok(Some(AuthSpec::Inline(Credentials {
            username,
            password: pw,
        }))),
        Some(RawAuth::Reference(reference)) => match reference.strip_prefix('@') {
            Some(key) if !key.is_empty() => Ok(Some(AuthSpec::Reference(key.to_string()))),
            _ => Err(ConfigError::BadAuthReference {
                binding: id.to_string(),
                reference,
            }),
        },
    }
}

fn parse_tuning(
    id: &str,
    long_press_ms: Option<u64>,
    dim: Option<RawDim>,
) -> Result<Tuning, ConfigError> {
    let mut tuning = Tuning::default();

    if let Some(ms) = long_press_ms {
        tuning.long_press = Duration::from_millis(ms);
    }

    let dim = dim.unwrap_or_default();

    if let Some(mode) = dim.mode {
        tuning.ramp = match mode.as_str() {
            "device" => RampMode::Device,
            "client" => RampMode::Client,
            other => {
                return Err(ConfigError::InvalidField {
                    binding: id.to_string(),
                    field: "dim.mode",
                    message: format!("{other:?} is not device or client"),
                });
            }
        };
    }

    if let Some(step) = dim.step {
        if step == 0 || step > 100 {
            return Err(ConfigError::InvalidField {
                binding: id.to_string(),
                field: "dim.step",
                message: format!("step {step} is out of range [1, 100]"),
            });
        }
        tuning.step = step;
    }

    if let Some(ms) = dim.step_interval_ms {
        if ms == 0 {
            return Err(ConfigError::InvalidField {
                binding: id.to_string(),
                field: "dim.step_interval_ms",
                message: "interval must be at least 1 ms".to_string(),
            });
        }
        tuning.step_interval = Duration::from_millis(ms);
    }

    if let Some(level) = dim.min_brightness {
        tuning.min_brightness =
            Brightness::new(level).map_err(|e| ConfigError::InvalidField {
                binding: id.to_string(),
                field: "dim.min_brightness",
                message: e.to_string(),
            })?;
    }

    Ok(tuning)
}

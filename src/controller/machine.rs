// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The per-binding dimmer state machine.
//!
//! One machine instance runs per binding, as one tokio task owning its
//! mutable state exclusively. Button edges, device-call completions, and
//! timer fires are all serialized through that task's select loop, so no
//! locking is needed within a binding; machines for different bindings
//! interleave freely.
//!
//! Device calls run in spawned sub-tasks so a release edge is never stuck
//! behind an in-flight request. Completions come back tagged with the
//! press epoch they belong to, and every transition they request is
//! re-validated against the table in [`MachineState::permits`]: a stale
//! completion either carries an old epoch or asks for a transition the
//! current state no longer permits, and is dropped either way.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, sleep_until};

use crate::config::{Binding, ButtonMap, RampMode, Tuning};
use crate::error::ClientError;
use crate::protocol::LightApi;
use crate::types::{Brightness, DimDirection, DimMotion, LightStatus, PowerAction};

use super::state::MachineState;

/// Queue capacity for button edges and for internal completions.
const QUEUE_CAPACITY: usize = 32;

/// A physical button state transition on one input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge {
    /// The input channel that changed.
    pub channel: u8,
    /// True on press, false on release.
    pub pressed: bool,
}

impl ButtonEdge {
    /// A press edge on `channel`.
    #[must_use]
    pub const fn press(channel: u8) -> Self {
        Self {
            channel,
            pressed: true,
        }
    }

    /// A release edge on `channel`.
    #[must_use]
    pub const fn release(channel: u8) -> Self {
        Self {
            channel,
            pressed: false,
        }
    }
}

/// Completions posted back by spawned device calls.
#[derive(Debug)]
enum Completion {
    StatusFetched {
        epoch: u64,
        result: Result<LightStatus, ClientError>,
    },
    PowerEnsured {
        epoch: u64,
        result: Result<LightStatus, ClientError>,
    },
}

/// Which timer the machine is waiting on.
///
/// At most one timer is armed at a time: the long-press timer exists only
/// in `AwaitingLongPress`, the step timer only while client-ramp dimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wakeup {
    LongPress,
    Step,
}

/// Handle to one running dimmer controller.
///
/// Spawning a controller starts its machine task; the handle is how the
/// router delivers edges and how embedders observe the machine state.
///
/// # Examples
///
/// ```no_run
/// use dimctl_lib::config::parse_bindings;
/// use dimctl_lib::controller::{ButtonEdge, DimmerController};
/// use dimctl_lib::protocol::EndpointConfig;
///
/// # async fn example() -> dimctl_lib::Result<()> {
/// let bindings = parse_bindings(r#"[{"btn": {"0": "up"}, "dev": {"addr": "h"}}]"#)?;
/// let client = EndpointConfig::new(&bindings[0].device.addr).into_client()?;
/// let controller = DimmerController::spawn(&bindings[0], client);
///
/// controller.send(ButtonEdge::press(0)).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DimmerController {
    id: String,
    edge_tx: mpsc::Sender<ButtonEdge>,
    state_rx: watch::Receiver<MachineState>,
    handle: JoinHandle<()>,
}

impl DimmerController {
    /// Spawns the machine task for `binding`.
    #[must_use]
    pub fn spawn<C>(binding: &Binding, client: C) -> Self
    where
        C: LightApi + Clone + Send + Sync + 'static,
    {
        let (edge_tx, edge_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (done_tx, done_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (state_tx, state_rx) = watch::channel(MachineState::Idle);

        let machine = Machine {
            id: binding.id.clone(),
            buttons: binding.buttons.clone(),
            tuning: binding.tuning,
            client,
            done_tx,
            state_tx,
            state: MachineState::Idle,
            pressed_at: None,
            direction: None,
            status: None,
            epoch: 0,
            timer: None,
        };

        let handle = tokio::spawn(machine.run(edge_rx, done_rx));

        Self {
            id: binding.id.clone(),
            edge_tx,
            state_rx,
            handle,
        }
    }

    /// Returns the binding id this controller serves.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a cloneable sender for delivering button edges.
    #[must_use]
    pub fn edge_sender(&self) -> mpsc::Sender<ButtonEdge> {
        self.edge_tx.clone()
    }

    /// Delivers one button edge.
    ///
    /// Returns false if the machine task has stopped.
    pub async fn send(&self, edge: ButtonEdge) -> bool {
        self.edge_tx.send(edge).await.is_ok()
    }

    /// Returns the machine's current state.
    #[must_use]
    pub fn machine_state(&self) -> MachineState {
        *self.state_rx.borrow()
    }

    /// Stops the machine task and waits for it to exit.
    ///
    /// Edge senders handed out earlier keep the task alive until they are
    /// dropped too.
    pub async fn shutdown(self) {
        drop(self.edge_tx);
        let _ = self.handle.await;
    }
}

/// The state machine proper. Owned by its task; never shared.
struct Machine<C> {
    id: String,
    buttons: ButtonMap,
    tuning: Tuning,
    client: C,
    done_tx: mpsc::Sender<Completion>,
    state_tx: watch::Sender<MachineState>,
    state: MachineState,
    /// When the triggering press began.
    pressed_at: Option<Instant>,
    /// Direction the current press will dim in.
    direction: Option<DimDirection>,
    /// Last-known device status.
    status: Option<LightStatus>,
    /// Press generation; completions from a superseded press are dropped.
    epoch: u64,
    timer: Option<(Wakeup, Instant)>,
}

impl<C> Machine<C>
where
    C: LightApi + Clone + Send + Sync + 'static,
{
    async fn run(
        mut self,
        mut edge_rx: mpsc::Receiver<ButtonEdge>,
        mut done_rx: mpsc::Receiver<Completion>,
    ) {
        tracing::debug!(binding = %self.id, "controller started");

        loop {
            let timer = self.timer;
            tokio::select! {
                edge = edge_rx.recv() => {
                    match edge {
                        Some(edge) => self.on_edge(edge),
                        None => break,
                    }
                }
                Some(completion) = done_rx.recv() => {
                    self.on_completion(completion);
                }
                () = sleep_until(timer.map_or_else(far_future, |(_, at)| at)), if timer.is_some() => {
                    if let Some((wakeup, _)) = self.timer.take() {
                        self.on_wakeup(wakeup);
                    }
                }
            }
        }

        tracing::debug!(binding = %self.id, "controller stopped");
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Requests a transition, consulting the table.
    ///
    /// A rejected request is a no-op: that is how stale completions die.
    fn try_enter(&mut self, next: MachineState) -> bool {
        if !self.state.permits(next) {
            tracing::trace!(
                binding = %self.id,
                from = %self.state,
                to = %next,
                "transition rejected"
            );
            return false;
        }

        tracing::debug!(binding = %self.id, from = %self.state, to = %next, "state transition");
        self.state = next;
        self.state_tx.send_replace(next);

        if next == MachineState::Idle {
            self.clear_cycle();
        }
        true
    }

    /// Idle entry action. Idempotent: clearing an already-clear cycle
    /// changes nothing.
    fn clear_cycle(&mut self) {
        self.pressed_at = None;
        self.direction = None;
        self.timer = None;
    }

    // =========================================================================
    // Button edges
    // =========================================================================

    fn on_edge(&mut self, edge: ButtonEdge) {
        let Some(direction) = self.buttons.direction(edge.channel) else {
            tracing::trace!(
                binding = %self.id,
                channel = edge.channel,
                "edge on unmapped channel ignored"
            );
            return;
        };

        if edge.pressed {
            self.on_press(direction);
        } else {
            self.on_release();
        }
    }

    fn on_press(&mut self, direction: DimDirection) {
        if self.state != MachineState::Idle {
            // A new press supersedes whatever was in flight.
            if self.state == MachineState::Dimming {
                self.stop_ramp();
            }
            self.try_enter(MachineState::Idle);
        }

        self.epoch += 1;
        self.pressed_at = Some(Instant::now());
        self.direction = Some(direction);

        if self.try_enter(MachineState::FetchingStatus) {
            self.spawn_status_fetch();
        }
    }

    fn on_release(&mut self) {
        match self.state {
            // Released before the threshold elapsed: a short press. A
            // fetch that failed mid-press lands here too and still
            // toggles.
            MachineState::FetchingStatus | MachineState::AwaitingLongPress => {
                self.spawn_toggle();
                self.try_enter(MachineState::Idle);
            }
            MachineState::Dimming => {
                self.stop_ramp();
                self.try_enter(MachineState::Idle);
            }
            MachineState::Idle | MachineState::EnsuringOn => {
                self.try_enter(MachineState::Idle);
            }
        }
    }

    // =========================================================================
    // Completions and timers
    // =========================================================================

    fn on_completion(&mut self, completion: Completion) {
        match completion {
            Completion::StatusFetched { epoch, result } => self.on_status_fetched(epoch, result),
            Completion::PowerEnsured { epoch, result } => self.on_power_ensured(epoch, result),
        }
    }

    fn on_status_fetched(&mut self, epoch: u64, result: Result<LightStatus, ClientError>) {
        if epoch != self.epoch {
            tracing::trace!(binding = %self.id, "stale status fetch dropped");
            return;
        }

        match result {
            Ok(status) => {
                self.status = Some(status);
                if self.try_enter(MachineState::AwaitingLongPress) {
                    self.arm_long_press_timer();
                }
            }
            Err(e) => {
                // Stay in FetchingStatus: the release (or the next press)
                // decides what happens.
                tracing::warn!(binding = %self.id, error = %e, "status fetch failed");
            }
        }
    }

    /// Arms the long-press one-shot for whatever remains of the
    /// threshold, compensating for time the status fetch consumed, so the
    /// press-to-dim latency stays bounded by the configured threshold.
    fn arm_long_press_timer(&mut self) {
        let elapsed = self
            .pressed_at
            .map_or(Duration::ZERO, |pressed_at| pressed_at.elapsed());
        let remaining = self
            .tuning
            .long_press
            .saturating_sub(elapsed)
            .max(Duration::from_millis(1));
        self.timer = Some((Wakeup::LongPress, Instant::now() + remaining));
    }

    fn on_wakeup(&mut self, wakeup: Wakeup) {
        match wakeup {
            Wakeup::LongPress => self.on_long_press_elapsed(),
            Wakeup::Step => self.on_step_tick(),
        }
    }

    fn on_long_press_elapsed(&mut self) {
        if !self.try_enter(MachineState::EnsuringOn) {
            return;
        }

        match self.status {
            Some(status) if status.is_on => self.begin_dimming(),
            _ => self.spawn_power_on(),
        }
    }

    fn on_power_ensured(&mut self, epoch: u64, result: Result<LightStatus, ClientError>) {
        if epoch != self.epoch {
            tracing::trace!(binding = %self.id, "stale power-on dropped");
            return;
        }

        match result {
            Ok(status) => {
                self.status = Some(status);
                self.begin_dimming();
            }
            Err(e) => {
                // Stay in EnsuringOn; release resets to idle.
                tracing::warn!(binding = %self.id, error = %e, "power-on failed");
            }
        }
    }

    // =========================================================================
    // Dimming
    // =========================================================================

    fn begin_dimming(&mut self) {
        if !self.try_enter(MachineState::Dimming) {
            return;
        }

        let Some(direction) = self.direction else {
            self.try_enter(MachineState::Idle);
            return;
        };

        match self.tuning.ramp {
            RampMode::Device => self.spawn_dim(DimMotion::from(direction)),
            RampMode::Client => {
                self.timer = Some((Wakeup::Step, Instant::now() + self.tuning.step_interval));
            }
        }
    }

    /// One client-ramp tick: nudge brightness by the configured step,
    /// clamped to `[min_brightness, 100]`, and stop once the clamp
    /// boundary leaves nothing to change.
    fn on_step_tick(&mut self) {
        // Each tick is a Dimming self-transition, re-validated like any
        // other request.
        if !self.try_enter(MachineState::Dimming) {
            return;
        }

        let (Some(direction), Some(status)) = (self.direction, self.status) else {
            self.try_enter(MachineState::Idle);
            return;
        };

        let next = status
            .brightness
            .stepped(direction, self.tuning.step, self.tuning.min_brightness);

        if next == status.brightness {
            tracing::debug!(binding = %self.id, level = %next, "ramp reached clamp boundary");
            self.try_enter(MachineState::Idle);
            return;
        }

        self.status = Some(LightStatus {
            is_on: status.is_on,
            brightness: next,
        });
        self.spawn_set_brightness(next);
        self.timer = Some((Wakeup::Step, Instant::now() + self.tuning.step_interval));
    }

    /// Ends a running ramp. For a device-resident ramp this sends the
    /// stop command; a client-driven ramp just loses its step timer when
    /// the machine re-enters idle.
    fn stop_ramp(&mut self) {
        match self.tuning.ramp {
            RampMode::Device => self.spawn_dim(DimMotion::Stop),
            RampMode::Client => {}
        }
    }

    // =========================================================================
    // Spawned device calls
    // =========================================================================

    fn spawn_status_fetch(&self) {
        let client = self.client.clone();
        let done = self.done_tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let result = client.status().await;
            let _ = done.send(Completion::StatusFetched { epoch, result }).await;
        });
    }

    fn spawn_power_on(&self) {
        let client = self.client.clone();
        let done = self.done_tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let result = client.set_power(PowerAction::On).await;
            let _ = done.send(Completion::PowerEnsured { epoch, result }).await;
        });
    }

    /// Short-press toggle. Fire-and-forget: the machine goes idle
    /// regardless of the outcome.
    fn spawn_toggle(&self) {
        let client = self.client.clone();
        let id = self.id.clone();
        tokio::spawn(async move {
            if let Err(e) = client.set_power(PowerAction::Toggle).await {
                tracing::warn!(binding = %id, error = %e, "toggle failed");
            }
        });
    }

    fn spawn_dim(&self, motion: DimMotion) {
        let client = self.client.clone();
        let id = self.id.clone();
        let step = self.tuning.step;
        tokio::spawn(async move {
            if let Err(e) = client.dim(motion, step).await {
                tracing::warn!(binding = %id, motion = %motion, error = %e, "dim command failed");
            }
        });
    }

    fn spawn_set_brightness(&self, level: Brightness) {
        let client = self.client.clone();
        let id = self.id.clone();
        tokio::spawn(async move {
            if let Err(e) = client.set_brightness(level).await {
                tracing::warn!(binding = %id, level = %level, error = %e, "brightness step failed");
            }
        });
    }
}

/// Placeholder deadline for when no timer is armed; the select branch is
/// disabled then, but its expression is still evaluated.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(60 * 60 * 24 * 365)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tokio::time::{Duration, advance, sleep};

    use super::*;
    use crate::config::{Binding, ButtonMap, DeviceSpec, RampMode, Tuning};
    use crate::types::Brightness;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Status,
        SetPower(PowerAction),
        SetBrightness(u8),
        Dim(DimMotion, u8),
    }

    #[derive(Debug)]
    struct FakeInner {
        is_on: bool,
        brightness: u8,
        calls: Vec<Call>,
    }

    /// Scripted device: records calls, applies power/brightness changes,
    /// and can delay or fail the status fetch.
    #[derive(Debug, Clone)]
    struct FakeLight {
        inner: Arc<Mutex<FakeInner>>,
        status_delay: Duration,
        fail_status: bool,
    }

    impl FakeLight {
        fn new(is_on: bool, brightness: u8) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeInner {
                    is_on,
                    brightness,
                    calls: Vec::new(),
                })),
                status_delay: Duration::ZERO,
                fail_status: false,
            }
        }

        fn with_status_delay(mut self, delay: Duration) -> Self {
            self.status_delay = delay;
            self
        }

        fn with_failing_status(mut self) -> Self {
            self.fail_status = true;
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.inner.lock().calls.clone()
        }

        fn snapshot(&self) -> LightStatus {
            let inner = self.inner.lock();
            LightStatus {
                is_on: inner.is_on,
                brightness: Brightness::clamped(inner.brightness),
            }
        }
    }

    impl LightApi for FakeLight {
        async fn status(&self) -> Result<LightStatus, ClientError> {
            // Snapshot when the request arrives; the delay models the
            // response travelling back.
            self.inner.lock().calls.push(Call::Status);
            let snapshot = self.snapshot();
            sleep(self.status_delay).await;
            if self.fail_status {
                return Err(ClientError::Status { code: 500 });
            }
            Ok(snapshot)
        }

        async fn set_power(&self, action: PowerAction) -> Result<LightStatus, ClientError> {
            {
                let mut inner = self.inner.lock();
                inner.calls.push(Call::SetPower(action));
                inner.is_on = match action {
                    PowerAction::On => true,
                    PowerAction::Off => false,
                    PowerAction::Toggle => !inner.is_on,
                };
            }
            Ok(self.snapshot())
        }

        async fn set_brightness(&self, level: Brightness) -> Result<LightStatus, ClientError> {
            {
                let mut inner = self.inner.lock();
                inner.calls.push(Call::SetBrightness(level.value()));
                inner.brightness = level.value();
            }
            Ok(self.snapshot())
        }

        async fn dim(&self, motion: DimMotion, step: u8) -> Result<(), ClientError> {
            self.inner.lock().calls.push(Call::Dim(motion, step));
            Ok(())
        }
    }

    fn binding(ramp: RampMode) -> Binding {
        Binding {
            id: "test".to_string(),
            buttons: ButtonMap::new(vec![(0, DimDirection::Up), (1, DimDirection::Down)]),
            device: DeviceSpec {
                addr: "unused".to_string(),
                auth: None,
            },
            tuning: Tuning {
                ramp,
                ..Tuning::default()
            },
        }
    }

    // Default threshold is 500 ms; the fake fetch completes after
    // `status_delay`. Paused time makes these scenarios exact.

    #[tokio::test(start_paused = true)]
    async fn short_press_toggles_once() {
        let light = FakeLight::new(false, 30).with_status_delay(Duration::from_millis(120));
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        controller.send(ButtonEdge::press(0)).await;
        sleep(Duration::from_millis(200)).await;
        assert_eq!(controller.machine_state(), MachineState::AwaitingLongPress);

        controller.send(ButtonEdge::release(0)).await;
        sleep(Duration::from_millis(50)).await;

        assert_eq!(
            light.calls(),
            vec![Call::Status, Call::SetPower(PowerAction::Toggle)]
        );
        assert_eq!(controller.machine_state(), MachineState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn long_press_powers_on_then_dims() {
        let light = FakeLight::new(false, 30).with_status_delay(Duration::from_millis(120));
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        controller.send(ButtonEdge::press(0)).await;
        sleep(Duration::from_millis(600)).await;

        assert_eq!(controller.machine_state(), MachineState::Dimming);
        assert_eq!(
            light.calls(),
            vec![
                Call::Status,
                Call::SetPower(PowerAction::On),
                Call::Dim(DimMotion::Up, 10),
            ]
        );

        controller.send(ButtonEdge::release(0)).await;
        sleep(Duration::from_millis(50)).await;

        assert_eq!(controller.machine_state(), MachineState::Idle);
        assert_eq!(light.calls().last(), Some(&Call::Dim(DimMotion::Stop, 10)));
    }

    #[tokio::test(start_paused = true)]
    async fn long_press_skips_power_on_when_already_on() {
        let light = FakeLight::new(true, 60);
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        controller.send(ButtonEdge::press(1)).await;
        sleep(Duration::from_millis(600)).await;

        assert_eq!(controller.machine_state(), MachineState::Dimming);
        assert_eq!(
            light.calls(),
            vec![Call::Status, Call::Dim(DimMotion::Down, 10)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_latency_does_not_extend_threshold() {
        // Press at t=0, fetch completes at t=120: the long-press timer is
        // armed for the remaining 380 ms, so dimming starts at t=500.
        let light = FakeLight::new(true, 60).with_status_delay(Duration::from_millis(120));
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        controller.send(ButtonEdge::press(0)).await;
        sleep(Duration::from_millis(490)).await;
        assert_eq!(controller.machine_state(), MachineState::AwaitingLongPress);

        sleep(Duration::from_millis(20)).await;
        assert_eq!(controller.machine_state(), MachineState::Dimming);
    }

    #[tokio::test(start_paused = true)]
    async fn release_during_fetch_still_toggles() {
        let light = FakeLight::new(false, 30).with_status_delay(Duration::from_millis(120));
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        controller.send(ButtonEdge::press(0)).await;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(controller.machine_state(), MachineState::FetchingStatus);

        controller.send(ButtonEdge::release(0)).await;
        sleep(Duration::from_millis(700)).await;

        // The fetch completion at t=120 finds the machine idle and its
        // transition rejected; no timer is armed and no dim ever starts.
        assert_eq!(controller.machine_state(), MachineState::Idle);
        assert_eq!(
            light.calls(),
            vec![Call::Status, Call::SetPower(PowerAction::Toggle)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_still_toggles_on_release() {
        let light = FakeLight::new(false, 30)
            .with_status_delay(Duration::from_millis(50))
            .with_failing_status();
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        controller.send(ButtonEdge::press(0)).await;
        sleep(Duration::from_millis(800)).await;
        // Fetch failed: the machine holds in FetchingStatus, no dim
        // starts even past the threshold.
        assert_eq!(controller.machine_state(), MachineState::FetchingStatus);

        controller.send(ButtonEdge::release(0)).await;
        sleep(Duration::from_millis(50)).await;

        assert_eq!(controller.machine_state(), MachineState::Idle);
        assert_eq!(
            light.calls(),
            vec![Call::Status, Call::SetPower(PowerAction::Toggle)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_fetch_from_superseded_press_is_dropped() {
        // The first press's fetch snapshots the light ON but is slow to
        // return. Before it does, a short release toggles the light OFF
        // and a second press starts a new cycle. The stale completion
        // carries the old epoch and must not feed the new cycle its
        // outdated ON status: the new cycle has to power the light on
        // before dimming.
        let light = FakeLight::new(true, 60).with_status_delay(Duration::from_millis(200));
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        controller.send(ButtonEdge::press(0)).await; // fetch #1: sees ON
        sleep(Duration::from_millis(50)).await;
        controller.send(ButtonEdge::release(0)).await; // toggle: light OFF
        sleep(Duration::from_millis(50)).await;
        controller.send(ButtonEdge::press(0)).await; // fetch #2: sees OFF

        // Fetch #1 lands at t=200 mid-cycle-two and is dropped; fetch #2
        // lands at t=300; the threshold fires at t=600.
        sleep(Duration::from_millis(550)).await; // t = 650

        assert_eq!(controller.machine_state(), MachineState::Dimming);
        assert_eq!(
            light.calls(),
            vec![
                Call::Status,
                Call::SetPower(PowerAction::Toggle),
                Call::Status,
                Call::SetPower(PowerAction::On),
                Call::Dim(DimMotion::Up, 10),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn second_press_supersedes_first_cycle() {
        let light = FakeLight::new(true, 60);
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        controller.send(ButtonEdge::press(0)).await;
        sleep(Duration::from_millis(100)).await;
        controller.send(ButtonEdge::press(1)).await;
        sleep(Duration::from_millis(550)).await;

        // Only the second press's cycle reaches dimming, in its own
        // direction.
        assert_eq!(controller.machine_state(), MachineState::Dimming);
        assert_eq!(
            light.calls(),
            vec![Call::Status, Call::Status, Call::Dim(DimMotion::Down, 10)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn client_ramp_steps_and_stops_at_boundary() {
        let light = FakeLight::new(true, 85);
        let controller = DimmerController::spawn(&binding(RampMode::Client), light.clone());

        controller.send(ButtonEdge::press(0)).await;
        // Threshold at t=500, then ticks every 100 ms: 95 at t=600, 100
        // at t=700, boundary found at t=800.
        sleep(Duration::from_millis(850)).await;

        assert_eq!(controller.machine_state(), MachineState::Idle);
        assert_eq!(
            light.calls(),
            vec![
                Call::Status,
                Call::SetBrightness(95),
                Call::SetBrightness(100),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn client_ramp_release_cancels_step_timer() {
        let light = FakeLight::new(true, 50);
        let controller = DimmerController::spawn(&binding(RampMode::Client), light.clone());

        controller.send(ButtonEdge::press(1)).await;
        sleep(Duration::from_millis(650)).await; // one tick: 40
        controller.send(ButtonEdge::release(1)).await;
        sleep(Duration::from_millis(500)).await;

        assert_eq!(controller.machine_state(), MachineState::Idle);
        // No device-side stop command exists in client mode and no
        // further steps run after release.
        assert_eq!(
            light.calls(),
            vec![Call::Status, Call::SetBrightness(40)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn client_ramp_down_respects_floor() {
        let light = FakeLight::new(true, 25);
        let controller = DimmerController::spawn(&binding(RampMode::Client), light.clone());

        controller.send(ButtonEdge::press(1)).await;
        sleep(Duration::from_millis(900)).await;

        // 15 at t=600, floor 10 at t=700, boundary at t=800.
        assert_eq!(controller.machine_state(), MachineState::Idle);
        assert_eq!(
            light.calls(),
            vec![
                Call::Status,
                Call::SetBrightness(15),
                Call::SetBrightness(10),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unmapped_channel_is_ignored() {
        let light = FakeLight::new(true, 50);
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        controller.send(ButtonEdge::press(7)).await;
        sleep(Duration::from_millis(600)).await;

        assert_eq!(controller.machine_state(), MachineState::Idle);
        assert!(light.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn spurious_release_is_a_no_op() {
        let light = FakeLight::new(true, 50);
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        // Two releases with no press: idle re-entry twice, no calls, no
        // errors.
        controller.send(ButtonEdge::release(0)).await;
        controller.send(ButtonEdge::release(0)).await;
        sleep(Duration::from_millis(50)).await;

        assert_eq!(controller.machine_state(), MachineState::Idle);
        assert!(light.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn release_during_dimming_stops_exactly_once() {
        let light = FakeLight::new(true, 60);
        let controller = DimmerController::spawn(&binding(RampMode::Device), light.clone());

        controller.send(ButtonEdge::press(0)).await;
        sleep(Duration::from_millis(550)).await;
        controller.send(ButtonEdge::release(0)).await;
        controller.send(ButtonEdge::release(0)).await;
        sleep(Duration::from_millis(50)).await;

        let stops = light
            .calls()
            .iter()
            .filter(|call| matches!(call, Call::Dim(DimMotion::Stop, _)))
            .count();
        assert_eq!(stops, 1);
        assert_eq!(controller.machine_state(), MachineState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_task() {
        let light = FakeLight::new(true, 50);
        let controller = DimmerController::spawn(&binding(RampMode::Device), light);
        advance(Duration::from_millis(10)).await;
        controller.shutdown().await;
    }
}

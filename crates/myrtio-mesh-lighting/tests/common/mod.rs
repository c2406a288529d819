//! Recording platform shared by the integration suites.

#![allow(dead_code)]

use std::collections::HashMap;

use embassy_time::Duration;
use myrtio_mesh_lighting::{
    CtlServer, KeyValueStore, LightingOutput, LightingServer, ModelTransport, SoftTimers,
    StateResponse, StateUpdate, StoreError, TimerError, TimerId, TimerService, TransportError,
};
use myrtio_mesh_model::{
    RequestMeta, State, StateKind,
    event::{REQUEST_FLAG_NONRELAYED, REQUEST_FLAG_RESPONSE_REQUIRED},
};

/// Owned copy of a reported state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub model_id: u16,
    pub element_index: u16,
    pub current: State<'static>,
    pub target: Option<State<'static>>,
    pub remaining_ms: u32,
}

impl Report {
    fn from_update(update: &StateUpdate<'_>) -> Self {
        Self {
            model_id: update.model_id,
            element_index: update.element_index,
            current: owned(update.current),
            target: update.target.map(owned),
            remaining_ms: update.remaining_ms,
        }
    }
}

/// States the lighting servers report never borrow
fn owned(state: State<'_>) -> State<'static> {
    match state {
        State::OnOff(value) => State::OnOff(value),
        State::OnPowerUp(value) => State::OnPowerUp(value),
        State::Level(value) => State::Level(value),
        State::TransitionTime(value) => State::TransitionTime(value),
        State::LightnessActual(value) => State::LightnessActual(value),
        State::LightnessLinear(value) => State::LightnessLinear(value),
        State::LightnessDefault(value) => State::LightnessDefault(value),
        State::LightnessRange(range) => State::LightnessRange(range),
        State::Ctl(ctl) => State::Ctl(ctl),
        State::CtlTemperature(temperature) => State::CtlTemperature(temperature),
        State::CtlDefault(default) => State::CtlDefault(default),
        State::CtlTemperatureRange(range) => State::CtlTemperatureRange(range),
        other => panic!("unexpected state reported: {other:?}"),
    }
}

#[derive(Default)]
pub struct FakePlatform {
    pub timers: SoftTimers<24>,
    pub store: HashMap<u16, Vec<u8>>,
    pub saves: Vec<u16>,
    pub responses: Vec<(u16, Report)>,
    pub updates: Vec<Report>,
    pub publishes: Vec<(u16, u16, StateKind)>,
    pub scene_resets: Vec<u16>,
    pub lightness: Vec<(u16, Duration)>,
    pub temperature: Vec<(u16, i16, Duration)>,
    /// Every transport call fails with [`TransportError::Busy`]
    pub transport_down: bool,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every recorded call, keeping timers and storage
    pub fn clear(&mut self) {
        self.saves.clear();
        self.responses.clear();
        self.updates.clear();
        self.publishes.clear();
        self.scene_resets.clear();
        self.lightness.clear();
        self.temperature.clear();
    }

    pub fn is_running(&self, timer: impl Into<TimerId>) -> bool {
        self.timers.is_running(timer.into())
    }

    pub fn last_lightness(&self) -> Option<(u16, Duration)> {
        self.lightness.last().copied()
    }

    pub fn last_temperature(&self) -> Option<(u16, i16, Duration)> {
        self.temperature.last().copied()
    }

    pub fn published(&self, model_id: u16, element_index: u16, kind: StateKind) -> bool {
        self.publishes.contains(&(model_id, element_index, kind))
    }

    /// Last update reported for a model
    pub fn last_update(&self, model_id: u16) -> Option<Report> {
        self.updates.iter().rev().find(|update| update.model_id == model_id).copied()
    }
}

impl TimerService for FakePlatform {
    fn start(
        &mut self,
        timer: TimerId,
        duration: Duration,
        periodic: bool,
    ) -> Result<(), TimerError> {
        self.timers.start(timer, duration, periodic)
    }

    fn stop(&mut self, timer: TimerId) -> Result<(), TimerError> {
        self.timers.stop(timer)
    }
}

impl ModelTransport for FakePlatform {
    fn respond(&mut self, response: &StateResponse<'_>) -> Result<(), TransportError> {
        if self.transport_down {
            return Err(TransportError::Busy);
        }
        self.responses
            .push((response.client_address, Report::from_update(&response.state)));
        Ok(())
    }

    fn update(&mut self, update: &StateUpdate<'_>) -> Result<(), TransportError> {
        if self.transport_down {
            return Err(TransportError::Busy);
        }
        self.updates.push(Report::from_update(update));
        Ok(())
    }

    fn publish(
        &mut self,
        model_id: u16,
        element_index: u16,
        kind: StateKind,
    ) -> Result<(), TransportError> {
        if self.transport_down {
            return Err(TransportError::Busy);
        }
        self.publishes.push((model_id, element_index, kind));
        Ok(())
    }

    fn reset_scene_register(&mut self, element_index: u16) -> Result<(), TransportError> {
        self.scene_resets.push(element_index);
        Ok(())
    }
}

impl KeyValueStore for FakePlatform {
    fn load(&mut self, key: u16, buffer: &mut [u8]) -> Result<usize, StoreError> {
        let value = self.store.get(&key).ok_or(StoreError::NotFound)?;
        if value.len() > buffer.len() {
            return Err(StoreError::BufferTooSmall);
        }
        buffer[..value.len()].copy_from_slice(value);
        Ok(value.len())
    }

    fn save(&mut self, key: u16, data: &[u8]) -> Result<(), StoreError> {
        self.saves.push(key);
        self.store.insert(key, data.to_vec());
        Ok(())
    }

    fn erase(&mut self, key: u16) -> Result<(), StoreError> {
        self.store.remove(&key);
        Ok(())
    }
}

impl LightingOutput for FakePlatform {
    fn set_lightness(&mut self, lightness: u16, transition: Duration) {
        self.lightness.push((lightness, transition));
    }

    fn set_temperature(&mut self, temperature: u16, delta_uv: i16, transition: Duration) {
        self.temperature.push((temperature, delta_uv, transition));
    }
}

pub const CLIENT: u16 = 0x0042;

/// Request envelope asking for a status response
pub fn acked(transition_ms: u32, delay_ms: u16) -> RequestMeta {
    RequestMeta {
        client_address: CLIENT,
        server_address: 0x0001,
        transition_ms,
        delay_ms,
        flags: REQUEST_FLAG_RESPONSE_REQUIRED | REQUEST_FLAG_NONRELAYED,
        ..RequestMeta::default()
    }
}

/// Request envelope without a status response
pub fn unacked(transition_ms: u32, delay_ms: u16) -> RequestMeta {
    RequestMeta {
        flags: 0,
        ..acked(transition_ms, delay_ms)
    }
}

/// Run the clock for `ms`, delivering every expiry to its server
pub fn advance(
    platform: &mut FakePlatform,
    lighting: &mut LightingServer,
    mut ctl: Option<&mut CtlServer>,
    ms: u64,
) {
    let mut budget = Duration::from_millis(ms);
    while let Some((timer, elapsed)) = platform.timers.pop_expired(budget) {
        budget -= elapsed;
        match timer {
            TimerId::Lighting(timer) => lighting.on_timer(platform, timer).unwrap(),
            TimerId::Ctl(timer) => {
                if let Some(ctl) = ctl.as_deref_mut() {
                    ctl.on_timer(platform, lighting, timer).unwrap();
                }
            }
        }
    }
    platform.timers.advance(budget);
}

//! Collaborator ports the servers drive

use embassy_time::Duration;
use myrtio_mesh_model::{CodecError, State, StateKind, serialize_state};

use crate::{
    error::{StoreError, TimerError, TransportError},
    timer::TimerId,
};

/// State report sent to the stack for caching and publication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateUpdate<'a> {
    pub model_id: u16,
    pub element_index: u16,
    pub current: State<'a>,
    pub target: Option<State<'a>>,
    pub remaining_ms: u32,
}

impl StateUpdate<'_> {
    /// Encode the payload carried by the status message
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, CodecError> {
        serialize_state(&self.current, self.target.as_ref(), buffer)
    }
}

/// Status response addressed to the requesting client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateResponse<'a> {
    pub client_address: u16,
    pub appkey_index: u16,
    pub flags: u8,
    pub state: StateUpdate<'a>,
}

/// One-shot or periodic timers identified by [`TimerId`]
///
/// Starting a running timer restarts it. Stopping an idle timer succeeds.
/// Periodic timers need a non-zero period.
/// Expiry is reported back by calling the owning server's timer handler.
pub trait TimerService {
    fn start(&mut self, timer: TimerId, duration: Duration, periodic: bool)
    -> Result<(), TimerError>;

    fn stop(&mut self, timer: TimerId) -> Result<(), TimerError>;
}

/// Mesh access layer used to answer and publish model state
pub trait ModelTransport {
    fn respond(&mut self, response: &StateResponse<'_>) -> Result<(), TransportError>;

    fn update(&mut self, update: &StateUpdate<'_>) -> Result<(), TransportError>;

    fn publish(
        &mut self,
        model_id: u16,
        element_index: u16,
        kind: StateKind,
    ) -> Result<(), TransportError>;

    /// Invalidate the current scene after a state change
    fn reset_scene_register(&mut self, _element_index: u16) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Persistent key/value storage
pub trait KeyValueStore {
    /// Read the value of `key` into `buffer`, returning its length
    fn load(&mut self, key: u16, buffer: &mut [u8]) -> Result<usize, StoreError>;

    fn save(&mut self, key: u16, data: &[u8]) -> Result<(), StoreError>;

    fn erase(&mut self, key: u16) -> Result<(), StoreError>;
}

/// Light output driver
pub trait LightingOutput {
    /// Drive the output towards `lightness` over `transition`
    fn set_lightness(&mut self, lightness: u16, transition: Duration);

    /// Drive the color temperature towards the given value over `transition`
    fn set_temperature(&mut self, temperature: u16, delta_uv: i16, transition: Duration);
}

/// Everything a lighting node needs from its platform
pub trait MeshPlatform: TimerService + ModelTransport + KeyValueStore + LightingOutput {}

impl<T> MeshPlatform for T where T: TimerService + ModelTransport + KeyValueStore + LightingOutput
{}

#![no_std]

//! Lighting model servers for a mesh light node
//!
//! - `transition` - Per-channel delay, transition and move state machine
//! - `persistence` - Debounced record storage
//! - `lighting` - On/off, lightness and primary level server
//! - `ctl` - Color temperature server bound to the lighting server
//! - `ports` - Timer, transport, storage and output collaborators

pub mod config;
pub mod convert;
pub mod ctl;
pub mod error;
pub mod lighting;
pub mod persistence;
pub mod ports;
mod publish;
pub mod record;
pub mod timer;
pub mod transition;

pub use config::{CtlServerConfig, LightingServerConfig};
pub use ctl::CtlServer;
pub use error::{EngineError, StoreError, TimerError, TransportError};
pub use lighting::{LightingServer, LightnessScale};
pub use ports::{
    KeyValueStore, LightingOutput, MeshPlatform, ModelTransport, StateResponse, StateUpdate,
    TimerService,
};
pub use record::{CtlRecord, LightbulbRecord};
pub use timer::{CtlTimer, LightingTimer, SoftTimers, TimerId};
pub use transition::{Phase, Timing};

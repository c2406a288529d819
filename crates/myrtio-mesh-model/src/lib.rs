#![no_std]

//! Mesh model layer primitives
//!
//! - `kind` - State and request kind tags
//! - `state` / `request` - Typed generic state and request values
//! - `codec` - Binary wire encoding of states and requests
//! - `transition_time` - Transition time byte format
//! - `registry` - Per (model, element) handler table and event dispatch

extern crate alloc;

pub mod codec;
pub mod error;
pub mod event;
pub mod kind;
pub mod model;
pub mod property;
pub mod registry;
pub mod request;
pub mod state;
pub mod transition_time;

pub use codec::{
    deserialize_request, deserialize_state, request_len, serialize_request, serialize_state,
    state_len,
};
pub use error::{CodecError, RegistryError};
pub use event::{MeshEvent, RequestMeta};
pub use kind::{RequestKind, StateKind};
pub use property::PropertyValue;
pub use registry::{ClientHandlers, DispatchOutcome, Handlers, Registry, ServerHandlers};
pub use request::Request;
pub use state::State;

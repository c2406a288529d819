//! Inbound model events and their decoded forms

use crate::{request::Request, state::State};

/// Request flag: the message was not relayed
pub const REQUEST_FLAG_NONRELAYED: u8 = 0x01;
/// Request flag: the client expects a status response
pub const REQUEST_FLAG_RESPONSE_REQUIRED: u8 = 0x02;

/// Envelope of a client request addressed to a server model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestMeta {
    pub model_id: u16,
    pub element_index: u16,
    pub client_address: u16,
    pub server_address: u16,
    pub appkey_index: u16,
    /// Requested transition time
    pub transition_ms: u32,
    /// Requested delay before the transition starts
    pub delay_ms: u16,
    pub flags: u8,
}

impl RequestMeta {
    pub const fn response_required(&self) -> bool {
        self.flags & REQUEST_FLAG_RESPONSE_REQUIRED != 0
    }
}

/// Raw inbound event, payload still encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshEvent<'a> {
    ClientRequest {
        meta: RequestMeta,
        kind: u8,
        parameters: &'a [u8],
    },
    StateChanged {
        model_id: u16,
        element_index: u16,
        remaining_ms: u32,
        kind: u8,
        parameters: &'a [u8],
    },
    StateRecall {
        model_id: u16,
        element_index: u16,
        transition_ms: u32,
        kind: u8,
        parameters: &'a [u8],
    },
    ServerStatus {
        model_id: u16,
        element_index: u16,
        client_address: u16,
        server_address: u16,
        remaining_ms: u32,
        flags: u8,
        kind: u8,
        parameters: &'a [u8],
    },
}

impl MeshEvent<'_> {
    /// Registry key of the event
    pub const fn address(&self) -> (u16, u16) {
        match self {
            MeshEvent::ClientRequest { meta, .. } => (meta.model_id, meta.element_index),
            MeshEvent::StateChanged {
                model_id,
                element_index,
                ..
            }
            | MeshEvent::StateRecall {
                model_id,
                element_index,
                ..
            }
            | MeshEvent::ServerStatus {
                model_id,
                element_index,
                ..
            } => (*model_id, *element_index),
        }
    }
}

/// Decoded state change reported by a bound model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange<'a> {
    pub model_id: u16,
    pub element_index: u16,
    pub current: State<'a>,
    pub target: Option<State<'a>>,
    pub remaining_ms: u32,
}

/// Decoded scene recall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRecall<'a> {
    pub model_id: u16,
    pub element_index: u16,
    pub current: State<'a>,
    pub target: Option<State<'a>>,
    pub transition_ms: u32,
}

/// Decoded status received by a client model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatus<'a> {
    pub model_id: u16,
    pub element_index: u16,
    pub client_address: u16,
    pub server_address: u16,
    pub current: State<'a>,
    pub target: Option<State<'a>>,
    pub remaining_ms: u32,
    pub flags: u8,
}

/// Decoded client request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientRequest<'a> {
    pub meta: RequestMeta,
    pub request: Request<'a>,
}

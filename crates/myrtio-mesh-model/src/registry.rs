//! Handler registry keyed by (model id, element index)
//!
//! Handlers are plain function pointers over a caller-owned context `C`,
//! so the registry itself holds no model state.

use alloc::vec::Vec;

use crate::{
    codec::{deserialize_request, deserialize_state},
    error::{CodecError, RegistryError},
    event::{ClientRequest, MeshEvent, ServerStatus, StateChange, StateRecall},
    kind::{RequestKind, StateKind},
    state::State,
};

pub type ClientRequestFn<C, E> = fn(&mut C, &ClientRequest<'_>) -> Result<(), E>;
pub type StateChangedFn<C, E> = fn(&mut C, &StateChange<'_>) -> Result<(), E>;
pub type StateRecallFn<C, E> = fn(&mut C, &StateRecall<'_>) -> Result<(), E>;
pub type ServerResponseFn<C, E> = fn(&mut C, &ServerStatus<'_>) -> Result<(), E>;

/// Callbacks of a server model
pub struct ServerHandlers<C, E> {
    pub client_request: Option<ClientRequestFn<C, E>>,
    pub state_changed: Option<StateChangedFn<C, E>>,
    pub state_recall: Option<StateRecallFn<C, E>>,
}

/// Callbacks of a client model
pub struct ClientHandlers<C, E> {
    pub server_response: Option<ServerResponseFn<C, E>>,
}

/// Callback set of one registered model
pub enum Handlers<C, E> {
    Server(ServerHandlers<C, E>),
    Client(ClientHandlers<C, E>),
}

impl<C, E> Clone for ServerHandlers<C, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, E> Copy for ServerHandlers<C, E> {}

impl<C, E> Clone for ClientHandlers<C, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, E> Copy for ClientHandlers<C, E> {}

impl<C, E> Clone for Handlers<C, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, E> Copy for Handlers<C, E> {}

impl<C, E> Handlers<C, E> {
    /// Whether no callback is set at all
    pub fn is_empty(&self) -> bool {
        match self {
            Handlers::Server(server) => {
                server.client_request.is_none()
                    && server.state_changed.is_none()
                    && server.state_recall.is_none()
            }
            Handlers::Client(client) => client.server_response.is_none(),
        }
    }
}

/// Result of dispatching one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler was invoked
    Delivered,
    /// Nobody registered for the event, or the role has no matching callback
    Unhandled,
    /// The payload failed to decode and the event was dropped
    Malformed,
}

struct Entry<C, E> {
    model_id: u16,
    element_index: u16,
    handlers: Handlers<C, E>,
}

/// Table of model handlers
///
/// The table grows by `increment` entries when full. An increment of zero
/// makes it fixed-capacity.
pub struct Registry<C, E> {
    entries: Vec<Entry<C, E>>,
    allocated: usize,
    increment: usize,
}

impl<C, E> Registry<C, E> {
    pub fn with_capacity(initial: usize, increment: usize) -> Self {
        Self {
            entries: Vec::with_capacity(initial),
            allocated: initial,
            increment,
        }
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slots allocated so far (high-water mark)
    pub fn capacity(&self) -> usize {
        self.allocated
    }

    pub fn register(
        &mut self,
        model_id: u16,
        element_index: u16,
        handlers: Handlers<C, E>,
    ) -> Result<(), RegistryError> {
        if handlers.is_empty() {
            return Err(RegistryError::NullHandlers);
        }
        if self.find(model_id, element_index).is_some() {
            return Err(RegistryError::AlreadyRegistered);
        }
        if self.entries.len() >= self.allocated {
            if self.increment == 0 {
                return Err(RegistryError::NoCapacity);
            }
            self.entries
                .try_reserve_exact(self.allocated + self.increment - self.entries.len())
                .map_err(|_| RegistryError::NoCapacity)?;
            self.allocated += self.increment;
        }

        self.entries.push(Entry {
            model_id,
            element_index,
            handlers,
        });
        Ok(())
    }

    pub fn lookup(
        &self,
        model_id: u16,
        element_index: u16,
    ) -> Result<&Handlers<C, E>, RegistryError> {
        self.find(model_id, element_index)
            .map(|entry| &entry.handlers)
            .ok_or(RegistryError::NotFound)
    }

    /// Drop every registration, keeping the allocation
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn find(&self, model_id: u16, element_index: u16) -> Option<&Entry<C, E>> {
        self.entries
            .iter()
            .find(|entry| entry.model_id == model_id && entry.element_index == element_index)
    }

    /// Decode the event payload and invoke the matching callback
    ///
    /// Undecodable payloads are dropped without invoking anything. Errors
    /// returned by the callback are passed through.
    pub fn dispatch_event(
        &self,
        context: &mut C,
        event: &MeshEvent<'_>,
    ) -> Result<DispatchOutcome, E> {
        let (model_id, element_index) = event.address();
        let Some(entry) = self.find(model_id, element_index) else {
            log::debug!(
                "registry: no handlers for model 0x{:04x} on element {}",
                model_id,
                element_index
            );
            return Ok(DispatchOutcome::Unhandled);
        };

        match (event, &entry.handlers) {
            (
                MeshEvent::ClientRequest {
                    meta,
                    kind,
                    parameters,
                },
                Handlers::Server(ServerHandlers {
                    client_request: Some(handler),
                    ..
                }),
            ) => {
                let decoded = RequestKind::try_from(*kind)
                    .and_then(|kind| deserialize_request(kind, parameters));
                let Some(request) = accept(decoded, model_id, *kind) else {
                    return Ok(DispatchOutcome::Malformed);
                };
                handler(
                    context,
                    &ClientRequest {
                        meta: *meta,
                        request,
                    },
                )?;
            }
            (
                MeshEvent::StateChanged {
                    remaining_ms,
                    kind,
                    parameters,
                    ..
                },
                Handlers::Server(ServerHandlers {
                    state_changed: Some(handler),
                    ..
                }),
            ) => {
                let decoded = decode_state(*kind, parameters);
                let Some((current, target)) = accept(decoded, model_id, *kind) else {
                    return Ok(DispatchOutcome::Malformed);
                };
                handler(
                    context,
                    &StateChange {
                        model_id,
                        element_index,
                        current,
                        target,
                        remaining_ms: *remaining_ms,
                    },
                )?;
            }
            (
                MeshEvent::StateRecall {
                    transition_ms,
                    kind,
                    parameters,
                    ..
                },
                Handlers::Server(ServerHandlers {
                    state_recall: Some(handler),
                    ..
                }),
            ) => {
                let decoded = decode_state(*kind, parameters);
                let Some((current, target)) = accept(decoded, model_id, *kind) else {
                    return Ok(DispatchOutcome::Malformed);
                };
                handler(
                    context,
                    &StateRecall {
                        model_id,
                        element_index,
                        current,
                        target,
                        transition_ms: *transition_ms,
                    },
                )?;
            }
            (
                MeshEvent::ServerStatus {
                    client_address,
                    server_address,
                    remaining_ms,
                    flags,
                    kind,
                    parameters,
                    ..
                },
                Handlers::Client(ClientHandlers {
                    server_response: Some(handler),
                }),
            ) => {
                let decoded = decode_state(*kind, parameters);
                let Some((current, target)) = accept(decoded, model_id, *kind) else {
                    return Ok(DispatchOutcome::Malformed);
                };
                handler(
                    context,
                    &ServerStatus {
                        model_id,
                        element_index,
                        client_address: *client_address,
                        server_address: *server_address,
                        current,
                        target,
                        remaining_ms: *remaining_ms,
                        flags: *flags,
                    },
                )?;
            }
            _ => return Ok(DispatchOutcome::Unhandled),
        }

        Ok(DispatchOutcome::Delivered)
    }
}

type DecodedState<'a> = (State<'a>, Option<State<'a>>);

fn decode_state(kind: u8, parameters: &[u8]) -> Result<DecodedState<'_>, CodecError> {
    StateKind::try_from(kind).and_then(|kind| deserialize_state(kind, parameters))
}

fn accept<T>(decoded: Result<T, CodecError>, model_id: u16, kind: u8) -> Option<T> {
    match decoded {
        Ok(value) => Some(value),
        Err(err) => {
            log::debug!(
                "registry: dropping event for model 0x{:04x}, kind 0x{:02x}: {}",
                model_id,
                kind,
                err
            );
            None
        }
    }
}

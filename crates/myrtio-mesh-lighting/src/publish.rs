//! Fire-and-forget status reporting through the transport port

use myrtio_mesh_model::{RequestMeta, StateKind};

use crate::ports::{ModelTransport, StateResponse, StateUpdate};

/// Answer the client if it asked for a status
pub(crate) fn respond<T: ModelTransport>(
    transport: &mut T,
    meta: &RequestMeta,
    state: StateUpdate<'_>,
) {
    if !meta.response_required() {
        return;
    }
    let response = StateResponse {
        client_address: meta.client_address,
        appkey_index: meta.appkey_index,
        flags: 0,
        state,
    };
    if let Err(err) = transport.respond(&response) {
        log::warn!(
            "transport: response of model 0x{:04x} to 0x{:04x} failed: {}",
            state.model_id,
            meta.client_address,
            err
        );
    }
}

/// Hand the state to the stack, `true` on success
pub(crate) fn update<T: ModelTransport>(transport: &mut T, state: &StateUpdate<'_>) -> bool {
    match transport.update(state) {
        Ok(()) => true,
        Err(err) => {
            log::warn!(
                "transport: update of model 0x{:04x} on element {} failed: {}",
                state.model_id,
                state.element_index,
                err
            );
            false
        }
    }
}

/// Update the state, then publish it if the stack took it
pub(crate) fn update_and_publish<T: ModelTransport>(transport: &mut T, state: &StateUpdate<'_>) {
    if update(transport, state) {
        publish(transport, state.model_id, state.element_index, state.current.kind());
    }
}

pub(crate) fn publish<T: ModelTransport>(
    transport: &mut T,
    model_id: u16,
    element_index: u16,
    kind: StateKind,
) {
    if let Err(err) = transport.publish(model_id, element_index, kind) {
        log::warn!(
            "transport: publish of model 0x{:04x} on element {} failed: {}",
            model_id,
            element_index,
            err
        );
    }
}

pub(crate) fn reset_scene<T: ModelTransport>(transport: &mut T, element_index: u16) {
    if let Err(err) = transport.reset_scene_register(element_index) {
        log::warn!("transport: scene reset on element {} failed: {}", element_index, err);
    }
}

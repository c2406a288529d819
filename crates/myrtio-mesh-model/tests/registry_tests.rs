//! Integration tests for the handler registry.

use myrtio_mesh_model::{
    ClientHandlers, DispatchOutcome, Handlers, MeshEvent, Registry, RegistryError, Request,
    RequestMeta, ServerHandlers, State,
    event::{ClientRequest, ServerStatus, StateChange, StateRecall},
    model::{LIGHT_LIGHTNESS_CLIENT, LIGHT_LIGHTNESS_SERVER},
};

#[derive(Default)]
struct Calls {
    first: u32,
    second: u32,
    requests: Vec<Request<'static>>,
    changes: Vec<(u16, Option<u16>, u32)>,
    recalls: u32,
    statuses: u32,
}

#[derive(Debug, PartialEq, Eq)]
struct HandlerFailed;

type TestRegistry = Registry<Calls, HandlerFailed>;

fn first_request(calls: &mut Calls, _: &ClientRequest<'_>) -> Result<(), HandlerFailed> {
    calls.first += 1;
    Ok(())
}

fn second_request(calls: &mut Calls, _: &ClientRequest<'_>) -> Result<(), HandlerFailed> {
    calls.second += 1;
    Ok(())
}

fn record_request(calls: &mut Calls, event: &ClientRequest<'_>) -> Result<(), HandlerFailed> {
    if let Request::LightnessActual(value) = event.request {
        calls.requests.push(Request::LightnessActual(value));
    }
    Ok(())
}

fn failing_request(_: &mut Calls, _: &ClientRequest<'_>) -> Result<(), HandlerFailed> {
    Err(HandlerFailed)
}

fn record_change(calls: &mut Calls, change: &StateChange<'_>) -> Result<(), HandlerFailed> {
    let current = match change.current {
        State::LightnessActual(value) => value,
        _ => 0,
    };
    let target = match change.target {
        Some(State::LightnessActual(value)) => Some(value),
        _ => None,
    };
    calls.changes.push((current, target, change.remaining_ms));
    Ok(())
}

fn record_recall(calls: &mut Calls, _: &StateRecall<'_>) -> Result<(), HandlerFailed> {
    calls.recalls += 1;
    Ok(())
}

fn record_status(calls: &mut Calls, _: &ServerStatus<'_>) -> Result<(), HandlerFailed> {
    calls.statuses += 1;
    Ok(())
}

fn server(
    request: fn(&mut Calls, &ClientRequest<'_>) -> Result<(),
    HandlerFailed>,
) -> Handlers<Calls, HandlerFailed> {
    Handlers::Server(ServerHandlers {
        client_request: Some(request),
        state_changed: Some(record_change),
        state_recall: Some(record_recall),
    })
}

fn lightness_request(kind: u8, parameters: &[u8]) -> MeshEvent<'_> {
    MeshEvent::ClientRequest {
        meta: RequestMeta {
            model_id: LIGHT_LIGHTNESS_SERVER,
            element_index: 0,
            ..RequestMeta::default()
        },
        kind,
        parameters,
    }
}

// -----------------------------------------------------------------------------
// Registration
// -----------------------------------------------------------------------------

#[test]
fn duplicate_registration_keeps_first_handlers() {
    let mut registry = TestRegistry::with_capacity(4, 0);
    registry
        .register(LIGHT_LIGHTNESS_SERVER, 0, server(first_request))
        .unwrap();

    assert_eq!(
        registry.register(LIGHT_LIGHTNESS_SERVER, 0, server(second_request)),
        Err(RegistryError::AlreadyRegistered)
    );
    assert_eq!(registry.len(), 1);

    let mut calls = Calls::default();
    let Ok(Handlers::Server(handlers)) = registry.lookup(LIGHT_LIGHTNESS_SERVER, 0) else {
        panic!("expected server handlers");
    };
    let request = ClientRequest {
        meta: RequestMeta::default(),
        request: Request::LevelHalt,
    };
    (handlers.client_request.unwrap())(&mut calls, &request).unwrap();

    assert_eq!(calls.first, 1);
    assert_eq!(calls.second, 0);
}

#[test]
fn same_model_on_other_element_is_distinct() {
    let mut registry = TestRegistry::with_capacity(4, 0);
    registry
        .register(LIGHT_LIGHTNESS_SERVER, 0, server(first_request))
        .unwrap();
    registry
        .register(LIGHT_LIGHTNESS_SERVER, 1, server(second_request))
        .unwrap();

    assert_eq!(registry.len(), 2);
}

#[test]
fn empty_handlers_are_rejected() {
    let mut registry = TestRegistry::with_capacity(1, 0);
    let empty = Handlers::Server(ServerHandlers {
        client_request: None,
        state_changed: None,
        state_recall: None,
    });

    assert_eq!(
        registry.register(LIGHT_LIGHTNESS_SERVER, 0, empty),
        Err(RegistryError::NullHandlers)
    );
    assert_eq!(
        registry.register(
            LIGHT_LIGHTNESS_CLIENT,
            0,
            Handlers::Client(ClientHandlers {
                server_response: None,
            })
        ),
        Err(RegistryError::NullHandlers)
    );
    assert!(registry.is_empty());
}

#[test]
fn fixed_capacity_table_fills_up() {
    let mut registry = TestRegistry::with_capacity(2, 0);
    registry.register(0x1000, 0, server(first_request)).unwrap();
    registry.register(0x1002, 0, server(first_request)).unwrap();

    assert_eq!(
        registry.register(0x1004, 0, server(first_request)),
        Err(RegistryError::NoCapacity)
    );
    assert_eq!(registry.capacity(), 2);
}

#[test]
fn growable_table_extends_by_increment() {
    let mut registry = TestRegistry::with_capacity(1, 3);
    registry.register(0x1000, 0, server(first_request)).unwrap();
    assert_eq!(registry.capacity(), 1);

    registry.register(0x1002, 0, server(first_request)).unwrap();
    assert_eq!(registry.capacity(), 4);

    registry.register(0x1004, 0, server(first_request)).unwrap();
    registry.register(0x1006, 0, server(first_request)).unwrap();
    assert_eq!(registry.capacity(), 4);

    registry.register(0x1007, 0, server(first_request)).unwrap();
    assert_eq!(registry.capacity(), 7);
    assert_eq!(registry.len(), 5);
}

#[test]
fn lookup_of_unknown_model_fails() {
    let registry = TestRegistry::with_capacity(1, 0);
    assert!(matches!(
        registry.lookup(LIGHT_LIGHTNESS_SERVER, 0),
        Err(RegistryError::NotFound)
    ));
}

#[test]
fn clear_drops_registrations() {
    let mut registry = TestRegistry::with_capacity(1, 0);
    registry.register(0x1000, 0, server(first_request)).unwrap();
    registry.clear();

    assert!(registry.is_empty());
    registry.register(0x1000, 0, server(first_request)).unwrap();
}

// -----------------------------------------------------------------------------
// Dispatch
// -----------------------------------------------------------------------------

#[test]
fn dispatch_decodes_request_payload() {
    let mut registry = TestRegistry::with_capacity(1, 0);
    registry
        .register(LIGHT_LIGHTNESS_SERVER, 0, server(record_request))
        .unwrap();
    let mut calls = Calls::default();

    let outcome = registry.dispatch_event(&mut calls, &lightness_request(0x80, &[0x20, 0x03]));

    assert_eq!(outcome, Ok(DispatchOutcome::Delivered));
    assert_eq!(calls.requests, vec![Request::LightnessActual(800)]);
}

#[test]
fn malformed_payload_is_dropped_silently() {
    let mut registry = TestRegistry::with_capacity(1, 0);
    registry
        .register(LIGHT_LIGHTNESS_SERVER, 0, server(failing_request))
        .unwrap();
    let mut calls = Calls::default();

    assert_eq!(
        registry.dispatch_event(&mut calls, &lightness_request(0x80, &[0x20])),
        Ok(DispatchOutcome::Malformed)
    );
    assert_eq!(
        registry.dispatch_event(&mut calls, &lightness_request(0x7F, &[0x20, 0x03])),
        Ok(DispatchOutcome::Malformed)
    );
}

#[test]
fn handler_error_is_returned() {
    let mut registry = TestRegistry::with_capacity(1, 0);
    registry
        .register(LIGHT_LIGHTNESS_SERVER, 0, server(failing_request))
        .unwrap();
    let mut calls = Calls::default();

    assert_eq!(
        registry.dispatch_event(&mut calls, &lightness_request(0x80, &[0x20, 0x03])),
        Err(HandlerFailed)
    );
}

#[test]
fn unregistered_model_is_unhandled() {
    let registry = TestRegistry::with_capacity(1, 0);
    let mut calls = Calls::default();

    assert_eq!(
        registry.dispatch_event(&mut calls, &lightness_request(0x80, &[0x20, 0x03])),
        Ok(DispatchOutcome::Unhandled)
    );
}

#[test]
fn state_changed_carries_target_and_remaining_time() {
    let mut registry = TestRegistry::with_capacity(1, 0);
    registry
        .register(LIGHT_LIGHTNESS_SERVER, 0, server(first_request))
        .unwrap();
    let mut calls = Calls::default();
    let event = MeshEvent::StateChanged {
        model_id: LIGHT_LIGHTNESS_SERVER,
        element_index: 0,
        remaining_ms: 1500,
        kind: 0x80,
        parameters: &[0x10, 0x00, 0x20, 0x00],
    };

    assert_eq!(
        registry.dispatch_event(&mut calls, &event),
        Ok(DispatchOutcome::Delivered)
    );
    assert_eq!(calls.changes, vec![(0x10, Some(0x20), 1500)]);
}

#[test]
fn recall_reaches_server_and_status_reaches_client() {
    let mut registry = TestRegistry::with_capacity(2, 0);
    registry
        .register(LIGHT_LIGHTNESS_SERVER, 0, server(first_request))
        .unwrap();
    registry
        .register(
            LIGHT_LIGHTNESS_CLIENT,
            0,
            Handlers::Client(ClientHandlers {
                server_response: Some(record_status),
            }),
        )
        .unwrap();
    let mut calls = Calls::default();

    let recall = MeshEvent::StateRecall {
        model_id: LIGHT_LIGHTNESS_SERVER,
        element_index: 0,
        transition_ms: 0,
        kind: 0x80,
        parameters: &[0x10, 0x00],
    };
    let status = MeshEvent::ServerStatus {
        model_id: LIGHT_LIGHTNESS_CLIENT,
        element_index: 0,
        client_address: 1,
        server_address: 2,
        remaining_ms: 0,
        flags: 0,
        kind: 0x80,
        parameters: &[0x10, 0x00],
    };

    assert_eq!(
        registry.dispatch_event(&mut calls, &recall),
        Ok(DispatchOutcome::Delivered)
    );
    assert_eq!(
        registry.dispatch_event(&mut calls, &status),
        Ok(DispatchOutcome::Delivered)
    );
    assert_eq!(calls.recalls, 1);
    assert_eq!(calls.statuses, 1);
}

#[test]
fn role_mismatch_is_unhandled() {
    let mut registry = TestRegistry::with_capacity(1, 0);
    registry
        .register(
            LIGHT_LIGHTNESS_CLIENT,
            0,
            Handlers::Client(ClientHandlers {
                server_response: Some(record_status),
            }),
        )
        .unwrap();
    let mut calls = Calls::default();
    let event = MeshEvent::ClientRequest {
        meta: RequestMeta {
            model_id: LIGHT_LIGHTNESS_CLIENT,
            ..RequestMeta::default()
        },
        kind: 0x80,
        parameters: &[0x10, 0x00],
    };

    assert_eq!(
        registry.dispatch_event(&mut calls, &event),
        Ok(DispatchOutcome::Unhandled)
    );
}

//! Handlers of the Light CTL and Light CTL setup servers

use myrtio_mesh_lighting::{EngineError, MeshPlatform};
use myrtio_mesh_model::{
    Request, State,
    event::{ClientRequest, StateChange, StateRecall},
};

use super::NodeContext;

pub(super) fn client_request<P: MeshPlatform>(
    context: &mut NodeContext<P>,
    event: &ClientRequest<'_>,
) -> Result<(), EngineError> {
    let NodeContext {
        platform,
        lighting,
        ctl,
    } = &mut *context;
    let meta = &event.meta;
    match event.request {
        Request::Ctl(request) => ctl.ctl_request(platform, lighting, meta, request),
        Request::CtlTemperature(request) => ctl.temperature_request(platform, meta, request),
        Request::CtlDefault(default) => ctl.default_request(platform, lighting, meta, default),
        Request::CtlTemperatureRange(range) => ctl.temperature_range_request(platform, meta, range),
        other => {
            log::debug!(
                "ctl: request {:?} not served on model 0x{:04x}",
                other.kind(),
                meta.model_id
            );
            Ok(())
        }
    }
}

pub(super) fn state_changed<P: MeshPlatform>(
    context: &mut NodeContext<P>,
    change: &StateChange<'_>,
) -> Result<(), EngineError> {
    let NodeContext {
        platform,
        lighting,
        ctl,
    } = &mut *context;
    match change.current {
        State::Ctl(state) => ctl.ctl_change(platform, lighting, state),
        State::CtlTemperature(state) => ctl.temperature_change(platform, state),
        state @ (State::CtlDefault(_) | State::CtlTemperatureRange(_)) => {
            ctl.setup_change(platform, lighting, &state)
        }
        other => {
            log::debug!(
                "ctl: ignoring change of {:?} on model 0x{:04x}",
                other.kind(),
                change.model_id
            );
            Ok(())
        }
    }
}

pub(super) fn state_recall<P: MeshPlatform>(
    context: &mut NodeContext<P>,
    recall: &StateRecall<'_>,
) -> Result<(), EngineError> {
    let NodeContext {
        platform,
        lighting,
        ctl,
    } = &mut *context;
    let State::Ctl(current) = recall.current else {
        log::debug!(
            "ctl: no recall for {:?} on model 0x{:04x}",
            recall.current.kind(),
            recall.model_id
        );
        return Ok(());
    };
    let target = recall.target.and_then(|state| match state {
        State::Ctl(target) => Some(target),
        _ => None,
    });
    ctl.ctl_recall(platform, lighting, current, target, recall.transition_ms)
}

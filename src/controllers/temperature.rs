//! Handlers of the temperature element: Light CTL temperature and the
//! secondary Generic Level

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
    let NodeContext { platform, ctl, .. } = &mut *context;
    let meta = &event.meta;
    match event.request {
        Request::CtlTemperature(request) => ctl.temperature_request(platform, meta, request),
        Request::Level(level) => ctl.level_request(platform, meta, level),
        Request::LevelDelta(delta) => ctl.level_delta_request(platform, meta, delta),
        Request::LevelMove(delta) => ctl.level_move_request(platform, meta, delta),
        Request::LevelHalt => ctl.level_halt_request(platform, meta),
        other => {
            log::debug!(
                "ctl: request {:?} not served on temperature model 0x{:04x}",
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
    let NodeContext { platform, ctl, .. } = &mut *context;
    match change.current {
        State::CtlTemperature(state) => ctl.temperature_change(platform, state),
        State::Level(level) => ctl.level_change(platform, level),
        other => {
            log::debug!(
                "ctl: ignoring change of {:?} on temperature model 0x{:04x}",
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
    let NodeContext { platform, ctl, .. } = &mut *context;
    let transition_ms = recall.transition_ms;
    match (recall.current, recall.target) {
        (State::CtlTemperature(current), target) => {
            let target = target.and_then(|state| match state {
                State::CtlTemperature(temperature) => Some(temperature),
                _ => None,
            });
            ctl.temperature_recall(platform, current, target, transition_ms)
        }
        (State::Level(current), target) => {
            let target = target.and_then(|state| match state {
                State::Level(level) => Some(level),
                _ => None,
            });
            ctl.level_recall(platform, current, target, transition_ms)
        }
        (other, _) => {
            log::debug!(
                "ctl: no recall for {:?} on temperature model 0x{:04x}",
                other.kind(),
                recall.model_id
            );
            Ok(())
        }
    }
}

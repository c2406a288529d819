//! Handlers of the lighting element models: on/off, power on/off setup,
//! default transition time, lightness (and setup) and the primary level

use myrtio_mesh_lighting::{EngineError, LightnessScale, MeshPlatform, convert::linear_to_actual};
use myrtio_mesh_model::{
    Request, State,
    event::{ClientRequest, StateChange, StateRecall},
};

use super::{NodeContext, remaining_ms};

pub(super) fn client_request<P: MeshPlatform>(
    context: &mut NodeContext<P>,
    event: &ClientRequest<'_>,
) -> Result<(), EngineError> {
    let before = context.lightness();
    let NodeContext {
        platform, lighting, ..
    } = &mut *context;
    let meta = &event.meta;
    match event.request {
        Request::OnOff(onoff) => lighting.onoff_request(platform, meta, onoff)?,
        Request::OnPowerUp(on_power_up) => {
            lighting.power_onoff_request(platform, meta, on_power_up)?;
        }
        Request::TransitionTime(transition_time) => {
            lighting.transition_time_request(platform, meta, transition_time)?;
        }
        Request::Level(level) => lighting.level_request(platform, meta, level)?,
        Request::LevelDelta(delta) => lighting.level_delta_request(platform, meta, delta)?,
        Request::LevelMove(delta) => lighting.level_move_request(platform, meta, delta)?,
        Request::LevelHalt => lighting.level_halt_request(platform, meta)?,
        Request::LightnessActual(lightness) => {
            lighting.lightness_request(platform, meta, LightnessScale::Actual, lightness)?;
        }
        Request::LightnessLinear(lightness) => {
            lighting.lightness_request(platform, meta, LightnessScale::Linear, lightness)?;
        }
        Request::LightnessDefault(lightness) => {
            lighting.lightness_default_request(platform, meta, lightness)?;
        }
        Request::LightnessRange(range) => lighting.lightness_range_request(platform, meta, range)?,
        other => {
            log::debug!(
                "lighting: request {:?} not served on model 0x{:04x}",
                other.kind(),
                meta.model_id
            );
            return Ok(());
        }
    }
    context.sync_ctl(before, remaining_ms(meta));
    Ok(())
}

pub(super) fn state_changed<P: MeshPlatform>(
    context: &mut NodeContext<P>,
    change: &StateChange<'_>,
) -> Result<(), EngineError> {
    let NodeContext {
        platform, lighting, ..
    } = &mut *context;
    match change.current {
        State::OnOff(onoff) => lighting.onoff_change(platform, onoff),
        State::OnPowerUp(on_power_up) => lighting.power_onoff_change(platform, on_power_up),
        State::TransitionTime(transition_time) => {
            lighting.transition_time_change(platform, transition_time)
        }
        State::Level(level) => lighting.level_change(platform, level),
        State::LightnessActual(lightness) => lighting.lightness_change(platform, lightness),
        State::LightnessLinear(lightness) => {
            lighting.lightness_change(platform, linear_to_actual(lightness))
        }
        state @ (State::LightnessDefault(_) | State::LightnessRange(_)) => {
            lighting.setup_change(platform, &state)
        }
        other => {
            log::debug!(
                "lighting: ignoring change of {:?} on model 0x{:04x}",
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
    let before = context.lightness();
    let NodeContext {
        platform, lighting, ..
    } = &mut *context;
    let transition_ms = recall.transition_ms;
    match (recall.current, recall.target) {
        (State::OnOff(current), target) => {
            let target = target.and_then(|state| match state {
                State::OnOff(onoff) => Some(onoff),
                _ => None,
            });
            lighting.onoff_recall(platform, current, target, transition_ms)?;
        }
        (State::Level(current), target) => {
            let target = target.and_then(|state| match state {
                State::Level(level) => Some(level),
                _ => None,
            });
            lighting.level_recall(platform, current, target, transition_ms)?;
        }
        (State::LightnessActual(current), target) => {
            let target = target.and_then(|state| match state {
                State::LightnessActual(lightness) => Some(lightness),
                _ => None,
            });
            lighting.lightness_recall(platform, current, target, transition_ms)?;
        }
        (other, _) => {
            log::debug!(
                "lighting: no recall for {:?} on model 0x{:04x}",
                other.kind(),
                recall.model_id
            );
            return Ok(());
        }
    }
    context.sync_ctl(before, transition_ms);
    Ok(())
}

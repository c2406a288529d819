//! Light Lightness actual and linear

use myrtio_mesh_model::{
    RequestMeta, State, StateKind,
    model::{GENERIC_LEVEL_SERVER, GENERIC_ONOFF_SERVER, LIGHT_LIGHTNESS_SERVER},
};

use super::LightingServer;
use crate::{
    convert::{actual_to_linear, linear_to_actual},
    error::EngineError,
    ports::MeshPlatform,
    publish,
    transition::{DelayedAction, IMMEDIATE, Schedule, Timing, millis},
};

/// Scale a lightness value is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightnessScale {
    /// Perceptual lightness, the one stored in the record
    Actual,
    Linear,
}

impl LightnessScale {
    /// Actual lightness of a value in this scale
    pub fn to_actual(self, value: u16) -> u16 {
        match self {
            LightnessScale::Actual => value,
            LightnessScale::Linear => linear_to_actual(value),
        }
    }

    /// State carrying an actual lightness in this scale
    pub const fn state(self, actual: u16) -> State<'static> {
        match self {
            LightnessScale::Actual => State::LightnessActual(actual),
            LightnessScale::Linear => State::LightnessLinear(actual_to_linear(actual)),
        }
    }

    const fn other(self) -> Self {
        match self {
            LightnessScale::Actual => LightnessScale::Linear,
            LightnessScale::Linear => LightnessScale::Actual,
        }
    }

    const fn kind(self) -> StateKind {
        match self {
            LightnessScale::Actual => StateKind::LightnessActual,
            LightnessScale::Linear => StateKind::LightnessLinear,
        }
    }
}

impl LightingServer {
    pub fn lightness_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        scale: LightnessScale,
        value: u16,
    ) -> Result<(), EngineError> {
        self.scale = scale;
        let requested = self.record.clamp_lightness(scale.to_actual(value));
        let timing = Timing::from(meta);
        log::debug!(
            "lighting: lightness request, lightness={} transition={} delay={}",
            requested,
            timing.transition_ms,
            timing.delay_ms
        );

        if self.lightness.is_current(
            self.record.lightness_current,
            self.record.lightness_target,
            requested,
        ) {
            log::debug!("lighting: request for current state received, no op");
            publish::respond(platform, meta, self.lightness_update(scale, 0));
            return Ok(());
        }

        log::debug!("lighting: setting lightness to {}", requested);
        self.cancel_channels(platform)?;
        self.record.lightness_target = requested;
        match self.lightness.request(platform, timing)? {
            Schedule::Immediate => {
                platform.set_lightness(requested, IMMEDIATE);
                self.commit_lightness();
            }
            Schedule::Delayed => {}
            Schedule::Transition(transition_ms) => {
                platform.set_lightness(requested, millis(transition_ms));
            }
        }
        self.changed(platform)?;
        publish::reset_scene(platform, self.config.element_index);

        let remaining_ms = timing.remaining_ms();
        publish::respond(platform, meta, self.lightness_update(scale, remaining_ms));
        publish::update_and_publish(platform, &self.lightness_update(scale, remaining_ms));
        self.publish_bound(
            platform,
            &[
                (LIGHT_LIGHTNESS_SERVER, scale.other().kind()),
                (GENERIC_ONOFF_SERVER, StateKind::OnOff),
                (GENERIC_LEVEL_SERVER, StateKind::Level),
            ],
        );
        Ok(())
    }

    /// Actual lightness reported changed by the stack
    pub fn lightness_change<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        lightness: u16,
    ) -> Result<(), EngineError> {
        if self.record.lightness_current == lightness {
            log::debug!("lighting: lightness change to the same value ({})", lightness);
            return Ok(());
        }
        log::debug!(
            "lighting: lightness changed {} -> {}",
            self.record.lightness_current,
            lightness
        );
        self.record.lightness_current = lightness;
        self.changed(platform)?;
        Ok(())
    }

    /// Scene recall of the actual lightness
    pub fn lightness_recall<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        current: u16,
        target: Option<u16>,
        transition_ms: u32,
    ) -> Result<(), EngineError> {
        let lightness = match (transition_ms, target) {
            (0, _) | (_, None) => current,
            (_, Some(target)) => target,
        };
        if self.record.lightness_current == lightness {
            log::debug!("lighting: recall of current lightness, no op");
            return Ok(());
        }

        log::debug!("lighting: recall lightness {} over {} ms", lightness, transition_ms);
        self.cancel_channels(platform)?;
        self.record.lightness_target = lightness;
        if transition_ms == 0 {
            platform.set_lightness(lightness, IMMEDIATE);
            self.commit_lightness();
        } else {
            platform.set_lightness(lightness, millis(transition_ms));
            self.lightness.start_transition(platform, transition_ms)?;
        }
        self.changed(platform)?;
        publish::update_and_publish(
            platform,
            &self.lightness_update(LightnessScale::Actual, transition_ms),
        );
        Ok(())
    }

    pub(super) fn lightness_delay_elapsed<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), EngineError> {
        let Some(DelayedAction::Apply { transition_ms }) = self.lightness.take_delayed() else {
            return Ok(());
        };
        log::debug!(
            "lighting: starting delayed lightness request {} -> {}, {} ms",
            self.record.lightness_current,
            self.record.lightness_target,
            transition_ms
        );

        platform.set_lightness(self.record.lightness_target, millis(transition_ms));
        if transition_ms == 0 {
            self.commit_lightness();
            self.changed(platform)?;
            publish::update_and_publish(platform, &self.lightness_update(self.scale, 0));
        } else {
            self.lightness.start_transition(platform, transition_ms)?;
        }
        Ok(())
    }

    pub(super) fn lightness_transition_complete<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), EngineError> {
        if !self.lightness.finish() {
            return Ok(());
        }
        self.commit_lightness();
        log::debug!(
            "lighting: lightness transition complete, lightness is {}",
            self.record.lightness_current
        );
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.lightness_update(self.scale, 0));
        Ok(())
    }
}

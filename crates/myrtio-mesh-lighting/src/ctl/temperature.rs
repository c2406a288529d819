//! Light CTL temperature on the temperature element

use myrtio_mesh_model::{
    RequestMeta, StateKind,
    model::{GENERIC_LEVEL_SERVER, LIGHT_CTL_SERVER},
    state::CtlTemperature,
};

use super::CtlServer;
use crate::{
    error::EngineError,
    ports::MeshPlatform,
    publish,
    transition::{DelayedAction, IMMEDIATE, Schedule, Timing, millis},
};

impl CtlServer {
    pub fn temperature_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        request: CtlTemperature,
    ) -> Result<(), EngineError> {
        let timing = Timing::from(meta);
        let temperature = self.record.clamp_temperature(request.temperature);
        log::debug!(
            "ctl: temperature request, temperature={} delta_uv={} transition={} delay={}",
            temperature,
            request.delta_uv,
            timing.transition_ms,
            timing.delay_ms
        );

        if self.temperature.is_current(
            (self.record.temperature_current, self.record.delta_uv_current),
            (self.record.temperature_target, self.record.delta_uv_target),
            (temperature, request.delta_uv),
        ) {
            log::debug!("ctl: request for current state received, no op");
            publish::respond(platform, meta, self.temperature_update(0));
            return Ok(());
        }

        self.cancel_channels(platform)?;
        self.record.temperature_target = temperature;
        self.record.delta_uv_target = request.delta_uv;
        self.sync_level_target();
        match self.temperature.request(platform, timing)? {
            Schedule::Immediate => {
                self.commit_temperature();
                platform.set_temperature(temperature, request.delta_uv, IMMEDIATE);
            }
            Schedule::Delayed => {}
            Schedule::Transition(transition_ms) => {
                platform.set_temperature(temperature, request.delta_uv, millis(transition_ms));
            }
        }
        self.changed(platform)?;
        publish::reset_scene(platform, self.config.temperature_element_index);

        let remaining_ms = timing.remaining_ms();
        publish::respond(platform, meta, self.temperature_update(remaining_ms));
        publish::update_and_publish(platform, &self.temperature_update(remaining_ms));
        self.publish_temperature_bound(platform);
        Ok(())
    }

    /// Temperature reported changed by the stack
    pub fn temperature_change<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        state: CtlTemperature,
    ) -> Result<(), EngineError> {
        if self.record.temperature_current == state.temperature
            && self.record.delta_uv_current == state.delta_uv
        {
            log::debug!("ctl: temperature change to the same value");
            return Ok(());
        }
        log::debug!(
            "ctl: temperature changed {} -> {}, delta uv {} -> {}",
            self.record.temperature_current,
            state.temperature,
            self.record.delta_uv_current,
            state.delta_uv
        );
        self.record.temperature_current = state.temperature;
        self.record.delta_uv_current = state.delta_uv;
        self.changed(platform)?;
        Ok(())
    }

    /// Scene recall of the temperature state
    pub fn temperature_recall<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        current: CtlTemperature,
        target: Option<CtlTemperature>,
        transition_ms: u32,
    ) -> Result<(), EngineError> {
        let state = match (transition_ms, target) {
            (0, _) | (_, None) => current,
            (_, Some(target)) => target,
        };
        let temperature = self.record.clamp_temperature(state.temperature);
        if self.record.temperature_current == temperature
            && self.record.delta_uv_current == state.delta_uv
        {
            log::debug!("ctl: recall of current temperature, no op");
            return Ok(());
        }

        log::debug!("ctl: recall temperature {} over {} ms", temperature, transition_ms);
        self.cancel_channels(platform)?;
        self.record.temperature_target = temperature;
        self.record.delta_uv_target = state.delta_uv;
        self.sync_level_target();
        if transition_ms == 0 {
            self.commit_temperature();
            platform.set_temperature(temperature, state.delta_uv, IMMEDIATE);
        } else {
            platform.set_temperature(temperature, state.delta_uv, millis(transition_ms));
            self.temperature.start_transition(platform, transition_ms)?;
        }
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.temperature_update(transition_ms));
        Ok(())
    }

    pub(super) fn temperature_delay_elapsed<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), EngineError> {
        let Some(DelayedAction::Apply { transition_ms }) = self.temperature.take_delayed() else {
            return Ok(());
        };
        log::debug!(
            "ctl: starting delayed temperature request {} -> {}, {} ms",
            self.record.temperature_current,
            self.record.temperature_target,
            transition_ms
        );

        platform.set_temperature(
            self.record.temperature_target,
            self.record.delta_uv_target,
            millis(transition_ms),
        );
        if transition_ms == 0 {
            self.commit_temperature();
            self.changed(platform)?;
            publish::update_and_publish(platform, &self.temperature_update(0));
        } else {
            self.temperature.start_transition(platform, transition_ms)?;
        }
        Ok(())
    }

    pub(super) fn temperature_transition_complete<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), EngineError> {
        if !self.temperature.finish() {
            return Ok(());
        }
        self.commit_temperature();
        log::debug!(
            "ctl: temperature transition complete, temperature={} delta_uv={}",
            self.record.temperature_current,
            self.record.delta_uv_current
        );
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.temperature_update(0));
        self.publish_temperature_bound(platform);
        Ok(())
    }

    /// Publish the CTL state and the secondary level bound to the temperature
    pub(super) fn publish_temperature_bound<P: MeshPlatform>(&self, platform: &mut P) {
        publish::publish(platform, LIGHT_CTL_SERVER, self.config.element_index, StateKind::Ctl);
        publish::publish(
            platform,
            GENERIC_LEVEL_SERVER,
            self.config.temperature_element_index,
            StateKind::Level,
        );
    }
}

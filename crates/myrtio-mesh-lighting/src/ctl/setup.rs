//! Light CTL setup: default CTL state and temperature range

use myrtio_mesh_model::{
    RequestMeta, State,
    state::{CtlTriple, Range},
};

use super::CtlServer;
use crate::{
    error::EngineError,
    lighting::LightingServer,
    ports::{MeshPlatform, StateUpdate},
    publish,
    transition::IMMEDIATE,
};

impl CtlServer {
    pub fn default_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        lighting: &mut LightingServer,
        meta: &RequestMeta,
        default: CtlTriple,
    ) -> Result<(), EngineError> {
        log::debug!(
            "ctl: default request, lightness={} temperature={} delta_uv={}",
            default.lightness,
            default.temperature,
            default.delta_uv
        );
        let unchanged = lighting.lightness_default() == default.lightness
            && self.record.temperature_default == default.temperature
            && self.record.delta_uv_default == default.delta_uv;
        if unchanged {
            log::debug!("ctl: request for current state received, no op");
        } else {
            if lighting.lightness_default() != default.lightness {
                lighting.set_lightness_default(platform, default.lightness)?;
            }
            self.record.temperature_default = default.temperature;
            self.record.delta_uv_default = default.delta_uv;
            self.record.validate_and_correct(&self.config);
            self.changed(platform)?;
        }
        setup_reply(platform, meta, self.default_update(lighting));
        Ok(())
    }

    pub fn temperature_range_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        range: Range,
    ) -> Result<(), EngineError> {
        log::debug!(
            "ctl: temperature range request, min={} max={}",
            range.min,
            range.max
        );
        if self.range() == range {
            log::debug!("ctl: request for current state received, no op");
        } else {
            let before = self.record.temperature_current;
            self.record.temperature_min = range.min;
            self.record.temperature_max = range.max;
            self.record.validate_and_correct(&self.config);
            self.record.sec_level_current = self.level_of(self.record.temperature_current);
            self.sync_level_target();
            if self.record.temperature_current != before {
                platform.set_temperature(
                    self.record.temperature_current,
                    self.record.delta_uv_current,
                    IMMEDIATE,
                );
            }
            self.changed(platform)?;
        }
        setup_reply(platform, meta, self.range_update());
        Ok(())
    }

    /// Default state or temperature range reported changed by the stack
    pub fn setup_change<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        lighting: &mut LightingServer,
        state: &State<'_>,
    ) -> Result<(), EngineError> {
        match *state {
            State::CtlDefault(default) => {
                if lighting.lightness_default() != default.lightness {
                    lighting.set_lightness_default(platform, default.lightness)?;
                }
                if self.record.temperature_default != default.temperature
                    || self.record.delta_uv_default != default.delta_uv
                {
                    self.record.temperature_default = default.temperature;
                    self.record.delta_uv_default = default.delta_uv;
                    self.record.validate_and_correct(&self.config);
                    self.changed(platform)?;
                }
            }
            State::CtlTemperatureRange(range) if range != self.range() => {
                log::debug!(
                    "ctl: temperature range changed to {}..={}",
                    range.min,
                    range.max
                );
                self.record.temperature_min = range.min;
                self.record.temperature_max = range.max;
                self.record.validate_and_correct(&self.config);
                self.record.sec_level_current = self.level_of(self.record.temperature_current);
                self.sync_level_target();
                self.changed(platform)?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Setup servers answer when asked and otherwise only update
fn setup_reply<P: MeshPlatform>(platform: &mut P, meta: &RequestMeta, update: StateUpdate<'_>) {
    if meta.response_required() {
        publish::respond(platform, meta, update);
    } else {
        publish::update(platform, &update);
    }
}

//! Light Lightness setup: default lightness and lightness range

use myrtio_mesh_model::{RequestMeta, State, state::Range};

use super::LightingServer;
use crate::{
    convert::lightness_to_level, error::EngineError, ports::MeshPlatform, publish,
    transition::IMMEDIATE,
};

impl LightingServer {
    pub fn lightness_default_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        lightness: u16,
    ) -> Result<(), EngineError> {
        log::debug!("lighting: default lightness request, lightness={}", lightness);
        if self.record.lightness_default == lightness {
            log::debug!("lighting: request for current state received, no op");
        } else {
            self.set_lightness_default(platform, lightness)?;
        }
        self.setup_reply(
            platform,
            meta,
            State::LightnessDefault(self.record.lightness_default),
        );
        Ok(())
    }

    pub fn lightness_range_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        range: Range,
    ) -> Result<(), EngineError> {
        log::debug!(
            "lighting: lightness range request, min={} max={}",
            range.min,
            range.max
        );
        if self.range() == range {
            log::debug!("lighting: request for current state received, no op");
        } else {
            self.set_range(platform, range)?;
        }
        self.setup_reply(platform, meta, State::LightnessRange(self.range()));
        Ok(())
    }

    /// Default lightness or range reported changed by the stack
    pub fn setup_change<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        state: &State<'_>,
    ) -> Result<(), EngineError> {
        match *state {
            State::LightnessDefault(lightness) if lightness != self.record.lightness_default => {
                log::debug!(
                    "lighting: default lightness changed {} -> {}",
                    self.record.lightness_default,
                    lightness
                );
                self.set_lightness_default(platform, lightness)?;
            }
            State::LightnessRange(range) if range != self.range() => {
                log::debug!("lighting: lightness range changed to {}..={}", range.min, range.max);
                self.set_range(platform, range)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Apply a new range and pull the lightness back inside it
    fn set_range<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        range: Range,
    ) -> Result<(), EngineError> {
        let before = self.record.lightness_current;
        self.record.lightness_min = range.min;
        self.record.lightness_max = range.max;
        self.record.validate_and_correct();
        self.record.pri_level_current = lightness_to_level(self.record.lightness_current);
        self.record.pri_level_target = lightness_to_level(self.record.lightness_target);
        if self.record.lightness_current != before {
            log::debug!(
                "lighting: lightness {} moved into range as {}",
                before,
                self.record.lightness_current
            );
            platform.set_lightness(self.record.lightness_current, IMMEDIATE);
        }
        self.changed(platform)?;
        Ok(())
    }

    /// Setup servers answer when asked and otherwise only update
    fn setup_reply<P: MeshPlatform>(
        &self,
        platform: &mut P,
        meta: &RequestMeta,
        state: State<'static>,
    ) {
        let update = self.setup_update(state);
        if meta.response_required() {
            publish::respond(platform, meta, update);
        } else {
            publish::update(platform, &update);
        }
    }
}

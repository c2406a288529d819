//! Generic OnOff, Power OnOff and Default Transition Time

use myrtio_mesh_model::{
    RequestMeta, StateKind,
    model::{GENERIC_LEVEL_SERVER, LIGHT_LIGHTNESS_SERVER},
    transition_time::UNKNOWN_STEPS,
};

use super::LightingServer;
use crate::{
    error::EngineError,
    ports::MeshPlatform,
    publish,
    record::{ON_POWER_UP_RESTORE, ONOFF_OFF, ONOFF_ON},
    transition::{DelayedAction, IMMEDIATE, Schedule, Timing, millis},
};

const BOUND_TO_ONOFF: [(u16, StateKind); 2] = [
    (LIGHT_LIGHTNESS_SERVER, StateKind::LightnessActual),
    (GENERIC_LEVEL_SERVER, StateKind::Level),
];

const fn onoff_name(onoff: u8) -> &'static str {
    if onoff == ONOFF_OFF { "OFF" } else { "ON" }
}

impl LightingServer {
    /// Lightness an on/off state drives the light to
    const fn onoff_lightness(&self, onoff: u8) -> u16 {
        if onoff == ONOFF_OFF {
            0
        } else {
            self.record.lightness_last
        }
    }

    pub fn onoff_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        onoff: u8,
    ) -> Result<(), EngineError> {
        let onoff = u8::from(onoff != ONOFF_OFF);
        let timing = Timing::from(meta);
        log::debug!(
            "lighting: on/off request, state={} transition={} delay={}",
            onoff_name(onoff),
            timing.transition_ms,
            timing.delay_ms
        );

        if self.onoff.is_current(self.record.onoff_current, self.record.onoff_target, onoff) {
            log::debug!("lighting: request for current state received, no op");
            publish::respond(platform, meta, self.onoff_update(0));
            return Ok(());
        }

        log::debug!("lighting: turning light {}", onoff_name(onoff));
        self.cancel_channels(platform)?;
        self.record.onoff_target = onoff;
        self.record.lightness_target = self.onoff_lightness(onoff);
        match self.onoff.request(platform, timing)? {
            Schedule::Immediate => {
                platform.set_lightness(self.record.lightness_target, IMMEDIATE);
                self.commit_lightness();
            }
            Schedule::Delayed => {}
            Schedule::Transition(transition_ms) => {
                if onoff == ONOFF_ON {
                    self.record.onoff_current = ONOFF_ON;
                }
                platform.set_lightness(self.record.lightness_target, millis(transition_ms));
            }
        }
        self.changed(platform)?;
        publish::reset_scene(platform, self.config.element_index);

        let remaining_ms = timing.remaining_ms();
        publish::respond(platform, meta, self.onoff_update(remaining_ms));
        publish::update_and_publish(platform, &self.onoff_update(remaining_ms));
        self.publish_bound(platform, &BOUND_TO_ONOFF);
        Ok(())
    }

    /// On/off reported changed by the stack
    pub fn onoff_change<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        onoff: u8,
    ) -> Result<(), EngineError> {
        if self.record.onoff_current == onoff {
            log::debug!("lighting: on/off change to the same state");
            return Ok(());
        }
        log::debug!("lighting: on/off changed {} -> {}", self.record.onoff_current, onoff);
        self.record.onoff_current = onoff;
        self.changed(platform)?;
        Ok(())
    }

    /// Scene recall of the on/off state
    pub fn onoff_recall<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        current: u8,
        target: Option<u8>,
        transition_ms: u32,
    ) -> Result<(), EngineError> {
        let onoff = match (transition_ms, target) {
            (0, _) | (_, None) => current,
            (_, Some(target)) => target,
        };
        let onoff = u8::from(onoff != ONOFF_OFF);
        if self.record.onoff_current == onoff {
            log::debug!("lighting: recall of current on/off state, no op");
            return Ok(());
        }

        log::debug!("lighting: recall on/off {} over {} ms", onoff_name(onoff), transition_ms);
        self.cancel_channels(platform)?;
        self.record.onoff_target = onoff;
        self.record.lightness_target = self.onoff_lightness(onoff);
        if transition_ms == 0 {
            platform.set_lightness(self.record.lightness_target, IMMEDIATE);
            self.commit_lightness();
        } else {
            if onoff == ONOFF_ON {
                self.record.onoff_current = ONOFF_ON;
            }
            platform.set_lightness(self.record.lightness_target, millis(transition_ms));
            self.onoff.start_transition(platform, transition_ms)?;
        }
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.onoff_update(transition_ms));
        Ok(())
    }

    pub(super) fn onoff_delay_elapsed<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), EngineError> {
        let Some(DelayedAction::Apply { transition_ms }) = self.onoff.take_delayed() else {
            return Ok(());
        };
        log::debug!(
            "lighting: starting delayed on/off request {} -> {}, {} ms",
            self.record.onoff_current,
            self.record.onoff_target,
            transition_ms
        );

        self.record.lightness_target = self.onoff_lightness(self.record.onoff_target);
        if transition_ms == 0 {
            platform.set_lightness(self.record.lightness_target, IMMEDIATE);
            self.commit_lightness();
            self.changed(platform)?;
            publish::update_and_publish(platform, &self.onoff_update(0));
            self.publish_bound(platform, &BOUND_TO_ONOFF);
            return Ok(());
        }

        if self.record.onoff_target == ONOFF_ON {
            self.record.onoff_current = ONOFF_ON;
        }
        platform.set_lightness(self.record.lightness_target, millis(transition_ms));
        self.onoff.start_transition(platform, transition_ms)?;
        publish::update(platform, &self.onoff_update(transition_ms));
        Ok(())
    }

    pub(super) fn onoff_transition_complete<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), EngineError> {
        if !self.onoff.finish() {
            return Ok(());
        }
        self.commit_lightness();
        log::debug!(
            "lighting: on/off transition complete, state is {}",
            onoff_name(self.record.onoff_current)
        );
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.onoff_update(0));
        self.publish_bound(platform, &BOUND_TO_ONOFF);
        Ok(())
    }

    /// Set the on power up behaviour (OFF, ON or RESTORE)
    pub fn power_onoff_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        on_power_up: u8,
    ) -> Result<(), EngineError> {
        log::debug!(
            "lighting: on power up request, current={} requested={}",
            self.record.on_power_up,
            on_power_up
        );
        if on_power_up > ON_POWER_UP_RESTORE {
            log::warn!("lighting: invalid on power up state {}, ignored", on_power_up);
        } else if self.record.on_power_up == on_power_up {
            log::debug!("lighting: request for current state received, no op");
        } else {
            self.record.on_power_up = on_power_up;
            self.changed(platform)?;
        }
        publish::respond(platform, meta, self.power_onoff_update());
        publish::update_and_publish(platform, &self.power_onoff_update());
        Ok(())
    }

    pub fn power_onoff_change<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        on_power_up: u8,
    ) -> Result<(), EngineError> {
        if on_power_up > ON_POWER_UP_RESTORE || self.record.on_power_up == on_power_up {
            return Ok(());
        }
        self.record.on_power_up = on_power_up;
        self.changed(platform)?;
        Ok(())
    }

    /// Set the default transition time byte
    pub fn transition_time_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        transition_time: u8,
    ) -> Result<(), EngineError> {
        log::debug!(
            "lighting: transition time request, current=0x{:02x} requested=0x{:02x}",
            self.record.transition_time,
            transition_time
        );
        if transition_time & UNKNOWN_STEPS == UNKNOWN_STEPS {
            log::warn!("lighting: unknown transition time 0x{:02x}, ignored", transition_time);
        } else if self.record.transition_time == transition_time {
            log::debug!("lighting: request for current state received, no op");
        } else {
            self.record.transition_time = transition_time;
            self.changed(platform)?;
        }
        publish::respond(platform, meta, self.transition_time_update());
        publish::update_and_publish(platform, &self.transition_time_update());
        Ok(())
    }

    pub fn transition_time_change<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        transition_time: u8,
    ) -> Result<(), EngineError> {
        if self.record.transition_time == transition_time {
            return Ok(());
        }
        self.record.transition_time = transition_time;
        self.changed(platform)?;
        Ok(())
    }
}

//! Secondary Generic Level bound to the color temperature

use myrtio_mesh_model::{
    RequestMeta, StateKind, model::LIGHT_CTL_TEMPERATURE_SERVER,
    transition_time::UNKNOWN_REMAINING_TIME,
};

use super::CtlServer;
use crate::{
    convert::{level_to_temperature, saturating_level},
    error::{EngineError, TimerError},
    ports::{LightingOutput, MeshPlatform, TimerService},
    publish,
    transition::{DelayedAction, IMMEDIATE, Schedule, Timing, millis},
};

impl CtlServer {
    /// Temperature matching a secondary level in the current range
    const fn temperature_of(&self, level: i16) -> u16 {
        level_to_temperature(level, self.record.temperature_min, self.record.temperature_max)
    }

    /// Drive the temperature output, keeping the delta UV
    fn drive_temperature<O: LightingOutput>(
        &self,
        output: &mut O,
        temperature: u16,
        transition_ms: u32,
    ) {
        output.set_temperature(temperature, self.record.delta_uv_current, millis(transition_ms));
    }

    pub fn level_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        level: i16,
    ) -> Result<(), EngineError> {
        let timing = Timing::from(meta);
        log::debug!(
            "ctl: secondary level request, level={} transition={} delay={}",
            level,
            timing.transition_ms,
            timing.delay_ms
        );
        self.level.stop_move(platform)?;

        if self.level.is_current(
            self.record.sec_level_current,
            self.record.sec_level_target,
            level,
        ) {
            log::debug!("ctl: request for current state received, no op");
            publish::respond(platform, meta, self.level_update(0));
            return Ok(());
        }

        let temperature = self.temperature_of(level);
        log::debug!("ctl: setting secondary level to {} (temperature {})", level, temperature);
        self.cancel_channels(platform)?;
        self.record.sec_level_target = level;
        self.record.temperature_target = temperature;
        self.record.delta_uv_target = self.record.delta_uv_current;
        match self.level.request(platform, timing)? {
            Schedule::Immediate => {
                self.record.sec_level_current = level;
                self.record.temperature_current = temperature;
                self.drive_temperature(platform, temperature, 0);
            }
            Schedule::Delayed => {}
            Schedule::Transition(transition_ms) => {
                self.drive_temperature(platform, temperature, transition_ms);
            }
        }
        self.changed(platform)?;
        publish::reset_scene(platform, self.config.temperature_element_index);
        self.level_reply(platform, meta, timing.remaining_ms());
        Ok(())
    }

    pub fn level_delta_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        delta: i32,
    ) -> Result<(), EngineError> {
        let level = saturating_level(self.record.sec_level_current, delta);
        log::debug!("ctl: secondary level delta request, delta={} level={}", delta, level);
        self.level_request(platform, meta, level)
    }

    pub fn level_move_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        delta: i16,
    ) -> Result<(), EngineError> {
        let timing = Timing::from(meta);
        log::debug!(
            "ctl: secondary level move request, delta={} transition={} delay={}",
            delta,
            timing.transition_ms,
            timing.delay_ms
        );
        self.level.cancel(platform)?;

        if delta == 0 || timing.transition_ms == 0 {
            log::debug!("ctl: move without delta or step time, stopping");
            self.record.sec_level_target = self.record.sec_level_current;
            publish::respond(platform, meta, self.level_update(0));
            publish::update_and_publish(platform, &self.level_update(0));
            return Ok(());
        }

        let target = if delta > 0 { i16::MAX } else { i16::MIN };
        if self.record.sec_level_current == target {
            log::debug!("ctl: request for current state received, no op");
            self.record.sec_level_target = target;
            publish::respond(platform, meta, self.level_update(0));
            return Ok(());
        }

        self.cancel_channels(platform)?;
        self.level.set_move(i32::from(delta), timing.transition_ms);
        self.record.sec_level_target = target;
        self.record.temperature_target = self.temperature_of(target);
        if timing.delay_ms > 0 {
            self.level.delay(platform, timing.delay_ms, DelayedAction::Move)?;
        } else {
            self.schedule_level_step(platform)?;
        }
        self.changed(platform)?;
        publish::reset_scene(platform, self.config.temperature_element_index);
        self.level_reply(platform, meta, UNKNOWN_REMAINING_TIME);
        Ok(())
    }

    pub fn level_halt_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
    ) -> Result<(), EngineError> {
        log::debug!("ctl: secondary level halt request, delay={}", meta.delay_ms);
        let remaining_ms = if meta.delay_ms > 0 {
            self.level.delay_halt(platform, meta.delay_ms)?;
            u32::from(meta.delay_ms)
        } else {
            self.halt(platform)?;
            self.changed(platform)?;
            0
        };
        self.level_reply(platform, meta, remaining_ms);
        Ok(())
    }

    /// Secondary level reported changed by the stack
    pub fn level_change<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        level: i16,
    ) -> Result<(), EngineError> {
        if self.record.sec_level_current == level {
            log::debug!("ctl: secondary level change to the same value ({})", level);
            return Ok(());
        }
        log::debug!(
            "ctl: secondary level changed {} -> {}",
            self.record.sec_level_current,
            level
        );
        self.record.sec_level_current = level;
        self.changed(platform)?;
        self.level.stop_move(platform)?;
        Ok(())
    }

    /// Scene recall of the secondary level
    pub fn level_recall<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        current: i16,
        target: Option<i16>,
        transition_ms: u32,
    ) -> Result<(), EngineError> {
        let level = match (transition_ms, target) {
            (0, _) | (_, None) => current,
            (_, Some(target)) => target,
        };
        if self.record.sec_level_current == level {
            log::debug!("ctl: recall of current secondary level, no op");
            return Ok(());
        }

        log::debug!("ctl: recall secondary level {} over {} ms", level, transition_ms);
        self.cancel_channels(platform)?;
        let temperature = self.temperature_of(level);
        self.record.sec_level_target = level;
        self.record.temperature_target = temperature;
        if transition_ms == 0 {
            self.record.sec_level_current = level;
            self.record.temperature_current = temperature;
        } else {
            self.level.start_transition(platform, transition_ms)?;
        }
        self.drive_temperature(platform, temperature, transition_ms);
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.level_update(transition_ms));
        Ok(())
    }

    pub(super) fn level_delay_elapsed<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), EngineError> {
        let Some(action) = self.level.take_delayed() else {
            return Ok(());
        };
        log::debug!(
            "ctl: starting delayed secondary level request {} -> {}, {:?}",
            self.record.sec_level_current,
            self.record.sec_level_target,
            action
        );

        match action {
            DelayedAction::Apply { transition_ms } => {
                self.drive_temperature(platform, self.record.temperature_target, transition_ms);
                if transition_ms == 0 {
                    self.settle_level();
                    self.changed(platform)?;
                    publish::update_and_publish(platform, &self.level_update(0));
                } else {
                    self.level.start_transition(platform, transition_ms)?;
                }
            }
            DelayedAction::Move => {
                self.schedule_level_step(platform)?;
                publish::update_and_publish(platform, &self.level_update(UNKNOWN_REMAINING_TIME));
            }
            DelayedAction::Halt => {
                self.halt(platform)?;
                self.changed(platform)?;
                publish::update_and_publish(platform, &self.level_update(0));
            }
        }
        Ok(())
    }

    pub(super) fn level_transition_complete<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), EngineError> {
        if !self.level.finish() {
            return Ok(());
        }
        self.settle_level();
        log::debug!(
            "ctl: secondary level transition complete, level is {}",
            self.record.sec_level_current
        );
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.level_update(0));
        Ok(())
    }

    pub(super) fn level_move_step<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), EngineError> {
        if !self.level.is_moving() {
            return Ok(());
        }
        let (current, target) = (self.record.sec_level_current, self.record.sec_level_target);
        let level = self.level.step_value(current, target);
        log::debug!(
            "ctl: secondary level move {} -> {}, delta {}",
            current,
            level,
            self.level.move_delta()
        );

        self.record.sec_level_current = level;
        self.record.temperature_current = if level == target {
            self.record.temperature_target
        } else {
            self.temperature_of(level)
        };
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.level_update(UNKNOWN_REMAINING_TIME));

        if level == target {
            self.level.settle();
        } else {
            self.schedule_level_step(platform)?;
        }
        Ok(())
    }

    fn schedule_level_step<P: LightingOutput + TimerService>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), TimerError> {
        let (current, target) = (self.record.sec_level_current, self.record.sec_level_target);
        let remaining = i32::from(target) - i32::from(current);
        let step = self.level.schedule_move_step(platform, remaining)?;
        let temperature = if step.reaches_target {
            self.record.temperature_target
        } else {
            self.temperature_of(self.level.step_value(current, target))
        };
        self.drive_temperature(platform, temperature, step.duration_ms);
        Ok(())
    }

    fn halt<P: LightingOutput + TimerService>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), TimerError> {
        self.cancel_channels(platform)?;
        self.record.temperature_target = self.record.temperature_current;
        self.record.sec_level_target = self.record.sec_level_current;
        self.record.delta_uv_target = self.record.delta_uv_current;
        platform.set_temperature(
            self.record.temperature_current,
            self.record.delta_uv_current,
            IMMEDIATE,
        );
        Ok(())
    }

    /// Make the secondary level target current
    fn settle_level(&mut self) {
        self.record.sec_level_current = self.record.sec_level_target;
        self.record.temperature_current = self.record.temperature_target;
    }

    fn level_reply<P: MeshPlatform>(
        &self,
        platform: &mut P,
        meta: &RequestMeta,
        remaining_ms: u32,
    ) {
        publish::respond(platform, meta, self.level_update(remaining_ms));
        publish::update_and_publish(platform, &self.level_update(remaining_ms));
        publish::publish(
            platform,
            LIGHT_CTL_TEMPERATURE_SERVER,
            self.config.temperature_element_index,
            StateKind::CtlTemperature,
        );
    }
}

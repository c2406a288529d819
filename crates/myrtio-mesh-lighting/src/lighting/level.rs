//! Primary Generic Level bound to the lightness

use myrtio_mesh_model::{
    RequestMeta, StateKind, model::LIGHT_LIGHTNESS_SERVER,
    transition_time::UNKNOWN_REMAINING_TIME,
};

use super::LightingServer;
use crate::{
    convert::{level_to_lightness, lightness_to_level, saturating_level},
    error::{EngineError, TimerError},
    ports::{LightingOutput, MeshPlatform, TimerService},
    publish,
    transition::{DelayedAction, IMMEDIATE, Schedule, Timing, millis},
};

const BOUND_TO_LEVEL: [(u16, StateKind); 1] =
    [(LIGHT_LIGHTNESS_SERVER, StateKind::LightnessActual)];

impl LightingServer {
    /// Lightness for a level, kept inside the lightness range
    fn level_lightness(&self, level: i16) -> u16 {
        self.record.clamp_lightness(level_to_lightness(level))
    }

    pub fn level_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        level: i16,
    ) -> Result<(), EngineError> {
        let timing = Timing::from(meta);
        log::debug!(
            "lighting: level request, level={} transition={} delay={}",
            level,
            timing.transition_ms,
            timing.delay_ms
        );
        self.level.stop_move(platform)?;

        if self.level.is_current(
            self.record.pri_level_current,
            self.record.pri_level_target,
            level,
        ) {
            log::debug!("lighting: request for current state received, no op");
            publish::respond(platform, meta, self.level_update(0));
            return Ok(());
        }

        let lightness = self.level_lightness(level);
        log::debug!("lighting: setting level to {} (lightness {})", level, lightness);
        self.cancel_channels(platform)?;
        self.record.lightness_target = lightness;
        self.record.pri_level_target = lightness_to_level(lightness);
        match self.level.request(platform, timing)? {
            Schedule::Immediate => {
                platform.set_lightness(lightness, IMMEDIATE);
                self.commit_lightness();
            }
            Schedule::Delayed => {}
            Schedule::Transition(transition_ms) => {
                platform.set_lightness(lightness, millis(transition_ms));
            }
        }
        self.changed(platform)?;
        publish::reset_scene(platform, self.config.element_index);
        self.level_reply(platform, meta, timing.remaining_ms());
        Ok(())
    }

    /// Change the level by `delta` relative to the current level
    pub fn level_delta_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        delta: i32,
    ) -> Result<(), EngineError> {
        let level = saturating_level(self.record.pri_level_current, delta);
        log::debug!("lighting: level delta request, delta={} level={}", delta, level);
        self.level_request(platform, meta, level)
    }

    /// Start moving the level by `delta` per transition time
    pub fn level_move_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
        delta: i16,
    ) -> Result<(), EngineError> {
        let timing = Timing::from(meta);
        log::debug!(
            "lighting: level move request, delta={} transition={} delay={}",
            delta,
            timing.transition_ms,
            timing.delay_ms
        );
        self.level.cancel(platform)?;

        if delta == 0 || timing.transition_ms == 0 {
            log::debug!("lighting: move without delta or step time, stopping");
            self.record.pri_level_target = self.record.pri_level_current;
            publish::respond(platform, meta, self.level_update(0));
            publish::update_and_publish(platform, &self.level_update(0));
            return Ok(());
        }

        let bound = if delta > 0 { i16::MAX } else { i16::MIN };
        let lightness = self.level_lightness(bound);
        let target = lightness_to_level(lightness);
        if self.record.pri_level_current == target {
            log::debug!("lighting: request for current state received, no op");
            self.record.pri_level_target = target;
            publish::respond(platform, meta, self.level_update(0));
            return Ok(());
        }

        self.cancel_channels(platform)?;
        self.level.set_move(i32::from(delta), timing.transition_ms);
        self.record.pri_level_target = target;
        self.record.lightness_target = lightness;
        if timing.delay_ms > 0 {
            self.level.delay(platform, timing.delay_ms, DelayedAction::Move)?;
        } else {
            self.schedule_level_step(platform)?;
        }
        self.changed(platform)?;
        publish::reset_scene(platform, self.config.element_index);
        self.level_reply(platform, meta, UNKNOWN_REMAINING_TIME);
        Ok(())
    }

    /// Stop at the last computed level
    pub fn level_halt_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        meta: &RequestMeta,
    ) -> Result<(), EngineError> {
        log::debug!("lighting: level halt request, delay={}", meta.delay_ms);
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

    /// Primary level reported changed by the stack
    pub fn level_change<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        level: i16,
    ) -> Result<(), EngineError> {
        if self.record.pri_level_current == level {
            log::debug!("lighting: level change to the same value ({})", level);
            return Ok(());
        }
        log::debug!("lighting: level changed {} -> {}", self.record.pri_level_current, level);
        self.record.pri_level_current = level;
        self.changed(platform)?;
        self.level.stop_move(platform)?;
        Ok(())
    }

    /// Scene recall of the primary level
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
        if self.record.pri_level_current == level {
            log::debug!("lighting: recall of current level, no op");
            return Ok(());
        }

        log::debug!("lighting: recall level {} over {} ms", level, transition_ms);
        self.cancel_channels(platform)?;
        let lightness = self.level_lightness(level);
        self.record.lightness_target = lightness;
        self.record.pri_level_target = lightness_to_level(lightness);
        if transition_ms == 0 {
            platform.set_lightness(lightness, IMMEDIATE);
            self.commit_lightness();
        } else {
            platform.set_lightness(lightness, millis(transition_ms));
            self.level.start_transition(platform, transition_ms)?;
        }
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
            "lighting: starting delayed level request {} -> {}, {:?}",
            self.record.pri_level_current,
            self.record.pri_level_target,
            action
        );

        match action {
            DelayedAction::Apply { transition_ms } => {
                platform.set_lightness(self.record.lightness_target, millis(transition_ms));
                if transition_ms == 0 {
                    self.commit_lightness();
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
        self.commit_lightness();
        log::debug!(
            "lighting: level transition complete, level is {}",
            self.record.pri_level_current
        );
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.level_update(0));
        Ok(())
    }

    /// One step of a running move
    pub(super) fn level_move_step<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), EngineError> {
        if !self.level.is_moving() {
            return Ok(());
        }
        let (current, target) = (self.record.pri_level_current, self.record.pri_level_target);
        let level = self.level.step_value(current, target);
        log::debug!(
            "lighting: level move {} -> {}, delta {}",
            current,
            level,
            self.level.move_delta()
        );

        self.record.pri_level_current = level;
        self.record.lightness_current = if level == target {
            self.record.lightness_target
        } else {
            self.level_lightness(level)
        };
        if self.record.lightness_current != 0 {
            self.record.lightness_last = self.record.lightness_current;
        }
        self.record.onoff_current = u8::from(self.record.lightness_current != 0);
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.level_update(UNKNOWN_REMAINING_TIME));

        if level == target {
            self.level.settle();
        } else {
            self.schedule_level_step(platform)?;
        }
        Ok(())
    }

    /// Arm the next move step and drive the output towards its value
    fn schedule_level_step<P: LightingOutput + TimerService>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), TimerError> {
        let (current, target) = (self.record.pri_level_current, self.record.pri_level_target);
        let remaining = i32::from(target) - i32::from(current);
        let step = self.level.schedule_move_step(platform, remaining)?;
        let lightness = if step.reaches_target {
            self.record.lightness_target
        } else {
            self.level_lightness(self.level.step_value(current, target))
        };
        platform.set_lightness(lightness, millis(step.duration_ms));
        Ok(())
    }

    /// Stop every running change and hold the current lightness
    fn halt<P: LightingOutput + TimerService>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), TimerError> {
        self.cancel_channels(platform)?;
        self.record.lightness_target = self.record.lightness_current;
        self.record.pri_level_target = self.record.pri_level_current;
        let onoff = u8::from(self.record.lightness_current != 0);
        self.record.onoff_current = onoff;
        self.record.onoff_target = onoff;
        platform.set_lightness(self.record.lightness_current, IMMEDIATE);
        Ok(())
    }

    /// Respond, report the level and publish the bound lightness
    fn level_reply<P: MeshPlatform>(
        &self,
        platform: &mut P,
        meta: &RequestMeta,
        remaining_ms: u32,
    ) {
        publish::respond(platform, meta, self.level_update(remaining_ms));
        publish::update_and_publish(platform, &self.level_update(remaining_ms));
        self.publish_bound(platform, &BOUND_TO_LEVEL);
    }
}

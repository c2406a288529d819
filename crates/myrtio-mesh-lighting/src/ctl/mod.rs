//! Light CTL server: CTL, CTL setup, CTL temperature and the secondary
//! Generic Level on the temperature element
//!
//! The lightness half of every CTL state belongs to the [`LightingServer`],
//! which the CTL handlers receive alongside the platform.

mod level;
mod setup;
mod temperature;

use embassy_time::Duration;
use myrtio_mesh_model::{
    RequestMeta, State, StateKind,
    model::{
        GENERIC_LEVEL_SERVER, LIGHT_CTL_SERVER, LIGHT_CTL_TEMPERATURE_SERVER,
        LIGHT_LIGHTNESS_SERVER,
    },
    state::{Ctl, CtlTemperature, CtlTriple, Range},
};

use crate::{
    config::CtlServerConfig,
    convert::temperature_to_level,
    error::{EngineError, TimerError},
    lighting::LightingServer,
    persistence::StoreDebouncer,
    ports::{LightingOutput, MeshPlatform, StateUpdate, TimerService},
    publish,
    record::{CtlRecord, ON_POWER_UP_OFF, ON_POWER_UP_ON, ON_POWER_UP_RESTORE},
    timer::CtlTimer,
    transition::{
        ChannelTimers, DelayedAction, IMMEDIATE, Phase, Schedule, Timing, Transition, millis,
    },
};

/// Server owning the CTL record
#[derive(Debug)]
pub struct CtlServer {
    config: CtlServerConfig,
    record: CtlRecord,
    /// Combined lightness and temperature changes
    ctl: Transition,
    temperature: Transition,
    /// Secondary level on the temperature element
    level: Transition,
    store: StoreDebouncer,
}

impl CtlServer {
    pub fn new(config: CtlServerConfig) -> Self {
        Self {
            record: CtlRecord::defaults(&config),
            ctl: Transition::new(ChannelTimers::new(CtlTimer::CtlDelayed, CtlTimer::CtlTransition)),
            temperature: Transition::new(ChannelTimers::new(
                CtlTimer::TemperatureDelayed,
                CtlTimer::TemperatureTransition,
            )),
            level: Transition::new(
                ChannelTimers::new(CtlTimer::LevelDelayed, CtlTimer::LevelTransition)
                    .with_step(CtlTimer::LevelMove),
            ),
            store: StoreDebouncer::new(CtlTimer::Save.into(), config.ps_key, config.nvm_save_time),
            config,
        }
    }

    pub const fn config(&self) -> &CtlServerConfig {
        &self.config
    }

    pub const fn record(&self) -> &CtlRecord {
        &self.record
    }

    pub const fn ctl_phase(&self) -> Phase {
        self.ctl.phase()
    }

    pub const fn temperature_phase(&self) -> Phase {
        self.temperature.phase()
    }

    pub const fn level_phase(&self) -> Phase {
        self.level.phase()
    }

    /// Load the record and apply the power-up behaviour of `lighting`
    pub fn init<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        lighting: &LightingServer,
    ) -> Result<(), EngineError> {
        self.record = self
            .store
            .load(platform)
            .unwrap_or_else(|| CtlRecord::defaults(&self.config));
        self.record.validate_and_correct(&self.config);

        let transition_ms = lighting.default_transition_ms();
        let (default_temperature, default_delta_uv) =
            (self.record.temperature_default, self.record.delta_uv_default);
        match lighting.on_power_up() {
            ON_POWER_UP_OFF | ON_POWER_UP_ON => {
                self.record.temperature_target = default_temperature;
                self.record.delta_uv_target = default_delta_uv;
                self.commit_temperature();
                platform.set_temperature(default_temperature, default_delta_uv, IMMEDIATE);
            }
            ON_POWER_UP_RESTORE => {
                let restored = self.record.temperature_target != default_temperature
                    || self.record.delta_uv_target != default_delta_uv;
                if transition_ms > 0 && restored {
                    self.record.temperature_current = default_temperature;
                    self.record.delta_uv_current = default_delta_uv;
                    platform.set_temperature(default_temperature, default_delta_uv, IMMEDIATE);
                    self.temperature.start_transition(platform, transition_ms)?;
                    platform.set_temperature(
                        self.record.temperature_target,
                        self.record.delta_uv_target,
                        millis(transition_ms),
                    );
                    self.sync_level_target();
                } else {
                    self.commit_temperature();
                    platform.set_temperature(
                        self.record.temperature_current,
                        self.record.delta_uv_current,
                        IMMEDIATE,
                    );
                }
            }
            other => log::warn!("ctl: unknown power up state {}, keeping record", other),
        }
        self.changed(platform)?;

        publish::update(platform, &self.default_update(lighting));
        publish::update(platform, &self.range_update());
        publish::update_and_publish(platform, &self.temperature_update(0));

        log::info!(
            "ctl: initialized, temperature={} delta_uv={}",
            self.record.temperature_current,
            self.record.delta_uv_current
        );
        Ok(())
    }

    /// Stop every channel and drop the persisted record
    pub fn reset<P: MeshPlatform>(&mut self, platform: &mut P) -> Result<(), EngineError> {
        self.cancel_channels(platform)?;
        self.ctl.cancel(platform)?;
        self.store.erase(platform)?;
        self.record = CtlRecord::defaults(&self.config);
        log::info!("ctl: reset to defaults");
        Ok(())
    }

    /// Handle the expiry of one of the server's timers
    pub fn on_timer<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        lighting: &mut LightingServer,
        timer: CtlTimer,
    ) -> Result<(), EngineError> {
        match timer {
            CtlTimer::Save => {
                // Failures are logged by the debouncer
                let _ = self.store.store(platform, &self.record);
                Ok(())
            }
            CtlTimer::CtlDelayed => self.ctl_delay_elapsed(platform, lighting),
            CtlTimer::CtlTransition => self.ctl_transition_complete(platform, lighting),
            CtlTimer::TemperatureDelayed => self.temperature_delay_elapsed(platform),
            CtlTimer::TemperatureTransition => self.temperature_transition_complete(platform),
            CtlTimer::LevelDelayed => self.level_delay_elapsed(platform),
            CtlTimer::LevelTransition => self.level_transition_complete(platform),
            CtlTimer::LevelMove => self.level_move_step(platform),
        }
    }

    /// Set lightness, temperature and delta UV together
    pub fn ctl_request<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        lighting: &mut LightingServer,
        meta: &RequestMeta,
        ctl: CtlTriple,
    ) -> Result<(), EngineError> {
        let timing = Timing::from(meta);
        let lightness = lighting.record().clamp_lightness(ctl.lightness);
        let temperature = self.record.clamp_temperature(ctl.temperature);
        log::debug!(
            "ctl: request, lightness={} temperature={} delta_uv={} transition={} delay={}",
            lightness,
            temperature,
            ctl.delta_uv,
            timing.transition_ms,
            timing.delay_ms
        );

        let requested = (lightness, temperature, ctl.delta_uv);
        let current = (
            lighting.lightness_current(),
            self.record.temperature_current,
            self.record.delta_uv_current,
        );
        let target = (
            lighting.lightness_target(),
            self.record.temperature_target,
            self.record.delta_uv_target,
        );
        if self.ctl.is_current(current, target, requested) {
            log::debug!("ctl: request for current state received, no op");
            publish::respond(platform, meta, self.ctl_update(lighting, 0));
            return Ok(());
        }

        self.cancel_channels(platform)?;
        lighting.bind_lightness(platform, lightness)?;
        self.record.temperature_target = temperature;
        self.record.delta_uv_target = ctl.delta_uv;
        self.sync_level_target();
        match self.ctl.request(platform, timing)? {
            Schedule::Immediate => {
                lighting.commit_bound_lightness(platform)?;
                self.commit_temperature();
                self.drive(platform, lighting, IMMEDIATE);
            }
            Schedule::Delayed => {}
            Schedule::Transition(transition_ms) => {
                self.drive(platform, lighting, millis(transition_ms));
            }
        }
        self.changed(platform)?;
        publish::reset_scene(platform, self.config.element_index);

        let remaining_ms = timing.remaining_ms();
        publish::respond(platform, meta, self.ctl_update(lighting, remaining_ms));
        publish::update_and_publish(platform, &self.ctl_update(lighting, remaining_ms));
        publish::publish(
            platform,
            LIGHT_LIGHTNESS_SERVER,
            lighting.element_index(),
            StateKind::LightnessActual,
        );
        publish::publish(
            platform,
            LIGHT_CTL_TEMPERATURE_SERVER,
            self.config.temperature_element_index,
            StateKind::CtlTemperature,
        );
        Ok(())
    }

    /// CTL state reported changed by the stack
    pub fn ctl_change<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        lighting: &mut LightingServer,
        ctl: Ctl,
    ) -> Result<(), EngineError> {
        lighting.lightness_change(platform, ctl.lightness)?;
        if self.record.temperature_current != ctl.temperature {
            log::debug!(
                "ctl: temperature changed {} -> {}",
                self.record.temperature_current,
                ctl.temperature
            );
            self.record.temperature_current = ctl.temperature;
            self.changed(platform)?;
        }
        Ok(())
    }

    /// Scene recall of the CTL state
    pub fn ctl_recall<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        lighting: &mut LightingServer,
        current: Ctl,
        target: Option<Ctl>,
        transition_ms: u32,
    ) -> Result<(), EngineError> {
        let ctl = match (transition_ms, target) {
            (0, _) | (_, None) => current,
            (_, Some(target)) => target,
        };
        let temperature = self.record.clamp_temperature(ctl.temperature);
        if lighting.lightness_current() == ctl.lightness
            && self.record.temperature_current == temperature
        {
            log::debug!("ctl: recall of current state, no op");
            return Ok(());
        }

        log::debug!(
            "ctl: recall lightness {} temperature {} over {} ms",
            ctl.lightness,
            temperature,
            transition_ms
        );
        self.cancel_channels(platform)?;
        self.ctl.cancel(platform)?;
        lighting.bind_lightness(platform, ctl.lightness)?;
        self.record.temperature_target = temperature;
        self.sync_level_target();
        if transition_ms == 0 {
            lighting.commit_bound_lightness(platform)?;
            self.commit_temperature();
            self.drive(platform, lighting, IMMEDIATE);
        } else {
            self.drive(platform, lighting, millis(transition_ms));
            self.ctl.start_transition(platform, transition_ms)?;
        }
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.ctl_update(lighting, transition_ms));
        Ok(())
    }

    fn ctl_delay_elapsed<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        lighting: &mut LightingServer,
    ) -> Result<(), EngineError> {
        let Some(DelayedAction::Apply { transition_ms }) = self.ctl.take_delayed() else {
            return Ok(());
        };
        log::debug!(
            "ctl: starting delayed request, temperature {} -> {}, {} ms",
            self.record.temperature_current,
            self.record.temperature_target,
            transition_ms
        );

        self.drive(platform, lighting, millis(transition_ms));
        if transition_ms == 0 {
            lighting.commit_bound_lightness(platform)?;
            self.commit_temperature();
            self.changed(platform)?;
            publish::update_and_publish(platform, &self.ctl_update(lighting, 0));
        } else {
            self.ctl.start_transition(platform, transition_ms)?;
        }
        Ok(())
    }

    fn ctl_transition_complete<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        lighting: &mut LightingServer,
    ) -> Result<(), EngineError> {
        if !self.ctl.finish() {
            return Ok(());
        }
        lighting.commit_bound_lightness(platform)?;
        self.commit_temperature();
        log::debug!(
            "ctl: transition complete, lightness={} temperature={} delta_uv={}",
            lighting.lightness_current(),
            self.record.temperature_current,
            self.record.delta_uv_current
        );
        self.changed(platform)?;
        publish::update_and_publish(platform, &self.ctl_update(lighting, 0));
        Ok(())
    }

    /// Report the CTL state after the lighting server moved the lightness
    pub fn lightness_changed<P: MeshPlatform>(
        &self,
        platform: &mut P,
        lighting: &LightingServer,
        remaining_ms: u32,
    ) {
        log::debug!(
            "ctl: lightness moved to {} (target {})",
            lighting.lightness_current(),
            lighting.lightness_target()
        );
        publish::update_and_publish(platform, &self.ctl_update(lighting, remaining_ms));
    }

    /// Drive both outputs towards their targets
    fn drive<O: LightingOutput>(
        &self,
        output: &mut O,
        lighting: &LightingServer,
        transition: Duration,
    ) {
        output.set_lightness(lighting.lightness_target(), transition);
        output.set_temperature(
            self.record.temperature_target,
            self.record.delta_uv_target,
            transition,
        );
    }

    pub fn ctl_update(&self, lighting: &LightingServer, remaining_ms: u32) -> StateUpdate<'static> {
        StateUpdate {
            model_id: LIGHT_CTL_SERVER,
            element_index: self.config.element_index,
            current: State::Ctl(Ctl {
                lightness: lighting.lightness_current(),
                temperature: self.record.temperature_current,
            }),
            target: (remaining_ms > 0).then_some(State::Ctl(Ctl {
                lightness: lighting.lightness_target(),
                temperature: self.record.temperature_target,
            })),
            remaining_ms,
        }
    }

    pub fn temperature_update(&self, remaining_ms: u32) -> StateUpdate<'static> {
        StateUpdate {
            model_id: LIGHT_CTL_TEMPERATURE_SERVER,
            element_index: self.config.temperature_element_index,
            current: State::CtlTemperature(CtlTemperature {
                temperature: self.record.temperature_current,
                delta_uv: self.record.delta_uv_current,
            }),
            target: (remaining_ms > 0).then_some(State::CtlTemperature(CtlTemperature {
                temperature: self.record.temperature_target,
                delta_uv: self.record.delta_uv_target,
            })),
            remaining_ms,
        }
    }

    pub fn level_update(&self, remaining_ms: u32) -> StateUpdate<'static> {
        StateUpdate {
            model_id: GENERIC_LEVEL_SERVER,
            element_index: self.config.temperature_element_index,
            current: State::Level(self.record.sec_level_current),
            target: (remaining_ms > 0).then_some(State::Level(self.record.sec_level_target)),
            remaining_ms,
        }
    }

    pub fn default_update(&self, lighting: &LightingServer) -> StateUpdate<'static> {
        self.setup_update(State::CtlDefault(CtlTriple {
            lightness: lighting.lightness_default(),
            temperature: self.record.temperature_default,
            delta_uv: self.record.delta_uv_default,
        }))
    }

    pub fn range_update(&self) -> StateUpdate<'static> {
        self.setup_update(State::CtlTemperatureRange(self.range()))
    }

    fn setup_update(&self, current: State<'static>) -> StateUpdate<'static> {
        StateUpdate {
            model_id: LIGHT_CTL_SERVER,
            element_index: self.config.element_index,
            current,
            target: None,
            remaining_ms: 0,
        }
    }

    const fn range(&self) -> Range {
        Range {
            min: self.record.temperature_min,
            max: self.record.temperature_max,
        }
    }

    /// Secondary level matching a temperature in the current range
    const fn level_of(&self, temperature: u16) -> i16 {
        temperature_to_level(temperature, self.record.temperature_min, self.record.temperature_max)
    }

    fn sync_level_target(&mut self) {
        self.record.sec_level_target = self.level_of(self.record.temperature_target);
    }

    /// Make the temperature targets current and realign the secondary level
    fn commit_temperature(&mut self) {
        self.record.temperature_current = self.record.temperature_target;
        self.record.delta_uv_current = self.record.delta_uv_target;
        let level = self.level_of(self.record.temperature_current);
        self.record.sec_level_current = level;
        self.record.sec_level_target = level;
    }

    fn changed<T: TimerService>(&self, timers: &mut T) -> Result<(), TimerError> {
        self.store.state_changed(timers)
    }

    /// Cancel the channels that only drive the temperature
    fn cancel_channels<T: TimerService>(&mut self, timers: &mut T) -> Result<(), TimerError> {
        self.temperature.cancel(timers)?;
        self.level.cancel(timers)
    }
}

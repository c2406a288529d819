//! Lighting server: Generic OnOff, Power OnOff, Default Transition Time,
//! Light Lightness (and setup) and the primary Generic Level

mod level;
mod lightness;
mod onoff;
mod setup;

use myrtio_mesh_model::{
    State, StateKind,
    model::{
        GENERIC_LEVEL_SERVER, GENERIC_ONOFF_SERVER, GENERIC_POWER_ONOFF_SERVER,
        GENERIC_TRANSITION_TIME_SERVER, LIGHT_LIGHTNESS_SERVER,
    },
    state::Range,
    transition_time::transition_time_to_ms,
};

pub use lightness::LightnessScale;

use crate::{
    config::LightingServerConfig,
    convert::lightness_to_level,
    error::{EngineError, TimerError},
    persistence::StoreDebouncer,
    ports::{LightingOutput, MeshPlatform, StateUpdate, TimerService},
    publish,
    record::{
        LightbulbRecord, ON_POWER_UP_OFF, ON_POWER_UP_ON, ON_POWER_UP_RESTORE, ONOFF_OFF, ONOFF_ON,
    },
    timer::LightingTimer,
    transition::{ChannelTimers, IMMEDIATE, Phase, Transition, millis},
};

/// Server owning the lightbulb record
///
/// Each of the on/off, lightness and level channels runs its own
/// transition machine over the shared record. A request on one channel
/// preempts the others since they all drive the same output.
#[derive(Debug)]
pub struct LightingServer {
    config: LightingServerConfig,
    record: LightbulbRecord,
    onoff: Transition,
    lightness: Transition,
    level: Transition,
    store: StoreDebouncer,
    /// Scale of the last lightness request, used for completion reports
    scale: LightnessScale,
}

impl LightingServer {
    pub fn new(config: LightingServerConfig) -> Self {
        Self {
            record: LightbulbRecord::defaults(&config),
            onoff: Transition::new(ChannelTimers::new(
                LightingTimer::OnOffDelayed,
                LightingTimer::OnOffTransition,
            )),
            lightness: Transition::new(ChannelTimers::new(
                LightingTimer::LightnessDelayed,
                LightingTimer::LightnessTransition,
            )),
            level: Transition::new(
                ChannelTimers::new(LightingTimer::LevelDelayed, LightingTimer::LevelTransition)
                    .with_step(LightingTimer::LevelMove),
            ),
            store: StoreDebouncer::new(
                LightingTimer::Save.into(),
                config.ps_key,
                config.nvm_save_time,
            ),
            scale: LightnessScale::Actual,
            config,
        }
    }

    pub const fn config(&self) -> &LightingServerConfig {
        &self.config
    }

    pub const fn record(&self) -> &LightbulbRecord {
        &self.record
    }

    pub const fn element_index(&self) -> u16 {
        self.config.element_index
    }

    pub const fn onoff_phase(&self) -> Phase {
        self.onoff.phase()
    }

    pub const fn lightness_phase(&self) -> Phase {
        self.lightness.phase()
    }

    pub const fn level_phase(&self) -> Phase {
        self.level.phase()
    }

    pub const fn on_power_up(&self) -> u8 {
        self.record.on_power_up
    }

    /// Default transition time in milliseconds, zero when unset or unknown
    pub fn default_transition_ms(&self) -> u32 {
        transition_time_to_ms(self.record.transition_time).unwrap_or(0)
    }

    pub const fn lightness_current(&self) -> u16 {
        self.record.lightness_current
    }

    pub const fn lightness_target(&self) -> u16 {
        self.record.lightness_target
    }

    pub const fn lightness_default(&self) -> u16 {
        self.record.lightness_default
    }

    /// Load the record and apply the power-up behaviour
    pub fn init<P: MeshPlatform>(&mut self, platform: &mut P) -> Result<(), EngineError> {
        self.record = self
            .store
            .load(platform)
            .unwrap_or_else(|| LightbulbRecord::defaults(&self.config));
        self.record.validate_and_correct();

        let transition_ms = self.default_transition_ms();
        match self.record.on_power_up {
            ON_POWER_UP_OFF => {
                log::info!("lighting: power up state is OFF");
                self.record.onoff_current = ONOFF_OFF;
                self.record.onoff_target = ONOFF_OFF;
                self.record.lightness_current = 0;
                self.record.lightness_target = 0;
                platform.set_lightness(0, IMMEDIATE);
            }
            ON_POWER_UP_ON => {
                log::info!("lighting: power up state is ON");
                let lightness = match self.record.lightness_default {
                    0 => self.record.lightness_last,
                    default => default,
                };
                self.record.onoff_current = ONOFF_ON;
                self.record.onoff_target = ONOFF_ON;
                self.record.lightness_target = lightness;
                self.power_up_fade(platform, transition_ms)?;
            }
            ON_POWER_UP_RESTORE => {
                log::info!("lighting: power up state is RESTORE");
                if self.record.lightness_target > 0 {
                    self.power_up_fade(platform, transition_ms)?;
                } else {
                    self.record.lightness_current = 0;
                    platform.set_lightness(0, IMMEDIATE);
                }
                self.record.onoff_current = u8::from(self.record.lightness_current != 0);
                self.record.onoff_target = u8::from(self.record.lightness_target != 0);
            }
            other => log::warn!("lighting: unknown power up state {}, keeping record", other),
        }
        self.record.pri_level_current = lightness_to_level(self.record.lightness_current);
        self.record.pri_level_target = lightness_to_level(self.record.lightness_target);
        self.changed(platform)?;

        publish::update(platform, &self.transition_time_update());
        publish::update(
            platform,
            &self.setup_update(State::LightnessDefault(self.record.lightness_default)),
        );
        publish::update(platform, &self.setup_update(State::LightnessRange(self.range())));
        publish::update_and_publish(platform, &self.power_onoff_update());
        publish::update_and_publish(platform, &self.onoff_update(0));
        publish::update_and_publish(platform, &self.lightness_update(LightnessScale::Actual, 0));

        log::info!(
            "lighting: initialized, lightness={} onoff={}",
            self.record.lightness_current,
            self.record.onoff_current
        );
        Ok(())
    }

    /// Stop every channel and drop the persisted record
    pub fn reset<P: MeshPlatform>(&mut self, platform: &mut P) -> Result<(), EngineError> {
        self.cancel_channels(platform)?;
        self.store.erase(platform)?;
        self.record = LightbulbRecord::defaults(&self.config);
        log::info!("lighting: reset to defaults");
        Ok(())
    }

    /// Handle the expiry of one of the server's timers
    pub fn on_timer<P: MeshPlatform>(
        &mut self,
        platform: &mut P,
        timer: LightingTimer,
    ) -> Result<(), EngineError> {
        match timer {
            LightingTimer::Save => {
                // Failures are logged by the debouncer
                let _ = self.store.store(platform, &self.record);
                Ok(())
            }
            LightingTimer::OnOffDelayed => self.onoff_delay_elapsed(platform),
            LightingTimer::OnOffTransition => self.onoff_transition_complete(platform),
            LightingTimer::LightnessDelayed => self.lightness_delay_elapsed(platform),
            LightingTimer::LightnessTransition => self.lightness_transition_complete(platform),
            LightingTimer::LevelDelayed => self.level_delay_elapsed(platform),
            LightingTimer::LevelTransition => self.level_transition_complete(platform),
            LightingTimer::LevelMove => self.level_move_step(platform),
        }
    }

    /// Take over the lightness for a bound server
    ///
    /// Running lighting channels are cancelled and the target is recorded.
    /// The current value moves once [`Self::commit_bound_lightness`] runs.
    pub fn bind_lightness<T: TimerService>(
        &mut self,
        timers: &mut T,
        target: u16,
    ) -> Result<(), TimerError> {
        self.cancel_channels(timers)?;
        self.record.lightness_target = self.record.clamp_lightness(target);
        self.record.pri_level_target = lightness_to_level(self.record.lightness_target);
        self.record.onoff_target = u8::from(self.record.lightness_target != 0);
        self.changed(timers)
    }

    /// Make the bound lightness target current
    pub fn commit_bound_lightness<T: TimerService>(
        &mut self,
        timers: &mut T,
    ) -> Result<(), TimerError> {
        self.commit_lightness();
        self.changed(timers)
    }

    pub fn set_lightness_default<T: TimerService>(
        &mut self,
        timers: &mut T,
        lightness: u16,
    ) -> Result<(), TimerError> {
        self.record.lightness_default = lightness;
        self.record.validate_and_correct();
        self.changed(timers)
    }

    /// Lightness status as seen by the lightness server
    pub fn lightness_update(
        &self,
        scale: LightnessScale,
        remaining_ms: u32,
    ) -> StateUpdate<'static> {
        self.update(
            LIGHT_LIGHTNESS_SERVER,
            scale.state(self.record.lightness_current),
            scale.state(self.record.lightness_target),
            remaining_ms,
        )
    }

    pub fn onoff_update(&self, remaining_ms: u32) -> StateUpdate<'static> {
        self.update(
            GENERIC_ONOFF_SERVER,
            State::OnOff(self.record.onoff_current),
            State::OnOff(self.record.onoff_target),
            remaining_ms,
        )
    }

    pub fn level_update(&self, remaining_ms: u32) -> StateUpdate<'static> {
        self.update(
            GENERIC_LEVEL_SERVER,
            State::Level(self.record.pri_level_current),
            State::Level(self.record.pri_level_target),
            remaining_ms,
        )
    }

    pub fn power_onoff_update(&self) -> StateUpdate<'static> {
        self.fixed_update(GENERIC_POWER_ONOFF_SERVER, State::OnPowerUp(self.record.on_power_up))
    }

    pub fn transition_time_update(&self) -> StateUpdate<'static> {
        self.fixed_update(
            GENERIC_TRANSITION_TIME_SERVER,
            State::TransitionTime(self.record.transition_time),
        )
    }

    fn setup_update(&self, state: State<'static>) -> StateUpdate<'static> {
        self.fixed_update(LIGHT_LIGHTNESS_SERVER, state)
    }

    const fn range(&self) -> Range {
        Range {
            min: self.record.lightness_min,
            max: self.record.lightness_max,
        }
    }

    /// Status carrying a target only while a change is pending
    fn update(
        &self,
        model_id: u16,
        current: State<'static>,
        target: State<'static>,
        remaining_ms: u32,
    ) -> StateUpdate<'static> {
        StateUpdate {
            model_id,
            element_index: self.config.element_index,
            current,
            target: (remaining_ms > 0).then_some(target),
            remaining_ms,
        }
    }

    fn fixed_update(&self, model_id: u16, current: State<'static>) -> StateUpdate<'static> {
        StateUpdate {
            model_id,
            element_index: self.config.element_index,
            current,
            target: None,
            remaining_ms: 0,
        }
    }

    /// Fade from black to the lightness target over the default transition
    fn power_up_fade<O: LightingOutput + TimerService>(
        &mut self,
        platform: &mut O,
        transition_ms: u32,
    ) -> Result<(), TimerError> {
        if transition_ms == 0 {
            self.record.lightness_current = self.record.lightness_target;
            platform.set_lightness(self.record.lightness_current, IMMEDIATE);
            return Ok(());
        }
        self.record.lightness_current = 0;
        platform.set_lightness(0, IMMEDIATE);
        self.lightness.start_transition(platform, transition_ms)?;
        platform.set_lightness(self.record.lightness_target, millis(transition_ms));
        Ok(())
    }

    /// Re-arm the debounced store
    fn changed<T: TimerService>(&self, timers: &mut T) -> Result<(), TimerError> {
        self.store.state_changed(timers)
    }

    fn cancel_channels<T: TimerService>(&mut self, timers: &mut T) -> Result<(), TimerError> {
        self.onoff.cancel(timers)?;
        self.lightness.cancel(timers)?;
        self.level.cancel(timers)
    }

    /// Make the lightness target current and realign the bound states
    fn commit_lightness(&mut self) {
        let lightness = self.record.lightness_target;
        self.record.lightness_current = lightness;
        if lightness != 0 {
            self.record.lightness_last = lightness;
        }
        let onoff = u8::from(lightness != 0);
        self.record.onoff_current = onoff;
        self.record.onoff_target = onoff;
        let level = lightness_to_level(lightness);
        self.record.pri_level_current = level;
        self.record.pri_level_target = level;
    }

    /// Publish the states bound to the lightness after a change
    fn publish_bound<P: MeshPlatform>(&self, platform: &mut P, models: &[(u16, StateKind)]) {
        for &(model_id, kind) in models {
            publish::publish(platform, model_id, self.config.element_index, kind);
        }
    }
}

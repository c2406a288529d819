//! Per-channel transition state machine
//!
//! A channel moves its current value towards a target either at once,
//! after a start delay, over a transition time, or as a stepped move
//! towards a bound. The values themselves live in the server record, the
//! machine only tracks the phase and owns the channel's timers.

use core::mem;

use embassy_time::Duration;
use myrtio_mesh_model::RequestMeta;

use crate::{error::TimerError, ports::TimerService, timer::TimerId};

/// Phase of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Waiting for the start delay
    DelayedPending,
    /// Waiting for the transition to complete
    Transitioning,
    /// Stepping towards a bound
    MoveActive,
}

/// What happens once the start delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayedAction {
    /// Apply the target, over the stashed transition time if non-zero
    Apply { transition_ms: u32 },
    /// Start the stored move
    Move,
    /// Stop at the current value
    Halt,
}

/// Requested timing of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timing {
    pub transition_ms: u32,
    pub delay_ms: u16,
}

impl Timing {
    pub const IMMEDIATE: Self = Self {
        transition_ms: 0,
        delay_ms: 0,
    };

    pub const fn new(transition_ms: u32, delay_ms: u16) -> Self {
        Self {
            transition_ms,
            delay_ms,
        }
    }

    pub const fn is_immediate(&self) -> bool {
        self.transition_ms == 0 && self.delay_ms == 0
    }

    /// Time until the requested change is complete
    pub const fn remaining_ms(&self) -> u32 {
        (self.delay_ms as u32).saturating_add(self.transition_ms)
    }
}

impl From<&RequestMeta> for Timing {
    fn from(meta: &RequestMeta) -> Self {
        Self::new(meta.transition_ms, meta.delay_ms)
    }
}

/// Branch taken for a new request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Apply now, no timer armed
    Immediate,
    /// Start delay armed, target recorded
    Delayed,
    /// Transition timer armed for the given time
    Transition(u32),
}

/// Next step of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveStep {
    pub duration_ms: u32,
    /// The step lands on the target instead of a full delta
    pub reaches_target: bool,
}

/// Timers driving one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelTimers {
    pub delayed: TimerId,
    pub transition: TimerId,
    pub step: Option<TimerId>,
}

impl ChannelTimers {
    pub fn new(delayed: impl Into<TimerId>, transition: impl Into<TimerId>) -> Self {
        Self {
            delayed: delayed.into(),
            transition: transition.into(),
            step: None,
        }
    }

    /// Add the step timer needed for moves
    #[must_use]
    pub fn with_step(mut self, step: impl Into<TimerId>) -> Self {
        self.step = Some(step.into());
        self
    }
}

/// Zero duration for changes applied at once
pub(crate) const IMMEDIATE: Duration = Duration::from_ticks(0);

pub(crate) const fn millis(ms: u32) -> Duration {
    Duration::from_millis(ms as u64)
}

#[derive(Debug, Clone, Copy)]
pub struct Transition {
    timers: ChannelTimers,
    phase: Phase,
    delayed: DelayedAction,
    /// The delayed timer is armed for `delayed`
    delay_armed: bool,
    move_delta: i32,
    move_step_ms: u32,
}

impl Transition {
    pub const fn new(timers: ChannelTimers) -> Self {
        Self {
            timers,
            phase: Phase::Idle,
            delayed: DelayedAction::Apply { transition_ms: 0 },
            delay_armed: false,
            move_delta: 0,
            move_step_ms: 0,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn timers(&self) -> &ChannelTimers {
        &self.timers
    }

    pub const fn move_delta(&self) -> i32 {
        self.move_delta
    }

    /// Whether `requested` is already the channel's value, or the target of
    /// a change still in progress
    pub fn is_current<T: PartialEq>(&self, current: T, target: T, requested: T) -> bool {
        requested == current || (self.phase != Phase::Idle && requested == target)
    }

    /// Cancel whatever runs and pick the branch for a new request
    ///
    /// The caller records the target, and applies it right away for
    /// [`Schedule::Immediate`].
    pub fn request<T: TimerService>(
        &mut self,
        timer: &mut T,
        timing: Timing,
    ) -> Result<Schedule, TimerError> {
        self.cancel(timer)?;
        if timing.is_immediate() {
            return Ok(Schedule::Immediate);
        }
        if timing.delay_ms > 0 {
            self.delay(
                timer,
                timing.delay_ms,
                DelayedAction::Apply {
                    transition_ms: timing.transition_ms,
                },
            )?;
            return Ok(Schedule::Delayed);
        }
        self.start_transition(timer, timing.transition_ms)?;
        Ok(Schedule::Transition(timing.transition_ms))
    }

    /// Arm the start delay with the action to run afterwards
    pub fn delay<T: TimerService>(
        &mut self,
        timer: &mut T,
        delay_ms: u16,
        action: DelayedAction,
    ) -> Result<(), TimerError> {
        timer.start(self.timers.delayed, millis(u32::from(delay_ms)), false)?;
        self.delayed = action;
        self.delay_armed = true;
        self.phase = Phase::DelayedPending;
        Ok(())
    }

    /// Arm a delayed halt, leaving whatever runs untouched until it fires
    pub fn delay_halt<T: TimerService>(
        &mut self,
        timer: &mut T,
        delay_ms: u16,
    ) -> Result<(), TimerError> {
        timer.start(self.timers.delayed, millis(u32::from(delay_ms)), false)?;
        self.delayed = DelayedAction::Halt;
        self.delay_armed = true;
        if self.phase == Phase::Idle {
            self.phase = Phase::DelayedPending;
        }
        Ok(())
    }

    /// Arm the transition timer
    pub fn start_transition<T: TimerService>(
        &mut self,
        timer: &mut T,
        transition_ms: u32,
    ) -> Result<(), TimerError> {
        timer.start(self.timers.transition, millis(transition_ms), false)?;
        self.phase = Phase::Transitioning;
        Ok(())
    }

    /// Take the action stashed for an elapsed delay
    ///
    /// Returns `None` if the delay was cancelled in the meantime.
    pub fn take_delayed(&mut self) -> Option<DelayedAction> {
        if !self.delay_armed {
            return None;
        }
        self.delay_armed = false;
        if self.phase == Phase::DelayedPending {
            self.phase = Phase::Idle;
        }
        Some(mem::replace(
            &mut self.delayed,
            DelayedAction::Apply { transition_ms: 0 },
        ))
    }

    /// Mark the transition as complete, `false` if none was running
    pub fn finish(&mut self) -> bool {
        if self.phase != Phase::Transitioning {
            return false;
        }
        self.phase = Phase::Idle;
        true
    }

    /// Stop every timer of the channel and forget the move
    pub fn cancel<T: TimerService>(&mut self, timer: &mut T) -> Result<(), TimerError> {
        timer.stop(self.timers.transition)?;
        self.stop_move(timer)?;
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Stop the delay and step timers and reset the move parameters
    pub fn stop_move<T: TimerService>(&mut self, timer: &mut T) -> Result<(), TimerError> {
        timer.stop(self.timers.delayed)?;
        self.delay_armed = false;
        if let Some(step) = self.timers.step {
            timer.stop(step)?;
        }
        self.move_delta = 0;
        self.move_step_ms = 0;
        if matches!(self.phase, Phase::MoveActive | Phase::DelayedPending) {
            self.phase = Phase::Idle;
        }
        Ok(())
    }

    /// Remember the delta applied per step and the step duration
    pub fn set_move(&mut self, delta: i32, step_ms: u32) {
        self.move_delta = delta;
        self.move_step_ms = step_ms;
    }

    /// Arm the step timer for the next move step
    ///
    /// When less than one delta remains the step is shortened in
    /// proportion and lands on the target.
    pub fn schedule_move_step<T: TimerService>(
        &mut self,
        timer: &mut T,
        remaining: i32,
    ) -> Result<MoveStep, TimerError> {
        let step = self.timers.step.ok_or(TimerError::NoResources)?;
        let reaches_target = remaining.unsigned_abs() < self.move_delta.unsigned_abs();
        let duration_ms = if reaches_target {
            (u64::from(self.move_step_ms) * u64::from(remaining.unsigned_abs())
                / u64::from(self.move_delta.unsigned_abs())) as u32
        } else {
            self.move_step_ms
        };
        timer.start(step, millis(duration_ms), false)?;
        self.phase = Phase::MoveActive;
        Ok(MoveStep {
            duration_ms,
            reaches_target,
        })
    }

    /// Value reached by one move step from `current` towards `target`
    pub fn step_value(&self, current: i16, target: i16) -> i16 {
        let remaining = i32::from(target) - i32::from(current);
        if remaining.unsigned_abs() < self.move_delta.unsigned_abs() {
            target
        } else {
            (i32::from(current) + self.move_delta) as i16
        }
    }

    /// Whether a fired step timer belongs to a running move
    pub fn is_moving(&self) -> bool {
        self.phase == Phase::MoveActive
    }

    /// End a move that reached its target
    pub fn settle(&mut self) {
        self.move_delta = 0;
        self.move_step_ms = 0;
        self.phase = Phase::Idle;
    }
}

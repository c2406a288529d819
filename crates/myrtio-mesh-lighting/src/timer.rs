//! Timer identities and a software timer service

use embassy_time::Duration;
use heapless::Vec;

use crate::{error::TimerError, ports::TimerService};

/// Timers owned by the lighting server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightingTimer {
    Save,
    OnOffDelayed,
    OnOffTransition,
    LightnessDelayed,
    LightnessTransition,
    LevelDelayed,
    LevelTransition,
    LevelMove,
}

/// Timers owned by the CTL server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CtlTimer {
    Save,
    CtlDelayed,
    CtlTransition,
    TemperatureDelayed,
    TemperatureTransition,
    LevelDelayed,
    LevelTransition,
    LevelMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    Lighting(LightingTimer),
    Ctl(CtlTimer),
}

impl From<LightingTimer> for TimerId {
    fn from(timer: LightingTimer) -> Self {
        TimerId::Lighting(timer)
    }
}

impl From<CtlTimer> for TimerId {
    fn from(timer: CtlTimer) -> Self {
        TimerId::Ctl(timer)
    }
}

#[derive(Debug, Clone, Copy)]
struct SoftTimer {
    id: TimerId,
    remaining: Duration,
    period: Option<Duration>,
}

/// Manually clocked timer service with room for `N` running timers
///
/// The host advances the clock and delivers each expiry in deadline order.
#[derive(Debug, Default)]
pub struct SoftTimers<const N: usize> {
    timers: Vec<SoftTimer, N>,
}

impl<const N: usize> SoftTimers<N> {
    pub const fn new() -> Self {
        Self { timers: Vec::new() }
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.timers.iter().any(|timer| timer.id == id)
    }

    /// Number of running timers
    pub fn running(&self) -> usize {
        self.timers.len()
    }

    /// Time until `id` fires
    pub fn remaining(&self, id: TimerId) -> Option<Duration> {
        self.timers
            .iter()
            .find(|timer| timer.id == id)
            .map(|timer| timer.remaining)
    }

    /// Time until the earliest deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|timer| timer.remaining).min()
    }

    /// Pop the earliest timer expiring within `budget`
    ///
    /// Every timer's clock moves forward by the time until that deadline,
    /// which is returned together with the expired id. Periodic timers are
    /// re-armed.
    pub fn pop_expired(&mut self, budget: Duration) -> Option<(TimerId, Duration)> {
        let (index, elapsed) = self
            .timers
            .iter()
            .enumerate()
            .min_by_key(|(_, timer)| timer.remaining)
            .map(|(index, timer)| (index, timer.remaining))?;
        if elapsed > budget {
            return None;
        }

        for timer in &mut self.timers {
            timer.remaining -= elapsed;
        }
        let expired = self.timers[index];
        match expired.period {
            Some(period) => self.timers[index].remaining = period,
            None => {
                self.timers.remove(index);
            }
        }
        Some((expired.id, elapsed))
    }

    /// Move every clock forward without firing anything
    ///
    /// Call after draining [`Self::pop_expired`] for the same budget.
    pub fn advance(&mut self, elapsed: Duration) {
        for timer in &mut self.timers {
            timer.remaining = if timer.remaining > elapsed {
                timer.remaining - elapsed
            } else {
                Duration::from_ticks(0)
            };
        }
    }
}

impl<const N: usize> TimerService for SoftTimers<N> {
    fn start(&mut self, id: TimerId, duration: Duration, periodic: bool) -> Result<(), TimerError> {
        if periodic && duration.as_ticks() == 0 {
            return Err(TimerError::ZeroPeriod);
        }
        let timer = SoftTimer {
            id,
            remaining: duration,
            period: periodic.then_some(duration),
        };
        if let Some(slot) = self.timers.iter_mut().find(|timer| timer.id == id) {
            *slot = timer;
            return Ok(());
        }
        self.timers.push(timer).map_err(|_| TimerError::NoResources)
    }

    fn stop(&mut self, id: TimerId) -> Result<(), TimerError> {
        self.timers.retain(|timer| timer.id != id);
        Ok(())
    }
}

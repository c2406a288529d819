//! Debounced persistence of server records

use bytemuck::Pod;
use embassy_time::Duration;

use crate::{
    error::{StoreError, TimerError},
    ports::{KeyValueStore, TimerService},
    timer::TimerId,
};

/// Coalesces record changes into one write after a quiet period
///
/// Every change re-arms a single one-shot timer. The owner writes the
/// record when that timer fires.
#[derive(Debug, Clone, Copy)]
pub struct StoreDebouncer {
    timer: TimerId,
    key: u16,
    delay: Duration,
}

impl StoreDebouncer {
    pub const fn new(timer: TimerId, key: u16, delay: Duration) -> Self {
        Self { timer, key, delay }
    }

    pub const fn timer(&self) -> TimerId {
        self.timer
    }

    pub const fn key(&self) -> u16 {
        self.key
    }

    /// Re-arm the store timer after a change
    pub fn state_changed<T: TimerService>(&self, timers: &mut T) -> Result<(), TimerError> {
        timers.start(self.timer, self.delay, false)
    }

    /// Write the record, logging failures
    pub fn store<S: KeyValueStore, R: Pod>(
        &self,
        store: &mut S,
        record: &R,
    ) -> Result<(), StoreError> {
        store
            .save(self.key, bytemuck::bytes_of(record))
            .inspect_err(|err| {
                log::error!("persistence: failed to store record 0x{:04x}: {}", self.key, err);
            })
    }

    /// Read the record, `None` when missing or of another size
    pub fn load<S: KeyValueStore, R: Pod>(&self, store: &mut S) -> Option<R> {
        let mut record = R::zeroed();
        match store.load(self.key, bytemuck::bytes_of_mut(&mut record)) {
            Ok(len) if len == size_of::<R>() => Some(record),
            Ok(len) => {
                log::warn!(
                    "persistence: record 0x{:04x} has invalid size (expected={}, actual={}), using defaults",
                    self.key,
                    size_of::<R>(),
                    len
                );
                None
            }
            Err(err) => {
                log::warn!(
                    "persistence: record 0x{:04x} not loaded ({}), using defaults",
                    self.key,
                    err
                );
                None
            }
        }
    }

    /// Stop the pending write and drop the stored record
    pub fn erase<P: KeyValueStore + TimerService>(
        &self,
        platform: &mut P,
    ) -> Result<(), TimerError> {
        platform.stop(self.timer)?;
        if let Err(err) = platform.erase(self.key) {
            log::warn!("persistence: failed to erase record 0x{:04x}: {}", self.key, err);
        }
        Ok(())
    }
}

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};

/// Statically placed slot sharing a node between the mesh stack callbacks
/// and the timer interrupt
///
/// Every access runs inside a critical section.
pub struct SharedNode<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<T>>>,
}

impl<T> SharedNode<T> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Place the node, returning the previous one
    pub fn init(&self, value: T) -> Option<T> {
        self.inner.lock(|cell| cell.borrow_mut().replace(value))
    }

    /// Take the node out of the slot
    pub fn take(&self) -> Option<T> {
        self.inner.lock(|cell| cell.borrow_mut().take())
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.lock(|cell| cell.borrow().is_some())
    }

    /// Run `f` on the node, or return `None` before [`Self::init`]
    ///
    /// `f` must not access the same slot again.
    pub fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.inner.lock(|cell| cell.borrow_mut().as_mut().map(f))
    }
}

impl<T> Default for SharedNode<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COUNTER: SharedNode<u32> = SharedNode::new();

    #[test]
    fn lock_reaches_the_value_once_initialized() {
        assert_eq!(COUNTER.lock(|value| *value), None);

        COUNTER.init(1);
        let seen = COUNTER.lock(|value| {
            *value += 1;
            *value
        });

        assert_eq!(seen, Some(2));
        assert_eq!(COUNTER.take(), Some(2));
        assert!(!COUNTER.is_initialized());
    }
}

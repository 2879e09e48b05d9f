//! Serial number counter for outbound pointer events.
//!
//! # What is a serial? (for beginners)
//!
//! Every event a session receives carries a serial number that increases by
//! one with each delivered event.  Clients echo a serial back when they make a
//! request that is only valid in response to a particular event (for example,
//! changing the cursor image is only allowed after an enter), which lets the
//! compositor reject stale requests.
//!
//! # Thread safety
//!
//! The counter uses `AtomicU32`, so it can be shared by reference between
//! threads without a lock.  The router itself only touches it from its single
//! input-processing task.

use std::sync::atomic::{AtomicU32, Ordering};

/// A monotonically increasing serial counter.
///
/// Serials start at 0 and wrap from `u32::MAX` back to 0 without panicking.
///
/// # Examples
///
/// ```rust
/// use pointer_core::protocol::SerialCounter;
///
/// let counter = SerialCounter::new();
/// assert_eq!(counter.next(), 0);
/// assert_eq!(counter.next(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SerialCounter {
    inner: AtomicU32,
}

impl SerialCounter {
    /// Creates a new counter starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn starting_at(start: u32) -> Self {
        Self {
            inner: AtomicU32::new(start),
        }
    }

    /// Returns the next serial and advances the counter.
    ///
    /// `Relaxed` ordering is enough: the value orders events, it does not
    /// publish memory to other threads.
    pub fn next(&self) -> u32 {
        self.inner.fetch_add(1, Ordering::Relaxed)
    }

    #[cfg(test)]
    fn current(&self) -> u32 {
        self.inner.load(Ordering::Relaxed)
    }
}

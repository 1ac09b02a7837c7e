//! Cancellation token for cooperative actor shutdown.

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// One-way termination flag. Checked at every loop head; sleeping through
/// [`Shutdown::sleep`] is cut short as soon as the flag is raised.
#[derive(Debug, Default)]
pub struct Shutdown {
    cancelled: Mutex<bool>,
    raised: Condvar,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake every sleeper.
    pub fn cancel(&self) {
        let mut cancelled = self.cancelled.lock();
        *cancelled = true;
        self.raised.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock()
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if the full duration elapsed, `false` if cancelled
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut cancelled = self.cancelled.lock();
        while !*cancelled {
            if self.raised.wait_until(&mut cancelled, deadline).timed_out() {
                return !*cancelled;
            }
        }
        false
    }
}

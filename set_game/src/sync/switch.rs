//! Boolean gate with its own wait/notify channel.

use parking_lot::{Condvar, Mutex};

/// A flag threads can block on until it turns on. Independent of the
/// [`GateLock`](super::GateLock): it controls availability, not mutual
/// exclusion.
#[derive(Debug, Default)]
pub struct Switch {
    on: Mutex<bool>,
    changed: Condvar,
}

impl Switch {
    pub fn new(on: bool) -> Self {
        Self {
            on: Mutex::new(on),
            changed: Condvar::new(),
        }
    }

    /// Block until the switch is on.
    ///
    /// # Returns
    ///
    /// * `bool` - Whether the caller actually had to wait
    pub fn wait_on(&self) -> bool {
        let mut on = self.on.lock();
        let mut waited = false;
        while !*on {
            waited = true;
            self.changed.wait(&mut on);
        }
        waited
    }

    /// Update the flag and wake every waiter.
    pub fn set(&self, value: bool) {
        let mut on = self.on.lock();
        *on = value;
        self.changed.notify_all();
    }

    pub fn is_on(&self) -> bool {
        *self.on.lock()
    }
}

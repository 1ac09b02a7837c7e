//! Single-slot mailbox through which the dealer answers one player.

use crate::game::entities::Verdict;
use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct MailboxState {
    verdict: Option<Verdict>,
    closed: bool,
}

/// Holds at most one undelivered verdict. The dealer deposits, the owning
/// player takes; each verdict is consumed exactly once.
#[derive(Debug, Default)]
pub struct VerdictMailbox {
    state: Mutex<MailboxState>,
    delivered: Condvar,
}

impl VerdictMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit `verdict` and wake the waiting player.
    pub fn deliver(&self, verdict: Verdict) {
        let mut state = self.state.lock();
        debug_assert!(
            state.verdict.is_none(),
            "previous verdict was never collected"
        );
        state.verdict = Some(verdict);
        self.delivered.notify_all();
    }

    /// Block until a verdict is deposited and take it.
    ///
    /// # Returns
    ///
    /// * `Option<Verdict>` - `None` if the mailbox was closed before a
    ///   verdict arrived
    pub fn wait(&self) -> Option<Verdict> {
        let mut state = self.state.lock();
        loop {
            if let Some(verdict) = state.verdict.take() {
                return Some(verdict);
            }
            if state.closed {
                return None;
            }
            self.delivered.wait(&mut state);
        }
    }

    /// Take a deposited verdict without blocking.
    pub fn try_take(&self) -> Option<Verdict> {
        self.state.lock().verdict.take()
    }

    /// Wake the player for shutdown. Later waits return `None` once no
    /// verdict is left.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.delivered.notify_all();
    }
}

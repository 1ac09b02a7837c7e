//! Unbounded FIFO carrying submissions from players to the dealer.

use crate::game::entities::Submission;
use parking_lot::{Condvar, Mutex};
use std::{collections::VecDeque, time::Duration};

#[derive(Debug, Default)]
struct QueueState {
    submissions: VecDeque<Submission>,
    shutdown: bool,
}

/// Submissions are resolved strictly in arrival order. `put` never blocks;
/// `take` never blocks. The dealer sleeps through [`SubmissionQueue::wait`],
/// which a new submission cuts short.
#[derive(Debug, Default)]
pub struct SubmissionQueue {
    state: Mutex<QueueState>,
    arrived: Condvar,
}

impl SubmissionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a submission and wake the dealer if it is sleeping.
    pub fn put(&self, submission: Submission) {
        let mut state = self.state.lock();
        state.submissions.push_back(submission);
        self.arrived.notify_all();
    }

    /// Remove the oldest submission, if any.
    pub fn take(&self) -> Option<Submission> {
        self.state.lock().submissions.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().submissions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.state.lock().submissions.len()
    }

    /// Sleep until a submission is queued, `timeout` elapses, or the queue is
    /// shut down. Returns at once if work is already pending.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Upper bound on the sleep, `None` to wait indefinitely
    ///
    /// # Returns
    ///
    /// * `bool` - Whether a submission is pending on return
    pub fn wait(&self, timeout: Option<Duration>) -> bool {
        let mut state = self.state.lock();
        if state.submissions.is_empty() && !state.shutdown {
            match timeout {
                Some(timeout) => {
                    self.arrived.wait_for(&mut state, timeout);
                }
                None => {
                    while state.submissions.is_empty() && !state.shutdown {
                        self.arrived.wait(&mut state);
                    }
                }
            }
        }
        !state.submissions.is_empty()
    }

    /// Make every current and future [`SubmissionQueue::wait`] return at
    /// once. Submissions can still be queued and taken afterwards.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        state.shutdown = true;
        self.arrived.notify_all();
    }
}

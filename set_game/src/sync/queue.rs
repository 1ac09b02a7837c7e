//! Bounded blocking queue feeding key presses to a player actor.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Pending key presses a player may hold before producers block.
pub const INPUT_QUEUE_CAPACITY: usize = 3;

#[derive(Debug)]
struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// FIFO with blocking `put`/`take`, an atomic `clear`, and `close` for
/// shutdown.
#[derive(Debug)]
pub struct InputQueue<T> {
    state: Mutex<QueueState<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> InputQueue<T> {
    /// Create a queue holding at most [`INPUT_QUEUE_CAPACITY`] items.
    pub fn new() -> Self {
        Self::with_capacity(INPUT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Append `value`, blocking while the queue is full.
    ///
    /// # Returns
    ///
    /// * `bool` - `false` if the queue was closed before the value could be
    ///   admitted; the value is dropped in that case
    pub fn put(&self, value: T) -> bool {
        let mut state = self.state.lock();
        while state.items.len() >= self.capacity && !state.closed {
            self.not_full.wait(&mut state);
        }
        if state.closed {
            return false;
        }
        state.items.push_back(value);
        self.not_empty.notify_one();
        true
    }

    /// Remove the oldest value, blocking while the queue is empty.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - `None` only once the queue is closed and drained
    pub fn take(&self) -> Option<T> {
        let mut state = self.state.lock();
        while state.items.is_empty() && !state.closed {
            self.not_empty.wait(&mut state);
        }
        let value = state.items.pop_front();
        if value.is_some() {
            self.not_full.notify_one();
        }
        value
    }

    /// Drop every pending value and wake all blocked producers.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.items.clear();
        self.not_full.notify_all();
    }

    /// Refuse further values and wake every waiter.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> Default for InputQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

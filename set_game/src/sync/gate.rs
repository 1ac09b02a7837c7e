//! Reader/writer gate owning the data it protects.
//!
//! Any number of readers may hold the gate at once. A writer first marks
//! itself active, which turns away new readers, then waits for the readers
//! already inside to leave. A writer touches the data only once the reader
//! count is zero.

use parking_lot::{Condvar, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::{
    fmt,
    ops::{Deref, DerefMut},
};

#[derive(Debug, Default)]
struct GateState {
    readers: usize,
    writer: bool,
}

/// Reader and writer bookkeeping, independent of the guarded data.
#[derive(Debug, Default)]
struct Gate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl Gate {
    fn enter_reader(&self) {
        let mut state = self.state.lock();
        while state.writer {
            self.cond.wait(&mut state);
        }
        state.readers += 1;
    }

    fn enter_writer(&self) {
        let mut state = self.state.lock();
        // A second writer queues behind the first instead of sharing the gate.
        while state.writer {
            self.cond.wait(&mut state);
        }
        state.writer = true;
        while state.readers > 0 {
            self.cond.wait(&mut state);
        }
    }

    fn release_reader(&self) {
        let mut state = self.state.lock();
        state.readers -= 1;
        self.cond.notify_all();
    }

    fn release_writer(&self) {
        let mut state = self.state.lock();
        state.writer = false;
        self.cond.notify_all();
    }
}

/// Reader/writer gate. Not reentrant: a thread holding either guard must not
/// ask for another one on the same gate.
///
/// The gate decides who may enter; the data itself sits in an `RwLock`, which
/// the gate's own exclusion keeps uncontended.
pub struct GateLock<T> {
    gate: Gate,
    data: RwLock<T>,
}

impl<T> GateLock<T> {
    pub fn new(data: T) -> Self {
        Self {
            gate: Gate::default(),
            data: RwLock::new(data),
        }
    }

    /// Block while a writer is active, then register as a reader.
    pub fn read(&self) -> ReadGuard<'_, T> {
        self.gate.enter_reader();
        let slot = ReaderSlot(&self.gate);
        ReadGuard {
            data: self.data.read(),
            _slot: slot,
        }
    }

    /// Mark the writer active and block until every reader has released.
    pub fn write(&self) -> WriteGuard<'_, T> {
        self.gate.enter_writer();
        let slot = WriterSlot(&self.gate);
        WriteGuard {
            data: self.data.write(),
            _slot: slot,
        }
    }

    /// Number of readers currently inside the gate.
    pub fn readers(&self) -> usize {
        self.gate.state.lock().readers
    }

    /// Whether a writer holds the gate or is waiting for readers to drain.
    pub fn writer_active(&self) -> bool {
        self.gate.state.lock().writer
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default> Default for GateLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for GateLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.gate.state.lock();
        f.debug_struct("GateLock")
            .field("readers", &state.readers)
            .field("writer", &state.writer)
            .finish_non_exhaustive()
    }
}

struct ReaderSlot<'a>(&'a Gate);

impl Drop for ReaderSlot<'_> {
    fn drop(&mut self) {
        self.0.release_reader();
    }
}

struct WriterSlot<'a>(&'a Gate);

impl Drop for WriterSlot<'_> {
    fn drop(&mut self) {
        self.0.release_writer();
    }
}

/// Shared access to the gated data. Releases the reader slot on drop.
// Fields drop in order: the data lock goes before the gate slot.
pub struct ReadGuard<'a, T> {
    data: RwLockReadGuard<'a, T>,
    _slot: ReaderSlot<'a>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

/// Exclusive access to the gated data. Releases the writer flag on drop.
pub struct WriteGuard<'a, T> {
    data: RwLockWriteGuard<'a, T>,
    _slot: WriterSlot<'a>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

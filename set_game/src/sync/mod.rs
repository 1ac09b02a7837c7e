//! Blocking concurrency primitives shared by the dealer and player actors.
//!
//! This module implements:
//! - GateLock: reader/writer gate owning the table grid
//! - InputQueue: bounded per-player queue of pending key presses
//! - SubmissionQueue: unbounded FIFO of candidate matches for the dealer
//! - VerdictMailbox: single-slot, per-player verdict delivery
//! - Switch: boolean gate with wait/notify (placement allowed)
//! - Shutdown: cancellation token with an interruptible sleep
//!
//! ## Cancellation
//!
//! Every blocking wait in this module can be cut short. Queues and mailboxes
//! expose `close`, which wakes all waiters and makes later waits return
//! immediately; [`Shutdown`] wakes sleepers. Callers re-check their
//! termination flag after every wake-up instead of catching interrupts.

pub mod gate;
pub mod mailbox;
pub mod queue;
pub mod shutdown;
pub mod submissions;
pub mod switch;

pub use gate::{GateLock, ReadGuard, WriteGuard};
pub use mailbox::VerdictMailbox;
pub use queue::{INPUT_QUEUE_CAPACITY, InputQueue};
pub use shutdown::Shutdown;
pub use submissions::SubmissionQueue;
pub use switch::Switch;

//! Dealer actor.
//!
//! This module provides:
//! - Dealer: the round loop, submission resolution and game end
//! - RoundClock: countdown, count-up or disabled round timing
//! - GameSummary: scores and winners reported once every actor is joined
//!
//! ## Round loop
//!
//! Each round shuffles the deck and the slot fill order, deals into every
//! empty slot, opens the table to players and then polls the submission
//! queue until the round ends. Closing the table is followed by a full drain
//! of the queue, so every submitting player gets exactly one verdict, and
//! then by clearing every card and token. The game ends once the deck holds
//! no match or termination is requested.

pub mod clock;
pub mod manager;
pub mod summary;

pub use clock::{ClockMode, RoundClock};
pub use manager::Dealer;
pub use summary::GameSummary;

//! Player actors.
//!
//! This module provides:
//! - Player: the per-player thread that toggles tokens and submits selections
//! - SyntheticInput: random key presses for computer players
//!
//! ## Lifecycle
//!
//! A player idles until the dealer opens the table, then consumes presses
//! from its bounded input queue. Once its tokens reach the selection size it
//! freezes, submits to the dealer and blocks on its verdict mailbox. The
//! verdict decides between a point freeze, a penalty freeze, or nothing at
//! all when the selection went stale.

pub mod actor;
pub mod synthetic;

pub use actor::Player;
pub use synthetic::SyntheticInput;

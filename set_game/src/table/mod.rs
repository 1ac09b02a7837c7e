//! The shared table.
//!
//! This module provides:
//! - Grid: the slot/card bijection and the per-player token matrix
//! - Table: gate-protected access to the grid plus the placement switch
//!
//! ## Locking
//!
//! The dealer moves cards and inspects the whole table as the gate's writer.
//! Players toggle tokens in their own row and snapshot selections as
//! readers, so several players can act at once while the dealer is waiting.

pub mod grid;
pub mod shared;

pub use grid::Grid;
pub use shared::{Hint, Table, TableSnapshot};

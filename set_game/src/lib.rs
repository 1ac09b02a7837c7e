//! # Set Game
//!
//! A concurrent engine for the real-time card game "Set", built on OS threads.
//!
//! Every participant is its own actor: one dealer thread, one thread per
//! player, and one synthetic-input thread per computer player. The actors
//! share a single table protected by a reader/writer gate and talk through
//! blocking queues and per-player verdict mailboxes.
//!
//! ## Architecture
//!
//! - **Dealer**: shuffles, deals, resolves submissions in FIFO order, ends
//!   rounds on timeout (or when no match remains) and ends the game when the
//!   deck holds no match
//! - **Player**: consumes key presses from a bounded queue, toggles tokens,
//!   submits full selections and waits for the verdict
//! - **SyntheticInput**: random key presses for computer players
//! - **Table**: slot/card bijection and token matrix behind the gate
//!
//! ## Core Modules
//!
//! - [`sync`]: gate lock, queues, mailbox, switch and shutdown primitives
//! - [`game`]: ids, submissions, configuration, errors, rules, display
//! - [`table`]: the shared table
//! - [`player`]: player and synthetic-input actors
//! - [`dealer`]: dealer actor, round clock, summary
//! - [`session`]: bootstrap and the external handle
//!
//! ## Example
//!
//! ```no_run
//! use set_game::{ClassicRules, Game, GameConfig, LogUi};
//! use std::sync::Arc;
//!
//! let config = GameConfig::default();
//! let rules = Arc::new(ClassicRules::from_config(&config));
//! let game = Game::start(config, Arc::new(LogUi), rules).unwrap();
//! let summary = game.join().unwrap();
//! println!("winners: {:?}", summary.winners);
//! ```

/// Concurrency primitives shared by the actors.
pub mod sync;

/// Game vocabulary, configuration, errors, rules and display.
pub mod game;
pub use game::{
    Card, ClassicRules, ConfigError, ConfigResult, GameConfig, GameError, GameResult, LogUi,
    PlayerId, RecordingUi, Rules, Score, Slot, Submission, Ui, UiEvent, Verdict,
};

/// The shared table.
pub mod table;
pub use table::{Hint, Table};

/// Player and synthetic-input actors.
pub mod player;

/// Dealer actor and round clock.
pub mod dealer;
pub use dealer::{ClockMode, GameSummary};

/// Game bootstrap.
pub mod session;
pub use session::{Game, GameHandle};

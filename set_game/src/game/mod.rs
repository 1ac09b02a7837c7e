//! Game vocabulary shared by the table and the actors.
//!
//! This module provides:
//! - Card, slot and player identifiers, submissions and verdicts
//! - Game configuration with JSON and environment sources
//! - Error types for configuration and bootstrap
//! - Match rules and the display collaborator

pub mod config;
pub mod entities;
pub mod errors;
pub mod rules;
pub mod ui;

pub use config::GameConfig;
pub use entities::{Card, PlayerId, Score, Slot, Submission, Verdict};
pub use errors::{ConfigError, ConfigResult, GameError, GameResult};
pub use rules::{ClassicRules, Rules};
pub use ui::{LogUi, RecordingUi, Ui, UiEvent};

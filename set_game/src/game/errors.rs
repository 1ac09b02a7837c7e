//! Error types for configuration and game bootstrap.

use super::entities::{PlayerId, Slot};
use thiserror::Error;

/// Result type for configuration loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value the game cannot run with
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Configuration file could not be read
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON for this schema
    #[error("Failed to parse configuration file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for game lifecycle operations
pub type GameResult<T> = Result<T, GameError>;

/// Errors raised at the boundary of a running game.
///
/// The actors themselves never fail: stale selections, interrupted waits,
/// full queues and exhausted decks all resolve locally.
#[derive(Debug, Error)]
pub enum GameError {
    /// Configuration rejected before start
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The OS refused to spawn an actor thread
    #[error("Failed to spawn actor thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// Key press addressed to a player that does not exist
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// Key press for a slot outside the table
    #[error("Slot {slot} is outside a table of {table_size} slots")]
    SlotOutOfRange { slot: Slot, table_size: usize },

    /// An actor thread panicked before it could be joined cleanly
    #[error("Actor thread panicked: {0}")]
    ActorPanicked(String),
}

//! Game configuration models.

use super::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Read-only game configuration shared by every actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Players driven only by external key presses
    pub human_players: usize,

    /// Players driven by a synthetic-input actor
    pub computer_players: usize,

    /// Number of slots on the table (default: 12)
    pub table_size: usize,

    /// Cards per match, which is also the number of values per feature
    pub feature_size: usize,

    /// Features per card (default: 4)
    pub feature_count: usize,

    /// Cards in the deck, ids `0..deck_size`
    pub deck_size: usize,

    /// Round length: positive counts down, zero counts up, negative disables
    /// the clock
    pub turn_timeout_millis: i64,

    /// Remaining time below which the countdown is shown as a warning
    pub turn_timeout_warning_millis: i64,

    /// Freeze after an accepted match
    pub point_freeze_millis: u64,

    /// Freeze after a rejected match
    pub penalty_freeze_millis: u64,

    /// Simulated delay for placing or removing a card
    pub table_delay_millis: u64,

    /// Pause between synthetic key presses
    pub computer_delay_millis: u64,

    /// Log every match on the table after each deal
    pub hints: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            human_players: 0,
            computer_players: 2,
            table_size: 12,
            feature_size: 3,
            feature_count: 4,
            deck_size: 81,
            turn_timeout_millis: 60_000,
            turn_timeout_warning_millis: 5_000,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 3_000,
            table_delay_millis: 0,
            computer_delay_millis: 0,
            hints: false,
        }
    }
}

impl GameConfig {
    /// Load configuration from a JSON file. Missing fields keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Overlay `SET_*` environment variables on top of `self`.
    ///
    /// Unset or unparsable variables leave the current value untouched.
    pub fn with_env_overrides(self) -> Self {
        Self {
            human_players: parse_env_or("SET_HUMAN_PLAYERS", self.human_players),
            computer_players: parse_env_or("SET_COMPUTER_PLAYERS", self.computer_players),
            table_size: parse_env_or("SET_TABLE_SIZE", self.table_size),
            feature_size: parse_env_or("SET_FEATURE_SIZE", self.feature_size),
            feature_count: parse_env_or("SET_FEATURE_COUNT", self.feature_count),
            deck_size: parse_env_or("SET_DECK_SIZE", self.deck_size),
            turn_timeout_millis: parse_env_or("SET_TURN_TIMEOUT_MILLIS", self.turn_timeout_millis),
            turn_timeout_warning_millis: parse_env_or(
                "SET_TURN_TIMEOUT_WARNING_MILLIS",
                self.turn_timeout_warning_millis,
            ),
            point_freeze_millis: parse_env_or("SET_POINT_FREEZE_MILLIS", self.point_freeze_millis),
            penalty_freeze_millis: parse_env_or(
                "SET_PENALTY_FREEZE_MILLIS",
                self.penalty_freeze_millis,
            ),
            table_delay_millis: parse_env_or("SET_TABLE_DELAY_MILLIS", self.table_delay_millis),
            computer_delay_millis: parse_env_or(
                "SET_COMPUTER_DELAY_MILLIS",
                self.computer_delay_millis,
            ),
            hints: parse_env_or("SET_HINTS", self.hints),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns the first field found outside its allowed range
    pub fn validate(&self) -> ConfigResult<()> {
        if self.players() == 0 {
            return Err(invalid("computer_players", "Need at least one player"));
        }

        if self.feature_size < 2 {
            return Err(invalid("feature_size", "Must be at least 2"));
        }

        if self.feature_count == 0 {
            return Err(invalid("feature_count", "Must be greater than 0"));
        }

        if self.table_size < self.feature_size {
            return Err(invalid(
                "table_size",
                format!("Must be at least feature_size ({})", self.feature_size),
            ));
        }

        if self.deck_size == 0 {
            return Err(invalid("deck_size", "Must be greater than 0"));
        }

        match self.card_space() {
            Some(space) if self.deck_size <= space => {}
            _ => {
                return Err(invalid(
                    "deck_size",
                    format!(
                        "Cannot exceed feature_size^feature_count ({}^{})",
                        self.feature_size, self.feature_count
                    ),
                ));
            }
        }

        if self.turn_timeout_warning_millis < 0 {
            return Err(invalid("turn_timeout_warning_millis", "Must not be negative"));
        }

        Ok(())
    }

    /// Total number of players, humans first
    pub fn players(&self) -> usize {
        self.human_players + self.computer_players
    }

    /// Whether player `id` is driven by external key presses
    pub fn is_human(&self, id: usize) -> bool {
        id < self.human_players
    }

    /// Number of distinct cards the feature encoding can express
    pub fn card_space(&self) -> Option<usize> {
        u32::try_from(self.feature_count)
            .ok()
            .and_then(|count| self.feature_size.checked_pow(count))
    }

    pub fn turn_timeout_warning(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_warning_millis.max(0).unsigned_abs())
    }

    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_millis)
    }

    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_millis)
    }

    pub fn table_delay(&self) -> Duration {
        Duration::from_millis(self.table_delay_millis)
    }

    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_millis)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

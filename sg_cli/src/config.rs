//! Command-line configuration.
//!
//! Layers CLI flags on top of the library's configuration sources
//! (defaults, optional JSON file, `SET_*` environment variables).

use pico_args::Arguments;
use set_game::{ConfigError, GameConfig, PlayerId, Slot};
use std::path::PathBuf;

/// Flags accepted by the runner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// JSON configuration file
    pub config_path: Option<PathBuf>,
    /// Human player count override
    pub humans: Option<usize>,
    /// Computer player count override
    pub computers: Option<usize>,
    /// Round timeout override in milliseconds
    pub timeout_millis: Option<i64>,
    /// Log every match after each deal
    pub hints: bool,
    /// Print the summary as JSON
    pub json: bool,
}

impl CliOptions {
    /// Parse flags, leaving unknown arguments in `pargs`
    ///
    /// # Errors
    ///
    /// Returns error if a flag value does not parse
    pub fn from_args(pargs: &mut Arguments) -> Result<Self, CliError> {
        Ok(Self {
            config_path: pargs.opt_value_from_str("--config")?,
            humans: pargs.opt_value_from_str("--humans")?,
            computers: pargs.opt_value_from_str("--computers")?,
            timeout_millis: pargs.opt_value_from_str("--timeout")?,
            hints: pargs.contains("--hints"),
            json: pargs.contains("--json"),
        })
    }

    /// Build the game configuration from every source, flags last
    ///
    /// # Returns
    ///
    /// * `Result<GameConfig, CliError>` - Validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the result is invalid
    pub fn game_config(&self) -> Result<GameConfig, CliError> {
        let base = match &self.config_path {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        let config = self.apply(base.with_env_overrides());
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, mut config: GameConfig) -> GameConfig {
        if let Some(humans) = self.humans {
            config.human_players = humans;
        }
        if let Some(computers) = self.computers {
            config.computer_players = computers;
        }
        if let Some(timeout) = self.timeout_millis {
            config.turn_timeout_millis = timeout;
        }
        if self.hints {
            config.hints = true;
        }
        config
    }
}

/// Parse one keyboard line of the form `<player> <slot>`
///
/// # Errors
///
/// Returns error if the line does not hold exactly two integers
pub fn parse_press(line: &str) -> Result<(PlayerId, Slot), CliError> {
    let invalid = |reason: &str| CliError::Input {
        line: line.to_string(),
        reason: reason.to_string(),
    };
    let mut parts = line.split_whitespace();
    let (Some(player), Some(slot), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("expected `<player> <slot>`"));
    };
    let player = player.parse().map_err(|_| invalid("player is not a number"))?;
    let slot = slot.parse().map_err(|_| invalid("slot is not a number"))?;
    Ok((player, slot))
}

/// Runner error types
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    Args(#[from] pico_args::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid input {line:?}: {reason}")]
    Input { line: String, reason: String },
}

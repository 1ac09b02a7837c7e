//! Terminal runner for the Set game engine.
//!
//! Computer players play on their own; human players are driven by lines of
//! `<player> <slot>` on standard input. The display is the log.

mod config;

use std::{
    io::{self, BufRead},
    sync::Arc,
    thread,
};

use anyhow::Error;
use config::{CliOptions, parse_press};
use ctrlc::set_handler;
use log::{info, warn};
use pico_args::Arguments;
use set_game::{ClassicRules, Game, GameHandle, GameSummary, LogUi};

const HELP: &str = "\
Play a game of Set in the terminal

USAGE:
  sg_cli [OPTIONS]

OPTIONS:
  --config     PATH        JSON configuration file
  --humans     N           Human players           [default: env SET_HUMAN_PLAYERS or 0]
  --computers  N           Computer players        [default: env SET_COMPUTER_PLAYERS or 2]
  --timeout    MILLIS      Round timeout; 0 counts up, negative disables the clock
                           [default: env SET_TURN_TIMEOUT_MILLIS or 60000]

FLAGS:
  --hints                  Log every match after each deal
  --json                   Print the final summary as JSON
  -h, --help               Print help information

INPUT:
  <player> <slot>          Press a slot for a human player
  q                        End the game

ENVIRONMENT:
  RUST_LOG                 Log level (e.g. info, debug)
  SET_*                    Any configuration field, e.g. SET_TABLE_SIZE
  (See .env.example for all configuration options)
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let options = CliOptions::from_args(&mut pargs)?;
    let config = options.game_config()?;

    env_logger::builder().format_target(false).init();

    let rules = Arc::new(ClassicRules::from_config(&config));
    let game = Game::start(config, Arc::new(LogUi), rules)?;
    let handle = game.handle();

    // Catching signals for a graceful end of game.
    {
        let handle = handle.clone();
        set_handler(move || handle.terminate())?;
    }

    if handle.config().human_players > 0 {
        info!("enter `<player> <slot>` to press, `q` to quit");
        let handle = handle.clone();
        thread::Builder::new()
            .name("keyboard".to_string())
            .spawn(move || read_presses(&handle))?;
    }

    let summary = game.join()?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn read_presses(handle: &GameHandle) {
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "q" {
            handle.terminate();
            break;
        }
        match parse_press(line).map_err(Error::from).and_then(|(player, slot)| {
            handle.key_pressed(player, slot).map_err(Error::from)
        }) {
            Ok(true) => {}
            Ok(false) => info!("press ignored: {line}"),
            Err(e) => warn!("{e}"),
        }
        if handle.is_terminated() {
            break;
        }
    }
}

fn print_summary(summary: &GameSummary) {
    println!(
        "{} rounds, {} matches in {}s",
        summary.rounds,
        summary.matches,
        summary.duration().num_seconds()
    );
    for (player, score) in summary.scores.iter().enumerate() {
        println!("player {player}: {score}");
    }
    if summary.is_tie() {
        println!("tie between players {:?}", summary.winners);
    } else if let [winner] = summary.winners[..] {
        println!("player {winner} wins");
    }
}

//! Command-line interface for the tictactoe binary.

use clap::{Parser, Subcommand};
use tictactoe_arena::Difficulty;

/// Tic-tac-toe against a random, heuristic or perfect computer opponent
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Tic-tac-toe with three computer opponents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal (you are X)
    Play {
        /// Mode: two-player, easy, medium or hard. Asked for when omitted.
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Seed for the computer's random choices
        #[arg(long)]
        seed: Option<u64>,

        /// Pause before the computer answers, in milliseconds
        #[arg(long)]
        think_delay_ms: Option<u64>,
    },

    /// Let two computer opponents play a series and print the tally
    Simulate {
        /// Strategy for X
        #[arg(long, default_value = "hard")]
        first: Difficulty,

        /// Strategy for O
        #[arg(long, default_value = "hard")]
        second: Difficulty,

        /// Number of games
        #[arg(short = 'n', long, default_value = "100")]
        games: u32,

        /// Seed for random choices
        #[arg(long)]
        seed: Option<u64>,

        /// Print the tally as JSON
        #[arg(long)]
        json: bool,
    },
}

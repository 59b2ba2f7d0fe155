//! Command-line interface for gridlock.

use clap::{Parser, Subcommand};
use gridlock::MatchConfig;
use gridlock_tictactoe::Difficulty;
use std::path::PathBuf;

/// Gridlock - tic-tac-toe in the terminal, against a friend, the computer,
/// or a peer over the network
#[derive(Parser, Debug)]
#[command(name = "gridlock")]
#[command(about = "Hot-seat, computer and peer-to-peer tic-tac-toe", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML match configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where logs are written (never the terminal)
    #[arg(long, global = true, default_value = "gridlock.log")]
    pub log_file: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Two players sharing one terminal
    Local,

    /// Play against the computer
    Computer {
        /// beginner, amateur or pro (defaults to the configured level)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },

    /// Invite a peer: prints a session code and waits for them to join
    Host {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Interface to bind to
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Join a peer's match with their session code
    Join {
        /// The 6-character code the host was given
        #[arg(long)]
        code: String,

        /// Host address
        #[arg(long, default_value = "127.0.0.1:4747")]
        addr: String,
    },
}

impl Command {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn configure(&self, config: MatchConfig) -> MatchConfig {
        match self {
            Command::Computer {
                difficulty: Some(difficulty),
            } => config.with_difficulty(*difficulty),
            Command::Host {
                port: Some(port), ..
            } => config.with_port(*port),
            _ => config,
        }
    }
}

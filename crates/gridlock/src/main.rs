//! Gridlock - terminal tic-tac-toe.
//!
//! Hot-seat, computer and peer-to-peer matches driven by one dispatch loop.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use gridlock::{
    Event, GameMode, MatchConfig, MatchController, SessionCode, TerminalPresenter, dispatch, tcp,
    terminal,
};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let config = match &cli.config {
        Some(path) => MatchConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MatchConfig::default(),
    };
    let config = cli.command.configure(config);
    info!(?config, command = ?cli.command, "Starting gridlock");

    let (tx, rx) = mpsc::unbounded_channel();
    let mut controller = MatchController::new(config.clone(), TerminalPresenter::stdout());
    let now = dispatch::clock_now();

    match cli.command {
        Command::Local => controller.handle(Event::SelectMode(GameMode::Local), now),
        Command::Computer { .. } => {
            let mode = GameMode::Computer(*config.difficulty());
            controller.handle(Event::SelectMode(mode), now);
        }
        Command::Host { bind, .. } => {
            let port = *config.port();
            let listener = tcp::listen((bind.as_str(), port))
                .await
                .with_context(|| format!("binding {bind}:{port}"))?;
            let code = SessionCode::random();
            controller.handle(Event::SelectMode(GameMode::Online), now);
            controller.attach_transport(Box::new(tcp::host(listener, code.clone(), tx.clone())));
            controller.announce_code(&code);
        }
        Command::Join { code, addr } => {
            let code = SessionCode::parse(&code).context("invalid session code")?;
            controller.handle(Event::SelectMode(GameMode::Online), now);
            controller.attach_transport(Box::new(tcp::join(addr, code, tx.clone())));
        }
    }

    println!("{}", terminal::HELP);
    terminal::spawn_input(tx);
    dispatch::run(controller, rx).await;

    info!("Goodbye");
    Ok(())
}

/// Sends logs to a file so they stay out of the board display.
fn init_tracing(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

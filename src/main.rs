//! tictactoe - play against the engine, or let it play itself.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::str::FromStr;
use tictactoe_arena::{
    Difficulty, EngineConfig, GameResult, GameSession, Position, SessionError, SessionEvent,
    SessionHandle, SessionSnapshot, pacing, simulate,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so the board on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            difficulty,
            config,
            seed,
            think_delay_ms,
        } => run_play(difficulty, config, seed, think_delay_ms).await,
        Command::Simulate {
            first,
            second,
            games,
            seed,
            json,
        } => run_simulate(first, second, games, seed, json),
    }
}

/// Builds the effective config: file, then environment, then flags.
#[instrument]
fn load_config(
    path: Option<PathBuf>,
    difficulty: Option<Difficulty>,
    seed: Option<u64>,
    think_delay_ms: Option<u64>,
) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut config = config
        .with_env_overrides()
        .context("Invalid environment override")?;

    if seed.is_some() {
        config.set_seed(seed);
    }
    if difficulty.is_some() {
        config.set_difficulty(difficulty);
    }
    if let Some(ms) = think_delay_ms {
        config.set_think_delay_ms(ms);
    }
    debug!(?config, "Effective config");
    Ok(config)
}

/// Interactive game on stdin/stdout.
async fn run_play(
    difficulty: Option<Difficulty>,
    config: Option<PathBuf>,
    seed: Option<u64>,
    think_delay_ms: Option<u64>,
) -> Result<()> {
    let config = load_config(config, difficulty, seed, think_delay_ms)?;
    let session = GameSession::from_config(&config);
    let (handle, task) = pacing::spawn(session, config.think_delay());
    let mut events = handle.subscribe().await?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    info!("Starting interactive game");
    let mut preset = *config.difficulty();

    'session: loop {
        let chosen = match preset.take() {
            Some(d) => d,
            None => match prompt_difficulty(&mut input).await? {
                Some(d) => d,
                None => break 'session,
            },
        };
        handle.choose_difficulty(chosen).await?;
        println!("\nMode: {}. You are X. Type 1-9 or a cell name, 'help' for commands.", chosen);

        loop {
            let snapshot = handle.snapshot().await?;
            render(&snapshot);

            let Some(line) = input.next_line().await? else {
                break 'session;
            };
            drain(&mut events);

            match line.trim().to_ascii_lowercase().as_str() {
                "" => continue,
                "q" | "quit" | "exit" => break 'session,
                "help" | "?" => print_help(),
                "again" | "a" => handle.play_again().await?,
                "reset" | "r" => {
                    handle.reset_all().await?;
                    continue 'session;
                }
                other => {
                    let Some(position) = Position::parse(other) else {
                        println!("Unrecognized input {:?}. Type 'help' for commands.", other);
                        continue;
                    };
                    match handle.submit_move(position.to_index()).await {
                        Ok(()) => wait_for_computer(&handle, &mut events).await?,
                        Err(SessionError::Rejected(e)) => println!("{}", e),
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
    }

    drop(handle);
    let session = task.await.context("Session driver panicked")?;
    println!("Final score - {}", session.score());
    Ok(())
}

/// Asks for a mode until a valid one is typed. `None` on end of input.
async fn prompt_difficulty(input: &mut Lines<BufReader<Stdin>>) -> Result<Option<Difficulty>> {
    loop {
        println!("\nChoose a mode: two-player, easy, medium, hard (or quit)");
        let Some(line) = input.next_line().await? else {
            return Ok(None);
        };
        let line = line.trim();
        if matches!(line, "q" | "quit" | "exit") {
            return Ok(None);
        }
        match Difficulty::from_str(line) {
            Ok(d) => return Ok(Some(d)),
            Err(_) => println!("Unknown mode {:?}", line),
        }
    }
}

/// Blocks until a pending computer move resolves or is cancelled.
async fn wait_for_computer(
    handle: &SessionHandle,
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
) -> Result<()> {
    let snapshot = handle.snapshot().await?;
    let Some(ticket) = snapshot.pending else {
        return Ok(());
    };

    println!("Computer is thinking...");
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::ComputerResolved { index } => {
                if let Some(position) = Position::from_index(index) {
                    println!("Computer plays {} ({})", index + 1, position);
                }
                return Ok(());
            }
            SessionEvent::ComputerCancelled(cancelled) if cancelled == ticket => {
                warn!(?ticket, "Computer move cancelled");
                return Ok(());
            }
            _ => {}
        }
    }
    bail!("Session driver stopped while the computer was thinking")
}

fn drain(events: &mut mpsc::UnboundedReceiver<SessionEvent>) {
    while events.try_recv().is_ok() {}
}

fn render(snapshot: &SessionSnapshot) {
    println!("\n{}\n", snapshot.board);
    match snapshot.result {
        GameResult::InProgress => println!("Next turn: {}", snapshot.to_play),
        GameResult::Won(player) => {
            let line = snapshot
                .winning_pattern
                .map(|p| p.cells().map(|i| (i + 1).to_string()).join("-"))
                .unwrap_or_default();
            println!("{} wins! ({})  Type 'again' or 'reset'.", player, line);
        }
        GameResult::Draw => println!("It's a draw! Type 'again' or 'reset'."),
    }
    println!("Score - {}", snapshot.score);
}

fn print_help() {
    println!("  1-9 or a name like 'center'  place your mark");
    println!("  again                        new board, keep the score");
    println!("  reset                        clear score and choose a new mode");
    println!("  quit                         leave");
}

/// Computer-versus-computer series.
fn run_simulate(
    first: Difficulty,
    second: Difficulty,
    games: u32,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    info!(%first, %second, games, "Running simulation");
    let score = simulate::play_series(first, second, games, &mut rng)
        .context("Simulation failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
        return Ok(());
    }
    println!("X ({}) vs O ({}) over {} games", first, second, games);
    println!("{}", score);
    Ok(())
}

//! Kingsguard -- a tafl-style tactical board game engine.
//!
//! This binary reads line commands from stdin and writes board state and
//! engine events to stdout. Logs go to stderr, filtered by `RUST_LOG`.
//!
//! Usage:
//!   kingsguard [--config FILE]

use std::env;
use std::io::{self, BufRead, Write};

use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use kingsguard::config::GameConfig;
use kingsguard::engine::Engine;
use kingsguard::protocol::{parse_command, write_board, write_event, write_moves, Command};

/// Upper bound on ticks spent by a single `move` or `run` command.
const RUN_TICK_LIMIT: u32 = 10_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kingsguard=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::headless(config);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match dispatch(&mut engine, cmd, &mut out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("failed to write output: {}", e);
                break;
            }
        }
    }
}

/// Reads `--config FILE` if given, else the defaults.
fn load_config() -> Result<GameConfig, String> {
    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        None => Ok(GameConfig::default()),
        Some("--config") => match args.get(2) {
            Some(path) => GameConfig::load(path).map_err(|e| e.to_string()),
            None => Err("--config requires a file path".to_string()),
        },
        Some(other) => Err(format!("unknown argument: {}", other)),
    }
}

/// Runs one command. Returns `Ok(false)` on `quit`.
fn dispatch<W: Write>(engine: &mut Engine, cmd: Command, out: &mut W) -> io::Result<bool> {
    match cmd {
        Command::IsReady => writeln!(out, "readyok")?,
        Command::SetOption { name, value } => {
            if let Err(e) = engine.set_option(&name, &value) {
                warn!(option = %name, "{}", e);
                writeln!(out, "error {}", e)?;
            }
        }
        Command::NewGame => engine.new_game(),
        Command::Show => write_board(out, engine.state())?,
        Command::Moves { piece } => write_moves(out, piece, &engine.valid_moves(piece))?,
        Command::Move { piece, row, col } => match engine.submit_move(piece, row, col) {
            Ok(()) => {
                engine.run_until_idle(RUN_TICK_LIMIT);
            }
            Err(e) => writeln!(out, "error {}", e)?,
        },
        Command::Tick { count } => {
            for _ in 0..count {
                engine.tick();
            }
        }
        Command::Run => {
            engine.run_until_idle(RUN_TICK_LIMIT);
        }
        Command::Snapshot => {
            serde_json::to_writer(&mut *out, &engine.snapshot())?;
            writeln!(out)?;
        }
        Command::Continue => {
            if let Err(e) = engine.continue_campaign() {
                writeln!(out, "error {}", e)?;
            }
        }
        Command::Quit => {
            out.flush()?;
            return Ok(false);
        }
    }

    for event in engine.drain_events() {
        write_event(out, &event)?;
    }
    out.flush()?;
    Ok(true)
}

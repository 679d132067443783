//! Self-play batch CLI.
//!
//! Plays AI-vs-AI games and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --max-turns N   Side turns before a draw is declared (default: 200)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --config FILE   Game config JSON (default: built-in rules)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::time::Instant;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kingsguard::config::GameConfig;
use kingsguard::selfplay::{self, SelfPlayConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kingsguard=info")),
        )
        .with_writer(io::stderr)
        .init();

    let (config, output_path, quiet) = match parse_args(env::args().skip(1).collect()) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            error!("{}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let games = match selfplay::run_batch(&config) {
        Ok(g) => g,
        Err(e) => {
            error!("failed to build thread pool: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        games = games.len(),
        secs = start.elapsed().as_secs_f64(),
        "self-play batch complete"
    );

    if !quiet {
        let summary = selfplay::summarize(&games);
        if let Err(e) = selfplay::write_summary(&summary, &mut io::stderr()) {
            error!("failed to write summary: {}", e);
        }
    }

    let written = match output_path {
        Some(path) => File::create(&path)
            .and_then(|file| selfplay::write_jsonl(&games, &mut BufWriter::new(file))),
        None => selfplay::write_jsonl(&games, &mut BufWriter::new(io::stdout().lock())),
    };
    if let Err(e) = written {
        error!("failed to write output: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

type Parsed = (SelfPlayConfig, Option<String>, bool);

/// Returns `Ok(None)` when help was requested.
fn parse_args(args: Vec<String>) -> Result<Option<Parsed>, String> {
    let mut config = SelfPlayConfig::default();
    let mut output_path = None;
    let mut quiet = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| iter.next().ok_or_else(|| format!("{} needs a value", flag));
        match arg.as_str() {
            "--games" => config.num_games = parse(&arg, value(&arg)?)?,
            "--max-turns" => config.max_turns = parse(&arg, value(&arg)?)?,
            "--threads" => config.threads = parse(&arg, value(&arg)?)?,
            "--seed" => config.seed = parse(&arg, value(&arg)?)?,
            "--config" => {
                let path = value(&arg)?;
                config.game = GameConfig::load(&path).map_err(|e| e.to_string())?;
            }
            "--output" => output_path = Some(value(&arg)?),
            "--quiet" => quiet = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(Some((config, output_path, quiet)))
}

fn parse<T: std::str::FromStr>(flag: &str, value: String) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid {} value: {}", flag, value))
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --max-turns N    Side turns before a draw (default: 200)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --config FILE    Game config JSON");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress summary output");
    eprintln!("  --help           Show this help");
}

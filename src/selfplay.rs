//! Headless AI-vs-AI games.
//!
//! Plays full games with the planner driving both sides and records who won
//! and how long it took. Batches run in parallel on a rayon pool; every game
//! gets its own engine and RNG, so games share nothing.

use std::io::Write;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::board::{SideId, ATTACKERS, DEFENDERS};
use crate::config::GameConfig;
use crate::engine::{Engine, EngineEvent};

/// Settings for a self-play batch.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    pub num_games: usize,
    /// Side turns after which a game is scored as a draw.
    pub max_turns: u32,
    pub threads: usize,
    /// Base seed; game `i` uses `seed + i`. Zero seeds from entropy.
    pub seed: u64,
    /// Rules and board for every game. Defenders are always AI-driven.
    pub game: GameConfig,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            max_turns: 200,
            threads: 4,
            seed: 0,
            game: GameConfig {
                delay_ticks: 0,
                ..GameConfig::default()
            },
        }
    }
}

/// Result of one game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    /// `None` for a draw by turn limit.
    pub winner: Option<SideId>,
    pub message: Option<String>,
    pub turns: u32,
    pub ticks: u64,
    pub captures: usize,
    pub kills: usize,
    pub defenders_left: usize,
    pub attackers_left: usize,
}

/// Plays a single game to completion or to the turn limit.
pub fn play_game(config: &SelfPlayConfig, game_id: usize) -> GameRecord {
    let mut game = config.game.clone();
    game.ai_controls_defenders = true;
    game.seed = (config.seed != 0).then(|| config.seed.wrapping_add(game_id as u64));

    let mut engine = Engine::headless(game);
    // Each turn is a handful of ticks; the cap only guards against a stuck machine.
    let tick_cap = config.max_turns as u64 * 64 + 64;
    let mut captures = 0;
    let mut kills = 0;

    while !engine.is_finished() && engine.turn() < config.max_turns && engine.ticks() < tick_cap {
        engine.tick();
        for event in engine.drain_events() {
            if let EngineEvent::Capture(c) = event {
                captures += 1;
                if c.killed {
                    kills += 1;
                }
            }
        }
    }

    let outcome = engine.outcome();
    let record = GameRecord {
        game_id,
        winner: outcome.map(|o| o.winner),
        message: outcome.map(|o| o.message.clone()),
        turns: engine.turn(),
        ticks: engine.ticks(),
        captures,
        kills,
        defenders_left: engine.state().side(DEFENDERS).pieces.len(),
        attackers_left: engine.state().side(ATTACKERS).pieces.len(),
    };
    debug!(game_id, winner = ?record.winner, turns = record.turns, "self-play game finished");
    record
}

/// Plays `config.num_games` games, in parallel when `threads > 1`.
///
/// Records come back ordered by game id.
pub fn run_batch(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, rayon::ThreadPoolBuildError> {
    info!(games = config.num_games, threads = config.threads, "starting self-play batch");
    if config.threads <= 1 {
        return Ok((0..config.num_games).map(|i| play_game(config, i)).collect());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    Ok(pool.install(|| {
        (0..config.num_games)
            .into_par_iter()
            .map(|i| play_game(config, i))
            .collect()
    }))
}

/// Writes records as JSONL, one game per line.
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Aggregate results of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub defender_wins: usize,
    pub attacker_wins: usize,
    pub draws: usize,
    pub avg_turns: f64,
}

pub fn summarize(games: &[GameRecord]) -> Summary {
    let mut summary = Summary {
        games: games.len(),
        ..Default::default()
    };
    let mut total_turns = 0u64;
    for g in games {
        total_turns += g.turns as u64;
        match g.winner {
            Some(DEFENDERS) => summary.defender_wins += 1,
            Some(_) => summary.attacker_wins += 1,
            None => summary.draws += 1,
        }
    }
    summary.avg_turns = total_turns as f64 / games.len().max(1) as f64;
    summary
}

/// Writes a human-readable summary.
pub fn write_summary<W: Write>(summary: &Summary, out: &mut W) -> std::io::Result<()> {
    let pct = |n: usize| 100.0 * n as f64 / summary.games.max(1) as f64;
    writeln!(out, "=== Self-Play Summary ===")?;
    writeln!(out, "Games: {}", summary.games)?;
    writeln!(out, "Avg turns/game: {:.1}", summary.avg_turns)?;
    writeln!(out, "Defenders: {} ({:.1}%)", summary.defender_wins, pct(summary.defender_wins))?;
    writeln!(out, "Attackers: {} ({:.1}%)", summary.attacker_wins, pct(summary.attacker_wins))?;
    writeln!(out, "Draws: {} ({:.1}%)", summary.draws, pct(summary.draws))
}

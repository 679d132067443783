//! Session configuration.
//!
//! Loaded from JSON with every field optional, and adjustable one key at a
//! time through the protocol's `setoption` command.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest board that fits both starting formations.
pub const MIN_BOARD_SIZE: u8 = 5;
pub const MAX_BOARD_SIZE: u8 = 25;

/// Rule switches where historical variants of the game disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleVariant {
    /// Whether an ordinary sandwich can damage a King.
    pub king_sandwich_capture: bool,
    /// Defenders win once attackers are reduced to this many pieces.
    pub defender_elimination_threshold: usize,
    /// Attackers win once defenders are reduced to this many pieces.
    pub attacker_elimination_threshold: usize,
}

impl Default for RuleVariant {
    fn default() -> Self {
        RuleVariant {
            king_sandwich_capture: false,
            defender_elimination_threshold: 0,
            attacker_elimination_threshold: 1,
        }
    }
}

/// Weights for the AI move scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerWeights {
    pub setup_weight: f32,
    pub opportunity_weight: f32,
    /// Upper bound (exclusive) of the uniform random jitter added to each score.
    pub jitter: f32,
    /// Heat contributed by a threatened King instead of 1.
    pub king_weight: f32,
    /// Fraction of a cell's heat projected along open rays.
    pub foresight_factor: f32,
}

impl Default for PlannerWeights {
    fn default() -> Self {
        PlannerWeights {
            setup_weight: 50.0,
            opportunity_weight: 250.0,
            jitter: 5.0,
            king_weight: 5.0,
            foresight_factor: 0.5,
        }
    }
}

/// Everything a session needs to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: u8,
    pub cols: u8,
    /// Ticks spent in DELAY before each side's passive phase.
    pub delay_ticks: u32,
    /// Ticks the action barrier waits before force-advancing.
    pub barrier_timeout_ticks: u32,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub rules: RuleVariant,
    /// Diagonal formation slots given to Shieldmaidens instead of Defenders.
    pub shieldmaidens: u8,
    /// Let the planner drive the defender side too.
    pub ai_controls_defenders: bool,
    pub gold_drop_chance: f64,
    pub gold_value: u32,
    pub planner: PlannerWeights,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: 9,
            cols: 9,
            delay_ticks: 2,
            barrier_timeout_ticks: 120,
            seed: None,
            rules: RuleVariant::default(),
            shieldmaidens: 0,
            ai_controls_defenders: false,
            gold_drop_chance: 0.66,
            gold_value: 10,
            planner: PlannerWeights::default(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, size) in [("rows", self.rows), ("cols", self.cols)] {
            if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between {} and {}, got {}",
                    name, MIN_BOARD_SIZE, MAX_BOARD_SIZE, size
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.gold_drop_chance) {
            return Err(ConfigError::Invalid(format!(
                "gold_drop_chance must be within [0, 1], got {}",
                self.gold_drop_chance
            )));
        }
        if self.shieldmaidens > 4 {
            return Err(ConfigError::Invalid(format!(
                "shieldmaidens must be at most 4, got {}",
                self.shieldmaidens
            )));
        }
        if self.barrier_timeout_ticks == 0 {
            return Err(ConfigError::Invalid(
                "barrier_timeout_ticks must be positive".to_string(),
            ));
        }
        if self.planner.jitter < 0.0 {
            return Err(ConfigError::Invalid("planner jitter must not be negative".to_string()));
        }
        Ok(())
    }

    /// Sets a single option by name. The config is left unchanged on error.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = self.clone();
        match name {
            "rows" => next.rows = parse_value(name, value)?,
            "cols" => next.cols = parse_value(name, value)?,
            "delay_ticks" => next.delay_ticks = parse_value(name, value)?,
            "barrier_timeout_ticks" => next.barrier_timeout_ticks = parse_value(name, value)?,
            "seed" => {
                next.seed = if value == "none" {
                    None
                } else {
                    Some(parse_value(name, value)?)
                }
            }
            "king_sandwich_capture" => next.rules.king_sandwich_capture = parse_value(name, value)?,
            "defender_elimination_threshold" => {
                next.rules.defender_elimination_threshold = parse_value(name, value)?
            }
            "attacker_elimination_threshold" => {
                next.rules.attacker_elimination_threshold = parse_value(name, value)?
            }
            "shieldmaidens" => next.shieldmaidens = parse_value(name, value)?,
            "ai_controls_defenders" => next.ai_controls_defenders = parse_value(name, value)?,
            "gold_drop_chance" => next.gold_drop_chance = parse_value(name, value)?,
            "gold_value" => next.gold_value = parse_value(name, value)?,
            "jitter" => next.planner.jitter = parse_value(name, value)?,
            other => return Err(ConfigError::Invalid(format!("unknown option '{}'", other))),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("bad value '{}' for {}", value, name)))
}

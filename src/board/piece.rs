//! Pieces, archetypes, and level progression.
//!
//! Each archetype is a tag that looks up a static capability record: whether
//! it can level up, how it moves, and its level table. Leveling replaces the
//! piece's stats wholesale with the next table entry.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::side::SideId;

/// Stable identifier of a piece for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    King,
    Defender,
    Attacker,
    Shieldmaiden,
}

/// How a piece moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePattern {
    /// Slides along the four orthogonal rays until blocked.
    Slider,
    /// Steps to adjacent tiles; `diagonal` adds the four diagonal neighbours.
    Step { diagonal: bool },
}

/// Declared special abilities. None of them has trigger logic yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    Stun { range: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityTrigger {
    Active,
    Passive,
}

/// One row of a level table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStats {
    pub xp_required: u32,
    pub max_health: u32,
    pub attack: u32,
    /// `None` means the ray scan is bounded only by the board.
    pub move_range: Option<u8>,
    pub attack_multiplier: f32,
    pub survival_multiplier: f32,
    pub ability: Option<(Ability, AbilityTrigger)>,
}

/// Static per-archetype capability record.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub can_level_up: bool,
    pub pattern: MovePattern,
    /// Level 1 is at index 0.
    pub levels: &'static [LevelStats],
}

const fn stats(xp_required: u32, max_health: u32, attack: u32) -> LevelStats {
    LevelStats {
        xp_required,
        max_health,
        attack,
        move_range: None,
        attack_multiplier: 1.0,
        survival_multiplier: 1.0,
        ability: None,
    }
}

const fn king_stats(xp_required: u32, max_health: u32, attack: u32, range: u8, stun: u8) -> LevelStats {
    LevelStats {
        xp_required,
        max_health,
        attack,
        move_range: Some(range),
        attack_multiplier: 1.0,
        survival_multiplier: 1.0,
        ability: Some((Ability::Stun { range: stun }, AbilityTrigger::Active)),
    }
}

const fn attacker_stats(max_health: u32, attack: u32, survival: f32) -> LevelStats {
    LevelStats {
        xp_required: 0,
        max_health,
        attack,
        move_range: None,
        attack_multiplier: 1.0,
        survival_multiplier: survival,
        ability: None,
    }
}

static KING_LEVELS: [LevelStats; 3] = [
    king_stats(0, 2, 1, 1, 2),
    king_stats(4, 3, 2, 2, 3),
    king_stats(8, 6, 4, 4, 4),
];

static DEFENDER_LEVELS: [LevelStats; 3] = [stats(0, 1, 1), stats(3, 2, 1), stats(6, 2, 2)];

static SHIELDMAIDEN_LEVELS: [LevelStats; 3] = [stats(0, 2, 1), stats(3, 3, 1), stats(6, 4, 2)];

static ATTACKER_LEVELS: [LevelStats; 3] = [
    attacker_stats(1, 1, 0.1),
    attacker_stats(1, 2, 0.25),
    attacker_stats(2, 2, 0.5),
];

impl Archetype {
    /// Returns the capability record for this archetype.
    pub fn capabilities(self) -> Capabilities {
        match self {
            Archetype::King => Capabilities {
                can_level_up: true,
                pattern: MovePattern::Step { diagonal: false },
                levels: &KING_LEVELS,
            },
            Archetype::Defender => Capabilities {
                can_level_up: true,
                pattern: MovePattern::Slider,
                levels: &DEFENDER_LEVELS,
            },
            Archetype::Shieldmaiden => Capabilities {
                can_level_up: true,
                pattern: MovePattern::Slider,
                levels: &SHIELDMAIDEN_LEVELS,
            },
            Archetype::Attacker => Capabilities {
                can_level_up: false,
                pattern: MovePattern::Slider,
                levels: &ATTACKER_LEVELS,
            },
        }
    }

    pub fn max_level(self) -> u8 {
        self.capabilities().levels.len() as u8
    }

    /// Single-character glyph for text rendering.
    pub const fn glyph(self) -> char {
        match self {
            Archetype::King => 'K',
            Archetype::Defender => 'D',
            Archetype::Attacker => 'a',
            Archetype::Shieldmaiden => 'S',
        }
    }
}

/// A piece on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub side: SideId,
    pub archetype: Archetype,
    pub name: Option<String>,
    pub pos: Coord,
    pub level: u8,
    pub xp: u32,
    pub max_health: u32,
    pub health: u32,
    pub attack: u32,
    pub move_range: Option<u8>,
    pub attack_multiplier: f32,
    pub survival_multiplier: f32,
    pub ability: Option<Ability>,
    pub ability_trigger: Option<AbilityTrigger>,
    /// Moved since the last passive check.
    pub has_moved_this_round: bool,
    /// Moved during its side's most recent turn.
    pub spent_for_round: bool,
    /// A presentation action involving this piece is in flight.
    pub in_action: bool,
}

impl Piece {
    /// Creates a piece at `level` (clamped to the archetype's table) with full health.
    pub fn new(id: PieceId, side: SideId, archetype: Archetype, pos: Coord, level: u8) -> Self {
        let mut piece = Piece {
            id,
            side,
            archetype,
            name: None,
            pos,
            level: 1,
            xp: 0,
            max_health: 1,
            health: 1,
            attack: 1,
            move_range: None,
            attack_multiplier: 1.0,
            survival_multiplier: 1.0,
            ability: None,
            ability_trigger: None,
            has_moved_this_round: false,
            spent_for_round: false,
            in_action: false,
        };
        piece.set_level(level.clamp(1, archetype.max_level()));
        piece
    }

    pub fn is_king(&self) -> bool {
        self.archetype == Archetype::King
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Replaces all stats with the table entry for `level` and restores full health.
    ///
    /// Levels outside the table are ignored.
    pub fn set_level(&mut self, level: u8) {
        let levels = self.archetype.capabilities().levels;
        let Some(stats) = levels.get((level as usize).wrapping_sub(1)) else {
            return;
        };
        self.level = level;
        self.max_health = stats.max_health;
        self.health = stats.max_health;
        self.attack = stats.attack;
        self.move_range = stats.move_range;
        self.attack_multiplier = stats.attack_multiplier;
        self.survival_multiplier = stats.survival_multiplier;
        self.ability = stats.ability.map(|(a, _)| a);
        self.ability_trigger = stats.ability.map(|(_, t)| t);
    }

    /// Adds experience and levels up while thresholds are met.
    ///
    /// Archetypes that cannot level up ignore experience entirely. Returns the
    /// number of levels gained.
    pub fn gain_xp(&mut self, amount: u32) -> u8 {
        let caps = self.archetype.capabilities();
        if !caps.can_level_up {
            return 0;
        }
        self.xp += amount;

        let mut gained = 0;
        while let Some(next) = caps.levels.get(self.level as usize) {
            if self.xp < next.xp_required {
                break;
            }
            self.set_level(self.level + 1);
            gained += 1;
        }
        gained
    }

    /// Applies damage, clamping health at zero. Returns true if the piece died.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.is_dead()
    }

    /// Restores health, clamping at `max_health`.
    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    pub fn heal_fully(&mut self) {
        self.health = self.max_health;
    }
}

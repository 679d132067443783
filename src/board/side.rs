//! Sides and their objectives.
//!
//! A side owns its pieces in storage order, knows which sides oppose it, and
//! carries the win predicates it is trying to satisfy.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::piece::Piece;

/// Index of a side within the session's side list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SideId(pub u8);

impl std::fmt::Display for SideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    Human,
    Monster,
}

/// The closed set of win predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveKind {
    /// Opposing sides together hold at most `threshold` pieces.
    EliminateOpposition { threshold: usize },
    /// One of the owner's Kings stands on one of `escape_tiles`.
    KingEscapes { escape_tiles: Vec<Coord> },
    /// No opposing King remains, or one is enclosed on all four sides.
    KingCaptured,
}

/// A per-side win predicate with its banner text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub description: String,
    pub result_message: String,
}

impl Objective {
    /// `defending` picks the banner of the escorting side over the besiegers.
    pub fn eliminate_opposition(threshold: usize, defending: bool) -> Self {
        let result_message = if defending {
            "Player Wins! All attackers are defeated!"
        } else {
            "Enemy Wins! All defenders are captured!"
        };
        Objective {
            kind: ObjectiveKind::EliminateOpposition { threshold },
            description: "Eliminate opposition pieces".to_string(),
            result_message: result_message.to_string(),
        }
    }

    pub fn king_escapes(escape_tiles: Vec<Coord>) -> Self {
        Objective {
            kind: ObjectiveKind::KingEscapes { escape_tiles },
            description: "King escapes".to_string(),
            result_message: "Player Wins! King escaped!".to_string(),
        }
    }

    pub fn king_captured() -> Self {
        Objective {
            kind: ObjectiveKind::KingCaptured,
            description: "Capture king".to_string(),
            result_message: "Enemy Wins! King is captured!".to_string(),
        }
    }
}

/// A participant in the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub id: SideId,
    pub name: String,
    pub species: Species,
    pub is_player_controlled: bool,
    pub pieces: Vec<Piece>,
    pub objectives: Vec<Objective>,
    pub opposition: Vec<SideId>,
    pub friendlies: Vec<SideId>,
    /// Collected treasure.
    pub gold: u32,
}

impl Side {
    pub fn new(id: SideId, name: &str, species: Species, is_player_controlled: bool) -> Self {
        Side {
            id,
            name: name.to_string(),
            species,
            is_player_controlled,
            pieces: Vec::new(),
            objectives: Vec::new(),
            opposition: Vec::new(),
            friendlies: Vec::new(),
            gold: 0,
        }
    }

    pub fn add_objective(&mut self, objective: Objective) {
        self.objectives.push(objective);
    }

    pub fn opposes(&self, other: SideId) -> bool {
        self.opposition.contains(&other)
    }

    /// True for the side itself and its friendlies.
    pub fn is_allied_with(&self, other: SideId) -> bool {
        other == self.id || self.friendlies.contains(&other)
    }

    pub fn has_king(&self) -> bool {
        self.pieces.iter().any(|p| p.is_king())
    }
}

//! Win-condition evaluation.
//!
//! Sides are checked in order and each side's objectives in the order they
//! were added; the first achieved objective decides the game.

use serde::Serialize;

use crate::board::{BoardState, ObjectiveKind, Piece, SideId, ALL_DIRECTIONS};

/// The objective that ended the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub winner: SideId,
    pub message: String,
    /// Whether the winning side is player-controlled.
    pub player_won: bool,
}

/// Returns the first achieved objective, if any.
pub fn evaluate_objectives(state: &BoardState) -> Option<Outcome> {
    for side in &state.sides {
        for objective in &side.objectives {
            if is_achieved(state, side.id, &objective.kind) {
                return Some(Outcome {
                    winner: side.id,
                    message: objective.result_message.clone(),
                    player_won: side.is_player_controlled,
                });
            }
        }
    }
    None
}

/// Checks a single objective owned by `owner`.
pub fn is_achieved(state: &BoardState, owner: SideId, kind: &ObjectiveKind) -> bool {
    match kind {
        ObjectiveKind::EliminateOpposition { threshold } => {
            state.opposition_piece_count(owner) <= *threshold
        }
        ObjectiveKind::KingEscapes { escape_tiles } => state
            .side(owner)
            .pieces
            .iter()
            .any(|p| p.is_king() && escape_tiles.contains(&p.pos)),
        ObjectiveKind::KingCaptured => {
            let mut kings = state
                .side(owner)
                .opposition
                .iter()
                .flat_map(|o| state.side(*o).pieces.iter())
                .filter(|p| p.is_king())
                .peekable();
            if kings.peek().is_none() {
                return true;
            }
            kings.any(|k| is_enclosed(state, owner, k))
        }
    }
}

/// True when all four orthogonal neighbours of `king` hold pieces allied to
/// `captor`. A board edge does not count as an enclosing wall.
fn is_enclosed(state: &BoardState, captor: SideId, king: &Piece) -> bool {
    ALL_DIRECTIONS.iter().all(|dir| {
        state
            .board
            .step(king.pos, *dir, 1)
            .and_then(|c| state.piece_at(c))
            .is_some_and(|p| state.allied(captor, p.side))
    })
}

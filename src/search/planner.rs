//! Move selection for AI-controlled sides.
//!
//! Every legal `(piece, destination)` pair of the side is scored against the
//! foresight-propagated opportunity and setup maps, plus a little random
//! jitter, and the best one is played.

use rand::Rng;
use tracing::debug;

use crate::board::{BoardState, Coord, PieceId, SideId};
use crate::config::PlannerWeights;
use crate::eval::{attack_opportunity_map, attack_setup_map, foresight};
use crate::movegen::legal_moves;

/// A scored candidate move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedMove {
    pub piece: PieceId,
    pub to: Coord,
    pub score: f32,
}

/// Scores all candidate moves of `side` in piece storage order.
///
/// Pieces spent for the round are left out unless that would leave the side
/// without a single move.
pub fn score_candidates(
    state: &BoardState,
    side: SideId,
    weights: &PlannerWeights,
    rng: &mut impl Rng,
) -> Vec<PlannedMove> {
    let board = &state.board;
    let opportunity = foresight(
        &attack_opportunity_map(state, side, weights),
        board,
        weights.foresight_factor,
    );
    let setup = foresight(
        &attack_setup_map(state, side, weights),
        board,
        weights.foresight_factor,
    );

    let pieces = &state.side(side).pieces;
    let mut moves: Vec<(PieceId, f32, Vec<Coord>)> = pieces
        .iter()
        .filter(|p| !p.spent_for_round)
        .map(|p| (p.id, p.attack_multiplier, legal_moves(state, p.id)))
        .collect();
    if moves.iter().all(|(_, _, m)| m.is_empty()) {
        moves = pieces
            .iter()
            .map(|p| (p.id, p.attack_multiplier, legal_moves(state, p.id)))
            .collect();
    }

    let mut scored = Vec::new();
    for (piece, multiplier, dests) in moves {
        for to in dests {
            let jitter = if weights.jitter > 0.0 {
                rng.gen_range(0.0..weights.jitter)
            } else {
                0.0
            };
            let score = setup.get(to) * weights.setup_weight * multiplier
                + opportunity.get(to) * weights.opportunity_weight * multiplier
                + jitter;
            scored.push(PlannedMove { piece, to, score });
        }
    }
    scored
}

/// Picks the highest-scoring move; the first candidate wins exact ties.
pub fn select_move(
    state: &BoardState,
    side: SideId,
    weights: &PlannerWeights,
    rng: &mut impl Rng,
) -> Option<PlannedMove> {
    let mut best: Option<PlannedMove> = None;
    for candidate in score_candidates(state, side, weights, rng) {
        if best.map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    if let Some(b) = best {
        debug!(side = %side, piece = %b.piece, to = %b.to, score = b.score, "planner choice");
    }
    best
}

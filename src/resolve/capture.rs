//! Sandwich capture resolution.
//!
//! A piece is captured when it sits between two pieces of an opposing side
//! along one axis. Active resolution runs after a move and looks outward from
//! the mover; passive resolution runs at the start of a side's turn and
//! looks at every opposing piece that has not moved since the last check.

use serde::Serialize;
use tracing::debug;

use crate::board::{BoardState, Coord, Direction, PieceId, SideId, ALL_DIRECTIONS};
use crate::config::RuleVariant;

/// Record of one resolved sandwich.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureEvent {
    pub attacker: PieceId,
    pub flanker: PieceId,
    pub target: PieceId,
    pub target_side: SideId,
    pub target_pos: Coord,
    pub damage: u32,
    pub killed: bool,
    /// Pieces that reached a new level from this capture, with that level.
    pub level_ups: Vec<(PieceId, u8)>,
}

/// Hook consulted before damage is applied.
///
/// A protector shields its ward from the capture entirely.
pub trait ProtectionAura {
    fn protector(&self, state: &BoardState, target: PieceId) -> Option<PieceId>;
}

/// The aura used by the standard rules: nobody is protected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAura;

impl ProtectionAura for NoAura {
    fn protector(&self, _state: &BoardState, _target: PieceId) -> Option<PieceId> {
        None
    }
}

/// Whether `target` may be taken by an ordinary sandwich under `rules`.
fn is_capturable(state: &BoardState, target: PieceId, rules: &RuleVariant) -> bool {
    match state.piece(target) {
        Some(p) => rules.king_sandwich_capture || !p.is_king(),
        None => false,
    }
}

/// Damages `target` and awards experience. Removes the target if it dies.
fn apply_capture(
    state: &mut BoardState,
    attacker: PieceId,
    flanker: PieceId,
    target: PieceId,
    award_xp: bool,
    aura: &dyn ProtectionAura,
) -> Option<CaptureEvent> {
    if let Some(guard) = aura.protector(state, target) {
        debug!(%target, %guard, "capture blocked by protector");
        return None;
    }

    let attack = state.piece(attacker)?.attack;
    let flank = state.piece(flanker)?.attack;
    let damage = attack.max(flank);

    let t = state.piece_mut(target)?;
    let target_side = t.side;
    let target_pos = t.pos;
    let killed = t.take_damage(damage);
    if killed {
        state.remove_piece(target);
    }

    let mut level_ups = Vec::new();
    if award_xp {
        for id in [attacker, flanker] {
            if let Some(p) = state.piece_mut(id) {
                if p.gain_xp(1) > 0 {
                    debug!(piece = %id, level = p.level, "level up");
                    level_ups.push((id, p.level));
                }
            }
        }
    }

    debug!(%attacker, %flanker, %target, damage, killed, "capture");
    Some(CaptureEvent {
        attacker,
        flanker,
        target,
        target_side,
        target_pos,
        damage,
        killed,
        level_ups,
    })
}

/// Resolves every sandwich formed by `mover` at its current tile.
///
/// Directions are checked Right, Left, Down, Up. Each direction captures at
/// most one piece: the opposing piece adjacent to the mover when a piece
/// allied to the mover stands directly beyond it.
pub fn resolve_active(
    state: &mut BoardState,
    mover: PieceId,
    rules: &RuleVariant,
    aura: &dyn ProtectionAura,
) -> Vec<CaptureEvent> {
    let mut events = Vec::new();
    let Some((pos, side)) = state.piece(mover).map(|p| (p.pos, p.side)) else {
        return events;
    };
    let award_xp = state.side(side).is_player_controlled;

    for dir in ALL_DIRECTIONS {
        let Some(target) = neighbour(state, pos, dir, 1) else {
            continue;
        };
        let Some(flanker) = neighbour(state, pos, dir, 2) else {
            continue;
        };
        if !is_enemy(state, side, target) || !is_ally(state, side, flanker) {
            continue;
        }
        if !is_capturable(state, target, rules) {
            continue;
        }
        if let Some(event) = apply_capture(state, mover, flanker, target, award_xp, aura) {
            events.push(event);
        }
    }
    events
}

/// Resolves at most one sandwich against the opposition of `side`.
///
/// Candidates are opposing pieces that have not moved since the last passive
/// check, in storage order; for each, directions are tried Right, Left, Down,
/// Up. Afterwards every piece's moved-this-round flag is cleared.
pub fn resolve_passive(
    state: &mut BoardState,
    side: SideId,
    rules: &RuleVariant,
    aura: &dyn ProtectionAura,
) -> Option<CaptureEvent> {
    let award_xp = state.side(side).is_player_controlled;
    let sandwich = find_passive_sandwich(state, side, rules);

    let event = sandwich.and_then(|(attacker, flanker, target)| {
        apply_capture(state, attacker, flanker, target, award_xp, aura)
    });

    for p in state.pieces_mut() {
        p.has_moved_this_round = false;
    }
    event
}

/// Finds the first `(attacker, flanker, target)` sandwich for passive resolution.
fn find_passive_sandwich(
    state: &BoardState,
    side: SideId,
    rules: &RuleVariant,
) -> Option<(PieceId, PieceId, PieceId)> {
    let opposition = &state.side(side).opposition;
    for target in opposition
        .iter()
        .flat_map(|o| state.side(*o).pieces.iter())
        .filter(|p| !p.has_moved_this_round)
    {
        if !is_capturable(state, target.id, rules) {
            continue;
        }
        for dir in ALL_DIRECTIONS {
            let behind = neighbour(state, target.pos, dir.opposite(), 1);
            let ahead = neighbour(state, target.pos, dir, 1);
            if let (Some(a), Some(b)) = (behind, ahead) {
                if is_ally(state, side, a) && is_ally(state, side, b) {
                    return Some((a, b, target.id));
                }
            }
        }
    }
    None
}

fn neighbour(state: &BoardState, from: Coord, dir: Direction, distance: u8) -> Option<PieceId> {
    state
        .board
        .step(from, dir, distance)
        .and_then(|c| state.board.occupant(c))
}

fn is_enemy(state: &BoardState, side: SideId, piece: PieceId) -> bool {
    state
        .piece(piece)
        .is_some_and(|p| state.opposes(side, p.side))
}

fn is_ally(state: &BoardState, side: SideId, piece: PieceId) -> bool {
    state
        .piece(piece)
        .is_some_and(|p| state.allied(side, p.side))
}

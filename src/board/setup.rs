//! Starting formations, objectives, and campaign re-formation.
//!
//! The defenders surround their King at the centre of the board; the
//! attackers start in small groups on the middle of each edge.

use rand::Rng;
use tracing::debug;

use super::coord::Coord;
use super::grid::Board;
use super::piece::Archetype;
use super::side::{Objective, SideId, Species};
use super::state::BoardState;
use crate::config::GameConfig;

/// The defender side always occupies the first slot and moves first.
pub const DEFENDERS: SideId = SideId(0);
/// The attacker side always occupies the second slot.
pub const ATTACKERS: SideId = SideId(1);

/// Highest level an attacker can spawn at.
const MAX_ATTACKER_LEVEL: u8 = 3;

const NAME_PREFIXES: [&str; 10] = [
    "Thor", "Odin", "Freyr", "Tyr", "Loki", "Bjorn", "Ivar", "Ragnar", "Astrid", "Ingrid",
];
const NAME_SUFFIXES: [&str; 10] = [
    "son", "dottir", "hammer", "axe", "shield", "helm", "blade", "fist", "stone", "wind",
];

/// Generates a Norse-sounding name.
pub fn generate_name(rng: &mut impl Rng) -> String {
    let prefix = NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())];
    let suffix = NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())];
    format!("{}{}", prefix, suffix)
}

/// Returns the first `count` tiles of the rings around the board centre.
///
/// Tiles are ordered by Chebyshev distance, then Manhattan distance, then
/// row-major, so the first ring lists the four cardinal neighbours before the
/// diagonals.
pub fn formation_positions(board: &Board, count: usize) -> Vec<Coord> {
    let center = board.center();
    let mut coords: Vec<Coord> = board.coords().collect();
    coords.sort_by_key(|c| (c.chebyshev(center), c.manhattan(center), c.row, c.col));
    coords.truncate(count);
    coords
}

/// Edge tiles where attackers muster: three at the top, three at the bottom,
/// one on each side of the centre row.
pub fn attacker_positions(board: &Board) -> Vec<Coord> {
    let center = board.center();
    let last_row = board.rows() - 1;
    let last_col = board.cols() - 1;
    vec![
        Coord::new(0, center.col - 1),
        Coord::new(0, center.col),
        Coord::new(0, center.col + 1),
        Coord::new(last_row, center.col - 1),
        Coord::new(last_row, center.col),
        Coord::new(last_row, center.col + 1),
        Coord::new(center.row, 0),
        Coord::new(center.row, last_col),
    ]
}

/// Builds the opening position for a fresh game.
pub fn standard_game(config: &GameConfig, rng: &mut impl Rng) -> BoardState {
    let mut state = BoardState::empty(config.rows, config.cols);
    let defenders = state.add_side("Human", Species::Human, !config.ai_controls_defenders);
    let attackers = state.add_side("Monster", Species::Monster, false);
    debug_assert_eq!((defenders, attackers), (DEFENDERS, ATTACKERS));
    state.set_opposed(defenders, attackers);

    spawn_defenders(&mut state, config, rng);
    spawn_attackers(&mut state, 1);
    setup_objectives(&mut state, config);
    state
}

fn spawn_defenders(state: &mut BoardState, config: &GameConfig, rng: &mut impl Rng) {
    let positions = formation_positions(&state.board, 9);
    for (i, pos) in positions.into_iter().enumerate() {
        let archetype = match i {
            0 => Archetype::King,
            5..=8 if i - 5 < config.shieldmaidens as usize => Archetype::Shieldmaiden,
            _ => Archetype::Defender,
        };
        if let Some(id) = state.spawn(DEFENDERS, archetype, pos, 1) {
            let name = generate_name(rng);
            if let Some(piece) = state.piece_mut(id) {
                piece.name = Some(name);
            }
        }
    }
}

fn spawn_attackers(state: &mut BoardState, level: u8) {
    for pos in attacker_positions(&state.board) {
        if state.spawn(ATTACKERS, Archetype::Attacker, pos, level).is_none() {
            debug!(%pos, "attacker muster tile occupied, skipping");
        }
    }
}

fn setup_objectives(state: &mut BoardState, config: &GameConfig) {
    let corners = state.board.corners().to_vec();

    let defenders = state.side_mut(DEFENDERS);
    defenders.objectives.clear();
    defenders.add_objective(Objective::king_escapes(corners));
    defenders.add_objective(Objective::eliminate_opposition(
        config.rules.defender_elimination_threshold,
        true,
    ));

    let attackers = state.side_mut(ATTACKERS);
    attackers.objectives.clear();
    attackers.add_objective(Objective::king_captured());
    attackers.add_objective(Objective::eliminate_opposition(
        config.rules.attacker_elimination_threshold,
        false,
    ));
}

/// Prepares the board for the next campaign round.
///
/// Survivors of `winner` are healed and re-formed around the centre, King
/// first; every opposing side loses its remaining pieces and the attacker
/// side is regenerated at a level matching `round`.
pub fn next_round(state: &mut BoardState, winner: SideId, round: u32) {
    state.board.reset();

    let opposition = state.side(winner).opposition.clone();
    for side in &opposition {
        state.side_mut(*side).pieces.clear();
    }

    let mut survivors = std::mem::take(&mut state.side_mut(winner).pieces);
    survivors.sort_by_key(|p| !p.is_king());
    let positions = formation_positions(&state.board, survivors.len());
    for (piece, pos) in survivors.iter_mut().zip(positions) {
        piece.heal_fully();
        piece.pos = pos;
        piece.has_moved_this_round = false;
        piece.spent_for_round = false;
        piece.in_action = false;
        state.board.place(piece.id, pos);
    }
    state.side_mut(winner).pieces = survivors;

    let level = round.min(MAX_ATTACKER_LEVEL as u32) as u8;
    if opposition.contains(&ATTACKERS) {
        spawn_attackers(state, level);
    }
}

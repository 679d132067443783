//! Threat heat maps for the AI planner.
//!
//! Both maps are computed from the active side's point of view and scored
//! on empty tiles only, since those are the tiles a piece can move to.
//!
//! - The opportunity map marks tiles where arriving would complete a
//!   sandwich right away: an enemy adjacent, an ally directly beyond it.
//! - The setup map marks tiles next to an enemy whose far side is still
//!   open, so a second piece could complete the sandwich later.
//!
//! Foresight then smears every hot cell outward along open rays, so a piece
//! a few tiles away on a clear line sees the threat too.

use crate::board::{Board, BoardState, Coord, SideId, ALL_DIRECTIONS};
use crate::config::PlannerWeights;

/// A `rows × cols` grid of scores, rebuilt every AI turn.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatMap {
    rows: u8,
    cols: u8,
    cells: Vec<f32>,
}

impl HeatMap {
    pub fn new(rows: u8, cols: u8) -> Self {
        HeatMap {
            rows,
            cols,
            cells: vec![0.0; rows as usize * cols as usize],
        }
    }

    fn index(&self, at: Coord) -> usize {
        assert!(at.row < self.rows && at.col < self.cols, "heat map index {} out of range", at);
        at.row as usize * self.cols as usize + at.col as usize
    }

    pub fn get(&self, at: Coord) -> f32 {
        self.cells[self.index(at)]
    }

    pub fn add(&mut self, at: Coord, value: f32) {
        let idx = self.index(at);
        self.cells[idx] += value;
    }

    /// Iterates `(coord, value)` for every non-zero cell in row-major order.
    pub fn hot_cells(&self) -> impl Iterator<Item = (Coord, f32)> + '_ {
        self.cells.iter().enumerate().filter(|(_, v)| **v != 0.0).map(|(i, v)| {
            let row = (i / self.cols as usize) as u8;
            let col = (i % self.cols as usize) as u8;
            (Coord::new(row, col), *v)
        })
    }
}

/// What the tile two steps out must hold for a threat to count.
#[derive(Clone, Copy)]
enum Beyond {
    Ally,
    Empty,
}

fn threat_map(state: &BoardState, side: SideId, weights: &PlannerWeights, beyond: Beyond) -> HeatMap {
    let board = &state.board;
    let mut map = HeatMap::new(board.rows(), board.cols());
    for tile in board.coords().filter(|c| board.is_empty(*c)) {
        for dir in ALL_DIRECTIONS {
            let Some(enemy) = board.step(tile, dir, 1).and_then(|c| state.piece_at(c)) else {
                continue;
            };
            if !state.opposes(side, enemy.side) {
                continue;
            }
            let Some(far) = board.step(tile, dir, 2) else {
                continue;
            };
            let hit = match (beyond, state.piece_at(far)) {
                (Beyond::Ally, Some(p)) => state.allied(side, p.side),
                (Beyond::Empty, None) => true,
                _ => false,
            };
            if hit {
                let weight = if enemy.is_king() { weights.king_weight } else { 1.0 };
                map.add(tile, weight);
            }
        }
    }
    map
}

/// Tiles where a piece of `side` would capture on arrival.
pub fn attack_opportunity_map(state: &BoardState, side: SideId, weights: &PlannerWeights) -> HeatMap {
    threat_map(state, side, weights, Beyond::Ally)
}

/// Tiles adjacent to an enemy whose far side is open.
pub fn attack_setup_map(state: &BoardState, side: SideId, weights: &PlannerWeights) -> HeatMap {
    threat_map(state, side, weights, Beyond::Empty)
}

/// Projects `factor` of every hot cell along each open ray from it.
///
/// Input values are kept; projections stop at the first occupied
/// tile or the board edge.
pub fn foresight(map: &HeatMap, board: &Board, factor: f32) -> HeatMap {
    let mut out = map.clone();
    for (origin, value) in map.hot_cells() {
        let spill = value * factor;
        for dir in ALL_DIRECTIONS {
            let mut cur = origin;
            while let Some(next) = board.step(cur, dir, 1) {
                if !board.is_empty(next) {
                    break;
                }
                out.add(next, spill);
                cur = next;
            }
        }
    }
    out
}

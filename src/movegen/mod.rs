//! Legal move generation.
//!
//! Produces destination tiles for a piece from its archetype's move pattern
//! and the current occupancy. Corner tiles are reserved for the King.

pub mod movement;

use crate::board::{BoardState, Coord, MovePattern, PieceId};

/// Returns every legal destination for `piece`, or an empty list if the
/// piece does not exist.
pub fn legal_moves(state: &BoardState, piece: PieceId) -> Vec<Coord> {
    let Some(p) = state.piece(piece) else {
        return Vec::new();
    };
    let board = &state.board;
    let mut moves = match p.archetype.capabilities().pattern {
        MovePattern::Slider => movement::slider_moves(board, p.pos, p.move_range),
        MovePattern::Step { diagonal } => {
            movement::step_moves(board, p.pos, p.move_range, diagonal)
        }
    };
    if !p.is_king() {
        moves.retain(|c| !board.is_corner(*c));
    }
    moves
}

/// True when `piece` may move to `to`.
pub fn is_legal(state: &BoardState, piece: PieceId, to: Coord) -> bool {
    legal_moves(state, piece).contains(&to)
}

/// Tiles crossed moving in a straight line from `from` to `to`, excluding
/// `from` and including `to`.
pub fn move_path(from: Coord, to: Coord) -> Vec<Coord> {
    let d_row = (to.row as i32 - from.row as i32).signum();
    let d_col = (to.col as i32 - from.col as i32).signum();
    let mut path = Vec::new();
    let (mut r, mut c) = (from.row as i32, from.col as i32);
    while (r, c) != (to.row as i32, to.col as i32) {
        r += d_row;
        c += d_col;
        path.push(Coord::new(r as u8, c as u8));
    }
    path
}

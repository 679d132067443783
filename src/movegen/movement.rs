//! Destination scans for each move pattern.

use crate::board::{Board, Coord, ALL_DIRECTIONS, DIAGONAL_DELTAS};

/// Walks one ray from `from` by `(d_row, d_col)`, collecting empty tiles
/// until the first occupied tile, the board edge, or `range` steps.
fn scan_ray(board: &Board, from: Coord, d_row: i32, d_col: i32, range: Option<u8>, out: &mut Vec<Coord>) {
    let limit = range.map(u32::from).unwrap_or(u32::MAX);
    let mut steps = 0;
    let mut cur = from;
    while steps < limit {
        let Some(next) = board.offset(cur, d_row, d_col) else {
            break;
        };
        if !board.is_empty(next) {
            break;
        }
        out.push(next);
        cur = next;
        steps += 1;
    }
}

/// Orthogonal rays, bounded by `range` when set.
pub fn slider_moves(board: &Board, from: Coord, range: Option<u8>) -> Vec<Coord> {
    let mut out = Vec::new();
    for dir in ALL_DIRECTIONS {
        let (dr, dc) = dir.delta();
        scan_ray(board, from, dr as i32, dc as i32, range, &mut out);
    }
    out
}

/// Adjacent steps, extended to `range` hops along a single direction.
///
/// Upgraded Kings reach further but still stop at the first blocker.
pub fn step_moves(board: &Board, from: Coord, range: Option<u8>, diagonal: bool) -> Vec<Coord> {
    let hops = Some(range.unwrap_or(1).max(1));
    let mut out = Vec::new();
    for dir in ALL_DIRECTIONS {
        let (dr, dc) = dir.delta();
        scan_ray(board, from, dr as i32, dc as i32, hops, &mut out);
    }
    if diagonal {
        for (dr, dc) in DIAGONAL_DELTAS {
            scan_ray(board, from, dr as i32, dc as i32, hops, &mut out);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceId;

    #[test]
    fn slider_stops_before_blocker() {
        let mut board = Board::new(7, 7);
        board.place(PieceId(9), Coord::new(3, 5));
        let moves = slider_moves(&board, Coord::new(3, 3), None);
        assert!(moves.contains(&Coord::new(3, 4)));
        assert!(!moves.contains(&Coord::new(3, 5)));
        assert!(!moves.contains(&Coord::new(3, 6)));
        assert!(moves.contains(&Coord::new(0, 3)));
        assert!(moves.contains(&Coord::new(6, 3)));
        assert!(moves.contains(&Coord::new(3, 0)));
        assert_eq!(moves.len(), 3 + 3 + 3 + 1);
    }

    #[test]
    fn slider_respects_range() {
        let board = Board::new(9, 9);
        let moves = slider_moves(&board, Coord::new(4, 4), Some(2));
        assert_eq!(moves.len(), 8);
        assert!(!moves.contains(&Coord::new(4, 7)));
    }

    #[test]
    fn step_is_orthogonal_by_default() {
        let board = Board::new(7, 7);
        let moves = step_moves(&board, Coord::new(3, 3), Some(1), false);
        assert_eq!(moves.len(), 4);
        assert!(!moves.contains(&Coord::new(2, 2)));
    }

    #[test]
    fn diagonal_step_adds_corners_of_neighbourhood() {
        let board = Board::new(7, 7);
        let moves = step_moves(&board, Coord::new(3, 3), Some(1), true);
        assert_eq!(moves.len(), 8);
        assert!(moves.contains(&Coord::new(2, 2)));
    }

    #[test]
    fn upgraded_step_reaches_further() {
        let mut board = Board::new(9, 9);
        board.place(PieceId(1), Coord::new(4, 6));
        let moves = step_moves(&board, Coord::new(4, 4), Some(4), false);
        assert!(moves.contains(&Coord::new(4, 5)));
        assert!(!moves.contains(&Coord::new(4, 7)));
        assert!(moves.contains(&Coord::new(0, 4)));
        assert!(moves.contains(&Coord::new(8, 4)));
    }
}

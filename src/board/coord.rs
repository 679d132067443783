//! Board coordinates and orthogonal directions.

use serde::{Deserialize, Serialize};

/// A tile position as `(row, col)`, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Coord { row, col }
    }

    /// Manhattan distance between two tiles.
    pub fn manhattan(self, other: Coord) -> u32 {
        (self.row as i32 - other.row as i32).unsigned_abs()
            + (self.col as i32 - other.col as i32).unsigned_abs()
    }

    /// Chebyshev (king-move) distance between two tiles.
    pub fn chebyshev(self, other: Coord) -> u32 {
        let dr = (self.row as i32 - other.row as i32).unsigned_abs();
        let dc = (self.col as i32 - other.col as i32).unsigned_abs();
        dr.max(dc)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// One of the four orthogonal directions.
///
/// The declaration order (Right, Left, Down, Up) is the scan order used by
/// capture resolution and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

/// All orthogonal directions in capture scan order.
pub const ALL_DIRECTIONS: [Direction; 4] =
    [Direction::Right, Direction::Left, Direction::Down, Direction::Up];

/// The four diagonal offsets, used by the eight-neighbour step pattern.
pub const DIAGONAL_DELTAS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

impl Direction {
    /// Returns the `(d_row, d_col)` offset of one step in this direction.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Right => (0, 1),
            Direction::Left => (0, -1),
            Direction::Down => (1, 0),
            Direction::Up => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_order_is_right_left_down_up() {
        assert_eq!(ALL_DIRECTIONS[0].delta(), (0, 1));
        assert_eq!(ALL_DIRECTIONS[1].delta(), (0, -1));
        assert_eq!(ALL_DIRECTIONS[2].delta(), (1, 0));
        assert_eq!(ALL_DIRECTIONS[3].delta(), (-1, 0));
    }

    #[test]
    fn opposite_cancels_delta() {
        for d in ALL_DIRECTIONS {
            let (a, b) = d.delta();
            let (c, e) = d.opposite().delta();
            assert_eq!((a + c, b + e), (0, 0));
        }
    }

    #[test]
    fn distances() {
        let a = Coord::new(1, 1);
        let b = Coord::new(3, 4);
        assert_eq!(a.manhattan(b), 5);
        assert_eq!(a.chebyshev(b), 3);
        assert_eq!(format!("{}", b), "3,4");
    }
}

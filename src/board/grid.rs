//! Tile grid.
//!
//! A fixed `rows x cols` grid where each tile holds at most one piece
//! reference. The grid knows nothing about move legality; it only stores
//! occupancy and dropped treasure.

use serde::{Deserialize, Serialize};

use super::coord::{Coord, Direction};
use super::piece::PieceId;

/// A single board square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub occupant: Option<PieceId>,
    /// Gold lying on the tile, waiting to be collected.
    pub gold: u32,
}

/// The playing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: u8,
    cols: u8,
    tiles: Vec<Tile>,
}

impl Board {
    /// Creates an empty board.
    pub fn new(rows: u8, cols: u8) -> Self {
        Board {
            rows,
            cols,
            tiles: vec![Tile::default(); rows as usize * cols as usize],
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn is_in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && row < self.rows as i32 && col < self.cols as i32
    }

    #[inline]
    fn index(&self, at: Coord) -> usize {
        assert!(
            at.row < self.rows && at.col < self.cols,
            "tile {} outside {}x{} board",
            at,
            self.rows,
            self.cols
        );
        at.row as usize * self.cols as usize + at.col as usize
    }

    /// Returns the tile at `at`. Panics when `at` is off the board.
    pub fn tile_at(&self, at: Coord) -> &Tile {
        &self.tiles[self.index(at)]
    }

    /// Returns the occupant of `at`, if any. Panics when `at` is off the board.
    pub fn occupant(&self, at: Coord) -> Option<PieceId> {
        self.tile_at(at).occupant
    }

    pub fn is_empty(&self, at: Coord) -> bool {
        self.occupant(at).is_none()
    }

    /// Puts `piece` on `at`, replacing any previous occupant reference.
    pub fn place(&mut self, piece: PieceId, at: Coord) {
        let idx = self.index(at);
        self.tiles[idx].occupant = Some(piece);
    }

    /// Empties `at`.
    pub fn clear(&mut self, at: Coord) {
        let idx = self.index(at);
        self.tiles[idx].occupant = None;
    }

    /// Drops all occupancy and treasure without touching the pieces themselves.
    pub fn reset(&mut self) {
        self.tiles.fill(Tile::default());
    }

    /// Steps `distance` tiles from `from` along `dir`, or `None` off the edge.
    pub fn step(&self, from: Coord, dir: Direction, distance: u8) -> Option<Coord> {
        let (dr, dc) = dir.delta();
        self.offset(from, dr as i32 * distance as i32, dc as i32 * distance as i32)
    }

    /// Applies a raw offset to `from`, or `None` off the edge.
    pub fn offset(&self, from: Coord, d_row: i32, d_col: i32) -> Option<Coord> {
        let row = from.row as i32 + d_row;
        let col = from.col as i32 + d_col;
        if self.is_in_bounds(row, col) {
            Some(Coord::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// The four corner tiles.
    pub fn corners(&self) -> [Coord; 4] {
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;
        [
            Coord::new(0, 0),
            Coord::new(0, last_col),
            Coord::new(last_row, 0),
            Coord::new(last_row, last_col),
        ]
    }

    pub fn is_corner(&self, at: Coord) -> bool {
        self.corners().contains(&at)
    }

    pub fn center(&self) -> Coord {
        Coord::new(self.rows / 2, self.cols / 2)
    }

    /// Adds gold to the tile at `at`.
    pub fn drop_gold(&mut self, at: Coord, amount: u32) {
        let idx = self.index(at);
        self.tiles[idx].gold += amount;
    }

    /// Removes and returns all gold on `at`.
    pub fn take_gold(&mut self, at: Coord) -> u32 {
        let idx = self.index(at);
        std::mem::take(&mut self.tiles[idx].gold)
    }

    /// Iterates every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| Coord::new(r, c)))
    }

    /// Iterates occupied tiles as `(coord, piece)` in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, PieceId)> + '_ {
        self.coords()
            .filter_map(move |c| self.occupant(c).map(|p| (c, p)))
    }
}

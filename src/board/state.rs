//! Game state representation.
//!
//! Holds the board grid together with the ordered list of sides and their
//! pieces. Every mutation that moves or removes a piece goes through here so
//! the grid and the piece lists stay a bijection.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::grid::Board;
use super::piece::{Archetype, Piece, PieceId};
use super::side::{Side, SideId, Species};

/// Complete board state at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    pub board: Board,
    pub sides: Vec<Side>,
    next_piece_id: u32,
}

impl BoardState {
    /// Creates an empty state with no sides.
    pub fn empty(rows: u8, cols: u8) -> Self {
        BoardState {
            board: Board::new(rows, cols),
            sides: Vec::new(),
            next_piece_id: 1,
        }
    }

    /// Appends a side and returns its id.
    pub fn add_side(&mut self, name: &str, species: Species, is_player_controlled: bool) -> SideId {
        let id = SideId(self.sides.len() as u8);
        self.sides.push(Side::new(id, name, species, is_player_controlled));
        id
    }

    /// Marks two sides as each other's opposition.
    pub fn set_opposed(&mut self, a: SideId, b: SideId) {
        if !self.side(a).opposes(b) {
            self.side_mut(a).opposition.push(b);
        }
        if !self.side(b).opposes(a) {
            self.side_mut(b).opposition.push(a);
        }
    }

    pub fn side(&self, id: SideId) -> &Side {
        &self.sides[id.0 as usize]
    }

    pub fn side_mut(&mut self, id: SideId) -> &mut Side {
        &mut self.sides[id.0 as usize]
    }

    /// Creates a piece and places it. Returns `None` if the tile is taken.
    pub fn spawn(&mut self, side: SideId, archetype: Archetype, pos: Coord, level: u8) -> Option<PieceId> {
        if !self.board.is_empty(pos) {
            return None;
        }
        let id = PieceId(self.next_piece_id);
        self.next_piece_id += 1;
        self.side_mut(side)
            .pieces
            .push(Piece::new(id, side, archetype, pos, level));
        self.board.place(id, pos);
        Some(id)
    }

    /// Looks up a live piece by id.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.sides
            .iter()
            .flat_map(|s| s.pieces.iter())
            .find(|p| p.id == id)
    }

    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.sides
            .iter_mut()
            .flat_map(|s| s.pieces.iter_mut())
            .find(|p| p.id == id)
    }

    /// The piece standing on `at`, if any.
    pub fn piece_at(&self, at: Coord) -> Option<&Piece> {
        self.board.occupant(at).and_then(|id| self.piece(id))
    }

    /// Iterates every live piece, side by side in storage order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.sides.iter().flat_map(|s| s.pieces.iter())
    }

    pub fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> {
        self.sides.iter_mut().flat_map(|s| s.pieces.iter_mut())
    }

    /// Relocates a piece on the grid and updates its stored position.
    ///
    /// Legality is the caller's concern.
    pub fn relocate(&mut self, id: PieceId, to: Coord) -> bool {
        let Some(from) = self.piece(id).map(|p| p.pos) else {
            return false;
        };
        self.board.clear(from);
        self.board.place(id, to);
        if let Some(p) = self.piece_mut(id) {
            p.pos = to;
        }
        true
    }

    /// Removes a piece from its side and from the grid.
    pub fn remove_piece(&mut self, id: PieceId) -> Option<Piece> {
        for side in &mut self.sides {
            if let Some(idx) = side.pieces.iter().position(|p| p.id == id) {
                let piece = side.pieces.remove(idx);
                if self.board.occupant(piece.pos) == Some(id) {
                    self.board.clear(piece.pos);
                }
                return Some(piece);
            }
        }
        None
    }

    /// True when `a` counts `b` as opposition.
    pub fn opposes(&self, a: SideId, b: SideId) -> bool {
        self.side(a).opposes(b)
    }

    /// True when `a` is `b` or counts it as a friendly.
    pub fn allied(&self, a: SideId, b: SideId) -> bool {
        self.side(a).is_allied_with(b)
    }

    /// Total live pieces across the opposition of `side`.
    pub fn opposition_piece_count(&self, side: SideId) -> usize {
        self.side(side)
            .opposition
            .iter()
            .map(|o| self.side(*o).pieces.len())
            .sum()
    }

    /// Checks that live pieces and occupied tiles correspond one to one.
    pub fn is_consistent(&self) -> bool {
        let live = self.pieces().count();
        let occupied = self.board.occupied().count();
        if live != occupied {
            return false;
        }
        self.pieces()
            .all(|p| self.board.occupant(p.pos) == Some(p.id))
            && self
                .board
                .occupied()
                .all(|(c, id)| self.piece(id).map(|p| p.pos) == Some(c))
    }
}

//! Board representation and game-state types.
//!
//! Contains the grid, pieces with their level tables, sides with their
//! objectives, and the aggregate state the engine mutates.

pub mod coord;
pub mod grid;
pub mod piece;
pub mod setup;
pub mod side;
pub mod state;

pub use coord::{Coord, Direction, ALL_DIRECTIONS, DIAGONAL_DELTAS};
pub use grid::{Board, Tile};
pub use piece::{
    Ability, AbilityTrigger, Archetype, Capabilities, LevelStats, MovePattern, Piece, PieceId,
};
pub use setup::{ATTACKERS, DEFENDERS};
pub use side::{Objective, ObjectiveKind, Side, SideId, Species};
pub use state::BoardState;

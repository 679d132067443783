//! Search and planning.
//!
//! Chooses moves for sides the player does not control.

pub mod planner;

pub use planner::{score_candidates, select_move, PlannedMove};

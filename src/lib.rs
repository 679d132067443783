//! Kingsguard engine library.
//!
//! Exposes the board model, move generation, capture and objective
//! resolution, the AI planner, and the turn controller for use by the
//! binaries, integration tests, and benches.

pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod search;
pub mod selfplay;

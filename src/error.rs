//! Error types surfaced to hosts.

use thiserror::Error;

use crate::board::PieceId;

/// Rejection reasons for a submitted move. A rejected move mutates nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no live piece with id {0}")]
    UnknownPiece(PieceId),

    #[error("not the player's turn")]
    NotYourTurn,

    #[error("piece {0} does not belong to the active side")]
    NotYourPiece(PieceId),

    #[error("piece {piece} cannot move to {row},{col}")]
    IllegalMove { piece: PieceId, row: u8, col: u8 },
}

/// Errors from campaign continuation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampaignError {
    #[error("the current game has not finished")]
    NotFinished,

    #[error("the player side did not win the last game")]
    NoVictor,
}

/// Errors from loading or adjusting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

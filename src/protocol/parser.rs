//! Line command parser.
//!
//! Parses host commands from raw text into structured `Command` variants
//! that the binary's main loop dispatches on.

use tracing::warn;

use crate::board::PieceId;

/// A parsed host-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; the engine replies `readyok`.
    IsReady,

    /// Set a config option: `setoption name <key> value <x>`.
    SetOption { name: String, value: String },

    /// Discard the session and start over.
    NewGame,

    /// Print the board.
    Show,

    /// List legal destinations for a piece.
    Moves { piece: PieceId },

    /// Submit a player move and run until the engine is idle again.
    Move { piece: PieceId, row: u8, col: u8 },

    /// Advance the state machine `n` ticks (default 1).
    Tick { count: u32 },

    /// Run until the player is to move or the game ends.
    Run,

    /// Print the session as JSON.
    Snapshot,

    /// Continue the campaign after a victory.
    Continue,

    /// Terminate the process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let first = *tokens.first()?;

    match first {
        "isready" => Some(Command::IsReady),
        "newgame" => Some(Command::NewGame),
        "show" => Some(Command::Show),
        "run" => Some(Command::Run),
        "snapshot" => Some(Command::Snapshot),
        "continue" => Some(Command::Continue),
        "quit" => Some(Command::Quit),

        "setoption" => parse_setoption(&tokens),
        "moves" => parse_moves(&tokens),
        "move" => parse_move(&tokens),
        "tick" => parse_tick(&tokens),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `setoption name <key> value <x>`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    let value_idx = tokens.iter().position(|&t| t == "value");
    match (tokens.get(1), value_idx) {
        (Some(&"name"), Some(vi)) if vi > 2 && vi + 1 < tokens.len() => Some(Command::SetOption {
            name: tokens[2..vi].join(" "),
            value: tokens[vi + 1..].join(" "),
        }),
        _ => {
            warn!("malformed setoption: expected 'setoption name <key> value <x>'");
            None
        }
    }
}

fn parse_piece(token: Option<&&str>) -> Option<PieceId> {
    match token.map(|t| t.parse::<u32>()) {
        Some(Ok(id)) => Some(PieceId(id)),
        _ => {
            warn!(token = ?token, "invalid piece id");
            None
        }
    }
}

/// Parses `moves <id>`.
fn parse_moves(tokens: &[&str]) -> Option<Command> {
    let piece = parse_piece(tokens.get(1))?;
    Some(Command::Moves { piece })
}

/// Parses `move <id> <row> <col>`.
fn parse_move(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 4 {
        warn!("malformed move: expected 'move <id> <row> <col>'");
        return None;
    }
    let piece = parse_piece(tokens.get(1))?;
    match (tokens[2].parse::<u8>(), tokens[3].parse::<u8>()) {
        (Ok(row), Ok(col)) => Some(Command::Move { piece, row, col }),
        _ => {
            warn!(row = tokens[2], col = tokens[3], "invalid move destination");
            None
        }
    }
}

/// Parses `tick [n]`.
fn parse_tick(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        None => Some(Command::Tick { count: 1 }),
        Some(n) => match n.parse::<u32>() {
            Ok(count) => Some(Command::Tick { count }),
            Err(_) => {
                warn!(value = *n, "invalid tick count");
                None
            }
        },
    }
}

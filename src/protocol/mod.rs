//! Host protocol.
//!
//! A plain line protocol over stdin/stdout: commands are parsed into
//! `Command` values, and board state and engine events are written back as
//! text lines.

pub mod parser;
pub mod render;

pub use parser::{parse_command, Command};
pub use render::{write_board, write_event, write_moves};

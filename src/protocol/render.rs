//! Text output for the line protocol.

use std::io::{self, Write};

use crate::board::{BoardState, Coord, PieceId};
use crate::engine::EngineEvent;

/// Writes the grid followed by one line per live piece.
///
/// Empty corners print as `+`, empty tiles holding gold as `*`.
pub fn write_board<W: Write>(out: &mut W, state: &BoardState) -> io::Result<()> {
    let board = &state.board;
    write!(out, "  ")?;
    for col in 0..board.cols() {
        write!(out, " {}", col % 10)?;
    }
    writeln!(out)?;

    for row in 0..board.rows() {
        write!(out, "{:>2}", row)?;
        for col in 0..board.cols() {
            let at = Coord::new(row, col);
            let glyph = match state.piece_at(at) {
                Some(p) => p.archetype.glyph(),
                None if board.is_corner(at) => '+',
                None if board.tile_at(at).gold > 0 => '*',
                None => '.',
            };
            write!(out, " {}", glyph)?;
        }
        writeln!(out)?;
    }

    for p in state.pieces() {
        write!(
            out,
            "piece {} {} side {} at {} hp {}/{} level {} xp {}",
            p.id,
            p.archetype.glyph(),
            p.side,
            p.pos,
            p.health,
            p.max_health,
            p.level,
            p.xp
        )?;
        if let Some(name) = &p.name {
            write!(out, " name {}", name)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes `moves <id>` followed by each destination.
pub fn write_moves<W: Write>(out: &mut W, piece: PieceId, moves: &[Coord]) -> io::Result<()> {
    write!(out, "moves {}", piece)?;
    for m in moves {
        write!(out, " {}", m)?;
    }
    writeln!(out)
}

/// Writes one engine event as a single line.
pub fn write_event<W: Write>(out: &mut W, event: &EngineEvent) -> io::Result<()> {
    match event {
        EngineEvent::TurnChanged { side } => writeln!(out, "turn {}", side),
        EngineEvent::Capture(c) => {
            write!(
                out,
                "capture {} {} {} at {} damage {}",
                c.attacker, c.flanker, c.target, c.target_pos, c.damage
            )?;
            if c.killed {
                write!(out, " killed")?;
            }
            writeln!(out)
        }
        EngineEvent::LevelUp { piece, level } => writeln!(out, "levelup {} {}", piece, level),
        EngineEvent::GoldCollected { side, piece, amount } => {
            writeln!(out, "gold {} {} {}", side, piece, amount)
        }
        EngineEvent::ObjectiveAchieved { message, winner } => {
            writeln!(out, "objective {} {}", winner, message)
        }
    }
}

//! Integration tests for the kingsguard binary.
//!
//! Spawns the engine process, sends line commands via stdin, and checks
//! the stdout responses.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Sends a sequence of commands to the engine and collects stdout lines.
fn run_engine(commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_kingsguard");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start kingsguard");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

/// Deterministic 9x9 game with the engine idling for the first player move.
const SEEDED: [&str; 3] = ["setoption name seed value 5", "newgame", "run"];

fn seeded_then(commands: &[&str]) -> Vec<String> {
    let mut all: Vec<&str> = SEEDED.to_vec();
    all.extend_from_slice(commands);
    all.push("quit");
    run_engine(&all)
}

#[test]
fn isready_response() {
    let lines = run_engine(&["isready", "quit"]);
    assert_eq!(lines[0], "readyok");
}

#[test]
fn first_command_reports_opening_turn() {
    let lines = run_engine(&["isready", "quit"]);
    assert!(lines.contains(&"turn 0".to_string()));
}

#[test]
fn unknown_commands_are_ignored() {
    let lines = run_engine(&["castle kingside", "", "move nonsense", "isready", "quit"]);
    assert_eq!(lines[0], "readyok");
}

#[test]
fn show_prints_starting_formation() {
    let lines = seeded_then(&["show"]);
    let grid: Vec<&String> = lines.iter().filter(|l| l.starts_with(' ')).collect();
    // Header plus nine rows.
    assert_eq!(grid.len(), 10);
    assert_eq!(grid[1].as_str(), " 0 + . . a a a . . +");
    assert_eq!(grid[5].as_str(), " 4 a . . D K D . . a");
    let pieces = lines.iter().filter(|l| l.starts_with("piece ")).count();
    assert_eq!(pieces, 17);
}

#[test]
fn moves_lists_slider_destinations() {
    let lines = seeded_then(&["moves 2"]);
    let moves = lines.iter().find(|l| l.starts_with("moves 2")).unwrap();
    assert!(moves.contains(" 2,4"));
    assert!(moves.contains(" 1,4"));
    assert!(!moves.contains(" 0,4"));
}

#[test]
fn move_before_player_turn_is_rejected() {
    let lines = run_engine(&["move 2 2 4", "quit"]);
    assert!(lines.contains(&"error not the player's turn".to_string()));
}

#[test]
fn illegal_move_is_rejected() {
    let lines = seeded_then(&["move 1 0 0", "move 99 1 1", "move 10 1 1"]);
    assert!(lines.contains(&"error piece 1 cannot move to 0,0".to_string()));
    assert!(lines.contains(&"error no live piece with id 99".to_string()));
    assert!(lines.contains(&"error piece 10 does not belong to the active side".to_string()));
}

#[test]
fn legal_move_runs_the_ai_turn() {
    let lines = seeded_then(&["move 2 2 4"]);
    let turn_one = lines.iter().position(|l| l == "turn 1").unwrap();
    let back = lines.iter().rposition(|l| l == "turn 0").unwrap();
    assert!(turn_one < back);
}

#[test]
fn snapshot_is_json() {
    let lines = seeded_then(&["snapshot"]);
    let json = lines.iter().find(|l| l.starts_with('{')).unwrap();
    let v: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(v["active_side"], 0);
    assert_eq!(v["round"], 1);
    assert_eq!(v["phase"], "GetMove");
    assert_eq!(v["state"]["sides"].as_array().unwrap().len(), 2);
}

#[test]
fn bad_option_is_reported() {
    let lines = run_engine(&["setoption name rows value 3", "setoption name colour value red", "quit"]);
    let errors: Vec<&String> = lines.iter().filter(|l| l.starts_with("error ")).collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("rows must be between 5 and 25"));
    assert!(errors[1].contains("unknown option 'colour'"));
}

#[test]
fn continue_requires_finished_game() {
    let lines = run_engine(&["continue", "quit"]);
    assert!(lines.contains(&"error the current game has not finished".to_string()));
}

#[test]
fn board_size_option_applies_on_new_game() {
    let lines = run_engine(&["setoption name rows value 7", "setoption name cols value 7", "newgame", "show", "quit"]);
    let grid: Vec<&String> = lines.iter().filter(|l| l.starts_with(' ')).collect();
    assert_eq!(grid.len(), 8);
    assert_eq!(grid[0].as_str(), "   0 1 2 3 4 5 6");
}

#[test]
fn tick_counts_down_the_opening_delay() {
    let lines = run_engine(&["tick 1", "snapshot", "quit"]);
    let json = lines.iter().find(|l| l.starts_with('{')).unwrap();
    let v: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(v["phase"]["Delay"]["remaining"], 1);
    assert_eq!(v["phase"]["Delay"]["next"], "PassiveMoves");
}

//! Human-typeable move notation and board rendering.
//!
//! Coordinates use base-36 digits (`0`-`9` then `A`-`Z`), so a move is
//! two characters and a game fits on one comma-separated line.

use crate::error::GameError;
use crate::game::Game;

/// Decode one coordinate digit. `None` for anything outside `0`-`9`,
/// `A`-`Z`.
pub fn char_to_coordinate(digit: char) -> Option<i32> {
    match digit {
        '0'..='9' => Some(digit as i32 - '0' as i32),
        'A'..='Z' => Some(digit as i32 - 'A' as i32 + 10),
        _ => None,
    }
}

/// Encode a coordinate in 0..36 as one digit. `?` when out of range.
pub fn coordinate_to_char(coordinate: i32) -> char {
    match coordinate {
        0..=9 => (b'0' + coordinate as u8) as char,
        10..=35 => (b'A' + (coordinate - 10) as u8) as char,
        _ => '?',
    }
}

/// Parse a two-digit move like `"9A"` into (row, col).
pub fn parse_move(text: &str) -> Option<(i32, i32)> {
    let mut chars = text.trim().chars();
    let row = char_to_coordinate(chars.next()?)?;
    let col = char_to_coordinate(chars.next()?)?;
    if chars.next().is_some() {
        return None;
    }
    Some((row, col))
}

/// Format (row, col) as a two-digit move.
pub fn format_move(row: i32, col: i32) -> String {
    let mut text = String::with_capacity(2);
    text.push(coordinate_to_char(row));
    text.push(coordinate_to_char(col));
    text
}

/// Replay a comma-separated move script like `"99,8A,9A"` onto a game.
/// Unparsable entries surface as [`GameError::InvalidCoordinates`];
/// the game keeps every move applied before the failure.
pub fn apply_moves(game: &mut Game, script: &str) -> Result<(), GameError> {
    for entry in script.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (row, col) = parse_move(entry).ok_or(GameError::InvalidCoordinates {
            row: -1,
            col: -1,
        })?;
        game.make_move(row, col)?;
    }
    Ok(())
}

/// Render the board with coordinate headers.
pub fn render_board(game: &Game) -> String {
    let board = game.board();
    let mut out = String::new();

    out.push(' ');
    for col in 0..board.width() {
        out.push(' ');
        out.push(coordinate_to_char(col));
    }
    out.push('\n');

    for row in 0..board.height() {
        out.push(coordinate_to_char(row));
        out.push(' ');
        for col in 0..board.width() {
            out.push(board.get(row, col).symbol());
            if col < board.width() - 1 {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out
}

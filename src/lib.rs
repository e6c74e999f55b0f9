//! Gomoku engine with pair captures (Ninuki-renju style)
//!
//! Implements the capture variant of Gomoku:
//! - 5-in-a-row to win, unless the row can still be broken by a capture
//! - Pair capture rule: X-O-O-X brackets remove the O-O pair, 2 points each
//! - Capture win at 10 points (5 pairs)
//! - A move may not create two open threes at once, unless it captures
//!
//! # Architecture
//!
//! - [`board`]: tri-state board with relevancy and played-bounds tracking
//! - [`pattern`]: incremental per-direction structure recognition
//! - [`game`]: move application, captures, win detection, exact undo/redo
//! - [`search`]: alpha-beta minimax advisor with iterative deepening
//! - [`room`]: rule-variant layer (standard, pro, long pro, swap styles)
//! - [`notation`]: base-36 move notation and board rendering
//!
//! # Quick Start
//!
//! ```
//! use ninuki::{Ai, AiSettings, Game};
//!
//! let mut game = Game::new(19, 19);
//! game.make_move(9, 9).unwrap();
//!
//! let mut ai = Ai::new(AiSettings { depth: 2, ..AiSettings::default() });
//! if let Some(pos) = ai.suggest_move(&game) {
//!     game.make_move(pos.row as i32, pos.col as i32).unwrap();
//! }
//! ```
//!
//! The recognizer keeps, per player and per direction, a matrix where
//! each cell's record is a pure function of its predecessor's record
//! and the cell state. A move therefore only recomputes four rays until
//! they stop changing, which is what makes the search's make/undo loop
//! cheap enough to explore thousands of positions.

pub mod board;
pub mod error;
pub mod game;
pub mod notation;
pub mod pattern;
pub mod room;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, CellChange, Pos, Stone};
pub use error::GameError;
pub use game::{Game, MoveResult};
pub use pattern::{Recognizer, StructureType};
pub use room::{Room, RoomSettings, RuleStyle, Seat};
pub use search::{Ai, AiSettings, AiWeights, MoveEvaluation};

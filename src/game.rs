//! Game engine: move application, pair captures, win detection, and
//! exact move reversal for search.

use crate::board::{Board, CellChange, Pos, Stone};
use crate::error::GameError;
use crate::pattern::{Recognizer, StructureType};

/// Capture score that ends the game.
pub const CAPTURE_WIN_SCORE: i32 = 10;

/// The eight half-directions probed for a `Self-Opp-Opp-Self` bracket
/// around a freshly placed stone.
const CAPTURE_DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Everything a move did, sufficient to reverse or reapply it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveResult {
    pub cell_changes: Vec<CellChange>,
    pub black_score_change: i32,
    pub white_score_change: i32,
    pub previous_bounds: Option<(Pos, Pos)>,
}

/// A Gomoku game with pair captures: board, both players' recognizers,
/// scores and terminal state.
///
/// Cloning takes a full snapshot; the search works on clones and walks
/// them with [`Game::make_move`] / [`Game::reverse_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    current_player: Stone,
    black_score: i32,
    white_score: i32,
    game_over: bool,
    winner: Option<Stone>,
    black_patterns: Recognizer,
    white_patterns: Recognizer,
    capture_enabled: bool,
}

impl Game {
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_options(width, height, true)
    }

    pub fn with_options(width: i32, height: i32, capture_enabled: bool) -> Self {
        let board = Board::new(width, height);
        let mut black_patterns = Recognizer::new(Stone::Black);
        let mut white_patterns = Recognizer::new(Stone::White);
        black_patterns.rebuild(&board);
        white_patterns.rebuild(&board);

        Self {
            board,
            current_player: Stone::Black,
            black_score: 0,
            white_score: 0,
            game_over: false,
            winner: None,
            black_patterns,
            white_patterns,
            capture_enabled,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn current_player(&self) -> Stone {
        self.current_player
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// `None` while in progress and on a draw.
    #[inline]
    pub fn winner(&self) -> Option<Stone> {
        self.winner
    }

    #[inline]
    pub fn score(&self, player: Stone) -> i32 {
        match player {
            Stone::Black => self.black_score,
            Stone::White => self.white_score,
            Stone::Empty => unreachable!("empty is not a player"),
        }
    }

    #[inline]
    pub fn patterns(&self, player: Stone) -> &Recognizer {
        match player {
            Stone::Black => &self.black_patterns,
            Stone::White => &self.white_patterns,
            Stone::Empty => unreachable!("empty is not a player"),
        }
    }

    fn add_score(&mut self, player: Stone, delta: i32) {
        match player {
            Stone::Black => self.black_score += delta,
            Stone::White => self.white_score += delta,
            Stone::Empty => unreachable!("empty is not a player"),
        }
    }

    /// Play a stone for the player whose turn it is.
    pub fn make_move(&mut self, row: i32, col: i32) -> Result<MoveResult, GameError> {
        if self.game_over {
            return Err(GameError::GameAlreadyOver);
        }
        if !self.board.in_bounds(row, col) {
            return Err(GameError::InvalidCoordinates { row, col });
        }
        if self.board.get(row, col) != Stone::Empty {
            return Err(GameError::CellOccupied { row, col });
        }

        let player = self.current_player;
        let old_black_score = self.black_score;
        let old_white_score = self.white_score;
        let old_open_threes = self.patterns(player).count(StructureType::OpenThree);

        let mut result = MoveResult {
            previous_bounds: self.board.raw_played_bounds(),
            ..MoveResult::default()
        };

        let change = self.board.set(row, col, player);
        result.cell_changes.push(change);

        let captured = self.capture_enabled && self.capture(row, col, player, &mut result);

        result.black_score_change = self.black_score - old_black_score;
        result.white_score_change = self.white_score - old_white_score;

        self.black_patterns.apply_move(&self.board, &result.cell_changes);
        self.white_patterns.apply_move(&self.board, &result.cell_changes);

        // A capture exempts the move from the double-open-three rule.
        if !captured {
            let new_open_threes = self.patterns(player).count(StructureType::OpenThree);
            if new_open_threes - old_open_threes > 1 {
                self.reverse_move(&result);
                self.current_player = player;
                return Err(GameError::IllegalDoubleOpenThree);
            }
        }

        self.check_win(player);

        self.current_player = player.opponent();
        self.board.record_played(Pos::new(row as u8, col as u8));

        Ok(result)
    }

    /// Undo a move by replaying its cell deltas backwards. Exact
    /// inverse of [`Game::make_move`] / [`Game::reapply_move`].
    pub fn reverse_move(&mut self, result: &MoveResult) {
        self.black_score -= result.black_score_change;
        self.white_score -= result.white_score_change;
        self.current_player = self.current_player.opponent();

        for change in &result.cell_changes {
            self.board
                .set(change.row as i32, change.col as i32, change.old_value);
        }

        self.black_patterns.apply_move(&self.board, &result.cell_changes);
        self.white_patterns.apply_move(&self.board, &result.cell_changes);

        self.game_over = false;
        self.winner = None;
        self.board.restore_played_bounds(result.previous_bounds);
    }

    /// Redo a previously reversed move from its recorded deltas.
    pub fn reapply_move(&mut self, result: &MoveResult) {
        self.black_score += result.black_score_change;
        self.white_score += result.white_score_change;

        for change in &result.cell_changes {
            self.board
                .set(change.row as i32, change.col as i32, change.new_value);
        }

        self.black_patterns.apply_move(&self.board, &result.cell_changes);
        self.white_patterns.apply_move(&self.board, &result.cell_changes);

        self.check_win(self.current_player);
        self.current_player = self.current_player.opponent();

        if let Some(first) = result.cell_changes.first() {
            self.board.record_played(Pos::new(first.row, first.col));
        }
    }

    fn capture(&mut self, row: i32, col: i32, player: Stone, result: &mut MoveResult) -> bool {
        let opponent = player.opponent();
        let mut captured = false;

        for (dr, dc) in CAPTURE_DIRECTIONS {
            if !self.board.in_bounds(row + 3 * dr, col + 3 * dc) {
                continue;
            }
            if self.board.get(row + dr, col + dc) == opponent
                && self.board.get(row + 2 * dr, col + 2 * dc) == opponent
                && self.board.get(row + 3 * dr, col + 3 * dc) == player
            {
                result
                    .cell_changes
                    .push(self.board.set(row + dr, col + dc, Stone::Empty));
                result
                    .cell_changes
                    .push(self.board.set(row + 2 * dr, col + 2 * dc, Stone::Empty));
                self.add_score(player, 2);
                captured = true;
            }
        }
        captured
    }

    fn check_win(&mut self, player: Stone) {
        if self.score(player) >= CAPTURE_WIN_SCORE {
            self.game_over = true;
            self.winner = Some(player);
            return;
        }

        if self.patterns(player).count(StructureType::FiveOrMore) > 0 {
            let unbreakable = !self.capture_enabled || {
                let recognizer = match player {
                    Stone::White => &mut self.white_patterns,
                    _ => &mut self.black_patterns,
                };
                recognizer.five_or_more_cant_be_captured(&self.board)
            };
            if unbreakable {
                self.game_over = true;
                self.winner = Some(player);
                return;
            }
        }

        // Pre-emptive loss: the opponent only needs one more capture
        // and the mover still hands one over.
        if self.score(player.opponent()) == CAPTURE_WIN_SCORE - 2 {
            let recognizer = match player {
                Stone::White => &mut self.white_patterns,
                _ => &mut self.black_patterns,
            };
            if recognizer.can_be_captured(&self.board) {
                self.game_over = true;
                self.winner = Some(player.opponent());
                return;
            }
        }

        if self.board.empty_cells() == 0 {
            self.game_over = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut Game, moves: &[(i32, i32)]) {
        for &(row, col) in moves {
            game.make_move(row, col).unwrap();
        }
    }

    #[test]
    #[should_panic(expected = "empty is not a player")]
    fn test_score_rejects_empty() {
        let game = Game::new(19, 19);
        let _ = game.score(Stone::Empty);
    }

    #[test]
    fn test_rejects_invalid_coordinates() {
        let mut game = Game::new(19, 19);
        assert_eq!(
            game.make_move(-1, 5),
            Err(GameError::InvalidCoordinates { row: -1, col: 5 })
        );
        assert_eq!(
            game.make_move(5, 19),
            Err(GameError::InvalidCoordinates { row: 5, col: 19 })
        );
    }

    #[test]
    fn test_rejects_occupied_cell() {
        let mut game = Game::new(19, 19);
        game.make_move(9, 9).unwrap();
        assert_eq!(
            game.make_move(9, 9),
            Err(GameError::CellOccupied { row: 9, col: 9 })
        );
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = Game::new(19, 19);
        assert_eq!(game.current_player(), Stone::Black);
        game.make_move(9, 9).unwrap();
        assert_eq!(game.current_player(), Stone::White);
        assert_eq!(game.board().get(9, 9), Stone::Black);
    }

    #[test]
    fn test_pair_capture() {
        let mut game = Game::new(19, 19);
        // Black brackets the white pair at (9,6), (9,7).
        play(&mut game, &[(9, 5), (9, 6), (13, 13), (9, 7)]);
        let result = game.make_move(9, 8).unwrap();

        assert_eq!(game.board().get(9, 6), Stone::Empty);
        assert_eq!(game.board().get(9, 7), Stone::Empty);
        assert_eq!(game.score(Stone::Black), 2);
        assert_eq!(result.black_score_change, 2);
        assert_eq!(result.cell_changes.len(), 3);
    }

    #[test]
    fn test_single_opponent_stone_is_not_captured() {
        let mut game = Game::new(19, 19);
        // Black closes on a lone white stone: X O X is not a bracket.
        play(&mut game, &[(9, 5), (9, 6), (13, 13), (5, 5)]);
        let result = game.make_move(9, 7).unwrap();

        assert_eq!(game.board().get(9, 6), Stone::White);
        assert_eq!(game.score(Stone::Black), 0);
        assert_eq!(result.cell_changes.len(), 1);
    }

    #[test]
    fn test_gapped_bracket_is_not_a_capture() {
        let mut game = Game::new(19, 19);
        // X O _ X: the hole at (9, 7) breaks the pair.
        play(&mut game, &[(9, 5), (9, 6), (13, 13), (5, 5)]);
        let result = game.make_move(9, 8).unwrap();

        assert_eq!(game.board().get(9, 6), Stone::White);
        assert_eq!(game.board().get(9, 7), Stone::Empty);
        assert_eq!(game.score(Stone::Black), 0);
        assert_eq!(result.black_score_change, 0);
        assert_eq!(result.cell_changes.len(), 1);
    }

    #[test]
    fn test_capture_disabled() {
        let mut game = Game::with_options(19, 19, false);
        play(&mut game, &[(9, 5), (9, 6), (13, 13), (9, 7), (9, 8)]);
        assert_eq!(game.board().get(9, 6), Stone::White);
        assert_eq!(game.score(Stone::Black), 0);
    }

    #[test]
    fn test_double_open_three_rejected_exactly() {
        let mut game = Game::new(19, 19);
        // Black builds an open pair horizontally and one vertically,
        // both meeting at (9, 9).
        play(
            &mut game,
            &[(9, 7), (0, 0), (9, 8), (0, 1), (10, 9), (0, 2), (11, 9), (0, 3)],
        );

        let snapshot = game.clone();
        assert_eq!(game.make_move(9, 9), Err(GameError::IllegalDoubleOpenThree));
        assert_eq!(game, snapshot);
        assert_eq!(game.current_player(), Stone::Black);
    }

    #[test]
    fn test_capture_overrides_double_three() {
        let mut game = Game::new(19, 19);
        // Same double-three shape, but (9, 9) also captures the white
        // pair at (8, 9), (7, 9), which makes the move legal.
        play(
            &mut game,
            &[
                (9, 7),
                (8, 9),
                (9, 8),
                (7, 9),
                (10, 9),
                (0, 0),
                (11, 9),
                (0, 1),
                (6, 9),
                (0, 2),
            ],
        );
        assert!(game.make_move(9, 9).is_ok());
        assert_eq!(game.score(Stone::Black), 2);
        assert_eq!(game.board().get(8, 9), Stone::Empty);
    }

    #[test]
    fn test_undo_restores_exact_state() {
        let mut game = Game::new(19, 19);
        play(&mut game, &[(9, 5), (9, 6), (13, 13), (9, 7)]);

        let snapshot = game.clone();
        let result = game.make_move(9, 8).unwrap();
        assert_ne!(game, snapshot);

        game.reverse_move(&result);
        assert_eq!(game, snapshot);
    }

    #[test]
    fn test_redo_restores_exact_state() {
        let mut game = Game::new(19, 19);
        play(&mut game, &[(9, 5), (9, 6), (13, 13), (9, 7)]);

        let result = game.make_move(9, 8).unwrap();
        let after = game.clone();

        game.reverse_move(&result);
        game.reapply_move(&result);
        assert_eq!(game, after);
    }

    #[test]
    fn test_five_in_a_row_wins() {
        let mut game = Game::new(19, 19);
        play(
            &mut game,
            &[(9, 5), (0, 0), (9, 6), (0, 2), (9, 7), (0, 4), (9, 8), (0, 6)],
        );
        game.make_move(9, 9).unwrap();

        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Stone::Black));
        assert_eq!(game.make_move(5, 5), Err(GameError::GameAlreadyOver));
    }

    #[test]
    fn test_capturable_five_does_not_win() {
        let mut game = Game::new(19, 19);
        // Black completes a five, but its stone at (9, 7) sits in a
        // vertical pair white can capture.
        play(
            &mut game,
            &[
                (8, 7),
                (7, 7),
                (9, 5),
                (0, 0),
                (9, 6),
                (0, 2),
                (9, 7),
                (0, 4),
                (9, 8),
                (0, 6),
            ],
        );
        game.make_move(9, 9).unwrap();
        assert!(!game.is_over());
    }

    #[test]
    fn test_capture_score_win() {
        let mut game = Game::new(19, 19);
        play(&mut game, &[(9, 5), (9, 6), (13, 13), (9, 7)]);
        // Stand in for four earlier pair captures, then land the fifth.
        game.add_score(Stone::Black, 8);
        game.make_move(9, 8).unwrap();

        assert_eq!(game.score(Stone::Black), 10);
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Stone::Black));
    }

    #[test]
    fn test_preemptive_loss_at_eight_points() {
        let mut game = Game::new(19, 19);
        game.add_score(Stone::White, 8);
        // Black owns a capturable pair and plays elsewhere: white wins
        // because the closing capture cannot be prevented.
        play(&mut game, &[(9, 8), (9, 10), (9, 9)]);

        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Stone::White));
    }

    #[test]
    fn test_full_board_is_a_draw() {
        let mut game = Game::new(3, 3);
        play(
            &mut game,
            &[
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 1),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2),
            ],
        );
        assert!(game.is_over());
        assert_eq!(game.winner(), None);
    }
}

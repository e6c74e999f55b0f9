//! Alpha-beta minimax over game snapshots, with killer-move ordering
//! and iterative deepening.

use std::time::{Duration, Instant};

use log::debug;

use crate::board::{Pos, Stone};
use crate::game::Game;
use crate::pattern::{StructureType, STRUCTURE_TYPE_COUNT};

use super::weights::AiWeights;

/// Sentinel for a forced win; one off the integer limits so the value
/// can be negated without overflow.
pub const WIN_SCORE: i32 = i32::MAX - 1;
pub const LOSS_SCORE: i32 = i32::MIN + 1;

const NO_KILLER: (i32, i32) = (-1, -1);

#[derive(Debug, Clone, PartialEq)]
pub struct AiSettings {
    /// Search depth in plies.
    pub depth: usize,
    /// Margin around the played bounding box considered for candidates.
    pub length: i32,
    pub weights: AiWeights,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            depth: 4,
            length: 2,
            weights: AiWeights::default(),
        }
    }
}

/// Candidate move with its shallow ordering score.
#[derive(Debug, Clone, Copy)]
struct MoveHeuristic {
    row: u8,
    col: u8,
    score: i32,
}

/// One node of the evaluation tree returned by
/// [`Ai::suggest_move_evaluation`]. The root's coordinates are unused.
#[derive(Debug, Clone, Default)]
pub struct MoveEvaluation {
    pub row: u8,
    pub col: u8,
    pub score: i32,
    pub best_move_id: usize,
    pub list_moves: Vec<MoveEvaluation>,
}

impl MoveEvaluation {
    /// Position of the best child, if any move was evaluated.
    pub fn best_move(&self) -> Option<Pos> {
        self.list_moves
            .get(self.best_move_id)
            .map(|node| Pos::new(node.row, node.col))
    }
}

/// Counters from the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub depth_reached: usize,
    pub elapsed: Duration,
}

/// The search advisor. Owns its own [`Game`] snapshot so exploring
/// moves never touches the caller's game.
#[derive(Debug, Clone)]
pub struct Ai {
    game: Game,
    ai_player: Stone,
    human_player: Stone,
    settings: AiSettings,
    /// Best move per ply, indexed by distance from the root.
    killer_moves: Vec<(i32, i32)>,
    root_depth: usize,
    stats: SearchStats,
}

impl Ai {
    pub fn new(settings: AiSettings) -> Self {
        Self {
            game: Game::new(0, 0),
            ai_player: Stone::Black,
            human_player: Stone::White,
            killer_moves: vec![NO_KILLER; settings.depth],
            root_depth: settings.depth,
            settings,
            stats: SearchStats::default(),
        }
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Best move at the configured depth.
    pub fn suggest_move(&mut self, game: &Game) -> Option<Pos> {
        self.suggest_move_evaluation(game).best_move()
    }

    /// Full evaluation tree at the configured depth.
    pub fn suggest_move_evaluation(&mut self, game: &Game) -> MoveEvaluation {
        self.attach(game);
        self.killer_moves = vec![NO_KILLER; self.settings.depth];
        self.stats = SearchStats::default();

        let start = Instant::now();
        let result = self.search_root(self.settings.depth);
        self.stats.depth_reached = self.settings.depth;
        self.stats.elapsed = start.elapsed();
        debug!(
            "searched {} nodes at depth {} in {:?}",
            self.stats.nodes, self.settings.depth, self.stats.elapsed
        );
        result
    }

    /// Iterative deepening under a wall-clock budget: rounds of depth
    /// 1, 2, ... run to completion; the loop stops between rounds once
    /// the budget is spent or a round proves a forced result. The
    /// configured depth does not cap the rounds, only the budget does.
    pub fn suggest_move_timed(&mut self, game: &Game, budget: Duration) -> Option<Pos> {
        self.attach(game);
        self.killer_moves.clear();
        self.stats = SearchStats::default();

        let start = Instant::now();
        let mut best = None;
        let mut round = 1;

        loop {
            let result = self.search_root(round);
            if let Some(pos) = result.best_move() {
                best = Some(pos);
            }
            self.stats.depth_reached = round;
            debug!(
                "depth {} complete: score {}, {} nodes, {:?} elapsed",
                round,
                result.score,
                self.stats.nodes,
                start.elapsed()
            );
            if result.score >= WIN_SCORE || result.score <= LOSS_SCORE {
                break;
            }
            if start.elapsed() >= budget {
                break;
            }
            round += 1;
        }

        self.stats.elapsed = start.elapsed();
        best
    }

    /// Weighted score differential seen from `player`.
    pub fn heuristic_evaluation(&mut self, game: &Game, player: Stone) -> i32 {
        self.game = game.clone();
        self.ai_player = player;
        self.human_player = player.opponent();
        evaluate_game(&self.game, &self.settings.weights, self.ai_player)
    }

    fn attach(&mut self, game: &Game) {
        self.game = game.clone();
        self.ai_player = game.current_player();
        self.human_player = self.ai_player.opponent();
    }

    fn search_root(&mut self, depth: usize) -> MoveEvaluation {
        self.root_depth = depth;
        if self.killer_moves.len() < depth {
            self.killer_moves.resize(depth, NO_KILLER);
        }

        let mut result = MoveEvaluation::default();
        if self.game.board().raw_played_bounds().is_some() {
            self.minimax(&mut result, depth, i32::MIN, i32::MAX, true);
        } else {
            // Empty board: open in the center.
            result.list_moves.push(MoveEvaluation {
                row: (self.game.board().height() / 2) as u8,
                col: (self.game.board().width() / 2) as u8,
                ..MoveEvaluation::default()
            });
        }
        result
    }

    fn minimax(
        &mut self,
        eval: &mut MoveEvaluation,
        depth_left: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) {
        self.stats.nodes += 1;

        if depth_left == 0 || self.game.is_over() {
            eval.score = if self.game.is_over() {
                self.terminal_score()
            } else {
                evaluate_game(&self.game, &self.settings.weights, self.ai_player)
            };
            return;
        }

        let mut moves = self.relevant_moves(depth_left);
        if moves.is_empty() {
            eval.score = evaluate_game(&self.game, &self.settings.weights, self.ai_player);
            return;
        }

        let mut is_first_move = true;
        let mut extreme = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = NO_KILLER;
        let mut index = 0;

        // The killer move was swapped to the front of the candidates;
        // try it before paying for the shallow sort.
        let killer = self.killer_moves[self.root_depth - depth_left];
        if (moves[0].row as i32, moves[0].col as i32) == killer {
            if self.evaluate_node(
                moves[0],
                depth_left,
                eval,
                &mut alpha,
                &mut beta,
                maximizing,
                &mut extreme,
                &mut best_move,
                is_first_move,
            ) {
                if beta <= alpha {
                    return;
                }
                is_first_move = false;
            }
            index = 1;
        }

        if depth_left > 1 {
            self.shallow_sort(&mut moves, index, maximizing);
        }

        while index < moves.len() {
            if self.evaluate_node(
                moves[index],
                depth_left,
                eval,
                &mut alpha,
                &mut beta,
                maximizing,
                &mut extreme,
                &mut best_move,
                is_first_move,
            ) {
                if beta <= alpha {
                    break;
                }
                is_first_move = false;
            }
            index += 1;
        }

        self.killer_moves[self.root_depth - depth_left] = best_move;
    }

    /// Apply one candidate, recurse, undo. Returns false when the move
    /// is illegal (and therefore dropped).
    #[allow(clippy::too_many_arguments)]
    fn evaluate_node(
        &mut self,
        mv: MoveHeuristic,
        depth_left: usize,
        eval: &mut MoveEvaluation,
        alpha: &mut i32,
        beta: &mut i32,
        maximizing: bool,
        extreme: &mut i32,
        best_move: &mut (i32, i32),
        is_first_move: bool,
    ) -> bool {
        let result = match self.game.make_move(mv.row as i32, mv.col as i32) {
            Ok(result) => result,
            Err(_) => return false,
        };

        let mut node = MoveEvaluation {
            row: mv.row,
            col: mv.col,
            ..MoveEvaluation::default()
        };
        self.minimax(&mut node, depth_left - 1, *alpha, *beta, !maximizing);
        self.game.reverse_move(&result);

        let score = node.score;
        eval.list_moves.push(node);

        let improved = if maximizing {
            score > *extreme
        } else {
            score < *extreme
        };
        if improved || is_first_move {
            *extreme = score;
            eval.score = score;
            eval.best_move_id = eval.list_moves.len() - 1;
            *best_move = (mv.row as i32, mv.col as i32);
            if maximizing {
                *alpha = (*alpha).max(score);
            } else {
                *beta = (*beta).min(score);
            }
        }
        true
    }

    /// Empty cells inside the played bounding box (expanded by the
    /// configured length) that sit near at least one stone. The ply's
    /// killer move, when present, is swapped to the front.
    fn relevant_moves(&self, depth_left: usize) -> Vec<MoveHeuristic> {
        let Some((min, max)) = self.game.board().played_bounds(self.settings.length) else {
            return Vec::new();
        };

        let capacity = (max.row as usize - min.row as usize + 1)
            * (max.col as usize - min.col as usize + 1);
        let mut moves = Vec::with_capacity(capacity);

        for row in min.row as i32..=max.row as i32 {
            for col in min.col as i32..=max.col as i32 {
                if self.game.board().relevancy(row, col) == 0
                    || self.game.board().get(row, col) != Stone::Empty
                {
                    continue;
                }
                moves.push(MoveHeuristic {
                    row: row as u8,
                    col: col as u8,
                    score: 0,
                });
            }
        }

        let killer = self.killer_moves[self.root_depth - depth_left];
        if killer != NO_KILLER {
            if let Some(found) = moves
                .iter()
                .position(|m| (m.row as i32, m.col as i32) == killer)
            {
                moves.swap(0, found);
            }
        }
        moves
    }

    /// Score every candidate one ply deep and order the slice from
    /// `start` best-first for the side to move. Illegal candidates are
    /// dropped here.
    fn shallow_sort(&mut self, moves: &mut Vec<MoveHeuristic>, start: usize, maximizing: bool) {
        let mut i = start;
        while i < moves.len() {
            let mv = moves[i];
            match self.game.make_move(mv.row as i32, mv.col as i32) {
                Ok(result) => {
                    moves[i].score = if self.game.is_over() {
                        self.terminal_score()
                    } else {
                        evaluate_game(&self.game, &self.settings.weights, self.ai_player)
                    };
                    self.game.reverse_move(&result);
                    i += 1;
                }
                Err(_) => {
                    moves.remove(i);
                }
            }
        }

        let slice = &mut moves[start..];
        if maximizing {
            slice.sort_by(|a, b| b.score.cmp(&a.score));
        } else {
            slice.sort_by(|a, b| a.score.cmp(&b.score));
        }
    }

    fn terminal_score(&self) -> i32 {
        match self.game.winner() {
            Some(winner) if winner == self.ai_player => WIN_SCORE,
            Some(_) => LOSS_SCORE,
            None => 0,
        }
    }
}

/// Weighted structure counts plus fork, double-open-four and capture
/// bonuses, for one player.
fn score_player(game: &Game, weights: &AiWeights, player: Stone) -> i32 {
    let counts = game.patterns(player).counts();

    let mut score = 0.0f32;
    for index in 0..STRUCTURE_TYPE_COUNT {
        let structure = STRUCTURES[index];
        score += counts[index] as f32 * weights.structure_value(structure);
    }

    let forcing = counts[StructureType::OpenThree.index()]
        + counts[StructureType::Four.index()]
        + counts[StructureType::OpenFour.index()];
    if forcing >= 2 {
        score += weights.fork_bonus();
    }
    if counts[StructureType::OpenFour.index()] >= 2 {
        score += weights.double_open_four_bonus();
    }

    score += weights.capture_value(game.score(player));
    score as i32
}

/// Node value: the AI's score minus its opponent's.
fn evaluate_game(game: &Game, weights: &AiWeights, ai_player: Stone) -> i32 {
    score_player(game, weights, ai_player) - score_player(game, weights, ai_player.opponent())
}

const STRUCTURES: [StructureType; STRUCTURE_TYPE_COUNT] = [
    StructureType::None,
    StructureType::FiveOrMore,
    StructureType::OpenOne,
    StructureType::One,
    StructureType::OpenTwo,
    StructureType::Two,
    StructureType::OpenThree,
    StructureType::Three,
    StructureType::OpenFour,
    StructureType::Four,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut Game, moves: &[(i32, i32)]) {
        for &(row, col) in moves {
            game.make_move(row, col).unwrap();
        }
    }

    fn ai_with_depth(depth: usize) -> Ai {
        Ai::new(AiSettings {
            depth,
            ..AiSettings::default()
        })
    }

    /// Plain minimax without pruning, killer moves or ordering, over
    /// the same candidate set.
    fn exhaustive(
        game: &mut Game,
        weights: &AiWeights,
        ai_player: Stone,
        depth: usize,
        maximizing: bool,
    ) -> i32 {
        if depth == 0 || game.is_over() {
            if game.is_over() {
                return match game.winner() {
                    Some(winner) if winner == ai_player => WIN_SCORE,
                    Some(_) => LOSS_SCORE,
                    None => 0,
                };
            }
            return evaluate_game(game, weights, ai_player);
        }

        let Some((min, max)) = game.board().played_bounds(2) else {
            return evaluate_game(game, weights, ai_player);
        };

        let mut best: Option<i32> = None;
        for row in min.row as i32..=max.row as i32 {
            for col in min.col as i32..=max.col as i32 {
                if game.board().relevancy(row, col) == 0
                    || game.board().get(row, col) != Stone::Empty
                {
                    continue;
                }
                let Ok(result) = game.make_move(row, col) else {
                    continue;
                };
                let value = exhaustive(game, weights, ai_player, depth - 1, !maximizing);
                game.reverse_move(&result);
                best = Some(match best {
                    None => value,
                    Some(b) if maximizing => b.max(value),
                    Some(b) => b.min(value),
                });
            }
        }
        best.unwrap_or_else(|| evaluate_game(game, weights, ai_player))
    }

    #[test]
    fn test_empty_board_suggests_center() {
        let mut ai = ai_with_depth(1);
        let game = Game::new(19, 19);
        assert_eq!(ai.suggest_move(&game), Some(Pos::new(9, 9)));
    }

    #[test]
    fn test_finds_winning_move() {
        let mut game = Game::new(19, 19);
        play(
            &mut game,
            &[(9, 5), (0, 0), (9, 6), (0, 2), (9, 7), (0, 4), (9, 8), (0, 6)],
        );

        let mut ai = ai_with_depth(1);
        let best = ai.suggest_move(&game).unwrap();
        game.make_move(best.row as i32, best.col as i32).unwrap();
        assert_eq!(game.winner(), Some(Stone::Black));
    }

    #[test]
    fn test_blocks_open_three() {
        let mut game = Game::new(19, 19);
        // Black owns an open three; white to move must close one end
        // or capture into it.
        play(&mut game, &[(9, 7), (5, 5), (9, 8), (5, 15), (9, 9)]);

        let mut ai = ai_with_depth(2);
        let best = ai.suggest_move(&game).unwrap();
        assert!(
            best == Pos::new(9, 6) || best == Pos::new(9, 10),
            "expected a blocking move, got {:?}",
            best
        );
    }

    #[test]
    fn test_pruned_search_matches_exhaustive() {
        let mut game = Game::new(19, 19);
        play(&mut game, &[(9, 9), (9, 10), (10, 9), (8, 8)]);

        let mut ai = ai_with_depth(2);
        let pruned = ai.suggest_move_evaluation(&game).score;

        let weights = AiWeights::default();
        let ai_player = game.current_player();
        let expected = exhaustive(&mut game, &weights, ai_player, 2, true);
        assert_eq!(pruned, expected);
    }

    #[test]
    fn test_evaluation_tree_shape() {
        let mut game = Game::new(19, 19);
        play(&mut game, &[(9, 9), (9, 10)]);

        let mut ai = ai_with_depth(2);
        let eval = ai.suggest_move_evaluation(&game);

        assert!(!eval.list_moves.is_empty());
        assert!(eval.best_move_id < eval.list_moves.len());
        // Depth two: children carry their own evaluated replies.
        assert!(eval.list_moves.iter().any(|node| !node.list_moves.is_empty()));
        assert!(ai.last_stats().nodes > 0);
    }

    #[test]
    fn test_iterative_deepening_returns_move() {
        let mut game = Game::new(19, 19);
        play(&mut game, &[(9, 9), (9, 10), (10, 9)]);

        let mut ai = ai_with_depth(3);
        let best = ai
            .suggest_move_timed(&game, Duration::from_millis(500))
            .unwrap();
        assert!(game.make_move(best.row as i32, best.col as i32).is_ok());
        assert!(ai.last_stats().depth_reached >= 1);
    }

    #[test]
    fn test_timed_search_deepens_past_configured_depth() {
        let mut game = Game::new(19, 19);
        play(&mut game, &[(9, 9), (9, 10), (10, 9)]);

        // Depth 1 in the settings, but rounds keep going until the
        // budget runs out, so at least one deeper round completes.
        let mut ai = ai_with_depth(1);
        let best = ai
            .suggest_move_timed(&game, Duration::from_millis(300))
            .unwrap();
        assert!(game.make_move(best.row as i32, best.col as i32).is_ok());
        assert!(ai.last_stats().depth_reached > 1);
    }

    #[test]
    fn test_heuristic_prefers_stronger_position() {
        let mut strong = Game::new(19, 19);
        play(&mut strong, &[(9, 7), (0, 0), (9, 8), (0, 2), (9, 9)]);

        let mut weak = Game::new(19, 19);
        play(&mut weak, &[(9, 7), (0, 0), (12, 12), (0, 2), (15, 3)]);

        let mut ai = ai_with_depth(1);
        let strong_eval = ai.heuristic_evaluation(&strong, Stone::Black);
        let weak_eval = ai.heuristic_evaluation(&weak, Stone::Black);
        assert!(strong_eval > weak_eval);
    }
}

//! Rule-variant room layer: seats, turn protocols and opening rules on
//! top of the game engine.
//!
//! Rule styles are a closed enum dispatched through plain functions on
//! the room. Seats keep their identifier for the whole game; a swap
//! only changes which stone color a seat plays.

use crate::board::{Pos, Stone};
use crate::game::{Game, MoveResult};
use crate::search::{Ai, AiSettings};

/// Seat identifier: 1 or 2. Seat 1 holds black until a swap.
pub type SeatId = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleStyle {
    #[default]
    Standard,
    /// First stone centered, second own stone outside the inner 5x5.
    Pro,
    /// Pro with a 7x7 inner square.
    LongPro,
    /// Seat 1 opens with three stones, then seat 2 picks a color.
    Swap,
    /// Same color choice as Swap.
    Swap2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Move,
    Swap,
}

/// History entry: a played move or a swap decision.
#[derive(Debug, Clone)]
pub enum Action {
    Move {
        seat: SeatId,
        row: i32,
        col: i32,
        result: MoveResult,
    },
    Swap {
        seat: SeatId,
        swapped: bool,
    },
}

/// Outcome of an attempted action. Failures leave the room untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// One seat: either a human or an AI with its own search depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Human,
    Ai { depth: usize },
}

#[derive(Debug, Clone)]
pub struct RoomSettings {
    pub width: i32,
    pub height: i32,
    pub rule_style: RuleStyle,
    pub seat1: Seat,
    pub seat2: Seat,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            width: 19,
            height: 19,
            rule_style: RuleStyle::Standard,
            seat1: Seat::Human,
            seat2: Seat::Ai { depth: 4 },
        }
    }
}

pub struct Room {
    settings: RoomSettings,
    game: Game,
    actions: Vec<Action>,
    seats_swapped: bool,
    ai1: Option<Ai>,
    ai2: Option<Ai>,
}

impl Room {
    pub fn new(settings: RoomSettings) -> Self {
        let make_ai = |seat: Seat| match seat {
            Seat::Ai { depth } => Some(Ai::new(AiSettings {
                depth,
                ..AiSettings::default()
            })),
            Seat::Human => None,
        };
        Self {
            game: Game::new(settings.width, settings.height),
            actions: Vec::new(),
            seats_swapped: false,
            ai1: make_ai(settings.seat1),
            ai2: make_ai(settings.seat2),
            settings,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn seats_swapped(&self) -> bool {
        self.seats_swapped
    }

    /// Stone color a seat currently plays.
    pub fn stone_of_seat(&self, seat: SeatId) -> Stone {
        let seat = if self.seats_swapped { 3 - seat } else { seat };
        match seat {
            1 => Stone::Black,
            2 => Stone::White,
            _ => Stone::Empty,
        }
    }

    /// Seat currently playing a stone color.
    pub fn seat_of_stone(&self, stone: Stone) -> Option<SeatId> {
        let seat = match stone {
            Stone::Black => 1,
            Stone::White => 2,
            Stone::Empty => return None,
        };
        Some(if self.seats_swapped { 3 - seat } else { seat })
    }

    /// Index of the last recorded action, -1 before the first.
    fn action_index(&self) -> i32 {
        self.actions.len() as i32 - 1
    }

    /// Which seat the room is waiting on. `None` once the game ended.
    pub fn expected_seat(&self) -> Option<SeatId> {
        match self.settings.rule_style {
            RuleStyle::Swap | RuleStyle::Swap2 => {
                if self.swap_expected() {
                    Some(SWAP_CHOOSER)
                } else if self.action_index() < 2 {
                    Some(1)
                } else {
                    self.expected_seat_standard()
                }
            }
            _ => self.expected_seat_standard(),
        }
    }

    fn expected_seat_standard(&self) -> Option<SeatId> {
        if self.game.is_over() {
            return None;
        }
        self.seat_of_stone(self.game.current_player())
    }

    /// What kind of action the room is waiting for.
    pub fn expected_action(&self) -> ActionKind {
        if self.swap_expected() {
            ActionKind::Swap
        } else {
            ActionKind::Move
        }
    }

    fn swap_expected(&self) -> bool {
        matches!(self.settings.rule_style, RuleStyle::Swap | RuleStyle::Swap2)
            && self.action_index() == 2
    }

    /// Try to play a stone on behalf of a seat.
    pub fn perform_move(&mut self, seat: SeatId, row: i32, col: i32) -> ActionOutcome {
        match self.settings.rule_style {
            RuleStyle::Standard => self.move_standard(seat, row, col),
            RuleStyle::Pro => self.move_pro(seat, row, col, 2),
            RuleStyle::LongPro => self.move_pro(seat, row, col, 3),
            RuleStyle::Swap | RuleStyle::Swap2 => self.move_swap(seat, row, col),
        }
    }

    /// Try to record a swap decision.
    pub fn perform_swap(&mut self, seat: SeatId, do_the_swap: bool) -> ActionOutcome {
        if !matches!(self.settings.rule_style, RuleStyle::Swap | RuleStyle::Swap2) {
            return ActionOutcome::refused("swap is not allowed in this rule style");
        }
        if !self.swap_expected() {
            return ActionOutcome::refused("no swap decision is expected now");
        }
        if seat != SWAP_CHOOSER {
            return ActionOutcome::refused("not your decision");
        }

        self.actions.push(Action::Swap {
            seat,
            swapped: do_the_swap,
        });
        self.seats_swapped = do_the_swap;
        ActionOutcome::ok(if do_the_swap {
            "seats swapped colors"
        } else {
            "colors kept"
        })
    }

    fn move_standard(&mut self, seat: SeatId, row: i32, col: i32) -> ActionOutcome {
        if self.game.is_over() {
            return ActionOutcome::refused("the game is already over");
        }
        if self.stone_of_seat(seat) != self.game.current_player() {
            return ActionOutcome::refused("not your turn");
        }

        match self.game.make_move(row, col) {
            Ok(result) => {
                self.actions.push(Action::Move {
                    seat,
                    row,
                    col,
                    result,
                });
                ActionOutcome::ok(format!("seat {seat} played at {row};{col}"))
            }
            Err(err) => ActionOutcome::refused(err.to_string()),
        }
    }

    fn move_pro(&mut self, seat: SeatId, row: i32, col: i32, radius: i32) -> ActionOutcome {
        let mid_row = self.game.board().height() / 2;
        let mid_col = self.game.board().width() / 2;

        match self.action_index() {
            -1 => {
                if row != mid_row || col != mid_col {
                    return ActionOutcome::refused("first stone must be in the center");
                }
            }
            1 => {
                let outside =
                    (row - mid_row).abs() > radius || (col - mid_col).abs() > radius;
                if !outside {
                    return ActionOutcome::refused("second stone must leave the inner square");
                }
            }
            _ => {}
        }

        self.move_standard(seat, row, col)
    }

    fn move_swap(&mut self, seat: SeatId, row: i32, col: i32) -> ActionOutcome {
        if self.swap_expected() {
            return ActionOutcome::refused("a swap decision is expected first");
        }
        let Some(expected) = self.expected_seat() else {
            return ActionOutcome::refused("the game is already over");
        };
        if seat != expected {
            return ActionOutcome::refused("not your turn");
        }

        // During the opening, seat 1 places stones of both colors; the
        // move is recorded for the seat currently mapped to the color.
        let acting = self
            .seat_of_stone(self.game.current_player())
            .unwrap_or(seat);
        self.move_standard(acting, row, col)
    }

    /// Is the room waiting on an AI seat.
    pub fn has_pending_action(&self) -> bool {
        if matches!(self.settings.rule_style, RuleStyle::Pro | RuleStyle::LongPro)
            && self.action_index() == -1
        {
            return true;
        }
        if self.swap_expected() {
            return self.ai_of_seat(SWAP_CHOOSER).is_some();
        }
        match self.expected_seat() {
            Some(seat) => self.ai_of_seat(seat).is_some(),
            None => false,
        }
    }

    /// Run one pending automatic action. Returns false when nothing was
    /// pending.
    pub fn perform_pending_action(&mut self) -> bool {
        // Pro openings force the center stone, AI or not.
        if matches!(self.settings.rule_style, RuleStyle::Pro | RuleStyle::LongPro)
            && self.action_index() == -1
        {
            let row = self.game.board().height() / 2;
            let col = self.game.board().width() / 2;
            return self.perform_move(1, row, col).success;
        }

        if self.swap_expected() {
            if self.ai_of_seat(SWAP_CHOOSER).is_some() {
                return self.perform_swap(SWAP_CHOOSER, true).success;
            }
            return false;
        }

        let Some(seat) = self.expected_seat() else {
            return false;
        };
        if self.ai_of_seat(seat).is_none() {
            return false;
        }

        let game = self.game.clone();
        let suggested = match seat {
            1 => self.ai1.as_mut(),
            _ => self.ai2.as_mut(),
        }
        .and_then(|ai| ai.suggest_move(&game));

        match suggested {
            Some(Pos { row, col }) => self.perform_move(seat, row as i32, col as i32).success,
            None => false,
        }
    }

    fn ai_of_seat(&self, seat: SeatId) -> Option<&Ai> {
        match seat {
            1 => self.ai1.as_ref(),
            2 => self.ai2.as_ref(),
            _ => None,
        }
    }
}

/// In swap styles, seat 2 makes the color choice.
const SWAP_CHOOSER: SeatId = 2;

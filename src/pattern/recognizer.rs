//! Per-player incremental structure recognizer.

use std::collections::{BTreeMap, BTreeSet};

use crate::board::{Board, CellChange, Matrix, Stone};

use super::{
    CellPattern, CellState, Direction, StructureType, DIRECTION_COUNT, STRUCTURE_TYPE_COUNT,
};

/// Ordered per-direction index of cells carrying a reportable
/// structure, keyed row then column.
type TagMap = BTreeMap<i32, BTreeSet<i32>>;

/// Maintains, for one player, the four direction matrices of
/// [`CellPattern`] data plus a cached per-class structure count.
///
/// Matrices are sized board + 2 so that every board cell has a
/// predecessor and a successor in every direction; the halo ring is
/// seeded with the pre-bound element and absorbs structures that end on
/// the board edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognizer {
    player: Stone,
    matrices: [Matrix<CellPattern>; DIRECTION_COUNT],
    tags: [TagMap; DIRECTION_COUNT],
    counts: [i32; STRUCTURE_TYPE_COUNT],
    tagging: bool,
}

impl Recognizer {
    pub fn new(player: Stone) -> Self {
        Self {
            player,
            matrices: std::array::from_fn(|_| Matrix::new(0, 0)),
            tags: Default::default(),
            counts: [0; STRUCTURE_TYPE_COUNT],
            tagging: false,
        }
    }

    #[inline]
    pub fn player(&self) -> Stone {
        self.player
    }

    /// Per-class structure counts, indexed by [`StructureType`].
    #[inline]
    pub fn counts(&self) -> &[i32; STRUCTURE_TYPE_COUNT] {
        &self.counts
    }

    #[inline]
    pub fn count(&self, structure: StructureType) -> i32 {
        self.counts[structure.index()]
    }

    /// Rescan the whole board from scratch.
    pub fn rebuild(&mut self, board: &Board) {
        let width = board.width() + 2;
        let height = board.height() + 2;

        for matrix in &mut self.matrices {
            *matrix = Matrix::new(width, height);
        }
        for tags in &mut self.tags {
            tags.clear();
        }
        self.counts = [0; STRUCTURE_TYPE_COUNT];
        self.tagging = false;

        self.seed_halo();
        self.scan_all(board);
    }

    /// Recompute the rays through every changed cell. The board must
    /// already hold the new values.
    pub fn apply_move(&mut self, board: &Board, changes: &[CellChange]) {
        for change in changes {
            let row = change.row as i32 + 1;
            let col = change.col as i32 + 1;
            for direction in Direction::ALL {
                self.propagate(board, row, col, direction, false);
            }
        }
    }

    fn seed_halo(&mut self) {
        let out_cell = CellPattern::pre_bound();
        for matrix in &mut self.matrices {
            for row in 0..matrix.height() {
                matrix.set(row, 0, out_cell);
                matrix.set(row, matrix.width() - 1, out_cell);
            }
            for col in 0..matrix.width() {
                matrix.set(0, col, out_cell);
                matrix.set(matrix.height() - 1, col, out_cell);
            }
        }
    }

    fn scan_all(&mut self, board: &Board) {
        let width = self.matrices[0].width();
        let height = self.matrices[0].height();

        for row in 1..height - 1 {
            self.propagate(board, row, 1, Direction::Right, true);
        }
        for col in 1..width - 1 {
            self.propagate(board, 1, col, Direction::Down, true);
        }

        // Diagonals are seeded from the top row plus one side column.
        for row in 1..height - 1 {
            self.propagate(board, row, 1, Direction::DownRight, true);
        }
        for col in 2..width - 1 {
            self.propagate(board, 1, col, Direction::DownRight, true);
        }

        for col in 1..width - 1 {
            self.propagate(board, 1, col, Direction::DownLeft, true);
        }
        for row in 2..height - 1 {
            self.propagate(board, row, width - 2, Direction::DownLeft, true);
        }
    }

    /// Recompute cells along `direction` starting at (`row`, `col`).
    /// With `up_to_bound` the walk runs to the matrix edge; otherwise it
    /// stops as soon as a recomputed cell keeps its old value.
    fn propagate(&mut self, board: &Board, mut row: i32, mut col: i32, direction: Direction, up_to_bound: bool) {
        loop {
            let state = self.boundary_state(board, row, col, direction);
            let modified = self.update_cell_direction(row, col, direction, state);

            if !up_to_bound && !modified {
                return;
            }

            let (next_row, next_col) = direction.offset(row, col, 1);
            let matrix = &self.matrices[direction as usize];
            if next_row >= matrix.height() || next_col < 0 || next_col >= matrix.width() {
                return;
            }
            row = next_row;
            col = next_col;
        }
    }

    /// Classify a matrix cell for this player, treating the halo cells
    /// a ray runs into as blocked.
    fn boundary_state(&self, board: &Board, row: i32, col: i32, direction: Direction) -> CellState {
        let on_board = match direction {
            Direction::Right => col <= board.width(),
            Direction::Down => row <= board.height(),
            Direction::DownRight => col <= board.width() && row <= board.height(),
            Direction::DownLeft => col > 0 && row <= board.height(),
        };
        if !on_board {
            return CellState::Blocked;
        }
        match board.get(row - 1, col - 1) {
            Stone::Empty => CellState::Empty,
            stone if stone == self.player => CellState::Stoned,
            _ => CellState::Blocked,
        }
    }

    fn update_cell_direction(
        &mut self,
        row: i32,
        col: i32,
        direction: Direction,
        state: CellState,
    ) -> bool {
        let matrix = &mut self.matrices[direction as usize];
        let (prev_row, prev_col) = direction.offset(row, col, -1);
        debug_assert!(matrix.in_bounds(row, col));
        debug_assert!(matrix.in_bounds(prev_row, prev_col));

        let old_data = *matrix.get(row, col);
        let new_data = matrix.get(prev_row, prev_col).following_memoized(state);

        old_data.accumulate_counts(&mut self.counts, -1);
        new_data.accumulate_counts(&mut self.counts, 1);

        if self.tagging {
            let was_tagged = is_relevant_to_tag(old_data);
            let is_tagged = is_relevant_to_tag(new_data);
            if was_tagged && !is_tagged {
                self.tags[direction as usize]
                    .entry(row)
                    .or_default()
                    .remove(&col);
            }
            if !was_tagged && is_tagged {
                self.tags[direction as usize]
                    .entry(row)
                    .or_default()
                    .insert(col);
            }
        }

        self.matrices[direction as usize].set(row, col, new_data);
        old_data != new_data
    }

    /// First-use activation of the tag index; maintained incrementally
    /// afterwards.
    fn activate_tagging(&mut self) {
        if self.tagging {
            return;
        }
        self.tagging = true;

        for direction in Direction::ALL {
            let matrix = &self.matrices[direction as usize];
            for row in 0..matrix.height() {
                for col in 0..matrix.width() {
                    if is_relevant_to_tag(*matrix.get(row, col)) {
                        self.tags[direction as usize]
                            .entry(row)
                            .or_default()
                            .insert(col);
                    }
                }
            }
        }
    }

    /// True when at least one five-or-more run cannot be broken by a
    /// pair capture: for every stone of a capturable five there is a
    /// closed two in another direction whose bracketing cells are on the
    /// board.
    pub fn five_or_more_cant_be_captured(&mut self, board: &Board) -> bool {
        let five_count = self.count(StructureType::FiveOrMore);
        self.activate_tagging();

        let mut five_capturables = 0;

        for direction in Direction::ALL {
            for (&row, cols) in &self.tags[direction as usize] {
                for &col in cols {
                    let data = *self.matrices[direction as usize].get(row, col);
                    let length = data.structure_length();
                    if length < 5 {
                        continue;
                    }
                    'stones: for i in 1..=length as i32 {
                        let (stone_row, stone_col) = direction.offset(row, col, -i);
                        for other in Direction::ALL {
                            if other == direction {
                                continue;
                            }
                            let (_, (found_row, found_col)) =
                                self.structure_at(stone_row, stone_col, other, 0);
                            if !self.matrices[other as usize].in_bounds(found_row, found_col) {
                                continue;
                            }
                            let cell_data =
                                *self.matrices[other as usize].get(found_row, found_col);
                            if self.is_structure_capturable(
                                board, found_row, found_col, cell_data, other,
                            ) {
                                five_capturables += 1;
                                break 'stones;
                            }
                        }
                    }
                }
            }
        }

        five_count > five_capturables
    }

    /// Does this player still own any capturable pair.
    pub fn can_be_captured(&mut self, board: &Board) -> bool {
        if self.count(StructureType::Two) <= 0 {
            return false;
        }
        self.activate_tagging();

        for direction in Direction::ALL {
            for (&row, cols) in &self.tags[direction as usize] {
                for &col in cols {
                    let data = *self.matrices[direction as usize].get(row, col);
                    if self.is_structure_capturable(board, row, col, data, direction) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Walk forward along `direction` and report the structure the
    /// starting cell participates in, together with the matrix cell that
    /// holds its data. Gapped threes are stitched together from their
    /// two halves when the walk crosses a single hole.
    pub fn structure_at(
        &self,
        row: i32,
        col: i32,
        direction: Direction,
        min_distance: i32,
    ) -> (StructureType, (i32, i32)) {
        self.find_structure(direction, row, col, min_distance, true, false)
    }

    fn find_structure(
        &self,
        direction: Direction,
        row: i32,
        col: i32,
        distance: i32,
        try_next: bool,
        met_gap: bool,
    ) -> (StructureType, (i32, i32)) {
        let matrix = &self.matrices[direction as usize];
        if !matrix.in_bounds(row, col) {
            return (StructureType::None, (row, col));
        }

        let cell = *matrix.get(row, col);
        let (next_row, next_col) = direction.offset(row, col, 1);

        // Inside a run of stones: the data lives at the cell after it.
        if cell.sequence_length() > 0 {
            return self.find_structure(direction, next_row, next_col, distance - 1, false, met_gap);
        }

        if cell.structure_length() > 0 {
            // A closed sequence start is a hard stop.
            if cell.is_sequence_closed() {
                return (cell.relevant_structure(), (row, col));
            }

            // A short run before a single hole may be the first half of
            // a gapped three recorded one structure further.
            if !met_gap
                && (cell.structure_length() == 1 || cell.structure_length() == 2)
                && !cell.is_gap_open_three()
            {
                let next =
                    self.find_structure(direction, next_row, next_col, distance - 1, false, true);
                if next.0 == StructureType::OpenThree || next.0 == StructureType::Three {
                    let (found_row, found_col) = next.1;
                    if matrix.in_bounds(found_row, found_col)
                        && matrix.get(found_row, found_col).structure_length() != 3
                    {
                        return next;
                    }
                }
            }

            return (cell.relevant_structure(), (row, col));
        }

        if try_next || distance > 0 {
            return self.find_structure(direction, next_row, next_col, distance - 1, false, met_gap);
        }

        (StructureType::None, (row, col))
    }

    /// A closed two whose open end and bracketing cell both fall on the
    /// board is one opponent move away from being captured.
    fn is_structure_capturable(
        &self,
        board: &Board,
        row: i32,
        col: i32,
        data: CellPattern,
        direction: Direction,
    ) -> bool {
        if data.structure_length() != 2 || !data.is_structure_closed() {
            return false;
        }
        if !board_coord_valid(board, row, col) {
            return false;
        }
        let (opposite_row, opposite_col) = direction.offset(row, col, -3);
        board_coord_valid(board, opposite_row, opposite_col)
    }
}

#[inline]
fn is_relevant_to_tag(data: CellPattern) -> bool {
    let length = data.structure_length();
    length >= 5 || (length == 2 && data.is_structure_closed())
}

/// Matrix coordinates that map onto the board (the halo ring excluded).
#[inline]
fn board_coord_valid(board: &Board, row: i32, col: i32) -> bool {
    row >= 1 && row <= board.height() && col >= 1 && col <= board.width()
}

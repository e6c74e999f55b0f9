//! Board representation: tri-state cells, played bounds and relevancy
//! tracking.

pub mod matrix;

pub use matrix::Matrix;

/// Radius (Chebyshev distance) around a placed stone inside which empty
/// cells become candidate moves. Counters are only ever incremented, so
/// the relevance set is a superset that survives move reversal.
pub const RELEVANCE_RADIUS: i32 = 2;

/// Stone colors. `Empty` doubles as the cleared-cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stone {
    #[default]
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// One-character board display form.
    pub fn symbol(self) -> char {
        match self {
            Stone::Empty => '.',
            Stone::Black => 'X',
            Stone::White => 'O',
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Record of one cell mutation, sufficient to undo or redo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub row: u8,
    pub col: u8,
    pub old_value: Stone,
    pub new_value: Stone,
}

/// Game board: a `width × height` grid of tri-state cells plus the
/// bookkeeping the move generator relies on (empty-cell count, played
/// bounding box, relevancy counters).
#[derive(Debug, Clone, Eq)]
pub struct Board {
    cells: Matrix<Stone>,
    empty_cells: i32,
    relevancy: Matrix<u8>,
    played_bounds: Option<(Pos, Pos)>,
}

/// Equality covers the engine state only. The `relevancy` counters are a
/// monotone search-side superset that is never shrunk on move reversal,
/// so they are deliberately excluded.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
            && self.empty_cells == other.empty_cells
            && self.played_bounds == other.played_bounds
    }
}

impl Board {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            cells: Matrix::new(width, height),
            empty_cells: width * height,
            relevancy: Matrix::new(width, height),
            played_bounds: None,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.cells.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.cells.height()
    }

    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        self.cells.in_bounds(row, col)
    }

    #[inline]
    pub fn get(&self, row: i32, col: i32) -> Stone {
        *self.cells.get(row, col)
    }

    /// Number of cells still empty (draw detection).
    #[inline]
    pub fn empty_cells(&self) -> i32 {
        self.empty_cells
    }

    /// Set a cell and return the change record.
    ///
    /// Cells only ever flip between empty and occupied, never from one
    /// stone straight to another, so the empty-cell count moves by one
    /// per call.
    pub fn set(&mut self, row: i32, col: i32, value: Stone) -> CellChange {
        let old_value = *self.cells.get(row, col);
        self.cells.set(row, col, value);
        debug_assert!((old_value == Stone::Empty) != (value == Stone::Empty));

        if value == Stone::Empty {
            self.empty_cells += 1;
        } else {
            self.empty_cells -= 1;
            self.bump_relevancy(row, col);
        }

        CellChange {
            row: row as u8,
            col: col as u8,
            old_value,
            new_value: value,
        }
    }

    /// Positive once any stone has ever been placed near this cell.
    #[inline]
    pub fn relevancy(&self, row: i32, col: i32) -> u8 {
        *self.relevancy.get(row, col)
    }

    fn bump_relevancy(&mut self, row: i32, col: i32) {
        for dr in -RELEVANCE_RADIUS..=RELEVANCE_RADIUS {
            for dc in -RELEVANCE_RADIUS..=RELEVANCE_RADIUS {
                let (r, c) = (row + dr, col + dc);
                if self.relevancy.in_bounds(r, c) {
                    let count = self.relevancy.get(r, c).saturating_add(1);
                    self.relevancy.set(r, c, count);
                }
            }
        }
    }

    /// Expand the played bounding box to include `pos`.
    pub fn record_played(&mut self, pos: Pos) {
        self.played_bounds = Some(match self.played_bounds {
            None => (pos, pos),
            Some((min, max)) => (
                Pos::new(min.row.min(pos.row), min.col.min(pos.col)),
                Pos::new(max.row.max(pos.row), max.col.max(pos.col)),
            ),
        });
    }

    /// Raw bounding box of every stone ever played, for move records.
    #[inline]
    pub fn raw_played_bounds(&self) -> Option<(Pos, Pos)> {
        self.played_bounds
    }

    /// Restore a previously saved bounding box (move reversal).
    #[inline]
    pub fn restore_played_bounds(&mut self, bounds: Option<(Pos, Pos)>) {
        self.played_bounds = bounds;
    }

    /// Bounding box of played stones expanded by `margin`, clamped to the
    /// board. `None` before the first stone.
    pub fn played_bounds(&self, margin: i32) -> Option<(Pos, Pos)> {
        let (min, max) = self.played_bounds?;
        Some((
            Pos::new(
                (min.row as i32 - margin).max(0) as u8,
                (min.col as i32 - margin).max(0) as u8,
            ),
            Pos::new(
                (max.row as i32 + margin).min(self.height() - 1) as u8,
                (max.col as i32 + margin).min(self.width() - 1) as u8,
            ),
        ))
    }
}

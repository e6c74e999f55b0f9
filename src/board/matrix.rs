//! Generic row/col addressable matrix used for the board and the
//! per-direction pattern grids.

/// Dense 2-D array with signed bounds checking.
///
/// Coordinates are `i32` so that callers walking off the edge (diagonal
/// propagation, halo lookups) can test `in_bounds` without casts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    width: i32,
    height: i32,
    cells: Vec<T>,
}

impl<T: Clone + Default> Matrix<T> {
    pub fn new(width: i32, height: i32) -> Self {
        debug_assert!(width >= 0 && height >= 0);
        Self {
            width,
            height,
            cells: vec![T::default(); (width * height) as usize],
        }
    }
}

impl<T> Matrix<T> {
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.height && col >= 0 && col < self.width
    }

    #[inline]
    pub fn get(&self, row: i32, col: i32) -> &T {
        debug_assert!(self.in_bounds(row, col));
        &self.cells[(row * self.width + col) as usize]
    }

    #[inline]
    pub fn set(&mut self, row: i32, col: i32, value: T) {
        debug_assert!(self.in_bounds(row, col));
        self.cells[(row * self.width + col) as usize] = value;
    }
}

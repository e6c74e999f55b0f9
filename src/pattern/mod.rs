//! Incremental structure recognition.
//!
//! Each player owns four pattern matrices, one per scan direction. A
//! cell's pattern data is a pure function of its predecessor's data
//! along that direction and the cell's own state, so a move only forces
//! recomputation along four rays until the data stops changing.

pub mod cell;
pub mod recognizer;

pub use cell::CellPattern;
pub use recognizer::Recognizer;

/// Structure classes, ordered so that `length * 2 + closed` yields the
/// index for lengths 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(usize)]
pub enum StructureType {
    None = 0,
    FiveOrMore = 1,
    OpenOne = 2,
    One = 3,
    OpenTwo = 4,
    Two = 5,
    OpenThree = 6,
    Three = 7,
    OpenFour = 8,
    Four = 9,
}

pub const STRUCTURE_TYPE_COUNT: usize = 10;

impl StructureType {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Class of an unbroken run of `length` stones, open or closed on
    /// one side. Lengths of five and beyond collapse into one class.
    #[inline]
    pub fn from_run(length: u8, closed: bool) -> StructureType {
        debug_assert!(length >= 1);
        if length >= 5 {
            return StructureType::FiveOrMore;
        }
        match (length, closed) {
            (1, false) => StructureType::OpenOne,
            (1, true) => StructureType::One,
            (2, false) => StructureType::OpenTwo,
            (2, true) => StructureType::Two,
            (3, false) => StructureType::OpenThree,
            (3, true) => StructureType::Three,
            (4, false) => StructureType::OpenFour,
            _ => StructureType::Four,
        }
    }
}

/// Scan directions. Every cell is the successor of exactly one cell per
/// direction; the four rays cover all eight alignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Direction {
    Right = 0,
    Down = 1,
    DownRight = 2,
    DownLeft = 3,
}

pub const DIRECTION_COUNT: usize = 4;

impl Direction {
    pub const ALL: [Direction; DIRECTION_COUNT] = [
        Direction::Right,
        Direction::Down,
        Direction::DownRight,
        Direction::DownLeft,
    ];

    /// Step `distance` cells along this direction.
    #[inline]
    pub fn offset(self, row: i32, col: i32, distance: i32) -> (i32, i32) {
        match self {
            Direction::Right => (row, col + distance),
            Direction::Down => (row + distance, col),
            Direction::DownRight => (row + distance, col + distance),
            Direction::DownLeft => (row + distance, col - distance),
        }
    }
}

/// How a cell looks from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum CellState {
    Empty = 0,
    Stoned = 1,
    Blocked = 2,
}

//! Error taxonomy for move application and configuration loading.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("coordinates ({row}, {col}) are outside the board")]
    InvalidCoordinates { row: i32, col: i32 },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: i32, col: i32 },

    #[error("move creates more than one open three")]
    IllegalDoubleOpenThree,

    #[error("the game is already over")]
    GameAlreadyOver,

    #[error("weights file holds {found} values, expected {expected}")]
    WeightsShape { expected: usize, found: usize },

    #[error("weights file entry {index} is not a number")]
    WeightsParse { index: usize },

    #[error("weights file i/o: {0}")]
    WeightsIo(String),
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        GameError::WeightsIo(err.to_string())
    }
}

//! Search advisor: evaluation weights and the alpha-beta minimax.

pub mod minimax;
pub mod weights;

pub use minimax::{Ai, AiSettings, MoveEvaluation, SearchStats};
pub use weights::{AiWeights, WEIGHT_COUNT};

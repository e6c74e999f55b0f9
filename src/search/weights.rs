//! Evaluation weights with one-line file persistence, so tuned weight
//! sets can be swapped in without recompiling.

use std::fs;
use std::path::Path;

use crate::error::GameError;
use crate::pattern::StructureType;

/// Ten structure classes plus fork, double-open-four and capture slots.
pub const WEIGHT_COUNT: usize = 13;

const FORK: usize = 10;
const DOUBLE_OPEN_FOUR: usize = 11;
const CAPTURE: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct AiWeights {
    values: [f32; WEIGHT_COUNT],
}

impl Default for AiWeights {
    fn default() -> Self {
        let mut values = [0.0; WEIGHT_COUNT];
        values[StructureType::FiveOrMore.index()] = 100_000.0;
        values[StructureType::OpenOne.index()] = 10.0;
        values[StructureType::One.index()] = 5.0;
        values[StructureType::OpenTwo.index()] = 100.0;
        values[StructureType::Two.index()] = 50.0;
        values[StructureType::OpenThree.index()] = 1_000.0;
        values[StructureType::Three.index()] = 500.0;
        values[StructureType::OpenFour.index()] = 10_000.0;
        values[StructureType::Four.index()] = 1_000.0;
        values[FORK] = 9_000.0;
        values[DOUBLE_OPEN_FOUR] = 9_000.0;
        values[CAPTURE] = 50.0;
        Self { values }
    }
}

impl AiWeights {
    pub fn from_values(values: [f32; WEIGHT_COUNT]) -> Self {
        Self { values }
    }

    #[inline]
    pub fn structure_value(&self, structure: StructureType) -> f32 {
        self.values[structure.index()]
    }

    /// Bonus for owning two or more forcing structures at once.
    #[inline]
    pub fn fork_bonus(&self) -> f32 {
        self.values[FORK]
    }

    /// Bonus for a second simultaneous open four.
    #[inline]
    pub fn double_open_four_bonus(&self) -> f32 {
        self.values[DOUBLE_OPEN_FOUR]
    }

    /// Capture points weigh in quadratically: being close to the
    /// ten-point win dominates everything but a five.
    #[inline]
    pub fn capture_value(&self, capture_score: i32) -> f32 {
        self.values[CAPTURE] * (capture_score * capture_score) as f32
    }

    /// Write the weights as a single comma-separated line, creating
    /// parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<(), GameError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let line = self
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        fs::write(path, line + "\n")?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, GameError> {
        let content = fs::read_to_string(path)?;
        let line = content.lines().next().unwrap_or("");

        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() != WEIGHT_COUNT {
            return Err(GameError::WeightsShape {
                expected: WEIGHT_COUNT,
                found: cells.len(),
            });
        }

        let mut values = [0.0; WEIGHT_COUNT];
        for (index, cell) in cells.iter().enumerate() {
            values[index] = cell
                .trim()
                .parse()
                .map_err(|_| GameError::WeightsParse { index })?;
        }
        Ok(Self { values })
    }
}

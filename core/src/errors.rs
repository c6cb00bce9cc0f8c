//! Failures raised while a level is being generated.

use thiserror::Error;

use crate::ConfigRangeError;

/// Raised when a column that must expose a surface is solid to the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("column {column} has no surface to build on")]
pub struct DegenerateColumn {
    /// Column that was probed.
    pub column: u32,
}

/// Errors that abort the generation of a single level.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenerationError {
    /// The parameter set was rejected before generation started.
    #[error("invalid generation parameters: {0}")]
    Config(#[from] ConfigRangeError),
    /// A stage met a column without a surface.
    #[error(transparent)]
    Degenerate(#[from] DegenerateColumn),
    /// No column was left to hold the goal once the spawn was placed.
    #[error("no goal column remains after placing the spawn in column {spawn_column}")]
    NoGoalColumn {
        /// Column holding the spawn.
        spawn_column: u32,
    },
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tilerun level generator.
//!
//! This crate defines the vocabulary that connects the generator systems, the
//! level file adapter, and the external play loop. The grid storage lives in
//! the world crate; systems receive an immutable [`GenerationParameters`]
//! value, mutate a grid in place, and report coordinates back through the
//! types declared here. The [`agent`] module fixes the data contract spoken
//! between a play loop and an external decision process.

pub mod agent;
mod errors;
mod params;
mod tiles;

use serde::{Deserialize, Serialize};

pub use errors::{DegenerateColumn, GenerationError};
pub use params::{ConfigRangeError, GenerationParameters, ScorePosition};
pub use tiles::{BlockMapping, BlockMappingError, TileId, TileKind, PLAYER_SPRITE_ID};

/// Edge length of a rendered tile in pixels, written into every generated level.
pub const BLOCK_SIZE: u32 = 32;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the topmost row of the level; rows grow downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Counting rule applied when probing a column for its surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProbeMode {
    /// Counts the contiguous run of ground tiles from the bottom and stops at
    /// the first tile of any other kind.
    GroundOnly,
    /// Counts every non-air tile from the bottom and stops at the first air tile.
    AnyTile,
}

/// Result of probing a column from the bottom of the level upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Number of tiles counted before the probe met its terminating tile.
    Height(u32),
    /// The probe reached the top of the level without meeting a terminating tile.
    NoSurface,
}

impl Surface {
    /// Returns the counted height, if the probe found a surface.
    #[must_use]
    pub const fn height(self) -> Option<u32> {
        match self {
            Self::Height(height) => Some(height),
            Self::NoSurface => None,
        }
    }
}

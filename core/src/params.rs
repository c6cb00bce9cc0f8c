//! Tuning surface consumed by every generation stage.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_WORLD_WIDTH: u32 = 75;
const DEFAULT_WORLD_HEIGHT: u32 = 20;

const RANDOM_WIDTH: RangeInclusive<u32> = 50..=75;
const RANDOM_MAX_HEIGHT_DIFF: RangeInclusive<u32> = 2..=3;

/// Horizontal placement of the score display in the play loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorePosition {
    /// Score drawn at the left edge of the screen.
    #[default]
    Left,
    /// Score drawn centred.
    Center,
    /// Score drawn at the right edge of the screen.
    Right,
}

impl ScorePosition {
    /// Numeric encoding stored in level files (-1, 0, 1).
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Center => 0,
            Self::Right => 1,
        }
    }

    /// Decodes the numeric representation stored in level files.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            -1 => Some(Self::Left),
            0 => Some(Self::Center),
            1 => Some(Self::Right),
            _ => None,
        }
    }
}

/// Reasons a parameter set is rejected before generation starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigRangeError {
    /// The world has no columns or no rows.
    #[error("world size {width}x{height} must be positive in both directions")]
    EmptyWorld {
        /// Configured number of columns.
        width: u32,
        /// Configured number of rows.
        height: u32,
    },
    /// Spawn and goal need two distinct columns.
    #[error("world width {width} leaves no room for distinct spawn and goal columns")]
    WorldTooNarrow {
        /// Configured number of columns.
        width: u32,
    },
    /// The tallest terrain column would leave no row for spawn or goal.
    #[error("max terrain height {max_terrain_height} does not fit a world {height} rows tall")]
    TerrainTooTall {
        /// Configured terrain ceiling.
        max_terrain_height: u32,
        /// Configured number of rows.
        height: u32,
    },
    /// Terrain steps need a positive height budget.
    #[error("max height difference must be at least 1")]
    ZeroHeightDifference,
    /// Enemies would never be allowed to spawn next to each other.
    #[error("enemy max width must be at least 1")]
    ZeroEnemyWidth,
    /// A probability or fraction lies outside `[0, 1]`.
    #[error("{name} = {value} is outside [0, 1]")]
    OutOfUnitRange {
        /// Field name of the offending value.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The spawn area would contain no columns.
    #[error("spawn area fraction must be positive")]
    EmptySpawnArea,
}

/// Immutable parameter set that drives a single level generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    /// How often the player can jump before touching ground again.
    pub jump: u32,
    /// Rows the player ascends during a jump.
    pub jump_height: u32,
    /// Ticks the player hovers at the top of a jump.
    pub jump_width: u32,
    /// Where the play loop draws the score.
    pub score_position: ScorePosition,
    /// Number of columns in the generated level.
    pub world_width: u32,
    /// Number of rows in the generated level.
    pub world_height: u32,
    /// Largest terrain step between neighbouring columns; also bounds enemy heights.
    pub max_height_diff: u32,
    /// Highest terrain level, counted from zero, so the tallest column holds one more tile.
    pub max_terrain_height: u32,
    /// Chance that the terrain level changes when advancing one column.
    pub height_change_probability: f64,
    /// Base chance that a terrain change goes up rather than down.
    pub height_up_probability: f64,
    /// Multiplied by the current level and subtracted from the up chance; raising it keeps terrain low.
    pub height_down_factor: f64,
    /// Chance that an eligible column receives an enemy.
    pub enemy_spawn_probability: f64,
    /// Consecutive enemy columns allowed before a free column is required.
    pub enemy_max_width: u32,
    /// Tallest enemy stack the generator may place.
    pub enemy_max_height: u32,
    /// Chance that an enemy grows by one more tile while allowed.
    pub enemy_grow_probability: f64,
    /// Fraction of the width at each end where spawn and goal are drawn.
    pub spawn_area_fraction: f64,
    /// Chance of spawn on the left and goal on the right rather than the reverse.
    pub spawn_left_probability: f64,
    /// Chance that each eligible air tile receives a coin.
    pub coin_spawn_probability: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self::for_world(DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT)
    }
}

impl GenerationParameters {
    /// Default tuning for a world of the given size.
    ///
    /// The terrain ceiling follows the height (half of it, rounded half to even);
    /// every other knob takes its default value.
    #[must_use]
    pub fn for_world(world_width: u32, world_height: u32) -> Self {
        let jump = 1;
        let jump_height = 3;
        Self {
            jump,
            jump_height,
            jump_width: 3,
            score_position: ScorePosition::Left,
            world_width,
            world_height,
            max_height_diff: jump_height * jump,
            max_terrain_height: (f64::from(world_height) * 0.5).round_ties_even() as u32,
            height_change_probability: 0.2,
            height_up_probability: 0.5,
            height_down_factor: 0.01,
            enemy_spawn_probability: 0.15,
            enemy_max_width: 1,
            enemy_max_height: jump_height,
            enemy_grow_probability: 0.25,
            spawn_area_fraction: 0.2,
            spawn_left_probability: 1.0,
            coin_spawn_probability: 0.05,
        }
    }

    /// Redraws the subset of knobs varied when building training sets.
    ///
    /// Width and height budget are drawn uniformly; the probabilities use a
    /// fixed offset plus a random scale, which biases the set towards short,
    /// flat levels with few enemies.
    #[must_use]
    pub fn randomized<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self {
            world_width: rng.gen_range(RANDOM_WIDTH),
            max_height_diff: rng.gen_range(RANDOM_MAX_HEIGHT_DIFF),
            height_change_probability: 0.2 - 0.1 * rng.gen::<f64>(),
            height_down_factor: 0.01 + rng.gen::<f64>() * 0.09,
            enemy_spawn_probability: 0.1 + rng.gen::<f64>() * 0.05,
            enemy_grow_probability: 0.1 + rng.gen::<f64>() * 0.15,
            ..self.clone()
        }
    }

    /// Number of columns in each of the spawn and goal areas.
    #[must_use]
    pub fn spawn_area_columns(&self) -> u32 {
        let columns = (f64::from(self.world_width) * self.spawn_area_fraction).ceil() as u32;
        columns.clamp(1, self.world_width.max(1))
    }

    /// Checks every range the generation stages rely on.
    pub fn validate(&self) -> Result<(), ConfigRangeError> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(ConfigRangeError::EmptyWorld {
                width: self.world_width,
                height: self.world_height,
            });
        }
        if self.world_width < 2 {
            return Err(ConfigRangeError::WorldTooNarrow {
                width: self.world_width,
            });
        }
        if self.max_terrain_height.saturating_add(2) > self.world_height {
            return Err(ConfigRangeError::TerrainTooTall {
                max_terrain_height: self.max_terrain_height,
                height: self.world_height,
            });
        }
        if self.max_height_diff == 0 {
            return Err(ConfigRangeError::ZeroHeightDifference);
        }
        if self.enemy_max_width == 0 {
            return Err(ConfigRangeError::ZeroEnemyWidth);
        }

        let unit_values = [
            ("height_change_probability", self.height_change_probability),
            ("height_up_probability", self.height_up_probability),
            ("enemy_spawn_probability", self.enemy_spawn_probability),
            ("enemy_grow_probability", self.enemy_grow_probability),
            ("spawn_area_fraction", self.spawn_area_fraction),
            ("spawn_left_probability", self.spawn_left_probability),
            ("coin_spawn_probability", self.coin_spawn_probability),
        ];
        for (name, value) in unit_values {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigRangeError::OutOfUnitRange { name, value });
            }
        }
        if self.spawn_area_fraction <= 0.0 {
            return Err(ConfigRangeError::EmptySpawnArea);
        }

        Ok(())
    }
}

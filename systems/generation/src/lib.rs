#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-level generation pipeline.
//!
//! Runs the terrain, spawn and goal, enemy, and coin systems in that order
//! over one grid. Each stage reads the grid exactly as the previous stage
//! left it.

use std::collections::BTreeMap;

use rand::Rng;
use tilerun_core::{CellCoord, GenerationError, GenerationParameters, BLOCK_SIZE};
use tilerun_system_coins::place_coins;
use tilerun_system_enemies::place_enemies;
use tilerun_system_spawn_goal::{place_spawn_and_goal, SpawnGoal};
use tilerun_system_terrain::generate_ground;
use tilerun_world::Grid;
use tracing::{debug, instrument};

/// A freshly generated level together with what the stages reported.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedLevel {
    grid: Grid,
    spawn: CellCoord,
    goal: CellCoord,
    enemies: usize,
    coins: usize,
    params: GenerationParameters,
}

impl GeneratedLevel {
    /// Generated tile grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Consumes the level and hands back its grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Cell holding the spawn tile.
    #[must_use]
    pub const fn spawn(&self) -> CellCoord {
        self.spawn
    }

    /// Cell holding the goal tile.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Number of columns that received an enemy.
    #[must_use]
    pub const fn enemy_columns(&self) -> usize {
        self.enemies
    }

    /// Number of coins placed.
    #[must_use]
    pub const fn coin_count(&self) -> usize {
        self.coins
    }

    /// Parameters the level was generated with.
    #[must_use]
    pub const fn params(&self) -> &GenerationParameters {
        &self.params
    }

    /// Key/value pairs written to the `!info` section of the level file.
    #[must_use]
    pub fn info(&self) -> BTreeMap<String, String> {
        let params = &self.params;
        [
            ("blocksize", BLOCK_SIZE.to_string()),
            ("jump", params.jump.to_string()),
            ("jump_height", params.jump_height.to_string()),
            ("jump_width", params.jump_width.to_string()),
            ("score_position", params.score_position.as_i32().to_string()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
    }
}

/// Validates `params` and builds one level from them.
///
/// The same parameters and random state always yield the same level.
#[instrument(level = "debug", skip_all, fields(width = params.world_width, height = params.world_height))]
pub fn generate_level<R: Rng + ?Sized>(
    params: &GenerationParameters,
    rng: &mut R,
) -> Result<GeneratedLevel, GenerationError> {
    params.validate()?;

    let mut grid = generate_ground(params, rng);
    let SpawnGoal { spawn, goal } = place_spawn_and_goal(&mut grid, params, rng)?;
    let enemies = place_enemies(&mut grid, params, rng);
    let coins = place_coins(&mut grid, params, rng);

    debug!(?spawn, ?goal, enemies, coins, "generated level");
    Ok(GeneratedLevel {
        grid,
        spawn,
        goal,
        enemies,
        coins,
        params: params.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tilerun_core::{ConfigRangeError, ScorePosition};

    #[test]
    fn info_lists_the_play_settings() {
        let mut params = GenerationParameters::for_world(12, 8);
        params.score_position = ScorePosition::Right;
        let level = generate_level(&params, &mut ChaCha8Rng::seed_from_u64(1)).expect("level");
        let info = level.info();

        assert_eq!(info.get("blocksize").map(String::as_str), Some("32"));
        assert_eq!(info.get("jump").map(String::as_str), Some("1"));
        assert_eq!(info.get("jump_height").map(String::as_str), Some("3"));
        assert_eq!(info.get("jump_width").map(String::as_str), Some("3"));
        assert_eq!(info.get("score_position").map(String::as_str), Some("1"));
        assert_eq!(info.len(), 5);
    }

    #[test]
    fn invalid_parameters_are_rejected_before_any_stage_runs() {
        let mut params = GenerationParameters::default();
        params.enemy_spawn_probability = -0.5;
        let result = generate_level(&params, &mut ChaCha8Rng::seed_from_u64(2));
        assert_eq!(
            result,
            Err(GenerationError::Config(ConfigRangeError::OutOfUnitRange {
                name: "enemy_spawn_probability",
                value: -0.5,
            }))
        );
    }
}

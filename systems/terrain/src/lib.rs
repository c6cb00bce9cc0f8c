#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terrain system that lays down the ground profile of a level.
//!
//! The profile is a random walk over a running terrain level. Each step is
//! bounded by the jump budget, and the chance of climbing shrinks as the
//! terrain grows, which pulls tall stretches back towards the floor.

use rand::Rng;
use tilerun_core::{CellCoord, GenerationParameters, TileKind};
use tilerun_world::Grid;
use tracing::debug;

/// Builds a grid of the configured size whose columns hold one ground run each.
///
/// Level zero means a single ground tile; the column at level `n` holds
/// `n + 1` ground tiles stacked from the bottom row.
pub fn generate_ground<R: Rng + ?Sized>(params: &GenerationParameters, rng: &mut R) -> Grid {
    let mut grid = Grid::new(params.world_width, params.world_height);
    let mut level = rng.gen_range(0..=params.max_terrain_height);
    let initial_level = level;

    for column in 0..params.world_width {
        if rng.gen::<f64>() < params.height_change_probability {
            level = next_level(level, params, rng);
        }
        fill_ground(&mut grid, column, level);
    }

    debug!(
        width = params.world_width,
        height = params.world_height,
        initial_level,
        "generated terrain"
    );
    grid
}

fn next_level<R: Rng + ?Sized>(level: u32, params: &GenerationParameters, rng: &mut R) -> u32 {
    let magnitude = i64::from(rng.gen_range(1..=params.max_height_diff.max(1)));
    let up_probability =
        params.height_up_probability - f64::from(level) * params.height_down_factor;
    let stepped = if rng.gen::<f64>() < up_probability {
        i64::from(level) + magnitude
    } else {
        i64::from(level) - magnitude
    };
    stepped.clamp(0, i64::from(params.max_terrain_height)) as u32
}

fn fill_ground(grid: &mut Grid, column: u32, level: u32) {
    for height in 0..=level {
        if let Some(row) = grid.row_at_height(height) {
            let _ = grid.set(CellCoord::new(column, row), TileKind::Ground);
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy placement system.
//!
//! Enemies stand on plain terrain only. A column qualifies when it and both
//! neighbours are pure (nothing but ground below the first air tile), and the
//! enemy must stay low enough that the terrain step plus the enemy height
//! remains within the jump budget on either side.

use rand::Rng;
use tilerun_core::{CellCoord, GenerationParameters, TileKind};
use tilerun_world::{query, Grid};
use tracing::debug;

/// Sweeps the level left to right and stacks enemies on eligible columns.
///
/// Surface heights are sampled before the sweep, so an enemy placed in one
/// column does not disqualify its right neighbour; runs of adjacent enemies
/// are instead limited by `enemy_max_width`. Returns the number of columns
/// that received an enemy.
pub fn place_enemies<R: Rng + ?Sized>(
    grid: &mut Grid,
    params: &GenerationParameters,
    rng: &mut R,
) -> usize {
    let heights: Vec<Option<u32>> = (0..grid.columns())
        .map(|column| query::pure_surface(grid, column))
        .collect();

    let mut consecutive = 0;
    let mut placed = 0;
    for column in 0..grid.columns() {
        let size = enemy_size(grid, params, &heights, column, consecutive, rng);
        let Some((surface, size)) = size else {
            consecutive = 0;
            continue;
        };

        for level in surface..surface + size {
            if let Some(row) = grid.row_at_height(level) {
                let _ = grid.set(CellCoord::new(column, row), TileKind::Enemy);
            }
        }
        consecutive += 1;
        placed += 1;
    }

    debug!(placed, "placed enemies");
    placed
}

/// Decides whether `column` gets an enemy and how tall it is.
fn enemy_size<R: Rng + ?Sized>(
    grid: &Grid,
    params: &GenerationParameters,
    heights: &[Option<u32>],
    column: u32,
    consecutive: u32,
    rng: &mut R,
) -> Option<(u32, u32)> {
    let index = column as usize;
    let previous = *heights.get(index.checked_sub(1)?)?;
    let current = *heights.get(index)?;
    let next = *heights.get(index + 1)?;
    let (previous, current, next) = (previous?, current?, next?);

    if consecutive >= params.enemy_max_width {
        return None;
    }

    let height_diff = current.abs_diff(previous).max(current.abs_diff(next));
    if height_diff >= params.max_height_diff {
        return None;
    }

    if rng.gen::<f64>() >= params.enemy_spawn_probability {
        return None;
    }

    let headroom = grid.rows().saturating_sub(current + 1);
    let cap = (params.max_height_diff - height_diff)
        .min(params.enemy_max_height)
        .min(headroom);
    if cap == 0 {
        return None;
    }

    let mut size = 1;
    while size < cap && rng.gen::<f64>() < params.enemy_grow_probability {
        size += 1;
    }
    Some((current, size))
}

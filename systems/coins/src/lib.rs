#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Coin placement system.

use rand::Rng;
use tilerun_core::{CellCoord, GenerationParameters, TileKind};
use tilerun_world::{query, Grid};
use tracing::debug;

/// Scatters coins in the air above the terrain and returns how many were placed.
///
/// Coins in a column stay within one jump of the tallest pure column in its
/// three-column window: the band starts on the first free tile of the column
/// and ends `max_height_diff` tiles above that tallest neighbour. Columns
/// already holding a spawn, goal, or enemy start their band above it and do
/// not count towards the tallest height. Every tile in the band independently
/// receives a coin with `coin_spawn_probability`.
pub fn place_coins<R: Rng + ?Sized>(
    grid: &mut Grid,
    params: &GenerationParameters,
    rng: &mut R,
) -> usize {
    let heights: Vec<Option<u32>> = (0..grid.columns())
        .map(|column| query::pure_surface(grid, column))
        .collect();

    let mut placed = 0;
    for column in 0..grid.columns() {
        let Some(rows) = coin_band(grid, params, &heights, column) else {
            continue;
        };
        for row in rows {
            if rng.gen::<f64>() < params.coin_spawn_probability {
                let _ = grid.set(CellCoord::new(column, row), TileKind::Coin);
                placed += 1;
            }
        }
    }

    debug!(placed, "placed coins");
    placed
}

/// Rows eligible for coins in `column`, listed bottom to top.
fn coin_band(
    grid: &Grid,
    params: &GenerationParameters,
    heights: &[Option<u32>],
    column: u32,
) -> Option<impl Iterator<Item = u32>> {
    let index = column as usize;
    let tallest = [index.checked_sub(1), Some(index), index.checked_add(1)]
        .into_iter()
        .flatten()
        .filter_map(|neighbour| heights.get(neighbour).copied().flatten())
        .max()
        .map_or(-1, i64::from);

    let limit = i64::from(grid.rows()) - tallest - i64::from(params.max_height_diff) - 2;
    // The band would end exactly at the lowest free tile.
    if limit == -1 {
        return None;
    }

    let free = query::occupied_height(grid, column).ok()?;
    let lowest_free_row = i64::from(grid.row_at_height(free)?);
    let top_excluded = limit.max(0);
    if lowest_free_row <= top_excluded {
        return None;
    }

    let top = (top_excluded + 1) as u32;
    Some((top..=lowest_free_row as u32).rev())
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Places the spawn and the goal at opposite ends of a level.

use rand::{seq::SliceRandom, Rng};
use tilerun_core::{
    CellCoord, ConfigRangeError, DegenerateColumn, GenerationError, GenerationParameters, TileKind,
};
use tilerun_world::{query, Grid};
use tracing::debug;

/// Cells chosen for the spawn and the goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnGoal {
    /// Cell holding the spawn tile.
    pub spawn: CellCoord,
    /// Cell holding the goal tile.
    pub goal: CellCoord,
}

/// Draws the spawn from one end of the level and the goal from the other.
///
/// Both ends span [`GenerationParameters::spawn_area_columns`] columns. The
/// spawn sits on the left with probability `spawn_left_probability`. The spawn
/// column is always removed from the goal candidates, so the two never share
/// a column even when the ends overlap on narrow levels. Each tile is written
/// one row above the ground surface of its column.
pub fn place_spawn_and_goal<R: Rng + ?Sized>(
    grid: &mut Grid,
    params: &GenerationParameters,
    rng: &mut R,
) -> Result<SpawnGoal, GenerationError> {
    let width = grid.columns();
    if width < 2 {
        return Err(ConfigRangeError::WorldTooNarrow { width }.into());
    }
    let area = params.spawn_area_columns().min(width);
    let first_part: Vec<u32> = (0..area).collect();
    let last_part: Vec<u32> = (width - area..width).collect();

    let (spawn_area, goal_area) = if rng.gen::<f64>() < params.spawn_left_probability {
        (first_part, last_part)
    } else {
        (last_part, first_part)
    };

    let spawn_column = *spawn_area
        .choose(rng)
        .ok_or(ConfigRangeError::WorldTooNarrow { width })?;
    let goal_candidates: Vec<u32> = goal_area
        .into_iter()
        .filter(|column| *column != spawn_column)
        .collect();
    let goal_column = *goal_candidates
        .choose(rng)
        .ok_or(GenerationError::NoGoalColumn { spawn_column })?;

    let spawn = place_on_surface(grid, spawn_column, TileKind::Spawn)?;
    let goal = place_on_surface(grid, goal_column, TileKind::Goal)?;
    debug!(?spawn, ?goal, "placed spawn and goal");
    Ok(SpawnGoal { spawn, goal })
}

fn place_on_surface(
    grid: &mut Grid,
    column: u32,
    kind: TileKind,
) -> Result<CellCoord, GenerationError> {
    let surface = query::surface_height(grid, column)?;
    let row = grid
        .row_at_height(surface)
        .ok_or(DegenerateColumn { column })?;
    let cell = CellCoord::new(column, row);
    let _ = grid.set(cell, kind);
    Ok(cell)
}

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tilerun_core::{CellCoord, GenerationParameters, TileKind};
use tilerun_system_enemies::place_enemies;
use tilerun_world::{query, Grid};

fn terrain(heights: &[u32], rows: u32) -> Grid {
    let mut grid = Grid::new(heights.len() as u32, rows);
    for (column, height) in heights.iter().enumerate() {
        for level in 0..*height {
            let row = grid.row_at_height(level).expect("height fits");
            let _ = grid.set(CellCoord::new(column as u32, row), TileKind::Ground);
        }
    }
    grid
}

fn enemy_columns(grid: &Grid) -> Vec<u32> {
    (0..grid.columns())
        .filter(|column| {
            grid.column_from_bottom(*column)
                .any(|tile| tile == TileKind::Enemy)
        })
        .collect()
}

fn enemy_stack(grid: &Grid, column: u32) -> u32 {
    grid.column_from_bottom(column)
        .filter(|tile| *tile == TileKind::Enemy)
        .count() as u32
}

fn always_spawning(width: u32, rows: u32) -> GenerationParameters {
    let mut params = GenerationParameters::for_world(width, rows);
    params.enemy_spawn_probability = 1.0;
    params.enemy_grow_probability = 0.0;
    params
}

#[test]
fn single_width_enemies_leave_a_gap_between_them() {
    let params = always_spawning(10, 8);
    let mut grid = terrain(&[2; 10], 8);
    let placed = place_enemies(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(1));

    assert_eq!(enemy_columns(&grid), vec![1, 3, 5, 7]);
    assert_eq!(placed, 4);
}

#[test]
fn wider_runs_follow_enemy_max_width() {
    let mut params = always_spawning(10, 8);
    params.enemy_max_width = 2;
    let mut grid = terrain(&[2; 10], 8);
    let _ = place_enemies(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(1));

    assert_eq!(enemy_columns(&grid), vec![1, 2, 4, 5, 7, 8]);
}

#[test]
fn steep_neighbours_block_placement() {
    let params = always_spawning(5, 10);
    let mut grid = terrain(&[1, 1, 4, 4, 4], 10);
    let _ = place_enemies(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(2));

    assert!(
        !enemy_columns(&grid).contains(&1) && !enemy_columns(&grid).contains(&2),
        "columns next to a full-budget step stay free"
    );
    assert_eq!(enemy_columns(&grid), vec![3]);
}

#[test]
fn stack_height_respects_the_remaining_budget() {
    let mut params = always_spawning(5, 12);
    params.enemy_grow_probability = 1.0;
    params.max_height_diff = 3;
    let mut grid = terrain(&[2, 3, 3, 3, 3], 12);
    let _ = place_enemies(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(3));

    // Column 1 sits one tile above its left neighbour, leaving two tiles of budget.
    assert_eq!(enemy_stack(&grid, 1), 2);
    assert_eq!(enemy_stack(&grid, 3), 3);
}

#[test]
fn enemies_keep_a_free_row_below_the_top() {
    let mut params = always_spawning(3, 5);
    params.enemy_grow_probability = 1.0;
    let mut grid = terrain(&[3, 3, 3], 5);
    let _ = place_enemies(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(4));

    assert_eq!(enemy_stack(&grid, 1), 1);
    assert_eq!(grid.get(CellCoord::new(1, 0)), Some(TileKind::Air));
}

#[test]
fn impure_columns_are_skipped() {
    let params = always_spawning(6, 8);
    let mut grid = terrain(&[2; 6], 8);
    let _ = grid.set(CellCoord::new(2, 5), TileKind::Coin);
    assert_eq!(query::pure_surface(&grid, 2), None);

    let _ = place_enemies(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(5));

    // Columns 1 to 3 all see the coin inside their window.
    assert_eq!(enemy_columns(&grid), vec![4]);
}

#[test]
fn zero_probability_places_nothing() {
    let mut params = GenerationParameters::default();
    params.enemy_spawn_probability = 0.0;
    let mut grid = terrain(&[3; 75], 20);
    let before = grid.clone();
    let placed = place_enemies(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(6));
    assert_eq!(placed, 0);
    assert_eq!(grid, before);
}

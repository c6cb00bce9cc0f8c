#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level grid storage and the column probes generation stages rely on.

use std::fmt;

use thiserror::Error;
use tilerun_core::{CellCoord, TileKind};

pub use tilerun_core::DegenerateColumn;

/// Rectangular tile grid of a level.
///
/// Tiles are stored row-major with row zero at the top. Every row has the
/// same length by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
}

/// Raised when rows handed to [`Grid::from_rows`] differ in length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("row {row} holds {found} tiles but the first row holds {expected}")]
pub struct RaggedRows {
    /// Index of the first row whose length differs.
    pub row: usize,
    /// Length of the first row.
    pub expected: usize,
    /// Length of the offending row.
    pub found: usize,
}

impl Grid {
    /// Creates a grid of the given size filled with air.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            tiles: vec![TileKind::Air; columns as usize * rows as usize],
        }
    }

    /// Builds a grid from rows listed top to bottom.
    pub fn from_rows(rows: Vec<Vec<TileKind>>) -> Result<Self, RaggedRows> {
        let expected = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(RaggedRows {
                row,
                expected,
                found,
            });
        }

        let row_count = rows.len() as u32;
        Ok(Self {
            columns: expected as u32,
            rows: row_count,
            tiles: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile stored at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell).map(|index| self.tiles[index])
    }

    /// Overwrites the tile at `cell`, returning the previous tile.
    ///
    /// Cells outside the grid are left alone and yield `None`.
    pub fn set(&mut self, cell: CellCoord, kind: TileKind) -> Option<TileKind> {
        let index = self.index(cell)?;
        Some(std::mem::replace(&mut self.tiles[index], kind))
    }

    /// Iterates over the rows from top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[TileKind]> {
        self.tiles.chunks(self.columns.max(1) as usize)
    }

    /// Iterates over the tiles of `column` from the bottom row upward.
    pub fn column_from_bottom(&self, column: u32) -> impl Iterator<Item = TileKind> + '_ {
        let rows = if column < self.columns { self.rows } else { 0 };
        (0..rows)
            .rev()
            .map(move |row| self.tiles[row as usize * self.columns as usize + column as usize])
    }

    /// First cell holding `kind`, scanning rows top to bottom.
    #[must_use]
    pub fn find(&self, kind: TileKind) -> Option<CellCoord> {
        let width = self.columns as usize;
        self.tiles
            .iter()
            .position(|tile| *tile == kind)
            .map(|index| CellCoord::new((index % width) as u32, (index / width) as u32))
    }

    /// Number of tiles of `kind` in the grid.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| **tile == kind).count()
    }

    /// Replaces a coin with air, reporting whether a coin was collected.
    pub fn collect_coin(&mut self, cell: CellCoord) -> bool {
        match self.get(cell) {
            Some(TileKind::Coin) => self.set(cell, TileKind::Air).is_some(),
            _ => false,
        }
    }

    /// Converts a height counted from the bottom into a row index.
    ///
    /// Height zero is the bottom row. Heights at or above the grid yield `None`.
    #[must_use]
    pub fn row_at_height(&self, height: u32) -> Option<u32> {
        (height < self.rows).then(|| self.rows - 1 - height)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            Some(cell.row() as usize * self.columns as usize + cell.column() as usize)
        } else {
            None
        }
    }
}

/// Renders rows as space separated reserved ids, top row first.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.iter_rows().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for (column, tile) in row.iter().enumerate() {
                if column > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", tile.reserved_id())?;
            }
        }
        Ok(())
    }
}

/// Read-only probes over a [`Grid`].
pub mod query {
    use tilerun_core::{ProbeMode, Surface, TileKind};

    use super::{DegenerateColumn, Grid};

    /// Probes `column` from the bottom upward.
    ///
    /// Ground tiles are always counted. In [`ProbeMode::GroundOnly`] the
    /// first tile of another kind ends the probe; in [`ProbeMode::AnyTile`]
    /// only air does. A column that never ends the probe, including a column
    /// outside the grid, has [`Surface::NoSurface`].
    #[must_use]
    pub fn height_level(grid: &Grid, column: u32, mode: ProbeMode) -> Surface {
        let mut height = 0;
        for tile in grid.column_from_bottom(column) {
            let terminates = match (tile, mode) {
                (TileKind::Ground, _) => false,
                (TileKind::Air, _) | (_, ProbeMode::GroundOnly) => true,
                (_, ProbeMode::AnyTile) => false,
            };
            if terminates {
                return Surface::Height(height);
            }
            height += 1;
        }
        Surface::NoSurface
    }

    /// Number of ground tiles stacked from the bottom of `column`.
    pub fn surface_height(grid: &Grid, column: u32) -> Result<u32, DegenerateColumn> {
        height_level(grid, column, ProbeMode::GroundOnly)
            .height()
            .ok_or(DegenerateColumn { column })
    }

    /// Height of the first free tile above everything stacked in `column`.
    pub fn occupied_height(grid: &Grid, column: u32) -> Result<u32, DegenerateColumn> {
        height_level(grid, column, ProbeMode::AnyTile)
            .height()
            .ok_or(DegenerateColumn { column })
    }

    /// Ground height of `column` when nothing but ground sits below its first
    /// air tile.
    ///
    /// Returns `None` for impure columns, solid columns, and columns outside
    /// the grid.
    #[must_use]
    pub fn pure_surface(grid: &Grid, column: u32) -> Option<u32> {
        let ground = height_level(grid, column, ProbeMode::GroundOnly);
        let any = height_level(grid, column, ProbeMode::AnyTile);
        if ground == any {
            ground.height()
        } else {
            None
        }
    }

    /// Pure surface heights of the columns left of, at, and right of `column`.
    ///
    /// Generation stages sweep this window across the level to decide where
    /// features may go.
    #[must_use]
    pub fn surface_window(grid: &Grid, column: u32) -> [Option<u32>; 3] {
        let previous = column.checked_sub(1).and_then(|left| pure_surface(grid, left));
        let next = column
            .checked_add(1)
            .and_then(|right| pure_surface(grid, right));
        [previous, pure_surface(grid, column), next]
    }
}

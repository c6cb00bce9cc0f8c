//! Reading and writing the sectioned level text.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use tilerun_core::{BlockMapping, TileId, TileKind};
use tilerun_world::Grid;
use tracing::{debug, warn};

use crate::{LevelFile, LevelFormatError};

const SECTION_MARKER: char = '!';
const COMMENT_MARKER: char = '#';

#[derive(Clone, Debug, PartialEq, Eq)]
enum Section {
    Preamble,
    Info,
    Blocks,
    BlockGfx,
    World,
    Unknown,
}

impl Section {
    fn from_marker(name: &str) -> Self {
        match name {
            "info" => Self::Info,
            "blocks" => Self::Blocks,
            "blockgfx" => Self::BlockGfx,
            "world" => Self::World,
            _ => Self::Unknown,
        }
    }
}

/// Renders `level` in the level file format.
///
/// Sections are written in the order `!info`, `!blocks`, `!blockgfx`,
/// `!world`. Info keys are sorted and blocks are listed by ascending id. The
/// text ends with a newline after the last grid row.
pub fn encode(level: &LevelFile) -> Result<String, LevelFormatError> {
    let ids: HashMap<TileKind, TileId> = TileKind::ALL
        .into_iter()
        .filter_map(|kind| level.blocks.id_for(kind).map(|id| (kind, id)))
        .collect();

    let mut text = String::new();
    text.push_str("!info\n");
    for (key, value) in &level.info {
        let _ = writeln!(text, "{key}={value}");
    }
    text.push_str("!blocks\n");
    for (name, id) in level.blocks.iter() {
        let _ = writeln!(text, "{name}={id}");
    }
    text.push_str("!blockgfx\n");
    for (id, path) in &level.block_gfx {
        let _ = writeln!(text, "{id}={path}");
    }
    text.push_str("!world\n");
    for (index, row) in level.grid.iter_rows().enumerate() {
        if index > 0 {
            text.push('\n');
        }
        for (column, kind) in row.iter().enumerate() {
            let id = ids
                .get(kind)
                .ok_or(LevelFormatError::Unmapped { kind: *kind })?;
            if column > 0 {
                text.push(' ');
            }
            let _ = write!(text, "{id}");
        }
    }
    text.push('\n');
    Ok(text)
}

/// Parses level file text.
///
/// Empty lines, lines starting with `#`, and lines before the first section
/// marker are ignored. Lines inside unknown sections are skipped with a
/// warning. Block names are upcased. A file without block entries uses the
/// reserved ids.
pub fn decode(text: &str) -> Result<LevelFile, LevelFormatError> {
    let mut section = Section::Preamble;
    let mut info = BTreeMap::new();
    let mut blocks = BlockMapping::new();
    let mut block_gfx = BTreeMap::new();
    let mut world: Vec<(usize, Vec<TileId>)> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim_end_matches('\r');
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }
        if let Some(name) = line.strip_prefix(SECTION_MARKER) {
            section = Section::from_marker(name);
            if section == Section::Unknown {
                warn!(line = line_number, section = name, "skipping unknown level section");
            }
            continue;
        }

        match section {
            Section::Preamble | Section::Unknown => {}
            Section::Info => {
                let (key, value) = split_pair(line, line_number)?;
                let _ = info.insert(key.to_owned(), value.to_owned());
            }
            Section::Blocks => {
                let (name, id) = split_pair(line, line_number)?;
                let id = parse_id(id, line_number)?;
                blocks
                    .insert(name, id)
                    .map_err(|error| format_error(line_number, error.to_string()))?;
            }
            Section::BlockGfx => {
                let (id, path) = split_pair(line, line_number)?;
                let _ = block_gfx.insert(parse_id(id, line_number)?, path.to_owned());
            }
            Section::World => {
                let row = line
                    .split_whitespace()
                    .map(|cell| parse_id(cell, line_number))
                    .collect::<Result<Vec<_>, _>>()?;
                world.push((line_number, row));
            }
        }
    }

    if blocks.is_empty() {
        blocks = BlockMapping::reserved();
    }
    let grid = resolve_grid(&blocks, world)?;
    Ok(LevelFile {
        info,
        blocks,
        block_gfx,
        grid,
    })
}

/// Writes `level` to `path`.
///
/// Fails with [`LevelFormatError::FileExists`] when `path` exists and
/// `overwrite` is false; the existing file is left untouched. The text is
/// written to a sibling temporary file first and then renamed into place.
pub fn save(level: &LevelFile, path: &Path, overwrite: bool) -> Result<(), LevelFormatError> {
    if !overwrite && path.exists() {
        return Err(LevelFormatError::FileExists {
            path: path.to_path_buf(),
        });
    }

    let text = encode(level)?;
    let staging = staging_path(path);
    fs::write(&staging, text).map_err(|source| LevelFormatError::Io {
        path: staging.clone(),
        source,
    })?;
    if let Err(source) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(LevelFormatError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    debug!(path = %path.display(), "saved level");
    Ok(())
}

/// Reads and parses the level stored at `path`.
pub fn load(path: &Path) -> Result<LevelFile, LevelFormatError> {
    let text = fs::read_to_string(path).map_err(|source| LevelFormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let level = decode(&text)?;
    debug!(
        path = %path.display(),
        columns = level.grid.columns(),
        rows = level.grid.rows(),
        "loaded level"
    );
    Ok(level)
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

fn split_pair(line: &str, line_number: usize) -> Result<(&str, &str), LevelFormatError> {
    line.split_once('=')
        .ok_or_else(|| format_error(line_number, format!("expected key=value, found `{line}`")))
}

fn parse_id(value: &str, line_number: usize) -> Result<TileId, LevelFormatError> {
    value
        .trim()
        .parse::<i32>()
        .map(TileId::new)
        .map_err(|_| format_error(line_number, format!("`{value}` is not a block id")))
}

fn resolve_grid(
    blocks: &BlockMapping,
    world: Vec<(usize, Vec<TileId>)>,
) -> Result<Grid, LevelFormatError> {
    let mut lines = Vec::with_capacity(world.len());
    let mut rows = Vec::with_capacity(world.len());
    for (line_number, ids) in world {
        let row = ids
            .into_iter()
            .map(|id| {
                blocks.kind_of(id).ok_or_else(|| {
                    format_error(line_number, format!("block id {id} is not a tile"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        lines.push(line_number);
        rows.push(row);
    }

    Grid::from_rows(rows).map_err(|ragged| {
        let line = lines.get(ragged.row).copied().unwrap_or_default();
        format_error(line, ragged.to_string())
    })
}

fn format_error(line: usize, message: String) -> LevelFormatError {
    LevelFormatError::Format { line, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_comments_and_unknown_sections_are_ignored() {
        let text = "\
stray text before any section
!info
# a comment
name=demo

!palette
red=ff0000
!blocks
air=0
Ground=1
!world
1 0
1 1
";
        let level = decode(text).expect("level parses");
        assert_eq!(level.info.get("name").map(String::as_str), Some("demo"));
        assert_eq!(level.info.len(), 1);
        assert_eq!(level.blocks.id_of("GROUND"), Some(TileId::new(1)));
        assert_eq!(level.blocks.name_of(TileId::new(0)), Some("AIR"));
        assert_eq!(level.grid.to_string(), "1 0\n1 1");
    }

    #[test]
    fn renumbered_blocks_resolve_through_the_mapping() {
        let text = "!blocks\nAIR=7\nGROUND=3\n!world\n7 7\n3 3\n";
        let level = decode(text).expect("level parses");
        assert_eq!(level.grid.to_string(), "0 0\n1 1");
        assert_eq!(
            encode(&level).expect("encodes"),
            "!info\n!blocks\nGROUND=3\nAIR=7\n!blockgfx\n!world\n7 7\n3 3\n"
        );
    }

    #[test]
    fn missing_blocks_section_falls_back_to_reserved_ids() {
        let level = decode("!info\njump=1\n!world\n0 0\n4 5\n1 1\n").expect("level parses");
        assert_eq!(level.blocks, BlockMapping::reserved());
        assert_eq!(level.grid.find(TileKind::Spawn), Some(tilerun_core::CellCoord::new(0, 1)));
        assert_eq!(level.grid.find(TileKind::Goal), Some(tilerun_core::CellCoord::new(1, 1)));
        assert_eq!(level.grid.count(TileKind::Ground), 2);
    }

    #[test]
    fn info_values_keep_everything_after_the_first_separator() {
        let level = decode("!info\nmotto=a=b\n!world\n").expect("level parses");
        assert_eq!(level.info.get("motto").map(String::as_str), Some("a=b"));
        assert_eq!(level.grid.rows(), 0);
    }

    #[test]
    fn malformed_lines_report_their_line_number() {
        let error = decode("!info\nmissing separator\n").expect_err("rejects");
        assert!(matches!(error, LevelFormatError::Format { line: 2, .. }));

        let error = decode("!blocks\nAIR=zero\n").expect_err("rejects");
        assert!(matches!(error, LevelFormatError::Format { line: 2, .. }));

        let error = decode("!blockgfx\nx=gfx/a.png\n").expect_err("rejects");
        assert!(matches!(error, LevelFormatError::Format { line: 2, .. }));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let text = "!blocks\nAIR=0\nGROUND=1\n!world\n0 0 0\n\n1 1\n";
        let error = decode(text).expect_err("rejects");
        assert!(matches!(error, LevelFormatError::Format { line: 7, .. }));
    }

    #[test]
    fn ids_without_a_tile_kind_are_rejected() {
        let text = "!blocks\nAIR=0\nPLAYER=-1\n!world\n0 -1\n";
        let error = decode(text).expect_err("rejects");
        assert!(matches!(error, LevelFormatError::Format { line: 5, .. }));

        let error = decode("!blocks\nAIR=0\n!world\n0 9\n").expect_err("rejects");
        assert!(matches!(error, LevelFormatError::Format { line: 4, .. }));
    }

    #[test]
    fn conflicting_block_entries_are_rejected() {
        let error = decode("!blocks\nAIR=0\nGROUND=0\n").expect_err("rejects");
        assert!(matches!(error, LevelFormatError::Format { line: 3, .. }));
    }

    #[test]
    fn encode_requires_an_id_for_every_tile_in_the_grid() {
        let mut grid = Grid::new(1, 1);
        let _ = grid.set(tilerun_core::CellCoord::new(0, 0), TileKind::Coin);
        let mut level = LevelFile::new(BTreeMap::new(), grid);
        level.blocks = BlockMapping::new();
        level.blocks.insert("AIR", TileId::new(0)).expect("insert");

        assert!(matches!(
            encode(&level),
            Err(LevelFormatError::Unmapped {
                kind: TileKind::Coin
            })
        ));
    }
}

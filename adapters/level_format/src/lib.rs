#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text level files shared between the generator and the play loop.
//!
//! A level file is a sequence of `!name` sections:
//!
//! ```text
//! !info
//! jump=1
//! !blocks
//! AIR=0
//! !blockgfx
//! 1=gfx/ground/grass.png
//! !world
//! 0 0 0
//! 1 1 1
//! ```
//!
//! The `!world` rows list tile ids top row first. Ids are resolved through the
//! `!blocks` mapping, so a file may renumber its blocks freely.

mod codec;
mod settings;

use std::{collections::BTreeMap, path::PathBuf};

use thiserror::Error;
use tilerun_core::{BlockMapping, TileId, TileKind, PLAYER_SPRITE_ID};
use tilerun_world::Grid;

pub use codec::{decode, encode, load, save};
pub use settings::{InfoValue, LevelSettings, SettingError};

/// Directory searched for default tile graphics.
pub const GFX_ROOT: &str = "gfx";

/// File name of the default graphic inside each tile directory.
pub const PRIMITIVE_GRAPHIC: &str = "primitive.png";

/// Name used for the player sprite in graphic lookups.
const PLAYER_GRAPHIC_NAME: &str = "player";

/// Contents of a level file.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelFile {
    /// Free-form settings as raw strings, keyed by name.
    pub info: BTreeMap<String, String>,
    /// Block names and the ids that represent them in the grid.
    pub blocks: BlockMapping,
    /// Graphic overrides keyed by block id.
    pub block_gfx: BTreeMap<TileId, String>,
    /// Tile grid, top row first.
    pub grid: Grid,
}

impl LevelFile {
    /// Level using the reserved block ids and no graphic overrides.
    #[must_use]
    pub fn new(info: BTreeMap<String, String>, grid: Grid) -> Self {
        Self {
            info,
            blocks: BlockMapping::reserved(),
            block_gfx: BTreeMap::new(),
            grid,
        }
    }

    /// Typed view over the `!info` section with play defaults applied.
    pub fn settings(&self) -> Result<LevelSettings, SettingError> {
        LevelSettings::from_info(&self.info)
    }

    /// Graphic for the block called `name`.
    ///
    /// Falls back to `gfx/<lowercase name>/primitive.png` when the block has no
    /// override or the name is not in the mapping.
    #[must_use]
    pub fn graphic_path(&self, name: &str) -> String {
        self.blocks
            .id_of(name)
            .and_then(|id| self.block_gfx.get(&id))
            .cloned()
            .unwrap_or_else(|| default_graphic_path(name))
    }

    /// Graphic for the player sprite.
    #[must_use]
    pub fn player_graphic_path(&self) -> String {
        self.block_gfx
            .get(&PLAYER_SPRITE_ID)
            .cloned()
            .unwrap_or_else(|| default_graphic_path(PLAYER_GRAPHIC_NAME))
    }
}

fn default_graphic_path(name: &str) -> String {
    format!(
        "{GFX_ROOT}/{}/{PRIMITIVE_GRAPHIC}",
        name.to_ascii_lowercase()
    )
}

/// Failures raised while reading or writing level files.
#[derive(Debug, Error)]
pub enum LevelFormatError {
    /// The target exists and overwriting was not requested.
    #[error("level file {} already exists", path.display())]
    FileExists {
        /// Path that was about to be written.
        path: PathBuf,
    },
    /// The file system rejected a read or write.
    #[error("i/o error on {}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A line could not be interpreted.
    #[error("line {line}: {message}")]
    Format {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },
    /// The grid holds a tile the block mapping has no id for.
    #[error("block mapping has no id for {kind:?} tiles")]
    Unmapped {
        /// Tile kind that could not be written.
        kind: TileKind,
    },
}

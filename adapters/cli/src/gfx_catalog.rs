use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rand::{seq::SliceRandom, Rng};
use tilerun_core::{BlockMapping, TileId};

const GRAPHIC_EXTENSION: &str = "png";

/// Tile graphics found on disk, grouped by the directory they live in.
///
/// Each subdirectory of the root names a block in lowercase (`ground`,
/// `coin`, `player`) and holds the alternative graphics for it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct GfxCatalog {
    graphics: BTreeMap<String, Vec<PathBuf>>,
}

impl GfxCatalog {
    /// Scans `root` for `.png` files one directory deep.
    ///
    /// A missing root yields an empty catalog. Directories without graphics
    /// are left out.
    pub(crate) fn discover(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Ok(Self::default());
        }

        let mut graphics = BTreeMap::new();
        let entries = fs::read_dir(root)
            .with_context(|| format!("failed to list graphics in {}", root.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("failed to read an entry of {}", root.display()))?;
            let directory = entry.path();
            if !directory.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
            let files = png_files(&directory)?;
            if !files.is_empty() {
                let _ = graphics.insert(name, files);
            }
        }

        Ok(Self { graphics })
    }

    /// Alternatives available for the block called `name`, in path order.
    pub(crate) fn graphics_for(&self, name: &str) -> &[PathBuf] {
        self.graphics
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Picks one graphic per mapped block that has alternatives on disk.
    pub(crate) fn choose_overrides<R: Rng + ?Sized>(
        &self,
        blocks: &BlockMapping,
        rng: &mut R,
    ) -> BTreeMap<TileId, String> {
        blocks
            .iter()
            .filter_map(|(name, id)| {
                self.graphics_for(name)
                    .choose(rng)
                    .map(|path| (id, path.to_string_lossy().into_owned()))
            })
            .collect()
    }

    /// Number of blocks with at least one graphic.
    pub(crate) fn len(&self) -> usize {
        self.graphics.len()
    }
}

fn png_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = fs::read_dir(directory)
        .with_context(|| format!("failed to list graphics in {}", directory.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read an entry of {}", directory.display()))?
            .path();
        let is_png = path
            .extension()
            .is_some_and(|extension| extension == GRAPHIC_EXTENSION);
        if path.is_file() && is_png {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

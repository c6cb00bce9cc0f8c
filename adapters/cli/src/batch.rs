use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tilerun_core::GenerationParameters;
use tilerun_level_format::{save, LevelFile};
use tilerun_system_generation::generate_level;
use tracing::info;

use crate::gfx_catalog::GfxCatalog;

/// Placeholder in the naming template replaced by the level index.
const INDEX_PLACEHOLDER: &str = "{}";

/// What to do when a level file already exists at the target path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ConflictPolicy {
    /// Abort the batch.
    #[default]
    Fail,
    /// Leave the existing file and move on to the next index.
    Skip,
    /// Replace the existing file.
    Overwrite,
}

/// Settings for one batch run.
#[derive(Clone, Debug)]
pub(crate) struct BatchOptions {
    pub(crate) count: u32,
    pub(crate) naming_template: String,
    pub(crate) randomize_params: bool,
    pub(crate) randomize_gfx: bool,
    pub(crate) conflict: ConflictPolicy,
    pub(crate) seed: u64,
    pub(crate) base_parameters: GenerationParameters,
    pub(crate) print_worlds: bool,
    pub(crate) gfx_catalog: GfxCatalog,
}

/// Files touched by a batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BatchReport {
    pub(crate) written: Vec<PathBuf>,
    pub(crate) skipped: Vec<PathBuf>,
}

/// Generates `count` levels and writes each to its templated path.
///
/// Every index draws from its own ChaCha8 stream of the batch seed, so a
/// level depends only on the seed and its index. The first failure aborts
/// the batch.
pub(crate) fn generate_many_worlds(options: &BatchOptions) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    for index in 0..options.count {
        let path = level_path(&options.naming_template, index);
        if options.conflict == ConflictPolicy::Skip && path.exists() {
            info!(path = %path.display(), "keeping existing level");
            report.skipped.push(path);
            continue;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
        rng.set_stream(u64::from(index));

        let params = if options.randomize_params {
            options.base_parameters.randomized(&mut rng)
        } else {
            options.base_parameters.clone()
        };
        let generated = generate_level(&params, &mut rng)
            .with_context(|| format!("failed to generate level {index}"))?;
        if options.print_worlds {
            println!("{}", generated.grid());
        }

        let mut level = LevelFile::new(generated.info(), generated.into_grid());
        if options.randomize_gfx {
            level.block_gfx = options.gfx_catalog.choose_overrides(&level.blocks, &mut rng);
        }

        ensure_parent(&path)?;
        save(&level, &path, options.conflict == ConflictPolicy::Overwrite)
            .with_context(|| format!("failed to write level {index}"))?;
        info!(
            index,
            path = %path.display(),
            width = params.world_width,
            "wrote level"
        );
        report.written.push(path);
    }
    Ok(report)
}

fn level_path(template: &str, index: u32) -> PathBuf {
    PathBuf::from(template.replace(INDEX_PLACEHOLDER, &index.to_string()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display())),
        _ => Ok(()),
    }
}

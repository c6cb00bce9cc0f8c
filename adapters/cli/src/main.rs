#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates and inspects Tilerun levels.

mod batch;
mod config;
mod gfx_catalog;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tilerun_core::{GenerationParameters, TileKind};
use tilerun_level_format::load;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    batch::{generate_many_worlds, BatchOptions, ConflictPolicy},
    config::ParameterOverrides,
    gfx_catalog::GfxCatalog,
};

/// Procedural platformer level generator.
#[derive(Debug, Parser)]
#[command(name = "tilerun", version)]
struct Cli {
    /// Raise the log level; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a batch of levels.
    Generate(GenerateArgs),
    /// Print a level file.
    Show {
        /// Level file to inspect.
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Number of levels to generate.
    #[arg(long, default_value_t = 1000)]
    count: u32,

    /// Output path; `{}` is replaced by the level index.
    #[arg(long, default_value = "levels/training_{}.txt")]
    template: String,

    /// Redraw width, height budget, and difficulty knobs for every level.
    #[arg(long)]
    randomize_params: bool,

    /// Pick a random graphic per block from the graphics directory.
    #[arg(long)]
    randomize_gfx: bool,

    /// Directory holding one subdirectory of `.png` files per block.
    #[arg(long, default_value = "gfx")]
    gfx_dir: PathBuf,

    /// What to do when a level file already exists.
    #[arg(long, value_enum, default_value_t = ConflictPolicy::Fail)]
    on_conflict: ConflictPolicy,

    /// Batch seed; a random one is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding generation parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every generated grid to stdout.
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Show { path } => show(&path),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn generate(args: GenerateArgs) -> Result<()> {
    let base_parameters = match &args.config {
        Some(path) => ParameterOverrides::load(path)?.apply(),
        None => GenerationParameters::default(),
    };
    base_parameters
        .validate()
        .context("generation parameters are out of range")?;

    let gfx_catalog = if args.randomize_gfx {
        let catalog = GfxCatalog::discover(&args.gfx_dir)?;
        debug!(blocks = catalog.len(), dir = %args.gfx_dir.display(), "discovered graphics");
        catalog
    } else {
        GfxCatalog::default()
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, count = args.count, "generating levels");

    let report = generate_many_worlds(&BatchOptions {
        count: args.count,
        naming_template: args.template,
        randomize_params: args.randomize_params,
        randomize_gfx: args.randomize_gfx,
        conflict: args.on_conflict,
        seed,
        base_parameters,
        print_worlds: args.print,
        gfx_catalog,
    })?;

    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "batch finished"
    );
    Ok(())
}

fn show(path: &Path) -> Result<()> {
    let level = load(path).with_context(|| format!("failed to load {}", path.display()))?;
    let settings = level
        .settings()
        .with_context(|| format!("invalid settings in {}", path.display()))?;

    println!("{}", path.display());
    println!(
        "size {}x{}, jump {} (height {}, width {}), score position {:?}",
        level.grid.columns(),
        level.grid.rows(),
        settings.jump,
        settings.jump_height,
        settings.jump_width,
        settings.score_position
    );
    for (label, kind) in [("spawn", TileKind::Spawn), ("goal", TileKind::Goal)] {
        match level.grid.find(kind) {
            Some(cell) => println!("{label} at column {}, row {}", cell.column(), cell.row()),
            None => println!("{label} missing"),
        }
    }
    println!(
        "{} enemies, {} coins",
        level.grid.count(TileKind::Enemy),
        level.grid.count(TileKind::Coin)
    );
    println!("{}", level.grid);
    Ok(())
}

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use tilerun_core::{GenerationParameters, ScorePosition};

/// Parameter file whose keys mirror [`GenerationParameters`], all optional.
///
/// Sizes are applied first so the terrain ceiling follows the configured
/// height unless the file sets it explicitly.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ParameterOverrides {
    jump: Option<u32>,
    jump_height: Option<u32>,
    jump_width: Option<u32>,
    score_position: Option<ScorePosition>,
    world_width: Option<u32>,
    world_height: Option<u32>,
    max_height_diff: Option<u32>,
    max_terrain_height: Option<u32>,
    height_change_probability: Option<f64>,
    height_up_probability: Option<f64>,
    height_down_factor: Option<f64>,
    enemy_spawn_probability: Option<f64>,
    enemy_max_width: Option<u32>,
    enemy_max_height: Option<u32>,
    enemy_grow_probability: Option<f64>,
    spawn_area_fraction: Option<f64>,
    spawn_left_probability: Option<f64>,
    coin_spawn_probability: Option<f64>,
}

impl ParameterOverrides {
    /// Reads and parses the TOML file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read parameter file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse parameter file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid parameter toml")
    }

    /// Parameters with every present key applied over the defaults.
    pub(crate) fn apply(&self) -> GenerationParameters {
        let defaults = GenerationParameters::default();
        let mut params = GenerationParameters::for_world(
            self.world_width.unwrap_or(defaults.world_width),
            self.world_height.unwrap_or(defaults.world_height),
        );

        macro_rules! overlay {
            ($($field:ident),+ $(,)?) => {
                $(
                    if let Some(value) = self.$field {
                        params.$field = value;
                    }
                )+
            };
        }
        overlay!(
            jump,
            jump_height,
            jump_width,
            score_position,
            max_height_diff,
            max_terrain_height,
            height_change_probability,
            height_up_probability,
            height_down_factor,
            enemy_spawn_probability,
            enemy_max_width,
            enemy_max_height,
            enemy_grow_probability,
            spawn_area_fraction,
            spawn_left_probability,
            coin_spawn_probability,
        );
        params
    }
}

//! Typed view over the free-form `!info` section.

use std::{collections::BTreeMap, fmt};

use thiserror::Error;
use tilerun_core::{ScorePosition, BLOCK_SIZE};

/// An info value coerced to the narrowest type it parses as.
#[derive(Clone, Debug, PartialEq)]
pub enum InfoValue {
    /// Whole number.
    Integer(i64),
    /// Number with a fractional part or exponent.
    Float(f64),
    /// Anything else, kept verbatim.
    Text(String),
}

impl InfoValue {
    /// Tries an integer, then a float, and keeps the raw text otherwise.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if let Ok(value) = raw.parse::<i64>() {
            return Self::Integer(value);
        }
        if let Ok(value) = raw.parse::<f64>() {
            return Self::Float(value);
        }
        Self::Text(raw.to_owned())
    }

    /// Integer held by the value; floats qualify when they have no fractional part.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) if value.fract() == 0.0 && value.is_finite() => Some(*value as i64),
            _ => None,
        }
    }
}

impl fmt::Display for InfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Reasons an info section cannot be turned into [`LevelSettings`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SettingError {
    /// A known setting holds something other than a whole number.
    #[error("setting `{key}` expects a whole number, found `{value}`")]
    NotAnInteger {
        /// Setting name.
        key: &'static str,
        /// Value as written in the file.
        value: String,
    },
    /// A whole number lies outside the range the setting accepts.
    #[error("setting `{key}` = {value} is out of range")]
    OutOfRange {
        /// Setting name.
        key: &'static str,
        /// Offending value.
        value: i64,
    },
}

/// Play settings of a level, with defaults for every key the file omits.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelSettings {
    /// Edge length of a tile in pixels.
    pub blocksize: u32,
    /// Jumps allowed before touching ground again.
    pub jump: u32,
    /// Rows ascended per jump.
    pub jump_height: u32,
    /// Ticks spent hovering at the top of a jump.
    pub jump_width: u32,
    /// Where the score is drawn.
    pub score_position: ScorePosition,
    /// Score at the start of the level.
    pub starting_score: i64,
    /// Points gained per coin.
    pub coin_worth: i64,
    /// Points gained (usually lost) per death.
    pub death_worth: i64,
    /// Points gained for reaching the goal.
    pub goal_worth: i64,
    /// Every info entry that is not one of the settings above.
    pub extra: BTreeMap<String, InfoValue>,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            blocksize: BLOCK_SIZE,
            jump: 1,
            jump_height: 3,
            jump_width: 3,
            score_position: ScorePosition::Left,
            starting_score: 0,
            coin_worth: 5,
            death_worth: -10,
            goal_worth: 100,
            extra: BTreeMap::new(),
        }
    }
}

impl LevelSettings {
    /// Coerces the raw info section, filling in defaults for missing keys.
    pub fn from_info(info: &BTreeMap<String, String>) -> Result<Self, SettingError> {
        let mut settings = Self::default();
        for (key, raw) in info {
            let value = InfoValue::parse(raw);
            match key.as_str() {
                "blocksize" => settings.blocksize = unsigned("blocksize", &value)?,
                "jump" => settings.jump = unsigned("jump", &value)?,
                "jump_height" => settings.jump_height = unsigned("jump_height", &value)?,
                "jump_width" => settings.jump_width = unsigned("jump_width", &value)?,
                "score_position" => {
                    let code = integer("score_position", &value)?;
                    settings.score_position = i32::try_from(code)
                        .ok()
                        .and_then(ScorePosition::from_i32)
                        .ok_or(SettingError::OutOfRange {
                            key: "score_position",
                            value: code,
                        })?;
                }
                "starting_score" => settings.starting_score = integer("starting_score", &value)?,
                "coin_worth" => settings.coin_worth = integer("coin_worth", &value)?,
                "death_worth" => settings.death_worth = integer("death_worth", &value)?,
                "goal_worth" => settings.goal_worth = integer("goal_worth", &value)?,
                _ => {
                    let _ = settings.extra.insert(key.clone(), value);
                }
            }
        }
        Ok(settings)
    }
}

fn integer(key: &'static str, value: &InfoValue) -> Result<i64, SettingError> {
    value.as_integer().ok_or_else(|| SettingError::NotAnInteger {
        key,
        value: value.to_string(),
    })
}

fn unsigned(key: &'static str, value: &InfoValue) -> Result<u32, SettingError> {
    let whole = integer(key, value)?;
    u32::try_from(whole).map_err(|_| SettingError::OutOfRange { key, value: whole })
}

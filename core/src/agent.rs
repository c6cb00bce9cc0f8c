//! Data contract between a play loop and an external decision process.
//!
//! Once per tick the play loop asks the agent for an [`Action`] and pushes
//! back an [`Observation`]. The observation travels as a table-constructor
//! record (`{score=5, worldname="levels/a.txt", ...}`) so that scripting
//! runtimes can evaluate it directly.

use std::{collections::VecDeque, fmt::Write as _};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Positions retained by [`PositionHistory`].
pub const POSITION_HISTORY_LENGTH: usize = 10;
/// Positions required before [`PositionHistory::trend`] reports a value.
pub const MIN_TREND_WINDOW: usize = 5;

/// Discrete actions an agent may request for a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Stand still.
    #[default]
    NoAction,
    /// Move one column left.
    Left,
    /// Move one column right.
    Right,
    /// Start a jump.
    Jump,
}

/// Raised when an agent answers with an integer outside the action set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("agent returned unknown action {0}")]
pub struct UnknownAction(pub i64);

impl Action {
    /// Wire encoding of the action.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::NoAction => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Jump => 3,
        }
    }
}

impl TryFrom<i64> for Action {
    type Error = UnknownAction;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoAction),
            1 => Ok(Self::Left),
            2 => Ok(Self::Right),
            3 => Ok(Self::Jump),
            other => Err(UnknownAction(other)),
        }
    }
}

/// Bounded window of recent player x positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionHistory {
    positions: VecDeque<i64>,
}

impl PositionHistory {
    /// Starts a history at the spawn column.
    #[must_use]
    pub fn starting_at(x: i64) -> Self {
        let mut history = Self::default();
        history.record(x);
        history
    }

    /// Appends a position, evicting the oldest once the window is full.
    pub fn record(&mut self, x: i64) {
        self.positions.push_back(x);
        while self.positions.len() > POSITION_HISTORY_LENGTH {
            let _ = self.positions.pop_front();
        }
    }

    /// Number of positions currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Reports whether no position has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Net x movement over the window divided by the window length.
    ///
    /// Positive values mean the player drifts right. `None` until
    /// [`MIN_TREND_WINDOW`] positions were recorded.
    #[must_use]
    pub fn trend(&self) -> Option<f64> {
        if self.positions.len() < MIN_TREND_WINDOW {
            return None;
        }
        let moved: i64 = self
            .positions
            .iter()
            .zip(self.positions.iter().skip(1))
            .map(|(before, after)| after - before)
            .sum();
        Some(moved as f64 / self.positions.len() as f64)
    }
}

/// Per-tick state pushed to the agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Current score.
    pub score: i64,
    /// Player column.
    pub x: i64,
    /// Goal column minus player column.
    pub x_distance_to_goal: i64,
    /// Deaths since the play loop started.
    pub death_count: u32,
    /// Levels finished since the play loop started.
    pub levels_beaten: u32,
    /// Path of the level being played.
    pub world_name: String,
    /// Short-window x-movement trend; absent while the window is too short.
    pub movement_trend: Option<f64>,
}

impl Observation {
    /// Renders the observation as a table-constructor record.
    #[must_use]
    pub fn to_record(&self) -> String {
        let mut record = String::from("{");
        push_number(&mut record, "score", self.score);
        push_number(&mut record, "x", self.x);
        push_number(&mut record, "xDistanceToGoal", self.x_distance_to_goal);
        push_number(&mut record, "deathCount", self.death_count);
        push_number(&mut record, "levelBeatenCount", self.levels_beaten);
        let quoted = self.world_name.replace('\\', "\\\\").replace('"', "\\\"");
        let _ = write!(record, "worldname=\"{quoted}\", ");
        match self.movement_trend {
            Some(trend) => push_number(&mut record, "historyMoveSum", trend),
            None => record.push_str("historyMoveSum=nil, "),
        }
        record.push('}');
        record
    }
}

fn push_number(record: &mut String, key: &str, value: impl std::fmt::Display) {
    let _ = write!(record, "{key}={value}, ");
}

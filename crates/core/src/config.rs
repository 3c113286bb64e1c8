//! Game configuration supplied at start time.
//!
//! Every field has a documented default, and missing fields fall back to it when the
//! config is deserialized, so a partial JSON document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::grid::{HEIGHT_RANGE, WIDTH_RANGE};
use crate::types::{
    DEFAULT_ARR_TICKS, DEFAULT_DAS_TICKS, DROP_TIME_MS, GRID_HEIGHT, GRID_WIDTH, SPEED_DROP_TIME_MS,
    SPRINT_LINES,
};

/// Sprint parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Lines to clear to finish the sprint
    pub sprint_lines: u32,
    pub grid_width: u8,
    /// Total rows including the spawn buffer
    pub grid_height: u8,
    pub use_ghost_piece: bool,
    /// Ticks a direction must be held before auto-repeat starts
    pub delayed_auto_shift: u32,
    /// Ticks between auto-repeat moves
    pub auto_repeat_rate: u32,
    /// Normal fall interval
    pub drop_time_ms: u32,
    /// Fall interval while soft drop is held
    pub speed_drop_time_ms: u32,
    /// Bag seed; `None` lets the caller pick one
    pub seed: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sprint_lines: SPRINT_LINES,
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            use_ghost_piece: true,
            delayed_auto_shift: DEFAULT_DAS_TICKS,
            auto_repeat_rate: DEFAULT_ARR_TICKS,
            drop_time_ms: DROP_TIME_MS,
            speed_drop_time_ms: SPEED_DROP_TIME_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_sprint_lines(mut self, lines: u32) -> Self {
        self.sprint_lines = lines;
        self
    }

    pub fn with_grid(mut self, width: u8, height: u8) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    pub fn with_ghost_piece(mut self, enabled: bool) -> Self {
        self.use_ghost_piece = enabled;
        self
    }

    pub fn with_auto_shift(mut self, das: u32, arr: u32) -> Self {
        self.delayed_auto_shift = das;
        self.auto_repeat_rate = arr;
        self
    }

    pub fn with_drop_times(mut self, drop_ms: u32, speed_drop_ms: u32) -> Self {
        self.drop_time_ms = drop_ms;
        self.speed_drop_time_ms = speed_drop_ms;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sprint_lines == 0 {
            return Err(EngineError::InvalidConfig {
                field: "sprint_lines",
                reason: "must be at least 1",
            });
        }
        if !WIDTH_RANGE.contains(&self.grid_width) {
            return Err(EngineError::InvalidConfig {
                field: "grid_width",
                reason: "must be within 7..=64",
            });
        }
        if !HEIGHT_RANGE.contains(&self.grid_height) {
            return Err(EngineError::InvalidConfig {
                field: "grid_height",
                reason: "must be within 4..=100",
            });
        }
        if self.auto_repeat_rate == 0 {
            return Err(EngineError::InvalidConfig {
                field: "auto_repeat_rate",
                reason: "must be at least 1 tick",
            });
        }
        if self.drop_time_ms == 0 {
            return Err(EngineError::InvalidConfig {
                field: "drop_time_ms",
                reason: "must be positive",
            });
        }
        if self.speed_drop_time_ms == 0 || self.speed_drop_time_ms > self.drop_time_ms {
            return Err(EngineError::InvalidConfig {
                field: "speed_drop_time_ms",
                reason: "must be positive and no slower than drop_time_ms",
            });
        }
        Ok(())
    }
}

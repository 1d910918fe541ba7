use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GameConfig;

/// Preset difficulty offered on new game / restart.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// 10x10 grid, 10 hazards
    #[default]
    Basic,
    /// 15x15 grid, 30 hazards
    Advanced,
}

impl Level {
    pub const ALL: [Level; 2] = [Level::Basic, Level::Advanced];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Basic => GameConfig::new_unchecked(10, 10),
            Self::Advanced => GameConfig::new_unchecked(15, 30),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }

    /// Level whose preset matches `config` exactly, if any.
    pub fn matching(config: GameConfig) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.config() == config)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Unknown level, expected \"basic\" or \"advanced\"")]
pub struct ParseLevelError;

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(ParseLevelError)
    }
}

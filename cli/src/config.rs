use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use wormsweeper_core::{Coord, CellCount, GameConfig, GameError, Level};

use crate::detector::DEFAULT_POLL_INTERVAL;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from the optional TOML file; every field has a default.
///
/// ```toml
/// [game]
/// level = "advanced"
/// seed = 7
///
/// [detector]
/// poll_interval_ms = 50
/// signal_file = "/tmp/red"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub game: GameSettings,
    pub detector: DetectorSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameSettings {
    pub level: Level,
    /// Overrides the level's grid size
    pub grid_size: Option<Coord>,
    /// Overrides the level's hazard count
    pub hazards: Option<CellCount>,
    /// Session seed, random when unset
    pub seed: Option<u64>,
}

impl GameSettings {
    /// The level preset with any explicit size or hazard count applied on top.
    pub fn game_config(&self) -> Result<GameConfig, GameError> {
        let preset = self.level.config();
        GameConfig::new(
            self.grid_size.unwrap_or(preset.grid_size),
            self.hazards.unwrap_or(preset.hazards),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorSettings {
    pub poll_interval_ms: u64,
    pub signal_file: Option<PathBuf>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            signal_file: None,
        }
    }
}

impl DetectorSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.game.game_config(), Ok(Level::Basic.config()));
        assert_eq!(settings.detector.poll_interval(), Duration::from_millis(33));
    }

    #[test]
    fn overrides_apply_on_top_of_level() {
        let settings = Settings::from_toml(
            r#"
            [game]
            level = "advanced"
            hazards = 40
            seed = 7

            [detector]
            poll_interval_ms = 50
            signal_file = "/tmp/red"
            "#,
        )
        .unwrap();

        assert_eq!(
            settings.game.game_config(),
            Ok(GameConfig::new_unchecked(15, 40))
        );
        assert_eq!(settings.game.seed, Some(7));
        assert_eq!(settings.detector.poll_interval(), Duration::from_millis(50));
        assert_eq!(
            settings.detector.signal_file.as_deref(),
            Some(Path::new("/tmp/red"))
        );
    }

    #[test]
    fn impossible_overrides_are_rejected() {
        let settings = Settings::from_toml("[game]\ngrid_size = 3\nhazards = 9\n").unwrap();

        assert_eq!(
            settings.game.game_config(),
            Err(GameError::InvalidConfiguration)
        );
    }

    #[test]
    fn unknown_keys_and_levels_fail_to_parse() {
        assert!(Settings::from_toml("[game]\nmines = 3\n").is_err());
        assert!(Settings::from_toml("[game]\nlevel = \"expert\"\n").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/wormsweeper.toml");
        let err = Settings::load(path).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(
            err.to_string(),
            "Could not read /nonexistent/wormsweeper.toml"
        );
    }
}

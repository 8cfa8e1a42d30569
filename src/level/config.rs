//! Level tuning, optionally overridden by `assets/level.ron`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::transition::{DAY_TRANSITION_SECS, MAP_TRANSITION_SECS};
use crate::error::LevelError;
use crate::shared::MapId;

pub const LEVEL_CONFIG_FILE: &str = "assets/level.ron";

/// Every field may be omitted from the file.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub start_map: MapId,
    pub map_transition_secs: f32,
    pub day_transition_secs: f32,
    /// Rain when a roll in `[rain_roll_min, rain_roll_max]` exceeds
    /// `rain_threshold`.
    pub rain_roll_min: i32,
    pub rain_roll_max: i32,
    pub rain_threshold: i32,
    pub dawn_hour: u32,
    pub dawn_minute: u32,
    pub maps_path: PathBuf,
    pub volume_path: PathBuf,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            start_map: MapId::Farm,
            map_transition_secs: MAP_TRANSITION_SECS,
            day_transition_secs: DAY_TRANSITION_SECS,
            rain_roll_min: 0,
            rain_roll_max: 10,
            rain_threshold: 7,
            dawn_hour: 6,
            dawn_minute: 0,
            maps_path: PathBuf::from("assets/maps.ron"),
            volume_path: PathBuf::from(crate::settings::VOLUME_FILE),
        }
    }
}

impl LevelConfig {
    /// `Ok(None)` when the file does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>, LevelError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(LevelError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&text)
            .map(Some)
            .map_err(|source| LevelError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Replace an inverted rain range with the default roll.
    pub fn validated(mut self) -> Self {
        if self.rain_roll_min > self.rain_roll_max {
            warn!(
                "[Level] rain_roll_min {} exceeds rain_roll_max {}; using the default rain roll",
                self.rain_roll_min, self.rain_roll_max
            );
            let defaults = Self::default();
            self.rain_roll_min = defaults.rain_roll_min;
            self.rain_roll_max = defaults.rain_roll_max;
            self.rain_threshold = defaults.rain_threshold;
        }
        self
    }

    /// Like `read`, but any problem falls back to defaults with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::read(path) {
            Ok(Some(config)) => {
                info!("[Level] Loaded config from {}", path.display());
                config.validated()
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("[Level] {e}; using default config");
                Self::default()
            }
        }
    }
}

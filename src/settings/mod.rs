//! Persisted audio settings (`volume.json`), read once at startup.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const VOLUME_FILE: &str = "volume.json";

/// Loudest the level music is ever played.
const MAX_MUSIC_VOLUME: f32 = 0.4;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// 0..1000, see `music_volume`.
    pub music: f32,
    /// Sound-effect volume, 0..1.
    #[serde(default = "default_sfx")]
    pub sfx: f32,
}

fn default_sfx() -> f32 {
    0.5
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music: 0.1,
            sfx: default_sfx(),
        }
    }
}

impl AudioSettings {
    /// Stored values are on a 0..1000 scale.
    pub fn music_volume(&self) -> f32 {
        (self.music / 1000.0).min(MAX_MUSIC_VOLUME)
    }

    /// Read settings from `path`. A missing file is normal on first launch
    /// and yields defaults without a message; an unreadable or malformed one
    /// is reported and also yields defaults.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("[Settings] Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("[Settings] Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

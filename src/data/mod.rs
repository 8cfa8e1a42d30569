//! Data layer: fills the level's resources from disk at startup.
//!
//! This plugin runs in OnEnter(GameState::Loading): it reads the level
//! config, the map registry and the saved volume, then moves the game into
//! GameState::Playing. Anything missing on disk falls back to the built-in
//! defaults, so a bare checkout still boots.

use bevy::prelude::*;
use std::path::Path;

use crate::level::config::LEVEL_CONFIG_FILE;
use crate::level::{LevelConfig, LevelTransitions};
use crate::settings::AudioSettings;
use crate::shared::*;
use crate::world::maps::MapRegistry;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Built-in maps are used when the file is absent or unreadable.
pub fn load_registry(path: &Path) -> MapRegistry {
    if !path.exists() {
        return MapRegistry::builtin();
    }
    match MapRegistry::load(path) {
        Ok(registry) => registry,
        Err(e) => {
            warn!("[Data] {e}; using built-in maps");
            MapRegistry::builtin()
        }
    }
}

fn load_all_data(mut commands: Commands, mut next_state: ResMut<NextState<GameState>>) {
    info!("[Data] Loading level data…");

    let config = LevelConfig::load_or_default(Path::new(LEVEL_CONFIG_FILE));

    let registry = load_registry(&config.maps_path);
    info!("[Data] Maps loaded: {}", registry.len());

    let settings = AudioSettings::load(&config.volume_path);

    commands.insert_resource(LevelTransitions::new(
        config.map_transition_secs,
        config.day_transition_secs,
    ));
    commands.insert_resource(registry);
    commands.insert_resource(settings);
    commands.insert_resource(config);

    next_state.set(GameState::Playing);
}

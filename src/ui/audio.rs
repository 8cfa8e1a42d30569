use bevy::audio::Volume;
use bevy::prelude::*;

use crate::settings::AudioSettings;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MUSIC STATE: tracks the currently playing music entity
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Default)]
pub struct MusicState {
    pub current_track: Option<Entity>,
    pub current_track_id: String,
}

// ═══════════════════════════════════════════════════════════════════════
// PATH MAPPING
// ═══════════════════════════════════════════════════════════════════════

/// Maps the level's sound cue ids to audio files.
fn sfx_path(sfx_id: &str) -> Option<&'static str> {
    match sfx_id {
        "axe" => Some("audio/sfx/axe.ogg"),
        "hoe" => Some("audio/sfx/hoe.ogg"),
        "water" => Some("audio/sfx/water.ogg"),
        "plant" => Some("audio/sfx/plant.ogg"),
        "cant_plant" => Some("audio/sfx/cant_plant.ogg"),
        "pickup" => Some("audio/sfx/pickup.ogg"),
        _ => None,
    }
}

fn music_path(track_id: &str) -> Option<&'static str> {
    match track_id {
        "music" => Some("audio/music/level.ogg"),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Spawn a one-shot audio source per `PlaySfxEvent`.
pub fn handle_play_sfx(
    mut events: EventReader<PlaySfxEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<AudioSettings>,
) {
    let volume = settings.sfx.clamp(0.0, 1.0);
    for event in events.read() {
        match sfx_path(&event.sfx_id) {
            Some(path) => {
                commands.spawn((
                    AudioPlayer::new(asset_server.load(path)),
                    PlaybackSettings::DESPAWN.with_volume(Volume::new(volume)),
                ));
            }
            None => debug!("[Audio] No sound for cue '{}'", event.sfx_id),
        }
    }
}

/// Replace the current music track, looping at the requested volume.
pub fn handle_play_music(
    mut events: EventReader<PlayMusicEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut music_state: ResMut<MusicState>,
) {
    for event in events.read() {
        if let Some(entity) = music_state.current_track.take() {
            commands.entity(entity).despawn_recursive();
        }
        music_state.current_track_id.clear();

        if let Some(path) = music_path(&event.track_id) {
            let entity = commands
                .spawn((
                    AudioPlayer::new(asset_server.load(path)),
                    PlaybackSettings::LOOP.with_volume(Volume::new(event.volume)),
                ))
                .id();
            music_state.current_track = Some(entity);
            music_state.current_track_id = event.track_id.clone();
        }
    }
}

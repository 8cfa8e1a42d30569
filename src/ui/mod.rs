//! Presentation: everything that needs a window, renderer or audio device.
//! `LevelCorePlugin` runs without this plugin in headless tests.

mod audio;
pub mod debug_overlay;
mod hud;
mod menus;
mod transitions;

use bevy::prelude::*;

use crate::shared::*;

pub use debug_overlay::NavGrid;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<audio::MusicState>();

        // ─── CAMERA + FADE/TINT OVERLAYS: always present ───
        app.add_systems(
            Startup,
            (crate::camera::setup_camera, transitions::spawn_overlays),
        );
        app.add_systems(
            Update,
            (transitions::update_sky_tint, transitions::update_fade)
                .chain()
                .in_set(LevelSet::Draw),
        );

        // ─── WORLD GIZMOS ───
        app.add_systems(
            Update,
            (debug_overlay::draw_rain, debug_overlay::draw_hitboxes).in_set(LevelSet::Draw),
        );

        // ─── AUDIO ───
        app.add_systems(Update, (audio::handle_play_sfx, audio::handle_play_music));

        // ─── HUD: visible in every in-level state ───
        app.add_plugins(hud::HudPlugin);

        // ─── OVERLAY STATES ───
        app.add_systems(
            Update,
            menus::listen_for_dialog.run_if(in_state(GameState::Playing)),
        );
        app.add_systems(OnEnter(GameState::Paused), menus::spawn_pause_overlay);
        app.add_systems(OnEnter(GameState::Shop), menus::spawn_shop_overlay);
        app.add_systems(OnEnter(GameState::Dialogue), menus::spawn_dialogue_overlay);
        for state in [GameState::Paused, GameState::Shop, GameState::Dialogue] {
            app.add_systems(OnExit(state), menus::despawn_overlay);
        }
        app.add_systems(
            Update,
            menus::close_overlay.run_if(
                in_state(GameState::Paused)
                    .or(in_state(GameState::Shop))
                    .or(in_state(GameState::Dialogue)),
            ),
        );
    }
}

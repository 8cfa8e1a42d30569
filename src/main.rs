use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use sproutvale::data::DataPlugin;
use sproutvale::input::InputPlugin;
use sproutvale::level::LevelCorePlugin;
use sproutvale::shared::*;
use sproutvale::ui::UiPlugin;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Sproutvale".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Level logic (state, events, resources, domain plugins)
        .add_plugins(LevelCorePlugin)
        // Keyboard → PlayerInput / LevelEvent
        .add_plugins(InputPlugin)
        // Rendering overlays, HUD, audio
        .add_plugins(UiPlugin)
        // Data loading
        .add_plugins(DataPlugin)
        .run();
}

use bevy::prelude::*;

use crate::level::LevelTransitions;
use crate::world::weather::SkyClock;

/// Marker for the screen fade overlay
#[derive(Component)]
pub struct ScreenFadeOverlay;

/// Marker for the night tint, drawn under the fade
#[derive(Component)]
pub struct SkyTintOverlay;

fn full_screen_node() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        position_type: PositionType::Absolute,
        ..default()
    }
}

/// Spawn both overlays (always present, transparent until needed)
pub fn spawn_overlays(mut commands: Commands) {
    commands.spawn((
        SkyTintOverlay,
        full_screen_node(),
        BackgroundColor(Color::srgba(0.05, 0.05, 0.2, 0.0)),
        GlobalZIndex(90),
        PickingBehavior::IGNORE,
    ));
    commands.spawn((
        ScreenFadeOverlay,
        full_screen_node(),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        GlobalZIndex(100), // on top of everything
        PickingBehavior::IGNORE,
    ));
}

/// The fade follows whichever transition is further into its run.
pub fn update_fade(
    transitions: Res<LevelTransitions>,
    mut query: Query<&mut BackgroundColor, With<ScreenFadeOverlay>>,
) {
    let alpha = transitions
        .map
        .fade_alpha()
        .max(transitions.day.fade_alpha());
    for mut bg in &mut query {
        *bg = BackgroundColor(Color::srgba(0.0, 0.0, 0.0, alpha));
    }
}

pub fn update_sky_tint(
    sky: Res<SkyClock>,
    mut query: Query<&mut BackgroundColor, With<SkyTintOverlay>>,
) {
    let darkness = sky.darkness();
    for mut bg in &mut query {
        *bg = BackgroundColor(Color::srgba(0.05, 0.05, 0.2, darkness));
    }
}

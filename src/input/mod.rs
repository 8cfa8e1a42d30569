use bevy::prelude::*;
use crate::shared::*;

/// Hardware keyboard → `PlayerInput` and `LevelEvent`s. Only the windowed
/// binary installs this; headless runs write those resources directly.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PreUpdate,
            (reset_and_read_input, forward_key_events)
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(OnExit(GameState::Playing), clear_input);
    }
}

/// The single point where held and pressed keys become gameplay intent.
fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    let mut axis = Vec2::ZERO;
    if keys.pressed(bindings.move_up) || keys.pressed(KeyCode::ArrowUp) {
        axis.y += 1.0;
    }
    if keys.pressed(bindings.move_down) || keys.pressed(KeyCode::ArrowDown) {
        axis.y -= 1.0;
    }
    if keys.pressed(bindings.move_left) || keys.pressed(KeyCode::ArrowLeft) {
        axis.x -= 1.0;
    }
    if keys.pressed(bindings.move_right) || keys.pressed(KeyCode::ArrowRight) {
        axis.x += 1.0;
    }
    input.move_axis = axis.normalize_or_zero();

    input.use_tool = keys.just_pressed(bindings.use_tool);
    input.use_seed = keys.just_pressed(bindings.use_seed);
    input.next_tool = keys.just_pressed(bindings.next_tool);
    input.prev_tool = keys.just_pressed(bindings.prev_tool);
    input.next_seed = keys.just_pressed(bindings.next_seed);
    input.interact = keys.just_pressed(bindings.interact);
}

/// Offer every fresh key press to the level's event routing.
fn forward_key_events(keys: Res<ButtonInput<KeyCode>>, mut events: EventWriter<LevelEvent>) {
    for key in keys.get_just_pressed() {
        events.send(LevelEvent::KeyDown(*key));
    }
}

/// Leaving gameplay drops any held movement.
fn clear_input(mut input: ResMut<PlayerInput>) {
    *input = PlayerInput::default();
}

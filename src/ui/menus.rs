//! Pause, shop and dialogue overlays. Each one owns a full-screen panel
//! for the lifetime of its state and returns to Playing on its close key.

use bevy::prelude::*;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct OverlayRoot;

/// Text the dialogue overlay shows when opened.
#[derive(Resource, Debug, Clone, Default)]
pub struct DialogueUiState {
    pub text: String,
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

fn spawn_overlay(commands: &mut Commands, title: &str, body: &str) {
    commands
        .spawn((
            OverlayRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
            GlobalZIndex(120),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new(body),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.85)),
            ));
        });
}

pub fn spawn_pause_overlay(mut commands: Commands) {
    spawn_overlay(&mut commands, "PAUSED", "Press Escape to resume");
}

pub fn spawn_shop_overlay(mut commands: Commands) {
    spawn_overlay(&mut commands, "TRADER", "Nothing for sale today. Escape to leave");
}

pub fn spawn_dialogue_overlay(mut commands: Commands, dialogue: Option<Res<DialogueUiState>>) {
    let text = dialogue.map(|d| d.text.clone()).unwrap_or_default();
    spawn_overlay(&mut commands, "", &text);
}

pub fn despawn_overlay(mut commands: Commands, query: Query<Entity, With<OverlayRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Opens the dialogue overlay with the requested text.
pub fn listen_for_dialog(
    mut commands: Commands,
    mut events: EventReader<DialogEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in events.read() {
        if let DialogEvent::Show(text) = event {
            commands.insert_resource(DialogueUiState { text: text.clone() });
            next_state.set(GameState::Dialogue);
        }
    }
}

/// Escape or the state's own key returns to Playing.
pub fn close_overlay(
    keyboard: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let own_key = match state.get() {
        GameState::Paused => bindings.pause,
        GameState::Dialogue => bindings.advance_dialog,
        _ => KeyCode::Escape,
    };
    if keyboard.just_pressed(own_key) || keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(GameState::Playing);
    }
}

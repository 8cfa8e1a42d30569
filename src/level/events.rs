//! Host event routing. Decides which raw events the level swallows.

use bevy::prelude::*;

use crate::shared::*;

#[derive(Debug, Clone, PartialEq)]
pub enum LevelCommand {
    Pause,
    ToggleHitboxes,
    ShowDialog(String),
    AdvanceDialog,
    StartQuake(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEvent {
    pub command: Option<LevelCommand>,
    /// Consumed events are not passed on to gameplay input.
    pub consumed: bool,
}

impl RoutedEvent {
    fn consumed(command: LevelCommand) -> Self {
        Self {
            command: Some(command),
            consumed: true,
        }
    }

    fn ignored() -> Self {
        Self {
            command: None,
            consumed: false,
        }
    }
}

/// Map a host event to a level command. A quake is acted on but still passed
/// through.
pub fn route_event(event: &LevelEvent, bindings: &KeyBindings) -> RoutedEvent {
    match event {
        LevelEvent::KeyDown(key) if *key == bindings.pause => {
            RoutedEvent::consumed(LevelCommand::Pause)
        }
        LevelEvent::KeyDown(key) if *key == bindings.debug_hitboxes => {
            RoutedEvent::consumed(LevelCommand::ToggleHitboxes)
        }
        LevelEvent::KeyDown(key) if *key == bindings.show_dialog => {
            RoutedEvent::consumed(LevelCommand::ShowDialog("test".to_string()))
        }
        LevelEvent::KeyDown(key) if *key == bindings.advance_dialog => {
            RoutedEvent::consumed(LevelCommand::AdvanceDialog)
        }
        LevelEvent::KeyDown(_) => RoutedEvent::ignored(),
        LevelEvent::StartQuake { duration } => RoutedEvent {
            command: Some(LevelCommand::StartQuake(*duration)),
            consumed: false,
        },
    }
}

/// Apply routed commands and record the keys the level swallowed.
pub fn handle_level_events(
    mut events: EventReader<LevelEvent>,
    bindings: Res<KeyBindings>,
    mut consumed_keys: ResMut<ConsumedKeys>,
    mut debug: ResMut<DebugOverlayState>,
    mut shake: ResMut<crate::camera::ScreenShake>,
    mut dialog: EventWriter<DialogEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    consumed_keys.0.clear();
    for event in events.read() {
        let routed = route_event(event, &bindings);
        if routed.consumed {
            if let LevelEvent::KeyDown(key) = event {
                consumed_keys.0.insert(*key);
            }
        }
        match routed.command {
            Some(LevelCommand::Pause) => {
                info!("[Level] Paused");
                next_state.set(GameState::Paused);
            }
            Some(LevelCommand::ToggleHitboxes) => {
                debug.visible = !debug.visible;
            }
            Some(LevelCommand::ShowDialog(text)) => {
                dialog.send(DialogEvent::Show(text));
            }
            Some(LevelCommand::AdvanceDialog) => {
                dialog.send(DialogEvent::Advance);
            }
            Some(LevelCommand::StartQuake(duration)) => {
                shake.start(duration);
            }
            None => {}
        }
    }
}

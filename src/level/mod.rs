//! Level orchestration: owns the per-tick order of the playable area and
//! all cross-domain wiring: exit warps, both transitions and their actions,
//! tool use, interaction, the new-day reset, and camera targeting.
//!
//! Tick order, one `LevelSet` per step:
//! Events → ExitCheck → Weather → Transitions → Simulate → Camera → Draw.
//! Simulate and Camera only run in `GameState::Playing`; the rest run in
//! every in-level state so overlays keep transitions moving.

use bevy::prelude::*;

use crate::camera::{self, CutsceneTrack, LevelCamera, ScreenShake, ZoomControl};
use crate::farming::{FarmingPlugin, SoilGrid};
use crate::npcs::{npc_think, NpcPlugin};
use crate::player::{player_control, spawn_player, PlayerPlugin};
use crate::settings::AudioSettings;
use crate::shared::*;
use crate::world::maps::InteractionKind;
use crate::world::objects::{grow_fruit, ExitWarp, Interactable, TreeObject};
use crate::world::weather::{roll_rain, SkyClock, Weather};
use crate::world::{MapSwitcher, WorldPlugin};

pub mod config;
pub mod events;
pub mod tools;
pub mod transition;

pub use config::LevelConfig;
pub use transition::{LevelActionEvent, LevelTransitions, Transition, TransitionAction};

/// Completed days since the level was entered.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCounter(pub u32);

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

/// Everything the level needs to run without a window, renderer or audio
/// device. The binary adds rendering, audio and keyboard input on top.
pub struct LevelCorePlugin;

impl Plugin for LevelCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            // Events
            .add_event::<LevelEvent>()
            .add_event::<LevelActionEvent>()
            .add_event::<ToolUseEvent>()
            .add_event::<InteractEvent>()
            .add_event::<PlaySfxEvent>()
            .add_event::<PlayMusicEvent>()
            .add_event::<DialogEvent>()
            // Resources
            .init_resource::<LevelConfig>()
            .init_resource::<AudioSettings>()
            .init_resource::<KeyBindings>()
            .init_resource::<PlayerInput>()
            .init_resource::<ConsumedKeys>()
            .init_resource::<DebugOverlayState>()
            .init_resource::<LevelTransitions>()
            .init_resource::<DayCounter>()
            .init_resource::<LevelCamera>()
            .init_resource::<ZoomControl>()
            .init_resource::<ScreenShake>()
            .init_resource::<CutsceneTrack>()
            .configure_sets(
                Update,
                (
                    LevelSet::Events.run_if(in_level),
                    LevelSet::ExitCheck.run_if(in_level),
                    LevelSet::Weather.run_if(in_level),
                    LevelSet::Transitions.run_if(in_level),
                    LevelSet::Simulate.run_if(simulation_running),
                    LevelSet::Camera.run_if(simulation_running),
                    LevelSet::Draw.run_if(in_level),
                )
                    .chain(),
            )
            .add_plugins((WorldPlugin, FarmingPlugin, PlayerPlugin, NpcPlugin))
            .add_systems(OnEnter(GameState::Playing), (spawn_player, enter_level).chain())
            .add_systems(Update, events::handle_level_events.in_set(LevelSet::Events))
            .add_systems(Update, check_map_exit.in_set(LevelSet::ExitCheck))
            .add_systems(
                Update,
                (
                    advance_transitions,
                    apply_map_actions,
                    start_new_day,
                    release_player,
                )
                    .chain()
                    .in_set(LevelSet::Transitions),
            )
            .add_systems(
                Update,
                (
                    (tools::handle_tool_use, handle_interact)
                        .after(player_control)
                        .after(npc_think),
                    advance_cutscene_and_shake,
                )
                    .in_set(LevelSet::Simulate),
            )
            .add_systems(
                Update,
                (follow_target, camera::apply_camera)
                    .chain()
                    .in_set(LevelSet::Camera),
            )
            .add_systems(
                Update,
                advance_sky
                    .run_if(simulation_running)
                    .in_set(LevelSet::Draw),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ENTRY
// ═══════════════════════════════════════════════════════════════════════

/// Load the start map the first time the level is entered. Returning from
/// an overlay state finds a map already loaded and does nothing.
fn enter_level(
    mut switcher: MapSwitcher,
    config: Res<LevelConfig>,
    settings: Res<AudioSettings>,
    mut music: EventWriter<PlayMusicEvent>,
    mut exit: EventWriter<AppExit>,
) {
    if switcher.current().is_some() {
        return;
    }
    if let Err(e) = switcher.load_map(config.start_map, None) {
        error!("[Level] Cannot enter level: {e}");
        exit.send(AppExit::error());
        return;
    }
    music.send(PlayMusicEvent {
        track_id: "music".to_string(),
        volume: settings.music_volume(),
    });
}

// ═══════════════════════════════════════════════════════════════════════
// EXIT WARPS
// ═══════════════════════════════════════════════════════════════════════

/// The first exit warp the player touches starts the map transition toward
/// its destination. Skipped entirely while either transition runs.
pub fn check_map_exit(
    mut transitions: ResMut<LevelTransitions>,
    mut player_query: Query<(&Transform, &Hitbox, &mut Actor), With<Player>>,
    warps: Query<&ExitWarp>,
) {
    if transitions.any_active() {
        return;
    }
    let Ok((transform, hitbox, mut actor)) = player_query.get_single_mut() else {
        return;
    };
    let rect = hitbox.rect_at(transform.translation.truncate());
    let Some(warp) = warps.iter().find(|warp| overlaps(rect, warp.area)) else {
        return;
    };
    transitions.map.set_reset(TransitionAction::SwitchToMap(warp.to));
    transitions.map.activate();
    actor.blocked = true;
    actor.direction = Vec2::ZERO;
    info!("[Level] Exit warp to {:?}", warp.to);
}

// ═══════════════════════════════════════════════════════════════════════
// TRANSITIONS
// ═══════════════════════════════════════════════════════════════════════

pub fn advance_transitions(
    time: Res<Time>,
    mut transitions: ResMut<LevelTransitions>,
    mut actions: EventWriter<LevelActionEvent>,
) {
    for action in transitions.update(time.delta_secs()) {
        actions.send(LevelActionEvent(action));
    }
}

/// Map switches requested by a transition. A fatal load error stops the app.
pub fn apply_map_actions(
    mut actions: EventReader<LevelActionEvent>,
    mut switcher: MapSwitcher,
    mut exit: EventWriter<AppExit>,
) {
    for LevelActionEvent(action) in actions.read() {
        let result = match *action {
            TransitionAction::SwitchToMap(target) => switcher.switch_to_map(target),
            TransitionAction::ReloadCurrentMap => match switcher.current() {
                Some(current) => switcher.switch_to_map(current),
                None => Ok(()),
            },
            _ => continue,
        };
        if let Err(e) = result {
            error!("[Level] {e}");
            exit.send(AppExit::error());
        }
    }
}

/// The new-day reset, fired while the day transition has the screen black.
#[allow(clippy::too_many_arguments)]
pub fn start_new_day(
    mut commands: Commands,
    mut actions: EventReader<LevelActionEvent>,
    config: Res<LevelConfig>,
    mut day: ResMut<DayCounter>,
    mut soil: ResMut<SoilGrid>,
    mut weather: ResMut<Weather>,
    mut sky: ResMut<SkyClock>,
    mut trees: Query<(&Transform, &mut TreeObject)>,
) {
    for LevelActionEvent(action) in actions.read() {
        if *action != TransitionAction::StartNewDay {
            continue;
        }
        day.0 += 1;
        soil.update();

        weather.raining = roll_rain(
            &mut rand::thread_rng(),
            config.rain_roll_min,
            config.rain_roll_max,
            config.rain_threshold,
        );
        soil.raining = weather.raining;

        for (transform, mut tree) in &mut trees {
            for fruit in tree.fruit.drain(..) {
                commands.entity(fruit).despawn_recursive();
            }
            if tree.alive {
                tree.fruit = grow_fruit(&mut commands, transform.translation.truncate());
            }
        }

        sky.set_time(config.dawn_hour, config.dawn_minute);
        info!("[Level] Day {} begins (raining: {})", day.0, weather.raining);
    }
}

pub fn release_player(
    mut actions: EventReader<LevelActionEvent>,
    mut player_query: Query<&mut Actor, With<Player>>,
) {
    let released = actions
        .read()
        .any(|LevelActionEvent(action)| *action == TransitionAction::ReleasePlayer);
    if !released {
        return;
    }
    if let Ok(mut actor) = player_query.get_single_mut() {
        actor.blocked = false;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INTERACTION
// ═══════════════════════════════════════════════════════════════════════

/// The bed ends the day; the trader opens the shop.
pub fn handle_interact(
    mut events: EventReader<InteractEvent>,
    mut transitions: ResMut<LevelTransitions>,
    mut actors: Query<(&Transform, &Hitbox, &mut Actor)>,
    interactables: Query<&Interactable>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in events.read() {
        let Ok((transform, hitbox, mut actor)) = actors.get_mut(event.actor) else {
            continue;
        };
        let rect = hitbox.rect_at(transform.translation.truncate());
        let Some(target) = interactables.iter().find(|i| overlaps(rect, i.area)) else {
            continue;
        };
        match target.kind {
            InteractionKind::Bed => {
                if transitions.any_active() {
                    continue;
                }
                transitions.day.activate();
                actor.blocked = true;
                actor.direction = Vec2::ZERO;
                info!("[Level] Going to bed");
            }
            InteractionKind::Trader => {
                next_state.set(GameState::Shop);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CUTSCENE, SHAKE, CAMERA, SKY
// ═══════════════════════════════════════════════════════════════════════

pub fn advance_cutscene_and_shake(
    time: Res<Time>,
    mut cutscene: ResMut<CutsceneTrack>,
    mut shake: ResMut<ScreenShake>,
) {
    let dt = time.delta_secs();
    if cutscene.active {
        cutscene.update(dt);
    }
    shake.update(dt);
}

/// The camera follows the cutscene while it runs, otherwise the player.
pub fn follow_target(
    time: Res<Time>,
    cutscene: Res<CutsceneTrack>,
    mut level_camera: ResMut<LevelCamera>,
    mut zoom: ResMut<ZoomControl>,
    player_query: Query<&Transform, With<Player>>,
) {
    let dt = time.delta_secs();
    let (target, target_zoom) = if cutscene.active {
        (cutscene.current_position(), cutscene.current_zoom())
    } else {
        let Ok(transform) = player_query.get_single() else {
            return;
        };
        (transform.translation.truncate(), 1.0)
    };
    zoom.update(target_zoom, dt);
    level_camera.update(target, zoom.current, dt);
}

fn advance_sky(time: Res<Time>, mut sky: ResMut<SkyClock>) {
    sky.advance(time.delta_secs());
}

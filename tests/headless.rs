//! Headless integration tests for Sproutvale.
//!
//! These tests drive `LevelCorePlugin` under Bevy's `MinimalPlugins` with a
//! fixed 100ms tick: no window, GPU, audio or keyboard. Input is written
//! straight into `PlayerInput` / `LevelEvent`, and sound cues are recorded
//! instead of played.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use std::collections::BTreeMap;
use std::time::Duration;

use sproutvale::camera::CutsceneTrack;
use sproutvale::data::DataPlugin;
use sproutvale::error::GameMapWarning;
use sproutvale::farming::SoilGrid;
use sproutvale::level::{DayCounter, LevelConfig, LevelCorePlugin, LevelTransitions};
use sproutvale::shared::*;
use sproutvale::world::maps::{
    ExitWarpSource, InteractableSource, InteractionKind, MapRegistry, MapSource,
};
use sproutvale::world::objects::{
    stump_sprite, DropItem, Fruit, HarvestParticle, TreeObject, TREE_HEALTH,
};
use sproutvale::world::weather::{SkyClock, Weather};
use sproutvale::world::{ActiveMap, MapWarnings};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Every sound cue sent so far, in order.
#[derive(Resource, Default)]
struct SfxLog(Vec<String>);

fn record_sfx(mut events: EventReader<PlaySfxEvent>, mut log: ResMut<SfxLog>) {
    for event in events.read() {
        log.0.push(event.sfx_id.clone());
    }
}

fn build_level_app(registry: MapRegistry, start_map: MapId) -> App {
    build_level_app_with(
        registry,
        LevelConfig {
            start_map,
            ..default()
        },
    )
}

fn build_level_app_with(registry: MapRegistry, config: LevelConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.add_plugins(LevelCorePlugin);

    app.insert_resource(registry);
    app.insert_resource(config);
    app.init_resource::<SfxLog>();
    app.add_systems(Update, record_sfx.in_set(LevelSet::Draw));

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();
    app
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn player(app: &mut App) -> Entity {
    let mut query = app.world_mut().query_filtered::<Entity, With<Player>>();
    query.single(app.world())
}

fn player_pos(app: &mut App) -> Vec2 {
    let entity = player(app);
    app.world()
        .get::<Transform>(entity)
        .map(|tf| tf.translation.truncate())
        .unwrap_or(Vec2::NAN)
}

fn player_blocked(app: &mut App) -> bool {
    let entity = player(app);
    app.world().get::<Actor>(entity).is_some_and(|a| a.blocked)
}

fn teleport_player(app: &mut App, pos: Vec2) {
    let entity = player(app);
    let mut tf = app.world_mut().get_mut::<Transform>(entity).unwrap();
    tf.translation.x = pos.x;
    tf.translation.y = pos.y;
}

fn active_map(app: &App) -> Option<MapId> {
    app.world().resource::<ActiveMap>().id()
}

/// A small map whose only exit leads somewhere that was never registered.
fn meadow() -> MapSource {
    MapSource {
        width: 20,
        height: 20,
        spawnpoint: Some((10.0, 10.0)),
        entry_warps: BTreeMap::from([(MapId::Beach, (3.0, 3.0))]),
        exit_warps: vec![ExitWarpSource {
            area: Area::new(19.5, 5.0, 0.5, 4.0),
            to: MapId::Beach,
        }],
        npcs: vec![(15.0, 15.0)],
        ..default()
    }
}

fn meadow_registry() -> MapRegistry {
    let mut registry = MapRegistry::default();
    registry.insert(MapId::Farm, meadow());
    registry
}

fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    let mut query = app.world_mut().query_filtered::<Entity, F>();
    query.iter(app.world()).count()
}

fn inventory(app: &mut App, resource: InventoryResource) -> u32 {
    let entity = player(app);
    app.world()
        .get::<ResourceInventory>(entity)
        .map(|inv| inv.count(resource))
        .unwrap_or(0)
}

/// Three trees along the top, a bed under the spawnpoint and a strip of
/// farmland near the origin. No NPCs, so only the player touches anything.
fn orchard() -> MapSource {
    MapSource {
        width: 20,
        height: 20,
        spawnpoint: Some((10.0, 10.0)),
        interactables: vec![InteractableSource {
            kind: InteractionKind::Bed,
            area: Area::new(9.0, 9.0, 2.0, 2.0),
        }],
        trees: vec![(3.5, 15.5), (8.5, 15.5), (13.5, 15.5)],
        farmland: vec![Area::new(2.0, 2.0, 4.0, 2.0)],
        ..default()
    }
}

fn orchard_registry() -> MapRegistry {
    let mut registry = MapRegistry::default();
    registry.insert(MapId::Farm, orchard());
    registry
}

/// Trees as (entity, x) sorted left to right.
fn trees_by_x(app: &mut App) -> Vec<(Entity, f32)> {
    let mut query = app
        .world_mut()
        .query_filtered::<(Entity, &Transform), With<TreeObject>>();
    let mut trees: Vec<(Entity, f32)> = query
        .iter(app.world())
        .map(|(entity, tf)| (entity, tf.translation.x))
        .collect();
    trees.sort_by(|a, b| a.1.total_cmp(&b.1));
    trees
}

fn sleep(app: &mut App) {
    app.world_mut().resource_mut::<PlayerInput>().interact = true;
    app.update();
    app.world_mut().resource_mut::<PlayerInput>().interact = false;
}

// ─────────────────────────────────────────────────────────────────────────────
// Entering the level
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_start_map_places_player_at_spawnpoint() {
    let mut app = build_level_app(MapRegistry::builtin(), MapId::Farm);

    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::Playing);
    assert_eq!(active_map(&app), Some(MapId::Farm));
    assert_eq!(player_pos(&mut app), Vec2::new(16.0, 12.0) * TILE_SIZE);
    assert!(app.world().resource::<MapWarnings>().0.is_empty());
}

#[test]
fn test_map_without_any_spawn_stops_the_app() {
    let mut registry = MapRegistry::default();
    registry.insert(
        MapId::Farm,
        MapSource {
            width: 10,
            height: 10,
            ..default()
        },
    );
    let app = build_level_app(registry, MapId::Farm);

    assert!(app.should_exit().is_some());
    assert_eq!(active_map(&app), None);
}

#[test]
fn test_data_plugin_boots_into_playing_with_builtin_maps() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.add_plugins(LevelCorePlugin);
    app.add_plugins(DataPlugin);

    run_frames(&mut app, 3);

    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::Playing);
    assert_eq!(
        app.world().resource::<MapRegistry>().len(),
        MapRegistry::builtin().len()
    );
    assert_eq!(active_map(&app), Some(MapId::Farm));
}

// ─────────────────────────────────────────────────────────────────────────────
// Exit warps and map transitions
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_exit_warp_switches_map_after_transition() {
    let mut app = build_level_app(MapRegistry::builtin(), MapId::Farm);

    // Farm's east exit leads to the forest.
    teleport_player(&mut app, Vec2::new(508.0, 164.0));
    app.update();

    assert!(player_blocked(&mut app));
    assert!(app.world().resource::<LevelTransitions>().map.is_active());
    assert_eq!(active_map(&app), Some(MapId::Farm));

    run_frames(&mut app, 30);

    assert_eq!(active_map(&app), Some(MapId::Forest));
    assert_eq!(player_pos(&mut app), Vec2::new(1.5, 15.0) * TILE_SIZE);
    assert!(!player_blocked(&mut app));
    assert!(!app.world().resource::<LevelTransitions>().any_active());
}

#[test]
fn test_exit_to_unregistered_map_stays_put_and_warns() {
    let mut app = build_level_app(meadow_registry(), MapId::Farm);

    teleport_player(&mut app, Vec2::new(316.0, 116.0));
    run_frames(&mut app, 30);

    assert_eq!(active_map(&app), Some(MapId::Farm));
    assert_eq!(player_pos(&mut app), Vec2::new(3.0, 3.0) * TILE_SIZE);
    let warnings = &app.world().resource::<MapWarnings>().0;
    assert!(warnings.contains(&GameMapWarning::UnknownMap {
        requested: MapId::Beach,
        current: MapId::Farm,
    }));
}

#[test]
fn test_transition_keeps_running_while_paused() {
    let mut app = build_level_app(MapRegistry::builtin(), MapId::Farm);

    teleport_player(&mut app, Vec2::new(508.0, 164.0));
    app.update();
    let pause = app.world().resource::<KeyBindings>().pause;
    app.world_mut().send_event(LevelEvent::KeyDown(pause));
    run_frames(&mut app, 2);
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::Paused);

    run_frames(&mut app, 30);

    assert_eq!(active_map(&app), Some(MapId::Forest));
}

// ─────────────────────────────────────────────────────────────────────────────
// Interaction, tools and cutscenes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_bed_starts_exactly_one_new_day() {
    let mut app = build_level_app(MapRegistry::builtin(), MapId::PlayerHouse);

    // Standing on the bed, holding interact for several frames.
    teleport_player(&mut app, Vec2::new(144.0, 148.0));
    app.world_mut().resource_mut::<PlayerInput>().interact = true;
    run_frames(&mut app, 5);
    app.world_mut().resource_mut::<PlayerInput>().interact = false;

    assert!(app.world().resource::<LevelTransitions>().day.is_active());
    assert!(player_blocked(&mut app));

    run_frames(&mut app, 40);

    assert_eq!(*app.world().resource::<DayCounter>(), DayCounter(1));
    assert!(!player_blocked(&mut app));
}

#[test]
fn test_new_day_regrows_fruit_on_living_trees_and_resets_the_sky() {
    let mut app = build_level_app(orchard_registry(), MapId::Farm);
    assert_eq!(count::<With<Fruit>>(&mut app), 9);

    // Strip every tree, fell the leftmost one and run the clock late.
    let trees = trees_by_x(&mut app);
    let fruit: Vec<Entity> = {
        let mut query = app.world_mut().query_filtered::<Entity, With<Fruit>>();
        query.iter(app.world()).collect()
    };
    for entity in fruit {
        app.world_mut().despawn(entity);
    }
    for (entity, _) in &trees {
        let mut tree = app.world_mut().get_mut::<TreeObject>(*entity).unwrap();
        tree.fruit.clear();
    }
    let felled = trees[0].0;
    {
        let mut tree = app.world_mut().get_mut::<TreeObject>(felled).unwrap();
        tree.health = 0;
        tree.alive = false;
    }
    app.world_mut().resource_mut::<SkyClock>().set_time(21, 30);

    sleep(&mut app);
    assert!(app.world().resource::<LevelTransitions>().day.is_active());
    run_frames(&mut app, 40);

    assert_eq!(*app.world().resource::<DayCounter>(), DayCounter(1));
    assert!(app.world().get::<TreeObject>(felled).unwrap().fruit.is_empty());
    for (entity, _) in &trees[1..] {
        assert_eq!(app.world().get::<TreeObject>(*entity).unwrap().fruit.len(), 3);
    }
    assert_eq!(count::<With<Fruit>>(&mut app), 6);

    let sky = app.world().resource::<SkyClock>();
    assert_eq!(sky.hour, 6);
    assert!(sky.minute < 10, "minute {}", sky.minute);
    assert_eq!(
        app.world().resource::<SoilGrid>().raining,
        app.world().resource::<Weather>().raining
    );
}

#[test]
fn test_inverted_rain_range_still_starts_a_dry_day() {
    let config = LevelConfig {
        start_map: MapId::Farm,
        rain_roll_min: 10,
        rain_roll_max: 0,
        ..default()
    };
    let mut app = build_level_app_with(orchard_registry(), config);

    sleep(&mut app);
    run_frames(&mut app, 40);

    assert_eq!(*app.world().resource::<DayCounter>(), DayCounter(1));
    assert!(!app.world().resource::<Weather>().raining);
    assert!(!player_blocked(&mut app));
}

#[test]
fn test_walking_over_ripe_plants_harvests_them_all_at_once() {
    let mut app = build_level_app(orchard_registry(), MapId::Farm);
    {
        let mut soil = app.world_mut().resource_mut::<SoilGrid>();
        for pos in [(3, 2), (4, 2)] {
            assert!(soil.hoe(pos));
            assert!(soil.plant(pos, FarmingTool::CornSeed, |_, _| true));
        }
        for _ in 0..3 {
            soil.water((3, 2));
            soil.water((4, 2));
            soil.update();
        }
    }
    assert_eq!(inventory(&mut app, InventoryResource::Corn), 0);

    // Hitbox straddles the edge between the two tiles.
    teleport_player(&mut app, Vec2::new(4.0 * TILE_SIZE, 2.75 * TILE_SIZE));
    app.update();

    assert_eq!(inventory(&mut app, InventoryResource::Corn), 2);
    assert_eq!(count::<With<HarvestParticle>>(&mut app), 2);
    assert!(!app.world().resource::<SoilGrid>().has_plants());
}

#[test]
fn test_chopping_a_tree_drops_fruit_then_fells_it() {
    let mut app = build_level_app(orchard_registry(), MapId::Farm);
    let tree = trees_by_x(&mut app)[0].0;
    let player = player(&mut app);

    // Just below the leftmost tree, facing it.
    teleport_player(&mut app, Vec2::new(3.5 * TILE_SIZE, 14.25 * TILE_SIZE));
    app.world_mut().get_mut::<Actor>(player).unwrap().facing = Facing::Up;

    for _ in 0..TREE_HEALTH {
        app.world_mut().send_event(ToolUseEvent {
            actor: player,
            tool: FarmingTool::Axe,
            target: Vec2::ZERO,
        });
        app.update();
    }

    let felled = app.world().get::<TreeObject>(tree).unwrap();
    assert!(!felled.alive);
    assert!(felled.fruit.is_empty());
    assert_eq!(
        app.world().get::<Sprite>(tree).unwrap().custom_size,
        stump_sprite().custom_size
    );
    assert_eq!(inventory(&mut app, InventoryResource::Wood), 1);
    assert_eq!(count::<With<DropItem>>(&mut app), 3);
    assert_eq!(count::<With<Fruit>>(&mut app), 6);
    assert_eq!(
        app.world().resource::<SfxLog>().0,
        vec!["axe".to_string(); TREE_HEALTH as usize]
    );

    // Step onto one of the apples.
    let drop_pos = {
        let mut query = app
            .world_mut()
            .query_filtered::<&Transform, With<DropItem>>();
        query.iter(app.world()).next().unwrap().translation.truncate()
    };
    teleport_player(&mut app, drop_pos + Vec2::new(0.0, TILE_SIZE * 0.25));
    app.update();

    let picked = 3 - count::<With<DropItem>>(&mut app) as u32;
    assert!(picked >= 1);
    assert_eq!(inventory(&mut app, InventoryResource::Apple), picked);
    assert_eq!(app.world().resource::<SfxLog>().0.last().map(String::as_str), Some("pickup"));
}

#[test]
fn test_only_player_tool_use_is_audible() {
    let mut app = build_level_app(meadow_registry(), MapId::Farm);
    let player = player(&mut app);
    let npc = {
        let mut query = app.world_mut().query_filtered::<Entity, With<Npc>>();
        query.single(app.world())
    };

    app.world_mut().send_event(ToolUseEvent {
        actor: npc,
        tool: FarmingTool::WateringCan,
        target: Vec2::new(40.0, 40.0),
    });
    app.update();
    assert!(app.world().resource::<SfxLog>().0.is_empty());

    app.world_mut().send_event(ToolUseEvent {
        actor: player,
        tool: FarmingTool::WateringCan,
        target: Vec2::new(40.0, 40.0),
    });
    app.update();
    assert_eq!(app.world().resource::<SfxLog>().0, vec!["water".to_string()]);
}

#[test]
fn test_cutscene_holds_the_player_still() {
    let mut app = build_level_app(MapRegistry::builtin(), MapId::Town);
    assert!(app.world().resource::<CutsceneTrack>().active);

    let start = player_pos(&mut app);
    let player = player(&mut app);
    let start_frame = app.world().get::<AnimationClock>(player).unwrap().frame;
    app.world_mut().resource_mut::<PlayerInput>().move_axis = Vec2::X;
    run_frames(&mut app, 3);

    assert_eq!(player_pos(&mut app), start);
    // Held in place, but the walk cycle keeps going.
    assert_ne!(app.world().get::<AnimationClock>(player).unwrap().frame, start_frame);
}

//! Player domain: the persistent player entity, its controls and actor
//! movement. The player only ever raises intent (`ToolUseEvent`,
//! `InteractEvent`); the level decides what that does to the world.

pub mod movement;

use bevy::prelude::*;

use crate::camera::CutsceneTrack;
use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (player_control, movement::move_actors)
                .chain()
                .in_set(LevelSet::Simulate),
        );
    }
}

const STARTING_SEEDS: u32 = 5;

/// Spawn the player. The map loader positions it; until then it sits at the
/// origin. Does nothing if a player already exists.
pub fn spawn_player(mut commands: Commands, existing: Query<(), With<Player>>) {
    if !existing.is_empty() {
        return;
    }
    commands.spawn((
        Player,
        Persistent,
        Collidable,
        Actor::default(),
        AnimationClock::default(),
        Hitbox {
            size: Vec2::new(TILE_SIZE * 0.6, TILE_SIZE * 0.5),
            offset: Vec2::new(0.0, -TILE_SIZE * 0.25),
        },
        ResourceInventory::with(&[
            (InventoryResource::CornSeed, STARTING_SEEDS),
            (InventoryResource::TomatoSeed, STARTING_SEEDS),
        ]),
        Sprite {
            color: Color::srgb(0.2, 0.5, 0.8),
            custom_size: Some(Vec2::new(TILE_SIZE * 0.8, TILE_SIZE)),
            ..default()
        },
        Transform::from_translation(Vec3::new(0.0, 0.0, Z_ACTOR)),
    ));
}

fn cycle(order: &[FarmingTool], current: FarmingTool, step: isize) -> FarmingTool {
    let len = order.len() as isize;
    let idx = order.iter().position(|t| *t == current).unwrap_or(0) as isize;
    order[((idx + step).rem_euclid(len)) as usize]
}

/// Input for this frame with every key the level consumed masked out.
fn unconsumed(input: &PlayerInput, bindings: &KeyBindings, consumed: &ConsumedKeys) -> PlayerInput {
    let free = |key: KeyCode| !consumed.0.contains(&key);
    PlayerInput {
        move_axis: input.move_axis,
        use_tool: input.use_tool && free(bindings.use_tool),
        use_seed: input.use_seed && free(bindings.use_seed),
        next_tool: input.next_tool && free(bindings.next_tool),
        prev_tool: input.prev_tool && free(bindings.prev_tool),
        next_seed: input.next_seed && free(bindings.next_seed),
        interact: input.interact && free(bindings.interact),
    }
}

/// Turn this frame's input into player movement and intent events.
/// A blocked player stands still and ignores actions.
pub fn player_control(
    raw_input: Res<PlayerInput>,
    bindings: Res<KeyBindings>,
    consumed: Res<ConsumedKeys>,
    cutscene: Res<CutsceneTrack>,
    mut player_query: Query<(Entity, &Transform, &mut Actor), With<Player>>,
    mut tool_events: EventWriter<ToolUseEvent>,
    mut interact_events: EventWriter<InteractEvent>,
) {
    let Ok((entity, transform, mut actor)) = player_query.get_single_mut() else {
        return;
    };
    if actor.blocked || cutscene.active {
        actor.direction = Vec2::ZERO;
        return;
    }
    let input = unconsumed(&raw_input, &bindings, &consumed);

    actor.direction = input.move_axis;
    if let Some(facing) = Facing::from_direction(input.move_axis) {
        actor.facing = facing;
    }

    if input.next_tool {
        actor.tool = cycle(&TOOL_ORDER, actor.tool, 1);
    }
    if input.prev_tool {
        actor.tool = cycle(&TOOL_ORDER, actor.tool, -1);
    }
    if input.next_seed {
        actor.seed = cycle(&SEED_ORDER, actor.seed, 1);
    }

    let target = tool_target(transform.translation.truncate(), actor.facing);
    if input.use_tool {
        tool_events.send(ToolUseEvent {
            actor: entity,
            tool: actor.tool,
            target,
        });
    }
    if input.use_seed {
        tool_events.send(ToolUseEvent {
            actor: entity,
            tool: actor.seed,
            target,
        });
    }
    if input.interact {
        interact_events.send(InteractEvent { actor: entity });
    }
}

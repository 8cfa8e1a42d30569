//! NPC domain: villagers spawned by map data who wander and tend any
//! farmland they face. They use the same tool events as the player, so the
//! level treats both alike (except that NPC tools are silent).

use bevy::prelude::*;
use rand::Rng;

use crate::camera::CutsceneTrack;
use crate::farming::SoilGrid;
use crate::shared::*;

/// Decision timer and current plan for one NPC.
#[derive(Component, Debug, Clone)]
pub struct NpcBrain {
    pub think_timer: Timer,
    pub seed: FarmingTool,
}

impl Default for NpcBrain {
    fn default() -> Self {
        Self {
            think_timer: Timer::from_seconds(1.5, TimerMode::Repeating),
            seed: FarmingTool::CornSeed,
        }
    }
}

/// NPCs start with more seeds than they can plant.
const NPC_SEED_STOCK: u32 = 999;

pub fn spawn_npc(commands: &mut Commands, pos: Vec2) -> Entity {
    commands
        .spawn((
            Npc,
            NpcBrain::default(),
            MapScoped,
            Collidable,
            Actor {
                speed: 40.0,
                ..default()
            },
            AnimationClock::default(),
            Hitbox::new(Vec2::new(TILE_SIZE * 0.6, TILE_SIZE * 0.5)),
            ResourceInventory::with(&[
                (InventoryResource::CornSeed, NPC_SEED_STOCK),
                (InventoryResource::TomatoSeed, NPC_SEED_STOCK),
            ]),
            Sprite {
                color: Color::srgb(0.8, 0.55, 0.3),
                custom_size: Some(Vec2::new(TILE_SIZE * 0.8, TILE_SIZE)),
                ..default()
            },
            Transform::from_translation(pos.extend(Z_ACTOR)),
        ))
        .id()
}

/// The tool an NPC would use on the tile in front of it, if any.
pub fn chore_for(soil: &SoilGrid, tile: TilePos, seed: FarmingTool) -> Option<FarmingTool> {
    if !soil.is_farmable(tile) {
        return None;
    }
    match soil.tile(tile) {
        None => Some(FarmingTool::Hoe),
        Some(t) if t.plant.is_none() => Some(seed),
        Some(t) if !t.watered => Some(FarmingTool::WateringCan),
        Some(_) => None,
    }
}

/// Each NPC periodically either does a chore in front of it or picks a new
/// wandering direction. Blocked NPCs keep their timers but make no decisions.
pub fn npc_think(
    time: Res<Time>,
    soil: Res<SoilGrid>,
    cutscene: Res<CutsceneTrack>,
    mut npcs: Query<(Entity, &Transform, &mut Actor, &mut NpcBrain), With<Npc>>,
    mut tool_events: EventWriter<ToolUseEvent>,
) {
    let mut rng = rand::thread_rng();
    for (entity, transform, mut actor, mut brain) in &mut npcs {
        if !brain.think_timer.tick(time.delta()).just_finished() {
            continue;
        }
        if actor.blocked || cutscene.active {
            actor.direction = Vec2::ZERO;
            continue;
        }
        let target = tool_target(transform.translation.truncate(), actor.facing);
        if let Some(tool) = chore_for(&soil, map_coords_to_tile(target), brain.seed) {
            actor.direction = Vec2::ZERO;
            tool_events.send(ToolUseEvent {
                actor: entity,
                tool,
                target,
            });
            if tool.is_seed() {
                brain.seed = if brain.seed == FarmingTool::CornSeed {
                    FarmingTool::TomatoSeed
                } else {
                    FarmingTool::CornSeed
                };
            }
            continue;
        }
        actor.direction = match rng.gen_range(0..5) {
            0 => Vec2::Y,
            1 => Vec2::NEG_Y,
            2 => Vec2::X,
            3 => Vec2::NEG_X,
            _ => Vec2::ZERO,
        };
        if let Some(facing) = Facing::from_direction(actor.direction) {
            actor.facing = facing;
        }
    }
}

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, npc_think.in_set(LevelSet::Simulate));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chores_follow_the_soil_cycle() {
        let mut soil = SoilGrid::default();
        soil.set_farmable([(3, 3)]);
        let seed = FarmingTool::TomatoSeed;
        assert_eq!(chore_for(&soil, (3, 3), seed), Some(FarmingTool::Hoe));
        soil.hoe((3, 3));
        assert_eq!(chore_for(&soil, (3, 3), seed), Some(seed));
        soil.plant((3, 3), seed, |_, _| true);
        assert_eq!(chore_for(&soil, (3, 3), seed), Some(FarmingTool::WateringCan));
        soil.water((3, 3));
        assert_eq!(chore_for(&soil, (3, 3), seed), None);
        assert_eq!(chore_for(&soil, (9, 9), seed), None);
    }
}

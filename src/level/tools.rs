//! Tool dispatch: one tool use becomes exactly one world mutation plus its
//! sound cue. Only the player's tool use is audible.

use bevy::prelude::*;

use crate::farming::SoilGrid;
use crate::shared::*;
use crate::world::objects::{spawn_drop, stump_sprite, Fruit, TreeObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolHandler {
    Chop,
    Till,
    Water,
    /// Every kind that is not a tool is a seed.
    Plant(FarmingTool),
}

pub fn handler_for(tool: FarmingTool) -> ToolHandler {
    match tool {
        FarmingTool::Axe => ToolHandler::Chop,
        FarmingTool::Hoe => ToolHandler::Till,
        FarmingTool::WateringCan => ToolHandler::Water,
        seed => ToolHandler::Plant(seed),
    }
}

/// The actor applying a tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolUser {
    pub position: Vec2,
    pub facing: Facing,
    pub is_player: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutcome {
    pub trees_hit: Vec<Entity>,
    pub sounds: Vec<&'static str>,
}

impl ToolOutcome {
    fn sound(&mut self, user: &ToolUser, sfx: &'static str) {
        if user.is_player {
            self.sounds.push(sfx);
        }
    }
}

/// Apply `tool` at `target`. Trees are matched against the user's attack
/// area, never its full hitbox.
pub fn apply_tool(
    tool: FarmingTool,
    target: Vec2,
    user: &ToolUser,
    soil: &mut SoilGrid,
    inventory: &mut ResourceInventory,
    trees: &[(Entity, Rect)],
) -> ToolOutcome {
    let mut outcome = ToolOutcome::default();
    let tile = map_coords_to_tile(target);
    match handler_for(tool) {
        ToolHandler::Chop => {
            let reach = attack_area(user.position, user.facing);
            for (tree, rect) in trees {
                if overlaps(reach, *rect) {
                    outcome.trees_hit.push(*tree);
                    outcome.sound(user, "axe");
                }
            }
        }
        ToolHandler::Till => {
            if soil.hoe(tile) {
                outcome.sound(user, "hoe");
            }
        }
        ToolHandler::Water => {
            soil.water(tile);
            outcome.sound(user, "water");
        }
        ToolHandler::Plant(seed) => {
            if soil.plant(tile, seed, |resource, amount| inventory.remove(resource, amount)) {
                outcome.sound(user, "plant");
            } else {
                outcome.sound(user, "cant_plant");
            }
        }
    }
    outcome
}

/// Resolve every `ToolUseEvent` against the world.
pub fn handle_tool_use(
    mut commands: Commands,
    mut events: EventReader<ToolUseEvent>,
    mut soil: ResMut<SoilGrid>,
    mut actors: Query<(&Transform, &Actor, &mut ResourceInventory, Has<Player>)>,
    mut trees: Query<(Entity, &Transform, &Hitbox, &mut TreeObject, &mut Sprite)>,
    fruit: Query<&Transform, With<Fruit>>,
    mut sfx: EventWriter<PlaySfxEvent>,
) {
    for event in events.read() {
        let Ok((transform, actor, mut inventory, is_player)) = actors.get_mut(event.actor) else {
            continue;
        };
        let user = ToolUser {
            position: transform.translation.truncate(),
            facing: actor.facing,
            is_player,
        };
        let tree_rects: Vec<(Entity, Rect)> = trees
            .iter()
            .map(|(entity, tf, hitbox, _, _)| (entity, hitbox.rect_at(tf.translation.truncate())))
            .collect();

        let outcome = apply_tool(
            event.tool,
            event.target,
            &user,
            &mut soil,
            &mut inventory,
            &tree_rects,
        );

        for tree_entity in outcome.trees_hit {
            let Ok((_, tree_tf, _, mut tree, mut sprite)) = trees.get_mut(tree_entity) else {
                continue;
            };
            let hit = tree.hit();
            for fruit_entity in hit.dropped {
                let pos = fruit
                    .get(fruit_entity)
                    .map(|tf| tf.translation.truncate())
                    .unwrap_or(tree_tf.translation.truncate());
                commands.entity(fruit_entity).despawn_recursive();
                // Lands at the foot of the tree.
                let landing = Vec2::new(pos.x, tree_tf.translation.y - TILE_SIZE * 0.5);
                spawn_drop(&mut commands, InventoryResource::Apple, landing);
            }
            if hit.felled {
                *sprite = stump_sprite();
                inventory.add(InventoryResource::Wood, 1);
                info!("[Level] Tree felled at {:?}", tree_tf.translation.truncate());
            }
        }
        for sound in outcome.sounds {
            sfx.send(PlaySfxEvent::new(sound));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(position: Vec2, facing: Facing) -> ToolUser {
        ToolUser {
            position,
            facing,
            is_player: true,
        }
    }

    fn farm_soil() -> SoilGrid {
        let mut soil = SoilGrid::default();
        soil.set_farmable([(0, 0), (1, 0), (2, 0)]);
        soil
    }

    #[test]
    fn dispatch_table_is_total() {
        for tool in FarmingTool::ALL {
            let handler = handler_for(tool);
            match tool {
                FarmingTool::Axe => assert_eq!(handler, ToolHandler::Chop),
                FarmingTool::Hoe => assert_eq!(handler, ToolHandler::Till),
                FarmingTool::WateringCan => assert_eq!(handler, ToolHandler::Water),
                seed => {
                    assert!(seed.is_seed());
                    assert_eq!(handler, ToolHandler::Plant(seed));
                }
            }
        }
    }

    #[test]
    fn chop_hits_the_tree_in_reach() {
        let user = player_at(Vec2::new(100.0, 100.0), Facing::Right);
        let near = Entity::from_raw(1);
        let far = Entity::from_raw(2);
        let trees = [
            (near, Rect::from_center_size(Vec2::new(112.0, 100.0), Vec2::splat(12.0))),
            (far, Rect::from_center_size(Vec2::new(200.0, 100.0), Vec2::splat(12.0))),
        ];
        let outcome = apply_tool(
            FarmingTool::Axe,
            Vec2::ZERO,
            &user,
            &mut SoilGrid::default(),
            &mut ResourceInventory::default(),
            &trees,
        );
        assert_eq!(outcome.trees_hit, vec![near]);
        assert_eq!(outcome.sounds, vec!["axe"]);
    }

    #[test]
    fn npc_chop_is_silent() {
        let user = ToolUser {
            is_player: false,
            ..player_at(Vec2::new(100.0, 100.0), Facing::Up)
        };
        let tree = Entity::from_raw(3);
        let trees = [(tree, Rect::from_center_size(Vec2::new(100.0, 112.0), Vec2::splat(12.0)))];
        let outcome = apply_tool(
            FarmingTool::Axe,
            Vec2::ZERO,
            &user,
            &mut SoilGrid::default(),
            &mut ResourceInventory::default(),
            &trees,
        );
        assert_eq!(outcome.trees_hit, vec![tree]);
        assert!(outcome.sounds.is_empty());
    }

    #[test]
    fn chop_does_not_reach_behind() {
        let user = player_at(Vec2::new(100.0, 100.0), Facing::Left);
        let trees = [(
            Entity::from_raw(1),
            Rect::from_center_size(Vec2::new(112.0, 100.0), Vec2::splat(12.0)),
        )];
        let outcome = apply_tool(
            FarmingTool::Axe,
            Vec2::ZERO,
            &user,
            &mut SoilGrid::default(),
            &mut ResourceInventory::default(),
            &trees,
        );
        assert!(outcome.trees_hit.is_empty());
        assert!(outcome.sounds.is_empty());
    }

    #[test]
    fn till_sounds_only_on_success() {
        let user = player_at(Vec2::ZERO, Facing::Down);
        let mut soil = farm_soil();
        let mut inv = ResourceInventory::default();
        let target = tile_center((1, 0));
        let first = apply_tool(FarmingTool::Hoe, target, &user, &mut soil, &mut inv, &[]);
        assert_eq!(first.sounds, vec!["hoe"]);
        let again = apply_tool(FarmingTool::Hoe, target, &user, &mut soil, &mut inv, &[]);
        assert!(again.sounds.is_empty());
    }

    #[test]
    fn water_always_sounds() {
        let user = player_at(Vec2::ZERO, Facing::Down);
        let mut soil = farm_soil();
        let outcome = apply_tool(
            FarmingTool::WateringCan,
            tile_center((5, 5)),
            &user,
            &mut soil,
            &mut ResourceInventory::default(),
            &[],
        );
        assert_eq!(outcome.sounds, vec!["water"]);
    }

    #[test]
    fn seed_without_stock_cannot_plant() {
        let user = player_at(Vec2::ZERO, Facing::Down);
        let mut soil = farm_soil();
        soil.hoe((0, 0));
        let mut inv = ResourceInventory::default();
        let outcome = apply_tool(
            FarmingTool::CornSeed,
            tile_center((0, 0)),
            &user,
            &mut soil,
            &mut inv,
            &[],
        );
        assert_eq!(outcome.sounds, vec!["cant_plant"]);
        assert!(!soil.has_plants());
    }

    #[test]
    fn seed_with_stock_plants_and_consumes_one() {
        let user = player_at(Vec2::ZERO, Facing::Down);
        let mut soil = farm_soil();
        soil.hoe((2, 0));
        let mut inv = ResourceInventory::with(&[(InventoryResource::TomatoSeed, 3)]);
        let outcome = apply_tool(
            FarmingTool::TomatoSeed,
            tile_center((2, 0)),
            &user,
            &mut soil,
            &mut inv,
            &[],
        );
        assert_eq!(outcome.sounds, vec!["plant"]);
        assert_eq!(inv.count(InventoryResource::TomatoSeed), 2);
        assert!(soil.has_plants());
    }
}

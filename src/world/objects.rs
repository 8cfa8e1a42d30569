//! Per-map world objects: trees and their fruit, drops, warps, interactables
//! and the short-lived harvest particles.

use bevy::prelude::*;

use super::maps::InteractionKind;
use crate::shared::*;

pub const TREE_HEALTH: u32 = 5;

/// Fruit positions relative to the tree trunk.
const FRUIT_SLOTS: [Vec2; 3] = [
    Vec2::new(-5.0, 10.0),
    Vec2::new(4.0, 14.0),
    Vec2::new(6.0, 7.0),
];

#[derive(Component, Debug, Clone)]
pub struct TreeObject {
    pub health: u32,
    pub alive: bool,
    pub fruit: Vec<Entity>,
}

impl Default for TreeObject {
    fn default() -> Self {
        Self {
            health: TREE_HEALTH,
            alive: true,
            fruit: Vec::new(),
        }
    }
}

/// What a single axe hit knocked loose.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeHit {
    pub dropped: Vec<Entity>,
    pub felled: bool,
}

impl TreeObject {
    /// One axe hit. Each hit shakes loose one fruit; the hit that brings
    /// health to zero turns the tree into a stump and drops the rest.
    /// Stumps ignore hits.
    pub fn hit(&mut self) -> TreeHit {
        if !self.alive {
            return TreeHit::default();
        }
        self.health = self.health.saturating_sub(1);
        let mut dropped: Vec<Entity> = self.fruit.pop().into_iter().collect();
        let felled = self.health == 0;
        if felled {
            self.alive = false;
            dropped.append(&mut self.fruit);
        }
        TreeHit { dropped, felled }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Fruit;

/// An item lying on the ground, collected by walking over it.
#[derive(Component, Debug, Clone, Copy)]
pub struct DropItem {
    pub resource: InventoryResource,
    pub amount: u32,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct ExitWarp {
    pub area: Rect,
    pub to: MapId,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Interactable {
    pub kind: InteractionKind,
    pub area: Rect,
}

/// A harvested sprite fading out where the plant used to be.
#[derive(Component, Debug, Clone)]
pub struct HarvestParticle {
    pub lifetime: f32,
    pub elapsed: f32,
}

impl Default for HarvestParticle {
    fn default() -> Self {
        Self {
            lifetime: 0.4,
            elapsed: 0.0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN HELPERS
// ═══════════════════════════════════════════════════════════════════════

const TREE_COLOR: Color = Color::srgb(0.18, 0.45, 0.2);
const STUMP_COLOR: Color = Color::srgb(0.45, 0.3, 0.15);
const FRUIT_COLOR: Color = Color::srgb(0.85, 0.15, 0.1);

pub fn tree_hitbox() -> Hitbox {
    Hitbox {
        size: Vec2::new(TILE_SIZE * 0.75, TILE_SIZE * 0.5),
        offset: Vec2::new(0.0, -TILE_SIZE * 0.25),
    }
}

pub fn spawn_tree(commands: &mut Commands, pos: Vec2) -> Entity {
    let fruit = grow_fruit(commands, pos);
    commands
        .spawn((
            TreeObject {
                fruit,
                ..default()
            },
            MapScoped,
            Collidable,
            tree_hitbox(),
            Sprite {
                color: TREE_COLOR,
                custom_size: Some(Vec2::new(TILE_SIZE, TILE_SIZE * 1.5)),
                ..default()
            },
            Transform::from_translation(pos.extend(Z_OBJECT)),
        ))
        .id()
}

/// Spawn a fresh set of fruit for a tree standing at `pos`.
pub fn grow_fruit(commands: &mut Commands, pos: Vec2) -> Vec<Entity> {
    FRUIT_SLOTS
        .iter()
        .map(|slot| {
            commands
                .spawn((
                    Fruit,
                    MapScoped,
                    Sprite {
                        color: FRUIT_COLOR,
                        custom_size: Some(Vec2::splat(4.0)),
                        ..default()
                    },
                    Transform::from_translation((pos + *slot).extend(Z_OBJECT + 0.5)),
                ))
                .id()
        })
        .collect()
}

pub fn stump_sprite() -> Sprite {
    Sprite {
        color: STUMP_COLOR,
        custom_size: Some(Vec2::new(TILE_SIZE, TILE_SIZE * 0.5)),
        ..default()
    }
}

pub fn spawn_drop(commands: &mut Commands, resource: InventoryResource, pos: Vec2) -> Entity {
    commands
        .spawn((
            DropItem {
                resource,
                amount: 1,
            },
            MapScoped,
            Hitbox::new(Vec2::splat(6.0)),
            Sprite {
                color: FRUIT_COLOR,
                custom_size: Some(Vec2::splat(4.0)),
                ..default()
            },
            Transform::from_translation(pos.extend(Z_OBJECT + 0.5)),
        ))
        .id()
}

pub fn spawn_particle(commands: &mut Commands, pos: Vec2, color: Color) {
    commands.spawn((
        HarvestParticle::default(),
        MapScoped,
        Sprite {
            color,
            custom_size: Some(Vec2::splat(TILE_SIZE * 0.75)),
            ..default()
        },
        Transform::from_translation(pos.extend(Z_PARTICLE)),
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Pick up any drop the player is standing on.
pub fn collect_drops(
    mut commands: Commands,
    mut player_query: Query<(&Transform, &Hitbox, &mut ResourceInventory), With<Player>>,
    drops: Query<(Entity, &Transform, &Hitbox, &DropItem)>,
    mut sfx: EventWriter<PlaySfxEvent>,
) {
    let Ok((player_tf, player_hitbox, mut inventory)) = player_query.get_single_mut() else {
        return;
    };
    let player_rect = player_hitbox.rect_at(player_tf.translation.truncate());
    for (entity, tf, hitbox, drop) in &drops {
        if overlaps(player_rect, hitbox.rect_at(tf.translation.truncate())) {
            inventory.add(drop.resource, drop.amount);
            commands.entity(entity).despawn_recursive();
            sfx.send(PlaySfxEvent::new("pickup"));
        }
    }
}

pub fn fade_particles(
    time: Res<Time>,
    mut commands: Commands,
    mut particles: Query<(Entity, &mut HarvestParticle, &mut Sprite)>,
) {
    let dt = time.delta_secs();
    for (entity, mut particle, mut sprite) in &mut particles {
        particle.elapsed += dt;
        if particle.elapsed >= particle.lifetime {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let alpha = 1.0 - particle.elapsed / particle.lifetime;
        sprite.color = sprite.color.with_alpha(alpha);
    }
}

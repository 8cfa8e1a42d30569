use bevy::prelude::*;

use crate::shared::*;
use crate::world::objects::{DropItem, ExitWarp, Interactable};
use crate::world::weather::{RainEffect, Weather};

/// Read-only walkability grid for the loaded map, indexed `[row][column]`.
/// Provided by whoever builds pathfinding data; the overlay only reads it.
#[derive(Resource, Debug, Clone, Default)]
pub struct NavGrid {
    pub walkable: Vec<Vec<bool>>,
}

impl NavGrid {
    /// Tiles nothing can walk through.
    pub fn blocked_tiles(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.walkable.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, walkable)| !**walkable)
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }
}

/// Draw collision geometry while the hitbox overlay is toggled on.
pub fn draw_hitboxes(
    debug: Res<DebugOverlayState>,
    nav: Option<Res<NavGrid>>,
    mut gizmos: Gizmos,
    collidables: Query<(&Transform, &Hitbox, Option<&Actor>), With<Collidable>>,
    drops: Query<(&Transform, &Hitbox), With<DropItem>>,
    warps: Query<&ExitWarp>,
    interactables: Query<&Interactable>,
) {
    if !debug.visible {
        return;
    }
    if let Some(nav) = nav {
        for tile in nav.blocked_tiles() {
            gizmos.rect_2d(
                Isometry2d::from_translation(tile_center(tile)),
                Vec2::splat(TILE_SIZE),
                Color::srgba(1.0, 0.5, 0.5, 0.36),
            );
        }
    }
    for (tf, hitbox, actor) in &collidables {
        let pos = tf.translation.truncate();
        let rect = hitbox.rect_at(pos);
        gizmos.rect_2d(Isometry2d::from_translation(rect.center()), rect.size(), Color::srgb(0.0, 0.0, 1.0));
        if let Some(actor) = actor {
            let reach = attack_area(pos, actor.facing);
            gizmos.rect_2d(
                Isometry2d::from_translation(reach.center()),
                reach.size(),
                Color::srgb(0.0, 1.0, 0.0),
            );
        }
    }
    for (tf, hitbox) in &drops {
        let rect = hitbox.rect_at(tf.translation.truncate());
        gizmos.rect_2d(Isometry2d::from_translation(rect.center()), rect.size(), Color::srgb(1.0, 0.0, 0.0));
    }
    for warp in &warps {
        gizmos.rect_2d(
            Isometry2d::from_translation(warp.area.center()),
            warp.area.size(),
            Color::srgb(1.0, 1.0, 0.0),
        );
    }
    for interactable in &interactables {
        gizmos.rect_2d(
            Isometry2d::from_translation(interactable.area.center()),
            interactable.area.size(),
            Color::srgb(1.0, 0.0, 1.0),
        );
    }
}

pub fn draw_rain(weather: Res<Weather>, rain: Res<RainEffect>, mut gizmos: Gizmos) {
    if !weather.raining {
        return;
    }
    let streak = Vec2::new(1.5, 6.0);
    for drop in &rain.drops {
        gizmos.line_2d(*drop, *drop + streak, Color::srgba(0.7, 0.8, 1.0, 0.6));
    }
}

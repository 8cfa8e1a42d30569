//! Harvest on contact: actors walking over ripe plants pick them.

use bevy::prelude::*;

use super::render::plant_color;
use super::soil::SoilGrid;
use crate::shared::*;
use crate::world::objects::spawn_particle;

/// Plant tiles whose sprite overlaps `rect`.
pub fn overlapping_plants(soil: &SoilGrid, rect: Rect) -> Vec<TilePos> {
    soil.plants()
        .filter(|(pos, _)| overlaps(tile_rect(*pos), rect))
        .map(|(pos, _)| pos)
        .collect()
}

/// Every actor (player and NPCs) harvests each ripe plant its hitbox
/// touches. The overlapping set is snapshotted before any plant is removed.
pub fn harvest_on_contact(
    mut commands: Commands,
    mut soil: ResMut<SoilGrid>,
    mut actors: Query<(&Transform, &Hitbox, &mut ResourceInventory), With<Actor>>,
) {
    if !soil.has_plants() {
        return;
    }
    for (transform, hitbox, mut inventory) in &mut actors {
        let rect = hitbox.rect_at(transform.translation.truncate());
        for pos in overlapping_plants(&soil, rect) {
            let harvested = soil.harvest(pos, |resource, amount| inventory.add(resource, amount));
            if let Some(plant) = harvested {
                spawn_particle(&mut commands, tile_center(pos), plant_color(&plant));
            }
        }
    }
}

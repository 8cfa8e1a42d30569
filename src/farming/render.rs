//! Visual synchronisation: keep soil and plant sprites in sync with the grid.

use bevy::prelude::*;

use super::soil::{Plant, SoilGrid, SoilTile};
use super::FarmEntities;
use crate::shared::*;

pub fn soil_color(tile: &SoilTile) -> Color {
    if tile.watered {
        Color::srgb(0.35, 0.22, 0.12)
    } else {
        Color::srgb(0.55, 0.38, 0.2)
    }
}

pub fn plant_color(plant: &Plant) -> Color {
    match (plant.seed, plant.harvestable()) {
        (FarmingTool::CornSeed, true) => Color::srgb(0.95, 0.85, 0.2),
        (FarmingTool::TomatoSeed, true) => Color::srgb(0.9, 0.2, 0.15),
        _ => Color::srgb(0.3, 0.7, 0.25),
    }
}

fn plant_size(plant: &Plant) -> Vec2 {
    let stage = plant.age.min(super::soil::grow_days(plant.seed)) as f32 + 1.0;
    Vec2::splat((4.0 + stage * 2.5).min(TILE_SIZE * 0.8))
}

/// Spawn, recolour and despawn soil and plant sprites to match `SoilGrid`.
pub fn sync_soil_sprites(
    mut commands: Commands,
    mut entities: ResMut<FarmEntities>,
    soil: Res<SoilGrid>,
    mut sprites: Query<&mut Sprite>,
) {
    for (pos, tile) in soil.tiles() {
        match entities.soil.get(&pos) {
            Some(&entity) => {
                if let Ok(mut sprite) = sprites.get_mut(entity) {
                    sprite.color = soil_color(tile);
                }
            }
            None => {
                let entity = commands
                    .spawn((
                        Sprite {
                            color: soil_color(tile),
                            custom_size: Some(Vec2::splat(TILE_SIZE)),
                            ..default()
                        },
                        Transform::from_translation(tile_center(pos).extend(Z_SOIL)),
                    ))
                    .id();
                entities.soil.insert(pos, entity);
            }
        }

        match (tile.plant, entities.plants.get(&pos).copied()) {
            (Some(plant), Some(entity)) => {
                if let Ok(mut sprite) = sprites.get_mut(entity) {
                    sprite.color = plant_color(&plant);
                    sprite.custom_size = Some(plant_size(&plant));
                }
            }
            (Some(plant), None) => {
                let entity = commands
                    .spawn((
                        Sprite {
                            color: plant_color(&plant),
                            custom_size: Some(plant_size(&plant)),
                            ..default()
                        },
                        Transform::from_translation(tile_center(pos).extend(Z_SOIL + 0.5)),
                    ))
                    .id();
                entities.plants.insert(pos, entity);
            }
            (None, Some(entity)) => {
                commands.entity(entity).despawn_recursive();
                entities.plants.remove(&pos);
            }
            (None, None) => {}
        }
    }

    // Tiles that left the grid (map load or reset).
    let stale_soil: Vec<TilePos> = entities
        .soil
        .keys()
        .filter(|pos| soil.tile(**pos).is_none())
        .copied()
        .collect();
    for pos in stale_soil {
        if let Some(entity) = entities.soil.remove(&pos) {
            commands.entity(entity).despawn_recursive();
        }
        if let Some(entity) = entities.plants.remove(&pos) {
            commands.entity(entity).despawn_recursive();
        }
    }
}

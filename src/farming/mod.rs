//! Farming domain: soil grid, harvest on contact, soil and plant sprites.
//!
//! Tool use against the grid is dispatched by the player domain; this module
//! owns the grid itself and what happens when actors walk over plants.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::shared::*;

pub mod harvest;
pub mod render;
pub mod soil;

pub use soil::SoilGrid;

/// Sprite entities for hoed tiles and plants, keyed by tile.
#[derive(Resource, Default, Debug)]
pub struct FarmEntities {
    pub soil: HashMap<TilePos, Entity>,
    pub plants: HashMap<TilePos, Entity>,
}

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoilGrid>()
            .init_resource::<FarmEntities>()
            .add_systems(
                Update,
                harvest::harvest_on_contact
                    .after(crate::player::movement::move_actors)
                    .in_set(LevelSet::Simulate),
            )
            .add_systems(Update, render::sync_soil_sprites.in_set(LevelSet::Draw));
    }
}

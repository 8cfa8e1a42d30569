//! Soil grid: per-tile hoe/water/plant state for the loaded map.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::shared::*;

/// Days a watered plant needs before it can be harvested.
pub fn grow_days(seed: FarmingTool) -> u32 {
    match seed {
        FarmingTool::CornSeed => 3,
        FarmingTool::TomatoSeed => 4,
        _ => u32::MAX,
    }
}

/// The crop a seed kind yields.
pub fn crop_for(seed: FarmingTool) -> Option<InventoryResource> {
    match seed {
        FarmingTool::CornSeed => Some(InventoryResource::Corn),
        FarmingTool::TomatoSeed => Some(InventoryResource::Tomato),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plant {
    pub seed: FarmingTool,
    pub age: u32,
}

impl Plant {
    pub fn harvestable(&self) -> bool {
        self.age >= grow_days(self.seed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoilTile {
    pub watered: bool,
    pub plant: Option<Plant>,
}

/// Farming state of the current map. Cleared on every map load.
#[derive(Resource, Debug, Clone, Default)]
pub struct SoilGrid {
    farmable: HashSet<TilePos>,
    /// Hoed tiles only; a tile absent from this map is untouched ground.
    tiles: HashMap<TilePos, SoilTile>,
    pub raining: bool,
}

impl SoilGrid {
    /// Every tile reverts to unfarmed and the farmable set is emptied.
    pub fn reset(&mut self) {
        self.farmable.clear();
        self.tiles.clear();
    }

    pub fn set_farmable(&mut self, tiles: impl IntoIterator<Item = TilePos>) {
        self.farmable.extend(tiles);
    }

    pub fn is_farmable(&self, pos: TilePos) -> bool {
        self.farmable.contains(&pos)
    }

    pub fn has_farmable(&self) -> bool {
        !self.farmable.is_empty()
    }

    pub fn has_plants(&self) -> bool {
        self.tiles.values().any(|t| t.plant.is_some())
    }

    pub fn tile(&self, pos: TilePos) -> Option<&SoilTile> {
        self.tiles.get(&pos)
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TilePos, &SoilTile)> {
        self.tiles.iter().map(|(pos, tile)| (*pos, tile))
    }

    pub fn plants(&self) -> impl Iterator<Item = (TilePos, &Plant)> {
        self.tiles
            .iter()
            .filter_map(|(pos, tile)| tile.plant.as_ref().map(|plant| (*pos, plant)))
    }

    /// Till untouched farmable ground. Tiles hoed in the rain start wet.
    pub fn hoe(&mut self, pos: TilePos) -> bool {
        if !self.is_farmable(pos) || self.tiles.contains_key(&pos) {
            return false;
        }
        self.tiles.insert(
            pos,
            SoilTile {
                watered: self.raining,
                plant: None,
            },
        );
        true
    }

    pub fn water(&mut self, pos: TilePos) -> bool {
        match self.tiles.get_mut(&pos) {
            Some(tile) if !tile.watered => {
                tile.watered = true;
                true
            }
            _ => false,
        }
    }

    /// Plant `seed` on hoed, empty soil. `remove` is asked for one unit of
    /// the seed resource and the plant is only placed when it succeeds.
    pub fn plant(
        &mut self,
        pos: TilePos,
        seed: FarmingTool,
        remove: impl FnOnce(InventoryResource, u32) -> bool,
    ) -> bool {
        let Some(resource) = seed.seed_resource() else {
            return false;
        };
        let Some(tile) = self.tiles.get_mut(&pos) else {
            return false;
        };
        if tile.plant.is_some() || !remove(resource, 1) {
            return false;
        }
        tile.plant = Some(Plant { seed, age: 0 });
        true
    }

    /// One day passes: watered plants grow, soil dries unless it rains.
    pub fn update(&mut self) {
        for tile in self.tiles.values_mut() {
            if tile.watered {
                if let Some(plant) = tile.plant.as_mut() {
                    plant.age += 1;
                }
            }
            tile.watered = self.raining;
        }
    }

    /// Harvest a ripe plant at `pos`. The crop goes to `add`; the harvested
    /// plant is returned so the caller can show where it was.
    pub fn harvest(
        &mut self,
        pos: TilePos,
        add: impl FnOnce(InventoryResource, u32),
    ) -> Option<Plant> {
        let tile = self.tiles.get_mut(&pos)?;
        let plant = tile.plant.filter(Plant::harvestable)?;
        tile.plant = None;
        if let Some(crop) = crop_for(plant.seed) {
            add(crop, 1);
        }
        Some(plant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SoilGrid {
        let mut grid = SoilGrid::default();
        grid.set_farmable([(0, 0), (1, 0)]);
        grid
    }

    #[test]
    fn hoe_needs_farmable_untouched_ground() {
        let mut grid = grid();
        assert!(grid.hoe((0, 0)));
        assert!(!grid.hoe((0, 0)));
        assert!(!grid.hoe((5, 5)));
    }

    #[test]
    fn plant_consumes_seed_only_on_success() {
        let mut grid = grid();
        let mut inv = ResourceInventory::with(&[(InventoryResource::CornSeed, 2)]);

        // Unhoed soil: remover never called.
        assert!(!grid.plant((0, 0), FarmingTool::CornSeed, |r, n| inv.remove(r, n)));
        assert_eq!(inv.count(InventoryResource::CornSeed), 2);

        grid.hoe((0, 0));
        assert!(grid.plant((0, 0), FarmingTool::CornSeed, |r, n| inv.remove(r, n)));
        assert_eq!(inv.count(InventoryResource::CornSeed), 1);

        // Occupied.
        assert!(!grid.plant((0, 0), FarmingTool::CornSeed, |r, n| inv.remove(r, n)));
        assert_eq!(inv.count(InventoryResource::CornSeed), 1);
    }

    #[test]
    fn plant_fails_without_seed_in_inventory() {
        let mut grid = grid();
        grid.hoe((1, 0));
        let mut inv = ResourceInventory::default();
        assert!(!grid.plant((1, 0), FarmingTool::TomatoSeed, |r, n| inv.remove(r, n)));
        assert_eq!(grid.tile((1, 0)).and_then(|t| t.plant), None);
    }

    #[test]
    fn watered_plants_grow_and_become_harvestable() {
        let mut grid = grid();
        grid.hoe((0, 0));
        grid.plant((0, 0), FarmingTool::CornSeed, |_, _| true);
        for _ in 0..grow_days(FarmingTool::CornSeed) {
            assert!(grid.water((0, 0)));
            grid.update();
        }
        let mut got = Vec::new();
        let plant = grid.harvest((0, 0), |r, n| got.push((r, n)));
        assert!(plant.is_some());
        assert_eq!(got, vec![(InventoryResource::Corn, 1)]);
        assert!(!grid.has_plants());
    }

    #[test]
    fn unripe_plants_are_not_harvested() {
        let mut grid = grid();
        grid.hoe((0, 0));
        grid.plant((0, 0), FarmingTool::TomatoSeed, |_, _| true);
        let mut called = false;
        assert!(grid.harvest((0, 0), |_, _| called = true).is_none());
        assert!(!called);
        assert!(grid.has_plants());
    }

    #[test]
    fn dry_soil_does_not_grow_but_rain_waters() {
        let mut grid = grid();
        grid.hoe((0, 0));
        grid.plant((0, 0), FarmingTool::CornSeed, |_, _| true);
        grid.update();
        assert_eq!(grid.plants().next().map(|(_, p)| p.age), Some(0));

        grid.raining = true;
        grid.update();
        assert!(grid.tile((0, 0)).is_some_and(|t| t.watered));
    }

    #[test]
    fn reset_clears_everything() {
        let mut grid = grid();
        grid.hoe((0, 0));
        grid.reset();
        assert!(!grid.has_farmable());
        assert!(grid.tile((0, 0)).is_none());
    }
}

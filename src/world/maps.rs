//! Map data definitions for all level areas.
//!
//! A `MapSource` is authored data (built in, or read from RON) expressed in
//! tile units. A `MapDef` is the descriptor built from it on every load, in
//! world units. Descriptors are never cached: the next load replaces the
//! active one.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::camera::CameraTarget;
use crate::error::LevelError;
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    Bed,
    Trader,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitWarpSource {
    pub area: Area,
    pub to: MapId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractableSource {
    pub kind: InteractionKind,
    pub area: Area,
}

/// Authored map data, in tiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapSource {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub spawnpoint: Option<(f32, f32)>,
    /// Arrival positions keyed by the map the player comes from.
    #[serde(default)]
    pub entry_warps: BTreeMap<MapId, (f32, f32)>,
    #[serde(default)]
    pub exit_warps: Vec<ExitWarpSource>,
    #[serde(default)]
    pub collidables: Vec<Area>,
    #[serde(default)]
    pub interactables: Vec<InteractableSource>,
    #[serde(default)]
    pub trees: Vec<(f32, f32)>,
    /// Farmable regions as tile rectangles.
    #[serde(default)]
    pub farmland: Vec<Area>,
    #[serde(default)]
    pub npcs: Vec<(f32, f32)>,
    #[serde(default)]
    pub cutscene: Vec<CameraTarget>,
}

/// The loaded descriptor of the current map, in world units.
#[derive(Debug, Clone)]
pub struct MapDef {
    pub size: Vec2,
    pub spawnpoint: Option<Vec2>,
    pub entry_warps: BTreeMap<MapId, Vec2>,
    pub exit_warps: Vec<(Rect, MapId)>,
    pub collidables: Vec<Rect>,
    pub interactables: Vec<(InteractionKind, Rect)>,
    pub trees: Vec<Vec2>,
    pub farmable: HashSet<TilePos>,
    pub npcs: Vec<Vec2>,
    pub cutscene: Vec<CameraTarget>,
}

fn scale_point(p: (f32, f32)) -> Vec2 {
    Vec2::new(p.0, p.1) * TILE_SIZE
}

fn scale_area(a: &Area) -> Rect {
    Area::new(a.x * TILE_SIZE, a.y * TILE_SIZE, a.w * TILE_SIZE, a.h * TILE_SIZE).rect()
}

impl MapDef {
    pub fn build(source: &MapSource) -> Self {
        let mut farmable = HashSet::new();
        for area in &source.farmland {
            let (x0, y0) = (area.x.floor() as i32, area.y.floor() as i32);
            for dy in 0..area.h.ceil() as i32 {
                for dx in 0..area.w.ceil() as i32 {
                    farmable.insert((x0 + dx, y0 + dy));
                }
            }
        }

        let cutscene = source
            .cutscene
            .iter()
            .map(|t| CameraTarget {
                position: (t.position.0 * TILE_SIZE, t.position.1 * TILE_SIZE),
                speed: t.speed * TILE_SIZE,
                pause: t.pause,
                zoom: t.zoom,
            })
            .collect();

        Self {
            size: Vec2::new(source.width as f32, source.height as f32) * TILE_SIZE,
            spawnpoint: source.spawnpoint.map(scale_point),
            entry_warps: source
                .entry_warps
                .iter()
                .map(|(origin, p)| (*origin, scale_point(*p)))
                .collect(),
            exit_warps: source
                .exit_warps
                .iter()
                .map(|w| (scale_area(&w.area), w.to))
                .collect(),
            collidables: source.collidables.iter().map(scale_area).collect(),
            interactables: source
                .interactables
                .iter()
                .map(|i| (i.kind, scale_area(&i.area)))
                .collect(),
            trees: source.trees.iter().copied().map(scale_point).collect(),
            farmable,
            npcs: source.npcs.iter().copied().map(scale_point).collect(),
            cutscene,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════

/// Every map the level can load, keyed by id.
#[derive(Resource, Debug, Clone, Default)]
pub struct MapRegistry {
    maps: HashMap<MapId, MapSource>,
}

impl MapRegistry {
    pub fn get(&self, id: MapId) -> Option<&MapSource> {
        self.maps.get(&id)
    }

    pub fn contains(&self, id: MapId) -> bool {
        self.maps.contains_key(&id)
    }

    pub fn insert(&mut self, id: MapId, source: MapSource) {
        self.maps.insert(id, source);
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        let maps: HashMap<MapId, MapSource> = ron::from_str(text)?;
        Ok(Self { maps })
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text).map_err(|source| LevelError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The hand-authored maps shipped with the game.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.insert(MapId::Farm, farm());
        registry.insert(MapId::Forest, forest());
        registry.insert(MapId::PlayerHouse, player_house());
        registry.insert(MapId::Town, town());
        registry
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BUILT-IN MAPS
// ═══════════════════════════════════════════════════════════════════════

fn empty_map(width: u32, height: u32) -> MapSource {
    MapSource {
        width,
        height,
        ..default()
    }
}

// ---------------------------------------------------------------------------
// Farm: 32x24
// Layout: house at top-centre, field in the middle, pond bottom-right,
// exits east (forest) and south (town)
// ---------------------------------------------------------------------------
fn farm() -> MapSource {
    let mut map = empty_map(32, 24);
    map.spawnpoint = Some((16.0, 12.0));

    map.entry_warps.insert(MapId::PlayerHouse, (16.0, 18.5));
    map.entry_warps.insert(MapId::Forest, (30.0, 10.0));
    map.entry_warps.insert(MapId::Town, (15.5, 1.5));

    map.exit_warps = vec![
        ExitWarpSource { area: Area::new(15.0, 20.0, 2.0, 0.5), to: MapId::PlayerHouse },
        ExitWarpSource { area: Area::new(31.5, 8.0, 0.5, 4.0), to: MapId::Forest },
        ExitWarpSource { area: Area::new(14.0, 0.0, 3.0, 0.5), to: MapId::Town },
    ];

    // House footprint and pond
    map.collidables = vec![
        Area::new(13.0, 20.5, 6.0, 3.5),
        Area::new(24.0, 3.0, 5.0, 4.0),
    ];

    for x in (1..12).step_by(3) {
        map.trees.push((x as f32 + 0.5, 21.5));
    }
    map.trees.push((27.5, 20.5));
    map.trees.push((2.5, 8.5));

    map.farmland = vec![Area::new(6.0, 6.0, 14.0, 8.0)];
    map
}

// ---------------------------------------------------------------------------
// Forest: 40x30, dense trees, only reachable from the farm.
// Authored without a default spawnpoint; arrivals always use the warp.
// ---------------------------------------------------------------------------
fn forest() -> MapSource {
    let mut map = empty_map(40, 30);
    map.entry_warps.insert(MapId::Farm, (1.5, 15.0));
    map.exit_warps = vec![ExitWarpSource {
        area: Area::new(0.0, 13.0, 0.5, 4.0),
        to: MapId::Farm,
    }];
    for y in (3..28).step_by(4) {
        for x in (6..38).step_by(5) {
            let jitter = ((x * 7 + y * 3) % 3) as f32 * 0.5;
            map.trees.push((x as f32 + jitter, y as f32 + 0.5));
        }
    }
    map.npcs.push((12.0, 15.0));
    map
}

// ---------------------------------------------------------------------------
// Player house: 12x12 interior with the bed in the top-right corner.
// ---------------------------------------------------------------------------
fn player_house() -> MapSource {
    let mut map = empty_map(12, 12);
    map.spawnpoint = Some((6.0, 3.0));
    map.entry_warps.insert(MapId::Farm, (6.0, 1.5));
    map.exit_warps = vec![ExitWarpSource {
        area: Area::new(5.0, 0.0, 2.0, 0.5),
        to: MapId::Farm,
    }];
    // Walls
    map.collidables = vec![
        Area::new(0.0, 11.0, 12.0, 1.0),
        Area::new(0.0, 0.0, 1.0, 11.0),
        Area::new(11.0, 0.0, 1.0, 11.0),
    ];
    map.interactables = vec![InteractableSource {
        kind: InteractionKind::Bed,
        area: Area::new(8.0, 8.0, 2.0, 2.0),
    }];
    map
}

// ---------------------------------------------------------------------------
// Town: 40x30 with the trader's stall. A short pan introduces the square.
// ---------------------------------------------------------------------------
fn town() -> MapSource {
    let mut map = empty_map(40, 30);
    map.spawnpoint = Some((20.0, 15.0));
    map.entry_warps.insert(MapId::Farm, (16.0, 28.0));
    map.exit_warps = vec![ExitWarpSource {
        area: Area::new(15.0, 29.5, 3.0, 0.5),
        to: MapId::Farm,
    }];
    map.collidables = vec![
        Area::new(4.0, 18.0, 8.0, 6.0),
        Area::new(26.0, 18.0, 8.0, 6.0),
    ];
    map.interactables = vec![InteractableSource {
        kind: InteractionKind::Trader,
        area: Area::new(19.0, 20.0, 2.0, 1.0),
    }];
    map.trees = vec![(2.5, 3.5), (37.5, 3.5), (2.5, 26.5), (37.5, 26.5)];
    map.cutscene = vec![
        CameraTarget { position: (16.0, 28.0), speed: 12.0, pause: 0.5, zoom: 1.0 },
        CameraTarget { position: (20.0, 20.0), speed: 12.0, pause: 1.0, zoom: 1.25 },
        CameraTarget { position: (16.0, 28.0), speed: 12.0, pause: 0.0, zoom: 1.0 },
    ];
    map
}

//! Shared components, resources, events, and states for Sproutvale.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly, except through the
//! level orchestrator which owns the cross-domain wiring.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
    Shop,
    Dialogue,
}

/// True in every state where a level is loaded and should keep ticking.
pub fn in_level(state: Res<State<GameState>>) -> bool {
    *state.get() != GameState::Loading
}

/// Only the Playing state advances simulation.
/// Overlay states (pause, shop, dialogue) still tick transitions and redraw.
pub fn simulation_running(state: Res<State<GameState>>) -> bool {
    *state.get() == GameState::Playing
}

/// The level tick, in order. Every domain schedules into one of these.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelSet {
    /// Host events routed to the level.
    Events,
    /// Player against exit warps.
    ExitCheck,
    Weather,
    /// Both transitions advance; their actions are applied here too.
    Transitions,
    /// Actors, drops, particles, cutscene and shake. Playing only.
    Simulate,
    /// Camera and zoom follow. Playing only.
    Camera,
    Draw,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 16.0;
pub const PIXEL_SCALE: f32 = 3.0; // render scale (16px × 3 = 48px on screen)
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

/// Z layers for placeholder sprites.
pub const Z_GROUND: f32 = 0.0;
pub const Z_SOIL: f32 = 1.0;
pub const Z_OBJECT: f32 = 5.0;
pub const Z_ACTOR: f32 = 10.0;
pub const Z_PARTICLE: f32 = 20.0;

// ═══════════════════════════════════════════════════════════════════════
// WORLD & MAPS
// ═══════════════════════════════════════════════════════════════════════

/// Opaque key into the map registry. A key may be referenced by map data
/// (exit warps, entry warps) without being registered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MapId {
    Farm,
    Forest,
    Town,
    Beach,
    PlayerHouse,
    GeneralStore,
}

/// Grid coordinate of a farmable tile.
pub type TilePos = (i32, i32);

/// Convert a world-space position into the tile containing it.
pub fn map_coords_to_tile(pos: Vec2) -> TilePos {
    (
        (pos.x / TILE_SIZE).floor() as i32,
        (pos.y / TILE_SIZE).floor() as i32,
    )
}

/// World-space centre of a tile.
pub fn tile_center(tile: TilePos) -> Vec2 {
    Vec2::new(
        tile.0 as f32 * TILE_SIZE + TILE_SIZE * 0.5,
        tile.1 as f32 * TILE_SIZE + TILE_SIZE * 0.5,
    )
}

/// World-space rectangle covered by a tile.
pub fn tile_rect(tile: TilePos) -> Rect {
    Rect::from_center_size(tile_center(tile), Vec2::splat(TILE_SIZE))
}

/// Strict overlap test. Rectangles that only share an edge do not collide.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    !a.intersect(b).is_empty()
}

/// Serializable axis-aligned area, bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Area {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TOOLS & RESOURCES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FarmingTool {
    Axe,
    Hoe,
    WateringCan,
    CornSeed,
    TomatoSeed,
}

impl FarmingTool {
    pub const ALL: [FarmingTool; 5] = [
        FarmingTool::Axe,
        FarmingTool::Hoe,
        FarmingTool::WateringCan,
        FarmingTool::CornSeed,
        FarmingTool::TomatoSeed,
    ];

    /// The inventory resource consumed when this kind is planted, if any.
    pub fn seed_resource(self) -> Option<InventoryResource> {
        match self {
            FarmingTool::CornSeed => Some(InventoryResource::CornSeed),
            FarmingTool::TomatoSeed => Some(InventoryResource::TomatoSeed),
            _ => None,
        }
    }

    pub fn is_seed(self) -> bool {
        self.seed_resource().is_some()
    }
}

/// The ordered list of tools for cycling with Q/E.
pub const TOOL_ORDER: [FarmingTool; 3] =
    [FarmingTool::Hoe, FarmingTool::WateringCan, FarmingTool::Axe];

/// The ordered list of seeds for cycling with the seed key.
pub const SEED_ORDER: [FarmingTool; 2] = [FarmingTool::CornSeed, FarmingTool::TomatoSeed];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryResource {
    Wood,
    Apple,
    Corn,
    Tomato,
    CornSeed,
    TomatoSeed,
}

/// Resource counts carried by an actor (player or NPC).
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct ResourceInventory {
    pub counts: HashMap<InventoryResource, u32>,
}

impl ResourceInventory {
    pub fn with(entries: &[(InventoryResource, u32)]) -> Self {
        Self {
            counts: entries.iter().copied().collect(),
        }
    }

    pub fn count(&self, resource: InventoryResource) -> u32 {
        self.counts.get(&resource).copied().unwrap_or(0)
    }

    pub fn add(&mut self, resource: InventoryResource, amount: u32) {
        *self.counts.entry(resource).or_insert(0) += amount;
    }

    /// Remove `amount` units. Nothing is removed when the actor holds fewer.
    pub fn remove(&mut self, resource: InventoryResource, amount: u32) -> bool {
        match self.counts.get_mut(&resource) {
            Some(count) if *count >= amount => {
                *count -= amount;
                true
            }
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ACTORS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn offset(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::Y,
            Facing::Down => Vec2::NEG_Y,
            Facing::Left => Vec2::NEG_X,
            Facing::Right => Vec2::X,
        }
    }

    /// Facing for a movement direction, biased to vertical on diagonals.
    pub fn from_direction(dir: Vec2) -> Option<Self> {
        if dir == Vec2::ZERO {
            None
        } else if dir.y.abs() >= dir.x.abs() {
            Some(if dir.y > 0.0 { Facing::Up } else { Facing::Down })
        } else {
            Some(if dir.x > 0.0 { Facing::Right } else { Facing::Left })
        }
    }
}

/// The controlled character. Survives every map load.
#[derive(Component, Debug, Clone, Default)]
pub struct Player;

/// A non-player character spawned by map data.
#[derive(Component, Debug, Clone, Default)]
pub struct Npc;

/// Entities that are never despawned by a map load.
#[derive(Component, Debug, Clone, Default)]
pub struct Persistent;

/// Entities created by a map load and despawned by the next one.
#[derive(Component, Debug, Clone, Default)]
pub struct MapScoped;

/// Entities whose hitbox blocks actor movement.
#[derive(Component, Debug, Clone, Default)]
pub struct Collidable;

/// Movement and control state shared by the player and NPCs.
#[derive(Component, Debug, Clone)]
pub struct Actor {
    pub facing: Facing,
    pub direction: Vec2,
    pub speed: f32,
    /// Movement disabled while a transition or cutscene is authoritative.
    pub blocked: bool,
    pub tool: FarmingTool,
    pub seed: FarmingTool,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            facing: Facing::Down,
            direction: Vec2::ZERO,
            speed: 80.0,
            blocked: false,
            tool: FarmingTool::Hoe,
            seed: FarmingTool::CornSeed,
        }
    }
}

/// Collision region relative to the entity's translation.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hitbox {
    pub size: Vec2,
    pub offset: Vec2,
}

impl Hitbox {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
        }
    }

    pub fn rect_at(&self, pos: Vec2) -> Rect {
        Rect::from_center_size(pos + self.offset, self.size)
    }
}

/// The narrow region in front of an actor that tools act upon.
pub fn attack_area(pos: Vec2, facing: Facing) -> Rect {
    Rect::from_center_size(
        pos + facing.offset() * TILE_SIZE * 0.75,
        Vec2::splat(TILE_SIZE * 0.5),
    )
}

/// Tile-sized target in front of an actor, used for soil tools.
pub fn tool_target(pos: Vec2, facing: Facing) -> Vec2 {
    pos + facing.offset() * TILE_SIZE
}

/// Frame counter for walk cycles. Advances even while movement is blocked.
#[derive(Component, Debug, Clone)]
pub struct AnimationClock {
    pub frame: usize,
    pub frames: usize,
    pub seconds_per_frame: f32,
    pub elapsed: f32,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self {
            frame: 0,
            frames: 4,
            seconds_per_frame: 0.15,
            elapsed: 0.0,
        }
    }
}

impl AnimationClock {
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        while self.elapsed >= self.seconds_per_frame {
            self.elapsed -= self.seconds_per_frame;
            self.frame = (self.frame + 1) % self.frames.max(1);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub use_tool: KeyCode,
    pub use_seed: KeyCode,
    pub next_tool: KeyCode,
    pub prev_tool: KeyCode,
    pub next_seed: KeyCode,
    pub interact: KeyCode,
    pub pause: KeyCode,
    pub debug_hitboxes: KeyCode,
    pub show_dialog: KeyCode,
    pub advance_dialog: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::KeyW,
            move_down: KeyCode::KeyS,
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            use_tool: KeyCode::Space,
            use_seed: KeyCode::ControlLeft,
            next_tool: KeyCode::KeyE,
            prev_tool: KeyCode::KeyQ,
            next_seed: KeyCode::Tab,
            interact: KeyCode::Enter,
            pause: KeyCode::Escape,
            debug_hitboxes: KeyCode::KeyH,
            show_dialog: KeyCode::KeyT,
            advance_dialog: KeyCode::KeyF,
        }
    }
}

/// Per-frame gameplay intent, rebuilt from hardware input every frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    pub use_tool: bool,
    pub use_seed: bool,
    pub next_tool: bool,
    pub prev_tool: bool,
    pub next_seed: bool,
    pub interact: bool,
}

/// Keys the level consumed this frame; gameplay input ignores them.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConsumedKeys(pub HashSet<KeyCode>);

/// Whether the debug hitbox overlay is drawn.
#[derive(Resource, Debug, Clone, Default)]
pub struct DebugOverlayState {
    pub visible: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// An actor applied a tool or seed at a world position.
#[derive(Event, Debug, Clone)]
pub struct ToolUseEvent {
    pub actor: Entity,
    pub tool: FarmingTool,
    pub target: Vec2,
}

/// The player pressed interact.
#[derive(Event, Debug, Clone)]
pub struct InteractEvent {
    pub actor: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct PlaySfxEvent {
    pub sfx_id: String,
}

impl PlaySfxEvent {
    pub fn new(sfx_id: &str) -> Self {
        Self {
            sfx_id: sfx_id.to_string(),
        }
    }
}

#[derive(Event, Debug, Clone)]
pub struct PlayMusicEvent {
    pub track_id: String,
    pub volume: f32,
}

/// Host-facing dialog requests raised by the level.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum DialogEvent {
    Show(String),
    Advance,
}

/// Raw events offered to the level for routing.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum LevelEvent {
    KeyDown(KeyCode),
    StartQuake { duration: f32 },
}

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_remove_requires_enough() {
        let mut inv = ResourceInventory::with(&[(InventoryResource::CornSeed, 1)]);
        assert!(!inv.remove(InventoryResource::CornSeed, 2));
        assert_eq!(inv.count(InventoryResource::CornSeed), 1);
        assert!(inv.remove(InventoryResource::CornSeed, 1));
        assert_eq!(inv.count(InventoryResource::CornSeed), 0);
        assert!(!inv.remove(InventoryResource::Wood, 1));
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 16.0, 16.0);
        let b = Rect::new(16.0, 0.0, 32.0, 16.0);
        assert!(!overlaps(a, b));
        let c = Rect::new(15.0, 0.0, 32.0, 16.0);
        assert!(overlaps(a, c));
    }

    #[test]
    fn map_coords_round_down_to_tile() {
        assert_eq!(map_coords_to_tile(Vec2::new(0.0, 0.0)), (0, 0));
        assert_eq!(map_coords_to_tile(Vec2::new(31.9, 16.0)), (1, 1));
        assert_eq!(map_coords_to_tile(Vec2::new(-0.5, 8.0)), (-1, 0));
        assert_eq!(map_coords_to_tile(tile_center((4, 7))), (4, 7));
    }

    #[test]
    fn facing_prefers_vertical_on_diagonals() {
        assert_eq!(Facing::from_direction(Vec2::new(1.0, 1.0)), Some(Facing::Up));
        assert_eq!(Facing::from_direction(Vec2::new(-1.0, 0.0)), Some(Facing::Left));
        assert_eq!(Facing::from_direction(Vec2::ZERO), None);
    }

    #[test]
    fn only_seed_kinds_consume_seed_resources() {
        assert_eq!(FarmingTool::Axe.seed_resource(), None);
        assert_eq!(
            FarmingTool::TomatoSeed.seed_resource(),
            Some(InventoryResource::TomatoSeed)
        );
    }
}

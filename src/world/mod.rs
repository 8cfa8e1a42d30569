//! World domain: map registry, map loading and switching, spawn
//! resolution, per-map objects and weather.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::camera::{CutsceneTrack, LevelCamera, ScreenShake};
use crate::error::{GameMapWarning, LevelError};
use crate::farming::SoilGrid;
use crate::npcs::spawn_npc;
use crate::shared::*;

pub mod maps;
pub mod objects;
pub mod spawn;
pub mod weather;

use maps::{InteractionKind, MapDef, MapRegistry};
use objects::{spawn_tree, ExitWarp, Interactable};
use spawn::resolve_spawn;
use weather::{RainEffect, SkyClock, Weather};

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct LoadedMap {
    pub id: MapId,
    pub def: MapDef,
}

/// The map currently in play. Replaced wholesale by every load.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveMap {
    pub current: Option<LoadedMap>,
}

impl ActiveMap {
    pub fn id(&self) -> Option<MapId> {
        self.current.as_ref().map(|m| m.id)
    }

    pub fn def(&self) -> Option<&MapDef> {
        self.current.as_ref().map(|m| &m.def)
    }
}

/// Content-authoring warnings raised so far, oldest first.
#[derive(Resource, Debug, Clone, Default)]
pub struct MapWarnings(pub Vec<GameMapWarning>);

/// Marker for the ground quad of the loaded map.
#[derive(Component, Debug, Clone, Copy)]
pub struct MapGround;

// ═══════════════════════════════════════════════════════════════════════
// MAP SWITCHER
// ═══════════════════════════════════════════════════════════════════════

/// Everything a map load touches.
#[derive(SystemParam)]
pub struct MapSwitcher<'w, 's> {
    commands: Commands<'w, 's>,
    registry: Res<'w, MapRegistry>,
    active: ResMut<'w, ActiveMap>,
    soil: ResMut<'w, SoilGrid>,
    shake: ResMut<'w, ScreenShake>,
    camera: ResMut<'w, LevelCamera>,
    rain: ResMut<'w, RainEffect>,
    cutscene: ResMut<'w, CutsceneTrack>,
    warnings: ResMut<'w, MapWarnings>,
    scoped: Query<'w, 's, Entity, With<MapScoped>>,
    player: Query<'w, 's, &'static mut Transform, With<Player>>,
}

impl MapSwitcher<'_, '_> {
    pub fn current(&self) -> Option<MapId> {
        self.active.id()
    }

    fn warn(&mut self, warning: GameMapWarning) {
        warn!("[World] {warning}");
        self.warnings.0.push(warning);
    }

    /// Replace the current map with `target`. The spawn position is resolved
    /// before anything is torn down, so a failed load leaves the old map in
    /// place.
    pub fn load_map(&mut self, target: MapId, origin: Option<MapId>) -> Result<(), LevelError> {
        let source = self
            .registry
            .get(target)
            .ok_or(LevelError::MapNotRegistered { map: target })?;
        let def = MapDef::build(source);
        let spawn = resolve_spawn(target, &def, origin)?;
        if let Some(warning) = spawn.warning {
            self.warn(warning);
        }

        for entity in &self.scoped {
            self.commands.entity(entity).despawn_recursive();
        }
        self.soil.reset();
        self.soil.set_farmable(def.farmable.iter().copied());
        self.shake.reset();

        self.spawn_contents(&def);

        self.camera.change_size(def.size);
        self.rain.set_floor_size(def.size);

        if let Ok(mut transform) = self.player.get_single_mut() {
            transform.translation.x = spawn.position.x;
            transform.translation.y = spawn.position.y;
        }
        self.camera.snap_to(spawn.position, 1.0);

        self.cutscene.load(def.cutscene.clone());
        self.cutscene.start();

        info!(
            "[World] Loaded {:?} (from {:?}), player at {:?}",
            target, origin, spawn.position
        );
        self.active.current = Some(LoadedMap { id: target, def });
        Ok(())
    }

    /// Go to `target`, arriving from the current map. An unregistered target
    /// keeps the player on the current map, placed as if returning from it.
    pub fn switch_to_map(&mut self, target: MapId) -> Result<(), LevelError> {
        let Some(current) = self.current() else {
            return self.load_map(target, None);
        };
        if self.registry.contains(target) {
            self.load_map(target, Some(current))
        } else {
            self.warn(GameMapWarning::UnknownMap {
                requested: target,
                current,
            });
            self.load_map(current, Some(target))
        }
    }

    fn spawn_contents(&mut self, def: &MapDef) {
        let commands = &mut self.commands;

        commands.spawn((
            MapGround,
            MapScoped,
            Sprite {
                color: Color::srgb(0.51, 0.66, 0.52),
                custom_size: Some(def.size),
                ..default()
            },
            Transform::from_translation((def.size / 2.0).extend(Z_GROUND)),
        ));

        for rect in &def.collidables {
            commands.spawn((
                MapScoped,
                Collidable,
                Hitbox::new(rect.size()),
                Sprite {
                    color: Color::srgb(0.4, 0.36, 0.33),
                    custom_size: Some(rect.size()),
                    ..default()
                },
                Transform::from_translation(rect.center().extend(Z_OBJECT)),
            ));
        }
        for (kind, area) in &def.interactables {
            commands.spawn((
                MapScoped,
                Interactable {
                    kind: *kind,
                    area: *area,
                },
                Sprite {
                    color: match kind {
                        InteractionKind::Bed => Color::srgb(0.7, 0.3, 0.35),
                        InteractionKind::Trader => Color::srgb(0.85, 0.7, 0.3),
                    },
                    custom_size: Some(area.size()),
                    ..default()
                },
                Transform::from_translation(area.center().extend(Z_OBJECT)),
            ));
        }
        for (area, to) in &def.exit_warps {
            commands.spawn((
                MapScoped,
                ExitWarp {
                    area: *area,
                    to: *to,
                },
                Transform::from_translation(area.center().extend(Z_GROUND)),
            ));
        }
        for pos in &def.trees {
            spawn_tree(commands, *pos);
        }
        for pos in &def.npcs {
            spawn_npc(commands, *pos);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapRegistry>()
            .init_resource::<ActiveMap>()
            .init_resource::<MapWarnings>()
            .init_resource::<Weather>()
            .init_resource::<RainEffect>()
            .init_resource::<SkyClock>()
            .add_systems(Update, weather::update_rain.in_set(LevelSet::Weather))
            .add_systems(
                Update,
                (objects::collect_drops, objects::fade_particles).in_set(LevelSet::Simulate),
            );
    }
}

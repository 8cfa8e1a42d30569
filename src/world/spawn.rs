//! Player landing position when a map is entered.

use bevy::prelude::*;

use super::maps::MapDef;
use crate::error::{GameMapWarning, LevelError};
use crate::shared::MapId;

/// Where the player lands, plus the fallback that was taken to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnResolution {
    pub position: Vec2,
    pub warning: Option<GameMapWarning>,
}

/// Resolve the spawn position on `map_id`.
///
/// Tiers, in order: the entry warp registered for `origin`, the default
/// spawnpoint, then the first entry warp. Fails only when the map has
/// neither a spawnpoint nor any entry warp.
pub fn resolve_spawn(
    map_id: MapId,
    map: &MapDef,
    origin: Option<MapId>,
) -> Result<SpawnResolution, LevelError> {
    let missed_origin = match origin {
        Some(origin) => match map.entry_warps.get(&origin) {
            Some(&position) => {
                return Ok(SpawnResolution {
                    position,
                    warning: None,
                })
            }
            None => Some(origin),
        },
        None => None,
    };

    if let Some(position) = map.spawnpoint {
        return Ok(SpawnResolution {
            position,
            warning: missed_origin.map(|origin| GameMapWarning::MissingEntryWarp {
                map: map_id,
                origin,
            }),
        });
    }

    let Some(&position) = map.entry_warps.values().next() else {
        return Err(LevelError::NoSpawnpoint { map: map_id });
    };

    let warning = match missed_origin {
        Some(origin) => GameMapWarning::MissingEntryWarpAndSpawnpoint { map: map_id, origin },
        None => GameMapWarning::MissingSpawnpoint { map: map_id },
    };
    Ok(SpawnResolution {
        position,
        warning: Some(warning),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::maps::MapSource;
    use std::collections::BTreeMap;

    fn map(spawnpoint: Option<(f32, f32)>, warps: &[(MapId, (f32, f32))]) -> MapDef {
        let source = MapSource {
            width: 10,
            height: 10,
            spawnpoint,
            entry_warps: warps.iter().copied().collect::<BTreeMap<_, _>>(),
            exit_warps: Vec::new(),
            collidables: Vec::new(),
            interactables: Vec::new(),
            trees: Vec::new(),
            farmland: Vec::new(),
            npcs: Vec::new(),
            cutscene: Vec::new(),
        };
        MapDef::build(&source)
    }

    #[test]
    fn matching_entry_warp_wins_over_spawnpoint() {
        let def = map(Some((1.0, 1.0)), &[(MapId::Farm, (5.0, 6.0))]);
        let res = resolve_spawn(MapId::Forest, &def, Some(MapId::Farm)).unwrap();
        assert_eq!(res.position, def.entry_warps[&MapId::Farm]);
        assert_eq!(res.warning, None);
    }

    #[test]
    fn no_origin_uses_spawnpoint_silently() {
        let def = map(Some((1.0, 1.0)), &[(MapId::Farm, (5.0, 6.0))]);
        let res = resolve_spawn(MapId::Forest, &def, None).unwrap();
        assert_eq!(res.position, def.spawnpoint.unwrap());
        assert_eq!(res.warning, None);
    }

    #[test]
    fn unmatched_origin_falls_back_to_spawnpoint_with_one_warning() {
        let def = map(Some((1.0, 1.0)), &[(MapId::Farm, (5.0, 6.0))]);
        let res = resolve_spawn(MapId::Forest, &def, Some(MapId::Town)).unwrap();
        assert_eq!(res.position, def.spawnpoint.unwrap());
        assert_eq!(
            res.warning,
            Some(GameMapWarning::MissingEntryWarp {
                map: MapId::Forest,
                origin: MapId::Town
            })
        );
    }

    #[test]
    fn missing_spawnpoint_picks_a_registered_warp() {
        let def = map(None, &[(MapId::Town, (3.0, 3.0)), (MapId::Farm, (5.0, 6.0))]);
        let res = resolve_spawn(MapId::Forest, &def, None).unwrap();
        assert!(def.entry_warps.values().any(|p| *p == res.position));
        assert_eq!(
            res.warning,
            Some(GameMapWarning::MissingSpawnpoint { map: MapId::Forest })
        );

        let res = resolve_spawn(MapId::Forest, &def, Some(MapId::Beach)).unwrap();
        assert!(def.entry_warps.values().any(|p| *p == res.position));
        assert!(matches!(
            res.warning,
            Some(GameMapWarning::MissingEntryWarpAndSpawnpoint { .. })
        ));
    }

    #[test]
    fn empty_map_is_fatal() {
        let def = map(None, &[]);
        let err = resolve_spawn(MapId::Beach, &def, Some(MapId::Farm)).unwrap_err();
        assert!(matches!(err, LevelError::NoSpawnpoint { map: MapId::Beach }));
    }
}

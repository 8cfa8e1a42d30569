//! Fatal errors and content-authoring warnings raised by the level.

use std::path::PathBuf;

use thiserror::Error;

use crate::shared::MapId;

/// Unrecoverable conditions. A level that hits one of these cannot produce a
/// valid world state and the app shuts down.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("map {map:?} has neither a default spawnpoint nor any entry warp")]
    NoSpawnpoint { map: MapId },
    #[error("map {map:?} is not registered")]
    MapNotRegistered { map: MapId },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Content-authoring problems. Each one is resolved by a fallback and the
/// frame continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameMapWarning {
    #[error("no entry warp on {map:?} for arrivals from {origin:?}; using the default spawnpoint")]
    MissingEntryWarp { map: MapId, origin: MapId },
    #[error("no default spawnpoint on {map:?}; using the first entry warp")]
    MissingSpawnpoint { map: MapId },
    #[error("no entry warp on {map:?} for arrivals from {origin:?} and no default spawnpoint; using the first entry warp")]
    MissingEntryWarpAndSpawnpoint { map: MapId, origin: MapId },
    #[error("map {requested:?} not found; reloading {current:?}")]
    UnknownMap { requested: MapId, current: MapId },
}

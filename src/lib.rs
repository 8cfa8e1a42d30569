//! Sproutvale library crate: re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! `level::LevelCorePlugin` runs the whole playable level without a window,
//! so `tests/` can drive it under `MinimalPlugins`.

pub mod camera;
pub mod data;
pub mod error;
pub mod farming;
pub mod input;
pub mod level;
pub mod npcs;
pub mod player;
pub mod settings;
pub mod shared;
pub mod ui;
pub mod world;

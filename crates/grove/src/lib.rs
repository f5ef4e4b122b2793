//! # Grove
//!
//! A side-scrolling platformer running on `platform_engine`: a main menu and
//! four levels loaded from Tiled maps, a player that persists across scenes,
//! flying enemies, pooled fireballs and particles, and level triggers.

#![warn(missing_docs)]

pub mod actors;
pub mod config;
pub mod game;
pub mod scenes;
pub mod spawner;

pub use actors::{Actor, GameShared};
pub use config::GameConfig;
pub use game::GroveGame;
pub use scenes::GameScene;

//! Scene identifiers and per-scene resources

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every scene of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameScene {
    /// Title screen
    MainMenu,
    /// First level
    Forest,
    /// Second level
    Run,
    /// Third level
    Pain,
    /// Fourth level, where a new game starts
    Musgo,
}

impl GameScene {
    /// All scenes in registration order
    pub const ALL: [Self; 5] = [Self::MainMenu, Self::Forest, Self::Run, Self::Pain, Self::Musgo];

    /// Whether the scene is a playable level
    pub fn is_level(self) -> bool {
        self != Self::MainMenu
    }

    /// Level file, relative to the levels directory
    pub fn level_file(self) -> Option<PathBuf> {
        let name = match self {
            Self::MainMenu => return None,
            Self::Forest => "forest.json",
            Self::Run => "run.json",
            Self::Pain => "pain.json",
            Self::Musgo => "musgo.json",
        };
        Some(PathBuf::from(name))
    }

    /// Looping music of the scene
    pub fn music(self) -> Option<&'static str> {
        self.is_level().then_some("Greenpath.wav")
    }

    /// Background texture
    pub fn background(self) -> &'static str {
        match self {
            Self::MainMenu => "sprites/background/menu.png",
            Self::Forest | Self::Run => "sprites/background/nature.png",
            Self::Pain | Self::Musgo => "sprites/background/cave.png",
        }
    }
}

impl fmt::Display for GameScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Scene name found in level data that matches no scene
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scene name {0:?}")]
pub struct UnknownScene(pub String);

impl FromStr for GameScene {
    type Err = UnknownScene;

    /// Accepts scene names and the numbered `LevelN` aliases used by maps
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim() {
            "MainMenu" => Ok(Self::MainMenu),
            "Forest" | "Level1" => Ok(Self::Forest),
            "Run" | "Level2" => Ok(Self::Run),
            "Pain" | "Level3" => Ok(Self::Pain),
            "Musgo" | "Level4" => Ok(Self::Musgo),
            other => Err(UnknownScene(other.to_string())),
        }
    }
}

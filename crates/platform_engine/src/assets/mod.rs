//! Asset management system
//!
//! Level data only: the engine reads tile maps and object layers and turns
//! them into plain descriptors. What a descriptor spawns is up to the game.

pub mod level_loader;

use std::path::PathBuf;

use thiserror::Error;

use crate::foundation::collections::GridError;

pub use level_loader::{
    parse_id_list, parse_level, LevelData, LevelLayout, LevelSource, PropertyValue,
    SpawnDescriptor, TiledLevelSource,
};

/// Level loading errors
#[derive(Error, Debug)]
pub enum LevelError {
    /// The file could not be read
    #[error("cannot read level {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid level JSON
    #[error("invalid level data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required layer is absent
    #[error("level has no layer named {0:?}")]
    MissingLayer(String),

    /// Tile data does not match the map size
    #[error("bad tile layer: {0}")]
    Grid(#[from] GridError),
}

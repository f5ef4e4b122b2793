//! # Scene Transitions
//!
//! A scene is a named, loadable level or menu with its own entity set. Scene
//! changes go through a four-phase state machine that only swaps content
//! while the screen is fully covered:
//!
//! ```text
//! Idle --request--> Entering --timer--> Active --timer/swap--> Exiting --timer--> Idle
//! ```
//!
//! Requests made outside `Idle` are rejected, not queued.

pub mod scene_manager;
pub mod transition;

use std::fmt::Debug;
use std::hash::Hash;

pub use scene_manager::{SceneLoader, SceneManager};
pub use transition::TransitionPhase;

/// Identifier of a loadable scene
///
/// Implemented for any small copyable key, typically a fieldless enum.
pub trait SceneKey: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> SceneKey for T {}

/// Scene transition errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A transition is already running
    #[error("cannot request {requested} while transition is {phase:?}")]
    TransitionInProgress {
        /// Requested scene
        requested: String,
        /// Phase at the time of the request
        phase: TransitionPhase,
    },

    /// The scene was never registered
    #[error("unknown scene {0}")]
    UnknownScene(String),

    /// Unloading the old scene or loading the new one failed
    #[error("failed to load scene {scene}: {reason}")]
    LoadFailed {
        /// Scene being loaded
        scene: String,
        /// Cause reported by the loader
        reason: String,
    },
}

//! # Platform Engine
//!
//! A small 2D platformer engine: entity registry, frame scheduler, scene
//! transitions with fades, a following camera and pluggable render and
//! audio backends.
//!
//! ## Features
//!
//! - **Entity Registry**: generational ids, category indices and an update
//!   pass that tolerates adds and removes from inside behaviors
//! - **Scene Transitions**: fade-out, swap, fade-in as a timed state machine
//! - **Hitstop**: brief global freeze of entity updates after impacts
//! - **Level Loading**: Tiled JSON maps turned into spawn descriptors
//! - **Headless Backends**: recording renderer and silent audio for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platform_engine::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Stage {
//!     Title,
//! }
//!
//! struct Idle;
//!
//! impl Behavior for Idle {
//!     type Scene = Stage;
//!     type Shared = ();
//!
//!     fn update(&mut self, _id: EntityId, _frame: &mut Frame<'_, Self>, _dt: f32) {}
//! }
//!
//! struct MyGame {
//!     shared: (),
//! }
//!
//! impl Game for MyGame {
//!     type Behavior = Idle;
//!
//!     fn initial_scene(&self) -> Stage {
//!         Stage::Title
//!     }
//!
//!     fn scenes(&self) -> Vec<Stage> {
//!         vec![Stage::Title]
//!     }
//!
//!     fn shared_mut(&mut self) -> &mut () {
//!         &mut self.shared
//!     }
//!
//!     fn load_scene(&mut self, _scene: Stage, ctx: &mut SceneContext<'_, Idle>) -> Result<(), GameError> {
//!         ctx.registry.add(Entity::new(Idle));
//!         Ok(())
//!     }
//!
//!     fn unload_scene(&mut self, _scene: Stage, ctx: &mut SceneContext<'_, Idle>) {
//!         ctx.registry.retain(|_, _| false);
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default().with_max_frames(600);
//!     let mut engine = Engine::new(
//!         config,
//!         MyGame { shared: () },
//!         Box::new(HeadlessRenderer::new()),
//!         Box::new(NullAudio::new()),
//!     )?;
//!     engine.run()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod ecs;
pub mod assets;
pub mod render;
pub mod input;
pub mod audio;
pub mod physics;
pub mod scene;

mod application;
mod engine;

pub use application::{AppEvent, Game, GameError, SceneOf, SharedOf};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppEvent, Game, GameError, SceneOf, SharedOf,
        Engine, EngineError,
        foundation::{
            math::{Rect, Transform2D, Vec2},
            time::Stopwatch,
        },
        ecs::{
            components::{Collider, DrawKind, Drawable, RigidBody},
            Behavior, Category, Entity, EntityId, EntityRegistry, EntityState, Frame, Hitstop,
            SceneContext,
        },
        assets::{LevelData, LevelSource, SpawnDescriptor, TiledLevelSource},
        render::{Camera2D, Color, HeadlessRenderer, Renderer, TextureId},
        input::{InputState, KeyCode},
        audio::{AudioSink, NullAudio, SoundHandle},
        scene::{SceneError, SceneManager, TransitionPhase},
        core::config::{Config, ConfigError, EngineConfig, TransitionConfig, ViewConfig},
    };
}

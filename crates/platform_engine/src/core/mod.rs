//! # Core Engine Module
//!
//! Shared configuration used by every engine subsystem.

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;
pub use crate::ecs;

// Re-export commonly used config types
pub use config::{
    EngineConfig,
    TimingConfig,
    TransitionConfig,
    ViewConfig,
    Config,
    ConfigError,
};

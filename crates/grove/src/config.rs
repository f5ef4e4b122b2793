//! Game configuration
//!
//! Loaded from `grove.toml` (or `.ron`) next to the binary when present.
//! Every section falls back to its defaults, so a file only needs the values
//! it changes.

use std::path::PathBuf;

use platform_engine::core::config::{Config, ConfigError, EngineConfig};
use serde::{Deserialize, Serialize};

use crate::scenes::GameScene;

/// Default config file name
pub const CONFIG_FILE: &str = "grove.toml";

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Directory holding the level maps
    pub levels_dir: PathBuf,

    /// Scene shown at startup
    pub start_scene: GameScene,

    /// Level the menu's "continue" enters before any level was played
    pub continue_scene: GameScene,

    /// Engine settings
    pub engine: EngineConfig,

    /// Object pool sizes
    pub pools: PoolConfig,

    /// Player tuning
    pub player: PlayerTuning,

    /// Flying enemy tuning
    pub enemy: EnemyTuning,
}

/// Sizes of the per-level object pools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Player fireballs
    pub fireballs: usize,
    /// Cosmetic particles
    pub particles: usize,
}

/// Player movement and combat values, in unscaled units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Collider width
    pub width: f32,
    /// Collider height
    pub height: f32,
    /// Horizontal run speed
    pub move_speed: f32,
    /// Initial upward speed of a jump
    pub jump_speed: f32,
    /// Downward acceleration
    pub gravity: f32,
    /// Terminal fall speed
    pub max_fall_speed: f32,
    /// Hit points
    pub health: f32,
    /// Invulnerability after being hit, in seconds
    pub invulnerability: f32,
    /// Minimum time between fireballs
    pub fire_cooldown: f32,
    /// Fireball speed
    pub fireball_speed: f32,
    /// Fireball lifetime in seconds
    pub fireball_lifetime: f32,
    /// Fireball damage
    pub fireball_damage: f32,
}

/// Flying enemy values, in unscaled units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Collider width
    pub width: f32,
    /// Collider height
    pub height: f32,
    /// Chase speed
    pub move_speed: f32,
    /// Speed while wandering
    pub wander_speed: f32,
    /// Seconds between wander turns
    pub wander_interval: f32,
    /// Distance at which the player is spotted
    pub spot_distance: f32,
    /// Speed of the knockback after a hit
    pub knockback_speed: f32,
    /// Knockback length in seconds
    pub knockback_duration: f32,
    /// Hit points
    pub health: f32,
    /// Damage dealt to the player on contact
    pub contact_damage: f32,
    /// Camera shake magnitude on death
    pub death_shake: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            levels_dir: PathBuf::from("assets/levels"),
            start_scene: GameScene::MainMenu,
            continue_scene: GameScene::Musgo,
            engine: EngineConfig::default(),
            pools: PoolConfig::default(),
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            fireballs: 5,
            particles: 200,
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 85.0,
            move_speed: 400.0,
            jump_speed: 900.0,
            gravity: 2500.0,
            max_fall_speed: 1200.0,
            health: 5.0,
            invulnerability: 1.0,
            fire_cooldown: 0.4,
            fireball_speed: 1200.0,
            fireball_lifetime: 1.0,
            fireball_damage: 10.0,
        }
    }
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 80.0,
            move_speed: 250.0,
            wander_speed: 100.0,
            wander_interval: 1.0,
            spot_distance: 400.0,
            knockback_speed: 1000.0,
            knockback_duration: 0.2,
            health: 70.0,
            contact_damage: 1.0,
            death_shake: 5.0,
        }
    }
}

impl GameConfig {
    /// Load `path`, or defaults if it does not exist, and validate
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;

        if self.pools.fireballs == 0 {
            return Err(ConfigError::Invalid("at least one fireball is needed".to_string()));
        }
        if !self.continue_scene.is_level() {
            return Err(ConfigError::Invalid("continue_scene must be a level".to_string()));
        }

        let player = &self.player;
        if player.width <= 0.0 || player.height <= 0.0 {
            return Err(ConfigError::Invalid("player size must be positive".to_string()));
        }
        if player.health <= 0.0 || self.enemy.health <= 0.0 {
            return Err(ConfigError::Invalid("health must be positive".to_string()));
        }
        Ok(())
    }
}

impl Config for GameConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "start_scene = \"Forest\"\n[pools]\nparticles = 20\n[engine.transitions]\nfade_window = 0.2\n",
        )
        .unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.start_scene, GameScene::Forest);
        assert_eq!(config.pools.particles, 20);
        assert_eq!(config.pools.fireballs, 5);
        assert_eq!(config.engine.transitions.fade_window, 0.2);
    }

    #[test]
    fn test_menu_as_continue_scene_rejected() {
        let mut config = GameConfig::default();
        config.continue_scene = GameScene::MainMenu;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_round_trip_through_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grove.ron");
        let mut config = GameConfig::default();
        config.player.jump_speed = 700.0;

        config.save_to_file(&path).unwrap();
        assert_eq!(GameConfig::load_from_file(&path).unwrap(), config);
    }
}

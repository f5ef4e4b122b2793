//! Scene lifecycle of the game
//!
//! [`GroveGame`] decides what each scene contains. The player entity is
//! created by the first level and carried across every later scene change:
//! unloading parks it and keeps it registered, loading the next level moves
//! it to that level's spawn point.

use platform_engine::assets::{LevelLayout, LevelSource, TiledLevelSource};
use platform_engine::audio::{AudioSink, SoundHandle};
use platform_engine::ecs::{Entity, EntityId, SceneContext};
use platform_engine::foundation::math::{Rect, Vec2};
use platform_engine::render::Color;
use platform_engine::{Game, GameError};

use crate::actors::{park, Actor, GameShared, MainMenu};
use crate::config::GameConfig;
use crate::scenes::GameScene;
use crate::spawner::{LevelSpawner, Textures};

/// Sounds preloaded with every level
const LEVEL_SOUNDS: [&str; 4] = ["Fireball.wav", "Hit.wav", "Hurt.wav", "EnemyDeath.wav"];

/// The platformer
pub struct GroveGame {
    config: GameConfig,
    levels: Box<dyn LevelSource>,
    shared: GameShared,
    music: SoundHandle,
    textures: Textures,
}

impl GroveGame {
    /// Game reading levels from `config.levels_dir`
    pub fn new(config: GameConfig) -> Self {
        let levels = TiledLevelSource::new(config.levels_dir.clone(), LevelLayout::default());
        Self::with_level_source(config, Box::new(levels))
    }

    /// Game reading levels from `levels`
    pub fn with_level_source(config: GameConfig, levels: Box<dyn LevelSource>) -> Self {
        Self {
            shared: GameShared::from_config(&config),
            config,
            levels,
            music: SoundHandle::INVALID,
            textures: Textures::default(),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// State shared by the actors
    pub fn shared(&self) -> &GameShared {
        &self.shared
    }

    /// Background music of the current level
    pub fn music(&self) -> SoundHandle {
        self.music
    }

    /// The persistent player entity, once a level has created it
    pub fn player(&self) -> Option<EntityId> {
        self.shared.player
    }

    fn load_menu(&mut self, ctx: &mut SceneContext<'_, Actor>) {
        let view = ctx.camera.view_size();
        let area = Rect::new(0.0, 0.0, view.x, view.y);

        let mut spawner = LevelSpawner::new(ctx.registry, &mut self.shared, &self.textures);
        spawner.spawn_background(area);
        ctx.registry.add(Entity::new(Actor::Menu(MainMenu::new())));

        ctx.camera.snap_to(view / 2.0);
    }

    fn load_level(&mut self, scene: GameScene, ctx: &mut SceneContext<'_, Actor>) -> Result<(), GameError> {
        if std::mem::take(&mut self.shared.fresh_start) {
            if let Some(player) = self.shared.player.take() {
                ctx.registry.remove(player);
            }
            self.shared.kills = 0;
            log::info!("Starting a new game");
        }

        let path = scene
            .level_file()
            .ok_or_else(|| GameError::Custom(format!("{scene} has no level file")))?;
        let level = self.levels.load_level(&path)?;

        let mut spawner = LevelSpawner::new(ctx.registry, &mut self.shared, &self.textures);
        spawner.spawn_pools(&self.config.pools);
        let report = spawner.spawn_level(&level);

        let scale = self.shared.scale;
        let authored = level.bounds();
        let bounds = Rect::new(
            authored.x * scale,
            authored.y * scale,
            authored.w * scale,
            authored.h * scale,
        );
        self.shared.level_bounds = Some(bounds);
        self.shared.continue_scene = scene;

        ctx.camera.set_bounds(Some(bounds));
        match report.player.and_then(|id| ctx.registry.get(id)) {
            Some(player) => {
                ctx.camera.snap_to(player.transform.position);
                ctx.camera.set_focus(report.player);
            }
            None => {
                log::warn!("{scene} has no player spawn");
                ctx.camera.snap_to(Vec2::new(bounds.x, bounds.y));
            }
        }

        for sound in LEVEL_SOUNDS {
            ctx.audio.cache(sound);
        }
        if let Some(music) = scene.music() {
            self.music = ctx.audio.play(music, true);
        }
        Ok(())
    }
}

impl Game for GroveGame {
    type Behavior = Actor;

    fn initial_scene(&self) -> GameScene {
        self.config.start_scene
    }

    fn scenes(&self) -> Vec<GameScene> {
        GameScene::ALL.to_vec()
    }

    fn shared_mut(&mut self) -> &mut GameShared {
        &mut self.shared
    }

    fn load_scene(&mut self, scene: GameScene, ctx: &mut SceneContext<'_, Actor>) -> Result<(), GameError> {
        log::info!("Loading {scene}");
        self.textures = Textures::load(ctx.renderer, scene);
        if scene.is_level() {
            self.load_level(scene, ctx)
        } else {
            self.load_menu(ctx);
            Ok(())
        }
    }

    fn unload_scene(&mut self, scene: GameScene, ctx: &mut SceneContext<'_, Actor>) {
        ctx.audio.stop(std::mem::take(&mut self.music));

        let player = self.shared.player.filter(|&id| ctx.registry.contains(id));
        if let Some(entity) = player.and_then(|id| ctx.registry.get_mut(id)) {
            park(entity);
        }
        let removed = ctx.registry.retain(|id, _| Some(id) == player);
        log::debug!("Unloaded {scene}: {removed} entities removed");

        self.shared.player = player;
        self.shared.level_bounds = None;
        ctx.camera.release();
        ctx.camera.set_focus(None);
        ctx.camera.set_bounds(None);
    }

    fn can_pause(&self, scene: GameScene) -> bool {
        scene.is_level()
    }

    fn on_pause_changed(&mut self, paused: bool, audio: &mut dyn AudioSink) {
        if paused {
            audio.pause(self.music);
        } else {
            audio.resume(self.music);
        }
    }

    fn clear_color(&self) -> Color {
        Color::rgb(20, 24, 32)
    }
}

//! Scene flow through the real engine: menu, levels, pause and the
//! persistent player

use std::path::Path;

use grove::{Actor, GameConfig, GameScene, GroveGame};
use platform_engine::assets::{parse_level, LevelData, LevelError, LevelLayout, LevelSource};
use platform_engine::audio::{NullAudio, PlaybackState};
use platform_engine::ecs::{Category, EntityId, EntityState};
use platform_engine::foundation::math::Vec2;
use platform_engine::input::KeyCode;
use platform_engine::render::HeadlessRenderer;
use platform_engine::{AppEvent, Engine};

const DT: f32 = 1.0 / 60.0;

/// Serves the bundled maps without touching the disk
struct BundledLevels {
    broken: Option<&'static str>,
}

impl LevelSource for BundledLevels {
    fn load_level(&mut self, path: &Path) -> Result<LevelData, LevelError> {
        let name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
        let text = match name {
            _ if Some(name) == self.broken => "{}",
            "forest.json" => include_str!("../assets/levels/forest.json"),
            "run.json" => include_str!("../assets/levels/run.json"),
            "pain.json" => include_str!("../assets/levels/pain.json"),
            "musgo.json" => include_str!("../assets/levels/musgo.json"),
            _ => "{}",
        };
        parse_level(text, &LevelLayout::default())
    }
}

fn engine_with(broken: Option<&'static str>) -> Engine<GroveGame> {
    let config = GameConfig::default();
    let game = GroveGame::with_level_source(config.clone(), Box::new(BundledLevels { broken }));
    let mut engine = Engine::new(
        config.engine,
        game,
        Box::new(HeadlessRenderer::new().with_history(1)),
        Box::new(NullAudio::new()),
    )
    .unwrap();
    settle(&mut engine);
    engine
}

fn settle(engine: &mut Engine<GroveGame>) {
    for _ in 0..600 {
        if !engine.scenes().is_transitioning() {
            return;
        }
        engine.tick(DT);
    }
    panic!("transition did not finish");
}

fn tap(engine: &mut Engine<GroveGame>, key: KeyCode) {
    engine.handle_event(&AppEvent::KeyPressed(key));
    engine.tick(DT);
    engine.handle_event(&AppEvent::KeyReleased(key));
}

fn player(engine: &Engine<GroveGame>) -> EntityId {
    engine.game().player().expect("player spawned")
}

fn enter_from_menu(engine: &mut Engine<GroveGame>) {
    tap(engine, KeyCode::Enter);
    settle(engine);
}

#[test]
fn test_menu_continue_enters_level() {
    let mut engine = engine_with(None);
    assert_eq!(engine.scenes().current(), GameScene::MainMenu);
    assert!(engine.game().player().is_none());

    enter_from_menu(&mut engine);
    let expected = engine.game().config().continue_scene;
    assert_eq!(engine.scenes().current(), expected);

    let registry = engine.registry();
    let player = player(&engine);
    assert_eq!(registry.live().last(), Some(&player));
    assert!(registry.get(player).unwrap().is_active());

    assert_eq!(registry.category(Category::FIREBALL).len(), 5);
    assert_eq!(registry.category(Category::PARTICLE).len(), 200);
    let pooled = Category::FIREBALL | Category::PARTICLE;
    assert!(registry
        .iter()
        .filter(|(_, entity)| entity.categories().intersects(pooled))
        .all(|(_, entity)| entity.state == EntityState::Paused));

    assert_eq!(registry.category(Category::ENEMY).len(), 2);
    assert_eq!(engine.camera().focus(), Some(player));
    assert_eq!(engine.audio().state(engine.game().music()), Some(PlaybackState::Playing));
}

#[test]
fn test_pause_toggles_music_and_freezes_entities() {
    let mut engine = engine_with(None);

    engine.handle_event(&AppEvent::KeyPressed(KeyCode::Escape));
    assert!(!engine.is_paused(), "menu cannot pause");
    engine.handle_event(&AppEvent::KeyReleased(KeyCode::Escape));

    enter_from_menu(&mut engine);
    let music = engine.game().music();
    engine.handle_event(&AppEvent::KeyPressed(KeyCode::Escape));
    assert!(engine.is_paused());
    assert_eq!(engine.audio().state(music), Some(PlaybackState::Paused));

    let player = player(&engine);
    let before = engine.registry().get(player).unwrap().transform.position;
    for _ in 0..10 {
        engine.tick(DT);
    }
    assert_eq!(engine.registry().get(player).unwrap().transform.position, before);

    engine.toggle_pause();
    assert_eq!(engine.audio().state(music), Some(PlaybackState::Playing));
}

#[test]
fn test_exit_trigger_keeps_player_across_levels() {
    let mut engine = engine_with(None);
    engine
        .scenes_mut()
        .request_scene(GameScene::Forest, 0.5)
        .unwrap();
    settle(&mut engine);
    let first = player(&engine);
    let old_music = engine.game().music();

    // The exit trigger spans the last two columns of every map
    let exit = Vec2::new(47.0 * 32.0, 160.0) * engine.game().shared().scale;
    engine.registry_mut().get_mut(first).unwrap().transform.position = exit;
    engine.tick(DT);
    assert_eq!(engine.scenes().next(), Some(GameScene::Run));

    settle(&mut engine);
    assert_eq!(engine.scenes().current(), GameScene::Run);
    assert_eq!(player(&engine), first);
    assert_eq!(engine.registry().live().last(), Some(&first));
    assert_eq!(engine.game().shared().continue_scene, GameScene::Run);

    assert_eq!(engine.audio().state(old_music), None);
    assert_eq!(engine.audio().state(engine.game().music()), Some(PlaybackState::Playing));
    // One set of pools per level
    assert_eq!(engine.registry().category(Category::FIREBALL).len(), 5);
}

#[test]
fn test_new_game_replaces_player() {
    let mut engine = engine_with(None);
    enter_from_menu(&mut engine);
    let first = player(&engine);

    engine
        .scenes_mut()
        .request_scene(GameScene::MainMenu, 0.5)
        .unwrap();
    settle(&mut engine);
    // Parked, not removed
    let parked = engine.registry().get(first).unwrap();
    assert_eq!(parked.state, EntityState::Paused);
    assert!(engine.registry().draw_list().iter().all(|&id| id != first));

    tap(&mut engine, KeyCode::Down);
    enter_from_menu(&mut engine);
    assert_eq!(engine.scenes().current(), GameScene::Forest);
    let second = player(&engine);
    assert_ne!(first, second);
    assert!(!engine.registry().contains(first));
}

#[test]
fn test_broken_level_still_finishes_transition() {
    let mut engine = engine_with(Some("pain.json"));
    engine.scenes_mut().request_scene(GameScene::Pain, 0.5).unwrap();
    settle(&mut engine);

    assert_eq!(engine.scenes().current(), GameScene::Pain);
    assert!(engine.scenes().overlay().is_none());
    assert!(engine
        .registry()
        .iter()
        .all(|(_, entity)| !matches!(entity.behavior(), Some(Actor::Menu(_)))));
}

#[test]
fn test_pause_during_fade_to_menu_is_cleared() {
    let mut engine = engine_with(None);
    enter_from_menu(&mut engine);
    let music = engine.game().music();

    engine
        .scenes_mut()
        .request_scene(GameScene::MainMenu, 0.5)
        .unwrap();
    engine.tick(DT);
    tap(&mut engine, KeyCode::Escape);
    assert!(engine.is_paused());
    assert_eq!(engine.audio().state(music), Some(PlaybackState::Paused));

    settle(&mut engine);
    assert_eq!(engine.scenes().current(), GameScene::MainMenu);
    assert!(!engine.is_paused());

    // The menu still reacts to input
    tap(&mut engine, KeyCode::Enter);
    assert!(engine.scenes().is_transitioning());
}

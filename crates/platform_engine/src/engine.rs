//! Core engine implementation
//!
//! [`Engine`] is the explicit context object that owns every subsystem. One
//! tick runs, in order:
//!
//! 1. the entity update pass, unless paused; while a hitstop is active only
//!    the hitstop timer advances instead
//! 2. audio
//! 3. camera follow and shake
//! 4. the scene transition state machine, which may swap scenes; a swap
//!    clears the pause state
//!
//! Steps 2 to 4 run even during hitstop or pause so fades and music stay
//! responsive.

use crate::{
    application::{AppEvent, Game, SceneOf},
    audio::AudioSink,
    config::ConfigError,
    core::config::EngineConfig,
    ecs::{Behavior, EntityRegistry, Frame, Hitstop, SceneContext},
    foundation::time::{FrameClock, Stopwatch},
    input::{InputState, KeyCode},
    render::{render_frame, Camera2D, Renderer},
    scene::{SceneError, SceneLoader, SceneManager},
};
use thiserror::Error;

/// Main engine struct
///
/// The engine coordinates all subsystems and runs the main loop.
pub struct Engine<G: Game> {
    game: G,
    registry: EntityRegistry<G::Behavior>,
    scenes: SceneManager<SceneOf<G>>,
    camera: Camera2D,
    hitstop: Hitstop,
    audio: Box<dyn AudioSink>,
    renderer: Box<dyn Renderer>,
    clock: FrameClock,
    input: InputState,
    config: EngineConfig,
    paused: bool,
    running: bool,
}

/// Hands a scene swap to the game with the engine's subsystems lent out
struct SceneSwap<'a, G: Game> {
    game: &'a mut G,
    ctx: SceneContext<'a, G::Behavior>,
    swapped: bool,
}

impl<G: Game> SceneLoader<SceneOf<G>> for SceneSwap<'_, G> {
    fn swap_scene(&mut self, from: SceneOf<G>, to: SceneOf<G>) -> Result<(), SceneError> {
        let stopwatch = Stopwatch::start_new();
        self.swapped = true;

        self.game.unload_scene(from, &mut self.ctx);
        let result = self.game.load_scene(to, &mut self.ctx).map_err(|err| SceneError::LoadFailed {
            scene: format!("{to:?}"),
            reason: err.to_string(),
        });

        log::debug!(
            "Swapped {from:?} -> {to:?} in {:.2} ms ({} entities)",
            stopwatch.elapsed_millis(),
            self.ctx.registry.len()
        );
        result
    }
}

impl<G: Game> Engine<G> {
    /// Create a new engine instance
    ///
    /// The initial scene is requested right away and swapped in behind the
    /// first fade.
    pub fn new(
        config: EngineConfig,
        game: G,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioSink>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine...");

        let initial = game.initial_scene();
        let mut scenes = SceneManager::new(initial, &config.transitions).with_scenes(game.scenes());
        scenes.request_scene(initial, config.transitions.initial_fade)?;

        Ok(Self {
            registry: EntityRegistry::new(),
            scenes,
            camera: Camera2D::from_config(&config.view),
            hitstop: Hitstop::new(config.timing.hitstop_duration),
            audio,
            renderer,
            clock: FrameClock::new(&config.timing),
            input: InputState::new(),
            game,
            config,
            paused: false,
            running: true,
        })
    }

    /// Run until quit or `max_frames`, with no external events
    pub fn run(&mut self) -> Result<u64, EngineError> {
        self.run_with(|_| Vec::new())
    }

    /// Run the main loop, polling `events` once per frame
    ///
    /// Returns the number of frames run.
    pub fn run_with(&mut self, mut events: impl FnMut(u64) -> Vec<AppEvent>) -> Result<u64, EngineError> {
        log::info!("Starting main loop...");

        let mut frames = 0;
        while self.running && self.config.max_frames.map_or(true, |max| frames < max) {
            for event in events(frames) {
                self.handle_event(&event);
            }
            if !self.running {
                break;
            }
            self.frame();
            frames += 1;
        }

        self.audio.stop_all();
        log::info!("Engine shutdown after {frames} frames");
        Ok(frames)
    }

    /// Wait for the next frame, then tick and render it
    pub fn frame(&mut self) {
        let delta_time = self.clock.wait_for_next_frame();
        self.tick(delta_time);
        self.render();
    }

    /// Advance the simulation by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32) {
        let Self {
            game,
            registry,
            scenes,
            camera,
            hitstop,
            audio,
            renderer,
            input,
            config,
            paused,
            ..
        } = self;

        if !*paused {
            if hitstop.is_active() {
                hitstop.advance(delta_time);
            } else {
                let shared = game.shared_mut();
                registry.run_update_pass(delta_time, |registry, id, behavior, dt| {
                    let mut frame = Frame {
                        registry,
                        camera: &mut *camera,
                        audio: audio.as_mut(),
                        hitstop: &mut *hitstop,
                        scenes: &mut *scenes,
                        input: &*input,
                        shared: &mut *shared,
                    };
                    Behavior::update(behavior, id, &mut frame, dt);
                });
            }
        }

        audio.update(delta_time);
        camera.update(delta_time, registry);

        let mut swap = SceneSwap {
            game,
            ctx: SceneContext {
                registry,
                camera,
                audio: audio.as_mut(),
                renderer: renderer.as_mut(),
                config,
            },
            swapped: false,
        };
        scenes.update(delta_time, &mut swap);

        // A new scene always starts unpaused
        if swap.swapped && *paused {
            *paused = false;
            log::info!("Pause cleared by scene change to {:?}", scenes.current());
            swap.game.on_pause_changed(false, swap.ctx.audio);
        }

        input.end_frame();
    }

    /// Submit the current frame to the renderer
    pub fn render(&mut self) -> usize {
        render_frame(
            self.renderer.as_mut(),
            &self.registry,
            &self.camera,
            self.scenes.overlay(),
            self.game.clear_color(),
        )
    }

    /// Handle an application event
    pub fn handle_event(&mut self, event: &AppEvent) {
        match *event {
            AppEvent::WindowCloseRequested => self.quit(),
            AppEvent::WindowUnfocused => self.input.release_all(),
            AppEvent::KeyPressed(key) => {
                self.input.handle_key(key, true);
                match key {
                    KeyCode::Escape => self.toggle_pause(),
                    KeyCode::Num8 => self.quit(),
                    KeyCode::Num5 => self.clock.toggle_slow_motion(),
                    KeyCode::Num6 => self.clock.toggle_acceleration(),
                    _ => {}
                }
            }
            AppEvent::KeyReleased(key) => self.input.handle_key(key, false),
        }
    }

    /// Flip the pause state if the current scene allows it
    pub fn toggle_pause(&mut self) {
        if !self.game.can_pause(self.scenes.current()) {
            log::debug!("Pause ignored in {:?}", self.scenes.current());
            return;
        }
        self.paused = !self.paused;
        log::info!("Game {}", if self.paused { "paused" } else { "resumed" });
        self.game.on_pause_changed(self.paused, self.audio.as_mut());
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// The game
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Mutable access to the game
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Entity registry
    pub fn registry(&self) -> &EntityRegistry<G::Behavior> {
        &self.registry
    }

    /// Mutable access to the entity registry
    pub fn registry_mut(&mut self) -> &mut EntityRegistry<G::Behavior> {
        &mut self.registry
    }

    /// Scene transition state machine
    pub fn scenes(&self) -> &SceneManager<SceneOf<G>> {
        &self.scenes
    }

    /// Mutable access to the scene state machine
    pub fn scenes_mut(&mut self) -> &mut SceneManager<SceneOf<G>> {
        &mut self.scenes
    }

    /// Camera
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Hitstop timer
    pub fn hitstop(&self) -> &Hitstop {
        &self.hitstop
    }

    /// Mutable access to the hitstop timer
    pub fn hitstop_mut(&mut self) -> &mut Hitstop {
        &mut self.hitstop
    }

    /// Audio output
    pub fn audio(&self) -> &dyn AudioSink {
        self.audio.as_ref()
    }

    /// Frame clock
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Held keys
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether the update pass is suspended
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the main loop keeps going
    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene setup failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::GameError;
    use crate::audio::{NullAudio, PlaybackState, SoundHandle};
    use crate::ecs::{Behavior, Entity, EntityId};
    use crate::render::HeadlessRenderer;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Stage {
        Title,
        Field,
    }

    #[derive(Debug)]
    enum Actor {
        Counter(u32),
    }

    #[derive(Debug, Default)]
    struct Shared {
        updates: u32,
        music: Option<SoundHandle>,
    }

    impl Behavior for Actor {
        type Scene = Stage;
        type Shared = Shared;

        fn update(&mut self, _id: EntityId, frame: &mut Frame<'_, Self>, _dt: f32) {
            let Self::Counter(count) = self;
            *count += 1;
            frame.shared.updates += 1;
        }
    }

    #[derive(Default)]
    struct TestGame {
        shared: Shared,
        loads: Vec<Stage>,
        unloads: Vec<Stage>,
        fail_field: bool,
    }

    impl Game for TestGame {
        type Behavior = Actor;

        fn initial_scene(&self) -> Stage {
            Stage::Title
        }

        fn scenes(&self) -> Vec<Stage> {
            vec![Stage::Title, Stage::Field]
        }

        fn shared_mut(&mut self) -> &mut Shared {
            &mut self.shared
        }

        fn load_scene(&mut self, scene: Stage, ctx: &mut SceneContext<'_, Actor>) -> Result<(), GameError> {
            self.loads.push(scene);
            ctx.registry.add(Entity::new(Actor::Counter(0)));
            if scene == Stage::Field {
                self.shared.music = Some(ctx.audio.play("field", true));
                if self.fail_field {
                    return Err(GameError::Custom("broken level".to_string()));
                }
            }
            Ok(())
        }

        fn unload_scene(&mut self, scene: Stage, ctx: &mut SceneContext<'_, Actor>) {
            self.unloads.push(scene);
            ctx.registry.retain(|_, _| false);
        }

        fn can_pause(&self, scene: Stage) -> bool {
            scene != Stage::Title
        }

        fn on_pause_changed(&mut self, paused: bool, audio: &mut dyn AudioSink) {
            if let Some(music) = self.shared.music {
                if paused {
                    audio.pause(music);
                } else {
                    audio.resume(music);
                }
            }
        }
    }

    fn engine(game: TestGame) -> Engine<TestGame> {
        Engine::new(
            EngineConfig::default(),
            game,
            Box::new(HeadlessRenderer::new()),
            Box::new(NullAudio::new()),
        )
        .unwrap()
    }

    fn settle(engine: &mut Engine<TestGame>) {
        for _ in 0..40 {
            engine.tick(0.05);
        }
    }

    fn go_to_field(engine: &mut Engine<TestGame>) {
        engine.scenes_mut().request_scene(Stage::Field, 0.5).unwrap();
        settle(engine);
    }

    #[test]
    fn test_initial_scene_loads_behind_fade() {
        let mut engine = engine(TestGame::default());
        assert!(engine.registry().is_empty());
        assert!(engine.scenes().is_transitioning());

        settle(&mut engine);
        assert_eq!(engine.game().loads, vec![Stage::Title]);
        assert_eq!(engine.registry().len(), 1);
        assert!(!engine.scenes().is_transitioning());
    }

    #[test]
    fn test_hitstop_freezes_entities_but_not_scenes() {
        let mut engine = engine(TestGame::default());
        settle(&mut engine);
        let before = engine.game().shared.updates;

        engine.hitstop_mut().trigger();
        engine.scenes_mut().request_scene(Stage::Field, 0.5).unwrap();
        engine.tick(0.05);
        assert_eq!(engine.game().shared.updates, before);
        assert!(engine.scenes().timer() < 0.5);

        settle(&mut engine);
        assert!(engine.game().shared.updates > before);
        assert_eq!(engine.scenes().current(), Stage::Field);
    }

    #[test]
    fn test_pause_rules_and_music() {
        let mut engine = engine(TestGame::default());
        settle(&mut engine);

        engine.handle_event(&AppEvent::KeyPressed(KeyCode::Escape));
        assert!(!engine.is_paused(), "title scene cannot pause");

        go_to_field(&mut engine);
        engine.handle_event(&AppEvent::KeyReleased(KeyCode::Escape));
        engine.handle_event(&AppEvent::KeyPressed(KeyCode::Escape));
        assert!(engine.is_paused());
        let music = engine.game().shared.music.unwrap();
        assert_eq!(engine.audio().state(music), Some(PlaybackState::Paused));

        let before = engine.game().shared.updates;
        engine.tick(0.05);
        assert_eq!(engine.game().shared.updates, before);

        engine.toggle_pause();
        assert_eq!(engine.audio().state(music), Some(PlaybackState::Playing));
    }

    #[test]
    fn test_scene_swap_clears_pause() {
        let mut engine = engine(TestGame::default());
        settle(&mut engine);
        go_to_field(&mut engine);
        let music = engine.game().shared.music.unwrap();

        engine.scenes_mut().request_scene(Stage::Title, 0.5).unwrap();
        engine.tick(0.05);
        engine.toggle_pause();
        assert!(engine.is_paused());
        assert_eq!(engine.audio().state(music), Some(PlaybackState::Paused));

        settle(&mut engine);
        assert_eq!(engine.scenes().current(), Stage::Title);
        assert!(!engine.is_paused());
        assert_eq!(engine.audio().state(music), Some(PlaybackState::Playing));

        let before = engine.game().shared.updates;
        engine.tick(0.05);
        assert!(engine.game().shared.updates > before);
    }

    #[test]
    fn test_failed_load_keeps_partial_scene() {
        let mut engine = engine(TestGame {
            fail_field: true,
            ..TestGame::default()
        });
        settle(&mut engine);
        go_to_field(&mut engine);

        assert_eq!(engine.scenes().current(), Stage::Field);
        assert_eq!(engine.game().unloads, vec![Stage::Title, Stage::Title]);
        assert_eq!(engine.registry().len(), 1);
    }

    #[test]
    fn test_control_keys() {
        let mut engine = engine(TestGame::default());

        engine.handle_event(&AppEvent::KeyPressed(KeyCode::Num5));
        assert_eq!(engine.clock().time_scale(), crate::foundation::time::TimeScale::SlowMotion);
        engine.handle_event(&AppEvent::KeyPressed(KeyCode::Num6));
        assert_eq!(engine.clock().time_scale(), crate::foundation::time::TimeScale::Accelerated);

        engine.handle_event(&AppEvent::KeyPressed(KeyCode::Right));
        assert!(engine.input().is_held(KeyCode::Right));
        engine.handle_event(&AppEvent::WindowUnfocused);
        assert!(!engine.input().is_held(KeyCode::Right));

        engine.handle_event(&AppEvent::KeyPressed(KeyCode::Num8));
        assert!(!engine.is_running());
    }

    #[test]
    fn test_run_honors_max_frames() {
        let mut config = EngineConfig::default().with_max_frames(3);
        config.timing.target_fps = 1000;
        let mut engine = Engine::new(
            config,
            TestGame::default(),
            Box::new(HeadlessRenderer::new()),
            Box::new(NullAudio::new()),
        )
        .unwrap();

        assert_eq!(engine.run().unwrap(), 3);
    }

    #[test]
    fn test_quit_event_stops_loop() {
        let mut config = EngineConfig::default().with_max_frames(100);
        config.timing.target_fps = 1000;
        let mut engine = Engine::new(
            config,
            TestGame::default(),
            Box::new(HeadlessRenderer::new()),
            Box::new(NullAudio::new()),
        )
        .unwrap();

        let frames = engine
            .run_with(|frame| if frame == 2 { vec![AppEvent::WindowCloseRequested] } else { Vec::new() })
            .unwrap();
        assert_eq!(frames, 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.timing.target_fps = 0;
        let result = Engine::new(
            config,
            TestGame::default(),
            Box::new(HeadlessRenderer::new()),
            Box::new(NullAudio::new()),
        );
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}

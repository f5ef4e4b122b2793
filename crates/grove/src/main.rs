//! Grove demo runner
//!
//! Runs the game headless with a scripted input sequence: pick "continue" on
//! the title menu, then run right, jumping and shooting. Pass a config file
//! path as the first argument to override `grove.toml`.

use std::error::Error;

use grove::config::CONFIG_FILE;
use grove::{GameConfig, GroveGame};
use platform_engine::audio::NullAudio;
use platform_engine::foundation::logging;
use platform_engine::input::KeyCode;
use platform_engine::render::HeadlessRenderer;
use platform_engine::{AppEvent, Engine};

const DEMO_FRAMES: u64 = 600;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());
    let mut config = GameConfig::load(&path)?;
    logging::init(&config.engine.log_level);
    log::info!("Starting Grove with {path}");

    config.engine.max_frames.get_or_insert(DEMO_FRAMES);
    let engine_config = config.engine.clone();

    let mut engine = Engine::new(
        engine_config,
        GroveGame::new(config),
        Box::new(HeadlessRenderer::new().with_history(1)),
        Box::new(NullAudio::new()),
    )?;

    let frames = engine.run_with(demo_input)?;
    let shared = engine.game().shared();
    log::info!(
        "Demo finished after {frames} frames in {} ({} kills)",
        engine.scenes().current(),
        shared.kills
    );
    Ok(())
}

/// Scripted key events for frame `frame`
fn demo_input(frame: u64) -> Vec<AppEvent> {
    let press = AppEvent::KeyPressed;
    let release = AppEvent::KeyReleased;
    match frame {
        90 => vec![press(KeyCode::Enter)],
        91 => vec![release(KeyCode::Enter)],
        180 => vec![press(KeyCode::Right)],
        f if f > 180 && f % 45 == 0 => vec![press(KeyCode::Space), press(KeyCode::X)],
        f if f > 180 && f % 45 == 1 => vec![release(KeyCode::Space), release(KeyCode::X)],
        _ => Vec::new(),
    }
}

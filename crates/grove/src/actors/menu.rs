//! Title screen menu

use platform_engine::ecs::Frame;
use platform_engine::input::KeyCode;

use super::{Actor, SCENE_FADE};

/// Entries of the title menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    /// Return to the last level played
    Continue,
    /// Start over from the first level with a new player
    NewGame,
}

impl MenuOption {
    const ALL: [Self; 2] = [Self::Continue, Self::NewGame];
}

/// Menu cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainMenu {
    selected: usize,
}

impl MainMenu {
    /// Menu with the first entry selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlighted entry
    pub fn selected(&self) -> MenuOption {
        MenuOption::ALL[self.selected % MenuOption::ALL.len()]
    }

    pub(crate) fn update(&mut self, frame: &mut Frame<'_, Actor>) {
        let count = MenuOption::ALL.len();
        if frame.input.just_pressed(KeyCode::Down) {
            self.selected = (self.selected + 1) % count;
        }
        if frame.input.just_pressed(KeyCode::Up) {
            self.selected = (self.selected + count - 1) % count;
        }
        if !frame.input.just_pressed(KeyCode::Enter) {
            return;
        }

        let target = match self.selected() {
            MenuOption::Continue => frame.shared.continue_scene,
            MenuOption::NewGame => frame.shared.first_level,
        };
        match frame.request_scene(target, SCENE_FADE) {
            Ok(()) => {
                if self.selected() == MenuOption::NewGame {
                    frame.shared.fresh_start = true;
                }
                log::info!("Menu: {:?} -> {target:?}", self.selected());
            }
            Err(err) => log::debug!("Menu selection ignored: {err}"),
        }
    }
}

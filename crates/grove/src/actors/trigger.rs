//! Level triggers and levers
//!
//! A trigger fires once when the player overlaps it; a lever additionally
//! waits for the player to press up. Either one destroys itself after a
//! successful action.

use platform_engine::ecs::{Category, EntityId, Frame};
use platform_engine::foundation::math::Vec2;
use platform_engine::input::KeyCode;

use super::{touching, Actor, SCENE_FADE};
use crate::scenes::GameScene;

/// What a trigger does
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerAction {
    /// Fade to another scene
    ChangeScene(GameScene),
    /// Hold the camera at a world position
    FixCamera(Vec2),
    /// Let the camera follow the player again
    ReleaseCamera,
    /// Destroy the grounds with these level ids
    UnlockGrounds(Vec<i32>),
}

/// Trigger state
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    action: TriggerAction,
    needs_interaction: bool,
}

impl Trigger {
    /// Fires on contact
    pub fn on_touch(action: TriggerAction) -> Self {
        Self {
            action,
            needs_interaction: false,
        }
    }

    /// Fires on contact plus an up press
    pub fn lever(action: TriggerAction) -> Self {
        Self {
            action,
            needs_interaction: true,
        }
    }

    /// The action performed when fired
    pub fn action(&self) -> &TriggerAction {
        &self.action
    }

    pub(crate) fn update(&mut self, id: EntityId, frame: &mut Frame<'_, Actor>) {
        let Some(player) = frame.shared.player else {
            return;
        };
        if !touching(frame.registry, id, player) {
            return;
        }
        if self.needs_interaction && !frame.input.just_pressed(KeyCode::Up) {
            return;
        }

        if self.fire(frame) {
            if let Some(entity) = frame.entity_mut(id) {
                entity.destroy();
            }
        }
    }

    fn fire(&self, frame: &mut Frame<'_, Actor>) -> bool {
        match &self.action {
            TriggerAction::ChangeScene(scene) => match frame.request_scene(*scene, SCENE_FADE) {
                Ok(()) => true,
                Err(err) => {
                    log::debug!("Trigger waiting: {err}");
                    false
                }
            },
            TriggerAction::FixCamera(point) => {
                frame.camera.fix_at(*point);
                true
            }
            TriggerAction::ReleaseCamera => {
                frame.camera.release();
                true
            }
            TriggerAction::UnlockGrounds(ids) => {
                for &level_id in ids {
                    match frame.registry.find_by_level_id(Category::GROUND, level_id) {
                        Some(ground) => {
                            if let Some(entity) = frame.entity_mut(ground) {
                                entity.destroy();
                            }
                        }
                        None => log::warn!("Trigger names ground {level_id}, which does not exist"),
                    }
                }
                log::debug!("Unlocked {} grounds", ids.len());
                true
            }
        }
    }
}

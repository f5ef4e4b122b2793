//! Per-frame draw submission

use crate::ecs::components::DrawKind;
use crate::ecs::EntityRegistry;
use crate::foundation::math::Rect;

use super::{Camera2D, Color, DrawCommand, Renderer};

/// Submit one frame: entities in draw order, then the fade overlay
///
/// Returns the number of entity draws submitted.
pub fn render_frame<B>(
    renderer: &mut dyn Renderer,
    registry: &EntityRegistry<B>,
    camera: &Camera2D,
    overlay: Option<u8>,
    clear_color: Color,
) -> usize {
    renderer.clear(clear_color);

    let mut submitted = 0;
    for id in registry.draw_list() {
        let Some(entity) = registry.get(id) else {
            continue;
        };
        let Some(drawable) = entity.drawable.as_ref() else {
            continue;
        };

        let world = Rect::centered(entity.transform.position, entity.transform.size);
        let dest = camera.world_to_screen(world);
        let command = match &drawable.kind {
            DrawKind::Sprite { texture: Some(texture), source } => DrawCommand::Sprite {
                texture: *texture,
                source: *source,
                dest,
                flip_x: drawable.flip_x,
            },
            DrawKind::Sprite { texture: None, .. } => continue,
            DrawKind::Rect { color } => DrawCommand::Rect { dest, color: *color },
        };
        renderer.draw(command);
        submitted += 1;
    }

    if let Some(alpha) = overlay {
        renderer.fill_screen(Color::BLACK.with_alpha(alpha));
    }
    renderer.present();

    log::trace!("Frame submitted with {submitted} draws");
    submitted
}

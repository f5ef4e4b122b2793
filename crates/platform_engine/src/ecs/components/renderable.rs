//! Drawable component for entities that can be rendered
//!
//! A drawable only describes what to draw. The render pass turns it into a
//! [`DrawCommand`](crate::render::DrawCommand) using the entity transform and
//! the camera offset.

use crate::foundation::math::Rect;
use crate::render::{Color, TextureId};

/// What a drawable puts on screen
#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
    /// A textured quad; `None` means the texture failed to load
    Sprite {
        /// Texture to sample
        texture: Option<TextureId>,
        /// Source rectangle within the texture, whole texture if `None`
        source: Option<Rect>,
    },
    /// A solid rectangle
    Rect {
        /// Fill color
        color: Color,
    },
}

/// Component for entities that can be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    /// What to draw
    pub kind: DrawKind,

    /// Whether this drawable is visible
    pub visible: bool,

    /// Sort key; higher values draw later (on top)
    pub draw_order: i32,

    /// Mirror horizontally
    pub flip_x: bool,
}

impl Drawable {
    /// Create a sprite drawable
    pub fn sprite(texture: Option<TextureId>, draw_order: i32) -> Self {
        Self {
            kind: DrawKind::Sprite { texture, source: None },
            visible: true,
            draw_order,
            flip_x: false,
        }
    }

    /// Create a solid rectangle drawable
    pub fn rect(color: Color, draw_order: i32) -> Self {
        Self {
            kind: DrawKind::Rect { color },
            visible: true,
            draw_order,
            flip_x: false,
        }
    }

    /// Set the sprite source rectangle; ignored for solid rectangles
    pub fn with_source(mut self, rect: Rect) -> Self {
        if let DrawKind::Sprite { source, .. } = &mut self.kind {
            *source = Some(rect);
        }
        self
    }

    /// Set visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Check if this drawable produces anything on screen
    ///
    /// Hidden drawables and sprites whose texture failed to load are skipped.
    pub fn should_render(&self) -> bool {
        self.visible && !matches!(self.kind, DrawKind::Sprite { texture: None, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_texture_is_skipped() {
        assert!(!Drawable::sprite(None, 0).should_render());
        assert!(Drawable::sprite(Some(TextureId(1)), 0).should_render());
    }

    #[test]
    fn test_hidden_rect_is_skipped() {
        let mut drawable = Drawable::rect(Color::BLACK, 3);
        assert!(drawable.should_render());
        drawable.set_visible(false);
        assert!(!drawable.should_render());
    }

    #[test]
    fn test_source_only_applies_to_sprites() {
        let rect = Rect::new(0.0, 0.0, 16.0, 16.0);
        let sprite = Drawable::sprite(Some(TextureId(2)), 0).with_source(rect);
        assert!(matches!(sprite.kind, DrawKind::Sprite { source: Some(r), .. } if r == rect));

        let solid = Drawable::rect(Color::WHITE, 0).with_source(rect);
        assert!(matches!(solid.kind, DrawKind::Rect { .. }));
    }
}

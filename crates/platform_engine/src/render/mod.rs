//! # Rendering System
//!
//! The engine does not talk to a graphics API. It turns the registry's draw
//! list into [`DrawCommand`]s in screen space and hands them to a
//! [`Renderer`] implementation supplied by the application.
//!
//! ## Frame contract
//!
//! 1. `clear`
//! 2. one `draw` per visible drawable, sorted by draw order
//! 3. `fill_screen` with the transition overlay, if any
//! 4. `present`

pub mod camera;
pub mod frame;
pub mod headless;

use std::path::Path;

use crate::foundation::math::Rect;

pub use camera::Camera2D;
pub use frame::render_frame;
pub use headless::HeadlessRenderer;

/// Handle to a texture owned by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// One screen-space draw request
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Textured quad
    Sprite {
        /// Texture to sample
        texture: TextureId,
        /// Region of the texture, whole texture if `None`
        source: Option<Rect>,
        /// Destination on screen
        dest: Rect,
        /// Mirror horizontally
        flip_x: bool,
    },
    /// Solid rectangle
    Rect {
        /// Destination on screen
        dest: Rect,
        /// Fill color
        color: Color,
    },
}

/// Draw submission backend
pub trait Renderer {
    /// Load a texture; `None` if it cannot be loaded
    fn load_texture(&mut self, path: &Path) -> Option<TextureId>;

    /// Start a frame
    fn clear(&mut self, color: Color);

    /// Submit one draw
    fn draw(&mut self, command: DrawCommand);

    /// Cover the whole screen with `color` (used for fades)
    fn fill_screen(&mut self, color: Color);

    /// Finish the frame
    fn present(&mut self);
}

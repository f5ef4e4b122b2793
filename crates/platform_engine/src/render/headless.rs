//! Recording renderer
//!
//! Keeps every submitted frame in memory instead of drawing it. Used by the
//! headless game binary and by tests that check what reached the screen.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::{Color, DrawCommand, Renderer, TextureId};

/// One presented frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFrame {
    /// Clear color
    pub clear: Color,
    /// Draws in submission order
    pub commands: Vec<DrawCommand>,
    /// Full-screen overlay, if one was requested
    pub overlay: Option<Color>,
}

/// Renderer that records instead of drawing
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    textures: HashMap<PathBuf, TextureId>,
    failing: HashSet<PathBuf>,
    current: RecordedFrame,
    last: Option<RecordedFrame>,
    presented: u64,
    history_limit: usize,
    history: Vec<RecordedFrame>,
}

impl HeadlessRenderer {
    /// Create a renderer that keeps only the last frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Also keep the last `limit` frames
    pub fn with_history(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Make texture loads for `path` fail
    pub fn fail_texture(&mut self, path: impl Into<PathBuf>) {
        self.failing.insert(path.into());
    }

    /// Last presented frame
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.last.as_ref()
    }

    /// Retained frames, oldest first
    pub fn history(&self) -> &[RecordedFrame] {
        &self.history
    }

    /// Number of frames presented
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// Number of distinct textures loaded
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl Renderer for HeadlessRenderer {
    fn load_texture(&mut self, path: &Path) -> Option<TextureId> {
        if self.failing.contains(path) {
            log::warn!("Failed to load texture {}", path.display());
            return None;
        }

        let next = TextureId(u32::try_from(self.textures.len()).ok()?);
        Some(*self.textures.entry(path.to_path_buf()).or_insert(next))
    }

    fn clear(&mut self, color: Color) {
        self.current = RecordedFrame {
            clear: color,
            ..RecordedFrame::default()
        };
    }

    fn draw(&mut self, command: DrawCommand) {
        self.current.commands.push(command);
    }

    fn fill_screen(&mut self, color: Color) {
        self.current.overlay = Some(color);
    }

    fn present(&mut self) {
        let frame = std::mem::take(&mut self.current);
        if self.history_limit > 0 {
            if self.history.len() == self.history_limit {
                self.history.remove(0);
            }
            self.history.push(frame.clone());
        }
        self.last = Some(frame);
        self.presented += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textures_cached_by_path() {
        let mut renderer = HeadlessRenderer::new();
        let a = renderer.load_texture(Path::new("player.png"));
        let b = renderer.load_texture(Path::new("enemy.png"));
        assert_ne!(a, b);
        assert_eq!(renderer.load_texture(Path::new("player.png")), a);
        assert_eq!(renderer.texture_count(), 2);
    }

    #[test]
    fn test_failing_texture_returns_none() {
        let mut renderer = HeadlessRenderer::new();
        renderer.fail_texture("missing.png");
        assert_eq!(renderer.load_texture(Path::new("missing.png")), None);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut renderer = HeadlessRenderer::new().with_history(2);
        for shade in 0..3 {
            renderer.clear(Color::rgb(shade, 0, 0));
            renderer.present();
        }
        assert_eq!(renderer.history().len(), 2);
        assert_eq!(renderer.history()[0].clear, Color::rgb(1, 0, 0));
        assert_eq!(renderer.frames_presented(), 3);
    }
}

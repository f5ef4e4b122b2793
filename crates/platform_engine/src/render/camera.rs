//! # 2D Camera
//!
//! Follows a focus entity, or stays at a fixed point, and produces the view
//! offset used to turn world positions into screen positions.
//!
//! ## Behavior
//! - **Follow**: the view center eases toward the target each update
//! - **Fixed**: a fixed point overrides the focus until released
//! - **Bounds**: the view is kept inside the level rectangle when one is set
//! - **Shake**: a timed random offset on top of everything else
//!
//! The camera only stores the focus [`EntityId`]; when the entity is gone the
//! camera stays where it is.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::config::ViewConfig;
use crate::ecs::{EntityId, EntityRegistry};
use crate::foundation::math::{Rect, Vec2};

#[derive(Debug, Clone, Default)]
struct Shake {
    remaining: f32,
    magnitude: f32,
}

/// Side-scrolling camera
#[derive(Debug, Clone)]
pub struct Camera2D {
    center: Vec2,
    view_size: Vec2,
    follow_speed: f32,
    focus: Option<EntityId>,
    fixed: Option<Vec2>,
    bounds: Option<Rect>,
    shake: Shake,
    shake_offset: Vec2,
    rng: StdRng,
}

impl Camera2D {
    /// Create a camera showing `view_size` world units
    pub fn new(view_size: Vec2, follow_speed: f32) -> Self {
        Self {
            center: view_size / 2.0,
            view_size,
            follow_speed: follow_speed.max(0.0),
            focus: None,
            fixed: None,
            bounds: None,
            shake: Shake::default(),
            shake_offset: Vec2::zeros(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a camera from view configuration
    pub fn from_config(view: &ViewConfig) -> Self {
        Self::new(
            Vec2::new(view.logical_width, view.logical_height),
            view.camera_follow_speed,
        )
    }

    /// Use a seeded generator for shake offsets
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Follow `entity`, or nothing
    pub fn set_focus(&mut self, entity: Option<EntityId>) {
        self.focus = entity;
    }

    /// Entity being followed
    pub fn focus(&self) -> Option<EntityId> {
        self.focus
    }

    /// Hold the view centered on `point` until [`Camera2D::release`]
    pub fn fix_at(&mut self, point: Vec2) {
        log::debug!("Camera fixed at ({:.1}, {:.1})", point.x, point.y);
        self.fixed = Some(point);
    }

    /// Go back to following the focus
    pub fn release(&mut self) {
        self.fixed = None;
    }

    /// Whether a fixed point overrides the focus
    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    /// Keep the view inside `bounds` (world space), or anywhere
    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
        self.center = self.clamped(self.center);
    }

    /// Jump straight to `center`
    pub fn snap_to(&mut self, center: Vec2) {
        self.center = self.clamped(center);
    }

    /// Shake for `duration` seconds by up to `magnitude` units
    pub fn shake(&mut self, duration: f32, magnitude: f32) {
        self.shake = Shake {
            remaining: duration.max(0.0),
            magnitude: magnitude.abs(),
        };
    }

    /// Whether a shake is running
    pub fn is_shaking(&self) -> bool {
        self.shake.remaining > 0.0
    }

    /// Ease toward the target and advance the shake
    pub fn update<B>(&mut self, delta_time: f32, registry: &EntityRegistry<B>) {
        let target = self.fixed.or_else(|| {
            self.focus
                .and_then(|id| registry.get(id))
                .map(|entity| entity.transform.position)
        });

        if let Some(target) = target {
            let t = (self.follow_speed * delta_time).min(1.0);
            self.center = self.clamped(self.center + (target - self.center) * t);
        }

        if self.shake.remaining > 0.0 {
            self.shake.remaining -= delta_time;
            let m = self.shake.magnitude;
            self.shake_offset = Vec2::new(self.rng.gen_range(-m..=m), self.rng.gen_range(-m..=m));
        } else {
            self.shake_offset = Vec2::zeros();
        }
    }

    fn clamped(&self, center: Vec2) -> Vec2 {
        let Some(bounds) = self.bounds else {
            return center;
        };
        let half = self.view_size / 2.0;
        let clamp_axis = |value: f32, min: f32, len: f32, half: f32| {
            if len <= half * 2.0 {
                min + len / 2.0
            } else {
                value.clamp(min + half, min + len - half)
            }
        };
        Vec2::new(
            clamp_axis(center.x, bounds.x, bounds.w, half.x),
            clamp_axis(center.y, bounds.y, bounds.h, half.y),
        )
    }

    /// View center in world space, without shake
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// World position of the top-left screen corner, shake included
    pub fn offset(&self) -> Vec2 {
        self.center - self.view_size / 2.0 + self.shake_offset
    }

    /// Size of the view in world units
    pub fn view_size(&self) -> Vec2 {
        self.view_size
    }

    /// Convert a world rectangle to screen space
    pub fn world_to_screen(&self, rect: Rect) -> Rect {
        rect.translated(self.offset())
    }
}

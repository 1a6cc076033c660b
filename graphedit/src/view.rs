use crate::model::Vec2;
use serde::{Deserialize, Serialize};

/// Pan offset plus uniform scale: `screen = world * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub offset: Vec2,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        ViewTransform::identity()
    }
}

impl ViewTransform {
    pub fn new(offset: Vec2, scale: f64) -> Self {
        ViewTransform { offset, scale }
    }

    pub fn identity() -> Self {
        ViewTransform {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }

    #[inline]
    pub fn to_world(&self, p: Vec2) -> Vec2 {
        Vec2::new((p.x - self.offset.x) / self.scale, (p.y - self.offset.y) / self.scale)
    }

    #[inline]
    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x * self.scale + self.offset.x, p.y * self.scale + self.offset.y)
    }

    /// Screen-space length in world units.
    #[inline]
    pub fn to_world_len(&self, px: f64) -> f64 {
        px / self.scale
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset = self.offset + delta;
    }

    /// `scale = base * factor^step`
    pub fn set_zoom(&mut self, step: f64, base: f64, factor: f64) {
        self.scale = base * factor.powf(step);
    }
}

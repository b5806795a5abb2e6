//! Axis-aligned rectangles for entity bounds
//!
//! Screen space: origin at the top-left corner, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Build a rect of `size` whose center is at `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Midpoint of the bottom edge
    #[inline]
    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.bottom())
    }

    /// Midpoint of the top edge
    #[inline]
    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// Strict AABB overlap: rects that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True once the rect lies entirely outside a `width` x `height` screen
    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        self.bottom() < 0.0 || self.top() > height || self.right() < 0.0 || self.left() > width
    }
}

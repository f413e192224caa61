//! Axis-aligned rectangle geometry for ball, paddle and bricks
//!
//! Screen space: origin at the top-left corner, y grows downward.
//! - left/right: x extent
//! - top/bottom: y extent

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
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

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
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

    /// Center point
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Overlap depth along each axis (x, y)
    ///
    /// Each component is the smaller of the two ways the rectangles could be
    /// pushed apart on that axis. Only meaningful when the rectangles intersect.
    pub fn penetration(&self, other: &Rect) -> Vec2 {
        Vec2::new(
            (other.right() - self.left()).min(self.right() - other.left()),
            (other.bottom() - self.top()).min(self.bottom() - other.top()),
        )
    }
}

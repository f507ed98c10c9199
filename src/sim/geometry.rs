//! Rectangle and circle primitives for capture tests
//!
//! Cells are axis-aligned squares in level-local pixel space (y grows
//! downward). A growing circle captures a cell by containing all four of
//! its corners; mere edge contact is a separate test used for blockers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// The four corners, clockwise from the origin corner
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.pos,
            self.pos + Vec2::new(self.size.x, 0.0),
            self.pos + self.size,
            self.pos + Vec2::new(0.0, self.size.y),
        ]
    }

    /// Point containment, half-open: the right and bottom edges are outside
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.x < self.pos.x + self.size.x
            && p.y >= self.pos.y
            && p.y < self.pos.y + self.size.y
    }

    /// Closest point on or inside the rectangle to `p`
    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.pos, self.pos + self.size)
    }
}

/// A circle in level-local pixel space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    /// Pointer-over flag for rendering, never part of capture logic
    #[serde(skip)]
    pub hovered: bool,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            hovered: false,
        }
    }

    /// Squared-distance point test; the boundary counts as inside
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.center.distance_squared(p) <= self.radius * self.radius
    }

    /// True when every corner of the rect is inside the circle
    pub fn contains_rect(&self, rect: &Rect) -> bool {
        rect.corners().iter().all(|&c| self.contains_point(c))
    }

    /// True when the circle overlaps the rect without fully containing it
    pub fn touches_rect(&self, rect: &Rect) -> bool {
        let closest = rect.clamp_point(self.center);
        self.center.distance_squared(closest) <= self.radius * self.radius
            && !self.contains_rect(rect)
    }

    /// True when two circles overlap or meet exactly
    #[inline]
    pub fn touches_circle(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }
}

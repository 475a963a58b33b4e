//! 2D collision primitives: axis-aligned boxes and discs.

use glam::Vec2;

/// Axis-aligned rectangle given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    pub mins: Vec2,
    pub maxs: Vec2,
}

impl Aabb2 {
    pub const fn new(mins: Vec2, maxs: Vec2) -> Self {
        Self { mins, maxs }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            mins: center - half_extents,
            maxs: center + half_extents,
        }
    }

    /// Corner at (min x, max y).
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.mins.x, self.maxs.y)
    }

    pub fn center(&self) -> Vec2 {
        (self.mins + self.maxs) * 0.5
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            mins: self.mins + offset,
            maxs: self.maxs + offset,
        }
    }

    /// Grow every side outward by `amount`.
    pub fn inflated(&self, amount: f32) -> Self {
        Self {
            mins: self.mins - Vec2::splat(amount),
            maxs: self.maxs + Vec2::splat(amount),
        }
    }

    /// Strict overlap test; boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.mins.x < other.maxs.x
            && self.maxs.x > other.mins.x
            && self.mins.y < other.maxs.y
            && self.maxs.y > other.mins.y
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x > self.mins.x && point.x < self.maxs.x && point.y > self.mins.y && point.y < self.maxs.y
    }

    /// True if the disc at `center` with `radius` overlaps this box.
    pub fn intersects_disc(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.mins, self.maxs);
        closest.distance_squared(center) < radius * radius
    }

    /// Per-axis displacement that moves `point` onto the nearest edge of the box.
    ///
    /// Each component is the shorter of the two ways out along that axis, so
    /// the caller can pick whichever axis is cheaper to resolve.
    pub fn smallest_resolution_vector(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            shorter(self.mins.x - point.x, self.maxs.x - point.x),
            shorter(self.mins.y - point.y, self.maxs.y - point.y),
        )
    }
}

fn shorter(a: f32, b: f32) -> f32 {
    if a.abs() < b.abs() { a } else { b }
}

/// Disc/disc overlap: centers closer than the sum of the radii.
pub fn discs_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

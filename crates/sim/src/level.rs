//! Static level geometry. Built once by the host, never mutated.

use glam::Vec2;

use crate::geometry::Aabb2;

/// Map art is authored at 16 pixels per world unit.
pub const UNITS_PER_PIXEL: f32 = 1.0 / 16.0;

/// Offset that puts the middle of the 480x256 px map at the world origin.
pub const MAP_OFFSET: Vec2 = Vec2::new(15.0, 8.0);

/// Immutable set of obstacle rectangles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelGeometry {
    obstacles: Vec<Aabb2>,
}

impl LevelGeometry {
    pub fn new(obstacles: Vec<Aabb2>) -> Self {
        Self { obstacles }
    }

    /// A level with no obstacles.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The town map: outer walls, houses, fountains, centre plaza, trees and
    /// the volcano.
    pub fn town() -> Self {
        let obstacles = vec![
            // Outer walls, extended far outside the map
            Aabb2::new(units(0.0, -500.0), px(480.0, 16.0)),
            Aabb2::new(units(-500.0, 0.0), px(16.0, 256.0)),
            Aabb2::new(px(464.0, 0.0), px(980.0, 256.0)),
            Aabb2::new(px(0.0, 240.0), px(480.0, 756.0)),
            // Upper houses
            Aabb2::new(px(0.0, 209.0), px(63.0, 256.0)),
            Aabb2::new(px(416.0, 209.0), px(463.0, 256.0)),
            // Lower houses
            Aabb2::new(px(368.0, 64.0), px(415.0, 95.0)),
            Aabb2::new(px(64.0, 64.0), px(111.0, 95.0)),
            // Fountains
            Aabb2::new(px(16.0, 16.0), px(47.0, 47.0)),
            Aabb2::new(px(432.0, 16.0), px(463.0, 47.0)),
            // Centre
            Aabb2::new(px(224.0, 48.0), px(255.0, 144.0)),
            Aabb2::new(px(191.0, 65.0), px(287.0, 95.0)),
            // Trees
            Aabb2::new(px(144.0, 16.0), px(175.0, 47.0)),
            Aabb2::new(px(304.0, 112.0), px(335.0, 144.0)),
            Aabb2::new(px(144.0, 112.0), px(175.0, 144.0)),
            Aabb2::new(px(304.0, 16.0), px(335.0, 47.0)),
            // Volcano
            Aabb2::new(px(192.0, 193.0), px(287.0, 240.0)),
        ];
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Aabb2] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

/// Map pixel coordinates to world units.
fn px(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y) * UNITS_PER_PIXEL - MAP_OFFSET
}

/// Raw world units, shifted by the map offset only.
fn units(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y) - MAP_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_town_layout() {
        let level = LevelGeometry::town();
        assert_eq!(level.len(), 17);
        for rect in level.obstacles() {
            assert!(rect.mins.x < rect.maxs.x && rect.mins.y < rect.maxs.y);
        }
    }

    #[test]
    fn test_town_is_walled_in() {
        let level = LevelGeometry::town();
        let outside = [
            Vec2::new(0.0, -20.0),
            Vec2::new(-20.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(0.0, 20.0),
        ];
        for p in outside {
            assert!(
                level.obstacles().iter().any(|r| r.contains_point(p)),
                "{p:?} should be inside a wall"
            );
        }
    }

    #[test]
    fn test_empty_level() {
        assert!(LevelGeometry::empty().is_empty());
    }
}

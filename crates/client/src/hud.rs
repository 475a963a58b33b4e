//! Heads-up display state: the local player's hearts.

use glam::Vec2;
use swordplay_sim::Rgba;

/// Where the first heart sits relative to the camera.
pub const HEARTS_OFFSET: Vec2 = Vec2::new(-4.0, 3.5);

/// Spacing between consecutive hearts.
pub const HEART_SPACING: Vec2 = Vec2::new(1.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeartState {
    Full,
    Half,
    #[default]
    Empty,
}

impl HeartState {
    pub fn sprite_name(self) -> &'static str {
        match self {
            Self::Full => "fullHeart",
            Self::Half => "halfHeart",
            Self::Empty => "emptyHeart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heart {
    pub state: HeartState,
    pub position: Vec2,
    pub tint: Rgba,
}

/// Split `health` over `count` hearts, filling greedily from the first.
pub fn heart_states(health: f32, count: usize, health_per_heart: f32) -> Vec<HeartState> {
    let half = health_per_heart / 2.0;
    let mut remaining = health;
    (0..count)
        .map(|_| {
            if remaining >= health_per_heart {
                remaining -= health_per_heart;
                HeartState::Full
            } else if remaining >= half {
                remaining -= half;
                HeartState::Half
            } else {
                HeartState::Empty
            }
        })
        .collect()
}

/// Lay the hearts out along the top of the view.
pub fn layout_hearts(
    health: f32,
    count: usize,
    health_per_heart: f32,
    camera: Vec2,
    tint: Rgba,
) -> Vec<Heart> {
    heart_states(health, count, health_per_heart)
        .into_iter()
        .enumerate()
        .map(|(i, state)| Heart {
            state,
            position: camera + HEARTS_OFFSET + HEART_SPACING * i as f32,
            tint,
        })
        .collect()
}

//! Base entity record shared by every actor variant.

use glam::Vec2;

use crate::color::Rgba;
use crate::geometry::{Aabb2, discs_overlap};
use crate::player::Facing;

/// Optional network identifier for replicated non-player entities.
pub type NetworkId = u16;

/// Divisor applied to penetration depth when pushing overlapping actors apart.
pub const COLLISION_DAMPING: f32 = 8.0;

/// Which sprite the renderer should draw for an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Standing(Facing),
    Item,
}

impl Pose {
    /// Sprite resource name registered by the asset layer.
    pub fn sprite_name(&self) -> &'static str {
        match self {
            Self::Standing(Facing::West) => "pLeft",
            Self::Standing(Facing::North) => "pUp",
            Self::Standing(Facing::East) => "pRight",
            Self::Standing(Facing::South) => "pDown",
            Self::Item => "pickup",
        }
    }
}

/// Presentation-side state of an actor. Rendering is external; this is what
/// it reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub position: Vec2,
    pub rotation_degrees: f32,
    pub scale: Vec2,
    pub tint: Rgba,
    pub pose: Pose,
    pub visible: bool,
    pub half_extents: Vec2,
}

impl Visual {
    pub fn new(pose: Pose, tint: Rgba, half_extents: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            rotation_degrees: 0.0,
            scale: Vec2::ONE,
            tint,
            pose,
            visible: true,
            half_extents,
        }
    }

    pub fn bounds(&self) -> Aabb2 {
        Aabb2::from_center(self.position, self.half_extents * self.scale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: Vec2,
    pub rotation_degrees: f32,
    pub health: f32,
    pub max_health: f32,
    pub collision_radius: f32,
    pub age: f32,
    pub dead: bool,
    pub visual: Option<Visual>,
    pub network_id: Option<NetworkId>,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation_degrees: 0.0,
            health: 1.0,
            max_health: 1.0,
            collision_radius: 1.0,
            age: 0.0,
            dead: false,
            visual: None,
            network_id: None,
        }
    }
}

impl Entity {
    pub fn update(&mut self, dt: f32) {
        self.age += dt;
    }

    pub fn is_colliding_with(&self, other: &Self) -> bool {
        discs_overlap(
            self.position,
            self.collision_radius,
            other.position,
            other.collision_radius,
        )
    }

    /// Push both entities apart along the line between their centers.
    ///
    /// Each side moves by 1/[`COLLISION_DAMPING`] of the penetration depth, so
    /// repeated ticks ease overlapping actors apart instead of snapping them.
    /// Coincident centers separate along +X.
    pub fn resolve_collision(&mut self, other: &mut Self) {
        let offset = self.position - other.position;
        let distance = offset.length();
        let penetration = self.collision_radius + other.collision_radius - distance;
        if penetration <= 0.0 {
            return;
        }
        let direction = if distance > f32::EPSILON {
            offset / distance
        } else {
            Vec2::X
        };
        let push = direction * (penetration / COLLISION_DAMPING);
        self.position += push;
        other.position -= push;
    }

    /// Subtract health; the entity dies once health drops strictly below zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
        if self.health < 0.0 {
            self.dead = true;
        }
    }

    /// Copy simulated transform onto the visual.
    pub fn apply_client_update(&mut self) {
        if let Some(visual) = self.visual.as_mut() {
            visual.position = self.position;
            visual.rotation_degrees = self.rotation_degrees;
        }
    }

    /// Bounds of the visual, or a degenerate box at the position when the
    /// entity has none.
    pub fn visual_bounds(&self) -> Aabb2 {
        self.visual
            .as_ref()
            .map_or(Aabb2::new(self.position, self.position), Visual::bounds)
    }
}

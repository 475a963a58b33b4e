//! Actor variants stored in the host's live table.

use glam::Vec2;

use crate::color::Rgba;
use crate::entity::{Entity, Pose, Visual};
use crate::player::{PlayerActor, StepContext};

/// Health given to pickups so stray collisions never remove them.
pub const PICKUP_HEALTH: f32 = 9_999_999.0;

pub const PICKUP_HALF_EXTENTS: Vec2 = Vec2::new(0.25, 0.25);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Speed,
    Power,
    Defence,
    FireRate,
    Hp,
}

impl PickupKind {
    pub const ALL: [Self; 5] = [
        Self::Speed,
        Self::Power,
        Self::Defence,
        Self::FireRate,
        Self::Hp,
    ];
}

/// A collectible lying in the world. Takes part in collision, grants nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub entity: Entity,
    pub kind: PickupKind,
}

impl Pickup {
    pub fn new(kind: PickupKind, position: Vec2, rotation_degrees: f32) -> Self {
        let mut visual = Visual::new(Pose::Item, Rgba::WHITE, PICKUP_HALF_EXTENTS);
        visual.position = position;
        visual.rotation_degrees = rotation_degrees;
        let entity = Entity {
            position,
            rotation_degrees,
            health: PICKUP_HEALTH,
            max_health: PICKUP_HEALTH,
            visual: Some(visual),
            ..Default::default()
        };
        Self { entity, kind }
    }

    /// Age and bob the visual scale.
    pub fn update(&mut self, dt: f32) {
        self.entity.update(dt);
        let scale = 1.0 + (self.entity.age * 2.0).sin() / 4.0;
        if let Some(visual) = self.entity.visual.as_mut() {
            visual.scale = Vec2::splat(scale);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Actor {
    Player(PlayerActor),
    Pickup(Pickup),
}

impl Actor {
    pub fn entity(&self) -> &Entity {
        match self {
            Self::Player(p) => &p.entity,
            Self::Pickup(p) => &p.entity,
        }
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        match self {
            Self::Player(p) => &mut p.entity,
            Self::Pickup(p) => &mut p.entity,
        }
    }

    pub fn as_player(&self) -> Option<&PlayerActor> {
        match self {
            Self::Player(p) => Some(p),
            Self::Pickup(_) => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerActor> {
        match self {
            Self::Player(p) => Some(p),
            Self::Pickup(_) => None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.entity().dead
    }

    pub fn update(&mut self, dt: f32, ctx: &StepContext<'_>) {
        match self {
            Self::Player(p) => p.update(dt, ctx),
            Self::Pickup(p) => p.update(dt),
        }
    }

    /// Disc/disc overlap check and push-apart in one call.
    pub fn resolve_collision(&mut self, other: &mut Self) {
        let (a, b) = (self.entity_mut(), other.entity_mut());
        if a.is_colliding_with(b) {
            a.resolve_collision(b);
        }
    }
}

impl From<PlayerActor> for Actor {
    fn from(player: PlayerActor) -> Self {
        Self::Player(player)
    }
}

impl From<Pickup> for Actor {
    fn from(pickup: Pickup) -> Self {
        Self::Pickup(pickup)
    }
}

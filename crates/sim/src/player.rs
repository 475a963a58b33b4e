//! Player actors: facing, movement against level geometry, sword placement
//! and the client-side hurt flash.

use glam::Vec2;

use crate::color::Rgba;
use crate::entity::{Entity, Pose, Visual};
use crate::geometry::Aabb2;
use crate::input::InputAxisTable;
use crate::level::LevelGeometry;
use crate::ConnectionIndex;

// ============================================================================
// Tuning
// ============================================================================

pub const PLAYER_MAX_HEALTH: f32 = 10.0;
pub const PLAYER_COLLISION_RADIUS: f32 = 0.3;
pub const PLAYER_SPEED: f32 = 1.0;
pub const PLAYER_ATTACK_RATE: f32 = 0.5;

/// Speed is expressed per tick and scaled down by this divisor.
pub const SPEED_DIVISOR: f32 = 20.0;

/// Input vectors shorter than this leave facing unchanged.
pub const FACING_DEADZONE: f32 = 0.01;

/// After attacking, the player is locked in place for this long.
pub const SWORD_STUN_DURATION_SECONDS: f64 = 0.25;

/// Window after a hit during which the tint flashes.
pub const HURT_FLASH_DURATION_SECONDS: f64 = 0.5;

/// Angular speed of the hurt flash oscillation.
pub const HURT_FLASH_SPEED: f64 = 60.0;

/// Half extents of the 16x16 px player sprite in world units.
pub const PLAYER_HALF_EXTENTS: Vec2 = Vec2::new(0.5, 0.5);

/// Half extents of the sword swing sprite in world units.
pub const SWORD_HALF_EXTENTS: Vec2 = Vec2::new(0.5, 0.5);

/// Cap on push-out passes per obstacle in [`PlayerActor::attempt_move`].
const MAX_RESOLUTION_PASSES: usize = 4;

// ============================================================================
// Facing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Facing {
    West = 0,
    North = 1,
    East = 2,
    #[default]
    South = 3,
}

impl Facing {
    pub const ALL: [Self; 4] = [Self::West, Self::North, Self::East, Self::South];

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::West),
            1 => Some(Self::North),
            2 => Some(Self::East),
            3 => Some(Self::South),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        i32::from(self as u8)
    }

    /// Unit vector pointing this way.
    pub fn direction(self) -> Vec2 {
        match self {
            Self::West => Vec2::NEG_X,
            Self::North => Vec2::Y,
            Self::East => Vec2::X,
            Self::South => Vec2::NEG_Y,
        }
    }
}

// ============================================================================
// Player Actor
// ============================================================================

/// Per-tick inputs the host hands to every actor's update.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub inputs: &'a InputAxisTable,
    pub level: &'a LevelGeometry,
    /// Simulation clock in seconds.
    pub now: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerActor {
    pub entity: Entity,
    /// Connection that controls this actor.
    pub owner: ConnectionIndex,
    pub facing: Facing,
    pub speed: f32,
    pub attack_rate: f32,
    pub color: Rgba,
    pub last_hurt_at: Option<f64>,
    pub last_attack_at: Option<f64>,
}

impl PlayerActor {
    pub fn new(owner: ConnectionIndex, color: Rgba) -> Self {
        let entity = Entity {
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            collision_radius: PLAYER_COLLISION_RADIUS,
            visual: Some(Visual::new(
                Pose::Standing(Facing::South),
                color,
                PLAYER_HALF_EXTENTS,
            )),
            ..Default::default()
        };
        Self {
            entity,
            owner,
            facing: Facing::South,
            speed: PLAYER_SPEED,
            attack_rate: PLAYER_ATTACK_RATE,
            color,
            last_hurt_at: None,
            last_attack_at: None,
        }
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
        if let Some(visual) = self.entity.visual.as_mut() {
            visual.tint = color;
        }
    }

    /// Host-side step: age, hurt timer, movement from the owner's input axes,
    /// then facing from that same input.
    pub fn update(&mut self, dt: f32, ctx: &StepContext<'_>) {
        self.entity.update(dt);
        if let Some(hurt_at) = self.last_hurt_at.as_mut() {
            *hurt_at += f64::from(dt);
        }

        let input = ctx.inputs.get(self.owner).direction();
        if self.can_move(ctx.now) {
            let attempted = self.entity.position + input * (self.speed / SPEED_DIVISOR);
            self.attempt_move(attempted, ctx.level);
        }
        self.facing = self.facing_from_input(input);
    }

    /// Move to `attempted`, sliding along obstacle edges.
    ///
    /// While the actor's disc overlaps an obstacle, only the cheaper axis of
    /// the push-out vector is applied, so contact slides instead of ejecting
    /// diagonally.
    pub fn attempt_move(&mut self, mut attempted: Vec2, level: &LevelGeometry) {
        let radius = self.entity.collision_radius;
        for obstacle in level.obstacles() {
            let inflated = obstacle.inflated(radius);
            for _ in 0..MAX_RESOLUTION_PASSES {
                if !obstacle.intersects_disc(attempted, radius) {
                    break;
                }
                let inside = inflated.smallest_resolution_vector(attempted);
                let displacement = if inside.x.abs() < inside.y.abs() {
                    Vec2::new(inside.x, 0.0)
                } else {
                    Vec2::new(0.0, inside.y)
                };
                attempted += displacement;
            }
        }
        self.entity.position = attempted;
        if let Some(visual) = self.entity.visual.as_mut() {
            visual.position = attempted;
        }
    }

    /// Cardinal direction with the largest projection of `input`.
    ///
    /// Candidates are checked SOUTH, NORTH, EAST, WEST and only a strictly
    /// better projection replaces the current best, so SOUTH wins ties.
    pub fn facing_from_input(&self, input: Vec2) -> Facing {
        if input.length() < FACING_DEADZONE {
            return self.facing;
        }
        let mut best = Facing::South;
        let mut best_difference = 1.0 - input.dot(Facing::South.direction());
        for candidate in [Facing::North, Facing::East, Facing::West] {
            let difference = 1.0 - input.dot(candidate.direction());
            if difference < best_difference {
                best_difference = difference;
                best = candidate;
            }
        }
        best
    }

    pub fn sword_position(&self) -> Vec2 {
        let bounds = self.entity.visual_bounds();
        match self.facing {
            Facing::West => bounds.top_left(),
            Facing::North | Facing::East => bounds.maxs,
            Facing::South => bounds.mins,
        }
    }

    pub fn sword_rotation_degrees(&self) -> f32 {
        match self.facing {
            Facing::West => 270.0,
            Facing::North | Facing::East => 0.0,
            Facing::South => 180.0,
        }
    }

    pub fn is_attacking(&self, now: f64) -> bool {
        self.last_attack_at
            .is_some_and(|at| at > now - SWORD_STUN_DURATION_SECONDS)
    }

    pub fn can_move(&self, now: f64) -> bool {
        !self.is_attacking(now)
    }

    pub fn stamp_attack(&mut self, now: f64) {
        self.last_attack_at = Some(now);
    }

    pub fn stamp_hurt(&mut self, now: f64) {
        self.last_hurt_at = Some(now);
    }

    /// Client-side: sync the visual with replicated state, pick the sprite
    /// for the current facing and apply the hurt flash.
    pub fn apply_client_update(&mut self, now: f64) {
        self.entity.apply_client_update();
        let tint = self.hurt_flash_tint(now);
        if let Some(visual) = self.entity.visual.as_mut() {
            visual.pose = Pose::Standing(self.facing);
            visual.tint = tint;
        }
    }

    /// Base color, or its inverse on the negative half of the flash wave
    /// while inside the post-hit window.
    pub fn hurt_flash_tint(&self, now: f64) -> Rgba {
        let flashing = self
            .last_hurt_at
            .is_some_and(|at| at > now - HURT_FLASH_DURATION_SECONDS);
        if flashing && (now * HURT_FLASH_SPEED).sin() < 0.0 {
            self.color.inverse()
        } else {
            self.color
        }
    }
}

/// Bounds of a sword swing placed at `position`.
pub fn sword_bounds(position: Vec2) -> Aabb2 {
    Aabb2::from_center(Vec2::ZERO, SWORD_HALF_EXTENTS).translated(position)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{AxisState, InputAxes};
    use proptest::prelude::*;

    fn player() -> PlayerActor {
        PlayerActor::new(0, Rgba::from_components(200, 40, 40, 255))
    }

    fn axes(right: f32, up: f32) -> InputAxes {
        let split = |v: f32| AxisState::new(v.max(0.0), (-v).max(0.0));
        InputAxes::new(split(right), split(up))
    }

    #[test]
    fn test_new_player_defaults() {
        let p = player();
        assert_eq!(p.entity.health, 10.0);
        assert_eq!(p.entity.max_health, 10.0);
        assert_eq!(p.entity.collision_radius, 0.3);
        assert_eq!(p.facing, Facing::South);
        assert!(!p.entity.dead);
        assert_eq!(p.entity.visual.as_ref().unwrap().tint, p.color);
    }

    #[test]
    fn test_facing_from_input_cardinals() {
        let p = player();
        assert_eq!(p.facing_from_input(Vec2::X), Facing::East);
        assert_eq!(p.facing_from_input(Vec2::NEG_X), Facing::West);
        assert_eq!(p.facing_from_input(Vec2::Y), Facing::North);
        assert_eq!(p.facing_from_input(Vec2::NEG_Y), Facing::South);
    }

    #[test]
    fn test_facing_from_input_ties_keep_earlier_candidate() {
        let p = player();
        // Exact diagonal ties: SOUTH beats EAST/WEST, NORTH beats EAST/WEST
        assert_eq!(p.facing_from_input(Vec2::new(1.0, -1.0)), Facing::South);
        assert_eq!(p.facing_from_input(Vec2::new(-1.0, -1.0)), Facing::South);
        assert_eq!(p.facing_from_input(Vec2::new(1.0, 1.0)), Facing::North);
        assert_eq!(p.facing_from_input(Vec2::new(-1.0, 1.0)), Facing::North);
    }

    #[test]
    fn test_facing_deadzone_keeps_previous() {
        let mut p = player();
        p.facing = Facing::West;
        assert_eq!(p.facing_from_input(Vec2::ZERO), Facing::West);
        assert_eq!(p.facing_from_input(Vec2::new(0.005, 0.005)), Facing::West);
    }

    #[test]
    fn test_sword_transform_by_facing() {
        let mut p = player();
        p.entity.position = Vec2::new(1.0, 1.0);
        p.entity.apply_client_update();

        p.facing = Facing::West;
        assert_eq!(p.sword_position(), Vec2::new(0.5, 1.5));
        assert_eq!(p.sword_rotation_degrees(), 270.0);

        p.facing = Facing::North;
        assert_eq!(p.sword_position(), Vec2::new(1.5, 1.5));
        assert_eq!(p.sword_rotation_degrees(), 0.0);

        p.facing = Facing::East;
        assert_eq!(p.sword_position(), Vec2::new(1.5, 1.5));
        assert_eq!(p.sword_rotation_degrees(), 0.0);

        p.facing = Facing::South;
        assert_eq!(p.sword_position(), Vec2::new(0.5, 0.5));
        assert_eq!(p.sword_rotation_degrees(), 180.0);
    }

    #[test]
    fn test_update_moves_and_faces() {
        let mut p = player();
        let mut inputs = InputAxisTable::new();
        inputs.set(0, axes(1.0, 0.0));
        let level = LevelGeometry::empty();
        let ctx = StepContext {
            inputs: &inputs,
            level: &level,
            now: 0.0,
        };

        p.update(1.0 / 60.0, &ctx);

        assert!((p.entity.position.x - 1.0 / SPEED_DIVISOR).abs() < 1e-6);
        assert_eq!(p.entity.position.y, 0.0);
        assert_eq!(p.facing, Facing::East);
        assert_eq!(p.entity.visual.as_ref().unwrap().position, p.entity.position);
    }

    #[test]
    fn test_attack_lock_blocks_movement_but_not_facing() {
        let mut p = player();
        p.stamp_attack(1.0);
        let mut inputs = InputAxisTable::new();
        inputs.set(0, axes(0.0, 1.0));
        let level = LevelGeometry::empty();

        let ctx = StepContext {
            inputs: &inputs,
            level: &level,
            now: 1.1,
        };
        p.update(0.1, &ctx);
        assert_eq!(p.entity.position, Vec2::ZERO);
        assert_eq!(p.facing, Facing::North);
        assert!(p.is_attacking(1.1));

        let ctx = StepContext { now: 1.3, ..ctx };
        p.update(0.1, &ctx);
        assert!(p.entity.position.y > 0.0);
        assert!(!p.is_attacking(1.3));
    }

    #[test]
    fn test_attempt_move_slides_along_wall() {
        // Wall to the east; moving diagonally into it keeps the y component
        let level = LevelGeometry::new(vec![Aabb2::new(
            Vec2::new(1.0, -10.0),
            Vec2::new(2.0, 10.0),
        )]);
        let mut p = player();
        p.entity.position = Vec2::new(0.6, 0.0);

        p.attempt_move(Vec2::new(0.8, 0.2), &level);

        assert!((p.entity.position.x - 0.7).abs() < 1e-5);
        assert!((p.entity.position.y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_attempt_move_ejects_from_inside_obstacle() {
        let level = LevelGeometry::new(vec![Aabb2::new(
            Vec2::new(-1.0, -5.0),
            Vec2::new(1.0, 5.0),
        )]);
        let mut p = player();
        p.attempt_move(Vec2::new(0.5, 0.0), &level);
        // Cheapest exit is through the east face, inflated by the radius
        assert!((p.entity.position.x - 1.3).abs() < 1e-5);
        assert_eq!(p.entity.position.y, 0.0);
    }

    #[test]
    fn test_hurt_flash_tint() {
        let mut p = player();
        assert_eq!(p.hurt_flash_tint(10.0), p.color);

        p.stamp_hurt(10.0);
        // sin(10.06 * 60) < 0 at some point inside the window; sample the window
        let mut saw_inverse = false;
        let mut saw_base = false;
        for step in 0..50 {
            let now = 10.0 + f64::from(step) * 0.009;
            let tint = p.hurt_flash_tint(now);
            if tint == p.color.inverse() {
                saw_inverse = true;
            } else if tint == p.color {
                saw_base = true;
            }
        }
        assert!(saw_inverse && saw_base);

        // Past the window the base color is restored
        assert_eq!(p.hurt_flash_tint(10.0 + HURT_FLASH_DURATION_SECONDS + 0.01), p.color);
    }

    #[test]
    fn test_apply_client_update_sets_pose() {
        let mut p = player();
        p.entity.position = Vec2::new(3.0, -2.0);
        p.facing = Facing::East;
        p.apply_client_update(0.0);
        let v = p.entity.visual.as_ref().unwrap();
        assert_eq!(v.position, Vec2::new(3.0, -2.0));
        assert_eq!(v.pose, Pose::Standing(Facing::East));
        assert_eq!(v.pose.sprite_name(), "pRight");
        assert_eq!(v.tint, p.color);
    }

    #[test]
    fn test_facing_wire_values() {
        for facing in Facing::ALL {
            assert_eq!(Facing::from_i32(facing.as_i32()), Some(facing));
        }
        assert_eq!(Facing::from_i32(4), None);
        assert_eq!(Facing::from_i32(-1), None);
    }

    proptest! {
        #[test]
        fn prop_facing_from_input_idempotent(x in -5.0f32..5.0, y in -5.0f32..5.0) {
            prop_assume!(Vec2::new(x, y).length() >= FACING_DEADZONE);
            let mut p = player();
            let first = p.facing_from_input(Vec2::new(x, y));
            p.facing = first;
            prop_assert_eq!(p.facing_from_input(Vec2::new(x, y)), first);
            // Result does not depend on the prior facing
            p.facing = Facing::West;
            prop_assert_eq!(p.facing_from_input(Vec2::new(x, y)), first);
        }

        #[test]
        fn prop_facing_unchanged_inside_deadzone(
            x in -0.007f32..0.007, y in -0.007f32..0.007, prior in 0i32..4,
        ) {
            let mut p = player();
            p.facing = Facing::from_i32(prior).unwrap();
            prop_assert_eq!(p.facing_from_input(Vec2::new(x, y)), p.facing);
        }
    }
}

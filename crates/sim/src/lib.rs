//! Swordplay Actor Model
//!
//! Shared by the host and client simulations: the entity record, player and
//! pickup actors, 2D collision primitives, fixed per-connection slot tables,
//! movement input axes and the static level geometry.
//!
//! # Constraints
//!
//! This crate does no I/O, reads no wall clock and draws no randomness.
//! Time enters only as explicit `dt` and `now` arguments supplied by the
//! owning simulation.

#![deny(unsafe_code)]

pub mod actor;
pub mod color;
pub mod entity;
pub mod geometry;
pub mod input;
pub mod level;
pub mod player;
pub mod slots;

// ============================================================================
// Type Aliases
// ============================================================================

/// Small stable integer naming one participant, assigned by the session
/// layer. Always in `[0, MAX_PLAYERS)`.
pub type ConnectionIndex = u8;

/// Number of connection slots on every role's tables.
pub const MAX_PLAYERS: usize = 8;

pub use actor::{Actor, Pickup, PickupKind};
pub use color::Rgba;
pub use entity::{Entity, NetworkId, Pose, Visual};
pub use geometry::Aabb2;
pub use input::{AxisState, InputAxes, InputAxisTable};
pub use level::LevelGeometry;
pub use player::{Facing, PlayerActor, StepContext, sword_bounds};
pub use slots::SlotTable;

//! Side effects the client asks the presentation layer to play.
//!
//! Particles, sounds and screen overlays live outside this workspace; the
//! client only queues what happened and where.

use glam::Vec2;
use swordplay_sim::{ConnectionIndex, Rgba};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresentationEvent {
    Spawned {
        slot: ConnectionIndex,
        color: Rgba,
    },
    /// Death burst and blood pool at the player's last known position.
    Died {
        slot: ConnectionIndex,
        position: Vec2,
        color: Rgba,
    },
    SwordSwing {
        slot: ConnectionIndex,
        position: Vec2,
        rotation_degrees: f32,
        color: Rgba,
    },
    Hurt {
        slot: ConnectionIndex,
    },
    BowFired {
        slot: ConnectionIndex,
    },
    /// Show the full-screen death overlay.
    LocalDeath,
    /// Remove the death overlay.
    LocalRespawn,
}

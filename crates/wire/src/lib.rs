//! Swordplay Wire Protocol
//!
//! Protobuf payloads exchanged between the host and every client, the
//! message kind and reliability table, the framing codec and the transport
//! contract the session layer implements.
//!
//! # Message Table
//!
//! | Kind | Id | Reliability |
//! |---|---|---|
//! | client update | 0 | unreliable |
//! | host snapshot | 1 | unreliable |
//! | player create | 2 | reliable ordered |
//! | player destroy | 3 | reliable ordered |
//! | player attack | 4 | reliable |
//! | player fire bow | 5 | reliable |
//! | player damaged | 6 | reliable |
//!
//! A frame is one kind byte followed by the protobuf body.

#![deny(unsafe_code)]

use prost::Message;

pub mod codec;
pub mod transport;

pub use codec::{GameMessage, MessageKind, Reliability, SnapshotEntry, WireError};
pub use transport::{Envelope, MemoryTransport, Transport, broadcast};

// ============================================================================
// Realtime Messages (unreliable)
// ============================================================================

/// Client's current movement axes, sent every net tick.
///
/// The sender's connection index is bound by the session layer, not carried.
#[derive(Clone, PartialEq, Message)]
pub struct ClientUpdateProto {
    #[prost(float, tag = "1")]
    pub right_positive: f32,

    #[prost(float, tag = "2")]
    pub right_negative: f32,

    #[prost(float, tag = "3")]
    pub up_positive: f32,

    #[prost(float, tag = "4")]
    pub up_negative: f32,
}

/// Per-player state, tagged with the slot it describes.
#[derive(Clone, PartialEq, Message)]
pub struct SnapshotEntryProto {
    #[prost(uint32, tag = "1")]
    pub slot: u32,

    #[prost(float, tag = "2")]
    pub x: f32,

    #[prost(float, tag = "3")]
    pub y: f32,

    /// WEST = 0, NORTH = 1, EAST = 2, SOUTH = 3.
    #[prost(int32, tag = "4")]
    pub facing: i32,

    /// Absent on the position-only update sent after a sword hit.
    #[prost(float, optional, tag = "5")]
    pub health: Option<f32>,
}

/// Host state broadcast, entries in ascending slot order.
#[derive(Clone, PartialEq, Message)]
pub struct HostSnapshotProto {
    #[prost(message, repeated, tag = "1")]
    pub entries: Vec<SnapshotEntryProto>,
}

// ============================================================================
// Lifecycle and Event Messages (reliable)
// ============================================================================

#[derive(Clone, PartialEq, Message)]
pub struct PlayerCreateProto {
    /// Client asking to (re)spawn, as opposed to the host announcing a spawn.
    #[prost(bool, tag = "1")]
    pub is_request: bool,

    #[prost(uint32, tag = "2")]
    pub slot: u32,

    /// 0xRRGGBBAA.
    #[prost(fixed32, tag = "3")]
    pub color: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct PlayerDestroyProto {
    #[prost(uint32, tag = "1")]
    pub slot: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct PlayerAttackProto {
    #[prost(bool, tag = "1")]
    pub is_request: bool,

    #[prost(uint32, tag = "2")]
    pub slot: u32,

    #[prost(float, tag = "3")]
    pub sword_x: f32,

    #[prost(float, tag = "4")]
    pub sword_y: f32,

    #[prost(float, tag = "5")]
    pub sword_rotation_degrees: f32,
}

#[derive(Clone, PartialEq, Message)]
pub struct PlayerFireBowProto {
    #[prost(bool, tag = "1")]
    pub is_request: bool,

    #[prost(uint32, tag = "2")]
    pub slot: u32,
}

#[derive(Clone, PartialEq, Message)]
pub struct PlayerDamagedProto {
    #[prost(uint32, tag = "1")]
    pub slot: u32,
}

// ============================================================================
// Tests
// ============================================================================

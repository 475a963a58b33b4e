//! Framing and typed messages.
//!
//! Handlers work with [`GameMessage`]; the protobuf structs only exist at the
//! byte boundary.

use glam::Vec2;
use prost::Message;
use swordplay_sim::{AxisState, ConnectionIndex, Facing, InputAxes, Rgba};
use thiserror::Error;

use crate::{
    ClientUpdateProto, HostSnapshotProto, PlayerAttackProto, PlayerCreateProto,
    PlayerDamagedProto, PlayerDestroyProto, PlayerFireBowProto, SnapshotEntryProto,
};

// ============================================================================
// Kinds and Reliability
// ============================================================================

/// Delivery guarantee the session layer must give a message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reliability {
    Unreliable,
    ReliableUnordered,
    ReliableOrdered,
}

impl Reliability {
    pub fn is_reliable(self) -> bool {
        !matches!(self, Self::Unreliable)
    }
}

/// Registered message ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    ClientUpdate = 0,
    HostSnapshot = 1,
    PlayerCreate = 2,
    PlayerDestroy = 3,
    PlayerAttack = 4,
    PlayerFireBow = 5,
    PlayerDamaged = 6,
}

impl MessageKind {
    pub const ALL: [Self; 7] = [
        Self::ClientUpdate,
        Self::HostSnapshot,
        Self::PlayerCreate,
        Self::PlayerDestroy,
        Self::PlayerAttack,
        Self::PlayerFireBow,
        Self::PlayerDamaged,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn reliability(self) -> Reliability {
        match self {
            Self::ClientUpdate | Self::HostSnapshot => Reliability::Unreliable,
            Self::PlayerCreate | Self::PlayerDestroy => Reliability::ReliableOrdered,
            Self::PlayerAttack | Self::PlayerFireBow | Self::PlayerDamaged => {
                Reliability::ReliableUnordered
            }
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("empty frame")]
    Empty,

    #[error("unknown message kind {0}")]
    UnknownKind(u8),

    #[error("failed to decode {kind:?} body: {source}")]
    Decode {
        kind: MessageKind,
        #[source]
        source: prost::DecodeError,
    },

    #[error("invalid facing value {0}")]
    InvalidFacing(i32),
}

// ============================================================================
// Typed Messages
// ============================================================================

/// One player's replicated state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotEntry {
    pub slot: ConnectionIndex,
    pub position: Vec2,
    pub facing: Facing,
    pub health: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameMessage {
    ClientUpdate(InputAxes),
    HostSnapshot(Vec<SnapshotEntry>),
    PlayerCreate {
        is_request: bool,
        slot: ConnectionIndex,
        color: Rgba,
    },
    PlayerDestroy {
        slot: ConnectionIndex,
    },
    PlayerAttack {
        is_request: bool,
        slot: ConnectionIndex,
        sword_position: Vec2,
        sword_rotation_degrees: f32,
    },
    PlayerFireBow {
        is_request: bool,
        slot: ConnectionIndex,
    },
    PlayerDamaged {
        slot: ConnectionIndex,
    },
}

impl GameMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::ClientUpdate(_) => MessageKind::ClientUpdate,
            Self::HostSnapshot(_) => MessageKind::HostSnapshot,
            Self::PlayerCreate { .. } => MessageKind::PlayerCreate,
            Self::PlayerDestroy { .. } => MessageKind::PlayerDestroy,
            Self::PlayerAttack { .. } => MessageKind::PlayerAttack,
            Self::PlayerFireBow { .. } => MessageKind::PlayerFireBow,
            Self::PlayerDamaged { .. } => MessageKind::PlayerDamaged,
        }
    }

    pub fn reliability(&self) -> Reliability {
        self.kind().reliability()
    }

    /// Kind byte followed by the protobuf body.
    pub fn encode(&self) -> Vec<u8> {
        let mut frame = vec![self.kind().id()];
        match self {
            Self::ClientUpdate(axes) => ClientUpdateProto {
                right_positive: axes.right.positive,
                right_negative: axes.right.negative,
                up_positive: axes.up.positive,
                up_negative: axes.up.negative,
            }
            .encode_raw(&mut frame),
            Self::HostSnapshot(entries) => HostSnapshotProto {
                entries: entries.iter().map(SnapshotEntryProto::from).collect(),
            }
            .encode_raw(&mut frame),
            Self::PlayerCreate {
                is_request,
                slot,
                color,
            } => PlayerCreateProto {
                is_request: *is_request,
                slot: u32::from(*slot),
                color: color.to_u32(),
            }
            .encode_raw(&mut frame),
            Self::PlayerDestroy { slot } => PlayerDestroyProto {
                slot: u32::from(*slot),
            }
            .encode_raw(&mut frame),
            Self::PlayerAttack {
                is_request,
                slot,
                sword_position,
                sword_rotation_degrees,
            } => PlayerAttackProto {
                is_request: *is_request,
                slot: u32::from(*slot),
                sword_x: sword_position.x,
                sword_y: sword_position.y,
                sword_rotation_degrees: *sword_rotation_degrees,
            }
            .encode_raw(&mut frame),
            Self::PlayerFireBow { is_request, slot } => PlayerFireBowProto {
                is_request: *is_request,
                slot: u32::from(*slot),
            }
            .encode_raw(&mut frame),
            Self::PlayerDamaged { slot } => PlayerDamagedProto {
                slot: u32::from(*slot),
            }
            .encode_raw(&mut frame),
        }
        frame
    }

    pub fn decode(frame: &[u8]) -> Result<Self, WireError> {
        let (&id, body) = frame.split_first().ok_or(WireError::Empty)?;
        let kind = MessageKind::from_id(id).ok_or(WireError::UnknownKind(id))?;
        let err = |source| WireError::Decode { kind, source };

        let message = match kind {
            MessageKind::ClientUpdate => {
                let p = ClientUpdateProto::decode(body).map_err(err)?;
                Self::ClientUpdate(InputAxes::new(
                    AxisState::new(p.right_positive, p.right_negative),
                    AxisState::new(p.up_positive, p.up_negative),
                ))
            }
            MessageKind::HostSnapshot => {
                let p = HostSnapshotProto::decode(body).map_err(err)?;
                let entries = p
                    .entries
                    .into_iter()
                    .map(SnapshotEntry::try_from)
                    .collect::<Result<_, _>>()?;
                Self::HostSnapshot(entries)
            }
            MessageKind::PlayerCreate => {
                let p = PlayerCreateProto::decode(body).map_err(err)?;
                Self::PlayerCreate {
                    is_request: p.is_request,
                    slot: slot_from_wire(p.slot),
                    color: Rgba(p.color),
                }
            }
            MessageKind::PlayerDestroy => {
                let p = PlayerDestroyProto::decode(body).map_err(err)?;
                Self::PlayerDestroy {
                    slot: slot_from_wire(p.slot),
                }
            }
            MessageKind::PlayerAttack => {
                let p = PlayerAttackProto::decode(body).map_err(err)?;
                Self::PlayerAttack {
                    is_request: p.is_request,
                    slot: slot_from_wire(p.slot),
                    sword_position: Vec2::new(p.sword_x, p.sword_y),
                    sword_rotation_degrees: p.sword_rotation_degrees,
                }
            }
            MessageKind::PlayerFireBow => {
                let p = PlayerFireBowProto::decode(body).map_err(err)?;
                Self::PlayerFireBow {
                    is_request: p.is_request,
                    slot: slot_from_wire(p.slot),
                }
            }
            MessageKind::PlayerDamaged => {
                let p = PlayerDamagedProto::decode(body).map_err(err)?;
                Self::PlayerDamaged {
                    slot: slot_from_wire(p.slot),
                }
            }
        };
        Ok(message)
    }
}

/// Narrow a wire slot. Values that do not fit stay out of range so the slot
/// tables reject them.
fn slot_from_wire(raw: u32) -> ConnectionIndex {
    ConnectionIndex::try_from(raw).unwrap_or(ConnectionIndex::MAX)
}

impl From<&SnapshotEntry> for SnapshotEntryProto {
    fn from(e: &SnapshotEntry) -> Self {
        Self {
            slot: u32::from(e.slot),
            x: e.position.x,
            y: e.position.y,
            facing: e.facing.as_i32(),
            health: e.health,
        }
    }
}

impl TryFrom<SnapshotEntryProto> for SnapshotEntry {
    type Error = WireError;

    fn try_from(p: SnapshotEntryProto) -> Result<Self, Self::Error> {
        Ok(Self {
            slot: slot_from_wire(p.slot),
            position: Vec2::new(p.x, p.y),
            facing: Facing::from_i32(p.facing).ok_or(WireError::InvalidFacing(p.facing))?,
            health: p.health,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

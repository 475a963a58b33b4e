//! Swordplay Participant
//!
//! Glue between the session layer and the two simulation roles. A
//! participant always runs a client mirror; the one that hosts also runs the
//! authoritative host simulation. Every registered message is decoded here
//! and handed to whichever roles handle it.

#![deny(unsafe_code)]

pub mod local;

use swordplay_client::{ClientConfig, ClientSimulation};
use swordplay_host::{HostConfig, HostSimulation};
use swordplay_sim::ConnectionIndex;
use swordplay_wire::{GameMessage, Transport};
use tracing::{info, trace, warn};

pub use local::LocalMatch;

pub struct Participant {
    host: Option<HostSimulation>,
    client: ClientSimulation,
}

impl Participant {
    /// A participant that runs the authoritative simulation.
    pub fn hosting(host: HostConfig, client: ClientConfig) -> Self {
        Self {
            host: Some(HostSimulation::new(host)),
            client: ClientSimulation::new(client),
        }
    }

    /// Host participant with an explicit host simulation, e.g. one built on
    /// a custom level.
    pub fn with_host(host: HostSimulation, client: ClientConfig) -> Self {
        Self {
            host: Some(host),
            client: ClientSimulation::new(client),
        }
    }

    pub fn joining(client: ClientConfig) -> Self {
        Self {
            host: None,
            client: ClientSimulation::new(client),
        }
    }

    pub fn is_host(&self) -> bool {
        self.host.is_some()
    }

    pub fn host(&self) -> Option<&HostSimulation> {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> Option<&mut HostSimulation> {
        self.host.as_mut()
    }

    pub fn client(&self) -> &ClientSimulation {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ClientSimulation {
        &mut self.client
    }

    /// Announce the host's own player, addressed to the host connection so
    /// both local roles pick it up on the next delivery.
    pub fn start_hosting(&mut self, transport: &mut dyn Transport) {
        let Some(host) = self.host.as_mut() else {
            warn!("start_hosting called on a joining participant");
            return;
        };
        let slot = transport.host_index();
        let color = host.random_color();
        info!(slot, "hosting started");
        transport.send(
            slot,
            &GameMessage::PlayerCreate {
                is_request: false,
                slot,
                color,
            },
        );
    }

    /// Advance both roles by one frame.
    pub fn update(&mut self, transport: &dyn Transport, dt: f32) {
        if let Some(host) = self.host.as_mut() {
            host.update(dt);
        }
        self.client.set_local_index(transport.local_index());
        self.client.update(dt);
    }

    /// Per-tick replication: the host broadcasts its snapshot, the client
    /// sends its axes.
    pub fn on_net_tick(&mut self, transport: &mut dyn Transport) {
        if let Some(host) = self.host.as_ref() {
            host.send_snapshots(transport);
        }
        if transport.local_index().is_some() {
            self.client.send_update(transport);
        }
    }

    pub fn on_connection_joined(&mut self, transport: &mut dyn Transport, index: ConnectionIndex) {
        if let Some(host) = self.host.as_mut() {
            host.on_connection_joined(transport, index);
        }
    }

    pub fn on_connection_left(&mut self, transport: &mut dyn Transport, index: ConnectionIndex) {
        if let Some(host) = self.host.as_mut() {
            host.on_connection_left(transport, index);
        }
    }

    /// Decode one frame and dispatch it. Malformed frames are logged and
    /// dropped.
    pub fn receive(&mut self, transport: &mut dyn Transport, from: ConnectionIndex, frame: &[u8]) {
        match GameMessage::decode(frame) {
            Ok(message) => self.dispatch(transport, from, message),
            Err(err) => warn!(from, %err, "dropping malformed frame"),
        }
    }

    pub fn dispatch(&mut self, transport: &mut dyn Transport, from: ConnectionIndex, message: GameMessage) {
        self.client.set_local_index(transport.local_index());
        trace!(from, kind = ?message.kind(), "dispatch");
        match message {
            GameMessage::ClientUpdate(axes) => {
                if let Some(host) = self.host.as_mut() {
                    host.on_client_update(from, axes);
                }
            }
            GameMessage::HostSnapshot(entries) => self.client.on_host_snapshot(&entries),
            GameMessage::PlayerCreate {
                is_request,
                slot,
                color,
            } => {
                if let Some(host) = self.host.as_mut() {
                    host.on_player_create(transport, from, is_request, slot, color);
                }
                self.client.on_player_create(is_request, slot, color);
            }
            GameMessage::PlayerDestroy { slot } => {
                if let Some(host) = self.host.as_mut() {
                    host.on_player_destroy(slot);
                }
                self.client.on_player_destroy(slot);
            }
            GameMessage::PlayerAttack {
                is_request,
                slot,
                sword_position,
                sword_rotation_degrees,
            } => {
                if let Some(host) = self.host.as_mut() {
                    host.on_player_attack(transport, from, is_request);
                }
                self.client
                    .on_player_attack(is_request, slot, sword_position, sword_rotation_degrees);
            }
            GameMessage::PlayerFireBow { is_request, slot } => {
                if let Some(host) = self.host.as_mut() {
                    host.on_player_fire_bow(transport, from, is_request);
                }
                self.client.on_player_fire_bow(is_request, slot);
            }
            GameMessage::PlayerDamaged { slot } => self.client.on_player_damaged(slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swordplay_sim::{LevelGeometry, Rgba};
    use swordplay_wire::{MemoryTransport, MessageKind};

    fn host_participant() -> Participant {
        let host = HostSimulation::with_level(HostConfig::default(), LevelGeometry::empty());
        Participant::with_host(host, ClientConfig::default())
    }

    #[test]
    fn test_start_hosting_addresses_host_connection() {
        let mut participant = host_participant();
        let mut transport = MemoryTransport::new(Some(0), 0);
        participant.start_hosting(&mut transport);

        let sent = transport.drain();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, 0);
        let GameMessage::PlayerCreate {
            is_request, slot, ..
        } = GameMessage::decode(&sent[0].frame).unwrap()
        else {
            panic!("expected a create");
        };
        assert!(!is_request);
        assert_eq!(slot, 0);
    }

    #[test]
    fn test_joining_participant_cannot_start_hosting() {
        let mut participant = Participant::joining(ClientConfig::default());
        let mut transport = MemoryTransport::new(Some(1), 0);
        participant.start_hosting(&mut transport);
        assert!(transport.pending().is_empty());
        assert!(!participant.is_host());
    }

    #[test]
    fn test_create_announcement_reaches_both_roles() {
        let mut participant = host_participant();
        let mut transport = MemoryTransport::new(Some(0), 0);
        let create = GameMessage::PlayerCreate {
            is_request: false,
            slot: 0,
            color: Rgba::WHITE,
        };
        participant.receive(&mut transport, 0, &create.encode());

        assert!(participant.host().unwrap().player(0).is_some());
        assert!(participant.client().player(0).is_some());
        assert_eq!(participant.client().local_player().unwrap().owner, 0);
    }

    #[test]
    fn test_client_update_ignored_without_host() {
        let mut participant = Participant::joining(ClientConfig::default());
        let mut transport = MemoryTransport::new(Some(1), 0);
        let update = GameMessage::ClientUpdate(Default::default());
        participant.receive(&mut transport, 2, &update.encode());
        assert!(transport.pending().is_empty());
    }

    #[test]
    fn test_malformed_frames_are_dropped() {
        let mut participant = host_participant();
        let mut transport = MemoryTransport::new(Some(0), 0);
        participant.receive(&mut transport, 0, &[]);
        participant.receive(&mut transport, 0, &[99, 1, 2]);
        participant.receive(&mut transport, 0, &[MessageKind::HostSnapshot.id(), 0x0a, 0xff]);
        assert!(transport.pending().is_empty());
        assert_eq!(participant.client().players().occupied_count(), 0);
    }

    #[test]
    fn test_net_tick_sends_snapshot_and_axes() {
        let mut participant = host_participant();
        let mut transport = MemoryTransport::new(Some(0), 0);
        transport.connect(1);

        participant.on_net_tick(&mut transport);

        let sent: Vec<_> = transport
            .drain()
            .iter()
            .map(|e| (e.to, GameMessage::decode(&e.frame).unwrap().kind()))
            .collect();
        assert_eq!(
            sent,
            vec![
                (0, MessageKind::HostSnapshot),
                (1, MessageKind::HostSnapshot),
                (0, MessageKind::ClientUpdate),
            ]
        );
    }
}

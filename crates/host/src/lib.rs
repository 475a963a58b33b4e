//! Swordplay Host Simulation
//!
//! The authoritative side of a match. It owns:
//! - The live actor table and its per-connection player index
//! - Stored movement axes for every connection
//! - Connection colors
//! - The tick pipeline (update and collide, promote pending, remove dead)
//! - Sword combat
//!
//! The host never reads the wall clock. Its clock advances only through
//! [`HostSimulation::update`], and every outbound message goes through a
//! [`Transport`], including the ones addressed to the host's own connection.

#![deny(unsafe_code)]

pub mod actor_table;
pub mod combat;
pub mod roster;

use glam::Vec2;
use swordplay_sim::{
    ConnectionIndex, InputAxes, InputAxisTable, LevelGeometry, Pickup, PickupKind, PlayerActor,
    Rgba, StepContext,
};
use swordplay_wire::{GameMessage, SnapshotEntry, Transport, broadcast};
use tracing::{debug, info, trace};

use actor_table::{ActorId, ActorTable};
use combat::resolve_sword_hit;
use roster::Roster;

// ============================================================================
// Configuration
// ============================================================================

/// Health removed by one sword hit.
pub const DEFAULT_ATTACK_DAMAGE: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Seed for connection color assignment.
    pub seed: u64,
    pub attack_damage: f32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            attack_damage: DEFAULT_ATTACK_DAMAGE,
        }
    }
}

// ============================================================================
// Host Simulation
// ============================================================================

pub struct HostSimulation {
    config: HostConfig,
    clock: f64,
    actors: ActorTable,
    inputs: InputAxisTable,
    roster: Roster,
    level: LevelGeometry,
}

impl HostSimulation {
    /// Host on the town map.
    pub fn new(config: HostConfig) -> Self {
        Self::with_level(config, LevelGeometry::town())
    }

    pub fn with_level(config: HostConfig, level: LevelGeometry) -> Self {
        info!(seed = config.seed, obstacles = level.len(), "host simulation created");
        Self {
            roster: Roster::new(config.seed),
            config,
            clock: 0.0,
            actors: ActorTable::new(),
            inputs: InputAxisTable::new(),
            level,
        }
    }

    pub fn now(&self) -> f64 {
        self.clock
    }

    pub fn actors(&self) -> &ActorTable {
        &self.actors
    }

    pub fn level(&self) -> &LevelGeometry {
        &self.level
    }

    pub fn player(&self, slot: ConnectionIndex) -> Option<&PlayerActor> {
        self.actors.player(slot)
    }

    pub fn inputs(&self) -> &InputAxisTable {
        &self.inputs
    }

    pub fn color_of(&self, index: ConnectionIndex) -> Option<Rgba> {
        self.roster.color(index)
    }

    /// Draw a color from the host's seeded generator without binding it to
    /// a connection.
    pub fn random_color(&mut self) -> Rgba {
        self.roster.random_color()
    }

    /// Advance one tick: update and collide, promote pending, remove dead.
    pub fn update(&mut self, dt: f32) {
        self.clock += f64::from(dt);
        let ctx = StepContext {
            inputs: &self.inputs,
            level: &self.level,
            now: self.clock,
        };
        self.actors.step(dt, &ctx);
        self.actors.flush_pending();
        let removed = self.actors.remove_dead();
        if removed > 0 {
            debug!(removed, live = self.actors.len(), "removed dead actors");
        }
    }

    /// Queue a pickup; it joins the live table at the next flush.
    pub fn spawn_pickup(&mut self, position: Vec2, kind: PickupKind) -> ActorId {
        debug!(?kind, x = position.x, y = position.y, "pickup queued");
        self.actors.queue(Pickup::new(kind, position, 0.0).into())
    }

    // ------------------------------------------------------------------------
    // Outbound replication
    // ------------------------------------------------------------------------

    /// One entry per occupied player slot, in slot order.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.actors
            .players()
            .map(|(slot, p)| SnapshotEntry {
                slot,
                position: p.entity.position,
                facing: p.facing,
                health: Some(p.entity.health),
            })
            .collect()
    }

    /// Send the snapshot to every live connection.
    pub fn send_snapshots(&self, transport: &mut dyn Transport) {
        let message = GameMessage::HostSnapshot(self.snapshot());
        trace!(players = self.actors.player_slots().len(), "sending host snapshot");
        broadcast(transport, &message);
    }

    // ------------------------------------------------------------------------
    // Inbound handlers
    // ------------------------------------------------------------------------

    pub fn on_client_update(&mut self, from: ConnectionIndex, axes: InputAxes) {
        self.inputs.set(from, axes);
    }

    pub fn on_player_create(
        &mut self,
        transport: &mut dyn Transport,
        from: ConnectionIndex,
        is_request: bool,
        slot: ConnectionIndex,
        color: Rgba,
    ) {
        if is_request {
            debug!(from, slot, "spawn requested");
            broadcast(
                transport,
                &GameMessage::PlayerCreate {
                    is_request: false,
                    slot: from,
                    color,
                },
            );
            return;
        }

        let mut player = PlayerActor::new(slot, color);
        player.set_color(color);
        if let Some(visual) = player.entity.visual.as_mut() {
            visual.visible = false;
        }
        let (id, overwritten) = self.actors.occupy_player(player);
        info!(slot, ?id, overwritten, "player spawned");
    }

    pub fn on_player_destroy(&mut self, slot: ConnectionIndex) {
        if let Some(id) = self.actors.vacate_player(slot) {
            info!(slot, ?id, "player destroyed");
        }
    }

    pub fn on_player_attack(
        &mut self,
        transport: &mut dyn Transport,
        from: ConnectionIndex,
        is_request: bool,
    ) {
        if !is_request {
            return;
        }
        let now = self.clock;
        let Some(attacker) = self.actors.player_mut(from) else {
            trace!(from, "attack from connection without a player");
            return;
        };
        let sword_position = attacker.sword_position();
        let sword_rotation_degrees = attacker.sword_rotation_degrees();
        attacker.stamp_attack(now);

        broadcast(
            transport,
            &GameMessage::PlayerAttack {
                is_request: false,
                slot: from,
                sword_position,
                sword_rotation_degrees,
            },
        );

        let hits = resolve_sword_hit(&mut self.actors, from, sword_position, self.config.attack_damage);
        for hit in hits {
            debug!(attacker = from, victim = hit.victim, health = hit.health, "sword hit");
            let damaged = GameMessage::PlayerDamaged { slot: hit.victim };
            let update = GameMessage::HostSnapshot(vec![SnapshotEntry {
                slot: hit.victim,
                position: hit.position,
                facing: hit.facing,
                health: None,
            }]);
            let destroy = GameMessage::PlayerDestroy { slot: hit.victim };
            for to in transport.connections() {
                transport.send(to, &damaged);
                transport.send(to, &update);
                if hit.is_lethal() {
                    transport.send(to, &destroy);
                }
            }
        }
    }

    pub fn on_player_fire_bow(
        &mut self,
        transport: &mut dyn Transport,
        from: ConnectionIndex,
        is_request: bool,
    ) {
        if !is_request || self.actors.player(from).is_none() {
            return;
        }
        broadcast(
            transport,
            &GameMessage::PlayerFireBow {
                is_request: false,
                slot: from,
            },
        );
    }

    /// Give the newcomer a color, announce it to everyone, then tell the
    /// newcomer about every player already present.
    pub fn on_connection_joined(&mut self, transport: &mut dyn Transport, index: ConnectionIndex) {
        let color = self.roster.assign_color(index);
        info!(index, ?color, "connection joined");
        broadcast(
            transport,
            &GameMessage::PlayerCreate {
                is_request: false,
                slot: index,
                color,
            },
        );
        for (slot, player) in self.actors.players() {
            transport.send(
                index,
                &GameMessage::PlayerCreate {
                    is_request: false,
                    slot,
                    color: player.color,
                },
            );
        }
    }

    pub fn on_connection_left(&mut self, transport: &mut dyn Transport, index: ConnectionIndex) {
        info!(index, "connection left");
        self.roster.release(index);
        self.inputs.clear(index);
        broadcast(transport, &GameMessage::PlayerDestroy { slot: index });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use swordplay_sim::{AxisState, Facing};
    use swordplay_wire::MemoryTransport;

    fn host() -> HostSimulation {
        HostSimulation::with_level(HostConfig::default(), LevelGeometry::empty())
    }

    fn transport_with(connections: &[ConnectionIndex]) -> MemoryTransport {
        let mut transport = MemoryTransport::new(Some(0), 0);
        for &c in connections {
            transport.connect(c);
        }
        transport
    }

    fn decoded(transport: &mut MemoryTransport) -> Vec<(ConnectionIndex, GameMessage)> {
        transport
            .drain()
            .into_iter()
            .map(|e| (e.to, GameMessage::decode(&e.frame).unwrap()))
            .collect()
    }

    fn spawn(host: &mut HostSimulation, slot: ConnectionIndex, position: Vec2) {
        let mut t = MemoryTransport::new(Some(0), 0);
        host.on_player_create(&mut t, 0, false, slot, Rgba::WHITE);
        let level = LevelGeometry::empty();
        host.actors
            .player_mut(slot)
            .unwrap()
            .attempt_move(position, &level);
    }

    #[test]
    fn test_create_request_broadcasts_and_never_occupies() {
        let mut host = host();
        let mut transport = transport_with(&[1, 2]);

        host.on_player_create(&mut transport, 2, true, 2, Rgba(0x11223344));

        assert!(host.player(2).is_none());
        assert!(host.actors().is_empty());
        let sent = decoded(&mut transport);
        assert_eq!(sent.len(), 3);
        for (_, msg) in sent {
            assert_eq!(
                msg,
                GameMessage::PlayerCreate {
                    is_request: false,
                    slot: 2,
                    color: Rgba(0x11223344),
                }
            );
        }
    }

    #[test]
    fn test_create_announcement_occupies_and_hides() {
        let mut host = host();
        let mut transport = transport_with(&[]);

        host.on_player_create(&mut transport, 0, false, 5, Rgba(0xff00ffff));

        let player = host.player(5).unwrap();
        assert_eq!(player.owner, 5);
        assert_eq!(player.color, Rgba(0xff00ffff));
        assert!(!player.entity.visual.as_ref().unwrap().visible);
        assert!(transport.pending().is_empty());

        // Overwrite replaces the occupant; the old one leaves at cleanup
        host.on_player_create(&mut transport, 0, false, 5, Rgba::WHITE);
        assert_eq!(host.actors().len(), 2);
        host.update(0.0);
        assert_eq!(host.actors().len(), 1);
        assert_eq!(host.player(5).unwrap().color, Rgba::WHITE);
    }

    #[test]
    fn test_destroy_vacates_then_cleanup_removes() {
        let mut host = host();
        spawn(&mut host, 3, Vec2::ZERO);

        host.on_player_destroy(3);
        assert!(host.player(3).is_none());
        host.on_player_destroy(3);

        host.update(1.0 / 60.0);
        assert!(host.actors().is_empty());
    }

    #[test]
    fn test_client_update_drives_owner_movement() {
        let mut host = host();
        spawn(&mut host, 1, Vec2::ZERO);

        host.on_client_update(
            1,
            InputAxes::new(AxisState::new(0.0, 1.0), AxisState::default()),
        );
        host.update(1.0 / 60.0);

        let player = host.player(1).unwrap();
        assert!(player.entity.position.x < 0.0);
        assert_eq!(player.facing, Facing::West);
    }

    #[test]
    fn test_snapshot_is_slot_ordered_and_tagged() {
        let mut host = host();
        spawn(&mut host, 2, Vec2::new(-3.0, 0.0));
        spawn(&mut host, 0, Vec2::new(1.0, 2.0));

        let snapshot = host.snapshot();
        let slots: Vec<_> = snapshot.iter().map(|e| e.slot).collect();
        assert_eq!(slots, vec![0, 2]);
        assert_eq!(snapshot[0].position, Vec2::new(1.0, 2.0));
        assert_eq!(snapshot[1].health, Some(10.0));

        let mut transport = transport_with(&[4]);
        host.send_snapshots(&mut transport);
        let sent = decoded(&mut transport);
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1], (4, GameMessage::HostSnapshot(snapshot)));
    }

    #[test]
    fn test_attack_without_player_is_ignored() {
        let mut host = host();
        let mut transport = transport_with(&[1]);
        host.on_player_attack(&mut transport, 1, true);
        assert!(transport.pending().is_empty());
    }

    #[test]
    fn test_attack_announcement_is_ignored_by_host() {
        let mut host = host();
        spawn(&mut host, 0, Vec2::ZERO);
        let mut transport = transport_with(&[]);
        host.on_player_attack(&mut transport, 0, false);
        assert!(transport.pending().is_empty());
        assert!(host.player(0).unwrap().last_attack_at.is_none());
    }

    #[test]
    fn test_attack_with_one_victim_message_order() {
        let mut host = host();
        spawn(&mut host, 0, Vec2::ZERO);
        spawn(&mut host, 1, Vec2::new(0.0, -0.6));
        host.actors.player_mut(1).unwrap().entity.health = 1.0;
        let mut transport = transport_with(&[1]);

        host.on_player_attack(&mut transport, 0, true);

        assert!(host.player(0).unwrap().is_attacking(host.now()));
        let sent = decoded(&mut transport);
        // attack broadcast to both, then per connection: damaged, update, destroy
        assert_eq!(sent.len(), 2 + 2 * 3);
        assert_eq!(
            sent[0].1,
            GameMessage::PlayerAttack {
                is_request: false,
                slot: 0,
                sword_position: Vec2::new(-0.5, -0.5),
                sword_rotation_degrees: 180.0,
            }
        );
        for to in [0, 1] {
            let mine: Vec<_> = sent[2..]
                .iter()
                .filter(|(t, _)| *t == to)
                .map(|(_, m)| m.kind())
                .collect();
            assert_eq!(
                mine,
                vec![
                    swordplay_wire::MessageKind::PlayerDamaged,
                    swordplay_wire::MessageKind::HostSnapshot,
                    swordplay_wire::MessageKind::PlayerDestroy,
                ]
            );
        }
        let GameMessage::HostSnapshot(entries) = &sent[3].1 else {
            panic!("expected position update, got {:?}", sent[3].1);
        };
        assert_eq!(entries[0].slot, 1);
        assert_eq!(entries[0].health, None);
    }

    #[test]
    fn test_non_lethal_hit_sends_no_destroy() {
        let mut host = host();
        spawn(&mut host, 0, Vec2::ZERO);
        spawn(&mut host, 1, Vec2::new(0.0, -0.6));
        let mut transport = transport_with(&[]);

        host.on_player_attack(&mut transport, 0, true);

        let kinds: Vec<_> = decoded(&mut transport).into_iter().map(|(_, m)| m.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                swordplay_wire::MessageKind::PlayerAttack,
                swordplay_wire::MessageKind::PlayerDamaged,
                swordplay_wire::MessageKind::HostSnapshot,
            ]
        );
        assert_eq!(host.player(1).unwrap().entity.health, 9.0);
    }

    #[test]
    fn test_fire_bow_rebroadcast_only_for_live_sender() {
        let mut host = host();
        let mut transport = transport_with(&[1]);
        host.on_player_fire_bow(&mut transport, 1, true);
        assert!(transport.pending().is_empty());

        spawn(&mut host, 1, Vec2::ZERO);
        host.on_player_fire_bow(&mut transport, 1, true);
        let sent = decoded(&mut transport);
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0].1,
            GameMessage::PlayerFireBow {
                is_request: false,
                slot: 1,
            }
        );
    }

    #[test]
    fn test_connection_joined_announces_and_catches_up() {
        let mut host = host();
        spawn(&mut host, 0, Vec2::ZERO);
        let mut transport = transport_with(&[3]);

        host.on_connection_joined(&mut transport, 3);

        let color = host.color_of(3).unwrap();
        let sent = decoded(&mut transport);
        assert_eq!(
            sent,
            vec![
                (0, GameMessage::PlayerCreate { is_request: false, slot: 3, color }),
                (3, GameMessage::PlayerCreate { is_request: false, slot: 3, color }),
                (3, GameMessage::PlayerCreate { is_request: false, slot: 0, color: Rgba::WHITE }),
            ]
        );
    }

    #[test]
    fn test_connection_left_broadcasts_destroy() {
        let mut host = host();
        let mut transport = transport_with(&[2]);
        host.on_connection_joined(&mut transport, 2);
        transport.drain();
        transport.disconnect(2);

        host.on_connection_left(&mut transport, 2);

        assert_eq!(host.color_of(2), None);
        assert_eq!(
            decoded(&mut transport),
            vec![(0, GameMessage::PlayerDestroy { slot: 2 })]
        );
    }

    #[test]
    fn test_pickup_joins_after_flush_and_survives() {
        let mut host = host();
        host.spawn_pickup(Vec2::new(2.0, 2.0), PickupKind::FireRate);
        assert!(host.actors().is_empty());
        host.update(1.0 / 60.0);
        assert_eq!(host.actors().len(), 1);
        host.update(1.0 / 60.0);
        assert_eq!(host.actors().len(), 1);
        assert!(host.snapshot().is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_slot_is_fatal() {
        let mut host = host();
        host.on_player_destroy(8);
    }
}

//! Swordplay Client Simulation
//!
//! Every participant, the host included, runs one of these. It mirrors the
//! players the host announces into a fixed slot table, applies replicated
//! state to them, keeps the local player's HUD current and forwards local
//! input to the host. Nothing here is authoritative.

#![deny(unsafe_code)]

pub mod events;
pub mod hud;

use std::collections::VecDeque;

use glam::Vec2;
use swordplay_sim::{ConnectionIndex, InputAxes, PlayerActor, Rgba, SlotTable};
use swordplay_wire::{GameMessage, SnapshotEntry, Transport};
use tracing::{debug, trace};

pub use events::PresentationEvent;
pub use hud::{Heart, HeartState};

// ============================================================================
// Configuration
// ============================================================================

pub const HEART_COUNT: usize = 5;
pub const HEALTH_PER_HEART: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub heart_count: usize,
    pub health_per_heart: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            heart_count: HEART_COUNT,
            health_per_heart: HEALTH_PER_HEART,
        }
    }
}

// ============================================================================
// Client Simulation
// ============================================================================

pub struct ClientSimulation {
    config: ClientConfig,
    clock: f64,
    local_index: Option<ConnectionIndex>,
    /// Slot of the local player once it exists in the mirror.
    local_slot: Option<ConnectionIndex>,
    local_color: Rgba,
    local_input: InputAxes,
    players: SlotTable<PlayerActor>,
    camera: Vec2,
    hearts: Vec<Heart>,
    events: VecDeque<PresentationEvent>,
}

impl ClientSimulation {
    pub fn new(config: ClientConfig) -> Self {
        let hearts = hud::layout_hearts(
            0.0,
            config.heart_count,
            config.health_per_heart,
            Vec2::ZERO,
            Rgba::WHITE,
        );
        Self {
            config,
            clock: 0.0,
            local_index: None,
            local_slot: None,
            local_color: Rgba::WHITE,
            local_input: InputAxes::default(),
            players: SlotTable::new(),
            camera: Vec2::ZERO,
            hearts,
            events: VecDeque::new(),
        }
    }

    pub fn now(&self) -> f64 {
        self.clock
    }

    /// Connection index the session assigned to this participant.
    pub fn set_local_index(&mut self, index: Option<ConnectionIndex>) {
        self.local_index = index;
    }

    pub fn local_index(&self) -> Option<ConnectionIndex> {
        self.local_index
    }

    pub fn local_player(&self) -> Option<&PlayerActor> {
        self.local_slot.and_then(|slot| self.players.get(slot))
    }

    pub fn local_color(&self) -> Rgba {
        self.local_color
    }

    pub fn player(&self, slot: ConnectionIndex) -> Option<&PlayerActor> {
        self.players.get(slot)
    }

    pub fn players(&self) -> &SlotTable<PlayerActor> {
        &self.players
    }

    pub fn camera_position(&self) -> Vec2 {
        self.camera
    }

    pub fn hearts(&self) -> &[Heart] {
        &self.hearts
    }

    /// Take every queued presentation event, oldest first.
    pub fn drain_events(&mut self) -> Vec<PresentationEvent> {
        self.events.drain(..).collect()
    }

    pub fn update(&mut self, dt: f32) {
        self.clock += f64::from(dt);
        match self.local_player().map(|p| p.entity.health) {
            Some(health) => {
                if let Some(position) = self.local_player().map(|p| p.entity.position) {
                    self.camera = position;
                }
                self.refresh_hearts(health);
            }
            None => self.adopt_local_player(),
        }
    }

    fn adopt_local_player(&mut self) {
        let Some(index) = self.local_index else {
            return;
        };
        if let Some(player) = self.players.get(index) {
            self.local_color = player.color;
            self.local_slot = Some(index);
            debug!(slot = index, "local player adopted");
        }
    }

    fn refresh_hearts(&mut self, health: f32) {
        self.hearts = hud::layout_hearts(
            health,
            self.config.heart_count,
            self.config.health_per_heart,
            self.camera,
            self.local_color,
        );
    }

    // ------------------------------------------------------------------------
    // Inbound handlers
    // ------------------------------------------------------------------------

    /// Apply each entry to the slot it names; empty slots are skipped.
    pub fn on_host_snapshot(&mut self, entries: &[SnapshotEntry]) {
        let now = self.clock;
        for entry in entries {
            let Some(player) = self.players.get_mut(entry.slot) else {
                trace!(slot = entry.slot, "snapshot entry for empty slot");
                continue;
            };
            player.entity.position = entry.position;
            player.facing = entry.facing;
            if let Some(health) = entry.health {
                player.entity.health = health;
            }
            player.apply_client_update(now);
        }
    }

    pub fn on_player_create(&mut self, is_request: bool, slot: ConnectionIndex, color: Rgba) {
        if is_request {
            return;
        }
        let mut player = PlayerActor::new(slot, color);
        player.apply_client_update(self.clock);
        self.players.occupy(slot, player);
        self.events.push_back(PresentationEvent::Spawned { slot, color });
        debug!(slot, "mirror created");

        if self.local_index == Some(slot) {
            self.local_slot = Some(slot);
            self.local_color = color;
            self.events.push_back(PresentationEvent::LocalRespawn);
        }
    }

    pub fn on_player_destroy(&mut self, slot: ConnectionIndex) {
        let Some(player) = self.players.vacate(slot) else {
            return;
        };
        self.events.push_back(PresentationEvent::Died {
            slot,
            position: player.entity.position,
            color: player.color,
        });
        debug!(slot, "mirror destroyed");

        if self.local_slot == Some(slot) {
            self.local_slot = None;
            self.refresh_hearts(0.0);
            self.events.push_back(PresentationEvent::LocalDeath);
        }
    }

    pub fn on_player_attack(
        &mut self,
        is_request: bool,
        slot: ConnectionIndex,
        sword_position: Vec2,
        sword_rotation_degrees: f32,
    ) {
        if is_request {
            return;
        }
        let now = self.clock;
        let Some(attacker) = self.players.get_mut(slot) else {
            return;
        };
        attacker.stamp_attack(now);
        self.events.push_back(PresentationEvent::SwordSwing {
            slot,
            position: sword_position,
            rotation_degrees: sword_rotation_degrees,
            color: attacker.color,
        });
    }

    pub fn on_player_damaged(&mut self, slot: ConnectionIndex) {
        let now = self.clock;
        if let Some(player) = self.players.get_mut(slot) {
            player.stamp_hurt(now);
            self.events.push_back(PresentationEvent::Hurt { slot });
        }
    }

    pub fn on_player_fire_bow(&mut self, is_request: bool, slot: ConnectionIndex) {
        if !is_request && self.players.is_occupied(slot) {
            self.events.push_back(PresentationEvent::BowFired { slot });
        }
    }

    // ------------------------------------------------------------------------
    // Local input
    // ------------------------------------------------------------------------

    /// Latest axes from the input layer.
    pub fn set_local_input(&mut self, axes: InputAxes) {
        self.local_input = axes;
    }

    /// Forward the current axes to the host. Called every net tick.
    pub fn send_update(&self, transport: &mut dyn Transport) {
        let host = transport.host_index();
        transport.send(host, &GameMessage::ClientUpdate(self.local_input));
    }

    /// Ask to swing, unless there is no local player or it is mid-swing.
    pub fn on_attack_pressed(&self, transport: &mut dyn Transport) -> bool {
        let Some(player) = self.local_player() else {
            return false;
        };
        if player.is_attacking(self.clock) {
            return false;
        }
        let host = transport.host_index();
        transport.send(
            host,
            &GameMessage::PlayerAttack {
                is_request: true,
                slot: player.owner,
                sword_position: Vec2::ZERO,
                sword_rotation_degrees: 0.0,
            },
        );
        true
    }

    pub fn on_fire_pressed(&self, transport: &mut dyn Transport) -> bool {
        let Some(player) = self.local_player() else {
            return false;
        };
        let host = transport.host_index();
        transport.send(
            host,
            &GameMessage::PlayerFireBow {
                is_request: true,
                slot: player.owner,
            },
        );
        true
    }

    /// Ask the host for a new player, reusing the last local color.
    pub fn on_respawn_pressed(&self, transport: &mut dyn Transport) -> bool {
        if self.local_slot.is_some() {
            return false;
        }
        let Some(index) = self.local_index else {
            return false;
        };
        let host = transport.host_index();
        transport.send(
            host,
            &GameMessage::PlayerCreate {
                is_request: true,
                slot: index,
                color: self.local_color,
            },
        );
        true
    }
}

// ============================================================================
// Tests
// ============================================================================

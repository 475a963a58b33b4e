//! Authoritative actor storage for the host.
//!
//! Live actors sit in a `Vec` keyed by stable [`ActorId`]s. Additions made
//! during a tick wait in a pending buffer until [`ActorTable::flush_pending`];
//! removal is tombstone-then-compact via the entity dead flag. Player actors
//! are additionally indexed by owning connection.

use swordplay_sim::{Actor, ConnectionIndex, PlayerActor, SlotTable, StepContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

#[derive(Debug, Default)]
pub struct ActorTable {
    next_id: u32,
    live: Vec<(ActorId, Actor)>,
    pending: Vec<(ActorId, Actor)>,
    players: SlotTable<ActorId>,
}

impl ActorTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Insert straight into the live table.
    pub fn insert(&mut self, actor: Actor) -> ActorId {
        let id = self.allocate_id();
        self.live.push((id, actor));
        id
    }

    /// Queue for the next pending flush.
    pub fn queue(&mut self, actor: Actor) -> ActorId {
        let id = self.allocate_id();
        self.pending.push((id, actor));
        id
    }

    /// Place `player` in its owner's slot and the live table.
    ///
    /// A previous occupant of the slot is marked dead and leaves at the next
    /// cleanup. Returns the new id and whether something was overwritten.
    pub fn occupy_player(&mut self, player: PlayerActor) -> (ActorId, bool) {
        let slot = player.owner;
        let id = self.insert(player.into());
        let overwritten = match self.players.occupy(slot, id) {
            Some(previous) => {
                self.mark_dead(previous);
                true
            }
            None => false,
        };
        (id, overwritten)
    }

    /// Mark the slot's player dead and empty the slot. No-op when empty.
    pub fn vacate_player(&mut self, slot: ConnectionIndex) -> Option<ActorId> {
        let id = self.players.vacate(slot)?;
        self.mark_dead(id);
        Some(id)
    }

    fn mark_dead(&mut self, id: ActorId) {
        if let Some(actor) = self.get_mut(id) {
            actor.entity_mut().dead = true;
        }
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.live.iter().find(|(i, _)| *i == id).map(|(_, a)| a)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.live.iter_mut().find(|(i, _)| *i == id).map(|(_, a)| a)
    }

    pub fn player(&self, slot: ConnectionIndex) -> Option<&PlayerActor> {
        let id = *self.players.get(slot)?;
        self.get(id).and_then(Actor::as_player)
    }

    pub fn player_mut(&mut self, slot: ConnectionIndex) -> Option<&mut PlayerActor> {
        let id = *self.players.get(slot)?;
        self.get_mut(id).and_then(Actor::as_player_mut)
    }

    /// Occupied player slots in ascending order.
    pub fn player_slots(&self) -> Vec<ConnectionIndex> {
        self.players.iter().map(|(slot, _)| slot).collect()
    }

    pub fn players(&self) -> impl Iterator<Item = (ConnectionIndex, &PlayerActor)> {
        self.players
            .iter()
            .filter_map(|(slot, &id)| self.get(id).and_then(Actor::as_player).map(|p| (slot, p)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.live.iter().map(|(id, a)| (*id, a))
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Update every live actor in insertion order; after each update the
    /// actor resolves collisions against every other live actor.
    pub fn step(&mut self, dt: f32, ctx: &StepContext<'_>) {
        for i in 0..self.live.len() {
            self.live[i].1.update(dt, ctx);
            for j in 0..self.live.len() {
                if i == j {
                    continue;
                }
                let (a, b) = pair_mut(&mut self.live, i, j);
                a.1.resolve_collision(&mut b.1);
            }
        }
    }

    pub fn flush_pending(&mut self) {
        self.live.append(&mut self.pending);
    }

    /// Drop dead actors, releasing any slot still pointing at one.
    pub fn remove_dead(&mut self) -> usize {
        let before = self.live.len();
        self.live.retain(|(_, a)| !a.is_dead());
        let stale: Vec<_> = self
            .players
            .iter()
            .filter(|(_, id)| !self.live.iter().any(|(live, _)| live == *id))
            .map(|(slot, _)| slot)
            .collect();
        for slot in stale {
            self.players.vacate(slot);
        }
        before - self.live.len()
    }
}

/// Two distinct mutable elements of one slice.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b, "pair_mut needs distinct indices");
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

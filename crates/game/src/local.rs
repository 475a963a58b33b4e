//! Same-process match: every participant gets a [`MemoryTransport`] and
//! frames are delivered by draining the outboxes.
//!
//! Delivery is lossless and in send order per sender, which satisfies every
//! reliability class.

use swordplay_sim::{ConnectionIndex, MAX_PLAYERS};
use swordplay_wire::{MemoryTransport, Transport};
use tracing::debug;

use crate::Participant;

/// Upper bound on delivery rounds in one [`LocalMatch::pump`]. Every handler
/// answers a bounded number of messages, so a healthy match settles in a few.
const MAX_PUMP_ROUNDS: usize = 32;

/// Connection index of the hosting participant.
pub const HOST_INDEX: ConnectionIndex = 0;

struct Seat {
    index: ConnectionIndex,
    participant: Participant,
    transport: MemoryTransport,
}

pub struct LocalMatch {
    seats: Vec<Seat>,
}

impl LocalMatch {
    /// Seat `host` at [`HOST_INDEX`] and announce its player.
    pub fn new(mut host: Participant) -> Self {
        assert!(host.is_host(), "first participant must be hosting");
        let mut transport = MemoryTransport::new(Some(HOST_INDEX), HOST_INDEX);
        host.start_hosting(&mut transport);
        Self {
            seats: vec![Seat {
                index: HOST_INDEX,
                participant: host,
                transport,
            }],
        }
    }

    /// Seat a joining participant at the lowest free index.
    ///
    /// # Panics
    /// If all connection slots are taken.
    pub fn join(&mut self, participant: Participant) -> ConnectionIndex {
        let index = (0..MAX_PLAYERS as ConnectionIndex)
            .find(|i| self.seat(*i).is_none())
            .unwrap_or_else(|| panic!("all {MAX_PLAYERS} connection slots are taken"));

        let mut transport = MemoryTransport::new(Some(index), HOST_INDEX);
        for seat in &mut self.seats {
            seat.transport.connect(index);
            transport.connect(seat.index);
        }
        self.seats.push(Seat {
            index,
            participant,
            transport,
        });
        self.seats.sort_by_key(|s| s.index);
        debug!(index, "participant joined local match");

        if let Some(host) = self.seat_mut(HOST_INDEX) {
            host.participant.on_connection_joined(&mut host.transport, index);
        }
        index
    }

    /// Remove a joined participant. The host cannot leave.
    pub fn leave(&mut self, index: ConnectionIndex) -> Option<Participant> {
        if index == HOST_INDEX {
            return None;
        }
        let position = self.seats.iter().position(|s| s.index == index)?;
        let seat = self.seats.remove(position);
        for other in &mut self.seats {
            other.transport.disconnect(index);
        }
        debug!(index, "participant left local match");
        if let Some(host) = self.seat_mut(HOST_INDEX) {
            host.participant.on_connection_left(&mut host.transport, index);
        }
        Some(seat.participant)
    }

    fn seat(&self, index: ConnectionIndex) -> Option<&Seat> {
        self.seats.iter().find(|s| s.index == index)
    }

    fn seat_mut(&mut self, index: ConnectionIndex) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.index == index)
    }

    pub fn participant(&self, index: ConnectionIndex) -> Option<&Participant> {
        self.seat(index).map(|s| &s.participant)
    }

    pub fn participant_mut(&mut self, index: ConnectionIndex) -> Option<&mut Participant> {
        self.seat_mut(index).map(|s| &mut s.participant)
    }

    /// Run `f` with a participant and its transport, e.g. to press a button.
    pub fn with_seat<R>(
        &mut self,
        index: ConnectionIndex,
        f: impl FnOnce(&mut Participant, &mut dyn Transport) -> R,
    ) -> Option<R> {
        let seat = self.seat_mut(index)?;
        Some(f(&mut seat.participant, &mut seat.transport))
    }

    pub fn indices(&self) -> Vec<ConnectionIndex> {
        self.seats.iter().map(|s| s.index).collect()
    }

    /// Deliver queued frames until every outbox is empty. Returns the number
    /// of frames delivered.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        for _ in 0..MAX_PUMP_ROUNDS {
            let mut in_flight = Vec::new();
            for seat in &mut self.seats {
                let from = seat.index;
                in_flight.extend(seat.transport.drain().into_iter().map(|e| (from, e)));
            }
            if in_flight.is_empty() {
                break;
            }
            for (from, envelope) in in_flight {
                // Frames for connections that already left are dropped
                if let Some(seat) = self.seat_mut(envelope.to) {
                    seat.participant
                        .receive(&mut seat.transport, from, &envelope.frame);
                    delivered += 1;
                }
            }
        }
        delivered
    }

    /// One frame for everyone: update, net tick, deliver.
    pub fn tick(&mut self, dt: f32) {
        for seat in &mut self.seats {
            seat.participant.update(&seat.transport, dt);
        }
        for seat in &mut self.seats {
            seat.participant.on_net_tick(&mut seat.transport);
        }
        self.pump();
    }
}

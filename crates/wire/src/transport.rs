//! The contract the session layer provides, plus an in-memory implementation
//! for tests and same-process loops.

use swordplay_sim::ConnectionIndex;

use crate::codec::{GameMessage, Reliability};

/// Outbound side of a session.
///
/// Implementations deliver each frame with the reliability its kind demands.
pub trait Transport {
    /// Index of this participant, once the session has assigned one.
    fn local_index(&self) -> Option<ConnectionIndex>;

    /// Index of the participant running the host simulation.
    fn host_index(&self) -> ConnectionIndex;

    /// Live connections in ascending index order, including the local one.
    fn connections(&self) -> Vec<ConnectionIndex>;

    fn send(&mut self, to: ConnectionIndex, message: &GameMessage);
}

/// Send `message` to every live connection.
pub fn broadcast<T: Transport + ?Sized>(transport: &mut T, message: &GameMessage) {
    for to in transport.connections() {
        transport.send(to, message);
    }
}

/// One encoded frame waiting in a [`MemoryTransport`] outbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub to: ConnectionIndex,
    pub reliability: Reliability,
    pub frame: Vec<u8>,
}

/// Queues encoded frames instead of putting them on a socket.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    local: Option<ConnectionIndex>,
    host: ConnectionIndex,
    connections: Vec<ConnectionIndex>,
    outbox: Vec<Envelope>,
}

impl MemoryTransport {
    pub fn new(local: Option<ConnectionIndex>, host: ConnectionIndex) -> Self {
        let mut transport = Self {
            local,
            host,
            ..Default::default()
        };
        if let Some(index) = local {
            transport.connect(index);
        }
        transport
    }

    pub fn set_local_index(&mut self, index: ConnectionIndex) {
        self.local = Some(index);
        self.connect(index);
    }

    /// Register a live connection. Idempotent.
    pub fn connect(&mut self, index: ConnectionIndex) {
        if let Err(pos) = self.connections.binary_search(&index) {
            self.connections.insert(pos, index);
        }
    }

    pub fn disconnect(&mut self, index: ConnectionIndex) {
        self.connections.retain(|&c| c != index);
    }

    /// Take every queued frame in send order.
    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending(&self) -> &[Envelope] {
        &self.outbox
    }
}

impl Transport for MemoryTransport {
    fn local_index(&self) -> Option<ConnectionIndex> {
        self.local
    }

    fn host_index(&self) -> ConnectionIndex {
        self.host
    }

    fn connections(&self) -> Vec<ConnectionIndex> {
        self.connections.clone()
    }

    fn send(&mut self, to: ConnectionIndex, message: &GameMessage) {
        self.outbox.push(Envelope {
            to,
            reliability: message.reliability(),
            frame: message.encode(),
        });
    }
}

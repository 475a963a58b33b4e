//! Fixed-capacity tables keyed by connection index.

use crate::{ConnectionIndex, MAX_PLAYERS};

/// Convert a connection index into an array slot.
///
/// # Panics
/// If `index >= MAX_PLAYERS`. A message naming such a slot is a contract
/// violation between peers, not a recoverable condition.
pub(crate) fn checked_slot(index: ConnectionIndex) -> usize {
    let slot = usize::from(index);
    assert!(
        slot < MAX_PLAYERS,
        "connection index {index} out of range (max {MAX_PLAYERS})"
    );
    slot
}

/// One nullable entry per connection slot. The table owns its values.
#[derive(Debug, Clone)]
pub struct SlotTable<T> {
    slots: [Option<T>; MAX_PLAYERS],
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<T> SlotTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` at `index`, returning whatever was there before.
    pub fn occupy(&mut self, index: ConnectionIndex, value: T) -> Option<T> {
        self.slots[checked_slot(index)].replace(value)
    }

    /// Empty the slot, handing back its previous value.
    pub fn vacate(&mut self, index: ConnectionIndex) -> Option<T> {
        self.slots[checked_slot(index)].take()
    }

    pub fn get(&self, index: ConnectionIndex) -> Option<&T> {
        self.slots[checked_slot(index)].as_ref()
    }

    pub fn get_mut(&mut self, index: ConnectionIndex) -> Option<&mut T> {
        self.slots[checked_slot(index)].as_mut()
    }

    pub fn is_occupied(&self, index: ConnectionIndex) -> bool {
        self.slots[checked_slot(index)].is_some()
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Occupied slots in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (ConnectionIndex, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i as ConnectionIndex, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ConnectionIndex, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|v| (i as ConnectionIndex, v)))
    }
}

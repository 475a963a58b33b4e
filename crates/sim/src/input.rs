//! Two-axis movement input, as captured on a client and stored per
//! connection on the host.

use glam::Vec2;

use crate::{ConnectionIndex, MAX_PLAYERS};

/// One input axis split into its positive and negative halves
/// (e.g. D and A for the right axis).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisState {
    pub positive: f32,
    pub negative: f32,
}

impl AxisState {
    pub const fn new(positive: f32, negative: f32) -> Self {
        Self { positive, negative }
    }

    pub fn value(&self) -> f32 {
        self.positive - self.negative
    }

    /// Replace NaN/Inf halves with zero.
    pub fn sanitized(self) -> Self {
        Self {
            positive: finite_or_zero(self.positive),
            negative: finite_or_zero(self.negative),
        }
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// Right and up axes for one participant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputAxes {
    pub right: AxisState,
    pub up: AxisState,
}

impl InputAxes {
    pub const fn new(right: AxisState, up: AxisState) -> Self {
        Self { right, up }
    }

    /// Movement direction; not normalized, so diagonals are longer than 1.
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.right.value(), self.up.value())
    }
}

/// Host-side input state, one entry per connection slot.
///
/// Written only by inbound client updates, read only by the owning player's
/// movement step.
#[derive(Debug, Clone, Default)]
pub struct InputAxisTable {
    axes: [InputAxes; MAX_PLAYERS],
}

impl InputAxisTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: ConnectionIndex) -> &InputAxes {
        &self.axes[crate::slots::checked_slot(index)]
    }

    /// Overwrite the stored axes for `index`.
    pub fn set(&mut self, index: ConnectionIndex, axes: InputAxes) {
        self.axes[crate::slots::checked_slot(index)] = InputAxes {
            right: axes.right.sanitized(),
            up: axes.up.sanitized(),
        };
    }

    /// Reset a slot to neutral, e.g. when its connection leaves.
    pub fn clear(&mut self, index: ConnectionIndex) {
        self.axes[crate::slots::checked_slot(index)] = InputAxes::default();
    }
}

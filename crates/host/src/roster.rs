//! Per-connection bookkeeping kept by the host.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swordplay_sim::{ConnectionIndex, Rgba, SlotTable};

/// Colors handed out to connections, drawn from a seeded generator so a
/// given seed and join order always produce the same palette.
#[derive(Debug, Clone)]
pub struct Roster {
    colors: SlotTable<Rgba>,
    rng: ChaCha8Rng,
}

impl Roster {
    pub fn new(seed: u64) -> Self {
        Self {
            colors: SlotTable::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw a fresh opaque color for `index`, replacing any earlier one.
    pub fn assign_color(&mut self, index: ConnectionIndex) -> Rgba {
        let color = self.random_color();
        self.colors.occupy(index, color);
        color
    }

    pub fn random_color(&mut self) -> Rgba {
        Rgba::opaque_from_bits(self.rng.next_u32())
    }

    pub fn color(&self, index: ConnectionIndex) -> Option<Rgba> {
        self.colors.get(index).copied()
    }

    pub fn release(&mut self, index: ConnectionIndex) {
        self.colors.vacate(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_are_seeded_and_opaque() {
        let mut a = Roster::new(7);
        let mut b = Roster::new(7);
        for index in 0..4 {
            let color = a.assign_color(index);
            assert_eq!(color, b.assign_color(index));
            assert_eq!(color.components()[3], 0xFF);
        }
        assert_ne!(Roster::new(8).assign_color(0), Roster::new(7).assign_color(0));
    }

    #[test]
    fn test_release_forgets_color() {
        let mut roster = Roster::new(0);
        let color = roster.assign_color(2);
        assert_eq!(roster.color(2), Some(color));
        roster.release(2);
        assert_eq!(roster.color(2), None);
    }
}

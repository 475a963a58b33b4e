//! Packed RGBA identity colors.

/// Color packed as `0xRRGGBBAA`, the layout carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub u32);

impl Rgba {
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    pub const fn from_components(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_be_bytes([r, g, b, a]))
    }

    /// Random bits with the alpha channel forced opaque.
    pub const fn opaque_from_bits(bits: u32) -> Self {
        Self(bits | 0xFF)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub const fn components(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// RGB inverted, alpha kept.
    pub const fn inverse(self) -> Self {
        let [r, g, b, a] = self.components();
        Self::from_components(255 - r, 255 - g, 255 - b, a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<u32> for Rgba {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_roundtrip_layout() {
        let c = Rgba::from_components(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_u32(), 0x1234_5678);
        assert_eq!(c.components(), [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_inverse_keeps_alpha() {
        let c = Rgba::from_components(10, 200, 0, 128);
        assert_eq!(c.inverse(), Rgba::from_components(245, 55, 255, 128));
        assert_eq!(c.inverse().inverse(), c);
    }

    #[test]
    fn test_opaque_from_bits() {
        assert_eq!(Rgba::opaque_from_bits(0xAABB_CC00).components()[3], 0xFF);
    }
}

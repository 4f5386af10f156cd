//! Plot palette.
//!
//! Colors are plain RGB triples so any rendering backend can consume them.

use std::fmt;

use serde::{Serialize, Serializer};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_u32(packed: u32) -> Self {
        Self([(packed >> 16) as u8, (packed >> 8) as u8, packed as u8])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Palette
// =============================================================================

pub const AXIS_WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
pub const TICK_GRAY: Rgb = Rgb::from_u32(0xBBBBBB);
pub const CAPTION_GRAY: Rgb = Rgb::from_u32(0xAAAAAA);
pub const LINE_PURPLE: Rgb = Rgb::from_u32(0xAA60FF);
pub const HIGHLIGHT_BLUE: Rgb = Rgb::from_u32(0x23B0FF);
pub const PEAK_PINK: Rgb = Rgb::from_u32(0xEE72F1);
pub const INVALID_ORANGE: Rgb = Rgb::from_u32(0xFFA86A);

/// Tick label colors, cycled in tick order.
pub const TICK_PALETTE: [Rgb; 7] = [
    Rgb::from_u32(0xEE72F1),
    Rgb::from_u32(0xAA60FF),
    Rgb::from_u32(0x23B0FF),
    Rgb::from_u32(0x78E2A0),
    Rgb::from_u32(0xDBD963),
    Rgb::from_u32(0xFFA86A),
    Rgb::from_u32(0xFF6266),
];

/// Color for the `n`th tick label (zero-based).
#[inline]
pub fn tick_color(n: usize) -> Rgb {
    TICK_PALETTE[n % TICK_PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_and_display() {
        assert_eq!(Rgb::from_u32(0x23B0FF), Rgb::new(0x23, 0xB0, 0xFF));
        assert_eq!(HIGHLIGHT_BLUE.to_string(), "#23B0FF");
    }

    #[test]
    fn test_tick_palette_cycles() {
        assert_eq!(tick_color(0), PEAK_PINK);
        assert_eq!(tick_color(7), tick_color(0));
        assert_eq!(tick_color(13), Rgb::from_u32(0xFF6266));
    }
}

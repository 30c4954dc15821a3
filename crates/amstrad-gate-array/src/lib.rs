//! Amstrad CPC Gate Array.
//!
//! The Gate Array turns bytes fetched from screen memory into pixels. How many
//! pixels a byte holds depends on the screen mode, and the bits of each pixel
//! are spread across the byte rather than stored contiguously:
//!
//! ```text
//!          bit7  bit6  bit5  bit4  bit3  bit2  bit1  bit0
//! Mode 2:   p0    p1    p2    p3    p4    p5    p6    p7
//! Mode 1:  p0.0  p1.0  p2.0  p3.0  p0.1  p1.1  p2.1  p3.1
//! Mode 0:  p0.0  p1.0  p0.2  p1.2  p0.1  p1.1  p0.3  p1.3
//! ```
//!
//! `pN.b` is bit `b` of the ink number of pixel `N` (pixel 0 is leftmost).
//!
//! # Standalone IC
//!
//! This crate has no dependencies. Everything here is pure bit arithmetic
//! plus the fixed 27-colour palette in [`palette`].

pub mod palette;

use std::fmt;

pub use palette::{COLOURS, COLOUR_COUNT, ColourNotFound, ColourEntry};

/// Gate Array screen mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// 160 pixels wide, 16 inks, 2 pixels per byte.
    Mode0,
    /// 320 pixels wide, 4 inks, 4 pixels per byte.
    #[default]
    Mode1,
    /// 640 pixels wide, 2 inks, 8 pixels per byte.
    Mode2,
}

impl Mode {
    /// Pixels per byte.
    #[must_use]
    pub const fn pixels_per_byte(self) -> u8 {
        match self {
            Self::Mode0 => 2,
            Self::Mode1 => 4,
            Self::Mode2 => 8,
        }
    }

    /// Number of inks a pixel can select.
    #[must_use]
    pub const fn colours(self) -> u8 {
        match self {
            Self::Mode0 => 16,
            Self::Mode1 => 4,
            Self::Mode2 => 2,
        }
    }

    /// Ink number with every bit set; packs to the full pixel mask.
    #[must_use]
    pub const fn mask_colour(self) -> u8 {
        self.colours() - 1
    }

    /// Numeric mode as used by the firmware `MODE` call.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Mode0 => 0,
            Self::Mode1 => 1,
            Self::Mode2 => 2,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mode {}", self.number())
    }
}

/// Screen mode number outside 0-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMode(pub u8);

impl fmt::Display for InvalidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid screen mode: {} (expected 0, 1 or 2)", self.0)
    }
}

impl std::error::Error for InvalidMode {}

impl TryFrom<u8> for Mode {
    type Error = InvalidMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Mode0),
            1 => Ok(Self::Mode1),
            2 => Ok(Self::Mode2),
            other => Err(InvalidMode(other)),
        }
    }
}

/// Mode 0 layout for a pixel at offset 0. Offset 1 is the same shifted right
/// by one bit.
const fn mode0_even(colour: u8) -> u8 {
    ((colour & 1) << 7)
        | (((colour >> 1) & 1) << 3)
        | (((colour >> 2) & 1) << 5)
        | (((colour >> 3) & 1) << 1)
}

/// Pack one pixel of ink `colour` at sub-byte `offset`.
///
/// Fragments for distinct offsets never share bits, so a full byte is the OR
/// of its pixels' fragments. `colour` must be below [`Mode::colours`] and
/// `offset` below [`Mode::pixels_per_byte`].
#[must_use]
pub const fn encode(mode: Mode, colour: u8, offset: u8) -> u8 {
    debug_assert!(colour < mode.colours());
    debug_assert!(offset < mode.pixels_per_byte());
    match mode {
        Mode::Mode2 => (colour & 1) << (7 - offset),
        Mode::Mode1 => ((colour & 1) << (7 - offset)) | (((colour >> 1) & 1) << (3 - offset)),
        Mode::Mode0 => mode0_even(colour) >> offset,
    }
}

/// Extract the ink number of the pixel at sub-byte `offset`.
#[must_use]
pub const fn decode(mode: Mode, byte: u8, offset: u8) -> u8 {
    debug_assert!(offset < mode.pixels_per_byte());
    match mode {
        Mode::Mode2 => (byte >> (7 - offset)) & 1,
        Mode::Mode1 => ((byte >> (7 - offset)) & 1) | (((byte >> (3 - offset)) & 1) << 1),
        Mode::Mode0 => {
            // Bring the pixel into the offset-0 positions first.
            let b = byte << offset;
            ((b >> 7) & 1) | (((b >> 3) & 1) << 1) | (((b >> 5) & 1) << 2) | (((b >> 1) & 1) << 3)
        }
    }
}

/// Bits occupied by the pixel at sub-byte `offset`.
#[must_use]
pub const fn mask(mode: Mode, offset: u8) -> u8 {
    encode(mode, mode.mask_colour(), offset)
}

/// Decode every pixel of a packed byte, leftmost first.
pub fn unpack_byte(mode: Mode, byte: u8) -> impl Iterator<Item = u8> {
    (0..mode.pixels_per_byte()).map(move |offset| decode(mode, byte, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [Mode; 3] = [Mode::Mode0, Mode::Mode1, Mode::Mode2];

    #[test]
    fn pixels_per_byte_and_colours() {
        assert_eq!(Mode::Mode0.pixels_per_byte(), 2);
        assert_eq!(Mode::Mode1.pixels_per_byte(), 4);
        assert_eq!(Mode::Mode2.pixels_per_byte(), 8);
        for mode in MODES {
            // Every mode packs exactly 8 bits per byte.
            let bits = u32::from(mode.colours()).trailing_zeros();
            assert_eq!(bits * u32::from(mode.pixels_per_byte()), 8, "{mode}");
        }
        assert_eq!(Mode::Mode0.mask_colour(), 15);
        assert_eq!(Mode::Mode1.mask_colour(), 3);
        assert_eq!(Mode::Mode2.mask_colour(), 1);
    }

    #[test]
    fn mode_from_number() {
        assert_eq!(Mode::try_from(0), Ok(Mode::Mode0));
        assert_eq!(Mode::try_from(2), Ok(Mode::Mode2));
        assert_eq!(Mode::try_from(3), Err(InvalidMode(3)));
        for mode in MODES {
            assert_eq!(Mode::try_from(mode.number()), Ok(mode));
        }
    }

    #[test]
    fn round_trip_every_colour_and_offset() {
        for mode in MODES {
            for offset in 0..mode.pixels_per_byte() {
                for c in 0..mode.colours() {
                    let byte = encode(mode, c, offset);
                    assert_eq!(decode(mode, byte, offset), c, "{mode} c={c} offset={offset}");
                }
            }
        }
    }

    #[test]
    fn fragments_at_distinct_offsets_never_overlap() {
        for mode in MODES {
            let ppb = mode.pixels_per_byte();
            for a in 0..ppb {
                for b in (0..ppb).filter(|&b| b != a) {
                    for c1 in 0..mode.colours() {
                        for c2 in 0..mode.colours() {
                            assert_eq!(encode(mode, c1, a) & encode(mode, c2, b), 0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn masks_cover_the_byte() {
        for mode in MODES {
            let all = (0..mode.pixels_per_byte()).fold(0u8, |acc, o| acc | mask(mode, o));
            assert_eq!(all, 0xFF, "{mode}");
        }
    }

    #[test]
    fn mode2_layout() {
        assert_eq!(encode(Mode::Mode2, 1, 0), 0x80);
        assert_eq!(encode(Mode::Mode2, 1, 7), 0x01);
        assert_eq!(encode(Mode::Mode2, 0, 3), 0x00);
        assert_eq!(mask(Mode::Mode2, 2), 0x20);
    }

    #[test]
    fn mode1_layout() {
        // Low ink bit in the upper nibble, high ink bit in the lower nibble.
        assert_eq!(encode(Mode::Mode1, 1, 0), 0x80);
        assert_eq!(encode(Mode::Mode1, 2, 0), 0x08);
        assert_eq!(encode(Mode::Mode1, 3, 3), 0x11);
        assert_eq!(mask(Mode::Mode1, 0), 0x88);
        assert_eq!(mask(Mode::Mode1, 1), 0x44);
        assert_eq!(mask(Mode::Mode1, 2), 0x22);
        assert_eq!(mask(Mode::Mode1, 3), 0x11);
    }

    #[test]
    fn mode0_layout() {
        assert_eq!(encode(Mode::Mode0, 1, 0), 0x80);
        assert_eq!(encode(Mode::Mode0, 2, 0), 0x08);
        assert_eq!(encode(Mode::Mode0, 4, 0), 0x20);
        assert_eq!(encode(Mode::Mode0, 8, 0), 0x02);
        assert_eq!(encode(Mode::Mode0, 1, 1), 0x40);
        assert_eq!(encode(Mode::Mode0, 2, 1), 0x04);
        assert_eq!(encode(Mode::Mode0, 4, 1), 0x10);
        assert_eq!(encode(Mode::Mode0, 8, 1), 0x01);
        assert_eq!(mask(Mode::Mode0, 0), 0xAA);
        assert_eq!(mask(Mode::Mode0, 1), 0x55);
    }

    #[test]
    fn unpack_full_byte() {
        let pixels: Vec<u8> = unpack_byte(Mode::Mode1, 0b1010_0110).collect();
        assert_eq!(pixels, vec![1, 2, 3, 0]);
        let pixels: Vec<u8> = unpack_byte(Mode::Mode0, encode(Mode::Mode0, 9, 0) | encode(Mode::Mode0, 6, 1)).collect();
        assert_eq!(pixels, vec![9, 6]);
    }
}

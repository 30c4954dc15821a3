//! Amstrad CPC 27-colour hardware palette.
//!
//! The Gate Array mixes three intensity levels (0%, 50%, 100%) per RGB
//! channel, giving 27 colours. Each colour has two numbers:
//!
//! - the **hardware code** written to the Gate Array's colour register
//!   (`0x40`-`0x5F`, several colours have an alias we never emit), and
//! - the **firmware index** used by the BASIC/firmware `INK` calls, which is
//!   simply the colour's position in the table below.
//!
//! Downstream tools consume both numbers verbatim, so the table must not be
//! reordered.

use std::fmt;

/// One palette entry: 24-bit RGB and its Gate Array hardware code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColourEntry {
    pub rgb: [u8; 3],
    pub hardware_code: u8,
}

const fn entry(r: u8, g: u8, b: u8, hardware_code: u8) -> ColourEntry {
    ColourEntry {
        rgb: [r, g, b],
        hardware_code,
    }
}

/// Number of colours the Gate Array can display.
pub const COLOUR_COUNT: usize = 27;

/// The hardware palette, sorted by firmware index.
pub const COLOURS: [ColourEntry; COLOUR_COUNT] = [
    entry(0x00, 0x00, 0x00, 0x54), //  0: Black
    entry(0x00, 0x00, 0x80, 0x44), //  1: Blue (alias 0x50)
    entry(0x00, 0x00, 0xFF, 0x55), //  2: Bright Blue
    entry(0x80, 0x00, 0x00, 0x5C), //  3: Red
    entry(0x80, 0x00, 0x80, 0x58), //  4: Magenta
    entry(0x80, 0x00, 0xFF, 0x5D), //  5: Mauve
    entry(0xFF, 0x00, 0x00, 0x4C), //  6: Bright Red
    entry(0xFF, 0x00, 0x80, 0x45), //  7: Purple (alias 0x48)
    entry(0xFF, 0x00, 0xFF, 0x4D), //  8: Bright Magenta
    entry(0x00, 0x80, 0x00, 0x56), //  9: Green
    entry(0x00, 0x80, 0x80, 0x46), // 10: Cyan
    entry(0x00, 0x80, 0xFF, 0x57), // 11: Sky Blue
    entry(0x80, 0x80, 0x00, 0x5E), // 12: Yellow
    entry(0x80, 0x80, 0x80, 0x40), // 13: White (alias 0x41)
    entry(0x80, 0x80, 0xFF, 0x5F), // 14: Pastel Blue
    entry(0xFF, 0x80, 0x00, 0x4E), // 15: Orange
    entry(0xFF, 0x80, 0x80, 0x47), // 16: Pink
    entry(0xFF, 0x80, 0xFF, 0x4F), // 17: Pastel Magenta
    entry(0x00, 0xFF, 0x00, 0x52), // 18: Bright Green
    entry(0x00, 0xFF, 0x80, 0x42), // 19: Sea Green (alias 0x51)
    entry(0x00, 0xFF, 0xFF, 0x53), // 20: Bright Cyan
    entry(0x80, 0xFF, 0x00, 0x5A), // 21: Lime
    entry(0x80, 0xFF, 0x80, 0x59), // 22: Pastel Green
    entry(0x80, 0xFF, 0xFF, 0x5B), // 23: Pastel Cyan
    entry(0xFF, 0xFF, 0x00, 0x4A), // 24: Bright Yellow
    entry(0xFF, 0xFF, 0x80, 0x43), // 25: Pastel Yellow (alias 0x49)
    entry(0xFF, 0xFF, 0xFF, 0x4B), // 26: Bright White
];

/// An RGB triple with no exact match in the hardware palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColourNotFound {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for ColourNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "colour not in CPC palette: {:02x} {:02x} {:02x}",
            self.r, self.g, self.b
        )
    }
}

impl std::error::Error for ColourNotFound {}

fn position(r: u8, g: u8, b: u8) -> Result<usize, ColourNotFound> {
    COLOURS
        .iter()
        .position(|c| c.rgb == [r, g, b])
        .ok_or(ColourNotFound { r, g, b })
}

/// Gate Array hardware code for an exact RGB match.
pub fn hardware_code(r: u8, g: u8, b: u8) -> Result<u8, ColourNotFound> {
    position(r, g, b).map(|i| COLOURS[i].hardware_code)
}

/// Firmware colour index for an exact RGB match.
pub fn firmware_index(r: u8, g: u8, b: u8) -> Result<u8, ColourNotFound> {
    position(r, g, b).map(|i| i as u8)
}

/// RGB triple for a firmware index, or `None` past the end of the table.
#[must_use]
pub fn rgb_of(firmware_index: u8) -> Option<(u8, u8, u8)> {
    COLOURS
        .get(usize::from(firmware_index))
        .map(|c| (c.rgb[0], c.rgb[1], c.rgb[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rgb_triples_are_distinct() {
        let set: HashSet<[u8; 3]> = COLOURS.iter().map(|c| c.rgb).collect();
        assert_eq!(set.len(), COLOUR_COUNT);
    }

    #[test]
    fn hardware_codes_are_distinct_and_in_range() {
        let set: HashSet<u8> = COLOURS.iter().map(|c| c.hardware_code).collect();
        assert_eq!(set.len(), COLOUR_COUNT);
        assert!(set.iter().all(|&code| (0x40..=0x5F).contains(&code)));
    }

    #[test]
    fn channels_use_three_levels() {
        for c in &COLOURS {
            for level in c.rgb {
                assert!(matches!(level, 0x00 | 0x80 | 0xFF), "{c:?}");
            }
        }
    }

    #[test]
    fn firmware_index_round_trips_through_rgb_of() {
        for i in 0..COLOUR_COUNT as u8 {
            let (r, g, b) = rgb_of(i).expect("in table");
            assert_eq!(firmware_index(r, g, b), Ok(i));
        }
        assert_eq!(rgb_of(COLOUR_COUNT as u8), None);
    }

    #[test]
    fn known_codes() {
        assert_eq!(hardware_code(0x00, 0x00, 0x00), Ok(0x54));
        assert_eq!(hardware_code(0x80, 0x80, 0x80), Ok(0x40));
        assert_eq!(hardware_code(0xFF, 0xFF, 0xFF), Ok(0x4B));
        assert_eq!(hardware_code(0xFF, 0x80, 0x00), Ok(0x4E));
        assert_eq!(firmware_index(0xFF, 0xFF, 0xFF), Ok(26));
        assert_eq!(firmware_index(0x00, 0x00, 0xFF), Ok(2));
    }

    #[test]
    fn near_miss_is_rejected() {
        let err = hardware_code(0x7F, 0x00, 0x00).expect_err("not exact");
        assert_eq!(err, ColourNotFound { r: 0x7F, g: 0, b: 0 });
        assert_eq!(err.to_string(), "colour not in CPC palette: 7f 00 00");
        assert!(firmware_index(0x01, 0x01, 0x01).is_err());
    }
}

//! Sixteen-slot palette output for the Gate Array's ink registers.

use amstrad_gate_array::ColourNotFound;
use amstrad_gate_array::palette::{firmware_index, hardware_code, rgb_of};

/// Number of ink registers (pens) in the Gate Array.
pub const PENS: usize = 16;

/// Hardware codes and firmware indices for every pen. Pens past the end of
/// the source palette are 0 in both tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteOutput {
    hardware: [u8; PENS],
    firmware: [u8; PENS],
}

impl PaletteOutput {
    /// Look up the first 16 entries of `palette`. Fails on the first colour
    /// outside the hardware palette.
    pub fn from_palette(palette: &[[u8; 3]]) -> Result<Self, ColourNotFound> {
        let mut out = Self {
            hardware: [0; PENS],
            firmware: [0; PENS],
        };
        for (pen, &[r, g, b]) in palette.iter().take(PENS).enumerate() {
            out.hardware[pen] = hardware_code(r, g, b)?;
            out.firmware[pen] = firmware_index(r, g, b)?;
        }
        Ok(out)
    }

    #[must_use]
    pub fn hardware_codes(&self) -> &[u8; PENS] {
        &self.hardware
    }

    #[must_use]
    pub fn firmware_indices(&self) -> &[u8; PENS] {
        &self.firmware
    }

    /// RGB of each pen, recovered from the firmware index.
    #[must_use]
    pub fn rgb(&self) -> [[u8; 3]; PENS] {
        self.firmware.map(|i| rgb_of(i).map_or([0; 3], |(r, g, b)| [r, g, b]))
    }

    /// Assembler source line: `pal_<label>:     db 0x54, 0x44, ...`.
    #[must_use]
    pub fn to_asm(&self, label: &str) -> String {
        let codes: Vec<String> = self.hardware.iter().map(|code| format!("{code:#x}")).collect();
        format!("pal_{label}:     db {}\n", codes.join(", "))
    }

    /// One firmware index per pen, for loading with `INK` from BASIC.
    #[must_use]
    pub fn firmware_bytes(&self) -> [u8; PENS] {
        self.firmware
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_palette_pads_with_zero() {
        let pal = PaletteOutput::from_palette(&[[0, 0, 0], [0xFF, 0xFF, 0xFF], [0, 0, 0x80]]).expect("valid");
        assert_eq!(&pal.hardware_codes()[..4], &[0x54, 0x4B, 0x44, 0x00]);
        assert_eq!(&pal.firmware_indices()[..4], &[0, 26, 1, 0]);
        assert!(pal.hardware_codes()[3..].iter().all(|&c| c == 0));
    }

    #[test]
    fn entries_past_sixteen_are_ignored() {
        let mut colours = vec![[0x80, 0x80, 0x80]; 16];
        colours.push([0x12, 0x34, 0x56]);
        let pal = PaletteOutput::from_palette(&colours).expect("17th entry unused");
        assert!(pal.hardware_codes().iter().all(|&c| c == 0x40));
    }

    #[test]
    fn unknown_colour_fails() {
        let err = PaletteOutput::from_palette(&[[0, 0, 0], [0x10, 0x20, 0x30]]);
        assert_eq!(err, Err(ColourNotFound { r: 0x10, g: 0x20, b: 0x30 }));
    }

    #[test]
    fn asm_line_format() {
        let pal = PaletteOutput::from_palette(&[[0, 0, 0], [0xFF, 0x80, 0x00]]).expect("valid");
        assert_eq!(
            pal.to_asm("hero"),
            "pal_hero:     db 0x54, 0x4e, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0\n"
        );
    }

    #[test]
    fn rgb_round_trips_through_firmware_index() {
        let colours = [[0, 0, 0], [0x80, 0xFF, 0x80], [0xFF, 0, 0x80]];
        let pal = PaletteOutput::from_palette(&colours).expect("valid");
        assert_eq!(&pal.rgb()[..3], &colours);
        assert_eq!(pal.firmware_bytes()[1], 22);
    }
}

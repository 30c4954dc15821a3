//! Motorola 6845 CRT Controller, as wired in the Amstrad CPC.
//!
//! The CRTC generates a 14-bit memory address (MA) per character and a 5-bit
//! raster address (RA) per scanline within a character row. The CPC maps them
//! onto the 16-bit bus like this:
//!
//! ```text
//! A15 A14 | A13 A12 A11 | A10 ... A1 | A0
//! MA13 MA12 | RA2 RA1 RA0 | MA9 ... MA0 | CCLK
//! ```
//!
//! Each character is two bytes wide (A0 is the character clock), consecutive
//! scanlines of a character row are `0x800` bytes apart, and consecutive
//! character rows are `R1` characters apart. MA10 and MA11 never reach the
//! bus; setting both in the start address lets a carry out of MA9 propagate
//! into MA12, which is how 32 KiB overscan screens cross into the next bank.
//!
//! Only the registers that shape the display are modelled here. No beam or
//! timing state is kept: the crate produces address tables for tools that
//! lay out screen memory ahead of time.

/// Byte distance between consecutive scanlines of one character row.
pub const SCANLINE_STRIDE: usize = 0x800;

/// Bytes fetched per character (one CRTC clock).
pub const BYTES_PER_CHARACTER: usize = 2;

/// The display-shaping subset of the CRTC register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrtcRegisters {
    /// R0: horizontal total, in characters minus one.
    pub horizontal_total: u8,
    /// R1: horizontal displayed, in characters.
    pub horizontal_displayed: u8,
    /// R6: vertical displayed, in character rows.
    pub vertical_displayed: u8,
    /// R9: maximum raster address (scanlines per character row minus one).
    pub max_raster_address: u8,
    /// R12: display start address, high six bits.
    pub start_address_high: u8,
    /// R13: display start address, low byte.
    pub start_address_low: u8,
}

impl Default for CrtcRegisters {
    /// Values programmed by the CPC firmware at power-up.
    fn default() -> Self {
        Self::from_array([63, 40, 25, 7, 0x0C, 0x00])
    }
}

impl CrtcRegisters {
    /// Build from `[R0, R1, R6, R9, R12, R13]`.
    #[must_use]
    pub const fn from_array(regs: [u8; 6]) -> Self {
        Self {
            horizontal_total: regs[0],
            horizontal_displayed: regs[1],
            vertical_displayed: regs[2],
            max_raster_address: regs[3],
            start_address_high: regs[4],
            start_address_low: regs[5],
        }
    }

    /// `[R0, R1, R6, R9, R12, R13]`.
    #[must_use]
    pub const fn to_array(&self) -> [u8; 6] {
        [
            self.horizontal_total,
            self.horizontal_displayed,
            self.vertical_displayed,
            self.max_raster_address,
            self.start_address_high,
            self.start_address_low,
        ]
    }

    /// 14-bit display start address from R12/R13.
    #[must_use]
    pub const fn start_address(&self) -> u16 {
        (((self.start_address_high & 0x3F) as u16) << 8) | self.start_address_low as u16
    }

    /// Scanlines per character row. R9 is a 5-bit register.
    #[must_use]
    pub const fn scanlines_per_row(&self) -> usize {
        (self.max_raster_address & 0x1F) as usize + 1
    }

    /// Total displayed scanlines.
    #[must_use]
    pub const fn displayed_lines(&self) -> usize {
        self.vertical_displayed as usize * self.scanlines_per_row()
    }

    /// Bytes fetched per scanline.
    #[must_use]
    pub const fn row_bytes(&self) -> usize {
        self.horizontal_displayed as usize * BYTES_PER_CHARACTER
    }
}

/// Map a CRTC memory/raster address pair onto the CPC's 16-bit bus.
#[must_use]
pub const fn cpc_address(ma: u16, ra: u8) -> u16 {
    ((ma & 0x3000) << 2) | (((ra & 0x07) as u16) << 11) | ((ma & 0x03FF) << 1)
}

/// Byte offset of every displayed scanline, relative to the 16 KiB bank the
/// start address selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTable {
    lines: Vec<u16>,
    row_bytes: usize,
}

impl AddressTable {
    #[must_use]
    pub fn new(regs: &CrtcRegisters) -> Self {
        let start = regs.start_address();
        let bank_base = cpc_address(start & 0x3000, 0);
        let per_row = regs.scanlines_per_row();

        let lines = (0..regs.displayed_lines())
            .map(|y| {
                let row = (y / per_row) as u16;
                let ra = (y % per_row) as u8;
                let ma = start.wrapping_add(row.wrapping_mul(u16::from(regs.horizontal_displayed))) & 0x3FFF;
                cpc_address(ma, ra).wrapping_sub(bank_base)
            })
            .collect();

        Self {
            lines,
            row_bytes: regs.row_bytes(),
        }
    }

    /// Number of scanlines in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Byte offset of scanline `y`. Panics if `y` is past the table.
    #[must_use]
    pub fn offset(&self, y: usize) -> usize {
        usize::from(self.lines[y])
    }

    #[must_use]
    pub fn offsets(&self) -> &[u16] {
        &self.lines
    }

    /// Offset of the last displayed scanline.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.lines.last().map(|&o| usize::from(o))
    }

    /// Bytes per scanline (`2 * R1`).
    #[must_use]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Size of the memory image needed to hold the first `lines` scanlines:
    /// the highest of their offsets plus one full row.
    ///
    /// `lines` is clamped to the table length; zero lines span nothing.
    #[must_use]
    pub fn span(&self, lines: usize) -> usize {
        self.lines[..lines.min(self.lines.len())]
            .iter()
            .max()
            .map_or(0, |&o| usize::from(o) + self.row_bytes)
    }
}

//! Full-screen packing into CRTC-addressed memory.
//!
//! Screen memory is not linear: scanline `y` starts wherever the CRTC puts it
//! (see [`motorola_6845::AddressTable`]). The encoder writes each pixel
//! straight to its final address, producing a memory image that can be loaded
//! at the screen base as-is.

use amstrad_gate_array::{Mode, decode, encode};
use motorola_6845::{AddressTable, CrtcRegisters};

use crate::{ConvertError, IndexedImage};

/// A packed screen memory image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedScreen {
    bytes: Vec<u8>,
}

impl PackedScreen {
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Split into two equal halves, for overscan screens that straddle two
    /// 16 KiB banks and are loaded as two files.
    #[must_use]
    pub fn halves(&self) -> (&[u8], &[u8]) {
        let half = self.bytes.len() / 2;
        (&self.bytes[..half], &self.bytes[half..half * 2])
    }
}

#[derive(Debug, Clone)]
pub struct ScreenEncoder {
    mode: Mode,
    crtc: CrtcRegisters,
    table: AddressTable,
}

impl ScreenEncoder {
    #[must_use]
    pub fn new(mode: Mode, crtc: CrtcRegisters) -> Self {
        Self {
            mode,
            crtc,
            table: AddressTable::new(&crtc),
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn crtc(&self) -> &CrtcRegisters {
        &self.crtc
    }

    #[must_use]
    pub fn address_table(&self) -> &AddressTable {
        &self.table
    }

    fn check_dimensions(&self, width: usize, height: usize) -> Result<(), ConvertError> {
        let ppb = usize::from(self.mode.pixels_per_byte());
        if width == 0 || height == 0 {
            return Err(ConvertError::dimensions(width, height, "screen is empty"));
        }
        if width % ppb != 0 {
            return Err(ConvertError::dimensions(
                width,
                height,
                format!("width must be a multiple of {ppb} in {}", self.mode),
            ));
        }
        if width / ppb > self.table.row_bytes() {
            return Err(ConvertError::dimensions(
                width,
                height,
                format!(
                    "wider than the {} bytes the CRTC displays per line",
                    self.table.row_bytes()
                ),
            ));
        }
        if height > self.table.len() {
            return Err(ConvertError::dimensions(
                width,
                height,
                format!("taller than the {} lines the CRTC displays", self.table.len()),
            ));
        }
        Ok(())
    }

    /// Pack `image` into screen memory. The buffer spans up to the end of the
    /// highest addressed row.
    pub fn encode(&self, image: &IndexedImage) -> Result<PackedScreen, ConvertError> {
        let mode = self.mode;
        self.check_dimensions(image.width(), image.height())?;
        if let Some((x, y, index)) = image.find_pixel(|p| p >= mode.colours()) {
            return Err(ConvertError::ColourIndexOutOfRange { x, y, index, mode });
        }

        let ppb = usize::from(mode.pixels_per_byte());
        let mut bytes = vec![0u8; self.table.span(image.height())];

        for (y, row) in image.rows().enumerate() {
            let base = self.table.offset(y);
            for (x, &ink) in row.iter().enumerate() {
                bytes[base + x / ppb] |= encode(mode, ink, (x % ppb) as u8);
            }
        }

        Ok(PackedScreen { bytes })
    }

    /// Read a `width` x `height` image back out of screen memory.
    pub fn decode(
        &self,
        memory: &[u8],
        width: usize,
        height: usize,
        palette: Vec<[u8; 3]>,
    ) -> Result<IndexedImage, ConvertError> {
        self.check_dimensions(width, height)?;
        let needed = self.table.span(height);
        if memory.len() < needed {
            return Err(ConvertError::dimensions(
                width,
                height,
                format!("screen memory holds {} bytes, need {needed}", memory.len()),
            ));
        }

        let ppb = usize::from(self.mode.pixels_per_byte());
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            let base = self.table.offset(y);
            pixels.extend((0..width).map(|x| decode(self.mode, memory[base + x / ppb], (x % ppb) as u8)));
        }
        IndexedImage::new(width, height, pixels, palette)
    }
}

//! Sprite packing with optional interleaved masks and pre-shifted copies.
//!
//! A CPC sprite routine draws with `screen = (screen & mask) | data`. To
//! avoid bit-shifting at run time, the converter can also emit one copy of the
//! sprite per sub-byte alignment ("page"): page `k` is the sprite moved `k`
//! pixels to the right inside the same byte-aligned box.
//!
//! Layout of one row with masking enabled:
//!
//! ```text
//! mask0 data0 mask1 data1 ... mask(n-1) data(n-1)
//! ```
//!
//! Pages follow each other, each `height * row_len` bytes long.

use amstrad_gate_array::{Mode, encode, mask};
use serde::Deserialize;

use crate::{ConvertError, IndexedImage};

/// Ink number reserved for transparent pixels.
pub const DEFAULT_TRANSPARENT: u8 = 4;

/// Sprite conversion settings, fixed for the lifetime of an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpriteOptions {
    #[serde(with = "crate::job::mode_number")]
    pub mode: Mode,
    /// Interleave a mask byte before every data byte.
    pub mask: bool,
    /// Emit one pre-shifted page per sub-byte alignment.
    pub offsets: bool,
    /// Ink treated as transparent. Pixels shifted in from the left of a page
    /// are always transparent.
    pub transparent: Option<u8>,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Mode1,
            mask: true,
            offsets: true,
            transparent: Some(DEFAULT_TRANSPARENT),
        }
    }
}

/// Byte geometry of a packed sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteLayout {
    pub mode: Mode,
    /// Source bytes per row, excluding masks.
    pub width_bytes: usize,
    pub height: usize,
    /// 2 with masks, 1 without.
    pub mask_coefficient: usize,
    pub pages: usize,
}

impl SpriteLayout {
    /// Bytes per row, masks included.
    #[must_use]
    pub fn row_len(&self) -> usize {
        self.width_bytes * self.mask_coefficient
    }

    #[must_use]
    pub fn page_len(&self) -> usize {
        self.row_len() * self.height
    }

    /// Total output size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.page_len() * self.pages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn has_mask(&self) -> bool {
        self.mask_coefficient == 2
    }

    fn byte_index(&self, page: usize, y: usize, column: usize) -> usize {
        page * self.page_len() + y * self.row_len() + column * self.mask_coefficient
    }

    /// Index of the data byte for byte column `column`.
    #[must_use]
    pub fn data_index(&self, page: usize, y: usize, column: usize) -> usize {
        self.byte_index(page, y, column) + self.mask_coefficient - 1
    }

    /// Index of the mask byte paired with `data_index`. Only meaningful when
    /// [`has_mask`](Self::has_mask) holds.
    #[must_use]
    pub fn mask_index(&self, page: usize, y: usize, column: usize) -> usize {
        self.byte_index(page, y, column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedSprite {
    layout: SpriteLayout,
    bytes: Vec<u8>,
}

impl PackedSprite {
    #[must_use]
    pub fn layout(&self) -> &SpriteLayout {
        &self.layout
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.layout.pages
    }

    /// Bytes of one page, masks included.
    #[must_use]
    pub fn page(&self, page: usize) -> &[u8] {
        let len = self.layout.page_len();
        &self.bytes[page * len..(page + 1) * len]
    }

    /// Pixel data of one page with mask bytes removed.
    #[must_use]
    pub fn data_plane(&self, page: usize) -> Vec<u8> {
        let step = self.layout.mask_coefficient;
        self.page(page).iter().skip(step - 1).step_by(step).copied().collect()
    }

    /// Mask bytes of one page, or `None` for unmasked sprites.
    #[must_use]
    pub fn mask_plane(&self, page: usize) -> Option<Vec<u8>> {
        self.layout
            .has_mask()
            .then(|| self.page(page).iter().step_by(2).copied().collect())
    }

    /// Decode one page back to ink numbers, row-major, `width_bytes * ppb`
    /// pixels per row. Masked-out pixels read as ink 0.
    #[must_use]
    pub fn unpack_page(&self, page: usize) -> Vec<u8> {
        let mode = self.layout.mode;
        self.data_plane(page)
            .into_iter()
            .flat_map(|byte| amstrad_gate_array::unpack_byte(mode, byte))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteEncoder {
    options: SpriteOptions,
}

impl SpriteEncoder {
    #[must_use]
    pub fn new(options: SpriteOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &SpriteOptions {
        &self.options
    }

    /// Geometry for a `width` x `height` sprite, validating the size.
    pub fn layout(&self, width: usize, height: usize) -> Result<SpriteLayout, ConvertError> {
        let mode = self.options.mode;
        let ppb = usize::from(mode.pixels_per_byte());
        if width == 0 || height == 0 {
            return Err(ConvertError::dimensions(width, height, "sprite is empty"));
        }
        if width % ppb != 0 {
            return Err(ConvertError::dimensions(
                width,
                height,
                format!("width must be a multiple of {ppb} in {mode}"),
            ));
        }
        Ok(SpriteLayout {
            mode,
            width_bytes: width / ppb,
            height,
            mask_coefficient: if self.options.mask { 2 } else { 1 },
            pages: if self.options.offsets { ppb } else { 1 },
        })
    }

    fn is_transparent(&self, ink: u8) -> bool {
        self.options.transparent == Some(ink)
    }

    /// Pack `image`. Dimensions and inks are checked before anything is
    /// allocated.
    pub fn encode(&self, image: &IndexedImage) -> Result<PackedSprite, ConvertError> {
        let layout = self.layout(image.width(), image.height())?;
        let mode = self.options.mode;

        if let Some((x, y, index)) =
            image.find_pixel(|p| p >= mode.colours() && !self.is_transparent(p))
        {
            return Err(ConvertError::ColourIndexOutOfRange { x, y, index, mode });
        }

        let ppb = usize::from(mode.pixels_per_byte());
        let mut bytes = vec![0u8; layout.len()];

        for page in 0..layout.pages {
            for (y, row) in image.rows().enumerate() {
                for x in 0..layout.width_bytes * ppb {
                    // Shift right by `page`; pixels entering from the left
                    // are empty.
                    let ink = x.checked_sub(page).map(|sx| row[sx]);
                    let column = x / ppb;
                    let offset = (x % ppb) as u8;

                    // The transparent ink is still a real ink in Mode 0.
                    if let Some(ink) = ink.filter(|&ink| ink < mode.colours()) {
                        bytes[layout.data_index(page, y, column)] |= encode(mode, ink, offset);
                    }
                    if layout.has_mask() && ink.is_none_or(|ink| self.is_transparent(ink)) {
                        bytes[layout.mask_index(page, y, column)] |= mask(mode, offset);
                    }
                }
            }
        }

        Ok(PackedSprite { layout, bytes })
    }
}

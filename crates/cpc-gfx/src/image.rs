//! Indexed source image.

use crate::ConvertError;

/// A decoded raster image: one palette index per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    palette: Vec<[u8; 3]>,
}

impl IndexedImage {
    /// `pixels` must hold exactly `width * height` entries.
    pub fn new(
        width: usize,
        height: usize,
        pixels: Vec<u8>,
        palette: Vec<[u8; 3]>,
    ) -> Result<Self, ConvertError> {
        if pixels.len() != width * height {
            return Err(ConvertError::dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", width * height, pixels.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
            palette,
        })
    }

    /// Build from nested rows, mostly for tests and small fixtures.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R], palette: Vec<[u8; 3]>) -> Result<Self, ConvertError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut pixels = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ConvertError::dimensions(
                    width,
                    height,
                    format!("row {y} has {} pixels", row.len()),
                ));
            }
            pixels.extend_from_slice(row);
        }
        Self::new(width, height, pixels, palette)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Palette as read from the file. May hold more than 16 entries.
    #[must_use]
    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact(0) panics; an empty image has no rows anyway.
        self.pixels.chunks_exact(self.width.max(1))
    }

    /// First pixel, in scan order, for which `reject` holds.
    pub(crate) fn find_pixel(&self, mut reject: impl FnMut(u8) -> bool) -> Option<(usize, usize, u8)> {
        self.pixels
            .iter()
            .position(|&p| reject(p))
            .map(|i| (i % self.width, i / self.width, self.pixels[i]))
    }
}

//! End-to-end conversions: load, validate, encode, write.
//!
//! Each conversion reads its input and checks the palette and pixel data
//! before a single output file is created.

use std::path::{Path, PathBuf};

use amstrad_gate_array::Mode;
use motorola_6845::CrtcRegisters;
use serde::Deserialize;

use crate::decode::load_image;
use crate::output::{OutputName, write_gif, write_png, write_screen, write_sprite};
use crate::palette::PaletteOutput;
use crate::screen::ScreenEncoder;
use crate::sprite::{SpriteEncoder, SpriteOptions};
use crate::tiles::stack_cells;
use crate::{ConvertError, IndexedImage};

/// Sprite conversion request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpriteJob {
    pub input: PathBuf,
    #[serde(flatten)]
    pub options: SpriteOptions,
    /// Output directory; the current directory when absent.
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
}

/// Full-screen conversion request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScreenJob {
    pub input: PathBuf,
    #[serde(default, with = "crate::job::mode_number")]
    pub mode: Mode,
    /// `[R0, R1, R6, R9, R12, R13]`; firmware defaults when absent.
    #[serde(default)]
    pub crtc: Option<[u8; 6]>,
    /// Write the memory image as two halves.
    #[serde(default)]
    pub split: bool,
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    /// PNG rendering of the packed screen through the hardware palette.
    #[serde(default)]
    pub preview: Option<PathBuf>,
}

/// Tile-sheet restacking request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TilesJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub cell_width: usize,
    pub cell_height: usize,
}

fn describe(image: &IndexedImage) {
    eprintln!(
        "width: {}, height: {}, colours: {}",
        image.width(),
        image.height(),
        image.palette().len()
    );
}

pub fn convert_sprite(job: &SpriteJob) -> Result<Vec<PathBuf>, ConvertError> {
    let name = OutputName::from_input(&job.input, job.out_dir.as_deref())?;
    let image = load_image(&job.input)?;
    describe(&image);

    let palette = PaletteOutput::from_palette(image.palette())?;
    let sprite = SpriteEncoder::new(job.options).encode(&image)?;
    let layout = sprite.layout();
    eprintln!(
        "{}: {} page(s) of {} bytes{}",
        job.options.mode,
        layout.pages,
        layout.page_len(),
        if layout.has_mask() { ", masked" } else { "" }
    );

    write_sprite(&name, &sprite, &palette)
}

pub fn convert_screen(job: &ScreenJob) -> Result<Vec<PathBuf>, ConvertError> {
    let name = OutputName::from_input(&job.input, job.out_dir.as_deref())?;
    let crtc = job.crtc.map_or_else(CrtcRegisters::default, CrtcRegisters::from_array);
    let [r0, r1, r6, r9, r12, r13] = crtc.to_array();
    eprintln!("R0: {r0}, R1: {r1}, R6: {r6}, R9: {r9}, R12: {r12:#04x}, R13: {r13:#04x}");
    eprintln!("{}", job.mode);

    let image = load_image(&job.input)?;
    describe(&image);

    let palette = PaletteOutput::from_palette(image.palette())?;
    let encoder = ScreenEncoder::new(job.mode, crtc);
    let screen = encoder.encode(&image)?;
    eprintln!("total address space: {0} ({0:#06x})", screen.bytes().len());

    let mut written = write_screen(&name, &screen, &palette, job.split)?;

    if let Some(path) = &job.preview {
        let back = encoder.decode(screen.bytes(), image.width(), image.height(), palette.rgb().to_vec())?;
        write_png(path, &back)?;
        written.push(path.clone());
    }

    Ok(written)
}

pub fn convert_tiles(job: &TilesJob) -> Result<Vec<PathBuf>, ConvertError> {
    let sheet = load_image(&job.input)?;
    describe(&sheet);
    let column = stack_cells(&sheet, job.cell_width, job.cell_height)?;
    write_gif(&job.output, &column)?;
    Ok(vec![job.output.clone()])
}

/// Resolve a relative path against `base`.
pub(crate) fn rebase(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebase_only_touches_relative_paths() {
        let mut rel = PathBuf::from("hero.gif");
        rebase(Path::new("assets"), &mut rel);
        assert_eq!(rel, Path::new("assets").join("hero.gif"));

        let abs_str = if cfg!(windows) { "C:\\gfx\\hero.gif" } else { "/gfx/hero.gif" };
        let mut abs = PathBuf::from(abs_str);
        rebase(Path::new("assets"), &mut abs);
        assert_eq!(abs, PathBuf::from(abs_str));
    }
}

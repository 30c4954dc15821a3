//! Output files: packed binaries, palettes, and image encoders.
//!
//! File names follow AMSDOS rules so the results can be copied straight onto
//! a disc image: an 8-character base name plus extension.

use std::fs;
use std::path::{Path, PathBuf};

use crate::palette::PaletteOutput;
use crate::screen::PackedScreen;
use crate::sprite::PackedSprite;
use crate::{ConvertError, IndexedImage};

/// Longest base name AMSDOS accepts.
pub const MAX_NAME_LEN: usize = 8;

/// Base name and directory shared by every file of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputName {
    dir: PathBuf,
    stem: String,
}

impl OutputName {
    /// Derive the base name from the input file's stem. Outputs go to `dir`,
    /// or the current directory when `None`.
    pub fn from_input(input: &Path, dir: Option<&Path>) -> Result<Self, ConvertError> {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        if stem.is_empty() || stem.chars().count() > MAX_NAME_LEN {
            return Err(ConvertError::InvalidName(stem));
        }
        Ok(Self {
            dir: dir.map(Path::to_path_buf).unwrap_or_default(),
            stem,
        })
    }

    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// `<dir>/<stem><suffix>`, e.g. `suffix = "1.bin"`.
    #[must_use]
    pub fn path(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{suffix}", self.stem))
    }
}

/// Write every file in order. If one fails, the files already written by
/// this call are removed again.
fn write_all(files: Vec<(PathBuf, &[u8])>) -> Result<Vec<PathBuf>, ConvertError> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(files.len());
    for (path, data) in files {
        if let Err(e) = fs::write(&path, data) {
            for done in &written {
                let _ = fs::remove_file(done);
            }
            return Err(e.into());
        }
        written.push(path);
    }
    Ok(written)
}

/// Write `<name>.bin` and `<name>.pal`.
pub fn write_sprite(
    name: &OutputName,
    sprite: &PackedSprite,
    palette: &PaletteOutput,
) -> Result<Vec<PathBuf>, ConvertError> {
    let asm = palette.to_asm(name.stem());
    write_all(vec![
        (name.path(".bin"), sprite.bytes()),
        (name.path(".pal"), asm.as_bytes()),
    ])
}

/// Write the screen as `<name>.bin` (or `<name>1.bin` and `<name>2.bin`
/// when `split`), plus `<name>.pal` and `<name>.pab`.
pub fn write_screen(
    name: &OutputName,
    screen: &PackedScreen,
    palette: &PaletteOutput,
    split: bool,
) -> Result<Vec<PathBuf>, ConvertError> {
    let asm = palette.to_asm(name.stem());
    let firmware = palette.firmware_bytes();
    let mut files = Vec::with_capacity(4);
    if split {
        let (first, second) = screen.halves();
        files.push((name.path("1.bin"), first));
        files.push((name.path("2.bin"), second));
    } else {
        files.push((name.path(".bin"), screen.bytes()));
    }
    files.push((name.path(".pal"), asm.as_bytes()));
    files.push((name.path(".pab"), &firmware[..]));
    write_all(files)
}

fn dimension_u16(image: &IndexedImage) -> Result<(u16, u16), ConvertError> {
    match (u16::try_from(image.width()), u16::try_from(image.height())) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ConvertError::dimensions(
            image.width(),
            image.height(),
            "too large for a GIF",
        )),
    }
}

/// Encode as a single-frame GIF with the image's palette.
pub fn encode_gif(image: &IndexedImage) -> Result<Vec<u8>, ConvertError> {
    let (width, height) = dimension_u16(image)?;
    let palette: Vec<u8> = image.palette().iter().flatten().copied().collect();

    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, width, height, &palette)?;
        let frame = gif::Frame::from_indexed_pixels(width, height, image.pixels().to_vec(), None::<u8>);
        encoder.write_frame(&frame)?;
        // Trailer is written when the encoder drops.
    }
    Ok(out)
}

/// Smallest PNG bit depth holding every ink and palette entry.
fn png_depth(image: &IndexedImage) -> png::BitDepth {
    let max_pixel = image.pixels().iter().copied().max().unwrap_or(0);
    let entries = image.palette().len().max(usize::from(max_pixel) + 1);
    match entries {
        0..=2 => png::BitDepth::One,
        3..=4 => png::BitDepth::Two,
        5..=16 => png::BitDepth::Four,
        _ => png::BitDepth::Eight,
    }
}

/// Encode as an indexed PNG at the smallest bit depth that fits.
pub fn encode_png(image: &IndexedImage) -> Result<Vec<u8>, ConvertError> {
    let too_large = |_| ConvertError::dimensions(image.width(), image.height(), "too large for a PNG");
    let width = u32::try_from(image.width()).map_err(too_large)?;
    let height = u32::try_from(image.height()).map_err(too_large)?;
    let depth = png_depth(image);
    let bits = depth as usize;
    let per_byte = 8 / bits;

    let mut data = Vec::with_capacity(image.height() * image.width().div_ceil(per_byte));
    for row in image.rows() {
        for chunk in row.chunks(per_byte) {
            let byte = chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &p)| acc | (p << (8 - bits * (i + 1))));
            data.push(byte);
        }
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(depth);
        let mut palette: Vec<u8> = image.palette().iter().flatten().copied().collect();
        if palette.is_empty() {
            palette.extend_from_slice(&[0, 0, 0]);
        }
        encoder.set_palette(palette);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
        writer.finish()?;
    }
    Ok(out)
}

/// Write an image as GIF.
pub fn write_gif(path: &Path, image: &IndexedImage) -> Result<(), ConvertError> {
    fs::write(path, encode_gif(image)?)?;
    Ok(())
}

/// Write an image as an indexed PNG.
pub fn write_png(path: &Path, image: &IndexedImage) -> Result<(), ConvertError> {
    fs::write(path, encode_png(image)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_from_input_stem() {
        let name = OutputName::from_input(Path::new("gfx/hero.gif"), Some(Path::new("out"))).expect("valid");
        assert_eq!(name.stem(), "hero");
        assert_eq!(name.path(".bin"), Path::new("out").join("hero.bin"));
        assert_eq!(name.path("2.bin"), Path::new("out").join("hero2.bin"));

        let here = OutputName::from_input(Path::new("hero.png"), None).expect("valid");
        assert_eq!(here.path(".pal"), PathBuf::from("hero.pal"));
    }

    #[test]
    fn long_names_are_rejected() {
        let err = OutputName::from_input(Path::new("longsprite.gif"), None);
        assert!(matches!(err, Err(ConvertError::InvalidName(ref n)) if n == "longsprite"));
        assert!(OutputName::from_input(Path::new(""), None).is_err());
    }

    #[test]
    fn png_depth_follows_colour_count() {
        let img = |pal: usize, ink: u8| {
            IndexedImage::new(1, 1, vec![ink], vec![[0, 0, 0]; pal]).expect("valid")
        };
        assert_eq!(png_depth(&img(2, 1)), png::BitDepth::One);
        assert_eq!(png_depth(&img(2, 3)), png::BitDepth::Two);
        assert_eq!(png_depth(&img(16, 0)), png::BitDepth::Four);
        assert_eq!(png_depth(&img(17, 0)), png::BitDepth::Eight);
    }

    #[test]
    fn failed_write_removes_earlier_files() {
        let dir = std::env::temp_dir().join(format!("cpc-gfx-rollback-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("hero.pal")).expect("blocking dir");

        let name = OutputName::from_input(Path::new("hero.gif"), Some(&dir)).expect("valid");
        let palette = PaletteOutput::from_palette(&[[0, 0, 0]]).expect("valid");
        let sprite = crate::SpriteEncoder::new(crate::SpriteOptions::default())
            .encode(&IndexedImage::from_rows(&[[1, 2, 3, 0]], Vec::new()).expect("valid"))
            .expect("encodes");

        let err = write_sprite(&name, &sprite, &palette);
        assert!(matches!(err, Err(ConvertError::Io(_))));
        assert!(!dir.join("hero.bin").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn gif_has_header_and_trailer() {
        let image = IndexedImage::from_rows(&[[0, 1], [1, 0]], vec![[0, 0, 0], [0xFF, 0xFF, 0xFF]]).expect("valid");
        let bytes = encode_gif(&image).expect("encodes");
        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(bytes.last(), Some(&0x3B));
    }
}

//! Indexed image decoding (GIF and PNG).
//!
//! Only palette-based images are accepted: the converter works on ink
//! numbers, and guessing a palette from true-colour pixels would hide
//! preparation mistakes.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::{ConvertError, IndexedImage};

/// Load an indexed image, picking the decoder from the file extension.
pub fn load_image(path: &Path) -> Result<IndexedImage, ConvertError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let reader = || File::open(path).map(BufReader::new);
    match ext.as_deref() {
        Some("gif") => decode_gif(reader()?),
        Some("png") => decode_png(reader()?),
        _ => Err(ConvertError::UnsupportedImage(format!(
            "{}: expected a .gif or .png file",
            path.display()
        ))),
    }
}

fn rgb_triples(flat: &[u8]) -> Vec<[u8; 3]> {
    flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

/// Decode the first frame of a GIF, composited onto the logical screen.
pub fn decode_gif<R: Read>(reader: R) -> Result<IndexedImage, ConvertError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(reader)?;

    let width = usize::from(decoder.width());
    let height = usize::from(decoder.height());
    let global = decoder.global_palette().map(rgb_triples);

    let frame = decoder
        .read_next_frame()?
        .ok_or_else(|| ConvertError::UnsupportedImage("GIF has no frames".into()))?;

    let palette = frame
        .palette
        .as_deref()
        .map(rgb_triples)
        .or(global)
        .ok_or_else(|| ConvertError::UnsupportedImage("GIF has no colour table".into()))?;

    let (left, top) = (usize::from(frame.left), usize::from(frame.top));
    let frame_width = usize::from(frame.width);
    let mut pixels = vec![0u8; width * height];
    for (fy, src) in frame.buffer.chunks_exact(frame_width.max(1)).enumerate() {
        let y = top + fy;
        if y >= height || left >= width {
            continue;
        }
        let n = frame_width.min(width - left);
        pixels[y * width + left..y * width + left + n].copy_from_slice(&src[..n]);
    }

    IndexedImage::new(width, height, pixels, palette)
}

/// Decode an indexed PNG of bit depth 1, 2, 4 or 8.
pub fn decode_png<R: Read>(reader: R) -> Result<IndexedImage, ConvertError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info()?;

    // Copy what we need before the mutable borrow in next_frame().
    let (width, height, depth, palette) = {
        let info = reader.info();
        if info.color_type != png::ColorType::Indexed {
            return Err(ConvertError::UnsupportedImage(format!(
                "PNG colour type {:?} is not indexed",
                info.color_type
            )));
        }
        let palette = info
            .palette
            .as_ref()
            .map(|p| rgb_triples(p))
            .ok_or_else(|| ConvertError::UnsupportedImage("PNG has no palette".into()))?;
        (info.width as usize, info.height as usize, info.bit_depth as usize, palette)
    };

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let line_size = frame.line_size;

    let per_byte = 8 / depth;
    let max = ((1u16 << depth) - 1) as u8;
    let mut pixels = Vec::with_capacity(width * height);
    for line in buf.chunks_exact(line_size).take(height) {
        pixels.extend((0..width).map(|x| {
            let byte = line[x / per_byte];
            let shift = 8 - depth * (x % per_byte + 1);
            (byte >> shift) & max
        }));
    }

    IndexedImage::new(width, height, pixels, palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{encode_gif, encode_png};

    fn fixture() -> IndexedImage {
        IndexedImage::from_rows(
            &[[0, 1, 2, 3, 0], [3, 2, 1, 0, 1], [1, 1, 0, 0, 2]],
            vec![[0, 0, 0], [0xFF, 0, 0], [0, 0xFF, 0], [0, 0, 0xFF]],
        )
        .expect("valid")
    }

    #[test]
    fn gif_round_trip() {
        let image = fixture();
        let bytes = encode_gif(&image).expect("encodes");
        let back = decode_gif(&bytes[..]).expect("decodes");
        assert_eq!(back.pixels(), image.pixels());
        assert_eq!(&back.palette()[..4], image.palette());
    }

    #[test]
    fn png_round_trip_at_two_bits() {
        let image = fixture();
        let bytes = encode_png(&image).expect("encodes");
        let back = decode_png(&bytes[..]).expect("decodes");
        assert_eq!(back, image);
    }

    #[test]
    fn true_colour_png_is_rejected() {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 1, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().expect("header");
            writer.write_image_data(&[1, 2, 3]).expect("data");
        }
        assert!(matches!(decode_png(&bytes[..]), Err(ConvertError::UnsupportedImage(_))));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_image(Path::new("sprite.bmp"));
        assert!(matches!(err, Err(ConvertError::UnsupportedImage(_))));
    }
}

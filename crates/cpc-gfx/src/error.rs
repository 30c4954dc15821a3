//! Conversion errors.
//!
//! Every error is detected before any output is written: dimensions and
//! colours are validated up front, so a failed conversion never leaves a
//! half-filled buffer or file behind.

use std::fmt;
use std::io;

use amstrad_gate_array::{ColourNotFound, InvalidMode, Mode};

#[derive(Debug)]
pub enum ConvertError {
    /// Image size incompatible with the mode or the target layout.
    InvalidDimensions {
        width: usize,
        height: usize,
        reason: String,
    },
    /// A pixel selects an ink the screen mode cannot display.
    ColourIndexOutOfRange {
        x: usize,
        y: usize,
        index: u8,
        mode: Mode,
    },
    /// A palette entry is not one of the 27 hardware colours.
    ColourNotFound(ColourNotFound),
    InvalidMode(InvalidMode),
    /// Input file is not an indexed GIF or PNG.
    UnsupportedImage(String),
    /// Malformed image data reported by the decoder or encoder.
    Codec(String),
    /// Output base name unusable on an AMSDOS disc.
    InvalidName(String),
    /// Malformed batch job file.
    Script(String),
    Io(io::Error),
}

impl ConvertError {
    pub(crate) fn dimensions(width: usize, height: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions {
                width,
                height,
                reason,
            } => write!(f, "invalid image size {width}x{height}: {reason}"),
            Self::ColourIndexOutOfRange { x, y, index, mode } => write!(
                f,
                "pixel ({x}, {y}) uses ink {index}, but {mode} only has {} inks",
                mode.colours()
            ),
            Self::ColourNotFound(e) => write!(f, "{e}"),
            Self::InvalidMode(e) => write!(f, "{e}"),
            Self::UnsupportedImage(msg) => write!(f, "unsupported image: {msg}"),
            Self::Codec(msg) => write!(f, "image codec error: {msg}"),
            Self::InvalidName(name) => write!(
                f,
                "file base name must be 1-8 characters: {name:?}"
            ),
            Self::Script(msg) => write!(f, "job file error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ColourNotFound(e) => Some(e),
            Self::InvalidMode(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ColourNotFound> for ConvertError {
    fn from(e: ColourNotFound) -> Self {
        Self::ColourNotFound(e)
    }
}

impl From<InvalidMode> for ConvertError {
    fn from(e: InvalidMode) -> Self {
        Self::InvalidMode(e)
    }
}

impl From<io::Error> for ConvertError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<png::DecodingError> for ConvertError {
    fn from(e: png::DecodingError) -> Self {
        Self::Codec(e.to_string())
    }
}

impl From<png::EncodingError> for ConvertError {
    fn from(e: png::EncodingError) -> Self {
        Self::Codec(e.to_string())
    }
}

impl From<gif::DecodingError> for ConvertError {
    fn from(e: gif::DecodingError) -> Self {
        Self::Codec(e.to_string())
    }
}

impl From<gif::EncodingError> for ConvertError {
    fn from(e: gif::EncodingError) -> Self {
        Self::Codec(e.to_string())
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(e: serde_json::Error) -> Self {
        Self::Script(e.to_string())
    }
}

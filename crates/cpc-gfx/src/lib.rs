//! Amstrad CPC graphics converter.
//!
//! Turns indexed GIF and PNG images into data a CPC can use directly:
//! packed sprites (with optional masks and pre-shifted copies), full-screen
//! memory images laid out for a given CRTC setup, and the matching Gate
//! Array palette. Pixel encoding lives in `amstrad-gate-array`, screen
//! addressing in `motorola-6845`; this crate validates, packs and writes.

pub mod convert;
pub mod decode;
mod error;
mod image;
pub mod job;
pub mod output;
pub mod palette;
pub mod screen;
pub mod sprite;
pub mod tiles;

pub use amstrad_gate_array::Mode;
pub use convert::{ScreenJob, SpriteJob, TilesJob, convert_screen, convert_sprite, convert_tiles};
pub use error::ConvertError;
pub use image::IndexedImage;
pub use job::{Job, run_script};
pub use motorola_6845::{AddressTable, CrtcRegisters};
pub use palette::PaletteOutput;
pub use screen::{PackedScreen, ScreenEncoder};
pub use sprite::{PackedSprite, SpriteEncoder, SpriteLayout, SpriteOptions};

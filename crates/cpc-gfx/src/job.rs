//! JSON job files for batch conversion.
//!
//! A job file is an array of conversions, each tagged by `kind`:
//!
//! ```json
//! [
//!   { "kind": "sprite", "input": "hero.gif", "mode": 0, "transparent": 4 },
//!   { "kind": "screen", "input": "title.png", "crtc": [63, 40, 25, 7, 12, 0], "split": true },
//!   { "kind": "tiles", "input": "font.gif", "output": "fontcol.gif", "cell_width": 8, "cell_height": 8 }
//! ]
//! ```
//!
//! Relative paths are resolved against the job file's directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ConvertError;
use crate::convert::{
    ScreenJob, SpriteJob, TilesJob, convert_screen, convert_sprite, convert_tiles, rebase,
};

/// Screen mode as its hardware number (0, 1 or 2).
pub mod mode_number {
    use amstrad_gate_array::Mode;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Mode, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = u8::deserialize(deserializer)?;
        Mode::try_from(n).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Job {
    Sprite(SpriteJob),
    Screen(ScreenJob),
    Tiles(TilesJob),
}

impl Job {
    fn rebase(&mut self, base: &Path) {
        match self {
            Self::Sprite(job) => {
                rebase(base, &mut job.input);
                if let Some(dir) = &mut job.out_dir {
                    rebase(base, dir);
                }
            }
            Self::Screen(job) => {
                rebase(base, &mut job.input);
                if let Some(dir) = &mut job.out_dir {
                    rebase(base, dir);
                }
                if let Some(preview) = &mut job.preview {
                    rebase(base, preview);
                }
            }
            Self::Tiles(job) => {
                rebase(base, &mut job.input);
                rebase(base, &mut job.output);
            }
        }
    }

    /// Run the conversion, returning the files written.
    pub fn run(&self) -> Result<Vec<PathBuf>, ConvertError> {
        match self {
            Self::Sprite(job) => convert_sprite(job),
            Self::Screen(job) => convert_screen(job),
            Self::Tiles(job) => convert_tiles(job),
        }
    }
}

/// Parse a job list from JSON text.
pub fn parse_jobs(text: &str) -> Result<Vec<Job>, ConvertError> {
    Ok(serde_json::from_str(text)?)
}

/// Run every job in `path` in order, stopping at the first failure.
pub fn run_script(path: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let text = std::fs::read_to_string(path)?;
    let mut jobs = parse_jobs(&text)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    let total = jobs.len();
    let mut written = Vec::new();
    for (i, job) in jobs.iter_mut().enumerate() {
        job.rebase(base);
        eprintln!("Job {}/{total}", i + 1);
        written.extend(job.run()?);
    }
    Ok(written)
}

//! Amstrad CPC graphics converter binary.
//!
//! Converts indexed GIF/PNG images into sprite and screen data, or runs a
//! batch of conversions from a JSON job file.

use std::path::PathBuf;
use std::process;

use cpc_gfx::{
    ConvertError, Mode, ScreenJob, SpriteJob, SpriteOptions, TilesJob, convert_screen,
    convert_sprite, convert_tiles, run_script,
};

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

enum Command {
    Sprite(SpriteJob),
    Screen(ScreenJob),
    Tiles(TilesJob),
    Script(PathBuf),
}

fn usage() {
    eprintln!("Usage:");
    eprintln!("  cpc-gfx sprite <image> [OPTIONS]");
    eprintln!("  cpc-gfx screen <image> [OPTIONS]");
    eprintln!("  cpc-gfx tiles <image> <output.gif> <cell_width> <cell_height>");
    eprintln!("  cpc-gfx --script <jobs.json>");
    eprintln!();
    eprintln!("Sprite options:");
    eprintln!("  --mode <n>            Screen mode 0, 1 or 2 [default: 1]");
    eprintln!("  --no-mask             Don't interleave mask bytes");
    eprintln!("  --no-offsets          Don't emit pre-shifted copies");
    eprintln!("  --transparent <n>     Transparent ink, or 'none' [default: 4]");
    eprintln!("  --out <dir>           Output directory [default: current]");
    eprintln!();
    eprintln!("Screen options:");
    eprintln!("  --mode <n>            Screen mode 0, 1 or 2 [default: 1]");
    eprintln!("  --crtc <R0 R1 R6 R9 R12 R13>");
    eprintln!("                        CRTC registers [default: 63 40 25 7 0x0c 0]");
    eprintln!("  -2                    Split the memory image into two files");
    eprintln!("  --preview <file.png>  Render the packed screen back to a PNG");
    eprintln!("  --out <dir>           Output directory [default: current]");
    eprintln!();
    eprintln!("Numbers may be decimal, 0x hex or & hex.");
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

/// Decimal, `0x` hex or `&` hex (the CPC BASIC prefix).
fn parse_number(s: &str) -> Option<u8> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = s.strip_prefix('&') {
        u8::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

fn number_arg(args: &[String], i: usize, flag: &str) -> u8 {
    match args.get(i).map(String::as_str) {
        Some(s) => parse_number(s).unwrap_or_else(|| fail(&format!("{flag}: not a number: {s}"))),
        None => fail(&format!("{flag} needs a value")),
    }
}

fn mode_arg(args: &[String], i: usize) -> Mode {
    let n = number_arg(args, i, "--mode");
    Mode::try_from(n).unwrap_or_else(|e| fail(&e.to_string()))
}

fn path_arg(args: &[String], i: usize, flag: &str) -> PathBuf {
    args.get(i)
        .map(PathBuf::from)
        .unwrap_or_else(|| fail(&format!("{flag} needs a path")))
}

fn parse_sprite(args: &[String]) -> SpriteJob {
    let input = path_arg(args, 0, "sprite");
    let mut options = SpriteOptions::default();
    let mut out_dir = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" => {
                i += 1;
                options.mode = mode_arg(args, i);
            }
            "--no-mask" => {
                options.mask = false;
            }
            "--no-offsets" => {
                options.offsets = false;
            }
            "--transparent" => {
                i += 1;
                options.transparent = if args.get(i).is_some_and(|s| s == "none") {
                    None
                } else {
                    Some(number_arg(args, i, "--transparent"))
                };
            }
            "--out" => {
                i += 1;
                out_dir = Some(path_arg(args, i, "--out"));
            }
            other => fail(&format!("Unknown sprite argument: {other}")),
        }
        i += 1;
    }

    SpriteJob {
        input,
        options,
        out_dir,
    }
}

fn parse_screen(args: &[String]) -> ScreenJob {
    let mut job = ScreenJob {
        input: path_arg(args, 0, "screen"),
        mode: Mode::default(),
        crtc: None,
        split: false,
        out_dir: None,
        preview: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" => {
                i += 1;
                job.mode = mode_arg(args, i);
            }
            "--crtc" => {
                let mut regs = [0u8; 6];
                for reg in &mut regs {
                    i += 1;
                    *reg = number_arg(args, i, "--crtc");
                }
                job.crtc = Some(regs);
            }
            "-2" => {
                job.split = true;
            }
            "--preview" => {
                i += 1;
                job.preview = Some(path_arg(args, i, "--preview"));
            }
            "--out" => {
                i += 1;
                job.out_dir = Some(path_arg(args, i, "--out"));
            }
            other => fail(&format!("Unknown screen argument: {other}")),
        }
        i += 1;
    }

    job
}

fn parse_tiles(args: &[String]) -> TilesJob {
    if args.len() != 4 {
        fail("tiles needs <image> <output.gif> <cell_width> <cell_height>");
    }
    let size = |s: &str| {
        s.parse::<usize>()
            .unwrap_or_else(|_| fail(&format!("tiles: not a cell size: {s}")))
    };
    TilesJob {
        input: PathBuf::from(&args[0]),
        output: PathBuf::from(&args[1]),
        cell_width: size(&args[2]),
        cell_height: size(&args[3]),
    }
}

fn parse_args() -> Command {
    let args: Vec<String> = std::env::args().collect();
    let rest = args.get(2..).unwrap_or_default();

    match args.get(1).map(String::as_str) {
        Some("sprite") => Command::Sprite(parse_sprite(rest)),
        Some("screen") => Command::Screen(parse_screen(rest)),
        Some("tiles") => Command::Tiles(parse_tiles(rest)),
        Some("--script") => Command::Script(path_arg(rest, 0, "--script")),
        Some("--help" | "-h") => {
            usage();
            process::exit(0);
        }
        Some(other) => {
            eprintln!("Unknown command: {other}");
            usage();
            process::exit(1);
        }
        None => {
            usage();
            process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let result: Result<Vec<PathBuf>, ConvertError> = match parse_args() {
        Command::Sprite(job) => convert_sprite(&job),
        Command::Screen(job) => convert_screen(&job),
        Command::Tiles(job) => convert_tiles(&job),
        Command::Script(path) => run_script(&path),
    };

    match result {
        Ok(files) => {
            for file in files {
                eprintln!("File {} is created.", file.display());
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_accept_cpc_hex() {
        assert_eq!(parse_number("12"), Some(12));
        assert_eq!(parse_number("0x0C"), Some(12));
        assert_eq!(parse_number("&30"), Some(0x30));
        assert_eq!(parse_number("256"), None);
        assert_eq!(parse_number("zz"), None);
    }

    #[test]
    fn sprite_flags() {
        let args: Vec<String> = ["hero.gif", "--mode", "0", "--no-mask", "--transparent", "none"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let job = parse_sprite(&args);
        assert_eq!(job.options.mode, Mode::Mode0);
        assert!(!job.options.mask);
        assert!(job.options.offsets);
        assert_eq!(job.options.transparent, None);
    }

    #[test]
    fn screen_crtc_takes_six_values() {
        let args: Vec<String> = ["t.png", "--crtc", "63", "48", "34", "7", "&0C", "0", "-2"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let job = parse_screen(&args);
        assert_eq!(job.crtc, Some([63, 48, 34, 7, 0x0C, 0]));
        assert!(job.split);
        assert_eq!(job.mode, Mode::Mode1);
    }
}

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::geometry::{ContentMode, Rect, Size};
use crate::transform::Filter;

#[derive(Parser, Debug)]
#[command(name = "simple-resize")]
#[command(version, about = "Resize and crop images with fill, aspect-fill and aspect-fit modes")]
#[command(group(clap::ArgGroup::new("operation").required(true).multiple(true).args(["size", "crop"])))]
pub struct Cli {
    /// Input image path
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output path [default: input_resized.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target size (e.g., "100x100")
    #[arg(short, long, value_parser = parse_size)]
    pub size: Option<Size>,

    /// Content mode: fill, aspect-fill or aspect-fit
    #[arg(short, long, default_value = "aspect-fit", value_parser = parse_mode)]
    pub mode: ContentMode,

    /// Crop rectangle applied before scaling (e.g., "10,10,200,100")
    #[arg(short, long, value_parser = parse_rect)]
    pub crop: Option<Rect>,

    /// Resampling filter: nearest, bilinear or bicubic
    #[arg(short, long, default_value = "bicubic", value_parser = parse_filter)]
    pub filter: Filter,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// `--output` if given, else `<stem>_resized.png` beside the input
    pub fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let stem = self.input.file_stem().unwrap_or_default().to_string_lossy();
        self.input.with_file_name(format!("{stem}_resized.png"))
    }
}

fn parse_positive(label: &str, s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid {} value: {}", label, s))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{} must be positive, got {}", label, s));
    }
    Ok(value)
}

fn parse_size(s: &str) -> Result<Size, String> {
    let parts: Vec<&str> = s.split(['x', 'X']).collect();
    if parts.len() != 2 {
        return Err(format!("Invalid size format '{}', expected WxH", s));
    }

    let width = parse_positive("width", parts[0])?;
    let height = parse_positive("height", parts[1])?;

    Ok(Size::new(width, height))
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return Err(format!("Invalid crop format '{}', expected X,Y,W,H", s));
    }

    let origin = |label: &str, v: &str| -> Result<f64, String> {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("Invalid {} value: {}", label, v))
    };

    let x = origin("x", parts[0])?;
    let y = origin("y", parts[1])?;
    let width = parse_positive("width", parts[2])?;
    let height = parse_positive("height", parts[3])?;

    Ok(Rect::new(x, y, width, height))
}

fn parse_mode(s: &str) -> Result<ContentMode, String> {
    s.parse()
}

fn parse_filter(s: &str) -> Result<Filter, String> {
    s.parse()
}

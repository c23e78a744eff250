use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use simple_resize::{Cli, RasterBackend, Resizer};

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("simple_resize={}", level)
            .parse()
            .context("Invalid log directive")?,
    );
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    // Load input image
    let img = ImageReader::open(&cli.input)
        .with_context(|| format!("Failed to open input file: {:?}", cli.input))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read input file: {:?}", cli.input))?
        .decode()
        .with_context(|| format!("Failed to decode image: {:?}", cli.input))?;

    debug!(
        input = ?cli.input,
        width = img.width(),
        height = img.height(),
        mode = %cli.mode,
        filter = %cli.filter,
        "loaded image"
    );

    let resizer = Resizer::new(RasterBackend::new(cli.filter));
    let mut current = img.to_rgba8();

    if let Some(bounds) = cli.crop {
        let cropped = resizer
            .crop_to_bounds(&current, bounds)
            .with_context(|| format!("Failed to crop to {}", bounds))?;
        info!(
            "Cropped: {}x{} -> {}x{}",
            current.width(),
            current.height(),
            cropped.width(),
            cropped.height()
        );
        current = cropped;
    }

    if let Some(size) = cli.size {
        let resized = resizer
            .scale_to_size(&current, size, cli.mode)
            .with_context(|| format!("Failed to resize to {} ({})", size, cli.mode))?;
        info!(
            "Resized ({}): {}x{} -> {}x{}",
            cli.mode,
            current.width(),
            current.height(),
            resized.width(),
            resized.height()
        );
        current = resized;
    }

    // Save result
    let output_path = cli.output_path();
    current
        .save(&output_path)
        .with_context(|| format!("Failed to save output: {:?}", output_path))?;

    info!("Saved image: {:?}", output_path);
    info!(
        "Dimensions: {}x{} -> {}x{}",
        img.width(),
        img.height(),
        current.width(),
        current.height()
    );

    Ok(())
}

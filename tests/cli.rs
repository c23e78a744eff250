use std::path::Path;
use std::process::Command;

use image::{Rgba, RgbaImage};

fn write_source(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("wide.png");
    let img = RgbaImage::from_fn(400, 200, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 64, 255]));
    img.save(&path).unwrap();
    path
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_simple-resize"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn cli_aspect_fit_writes_letterboxed_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path());
    let output = dir.path().join("fit.png");

    let out = run(&[
        input.to_str().unwrap(),
        "-s",
        "100x100",
        "-m",
        "aspect-fit",
        "-o",
        output.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let result = image::open(&output).unwrap().to_rgba8();
    assert_eq!(result.dimensions(), (100, 100));
    assert_eq!(result.get_pixel(50, 10)[3], 0);
    assert_eq!(result.get_pixel(50, 50)[3], 255);
}

#[test]
fn cli_crop_then_fill_uses_default_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path());

    let out = run(&[
        input.to_str().unwrap(),
        "--crop",
        "100,0,200,200",
        "--size",
        "50x25",
        "--mode",
        "fill",
        "--filter",
        "nearest",
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let result = image::open(dir.path().join("wide_resized.png")).unwrap().to_rgba8();
    assert_eq!(result.dimensions(), (50, 25));
    assert!(result.pixels().all(|p| p[3] == 255));
}

#[test]
fn cli_reports_crop_outside_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path());

    let out = run(&[input.to_str().unwrap(), "--crop", "500,0,10,10"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Failed to crop"), "stderr: {stderr}");
}

//! End-to-end detection tests over encoded image files and the CLI

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{Rgb, RgbImage};
use predicates::prelude::*;

use cropscan::{CropBoxDetector, CropError};

/// Write a square canvas with a uniform border around a uniform interior
fn write_bordered_png(
    path: &Path,
    size: u32,
    border_width: u32,
    border: [u8; 3],
    interior: [u8; 3],
) {
    let img = RgbImage::from_fn(size, size, |x, y| {
        let inside = x >= border_width
            && x < size - border_width
            && y >= border_width
            && y < size - border_width;
        Rgb(if inside { interior } else { border })
    });
    img.save(path).unwrap();
}

fn fixture(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}

#[test]
fn test_detect_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "scan.png");
    write_bordered_png(&path, 100, 10, [255, 255, 255], [0, 0, 0]);

    let loaded = CropBoxDetector::with_target_ratio(1.0)
        .load_file(&path)
        .unwrap();
    let result = loaded.detect_crop_box().unwrap();

    let edges = result.cropped.edges;
    assert!((edges.top - 10.0).abs() <= 1.0);
    assert!((edges.right - 10.0).abs() <= 1.0);
    assert!((edges.bottom - 10.0).abs() <= 1.0);
    assert!((edges.left - 10.0).abs() <= 1.0);
    assert!((result.cropped.width - 80.0).abs() <= 2.0);
    assert!((result.cropped.corrected_width - 100.0).abs() < 1e-6);
}

#[test]
fn test_detect_from_buffer_and_data_uri() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "scan.png");
    write_bordered_png(&path, 80, 8, [0, 0, 0], [255, 255, 255]);
    let bytes = std::fs::read(&path).unwrap();

    let detector = CropBoxDetector::new();

    let from_buffer = detector.load_buffer(&bytes).unwrap().detect_crop_box().unwrap();
    assert!((from_buffer.cropped.edges.top - 8.0).abs() <= 1.0);

    let uri = format!("data:image/png;base64,{}", BASE64.encode(&bytes));
    let from_uri = detector.load_data_uri(&uri).unwrap().detect_crop_box().unwrap();
    assert!((from_uri.cropped.edges.left - 8.0).abs() <= 1.0);
}

#[test]
fn test_load_data_uri_without_prefix() {
    let result = CropBoxDetector::new().load_data_uri("iVBORw0KGgo=");
    assert!(matches!(result, Err(CropError::InvalidEncoding)));
}

#[test]
fn test_load_missing_file() {
    let result = CropBoxDetector::new().load_file(Path::new("/nonexistent/scan.png"));
    assert!(matches!(result, Err(CropError::ImageNotFound(_))));
}

// ============ CLI ============

#[test]
fn test_cli_detect_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "scan.png");
    write_bordered_png(&path, 100, 10, [255, 255, 255], [0, 0, 0]);

    Command::cargo_bin("cropscan")
        .unwrap()
        .args(["detect", "--json", "--ratio", "1.0"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\":true"))
        .stdout(predicate::str::contains("corrected_width"));
}

#[test]
fn test_cli_detect_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "uniform.png");
    // No border transition anywhere: detection must fail per side
    write_bordered_png(&path, 100, 0, [0, 0, 0], [0, 0, 0]);

    Command::cargo_bin("cropscan")
        .unwrap()
        .arg("detect")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn test_cli_detect_empty_directory() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("cropscan")
        .unwrap()
        .arg("detect")
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No image files"));
}

#[test]
fn test_cli_detect_directory_batch() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..3 {
        let path = fixture(dir.path(), &format!("page_{i}.png"));
        write_bordered_png(&path, 64, 6, [255, 255, 255], [0, 0, 0]);
    }

    Command::cargo_bin("cropscan")
        .unwrap()
        .args(["detect", "--json"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("page_0.png"))
        .stdout(predicate::str::contains("page_2.png"));
}

#[test]
fn test_cli_detect_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let image = fixture(dir.path(), "scan.png");
    write_bordered_png(&image, 100, 10, [255, 255, 255], [0, 0, 0]);

    let config = fixture(dir.path(), "cropscan.toml");
    std::fs::write(&config, "[output]\njson = true\n").unwrap();

    Command::cargo_bin("cropscan")
        .unwrap()
        .arg("detect")
        .arg("--config")
        .arg(&config)
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\":true"));
}

#[test]
fn test_cli_info() {
    Command::cargo_bin("cropscan")
        .unwrap()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("ray_threshold"));
}

//! Common types for the crop-box detection module

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use super::geometry::Side;

/// Crop-box detection error types
#[derive(Debug, Error)]
pub enum CropError {
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Invalid base64 input: missing `data:<mime>;base64,` prefix")]
    InvalidEncoding,

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("No edge found on {0} side: no probe ray crossed the brightness threshold")]
    EdgeNotFound(Side),

    #[error("Degenerate normalization range: black point {black} equals white point {white}")]
    DegenerateRange { black: f64, white: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CropError>;

/// Detected edge offsets, measured inward from each canvas side
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Dimensions and aspect ratio of the source canvas
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
}

/// Cropped-region geometry derived from the four detected edges
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CroppedInfo {
    pub width: f64,
    pub height: f64,
    pub aspect_ratio: f64,
    /// Width after padding the short dimension to the target ratio
    pub corrected_width: f64,
    /// Height after padding the short dimension to the target ratio
    pub corrected_height: f64,
    pub edges: Edges,
}

/// Requested (or canvas-derived) target aspect ratio
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TargetInfo {
    pub aspect_ratio: f64,
}

/// Sampled properties of the loaded canvas
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImageInfo {
    pub background_brightness: f64,
}

/// Complete crop-box detection result
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CropBoxResult {
    pub source: SourceInfo,
    pub cropped: CroppedInfo,
    pub target: TargetInfo,
    pub image: ImageInfo,
}

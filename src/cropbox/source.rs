//! Raw pixel source and decode entry points
//!
//! `RawImage` owns a decoded row-major pixel buffer and is the only pixel
//! access path for the detector. Decoding itself is delegated to the `image`
//! crate; this module just maps its inputs (file, byte buffer, data URI)
//! into validated buffers.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::DynamicImage;
use tracing::debug;

use super::types::{CropError, Result};

/// Required prefix marker for base64 data-URI input
const DATA_URI_SCHEME: &str = "data:";

/// Separator between the mime type and the base64 payload
const BASE64_MARKER: &str = ";base64,";

/// Minimum channel count: the first three channels must be R, G, B
const MIN_CHANNELS: u8 = 3;

/// Decoded image held as a row-major interleaved pixel buffer
#[derive(Debug, Clone)]
pub struct RawImage {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl RawImage {
    /// Wrap an existing pixel buffer, validating the size contract
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CropError::InvalidBuffer(format!(
                "image dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        if channels < MIN_CHANNELS {
            return Err(CropError::InvalidBuffer(format!(
                "at least {} channels required, got {}",
                MIN_CHANNELS, channels
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(CropError::InvalidBuffer(format!(
                "buffer length {} does not match {}x{}x{} = {}",
                data.len(),
                width,
                height,
                channels,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Decode an image file from disk
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CropError::ImageNotFound(path.to_path_buf()));
        }
        let img = image::open(path)?;
        debug!(path = %path.display(), "decoded image file");
        Ok(Self::from_dynamic(img))
    }

    /// Decode an in-memory encoded image (PNG, JPEG, ...)
    pub fn from_buffer(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(img))
    }

    /// Decode a `data:<mime>;base64,` URI string.
    ///
    /// The prefix is required and checked before any decode attempt; a
    /// missing prefix is an encoding error, not a decode error.
    pub fn from_data_uri(input: &str) -> Result<Self> {
        let rest = input
            .strip_prefix(DATA_URI_SCHEME)
            .ok_or(CropError::InvalidEncoding)?;
        let (mime, payload) = rest.split_once(BASE64_MARKER).ok_or(CropError::InvalidEncoding)?;
        debug!(mime, payload_len = payload.len(), "decoding data URI");
        let bytes = BASE64.decode(payload)?;
        Self::from_buffer(&bytes)
    }

    /// Flatten a decoded `image` crate value into a 3-channel RGB buffer
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self {
            width,
            height,
            channels: 3,
            data: rgb.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Canvas aspect ratio (width over height)
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// RGB triple at `(x, y)`.
    ///
    /// The single bounds-checked pixel access path: callers must satisfy
    /// `x < width` and `y < height`.
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds for {}x{}",
            x,
            y,
            self.width,
            self.height
        );
        let idx = (y as usize * self.width as usize + x as usize) * self.channels as usize;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

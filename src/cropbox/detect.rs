//! Crop-box detection orchestration
//!
//! `CropBoxDetector` holds the run configuration and exposes only load
//! operations; a successful load yields a `LoadedDetector` that owns the
//! decoded image and exposes `detect_crop_box`. Detection before load is
//! unrepresentable.

use std::path::Path;

use tracing::{debug, info};

use super::color::brightness;
use super::geometry::Side;
use super::raycast::RayCaster;
use super::source::RawImage;
use super::types::{
    CropBoxResult, CroppedInfo, Edges, ImageInfo, Result, SourceInfo, TargetInfo,
};
use super::RayOptions;

/// Unloaded crop-box detector: run configuration plus load operations
#[derive(Debug, Clone, Default)]
pub struct CropBoxDetector {
    target_ratio: Option<f64>,
    options: RayOptions,
}

impl CropBoxDetector {
    /// Detector deriving the target aspect ratio from the canvas
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector with an explicit target aspect ratio (width over height).
    /// Non-positive values fall back to the canvas ratio at detection time.
    pub fn with_target_ratio(ratio: f64) -> Self {
        Self {
            target_ratio: Some(ratio),
            options: RayOptions::default(),
        }
    }

    /// Replace the ray-casting options
    #[must_use]
    pub fn options(mut self, options: RayOptions) -> Self {
        self.options = options;
        self
    }

    /// Decode an image file and move to the loaded state
    pub fn load_file(&self, path: &Path) -> Result<LoadedDetector> {
        Ok(self.attach(RawImage::open(path)?))
    }

    /// Decode an in-memory encoded image and move to the loaded state
    pub fn load_buffer(&self, bytes: &[u8]) -> Result<LoadedDetector> {
        Ok(self.attach(RawImage::from_buffer(bytes)?))
    }

    /// Decode a `data:<mime>;base64,` URI and move to the loaded state
    pub fn load_data_uri(&self, input: &str) -> Result<LoadedDetector> {
        Ok(self.attach(RawImage::from_data_uri(input)?))
    }

    /// Attach an already-decoded pixel buffer
    pub fn from_image(&self, image: RawImage) -> LoadedDetector {
        self.attach(image)
    }

    fn attach(&self, image: RawImage) -> LoadedDetector {
        debug!(
            width = image.width(),
            height = image.height(),
            channels = image.channels(),
            "image loaded"
        );
        LoadedDetector {
            image,
            target_ratio: self.target_ratio,
            options: self.options.clone(),
        }
    }
}

/// Loaded crop-box detector: owns the immutable image for one detection run
#[derive(Debug)]
pub struct LoadedDetector {
    image: RawImage,
    target_ratio: Option<f64>,
    options: RayOptions,
}

impl LoadedDetector {
    /// The decoded pixel buffer
    pub fn image(&self) -> &RawImage {
        &self.image
    }

    /// Mean perceived brightness of the 2x2 pixel block at the canvas
    /// origin. The top-left corner is assumed to lie within background.
    /// Coordinates saturate into bounds for one-pixel-wide canvases.
    pub fn background_brightness(&self) -> f64 {
        let x1 = 1.min(self.image.width() - 1);
        let y1 = 1.min(self.image.height() - 1);
        let block = [(0, 0), (x1, 0), (0, y1), (x1, y1)];

        let sum: f64 = block
            .iter()
            .map(|&(x, y)| {
                let [r, g, b] = self.image.rgb(x, y);
                brightness(r, g, b)
            })
            .sum();
        sum / block.len() as f64
    }

    /// Detect the crop box: probe all four sides and assemble the result.
    ///
    /// Fails with `EdgeNotFound` for the first side where no ray crossed a
    /// brightness transition within the depth limit.
    pub fn detect_crop_box(&self) -> Result<CropBoxResult> {
        let width = f64::from(self.image.width());
        let height = f64::from(self.image.height());
        let canvas_ratio = self.image.aspect_ratio();
        let image_ratio = self
            .target_ratio
            .filter(|r| *r > 0.0)
            .unwrap_or(canvas_ratio);

        let background = self.background_brightness();
        debug!(background, image_ratio, "starting crop-box detection");

        let caster = RayCaster::new(&self.image, &self.options, background)?;
        let top = caster.side_edge(Side::Top, image_ratio)?;
        let right = caster.side_edge(Side::Right, image_ratio)?;
        let bottom = caster.side_edge(Side::Bottom, image_ratio)?;
        let left = caster.side_edge(Side::Left, image_ratio)?;

        let cropped_width = (width - left - right).max(0.0);
        let cropped_height = (height - top - bottom).max(0.0);
        let cropped_ratio = cropped_width / cropped_height;

        // Pad whichever source dimension is short so the cropped area can be
        // brought to the target ratio without shrinking either dimension.
        let (corrected_width, corrected_height) = if image_ratio > cropped_ratio {
            (width * image_ratio / cropped_ratio, height)
        } else {
            (width, height * cropped_ratio / image_ratio)
        };

        info!(
            top, right, bottom, left, cropped_width, cropped_height,
            "crop box detected"
        );

        Ok(CropBoxResult {
            source: SourceInfo {
                width: self.image.width(),
                height: self.image.height(),
                aspect_ratio: canvas_ratio,
            },
            cropped: CroppedInfo {
                width: cropped_width,
                height: cropped_height,
                aspect_ratio: cropped_ratio,
                corrected_width,
                corrected_height,
                edges: Edges {
                    top,
                    right,
                    bottom,
                    left,
                },
            },
            target: TargetInfo {
                aspect_ratio: image_ratio,
            },
            image: ImageInfo {
                background_brightness: background,
            },
        })
    }
}

//! Crop-box detection module
//!
//! Locates the rectangular visible-image region embedded in a canvas with a
//! uniform bordering background (scan borders, letterbox/pillarbox bars) so
//! the border can be cropped away.
//!
//! # Features
//!
//! - Background brightness sampling from the canvas corner
//! - Aspect-ratio-aware scan geometry per side
//! - Multi-ray probing with sub-pixel edge interpolation
//! - Explicit per-side failure instead of numeric sentinels
//!
//! # Example
//!
//! ```rust,no_run
//! use cropscan::{CropBoxDetector, RayOptions};
//! use std::path::Path;
//!
//! let detector = CropBoxDetector::with_target_ratio(1.5)
//!     .options(RayOptions::builder().ray_threshold(20.0).build());
//!
//! let loaded = detector.load_file(Path::new("scan.png")).unwrap();
//! let result = loaded.detect_crop_box().unwrap();
//!
//! println!(
//!     "edges: top={:.1} left={:.1}",
//!     result.cropped.edges.top, result.cropped.edges.left
//! );
//! ```

// Submodules
mod color;
mod detect;
mod geometry;
mod raycast;
mod source;
mod types;

// Re-export public API
pub use color::{brightness, normalize_color, normalized_brightness};
pub use detect::{CropBoxDetector, LoadedDetector};
pub use geometry::{
    correct_scan_ratio, pixel_from_edge, side_axes, side_scan_length, Side, SideAxes,
};
pub use raycast::RayCaster;
pub use source::RawImage;
pub use types::{
    CropBoxResult, CropError, CroppedInfo, Edges, ImageInfo, Result, SourceInfo, TargetInfo,
};

// ============================================================
// Constants
// ============================================================

/// Default fraction of the scan length used as the probe-ray count
const DEFAULT_RAY_AMOUNT: f64 = 0.025;

/// Default floor on the per-side ray count
const DEFAULT_RAY_AMOUNT_MIN: u32 = 15;

/// Default fraction of the scan length inset from the side corners
const DEFAULT_RAY_MARGIN: f64 = 0.1;

/// Default fraction of the perpendicular dimension searched inward
const DEFAULT_RAY_MAX_DEPTH: f64 = 0.4;

/// Default brightness cut point (0-255)
const DEFAULT_RAY_THRESHOLD: f64 = 15.0;

/// Default black normalization point (0-255)
const DEFAULT_RAY_BLACK: f64 = 6.0;

/// Default white normalization point (0-255)
const DEFAULT_RAY_WHITE: f64 = 60.0;

/// Default gamma exponent
const DEFAULT_RAY_GAMMA: f64 = 1.0;

/// Rays never probe past the canvas center
const MAX_RAY_DEPTH_FRACTION: f64 = 0.5;

/// Floor on the gamma exponent to keep `1/gamma` finite
const MIN_GAMMA: f64 = 0.01;

// ============================================================
// Options
// ============================================================

/// Ray-casting options, immutable for the duration of a detection run
#[derive(Debug, Clone)]
pub struct RayOptions {
    /// Fraction of the scan length used as the probe-ray count
    pub ray_amount: f64,
    /// Floor on the per-side ray count
    pub ray_amount_min: u32,
    /// Fraction of the scan length inset from the side corners before probing
    pub ray_margin: f64,
    /// Fraction of the perpendicular dimension searched inward (max 0.5)
    pub ray_max_depth: f64,
    /// Brightness cut point in [0, 255]
    pub ray_threshold: f64,
    /// Black normalization point in [0, 255]
    pub ray_black: f64,
    /// White normalization point in [ray_black, 255]
    pub ray_white: f64,
    /// Gamma exponent applied to the normalization ramp
    pub ray_gamma: f64,
}

impl Default for RayOptions {
    fn default() -> Self {
        Self {
            ray_amount: DEFAULT_RAY_AMOUNT,
            ray_amount_min: DEFAULT_RAY_AMOUNT_MIN,
            ray_margin: DEFAULT_RAY_MARGIN,
            ray_max_depth: DEFAULT_RAY_MAX_DEPTH,
            ray_threshold: DEFAULT_RAY_THRESHOLD,
            ray_black: DEFAULT_RAY_BLACK,
            ray_white: DEFAULT_RAY_WHITE,
            ray_gamma: DEFAULT_RAY_GAMMA,
        }
    }
}

impl RayOptions {
    /// Create a new options builder
    pub fn builder() -> RayOptionsBuilder {
        RayOptionsBuilder::default()
    }

    /// Create options with a denser ray grid for noisy borders
    pub fn dense() -> Self {
        Self {
            ray_amount: 0.05,
            ray_amount_min: 31,
            ..Default::default()
        }
    }
}

/// Builder for RayOptions
#[derive(Debug, Default)]
pub struct RayOptionsBuilder {
    options: RayOptions,
}

impl RayOptionsBuilder {
    /// Set the ray-count fraction of the scan length
    #[must_use]
    pub fn ray_amount(mut self, amount: f64) -> Self {
        self.options.ray_amount = amount.clamp(0.0, 1.0);
        self
    }

    /// Set the minimum per-side ray count
    #[must_use]
    pub fn ray_amount_min(mut self, min: u32) -> Self {
        self.options.ray_amount_min = min.max(1);
        self
    }

    /// Set the corner-inset fraction of the scan length
    #[must_use]
    pub fn ray_margin(mut self, margin: f64) -> Self {
        self.options.ray_margin = margin.clamp(0.0, 0.5);
        self
    }

    /// Set the inward search depth fraction (capped at the canvas center)
    #[must_use]
    pub fn ray_max_depth(mut self, depth: f64) -> Self {
        self.options.ray_max_depth = depth.clamp(0.0, MAX_RAY_DEPTH_FRACTION);
        self
    }

    /// Set the brightness cut point (0-255)
    #[must_use]
    pub fn ray_threshold(mut self, threshold: f64) -> Self {
        self.options.ray_threshold = threshold.clamp(0.0, 255.0);
        self
    }

    /// Set the black normalization point (0-255)
    #[must_use]
    pub fn ray_black(mut self, black: f64) -> Self {
        self.options.ray_black = black.clamp(0.0, 255.0);
        self
    }

    /// Set the white normalization point (0-255)
    #[must_use]
    pub fn ray_white(mut self, white: f64) -> Self {
        self.options.ray_white = white.clamp(0.0, 255.0);
        self
    }

    /// Set the gamma exponent
    #[must_use]
    pub fn ray_gamma(mut self, gamma: f64) -> Self {
        self.options.ray_gamma = gamma.max(MIN_GAMMA);
        self
    }

    /// Build the options, enforcing `ray_white >= ray_black`
    #[must_use]
    pub fn build(mut self) -> RayOptions {
        if self.options.ray_white < self.options.ray_black {
            self.options.ray_white = self.options.ray_black;
        }
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RayOptions::default();

        assert_eq!(opts.ray_amount, 0.025);
        assert_eq!(opts.ray_amount_min, 15);
        assert_eq!(opts.ray_margin, 0.1);
        assert_eq!(opts.ray_max_depth, 0.4);
        assert_eq!(opts.ray_threshold, 15.0);
        assert_eq!(opts.ray_black, 6.0);
        assert_eq!(opts.ray_white, 60.0);
        assert_eq!(opts.ray_gamma, 1.0);
    }

    #[test]
    fn test_builder_pattern() {
        let opts = RayOptions::builder()
            .ray_amount(0.05)
            .ray_amount_min(20)
            .ray_margin(0.2)
            .ray_max_depth(0.3)
            .ray_threshold(30.0)
            .ray_black(10.0)
            .ray_white(80.0)
            .ray_gamma(2.2)
            .build();

        assert_eq!(opts.ray_amount, 0.05);
        assert_eq!(opts.ray_amount_min, 20);
        assert_eq!(opts.ray_margin, 0.2);
        assert_eq!(opts.ray_max_depth, 0.3);
        assert_eq!(opts.ray_threshold, 30.0);
        assert_eq!(opts.ray_black, 10.0);
        assert_eq!(opts.ray_white, 80.0);
        assert_eq!(opts.ray_gamma, 2.2);
    }

    #[test]
    fn test_builder_clamping() {
        let opts = RayOptions::builder()
            .ray_amount(1.5)
            .ray_margin(0.9)
            .ray_max_depth(0.9)
            .ray_threshold(300.0)
            .ray_gamma(0.0)
            .ray_amount_min(0)
            .build();

        assert_eq!(opts.ray_amount, 1.0);
        assert_eq!(opts.ray_margin, 0.5);
        assert_eq!(opts.ray_max_depth, 0.5);
        assert_eq!(opts.ray_threshold, 255.0);
        assert_eq!(opts.ray_gamma, MIN_GAMMA);
        assert_eq!(opts.ray_amount_min, 1);
    }

    #[test]
    fn test_builder_white_floor() {
        // White point never drops below the black point
        let opts = RayOptions::builder().ray_black(100.0).ray_white(50.0).build();
        assert_eq!(opts.ray_white, 100.0);
    }

    #[test]
    fn test_dense_preset() {
        let opts = RayOptions::dense();
        assert!(opts.ray_amount > RayOptions::default().ray_amount);
        assert!(opts.ray_amount_min > RayOptions::default().ray_amount_min);
    }
}

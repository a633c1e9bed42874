//! cropscan - Automatic crop-box detection for scanned images
//!
//! Locates the rectangular visible-image region inside a canvas with a
//! uniform bordering background (scan borders, letterbox/pillarbox bars) by
//! casting probe rays inward from each side and interpolating the first
//! brightness transition.

pub mod config;
pub mod cropbox;

pub use config::{CliOverrides, Config, DetectionConfig, OutputConfig};
pub use cropbox::{
    CropBoxDetector, CropBoxResult, CropError, CroppedInfo, Edges, ImageInfo, LoadedDetector,
    RawImage, RayOptions, Result, Side, SourceInfo, TargetInfo,
};

/// Process exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INPUT_NOT_FOUND: i32 = 2;
}

//! Configuration file handling
//!
//! Detection defaults can be stored in a TOML file and overridden per run
//! from the command line. Missing keys fall back to the built-in defaults.
//!
//! ```toml
//! [detection]
//! target_ratio = 1.5
//! ray_threshold = 20.0
//!
//! [output]
//! json = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cropbox::RayOptions;

/// Config file name under the platform config directory
const CONFIG_FILE_NAME: &str = "cropscan.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
    pub output: OutputConfig,
}

/// Detection parameters, mirroring `RayOptions` plus the target ratio
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Target aspect ratio (width over height); unset derives from the canvas
    pub target_ratio: Option<f64>,
    pub ray_amount: Option<f64>,
    pub ray_amount_min: Option<u32>,
    pub ray_margin: Option<f64>,
    pub ray_max_depth: Option<f64>,
    pub ray_threshold: Option<f64>,
    pub ray_black: Option<f64>,
    pub ray_white: Option<f64>,
    pub ray_gamma: Option<f64>,
}

/// Output preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON instead of the text report
    pub json: bool,
}

/// Per-run overrides from command-line flags
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub target_ratio: Option<f64>,
    pub ray_threshold: Option<f64>,
    pub ray_max_depth: Option<f64>,
    pub json: bool,
}

impl Config {
    /// Load from the default platform location, if the file exists
    pub fn load() -> anyhow::Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and parse a specific TOML file
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Default config file location under the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Fold command-line flags over the file values
    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if overrides.target_ratio.is_some() {
            self.detection.target_ratio = overrides.target_ratio;
        }
        if overrides.ray_threshold.is_some() {
            self.detection.ray_threshold = overrides.ray_threshold;
        }
        if overrides.ray_max_depth.is_some() {
            self.detection.ray_max_depth = overrides.ray_max_depth;
        }
        if overrides.json {
            self.output.json = true;
        }
    }

    /// Build the immutable per-run ray options
    pub fn ray_options(&self) -> RayOptions {
        let d = &self.detection;
        let defaults = RayOptions::default();
        let mut builder = RayOptions::builder()
            .ray_amount(d.ray_amount.unwrap_or(defaults.ray_amount))
            .ray_amount_min(d.ray_amount_min.unwrap_or(defaults.ray_amount_min))
            .ray_margin(d.ray_margin.unwrap_or(defaults.ray_margin))
            .ray_max_depth(d.ray_max_depth.unwrap_or(defaults.ray_max_depth))
            .ray_threshold(d.ray_threshold.unwrap_or(defaults.ray_threshold))
            .ray_black(d.ray_black.unwrap_or(defaults.ray_black))
            .ray_white(d.ray_white.unwrap_or(defaults.ray_white));
        if let Some(gamma) = d.ray_gamma {
            builder = builder.ray_gamma(gamma);
        }
        builder.build()
    }
}

//! Probe-ray casting and per-side edge reduction
//!
//! For one side, a configurable number of rays is cast inward from the edge.
//! Each ray samples normalized brightness at discrete depths and stops at the
//! first streak of two consecutive above-threshold samples; the pair is then
//! interpolated to a sub-pixel position. The side edge is the minimum over
//! all successful rays, and a side where every ray runs out is an explicit
//! detection failure.

use tracing::{debug, trace};

use super::color::normalized_brightness;
use super::geometry::{pixel_from_edge, side_axes, side_scan_length, Side};
use super::source::RawImage;
use super::types::{CropError, Result};
use super::RayOptions;

/// Required consecutive above-threshold samples before a ray stops
const HITS_PER_RAY: usize = 2;

/// One above-threshold sample along a ray
#[derive(Debug, Clone, Copy)]
struct RayHit {
    /// Depth of the sample, in pixels from the side
    depth: u32,
    /// Normalized brightness at the sample, in [0, 255]
    level: f64,
}

/// Casts probe rays over one loaded image with a fixed normalization range
pub struct RayCaster<'a> {
    image: &'a RawImage,
    options: &'a RayOptions,
    /// Background-adjusted black point, in [0, 255]
    black_point: f64,
    /// White point, in [0, 255]
    white_point: f64,
}

impl<'a> RayCaster<'a> {
    /// Set up a caster for one detection run.
    ///
    /// The background brightness shifts the black point so that the border
    /// tone normalizes to zero. Fails fast when the shifted black point
    /// collapses onto the white point, which would divide by zero in the
    /// normalization ramp.
    pub fn new(
        image: &'a RawImage,
        options: &'a RayOptions,
        background_brightness: f64,
    ) -> Result<Self> {
        let black_point = (options.ray_black + background_brightness).clamp(0.0, 255.0);
        let white_point = options.ray_white.clamp(0.0, 255.0);
        if black_point == white_point {
            return Err(CropError::DegenerateRange {
                black: black_point,
                white: white_point,
            });
        }
        Ok(Self {
            image,
            options,
            black_point,
            white_point,
        })
    }

    /// Detect the edge depth for one side, as a sub-pixel offset from that
    /// side. `image_ratio` is the intended visible-image aspect ratio.
    pub fn side_edge(&self, side: Side, image_ratio: f64) -> Result<f64> {
        let width = self.image.width();
        let height = self.image.height();
        let canvas_ratio = self.image.aspect_ratio();

        let axes = side_axes(side, width, height);
        let scan_length = side_scan_length(side, width, height, image_ratio, canvas_ratio);

        // Center the probed region on the scan length and inset it by the
        // margin so rays avoid the canvas corners.
        let offset_start =
            scan_length * self.options.ray_margin + (f64::from(axes.along) - scan_length) / 2.0;
        let offset_end = f64::from(axes.along) - offset_start;

        let ray_count = ((scan_length * self.options.ray_amount).floor() as u32)
            .max(self.options.ray_amount_min);
        let ray_step = offset_end / f64::from(ray_count);
        let max_depth = (f64::from(axes.depth) * self.options.ray_max_depth).floor() as u32;

        debug!(
            %side,
            scan_length,
            offset_start,
            ray_count,
            max_depth,
            "casting side rays"
        );

        let mut edge: Option<f64> = None;
        for n in 0..ray_count {
            let along = (f64::from(n) * ray_step + offset_start).round() as u32;
            // Rounding must never step off the along axis
            let along = along.min(axes.along - 1);

            if let Some(position) = self.cast_ray(side, along, max_depth) {
                trace!(%side, along, position, "ray transition");
                edge = Some(match edge {
                    Some(current) => current.min(position),
                    None => position,
                });
            }
        }

        edge.ok_or(CropError::EdgeNotFound(side))
    }

    /// Cast a single ray inward at a fixed along-side offset.
    ///
    /// A sample at or below the threshold clears any partial streak: the two
    /// qualifying hits must be consecutive, not merely both present.
    fn cast_ray(&self, side: Side, along: u32, max_depth: u32) -> Option<f64> {
        let width = self.image.width();
        let height = self.image.height();
        let mut hits: Vec<RayHit> = Vec::with_capacity(HITS_PER_RAY);

        for depth in 0..max_depth {
            let (x, y) = pixel_from_edge(side, width, height, along, depth);
            let [r, g, b] = self.image.rgb(x, y);
            let level = normalized_brightness(
                r,
                g,
                b,
                self.black_point,
                self.white_point,
                self.options.ray_gamma,
            );

            if level > self.options.ray_threshold {
                hits.push(RayHit { depth, level });
            } else if !hits.is_empty() {
                hits.clear();
            }

            if hits.len() == HITS_PER_RAY {
                return Some(interpolate_hits(hits[0], hits[1]));
            }
        }

        None
    }
}

/// Sub-pixel position between two consecutive hits.
///
/// Rescales so the brighter sample reaches exactly 1.0, then biases the
/// position toward the brighter sample weighted by the dimmer/brighter level
/// ratio. Assumes a monotonic brightness ramp between the two samples.
fn interpolate_hits(first: RayHit, second: RayHit) -> f64 {
    let l0 = first.level / 255.0;
    let l1 = second.level / 255.0;
    let a0 = f64::from(first.depth);
    let a1 = f64::from(second.depth);

    let earlier_brighter = l0 > l1;
    let factor = if earlier_brighter { 1.0 / l0 } else { 1.0 / l1 };
    let weight = (l0 * factor) * (l1 * factor);
    let diff = a1 - a0;

    if earlier_brighter {
        a1 - diff * (1.0 - weight)
    } else {
        a0 + diff * (1.0 - weight)
    }
}

//! Side geometry for edge-relative scanning
//!
//! Maps an abstract canvas side plus along-side/depth offsets to absolute
//! pixel coordinates, and computes aspect-ratio-corrected scan lengths.

use std::fmt;

use serde::Serialize;

/// One of the four canvas sides a ray sweep starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All sides in top/right/bottom/left order
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        };
        f.write_str(name)
    }
}

/// Canvas axis lengths relative to one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideAxes {
    /// Length of the axis running along the side
    pub along: u32,
    /// Length of the axis running inward from the side
    pub depth: u32,
}

/// Axis lengths for a side: horizontal sides run along the width,
/// vertical sides along the height
pub fn side_axes(side: Side, width: u32, height: u32) -> SideAxes {
    match side {
        Side::Top | Side::Bottom => SideAxes {
            along: width,
            depth: height,
        },
        Side::Left | Side::Right => SideAxes {
            along: height,
            depth: width,
        },
    }
}

/// Absolute pixel coordinates for an offset along a side plus a depth into
/// the canvas. `along` and `depth` must lie inside the side's axes.
pub fn pixel_from_edge(side: Side, width: u32, height: u32, along: u32, depth: u32) -> (u32, u32) {
    match side {
        Side::Top => (along, depth),
        Side::Bottom => (along, height - 1 - depth),
        Side::Left => (depth, along),
        Side::Right => (width - 1 - depth, along),
    }
}

/// Shrink a scan length by the ratio mismatch between the intended visible
/// image and the canvas. Identity when `apply` is false or the ratios match.
pub fn correct_scan_ratio(scan_length: f64, image_ratio: f64, canvas_ratio: f64, apply: bool) -> f64 {
    if !apply || image_ratio == canvas_ratio {
        return scan_length;
    }
    let factor = image_ratio.min(canvas_ratio) / image_ratio.max(canvas_ratio);
    scan_length * factor
}

/// Scan length for a side, narrowed when bars are expected on that axis.
///
/// A canvas proportionally wider than the intended image grows vertical
/// pillar bars, so the horizontal (top/bottom) scan narrows to the true
/// content width. The taller case narrows the vertical scan instead.
pub fn side_scan_length(
    side: Side,
    width: u32,
    height: u32,
    image_ratio: f64,
    canvas_ratio: f64,
) -> f64 {
    match side {
        Side::Top | Side::Bottom => correct_scan_ratio(
            f64::from(width),
            image_ratio,
            canvas_ratio,
            image_ratio < canvas_ratio,
        ),
        Side::Left | Side::Right => correct_scan_ratio(
            f64::from(height),
            image_ratio,
            canvas_ratio,
            image_ratio > canvas_ratio,
        ),
    }
}

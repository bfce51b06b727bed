//! Normalization of bins into polar chart wedges
//!
//! Angles in [`Wedge`] are compass degrees: bin 0 is centered on north and
//! angles grow clockwise. Canvases whose 0 rad points east (y-down, clockwise)
//! should use the `screen_*_radians` helpers, which apply the -90° offset.

use crate::BinArray;
use crate::utils::compass_to_screen_radians;
use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` notation
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Rainbow color for `t` in `[0, 1]` built from phase-shifted squared sines
pub fn sinebow(t: f64) -> Rgb {
    let t = 0.5 - t;
    let channel = |phase: f64| {
        let s = (std::f64::consts::PI * (t + phase)).sin();
        (250.0 * s * s).floor() as u8
    };
    Rgb::new(channel(0.0), channel(1.0 / 3.0), channel(2.0 / 3.0))
}

/// One sector of the polar chart
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wedge {
    /// Bin index this wedge was built from
    pub index: usize,
    /// Start of the sector in compass degrees
    pub start_angle: f64,
    /// End of the sector in compass degrees (clockwise from `start_angle`)
    pub end_angle: f64,
    /// Radius as a fraction of the chart radius, in `[0, 1]`
    pub radius_factor: f64,
    pub color: Rgb,
}

impl Wedge {
    /// Bearing the wedge is centered on
    pub fn center_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// Start angle in radians on a y-down canvas (0 = east, clockwise)
    pub fn screen_start_radians(&self) -> f64 {
        compass_to_screen_radians(self.start_angle)
    }

    /// End angle in radians on a y-down canvas (0 = east, clockwise)
    pub fn screen_end_radians(&self) -> f64 {
        compass_to_screen_radians(self.end_angle)
    }

    /// Closed outline of the wedge in y-down screen coordinates
    ///
    /// Starts at `center`, then follows the arc of radius
    /// `radius * radius_factor` in `arc_steps` pieces. Useful for surfaces
    /// that can only fill polygons.
    pub fn outline(&self, center: Coord<f64>, radius: f64, arc_steps: usize) -> Vec<Coord<f64>> {
        let steps = arc_steps.max(1);
        let r = radius * self.radius_factor;
        let a0 = self.screen_start_radians();
        let a1 = self.screen_end_radians();

        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        for k in 0..=steps {
            let a = a0 + (a1 - a0) * k as f64 / steps as f64;
            points.push(Coord {
                x: center.x + r * a.cos(),
                y: center.y + r * a.sin(),
            });
        }
        points
    }
}

/// Turn accumulated bins into wedge descriptors
///
/// Each wedge gets `sqrt(bin / max_bin)` as radius factor, so wedge area is
/// proportional to road length. When no bin holds any mass every radius is 0.
pub fn normalize(bins: &BinArray) -> Vec<Wedge> {
    let num_bins = bins.len();
    let width = bins.bin_width();
    let bin_max = bins.max();

    bins.values()
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let radius_factor = if bin_max > 0.0 {
                (value / bin_max).sqrt().clamp(0.0, 1.0)
            } else {
                0.0
            };
            Wedge {
                index: i,
                start_angle: (i as f64 - 0.5) * width,
                end_angle: (i as f64 + 0.5) * width,
                radius_factor,
                color: sinebow(((2 * i) % num_bins) as f64 / num_bins as f64),
            }
        })
        .collect()
}

/// Everything a drawing surface needs to paint one pass
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientationChart {
    /// Raw accumulated bins
    pub bins: BinArray,
    /// Normalized wedges, one per bin
    pub wedges: Vec<Wedge>,
    /// Camera bearing of the map when the pass ran, in degrees
    pub camera_bearing: f64,
}

impl OrientationChart {
    /// Normalize `bins` into a chart for a map rotated by `camera_bearing`
    pub fn new(bins: BinArray, camera_bearing: f64) -> Self {
        let wedges = normalize(&bins);
        Self {
            bins,
            wedges,
            camera_bearing,
        }
    }

    /// Rotation to apply to the whole chart so it turns with the map
    pub fn rotation_radians(&self) -> f64 {
        -self.camera_bearing.to_radians()
    }

    /// Whether no road mass was visible
    pub fn is_empty(&self) -> bool {
        self.bins.is_zero()
    }
}

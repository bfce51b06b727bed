//! Distance-weighted angular bins

use crate::utils::{FULL_TURN_DEGREES, normalize_bearing};
use crate::{CheapRuler, OrientationError, Result};
use geo::LineString;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Map a bearing in degrees onto one of `num_bins` sectors
///
/// Sector `i` is centered on `i * 360 / num_bins`, so the bearing is rounded
/// (not truncated) to the nearest center. Any finite bearing is accepted,
/// including negative values and values above 360; the result is always in
/// `[0, num_bins)`. Non-finite bearings map to bin 0.
///
/// `num_bins` must be non-zero.
#[inline]
pub fn bin_index(bearing: f64, num_bins: usize) -> usize {
    debug_assert!(num_bins > 0, "bin_index requires at least one bin");
    if !bearing.is_finite() || num_bins == 0 {
        return 0;
    }
    let scaled = normalize_bearing(bearing) * num_bins as f64 / FULL_TURN_DEGREES;
    (scaled.round() as usize) % num_bins
}

/// Fixed-size ring of non-negative accumulators, one per angular sector
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinArray {
    bins: Vec<f64>,
}

impl BinArray {
    /// Create an all-zero bin array with `num_bins` sectors
    pub fn new(num_bins: usize) -> Result<Self> {
        if num_bins == 0 {
            return Err(OrientationError::InvalidBinCount(num_bins));
        }
        Ok(Self {
            bins: vec![0.0; num_bins],
        })
    }

    /// Histogram of a single line
    pub fn from_line(
        num_bins: usize,
        ruler: &CheapRuler,
        line: &LineString<f64>,
        is_two_way: bool,
    ) -> Result<Self> {
        let mut bins = Self::new(num_bins)?;
        bins.accumulate(ruler, line, is_two_way);
        Ok(bins)
    }

    /// Number of sectors
    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Always false: a bin array has at least one sector
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Accumulated mass per sector
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.bins
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.bins.get(index).copied()
    }

    /// Angular width of one sector in degrees
    #[inline]
    pub fn bin_width(&self) -> f64 {
        FULL_TURN_DEGREES / self.bins.len() as f64
    }

    /// Center bearing of sector `index` in degrees
    #[inline]
    pub fn bin_center(&self, index: usize) -> f64 {
        index as f64 * self.bin_width()
    }

    /// Sum of all sectors
    pub fn total(&self) -> f64 {
        self.bins.iter().sum()
    }

    /// Largest sector value (0 for an empty histogram)
    pub fn max(&self) -> f64 {
        self.bins.iter().copied().fold(0.0, f64::max)
    }

    /// Index of the heaviest sector, `None` when there is no mass at all
    pub fn argmax(&self) -> Option<usize> {
        let (index, value) = self
            .bins
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0.0), |best, (i, v)| if v > best.1 { (i, v) } else { best });
        (value > 0.0).then_some(index)
    }

    /// Center bearing of the heaviest sector
    pub fn dominant_bearing(&self) -> Option<f64> {
        self.argmax().map(|index| self.bin_center(index))
    }

    /// Whether no mass has been accumulated
    pub fn is_zero(&self) -> bool {
        self.bins.iter().all(|&v| v == 0.0)
    }

    /// Add mass to one sector, ignoring non-finite or negative contributions
    #[inline(always)]
    fn add_mass(&mut self, index: usize, mass: f64) {
        if mass.is_finite() && mass > 0.0 {
            self.bins[index] += mass;
        }
    }

    /// Accumulate every segment of a line into the bins
    ///
    /// Each consecutive point pair adds its length to the sector of its
    /// bearing, and for two-way roads to the opposite sector as well.
    /// Returns the number of segments that were binned.
    pub fn accumulate(
        &mut self,
        ruler: &CheapRuler,
        line: &LineString<f64>,
        is_two_way: bool,
    ) -> usize {
        let num_bins = self.bins.len();
        let mut binned = 0;

        for segment in line.lines() {
            let distance = ruler.distance(segment.start, segment.end);
            if !distance.is_finite() {
                tracing::warn!(
                    "Skipping segment with non-finite length: {:?} -> {:?}",
                    segment.start,
                    segment.end
                );
                continue;
            }

            let bearing = ruler.bearing(segment.start, segment.end);
            self.add_mass(bin_index(bearing, num_bins), distance);
            if is_two_way {
                self.add_mass(bin_index(bearing + 180.0, num_bins), distance);
            }
            binned += 1;
        }

        binned
    }

    /// Add another histogram with the same number of sectors into this one
    pub fn merge(&mut self, other: &BinArray) -> Result<()> {
        if other.len() != self.len() {
            return Err(OrientationError::BinCountMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        for (bin, &value) in self.bins.iter_mut().zip(&other.bins) {
            *bin += value;
        }
        Ok(())
    }
}

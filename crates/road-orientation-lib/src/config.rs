//! Histogram configuration

use crate::{LayerFilter, OrientationError, Result, Units};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of angular bins used when nothing else is configured
pub const DEFAULT_NUM_BINS: usize = 64;

/// Source layer road features are rendered from
pub const DEFAULT_LAYER: &str = "road";

/// Configuration for orientation passes
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistogramConfig {
    /// Number of equal-width angular sectors around the compass (default 64).
    /// Sector `i` is centered on `i * 360 / num_bins` degrees.
    pub num_bins: usize,
    /// Units road lengths are accumulated in. Only affects absolute bin values,
    /// the normalized chart is unit-free.
    pub units: Units,
    /// Which rendered features count as roads
    pub layer: LayerFilter,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            num_bins: DEFAULT_NUM_BINS,
            units: Units::default(),
            layer: LayerFilter::default(),
        }
    }
}

impl HistogramConfig {
    /// Check the configuration before it is used for a pass
    pub fn validate(&self) -> Result<()> {
        if self.num_bins == 0 {
            return Err(OrientationError::InvalidBinCount(self.num_bins));
        }
        Ok(())
    }
}

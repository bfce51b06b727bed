//! Road Orientation Library - Polar Histograms of Street Bearings
//!
//! This library summarizes the compass orientation of the road segments visible in a map
//! viewport as a length-weighted circular histogram, ready to be painted as a polar chart.
//!
//! # Architecture
//!
//! - **[`CheapRuler`]**: Local planar bearing/distance estimator for one reference latitude
//! - **[`clip`]**: Cohen-Sutherland polyline clipping against the viewport rectangle
//! - **[`BinArray`]**: Distance-weighted angular bins, with the opposite bin for two-way roads
//! - **[`OrientationChart`]**: Normalized wedges (radius ∝ √mass) plus sinebow colors
//! - **[`OrientationTracker`]**: Runs one collect/compute/render pass per viewport-settle event
//!   against an injected [`MapEngine`] and [`DrawingSurface`]
//!
//! # Conventions
//!
//! Coordinates are `geo::Coord<f64>` with `x = longitude` and `y = latitude` in degrees.
//! Every angle exposed by this crate is in compass degrees (0 = north, clockwise), except
//! the explicit `screen_*_radians` helpers on [`Wedge`].

mod bins;
pub mod clip;
mod chart;
mod config;
mod feature;
mod ruler;
mod tracker;
pub mod utils;

// Public API exports
pub use bins::{BinArray, bin_index};
pub use chart::{OrientationChart, Rgb, Wedge, normalize, sinebow};
pub use config::{DEFAULT_LAYER, DEFAULT_NUM_BINS, HistogramConfig};
pub use feature::{Directionality, LayerFilter, RoadFeature, RoadGeometry};
pub use ruler::{CheapRuler, Units};
pub use tracker::{
    DrawingSurface, MapEngine, OrientationTracker, PassState, PassStats, compute_histogram,
};

/// Error types for the orientation library
#[derive(Debug, thiserror::Error)]
pub enum OrientationError {
    #[error("Invalid bin count: {0} (at least one bin is required)")]
    InvalidBinCount(usize),

    #[error("Bin count mismatch: expected {expected}, found {found}")]
    BinCountMismatch { expected: usize, found: usize },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Map engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Drawing surface error: {0}")]
    Drawing(String),

    #[error("An orientation pass is already in progress")]
    PassInProgress,
}

pub type Result<T> = std::result::Result<T, OrientationError>;

//! OrientationTracker - runs one orientation pass per viewport-settle event
//!
//! A pass walks through `Collecting` (snapshot of the map engine state),
//! `Computing` (clip and bin every feature) and `Rendering` (normalize and
//! hand the chart to the drawing surface) before returning to `Idle`.
//! Passes take `&mut self`, so they never overlap; the state check at the
//! start of a pass additionally refuses to run on a tracker left mid-pass by
//! a panic.

use crate::clip::clip_geometry;
use crate::{
    BinArray, CheapRuler, Directionality, HistogramConfig, LayerFilter, OrientationChart,
    OrientationError, Result, RoadFeature,
};
use geo::Rect;

/// Capabilities the tracker needs from the map engine
pub trait MapEngine {
    /// Features currently rendered that pass `filter`
    fn query_visible_features(&self, filter: &LayerFilter) -> Result<Vec<RoadFeature>>;

    /// Visible area as (west, south) - (east, north), `None` when unknown
    fn viewport_bounds(&self) -> Result<Option<Rect<f64>>>;

    /// Latitude of the viewport center in degrees
    fn viewport_center_latitude(&self) -> Result<f64>;

    /// Camera bearing in degrees; only rotates the chart
    fn camera_bearing(&self) -> Result<f64>;
}

impl<T: MapEngine + ?Sized> MapEngine for &T {
    fn query_visible_features(&self, filter: &LayerFilter) -> Result<Vec<RoadFeature>> {
        (**self).query_visible_features(filter)
    }

    fn viewport_bounds(&self) -> Result<Option<Rect<f64>>> {
        (**self).viewport_bounds()
    }

    fn viewport_center_latitude(&self) -> Result<f64> {
        (**self).viewport_center_latitude()
    }

    fn camera_bearing(&self) -> Result<f64> {
        (**self).camera_bearing()
    }
}

/// Receiver of finished charts
pub trait DrawingSurface {
    fn draw(&mut self, chart: &OrientationChart) -> Result<()>;
}

impl<F> DrawingSurface for F
where
    F: FnMut(&OrientationChart) -> Result<()>,
{
    fn draw(&mut self, chart: &OrientationChart) -> Result<()> {
        self(chart)
    }
}

/// Stage of the current pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassState {
    #[default]
    Idle,
    Collecting,
    Computing,
    Rendering,
}

/// Counters gathered during one pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassStats {
    /// Features returned by the map engine
    pub features: usize,
    /// Features skipped because their geometry is not line-shaped
    pub skipped_features: usize,
    /// Clipped fragments that were binned
    pub fragments: usize,
    /// Segments that were binned
    pub segments: usize,
    /// Total accumulated mass (each two-way segment counts twice)
    pub total_mass: f64,
}

/// Map engine state captured at the start of a pass
#[derive(Debug)]
struct Snapshot {
    bounds: Option<Rect<f64>>,
    center_latitude: f64,
    camera_bearing: f64,
    features: Vec<RoadFeature>,
}

/// Histogram of one feature clipped to the viewport
///
/// Returns `None` when the geometry is not line-shaped.
fn feature_histogram(
    feature: &RoadFeature,
    bounds: Option<&Rect<f64>>,
    ruler: &CheapRuler,
    num_bins: usize,
) -> Result<Option<(BinArray, usize, usize)>> {
    let Some(fragments) = clip_geometry(&feature.geometry, bounds) else {
        return Ok(None);
    };

    let mut bins = BinArray::new(num_bins)?;
    let fragment_count = fragments.len();
    let mut segments = 0;
    for mut fragment in fragments {
        if feature.directionality == Directionality::OneWayReverse {
            fragment.0.reverse();
        }
        segments += bins.accumulate(ruler, &fragment, feature.directionality.is_two_way());
    }

    Ok(Some((bins, fragment_count, segments)))
}

/// Clip and bin a set of features into a fresh histogram
///
/// Features with non-line geometry are skipped with a warning. A missing
/// viewport yields an all-zero histogram.
pub fn compute_histogram(
    features: &[RoadFeature],
    bounds: Option<&Rect<f64>>,
    ruler: &CheapRuler,
    num_bins: usize,
) -> Result<(BinArray, PassStats)> {
    #[cfg(feature = "profiling")]
    profiling::scope!("tracker::compute_histogram");

    let mut total = BinArray::new(num_bins)?;
    let mut stats = PassStats {
        features: features.len(),
        ..Default::default()
    };

    for feature in features {
        match feature_histogram(feature, bounds, ruler, num_bins)? {
            Some((bins, fragments, segments)) => {
                total.merge(&bins)?;
                stats.fragments += fragments;
                stats.segments += segments;
            }
            None => {
                if let crate::RoadGeometry::Unsupported { kind } = &feature.geometry {
                    tracing::warn!(
                        "Skipping feature on layer '{}' with unsupported geometry: {}",
                        feature.source_layer,
                        kind
                    );
                }
                stats.skipped_features += 1;
            }
        }
    }

    stats.total_mass = total.total();
    Ok((total, stats))
}

/// Drives collect/compute/render passes against a map engine
pub struct OrientationTracker<E> {
    engine: E,
    config: HistogramConfig,
    state: PassState,
    /// A settle event arrived and no pass has served it yet
    pending: bool,
    last_chart: Option<OrientationChart>,
    last_stats: Option<PassStats>,
    passes_completed: u64,
}

impl<E: MapEngine> OrientationTracker<E> {
    /// Create a tracker for `engine`; fails on an invalid configuration
    pub fn new(engine: E, config: HistogramConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine,
            config,
            state: PassState::Idle,
            pending: false,
            last_chart: None,
            last_stats: None,
            passes_completed: 0,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the engine, e.g. to move the camera between events
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// Chart of the last completed pass
    pub fn last_chart(&self) -> Option<&OrientationChart> {
        self.last_chart.as_ref()
    }

    /// Counters of the last completed pass
    pub fn last_stats(&self) -> Option<&PassStats> {
        self.last_stats.as_ref()
    }

    pub fn passes_completed(&self) -> u64 {
        self.passes_completed
    }

    /// Record a settle event to be served by [`Self::run_pending`]
    ///
    /// Events arriving before the next pass coalesce into one.
    pub fn notify_settle(&mut self) {
        if self.pending {
            tracing::trace!("Coalescing settle event into pending pass");
        }
        self.pending = true;
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Run one pass if any settle event is pending
    pub fn run_pending<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<Option<&OrientationChart>> {
        if !self.pending {
            return Ok(None);
        }
        self.on_viewport_settle(surface).map(Some)
    }

    /// Force the tracker back to `Idle` after a pass was abandoned by a panic
    pub fn reset(&mut self) {
        if self.state != PassState::Idle {
            tracing::warn!("Resetting orientation tracker stuck in {:?}", self.state);
        }
        self.state = PassState::Idle;
    }

    /// Run one full pass for a viewport-settle event
    ///
    /// The chart is handed to `surface` and kept as [`Self::last_chart`].
    /// Map engine and surface errors are returned to the caller; the tracker
    /// is back in `Idle` either way.
    pub fn on_viewport_settle<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<&OrientationChart> {
        if self.state != PassState::Idle {
            return Err(OrientationError::PassInProgress);
        }
        self.pending = false;

        let result = self.run_pass(surface);
        self.transition(PassState::Idle);
        let (chart, stats) = result?;

        self.passes_completed += 1;
        self.last_stats = Some(stats);
        Ok(self.last_chart.insert(chart))
    }

    fn transition(&mut self, next: PassState) {
        tracing::trace!("Orientation pass {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn run_pass<S: DrawingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<(OrientationChart, PassStats)> {
        #[cfg(feature = "profiling")]
        profiling::scope!("tracker::run_pass");

        self.transition(PassState::Collecting);
        let snapshot = self.collect()?;

        let num_bins = self.config.num_bins;
        let (bins, stats) = if snapshot.features.is_empty() {
            tracing::debug!("No road features visible, drawing an empty chart");
            (BinArray::new(num_bins)?, PassStats::default())
        } else {
            self.transition(PassState::Computing);
            if snapshot.bounds.is_none() {
                tracing::debug!("Viewport bounds unavailable, nothing will be binned");
            }
            let ruler = CheapRuler::with_units(snapshot.center_latitude, self.config.units);
            compute_histogram(
                &snapshot.features,
                snapshot.bounds.as_ref(),
                &ruler,
                num_bins,
            )?
        };

        self.transition(PassState::Rendering);
        let chart = {
            #[cfg(feature = "profiling")]
            profiling::scope!("tracker::render");
            OrientationChart::new(bins, snapshot.camera_bearing)
        };
        surface.draw(&chart)?;

        tracing::debug!(
            features = stats.features,
            skipped = stats.skipped_features,
            fragments = stats.fragments,
            segments = stats.segments,
            total_mass = stats.total_mass,
            "Orientation pass complete"
        );

        Ok((chart, stats))
    }

    fn collect(&self) -> Result<Snapshot> {
        #[cfg(feature = "profiling")]
        profiling::scope!("tracker::collect");

        Ok(Snapshot {
            bounds: self.engine.viewport_bounds()?,
            center_latitude: self.engine.viewport_center_latitude()?,
            camera_bearing: self.engine.camera_bearing()?,
            features: self.engine.query_visible_features(&self.config.layer)?,
        })
    }
}

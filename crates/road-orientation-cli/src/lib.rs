//! Road Orientation - Command Line Host
//!
//! Loads a GeoJSON road network, plays the role of the map engine for a
//! sequence of viewports and reports one orientation chart per viewport as
//! text or JSON, optionally painting the last chart as SVG.

mod engine;
mod geojson;
mod render;
mod settings;

pub use engine::StaticMapEngine;
pub use geojson::{load_roads, parse_roads};
pub use render::{PassReport, SvgSurface, render_svg};
pub use settings::{OutputFormat, Settings, UnitsArg};

use geo::Rect;
use road_orientation_lib::{
    DrawingSurface, OrientationChart, OrientationError, OrientationTracker, RoadFeature,
};
use std::path::PathBuf;

/// Errors reported by the command line host
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to format report: {0}")]
    Format(#[from] std::fmt::Error),

    #[error(transparent)]
    Orientation(#[from] OrientationError),

    #[error("No road geometry to fit the viewport to, pass --bbox explicitly")]
    NoBounds,
}

/// Load the roads named in `settings`, report every pass on stdout and write
/// the SVG chart if requested
pub fn run(settings: &Settings) -> Result<(), CliError> {
    let features = load_roads(&settings.roads)?;
    let svg = report_passes(settings, features, &mut std::io::stdout().lock())?;

    if let (Some(path), Some(document)) = (&settings.svg, svg) {
        std::fs::write(path, document).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Wrote chart to {}", path.display());
    }
    Ok(())
}

/// Run one orientation pass per viewport and write a report for each to `out`
///
/// Without explicit viewports a single pass covers the bounds of all roads.
/// Returns the SVG document of the last chart when `settings.svg` is set.
pub fn report_passes<W: std::io::Write>(
    settings: &Settings,
    features: Vec<RoadFeature>,
    out: &mut W,
) -> Result<Option<String>, CliError> {
    let config = settings.histogram_config();
    let units = config.units;

    let mut engine = StaticMapEngine::new(features);
    engine.set_bearing(settings.bearing);
    let viewports: Vec<Rect<f64>> = if settings.bbox.is_empty() {
        vec![engine.data_bounds().ok_or(CliError::NoBounds)?]
    } else {
        settings.bbox.clone()
    };
    tracing::debug!(
        "Running {} passes over {} features",
        viewports.len(),
        engine.feature_count()
    );

    let mut tracker = OrientationTracker::new(engine, config)?;
    let mut svg_surface = SvgSurface::new(settings.size);
    let mut no_drawing = |_: &OrientationChart| -> road_orientation_lib::Result<()> { Ok(()) };
    let surface: &mut dyn DrawingSurface = if settings.svg.is_some() {
        &mut svg_surface
    } else {
        &mut no_drawing
    };

    for (index, viewport) in viewports.iter().enumerate() {
        tracker.engine_mut().set_viewport(Some(*viewport));
        tracker.notify_settle();
        tracker.run_pending(&mut *surface)?;

        let (Some(chart), Some(stats)) = (tracker.last_chart(), tracker.last_stats()) else {
            continue;
        };
        let report = PassReport::new(index + 1, Some(*viewport), units, chart, stats);
        match settings.format {
            OutputFormat::Text => write!(out, "{}", report.to_text()?)?,
            OutputFormat::Json => writeln!(out, "{}", report.to_json()?)?,
        }
    }

    tracing::debug!("Completed {} orientation passes", tracker.passes_completed());
    Ok(svg_surface.document().map(str::to_string))
}

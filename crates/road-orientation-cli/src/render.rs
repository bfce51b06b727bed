//! Chart output: SVG drawing surface plus text and JSON pass reports

use geo::{Coord, Rect};
use road_orientation_lib::{
    DrawingSurface, OrientationChart, OrientationError, PassStats, Result, Units, Wedge,
};
use serde::Serialize;
use std::fmt::Write;

/// Arc pieces per wedge when approximating it with a polygon
const ARC_STEPS: usize = 8;

/// Width of the `#` bar for the heaviest bin in text reports
const BAR_WIDTH: f64 = 40.0;

const BACKGROUND_FILL: &str = "rgba(255,255,255,0.8)";
const CROSSHAIR_STROKE: &str = "rgba(0,0,0,0.15)";

/// Drawing surface producing a standalone SVG document per chart
pub struct SvgSurface {
    size: u32,
    document: Option<String>,
}

impl SvgSurface {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            document: None,
        }
    }

    /// Document of the last drawn chart
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }
}

impl DrawingSurface for SvgSurface {
    fn draw(&mut self, chart: &OrientationChart) -> Result<()> {
        let document = render_svg(chart, self.size)
            .map_err(|e| OrientationError::Drawing(format!("SVG formatting failed: {e}")))?;
        self.document = Some(document);
        Ok(())
    }
}

/// Paint the chart on a `size` x `size` canvas
///
/// The chart is rotated by the negated camera bearing around the canvas center
/// so that it stays aligned with the map.
pub fn render_svg(
    chart: &OrientationChart,
    size: u32,
) -> std::result::Result<String, std::fmt::Error> {
    let radius = size as f64 / 2.0;
    let center = Coord {
        x: radius,
        y: radius,
    };
    let mut svg = String::new();

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    )?;
    writeln!(
        svg,
        r#"  <g transform="rotate({:.3} {radius} {radius})">"#,
        chart.rotation_radians().to_degrees()
    )?;
    writeln!(
        svg,
        r#"    <circle cx="{radius}" cy="{radius}" r="{radius}" fill="{BACKGROUND_FILL}"/>"#
    )?;
    writeln!(
        svg,
        r#"    <path d="M {radius} 0 V {size} M 0 {radius} H {size}" stroke="{CROSSHAIR_STROKE}" fill="none"/>"#
    )?;

    for wedge in chart.wedges.iter().filter(|w| w.radius_factor > 0.0) {
        let points = wedge
            .outline(center, radius, ARC_STEPS)
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            svg,
            r#"    <polygon points="{points}" fill="{}"/>"#,
            wedge.color.to_hex()
        )?;
    }

    writeln!(svg, "  </g>")?;
    writeln!(svg, "</svg>")?;
    Ok(svg)
}

/// Machine-readable summary of one pass
#[derive(Debug, Serialize)]
pub struct PassReport<'a> {
    pub pass: usize,
    /// `[west, south, east, north]`
    pub viewport: Option<[f64; 4]>,
    pub camera_bearing: f64,
    pub units: Units,
    pub stats: &'a PassStats,
    pub dominant_bearing: Option<f64>,
    pub bins: &'a [f64],
    pub wedges: &'a [Wedge],
}

impl<'a> PassReport<'a> {
    pub fn new(
        pass: usize,
        viewport: Option<Rect<f64>>,
        units: Units,
        chart: &'a OrientationChart,
        stats: &'a PassStats,
    ) -> Self {
        Self {
            pass,
            viewport: viewport.map(|r| [r.min().x, r.min().y, r.max().x, r.max().y]),
            camera_bearing: chart.camera_bearing,
            units,
            stats,
            dominant_bearing: chart.bins.dominant_bearing(),
            bins: chart.bins.values(),
            wedges: &chart.wedges,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report listing every non-empty bin
    pub fn to_text(&self) -> std::result::Result<String, std::fmt::Error> {
        let unit = self.units.symbol();
        let mut out = String::new();

        match self.viewport {
            Some([w, s, e, n]) => writeln!(
                out,
                "Pass {}: viewport {w:.5},{s:.5},{e:.5},{n:.5}, bearing {:.1}°",
                self.pass, self.camera_bearing
            )?,
            None => writeln!(
                out,
                "Pass {}: no viewport, bearing {:.1}°",
                self.pass, self.camera_bearing
            )?,
        }
        writeln!(
            out,
            "  features {} (skipped {}), fragments {}, segments {}",
            self.stats.features,
            self.stats.skipped_features,
            self.stats.fragments,
            self.stats.segments
        )?;

        let Some(dominant) = self.dominant_bearing else {
            writeln!(out, "  no road length in view")?;
            return Ok(out);
        };
        writeln!(
            out,
            "  total {:.1} {unit}, dominant bearing {dominant:.1}°",
            self.stats.total_mass
        )?;

        writeln!(out, "  {:>4}  {:>7}  {:>12}", "bin", "bearing", "length")?;
        for wedge in self.wedges.iter().filter(|w| w.radius_factor > 0.0) {
            let bar = "#".repeat((wedge.radius_factor * BAR_WIDTH).round() as usize);
            writeln!(
                out,
                "  {:>4}  {:>7.2}  {:>10.1} {unit:<3} {bar}",
                wedge.index,
                wedge.center_angle(),
                self.bins[wedge.index]
            )?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::LineString;
    use road_orientation_lib::{BinArray, CheapRuler};

    fn sample_chart(bearing: f64) -> OrientationChart {
        let ruler = CheapRuler::new(0.0);
        let mut bins = BinArray::new(16).unwrap();
        bins.accumulate(&ruler, &LineString::from(vec![(0.0, 0.0), (0.0, 0.02)]), true);
        bins.accumulate(&ruler, &LineString::from(vec![(0.0, 0.0), (0.01, 0.0)]), false);
        OrientationChart::new(bins, bearing)
    }

    #[test]
    fn test_svg_has_one_polygon_per_filled_wedge() {
        let chart = sample_chart(0.0);
        let svg = render_svg(&chart, 300).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polygon").count(), 3);
        assert!(svg.contains(&chart.wedges[0].color.to_hex()));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn test_svg_every_wedge_drawn() {
        let ruler = CheapRuler::new(0.0);
        let mut bins = BinArray::new(8).unwrap();
        for k in 0..8 {
            let (sin, cos) = (k as f64 * 45.0).to_radians().sin_cos();
            bins.accumulate(
                &ruler,
                &LineString::from(vec![(0.0, 0.0), (0.01 * sin, 0.01 * cos)]),
                false,
            );
        }
        let svg = render_svg(&OrientationChart::new(bins, 0.0), 200).unwrap();
        assert_eq!(svg.matches("<polygon").count(), 8);
    }

    #[test]
    fn test_svg_rotation_follows_camera() {
        let svg = render_svg(&sample_chart(30.0), 100).unwrap();
        assert!(svg.contains("rotate(-30.000 50 50)"));

        let empty = OrientationChart::new(BinArray::new(4).unwrap(), 0.0);
        assert_eq!(render_svg(&empty, 100).unwrap().matches("<polygon").count(), 0);
    }

    #[test]
    fn test_svg_surface_keeps_last_document() {
        let mut surface = SvgSurface::new(120);
        assert!(surface.document().is_none());
        surface.draw(&sample_chart(0.0)).unwrap();
        surface.draw(&sample_chart(90.0)).unwrap();
        assert!(surface.document().unwrap().contains("rotate(-90.000 60 60)"));
    }

    #[test]
    fn test_text_report() {
        let chart = sample_chart(0.0);
        let stats = PassStats {
            features: 3,
            skipped_features: 1,
            fragments: 2,
            segments: 2,
            total_mass: chart.bins.total(),
        };
        let viewport = Rect::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 1.0, y: 1.0 });
        let report = PassReport::new(1, Some(viewport), Units::Meters, &chart, &stats);
        let text = report.to_text().unwrap();

        assert!(text.starts_with("Pass 1: viewport -1.00000,-1.00000,1.00000,1.00000"));
        assert!(text.contains("features 3 (skipped 1)"));
        assert!(text.contains("dominant bearing 0.0°"));
        // North, east and south bins
        assert_eq!(text.lines().filter(|l| l.contains('#')).count(), 3);
    }

    #[test]
    fn test_empty_text_report() {
        let chart = OrientationChart::new(BinArray::new(4).unwrap(), 0.0);
        let stats = PassStats::default();
        let report = PassReport::new(2, None, Units::Kilometers, &chart, &stats);
        let text = report.to_text().unwrap();
        assert!(text.contains("Pass 2: no viewport"));
        assert!(text.contains("no road length in view"));
    }

    #[test]
    fn test_json_report() {
        let chart = sample_chart(10.0);
        let stats = PassStats::default();
        let report = PassReport::new(1, None, Units::Meters, &chart, &stats);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["pass"], 1);
        assert_eq!(value["camera_bearing"], 10.0);
        assert_eq!(value["units"], "Meters");
        assert_eq!(value["bins"].as_array().unwrap().len(), 16);
        assert_eq!(value["wedges"].as_array().unwrap().len(), 16);
        assert_eq!(value["dominant_bearing"], 0.0);
        assert!(value["viewport"].is_null());
    }
}

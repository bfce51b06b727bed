use clap::{Parser, ValueEnum};
use geo::{Coord, Rect};
use road_orientation_lib::{DEFAULT_LAYER, HistogramConfig, LayerFilter, Units};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Road Orientation - polar charts of street bearings for the visible part of a map
pub struct Settings {
    /// GeoJSON FeatureCollection (or single Feature) with the road network
    #[clap(short, long, value_name = "FILE")]
    pub roads: PathBuf,

    /// Viewport as WEST,SOUTH,EAST,NORTH in degrees; repeat for several settle events
    #[clap(long, value_name = "W,S,E,N", value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: Vec<Rect<f64>>,

    /// Camera bearing in degrees, rotates the chart with the map
    #[clap(long, default_value = "0.0", allow_hyphen_values = true)]
    pub bearing: f64,

    /// Number of angular bins around the compass
    #[clap(short = 'n', long, default_value = "64")]
    pub bins: usize,

    /// Units for accumulated road length
    #[clap(long, value_enum, default_value = "meters")]
    pub units: UnitsArg,

    /// Source layer road features are taken from
    #[clap(long, default_value = DEFAULT_LAYER)]
    pub layer: String,

    /// Only count roads of this class (repeatable, default all classes)
    #[clap(long = "class", value_name = "CLASS")]
    pub classes: Vec<String>,

    /// Report format written to stdout
    #[clap(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the chart of the last pass as SVG
    #[clap(long, value_name = "FILE")]
    pub svg: Option<PathBuf>,

    /// SVG width and height in pixels
    #[clap(long, default_value = "300")]
    pub size: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsArg {
    Kilometers,
    Meters,
    Miles,
    NauticalMiles,
    Yards,
    Feet,
}

impl From<UnitsArg> for Units {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Kilometers => Units::Kilometers,
            UnitsArg::Meters => Units::Meters,
            UnitsArg::Miles => Units::Miles,
            UnitsArg::NauticalMiles => Units::NauticalMiles,
            UnitsArg::Yards => Units::Yards,
            UnitsArg::Feet => Units::Feet,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Settings {
    /// Parse the command line, exiting with usage information on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Histogram configuration described by these settings
    pub fn histogram_config(&self) -> HistogramConfig {
        HistogramConfig {
            num_bins: self.bins,
            units: self.units.into(),
            layer: LayerFilter::new(self.layer.as_str())
                .with_classes(self.classes.iter().cloned()),
        }
    }
}

/// Parse `WEST,SOUTH,EAST,NORTH`
fn parse_bbox(value: &str) -> Result<Rect<f64>, String> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid coordinate '{}': {}", part.trim(), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [west, south, east, north] = parts[..] else {
        return Err(format!(
            "expected 4 comma-separated values (WEST,SOUTH,EAST,NORTH), got {}",
            parts.len()
        ));
    };
    if parts.iter().any(|v| !v.is_finite()) {
        return Err("bounding box values must be finite".to_string());
    }
    if west > east || south > north {
        return Err(format!(
            "bounding box must satisfy WEST <= EAST and SOUTH <= NORTH, got {value}"
        ));
    }

    Ok(Rect::new(
        Coord { x: west, y: south },
        Coord { x: east, y: north },
    ))
}

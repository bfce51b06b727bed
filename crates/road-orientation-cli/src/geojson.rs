//! GeoJSON road loading
//!
//! Only the parts of GeoJSON needed for roads are decoded. Features whose
//! geometry cannot be read are logged and dropped so one bad feature does not
//! discard a whole network.

use crate::CliError;
use geo::{Coord, LineString, MultiLineString};
use road_orientation_lib::{
    DEFAULT_LAYER, Directionality, OrientationError, Result, RoadFeature, RoadGeometry,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Document {
    FeatureCollection { features: Vec<RawFeature> },
    Feature(RawFeature),
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// Read road features from a GeoJSON file
pub fn load_roads(path: &Path) -> std::result::Result<Vec<RoadFeature>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let features = parse_roads(&text)?;
    let points: usize = features.iter().map(|f| f.geometry.point_count()).sum();
    tracing::info!(
        "Loaded {} road features ({} points) from {}",
        features.len(),
        points,
        path.display()
    );
    Ok(features)
}

/// Decode a FeatureCollection or a single Feature into road features
pub fn parse_roads(text: &str) -> std::result::Result<Vec<RoadFeature>, CliError> {
    let raw = match serde_json::from_str::<Document>(text)? {
        Document::FeatureCollection { features } => features,
        Document::Feature(feature) => vec![feature],
    };

    let mut features = Vec::with_capacity(raw.len());
    for (index, feature) in raw.into_iter().enumerate() {
        match decode_feature(feature) {
            Ok(feature) => features.push(feature),
            Err(e) => tracing::warn!("Skipping feature #{}: {}", index, e),
        }
    }
    Ok(features)
}

fn invalid(reason: impl Into<String>) -> OrientationError {
    OrientationError::InvalidGeometry(reason.into())
}

fn decode_feature(raw: RawFeature) -> Result<RoadFeature> {
    let geometry = match raw.geometry {
        Some(geometry) => decode_geometry(geometry)?,
        None => return Err(invalid("missing geometry")),
    };
    let properties = raw.properties.unwrap_or_default();

    let layer = ["layer", "source_layer"]
        .iter()
        .find_map(|key| properties.get(*key).and_then(Value::as_str))
        .unwrap_or(DEFAULT_LAYER);
    let mut feature =
        RoadFeature::new(geometry, directionality(properties.get("oneway"))).with_layer(layer);
    if let Some(class) = properties.get("class").and_then(Value::as_str) {
        feature = feature.with_class(class);
    }
    Ok(feature)
}

/// Coerce the `oneway` property, which sources encode as string, bool or number
fn directionality(value: Option<&Value>) -> Directionality {
    match value {
        Some(Value::Bool(b)) => Directionality::from_oneway_bool(*b),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Directionality::from_oneway_number)
            .unwrap_or_default(),
        other => Directionality::from_oneway(other.and_then(Value::as_str)),
    }
}

fn decode_geometry(raw: RawGeometry) -> Result<RoadGeometry> {
    match raw.kind.as_str() {
        "LineString" => decode_line(&raw.coordinates).map(RoadGeometry::Line),
        "MultiLineString" => {
            let parts = raw
                .coordinates
                .as_array()
                .ok_or_else(|| invalid("MultiLineString coordinates must be an array"))?;
            let lines = parts.iter().map(decode_line).collect::<Result<Vec<_>>>()?;
            Ok(RoadGeometry::MultiLine(MultiLineString::new(lines)))
        }
        _ => Ok(RoadGeometry::Unsupported { kind: raw.kind }),
    }
}

fn decode_line(value: &Value) -> Result<LineString<f64>> {
    let positions = value
        .as_array()
        .ok_or_else(|| invalid("line coordinates must be an array of positions"))?;
    positions
        .iter()
        .map(decode_position)
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

fn decode_position(value: &Value) -> Result<Coord<f64>> {
    let position = value
        .as_array()
        .filter(|p| p.len() >= 2)
        .ok_or_else(|| invalid(format!("invalid position {value}")))?;
    match (position[0].as_f64(), position[1].as_f64()) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Coord { x, y }),
        _ => Err(invalid(format!("invalid position {value}"))),
    }
}

//! Road features as delivered by the map engine for one pass

use crate::DEFAULT_LAYER;
use geo::{BoundingRect, LineString, MultiLineString, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Travel direction of a road relative to its geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Directionality {
    /// Traffic flows both ways; each segment counts for its bearing and the opposite one
    #[default]
    TwoWay,
    /// One-way in the direction the geometry is drawn
    OneWay,
    /// One-way against the direction the geometry is drawn (OSM `oneway=-1`)
    OneWayReverse,
}

impl Directionality {
    /// Coerce a string `oneway` property
    ///
    /// `"true"`, `"yes"` and `"1"` mean one-way, `"-1"` and `"reverse"` mean
    /// one-way against the geometry, everything else means two-way.
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn from_oneway_str(value: &str) -> Self {
        let value = value.trim();
        if ["true", "yes", "1"]
            .iter()
            .any(|v| value.eq_ignore_ascii_case(v))
        {
            Directionality::OneWay
        } else if ["-1", "reverse"]
            .iter()
            .any(|v| value.eq_ignore_ascii_case(v))
        {
            Directionality::OneWayReverse
        } else {
            Directionality::TwoWay
        }
    }

    /// Coerce an optional string property; an absent property means two-way
    pub fn from_oneway(value: Option<&str>) -> Self {
        value.map(Self::from_oneway_str).unwrap_or_default()
    }

    /// Coerce a boolean `oneway` property
    pub fn from_oneway_bool(value: bool) -> Self {
        if value {
            Directionality::OneWay
        } else {
            Directionality::TwoWay
        }
    }

    /// Coerce a numeric `oneway` property (`1` forward, `-1` reverse)
    pub fn from_oneway_number(value: f64) -> Self {
        if value == 1.0 {
            Directionality::OneWay
        } else if value == -1.0 {
            Directionality::OneWayReverse
        } else {
            Directionality::TwoWay
        }
    }

    /// Whether segment mass is also credited to the opposite bin
    pub fn is_two_way(self) -> bool {
        self == Directionality::TwoWay
    }
}

/// Geometry of a road feature
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoadGeometry {
    Line(LineString<f64>),
    MultiLine(MultiLineString<f64>),
    /// Anything that is not line geometry; skipped with a warning
    Unsupported { kind: String },
}

impl RoadGeometry {
    /// Bounding rectangle of all points, `None` for empty or unsupported geometry
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            RoadGeometry::Line(line) => line.bounding_rect(),
            RoadGeometry::MultiLine(lines) => lines.bounding_rect(),
            RoadGeometry::Unsupported { .. } => None,
        }
    }

    /// Number of points across all parts
    pub fn point_count(&self) -> usize {
        match self {
            RoadGeometry::Line(line) => line.0.len(),
            RoadGeometry::MultiLine(lines) => lines.iter().map(|line| line.0.len()).sum(),
            RoadGeometry::Unsupported { .. } => 0,
        }
    }
}

/// A rendered road feature: read-only input for one orientation pass
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoadFeature {
    pub geometry: RoadGeometry,
    pub directionality: Directionality,
    /// Source layer the feature was rendered from
    pub source_layer: String,
    /// Road class (`motorway`, `street`, ...), if the source provides one
    pub class: Option<String>,
}

impl RoadFeature {
    /// Create a feature on the default road layer
    pub fn new(geometry: RoadGeometry, directionality: Directionality) -> Self {
        Self {
            geometry,
            directionality,
            source_layer: DEFAULT_LAYER.to_string(),
            class: None,
        }
    }

    /// Create a single-line feature on the default road layer
    pub fn line(line: LineString<f64>, directionality: Directionality) -> Self {
        Self::new(RoadGeometry::Line(line), directionality)
    }

    /// Set the source layer
    pub fn with_layer(mut self, source_layer: impl Into<String>) -> Self {
        self.source_layer = source_layer.into();
        self
    }

    /// Set the road class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

/// Predicate selecting which rendered features feed the histogram
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayerFilter {
    /// Source layer name features must come from
    pub source_layer: String,
    /// Allowed road classes; empty means every class
    pub classes: Vec<String>,
}

impl Default for LayerFilter {
    fn default() -> Self {
        Self::new(DEFAULT_LAYER)
    }
}

impl LayerFilter {
    pub fn new(source_layer: impl Into<String>) -> Self {
        Self {
            source_layer: source_layer.into(),
            classes: Vec::new(),
        }
    }

    /// Restrict the filter to the given road classes
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether a feature passes the filter
    pub fn matches(&self, feature: &RoadFeature) -> bool {
        if feature.source_layer != self.source_layer {
            return false;
        }
        if self.classes.is_empty() {
            return true;
        }
        feature
            .class
            .as_deref()
            .is_some_and(|class| self.classes.iter().any(|allowed| allowed == class))
    }
}

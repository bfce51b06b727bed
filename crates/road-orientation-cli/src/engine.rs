//! In-memory map engine over a loaded road network

use geo::{Coord, Rect};
use road_orientation_lib::utils::rects_overlap;
use road_orientation_lib::{LayerFilter, MapEngine, Result, RoadFeature};

/// Map engine holding every feature in memory with a movable camera
///
/// A feature counts as rendered when its bounding rectangle touches the
/// viewport. Features without a bounding rectangle (non-line geometry) are
/// always reported so the pass can account for them.
pub struct StaticMapEngine {
    features: Vec<RoadFeature>,
    feature_bounds: Vec<Option<Rect<f64>>>,
    viewport: Option<Rect<f64>>,
    bearing: f64,
}

impl StaticMapEngine {
    pub fn new(features: Vec<RoadFeature>) -> Self {
        let feature_bounds = features.iter().map(|f| f.geometry.bounding_rect()).collect();
        Self {
            features,
            feature_bounds,
            viewport: None,
            bearing: 0.0,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Bounds of every loaded feature, `None` when nothing has line geometry
    pub fn data_bounds(&self) -> Option<Rect<f64>> {
        self.feature_bounds
            .iter()
            .flatten()
            .copied()
            .reduce(|a, b| {
                Rect::new(
                    Coord {
                        x: a.min().x.min(b.min().x),
                        y: a.min().y.min(b.min().y),
                    },
                    Coord {
                        x: a.max().x.max(b.max().x),
                        y: a.max().y.max(b.max().y),
                    },
                )
            })
    }

    pub fn viewport(&self) -> Option<Rect<f64>> {
        self.viewport
    }

    /// Move the camera to show `viewport`
    pub fn set_viewport(&mut self, viewport: Option<Rect<f64>>) {
        self.viewport = viewport;
    }

    pub fn set_bearing(&mut self, bearing: f64) {
        self.bearing = bearing;
    }
}

impl MapEngine for StaticMapEngine {
    fn query_visible_features(&self, filter: &LayerFilter) -> Result<Vec<RoadFeature>> {
        let Some(viewport) = self.viewport else {
            return Ok(Vec::new());
        };

        Ok(self
            .features
            .iter()
            .zip(&self.feature_bounds)
            .filter(|(feature, bounds)| {
                filter.matches(feature)
                    && bounds.is_none_or(|rect| rects_overlap(&rect, &viewport))
            })
            .map(|(feature, _)| feature.clone())
            .collect())
    }

    fn viewport_bounds(&self) -> Result<Option<Rect<f64>>> {
        Ok(self.viewport)
    }

    fn viewport_center_latitude(&self) -> Result<f64> {
        Ok(self.viewport.map_or(0.0, |viewport| viewport.center().y))
    }

    fn camera_bearing(&self) -> Result<f64> {
        Ok(self.bearing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::LineString;
    use road_orientation_lib::{Directionality, RoadGeometry};

    fn bbox(west: f64, south: f64, east: f64, north: f64) -> Rect<f64> {
        Rect::new(Coord { x: west, y: south }, Coord { x: east, y: north })
    }

    fn road(points: &[(f64, f64)]) -> RoadFeature {
        RoadFeature::line(LineString::from(points.to_vec()), Directionality::TwoWay)
    }

    fn sample_engine() -> StaticMapEngine {
        StaticMapEngine::new(vec![
            road(&[(0.0, 0.0), (1.0, 1.0)]),
            road(&[(10.0, 10.0), (11.0, 10.0)]).with_class("motorway"),
            road(&[(0.5, 0.5), (0.6, 0.6)]).with_layer("rail"),
            RoadFeature::new(
                RoadGeometry::Unsupported {
                    kind: "Polygon".to_string(),
                },
                Directionality::TwoWay,
            ),
        ])
    }

    #[test]
    fn test_visibility_follows_viewport() {
        let mut engine = sample_engine();
        let filter = LayerFilter::default();
        assert!(engine.query_visible_features(&filter).unwrap().is_empty());

        engine.set_viewport(Some(bbox(-0.5, -0.5, 0.5, 0.5)));
        let visible = engine.query_visible_features(&filter).unwrap();
        assert_eq!(visible.len(), 2);
        assert!(matches!(visible[1].geometry, RoadGeometry::Unsupported { .. }));

        engine.set_viewport(Some(bbox(9.0, 9.0, 12.0, 12.0)));
        let visible = engine.query_visible_features(&filter).unwrap();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].class.as_deref(), Some("motorway"));
    }

    #[test]
    fn test_layer_and_class_filter() {
        let mut engine = sample_engine();
        engine.set_viewport(Some(bbox(-20.0, -20.0, 20.0, 20.0)));

        let rail = engine.query_visible_features(&LayerFilter::new("rail")).unwrap();
        assert_eq!(rail.len(), 1);

        let motorways = engine
            .query_visible_features(&LayerFilter::default().with_classes(["motorway"]))
            .unwrap();
        assert_eq!(motorways.len(), 1);
    }

    #[test]
    fn test_camera_state() {
        let mut engine = sample_engine();
        assert_eq!(engine.viewport_bounds().unwrap(), None);
        assert_eq!(engine.viewport_center_latitude().unwrap(), 0.0);

        engine.set_viewport(Some(bbox(-105.0, 39.7, -104.9, 39.8)));
        engine.set_bearing(30.0);
        assert_eq!(engine.viewport(), Some(bbox(-105.0, 39.7, -104.9, 39.8)));
        assert!((engine.viewport_center_latitude().unwrap() - 39.75).abs() < 1e-12);
        assert_eq!(engine.camera_bearing().unwrap(), 30.0);
    }

    #[test]
    fn test_data_bounds() {
        let engine = sample_engine();
        assert_eq!(engine.feature_count(), 4);
        assert_eq!(engine.data_bounds(), Some(bbox(0.0, 0.0, 11.0, 10.0)));
        assert_eq!(StaticMapEngine::new(Vec::new()).data_bounds(), None);
    }
}

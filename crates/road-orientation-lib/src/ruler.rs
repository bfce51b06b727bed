//! Planar distance and bearing estimation around a reference latitude
//!
//! The estimator scales longitude and latitude differences by factors derived
//! from the WGS84 ellipsoid at one latitude, turning each segment into a flat
//! vector. At city scale this is within a fraction of a percent of the
//! geodesic answer, and costs one `atan2` and one `sqrt` per segment.

use crate::utils::{normalize_bearing, wrap_longitude};
use geo::{Coord, LineString};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// WGS84 equatorial radius in kilometers
const EQUATORIAL_RADIUS_KM: f64 = 6378.137;

/// WGS84 flattening
const FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Squared eccentricity
const E2: f64 = FLATTENING * (2.0 - FLATTENING);

/// Distance units supported by the ruler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Units {
    Kilometers,
    #[default]
    Meters,
    Miles,
    NauticalMiles,
    Yards,
    Feet,
}

impl Units {
    /// Multiplier converting kilometers into this unit
    pub fn per_kilometer(self) -> f64 {
        match self {
            Units::Kilometers => 1.0,
            Units::Meters => 1000.0,
            Units::Miles => 1000.0 / 1609.344,
            Units::NauticalMiles => 1000.0 / 1852.0,
            Units::Yards => 1000.0 / 0.9144,
            Units::Feet => 1000.0 / 0.3048,
        }
    }

    /// Short unit label for reports
    pub fn symbol(self) -> &'static str {
        match self {
            Units::Kilometers => "km",
            Units::Meters => "m",
            Units::Miles => "mi",
            Units::NauticalMiles => "nmi",
            Units::Yards => "yd",
            Units::Feet => "ft",
        }
    }
}

/// Fast bearing/distance estimator valid near one reference latitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheapRuler {
    /// Units per degree of longitude at the reference latitude
    kx: f64,
    /// Units per degree of latitude at the reference latitude
    ky: f64,
    units: Units,
}

impl CheapRuler {
    /// Create a ruler measuring in meters around `ref_lat` (degrees)
    pub fn new(ref_lat: f64) -> Self {
        Self::with_units(ref_lat, Units::Meters)
    }

    /// Create a ruler measuring in the given units around `ref_lat` (degrees)
    pub fn with_units(ref_lat: f64, units: Units) -> Self {
        let lat = if ref_lat.is_finite() {
            ref_lat.clamp(-90.0, 90.0)
        } else {
            tracing::warn!("Non-finite reference latitude {ref_lat}, using the equator");
            0.0
        };

        let m = EQUATORIAL_RADIUS_KM.to_radians() * units.per_kilometer();
        let cos_lat = lat.to_radians().cos();
        // Normal and meridional radii of curvature
        let w2 = 1.0 / (1.0 - E2 * (1.0 - cos_lat * cos_lat));
        let w = w2.sqrt();

        Self {
            kx: m * w * cos_lat,
            ky: m * w * w2 * (1.0 - E2),
            units,
        }
    }

    /// Units the ruler measures in
    pub fn units(&self) -> Units {
        self.units
    }

    /// Local east/north offset from `a` to `b` in ruler units
    #[inline(always)]
    fn offset(&self, a: Coord<f64>, b: Coord<f64>) -> (f64, f64) {
        let dx = wrap_longitude(b.x - a.x) * self.kx;
        let dy = (b.y - a.y) * self.ky;
        (dx, dy)
    }

    /// Distance between two points in ruler units
    #[inline]
    pub fn distance(&self, a: Coord<f64>, b: Coord<f64>) -> f64 {
        let (dx, dy) = self.offset(a, b);
        dx.hypot(dy)
    }

    /// Bearing from `a` to `b` in degrees clockwise from north, in `[0, 360)`
    ///
    /// Identical points have bearing 0.
    #[inline]
    pub fn bearing(&self, a: Coord<f64>, b: Coord<f64>) -> f64 {
        let (dx, dy) = self.offset(a, b);
        if dx == 0.0 && dy == 0.0 {
            return 0.0;
        }
        normalize_bearing(dx.atan2(dy).to_degrees())
    }

    /// Total length of a polyline in ruler units
    pub fn line_distance(&self, line: &LineString<f64>) -> f64 {
        line.lines().map(|l| self.distance(l.start, l.end)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lon: f64, lat: f64) -> Coord<f64> {
        Coord { x: lon, y: lat }
    }

    /// Haversine distance in meters for comparison
    fn haversine_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_008.8;
        let lat1 = a.y.to_radians();
        let lat2 = b.y.to_radians();
        let delta_lat = (b.y - a.y).to_radians();
        let delta_lon = (b.x - a.x).to_radians();
        let h = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * h.sqrt().asin()
    }

    #[test]
    fn test_due_north_at_equator() {
        let ruler = CheapRuler::new(0.0);
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 1.0);

        assert_eq!(ruler.bearing(a, b), 0.0);
        // One degree of latitude on the WGS84 ellipsoid at the equator
        assert!((ruler.distance(a, b) - 110_574.3).abs() < 1.0);
    }

    #[test]
    fn test_cardinal_bearings() {
        let ruler = CheapRuler::new(40.0);
        let origin = coord(-105.0, 40.0);

        assert!((ruler.bearing(origin, coord(-104.99, 40.0)) - 90.0).abs() < 1e-9);
        assert!((ruler.bearing(origin, coord(-105.0, 39.99)) - 180.0).abs() < 1e-9);
        assert!((ruler.bearing(origin, coord(-105.01, 40.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_range() {
        let ruler = CheapRuler::new(51.5);
        let origin = coord(-0.1278, 51.5074);
        for i in 0..360 {
            let angle = (i as f64).to_radians();
            let target = coord(origin.x + 0.001 * angle.sin(), origin.y + 0.001 * angle.cos());
            let bearing = ruler.bearing(origin, target);
            assert!((0.0..360.0).contains(&bearing), "bearing {bearing} out of range");
        }
    }

    #[test]
    fn test_identical_points() {
        let ruler = CheapRuler::new(39.7);
        let p = coord(-104.99, 39.74);
        assert_eq!(ruler.distance(p, p), 0.0);
        assert_eq!(ruler.bearing(p, p), 0.0);
    }

    #[test]
    fn test_close_to_haversine_at_city_scale() {
        let ruler = CheapRuler::new(39.74);
        let a = coord(-104.99, 39.74);
        let b = coord(-104.95, 39.77);

        let cheap = ruler.distance(a, b);
        let reference = haversine_distance(a, b);
        assert!((cheap - reference).abs() / reference < 0.01);
    }

    #[test]
    fn test_longitude_wraps_across_antimeridian() {
        let ruler = CheapRuler::new(0.0);
        let west = coord(179.999, 0.0);
        let east = coord(-179.999, 0.0);

        assert!(ruler.distance(west, east) < 300.0);
        assert!((ruler.bearing(west, east) - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_units() {
        let meters = CheapRuler::new(45.0);
        let kilometers = CheapRuler::with_units(45.0, Units::Kilometers);
        let a = coord(7.0, 45.0);
        let b = coord(7.01, 45.01);

        let ratio = meters.distance(a, b) / kilometers.distance(a, b);
        assert!((ratio - 1000.0).abs() < 1e-6);
        assert_eq!(kilometers.units(), Units::Kilometers);
        assert_eq!(Units::default(), Units::Meters);
    }

    #[test]
    fn test_line_distance() {
        let ruler = CheapRuler::new(0.0);
        let line = LineString::from(vec![(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        let single = ruler.distance(coord(0.0, 0.0), coord(0.0, 1.0));
        assert!((ruler.line_distance(&line) - 2.0 * single).abs() < 1e-6);

        let empty = LineString::<f64>::new(vec![]);
        assert_eq!(ruler.line_distance(&empty), 0.0);
    }

    #[test]
    fn test_non_finite_reference_latitude() {
        let ruler = CheapRuler::new(f64::NAN);
        assert_eq!(ruler, CheapRuler::new(0.0));
    }
}

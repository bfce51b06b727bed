//! Utility functions for angle conversions and rectangle checks

use geo::Rect;

/// Full turn in degrees
pub const FULL_TURN_DEGREES: f64 = 360.0;

/// Offset between compass angles (0 = north) and canvas angles (0 = east)
pub const SCREEN_ANGLE_OFFSET_DEGREES: f64 = -90.0;

/// Wrap a longitude difference into `[-180, 180]`
///
/// Keeps segments that straddle the antimeridian short instead of going
/// around the whole globe.
#[inline(always)]
pub fn wrap_longitude(deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&deg) {
        return deg;
    }
    let wrapped = (deg + 180.0).rem_euclid(FULL_TURN_DEGREES) - 180.0;
    // rem_euclid maps +180 to -180, keep the sign of the input
    if wrapped == -180.0 && deg > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Normalize any finite angle in degrees into `[0, 360)`
#[inline(always)]
pub fn normalize_bearing(deg: f64) -> f64 {
    let normalized = deg.rem_euclid(FULL_TURN_DEGREES);
    // Tiny negative inputs round up to exactly 360.0
    if normalized >= FULL_TURN_DEGREES {
        0.0
    } else {
        normalized
    }
}

/// Convert a compass angle (degrees, 0 = north, clockwise) into canvas radians
///
/// Canvas angles use a y-down frame where 0 rad points east and angles grow
/// clockwise, so only the -90° offset is needed.
#[inline(always)]
pub fn compass_to_screen_radians(deg: f64) -> f64 {
    (deg + SCREEN_ANGLE_OFFSET_DEGREES).to_radians()
}

/// Check if a coordinate lies inside a rectangle, boundary included
#[cfg(test)]
pub(crate) fn rect_contains_inclusive(
    rect: &Rect<f64>,
    coord: geo::Coord<f64>,
    tolerance: f64,
) -> bool {
    let min = rect.min();
    let max = rect.max();
    coord.x >= min.x - tolerance
        && coord.x <= max.x + tolerance
        && coord.y >= min.y - tolerance
        && coord.y <= max.y + tolerance
}

/// Check if two rectangles overlap, touching edges included
#[inline(always)]
pub fn rects_overlap(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x
        && b.min().x <= a.max().x
        && a.min().y <= b.max().y
        && b.min().y <= a.max().y
}

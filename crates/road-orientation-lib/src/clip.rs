//! Viewport clipping of polylines
//!
//! Cohen-Sutherland outcodes extended to polylines: every segment is either
//! accepted, rejected, or shortened against the crossed edge until one of the
//! two happens. Each time the line leaves the box the current fragment is
//! closed, so a road crossing the viewport several times yields several
//! fragments. Off-screen road length therefore never reaches the histogram.

use crate::RoadGeometry;
use geo::{Coord, LineString, MultiLineString, Rect};

const LEFT: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const BOTTOM: u8 = 0b0100;
const TOP: u8 = 0b1000;

/// Outcode of a point relative to the box; 0 means inside (boundary included)
#[inline(always)]
fn outcode(p: Coord<f64>, bbox: &Rect<f64>) -> u8 {
    let mut code = 0;
    if p.x < bbox.min().x {
        code |= LEFT;
    } else if p.x > bbox.max().x {
        code |= RIGHT;
    }
    if p.y < bbox.min().y {
        code |= BOTTOM;
    } else if p.y > bbox.max().y {
        code |= TOP;
    }
    code
}

/// Move `a` along segment a-b onto the first edge named by `edge`
#[inline(always)]
fn intersect(a: Coord<f64>, b: Coord<f64>, edge: u8, bbox: &Rect<f64>) -> Coord<f64> {
    let (min, max) = (bbox.min(), bbox.max());
    if edge & TOP != 0 {
        Coord {
            x: a.x + (b.x - a.x) * (max.y - a.y) / (b.y - a.y),
            y: max.y,
        }
    } else if edge & BOTTOM != 0 {
        Coord {
            x: a.x + (b.x - a.x) * (min.y - a.y) / (b.y - a.y),
            y: min.y,
        }
    } else if edge & RIGHT != 0 {
        Coord {
            x: max.x,
            y: a.y + (b.y - a.y) * (max.x - a.x) / (b.x - a.x),
        }
    } else {
        Coord {
            x: min.x,
            y: a.y + (b.y - a.y) * (min.x - a.x) / (b.x - a.x),
        }
    }
}

/// Clip a polyline to a bounding box
///
/// Returns zero, one or several fragments, each in input point order.
/// Consecutive identical points are collapsed, so a vertex lying on the edge
/// is not repeated by the exit or entry point computed for it, and fragments
/// that shrink to a single point (a line only touching the box) are dropped.
/// A line entirely inside the box comes back unchanged as a single fragment;
/// lines with fewer than two points produce nothing.
pub fn clip_line(line: &LineString<f64>, bbox: &Rect<f64>) -> Vec<LineString<f64>> {
    let points = &line.0;
    let mut fragments = Vec::new();
    if points.len() < 2 {
        return fragments;
    }

    let last = points.len() - 1;
    let mut part: Vec<Coord<f64>> = Vec::new();
    let mut code_a = outcode(points[0], bbox);

    for i in 1..points.len() {
        let mut a = points[i - 1];
        let mut b = points[i];
        let last_code = outcode(b, bbox);
        let mut code_b = last_code;

        loop {
            if code_a | code_b == 0 {
                // Accepted
                push_distinct(&mut part, a);
                if code_b != last_code {
                    // The segment leaves the box: close the fragment at the exit point
                    push_distinct(&mut part, b);
                    if i < last {
                        close_fragment(&mut part, &mut fragments);
                    }
                } else if i == last {
                    push_distinct(&mut part, b);
                }
                break;
            } else if code_a & code_b != 0 {
                // Both ends share an outside half-plane
                break;
            } else if code_a != 0 {
                a = intersect(a, b, code_a, bbox);
                code_a = outcode(a, bbox);
            } else {
                b = intersect(a, b, code_b, bbox);
                code_b = outcode(b, bbox);
            }
        }

        code_a = last_code;
    }

    close_fragment(&mut part, &mut fragments);
    fragments
}

#[inline(always)]
fn push_distinct(part: &mut Vec<Coord<f64>>, p: Coord<f64>) {
    if part.last() != Some(&p) {
        part.push(p);
    }
}

/// Move the fragment being built into `fragments` unless it is a single point
#[inline(always)]
fn close_fragment(part: &mut Vec<Coord<f64>>, fragments: &mut Vec<LineString<f64>>) {
    let points = std::mem::take(part);
    if points.len() >= 2 {
        fragments.push(LineString::new(points));
    }
}

/// Clip every part of a multi-line to a bounding box
pub fn clip_lines(lines: &MultiLineString<f64>, bbox: &Rect<f64>) -> Vec<LineString<f64>> {
    lines
        .iter()
        .flat_map(|line| clip_line(line, bbox))
        .collect()
}

/// Clip a road geometry to an optional viewport
///
/// A missing viewport is treated as an empty box. Returns `None` for
/// geometry that is not line-shaped.
pub fn clip_geometry(
    geometry: &RoadGeometry,
    bbox: Option<&Rect<f64>>,
) -> Option<Vec<LineString<f64>>> {
    let bbox = match bbox {
        Some(bbox) => bbox,
        None => {
            return match geometry {
                RoadGeometry::Unsupported { .. } => None,
                _ => Some(Vec::new()),
            };
        }
    };

    match geometry {
        RoadGeometry::Line(line) => Some(clip_line(line, bbox)),
        RoadGeometry::MultiLine(lines) => Some(clip_lines(lines, bbox)),
        RoadGeometry::Unsupported { .. } => None,
    }
}

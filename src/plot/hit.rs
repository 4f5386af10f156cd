//! Cursor hit-testing against a scaled series.
//!
//! A cursor close to a data point selects that point; otherwise a cursor
//! close to the polyline between two consecutive points selects the segment.

use serde::{Deserialize, Serialize};

use super::scale::Point;

/// Default hit radius for points and segments, in display units.
pub const DEFAULT_HIT_RADIUS: f64 = 15.0;

/// Squared segment lengths below this are treated as a single point.
const DEGENERATE_SEGMENT: f64 = 1e-12;

/// Outcome of a proximity query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum HitResult {
    /// The cursor is on the data point at this index.
    NearestPoint(usize),
    /// The cursor is on the segment from this index to the next.
    NearestSegment(usize),
    /// Nothing within reach.
    #[default]
    None,
}

/// Maximum distances at which points and segments register a hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitRadii {
    pub point: f64,
    pub segment: f64,
}

impl Default for HitRadii {
    fn default() -> Self {
        Self {
            point: DEFAULT_HIT_RADIUS,
            segment: DEFAULT_HIT_RADIUS,
        }
    }
}

/// Distance from `m` to the segment `a`-`b` using the clamped projection.
pub fn distance_to_segment(m: Point, a: Point, b: Point) -> f64 {
    let ab_x = b.x - a.x;
    let ab_y = b.y - a.y;
    let ab2 = ab_x * ab_x + ab_y * ab_y;

    let t = if ab2 > DEGENERATE_SEGMENT {
        (((m.x - a.x) * ab_x + (m.y - a.y) * ab_y) / ab2).clamp(0.0, 1.0)
    } else {
        0.0
    };

    m.distance(Point::new(a.x + t * ab_x, a.y + t * ab_y))
}

/// Index and distance of the point closest to `cursor` (earliest on ties).
pub fn nearest_point(points: &[Point], cursor: Point) -> Option<(usize, f64)> {
    points
        .iter()
        .map(|&p| cursor.distance(p))
        .enumerate()
        .fold(None, |best, (i, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((i, d)),
        })
}

/// Left endpoint index and distance of the segment closest to `cursor`.
pub fn nearest_segment(points: &[Point], cursor: Point) -> Option<(usize, f64)> {
    points
        .windows(2)
        .map(|pair| distance_to_segment(cursor, pair[0], pair[1]))
        .enumerate()
        .fold(None, |best, (i, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((i, d)),
        })
}

/// Resolve a cursor position against `points`.
///
/// Points take priority: a point within `radii.point` wins even when the
/// cursor lies closer to a segment.
pub fn hit_test(points: &[Point], cursor: Point, radii: HitRadii) -> HitResult {
    if let Some((idx, d)) = nearest_point(points, cursor) {
        if d <= radii.point {
            return HitResult::NearestPoint(idx);
        }
    }
    match nearest_segment(points, cursor) {
        Some((idx, d)) if d <= radii.segment => HitResult::NearestSegment(idx),
        _ => HitResult::None,
    }
}

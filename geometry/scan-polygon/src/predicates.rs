//! Orientation predicates shared by hull, area and containment code.

use nalgebra::Point2;

use crate::error::{PolygonError, PolygonResult};

/// Twice the signed area of triangle `(a, b, c)`; positive for a left turn.
#[inline]
pub(crate) fn orient(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Relative tolerance for orientation tests, scaled by the squared extent.
const RELATIVE_EPSILON: f64 = 1e-12;

/// Tolerance for orientation results on a specific point set.
///
/// `orient` has units of length squared, so the threshold scales with the
/// squared bounding-box extent of the input.
pub(crate) fn orientation_epsilon(points: &[Point2<f64>]) -> f64 {
    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    let extent = (max.x - min.x).max(max.y - min.y);
    if extent.is_finite() && extent > 0.0 {
        RELATIVE_EPSILON * extent * extent
    } else {
        0.0
    }
}

/// Reject NaN and infinite coordinates.
pub(crate) fn ensure_finite(points: &[Point2<f64>]) -> PolygonResult<()> {
    match points
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        Some(index) => Err(PolygonError::NonFinite { index }),
        None => Ok(()),
    }
}

/// Whether `p`, known to be collinear with `a`-`b`, lies within the segment box.
fn within_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed segment intersection test, touching and collinear overlap included.
pub(crate) fn segments_intersect(
    p1: &Point2<f64>,
    p2: &Point2<f64>,
    q1: &Point2<f64>,
    q2: &Point2<f64>,
    eps: f64,
) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    let straddles = |a: f64, b: f64| (a > eps && b < -eps) || (a < -eps && b > eps);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    (d1.abs() <= eps && within_segment(q1, q2, p1))
        || (d2.abs() <= eps && within_segment(q1, q2, p2))
        || (d3.abs() <= eps && within_segment(p1, p2, q1))
        || (d4.abs() <= eps && within_segment(p1, p2, q2))
}

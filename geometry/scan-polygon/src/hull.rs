//! Convex hull by Graham scan.

use nalgebra::{Point2, Point3};

use crate::error::{PolygonError, PolygonResult};
use crate::predicates::{ensure_finite, orient};

/// Convex hull of the XY projection of `points`.
///
/// Returns hull vertices in counter-clockwise order starting at the lowest
/// point (ties broken by lowest x). Points that lie on a hull edge are not
/// hull vertices. The original 3D points are returned, so z values survive.
///
/// # Errors
///
/// - [`PolygonError::InsufficientPoints`] for fewer than three points
/// - [`PolygonError::Degenerate`] if every point is collinear or coincident
/// - [`PolygonError::NonFinite`] for NaN or infinite coordinates
///
/// # Example
///
/// ```
/// use scan_polygon::convex_hull;
/// use nalgebra::Point3;
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 0.2, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let hull = convex_hull(&points).unwrap();
/// assert_eq!(hull.len(), 3);
/// ```
pub fn convex_hull(points: &[Point3<f64>]) -> PolygonResult<Vec<Point3<f64>>> {
    let planar: Vec<Point2<f64>> = points.iter().map(|p| Point2::new(p.x, p.y)).collect();
    let order = convex_hull_2d(&planar)?;
    Ok(order.into_iter().map(|i| points[i]).collect())
}

/// Convex hull of 2D points, as indices into `points` in counter-clockwise order.
///
/// # Errors
///
/// Same conditions as [`convex_hull`].
pub fn convex_hull_2d(points: &[Point2<f64>]) -> PolygonResult<Vec<usize>> {
    if points.len() < 3 {
        return Err(PolygonError::need_three(points.len()));
    }
    ensure_finite(points)?;

    // Lowest y, then lowest x
    let anchor = (0..points.len())
        .min_by(|&a, &b| {
            points[a]
                .y
                .total_cmp(&points[b].y)
                .then(points[a].x.total_cmp(&points[b].x))
        })
        .ok_or(PolygonError::Degenerate)?;
    let origin = points[anchor];

    // Every other point sits at a polar angle in [0, pi] around the anchor.
    // Points coincident with the anchor sort first and get popped by the sweep.
    let mut order: Vec<(usize, f64, f64)> = (0..points.len())
        .filter(|&i| i != anchor)
        .map(|i| {
            let d = points[i] - origin;
            let dist_sq = d.norm_squared();
            let angle = if dist_sq == 0.0 { -1.0 } else { d.y.atan2(d.x) };
            (i, angle, dist_sq)
        })
        .collect();
    order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)));

    let mut stack: Vec<usize> = Vec::with_capacity(points.len());
    stack.push(anchor);
    for (i, _, _) in order {
        while stack.len() >= 2 {
            let top = stack[stack.len() - 1];
            let below = stack[stack.len() - 2];
            if orient(&points[below], &points[top], &points[i]) <= 0.0 {
                stack.pop();
            } else {
                break;
            }
        }
        stack.push(i);
    }

    if stack.len() < 3 {
        return Err(PolygonError::Degenerate);
    }
    Ok(stack)
}

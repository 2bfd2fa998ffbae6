//! Point containment.

use nalgebra::{Point2, Point3};

/// Even-odd containment test on the XY projection.
///
/// Boundaries with fewer than three vertices contain nothing. Points exactly
/// on an edge may report either side.
///
/// # Example
///
/// ```
/// use scan_polygon::point_in_polygon;
/// use nalgebra::Point3;
///
/// let square = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// assert!(point_in_polygon(&Point3::new(0.5, 0.5, 9.0), &square));
/// assert!(!point_in_polygon(&Point3::new(1.5, 0.5, 0.0), &square));
/// ```
#[must_use]
pub fn point_in_polygon(point: &Point3<f64>, boundary: &[Point3<f64>]) -> bool {
    let n = boundary.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        if crosses_ray(point.x, point.y, boundary[i].x, boundary[i].y, boundary[j].x, boundary[j].y) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Even-odd containment test for 2D points.
#[must_use]
pub fn point_in_polygon_2d(point: &Point2<f64>, boundary: &[Point2<f64>]) -> bool {
    let n = boundary.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        if crosses_ray(point.x, point.y, boundary[i].x, boundary[i].y, boundary[j].x, boundary[j].y) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Whether edge `(xi, yi)-(xj, yj)` crosses the +x ray from `(px, py)`.
#[inline]
fn crosses_ray(px: f64, py: f64, xi: f64, yi: f64, xj: f64, yj: f64) -> bool {
    (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi
}

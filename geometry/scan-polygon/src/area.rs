//! Polygon area by ear clipping.

use nalgebra::{Point2, Point3};

use crate::error::{PolygonError, PolygonResult};
use crate::predicates::{ensure_finite, orient, orientation_epsilon, segments_intersect};
use crate::projection::Projection;

/// Signed shoelace area of a 2D ring; positive when counter-clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice * 0.5
}

/// Area of a simple polygon given by its XY projection.
///
/// The boundary is an ordered ring in either winding; it is not closed by
/// repeating the first vertex. Consecutive duplicate vertices are ignored and
/// an all-collinear boundary has zero area.
///
/// # Errors
///
/// - [`PolygonError::InsufficientPoints`] for fewer than three vertices
/// - [`PolygonError::SelfIntersecting`] if non-adjacent edges cross or touch
/// - [`PolygonError::TriangulationFailed`] if no ear can be found
/// - [`PolygonError::NonFinite`] for NaN or infinite coordinates
///
/// # Example
///
/// ```
/// use scan_polygon::polygon_area;
/// use nalgebra::Point3;
///
/// // L-shaped hexagon
/// let boundary = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
///     Point3::new(2.0, 1.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(1.0, 2.0, 0.0),
///     Point3::new(0.0, 2.0, 0.0),
/// ];
/// assert!((polygon_area(&boundary).unwrap() - 3.0).abs() < 1e-12);
/// ```
pub fn polygon_area(boundary: &[Point3<f64>]) -> PolygonResult<f64> {
    polygon_area_2d(&Projection::xy().project_all(boundary))
}

/// Area of a simple 2D polygon by ear clipping.
///
/// # Errors
///
/// Same conditions as [`polygon_area`].
pub fn polygon_area_2d(boundary: &[Point2<f64>]) -> PolygonResult<f64> {
    let triangles = triangulate_2d(boundary)?;
    Ok(triangles
        .iter()
        .map(|&[a, b, c]| orient(&boundary[a], &boundary[b], &boundary[c]).abs() * 0.5)
        .sum())
}

/// Area of a 3D boundary measured in its least-squares plane.
///
/// Use this for boundaries that follow a curved surface; for boundaries
/// that already lie in the XY plane it agrees with [`polygon_area`].
///
/// # Errors
///
/// Same conditions as [`polygon_area`].
pub fn surface_area(boundary: &[Point3<f64>]) -> PolygonResult<f64> {
    let projection = Projection::best_fit(boundary)?;
    polygon_area_2d(&projection.project_all(boundary))
}

/// Length of the closed boundary in 3D.
#[must_use]
pub fn perimeter(boundary: &[Point3<f64>]) -> f64 {
    let n = boundary.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| (boundary[(i + 1) % n] - boundary[i]).norm())
        .sum()
}

/// Ear-clipping triangulation of the XY projection of `boundary`.
///
/// Triangles index into `boundary` and are counter-clockwise in XY.
///
/// # Errors
///
/// Same conditions as [`polygon_area`].
pub fn triangulate(boundary: &[Point3<f64>]) -> PolygonResult<Vec<[usize; 3]>> {
    triangulate_2d(&Projection::xy().project_all(boundary))
}

/// Ear-clipping triangulation of a 2D ring.
///
/// Returns an empty list for rings with zero area. Each clip removes one
/// vertex, and every pass over the remaining ring either clips or fails, so
/// the work is bounded by `n^2` ear tests.
///
/// # Errors
///
/// Same conditions as [`polygon_area`].
pub fn triangulate_2d(boundary: &[Point2<f64>]) -> PolygonResult<Vec<[usize; 3]>> {
    if boundary.len() < 3 {
        return Err(PolygonError::need_three(boundary.len()));
    }
    ensure_finite(boundary)?;

    let mut ring = distinct_ring(boundary);
    if ring.len() < 3 {
        return Ok(Vec::new());
    }

    let eps = orientation_epsilon(boundary);
    let ring_points: Vec<Point2<f64>> = ring.iter().map(|&i| boundary[i]).collect();
    if all_collinear(&ring_points, eps) {
        return Ok(Vec::new());
    }
    let signed = signed_area_2d(&ring_points);

    if let Some((first, second)) = find_crossing(&ring_points, eps) {
        return Err(PolygonError::SelfIntersecting {
            first_edge: ring[first],
            second_edge: ring[second],
        });
    }
    if signed.abs() <= eps {
        return Ok(Vec::new());
    }
    if signed < 0.0 {
        ring.reverse();
    }

    let mut triangles = Vec::with_capacity(ring.len() - 2);
    while ring.len() > 3 {
        let m = ring.len();
        let mut clipped = false;

        for k in 0..m {
            let a = ring[(k + m - 1) % m];
            let b = ring[k];
            let c = ring[(k + 1) % m];
            let turn = orient(&boundary[a], &boundary[b], &boundary[c]);

            if turn.abs() <= eps {
                // Straight-through vertex; dropping it does not change the area
                ring.remove(k);
                clipped = true;
                break;
            }
            if turn < 0.0 {
                continue;
            }

            let blocked = ring.iter().any(|&r| {
                r != a && r != b && r != c && inside_triangle(boundary, [a, b, c], r, eps)
            });
            if !blocked {
                triangles.push([a, b, c]);
                ring.remove(k);
                clipped = true;
                break;
            }
        }

        if !clipped {
            return Err(PolygonError::TriangulationFailed {
                remaining: ring.len(),
            });
        }
    }

    if let [a, b, c] = ring[..]
        && orient(&boundary[a], &boundary[b], &boundary[c]).abs() > eps
    {
        triangles.push([a, b, c]);
    }

    Ok(triangles)
}

/// Indices of the ring with consecutive duplicates removed, wraparound included.
fn distinct_ring(boundary: &[Point2<f64>]) -> Vec<usize> {
    let mut ring: Vec<usize> = Vec::with_capacity(boundary.len());
    for (i, p) in boundary.iter().enumerate() {
        if ring.last().is_none_or(|&last| boundary[last] != *p) {
            ring.push(i);
        }
    }
    while ring.len() > 1 && ring.first().map(|&i| boundary[i]) == ring.last().map(|&i| boundary[i])
    {
        ring.pop();
    }
    ring
}

/// Whether every vertex lies on the line through the first two.
fn all_collinear(ring: &[Point2<f64>], eps: f64) -> bool {
    match ring {
        [first, second, rest @ ..] => rest.iter().all(|p| orient(first, second, p).abs() <= eps),
        _ => true,
    }
}

/// First pair of edges that violates simplicity, as ring edge indices.
///
/// Non-adjacent edges must not meet at all. Adjacent edges must not fold
/// back over each other.
fn find_crossing(ring: &[Point2<f64>], eps: f64) -> Option<(usize, usize)> {
    let n = ring.len();
    if n < 3 {
        return None;
    }

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let c = ring[(i + 2) % n];
        let folds = orient(&a, &b, &c).abs() <= eps && (b - a).dot(&(c - b)) < 0.0;
        if folds {
            return Some((i, (i + 1) % n));
        }
    }

    for i in 0..n {
        for j in (i + 2)..n {
            // Edge n-1 is adjacent to edge 0
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_intersect(&ring[i], &ring[(i + 1) % n], &ring[j], &ring[(j + 1) % n], eps)
            {
                return Some((i, j));
            }
        }
    }
    None
}

/// Whether vertex `r` lies inside or on the counter-clockwise triangle `tri`.
fn inside_triangle(points: &[Point2<f64>], tri: [usize; 3], r: usize, eps: f64) -> bool {
    let [a, b, c] = tri.map(|i| points[i]);
    let p = points[r];
    orient(&a, &b, &p) >= -eps && orient(&b, &c, &p) >= -eps && orient(&c, &a, &p) >= -eps
}

//! Projection of 3D boundaries onto a plane.

use nalgebra::{Matrix3, Point2, Point3, Vector3};

use crate::error::{PolygonError, PolygonResult};

/// An orthonormal frame on a plane, used to flatten 3D points into 2D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Point on the plane mapped to the 2D origin.
    pub origin: Point3<f64>,
    /// First in-plane axis.
    pub u: Vector3<f64>,
    /// Second in-plane axis.
    pub v: Vector3<f64>,
    /// Unit plane normal, `u x v`.
    pub normal: Vector3<f64>,
}

impl Projection {
    /// Projection that drops the z coordinate.
    #[must_use]
    pub fn xy() -> Self {
        Self {
            origin: Point3::origin(),
            u: Vector3::x(),
            v: Vector3::y(),
            normal: Vector3::z(),
        }
    }

    /// Projection onto the plane through `origin` with the given normal.
    ///
    /// Returns `None` if the normal has zero length.
    #[must_use]
    pub fn from_plane(origin: Point3<f64>, normal: &Vector3<f64>) -> Option<Self> {
        let normal = normal.try_normalize(f64::EPSILON)?;

        // Any vector not parallel to the normal seeds the in-plane basis
        let u = if normal.x.abs() < 0.9 {
            Vector3::x().cross(&normal).normalize()
        } else {
            Vector3::y().cross(&normal).normalize()
        };
        let v = normal.cross(&u);

        Some(Self {
            origin,
            u,
            v,
            normal,
        })
    }

    /// Least-squares plane through `points`.
    ///
    /// The normal is the principal axis of least variance of the point
    /// covariance. It is oriented with a non-negative z component so that
    /// nearly-horizontal boundaries keep their XY winding.
    ///
    /// # Errors
    ///
    /// Returns [`PolygonError::InsufficientPoints`] for fewer than three
    /// points and [`PolygonError::NonFinite`] for NaN or infinite coordinates.
    pub fn best_fit(points: &[Point3<f64>]) -> PolygonResult<Self> {
        if points.len() < 3 {
            return Err(PolygonError::need_three(points.len()));
        }
        if let Some(index) = points.iter().position(|p| !p.coords.iter().all(|c| c.is_finite())) {
            return Err(PolygonError::NonFinite { index });
        }

        #[allow(clippy::cast_precision_loss)]
        // Precision: boundary vertex counts are far below 2^52
        let n = points.len() as f64;
        let centroid = Point3::from(
            points
                .iter()
                .fold(Vector3::zeros(), |acc, p| acc + p.coords)
                / n,
        );

        let mut cov = Matrix3::zeros();
        for p in points {
            let d = p - centroid;
            cov += d * d.transpose();
        }
        cov /= n;

        let eigen = cov.symmetric_eigen();
        let smallest = eigen
            .eigenvalues
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map_or(2, |(i, _)| i);
        let mut normal: Vector3<f64> = eigen.eigenvectors.column(smallest).into_owned();
        if normal.z < 0.0 {
            normal = -normal;
        }

        Self::from_plane(centroid, &normal).ok_or(PolygonError::Degenerate)
    }

    /// Coordinates of `point` in the plane frame.
    #[must_use]
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        let d = point - self.origin;
        Point2::new(d.dot(&self.u), d.dot(&self.v))
    }

    /// Project every point in order.
    #[must_use]
    pub fn project_all(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::xy()
    }
}

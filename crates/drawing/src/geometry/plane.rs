//! Best-fit plane estimation
//!
//! The normal is the eigenvector of the smallest eigenvalue of the point
//! covariance matrix, found with a cyclic Jacobi solve in f64.

use glam::{DVec3, Vec3};
use tracing::debug;

use crate::constants::{COLLINEAR_EIGEN_RATIO, JACOBI_MAX_SWEEPS, MIN_POLYGON_POINTS};
use crate::error::GeometryError;

/// An infinite plane through `point` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    /// Build a plane, normalizing `normal`
    pub fn new(normal: Vec3, point: Vec3) -> Result<Self, GeometryError> {
        let normal = normal.try_normalize().ok_or(GeometryError::DegenerateBasis)?;
        Ok(Self { normal, point })
    }

    /// Signed distance of `p` from the plane along the normal
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }

    /// Orthogonal projection of `p` onto the plane
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p - self.normal * self.signed_distance(p)
    }
}

/// Plane fit plus how well-separated the smallest eigenvalue is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneFit {
    pub plane: Plane,
    /// Eigenvalues of the covariance matrix, ascending
    pub eigenvalues: [f64; 3],
}

impl PlaneFit {
    /// Gap between the two smallest eigenvalues relative to the largest.
    ///
    /// Close to zero means the normal is poorly determined (the points are
    /// nearly isotropic across two axes).
    pub fn confidence(&self) -> f64 {
        let [l0, l1, l2] = self.eigenvalues;
        if l2 <= 0.0 { 0.0 } else { (l1 - l0) / l2 }
    }
}

/// Fit a plane through `points` by principal component analysis.
pub fn best_fit_plane(points: &[Vec3]) -> Result<PlaneFit, GeometryError> {
    if points.len() < MIN_POLYGON_POINTS {
        return Err(GeometryError::InsufficientPoints {
            needed: MIN_POLYGON_POINTS,
            got: points.len(),
        });
    }

    let centroid = points.iter().fold(DVec3::ZERO, |acc, p| acc + p.as_dvec3())
        / points.len() as f64;

    let mut cov = [[0.0f64; 3]; 3];
    for p in points {
        let r = (p.as_dvec3() - centroid).to_array();
        for i in 0..3 {
            for j in i..3 {
                cov[i][j] += r[i] * r[j];
            }
        }
    }
    cov[1][0] = cov[0][1];
    cov[2][0] = cov[0][2];
    cov[2][1] = cov[1][2];

    let (values, vectors) = symmetric_eigen3(cov);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let eigenvalues = [values[order[0]], values[order[1]], values[order[2]]];

    // Two vanishing eigenvalues: the points span a line (or a single point).
    if eigenvalues[2] <= 0.0 || eigenvalues[1] <= eigenvalues[2] * COLLINEAR_EIGEN_RATIO {
        return Err(GeometryError::Collinear);
    }

    let normal = vectors[order[0]].as_vec3();
    let plane = Plane::new(normal, centroid.as_vec3())?;
    let fit = PlaneFit { plane, eigenvalues };

    debug!(
        "best_fit_plane: {} points, normal=({:.3}, {:.3}, {:.3}), confidence={:.3}",
        points.len(),
        plane.normal.x,
        plane.normal.y,
        plane.normal.z,
        fit.confidence()
    );

    Ok(fit)
}

/// Eigen-decomposition of a symmetric 3x3 matrix.
///
/// Returns unsorted eigenvalues and the matching unit eigenvectors.
fn symmetric_eigen3(mut a: [[f64; 3]; 3]) -> ([f64; 3], [DVec3; 3]) {
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    let scale: f64 = a.iter().flatten().map(|x| x * x).sum();

    for _ in 0..JACOBI_MAX_SWEEPS {
        let off = a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2];
        if off <= scale * f64::EPSILON * f64::EPSILON {
            break;
        }

        for (p, q) in [(0, 1), (0, 2), (1, 2)] {
            let apq = a[p][q];
            if apq == 0.0 {
                continue;
            }

            let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            for row in a.iter_mut() {
                let (kp, kq) = (row[p], row[q]);
                row[p] = c * kp - s * kq;
                row[q] = s * kp + c * kq;
            }
            for k in 0..3 {
                let (pk, qk) = (a[p][k], a[q][k]);
                a[p][k] = c * pk - s * qk;
                a[q][k] = s * pk + c * qk;
            }
            for row in v.iter_mut() {
                let (kp, kq) = (row[p], row[q]);
                row[p] = c * kp - s * kq;
                row[q] = s * kp + c * kq;
            }
        }
    }

    let column = |j: usize| DVec3::new(v[0][j], v[1][j], v[2][j]).normalize_or_zero();
    ([a[0][0], a[1][1], a[2][2]], [column(0), column(1), column(2)])
}

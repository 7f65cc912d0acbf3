//! 3D <-> 2D mapping through an orthonormal in-plane basis

use glam::{Vec2, Vec3};

use super::plane::Plane;
use crate::constants::{BASIS_PARALLEL_EPSILON, WORLD_FORWARD, WORLD_UP};
use crate::error::GeometryError;

/// Orthonormal frame on a plane: `origin` plus `right`/`up` in-plane axes.
///
/// `right x up` points along the plane normal, so counter-clockwise in 2D
/// is counter-clockwise seen from the normal side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneBasis {
    pub origin: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub normal: Vec3,
}

impl PlaneBasis {
    /// Build the basis for `plane` anchored at `origin`.
    ///
    /// `origin` is used as given; callers pass a point on the plane.
    pub fn new(plane: &Plane, origin: Vec3) -> Result<Self, GeometryError> {
        let normal = plane.normal;
        if !normal.is_finite() || normal.length_squared() == 0.0 {
            return Err(GeometryError::DegenerateBasis);
        }

        let mut right = normal.cross(WORLD_UP);
        if right.length_squared() < BASIS_PARALLEL_EPSILON {
            right = normal.cross(WORLD_FORWARD);
        }
        let right = right.try_normalize().ok_or(GeometryError::DegenerateBasis)?;
        let up = normal.cross(right).normalize();

        Ok(Self {
            origin,
            right,
            up,
            normal: right.cross(up),
        })
    }

    /// 2D coordinates of `p` in this frame
    pub fn project(&self, p: Vec3) -> Vec2 {
        let local = p - self.origin;
        Vec2::new(local.dot(self.right), local.dot(self.up))
    }

    /// Inverse of [`project`](Self::project) for points on the plane
    pub fn reproject(&self, p: Vec2) -> Vec3 {
        self.origin + self.right * p.x + self.up * p.y
    }
}

/// Project every point into the plane's 2D frame.
///
/// The frame origin is the plane point closest to `points[0]`.
pub fn project_to_plane(
    points: &[Vec3],
    plane: &Plane,
) -> Result<(Vec<Vec2>, PlaneBasis), GeometryError> {
    let first = points.first().ok_or(GeometryError::InsufficientPoints {
        needed: 1,
        got: 0,
    })?;
    let basis = PlaneBasis::new(plane, plane.closest_point(*first))?;
    let projected = points.iter().map(|p| basis.project(*p)).collect();
    Ok((projected, basis))
}

/// Map 2D points back onto the plane.
pub fn reproject(points: &[Vec2], basis: &PlaneBasis) -> Vec<Vec3> {
    points.iter().map(|p| basis.reproject(*p)).collect()
}

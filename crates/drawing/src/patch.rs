//! Planar patch builder
//!
//! Collects the points of one stroke and, on every accepted point, rebuilds a
//! flat polygon mesh through them from scratch:
//!
//! 1. plane: PCA fit of all points ([`OrderingStrategy::Hull`]) or the plane
//!    fixed at stroke start facing the device ([`OrderingStrategy::Angular`])
//! 2. project to 2D, order into a polygon, ear-clip
//! 3. reproject onto the plane and replace the mesh wholesale
//!
//! A failed rebuild keeps the previous mesh.

use glam::{Affine3A, Quat, Vec2, Vec3};
use tracing::{debug, warn};

use airdraw_config::PatchConfig;

use crate::constants::DEVICE_FORWARD;
use crate::error::GeometryError;
use crate::geometry::{
    OrderingStrategy, Plane, PlaneBasis, best_fit_plane, project_to_plane, triangulate,
};
use crate::mesh::MeshBuffer;
use crate::types::Rgba;

/// Whether the builder is collecting points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchState {
    Idle,
    Drawing,
}

/// Flat "paint daub" mesh rebuilt from all points of the current stroke
#[derive(Debug, Clone)]
pub struct PlanarPatchBuilder {
    strategy: OrderingStrategy,
    min_spacing: f32,
    state: PatchState,
    color: Rgba,
    points: Vec<Vec3>,
    /// Plane chosen at stroke start, used by angular ordering
    fixed_plane: Option<Plane>,
    /// Side fitted planes must face, so rebuilds keep one winding
    facing: Vec3,
    mesh: MeshBuffer,
}

impl PlanarPatchBuilder {
    pub fn new(config: &PatchConfig, strategy: OrderingStrategy) -> Self {
        Self {
            strategy,
            min_spacing: config.min_spacing,
            state: PatchState::Idle,
            color: [1.0; 4],
            points: Vec::new(),
            fixed_plane: None,
            facing: DEVICE_FORWARD,
            mesh: MeshBuffer::new(),
        }
    }

    /// Enter `Drawing` with `first` as the initial point, clearing any
    /// previous points and mesh.
    ///
    /// For angular ordering the patch plane is fixed here: it passes through
    /// `first` and faces the direction `orientation` points along. Fitted
    /// planes start out facing that direction too.
    pub fn begin(&mut self, first: Vec3, color: Rgba, orientation: Quat, world_to_local: &Affine3A) {
        self.state = PatchState::Drawing;
        self.color = color;
        self.points.clear();
        self.mesh.clear();
        self.facing = orientation * DEVICE_FORWARD;
        self.fixed_plane = match self.strategy {
            OrderingStrategy::Hull => None,
            OrderingStrategy::Angular => Plane::new(self.facing, first).ok(),
        };
        debug!("PlanarPatchBuilder: begin ({:?})", self.strategy);
        self.add_point(first, world_to_local);
    }

    /// Accept `point` if it is at least `min_spacing` from the last one, then
    /// rebuild. Returns whether the point was accepted.
    pub fn add_point(&mut self, point: Vec3, world_to_local: &Affine3A) -> bool {
        if self.state != PatchState::Drawing {
            return false;
        }
        if let Some(last) = self.points.last() {
            if point.distance(*last) < self.min_spacing {
                return false;
            }
        }
        self.points.push(point);

        match self.rebuild(world_to_local) {
            Ok(()) => {}
            Err(GeometryError::InsufficientPoints { got, .. }) => {
                debug!("PlanarPatchBuilder: {} points, not enough for a mesh", got);
            }
            Err(err) => {
                warn!("PlanarPatchBuilder: rebuild failed, keeping previous mesh: {}", err);
            }
        }
        true
    }

    /// Back to `Idle`; points stay until the next [`begin`](Self::begin)
    pub fn end(&mut self) {
        if self.state == PatchState::Drawing {
            debug!(
                "PlanarPatchBuilder: end with {} points, {} triangles",
                self.points.len(),
                self.mesh.triangle_count()
            );
        }
        self.state = PatchState::Idle;
    }

    fn rebuild(&mut self, world_to_local: &Affine3A) -> Result<(), GeometryError> {
        if self.points.len() < 3 {
            return Err(GeometryError::InsufficientPoints {
                needed: 3,
                got: self.points.len(),
            });
        }

        let (flat, basis) = match self.strategy {
            OrderingStrategy::Hull => {
                let mut plane = best_fit_plane(&self.points)?.plane;
                // Eigenvector sign is arbitrary; follow the previous fit
                if plane.normal.dot(self.facing) < 0.0 {
                    plane.normal = -plane.normal;
                }
                let projected = project_to_plane(&self.points, &plane)?;
                self.facing = plane.normal;
                projected
            }
            OrderingStrategy::Angular => {
                let plane = self.fixed_plane.ok_or(GeometryError::DegenerateBasis)?;
                let basis = PlaneBasis::new(&plane, plane.point)?;
                let flat = self.points.iter().map(|p| basis.project(*p)).collect();
                (flat, basis)
            }
        };

        let order = self.strategy.order(&flat)?;
        let mut triangles = triangulate(&flat, &order)?;

        let (min, max) = flat.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let extent = (max - min).max(Vec2::splat(f32::EPSILON));

        // Keep only the vertices the triangulation references
        let mut remap = vec![u32::MAX; flat.len()];
        let mut vertices = Vec::new();
        let mut uvs = Vec::new();
        for index in triangles.iter_mut().flatten() {
            let i = *index as usize;
            if remap[i] == u32::MAX {
                remap[i] = vertices.len() as u32;
                vertices.push(world_to_local.transform_point3(basis.reproject(flat[i])));
                uvs.push((flat[i] - min) / extent);
            }
            *index = remap[i];
        }

        self.mesh.replace(vertices, Some(uvs), triangles);
        Ok(())
    }

    pub fn state(&self) -> PatchState {
        self.state
    }

    pub fn strategy(&self) -> OrderingStrategy {
        self.strategy
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }

    /// Consume the builder, keeping its last good mesh
    pub fn into_mesh(self) -> MeshBuffer {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn begin_at(patch: &mut PlanarPatchBuilder, position: Vec3) {
        patch.begin(position, [0.2, 0.4, 0.6, 1.0], Quat::IDENTITY, &Affine3A::IDENTITY);
    }

    fn builder(strategy: OrderingStrategy) -> PlanarPatchBuilder {
        PlanarPatchBuilder::new(&PatchConfig { min_spacing: 0.01 }, strategy)
    }

    #[test]
    fn test_state_machine() {
        let mut patch = builder(OrderingStrategy::Hull);
        assert_eq!(patch.state(), PatchState::Idle);
        assert!(!patch.add_point(Vec3::X, &Affine3A::IDENTITY));

        begin_at(&mut patch, Vec3::ZERO);
        assert_eq!(patch.state(), PatchState::Drawing);
        assert_eq!(patch.color(), [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(patch.points().len(), 1);

        patch.end();
        assert_eq!(patch.state(), PatchState::Idle);
        assert_eq!(patch.points().len(), 1);

        begin_at(&mut patch, Vec3::ONE);
        assert_eq!(patch.points(), &[Vec3::ONE]);
    }

    #[test]
    fn test_fewer_than_three_points_keeps_mesh_empty() {
        let mut patch = builder(OrderingStrategy::Hull);
        begin_at(&mut patch, Vec3::ZERO);
        patch.add_point(Vec3::new(0.1, 0.0, 0.0), &Affine3A::IDENTITY);
        assert!(patch.mesh().is_empty());
        assert_eq!(patch.mesh().vertex_count(), 0);
    }

    #[test]
    fn test_spacing_threshold() {
        let mut patch = builder(OrderingStrategy::Hull);
        begin_at(&mut patch, Vec3::ZERO);
        assert!(!patch.add_point(Vec3::new(0.005, 0.0, 0.0), &Affine3A::IDENTITY));
        assert!(patch.add_point(Vec3::new(0.02, 0.0, 0.0), &Affine3A::IDENTITY));
        assert_eq!(patch.points().len(), 2);
    }

    #[test]
    fn test_hull_patch_in_tilted_plane() {
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let u = Vec3::X;
        let w = normal.cross(u);
        let square = [(0.0, 0.0), (0.1, 0.0), (0.1, 0.1), (0.0, 0.1), (0.05, 0.04)];

        let mut patch = builder(OrderingStrategy::Hull);
        let first = u * square[0].0 + w * square[0].1;
        begin_at(&mut patch, first);
        for &(a, b) in &square[1..] {
            patch.add_point(u * a + w * b, &Affine3A::IDENTITY);
        }

        let mesh = patch.mesh();
        // interior point dropped, square split in two
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_relative_eq!(mesh.surface_area(), 0.01, epsilon = 1e-5);
        for v in mesh.positions() {
            assert!(v.dot(normal).abs() < 1e-5);
        }
    }

    #[test]
    fn test_angular_patch_uses_device_plane_and_all_points() {
        let mut patch = builder(OrderingStrategy::Angular);
        // Device faces +Z, so the patch lies in the z = 0 plane
        begin_at(&mut patch, Vec3::ZERO);
        patch.add_point(Vec3::new(0.1, 0.0, 0.05), &Affine3A::IDENTITY);
        patch.add_point(Vec3::new(0.1, 0.1, -0.05), &Affine3A::IDENTITY);
        patch.add_point(Vec3::new(0.0, 0.1, 0.0), &Affine3A::IDENTITY);

        let mesh = patch.mesh();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        for v in mesh.positions() {
            assert!(v.z.abs() < 1e-6);
        }
        for n in mesh.vertex_normals() {
            assert_relative_eq!(n.dot(Vec3::Z).abs(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_mesh() {
        let mut patch = builder(OrderingStrategy::Angular);
        begin_at(&mut patch, Vec3::ZERO);
        patch.add_point(Vec3::new(0.1, 0.0, 0.0), &Affine3A::IDENTITY);
        patch.add_point(Vec3::new(0.0, 0.1, 0.0), &Affine3A::IDENTITY);
        assert_eq!(patch.mesh().triangle_count(), 1);
        let before = patch.mesh().clone();

        // Projects onto the first point: no ear can be clipped
        assert!(patch.add_point(Vec3::new(0.0, 0.0, 0.5), &Affine3A::IDENTITY));
        assert_eq!(patch.points().len(), 4);
        assert_eq!(patch.mesh(), &before);
    }

    #[test]
    fn test_collinear_start_recovers() {
        let mut patch = builder(OrderingStrategy::Hull);
        begin_at(&mut patch, Vec3::ZERO);
        patch.add_point(Vec3::new(0.1, 0.0, 0.0), &Affine3A::IDENTITY);
        patch.add_point(Vec3::new(0.2, 0.0, 0.0), &Affine3A::IDENTITY);
        assert!(patch.mesh().is_empty());

        patch.add_point(Vec3::new(0.1, 0.1, 0.0), &Affine3A::IDENTITY);
        assert_eq!(patch.mesh().triangle_count(), 1);
    }

    #[test]
    fn test_uvs_normalized_to_patch_bounds() {
        let mut patch = builder(OrderingStrategy::Hull);
        begin_at(&mut patch, Vec3::ZERO);
        patch.add_point(Vec3::new(0.2, 0.0, 0.0), &Affine3A::IDENTITY);
        patch.add_point(Vec3::new(0.0, 0.2, 0.0), &Affine3A::IDENTITY);
        for uv in patch.mesh().uvs() {
            assert!(uv.x >= -1e-6 && uv.x <= 1.0 + 1e-6);
            assert!(uv.y >= -1e-6 && uv.y <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_hull_patch_facing_stable_across_rebuilds() {
        let tilt = Quat::from_rotation_x(0.7) * Quat::from_rotation_y(0.4);
        let normal = tilt * Vec3::Z;
        let points: Vec<Vec3> = (0..40)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / 40.0;
                let noise = ((i * 7) % 11) as f32 / 10.0 - 0.5;
                let local = Vec3::new(angle.cos() * 0.1, angle.sin() * 0.1, noise * 0.001);
                tilt * local
            })
            .collect();

        let mut patch = builder(OrderingStrategy::Hull);
        begin_at(&mut patch, points[0]);
        let mut rebuilds = 0;
        for p in &points[1..] {
            patch.add_point(*p, &Affine3A::IDENTITY);
            let mesh = patch.mesh();
            if mesh.is_empty() {
                continue;
            }
            rebuilds += 1;
            let positions = mesh.positions();
            for &[a, b, c] in mesh.triangles() {
                let (a, b, c) = (positions[a as usize], positions[b as usize], positions[c as usize]);
                let face = (b - a).cross(c - a);
                if face.length() > 1e-7 {
                    assert!(face.dot(normal) > 0.0);
                }
            }
        }
        assert!(rebuilds > 30);
    }
}

//! Tube stroke builder
//!
//! Extrudes a ring of `k` vertices around every accepted sample and stitches
//! each new ring to the previous one with `2k` triangles. Already-emitted
//! geometry is never touched, so each sample costs O(k).

use std::f32::consts::TAU;

use glam::{Affine3A, Quat, Vec2, Vec3};
use tracing::debug;

use airdraw_config::TubeConfig;

use crate::mesh::MeshBuffer;
use crate::types::Rgba;

/// Growing tube mesh for one stroke
#[derive(Debug, Clone)]
pub struct TubeStrokeBuilder {
    segments: u32,
    min_spacing: f32,
    color: Rgba,
    /// Accepted sample positions, world space
    points: Vec<Vec3>,
    mesh: MeshBuffer,
}

impl TubeStrokeBuilder {
    /// Start a tube with a single ring at `first_point`.
    ///
    /// `world_to_local` maps world positions into the stroke container's space.
    pub fn start(
        config: &TubeConfig,
        first_point: Vec3,
        color: Rgba,
        orientation: Quat,
        radius: f32,
        world_to_local: &Affine3A,
    ) -> Self {
        let mut builder = Self {
            segments: config.segments.max(3),
            min_spacing: config.min_spacing,
            color,
            points: Vec::new(),
            mesh: MeshBuffer::new(),
        };
        builder.push_ring(first_point, orientation, radius, world_to_local);
        builder
    }

    /// Append a ring at `point` if it is at least `min_spacing` from the last
    /// accepted point. Returns whether the sample was accepted.
    pub fn append_point(
        &mut self,
        point: Vec3,
        orientation: Quat,
        radius: f32,
        world_to_local: &Affine3A,
    ) -> bool {
        let last = self.last_point();
        if point.distance(last) < self.min_spacing {
            return false;
        }
        self.push_ring(point, orientation, radius, world_to_local);
        true
    }

    fn push_ring(&mut self, center: Vec3, orientation: Quat, radius: f32, world_to_local: &Affine3A) {
        let k = self.segments;
        let base = self.mesh.push_vertices((0..k).map(|j| {
            let angle = j as f32 * TAU / k as f32;
            let offset = orientation * Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0);
            let position = world_to_local.transform_point3(center + offset);
            (position, Vec2::new(j as f32 / k as f32, 0.0))
        }));

        if base >= k {
            let prev = base - k;
            self.mesh.push_triangles((0..k).flat_map(|j| {
                let next = (j + 1) % k;
                let (old, old_next) = (prev + j, prev + next);
                let (new, new_next) = (base + j, base + next);
                [[old, new_next, new], [old, old_next, new_next]]
            }));
        }

        self.points.push(center);
        debug!(
            "TubeStrokeBuilder: ring {} at ({:.3}, {:.3}, {:.3}), radius={:.4}",
            self.points.len(),
            center.x,
            center.y,
            center.z,
            radius
        );
    }

    /// Last accepted sample position
    pub fn last_point(&self) -> Vec3 {
        // start() always emits the first ring
        self.points.last().copied().unwrap_or(Vec3::ZERO)
    }

    pub fn ring_count(&self) -> usize {
        self.points.len()
    }

    pub fn segments(&self) -> u32 {
        self.segments
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

    /// Detach the builder, keeping its geometry untouched
    pub fn finish(self) -> MeshBuffer {
        self.mesh
    }
}

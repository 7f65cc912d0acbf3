//! Triangle mesh buffer handed to the renderer
//!
//! Both builders write into a [`MeshBuffer`]: tubes append to it, planar
//! patches replace it wholesale. The renderer reads positions, UVs and
//! triangle indices, either as typed slices or as raw bytes for GPU upload.

use glam::{Vec2, Vec3};

/// Vertex positions, per-vertex UVs and triangle indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    triangles: Vec<[u32; 3]>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True when there is nothing to render
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Flat triangle-list indices
    pub fn indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Positions as raw bytes (tightly packed `[f32; 3]`)
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Indices as raw bytes (tightly packed `u32`)
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Replace the whole mesh.
    ///
    /// UVs are padded with zero or truncated to one per vertex.
    pub fn replace(&mut self, vertices: Vec<Vec3>, uvs: Option<Vec<Vec2>>, triangles: Vec<[u32; 3]>) {
        let mut uvs = uvs.unwrap_or_default();
        uvs.resize(vertices.len(), Vec2::ZERO);
        self.vertices = vertices;
        self.uvs = uvs;
        self.triangles = triangles;
    }

    /// Append vertices with their UVs, returning the index of the first one
    pub(crate) fn push_vertices(&mut self, vertices: impl IntoIterator<Item = (Vec3, Vec2)>) -> u32 {
        let base = self.vertices.len() as u32;
        for (position, uv) in vertices {
            self.vertices.push(position);
            self.uvs.push(uv);
        }
        base
    }

    pub(crate) fn push_triangles(&mut self, triangles: impl IntoIterator<Item = [u32; 3]>) {
        self.triangles.extend(triangles);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.uvs.clear();
        self.triangles.clear();
    }

    /// Area-weighted per-vertex normals; unreferenced vertices get zero
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let face = (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        normals.iter().map(|n| n.normalize_or_zero()).collect()
    }

    /// Sum of triangle areas
    pub fn surface_area(&self) -> f32 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let (a, b, c) = (
                    self.vertices[a as usize],
                    self.vertices[b as usize],
                    self.vertices[c as usize],
                );
                (b - a).cross(c - a).length() * 0.5
            })
            .sum()
    }
}

#[cfg(feature = "bevy")]
mod bevy_mesh {
    use bevy::asset::RenderAssetUsages;
    use bevy::mesh::{Indices, PrimitiveTopology};
    use bevy::prelude::*;

    use super::MeshBuffer;

    impl MeshBuffer {
        /// Convert to a Bevy triangle-list mesh with positions, normals and UVs
        pub fn to_bevy_mesh(&self) -> Mesh {
            let positions: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.to_array()).collect();
            let normals: Vec<[f32; 3]> = self.vertex_normals().iter().map(|n| n.to_array()).collect();
            let uvs: Vec<[f32; 2]> = self.uvs.iter().map(|uv| uv.to_array()).collect();

            let mut mesh = Mesh::new(
                PrimitiveTopology::TriangleList,
                RenderAssetUsages::default(),
            );
            mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
            mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
            mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
            mesh.insert_indices(Indices::U32(self.indices()));
            mesh
        }
    }
}

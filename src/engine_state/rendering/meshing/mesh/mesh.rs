//! The mesh buffer produced by the chunk meshers.

use cgmath::{Point3, Vector3};

use crate::engine_state::rendering::meshing::diagonal::generate_triangle_indices;
use crate::engine_state::rendering::Vertex;
use crate::error::{MeshError, MeshResult};

use super::face::Face;

/// Flat, GPU-ready attribute arrays for one chunk.
///
/// Positions are chunk-local; the backend places the mesh using the chunk
/// coordinate it is uploaded with. A mesh buffer is never edited in place after
/// it is built, only replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    /// `3n` floats
    pub positions: Vec<f32>,
    /// `3n` floats
    pub normals: Vec<f32>,
    /// `2n` floats
    pub uvs: Vec<f32>,
    /// `3n` floats
    pub colors: Vec<f32>,
    /// Triangle list, six indices per quad
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        MeshBuffer::default()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of quads.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// `true` if the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends one quad.
    ///
    /// # Arguments
    /// * `face` - The face providing positions, normal and texture coordinates
    /// * `colors` - Vertex colors in TL, TR, BR, BL order
    /// * `use_ac` - Split along the `v0`-`v2` diagonal instead of `v1`-`v3`
    pub fn push_face(&mut self, face: &Face, colors: [[f32; 3]; 4], use_ac: bool) -> MeshResult<()> {
        let offset = u32::try_from(self.vertex_count())
            .map_err(|_| MeshError::IndexOffsetOverflow(u32::MAX))?;
        let indices = generate_triangle_indices(offset, use_ac)?;

        let normal = face.block_side.normal_vector();
        for ((position, uv), color) in face.positions().iter().zip(face.tex_coords()).zip(colors) {
            self.positions.extend_from_slice(&[position.x, position.y, position.z]);
            self.normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
            self.uvs.extend_from_slice(&uv);
            self.colors.extend_from_slice(&color);
        }
        self.indices.extend_from_slice(&indices);
        Ok(())
    }

    /// Position of vertex `index`.
    pub fn position(&self, index: usize) -> Option<Point3<f32>> {
        let p = self.positions.get(index * 3..index * 3 + 3)?;
        Some(Point3::new(p[0], p[1], p[2]))
    }

    /// Normal of vertex `index`.
    pub fn normal(&self, index: usize) -> Option<Vector3<f32>> {
        let n = self.normals.get(index * 3..index * 3 + 3)?;
        Some(Vector3::new(n[0], n[1], n[2]))
    }

    /// Color of vertex `index`.
    pub fn color(&self, index: usize) -> Option<[f32; 3]> {
        let c = self.colors.get(index * 3..index * 3 + 3)?;
        Some([c[0], c[1], c[2]])
    }

    /// Interleaves the attribute arrays for upload.
    pub fn to_vertices(&self) -> Vec<Vertex> {
        (0..self.vertex_count())
            .map(|i| Vertex {
                position: [self.positions[i * 3], self.positions[i * 3 + 1], self.positions[i * 3 + 2]],
                normal: [self.normals[i * 3], self.normals[i * 3 + 1], self.normals[i * 3 + 2]],
                tex_coords: [self.uvs[i * 2], self.uvs[i * 2 + 1]],
                color: [self.colors[i * 3], self.colors[i * 3 + 1], self.colors[i * 3 + 2]],
            })
            .collect()
    }
}

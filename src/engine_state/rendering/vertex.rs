//! Vertex data structures for uploading chunk meshes.
//!
//! [`MeshBuffer`](crate::MeshBuffer) keeps its attributes in separate flat
//! arrays. Backends that want a single interleaved buffer convert it into
//! [`Vertex`] values and cast the slice to bytes with `bytemuck`.

use cgmath::{Point3, Vector3};

/// An interleaved mesh vertex.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
/// - Texture Coordinates: 2x f32 (8 bytes)
/// - Color: 3x f32 (12 bytes)
///
/// Total size: 44 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position relative to the chunk origin
    pub position: [f32; 3],
    /// Outward face normal
    pub normal: [f32; 3],
    /// UV texture coordinates, in voxel units across the quad
    pub tex_coords: [f32; 2],
    /// Linear RGB vertex color, AO already applied
    pub color: [f32; 3],
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - The position of the vertex relative to the chunk origin
    /// * `normal` - The outward normal of the face the vertex belongs to
    /// * `tex_coords` - UV coordinates
    /// * `color` - The vertex color
    pub fn new(
        position: Point3<f32>,
        normal: Vector3<f32>,
        tex_coords: [f32; 2],
        color: [f32; 3],
    ) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.into(),
            tex_coords,
            color,
        }
    }

    /// Size of one vertex in bytes.
    pub const fn stride() -> usize {
        std::mem::size_of::<Vertex>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(Vertex::stride(), 44);
        let vertices = [Vertex::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 1.0, 0.0),
            [0.0, 1.0],
            [0.5, 0.5, 0.5],
        )];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 44);
    }
}

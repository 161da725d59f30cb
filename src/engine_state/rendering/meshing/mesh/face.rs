use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, BlockId};

/// An axis-aligned quad on the boundary of one or more voxels.
///
/// `origin` is the minimum corner of the voxel box the face bounds and `size`
/// its extent along each axis; the extent along the face normal is always 1.
/// A single voxel face has `size == [1, 1, 1]`, a greedy-merged face covers a
/// `w x h` rectangle of voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Minimum corner of the bounded voxel box, in chunk coordinates
    pub origin: Point3<i32>,
    /// Extent of the box along X, Y and Z
    pub size: [i32; 3],
    /// The block the face belongs to
    pub block: BlockId,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// The face of a single voxel.
    pub fn new(x: i32, y: i32, z: i32, block: BlockId, block_side: BlockSide) -> Self {
        Face {
            origin: Point3::new(x, y, z),
            size: [1, 1, 1],
            block,
            block_side,
        }
    }

    /// A merged face spanning `width` voxels along the first tangent axis of
    /// the greedy sweep and `height` along the second.
    pub fn merged(
        origin: Point3<i32>,
        (u, width): (usize, i32),
        (v, height): (usize, i32),
        block: BlockId,
        block_side: BlockSide,
    ) -> Self {
        let mut size = [1, 1, 1];
        size[u] = width;
        size[v] = height;
        Face {
            origin,
            size,
            block,
            block_side,
        }
    }

    /// Vertex positions in TL, TR, BR, BL order, chunk-local.
    pub fn positions(&self) -> [Point3<f32>; 4] {
        self.block_side.corners().map(|corner| {
            Point3::new(
                (self.origin.x + corner[0] * self.size[0]) as f32,
                (self.origin.y + corner[1] * self.size[1]) as f32,
                (self.origin.z + corner[2] * self.size[2]) as f32,
            )
        })
    }

    /// Texture coordinates in voxel units, so textures tile across merged faces.
    pub fn tex_coords(&self) -> [[f32; 2]; 4] {
        let (u, v) = self.block_side.tangent_axes();
        self.block_side
            .corners()
            .map(|corner| [(corner[u] * self.size[u]) as f32, (corner[v] * self.size[v]) as f32])
    }

    /// Area of the face in voxel faces.
    pub fn area(&self) -> i32 {
        let (u, v) = self.block_side.tangent_axes();
        self.size[u] * self.size[v]
    }
}

//! # Ambient Occlusion
//!
//! Per-vertex occlusion for voxel faces. Each vertex of a face looks at three
//! voxels in the layer the face looks into: the two edge neighbors sharing the
//! vertex and the diagonal between them. The number of solid voxels among the
//! three, `0..=3`, maps to `1.0, 0.75, 0.5, 0.25`.
//!
//! Offsets come from a static table indexed by face and AO corner (see
//! [`BlockSide`] for the corner numbering). Every sample goes through
//! [`ChunkView::sample`], so a lookup that leaves the chunk is resolved in world
//! space, and two chunks computing the same world-space vertex see the same
//! three voxels.

use crate::engine_state::voxels::block::{block_side::BlockSide, is_solid as is_solid_block};
use crate::engine_state::voxels::world::ChunkView;
use crate::error::{MeshError, MeshResult};

/// AO value for `0..=3` solid neighbors.
pub const AO_LEVELS: [f32; 4] = [1.0, 0.75, 0.5, 0.25];

/// `[edge_u, edge_v, diagonal]` offsets for each face and AO corner.
///
/// Indexed as `AO_OFFSETS[face][corner]`, with faces in [`BlockSide`]
/// discriminant order.
pub const AO_OFFSETS: [[[[i32; 3]; 3]; 4]; 6] = [
    // RIGHT (+X), u = Z, v = Y
    [
        [[1, 0, -1], [1, -1, 0], [1, -1, -1]],
        [[1, 0, 1], [1, -1, 0], [1, -1, 1]],
        [[1, 0, 1], [1, 1, 0], [1, 1, 1]],
        [[1, 0, -1], [1, 1, 0], [1, 1, -1]],
    ],
    // LEFT (-X), u = Z, v = Y
    [
        [[-1, 0, -1], [-1, -1, 0], [-1, -1, -1]],
        [[-1, 0, 1], [-1, -1, 0], [-1, -1, 1]],
        [[-1, 0, 1], [-1, 1, 0], [-1, 1, 1]],
        [[-1, 0, -1], [-1, 1, 0], [-1, 1, -1]],
    ],
    // TOP (+Y), u = X, v = Z
    [
        [[-1, 1, 0], [0, 1, -1], [-1, 1, -1]],
        [[1, 1, 0], [0, 1, -1], [1, 1, -1]],
        [[1, 1, 0], [0, 1, 1], [1, 1, 1]],
        [[-1, 1, 0], [0, 1, 1], [-1, 1, 1]],
    ],
    // BOTTOM (-Y), u = X, v = Z
    [
        [[-1, -1, 0], [0, -1, -1], [-1, -1, -1]],
        [[1, -1, 0], [0, -1, -1], [1, -1, -1]],
        [[1, -1, 0], [0, -1, 1], [1, -1, 1]],
        [[-1, -1, 0], [0, -1, 1], [-1, -1, 1]],
    ],
    // FRONT (+Z), u = X, v = Y
    [
        [[-1, 0, 1], [0, -1, 1], [-1, -1, 1]],
        [[1, 0, 1], [0, -1, 1], [1, -1, 1]],
        [[1, 0, 1], [0, 1, 1], [1, 1, 1]],
        [[-1, 0, 1], [0, 1, 1], [-1, 1, 1]],
    ],
    // BACK (-Z), u = X, v = Y
    [
        [[-1, 0, -1], [0, -1, -1], [-1, -1, -1]],
        [[1, 0, -1], [0, -1, -1], [1, -1, -1]],
        [[1, 0, -1], [0, 1, -1], [1, 1, -1]],
        [[-1, 0, -1], [0, 1, -1], [-1, 1, -1]],
    ],
];

/// Returns `true` if the voxel at a chunk-local coordinate is solid.
///
/// Coordinates outside the chunk are resolved through the view's store, or are
/// air when the view has none.
pub fn is_solid(view: &ChunkView<'_>, x: i32, y: i32, z: i32) -> MeshResult<bool> {
    Ok(is_solid_block(view.sample(x, y, z)?))
}

/// The three neighbor offsets for a face corner.
///
/// # Errors
/// [`MeshError::InvalidCorner`] if `corner > 3`.
pub fn corner_offsets(face: BlockSide, corner: usize) -> MeshResult<[[i32; 3]; 3]> {
    AO_OFFSETS[face as usize]
        .get(corner)
        .copied()
        .ok_or(MeshError::InvalidCorner(corner))
}

/// Maps a solid-neighbor count to its AO value.
pub fn ao_from_count(count: usize) -> f32 {
    AO_LEVELS[count.min(3)]
}

/// AO of one corner of one face of the voxel at `(x, y, z)`.
///
/// # Arguments
/// * `view` - The chunk the voxel belongs to
/// * `x`, `y`, `z` - Chunk-local voxel coordinate
/// * `face` - The face the vertex belongs to
/// * `corner` - AO corner index, `0..=3`
///
/// # Returns
/// One of [`AO_LEVELS`].
pub fn calculate_vertex_ao(
    view: &ChunkView<'_>,
    x: i32,
    y: i32,
    z: i32,
    face: BlockSide,
    corner: usize,
) -> MeshResult<f32> {
    let offsets = corner_offsets(face, corner)?;
    let mut solid = 0;
    for [dx, dy, dz] in offsets {
        if is_solid(view, x + dx, y + dy, z + dz)? {
            solid += 1;
        }
    }
    Ok(ao_from_count(solid))
}

/// AO for the four corners of a face, in AO corner order.
pub fn calculate_face_ao(
    view: &ChunkView<'_>,
    x: i32,
    y: i32,
    z: i32,
    face: BlockSide,
) -> MeshResult<[f32; 4]> {
    let mut ao = [1.0; 4];
    for (corner, value) in ao.iter_mut().enumerate() {
        *value = calculate_vertex_ao(view, x, y, z, face, corner)?;
    }
    Ok(ao)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::{ChunkCoord, VoxelChunk};

    #[test]
    fn offsets_stay_in_the_layer_the_face_looks_into() {
        for face in BlockSide::all() {
            let normal = face.normal();
            let (u, v) = face.tangent_axes();
            for corner in 0..4 {
                let [edge_u, edge_v, diagonal] = corner_offsets(face, corner).unwrap();
                for offset in [edge_u, edge_v, diagonal] {
                    assert_eq!(offset[face.axis()], normal[face.axis()]);
                }
                let su = if corner == 1 || corner == 2 { 1 } else { -1 };
                let sv = if corner >= 2 { 1 } else { -1 };
                assert_eq!((edge_u[u], edge_u[v]), (su, 0), "{face} corner {corner}");
                assert_eq!((edge_v[u], edge_v[v]), (0, sv), "{face} corner {corner}");
                assert_eq!((diagonal[u], diagonal[v]), (su, sv), "{face} corner {corner}");
            }
        }
    }

    #[test]
    fn count_maps_to_discrete_levels() {
        assert_eq!(ao_from_count(0), 1.0);
        assert_eq!(ao_from_count(1), 0.75);
        assert_eq!(ao_from_count(2), 0.5);
        assert_eq!(ao_from_count(3), 0.25);
    }

    #[test]
    fn invalid_corner_is_an_error() {
        let chunk = VoxelChunk::new(ChunkCoord::new(0, 0));
        let view = ChunkView::local(&chunk);
        assert_eq!(
            calculate_vertex_ao(&view, 1, 1, 1, BlockSide::TOP, 4),
            Err(MeshError::InvalidCorner(4))
        );
    }

    #[test]
    fn occluders_darken_a_top_corner() {
        let mut chunk = VoxelChunk::new(ChunkCoord::new(0, 0));
        chunk.set(5, 5, 5, 1);
        // Edge neighbors of TOP corner 0, i.e. (-x, -z).
        chunk.set(4, 6, 5, 1);
        chunk.set(5, 6, 4, 1);
        let view = ChunkView::local(&chunk);
        assert_eq!(calculate_vertex_ao(&view, 5, 5, 5, BlockSide::TOP, 0), Ok(0.5));
        assert_eq!(calculate_vertex_ao(&view, 5, 5, 5, BlockSide::TOP, 1), Ok(0.75));
        assert_eq!(calculate_vertex_ao(&view, 5, 5, 5, BlockSide::TOP, 2), Ok(1.0));

        chunk.set(4, 6, 4, 1);
        let view = ChunkView::local(&chunk);
        assert_eq!(calculate_vertex_ao(&view, 5, 5, 5, BlockSide::TOP, 0), Ok(0.25));
    }

    #[test]
    fn out_of_range_height_is_air() {
        let chunk = VoxelChunk::solid(ChunkCoord::new(0, 0), 1);
        let view = ChunkView::local(&chunk);
        assert_eq!(
            calculate_face_ao(&view, 3, 255, 3, BlockSide::TOP),
            Ok([1.0; 4])
        );
    }
}

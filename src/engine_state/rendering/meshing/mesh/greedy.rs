//! Greedy meshing implementation for voxel rendering.
//!
//! This module implements the greedy meshing algorithm, which combines adjacent
//! coplanar faces of the same block into larger quads and so emits the fewest
//! quads for a chunk. It computes no ambient occlusion: every vertex is lit at
//! full brightness.
//!
//! For each axis `d` the chunk is swept slice by slice. Between slice `x[d]`
//! and `x[d] + 1` a 2D mask over the two remaining axes records `+id` where a
//! solid voxel is exposed looking forward along `d`, `-id` where one is
//! exposed looking backward, and `0` elsewhere. The mask is then scanned in
//! raster order, growing each non-zero cell into the widest run of equal values
//! and then the tallest stack of equal runs. Anything outside the chunk counts
//! as air.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::engine_state::voxels::{
    block::{base_color, block_side::BlockSide, is_solid, BlockId},
    chunk::{VoxelChunk, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH},
};
use crate::error::MeshResult;

use super::{face::Face, mesh::MeshBuffer};

/// Chunk extent along X, Y and Z.
const DIMS: [i32; 3] = [CHUNK_WIDTH as i32, CHUNK_HEIGHT as i32, CHUNK_DEPTH as i32];

/// Block at a chunk-local coordinate, air outside the chunk.
#[inline]
fn block_at(chunk: &VoxelChunk, p: [i32; 3]) -> BlockId {
    chunk.get_safe(p[0], p[1], p[2])
}

/// Mask value for the boundary between `a` (behind) and `b` (ahead).
#[inline]
fn mask_value(a: BlockId, b: BlockId) -> i16 {
    match (is_solid(a), is_solid(b)) {
        (true, false) => a as i16,
        (false, true) => -(b as i16),
        _ => 0,
    }
}

/// Builds the greedy mesh of a chunk.
///
/// # Returns
/// A mesh with one quad per merged rectangle and full-light vertex colors.
pub fn greedy(chunk: &VoxelChunk) -> MeshResult<MeshBuffer> {
    let start = Instant::now();
    let mut mesh = MeshBuffer::new();

    for d in 0..3 {
        let u = (d + 1) % 3;
        let v = (d + 2) % 3;
        let (du, dv) = (DIMS[u], DIMS[v]);
        let mut mask = vec![0i16; (du * dv) as usize];

        let mut x = [0i32; 3];
        let mut q = [0i32; 3];
        q[d] = 1;

        x[d] = -1;
        while x[d] < DIMS[d] {
            // Build the mask for the boundary between x[d] and x[d] + 1.
            let mut n = 0;
            for j in 0..dv {
                x[v] = j;
                for i in 0..du {
                    x[u] = i;
                    let a = block_at(chunk, x);
                    let b = block_at(chunk, [x[0] + q[0], x[1] + q[1], x[2] + q[2]]);
                    mask[n] = mask_value(a, b);
                    n += 1;
                }
            }

            emit_mask_quads(&mut mesh, &mut mask, x[d], d, (u, du), (v, dv))?;
            x[d] += 1;
        }
    }

    debug!(
        "Greedy meshed chunk {:?}: {} quads in {:?}",
        chunk.position,
        mesh.quad_count(),
        start.elapsed()
    );
    Ok(mesh)
}

/// Scans a filled mask, emitting and clearing one quad per merged rectangle.
fn emit_mask_quads(
    mesh: &mut MeshBuffer,
    mask: &mut [i16],
    slice: i32,
    d: usize,
    (u, du): (usize, i32),
    (v, dv): (usize, i32),
) -> MeshResult<()> {
    let at = |i: i32, j: i32| (i + j * du) as usize;

    for j in 0..dv {
        let mut i = 0;
        while i < du {
            let c = mask[at(i, j)];
            if c == 0 {
                i += 1;
                continue;
            }

            let mut width = 1;
            while i + width < du && mask[at(i + width, j)] == c {
                width += 1;
            }

            let mut height = 1;
            'grow: while j + height < dv {
                for k in 0..width {
                    if mask[at(i + k, j + height)] != c {
                        break 'grow;
                    }
                }
                height += 1;
            }

            let positive = c > 0;
            let block = c.unsigned_abs() as BlockId;
            let mut origin = [0i32; 3];
            origin[d] = if positive { slice } else { slice + 1 };
            origin[u] = i;
            origin[v] = j;

            let face = Face::merged(
                Point3::new(origin[0], origin[1], origin[2]),
                (u, width),
                (v, height),
                block,
                BlockSide::from_axis(d, positive),
            );
            mesh.push_face(&face, [base_color(block); 4], true)?;

            for h in 0..height {
                for k in 0..width {
                    mask[at(i + k, j + h)] = 0;
                }
            }
            i += width;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::ChunkCoord;
    use cgmath::InnerSpace;

    #[test]
    fn empty_chunk_has_no_quads() {
        let chunk = VoxelChunk::new(ChunkCoord::new(0, 0));
        assert!(greedy(&chunk).unwrap().is_empty());
    }

    #[test]
    fn single_voxel_has_six_quads() {
        let mut chunk = VoxelChunk::new(ChunkCoord::new(0, 0));
        chunk.set(4, 4, 4, 1);
        let mesh = greedy(&chunk).unwrap();
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.vertex_count(), 24);
    }

    #[test]
    fn solid_chunk_is_six_quads() {
        let chunk = VoxelChunk::solid(ChunkCoord::new(0, 0), 3);
        assert_eq!(greedy(&chunk).unwrap().quad_count(), 6);
    }

    #[test]
    fn different_blocks_do_not_merge() {
        let mut chunk = VoxelChunk::new(ChunkCoord::new(0, 0));
        chunk.set(0, 0, 0, 1);
        chunk.set(1, 0, 0, 2);
        let mesh = greedy(&chunk).unwrap();
        // Two boxes share no face; +X of the first and -X of the second are hidden.
        assert_eq!(mesh.quad_count(), 10);
    }

    #[test]
    fn normals_point_away_from_the_solid_side() {
        let mut chunk = VoxelChunk::new(ChunkCoord::new(0, 0));
        chunk.set(0, 10, 0, 1);
        let mesh = greedy(&chunk).unwrap();
        for vertex in 0..mesh.vertex_count() {
            let p = mesh.position(vertex).unwrap();
            let n = mesh.normal(vertex).unwrap();
            let center = Point3::new(0.5, 10.5, 0.5);
            let outward = (p - center).dot(n);
            assert!(outward > 0.0);
        }
    }
}

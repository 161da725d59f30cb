//! # Chunk Iteration Module
//!
//! An iterator over the non-air voxels of a chunk, in storage order.

use cgmath::Point3;

use crate::engine_state::voxels::block::{BlockId, AIR};

use super::{VoxelChunk, CHUNK_PLANE_SIZE, CHUNK_WIDTH};

/// An iterator over all non-air blocks in a chunk.
///
/// Yields `(local_position, block_id)` pairs, skipping air.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a VoxelChunk,
    /// Flat index of the next voxel to inspect
    offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates an iterator positioned before the chunk's first voxel.
    pub fn new(chunk_ref: &'a VoxelChunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            offset: 0,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<usize>, BlockId);

    fn next(&mut self) -> Option<Self::Item> {
        let voxels = self.chunk_ref.voxels();
        while self.offset < voxels.len() {
            let index = self.offset;
            self.offset += 1;

            let block = voxels[index];
            if block == AIR {
                continue;
            }
            let y = index / CHUNK_PLANE_SIZE;
            let rem = index % CHUNK_PLANE_SIZE;
            let position = Point3::new(rem % CHUNK_WIDTH, y, rem / CHUNK_WIDTH);
            return Some((position, block));
        }
        None
    }
}

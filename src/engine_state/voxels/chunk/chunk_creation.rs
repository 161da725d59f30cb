//! # Chunk Creation Module
//!
//! A builder that fills a chunk's voxel array in storage order. Generators push
//! one block id per voxel and ask the builder where the next voxel lives, so
//! they never compute flat indices themselves.

use cgmath::Point3;

use crate::engine_state::voxels::block::{BlockId, AIR};

use super::{ChunkCoord, VoxelChunk, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_WIDTH};

/// A builder for populating a chunk one voxel at a time.
///
/// Voxels are pushed with X varying fastest, then Z, then Y, matching
/// [`VoxelChunk::index`].
pub struct ChunkCreationIterator {
    /// The position of the chunk being created
    position: ChunkCoord,
    /// Block ids pushed so far, in storage order
    voxels: Vec<BlockId>,
    /// Local position of the next voxel to push
    local_x: usize,
    local_y: usize,
    local_z: usize,
}

impl ChunkCreationIterator {
    /// Creates a builder for the chunk at `position`.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinate of the chunk to create
    ///
    /// # Returns
    /// A builder positioned at local `(0, 0, 0)`
    pub fn new(position: ChunkCoord) -> Self {
        ChunkCreationIterator {
            position,
            voxels: Vec::with_capacity(CHUNK_SIZE),
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// Local position of the next voxel to push, or `None` once the chunk is full.
    pub fn next_position(&self) -> Option<Point3<usize>> {
        if self.is_complete() {
            None
        } else {
            Some(Point3::new(self.local_x, self.local_y, self.local_z))
        }
    }

    /// `true` once every voxel of the chunk has been pushed.
    pub fn is_complete(&self) -> bool {
        self.voxels.len() == CHUNK_SIZE
    }

    /// Stores a block at the current position and advances to the next one.
    ///
    /// Pushing into a complete chunk is ignored.
    pub fn push_block(&mut self, block: BlockId) {
        if self.is_complete() {
            return;
        }
        self.voxels.push(block);

        self.local_x += 1;
        if self.local_x == CHUNK_WIDTH {
            self.local_x = 0;
            self.local_z += 1;
            if self.local_z == CHUNK_DEPTH {
                self.local_z = 0;
                self.local_y += 1;
                debug_assert!(self.local_y <= CHUNK_HEIGHT);
            }
        }
    }

    /// Finishes the voxel array, padding any unpushed voxels with air.
    pub fn into_voxels(mut self) -> Vec<BlockId> {
        self.voxels.resize(CHUNK_SIZE, AIR);
        self.voxels
    }

    /// Finalizes the builder into a `Generated` chunk.
    pub fn return_chunk(self) -> VoxelChunk {
        let position = self.position;
        let mut chunk = VoxelChunk::new(position);
        chunk.fill(self.into_voxels());
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_storage_order() {
        let mut cci = ChunkCreationIterator::new(ChunkCoord::new(0, 0));
        for index in 0..(CHUNK_WIDTH * CHUNK_DEPTH + 3) {
            let p = cci.next_position().unwrap();
            assert_eq!(VoxelChunk::index(p.x, p.y, p.z), index);
            cci.push_block(AIR);
        }
    }

    #[test]
    fn partial_builder_pads_with_air() {
        let mut cci = ChunkCreationIterator::new(ChunkCoord::new(1, 1));
        cci.push_block(4);
        let chunk = cci.return_chunk();
        assert_eq!(chunk.get(0, 0, 0), 4);
        assert_eq!(chunk.solid_count(), 1);
        assert!(chunk.is_generated());
    }
}

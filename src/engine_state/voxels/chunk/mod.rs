//! # Chunk Module
//!
//! This module provides [`VoxelChunk`], the dense block store for one
//! `CHUNK_WIDTH x CHUNK_HEIGHT x CHUNK_DEPTH` column of the world, and
//! [`ChunkCoord`], the key chunks are registered under.
//!
//! ## Storage
//!
//! Voxels live in a flat `Vec<BlockId>` indexed by `x + z * W + y * W * D`, so a
//! horizontal layer is contiguous and the per-voxel mesher walks memory in
//! order. A chunk never points at its store: cross-chunk lookups go through
//! [`crate::ChunkView`], which pairs a chunk with the store it was resolved from.
//!
//! ## Lifecycle
//!
//! `Empty -> Generating -> Generated`, with an independent `has_mesh` flag. The
//! voxel array is filled exactly once by the generation step and afterwards only
//! changed through explicit edits.

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use super::block::{BlockId, AIR};

pub use chunk_creation::ChunkCreationIterator;
pub use chunk_iteration::ChunkBlockIterator;

mod chunk_creation;
pub mod chunk_iteration;
pub mod persistence;

/// Size of a chunk along X, in voxels.
pub const CHUNK_WIDTH: usize = 32;
/// Size of a chunk along Y, in voxels.
pub const CHUNK_HEIGHT: usize = 256;
/// Size of a chunk along Z, in voxels.
pub const CHUNK_DEPTH: usize = 32;
/// Voxels in one horizontal layer.
pub const CHUNK_PLANE_SIZE: usize = CHUNK_WIDTH * CHUNK_DEPTH;
/// Voxels in a whole chunk.
pub const CHUNK_SIZE: usize = CHUNK_PLANE_SIZE * CHUNK_HEIGHT;

/// Horizontal position of a chunk, in chunk units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Chunk index along X.
    pub x: i32,
    /// Chunk index along Z.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a coordinate from chunk indices.
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk containing the given world-space voxel column.
    pub fn from_world(world_x: i32, world_z: i32) -> Self {
        ChunkCoord {
            x: world_x.div_euclid(CHUNK_WIDTH as i32),
            z: world_z.div_euclid(CHUNK_DEPTH as i32),
        }
    }

    /// The chunk containing a continuous world-space position, e.g. the viewer.
    pub fn containing(position: Point3<f32>) -> Self {
        Self::from_world(position.x.floor() as i32, position.z.floor() as i32)
    }

    /// World-space coordinate of the chunk's `(0, 0, 0)` voxel column.
    ///
    /// # Returns
    /// `None` if the origin does not fit in an `i32`.
    pub fn world_origin(self) -> Option<(i32, i32)> {
        Some((
            self.x.checked_mul(CHUNK_WIDTH as i32)?,
            self.z.checked_mul(CHUNK_DEPTH as i32)?,
        ))
    }

    /// The coordinate `(dx, dz)` chunks away.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        ChunkCoord::new(self.x.wrapping_add(dx), self.z.wrapping_add(dz))
    }

    /// The four chunks sharing a face with this one: +X, -X, +Z, -Z.
    pub fn cardinal_neighbors(self) -> [ChunkCoord; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }

    /// The eight chunks sharing a face or a vertical edge with this one.
    pub fn neighbors(self) -> [ChunkCoord; 8] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
            self.offset(1, 1),
            self.offset(1, -1),
            self.offset(-1, 1),
            self.offset(-1, -1),
        ]
    }

    /// Chebyshev distance in chunks.
    pub fn distance(self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// Generation state of a chunk's voxel array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Registered but not yet handed to a generation worker.
    Empty,
    /// A worker is filling the voxel array.
    Generating,
    /// The voxel array holds generated terrain.
    Generated,
}

/// Dense block storage for one chunk.
#[derive(Clone, Debug)]
pub struct VoxelChunk {
    /// The position of this chunk in chunk coordinates.
    pub position: ChunkCoord,
    voxels: Vec<BlockId>,
    state: ChunkState,
    has_mesh: bool,
}

impl VoxelChunk {
    /// Creates an all-air chunk in the `Empty` state.
    pub fn new(position: ChunkCoord) -> Self {
        VoxelChunk {
            position,
            voxels: vec![AIR; CHUNK_SIZE],
            state: ChunkState::Empty,
            has_mesh: false,
        }
    }

    /// Creates a generated chunk whose every voxel is `block`.
    pub fn solid(position: ChunkCoord, block: BlockId) -> Self {
        let mut cci = ChunkCreationIterator::new(position);
        while !cci.is_complete() {
            cci.push_block(block);
        }
        cci.return_chunk()
    }

    /// Creates a generated chunk filled with `block` for every `y <= top`.
    pub fn filled_through(position: ChunkCoord, top: usize, block: BlockId) -> Self {
        let mut cci = ChunkCreationIterator::new(position);
        while let Some(local) = cci.next_position() {
            cci.push_block(if local.y <= top { block } else { AIR });
        }
        cci.return_chunk()
    }

    /// Creates a generated chunk with a 3D checkerboard of `block` and air.
    ///
    /// No two solid voxels share a face, which makes it the worst case for
    /// every mesher.
    pub fn checkerboard(position: ChunkCoord, block: BlockId) -> Self {
        let mut cci = ChunkCreationIterator::new(position);
        while let Some(local) = cci.next_position() {
            let solid = (local.x + local.y + local.z) % 2 == 0;
            cci.push_block(if solid { block } else { AIR });
        }
        cci.return_chunk()
    }

    /// Flat index of a local coordinate.
    #[inline]
    pub fn index(x: usize, y: usize, z: usize) -> usize {
        x + z * CHUNK_WIDTH + y * CHUNK_PLANE_SIZE
    }

    /// Returns `true` if the local coordinate lies inside the chunk.
    #[inline]
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_WIDTH as i32).contains(&x)
            && (0..CHUNK_HEIGHT as i32).contains(&y)
            && (0..CHUNK_DEPTH as i32).contains(&z)
    }

    /// Block at a local coordinate.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the chunk; use [`Self::get_safe`] for
    /// coordinates that may be out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        debug_assert!(x < CHUNK_WIDTH && y < CHUNK_HEIGHT && z < CHUNK_DEPTH);
        self.voxels[Self::index(x, y, z)]
    }

    /// Block at a local coordinate, or air for any coordinate outside the chunk.
    #[inline]
    pub fn get_safe(&self, x: i32, y: i32, z: i32) -> BlockId {
        if Self::in_bounds(x, y, z) {
            self.voxels[Self::index(x as usize, y as usize, z as usize)]
        } else {
            AIR
        }
    }

    /// Stores a block at a local coordinate.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the chunk.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        self.voxels[Self::index(x, y, z)] = block;
    }

    /// Replaces the whole voxel array with generated data and marks the chunk
    /// `Generated`.
    ///
    /// # Returns
    /// `false` (leaving the chunk untouched) if `voxels` is not exactly
    /// [`CHUNK_SIZE`] long.
    pub fn fill(&mut self, voxels: Vec<BlockId>) -> bool {
        if voxels.len() != CHUNK_SIZE {
            return false;
        }
        self.voxels = voxels;
        self.state = ChunkState::Generated;
        true
    }

    /// The raw voxel array in storage order.
    pub fn voxels(&self) -> &[BlockId] {
        &self.voxels
    }

    /// Current generation state.
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Moves the chunk to a new generation state.
    pub fn set_state(&mut self, state: ChunkState) {
        self.state = state;
    }

    /// `true` once generation has filled the voxel array.
    pub fn is_generated(&self) -> bool {
        self.state == ChunkState::Generated
    }

    /// Whether a mesh built from this chunk is currently resident.
    pub fn has_mesh(&self) -> bool {
        self.has_mesh
    }

    /// Records whether a mesh for this chunk is resident.
    pub fn set_has_mesh(&mut self, has_mesh: bool) {
        self.has_mesh = has_mesh;
    }

    /// Number of non-air voxels.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|&&block| block != AIR).count()
    }

    /// Iterates over every non-air voxel with its local position.
    pub fn blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }
}

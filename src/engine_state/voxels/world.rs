//! # World Module
//!
//! This module provides [`ChunkStore`], the registry of every resident chunk,
//! and [`ChunkView`], the read-only handle meshers use to sample voxels around
//! a chunk.
//!
//! ## Cross-chunk lookups
//!
//! [`ChunkStore::get_voxel`] is the single source of truth for world-space
//! occupancy. Whenever a sample falls outside a chunk's local bounds,
//! [`ChunkView::sample`] converts it to world coordinates and goes through
//! `get_voxel`, so two chunks asking about the same world-space voxel always
//! get the same answer.
//!
//! Chunks never hold a reference to the store. A view pairs a borrowed chunk
//! with an optional borrowed store for the duration of one mesh build.
//!
//! ## Threading
//!
//! The store is owned by the coordinating thread. Workers only return voxel
//! arrays; they never touch the map.

use std::collections::HashMap;

use crate::engine_state::voxels::block::{BlockId, AIR};
use crate::engine_state::voxels::chunk::{
    ChunkCoord, ChunkState, VoxelChunk, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH,
};
use crate::error::{MeshError, MeshResult};

/// Registry of resident chunks, keyed by chunk coordinate.
#[derive(Default)]
pub struct ChunkStore {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<ChunkCoord, VoxelChunk>,
}

impl ChunkStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        ChunkStore {
            chunks: HashMap::new(),
        }
    }

    /// The chunk at `coord`, if resident.
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&VoxelChunk> {
        self.chunks.get(&coord)
    }

    /// Mutable access to the chunk at `coord`, if resident.
    pub fn get_chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut VoxelChunk> {
        self.chunks.get_mut(&coord)
    }

    /// The chunk at `coord`, registering an empty one on first reference.
    pub fn get_or_create(&mut self, coord: ChunkCoord) -> &mut VoxelChunk {
        self.chunks
            .entry(coord)
            .or_insert_with(|| VoxelChunk::new(coord))
    }

    /// Registers a chunk, replacing any chunk already at its position.
    pub fn insert(&mut self, chunk: VoxelChunk) -> Option<VoxelChunk> {
        self.chunks.insert(chunk.position, chunk)
    }

    /// Removes the chunk at `coord`.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<VoxelChunk> {
        self.chunks.remove(&coord)
    }

    /// `true` if a chunk is registered at `coord`.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of registered chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// `true` if no chunk is registered.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Coordinates of every registered chunk, in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// `true` if the chunk at `coord` exists and has finished generating.
    pub fn is_generated(&self, coord: ChunkCoord) -> bool {
        self.chunks
            .get(&coord)
            .is_some_and(|chunk| chunk.state() == ChunkState::Generated)
    }

    /// Block at a world-space coordinate.
    ///
    /// Returns air if the owning chunk is missing, not yet generated, or `world_y`
    /// is outside the vertical range.
    pub fn get_voxel(&self, world_x: i32, world_y: i32, world_z: i32) -> BlockId {
        if !(0..CHUNK_HEIGHT as i32).contains(&world_y) {
            return AIR;
        }
        let coord = ChunkCoord::from_world(world_x, world_z);
        match self.chunks.get(&coord) {
            Some(chunk) if chunk.is_generated() => {
                let local_x = world_x.rem_euclid(CHUNK_WIDTH as i32) as usize;
                let local_z = world_z.rem_euclid(CHUNK_DEPTH as i32) as usize;
                chunk.get(local_x, world_y as usize, local_z)
            }
            _ => AIR,
        }
    }

    /// Stores a block at a world-space coordinate.
    ///
    /// # Returns
    /// `false` if the owning chunk is not generated or `world_y` is out of range.
    pub fn set_voxel(&mut self, world_x: i32, world_y: i32, world_z: i32, block: BlockId) -> bool {
        if !(0..CHUNK_HEIGHT as i32).contains(&world_y) {
            return false;
        }
        let coord = ChunkCoord::from_world(world_x, world_z);
        match self.chunks.get_mut(&coord) {
            Some(chunk) if chunk.is_generated() => {
                let local_x = world_x.rem_euclid(CHUNK_WIDTH as i32) as usize;
                let local_z = world_z.rem_euclid(CHUNK_DEPTH as i32) as usize;
                chunk.set(local_x, world_y as usize, local_z, block);
                true
            }
            _ => false,
        }
    }

    /// `true` iff all four cardinal neighbors of `coord` exist and are `Generated`.
    pub fn are_neighbors_ready(&self, coord: ChunkCoord) -> bool {
        coord
            .cardinal_neighbors()
            .iter()
            .all(|&neighbor| self.is_generated(neighbor))
    }

    /// `true` iff all eight surrounding chunks exist and are `Generated`.
    ///
    /// AO at a chunk's vertical edges also reads the diagonal neighbors, so a
    /// mesh is only final once this holds.
    pub fn is_neighborhood_complete(&self, coord: ChunkCoord) -> bool {
        coord
            .neighbors()
            .iter()
            .all(|&neighbor| self.is_generated(neighbor))
    }

    /// A view of the chunk at `coord` that resolves out-of-chunk samples through
    /// this store.
    pub fn view(&self, coord: ChunkCoord) -> Option<ChunkView<'_>> {
        self.chunks
            .get(&coord)
            .map(|chunk| ChunkView::with_store(chunk, self))
    }
}

/// A chunk plus the store its out-of-bounds samples are resolved through.
#[derive(Clone, Copy)]
pub struct ChunkView<'a> {
    chunk: &'a VoxelChunk,
    store: Option<&'a ChunkStore>,
}

impl<'a> ChunkView<'a> {
    /// A view that treats everything outside the chunk as air.
    pub fn local(chunk: &'a VoxelChunk) -> Self {
        ChunkView { chunk, store: None }
    }

    /// A view that resolves out-of-chunk samples through `store`.
    pub fn with_store(chunk: &'a VoxelChunk, store: &'a ChunkStore) -> Self {
        ChunkView {
            chunk,
            store: Some(store),
        }
    }

    /// The chunk being viewed.
    pub fn chunk(&self) -> &'a VoxelChunk {
        self.chunk
    }

    /// `true` if samples outside the chunk consult the store.
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Block at a chunk-local coordinate that may lie outside the chunk.
    ///
    /// * `y` outside the vertical range is air.
    /// * In-bounds coordinates read the chunk directly.
    /// * Anything else is translated to world space and read through
    ///   [`ChunkStore::get_voxel`], or is air if the view has no store.
    ///
    /// # Errors
    /// [`MeshError::CoordinateOverflow`] if the world coordinate does not fit in
    /// an `i32`.
    pub fn sample(&self, x: i32, y: i32, z: i32) -> MeshResult<BlockId> {
        if !(0..CHUNK_HEIGHT as i32).contains(&y) {
            return Ok(AIR);
        }
        if VoxelChunk::in_bounds(x, y, z) {
            return Ok(self.chunk.get(x as usize, y as usize, z as usize));
        }
        match self.store {
            Some(store) => {
                let (world_x, world_z) = self.world_lookup(x, z)?;
                Ok(store.get_voxel(world_x, y, world_z))
            }
            None => Ok(AIR),
        }
    }

    /// Translates a chunk-local column to world space.
    pub fn world_lookup(&self, x: i32, z: i32) -> MeshResult<(i32, i32)> {
        let position = self.chunk.position;
        let overflow = MeshError::CoordinateOverflow {
            chunk_x: position.x,
            chunk_z: position.z,
        };
        let (origin_x, origin_z) = position.world_origin().ok_or_else(|| overflow.clone())?;
        let world_x = origin_x.checked_add(x).ok_or_else(|| overflow.clone())?;
        let world_z = origin_z.checked_add(z).ok_or(overflow)?;
        Ok((world_x, world_z))
    }
}

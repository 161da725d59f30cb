//! Mesh generation and management for voxel rendering.
//!
//! This module turns chunk voxels into [`MeshBuffer`]s and keeps the most
//! recently built mesh per chunk.
//!
//! # Architecture
//! - [`MeshManager`]: builds meshes and caches them in an LRU keyed by chunk
//! - `ambient_occlusion`: per-vertex AO from a static neighbor table
//! - `diagonal`: AO-aware quad triangulation
//! - `vertex_color`: AO to color conversion and bilinear color grids
//! - `mesh/`: the greedy and per-voxel meshers

use std::num::NonZeroUsize;

use log::debug;
use lru::LruCache;

pub mod ambient_occlusion;
pub mod diagonal;
mod mesh;
pub mod vertex_color;

pub use mesh::*;
pub use vertex_color::{VertexColor, VertexColorManager};

use crate::engine_state::voxels::{chunk::ChunkCoord, world::ChunkStore};
use crate::error::MeshResult;

/// Builds chunk meshes and keeps the latest mesh of each chunk.
///
/// The cache is bounded; storing a mesh past capacity evicts the least
/// recently meshed chunk, whose GPU resources the caller must release.
pub struct MeshManager {
    /// LRU cache of the latest mesh per chunk
    least_recently_meshed_chunks: LruCache<ChunkCoord, MeshBuffer>,
    /// Shared AO color cache
    colors: VertexColorManager,
    /// Use the AO mesher even when neighbors are missing
    force_ao: bool,
}

impl MeshManager {
    /// Creates a manager holding at most `capacity` meshes.
    pub fn new(capacity: usize, force_ao: bool) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        MeshManager {
            least_recently_meshed_chunks: LruCache::new(capacity),
            colors: VertexColorManager::new(),
            force_ao,
        }
    }

    /// Builds the mesh for the chunk at `coord` without caching it.
    ///
    /// `force_ao` is combined with the manager's own setting.
    ///
    /// # Returns
    /// `None` if no chunk is registered at `coord`.
    pub fn create_mesh(
        &mut self,
        store: &ChunkStore,
        coord: ChunkCoord,
        force_ao: bool,
    ) -> Option<MeshResult<(MeshBuffer, MeshStrategy)>> {
        create_mesh(store, coord, force_ao || self.force_ao, &mut self.colors)
    }

    /// Stores the latest mesh of a chunk.
    ///
    /// # Returns
    /// The chunk evicted to make room, if any.
    pub fn store_mesh(&mut self, coord: ChunkCoord, mesh: MeshBuffer) -> Option<ChunkCoord> {
        match self.least_recently_meshed_chunks.push(coord, mesh) {
            Some((evicted, _)) if evicted != coord => {
                debug!("Evicted mesh of chunk {:?}", evicted);
                Some(evicted)
            }
            _ => None,
        }
    }

    /// The cached mesh of a chunk, without touching its recency.
    pub fn get_mesh(&self, coord: ChunkCoord) -> Option<&MeshBuffer> {
        self.least_recently_meshed_chunks.peek(&coord)
    }

    /// Drops the cached mesh of a chunk.
    pub fn remove_mesh(&mut self, coord: ChunkCoord) -> Option<MeshBuffer> {
        self.least_recently_meshed_chunks.pop(&coord)
    }

    /// Number of cached meshes.
    pub fn len(&self) -> usize {
        self.least_recently_meshed_chunks.len()
    }

    /// `true` if no mesh is cached.
    pub fn is_empty(&self) -> bool {
        self.least_recently_meshed_chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::VoxelChunk;

    #[test]
    fn store_evicts_least_recently_meshed() {
        let mut manager = MeshManager::new(2, false);
        assert_eq!(manager.store_mesh(ChunkCoord::new(0, 0), MeshBuffer::new()), None);
        assert_eq!(manager.store_mesh(ChunkCoord::new(1, 0), MeshBuffer::new()), None);
        // Re-meshing a cached chunk replaces it without evicting.
        assert_eq!(manager.store_mesh(ChunkCoord::new(0, 0), MeshBuffer::new()), None);
        assert_eq!(
            manager.store_mesh(ChunkCoord::new(2, 0), MeshBuffer::new()),
            Some(ChunkCoord::new(1, 0))
        );
        assert_eq!(manager.len(), 2);
        assert!(manager.get_mesh(ChunkCoord::new(1, 0)).is_none());
    }

    #[test]
    fn falls_back_to_greedy_without_neighbors() {
        let mut store = ChunkStore::new();
        store.insert(VoxelChunk::filled_through(ChunkCoord::new(0, 0), 10, 1));
        let mut manager = MeshManager::new(4, false);

        let (greedy_mesh, strategy) = manager
            .create_mesh(&store, ChunkCoord::new(0, 0), false)
            .unwrap()
            .unwrap();
        assert_eq!(strategy, MeshStrategy::Greedy);
        assert_eq!(greedy_mesh.quad_count(), 6);

        let (ao_mesh, strategy) = manager
            .create_mesh(&store, ChunkCoord::new(0, 0), true)
            .unwrap()
            .unwrap();
        assert_eq!(strategy, MeshStrategy::PerVoxelAo);
        assert!(ao_mesh.quad_count() > greedy_mesh.quad_count());

        assert!(manager.create_mesh(&store, ChunkCoord::new(5, 5), true).is_none());
    }

    #[test]
    fn uses_ao_once_neighbors_are_ready() {
        let mut store = ChunkStore::new();
        let center = ChunkCoord::new(0, 0);
        store.insert(VoxelChunk::filled_through(center, 3, 1));
        for neighbor in center.cardinal_neighbors() {
            store.insert(VoxelChunk::filled_through(neighbor, 3, 1));
        }
        let mut manager = MeshManager::new(4, false);
        let (mesh, strategy) = manager.create_mesh(&store, center, false).unwrap().unwrap();
        assert_eq!(strategy, MeshStrategy::PerVoxelAo);
        // Top and bottom layers only; the sides border generated neighbors.
        assert_eq!(mesh.quad_count(), 32 * 32 + 32 * 32);
    }
}

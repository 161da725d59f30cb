//! Mesh generation for voxel chunks.
//!
//! This module converts a chunk's voxels into a [`MeshBuffer`]. Two strategies
//! are available:
//!
//! - [`greedy`]: merges coplanar faces of the same block into the fewest quads.
//!   No ambient occlusion.
//! - [`per_voxel`]: one quad per exposed voxel face with per-vertex AO and an
//!   AO-aware triangulation.
//!
//! [`create_mesh`] picks between them the way the engine does at runtime.

mod face;
mod greedy;
#[allow(clippy::module_inception)]
mod mesh;
mod per_voxel;

pub use face::Face;
pub use greedy::greedy;
pub use mesh::MeshBuffer;
pub use per_voxel::per_voxel;

use crate::engine_state::voxels::{chunk::ChunkCoord, world::ChunkStore, world::ChunkView};
use crate::error::MeshResult;

use super::vertex_color::VertexColorManager;

/// Which mesher produced a mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshStrategy {
    /// Per-voxel quads with AO resolved across chunk borders.
    PerVoxelAo,
    /// Greedy quads, full light, chunk borders treated as air.
    Greedy,
}

/// Builds the mesh for the chunk at `coord`.
///
/// The per-voxel AO mesher is used when `force_ao` is set or all four cardinal
/// neighbors are generated; otherwise the chunk is greedy meshed at full light
/// instead of waiting for its neighbors.
///
/// # Returns
/// `None` if no chunk is registered at `coord`.
pub fn create_mesh(
    store: &ChunkStore,
    coord: ChunkCoord,
    force_ao: bool,
    colors: &mut VertexColorManager,
) -> Option<MeshResult<(MeshBuffer, MeshStrategy)>> {
    let chunk = store.get_chunk(coord)?;
    let result = if force_ao || store.are_neighbors_ready(coord) {
        per_voxel(&ChunkView::with_store(chunk, store), colors).map(|m| (m, MeshStrategy::PerVoxelAo))
    } else {
        greedy(chunk).map(|m| (m, MeshStrategy::Greedy))
    };
    Some(result)
}

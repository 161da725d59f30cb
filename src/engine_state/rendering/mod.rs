//! Rendering system for the voxel engine.
//!
//! Meshing lives here, along with the seam to whatever draws the meshes. The
//! engine talks to a [`RenderBackend`]: it uploads a chunk's mesh whenever the
//! mesh is rebuilt and releases it when the chunk is unloaded or its mesh is
//! evicted from the cache.

use std::collections::HashMap;

use log::trace;
use serde::{Deserialize, Serialize};

use super::voxels::chunk::ChunkCoord;

pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use meshing::{MeshBuffer, MeshManager};
pub use vertex::Vertex;

/// How a backend should shade an uploaded mesh.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Vertex colors only, AO baked into the colors.
    #[default]
    VertexColored,
    /// Texture sampled with the UVs and modulated by vertex colors.
    Textured,
}

/// Receiver of chunk meshes.
pub trait RenderBackend {
    /// Creates or replaces the GPU resources of a chunk.
    fn upload_mesh(&mut self, coord: ChunkCoord, mesh: &MeshBuffer, shading: ShadingMode);

    /// Frees the GPU resources of a chunk. Releasing an unknown chunk is a no-op.
    fn release_mesh(&mut self, coord: ChunkCoord);
}

/// What a [`HeadlessBackend`] holds for one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedMesh {
    /// Size of the interleaved vertex buffer
    pub vertex_bytes: usize,
    /// Number of indices
    pub index_count: usize,
    /// Shading mode the mesh was uploaded with
    pub shading: ShadingMode,
}

/// A backend that draws nothing and records what it was given.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    meshes: HashMap<ChunkCoord, UploadedMesh>,
    uploads: usize,
    releases: usize,
}

impl HeadlessBackend {
    /// Creates a backend with nothing resident.
    pub fn new() -> Self {
        HeadlessBackend::default()
    }

    /// The resident mesh of a chunk.
    pub fn mesh(&self, coord: ChunkCoord) -> Option<&UploadedMesh> {
        self.meshes.get(&coord)
    }

    /// Number of chunks with resident meshes.
    pub fn resident(&self) -> usize {
        self.meshes.len()
    }

    /// Total uploads received.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Total releases of resident meshes.
    pub fn releases(&self) -> usize {
        self.releases
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload_mesh(&mut self, coord: ChunkCoord, mesh: &MeshBuffer, shading: ShadingMode) {
        let vertices = mesh.to_vertices();
        let vertex_bytes = bytemuck::cast_slice::<Vertex, u8>(&vertices).len();
        trace!(
            "Uploading chunk {:?}: {} bytes of vertices, {} indices",
            coord,
            vertex_bytes,
            mesh.indices.len()
        );
        self.meshes.insert(
            coord,
            UploadedMesh {
                vertex_bytes,
                index_count: mesh.indices.len(),
                shading,
            },
        );
        self.uploads += 1;
    }

    fn release_mesh(&mut self, coord: ChunkCoord) {
        if self.meshes.remove(&coord).is_some() {
            self.releases += 1;
        }
    }
}

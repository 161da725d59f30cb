//! # Voxel World
//!
//! Everything about the voxel data itself, independent of how it is drawn.
//!
//! ## Architecture
//!
//! * **Block**: Block ids, the material table and the six face directions
//! * **Chunk**: Fixed-size 32x256x32 voxel columns, their coordinates and snapshots
//! * **World**: The chunk store and the cross-chunk voxel lookups meshing relies on
//! * **Terrain**: Height-map generators that fill a chunk's voxels
//! * **Tasks**: The worker task that runs terrain generation off the main thread
//! * **Pipeline**: Which chunks are requested, generating, generated and in need of a mesh
//!
//! ## Data Flow
//!
//! 1. The pipeline publishes a generation task for a requested chunk
//! 2. A worker fills the chunk's voxels from the terrain generator
//! 3. The result is written into the store and the chunk and its neighbors are marked stale
//! 4. The engine rebuilds stale meshes, reading neighbors through the store for AO
//!
//! ## Thread Safety
//!
//! Workers only see a chunk coordinate and a shared generator. The store is
//! owned by the pipeline and touched from the coordinating thread alone.

pub mod block;
pub mod chunk;
pub mod pipeline;
pub mod tasks;
pub mod terrain;
pub mod world;

//! # Chunk Persistence
//!
//! A sparse, serializable snapshot of a chunk's voxels. Only non-air voxels are
//! recorded, so a mostly empty chunk encodes to a handful of records:
//!
//! ```json
//! { "chunkX": 1, "chunkZ": -2, "nonAirVoxels": [ { "x": 0, "y": 40, "z": 3, "type": 2 } ] }
//! ```
//!
//! The snapshot is what an external save system consumes; this crate never
//! touches the disk itself.

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::{BlockId, AIR};
use crate::error::PersistenceError;

use super::{ChunkCoord, VoxelChunk};

/// One non-air voxel, in chunk-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxelRecord {
    /// Local X, `0..32`
    pub x: i32,
    /// Y, `0..256`
    pub y: i32,
    /// Local Z, `0..32`
    pub z: i32,
    /// Block id, serialized as `type`
    #[serde(rename = "type")]
    pub block: BlockId,
}

/// Sparse serialized form of a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkSnapshot {
    /// Chunk X coordinate
    pub chunk_x: i32,
    /// Chunk Z coordinate
    pub chunk_z: i32,
    /// Every voxel that is not air, in storage order
    pub non_air_voxels: Vec<VoxelRecord>,
}

impl ChunkSnapshot {
    /// Records every non-air voxel of `chunk`.
    pub fn from_chunk(chunk: &VoxelChunk) -> Self {
        let non_air_voxels = chunk
            .blocks()
            .map(|(p, block)| VoxelRecord {
                x: p.x as i32,
                y: p.y as i32,
                z: p.z as i32,
                block,
            })
            .collect();
        ChunkSnapshot {
            chunk_x: chunk.position.x,
            chunk_z: chunk.position.z,
            non_air_voxels,
        }
    }

    /// Chunk coordinate the snapshot belongs to.
    pub fn coord(&self) -> ChunkCoord {
        ChunkCoord::new(self.chunk_x, self.chunk_z)
    }

    /// Rebuilds a `Generated` chunk from the snapshot.
    ///
    /// # Errors
    /// Fails on records outside the chunk bounds or records that store air.
    pub fn into_chunk(self) -> Result<VoxelChunk, PersistenceError> {
        let mut chunk = VoxelChunk::new(self.coord());
        for VoxelRecord { x, y, z, block } in self.non_air_voxels {
            if !VoxelChunk::in_bounds(x, y, z) {
                return Err(PersistenceError::OutOfBounds { x, y, z });
            }
            if block == AIR {
                return Err(PersistenceError::AirRecord { x, y, z });
            }
            chunk.set(x as usize, y as usize, z as usize, block);
        }
        chunk.set_state(super::ChunkState::Generated);
        Ok(chunk)
    }

    /// Encodes the snapshot as JSON.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }
}

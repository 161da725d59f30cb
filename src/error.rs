//! # Error Types
//!
//! Errors surfaced by the meshing, persistence and configuration layers.
//!
//! Contract violations (bad face names, corner indices, AO arrays, color counts)
//! are reported to the immediate caller. Missing-data conditions such as an
//! unloaded neighbor chunk never produce an error; they resolve to air or full
//! light inside the voxel and meshing code.

use thiserror::Error;

/// Errors produced by the mesh and ambient occlusion APIs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A face name could not be parsed into a [`crate::BlockSide`].
    #[error("invalid face name: {0:?}")]
    InvalidFaceName(String),

    /// An AO corner index outside `0..=3`.
    #[error("invalid corner index {0}, expected 0..=3")]
    InvalidCorner(usize),

    /// The diagonal optimizer expects exactly four AO values.
    #[error("expected 4 AO values, got {count}")]
    InvalidAoValues {
        /// Number of values supplied.
        count: usize,
    },

    /// An AO value outside `[0, 1]` (or NaN).
    #[error("AO value {0} is outside [0, 1]")]
    AoOutOfRange(f32),

    /// A quad's vertex offset leaves no room for its four vertices in a `u32` index.
    #[error("vertex offset {0} overflows the index range")]
    IndexOffsetOverflow(u32),

    /// The color array handed to a mesh does not match its vertex count.
    #[error("color count mismatch: mesh has {expected} vertices, got {actual} colors")]
    ColorCountMismatch {
        /// Vertices in the mesh.
        expected: usize,
        /// Colors supplied.
        actual: usize,
    },

    /// Bilinear interpolation needs a quad of at least 1x1.
    #[error("invalid quad size {width}x{height}")]
    InvalidQuadSize {
        /// Quad width in voxels.
        width: usize,
        /// Quad height in voxels.
        height: usize,
    },

    /// World-coordinate arithmetic overflowed while resolving a neighbor voxel.
    #[error("world coordinate overflow resolving chunk ({chunk_x}, {chunk_z}) offset")]
    CoordinateOverflow {
        /// Chunk X of the querying chunk.
        chunk_x: i32,
        /// Chunk Z of the querying chunk.
        chunk_z: i32,
    },
}

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors produced when encoding or restoring chunk snapshots.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The snapshot could not be encoded or decoded.
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),

    /// A voxel record lies outside the chunk's local bounds.
    #[error("voxel record ({x}, {y}, {z}) is outside the chunk")]
    OutOfBounds {
        /// Local X.
        x: i32,
        /// Local Y.
        y: i32,
        /// Local Z.
        z: i32,
    },

    /// A voxel record stores air, which snapshots never contain.
    #[error("voxel record ({x}, {y}, {z}) stores air")]
    AirRecord {
        /// Local X.
        x: i32,
        /// Local Y.
        y: i32,
        /// Local Z.
        z: i32,
    },
}

/// Errors produced while loading an [`crate::EngineConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for the config schema.
    #[error("parsing config: {0}")]
    Json(#[from] serde_json::Error),

    /// A value failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

//! # Engine Configuration
//!
//! Runtime settings for world streaming, worker threads and meshing. The
//! configuration is plain JSON so it can be shipped next to the binary:
//!
//! ```json
//! { "seed": 7, "render_distance": 4, "worker_count": 2 }
//! ```
//!
//! Every field is optional; missing fields take the values of
//! [`EngineConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine_state::rendering::ShadingMode;
use crate::error::ConfigError;

/// Settings consumed by [`crate::EngineState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed handed to the terrain generator.
    pub seed: u32,
    /// Radius, in chunks, of the square region kept loaded around the viewer.
    pub render_distance: i32,
    /// Chunks further than this (Chebyshev distance, in chunks) are unloaded.
    pub unload_distance: i32,
    /// Number of generation worker threads. `0` runs tasks inline on the
    /// coordinating thread.
    pub worker_count: usize,
    /// Always build per-voxel AO meshes, even when neighbors are missing.
    pub force_ao: bool,
    /// Upper bound on meshes rebuilt per call to `update`.
    pub max_meshes_per_update: usize,
    /// Number of chunk meshes kept resident before the least recently meshed
    /// one is released. Must hold every chunk inside the unload distance.
    pub mesh_cache_capacity: usize,
    /// Shading mode passed to the render backend with every mesh.
    pub shading: ShadingMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            seed: 0,
            render_distance: 4,
            unload_distance: 6,
            worker_count: 4,
            force_ao: false,
            max_meshes_per_update: 8,
            mesh_cache_capacity: 1024,
            shading: ShadingMode::VertexColored,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a JSON string and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Smallest mesh cache that holds a mesh for every loaded chunk.
    pub fn min_mesh_cache_capacity(&self) -> usize {
        let side = 2 * self.unload_distance.max(0) as usize + 1;
        side * side
    }

    /// Checks the relationships between fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "render_distance must be >= 0, got {}",
                self.render_distance
            )));
        }
        if self.unload_distance < self.render_distance {
            return Err(ConfigError::Invalid(format!(
                "unload_distance ({}) must be >= render_distance ({})",
                self.unload_distance, self.render_distance
            )));
        }
        if self.max_meshes_per_update == 0 {
            return Err(ConfigError::Invalid(
                "max_meshes_per_update must be at least 1".to_string(),
            ));
        }
        if self.mesh_cache_capacity < self.min_mesh_cache_capacity() {
            return Err(ConfigError::Invalid(format!(
                "mesh_cache_capacity ({}) must be >= {} to hold every chunk within unload_distance {}",
                self.mesh_cache_capacity,
                self.min_mesh_cache_capacity(),
                self.unload_distance
            )));
        }
        Ok(())
    }
}

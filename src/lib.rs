#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! Chunked voxel terrain with per-vertex ambient occlusion meshing.
//!
//! The world is a grid of 32x256x32 chunks generated on worker threads. Each
//! generated chunk is turned into a triangle mesh, either one quad per exposed
//! voxel face with ambient occlusion resolved across chunk borders, or greedy
//! merged quads at full light while the neighbors are still missing. Meshes
//! are handed to a [`RenderBackend`].
//!
//! ## Key Modules
//!
//! * `config` - Engine settings loaded from JSON
//! * `engine_state` - The frame loop, meshing, task management and voxel data
//! * `error` - Error types of the meshing, persistence and configuration layers
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::Point3;
//! use voxel_world::{EngineConfig, EngineState, HeadlessBackend};
//!
//! let mut engine = EngineState::with_perlin(EngineConfig::default(), HeadlessBackend::new());
//! for _ in 0..100 {
//!     engine.update(Point3::new(0.0, 80.0, 0.0));
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! * Generation runs on worker threads; the coordinating thread only applies results
//! * Mesh rebuilds per frame are capped and ordered nearest first
//! * AO shade colors are cached per quantized AO value
//! * Greedy meshing keeps far or isolated chunks cheap until their neighbors arrive

use std::time::Duration;

use cgmath::Point3;
use log::{error, info};

pub mod config;
pub mod engine_state;
pub mod error;

pub use config::EngineConfig;
pub use engine_state::{
    rendering::{
        meshing::{MeshStrategy, VertexColor, VertexColorManager},
        HeadlessBackend, MeshBuffer, RenderBackend, ShadingMode, Vertex,
    },
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType, BlockId, AIR},
        chunk::{persistence::ChunkSnapshot, ChunkCoord, VoxelChunk},
        terrain::{FlatTerrain, PerlinTerrain, ScatterTerrain, TerrainGenerator},
        world::{ChunkStore, ChunkView},
    },
    EngineState, FrameStats,
};
pub use error::{ConfigError, MeshError, MeshResult, PersistenceError};

/// Environment variable naming a configuration file, used when no path is given
/// on the command line.
pub const CONFIG_ENV_VAR: &str = "VOXEL_CONFIG";

/// Frames simulated by [`run`].
pub const HEADLESS_FRAMES: u32 = 600;

/// Blocks the viewer moves along +X per frame in [`run`].
const VIEWER_SPEED: f32 = 0.5;

/// Loads the configuration from the first command line argument, then from
/// [`CONFIG_ENV_VAR`], falling back to the defaults.
fn load_config() -> EngineConfig {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok());

    match path {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path);
                config
            }
            Err(err) => {
                error!("Failed to load configuration from {}: {}", path, err);
                EngineConfig::default()
            }
        },
        None => EngineConfig::default(),
    }
}

/// Runs the engine headless: streams Perlin terrain around a viewer walking
/// along +X and logs a summary.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = load_config();
    info!("Configuration: {:?}", config);

    let mut engine = EngineState::with_perlin(config, HeadlessBackend::new());
    let mut viewer = Point3::new(0.0, 96.0, 0.0);
    let mut meshed = 0;
    let mut unloaded = 0;

    for _ in 0..HEADLESS_FRAMES {
        let stats = engine.update(viewer);
        meshed += stats.meshed;
        unloaded += stats.unloaded;
        viewer.x += VIEWER_SPEED;
        std::thread::sleep(Duration::from_millis(16));
    }

    info!(
        "Finished {} frames: {} chunks loaded, {} meshes resident, {} meshes built, {} chunks unloaded",
        HEADLESS_FRAMES,
        engine.pipeline().len(),
        engine.backend().resident(),
        meshed,
        unloaded
    );
}

//! # Engine State Module
//!
//! The coordinating side of the voxel engine: it owns the generation pipeline,
//! the worker pool, the mesh cache and the render backend, and advances them
//! once per frame.
//!
//! ## Key Components
//!
//! * `EngineState` - The frame loop tying the subsystems together
//! * `rendering` - Meshing, AO and the render backend seam
//! * `task_management` - Worker threads and the priority/normal task queues
//! * `voxels` - Blocks, chunks, the chunk store, terrain and the generation pipeline
//!
//! ## Frame Order
//!
//! 1. Apply finished generation results, then dispatch queued tasks
//! 2. Until the chunk under the viewer is generated, stop here
//! 3. Request missing chunks inside the render distance, nearest first
//! 4. Unload chunks beyond the unload distance and release their meshes
//! 5. Rebuild a bounded number of stale meshes, nearest first, and upload them
//!
//! Meshing runs here and not on the workers, because AO reads neighbor chunks
//! through the store, which only this thread touches.

use std::sync::Arc;

use cgmath::Point3;
use log::{debug, error, info, warn};
use web_time::Instant;

use rendering::{MeshManager, RenderBackend};
use task_management::TaskManager;
use voxels::{
    block::BlockId,
    chunk::ChunkCoord,
    pipeline::GenerationPipeline,
    terrain::{PerlinTerrain, TerrainGenerator},
};

use crate::config::EngineConfig;

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// What one call to [`EngineState::update`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Chunks newly requested for generation
    pub requested: usize,
    /// Chunks unloaded
    pub unloaded: usize,
    /// Meshes rebuilt and uploaded
    pub meshed: usize,
}

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```no_run
/// use cgmath::Point3;
/// use voxel_world::{EngineConfig, EngineState, HeadlessBackend};
///
/// let mut engine = EngineState::with_perlin(EngineConfig::default(), HeadlessBackend::new());
/// loop {
///     engine.update(Point3::new(0.0, 80.0, 0.0));
/// }
/// ```
pub struct EngineState<B: RenderBackend> {
    config: EngineConfig,
    /// Chunk requests, generation results and mesh bookkeeping
    pipeline: GenerationPipeline,
    /// Task manager for generation work
    task_manager: TaskManager,
    /// Builds and caches chunk meshes
    mesh_manager: MeshManager,
    /// Receives uploaded meshes
    backend: B,
    /// Whether the initial chunk has been requested
    started: bool,
}

impl<B: RenderBackend> EngineState<B> {
    /// Creates an engine generating terrain from `generator`.
    ///
    /// A mesh cache smaller than [`EngineConfig::min_mesh_cache_capacity`] is
    /// raised to that size so loaded chunks never lose their meshes.
    ///
    /// # Arguments
    /// * `config` - Engine settings; worker threads are started here
    /// * `generator` - The terrain source shared by every generation task
    /// * `backend` - The receiver of chunk meshes
    pub fn new(mut config: EngineConfig, generator: Arc<dyn TerrainGenerator>, backend: B) -> Self {
        let min_capacity = config.min_mesh_cache_capacity();
        if config.mesh_cache_capacity < min_capacity {
            warn!(
                "Mesh cache capacity {} cannot hold the unload region, using {}",
                config.mesh_cache_capacity, min_capacity
            );
            config.mesh_cache_capacity = min_capacity;
        }
        let task_manager = TaskManager::new(config.worker_count);
        let mesh_manager = MeshManager::new(config.mesh_cache_capacity, config.force_ao);
        EngineState {
            pipeline: GenerationPipeline::new(generator),
            task_manager,
            mesh_manager,
            backend,
            started: false,
            config,
        }
    }

    /// Creates an engine with Perlin terrain seeded from the configuration.
    pub fn with_perlin(config: EngineConfig, backend: B) -> Self {
        let generator = Arc::new(PerlinTerrain::new(config.seed));
        Self::new(config, generator, backend)
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The generation pipeline and, through it, the chunk store.
    pub fn pipeline(&self) -> &GenerationPipeline {
        &self.pipeline
    }

    /// The mesh cache.
    pub fn mesh_manager(&self) -> &MeshManager {
        &self.mesh_manager
    }

    /// The render backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// `true` once the chunk under the viewer's starting position is generated.
    pub fn is_initial_chunk_loaded(&self) -> bool {
        self.pipeline.is_initial_chunk_loaded()
    }

    /// `true` when no generation work is queued or running.
    pub fn is_idle(&self) -> bool {
        self.task_manager.is_idle()
    }

    /// Edits a voxel in a generated chunk; affected meshes are rebuilt on a
    /// later update.
    pub fn set_voxel(&mut self, world_x: i32, world_y: i32, world_z: i32, block: BlockId) -> bool {
        self.pipeline.set_voxel(world_x, world_y, world_z, block)
    }

    /// Advances the engine by one frame.
    ///
    /// # Arguments
    /// * `viewer` - World-space position of the viewer
    pub fn update(&mut self, viewer: Point3<f32>) -> FrameStats {
        let mut stats = FrameStats::default();

        if !self.started {
            let initial = self
                .pipeline
                .request_initial_chunk(viewer, &mut self.task_manager);
            info!("Requested initial chunk {:?}", initial);
            self.started = true;
        }

        self.pipeline.pump(&mut self.task_manager);
        if !self.pipeline.is_initial_chunk_loaded() {
            return stats;
        }

        let center = ChunkCoord::containing(viewer);

        for coord in self
            .pipeline
            .missing_chunks_near(center, self.config.render_distance)
        {
            if self.pipeline.request_chunk(
                coord,
                task_management::TaskPriority::Normal,
                &mut self.task_manager,
            ) {
                stats.requested += 1;
            }
        }

        for coord in self
            .pipeline
            .chunks_beyond(center, self.config.unload_distance)
        {
            self.pipeline.unload(coord);
            self.mesh_manager.remove_mesh(coord);
            self.backend.release_mesh(coord);
            stats.unloaded += 1;
        }

        stats.meshed = self.rebuild_meshes(center);

        if stats != FrameStats::default() {
            debug!("Frame: {:?}", stats);
        }
        stats
    }

    /// Rebuilds up to `max_meshes_per_update` stale meshes, nearest first.
    fn rebuild_meshes(&mut self, center: ChunkCoord) -> usize {
        let start = Instant::now();
        let mut meshed = 0;

        let stale = self.pipeline.chunks_needing_update_near(center);
        for coord in stale.into_iter().take(self.config.max_meshes_per_update) {
            if !self.pipeline.begin_mesh_build(coord) {
                continue;
            }
            let built = match self
                .mesh_manager
                .create_mesh(self.pipeline.store(), coord, self.config.force_ao)
            {
                Some(Ok((mesh, strategy))) => {
                    debug!(
                        "Meshed chunk {:?} with {:?}: {} triangles",
                        coord,
                        strategy,
                        mesh.triangle_count()
                    );
                    self.backend.upload_mesh(coord, &mesh, self.config.shading);
                    if let Some(evicted) = self.mesh_manager.store_mesh(coord, mesh) {
                        self.backend.release_mesh(evicted);
                        self.pipeline.mesh_released(evicted);
                        // Still loaded: rebuild it on a later update.
                        self.pipeline.mark_mesh_stale(evicted);
                    }
                    meshed += 1;
                    true
                }
                Some(Err(err)) => {
                    error!("Failed to mesh chunk {:?}: {}", coord, err);
                    false
                }
                None => false,
            };
            if built {
                self.pipeline.finish_mesh_build(coord);
            } else {
                self.pipeline.abort_mesh_build(coord);
            }
        }

        if meshed > 0 {
            debug!("Rebuilt {} meshes in {:?}", meshed, start.elapsed());
        }
        meshed
    }
}

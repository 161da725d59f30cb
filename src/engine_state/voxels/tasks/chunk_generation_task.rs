//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which fills the voxel array of
//! one chunk on a worker thread. The task only produces data; the chunk store
//! is updated when the result is handled on the coordinating thread.

use std::sync::Arc;

use crate::engine_state::{
    task_management::task::{Task, TaskId, TaskResult},
    voxels::{
        block::BlockId,
        chunk::ChunkCoord,
        pipeline::GenerationPipeline,
        terrain::{generate_voxels, TerrainGenerator},
    },
};

/// A task that generates the voxels of one chunk.
pub struct ChunkGenerationTask {
    /// The position of the chunk to generate
    position: ChunkCoord,
    /// The terrain source, shared by every generation task
    generator: Arc<dyn TerrainGenerator>,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the chunk to generate
    /// * `generator` - The terrain generator to sample
    pub fn new(position: ChunkCoord, generator: Arc<dyn TerrainGenerator>) -> Self {
        ChunkGenerationTask { position, generator }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult> {
        Box::new(ChunkGenerationTaskResult {
            position: self.position,
            voxels: generate_voxels(self.generator.as_ref(), self.position),
        })
    }
}

/// The generated voxels of one chunk, `{chunkX, chunkZ, voxels}`.
pub struct ChunkGenerationTaskResult {
    /// The chunk the voxels belong to
    position: ChunkCoord,
    /// The voxel array in storage order
    voxels: Vec<BlockId>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Hands the voxels to the pipeline, which discards them if the chunk was
    /// unloaded or re-requested since the task was published.
    fn handle_result(self: Box<Self>, task_id: TaskId, pipeline: &mut GenerationPipeline) {
        pipeline.complete_generation(task_id, self.position, self.voxels);
    }
}

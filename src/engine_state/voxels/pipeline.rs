//! # Generation Pipeline
//!
//! Tracks every requested chunk through generation and meshing, and owns the
//! [`ChunkStore`] the results land in.
//!
//! ## States
//!
//! Generation: `Unrequested -> Queued -> Generating -> Generated`. A chunk is
//! `Queued` once its task is published, `Generating` once a worker has it.
//!
//! Meshing, once generated: `Stale -> Building -> Current`, and back to `Stale`
//! whenever something the mesh depends on changes.
//!
//! ## Initial chunk gate
//!
//! The chunk under the viewer at startup is requested through the priority
//! queue. Until it is generated, [`GenerationPipeline::is_initial_chunk_loaded`]
//! is `false` and the engine issues no further load requests.
//!
//! ## Neighbor remeshing
//!
//! A mesh built before all eight surrounding chunks were generated saw air
//! where those chunks now have voxels, so its AO and culling along the border
//! may be wrong. When a chunk finishes generating, every neighbor whose mesh
//! was built with an incomplete neighborhood goes back to `Stale`. Boundary AO
//! is therefore eventually consistent: it is correct once every chunk around a
//! border has generated and the border chunks have been remeshed.
//!
//! ## Stale results
//!
//! Every request is tagged with the id of the task that serves it. A result is
//! applied only if its chunk is still registered under that same id; results
//! for unloaded or re-requested chunks are dropped.
//!
//! ## Lost tasks
//!
//! A task lost with an exited worker is published again under a new id, with
//! the priority it was first requested at, so the chunk and the initial chunk
//! gate never wait on a result that cannot arrive.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::Point3;
use log::{debug, info, warn};

use super::block::BlockId;
use super::chunk::{ChunkCoord, ChunkState, VoxelChunk, CHUNK_DEPTH, CHUNK_WIDTH};
use super::tasks::chunk_generation_task::ChunkGenerationTask;
use super::terrain::TerrainGenerator;
use super::world::ChunkStore;
use crate::engine_state::task_management::{task::TaskId, TaskManager, TaskPriority};

/// Generation state of a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenerationState {
    /// Never requested, or unloaded.
    Unrequested,
    /// Task published, not yet on a worker.
    Queued,
    /// Task running on a worker.
    Generating,
    /// Voxels applied to the store.
    Generated,
}

/// Mesh state of a generated chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshState {
    /// The mesh is missing or out of date.
    Stale,
    /// A build is in progress.
    Building,
    /// The mesh reflects the chunk and its neighbors as last seen.
    Current,
}

#[derive(Debug)]
struct ChunkRecord {
    generation: GenerationState,
    mesh: MeshState,
    task_id: TaskId,
    /// Whether the current mesh was built with all eight neighbors generated.
    built_with_complete_neighborhood: bool,
}

/// Chunk generation and remesh bookkeeping around a [`ChunkStore`].
pub struct GenerationPipeline {
    store: ChunkStore,
    records: HashMap<ChunkCoord, ChunkRecord>,
    /// Chunk served by each outstanding task
    in_flight: HashMap<TaskId, ChunkCoord>,
    generator: Arc<dyn TerrainGenerator>,
    initial_chunk: Option<ChunkCoord>,
    initial_chunk_loaded: bool,
}

impl GenerationPipeline {
    /// Creates an empty pipeline generating terrain from `generator`.
    pub fn new(generator: Arc<dyn TerrainGenerator>) -> Self {
        GenerationPipeline {
            store: ChunkStore::new(),
            records: HashMap::new(),
            in_flight: HashMap::new(),
            generator,
            initial_chunk: None,
            initial_chunk_loaded: false,
        }
    }

    /// The chunk store. Meshers read voxels through it.
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Generation state of the chunk at `coord`.
    pub fn generation_state(&self, coord: ChunkCoord) -> GenerationState {
        self.records
            .get(&coord)
            .map_or(GenerationState::Unrequested, |record| record.generation)
    }

    /// Mesh state of the chunk at `coord`, once it is generated.
    pub fn mesh_state(&self, coord: ChunkCoord) -> Option<MeshState> {
        self.records
            .get(&coord)
            .filter(|record| record.generation == GenerationState::Generated)
            .map(|record| record.mesh)
    }

    /// `true` once the chunk requested by [`Self::request_initial_chunk`] is generated.
    pub fn is_initial_chunk_loaded(&self) -> bool {
        self.initial_chunk_loaded
    }

    /// Coordinates of every requested chunk.
    pub fn requested(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.records.keys().copied()
    }

    /// Number of requested chunks.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if no chunk is requested.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Requests generation of the chunk at `coord`.
    ///
    /// # Returns
    /// `false` if the chunk was already requested.
    pub fn request_chunk(
        &mut self,
        coord: ChunkCoord,
        priority: TaskPriority,
        tasks: &mut TaskManager,
    ) -> bool {
        if self.records.contains_key(&coord) {
            return false;
        }
        self.store.get_or_create(coord);
        let task = ChunkGenerationTask::new(coord, Arc::clone(&self.generator));
        let task_id = tasks.publish_task(Box::new(task), priority);
        self.in_flight.insert(task_id, coord);
        self.records.insert(
            coord,
            ChunkRecord {
                generation: GenerationState::Queued,
                mesh: MeshState::Stale,
                task_id,
                built_with_complete_neighborhood: false,
            },
        );
        debug!("Requested chunk {:?} as task {} ({:?})", coord, task_id, priority);
        true
    }

    /// Requests the chunk containing `viewer` through the priority queue and
    /// arms the initial chunk gate on it.
    pub fn request_initial_chunk(&mut self, viewer: Point3<f32>, tasks: &mut TaskManager) -> ChunkCoord {
        let coord = ChunkCoord::containing(viewer);
        self.initial_chunk = Some(coord);
        self.initial_chunk_loaded = self.store.is_generated(coord);
        self.request_chunk(coord, TaskPriority::High, tasks);
        coord
    }

    /// Marks tasks that reached a worker as `Generating`.
    pub fn mark_dispatched(&mut self, task_ids: &[TaskId]) {
        for task_id in task_ids {
            let Some(&coord) = self.in_flight.get(task_id) else {
                continue;
            };
            let Some(record) = self.records.get_mut(&coord) else {
                continue;
            };
            if record.task_id == *task_id && record.generation == GenerationState::Queued {
                record.generation = GenerationState::Generating;
                if let Some(chunk) = self.store.get_chunk_mut(coord) {
                    chunk.set_state(ChunkState::Generating);
                }
            }
        }
    }

    /// Collects finished results, republishes lost tasks, then dispatches
    /// queued tasks.
    pub fn pump(&mut self, tasks: &mut TaskManager) {
        tasks.process_completed_tasks(self);
        let lost = tasks.take_lost();
        self.requeue_lost(&lost, tasks);
        tasks.process_queued_tasks();
        let dispatched = tasks.take_dispatched();
        self.mark_dispatched(&dispatched);
    }

    /// Publishes a fresh generation task for every chunk whose task was lost.
    ///
    /// # Returns
    /// The number of chunks requeued.
    pub fn requeue_lost(&mut self, task_ids: &[TaskId], tasks: &mut TaskManager) -> usize {
        let mut requeued = 0;
        for task_id in task_ids {
            let Some(coord) = self.in_flight.remove(task_id) else {
                continue;
            };
            let Some(record) = self.records.get_mut(&coord) else {
                continue;
            };
            if record.task_id != *task_id || record.generation == GenerationState::Generated {
                continue;
            }

            let priority = if self.initial_chunk == Some(coord) {
                TaskPriority::High
            } else {
                TaskPriority::Normal
            };
            let task = ChunkGenerationTask::new(coord, Arc::clone(&self.generator));
            let new_id = tasks.publish_task(Box::new(task), priority);
            record.task_id = new_id;
            record.generation = GenerationState::Queued;
            self.in_flight.insert(new_id, coord);
            if let Some(chunk) = self.store.get_chunk_mut(coord) {
                chunk.set_state(ChunkState::Empty);
            }
            warn!("Generation task {} for chunk {:?} was lost, requeued as {}", task_id, coord, new_id);
            requeued += 1;
        }
        requeued
    }

    /// Applies generated voxels to the store.
    ///
    /// Results whose task no longer serves a registered chunk are discarded.
    ///
    /// # Returns
    /// `true` if the voxels were applied.
    pub fn complete_generation(&mut self, task_id: TaskId, coord: ChunkCoord, voxels: Vec<BlockId>) -> bool {
        let served = self.in_flight.remove(&task_id);
        let current = self
            .records
            .get(&coord)
            .is_some_and(|record| record.task_id == task_id && record.generation != GenerationState::Generated);
        if served != Some(coord) || !current {
            debug!("Discarding stale generation result for chunk {:?} (task {})", coord, task_id);
            return false;
        }

        let Some(chunk) = self.store.get_chunk_mut(coord) else {
            debug!("Discarding generation result for evicted chunk {:?}", coord);
            return false;
        };
        if !chunk.fill(voxels) {
            log::warn!("Generation result for chunk {:?} has the wrong size, discarding", coord);
            return false;
        }
        if let Some(record) = self.records.get_mut(&coord) {
            record.generation = GenerationState::Generated;
            record.mesh = MeshState::Stale;
            record.built_with_complete_neighborhood = false;
        }

        if self.initial_chunk == Some(coord) && !self.initial_chunk_loaded {
            self.initial_chunk_loaded = true;
            info!("Initial chunk {:?} loaded", coord);
        }

        for neighbor in coord.neighbors() {
            if let Some(record) = self.records.get_mut(&neighbor) {
                if record.generation == GenerationState::Generated
                    && record.mesh != MeshState::Stale
                    && !record.built_with_complete_neighborhood
                {
                    debug!("Chunk {:?} generated, remeshing neighbor {:?}", coord, neighbor);
                    record.mesh = MeshState::Stale;
                }
            }
        }
        true
    }

    /// Generated chunks whose mesh is stale.
    pub fn get_chunks_needing_update(&self) -> Vec<ChunkCoord> {
        self.records
            .iter()
            .filter(|(_, record)| {
                record.generation == GenerationState::Generated && record.mesh == MeshState::Stale
            })
            .map(|(&coord, _)| coord)
            .collect()
    }

    /// Stale chunks ordered nearest-first from `center`.
    pub fn chunks_needing_update_near(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let mut coords = self.get_chunks_needing_update();
        sort_nearest_first(&mut coords, center);
        coords
    }

    /// Moves a stale chunk to `Building`.
    ///
    /// # Returns
    /// `false` if the chunk is not generated or not stale.
    pub fn begin_mesh_build(&mut self, coord: ChunkCoord) -> bool {
        match self.records.get_mut(&coord) {
            Some(record)
                if record.generation == GenerationState::Generated && record.mesh == MeshState::Stale =>
            {
                record.mesh = MeshState::Building;
                true
            }
            _ => false,
        }
    }

    /// Marks a build as finished and records whether its neighborhood was complete.
    ///
    /// A chunk that went stale during the build stays stale.
    pub fn finish_mesh_build(&mut self, coord: ChunkCoord) {
        let complete = self.store.is_neighborhood_complete(coord);
        if let Some(record) = self.records.get_mut(&coord) {
            if record.mesh == MeshState::Building {
                record.mesh = MeshState::Current;
                record.built_with_complete_neighborhood = complete;
            }
        }
        if let Some(chunk) = self.store.get_chunk_mut(coord) {
            chunk.set_has_mesh(true);
        }
    }

    /// Returns a chunk whose build failed from `Building` to `Stale`, so the
    /// build is retried on a later update.
    pub fn abort_mesh_build(&mut self, coord: ChunkCoord) {
        if let Some(record) = self.records.get_mut(&coord) {
            if record.mesh == MeshState::Building {
                record.mesh = MeshState::Stale;
            }
        }
        if let Some(chunk) = self.store.get_chunk_mut(coord) {
            chunk.set_has_mesh(false);
        }
    }

    /// Records that the mesh of a chunk is no longer resident.
    ///
    /// The mesh state is left alone. Callers that want the mesh back mark the
    /// chunk stale.
    pub fn mesh_released(&mut self, coord: ChunkCoord) {
        if let Some(chunk) = self.store.get_chunk_mut(coord) {
            chunk.set_has_mesh(false);
        }
    }

    /// Whether the current mesh of `coord` was built with all eight neighbors generated.
    pub fn is_mesh_final(&self, coord: ChunkCoord) -> bool {
        self.records.get(&coord).is_some_and(|record| {
            record.mesh == MeshState::Current && record.built_with_complete_neighborhood
        })
    }

    /// Marks the mesh of a generated chunk stale.
    pub fn mark_mesh_stale(&mut self, coord: ChunkCoord) {
        if let Some(record) = self.records.get_mut(&coord) {
            if record.generation == GenerationState::Generated {
                record.mesh = MeshState::Stale;
            }
        }
    }

    /// Edits a voxel of a generated chunk.
    ///
    /// The chunk's mesh goes stale, as do the meshes of neighbors whose faces
    /// or AO can see the voxel: one neighbor for a voxel on a border, three
    /// for a voxel on a vertical chunk edge.
    ///
    /// # Returns
    /// `false` if the owning chunk is not generated or `world_y` is out of range.
    pub fn set_voxel(&mut self, world_x: i32, world_y: i32, world_z: i32, block: BlockId) -> bool {
        if !self.store.set_voxel(world_x, world_y, world_z, block) {
            return false;
        }
        let coord = ChunkCoord::from_world(world_x, world_z);
        self.mark_mesh_stale(coord);

        let border = |local: i32, size: usize| match local {
            0 => -1,
            l if l == size as i32 - 1 => 1,
            _ => 0,
        };
        let dx = border(world_x.rem_euclid(CHUNK_WIDTH as i32), CHUNK_WIDTH);
        let dz = border(world_z.rem_euclid(CHUNK_DEPTH as i32), CHUNK_DEPTH);
        if dx != 0 {
            self.mark_mesh_stale(coord.offset(dx, 0));
        }
        if dz != 0 {
            self.mark_mesh_stale(coord.offset(0, dz));
        }
        if dx != 0 && dz != 0 {
            self.mark_mesh_stale(coord.offset(dx, dz));
        }
        true
    }

    /// Unrequested chunks within `radius` of `center`, nearest first.
    pub fn missing_chunks_near(&self, center: ChunkCoord, radius: i32) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = (-radius..=radius)
            .flat_map(|dx| (-radius..=radius).map(move |dz| center.offset(dx, dz)))
            .filter(|coord| !self.records.contains_key(coord))
            .collect();
        sort_nearest_first(&mut coords, center);
        coords
    }

    /// Requested chunks farther than `distance` from `center`.
    pub fn chunks_beyond(&self, center: ChunkCoord, distance: i32) -> Vec<ChunkCoord> {
        self.records
            .keys()
            .filter(|coord| coord.distance(center) > distance)
            .copied()
            .collect()
    }

    /// Forgets a chunk and drops its voxels.
    ///
    /// An outstanding generation task for it is not cancelled; its result will
    /// be discarded.
    pub fn unload(&mut self, coord: ChunkCoord) -> Option<VoxelChunk> {
        self.records.remove(&coord)?;
        debug!("Unloaded chunk {:?}", coord);
        self.store.remove(coord)
    }
}

/// Sorts by Chebyshev distance, then squared Euclidean distance, then coordinate.
fn sort_nearest_first(coords: &mut [ChunkCoord], center: ChunkCoord) {
    coords.sort_by_key(|coord| {
        let dx = (coord.x - center.x) as i64;
        let dz = (coord.z - center.z) as i64;
        (coord.distance(center), dx * dx + dz * dz, *coord)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::CHUNK_SIZE;
    use crate::engine_state::voxels::terrain::FlatTerrain;

    fn pipeline() -> (GenerationPipeline, TaskManager) {
        (
            GenerationPipeline::new(Arc::new(FlatTerrain::new(10))),
            TaskManager::new(0),
        )
    }

    fn settle(pipeline: &mut GenerationPipeline, tasks: &mut TaskManager) {
        for _ in 0..4 {
            pipeline.pump(tasks);
        }
    }

    fn build_mesh(pipeline: &mut GenerationPipeline, coord: ChunkCoord) {
        assert!(pipeline.begin_mesh_build(coord));
        pipeline.finish_mesh_build(coord);
    }

    #[test]
    fn request_moves_through_generation_states() {
        let (mut pipeline, mut tasks) = pipeline();
        let coord = ChunkCoord::new(0, 0);
        assert_eq!(pipeline.generation_state(coord), GenerationState::Unrequested);

        assert!(pipeline.request_chunk(coord, TaskPriority::Normal, &mut tasks));
        assert!(!pipeline.request_chunk(coord, TaskPriority::Normal, &mut tasks));
        assert_eq!(pipeline.generation_state(coord), GenerationState::Queued);

        pipeline.pump(&mut tasks);
        assert_eq!(pipeline.generation_state(coord), GenerationState::Generating);
        assert_eq!(
            pipeline.store().get_chunk(coord).map(|c| c.state()),
            Some(ChunkState::Generating)
        );

        pipeline.pump(&mut tasks);
        assert_eq!(pipeline.generation_state(coord), GenerationState::Generated);
        assert_eq!(pipeline.mesh_state(coord), Some(MeshState::Stale));
        assert_eq!(pipeline.get_chunks_needing_update(), vec![coord]);
    }

    #[test]
    fn initial_chunk_gate_opens_on_generation() {
        let (mut pipeline, mut tasks) = pipeline();
        pipeline.request_chunk(ChunkCoord::new(5, 5), TaskPriority::Normal, &mut tasks);
        let initial = pipeline.request_initial_chunk(Point3::new(40.0, 70.0, -3.0), &mut tasks);
        assert_eq!(initial, ChunkCoord::new(1, -1));
        assert!(!pipeline.is_initial_chunk_loaded());

        pipeline.pump(&mut tasks);
        assert!(!pipeline.is_initial_chunk_loaded());
        pipeline.pump(&mut tasks);
        assert!(pipeline.is_initial_chunk_loaded());
    }

    #[test]
    fn neighbor_generation_marks_incomplete_meshes_stale() {
        let (mut pipeline, mut tasks) = pipeline();
        let center = ChunkCoord::new(0, 0);
        pipeline.request_chunk(center, TaskPriority::Normal, &mut tasks);
        settle(&mut pipeline, &mut tasks);
        build_mesh(&mut pipeline, center);
        assert_eq!(pipeline.mesh_state(center), Some(MeshState::Current));
        assert!(!pipeline.is_mesh_final(center));

        pipeline.request_chunk(ChunkCoord::new(1, 1), TaskPriority::Normal, &mut tasks);
        settle(&mut pipeline, &mut tasks);
        assert_eq!(pipeline.mesh_state(center), Some(MeshState::Stale));
    }

    #[test]
    fn complete_neighborhood_meshes_stay_current() {
        let (mut pipeline, mut tasks) = pipeline();
        let center = ChunkCoord::new(0, 0);
        pipeline.request_chunk(center, TaskPriority::Normal, &mut tasks);
        for neighbor in center.neighbors() {
            pipeline.request_chunk(neighbor, TaskPriority::Normal, &mut tasks);
        }
        settle(&mut pipeline, &mut tasks);
        build_mesh(&mut pipeline, center);
        assert!(pipeline.is_mesh_final(center));

        pipeline.request_chunk(ChunkCoord::new(2, 0), TaskPriority::Normal, &mut tasks);
        settle(&mut pipeline, &mut tasks);
        assert_eq!(pipeline.mesh_state(center), Some(MeshState::Current));
    }

    #[test]
    fn results_for_unloaded_or_rerequested_chunks_are_discarded() {
        let (mut pipeline, mut tasks) = pipeline();
        let coord = ChunkCoord::new(3, 3);
        pipeline.request_chunk(coord, TaskPriority::Normal, &mut tasks);
        pipeline.pump(&mut tasks);
        assert!(pipeline.unload(coord).is_some());

        pipeline.request_chunk(coord, TaskPriority::Normal, &mut tasks);
        // Stale id for a live chunk.
        assert!(!pipeline.complete_generation(0, coord, vec![0; CHUNK_SIZE]));
        assert_eq!(pipeline.generation_state(coord), GenerationState::Queued);

        settle(&mut pipeline, &mut tasks);
        assert_eq!(pipeline.generation_state(coord), GenerationState::Generated);

        pipeline.request_chunk(ChunkCoord::new(9, 9), TaskPriority::Normal, &mut tasks);
        pipeline.unload(ChunkCoord::new(9, 9));
        settle(&mut pipeline, &mut tasks);
        assert_eq!(pipeline.generation_state(ChunkCoord::new(9, 9)), GenerationState::Unrequested);
        assert!(!pipeline.store().contains(ChunkCoord::new(9, 9)));
    }

    #[test]
    fn edits_on_a_corner_mark_three_neighbors_stale() {
        let (mut pipeline, mut tasks) = pipeline();
        let center = ChunkCoord::new(0, 0);
        pipeline.request_chunk(center, TaskPriority::Normal, &mut tasks);
        for neighbor in center.neighbors() {
            pipeline.request_chunk(neighbor, TaskPriority::Normal, &mut tasks);
        }
        settle(&mut pipeline, &mut tasks);
        let all: Vec<ChunkCoord> = pipeline.requested().collect();
        for coord in &all {
            build_mesh(&mut pipeline, *coord);
        }

        assert!(pipeline.set_voxel(31, 20, 0, 1));
        let mut stale = pipeline.get_chunks_needing_update();
        stale.sort();
        let mut expected = vec![
            center,
            ChunkCoord::new(1, 0),
            ChunkCoord::new(0, -1),
            ChunkCoord::new(1, -1),
        ];
        expected.sort();
        assert_eq!(stale, expected);
        assert_eq!(pipeline.store().get_voxel(31, 20, 0), 1);
    }

    #[test]
    fn missing_chunks_are_nearest_first() {
        let (mut pipeline, mut tasks) = pipeline();
        pipeline.request_chunk(ChunkCoord::new(0, 0), TaskPriority::Normal, &mut tasks);
        let missing = pipeline.missing_chunks_near(ChunkCoord::new(0, 0), 1);
        assert_eq!(missing.len(), 8);
        assert!(missing[..4].iter().all(|c| c.x == 0 || c.z == 0));
        assert!(missing[4..].iter().all(|c| c.x != 0 && c.z != 0));
    }

    #[test]
    fn failed_builds_return_to_stale() {
        let (mut pipeline, mut tasks) = pipeline();
        let coord = ChunkCoord::new(0, 0);
        pipeline.request_chunk(coord, TaskPriority::Normal, &mut tasks);
        settle(&mut pipeline, &mut tasks);

        assert!(pipeline.begin_mesh_build(coord));
        assert_eq!(pipeline.mesh_state(coord), Some(MeshState::Building));
        pipeline.abort_mesh_build(coord);
        assert_eq!(pipeline.mesh_state(coord), Some(MeshState::Stale));
        assert_eq!(pipeline.get_chunks_needing_update(), vec![coord]);
        assert!(!pipeline.store().get_chunk(coord).is_some_and(|c| c.has_mesh()));

        build_mesh(&mut pipeline, coord);
        assert_eq!(pipeline.mesh_state(coord), Some(MeshState::Current));
    }

    #[test]
    fn lost_tasks_are_published_again() {
        let (mut pipeline, mut tasks) = pipeline();
        let initial = pipeline.request_initial_chunk(Point3::new(0.5, 20.0, 0.5), &mut tasks);
        let other = ChunkCoord::new(4, 4);
        pipeline.request_chunk(other, TaskPriority::Normal, &mut tasks);
        let lost: Vec<TaskId> = pipeline.in_flight.keys().copied().collect();

        assert_eq!(pipeline.requeue_lost(&lost, &mut tasks), 2);
        // The old ids no longer serve anything.
        assert_eq!(pipeline.requeue_lost(&lost, &mut tasks), 0);
        assert_eq!(tasks.queued_len(), 4);
        assert_eq!(pipeline.generation_state(initial), GenerationState::Queued);

        settle(&mut pipeline, &mut tasks);
        assert!(pipeline.is_initial_chunk_loaded());
        assert_eq!(pipeline.generation_state(other), GenerationState::Generated);
        assert!(pipeline.in_flight.is_empty());
    }
}

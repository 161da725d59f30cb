use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cgmath::Point3;
use voxel_world::engine_state::voxels::pipeline::{GenerationState, MeshState};
use voxel_world::{
    BlockType, ChunkCoord, EngineConfig, EngineState, FlatTerrain, HeadlessBackend, ShadingMode,
    TerrainGenerator,
};

fn config() -> EngineConfig {
    EngineConfig {
        render_distance: 1,
        unload_distance: 2,
        worker_count: 0,
        max_meshes_per_update: 16,
        ..EngineConfig::default()
    }
}

fn engine(config: EngineConfig) -> EngineState<HeadlessBackend> {
    EngineState::new(config, Arc::new(FlatTerrain::new(10)), HeadlessBackend::new())
}

fn run(engine: &mut EngineState<HeadlessBackend>, viewer: Point3<f32>, frames: usize) {
    for _ in 0..frames {
        engine.update(viewer);
    }
}

#[test]
fn loads_and_meshes_the_render_distance() {
    let mut engine = engine(config());
    let viewer = Point3::new(0.5, 30.0, 0.5);

    let first = engine.update(viewer);
    assert_eq!(first.requested, 0);
    assert!(!engine.is_initial_chunk_loaded());

    let second = engine.update(viewer);
    assert!(engine.is_initial_chunk_loaded());
    assert_eq!(second.requested, 8);
    assert_eq!(second.meshed, 1);

    run(&mut engine, viewer, 4);
    let pipeline = engine.pipeline();
    assert_eq!(pipeline.len(), 9);
    for dx in -1..=1 {
        for dz in -1..=1 {
            let coord = ChunkCoord::new(dx, dz);
            assert_eq!(pipeline.generation_state(coord), GenerationState::Generated);
            assert_eq!(pipeline.mesh_state(coord), Some(MeshState::Current));
        }
    }
    assert!(pipeline.is_mesh_final(ChunkCoord::new(0, 0)));
    assert_eq!(engine.backend().resident(), 9);
    assert!(engine.is_idle());
}

#[test]
fn initial_chunk_is_remeshed_once_neighbors_arrive() {
    let mut engine = engine(config());
    let viewer = Point3::new(0.5, 30.0, 0.5);
    run(&mut engine, viewer, 2);
    assert_eq!(engine.backend().uploads(), 1);

    run(&mut engine, viewer, 2);
    // The initial chunk again, plus its eight neighbors.
    assert_eq!(engine.backend().uploads(), 10);
}

#[test]
fn moving_away_unloads_and_releases() {
    let mut engine = engine(config());
    run(&mut engine, Point3::new(0.5, 30.0, 0.5), 6);
    assert_eq!(engine.backend().resident(), 9);

    let far = Point3::new(5.0 * 32.0 + 0.5, 30.0, 0.5);
    let stats = engine.update(far);
    assert_eq!(stats.unloaded, 9);
    assert_eq!(stats.requested, 9);
    assert_eq!(engine.backend().releases(), 9);
    assert_eq!(engine.mesh_manager().len(), 0);
    assert_eq!(
        engine.pipeline().generation_state(ChunkCoord::new(0, 0)),
        GenerationState::Unrequested
    );

    run(&mut engine, far, 4);
    assert_eq!(engine.backend().resident(), 9);
    assert!(engine.backend().mesh(ChunkCoord::new(5, 0)).is_some());
}

#[test]
fn edits_on_a_corner_remesh_three_neighbors() {
    let mut engine = engine(config());
    let viewer = Point3::new(0.5, 30.0, 0.5);
    run(&mut engine, viewer, 6);
    let uploads = engine.backend().uploads();

    assert!(engine.set_voxel(31, 11, 31, BlockType::STONE as u8));
    for coord in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(
            engine.pipeline().mesh_state(ChunkCoord::new(coord.0, coord.1)),
            Some(MeshState::Stale)
        );
    }

    let stats = engine.update(viewer);
    assert_eq!(stats.meshed, 4);
    assert_eq!(engine.backend().uploads(), uploads + 4);
}

#[test]
fn edits_outside_generated_chunks_are_rejected() {
    let mut engine = engine(config());
    assert!(!engine.set_voxel(0, 11, 0, BlockType::STONE as u8));
}

/// Asserts that every loaded chunk with a current mesh is resident in the backend.
fn assert_loaded_chunks_resident(engine: &EngineState<HeadlessBackend>) {
    let pipeline = engine.pipeline();
    for coord in pipeline.requested() {
        assert_eq!(pipeline.mesh_state(coord), Some(MeshState::Current), "{coord:?}");
        assert!(engine.backend().mesh(coord).is_some(), "{coord:?} has no mesh");
        assert!(engine.mesh_manager().get_mesh(coord).is_some());
    }
    assert_eq!(engine.backend().resident(), pipeline.len());
}

#[test]
fn small_mesh_cache_still_keeps_every_loaded_chunk() {
    let mut engine = engine(EngineConfig {
        mesh_cache_capacity: 4,
        ..config()
    });
    assert_eq!(engine.config().mesh_cache_capacity, 25);

    let viewer = Point3::new(0.5, 30.0, 0.5);
    run(&mut engine, viewer, 200);
    assert_eq!(engine.pipeline().len(), 9);
    assert_loaded_chunks_resident(&engine);
}

#[test]
fn walking_keeps_loaded_chunks_resident() {
    let mut engine = engine(EngineConfig {
        mesh_cache_capacity: 25,
        ..config()
    });
    for step in 0..8 {
        let viewer = Point3::new(step as f32 * 32.0 + 0.5, 30.0, 0.5);
        run(&mut engine, viewer, 6);
        assert_loaded_chunks_resident(&engine);
    }
    assert!(engine.mesh_manager().len() <= 25);
}

/// Flat terrain whose first height query panics, taking its worker down.
struct FailsOnce {
    failed: AtomicBool,
    terrain: FlatTerrain,
}

impl TerrainGenerator for FailsOnce {
    fn height(&self, world_x: i32, world_z: i32) -> i32 {
        if !self.failed.swap(true, Ordering::SeqCst) {
            panic!("terrain source unavailable");
        }
        self.terrain.height(world_x, world_z)
    }
}

#[test]
fn initial_chunk_loads_after_its_worker_exits() {
    let generator = Arc::new(FailsOnce {
        failed: AtomicBool::new(false),
        terrain: FlatTerrain::new(10),
    });
    let mut engine = EngineState::new(
        EngineConfig {
            worker_count: 1,
            ..config()
        },
        generator,
        HeadlessBackend::new(),
    );
    let viewer = Point3::new(0.5, 30.0, 0.5);

    for _ in 0..400 {
        engine.update(viewer);
        if engine.is_initial_chunk_loaded() {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert!(engine.is_initial_chunk_loaded());
    assert_eq!(
        engine.pipeline().generation_state(ChunkCoord::new(0, 0)),
        GenerationState::Generated
    );

    // The remaining chunks generate inline.
    run(&mut engine, viewer, 6);
    assert_eq!(engine.pipeline().len(), 9);
    assert!(engine.is_idle());
    assert_loaded_chunks_resident(&engine);
}

#[test]
fn backend_receives_the_configured_shading() {
    let mut engine = engine(EngineConfig {
        shading: ShadingMode::Textured,
        ..config()
    });
    run(&mut engine, Point3::new(0.5, 30.0, 0.5), 2);
    let mesh = engine.backend().mesh(ChunkCoord::new(0, 0)).unwrap();
    assert_eq!(mesh.shading, ShadingMode::Textured);
    assert!(mesh.index_count > 0);
}

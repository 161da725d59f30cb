//! # Terrain Generation
//!
//! The height-field collaborator generation workers sample. A generator maps a
//! world-space voxel to a block id and must be deterministic for its seed, since
//! the same column may be generated again after its chunk is unloaded.
//!
//! Three generators ship with the engine:
//!
//! * [`PerlinTerrain`]: rolling hills from two octaves of Perlin noise, banded
//!   into sand, grass, dirt, stone and snow.
//! * [`FlatTerrain`]: a constant-height plain.
//! * [`ScatterTerrain`]: seeded random voxels below a ceiling, useful for
//!   stressing the meshers.

use noise::{NoiseFn, Perlin};

use super::block::{block_type::BlockType, BlockId, AIR};
use super::chunk::{ChunkCoord, ChunkCreationIterator, CHUNK_HEIGHT};

/// Terrain below this height is topped with sand.
const SAND_LINE: i32 = 44;
/// Terrain above this height is topped with snow.
const SNOW_LINE: i32 = 110;
/// Depth of the dirt layer under the surface block.
const DIRT_DEPTH: i32 = 3;

/// Scale applied to world coordinates before sampling the first octave.
const PERLIN_SCALE_FACTOR: f64 = 0.01;

/// Source of block ids for world-space voxels.
pub trait TerrainGenerator: Send + Sync {
    /// Height of the terrain surface in the given column.
    fn height(&self, world_x: i32, world_z: i32) -> i32;

    /// Block at a world-space voxel.
    ///
    /// The default implementation layers the column under [`Self::height`].
    fn block_at(&self, world_x: i32, world_y: i32, world_z: i32) -> BlockId {
        layered_block(self.height(world_x, world_z), world_y)
    }
}

/// Surface, dirt and stone layering for a column of the given height.
fn layered_block(height: i32, world_y: i32) -> BlockId {
    if world_y > height {
        AIR
    } else if world_y == height {
        match height {
            h if h < SAND_LINE => BlockType::SAND.id(),
            h if h > SNOW_LINE => BlockType::SNOW.id(),
            _ => BlockType::GRASS.id(),
        }
    } else if world_y > height - DIRT_DEPTH && height >= SAND_LINE {
        BlockType::DIRT.id()
    } else if world_y > height - DIRT_DEPTH {
        BlockType::SAND.id()
    } else {
        BlockType::STONE.id()
    }
}

/// Fills the voxel array of the chunk at `coord`, in storage order.
pub fn generate_voxels(generator: &dyn TerrainGenerator, coord: ChunkCoord) -> Vec<BlockId> {
    let mut cci = ChunkCreationIterator::new(coord);
    let Some((origin_x, origin_z)) = coord.world_origin() else {
        log::warn!("Chunk {:?} lies outside the addressable world, leaving it empty", coord);
        return cci.into_voxels();
    };

    while let Some(local) = cci.next_position() {
        let block = generator.block_at(
            origin_x + local.x as i32,
            local.y as i32,
            origin_z + local.z as i32,
        );
        cci.push_block(block);
    }
    cci.into_voxels()
}

/// Rolling hills from Perlin noise.
pub struct PerlinTerrain {
    perlin: Perlin,
    base_height: f64,
    amplitude: f64,
}

impl PerlinTerrain {
    /// Creates a generator for `seed` with the default hill profile.
    pub fn new(seed: u32) -> Self {
        PerlinTerrain {
            perlin: Perlin::new(seed),
            base_height: 64.0,
            amplitude: 40.0,
        }
    }

    fn sample(&self, world_x: i32, world_z: i32) -> f64 {
        let x = world_x as f64 * PERLIN_SCALE_FACTOR;
        let z = world_z as f64 * PERLIN_SCALE_FACTOR;
        let broad = self.perlin.get([x, z]);
        let detail = self.perlin.get([x * 4.0 + 17.3, z * 4.0 - 5.1]);
        broad + detail * 0.25
    }
}

impl TerrainGenerator for PerlinTerrain {
    fn height(&self, world_x: i32, world_z: i32) -> i32 {
        let height = self.base_height + self.sample(world_x, world_z) * self.amplitude;
        (height.round() as i32).clamp(1, CHUNK_HEIGHT as i32 - 1)
    }
}

/// A plain at constant height.
pub struct FlatTerrain {
    height: i32,
}

impl FlatTerrain {
    /// A plain whose surface is at world Y `height`.
    pub fn new(height: i32) -> Self {
        FlatTerrain { height }
    }
}

impl TerrainGenerator for FlatTerrain {
    fn height(&self, _world_x: i32, _world_z: i32) -> i32 {
        self.height
    }
}

/// Random solid voxels below a ceiling.
///
/// Each voxel is decided by its own seeded generator, so the result does not
/// depend on generation order.
pub struct ScatterTerrain {
    seed: u64,
    density: f64,
    ceiling: i32,
}

impl ScatterTerrain {
    /// Creates a scatter generator.
    ///
    /// # Arguments
    /// * `seed` - Seed for the per-voxel generators
    /// * `density` - Probability that a voxel below the ceiling is solid
    /// * `ceiling` - Highest world Y that may hold a solid voxel
    pub fn new(seed: u64, density: f64, ceiling: i32) -> Self {
        ScatterTerrain {
            seed,
            density: density.clamp(0.0, 1.0),
            ceiling,
        }
    }

    fn voxel_seed(&self, world_x: i32, world_y: i32, world_z: i32) -> u64 {
        let mut h = self.seed ^ 0x9E37_79B9_7F4A_7C15;
        for v in [world_x as u32, world_y as u32, world_z as u32] {
            h = (h ^ v as u64).wrapping_mul(0x100_0000_01B3);
            h ^= h >> 29;
        }
        h
    }
}

impl TerrainGenerator for ScatterTerrain {
    fn height(&self, _world_x: i32, _world_z: i32) -> i32 {
        self.ceiling
    }

    fn block_at(&self, world_x: i32, world_y: i32, world_z: i32) -> BlockId {
        if world_y > self.ceiling {
            return AIR;
        }
        let mut rng = fastrand::Rng::with_seed(self.voxel_seed(world_x, world_y, world_z));
        if rng.f64() < self.density {
            rng.u8(1..=BlockType::SNOW.id())
        } else {
            AIR
        }
    }
}

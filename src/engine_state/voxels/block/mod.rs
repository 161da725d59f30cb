//! # Block Module
//!
//! Block identifiers and the material table they index. A voxel is stored as a
//! bare [`BlockId`]; everything else about a block (solidity, base color) is
//! looked up here.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The integer type stored per voxel.
pub type BlockId = u8;

/// The empty block. Never solid, never rendered.
pub const AIR: BlockId = 0;

/// Color used for ids that have no entry in the material table.
pub const UNKNOWN_BLOCK_COLOR: [f32; 3] = [1.0, 0.0, 1.0];

/// Returns `true` if the block occludes its neighbors.
///
/// Every non-air id is solid, including ids missing from the material table.
#[inline]
pub fn is_solid(block: BlockId) -> bool {
    block != AIR
}

/// Base RGB color of a block id, before any lighting is applied.
pub fn base_color(block: BlockId) -> [f32; 3] {
    match BlockType::from_id(block) {
        Some(block_type) => block_type.base_color(),
        None => UNKNOWN_BLOCK_COLOR,
    }
}

//! # Block Type Module
//!
//! The material table: every named block type, its id and its base color.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockId;

/// Enumerates the block types known to the engine.
///
/// The discriminant is the [`BlockId`] stored in chunk voxel arrays, so the
/// order of variants is part of the persisted snapshot format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space.
    AIR = 0,
    /// Surface block of temperate terrain.
    GRASS = 1,
    /// Sub-surface soil.
    DIRT = 2,
    /// Bedrock and mountain mass.
    STONE = 3,
    /// Shoreline surface.
    SAND = 4,
    /// Tree trunks.
    WOOD = 5,
    /// Tree canopy.
    LEAVES = 6,
    /// Surface of high terrain.
    SNOW = 7,
}

impl BlockType {
    /// Looks up the block type for a stored id.
    ///
    /// # Returns
    /// `None` for ids that have no entry in the table.
    pub fn from_id(id: BlockId) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    /// The id stored in voxel arrays for this type.
    pub fn id(self) -> BlockId {
        self as BlockId
    }

    /// Unlit RGB color of the block, each channel in `[0, 1]`.
    pub fn base_color(self) -> [f32; 3] {
        match self {
            BlockType::AIR => [0.0, 0.0, 0.0],
            BlockType::GRASS => [0.36, 0.66, 0.25],
            BlockType::DIRT => [0.52, 0.37, 0.22],
            BlockType::STONE => [0.5, 0.5, 0.52],
            BlockType::SAND => [0.86, 0.80, 0.55],
            BlockType::WOOD => [0.45, 0.32, 0.18],
            BlockType::LEAVES => [0.22, 0.50, 0.18],
            BlockType::SNOW => [0.95, 0.96, 0.98],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_the_table() {
        for id in 0..=7u8 {
            let block_type = BlockType::from_id(id).unwrap();
            assert_eq!(block_type.id(), id);
        }
        assert_eq!(BlockType::from_id(8), None);
    }

    #[test]
    fn colors_are_normalized() {
        for id in 0..=7u8 {
            let color = BlockType::from_id(id).unwrap().base_color();
            assert!(color.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}

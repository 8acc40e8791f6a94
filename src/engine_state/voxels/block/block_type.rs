//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides conversion between the compact on-voxel id and the rich enum type.

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockId;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminant of each variant is the id stored in voxels and in the edit store.
/// `EMPTY` (id 0) is air: it is never rendered and never collides.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Air. Non-solid and transparent.
    EMPTY = 0,

    /// The top surface block of every terrain column above the water line.
    GRASS = 1,

    /// Fill between a column's surface and the resource layer.
    DIRT = 2,

    /// The most common underground resource.
    STONE = 3,

    /// Coal ore.
    COAL = 4,

    /// Iron ore.
    IRON = 5,

    /// Tree trunk.
    TREE = 6,

    /// Tree canopy.
    LEAVES = 7,

    /// Replaces grass and dirt at or below the water line.
    SAND = 8,

    /// Placed at the top layer of a chunk by the cloud pass.
    CLOUD = 9,
}

impl BlockType {
    /// Number of block types, air included.
    pub const COUNT: usize = 10;

    /// Converts a voxel id into a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id does not correspond to a known block type.
    pub fn from_id(id: BlockId) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// Returns the compact id stored in voxels.
    pub fn id(self) -> BlockId {
        self as BlockId
    }

    /// Returns true for every type except `EMPTY`.
    pub fn is_solid(self) -> bool {
        self != BlockType::EMPTY
    }
}

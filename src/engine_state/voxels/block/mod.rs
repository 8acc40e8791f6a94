//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block faces, the block catalogue and the
//! per-voxel data structure stored in chunks.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;
pub mod registry;

/// The underlying integer type used to represent block types in memory.
pub type BlockId = u8;

/// Represents a single voxel in a chunk.
///
/// `instance_slot` is the index of this voxel's transform in its block type's instance
/// buffer for the owning chunk. Air voxels and fully obscured voxels have no slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Block {
    /// The type of this block, encoded as a `BlockId` for compact storage.
    pub block_type: BlockId,
    /// Render instance slot, if this voxel is currently drawn.
    pub instance_slot: Option<u32>,
}

impl Block {
    /// Creates a new block of the specified type with no render instance.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type.id(),
            instance_slot: None,
        }
    }

    /// An air voxel.
    pub fn empty() -> Self {
        Block::new(BlockType::EMPTY)
    }

    /// Returns true if this voxel is air.
    pub fn is_empty(&self) -> bool {
        self.block_type == BlockType::EMPTY.id()
    }
}

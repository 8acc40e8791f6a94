//! # Rendering Interface
//!
//! The core does not draw anything. It owns the lifecycle of render-instance slots
//! and exposes, per chunk and per block type, the packed list of instance transforms a
//! renderer needs to draw that chunk with one instanced draw call per block type.
//!
//! ## Key Components
//!
//! * `InstanceBuffer` - Densely packed instances of one block type in one chunk
//! * `ChunkInstances` - The instance buffers of every block type for one chunk
//! * `SceneAdapter` - The seam through which a renderer's scene graph follows the world

use super::voxels::block::{block_type::BlockType, BlockId};
use instance_buffer::InstanceBuffer;

pub mod instance_buffer;
pub mod scene;

/// The instance buffers of one chunk, indexed by block id.
#[derive(Debug, Clone)]
pub struct ChunkInstances {
    buffers: Vec<InstanceBuffer>,
}

impl ChunkInstances {
    /// Creates one empty buffer for each of `block_type_count` block types.
    pub fn new(block_type_count: usize) -> Self {
        ChunkInstances {
            buffers: vec![InstanceBuffer::new(); block_type_count],
        }
    }

    pub fn buffer(&self, block_id: BlockId) -> Option<&InstanceBuffer> {
        self.buffers.get(block_id as usize)
    }

    pub fn buffer_mut(&mut self, block_id: BlockId) -> Option<&mut InstanceBuffer> {
        self.buffers.get_mut(block_id as usize)
    }

    /// Iterates over the non-empty buffers together with their block type.
    pub fn iter(&self) -> impl Iterator<Item = (BlockType, &InstanceBuffer)> {
        self.buffers
            .iter()
            .enumerate()
            .filter(|(_, buffer)| !buffer.is_empty())
            .filter_map(|(id, buffer)| BlockType::from_id(id as BlockId).map(|t| (t, buffer)))
    }

    /// Total number of active instances across all block types.
    pub fn total(&self) -> usize {
        self.buffers.iter().map(InstanceBuffer::len).sum()
    }

    /// Releases every instance of every block type.
    pub fn clear(&mut self) {
        self.buffers.iter_mut().for_each(InstanceBuffer::clear);
    }
}

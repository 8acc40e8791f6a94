//! # Scene Adapter
//!
//! The seam between the voxel world and a renderer's scene graph. The engine calls
//! `sync_chunk` for every chunk whose instances changed since the last frame and
//! `remove_chunk` for every chunk that was unloaded. An adapter is expected to draw
//! one instanced mesh per block type per chunk, plus the chunk's water plane.

use std::collections::HashMap;

use log::debug;

use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::chunk::{Chunk, ChunkCoord, WaterPlane};

/// Something that mirrors the loaded chunks into a drawable scene.
pub trait SceneAdapter {
    /// Uploads the current instances and water plane of `chunk`.
    fn sync_chunk(&mut self, chunk: &Chunk);

    /// Drops everything drawn for the chunk at `coord`.
    fn remove_chunk(&mut self, coord: ChunkCoord);
}

/// What the headless scene keeps for one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneChunk {
    /// Number of drawn instances per block type.
    pub instance_counts: Vec<(BlockType, usize)>,
    pub water: WaterPlane,
}

/// A scene that records what would be drawn without drawing it.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    chunks: HashMap<ChunkCoord, SceneChunk>,
    syncs: usize,
    uploaded_bytes: usize,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&SceneChunk> {
        self.chunks.get(&coord)
    }

    /// Number of chunks currently in the scene.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of instances across every chunk in the scene.
    pub fn total_instances(&self) -> usize {
        self.chunks
            .values()
            .flat_map(|chunk| chunk.instance_counts.iter().map(|(_, count)| count))
            .sum()
    }

    /// How many chunk uploads have happened so far.
    pub fn sync_count(&self) -> usize {
        self.syncs
    }

    /// Bytes of instance data a GPU renderer would have uploaded so far.
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }
}

impl SceneAdapter for HeadlessScene {
    fn sync_chunk(&mut self, chunk: &Chunk) {
        let instance_counts: Vec<(BlockType, usize)> = chunk
            .instances()
            .iter()
            .map(|(block_type, buffer)| (block_type, buffer.len()))
            .collect();
        let bytes: usize = chunk
            .instances()
            .iter()
            .map(|(_, buffer)| buffer.as_bytes().len())
            .sum();

        debug!(
            "Scene sync of chunk ({}, {}): {} instances",
            chunk.coord().x,
            chunk.coord().z,
            chunk.instances().total()
        );

        self.syncs += 1;
        self.uploaded_bytes += bytes;
        self.chunks.insert(
            chunk.coord(),
            SceneChunk {
                instance_counts,
                water: chunk.water_plane(),
            },
        );
    }

    fn remove_chunk(&mut self, coord: ChunkCoord) {
        if self.chunks.remove(&coord).is_some() {
            debug!("Scene removed chunk ({}, {})", coord.x, coord.z);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::ChunkSize;
    use crate::engine_state::voxels::edit_store::EditStore;

    #[test]
    fn tracks_synced_and_removed_chunks() {
        let mut chunk = Chunk::new(
            ChunkCoord::new(2, 3),
            ChunkSize {
                width: 4,
                height: 4,
            },
            BlockType::COUNT,
        );
        let mut edits = EditStore::new();
        chunk.add_block(0, 0, 0, BlockType::STONE.id(), &mut edits);
        chunk.add_block(1, 0, 0, BlockType::STONE.id(), &mut edits);
        chunk.add_block(2, 0, 0, BlockType::LEAVES.id(), &mut edits);

        let mut scene = HeadlessScene::new();
        scene.sync_chunk(&chunk);

        assert_eq!(scene.chunk_count(), 1);
        assert_eq!(scene.total_instances(), 3);
        assert_eq!(
            scene.chunk(ChunkCoord::new(2, 3)).unwrap().instance_counts,
            vec![(BlockType::STONE, 2), (BlockType::LEAVES, 1)]
        );

        scene.remove_chunk(ChunkCoord::new(2, 3));
        assert_eq!(scene.chunk_count(), 0);
        assert_eq!(scene.sync_count(), 1);
        assert_eq!(scene.uploaded_bytes(), 3 * 64);
    }
}

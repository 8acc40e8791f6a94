//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which runs the generation pipeline of
//! one chunk from the deferred task queue. It is scheduled when asynchronous loading
//! is enabled and a chunk enters the draw window.

use log::debug;

use crate::engine_state::{
    task_management::task::Task,
    voxels::{chunk::ChunkCoord, world::World},
};

/// Generates the chunk at `coord` when processed.
pub struct ChunkGenerationTask {
    /// The chunk grid position of the chunk to generate
    coord: ChunkCoord,
}

impl ChunkGenerationTask {
    pub fn new(coord: ChunkCoord) -> Self {
        ChunkGenerationTask { coord }
    }
}

impl Task<World> for ChunkGenerationTask {
    /// Generates the chunk if it is still in the world and not yet loaded.
    ///
    /// A chunk that was unloaded while the task waited is skipped.
    fn process(self: Box<Self>, world: &mut World) {
        if !world.generate_chunk(self.coord) {
            debug!(
                "Skipped generation of chunk ({}, {}): no longer pending",
                self.coord.x, self.coord.z
            );
        }
    }

    fn describe(&self) -> String {
        format!("generate chunk ({}, {})", self.coord.x, self.coord.z)
    }
}

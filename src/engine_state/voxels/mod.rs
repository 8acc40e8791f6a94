//! # Voxel World Core
//!
//! This module contains the voxel world: block definitions, chunk storage and
//! generation, player edits, and the world that streams chunks around the player.
//!
//! ## Architecture
//!
//! * **Block**: Block types, the block catalogue and the per-voxel record
//! * **Chunk**: Dense voxel storage, the generation pipeline and render instances
//! * **Edit Store**: Player edits that survive chunk unload and regeneration
//! * **World**: Chunk streaming, coordinate mapping and cross-chunk visibility
//! * **Tasks**: Deferred chunk generation
//!
//! ## Data Flow
//!
//! 1. The world receives block queries and edits in world coordinates
//! 2. It delegates to the owning chunk and records edits in the edit store
//! 3. Neighbouring blocks, possibly in other chunks, are re-checked for visibility
//! 4. Chunks whose instances changed are reported to the scene

use block::Block;

pub mod block;
pub mod chunk;
pub mod edit_store;
pub mod generation_params;
pub mod tasks;
pub mod world;

/// Read access to blocks by world coordinate.
///
/// Physics and other consumers depend on this instead of on `World` directly.
pub trait VoxelQuery {
    /// The block at a world coordinate, or `None` where nothing is loaded.
    fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block>;

    /// Returns true if a non-air block occupies the cell.
    fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).is_some_and(|block| !block.is_empty())
    }
}

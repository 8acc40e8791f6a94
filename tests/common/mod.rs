#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use voxel_sandbox::engine_state::voxels::{
    block::registry::BlockRegistry,
    chunk::ChunkSize,
    generation_params::GenerationParams,
    world::{World, WorldSettings},
};

pub const SMALL_CHUNK: ChunkSize = ChunkSize {
    width: 8,
    height: 16,
};

/// Cheap but fully featured generation parameters.
pub fn light_params(seed: u32) -> GenerationParams {
    let mut params = GenerationParams::default();
    params.terrain.seed = seed;
    params.terrain.octaves = 3;
    params.trees.frequency = 0.05;
    params.trees.canopy.min_radius = 1;
    params.trees.canopy.max_radius = 2;
    params.trees.trunk.max_height = 4;
    params
}

/// A heightfield flattened at y = 4 with nothing else on it.
pub fn flat_params() -> GenerationParams {
    let mut params = GenerationParams::default();
    params.terrain.magnitude = 0.0;
    params.terrain.offset = 4.0;
    params.terrain.water_offset = -1;
    params.terrain.octaves = 1;
    params.resources.clear();
    params.trees.frequency = 0.0;
    params.clouds.density = -1.0;
    params
}

pub fn world_with(params: GenerationParams, async_loading: bool) -> World {
    World::new(
        WorldSettings {
            chunk_size: SMALL_CHUNK,
            draw_distance: 1,
            async_loading,
            generation_timeout: Duration::from_secs(1),
        },
        params,
        Arc::new(BlockRegistry::standard()),
    )
}

/// Checks every loaded chunk: each non-air block has an instance exactly when it is
/// not obscured, and every instance slot points back at the block that owns it.
pub fn assert_instances_consistent(world: &World) {
    for chunk in world.chunks().filter(|chunk| chunk.is_loaded()) {
        let origin = chunk.origin();
        for (local, block) in chunk.iter_blocks() {
            let (x, y, z) = (origin.x + local.x, local.y, origin.z + local.z);
            let obscured = world.is_block_obscured(x, y, z);
            assert_eq!(
                block.instance_slot.is_some(),
                !obscured,
                "block at ({x}, {y}, {z}) in chunk {:?}",
                chunk.coord()
            );

            if let Some(slot) = block.instance_slot {
                let buffer = chunk.instances().buffer(block.block_type).unwrap();
                assert_eq!(buffer.owner(slot), Some(local));
            }
        }

        for (block_type, buffer) in chunk.instances().iter() {
            for slot in 0..buffer.len() as u32 {
                let owner = buffer.owner(slot).unwrap();
                let block = chunk.get_block(owner.x, owner.y, owner.z).unwrap();
                assert_eq!(block.block_type, block_type.id());
                assert_eq!(block.instance_slot, Some(slot));
            }
        }
    }
}

//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a dense `width × height × width` column of
//! voxels, the generation pipeline that fills it, and the render instances derived
//! from it.
//!
//! ## Storage
//!
//! Voxels are stored in a flat vector in y-major order (`x` varies fastest, then `z`,
//! then `y`). Every voxel records its block id and, when it is drawn, the slot of its
//! render instance. This makes solidity checks, edits and instance maintenance O(1).
//!
//! ## Instances
//!
//! A voxel is drawn only if it is not air and at least one of its six faces touches
//! air. Within a chunk only in-chunk neighbours are known; neighbours outside the chunk
//! are treated as air here and refined by the world once adjacent chunks are loaded.

use cgmath::Point3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine_state::noise::NoiseGenerator;
use crate::engine_state::rendering::{instance_buffer::InstanceTransform, ChunkInstances};

use super::block::{block_side::BlockSide, block_type::BlockType, Block, BlockId};
use super::edit_store::EditStore;
use super::generation_params::GenerationParams;

mod chunk_creation;
pub mod chunk_iteration;

use chunk_iteration::ChunkBlockIterator;

/// Default horizontal dimension of a chunk in blocks.
pub const CHUNK_WIDTH: i32 = 24;
/// Default vertical dimension of a chunk in blocks.
pub const CHUNK_HEIGHT: i32 = 32;

/// Position of a chunk on the horizontal chunk grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }
}

/// Dimensions shared by every chunk of a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChunkSize {
    pub width: i32,
    pub height: i32,
}

impl ChunkSize {
    /// Number of voxels in one chunk.
    pub fn volume(&self) -> usize {
        (self.width.max(0) as usize).pow(2) * self.height.max(0) as usize
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        ChunkSize {
            width: CHUNK_WIDTH,
            height: CHUNK_HEIGHT,
        }
    }
}

/// Represents one chunk of the voxel world.
pub struct Chunk {
    coord: ChunkCoord,
    size: ChunkSize,
    blocks: Vec<Block>,
    instances: ChunkInstances,
    /// Highest sand layer of the generation this chunk was built with.
    water_level: i32,
    is_loaded: bool,
}

/// Where a chunk's water surface should be drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaterPlane {
    /// World-space centre of the plane.
    pub center: Point3<f32>,
    /// Edge length of the square plane.
    pub size: f32,
}

impl Chunk {
    /// Creates a new, empty chunk that is not yet loaded.
    ///
    /// # Arguments
    /// * `coord` - The chunk grid position of the new chunk
    /// * `size` - The dimensions of the chunk
    /// * `block_type_count` - Number of block types that need an instance buffer
    pub fn new(coord: ChunkCoord, size: ChunkSize, block_type_count: usize) -> Self {
        Chunk {
            coord,
            size,
            blocks: vec![Block::empty(); size.volume()],
            instances: ChunkInstances::new(block_type_count),
            water_level: 0,
            is_loaded: false,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn size(&self) -> ChunkSize {
        self.size
    }

    /// World-space position of the chunk's local `(0, 0, 0)` voxel.
    pub fn origin(&self) -> Point3<i32> {
        Point3::new(
            self.coord.x * self.size.width,
            0,
            self.coord.z * self.size.width,
        )
    }

    /// Returns true once generation has completed.
    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// The render instances of this chunk.
    pub fn instances(&self) -> &ChunkInstances {
        &self.instances
    }

    /// Runs the full generation pipeline and builds the render instances.
    ///
    /// The stages run in a fixed order and each may overwrite voxels written by the
    /// stages before it: resources, terrain, trees, clouds, then the player edits
    /// recorded in `edits`, which override everything procedural.
    ///
    /// # Arguments
    /// * `params` - The generation parameters
    /// * `edits` - Player edits to replay over the procedural result
    pub fn generate(&mut self, params: &GenerationParams, edits: &EditStore) {
        let start = web_time::Instant::now();
        let noise = NoiseGenerator::new(params.noise_config());

        self.initialize_terrain();
        self.generate_resources(&noise, params);
        self.generate_terrain(&noise, params);
        self.generate_trees(params);
        self.generate_clouds(&noise, params);
        self.load_player_changes(edits);
        self.generate_meshes();

        self.water_level = params.terrain.water_offset;
        self.is_loaded = true;

        debug!(
            "Chunk ({}, {}) generated with {} instances in {:?}",
            self.coord.x,
            self.coord.z,
            self.instances.total(),
            start.elapsed()
        );
    }

    /// Rebuilds every render instance from the voxel data.
    ///
    /// Voxels are visited in storage order, so the slot assignment is deterministic.
    fn generate_meshes(&mut self) {
        self.instances.clear();
        for block in self.blocks.iter_mut() {
            block.instance_slot = None;
        }

        let visible: Vec<Point3<i32>> = self
            .iter_blocks()
            .filter(|(position, _)| !self.is_obscured(position.x, position.y, position.z))
            .map(|(position, _)| position)
            .collect();

        for position in visible {
            self.add_block_instance(position.x, position.y, position.z);
        }
    }

    /// Iterates over every non-air voxel together with its local position.
    pub fn iter_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// Returns true if the local coordinates fall inside the chunk.
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        (0..self.size.width).contains(&x)
            && (0..self.size.height).contains(&y)
            && (0..self.size.width).contains(&z)
    }

    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        let width = self.size.width as usize;
        Some(x as usize + width * (z as usize + width * y as usize))
    }

    /// Gets the voxel at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// `None` if the coordinates are outside the chunk.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        self.index(x, y, z).map(|index| self.blocks[index])
    }

    /// Sets the block id of a voxel without touching its render instance.
    ///
    /// Out-of-bounds coordinates are ignored.
    pub fn set_block_id(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        if let Some(index) = self.index(x, y, z) {
            self.blocks[index].block_type = id;
        }
    }

    fn set_block_instance_slot(&mut self, x: i32, y: i32, z: i32, slot: Option<u32>) {
        if let Some(index) = self.index(x, y, z) {
            self.blocks[index].instance_slot = slot;
        }
    }

    /// Places a block of type `id` at an air voxel and records the edit.
    ///
    /// # Returns
    /// `false` (and does nothing) if the voxel is out of bounds or not air.
    pub fn add_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        id: BlockId,
        edits: &mut EditStore,
    ) -> bool {
        match self.get_block(x, y, z) {
            Some(block) if block.is_empty() => {}
            _ => return false,
        }

        self.set_block_id(x, y, z, id);
        self.add_block_instance(x, y, z);
        let origin = self.origin();
        edits.set(origin.x, origin.z, x, y, z, id);
        true
    }

    /// Turns a non-air voxel into air, releasing its instance, and records the edit.
    ///
    /// # Returns
    /// `false` (and does nothing) if the voxel is out of bounds or already air.
    pub fn remove_block(&mut self, x: i32, y: i32, z: i32, edits: &mut EditStore) -> bool {
        match self.get_block(x, y, z) {
            Some(block) if !block.is_empty() => {}
            _ => return false,
        }

        self.delete_block_instance(x, y, z);
        self.set_block_id(x, y, z, BlockType::EMPTY.id());
        let origin = self.origin();
        edits.set(origin.x, origin.z, x, y, z, BlockType::EMPTY.id());
        true
    }

    /// Allocates a render instance for a non-air voxel that has none.
    ///
    /// # Returns
    /// `true` if an instance was allocated.
    pub fn add_block_instance(&mut self, x: i32, y: i32, z: i32) -> bool {
        let block = match self.get_block(x, y, z) {
            Some(block) if !block.is_empty() && block.instance_slot.is_none() => block,
            _ => return false,
        };

        let origin = self.origin();
        let transform = InstanceTransform::from_position(Point3::new(
            (origin.x + x) as f32,
            (origin.y + y) as f32,
            (origin.z + z) as f32,
        ));

        let Some(buffer) = self.instances.buffer_mut(block.block_type) else {
            return false;
        };
        let slot = buffer.push(Point3::new(x, y, z), transform);
        self.set_block_instance_slot(x, y, z, Some(slot));
        true
    }

    /// Releases the render instance of a voxel.
    ///
    /// The last instance of the same block type is moved into the freed slot and the
    /// voxel owning it is updated to point at its new slot.
    ///
    /// # Returns
    /// `true` if an instance was released.
    pub fn delete_block_instance(&mut self, x: i32, y: i32, z: i32) -> bool {
        let (block_type, slot) = match self.get_block(x, y, z) {
            Some(Block {
                block_type,
                instance_slot: Some(slot),
            }) => (block_type, slot),
            _ => return false,
        };

        let Some(buffer) = self.instances.buffer_mut(block_type) else {
            return false;
        };
        if let Some(moved) = buffer.swap_remove(slot) {
            self.set_block_instance_slot(moved.x, moved.y, moved.z, Some(slot));
        }
        self.set_block_instance_slot(x, y, z, None);
        true
    }

    /// Returns true if all six face neighbours of the voxel are non-air.
    ///
    /// Neighbours outside the chunk count as air.
    pub fn is_obscured(&self, x: i32, y: i32, z: i32) -> bool {
        BlockSide::neighbours(x, y, z)
            .iter()
            .all(|&(nx, ny, nz)| self.get_block(nx, ny, nz).is_some_and(|b| !b.is_empty()))
    }

    /// Where the renderer should draw this chunk's water surface.
    pub fn water_plane(&self) -> WaterPlane {
        let origin = self.origin();
        let half = self.size.width as f32 / 2.0;
        WaterPlane {
            center: Point3::new(
                origin.x as f32 + half,
                self.water_level as f32 + 0.4,
                origin.z as f32 + half,
            ),
            size: self.size.width as f32,
        }
    }

    /// Releases every render instance. Called when the chunk is unloaded.
    pub fn dispose_instances(&mut self) {
        self.instances.clear();
        for block in self.blocks.iter_mut() {
            block.instance_slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: ChunkSize = ChunkSize {
        width: 8,
        height: 16,
    };

    fn empty_chunk() -> Chunk {
        let mut chunk = Chunk::new(ChunkCoord::new(1, -1), SIZE, BlockType::COUNT);
        chunk.is_loaded = true;
        chunk
    }

    fn small_params() -> GenerationParams {
        let mut params = GenerationParams::default();
        params.terrain.octaves = 3;
        params.trees.frequency = 0.2;
        params.trees.canopy.max_radius = 2;
        params
    }

    fn assert_slots_consistent(chunk: &Chunk) {
        for (position, block) in chunk.iter_blocks() {
            if let Some(slot) = block.instance_slot {
                let buffer = chunk.instances().buffer(block.block_type).unwrap();
                assert_eq!(buffer.owner(slot), Some(position));
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

    #[test]
    fn out_of_bounds_access_returns_none() {
        let chunk = empty_chunk();
        assert_eq!(chunk.get_block(-1, 0, 0), None);
        assert_eq!(chunk.get_block(0, SIZE.height, 0), None);
        assert_eq!(chunk.get_block(0, 0, SIZE.width), None);
        assert!(chunk.get_block(0, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn origin_is_chunk_index_times_width() {
        assert_eq!(empty_chunk().origin(), Point3::new(8, 0, -8));
    }

    #[test]
    fn add_and_remove_record_edits() {
        let mut chunk = empty_chunk();
        let mut edits = EditStore::new();

        assert!(chunk.add_block(2, 3, 4, BlockType::STONE.id(), &mut edits));
        assert!(!chunk.add_block(2, 3, 4, BlockType::DIRT.id(), &mut edits));
        assert_eq!(chunk.get_block(2, 3, 4).unwrap().block_type, BlockType::STONE.id());
        assert_eq!(chunk.get_block(2, 3, 4).unwrap().instance_slot, Some(0));
        assert_eq!(edits.get(8, -8, 2, 3, 4), Some(BlockType::STONE.id()));

        assert!(chunk.remove_block(2, 3, 4, &mut edits));
        assert!(!chunk.remove_block(2, 3, 4, &mut edits));
        assert_eq!(chunk.get_block(2, 3, 4), Some(Block::empty()));
        assert_eq!(edits.get(8, -8, 2, 3, 4), Some(BlockType::EMPTY.id()));
        assert_eq!(chunk.instances().total(), 0);
    }

    #[test]
    fn removing_an_instance_patches_the_moved_voxel() {
        let mut chunk = empty_chunk();
        let mut edits = EditStore::new();
        for x in 0..4 {
            chunk.add_block(x, 0, 0, BlockType::DIRT.id(), &mut edits);
        }

        chunk.remove_block(1, 0, 0, &mut edits);

        assert_eq!(chunk.get_block(3, 0, 0).unwrap().instance_slot, Some(1));
        assert_eq!(chunk.instances().buffer(BlockType::DIRT.id()).unwrap().len(), 3);
        assert_slots_consistent(&chunk);
    }

    #[test]
    fn slot_zero_instances_can_be_deleted() {
        let mut chunk = empty_chunk();
        let mut edits = EditStore::new();
        chunk.add_block(0, 0, 0, BlockType::SAND.id(), &mut edits);
        assert_eq!(chunk.get_block(0, 0, 0).unwrap().instance_slot, Some(0));

        assert!(chunk.delete_block_instance(0, 0, 0));
        assert_eq!(chunk.get_block(0, 0, 0).unwrap().instance_slot, None);
        assert_eq!(chunk.instances().total(), 0);
    }

    #[test]
    fn obscured_requires_all_six_neighbours() {
        let mut chunk = empty_chunk();
        let mut edits = EditStore::new();
        chunk.add_block(3, 3, 3, BlockType::STONE.id(), &mut edits);
        for (x, y, z) in BlockSide::neighbours(3, 3, 3).iter().skip(1) {
            chunk.add_block(*x, *y, *z, BlockType::STONE.id(), &mut edits);
        }
        assert!(!chunk.is_obscured(3, 3, 3));

        let (x, y, z) = BlockSide::neighbours(3, 3, 3)[0];
        chunk.add_block(x, y, z, BlockType::STONE.id(), &mut edits);
        assert!(chunk.is_obscured(3, 3, 3));

        // Edge voxels always border the outside of the chunk.
        assert!(!chunk.is_obscured(0, 3, 3));
    }

    #[test]
    fn generation_is_deterministic() {
        let params = small_params();
        let edits = EditStore::new();
        let mut a = Chunk::new(ChunkCoord::new(-2, 5), SIZE, BlockType::COUNT);
        let mut b = Chunk::new(ChunkCoord::new(-2, 5), SIZE, BlockType::COUNT);
        a.generate(&params, &edits);
        b.generate(&params, &edits);

        assert!(a.is_loaded());
        assert_eq!(a.blocks, b.blocks);
        for id in 0..BlockType::COUNT as BlockId {
            assert_eq!(
                a.instances().buffer(id).unwrap().transforms(),
                b.instances().buffer(id).unwrap().transforms()
            );
        }
    }

    #[test]
    fn generated_instances_match_in_chunk_visibility() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), SIZE, BlockType::COUNT);
        chunk.generate(&small_params(), &EditStore::new());

        for (position, block) in chunk.iter_blocks() {
            let obscured = chunk.is_obscured(position.x, position.y, position.z);
            assert_eq!(block.instance_slot.is_some(), !obscured, "{position:?}");
        }
        assert_slots_consistent(&chunk);
    }

    #[test]
    fn player_edits_override_generation() {
        let params = small_params();
        let mut edits = EditStore::new();
        edits.set(0, 0, 1, 0, 1, BlockType::EMPTY.id());
        edits.set(0, 0, 2, SIZE.height - 2, 2, BlockType::IRON.id());

        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), SIZE, BlockType::COUNT);
        chunk.generate(&params, &edits);

        assert!(chunk.get_block(1, 0, 1).unwrap().is_empty());
        assert_eq!(
            chunk.get_block(2, SIZE.height - 2, 2).unwrap().block_type,
            BlockType::IRON.id()
        );
    }

    #[test]
    fn dispose_releases_all_instances() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), SIZE, BlockType::COUNT);
        chunk.generate(&small_params(), &EditStore::new());
        assert!(chunk.instances().total() > 0);

        chunk.dispose_instances();
        assert_eq!(chunk.instances().total(), 0);
        assert!(chunk.iter_blocks().all(|(_, block)| block.instance_slot.is_none()));
    }

    #[test]
    fn water_plane_sits_above_water_level() {
        let mut chunk = Chunk::new(ChunkCoord::new(1, 0), SIZE, BlockType::COUNT);
        chunk.generate(&small_params(), &EditStore::new());
        let plane = chunk.water_plane();
        assert_eq!(plane.center.x, 12.0);
        assert!((plane.center.y - 5.4).abs() < 1e-5);
        assert_eq!(plane.center.z, 4.0);
        assert_eq!(plane.size, 8.0);
    }
}

//! # Chunk Creation Module
//!
//! The procedural stages of chunk generation. Each stage writes straight into the
//! chunk's dense voxel storage and may overwrite what the previous stages produced:
//!
//! 1. `initialize_terrain` - every voxel becomes air
//! 2. `generate_resources` - 3D noise veins of stone, coal and iron
//! 3. `generate_terrain` - a 2D heightfield of sand, grass and dirt
//! 4. `generate_trees` - trunks and leaf canopies on grass
//! 5. `generate_clouds` - a sparse cloud layer at the top of the chunk
//! 6. `load_player_changes` - the recorded player edits
//!
//! Every stage is a pure function of the generation parameters and the chunk
//! coordinate. Vegetation draws from a `fastrand::Rng` seeded from both, so two
//! generations of the same chunk are identical.

use crate::engine_state::noise::NoiseGenerator;
use crate::engine_state::voxels::block::{block_type::BlockType, Block};
use crate::engine_state::voxels::edit_store::EditStore;
use crate::engine_state::voxels::generation_params::{GenerationParams, TreeParams};

use super::{Chunk, ChunkCoord};

/// Derives the vegetation seed of a chunk from the terrain seed.
fn vegetation_seed(seed: u32, coord: ChunkCoord) -> u64 {
    let mut hash = seed as u64 ^ 0x9E37_79B9_7F4A_7C15;
    hash = (hash ^ coord.x as u32 as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    hash = (hash ^ ((coord.z as u32 as u64) << 32)).wrapping_mul(0x94D0_49BB_1331_11EB);
    hash ^ (hash >> 31)
}

/// Picks `min + (max - min) * t` rounded to the nearest integer.
fn lerp_round(min: u32, max: u32, t: f64) -> i32 {
    (min as f64 + (max as f64 - min as f64) * t).round() as i32
}

impl Chunk {
    pub(super) fn initialize_terrain(&mut self) {
        self.blocks.fill(Block::empty());
    }

    /// Fills the chunk with resource veins.
    ///
    /// Resources are processed in order, so a later resource overwrites an earlier one
    /// wherever both exceed their scarcity threshold.
    pub(super) fn generate_resources(&mut self, noise: &NoiseGenerator, params: &GenerationParams) {
        let origin = self.origin();
        let terrain = &params.terrain;

        for resource in &params.resources {
            let id = resource.block.id();
            for x in 0..self.size.width {
                for y in 0..self.size.height {
                    for z in 0..self.size.width {
                        let value = noise.sample_3d(
                            (origin.x + x) as f64 / resource.scale.x,
                            (origin.y + y) as f64 / resource.scale.y,
                            (origin.z + z) as f64 / resource.scale.z,
                        );
                        let scaled = terrain.offset + terrain.magnitude * value;
                        if scaled > resource.scarcity {
                            self.set_block_id(x, y, z, id);
                        }
                    }
                }
            }
        }
    }

    /// Carves the heightfield.
    ///
    /// Layers at or below both the water level and the column height become sand, the
    /// surface becomes grass, air below the surface becomes dirt and everything above
    /// the surface is cleared. Resources below the surface survive.
    pub(super) fn generate_terrain(&mut self, noise: &NoiseGenerator, params: &GenerationParams) {
        let origin = self.origin();
        let terrain = &params.terrain;

        for x in 0..self.size.width {
            for z in 0..self.size.width {
                let value = noise.sample_2d(
                    (origin.x + x) as f64 / terrain.scale,
                    (origin.z + z) as f64 / terrain.scale,
                );
                let scaled = terrain.offset + terrain.magnitude * value;
                let height = (scaled.floor() as i32).max(0).min(self.size.height - 1);

                for y in 0..self.size.height {
                    let current = self.get_block(x, y, z).unwrap_or_default();
                    if y <= terrain.water_offset && y <= height {
                        self.set_block_id(x, y, z, BlockType::SAND.id());
                    } else if y == height {
                        self.set_block_id(x, y, z, BlockType::GRASS.id());
                    } else if y < height && current.is_empty() {
                        self.set_block_id(x, y, z, BlockType::DIRT.id());
                    } else if y > height {
                        self.set_block_id(x, y, z, BlockType::EMPTY.id());
                    }
                }
            }
        }
    }

    /// Grows trees on grass.
    ///
    /// Columns closer to the chunk edge than the largest canopy radius are skipped so
    /// canopies never need to cross into a neighbouring chunk.
    pub(super) fn generate_trees(&mut self, params: &GenerationParams) {
        let trees = &params.trees;
        let mut rng = fastrand::Rng::with_seed(vegetation_seed(params.terrain.seed, self.coord));
        let inset = trees.canopy.max_radius.min(self.size.width as u32) as i32;

        for x in inset..self.size.width - inset {
            for z in inset..self.size.width - inset {
                if rng.f64() < trees.frequency {
                    self.generate_tree_trunk(x, z, trees, &mut rng);
                }
            }
        }
    }

    fn generate_tree_trunk(&mut self, x: i32, z: i32, trees: &TreeParams, rng: &mut fastrand::Rng) {
        let trunk_height = lerp_round(trees.trunk.min_height, trees.trunk.max_height, rng.f64())
            .min(self.size.height);

        let Some(ground) = (0..self.size.height).find(|&y| {
            self.get_block(x, y, z)
                .is_some_and(|block| block.block_type == BlockType::GRASS.id())
        }) else {
            return;
        };

        let top = ground + trunk_height;
        for y in ground + 1..=top {
            self.set_block_id(x, y, z, BlockType::TREE.id());
        }

        self.generate_tree_canopy(x, top, z, trees, rng);
    }

    fn generate_tree_canopy(
        &mut self,
        center_x: i32,
        center_y: i32,
        center_z: i32,
        trees: &TreeParams,
        rng: &mut fastrand::Rng,
    ) {
        let radius = lerp_round(trees.canopy.min_radius, trees.canopy.max_radius, rng.f64())
            .min(self.size.height);

        for x in -radius..=radius {
            for y in -radius..=radius {
                for z in -radius..=radius {
                    if x * x + y * y + z * z > radius * radius {
                        continue;
                    }

                    let (cx, cy, cz) = (center_x + x, center_y + y, center_z + z);
                    if self.get_block(cx, cy, cz).is_some_and(|block| !block.is_empty()) {
                        continue;
                    }

                    if rng.f64() <= trees.canopy.density {
                        self.set_block_id(cx, cy, cz, BlockType::LEAVES.id());
                    }
                }
            }
        }
    }

    /// Scatters clouds over the top layer of the chunk.
    pub(super) fn generate_clouds(&mut self, noise: &NoiseGenerator, params: &GenerationParams) {
        let origin = self.origin();
        let clouds = &params.clouds;
        let top = self.size.height - 1;

        for x in 0..self.size.width {
            for z in 0..self.size.width {
                let value = noise.sample_2d(
                    (origin.x + x) as f64 / clouds.scale,
                    (origin.z + z) as f64 / clouds.scale,
                );
                if value < clouds.density {
                    self.set_block_id(x, top, z, BlockType::CLOUD.id());
                }
            }
        }
    }

    /// Replays every recorded edit of this chunk over the procedural result.
    pub(super) fn load_player_changes(&mut self, edits: &EditStore) {
        let origin = self.origin();
        for ((x, y, z), id) in edits.edits_for_chunk(origin.x, origin.z) {
            self.set_block_id(x, y, z, id);
        }
    }
}

//! # Chunk Iteration Module
//!
//! Iteration over the non-air voxels of a chunk in storage order.

use cgmath::Point3;

use crate::engine_state::voxels::block::Block;

use super::Chunk;

/// An iterator over all non-air blocks in a chunk.
///
/// Yields each voxel together with its chunk-local position, visiting `x` fastest,
/// then `z`, then `y`.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Index of the next voxel to inspect
    index: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` positioned before the first voxel.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            index: 0,
        }
    }

    fn position_of(&self, index: usize) -> Point3<i32> {
        let width = self.chunk_ref.size.width as usize;
        let plane = width * width;
        let y = index / plane;
        let z = (index % plane) / width;
        let x = index % width;
        Point3::new(x as i32, y as i32, z as i32)
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, Block);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(block) = self.chunk_ref.blocks.get(self.index) {
            let index = self.index;
            self.index += 1;
            if !block.is_empty() {
                return Some((self.position_of(index), *block));
            }
        }
        None
    }
}

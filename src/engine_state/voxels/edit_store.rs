//! # Edit Store
//!
//! Sparse record of every player-made block edit. Chunks are regenerated from noise
//! each time they load, so this store is the only state that survives a chunk being
//! unloaded: generation replays it over the procedural result as its final stage.

use std::collections::HashMap;

use super::block::BlockId;

/// Player edits grouped by owning chunk.
///
/// Outer key: world-space chunk origin `(x, z)`. Inner key: chunk-local `(x, y, z)`.
#[derive(Default, Debug, Clone)]
pub struct EditStore {
    chunks: HashMap<(i32, i32), HashMap<(i32, i32, i32), BlockId>>,
}

impl EditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if an edit was recorded at the given local position of the chunk
    /// whose origin is `(origin_x, origin_z)`.
    pub fn contains(&self, origin_x: i32, origin_z: i32, x: i32, y: i32, z: i32) -> bool {
        self.get(origin_x, origin_z, x, y, z).is_some()
    }

    /// Returns the edited block id at a chunk-local position, if any.
    pub fn get(&self, origin_x: i32, origin_z: i32, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.chunks
            .get(&(origin_x, origin_z))
            .and_then(|edits| edits.get(&(x, y, z)).copied())
    }

    /// Records an edit, replacing any earlier edit at the same position.
    pub fn set(&mut self, origin_x: i32, origin_z: i32, x: i32, y: i32, z: i32, id: BlockId) {
        self.chunks
            .entry((origin_x, origin_z))
            .or_default()
            .insert((x, y, z), id);
    }

    /// Iterates over every edit recorded for one chunk.
    pub fn edits_for_chunk(
        &self,
        origin_x: i32,
        origin_z: i32,
    ) -> impl Iterator<Item = ((i32, i32, i32), BlockId)> + '_ {
        self.chunks
            .get(&(origin_x, origin_z))
            .into_iter()
            .flat_map(|edits| edits.iter().map(|(position, id)| (*position, *id)))
    }

    /// Total number of recorded edits.
    pub fn len(&self) -> usize {
        self.chunks.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every edit. Used when the whole world is regenerated.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_are_keyed_by_chunk_and_local_position() {
        let mut store = EditStore::new();
        store.set(24, -48, 1, 2, 3, 4);
        assert_eq!(store.get(24, -48, 1, 2, 3), Some(4));
        assert!(!store.contains(0, -48, 1, 2, 3));
        assert!(!store.contains(24, -48, 3, 2, 1));

        store.set(24, -48, 1, 2, 3, 0);
        assert_eq!(store.get(24, -48, 1, 2, 3), Some(0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut store = EditStore::new();
        store.set(0, 0, 0, 0, 0, 1);
        store.set(24, 0, 0, 0, 0, 2);
        assert_eq!(store.edits_for_chunk(24, 0).count(), 1);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.edits_for_chunk(24, 0).count(), 0);
    }
}

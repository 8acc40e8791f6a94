//! # Block Registry
//!
//! An immutable catalogue of block metadata built once at startup and shared by
//! reference with generation and rendering. Nothing mutates it after construction.

use phf::phf_map;

use super::{block_type::BlockType, BlockId};

/// Default generation settings for a block that occurs as an underground resource.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResourceDefaults {
    /// Noise threshold above which the resource is placed. Higher is rarer.
    pub scarcity: f64,
    /// Per-axis noise scale. Larger values produce larger deposits.
    pub scale: [f64; 3],
}

/// Metadata for one block type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockDefinition {
    pub block_type: BlockType,
    pub name: &'static str,
    /// Flat RGB colour the renderer may use when no texture is bound.
    pub color: u32,
    pub resource: Option<ResourceDefaults>,
}

static BLOCK_NAMES: phf::Map<&'static str, BlockType> = phf_map! {
    "empty" => BlockType::EMPTY,
    "grass" => BlockType::GRASS,
    "dirt" => BlockType::DIRT,
    "stone" => BlockType::STONE,
    "coal" => BlockType::COAL,
    "iron" => BlockType::IRON,
    "tree" => BlockType::TREE,
    "leaves" => BlockType::LEAVES,
    "sand" => BlockType::SAND,
    "cloud" => BlockType::CLOUD,
};

/// The block catalogue, indexed by block id.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    definitions: Vec<BlockDefinition>,
}

impl BlockRegistry {
    /// Builds the standard catalogue.
    ///
    /// Resources are listed in generation order: stone first, then coal, then iron, so
    /// rarer ores overwrite the stone generated before them.
    pub fn standard() -> Self {
        let resource = |scale: f64, scarcity: f64| {
            Some(ResourceDefaults {
                scarcity,
                scale: [scale; 3],
            })
        };
        let definition = |block_type, name, color, resource| BlockDefinition {
            block_type,
            name,
            color,
            resource,
        };

        BlockRegistry {
            definitions: vec![
                definition(BlockType::EMPTY, "empty", 0x000000, None),
                definition(BlockType::GRASS, "grass", 0x559020, None),
                definition(BlockType::DIRT, "dirt", 0x807020, None),
                definition(BlockType::STONE, "stone", 0x808080, resource(30.0, 0.5)),
                definition(BlockType::COAL, "coal", 0x202020, resource(20.0, 0.7)),
                definition(BlockType::IRON, "iron", 0x806060, resource(15.0, 0.7)),
                definition(BlockType::TREE, "tree", 0x6b4a2b, None),
                definition(BlockType::LEAVES, "leaves", 0x2f7d1f, None),
                definition(BlockType::SAND, "sand", 0xd8c884, None),
                definition(BlockType::CLOUD, "cloud", 0xf0f0f0, None),
            ],
        }
    }

    /// Looks up a block definition by id.
    pub fn get(&self, id: BlockId) -> Option<&BlockDefinition> {
        self.definitions.get(id as usize)
    }

    /// Looks up a block type by its lowercase name.
    pub fn by_name(&self, name: &str) -> Option<BlockType> {
        BLOCK_NAMES.get(name).copied()
    }

    /// Number of block types in the catalogue, air included.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterates over the blocks that generate as resources, in generation order.
    pub fn resources(&self) -> impl Iterator<Item = (BlockType, ResourceDefaults)> + '_ {
        self.definitions
            .iter()
            .filter_map(|definition| definition.resource.map(|r| (definition.block_type, r)))
    }

    /// Iterates over every block type that is rendered (all but air).
    pub fn renderable(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.definitions
            .iter()
            .filter(|definition| definition.block_type.is_solid())
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_are_indexed_by_id() {
        let registry = BlockRegistry::standard();
        assert_eq!(registry.len(), BlockType::COUNT);
        for id in 0..registry.len() as BlockId {
            assert_eq!(registry.get(id).unwrap().block_type.id(), id);
        }
    }

    #[test]
    fn names_resolve_to_types() {
        let registry = BlockRegistry::standard();
        assert_eq!(registry.by_name("coal"), Some(BlockType::COAL));
        assert_eq!(registry.by_name("obsidian"), None);
        for definition in registry.renderable() {
            assert_eq!(registry.by_name(definition.name), Some(definition.block_type));
        }
    }

    #[test]
    fn resources_keep_generation_order() {
        let registry = BlockRegistry::standard();
        let order: Vec<_> = registry.resources().map(|(block, _)| block).collect();
        assert_eq!(order, vec![BlockType::STONE, BlockType::COAL, BlockType::IRON]);
    }
}

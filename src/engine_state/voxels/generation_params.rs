//! # Generation Parameters
//!
//! The externally editable configuration shared by every chunk generation pass.
//! All structures serialize with camelCase keys and accept partial documents, so a
//! config file only needs to name the values it overrides.
//!
//! Any change to these parameters invalidates all generated terrain; the world
//! regenerates from scratch when new parameters are applied.

use serde::{Deserialize, Serialize};

use crate::engine_state::noise::{NoiseConfig, NoiseVariant};

use super::block::{block_type::BlockType, registry::BlockRegistry};

/// Noise divisor used by the chunk noise generator on top of the per-stage scales.
const CHUNK_NOISE_SCALE: f64 = 2.0;

/// Heightfield parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TerrainParams {
    /// Horizontal divisor applied to world coordinates before sampling.
    pub scale: f64,
    /// Multiplier applied to the noise value.
    pub magnitude: f64,
    /// Constant added after the magnitude multiplier.
    pub offset: f64,
    /// Highest layer that turns into sand.
    pub water_offset: i32,
    pub seed: u32,
    pub noise_variant: NoiseVariant,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub exponentiation: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            scale: 10.0,
            magnitude: 8.0,
            offset: 2.0,
            water_offset: 5,
            seed: 0,
            noise_variant: NoiseVariant::Perlin,
            octaves: 10,
            persistence: 0.5,
            lacunarity: 1.3,
            exponentiation: 3.9,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrunkParams {
    pub min_height: u32,
    pub max_height: u32,
}

impl Default for TrunkParams {
    fn default() -> Self {
        Self {
            min_height: 3,
            max_height: 8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanopyParams {
    pub min_radius: u32,
    pub max_radius: u32,
    /// Probability that an eligible canopy cell receives leaves.
    pub density: f64,
}

impl Default for CanopyParams {
    fn default() -> Self {
        Self {
            min_radius: 2,
            max_radius: 4,
            density: 0.6,
        }
    }
}

/// Vegetation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeParams {
    /// Probability that an eligible column grows a tree.
    pub frequency: f64,
    pub trunk: TrunkParams,
    pub canopy: CanopyParams,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            frequency: 0.008,
            trunk: TrunkParams::default(),
            canopy: CanopyParams::default(),
        }
    }
}

/// Cloud layer parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudParams {
    pub scale: f64,
    /// Noise threshold below which a cloud block is placed.
    pub density: f64,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            scale: 15.0,
            density: 0.5,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Generation settings for one resource block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceParams {
    pub block: BlockType,
    pub scarcity: f64,
    pub scale: Scale3,
}

/// Every parameter consumed by chunk generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationParams {
    pub terrain: TerrainParams,
    pub trees: TreeParams,
    pub clouds: CloudParams,
    /// Resources in generation order. Later entries overwrite earlier ones.
    pub resources: Vec<ResourceParams>,
}

impl GenerationParams {
    /// Builds the default parameters, taking resource defaults from the block catalogue.
    pub fn from_registry(registry: &BlockRegistry) -> Self {
        GenerationParams {
            terrain: TerrainParams::default(),
            trees: TreeParams::default(),
            clouds: CloudParams::default(),
            resources: registry
                .resources()
                .map(|(block, defaults)| ResourceParams {
                    block,
                    scarcity: defaults.scarcity,
                    scale: Scale3 {
                        x: defaults.scale[0],
                        y: defaults.scale[1],
                        z: defaults.scale[2],
                    },
                })
                .collect(),
        }
    }

    /// The fractal noise configuration shared by every generation stage of a chunk.
    ///
    /// Perlin output is stretched to a height of 8 and simplex to 4, which keeps the two
    /// variants producing terrain of a comparable relief.
    pub fn noise_config(&self) -> NoiseConfig {
        NoiseConfig {
            scale: CHUNK_NOISE_SCALE,
            octaves: self.terrain.octaves,
            persistence: self.terrain.persistence,
            lacunarity: self.terrain.lacunarity,
            exponentiation: self.terrain.exponentiation,
            height: match self.terrain.noise_variant {
                NoiseVariant::Perlin => 8.0,
                NoiseVariant::Simplex => 4.0,
            },
            seed: self.terrain.seed,
            variant: self.terrain.noise_variant,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from_registry(&BlockRegistry::standard())
    }
}

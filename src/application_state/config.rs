//! # Engine Configuration
//!
//! Everything that can be tuned from outside the engine: world layout, streaming
//! behaviour, the player's spawn point and the generation parameters. Configuration is
//! read from JSON with camelCase keys; any missing key keeps its default.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::chunk::ChunkSize;
use crate::engine_state::voxels::generation_params::GenerationParams;
use crate::engine_state::voxels::world::WorldSettings;

/// Errors raised while loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not a valid configuration document.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(error) => write!(f, "failed to read configuration: {error}"),
            ConfigError::Parse(error) => write!(f, "invalid configuration: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(error) => Some(error),
            ConfigError::Parse(error) => Some(error),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse(error)
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub chunk_size: ChunkSize,
    /// Chunks kept loaded in each direction around the player's chunk
    pub draw_distance: u32,
    /// Generate chunks from the deferred task queue instead of immediately
    pub async_loading: bool,
    /// Time per frame that deferred generation may use, in milliseconds
    pub idle_budget_ms: u64,
    /// Time after which a deferred generation runs regardless of the budget, in milliseconds
    pub generation_timeout_ms: u64,
    /// Where the player's eye starts
    pub spawn: [f32; 3],
    pub generation: GenerationParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            chunk_size: ChunkSize::default(),
            draw_distance: 1,
            async_loading: true,
            idle_budget_ms: 8,
            generation_timeout_ms: 1000,
            spawn: [32.0, 16.0, 32.0],
            generation: GenerationParams::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// The world settings described by this configuration.
    pub fn world_settings(&self) -> WorldSettings {
        WorldSettings {
            chunk_size: self.chunk_size,
            draw_distance: self.draw_distance,
            async_loading: self.async_loading,
            generation_timeout: Duration::from_millis(self.generation_timeout_ms),
        }
    }

    pub fn idle_budget(&self) -> Duration {
        Duration::from_millis(self.idle_budget_ms)
    }
}

/// Command line arguments of the headless sandbox.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "voxel-sandbox", about = "Run the voxel sandbox without a window")]
pub struct Args {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    pub frames: u32,
    /// Terrain seed, overriding the configuration
    #[arg(long)]
    pub seed: Option<u32>,
    /// Generate chunks immediately instead of through the task queue
    #[arg(long)]
    pub sync: bool,
}

impl Args {
    /// Loads the configuration file, if any, and applies the command line overrides.
    pub fn resolve_config(&self) -> Result<EngineConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.generation.terrain.seed = seed;
        }
        if self.sync {
            config.async_loading = false;
        }
        Ok(config)
    }
}

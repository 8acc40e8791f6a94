//! # Voxel Sandbox
//!
//! A procedurally generated, editable voxel world with streamed chunks, instanced
//! rendering data and player collision.
//!
//! ## Key Modules
//!
//! * `application_state` - Configuration, command line and the headless frame loop
//! * `engine_state` - The engine: noise, blocks, chunks, world streaming, physics
//!
//! ## Architecture
//!
//! The engine does not draw. Each loaded chunk exposes one densely packed instance
//! buffer per block type, and a `SceneAdapter` implementation mirrors those buffers
//! into whatever renders them. The bundled `HeadlessScene` only records them.
//!
//! ## Usage
//!
//! ```ignore
//! fn main() {
//!     voxel_sandbox::run().unwrap();
//! }
//! ```

use clap::Parser;
use log::info;

use application_state::{
    config::{Args, ConfigError},
    ApplicationState,
};

pub mod application_state;
pub mod engine_state;

/// Initializes logging, parses the command line and runs the headless sandbox.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let args = Args::parse();
    let config = args.resolve_config()?;

    let mut state = ApplicationState::new(config);
    state.run(args.frames);
    Ok(())
}

//! # Application State Management
//!
//! The headless application: it owns an engine with a `HeadlessScene`, feeds it a
//! scripted sequence of player actions at a fixed frame rate and reports what
//! happened. The player walks forward the whole run, digs out the targeted block
//! halfway through and places a stone block a little later.

pub mod config;

use std::time::Duration;

use cgmath::Point3;
use log::info;

use crate::engine_state::{
    player_state::PlayerAction,
    rendering::scene::HeadlessScene,
    voxels::block::block_type::BlockType,
    EngineState,
};
use config::EngineConfig;

/// Simulated time between two frames.
pub const FRAME_TIME: Duration = Duration::from_micros(16_667);

/// What a headless run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    pub loaded_chunks: usize,
    pub pending_chunks: usize,
    pub scene_chunks: usize,
    pub scene_instances: usize,
    pub edits: usize,
    pub player_position: Point3<f32>,
}

/// The headless application container.
pub struct ApplicationState {
    /// The core engine state and logic
    pub engine_state: EngineState<HeadlessScene>,
    frames_run: u32,
}

impl ApplicationState {
    pub fn new(config: EngineConfig) -> Self {
        ApplicationState {
            engine_state: EngineState::new(config, HeadlessScene::new()),
            frames_run: 0,
        }
    }

    /// The scripted actions of one frame of a run of `total` frames.
    fn actions_for_frame(frame: u32, total: u32) -> PlayerAction {
        let halfway = total / 2;
        PlayerAction {
            move_forward: true,
            rotate_view: (frame == 0).then_some((0.0, 300.0)),
            remove_block: frame == halfway,
            select_block: (frame == halfway).then_some(BlockType::STONE.id()),
            place_block: frame == halfway + 1,
            ..Default::default()
        }
    }

    /// Runs `frames` frames and returns a summary.
    pub fn run(&mut self, frames: u32) -> RunSummary {
        for frame in 0..frames {
            self.engine_state
                .set_actions(Self::actions_for_frame(frame, frames));
            self.engine_state.update(FRAME_TIME);
            self.frames_run += 1;
        }

        let summary = self.summary();
        info!(
            "Ran {} frames: {} chunks loaded ({} pending), {} instances in scene, {} edits, \
             player at ({:.2}, {:.2}, {:.2})",
            summary.frames,
            summary.loaded_chunks,
            summary.pending_chunks,
            summary.scene_instances,
            summary.edits,
            summary.player_position.x,
            summary.player_position.y,
            summary.player_position.z
        );
        summary
    }

    pub fn summary(&self) -> RunSummary {
        let engine = &self.engine_state;
        RunSummary {
            frames: self.frames_run,
            loaded_chunks: engine.world.loaded_chunk_count(),
            pending_chunks: engine.world.pending_tasks(),
            scene_chunks: engine.scene().chunk_count(),
            scene_instances: engine.scene().total_instances(),
            edits: engine.world.edits().len(),
            player_position: engine.player.position,
        }
    }
}

//! # Physics Module
//!
//! Fixed-timestep simulation of the player against the voxel grid.
//!
//! Frame time is accumulated and consumed in steps of `time_step`. Each step applies
//! gravity, moves the player by its velocity and resolves collisions with the blocks
//! around it, so the result does not depend on the frame rate.

pub mod collision;

use log::trace;

use super::player_state::player::Player;
use super::voxels::VoxelQuery;
use collision::{broad_phase, narrow_phase, resolve_collisions};

/// Downward acceleration in blocks per second squared.
pub const GRAVITY: f32 = 32.0;
/// Simulation steps per second.
pub const SIMULATION_RATE: f32 = 200.0;

/// The fixed-timestep integrator.
#[derive(Debug, Clone)]
pub struct Physics {
    pub gravity: f32,
    /// Length of one simulation step in seconds.
    pub time_step: f32,
    /// Frame time not yet consumed by a step.
    accumulator: f32,
}

impl Physics {
    pub fn new() -> Self {
        Physics {
            gravity: GRAVITY,
            time_step: 1.0 / SIMULATION_RATE,
            accumulator: 0.0,
        }
    }

    /// Advances the simulation by `dt` seconds of frame time.
    ///
    /// # Returns
    /// The number of steps that ran. Leftover time carries over to the next call.
    pub fn update(&mut self, dt: f32, player: &mut Player, world: &impl VoxelQuery) -> u32 {
        if !dt.is_finite() || dt <= 0.0 || self.time_step <= 0.0 {
            return 0;
        }

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= self.time_step {
            self.step(player, world);
            self.accumulator -= self.time_step;
            steps += 1;
        }
        steps
    }

    /// Runs one simulation step.
    pub fn step(&self, player: &mut Player, world: &impl VoxelQuery) {
        player.velocity.y -= self.gravity * self.time_step;
        player.apply_inputs(self.time_step);
        self.detect_collisions(player, world);
    }

    fn detect_collisions(&self, player: &mut Player, world: &impl VoxelQuery) {
        player.on_ground = false;

        let candidates = broad_phase(player, world);
        if candidates.is_empty() {
            return;
        }

        let contacts = narrow_phase(player, &candidates);
        if contacts.is_empty() {
            return;
        }

        player.on_ground = contacts.iter().any(|contact| contact.normal.y > 0.0);
        let applied = resolve_collisions(player, contacts);
        trace!("Resolved {} of {} candidate blocks", applied, candidates.len());
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new()
    }
}

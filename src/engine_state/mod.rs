//! # Engine State Module
//!
//! The core engine module that ties the voxel world, the player and the physics
//! simulation together and keeps a scene adapter in sync with them.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `noise` - Deterministic fractal noise
//! * `physics` - Fixed-timestep player collision
//! * `player_state` - The player body and its input
//! * `rendering` - Render instances and the scene adapter seam
//! * `task_management` - The cooperative deferred task queue
//! * `voxels` - Blocks, chunks, edits and world streaming
//!
//! ## Frame Order
//!
//! 1. Apply the frame's player actions, including block edits at the look target
//! 2. Step physics, if the chunk under the player is loaded
//! 3. Stream chunks around the player's new position
//! 4. Run deferred chunk generation within the idle budget
//! 5. Push changed and removed chunks to the scene

use std::sync::Arc;
use std::time::Duration;

use cgmath::Point3;
use log::{debug, info};
use web_time::Instant;

use crate::application_state::config::EngineConfig;
use physics::Physics;
use player_state::{player::Player, PlayerAction};
use rendering::scene::SceneAdapter;
use voxels::{
    block::registry::BlockRegistry,
    world::{RaycastHit, World},
};

pub mod noise;
pub mod physics;
pub mod player_state;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// How far away the player can edit blocks.
pub const REACH: f32 = 5.0;

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```ignore
/// let mut engine_state = EngineState::new(EngineConfig::default(), HeadlessScene::new());
///
/// // Main loop
/// loop {
///     engine_state.set_actions(actions);
///     engine_state.update(delta_time);
/// }
/// ```
pub struct EngineState<S: SceneAdapter> {
    pub world: World,
    pub physics: Physics,
    pub player: Player,
    /// Actions for the next `update`
    pub player_actions: PlayerAction,
    scene: S,
    config: EngineConfig,
}

impl<S: SceneAdapter> EngineState<S> {
    /// Creates the engine and starts streaming chunks around the spawn point.
    ///
    /// # Arguments
    /// * `config` - The engine configuration
    /// * `scene` - The scene the loaded chunks are mirrored into
    pub fn new(config: EngineConfig, scene: S) -> Self {
        let registry = Arc::new(BlockRegistry::standard());
        let world = World::new(config.world_settings(), config.generation.clone(), registry);
        let player = Player::new(Point3::from(config.spawn));

        info!(
            "Engine started: seed {}, draw distance {}, {} loading",
            config.generation.terrain.seed,
            config.draw_distance,
            if config.async_loading { "deferred" } else { "immediate" }
        );

        let mut state = EngineState {
            world,
            physics: Physics::new(),
            player,
            player_actions: PlayerAction::default(),
            scene,
            config,
        };
        state.world.refresh(state.player.position);
        state
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sets the actions applied by the next `update`.
    pub fn set_actions(&mut self, actions: PlayerAction) {
        self.player_actions = actions;
    }

    /// Advances the engine by one frame.
    ///
    /// # Arguments
    /// * `dt` - The time elapsed since the last frame
    pub fn update(&mut self, dt: Duration) {
        let frame_start = Instant::now();

        self.process_actions();

        let player_chunk = self.world.world_to_chunk_coord(self.player.position);
        if self.world.loaded_chunk(player_chunk).is_some() {
            self.physics
                .update(dt.as_secs_f32(), &mut self.player, &self.world);
        }

        self.world.refresh_at(self.player.position, frame_start);
        let generated = self
            .world
            .process_generation_tasks(frame_start + self.config.idle_budget());
        if generated > 0 {
            debug!("Generated {} deferred chunks this frame", generated);
        }

        self.sync_scene();
    }

    /// Applies the pending actions. Held movement keys stay set, one-shot actions are
    /// consumed.
    fn process_actions(&mut self) {
        let actions = std::mem::take(&mut self.player_actions);
        self.player.intake_actions(&actions);

        if actions.remove_block {
            self.remove_block_at_target();
        }
        if actions.place_block {
            self.add_block_at_target();
        }

        self.player_actions = PlayerAction {
            move_forward: actions.move_forward,
            move_backward: actions.move_backward,
            move_left: actions.move_left,
            move_right: actions.move_right,
            ..Default::default()
        };
    }

    /// The block the player is looking at, within reach.
    pub fn target(&self) -> Option<RaycastHit> {
        self.world
            .raycast(self.player.position, self.player.look_direction(), REACH)
    }

    /// Places the player's active block against the targeted face.
    ///
    /// # Returns
    /// `true` if a block was placed.
    pub fn add_block_at_target(&mut self) -> bool {
        let Some(hit) = self.target() else {
            return false;
        };
        let placement = hit.placement;
        self.world
            .add_block(placement.x, placement.y, placement.z, self.player.active_block)
    }

    /// Removes the targeted block.
    ///
    /// # Returns
    /// `true` if a block was removed.
    pub fn remove_block_at_target(&mut self) -> bool {
        let Some(hit) = self.target() else {
            return false;
        };
        self.world.remove_block(hit.block.x, hit.block.y, hit.block.z)
    }

    /// Pushes removed and changed chunks to the scene.
    pub fn sync_scene(&mut self) {
        for coord in self.world.take_removed_chunks() {
            self.scene.remove_chunk(coord);
        }
        for coord in self.world.take_dirty_chunks() {
            if let Some(chunk) = self.world.loaded_chunk(coord) {
                self.scene.sync_chunk(chunk);
            }
        }
    }

    /// Discards every edit and regenerates the world around the player.
    pub fn regenerate_all(&mut self) {
        self.world.regenerate_all();
        self.sync_scene();
    }

    /// Replaces the configuration and regenerates the world.
    ///
    /// A new chunk size rebuilds the world from scratch; otherwise the streaming settings
    /// are updated in place and the world regenerates with the new parameters.
    pub fn apply_config(&mut self, config: EngineConfig) {
        info!("Applying new engine configuration");

        if config.chunk_size != self.world.settings().chunk_size {
            for coord in self.world.chunk_coords() {
                self.scene.remove_chunk(coord);
            }
            let registry = Arc::clone(self.world.registry());
            self.world = World::new(config.world_settings(), config.generation.clone(), registry);
            self.world.refresh(self.player.position);
        } else {
            let settings = config.world_settings();
            self.world.set_streaming(
                settings.draw_distance,
                settings.async_loading,
                settings.generation_timeout,
            );
            self.world.set_params(config.generation.clone());
        }

        self.config = config;
        self.sync_scene();
    }
}

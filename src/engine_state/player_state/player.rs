//! # Player Implementation
//!
//! The player is an upright cylinder whose `position` is the top centre of the
//! cylinder, where the eye sits. Velocity is stored in the player's local frame:
//! `x` to the right, `y` up and `z` forward along the horizontal look direction.
//! Physics works in the world frame and converts through `world_velocity` and
//! `apply_world_delta_velocity`.

use cgmath::*;
use std::f32::consts::FRAC_PI_2;

use super::PlayerAction;
use crate::engine_state::voxels::block::{block_type::BlockType, BlockId};

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Radians of view rotation per pixel of mouse movement.
const MOUSE_SENSITIVITY: f32 = 0.002;

/// The player's body and movement state.
#[derive(Debug, Clone)]
pub struct Player {
    /// Top centre of the bounding cylinder in world space
    pub position: Point3<f32>,
    /// Velocity in the local frame (right, up, forward)
    pub velocity: Vector3<f32>,
    /// Horizontal rotation around the Y axis. Zero looks down negative Z.
    pub yaw: Rad<f32>,
    /// Vertical rotation of the view. Does not affect movement.
    pub pitch: Rad<f32>,
    pub radius: f32,
    pub height: f32,
    /// Set by physics when a collision pushed the player up this step
    pub on_ground: bool,
    pub max_speed: f32,
    pub jump_speed: f32,
    /// The block type placed by edits
    pub active_block: BlockId,
    /// Desired horizontal velocity from held movement keys (x right, z forward)
    input: Vector2<f32>,
    spawn: Point3<f32>,
}

impl Player {
    /// Creates a player standing still at `spawn`.
    pub fn new(spawn: Point3<f32>) -> Self {
        Self {
            position: spawn,
            velocity: Vector3::zero(),
            yaw: Rad(0.0),
            pitch: Rad(0.0),
            radius: 0.5,
            height: 1.75,
            on_ground: false,
            max_speed: 10.0,
            jump_speed: 10.0,
            active_block: BlockType::GRASS.id(),
            input: Vector2::zero(),
            spawn,
        }
    }

    /// Unit vector pointing to the player's right.
    pub fn right(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(yaw_cos, 0.0, -yaw_sin)
    }

    /// Unit vector pointing forward along the ground.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(-yaw_sin, 0.0, -yaw_cos)
    }

    /// Unit vector along the line of sight, including pitch.
    pub fn look_direction(&self) -> Vector3<f32> {
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        self.forward() * pitch_cos + Vector3::unit_y() * pitch_sin
    }

    /// Centre of the bounding cylinder.
    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            self.position.x,
            self.position.y - self.height / 2.0,
            self.position.z,
        )
    }

    /// The velocity expressed in the world frame.
    pub fn world_velocity(&self) -> Vector3<f32> {
        self.right() * self.velocity.x
            + Vector3::unit_y() * self.velocity.y
            + self.forward() * self.velocity.z
    }

    /// Adds a velocity change given in the world frame.
    pub fn apply_world_delta_velocity(&mut self, delta: Vector3<f32>) {
        self.velocity += Vector3::new(delta.dot(self.right()), delta.y, delta.dot(self.forward()));
    }

    /// Moves the player by one step of its velocity.
    ///
    /// The horizontal velocity is replaced by the desired input velocity first.
    pub fn apply_inputs(&mut self, dt: f32) {
        self.velocity.x = self.input.x;
        self.velocity.z = self.input.y;
        self.position += self.right() * (self.velocity.x * dt);
        self.position += self.forward() * (self.velocity.z * dt);
        self.position.y += self.velocity.y * dt;
    }

    /// Jumps if standing on something.
    pub fn jump(&mut self) {
        if self.on_ground {
            self.velocity.y += self.jump_speed;
        }
    }

    /// Returns to the spawn point and stops moving.
    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.velocity = Vector3::zero();
        self.on_ground = false;
    }

    /// Processes one frame of input.
    ///
    /// # Arguments
    /// * `actions` - The actions to apply
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        let axis = |positive: bool, negative: bool| match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        self.input = Vector2::new(
            axis(actions.move_right, actions.move_left) * self.max_speed,
            axis(actions.move_forward, actions.move_backward) * self.max_speed,
        );

        if let Some((delta_x, delta_y)) = actions.rotate_view {
            self.yaw -= Rad(delta_x as f32 * MOUSE_SENSITIVITY);
            self.pitch -= Rad(delta_y as f32 * MOUSE_SENSITIVITY);
            self.pitch = Rad(self.pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));
        }

        if let Some(block) = actions.select_block {
            self.active_block = block;
        }
        if actions.jump {
            self.jump();
        }
        if actions.reset {
            self.reset();
        }
    }
}

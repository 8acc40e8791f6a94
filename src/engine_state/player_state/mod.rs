//! # Player State Module
//!
//! The player's body and controller.
//!
//! ## Key Components
//! - `Player`: position, velocity, bounding cylinder and the input that drives them
//! - `PlayerAction`: one frame of input, decoupled from any windowing library

pub mod player;

use super::voxels::block::BlockId;

/// Represents the actions a player can perform in one frame.
///
/// A movement flag that is set means the key is held this frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerAction {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// Move back to the spawn point and stop.
    pub reset: bool,
    /// Mouse movement since the last frame, in pixels.
    pub rotate_view: Option<(f64, f64)>,
    /// Change the block type placed by `place_block`.
    pub select_block: Option<BlockId>,
    /// Place the selected block in front of the targeted face.
    pub place_block: bool,
    /// Remove the targeted block.
    pub remove_block: bool,
}

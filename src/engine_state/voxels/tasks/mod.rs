//! # Voxel Task System
//!
//! Deferred tasks related to voxel world generation.

pub mod chunk_generation_task;

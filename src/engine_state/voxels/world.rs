//! # World Module
//!
//! This module provides the `World` struct which owns every live chunk of the voxel
//! world. It serves as the central coordinator for chunk streaming, block access and
//! edits, and visibility bookkeeping across chunk borders.
//!
//! ## Coordinates
//!
//! Blocks are unit cubes centred on integer world coordinates. A world coordinate maps
//! to a chunk by floor division of `x` and `z` by the chunk width, with the
//! non-negative remainder as the chunk-local coordinate. `y` is shared.
//!
//! ## Streaming
//!
//! `refresh` keeps a square window of chunks around the player loaded. Chunks leaving
//! the window are dropped along with their instances. Chunks entering it are either
//! generated immediately or, with asynchronous loading, queued as deferred tasks that a
//! scheduler tick drains while idle time remains. Queued chunks are present but not
//! loaded: block queries on them return `None` until their task has run.
//!
//! ## Visibility
//!
//! A non-air block is drawn exactly when at least one face neighbour is air. Neighbours
//! in loaded chunks are resolved across chunk borders; neighbours in chunks that are not
//! loaded, and above or below the world, count as air. Generation, streaming and edits
//! keep every loaded chunk's instances consistent with this rule.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use cgmath::{InnerSpace, Point3, Vector3};
use log::{debug, info, trace, warn};
use web_time::Instant;

use super::block::{
    block_side::BlockSide, block_type::BlockType, registry::BlockRegistry, Block, BlockId,
};
use super::chunk::{Chunk, ChunkCoord, ChunkSize};
use super::edit_store::EditStore;
use super::generation_params::GenerationParams;
use super::tasks::chunk_generation_task::ChunkGenerationTask;
use super::VoxelQuery;
use crate::engine_state::task_management::TaskManager;

/// Ray origins beyond this lose per-block precision in `f32`.
const MAX_RAY_COORDINATE: f32 = 1.0e7;

/// The four chunk neighbours on the horizontal chunk grid.
const HORIZONTAL_SIDES: [BlockSide; 4] = [
    BlockSide::LEFT,
    BlockSide::RIGHT,
    BlockSide::FRONT,
    BlockSide::BACK,
];

/// Streaming and layout settings of a world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSettings {
    pub chunk_size: ChunkSize,
    /// Chunks loaded in each direction around the player's chunk.
    pub draw_distance: u32,
    /// Defer chunk generation to the task queue instead of generating during `refresh`.
    pub async_loading: bool,
    /// How long a deferred generation may wait for idle time before it is forced.
    pub generation_timeout: Duration,
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            chunk_size: ChunkSize::default(),
            draw_distance: 1,
            async_loading: true,
            generation_timeout: Duration::from_secs(1),
        }
    }
}

/// A world coordinate split into its chunk and chunk-local parts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkLocation {
    pub chunk: ChunkCoord,
    pub local: Point3<i32>,
}

/// Chunks that entered and left the window in one `refresh`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub loaded: Vec<ChunkCoord>,
    pub unloaded: Vec<ChunkCoord>,
}

/// The first solid block along a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastHit {
    /// World coordinate of the hit block.
    pub block: Point3<i32>,
    pub block_type: BlockId,
    /// Normal of the face the ray entered through. Zero when the ray starts inside the block.
    pub normal: Vector3<i32>,
    /// The air cell in front of the hit face, where a new block would be placed.
    pub placement: Point3<i32>,
    /// Distance along the ray to the hit face.
    pub distance: f32,
}

/// Represents a voxel world composed of streamed chunks.
pub struct World {
    settings: WorldSettings,
    params: GenerationParams,
    registry: Arc<BlockRegistry>,
    /// Every present chunk, loaded or awaiting deferred generation.
    chunks: HashMap<ChunkCoord, Chunk>,
    edits: EditStore,
    tasks: TaskManager<World>,
    /// Chunks whose instances changed since the last `take_dirty_chunks`.
    dirty: HashSet<ChunkCoord>,
    /// Chunks unloaded since the last `take_removed_chunks`.
    removed: Vec<ChunkCoord>,
    /// The chunk the window was last centred on.
    center: ChunkCoord,
}

impl World {
    /// Creates a new world with no chunks.
    ///
    /// Non-positive chunk dimensions are raised to one block.
    ///
    /// # Arguments
    /// * `settings` - Layout and streaming settings
    /// * `params` - Generation parameters shared by every chunk
    /// * `registry` - The block catalogue
    pub fn new(
        mut settings: WorldSettings,
        params: GenerationParams,
        registry: Arc<BlockRegistry>,
    ) -> Self {
        let size = settings.chunk_size;
        if size.width < 1 || size.height < 1 {
            warn!("Invalid chunk size {}x{}, clamping to at least 1", size.width, size.height);
            settings.chunk_size = ChunkSize {
                width: size.width.max(1),
                height: size.height.max(1),
            };
        }

        World {
            settings,
            params,
            registry,
            chunks: HashMap::new(),
            edits: EditStore::new(),
            tasks: TaskManager::new(),
            dirty: HashSet::new(),
            removed: Vec::new(),
            center: ChunkCoord::default(),
        }
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn edits(&self) -> &EditStore {
        &self.edits
    }

    /// The chunk the streaming window is centred on.
    pub fn center(&self) -> ChunkCoord {
        self.center
    }

    /// Splits a world coordinate into chunk coordinate and chunk-local coordinate.
    pub fn coordinate_to_chunk(&self, x: i32, y: i32, z: i32) -> ChunkLocation {
        let width = self.settings.chunk_size.width;
        ChunkLocation {
            chunk: ChunkCoord::new(x.div_euclid(width), z.div_euclid(width)),
            local: Point3::new(x.rem_euclid(width), y, z.rem_euclid(width)),
        }
    }

    /// The chunk containing the block a continuous world position lies in.
    pub fn world_to_chunk_coord(&self, position: Point3<f32>) -> ChunkCoord {
        let x = (position.x + 0.5).floor() as i32;
        let z = (position.z + 0.5).floor() as i32;
        self.coordinate_to_chunk(x, 0, z).chunk
    }

    /// Any present chunk, loaded or not.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// A chunk that has finished generating.
    pub fn loaded_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord).filter(|chunk| chunk.is_loaded())
    }

    /// Iterates over every present chunk.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Coordinates of every present chunk, sorted.
    pub fn chunk_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort();
        coords
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.values().filter(|chunk| chunk.is_loaded()).count()
    }

    /// Number of deferred generation tasks still queued.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Gets the block at a world coordinate.
    ///
    /// # Returns
    /// `None` if the owning chunk is absent or not yet loaded, or `y` is outside the world.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        let location = self.coordinate_to_chunk(x, y, z);
        self.loaded_chunk(location.chunk)?
            .get_block(location.local.x, location.local.y, location.local.z)
    }

    /// Places a block at an air cell and updates the visibility of it and its neighbours.
    ///
    /// Air and ids missing from the block catalogue are rejected.
    ///
    /// # Returns
    /// `true` if the block was placed.
    pub fn add_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        if id == BlockType::EMPTY.id() || self.registry.get(id).is_none() {
            warn!("Rejected placement of block id {} at ({}, {}, {})", id, x, y, z);
            return false;
        }

        let location = self.coordinate_to_chunk(x, y, z);
        let Some(chunk) = self
            .chunks
            .get_mut(&location.chunk)
            .filter(|chunk| chunk.is_loaded())
        else {
            return false;
        };

        let local = location.local;
        if !chunk.add_block(local.x, local.y, local.z, id, &mut self.edits) {
            return false;
        }
        self.dirty.insert(location.chunk);

        trace!("Added block {} at ({}, {}, {})", id, x, y, z);
        self.sync_block_visibility(x, y, z);
        for (nx, ny, nz) in BlockSide::neighbours(x, y, z) {
            self.sync_block_visibility(nx, ny, nz);
        }
        true
    }

    /// Turns a block into air and reveals any neighbour that became exposed.
    ///
    /// # Returns
    /// `true` if a block was removed.
    pub fn remove_block(&mut self, x: i32, y: i32, z: i32) -> bool {
        let location = self.coordinate_to_chunk(x, y, z);
        let Some(chunk) = self
            .chunks
            .get_mut(&location.chunk)
            .filter(|chunk| chunk.is_loaded())
        else {
            return false;
        };

        let local = location.local;
        if !chunk.remove_block(local.x, local.y, local.z, &mut self.edits) {
            return false;
        }
        self.dirty.insert(location.chunk);

        trace!("Removed block at ({}, {}, {})", x, y, z);
        for (nx, ny, nz) in BlockSide::neighbours(x, y, z) {
            self.sync_block_visibility(nx, ny, nz);
        }
        true
    }

    /// Returns true if all six face neighbours of the cell are non-air blocks in loaded
    /// chunks.
    pub fn is_block_obscured(&self, x: i32, y: i32, z: i32) -> bool {
        BlockSide::neighbours(x, y, z)
            .iter()
            .all(|&(nx, ny, nz)| self.get_block(nx, ny, nz).is_some_and(|block| !block.is_empty()))
    }

    /// Hides or reveals the block at a world coordinate so that it has an instance
    /// exactly when it is not obscured.
    ///
    /// # Returns
    /// `true` if an instance was allocated or released.
    pub fn sync_block_visibility(&mut self, x: i32, y: i32, z: i32) -> bool {
        let Some(block) = self.get_block(x, y, z) else {
            return false;
        };
        if block.is_empty() {
            return false;
        }

        let visible = !self.is_block_obscured(x, y, z);
        let location = self.coordinate_to_chunk(x, y, z);
        let Some(chunk) = self.chunks.get_mut(&location.chunk) else {
            return false;
        };

        let local = location.local;
        let changed = match (visible, block.instance_slot.is_some()) {
            (true, false) => chunk.add_block_instance(local.x, local.y, local.z),
            (false, true) => chunk.delete_block_instance(local.x, local.y, local.z),
            _ => false,
        };

        if changed {
            trace!(
                "Block at ({}, {}, {}) is now {}",
                x,
                y,
                z,
                if visible { "visible" } else { "hidden" }
            );
            self.dirty.insert(location.chunk);
        }
        changed
    }

    /// Re-evaluates the visibility of every block on one vertical face of a chunk.
    fn sync_chunk_edge(&mut self, coord: ChunkCoord, side: BlockSide) {
        let Some(chunk) = self.loaded_chunk(coord) else {
            return;
        };
        let origin = chunk.origin();
        let size = self.settings.chunk_size;
        let last = size.width - 1;

        for y in 0..size.height {
            for t in 0..size.width {
                let (x, z) = match side {
                    BlockSide::RIGHT => (last, t),
                    BlockSide::LEFT => (0, t),
                    BlockSide::FRONT => (t, last),
                    BlockSide::BACK => (t, 0),
                    BlockSide::TOP | BlockSide::BOTTOM => return,
                };
                self.sync_block_visibility(origin.x + x, y, origin.z + z);
            }
        }
    }

    /// Updates the visibility of the faces a chunk shares with its loaded neighbours.
    fn reconcile_borders(&mut self, coord: ChunkCoord) {
        for side in HORIZONTAL_SIDES {
            let offset = side.offset();
            let neighbour = ChunkCoord::new(coord.x + offset.x, coord.z + offset.z);
            if self.loaded_chunk(neighbour).is_none() {
                continue;
            }
            self.sync_chunk_edge(coord, side);
            self.sync_chunk_edge(neighbour, side.opposite());
        }
    }

    /// Runs the generation pipeline of a present, not yet loaded chunk.
    ///
    /// # Returns
    /// `true` if the chunk was generated, `false` if it is absent or already loaded.
    pub fn generate_chunk(&mut self, coord: ChunkCoord) -> bool {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if chunk.is_loaded() {
            return false;
        }

        chunk.generate(&self.params, &self.edits);
        self.reconcile_borders(coord);
        self.dirty.insert(coord);
        debug!("Loaded chunk ({}, {})", coord.x, coord.z);
        true
    }

    fn unload_chunk(&mut self, coord: ChunkCoord) {
        if let Some(mut chunk) = self.chunks.remove(&coord) {
            chunk.dispose_instances();
            self.dirty.remove(&coord);
            self.removed.push(coord);
            debug!("Unloaded chunk ({}, {})", coord.x, coord.z);
        }
    }

    /// Streams chunks around a player position using the current time for deadlines.
    pub fn refresh(&mut self, position: Point3<f32>) -> RefreshReport {
        self.refresh_at(position, Instant::now())
    }

    /// Streams chunks around a player position.
    ///
    /// Chunks outside the square window of `draw_distance` around the player's chunk are
    /// unloaded. Missing chunks inside it are created and either generated immediately
    /// or queued with a deadline of `now + generation_timeout`.
    pub fn refresh_at(&mut self, position: Point3<f32>, now: Instant) -> RefreshReport {
        let center = self.world_to_chunk_coord(position);
        self.stream_around(center, now)
    }

    fn stream_around(&mut self, center: ChunkCoord, now: Instant) -> RefreshReport {
        self.center = center;
        let distance = self.settings.draw_distance as i32;
        let in_window = |coord: &ChunkCoord| {
            (coord.x - center.x).abs() <= distance && (coord.z - center.z).abs() <= distance
        };

        let mut stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| !in_window(*coord))
            .copied()
            .collect();
        stale.sort();

        for &coord in &stale {
            self.unload_chunk(coord);
        }
        for &coord in &stale {
            for side in HORIZONTAL_SIDES {
                let offset = side.offset();
                let neighbour = ChunkCoord::new(coord.x + offset.x, coord.z + offset.z);
                self.sync_chunk_edge(neighbour, side.opposite());
            }
        }

        let mut loaded = Vec::new();
        for dx in -distance..=distance {
            for dz in -distance..=distance {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                if self.chunks.contains_key(&coord) {
                    continue;
                }

                self.chunks.insert(
                    coord,
                    Chunk::new(coord, self.settings.chunk_size, self.registry.len()),
                );
                if self.settings.async_loading {
                    self.tasks.publish_task(
                        Box::new(ChunkGenerationTask::new(coord)),
                        now + self.settings.generation_timeout,
                    );
                } else {
                    self.generate_chunk(coord);
                }
                loaded.push(coord);
            }
        }

        if !loaded.is_empty() || !stale.is_empty() {
            debug!(
                "Refresh around ({}, {}): {} chunks entered, {} left",
                center.x,
                center.z,
                loaded.len(),
                stale.len()
            );
        }

        RefreshReport {
            loaded,
            unloaded: stale,
        }
    }

    /// Runs queued generation tasks until `idle_until`, measuring time with the clock.
    ///
    /// # Returns
    /// The number of tasks that ran.
    pub fn process_generation_tasks(&mut self, idle_until: Instant) -> usize {
        self.drain_generation_tasks(idle_until, Instant::now)
    }

    /// Runs queued generation tasks as if the time were fixed at `now`.
    ///
    /// With `now < idle_until` the whole queue drains; otherwise only tasks whose
    /// deadline has passed run.
    pub fn process_generation_tasks_at(&mut self, now: Instant, idle_until: Instant) -> usize {
        self.drain_generation_tasks(idle_until, || now)
    }

    fn drain_generation_tasks<F>(&mut self, idle_until: Instant, mut clock: F) -> usize
    where
        F: FnMut() -> Instant,
    {
        let mut processed = 0;
        while let Some(task) = self.tasks.next_task(clock(), idle_until) {
            task.process(self);
            processed += 1;
        }
        processed
    }

    /// Runs every queued generation task immediately.
    pub fn flush(&mut self) -> usize {
        let tasks = self.tasks.drain();
        let processed = tasks.len();
        for task in tasks {
            task.process(self);
        }
        processed
    }

    /// Forgets every player edit and rebuilds the window around the last centre.
    pub fn regenerate_all(&mut self) -> RefreshReport {
        self.regenerate_all_at(Instant::now())
    }

    pub fn regenerate_all_at(&mut self, now: Instant) -> RefreshReport {
        info!(
            "Regenerating world with seed {} ({} chunks, {} edits discarded)",
            self.params.terrain.seed,
            self.chunks.len(),
            self.edits.len()
        );

        self.edits.clear();
        self.tasks.clear();
        for coord in self.chunk_coords() {
            self.unload_chunk(coord);
        }
        self.stream_around(self.center, now)
    }

    /// Replaces the generation parameters and regenerates the world.
    pub fn set_params(&mut self, params: GenerationParams) -> RefreshReport {
        self.params = params;
        self.regenerate_all()
    }

    /// Replaces the streaming settings. The chunk size cannot change on a live world.
    pub fn set_streaming(
        &mut self,
        draw_distance: u32,
        async_loading: bool,
        generation_timeout: Duration,
    ) {
        self.settings.draw_distance = draw_distance;
        self.settings.async_loading = async_loading;
        self.settings.generation_timeout = generation_timeout;
    }

    /// Returns and forgets the chunks whose instances changed, sorted.
    pub fn take_dirty_chunks(&mut self) -> Vec<ChunkCoord> {
        let mut dirty: Vec<ChunkCoord> = self.dirty.drain().collect();
        dirty.sort();
        dirty
    }

    /// Returns and forgets the chunks unloaded since the last call.
    pub fn take_removed_chunks(&mut self) -> Vec<ChunkCoord> {
        std::mem::take(&mut self.removed)
    }

    /// Walks the voxel grid along a ray and returns the first non-air block.
    ///
    /// # Arguments
    /// * `origin` - Start of the ray in world space
    /// * `direction` - Direction of the ray; need not be normalized
    /// * `max_distance` - Length of the ray, cut to the far corner of the streaming window
    ///
    /// # Returns
    /// `None` if nothing solid is within reach, or the ray or reach is NaN.
    pub fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        let length = direction.magnitude2();
        if length == 0.0 || !length.is_finite() || max_distance.is_nan() {
            return None;
        }
        let direction: [f32; 3] = direction.normalize().into();
        // Shift by half a block so that cell `i` spans `[i, i + 1)`.
        let start = [origin.x + 0.5, origin.y + 0.5, origin.z + 0.5];
        if start
            .iter()
            .any(|value| !value.is_finite() || value.abs() >= MAX_RAY_COORDINATE)
        {
            return None;
        }
        let max_distance = max_distance.min(self.window_reach(start));

        let mut cell = start.map(|value| value.floor() as i32);
        let mut step = [0i32; 3];
        let mut t_max = [f32::INFINITY; 3];
        let mut t_delta = [f32::INFINITY; 3];
        for axis in 0..3 {
            let d = direction[axis];
            if d > 0.0 {
                step[axis] = 1;
                t_delta[axis] = 1.0 / d;
                t_max[axis] = ((cell[axis] + 1) as f32 - start[axis]) / d;
            } else if d < 0.0 {
                step[axis] = -1;
                t_delta[axis] = -1.0 / d;
                t_max[axis] = (start[axis] - cell[axis] as f32) / -d;
            }
        }

        let mut normal = [0i32; 3];
        let mut distance = 0.0;
        loop {
            if let Some(block) = self
                .get_block(cell[0], cell[1], cell[2])
                .filter(|block| !block.is_empty())
            {
                let block_position = Point3::from(cell);
                let normal = Vector3::from(normal);
                return Some(RaycastHit {
                    block: block_position,
                    block_type: block.block_type,
                    normal,
                    placement: block_position + normal,
                    distance,
                });
            }

            let axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
                0
            } else if t_max[1] <= t_max[2] {
                1
            } else {
                2
            };

            if t_max[axis] > max_distance {
                return None;
            }
            distance = t_max[axis];
            cell[axis] += step[axis];
            t_max[axis] += t_delta[axis];
            normal = [0; 3];
            normal[axis] = -step[axis];
        }
    }
}

impl World {
    /// Distance from `start` to the farthest corner of the streaming window, in the
    /// half-block shifted space used by `raycast`. Nothing solid lies beyond it.
    fn window_reach(&self, start: [f32; 3]) -> f32 {
        let width = self.settings.chunk_size.width;
        let distance = self.settings.draw_distance as i32;
        let low_x = ((self.center.x - distance) * width) as f32;
        let high_x = ((self.center.x + distance + 1) * width) as f32;
        let low_z = ((self.center.z - distance) * width) as f32;
        let high_z = ((self.center.z + distance + 1) * width) as f32;
        let high_y = self.settings.chunk_size.height as f32;

        let far = |value: f32, low: f32, high: f32| (value - low).abs().max((value - high).abs());
        let dx = far(start[0], low_x, high_x);
        let dy = far(start[1], 0.0, high_y);
        let dz = far(start[2], low_z, high_z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl VoxelQuery for World {
    fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        World::get_block(self, x, y, z)
    }
}

mod common;

use common::{flat_params, SMALL_CHUNK};
use voxel_sandbox::{
    application_state::{config::EngineConfig, ApplicationState},
    engine_state::{
        rendering::scene::HeadlessScene,
        voxels::{chunk::ChunkSize, VoxelQuery},
        EngineState,
    },
};

fn headless_config() -> EngineConfig {
    EngineConfig {
        chunk_size: SMALL_CHUNK,
        draw_distance: 1,
        async_loading: false,
        spawn: [4.0, 8.0, 4.0],
        generation: flat_params(),
        ..Default::default()
    }
}

fn scene_matches_world(engine: &EngineState<HeadlessScene>) {
    let world_instances: usize = engine
        .world
        .chunks()
        .filter(|chunk| chunk.is_loaded())
        .map(|chunk| chunk.instances().total())
        .sum();
    assert_eq!(engine.scene().total_instances(), world_instances);
    assert_eq!(engine.scene().chunk_count(), engine.world.loaded_chunk_count());
    for chunk in engine.world.chunks() {
        assert!(engine.scene().chunk(chunk.coord()).is_some());
    }
}

#[test]
fn scripted_run_streams_and_edits() {
    let mut app = ApplicationState::new(headless_config());
    let summary = app.run(120);

    assert_eq!(summary.frames, 120);
    assert_eq!(summary.loaded_chunks, 9);
    assert_eq!(summary.pending_chunks, 0);
    assert_eq!(summary.scene_chunks, 9);
    assert!(summary.edits >= 1, "{summary:?}");
    // Walking forward from yaw zero heads down negative z.
    assert!(summary.player_position.z < 0.0);
    assert!(app.engine_state.player.on_ground);
    scene_matches_world(&app.engine_state);
}

#[test]
fn deferred_loading_catches_up() {
    let mut app = ApplicationState::new(EngineConfig {
        async_loading: true,
        ..headless_config()
    });
    assert_eq!(app.engine_state.world.loaded_chunk_count(), 0);

    let summary = app.run(30);
    assert_eq!(summary.loaded_chunks, 9);
    assert_eq!(summary.pending_chunks, 0);
    scene_matches_world(&app.engine_state);
}

#[test]
fn new_seed_regenerates_and_clears_edits() {
    let mut app = ApplicationState::new(headless_config());
    app.run(10);

    let engine = &mut app.engine_state;
    assert!(engine.world.add_block(0, 5, 0, 3));
    engine.sync_scene();
    assert_eq!(engine.world.edits().len(), 1);

    let mut config = engine.config().clone();
    config.generation.terrain.seed = 99;
    engine.apply_config(config);

    assert!(engine.world.edits().is_empty());
    assert_eq!(engine.world.params().terrain.seed, 99);
    assert_eq!(engine.scene().chunk_count(), 9);
    scene_matches_world(engine);
}

#[test]
fn chunk_size_change_rebuilds_the_world() {
    let mut app = ApplicationState::new(headless_config());
    app.run(5);

    let engine = &mut app.engine_state;
    let mut config = engine.config().clone();
    config.chunk_size = ChunkSize {
        width: 6,
        height: 12,
    };
    engine.apply_config(config);

    assert_eq!(engine.world.settings().chunk_size.width, 6);
    assert_eq!(engine.world.loaded_chunk_count(), 9);
    for chunk in engine.world.chunks() {
        assert_eq!(chunk.size().width, 6);
    }
    scene_matches_world(engine);
}

#[test]
fn regenerate_all_restores_pristine_terrain() {
    let mut app = ApplicationState::new(headless_config());
    app.run(5);

    let engine = &mut app.engine_state;
    assert!(engine.world.remove_block(2, 4, 2));
    engine.regenerate_all();

    assert!(engine.world.edits().is_empty());
    assert!(engine.world.is_solid(2, 4, 2));
    scene_matches_world(engine);
}

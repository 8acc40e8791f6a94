mod common;

use std::time::Duration;

use cgmath::Point3;
use common::{assert_instances_consistent, light_params, world_with};
use voxel_sandbox::engine_state::voxels::chunk::ChunkCoord;
use web_time::Instant;

#[test]
fn draw_distance_one_loads_nine_chunks() {
    let mut world = world_with(light_params(3), false);
    let report = world.refresh(Point3::new(0.0, 20.0, 0.0));

    assert_eq!(report.loaded.len(), 9);
    assert!(report.unloaded.is_empty());
    assert_eq!(world.loaded_chunk_count(), 9);

    let expected: Vec<ChunkCoord> = (-1..=1)
        .flat_map(|x| (-1..=1).map(move |z| ChunkCoord::new(x, z)))
        .collect();
    assert_eq!(world.chunk_coords(), expected);
    assert_instances_consistent(&world);
}

#[test]
fn moving_one_chunk_loads_three_and_unloads_three() {
    let mut world = world_with(light_params(3), false);
    world.refresh(Point3::new(0.0, 20.0, 0.0));

    let report = world.refresh(Point3::new(8.0, 20.0, 0.0));
    let mut loaded = report.loaded.clone();
    loaded.sort();
    assert_eq!(
        loaded,
        vec![
            ChunkCoord::new(2, -1),
            ChunkCoord::new(2, 0),
            ChunkCoord::new(2, 1)
        ]
    );
    assert_eq!(
        report.unloaded,
        vec![
            ChunkCoord::new(-1, -1),
            ChunkCoord::new(-1, 0),
            ChunkCoord::new(-1, 1)
        ]
    );
    assert_eq!(world.loaded_chunk_count(), 9);
    assert_eq!(world.take_removed_chunks().len(), 3);
    assert_instances_consistent(&world);
}

#[test]
fn refreshing_in_place_changes_nothing() {
    let mut world = world_with(light_params(3), false);
    world.refresh(Point3::new(0.0, 20.0, 0.0));
    let report = world.refresh(Point3::new(3.0, 20.0, 2.0));
    assert!(report.loaded.is_empty());
    assert!(report.unloaded.is_empty());
}

#[test]
fn regenerating_the_same_seed_reproduces_the_world() {
    let mut a = world_with(light_params(11), false);
    let mut b = world_with(light_params(11), false);
    a.refresh(Point3::new(0.0, 20.0, 0.0));
    b.refresh(Point3::new(0.0, 20.0, 0.0));

    for x in -8..16 {
        for z in -8..16 {
            for y in 0..16 {
                assert_eq!(a.get_block(x, y, z), b.get_block(x, y, z));
            }
        }
    }
}

#[test]
fn deferred_generation_uses_idle_time() {
    let mut world = world_with(light_params(5), true);
    let now = Instant::now();
    world.refresh_at(Point3::new(0.0, 20.0, 0.0), now);

    assert_eq!(world.pending_tasks(), 9);
    assert_eq!(world.loaded_chunk_count(), 0);
    assert_eq!(world.get_block(0, 0, 0), None);

    let processed = world.process_generation_tasks_at(now, now + Duration::from_millis(5));
    assert_eq!(processed, 9);
    assert_eq!(world.loaded_chunk_count(), 9);
    assert_instances_consistent(&world);
}

#[test]
fn expired_tasks_run_without_idle_time() {
    let mut world = world_with(light_params(5), true);
    let now = Instant::now();
    world.refresh_at(Point3::new(0.0, 20.0, 0.0), now);

    assert_eq!(world.process_generation_tasks_at(now, now), 0);
    let later = now + Duration::from_millis(1500);
    assert_eq!(world.process_generation_tasks_at(later, later), 9);
    assert_eq!(world.pending_tasks(), 0);
}

#[test]
fn partially_loaded_windows_keep_borders_exposed() {
    let mut world = world_with(light_params(8), true);
    world.refresh(Point3::new(0.0, 20.0, 0.0));

    // Load the chunks one at a time and check every intermediate state.
    for coord in world.chunk_coords() {
        assert!(world.generate_chunk(coord));
        assert_instances_consistent(&world);
    }

    // The queued tasks find their chunks already loaded.
    assert_eq!(world.flush(), 9);
    assert_eq!(world.loaded_chunk_count(), 9);
}

mod common;

use cgmath::Point3;
use common::{assert_instances_consistent, flat_params, light_params, world_with};
use proptest::prelude::*;
use voxel_sandbox::engine_state::voxels::block::{block_type::BlockType, BlockId};

#[test]
fn edit_round_trip() {
    let mut world = world_with(light_params(1), false);
    world.refresh(Point3::new(0.0, 20.0, 0.0));

    let (x, y, z) = (3, 14, -5);
    world.remove_block(x, y, z);
    assert!(world.add_block(x, y, z, BlockType::COAL.id()));
    assert_eq!(world.get_block(x, y, z).unwrap().block_type, BlockType::COAL.id());

    assert!(world.remove_block(x, y, z));
    assert!(world.get_block(x, y, z).unwrap().is_empty());
    assert_instances_consistent(&world);
}

#[test]
fn edits_survive_unload_and_reload() {
    let mut world = world_with(flat_params(), false);
    world.refresh(Point3::new(0.0, 20.0, 0.0));

    assert!(world.add_block(2, 5, 2, BlockType::IRON.id()));
    assert!(world.remove_block(2, 4, 3));

    world.refresh(Point3::new(200.0, 20.0, 0.0));
    assert_eq!(world.get_block(2, 5, 2), None);

    world.refresh(Point3::new(0.0, 20.0, 0.0));
    assert_eq!(world.get_block(2, 5, 2).unwrap().block_type, BlockType::IRON.id());
    assert!(world.get_block(2, 4, 3).unwrap().is_empty());
    assert!(world.get_block(2, 3, 3).unwrap().instance_slot.is_some());
    assert_instances_consistent(&world);
}

#[test]
fn regenerate_all_discards_edits() {
    let mut world = world_with(flat_params(), false);
    world.refresh(Point3::new(0.0, 20.0, 0.0));

    assert!(world.add_block(-3, 5, 1, BlockType::SAND.id()));
    assert!(world.remove_block(6, 4, 6));
    assert_eq!(world.edits().len(), 2);

    let report = world.regenerate_all();
    assert_eq!(report.loaded.len(), 9);
    assert!(world.edits().is_empty());
    assert!(world.get_block(-3, 5, 1).unwrap().is_empty());
    assert_eq!(world.get_block(6, 4, 6).unwrap().block_type, BlockType::GRASS.id());
    assert_instances_consistent(&world);
}

#[test]
fn new_params_regenerate_the_world() {
    let mut world = world_with(flat_params(), false);
    world.refresh(Point3::new(0.0, 20.0, 0.0));
    world.add_block(0, 5, 0, BlockType::STONE.id());

    let mut params = flat_params();
    params.terrain.offset = 6.0;
    world.set_params(params);

    assert!(world.edits().is_empty());
    assert_eq!(world.get_block(0, 6, 0).unwrap().block_type, BlockType::GRASS.id());
    assert_eq!(world.get_block(0, 5, 0).unwrap().block_type, BlockType::DIRT.id());
}

#[test]
fn redundant_edits_are_no_ops() {
    let mut world = world_with(flat_params(), false);
    world.refresh(Point3::new(0.0, 20.0, 0.0));

    assert!(!world.add_block(1, 4, 1, BlockType::STONE.id()));
    assert!(!world.remove_block(1, 10, 1));
    assert!(!world.add_block(1, 40, 1, BlockType::STONE.id()));
    assert!(!world.add_block(1, 5, 1, BlockType::EMPTY.id()));
    assert!(!world.add_block(1, 5, 1, 200));
    assert!(world.edits().is_empty());
}

#[derive(Debug, Clone)]
enum Edit {
    Add { x: i32, y: i32, z: i32, id: BlockId },
    Remove { x: i32, y: i32, z: i32 },
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    // The window spans x and z in -8..16 and y in 0..16.
    let position = (-9..17i32, -1..17i32, -9..17i32);
    prop_oneof![
        (position.clone(), 1..BlockType::COUNT as BlockId)
            .prop_map(|((x, y, z), id)| Edit::Add { x, y, z, id }),
        position.prop_map(|(x, y, z)| Edit::Remove { x, y, z }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_edits_keep_instances_consistent(
        seed in 0u32..1000,
        edits in prop::collection::vec(edit_strategy(), 1..60),
    ) {
        let mut world = world_with(light_params(seed), false);
        world.refresh(Point3::new(4.0, 20.0, 4.0));

        for edit in &edits {
            match *edit {
                Edit::Add { x, y, z, id } => {
                    let was_air = world.get_block(x, y, z).is_some_and(|block| block.is_empty());
                    prop_assert_eq!(world.add_block(x, y, z, id), was_air);
                }
                Edit::Remove { x, y, z } => {
                    let was_solid = world.get_block(x, y, z).is_some_and(|block| !block.is_empty());
                    prop_assert_eq!(world.remove_block(x, y, z), was_solid);
                }
            }
        }

        assert_instances_consistent(&world);
    }
}

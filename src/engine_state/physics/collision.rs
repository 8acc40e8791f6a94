//! # Collision Detection
//!
//! Player-versus-voxel collision in two phases.
//!
//! The broad phase gathers every non-air block whose cell overlaps the player's
//! axis-aligned bounding box. The narrow phase tests each candidate against the
//! player's bounding cylinder using the point of the block closest to the cylinder
//! centre, and produces a contact with the axis of least penetration.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::player_state::player::Player;
use crate::engine_state::voxels::VoxelQuery;

/// Half the edge length of a block. Blocks are centred on integer coordinates.
const HALF_BLOCK: f32 = 0.5;

/// A penetration between the player and one block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    /// World coordinate of the block.
    pub block: Point3<i32>,
    /// Point of the block closest to the cylinder centre.
    pub contact_point: Point3<f32>,
    /// Direction the player has to move to leave the block.
    pub normal: Vector3<f32>,
    /// How far the player has to move along `normal`.
    pub overlap: f32,
}

/// Gathers the non-air blocks that may intersect the player.
pub fn broad_phase(player: &Player, world: &impl VoxelQuery) -> Vec<Point3<i32>> {
    let position = player.position;
    let min_x = (position.x - player.radius).floor() as i32;
    let max_x = (position.x + player.radius).ceil() as i32;
    let min_y = (position.y - player.height).floor() as i32;
    let max_y = position.y.ceil() as i32;
    let min_z = (position.z - player.radius).floor() as i32;
    let max_z = (position.z + player.radius).ceil() as i32;

    let mut candidates = Vec::new();
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            for z in min_z..=max_z {
                if world.is_solid(x, y, z) {
                    candidates.push(Point3::new(x, y, z));
                }
            }
        }
    }
    candidates
}

/// The point of the block at `block` closest to `point`.
pub fn closest_point(block: Point3<i32>, point: Point3<f32>) -> Point3<f32> {
    let clamp = |value: f32, center: i32| {
        value.clamp(center as f32 - HALF_BLOCK, center as f32 + HALF_BLOCK)
    };
    Point3::new(
        clamp(point.x, block.x),
        clamp(point.y, block.y),
        clamp(point.z, block.z),
    )
}

/// Returns true if `point` lies strictly inside the player's bounding cylinder.
pub fn is_inside_player_cylinder(player: &Player, point: Point3<f32>) -> bool {
    let offset = point - player.center();
    let radial_squared = offset.x * offset.x + offset.z * offset.z;
    offset.y.abs() < player.height / 2.0 && radial_squared < player.radius * player.radius
}

/// Builds a contact for every candidate block that penetrates the player.
///
/// The contact resolves along whichever of the vertical and radial axes has the
/// smaller overlap. Ties, and contacts directly above or below the centre, resolve
/// vertically.
pub fn narrow_phase(player: &Player, candidates: &[Point3<i32>]) -> Vec<Contact> {
    let center = player.center();
    let mut contacts = Vec::new();

    for &block in candidates {
        let contact_point = closest_point(block, center);
        if !is_inside_player_cylinder(player, contact_point) {
            continue;
        }

        let delta = contact_point - center;
        let radial = (delta.x * delta.x + delta.z * delta.z).sqrt();
        let overlap_y = player.height / 2.0 - delta.y.abs();
        let overlap_xz = player.radius - radial;

        let (normal, overlap) = if overlap_y <= overlap_xz || radial == 0.0 {
            let direction = if delta.y > 0.0 { -1.0 } else { 1.0 };
            (Vector3::new(0.0, direction, 0.0), overlap_y)
        } else {
            (Vector3::new(-delta.x, 0.0, -delta.z).normalize(), overlap_xz)
        };

        contacts.push(Contact {
            block,
            contact_point,
            normal,
            overlap,
        });
    }

    contacts
}

/// Pushes the player out of every contact, smallest overlap first.
///
/// A contact that an earlier push already resolved is skipped. Each applied push also
/// removes the part of the player's velocity that points into the block.
///
/// # Returns
/// The number of contacts applied.
pub fn resolve_collisions(player: &mut Player, mut contacts: Vec<Contact>) -> usize {
    contacts.sort_by(|a, b| a.overlap.total_cmp(&b.overlap));

    let mut applied = 0;
    for contact in contacts {
        if !is_inside_player_cylinder(player, contact.contact_point) {
            continue;
        }

        player.position += contact.normal * contact.overlap;

        let into_block = player.world_velocity().dot(contact.normal);
        player.apply_world_delta_velocity(-contact.normal * into_block);
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{block_type::BlockType, Block};
    use std::collections::HashSet;

    struct Blocks(HashSet<(i32, i32, i32)>);

    impl VoxelQuery for Blocks {
        fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
            self.0
                .contains(&(x, y, z))
                .then(|| Block::new(BlockType::STONE))
        }
    }

    #[test]
    fn closest_point_clamps_into_the_block() {
        let point = closest_point(Point3::new(1, 0, 0), Point3::new(0.0, 3.0, 1.2));
        assert_eq!(point, Point3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn broad_phase_covers_the_bounding_box() {
        let world = Blocks([(0, 0, 0), (5, 0, 0), (1, 1, -1)].into_iter().collect());
        let player = Player::new(Point3::new(0.2, 1.5, -0.3));

        let candidates = broad_phase(&player, &world);
        assert_eq!(candidates, vec![Point3::new(0, 0, 0), Point3::new(1, 1, -1)]);
    }

    #[test]
    fn block_below_pushes_up() {
        let mut player = Player::new(Point3::new(0.0, 2.0, 0.0));
        player.velocity.y = -5.0;

        let contacts = narrow_phase(&player, &[Point3::new(0, 0, 0)]);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].normal, Vector3::new(0.0, 1.0, 0.0));
        assert!((contacts[0].overlap - 0.25).abs() < 1e-6);

        assert_eq!(resolve_collisions(&mut player, contacts), 1);
        assert!((player.position.y - 2.25).abs() < 1e-6);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn block_beside_pushes_sideways() {
        let mut player = Player::new(Point3::new(0.7, 1.5, 0.0));
        let contacts = narrow_phase(&player, &[Point3::new(0, 1, 0)]);

        assert_eq!(contacts.len(), 1);
        assert!((contacts[0].normal - Vector3::new(1.0, 0.0, 0.0)).magnitude() < 1e-6);
        assert!((contacts[0].overlap - 0.3).abs() < 1e-6);

        resolve_collisions(&mut player, contacts);
        assert!((player.position.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn far_blocks_produce_no_contact() {
        let player = Player::new(Point3::new(0.0, 5.0, 0.0));
        assert!(narrow_phase(&player, &[Point3::new(0, 0, 0)]).is_empty());
    }
}

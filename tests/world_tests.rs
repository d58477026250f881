/// Integration tests for terrain generation and the occlusion invariants of the world model.
/// Random edits are applied through the public block API and the face masks of every loaded
/// block are checked against a brute-force recomputation from its neighbors.
use cgmath::Point3;
use voxel_canvas::engine_state::voxels::{
    block::{
        block_side::BlockSide,
        block_type::{BlockType, ALL_BLOCK_TYPES},
    },
    height_field::HeightField,
    world::{pair_visibility, World},
};

/// Checks every face of every loaded block against its current neighbor.
fn assert_masks_match_neighbors(world: &World) {
    for chunk in world.chunks() {
        for block in chunk.blocks() {
            for side in BlockSide::all() {
                let expected = match world.get_block(block.neighbor_position(side)) {
                    Some(neighbor) => pair_visibility(block, neighbor, side).0,
                    None => true,
                };
                assert_eq!(
                    block.sides.contains(side),
                    expected,
                    "{:?} face of {:?} at {:?}",
                    side,
                    block.block_type,
                    block.position
                );
            }
        }
    }
    assert!(world.render_cache_mismatches().is_empty());
}

#[test]
fn generated_terrain_has_consistent_masks() {
    let mut world = World::new(11);
    world.ensure_chunks_around(0, 0);
    assert_eq!(world.chunk_count(), 9);
    assert_masks_match_neighbors(&world);
}

#[test]
fn random_edits_keep_masks_consistent() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut world = World::new(11);
    world.ensure_chunks_around(0, 0);

    for _ in 0..400 {
        let position = Point3::new(rng.i32(-16..32), rng.i32(0..24), rng.i32(-16..32));
        if rng.bool() {
            let block_type = ALL_BLOCK_TYPES[rng.usize(..ALL_BLOCK_TYPES.len())];
            let was_empty = world.get_block(position).is_none();
            assert_eq!(world.add_block(position, block_type), was_empty);
        } else {
            let was_present = world.get_block(position).is_some();
            assert_eq!(world.remove_block(position), was_present);
        }
    }

    assert_masks_match_neighbors(&world);
}

#[test]
fn placing_and_removing_restores_the_neighbors() {
    let mut world = World::new(3);
    let left = Point3::new(40, 50, 40);
    let right = Point3::new(41, 50, 40);
    world.add_block(left, BlockType::STONE);
    let before = world.get_block(left).map(|block| block.sides);

    world.add_block(right, BlockType::BRICKS);
    let covered = world.get_block(left).map(|block| block.sides);
    assert_ne!(before, covered);

    world.remove_block(right);
    assert_eq!(world.get_block(left).map(|block| block.sides), before);
    assert_masks_match_neighbors(&world);
}

#[test]
fn water_surface_stays_visible_from_above() {
    let mut world = World::new(3);
    let water = Point3::new(-30, 6, -30);
    let below = Point3::new(-30, 5, -30);
    world.add_block(water, BlockType::WATER);
    world.add_block(below, BlockType::WATER);

    let top = world.get_block(water).map(|block| block.sides);
    assert!(top.is_some_and(|sides| sides.contains(BlockSide::TOP)));
    assert!(top.is_some_and(|sides| !sides.contains(BlockSide::BOTTOM)));
    assert_masks_match_neighbors(&world);
}

#[test]
fn height_field_is_deterministic_per_seed() {
    let first = HeightField::new(3);
    let second = HeightField::new(3);
    let other = HeightField::new(4);

    let mut differs = false;
    for x in -40..40 {
        for z in -40..40 {
            let height = first.height(x, z);
            assert!((0.0..=1.0).contains(&height));
            assert_eq!(height, second.height(x, z));
            assert!((5..=15).contains(&first.absolute_height(x, z)));
            differs |= height != other.height(x, z);
        }
    }
    assert!(differs);
}

#[test]
fn generated_columns_reach_the_height_field() {
    let mut world = World::new(9);
    world.ensure_chunks_around(0, 0);

    for (x, z) in [(0, 0), (5, -7), (-12, 3), (20, 20)] {
        let height = world.height_field().absolute_height(x, z);
        let bottom = world.get_block(Point3::new(x, 0, z));
        assert_eq!(bottom.map(|block| block.block_type), Some(BlockType::BEDROCK));
        assert!(world.get_block(Point3::new(x, height - 1, z)).is_some());
        assert!(world.get_block(Point3::new(x, height.max(7), z)).is_none());
    }
}

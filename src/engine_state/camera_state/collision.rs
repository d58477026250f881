//! # Player Collision
//!
//! Axis-separated swept box-versus-grid collision for the player.
//!
//! The player is an axis-aligned box `2 * HALF_WIDTH` wide and `BODY_HEIGHT` tall standing on
//! its feet position. Each tick the solid blocks in the box swept by the pending movement are
//! gathered, then the movement is clipped one axis at a time (x, then z, then y). A block only
//! stops an axis if it already overlaps the player on the two other axes, and the first block
//! on the path wins, so a move of several blocks in one tick cannot pass through a wall.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::world::World;

/// Half of the player's width along x and z.
pub const HALF_WIDTH: f32 = 0.3;
/// Height of the eyes above the feet.
pub const EYE_HEIGHT: f32 = 1.7;
/// Room kept between the eyes and a ceiling.
pub const HEAD_CLEARANCE: f32 = 0.2;
/// Height of the collision box.
pub const BODY_HEIGHT: f32 = EYE_HEIGHT + HEAD_CLEARANCE;
/// Vertical delta applied after hitting a ceiling so the player starts falling at once.
pub const CEILING_BOUNCE: f32 = -0.01;

/// Movement state the collision pass may clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Feet position before the move
    pub position: Point3<f32>,
    /// Pending movement for this tick
    pub delta: Vector3<f32>,
    /// Vertical velocity
    pub velocity: f32,
}

/// Collects the positions of solid blocks the player's box can touch during this move.
///
/// The gathered range covers the box at `position` and at `position + delta` on every
/// axis, plus the layer under the feet, so a move of several blocks in one tick still sees
/// every block it passes.
pub fn gather_solid_blocks(
    world: &World,
    position: Point3<f32>,
    delta: Vector3<f32>,
) -> Vec<Point3<i32>> {
    let target = position + delta;
    let (min_x, max_x) = swept_cells(position.x, target.x, -HALF_WIDTH, HALF_WIDTH);
    let (min_y, max_y) = swept_cells(position.y, target.y, -1.0, BODY_HEIGHT);
    let (min_z, max_z) = swept_cells(position.z, target.z, -HALF_WIDTH, HALF_WIDTH);

    let mut solids = Vec::new();
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            for z in min_z..=max_z {
                let block_position = Point3::new(x, y, z);
                if world
                    .get_block(block_position)
                    .is_some_and(|block| block.block_type.is_solid())
                {
                    solids.push(block_position);
                }
            }
        }
    }
    solids
}

/// Inclusive cell range covered by `[low, high]` extents around both endpoints of a move.
fn swept_cells(start: f32, end: f32, low: f32, high: f32) -> (i32, i32) {
    let min = (start.min(end) + low).floor() as i32;
    let max = (start.max(end) + high).floor() as i32;
    (min, max)
}

fn overlaps_x(position: Point3<f32>, block: Point3<i32>) -> bool {
    position.x + HALF_WIDTH > block.x as f32 && position.x - HALF_WIDTH < block.x as f32 + 1.0
}

fn overlaps_z(position: Point3<f32>, block: Point3<i32>) -> bool {
    position.z + HALF_WIDTH > block.z as f32 && position.z - HALF_WIDTH < block.z as f32 + 1.0
}

fn overlaps_column(position: Point3<f32>, block: Point3<i32>) -> bool {
    overlaps_x(position, block) && overlaps_z(position, block)
}

fn overlaps_y(position: Point3<f32>, block: Point3<i32>) -> bool {
    position.y + BODY_HEIGHT > block.y as f32 && position.y < block.y as f32 + 1.0
}

/// Clips a horizontal movement component against one block.
///
/// # Returns
/// The snapped coordinate if the block was hit.
fn clip_horizontal(coordinate: f32, delta: f32, block_min: f32) -> Option<f32> {
    let block_center = block_min + 0.5;
    if delta > 0.0 && coordinate < block_center && coordinate + HALF_WIDTH + delta >= block_min {
        Some(block_min - HALF_WIDTH)
    } else if delta < 0.0
        && coordinate > block_center
        && coordinate - HALF_WIDTH + delta <= block_min + 1.0
    {
        Some(block_min + 1.0 + HALF_WIDTH)
    } else {
        None
    }
}

/// Keeps whichever snap lies closer to the start of a move heading in the direction of
/// `delta`.
fn nearest(current: Option<f32>, candidate: f32, delta: f32) -> Option<f32> {
    match current {
        Some(snap) if delta > 0.0 => Some(snap.min(candidate)),
        Some(snap) => Some(snap.max(candidate)),
        None => Some(candidate),
    }
}

/// Resolves the pending motion against the given solid blocks.
///
/// Each axis is settled against every block before the next axis is looked at. Horizontal
/// hits zero the component and snap the player flush against the first face on its path.
/// Vertically, a ceiling hit stops the rise at the lowest ceiling and a floor hit lands the
/// player on the highest floor below; both can happen in the same pass.
pub fn resolve(mut motion: Motion, solids: &[Point3<i32>]) -> Motion {
    if motion.delta.x != 0.0 {
        let mut snap = None;
        for block in solids {
            if overlaps_z(motion.position, *block) && overlaps_y(motion.position, *block) {
                if let Some(x) = clip_horizontal(motion.position.x, motion.delta.x, block.x as f32)
                {
                    snap = nearest(snap, x, motion.delta.x);
                }
            }
        }
        if let Some(x) = snap {
            motion.delta.x = 0.0;
            motion.position.x = x;
        }
    }

    if motion.delta.z != 0.0 {
        let mut snap = None;
        for block in solids {
            if overlaps_x(motion.position, *block) && overlaps_y(motion.position, *block) {
                if let Some(z) = clip_horizontal(motion.position.z, motion.delta.z, block.z as f32)
                {
                    snap = nearest(snap, z, motion.delta.z);
                }
            }
        }
        if let Some(z) = snap {
            motion.delta.z = 0.0;
            motion.position.z = z;
        }
    }

    if motion.delta.y > 0.0 {
        let ceiling = solids
            .iter()
            .filter(|block| overlaps_column(motion.position, **block))
            .map(|block| block.y as f32)
            .filter(|&bottom| {
                motion.position.y < bottom
                    && motion.position.y + BODY_HEIGHT + motion.delta.y >= bottom
            })
            .reduce(f32::min);
        if let Some(bottom) = ceiling {
            motion.delta.y = CEILING_BOUNCE;
            motion.velocity = 0.0;
            motion.position.y = bottom - BODY_HEIGHT;
        }
    }

    if motion.delta.y <= 0.0 {
        let floor = solids
            .iter()
            .filter(|block| overlaps_column(motion.position, **block))
            .map(|block| block.y as f32 + 1.0)
            .filter(|&top| motion.position.y >= top && motion.position.y + motion.delta.y <= top)
            .reduce(f32::max);
        if let Some(top) = floor {
            motion.delta.y = 0.0;
            motion.velocity = 0.0;
            motion.position.y = top;
        }
    }

    motion
}

/// Tests whether the player's box intersects the unit cell at `block`.
///
/// Used to refuse placing a block inside the player.
pub fn intersects_block(position: Point3<f32>, block: Point3<i32>) -> bool {
    overlaps_column(position, block) && overlaps_y(position, block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn motion(position: (f32, f32, f32), delta: (f32, f32, f32)) -> Motion {
        Motion {
            position: Point3::new(position.0, position.1, position.2),
            delta: Vector3::new(delta.0, delta.1, delta.2),
            velocity: 0.0,
        }
    }

    #[test]
    fn overshooting_wall_ends_flush_for_any_speed() {
        let wall = [Point3::new(2, 10, 0)];
        for speed in [0.5, 3.0, 40.0, 1.0e6] {
            let result = resolve(motion((1.2, 10.0, 0.5), (speed, 0.0, 0.0)), &wall);
            assert_eq!(result.delta.x, 0.0);
            assert_eq!(result.position.x, 2.0 - HALF_WIDTH);
            assert!(result.position.x + result.delta.x + HALF_WIDTH <= 2.0);
        }
    }

    #[test]
    fn approaching_from_the_positive_side_snaps_to_the_far_face() {
        let wall = [Point3::new(0, 10, 0)];
        let result = resolve(motion((1.6, 10.0, 0.5), (0.0, 0.0, 0.0)), &wall);
        assert_eq!(result.position.x, 1.6);
        let result = resolve(motion((1.6, 10.0, 0.5), (-5.0, 0.0, 0.0)), &wall);
        assert_eq!(result.position.x, 1.0 + HALF_WIDTH);
        assert_eq!(result.delta.x, 0.0);
    }

    #[test]
    fn moving_away_is_never_blocked() {
        let wall = [Point3::new(2, 10, 0)];
        let result = resolve(motion((2.0 - HALF_WIDTH, 10.0, 0.5), (-0.2, 0.0, 0.0)), &wall);
        assert_eq!(result.delta.x, -0.2);
    }

    #[test]
    fn z_axis_collides_like_x() {
        let wall = [Point3::new(0, 10, 3)];
        let result = resolve(motion((0.5, 10.0, 2.0), (0.0, 0.0, 9.0)), &wall);
        assert_eq!(result.position.z, 3.0 - HALF_WIDTH);
        assert_eq!(result.delta.z, 0.0);
    }

    #[test]
    fn blocks_beside_the_path_do_not_stop_movement() {
        let neighbor = [Point3::new(2, 10, 1)];
        let result = resolve(motion((1.2, 10.0, 0.5), (1.0, 0.0, 0.0)), &neighbor);
        assert_eq!(result.delta.x, 1.0);
    }

    #[test]
    fn falling_lands_on_top_of_the_block() {
        let floor = [Point3::new(0, 9, 0)];
        let mut falling = motion((0.5, 10.4, 0.5), (0.0, -3.0, 0.0));
        falling.velocity = -8.0;
        let result = resolve(falling, &floor);
        assert_eq!(result.position.y, 10.0);
        assert_eq!(result.delta.y, 0.0);
        assert_eq!(result.velocity, 0.0);
    }

    #[test]
    fn standing_on_the_floor_does_not_block_walking() {
        let floor = [Point3::new(1, 9, 0)];
        let result = resolve(motion((0.5, 10.0, 0.5), (0.6, 0.0, 0.0)), &floor);
        assert_eq!(result.delta.x, 0.6);
    }

    #[test]
    fn rising_into_a_ceiling_bounces_down() {
        let ceiling = [Point3::new(0, 12, 0)];
        let mut rising = motion((0.5, 10.0, 0.5), (0.0, 0.5, 0.0));
        rising.velocity = 8.0;
        let result = resolve(rising, &ceiling);
        assert_eq!(result.delta.y, CEILING_BOUNCE);
        assert_eq!(result.velocity, 0.0);
        assert!((result.position.y - (12.0 - BODY_HEIGHT)).abs() < 1e-5);
    }

    #[test]
    fn block_intersection_covers_the_whole_body() {
        let feet = Point3::new(0.5, 10.0, 0.5);
        assert!(intersects_block(feet, Point3::new(0, 10, 0)));
        assert!(intersects_block(feet, Point3::new(0, 11, 0)));
        assert!(!intersects_block(feet, Point3::new(0, 12, 0)));
        assert!(!intersects_block(feet, Point3::new(0, 9, 0)));
        assert!(!intersects_block(feet, Point3::new(1, 10, 0)));
    }

    /// An otherwise empty world holding stone at the given positions.
    fn stone_world(blocks: &[(i32, i32, i32)]) -> World {
        let mut world = World::new(5);
        for &(x, y, z) in blocks {
            world.add_block(Point3::new(x, y, z), BlockType::STONE);
        }
        world
    }

    /// Gathers from the world and resolves, the way a player tick does.
    fn move_through(world: &World, moving: Motion) -> Motion {
        let solids = gather_solid_blocks(world, moving.position, moving.delta);
        resolve(moving, &solids)
    }

    #[test]
    fn gathering_covers_the_whole_path() {
        let world = stone_world(&[(4, 20, 0), (0, 15, 0), (0, 20, 6), (0, 28, 0)]);
        let start = Point3::new(0.5, 20.0, 0.5);

        let solids = gather_solid_blocks(&world, start, Vector3::new(0.0, 0.0, 0.0));
        assert!(solids.is_empty());

        let solids = gather_solid_blocks(&world, start, Vector3::new(4.0, 0.0, 0.0));
        assert_eq!(solids, vec![Point3::new(4, 20, 0)]);

        let solids = gather_solid_blocks(&world, start, Vector3::new(0.0, -4.0, 0.0));
        assert_eq!(solids, vec![Point3::new(0, 15, 0)]);

        let solids = gather_solid_blocks(&world, start, Vector3::new(0.0, 0.0, 6.0));
        assert_eq!(solids, vec![Point3::new(0, 20, 6)]);

        let solids = gather_solid_blocks(&world, start, Vector3::new(0.0, 7.0, 0.0));
        assert_eq!(solids, vec![Point3::new(0, 28, 0)]);
    }

    #[test]
    fn multi_block_step_stops_at_the_first_wall_on_x() {
        let world = stone_world(&[(2, 20, 0), (4, 20, 0), (-3, 20, 0), (-4, 20, 0)]);

        let resolved = move_through(&world, motion((0.5, 20.0, 0.5), (5.0, 0.0, 0.0)));
        assert_eq!(resolved.delta.x, 0.0);
        assert!((resolved.position.x - (2.0 - HALF_WIDTH)).abs() < 1e-6);

        let resolved = move_through(&world, motion((0.5, 20.0, 0.5), (-5.0, 0.0, 0.0)));
        assert_eq!(resolved.delta.x, 0.0);
        assert!((resolved.position.x - (-2.0 + HALF_WIDTH)).abs() < 1e-6);
    }

    #[test]
    fn multi_block_step_stops_at_the_first_wall_on_z() {
        let world = stone_world(&[(0, 21, 5), (0, 21, 3)]);
        let resolved = move_through(&world, motion((0.5, 20.0, 0.5), (0.0, 0.0, 4.0)));
        assert_eq!(resolved.delta.z, 0.0);
        assert!((resolved.position.z - (3.0 - HALF_WIDTH)).abs() < 1e-6);
    }

    #[test]
    fn long_fall_lands_on_the_highest_floor() {
        let world = stone_world(&[(0, 12, 0), (0, 16, 0)]);
        let resolved = move_through(&world, motion((0.5, 20.0, 0.5), (0.0, -9.0, 0.0)));
        assert_eq!(resolved.delta.y, 0.0);
        assert_eq!(resolved.position.y, 17.0);
    }

    #[test]
    fn fast_rise_stops_at_the_lowest_ceiling() {
        let world = stone_world(&[(0, 26, 0), (0, 24, 0)]);
        let resolved = move_through(&world, motion((0.5, 20.0, 0.5), (0.0, 5.0, 0.0)));
        assert_eq!(resolved.delta.y, CEILING_BOUNCE);
        assert!((resolved.position.y - (24.0 - BODY_HEIGHT)).abs() < 1e-4);
    }
}

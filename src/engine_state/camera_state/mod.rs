//! # Camera State Management
//!
//! This module handles the first-person player:
//! - Camera position and orientation tracking
//! - Integrating player actions into movement, gravity and flight
//! - Axis-separated collision against the voxel world
//! - Chunk-based position tracking that drives on-demand world generation
//!
//! ## Core Components
//! - `Camera`: the player's pose and the view basis derived from it
//! - `Player`: movement state and the per-tick update
//! - `collision`: neighborhood gathering, swept box clipping and placement vetoes
//!
//! ## Update Order
//! 1. Turn and look
//! 2. Horizontal movement rotated by yaw
//! 3. Vertical velocity from gravity, jumping or flight
//! 4. One-shot vertical skip on the first tick after a spawn or load
//! 5. Collision
//! 6. Apply the movement and load chunks around a newly entered chunk

use cgmath::{Point2, Point3, Rad, Vector3};

use super::{
    voxels::{chunk::chunk_position_of, world::World},
    PlayerAction,
};

pub mod camera;
pub mod collision;

use camera::Camera;
use collision::Motion;

/// Walking and flying speed in blocks per second
pub const SPEED: f32 = 5.0;
/// Keyboard turn rate in radians per second
pub const TURN_SPEED: f32 = 2.5;
/// Terminal fall speed in blocks per second
pub const FALL_SPEED: f32 = 8.0;
/// Upward velocity given by a jump
pub const JUMP_SPEED: f32 = 8.0;
/// Downward acceleration in blocks per second squared
pub const GRAVITY: f32 = 21.0;

/// The first-person player and its movement state.
///
/// # Fields
/// - `camera`: Pose of the player; the position is at the feet
/// - `velocity`: Vertical velocity used while gravity is on
/// - `delta`: Movement applied by the last tick; a zero vertical component means grounded
/// - `gravity`: Whether gravity is applied; flight mode otherwise
/// - `collision`: Whether movement is clipped against the world
/// - `first_update`: Suppresses vertical movement for one tick after spawn or load
/// - `chunk`: Chunk the player was in after the last tick
#[derive(Debug, Clone)]
pub struct Player {
    /// The current camera position and orientation
    pub camera: Camera,
    velocity: f32,
    delta: Vector3<f32>,
    /// Gravity on, flight off
    pub gravity: bool,
    /// Collision with solid blocks on
    pub collision: bool,
    first_update: bool,
    chunk: Point2<i32>,
}

impl Player {
    /// Creates a player standing at the world's spawn point.
    ///
    /// The 3×3 chunks around the spawn are generated.
    pub fn new(world: &mut World) -> Self {
        let mut player = Player {
            camera: Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0)),
            velocity: 0.0,
            delta: Vector3::new(0.0, 0.0, 0.0),
            gravity: true,
            collision: true,
            first_update: true,
            chunk: Point2::new(0, 0),
        };
        player.spawn(world);
        player
    }

    /// Moves the player back to the spawn point with a neutral orientation.
    pub fn spawn(&mut self, world: &mut World) {
        let spawn = world.spawn();
        self.set_pose(
            Point3::new(spawn.x as f32, spawn.y as f32, spawn.z as f32),
            Vector3::new(0.0, 0.0, 0.0),
            world,
        );
        log::info!("Player spawned at {:?}", spawn);
    }

    /// Places the player at `position` with the given rotation and resets movement.
    ///
    /// # Arguments
    /// * `position` - Feet position
    /// * `rotation` - `(pitch, yaw, roll)` in radians
    /// * `world` - The world; chunks around the new position are generated
    pub fn set_pose(&mut self, position: Point3<f32>, rotation: Vector3<f32>, world: &mut World) {
        self.camera = Camera::new(position, Rad(rotation.y), Rad(rotation.x));
        self.camera.roll = Rad(rotation.z);
        self.velocity = 0.0;
        self.delta = Vector3::new(0.0, 0.0, 0.0);
        self.first_update = true;
        self.chunk = chunk_position_of(position.x.floor() as i32, position.z.floor() as i32);
        world.ensure_chunks_around(self.chunk.x, self.chunk.y);
    }

    /// Feet position of the player
    pub fn position(&self) -> Point3<f32> {
        self.camera.position
    }

    /// Eye position of the player
    pub fn eye(&self) -> Point3<f32> {
        self.camera.eye(collision::EYE_HEIGHT)
    }

    /// Rotation as `(pitch, yaw, roll)` in radians
    pub fn rotation(&self) -> Vector3<f32> {
        Vector3::new(self.camera.pitch.0, self.camera.yaw.0, self.camera.roll.0)
    }

    /// The chunk the player is currently in
    pub fn chunk(&self) -> Point2<i32> {
        self.chunk
    }

    /// Vertical velocity
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Movement applied by the last tick
    pub fn last_delta(&self) -> Vector3<f32> {
        self.delta
    }

    /// Whether the player stood still vertically during the last tick.
    pub fn is_grounded(&self) -> bool {
        self.delta.y == 0.0
    }

    /// Advances the player by one tick.
    ///
    /// # Arguments
    /// * `dt` - Seconds since the last tick, already clamped by the caller
    /// * `actions` - The player's intents for this tick
    /// * `world` - The world to collide with and load chunks in
    pub fn update(&mut self, dt: f32, actions: &PlayerAction, world: &mut World) {
        let turn = TURN_SPEED * dt;
        if actions.turn_left {
            self.camera.add_yaw(-turn);
        }
        if actions.turn_right {
            self.camera.add_yaw(turn);
        }
        if actions.look_up {
            self.camera.add_pitch(turn);
        }
        if actions.look_down {
            self.camera.add_pitch(-turn);
        }
        if let Some((yaw, pitch)) = actions.rotate_view {
            self.camera.add_yaw(yaw);
            self.camera.add_pitch(pitch);
        }

        let (yaw_sin, yaw_cos) = self.camera.yaw.0.sin_cos();
        let step = SPEED * dt;
        let forward = axis(actions.move_forward, actions.move_backward);
        let strafe = axis(actions.move_right, actions.move_left);
        self.delta.x = (yaw_sin * forward + yaw_cos * strafe) * step;
        self.delta.z = (yaw_cos * forward - yaw_sin * strafe) * step;

        if self.gravity {
            if actions.jump && self.delta.y == 0.0 {
                self.velocity = JUMP_SPEED;
            }
            self.velocity = (self.velocity - GRAVITY * dt).max(-FALL_SPEED);
            self.delta.y = self.velocity * dt;
        } else {
            self.velocity = 0.0;
            self.delta.y = step * axis(actions.move_up, actions.move_down);
        }

        if self.first_update {
            self.delta.y = 0.0;
            self.first_update = false;
        }

        if self.collision {
            let solids = collision::gather_solid_blocks(world, self.camera.position, self.delta);
            let resolved = collision::resolve(
                Motion {
                    position: self.camera.position,
                    delta: self.delta,
                    velocity: self.velocity,
                },
                &solids,
            );
            self.camera.position = resolved.position;
            self.delta = resolved.delta;
            self.velocity = resolved.velocity;
        }

        self.camera.position += self.delta;

        let chunk = chunk_position_of(
            self.camera.position.x.floor() as i32,
            self.camera.position.z.floor() as i32,
        );
        if chunk != self.chunk {
            self.chunk = chunk;
            let generated = world.ensure_chunks_around(chunk.x, chunk.y);
            log::debug!("Entered chunk {:?}, generated {} chunks", chunk, generated);
        }
    }

    /// Tests whether a block at `block` would intersect the player.
    pub fn node_collision(&self, block: Point3<i32>) -> bool {
        collision::intersects_block(self.camera.position, block)
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i32 - negative as i32) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    /// A world with a flat stone floor whose top surface is at y = 20.
    fn floor_world() -> World {
        let mut world = World::new(5);
        for x in -4..=4 {
            for z in -4..=4 {
                world.add_block(Point3::new(x, 19, z), BlockType::STONE);
            }
        }
        world
    }

    fn standing_player(world: &mut World) -> Player {
        let mut player = Player::new(world);
        player.set_pose(Point3::new(0.5, 20.0, 0.5), Vector3::new(0.0, 0.0, 0.0), world);
        player
    }

    #[test]
    fn first_tick_skips_vertical_movement() {
        let mut world = World::new(5);
        let mut player = Player::new(&mut world);
        let start = player.position();
        player.collision = false;
        player.update(0.1, &PlayerAction::default(), &mut world);
        assert_eq!(player.position().y, start.y);
        player.update(0.1, &PlayerAction::default(), &mut world);
        assert!(player.position().y < start.y);
    }

    #[test]
    fn falling_is_capped_at_terminal_speed() {
        let mut world = World::new(5);
        let mut player = Player::new(&mut world);
        player.collision = false;
        for _ in 0..50 {
            player.update(0.1, &PlayerAction::default(), &mut world);
        }
        assert_eq!(player.velocity(), -FALL_SPEED);
    }

    #[test]
    fn standing_on_the_floor_stays_grounded() {
        let mut world = floor_world();
        let mut player = standing_player(&mut world);
        for _ in 0..10 {
            player.update(0.05, &PlayerAction::default(), &mut world);
        }
        assert_eq!(player.position().y, 20.0);
        assert!(player.is_grounded());
    }

    #[test]
    fn jumping_only_works_from_the_ground() {
        let mut world = floor_world();
        let mut player = standing_player(&mut world);
        player.update(0.05, &PlayerAction::default(), &mut world);
        player.update(0.05, &PlayerAction::default(), &mut world);
        assert!(player.is_grounded());

        let jump = PlayerAction {
            jump: true,
            ..Default::default()
        };
        player.update(0.05, &jump, &mut world);
        assert!(player.position().y > 20.0);
        let airborne_velocity = player.velocity();
        player.update(0.05, &jump, &mut world);
        assert!(player.velocity() < airborne_velocity);
    }

    #[test]
    fn flight_moves_vertically_on_request() {
        let mut world = World::new(5);
        let mut player = Player::new(&mut world);
        player.gravity = false;
        player.collision = false;
        player.update(0.1, &PlayerAction::default(), &mut world);
        let start = player.position().y;
        let up = PlayerAction {
            move_up: true,
            ..Default::default()
        };
        player.update(0.1, &up, &mut world);
        assert!((player.position().y - (start + SPEED * 0.1)).abs() < 1e-4);
        assert_eq!(player.velocity(), 0.0);
    }

    #[test]
    fn forward_follows_yaw() {
        let mut world = World::new(5);
        let mut player = Player::new(&mut world);
        player.collision = false;
        player.gravity = false;
        let start = player.position();
        let forward = PlayerAction {
            move_forward: true,
            ..Default::default()
        };
        player.update(0.1, &forward, &mut world);
        assert!((player.position().z - start.z - 0.5).abs() < 1e-4);
        assert!((player.position().x - start.x).abs() < 1e-4);

        player.camera.yaw = Rad(std::f32::consts::FRAC_PI_2);
        let start = player.position();
        player.update(0.1, &forward, &mut world);
        assert!((player.position().x - start.x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn walking_into_a_wall_stops_flush() {
        let mut world = floor_world();
        world.add_block(Point3::new(2, 20, 0), BlockType::STONE);
        let mut player = standing_player(&mut world);
        player.camera.yaw = Rad(std::f32::consts::FRAC_PI_2);
        let forward = PlayerAction {
            move_forward: true,
            ..Default::default()
        };
        for _ in 0..20 {
            player.update(0.1, &forward, &mut world);
        }
        assert!((player.position().x - (2.0 - collision::HALF_WIDTH)).abs() < 1e-4);
    }

    #[test]
    fn falling_at_the_frame_clamp_lands_on_the_floor() {
        let mut world = floor_world();
        let mut player = Player::new(&mut world);
        player.set_pose(Point3::new(0.5, 29.5, 0.5), Vector3::new(0.0, 0.0, 0.0), &mut world);
        for _ in 0..12 {
            player.update(0.25, &PlayerAction::default(), &mut world);
        }
        assert_eq!(player.position().y, 20.0);
        assert!(player.is_grounded());
    }

    #[test]
    fn walking_at_the_frame_clamp_stops_flush() {
        let forward = PlayerAction {
            move_forward: true,
            ..Default::default()
        };

        let mut world = floor_world();
        world.add_block(Point3::new(2, 20, 0), BlockType::STONE);
        let mut player = Player::new(&mut world);
        player.set_pose(
            Point3::new(0.9, 20.0, 0.5),
            Vector3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            &mut world,
        );
        player.update(0.25, &forward, &mut world);
        assert!((player.position().x - (2.0 - collision::HALF_WIDTH)).abs() < 1e-4);

        let mut world = floor_world();
        world.add_block(Point3::new(0, 20, 2), BlockType::STONE);
        let mut player = Player::new(&mut world);
        player.set_pose(Point3::new(0.5, 20.0, 0.9), Vector3::new(0.0, 0.0, 0.0), &mut world);
        player.update(0.25, &forward, &mut world);
        assert!((player.position().z - (2.0 - collision::HALF_WIDTH)).abs() < 1e-4);
    }

    #[test]
    fn crossing_a_chunk_border_loads_new_chunks() {
        let mut world = World::new(5);
        let mut player = Player::new(&mut world);
        player.collision = false;
        player.gravity = false;
        assert_eq!(world.chunk_count(), 9);
        player.set_pose(Point3::new(15.9, 40.0, 0.5), Vector3::new(0.0, 0.0, 0.0), &mut world);
        player.camera.yaw = Rad(std::f32::consts::FRAC_PI_2);
        let forward = PlayerAction {
            move_forward: true,
            ..Default::default()
        };
        player.update(0.1, &forward, &mut world);
        assert_eq!(player.chunk(), Point2::new(1, 0));
        assert_eq!(world.chunk_count(), 12);
    }

    #[test]
    fn node_collision_checks_the_whole_body() {
        let mut world = floor_world();
        let player = standing_player(&mut world);
        assert!(player.node_collision(Point3::new(0, 20, 0)));
        assert!(player.node_collision(Point3::new(0, 21, 0)));
        assert!(!player.node_collision(Point3::new(0, 19, 0)));
        assert!(!player.node_collision(Point3::new(1, 20, 0)));
    }
}

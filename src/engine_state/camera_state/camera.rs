//! # Camera Implementation
//!
//! This module contains the first-person camera pose and the view basis derived from it.
//!
//! ## Key Components
//! - `Camera`: position (at the feet) and orientation (yaw, pitch, roll) in world space
//! - `CameraBasis`: the orthonormal right/up/forward frame the rasterizer projects with
//!
//! ## Conventions
//! - Yaw rotates around +Y; yaw 0 looks along +Z and increasing yaw turns right (towards +X)
//! - Pitch rotates the view up; it is clamped to ±π/2 so the view never flips
//! - Roll is carried for save files only and never affects rendering

use cgmath::*;

/// Pitch limit; looking straight up or down is allowed, going past it is not.
pub const PITCH_LIMIT: f32 = 1.5708;

/// Represents a first-person camera in 3D space.
///
/// # Fields
/// - `position`: The position of the player's feet in world space
/// - `yaw`: Horizontal rotation (around Y axis) in radians
/// - `pitch`: Vertical rotation in radians
/// - `roll`: Rotation around the view axis, stored but unused
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The position of the player's feet in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation in radians
    pub pitch: Rad<f32>,
    /// Rotation around the view axis in radians
    pub roll: Rad<f32>,
}

/// Orthonormal view frame of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    /// Unit vector pointing where the camera looks
    pub forward: Vector3<f32>,
    /// Unit vector pointing to the right of the view
    pub right: Vector3<f32>,
    /// Unit vector pointing up in the view
    pub up: Vector3<f32>,
    /// Look direction projected onto the horizontal plane, as (x, z)
    pub forward_2d: Vector2<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial feet position. Can be any type that converts to `Point3<f32>`.
    /// * `yaw` - Initial yaw. Can be any type that converts to `Rad<f32>`.
    /// * `pitch` - Initial pitch. Can be any type that converts to `Rad<f32>`.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Point3, Deg};
    /// use voxel_canvas::engine_state::camera_state::camera::Camera;
    ///
    /// let camera = Camera::new(
    ///     Point3::new(0.0, 10.0, 0.0),  // Feet ten blocks up
    ///     Deg(0.0),                      // Facing along positive Z
    ///     Deg(0.0),                      // Level horizon
    /// );
    /// assert_eq!(camera.basis().forward.z, 1.0);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            roll: Rad(0.0),
        };
        camera.clamp_pitch();
        camera
    }

    /// Adds to the pitch and clamps the result to [`PITCH_LIMIT`].
    pub fn add_pitch(&mut self, amount: f32) {
        self.pitch += Rad(amount);
        self.clamp_pitch();
    }

    /// Adds to the yaw. Yaw is left unbounded.
    pub fn add_yaw(&mut self, amount: f32) {
        self.yaw += Rad(amount);
    }

    fn clamp_pitch(&mut self) {
        if self.pitch.0.is_nan() {
            self.pitch = Rad(0.0);
        }
        self.pitch = Rad(self.pitch.0.clamp(-PITCH_LIMIT, PITCH_LIMIT));
    }

    /// Computes the view basis for the current yaw and pitch.
    pub fn basis(&self) -> CameraBasis {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();

        CameraBasis {
            forward: Vector3::new(yaw_sin * pitch_cos, pitch_sin, yaw_cos * pitch_cos),
            right: Vector3::new(yaw_cos, 0.0, -yaw_sin),
            up: Vector3::new(-pitch_sin * yaw_sin, pitch_cos, -pitch_sin * yaw_cos),
            forward_2d: Vector2::new(yaw_sin, yaw_cos),
        }
    }

    /// The eye position, `eye_height` above the feet.
    pub fn eye(&self, eye_height: f32) -> Point3<f32> {
        Point3::new(self.position.x, self.position.y + eye_height, self.position.z)
    }
}

impl CameraBasis {
    /// Expresses a camera-relative world vector in view space.
    ///
    /// # Returns
    /// `(x, y, depth)` where x grows to the right, y grows up and depth grows forward.
    pub fn to_view(&self, relative: Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            self.right.dot(relative),
            self.up.dot(relative),
            self.forward.dot(relative),
        )
    }
}

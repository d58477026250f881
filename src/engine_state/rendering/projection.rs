//! # Vertex Projection
//!
//! Pinhole projection of block corners with a per-frame memo. Neighboring faces share
//! corners, so every integer world corner is transformed at most once per frame. The memo
//! is cleared by [`Projector::begin_frame`] and never outlives the frame it was built for.

use std::collections::HashMap;

use cgmath::{EuclideanSpace, Point2, Point3, Vector3};

use crate::engine_state::camera_state::camera::CameraBasis;

/// Corners closer to the image plane than this depth are rejected.
pub const NEAR_DEPTH: f32 = 1e-3;

/// Projects world corners to screen space for one frame.
#[derive(Debug, Clone)]
pub struct Projector {
    eye: Vector3<f32>,
    basis: CameraBasis,
    focal_length: f32,
    half_width: f32,
    half_height: f32,
    memo: HashMap<(i32, i32, i32), Option<Point2<f32>>>,
}

impl Projector {
    pub fn new(basis: CameraBasis) -> Self {
        Self {
            eye: Vector3::new(0.0, 0.0, 0.0),
            basis,
            focal_length: 1.0,
            half_width: 0.0,
            half_height: 0.0,
            memo: HashMap::new(),
        }
    }

    /// Sets the camera for a new frame and drops every memoized vertex.
    ///
    /// # Arguments
    /// * `eye` - Eye position in world space
    /// * `basis` - View frame of the camera
    /// * `focal_length` - Image-plane distance in pixels
    /// * `half_width`, `half_height` - Half of the viewport size in pixels
    pub fn begin_frame(
        &mut self,
        eye: Point3<f32>,
        basis: CameraBasis,
        focal_length: f32,
        half_width: f32,
        half_height: f32,
    ) {
        self.eye = eye.to_vec();
        self.basis = basis;
        self.focal_length = focal_length;
        self.half_width = half_width;
        self.half_height = half_height;
        self.memo.clear();
    }

    /// Projects a point given relative to the eye.
    ///
    /// # Returns
    /// Screen coordinates with the origin at the top-left corner, or `None` when the point
    /// lies behind the camera.
    pub fn project_relative(&self, relative: Vector3<f32>) -> Option<Point2<f32>> {
        let view = self.basis.to_view(relative);
        if view.z < NEAR_DEPTH {
            return None;
        }
        let scale = self.focal_length / view.z;
        Some(Point2::new(
            view.x * scale + self.half_width,
            -view.y * scale + self.half_height,
        ))
    }

    /// Projects an integer world corner, reusing the result for the rest of the frame.
    pub fn project(&mut self, corner: Point3<i32>) -> Option<Point2<f32>> {
        let key = (corner.x, corner.y, corner.z);
        if let Some(projected) = self.memo.get(&key) {
            return *projected;
        }

        let relative = Vector3::new(corner.x as f32, corner.y as f32, corner.z as f32) - self.eye;
        let projected = self.project_relative(relative);
        self.memo.insert(key, projected);
        projected
    }

    /// Number of distinct corners projected in front of the camera this frame.
    pub fn vertex_count(&self) -> usize {
        self.memo.values().filter(|projected| projected.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Rad;

    use super::*;
    use crate::engine_state::camera_state::camera::Camera;

    fn projector() -> Projector {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
        let mut projector = Projector::new(camera.basis());
        projector.begin_frame(Point3::new(0.0, 0.0, 0.0), camera.basis(), 500.0, 400.0, 300.0);
        projector
    }

    #[test]
    fn center_of_view_maps_to_center_of_screen() {
        let mut projector = projector();
        assert_eq!(projector.project(Point3::new(0, 0, 10)), Some(Point2::new(400.0, 300.0)));
    }

    #[test]
    fn right_and_up_map_to_screen_axes() {
        let mut projector = projector();
        let point = projector.project(Point3::new(1, 1, 5)).unwrap();
        assert_eq!(point, Point2::new(500.0, 200.0));
    }

    #[test]
    fn points_behind_are_rejected() {
        let mut projector = projector();
        assert_eq!(projector.project(Point3::new(0, 0, -3)), None);
        assert_eq!(projector.project(Point3::new(4, 0, 0)), None);
    }

    #[test]
    fn memo_counts_each_corner_once_and_resets() {
        let mut projector = projector();
        projector.project(Point3::new(0, 0, 10));
        projector.project(Point3::new(0, 0, 10));
        projector.project(Point3::new(1, 0, 10));
        projector.project(Point3::new(0, 0, -10));
        assert_eq!(projector.vertex_count(), 2);

        let basis = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0)).basis();
        projector.begin_frame(Point3::new(0.0, 0.0, 0.0), basis, 500.0, 400.0, 300.0);
        assert_eq!(projector.vertex_count(), 0);
    }
}

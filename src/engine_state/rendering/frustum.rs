//! # View Frustum
//!
//! The four side planes of the pinhole camera's view pyramid. Planes pass through the eye,
//! so they are stored as outward unit normals only; a point relative to the eye is outside
//! a plane when its dot product with the normal is positive.

use cgmath::{InnerSpace, Vector3};

use crate::engine_state::camera_state::camera::CameraBasis;

/// Side planes of the view pyramid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    normals: [Vector3<f32>; 4],
}

impl Frustum {
    /// Builds the frustum for a camera basis and viewport.
    ///
    /// # Arguments
    /// * `basis` - View frame of the camera
    /// * `half_width`, `half_height` - Half of the viewport size in pixels
    /// * `focal_length` - Distance from the eye to the image plane in pixels
    pub fn new(basis: &CameraBasis, half_width: f32, half_height: f32, focal_length: f32) -> Self {
        let center = basis.forward * focal_length;
        let right = basis.right * half_width;
        let up = basis.up * half_height;

        // Image-plane corners, clockwise as seen from the eye.
        let corners = [
            center - right + up,
            center + right + up,
            center + right - up,
            center - right - up,
        ];

        let normal = |a: Vector3<f32>, b: Vector3<f32>| a.cross(b).normalize();
        Self {
            normals: [
                normal(corners[0], corners[1]),
                normal(corners[1], corners[2]),
                normal(corners[2], corners[3]),
                normal(corners[3], corners[0]),
            ],
        }
    }

    pub fn normals(&self) -> &[Vector3<f32>; 4] {
        &self.normals
    }

    /// Tests a sphere against the side planes.
    ///
    /// # Arguments
    /// * `center` - Sphere center relative to the eye
    /// * `radius` - Sphere radius
    ///
    /// # Returns
    /// `false` if the sphere lies entirely outside one of the planes.
    pub fn intersects_sphere(&self, center: Vector3<f32>, radius: f32) -> bool {
        self.normals.iter().all(|normal| normal.dot(center) <= radius)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Rad};

    use super::*;
    use crate::engine_state::camera_state::camera::Camera;

    fn frustum(yaw: f32, pitch: f32) -> Frustum {
        let basis = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(yaw), Rad(pitch)).basis();
        Frustum::new(&basis, 400.0, 300.0, 500.0)
    }

    #[test]
    fn normals_point_outwards() {
        let frustum = frustum(0.0, 0.0);
        let ahead = Vector3::new(0.0, 0.0, 10.0);
        for normal in frustum.normals() {
            assert!(normal.dot(ahead) < 0.0);
            assert!((normal.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn points_ahead_are_inside() {
        let frustum = frustum(0.0, 0.0);
        assert!(frustum.intersects_sphere(Vector3::new(0.0, 0.0, 10.0), 0.0));
        assert!(frustum.intersects_sphere(Vector3::new(7.0, 5.0, 10.0), 0.0));
    }

    #[test]
    fn points_off_to_the_side_are_outside() {
        let frustum = frustum(0.0, 0.0);
        assert!(!frustum.intersects_sphere(Vector3::new(20.0, 0.0, 10.0), 0.866));
        assert!(!frustum.intersects_sphere(Vector3::new(0.0, -20.0, 10.0), 0.866));
    }

    #[test]
    fn radius_keeps_spheres_straddling_a_plane() {
        let frustum = frustum(0.0, 0.0);
        // Just outside the right plane (x = 0.8 z).
        let center = Vector3::new(8.3, 0.0, 10.0);
        assert!(!frustum.intersects_sphere(center, 0.0));
        assert!(frustum.intersects_sphere(center, 0.866));
    }

    #[test]
    fn frustum_follows_the_camera() {
        let turned = frustum(std::f32::consts::FRAC_PI_2, 0.0);
        assert!(turned.intersects_sphere(Vector3::new(10.0, 0.0, 0.0), 0.0));
        assert!(!turned.intersects_sphere(Vector3::new(0.0, 0.0, 10.0), 0.866));
    }
}

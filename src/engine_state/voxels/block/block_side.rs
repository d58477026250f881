//! # Block Side Module
//!
//! This module defines the six faces of a voxel block together with the lookup tables
//! the world and the rasterizer share: face mask bits, neighbor offsets and the corner
//! order used to turn a face into a screen-space quad.
//!
//! ## Corner Numbering
//!
//! ```text
//!    3-----7
//!   /|    /|
//!  2-+---6 |      y
//!  | 1---|-5      |  z
//!  |/    |/       | /
//!  0-----4        +---- x
//! ```
//!
//! Corner `i` sits at `(i >> 2 & 1, i >> 1 & 1, i & 1)` relative to the block origin.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant doubles as the bit index inside a [`FaceMask`](super::FaceMask),
/// so `FRONT` is bit 0 (value 1) and `BOTTOM` is bit 5 (value 32).
///
/// The order is: [FRONT, BACK, RIGHT, LEFT, TOP, BOTTOM]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The right face (facing positive X)
    RIGHT = 2,

    /// The left face (facing negative X)
    LEFT = 3,

    /// The top face (facing positive Y)
    TOP = 4,

    /// The bottom face (facing negative Y)
    BOTTOM = 5,
}

/// Corner offsets of a unit block, indexed by corner number.
pub const CORNER_OFFSETS: [[i32; 3]; 8] = [
    [0, 0, 0],
    [0, 0, 1],
    [0, 1, 0],
    [0, 1, 1],
    [1, 0, 0],
    [1, 0, 1],
    [1, 1, 0],
    [1, 1, 1],
];

/// Opposite face pairs in the order the occlusion pass walks them (z, x, y).
pub const FACE_PAIRS: [(BlockSide, BlockSide); 3] = [
    (BlockSide::FRONT, BlockSide::BACK),
    (BlockSide::RIGHT, BlockSide::LEFT),
    (BlockSide::TOP, BlockSide::BOTTOM),
];

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, RIGHT, LEFT, TOP, BOTTOM]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
        ]
    }

    /// The bit this face occupies in a face mask.
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// The face on the other side of the same axis.
    pub const fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
        }
    }

    /// Offset from a block to the neighbor that shares this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
        }
    }

    /// Corner numbers of this face, wound so that corner 0 maps to the texture's
    /// top-left and corner 2 to its bottom-right.
    ///
    /// # Returns
    /// Four indices into [`CORNER_OFFSETS`].
    pub const fn corners(self) -> [usize; 4] {
        match self {
            BlockSide::FRONT => [7, 5, 1, 3],
            BlockSide::BACK => [2, 0, 4, 6],
            BlockSide::RIGHT => [6, 4, 5, 7],
            BlockSide::LEFT => [3, 1, 0, 2],
            BlockSide::TOP => [2, 6, 7, 3],
            BlockSide::BOTTOM => [0, 1, 5, 4],
        }
    }

    /// Whether this is one of the four vertical faces.
    pub const fn is_side(self) -> bool {
        (self as u8) < (BlockSide::TOP as u8)
    }

    /// Determines whether this face of the block at `origin` points towards the camera.
    ///
    /// A face is camera-facing when the camera lies strictly beyond the face plane on
    /// the face's outward side; a camera inside the slab of the block sees neither face
    /// of that axis.
    ///
    /// # Arguments
    /// * `origin` - Minimum corner of the block in world space
    /// * `camera` - Camera (eye) position in world space
    pub fn faces_camera(self, origin: Vector3<i32>, camera: Vector3<f32>) -> bool {
        let x = origin.x as f32;
        let y = origin.y as f32;
        let z = origin.z as f32;
        match self {
            BlockSide::FRONT => z + 1.0 < camera.z,
            BlockSide::BACK => z > camera.z,
            BlockSide::RIGHT => x + 1.0 < camera.x,
            BlockSide::LEFT => x > camera.x,
            BlockSide::TOP => y + 1.0 < camera.y,
            BlockSide::BOTTOM => y > camera.y,
        }
    }
}

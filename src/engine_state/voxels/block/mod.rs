//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and the per-block
//! visibility mask maintained by the occlusion pass.

use block_side::BlockSide;
use block_type::BlockType;
use cgmath::{Point3, Vector3};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block type ids in memory and in saves.
pub type BlockTypeSize = u8;

/// Six-bit set of the faces of a block that are currently visible.
///
/// Bit `n` corresponds to the [`BlockSide`] with discriminant `n`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceMask(u8);

impl FaceMask {
    /// Mask with every face hidden.
    pub const NONE: FaceMask = FaceMask(0);
    /// Mask with every face visible.
    pub const ALL: FaceMask = FaceMask(0x3f);

    /// Builds a mask from raw bits, ignoring anything above bit 5.
    pub const fn from_bits(bits: u8) -> Self {
        FaceMask(bits & 0x3f)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, side: BlockSide) -> bool {
        self.0 & side.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Shows or hides one face.
    pub fn set(&mut self, side: BlockSide, visible: bool) {
        if visible {
            self.0 |= side.bit();
        } else {
            self.0 &= !side.bit();
        }
    }

    /// Iterates over the visible faces in [`BlockSide::all`] order.
    pub fn iter(self) -> impl Iterator<Item = BlockSide> {
        BlockSide::all().into_iter().filter(move |side| self.contains(*side))
    }
}

/// Represents a single voxel block in the world.
///
/// A block is owned by the chunk containing its column. Besides its type it carries
/// the face mask kept up to date by the world's occlusion pass and a tombstone flag
/// that is only set while the block is being removed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Block {
    /// World coordinates of the block's minimum corner.
    pub position: Point3<i32>,
    /// The type of this block.
    pub block_type: BlockType,
    /// Faces not covered by a neighbor.
    pub sides: FaceMask,
    /// Set while the block is being evicted so its neighbors re-expose their faces.
    pub removed: bool,
}

impl Block {
    /// Creates a new block of the specified type with every face hidden.
    ///
    /// # Arguments
    /// * `position` - World coordinates of the block
    /// * `block_type` - The type of block to create
    ///
    /// # Returns
    /// A new `Block`; its mask is filled in once the world runs occlusion for it.
    pub fn new(position: Point3<i32>, block_type: BlockType) -> Self {
        Block {
            position,
            block_type,
            sides: FaceMask::NONE,
            removed: false,
        }
    }

    /// Position of the neighbor that shares the given face.
    pub fn neighbor_position(&self, side: BlockSide) -> Point3<i32> {
        self.position + side.normal()
    }

    /// The block's minimum corner as a vector.
    pub fn origin(&self) -> Vector3<i32> {
        Vector3::new(self.position.x, self.position.y, self.position.z)
    }

    /// Whether the block has at least one visible face and belongs in the render cache.
    pub fn is_render_eligible(&self) -> bool {
        !self.sides.is_empty()
    }
}

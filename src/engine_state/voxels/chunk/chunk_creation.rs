//! # Chunk Creation Module
//!
//! This module turns column heights into blocks. Every column is stacked bottom-up:
//!
//! | layer | type |
//! |-------|------|
//! | `y = 0` | bedrock |
//! | `2y < height` | stone |
//! | surface inside the water table (`y = height - 1` with `y` in 4..=6) | sand, water above it up to 6 |
//! | below the surface | dirt |
//! | surface | grass |
//!
//! The layering is deterministic so chunks explored later line up with chunks restored
//! from a save made with the same seed.

use cgmath::{Point2, Point3};

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

use super::CHUNK_DIMENSION;

/// Lowest surface height covered by the water table.
pub const WATER_TABLE_BOTTOM: i32 = 4;
/// Water surface height; water fills up to and including this level.
pub const WATER_LEVEL: i32 = 6;

/// A builder that collects the blocks of a chunk column by column.
pub struct ChunkCreationIterator {
    /// The chunk coordinates of the chunk being created
    position: Point2<i32>,
    /// Blocks produced so far, in column order
    blocks: Vec<Block>,
}

impl ChunkCreationIterator {
    /// Creates a new `ChunkCreationIterator` for the chunk at the given position.
    pub fn new(position: Point2<i32>) -> Self {
        ChunkCreationIterator {
            position,
            blocks: Vec::with_capacity((CHUNK_DIMENSION * CHUNK_DIMENSION * 12) as usize),
        }
    }

    /// World coordinates of a column given its chunk-local coordinates.
    pub fn world_column(&self, local_x: i32, local_z: i32) -> (i32, i32) {
        (
            self.position.x * CHUNK_DIMENSION + local_x,
            self.position.y * CHUNK_DIMENSION + local_z,
        )
    }

    /// Stacks one column of terrain.
    ///
    /// # Arguments
    /// * `x` - World x of the column
    /// * `z` - World z of the column
    /// * `height` - Absolute terrain height; the column holds `y` in `0..height`
    pub fn push_column(&mut self, x: i32, z: i32, height: i32) {
        for (y, block_type) in column_strata(height) {
            self.blocks.push(Block::new(Point3::new(x, y, z), block_type));
        }
    }

    /// Finalizes chunk creation and returns the collected blocks.
    pub fn return_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

/// Lists the blocks of one column of the given height, including any water above it.
///
/// # Returns
/// `(y, type)` pairs, each height at most once.
pub fn column_strata(height: i32) -> Vec<(i32, BlockType)> {
    let mut strata = Vec::with_capacity(height.max(0) as usize + 2);

    for y in 0..height {
        let block_type = if y == 0 {
            BlockType::BEDROCK
        } else if y * 2 < height {
            BlockType::STONE
        } else if y == height - 1 && (WATER_TABLE_BOTTOM..=WATER_LEVEL).contains(&y) {
            for water_y in (y + 1)..=WATER_LEVEL {
                strata.push((water_y, BlockType::WATER));
            }
            BlockType::SAND
        } else if y < height - 1 {
            BlockType::DIRT
        } else {
            BlockType::GRASS
        };
        strata.push((y, block_type));
    }

    strata
}

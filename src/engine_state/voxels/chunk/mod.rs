//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16×16 column of the world that exclusively
//! owns every block whose `(x, z)` falls inside it, at any height.
//!
//! ## Storage
//!
//! - `blocks`: sparse map from a packed local key to the block itself
//! - `render_blocks`: the subset of keys whose block has at least one visible face
//!
//! The render set is a cache the world keeps in sync block by block; the rasterizer only
//! ever walks the render set, never the full block map.

use std::collections::{HashMap, HashSet};

use cgmath::{Point2, Point3};
use chunk_creation::ChunkCreationIterator;

use super::block::{block_type::BlockType, Block};
use super::height_field::HeightField;

pub mod chunk_creation;

/// The edge length of a chunk in blocks, along x and z.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of columns in a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;

/// Packed key of a block inside its chunk: `y` in the high bits, then local z and x.
pub type BlockKey = i64;

/// Packs a world position into the key used by the chunk owning it.
pub fn block_key(position: Point3<i32>) -> BlockKey {
    let local_x = position.x.rem_euclid(CHUNK_DIMENSION) as i64;
    let local_z = position.z.rem_euclid(CHUNK_DIMENSION) as i64;
    ((position.y as i64) << 8) | (local_z << 4) | local_x
}

/// Chunk coordinates of the chunk owning the world column `(x, z)`.
pub fn chunk_position_of(x: i32, z: i32) -> Point2<i32> {
    Point2::new(x.div_euclid(CHUNK_DIMENSION), z.div_euclid(CHUNK_DIMENSION))
}

/// Represents a 16×16 column of voxel blocks in the world.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point2<i32>,
    blocks: HashMap<BlockKey, Block>,
    render_blocks: HashSet<BlockKey>,
}

impl Chunk {
    /// Creates a new chunk with no blocks in it.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    pub fn empty(position: Point2<i32>) -> Self {
        Self {
            position,
            blocks: HashMap::new(),
            render_blocks: HashSet::new(),
        }
    }

    /// Generates the terrain of a chunk from the height field.
    ///
    /// Face masks are left empty; the world runs occlusion for the blocks once the chunk
    /// has been inserted so neighbors in adjacent chunks are taken into account.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `height_field` - Source of the column heights
    ///
    /// # Returns
    /// A new `Chunk` containing the generated blocks.
    pub fn generate(position: Point2<i32>, height_field: &HeightField) -> Self {
        let mut cci = ChunkCreationIterator::new(position);

        for local_x in 0..CHUNK_DIMENSION {
            for local_z in 0..CHUNK_DIMENSION {
                let (x, z) = cci.world_column(local_x, local_z);
                cci.push_column(x, z, height_field.absolute_height(x, z));
            }
        }

        let mut chunk = Chunk::empty(position);
        for block in cci.return_blocks() {
            chunk.insert(block);
        }
        chunk
    }

    /// Whether the given world column belongs to this chunk.
    pub fn contains_column(&self, x: i32, z: i32) -> bool {
        chunk_position_of(x, z) == self.position
    }

    pub fn get_block(&self, position: Point3<i32>) -> Option<&Block> {
        self.blocks.get(&block_key(position))
    }

    pub fn get_block_mut(&mut self, position: Point3<i32>) -> Option<&mut Block> {
        self.blocks.get_mut(&block_key(position))
    }

    /// Inserts a block unless its cell is already occupied.
    ///
    /// # Returns
    /// `true` if the block was inserted.
    pub fn insert(&mut self, block: Block) -> bool {
        debug_assert!(self.contains_column(block.position.x, block.position.z));
        let key = block_key(block.position);
        if self.blocks.contains_key(&key) {
            return false;
        }
        self.blocks.insert(key, block);
        true
    }

    /// Evicts a block from both the block map and the render set.
    pub fn remove(&mut self, position: Point3<i32>) -> Option<Block> {
        let key = block_key(position);
        self.render_blocks.remove(&key);
        self.blocks.remove(&key)
    }

    /// Brings the render-set entry of one block in line with its face mask.
    ///
    /// A block with any visible face is added, a fully hidden block is removed. Unknown
    /// positions are dropped from the set.
    pub fn refresh_render_entry(&mut self, position: Point3<i32>) {
        let key = block_key(position);
        match self.blocks.get(&key) {
            Some(block) if block.is_render_eligible() => {
                self.render_blocks.insert(key);
            }
            _ => {
                self.render_blocks.remove(&key);
            }
        }
    }

    /// Whether the block at `position` is currently in the render set.
    pub fn is_render_cached(&self, position: Point3<i32>) -> bool {
        self.render_blocks.contains(&block_key(position))
    }

    /// Iterates over every block in the chunk.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Iterates over the render-eligible blocks only.
    pub fn render_blocks(&self) -> impl Iterator<Item = &Block> {
        self.render_blocks
            .iter()
            .filter_map(move |key| self.blocks.get(key))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn render_block_count(&self) -> usize {
        self.render_blocks.len()
    }

    /// Positions of every block, used to run occlusion after bulk insertion.
    pub fn block_positions(&self) -> Vec<Point3<i32>> {
        self.blocks.values().map(|block| block.position).collect()
    }

    /// Counts blocks of a given type, mostly useful for diagnostics and tests.
    pub fn count_of(&self, block_type: BlockType) -> usize {
        self.blocks
            .values()
            .filter(|block| block.block_type == block_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_distinguish_every_local_cell() {
        let mut keys = HashSet::new();
        for x in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                for y in [-3, 0, 1, 200] {
                    assert!(keys.insert(block_key(Point3::new(x, y, z))));
                }
            }
        }
        assert_eq!(block_key(Point3::new(-1, 4, -1)), block_key(Point3::new(15, 4, 15)));
    }

    #[test]
    fn chunk_positions_floor_towards_negative_infinity() {
        assert_eq!(chunk_position_of(0, 15), Point2::new(0, 0));
        assert_eq!(chunk_position_of(-1, 16), Point2::new(-1, 1));
        assert_eq!(chunk_position_of(-16, -17), Point2::new(-1, -2));
    }

    #[test]
    fn insert_rejects_occupied_cells() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        let position = Point3::new(3, 7, 9);
        assert!(chunk.insert(Block::new(position, BlockType::STONE)));
        assert!(!chunk.insert(Block::new(position, BlockType::DIRT)));
        assert_eq!(chunk.get_block(position).map(|b| b.block_type), Some(BlockType::STONE));
    }

    #[test]
    fn render_entries_follow_the_face_mask() {
        let mut chunk = Chunk::empty(Point2::new(0, 0));
        let position = Point3::new(1, 1, 1);
        chunk.insert(Block::new(position, BlockType::STONE));
        chunk.refresh_render_entry(position);
        assert!(!chunk.is_render_cached(position));

        if let Some(block) = chunk.get_block_mut(position) {
            block.sides.set(crate::engine_state::voxels::block::block_side::BlockSide::TOP, true);
        }
        chunk.refresh_render_entry(position);
        assert!(chunk.is_render_cached(position));
        assert_eq!(chunk.render_blocks().count(), 1);

        chunk.remove(position);
        assert!(!chunk.is_render_cached(position));
        assert_eq!(chunk.block_count(), 0);
    }

    #[test]
    fn generated_chunk_has_a_bedrock_floor() {
        let field = HeightField::new(3);
        let chunk = Chunk::generate(Point2::new(-2, 5), &field);
        assert_eq!(chunk.count_of(BlockType::BEDROCK), CHUNK_PLANE_SIZE as usize);
        assert!(chunk.blocks().all(|b| chunk.contains_column(b.position.x, b.position.z)));
    }
}

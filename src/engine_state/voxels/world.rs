//! # World Module
//!
//! This module provides the `World` struct which owns every chunk of the voxel world, the
//! height field chunks are generated from, and the spawn point.
//!
//! ## Architecture
//!
//! The world is a sparse map from a packed chunk key to a [`Chunk`]; each chunk owns the
//! blocks of its 16×16 column. Chunks are generated lazily around the player and created
//! empty when a block is placed in a column that was never generated.
//!
//! ## Occlusion
//!
//! Every block carries a face mask that always reflects its six axis neighbors. Each
//! mutation (generation, placement, removal) recomputes the masks of the touched block and
//! its neighbors and refreshes their render-cache entries in the same call. There is no
//! deferred or global recompute.
//!
//! ## Performance Considerations
//!
//! - Chunk and block lookups are O(1) hash map accesses on packed integer keys
//! - Generation runs occlusion once per generated block, touching at most six neighbors

use std::collections::HashMap;

use cgmath::{Point2, Point3};

use super::{
    block::{
        block_side::{BlockSide, FACE_PAIRS},
        block_type::BlockType,
        Block,
    },
    chunk::{chunk_position_of, Chunk},
    height_field::HeightField,
};

/// Packed chunk coordinates: x in the high 32 bits, z in the low 32 bits.
pub type ChunkKey = i64;

/// Packs chunk coordinates into a [`ChunkKey`].
pub fn chunk_key(position: Point2<i32>) -> ChunkKey {
    ((position.x as i64) << 32) | (position.y as u32 as i64)
}

/// Height above the terrain at which the spawn point sits.
const SPAWN_CLEARANCE: i32 = 3;

/// Result of looking a block position up in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockLookup<'a> {
    /// The chunk owning the position has not been created.
    NoChunk,
    /// The chunk exists but the cell is empty.
    Empty,
    /// The cell holds a block.
    Block(&'a Block),
}

impl<'a> BlockLookup<'a> {
    /// The block, if the cell holds one.
    pub fn block(self) -> Option<&'a Block> {
        match self {
            BlockLookup::Block(block) => Some(block),
            _ => None,
        }
    }
}

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use voxel_canvas::engine_state::voxels::{world::World, block::block_type::BlockType};
/// use cgmath::Point3;
///
/// let mut world = World::new(7);
/// world.ensure_chunks_around(0, 0);
/// let above = Point3::new(0, 40, 0);
/// assert!(world.add_block(above, BlockType::GLASS));
/// assert!(!world.add_block(above, BlockType::STONE));
/// ```
pub struct World {
    chunks: HashMap<ChunkKey, Chunk>,
    height_field: HeightField,
    spawn: Point3<i32>,
}

impl World {
    /// Creates a new world with no chunks generated yet.
    ///
    /// # Arguments
    /// * `seed` - Seed of the terrain height field
    pub fn new(seed: i32) -> Self {
        let height_field = HeightField::new(seed);
        let spawn = Self::spawn_for(&height_field);
        World {
            chunks: HashMap::new(),
            height_field,
            spawn,
        }
    }

    /// Drops every chunk and starts over with a fresh height field.
    pub fn reset(&mut self, seed: i32) {
        log::info!("Resetting world with seed {}", seed);
        *self = World::new(seed);
    }

    fn spawn_for(height_field: &HeightField) -> Point3<i32> {
        Point3::new(0, height_field.absolute_height(0, 0) + SPAWN_CLEARANCE, 0)
    }

    pub fn seed(&self) -> i32 {
        self.height_field.seed()
    }

    pub fn spawn(&self) -> Point3<i32> {
        self.spawn
    }

    /// Overrides the spawn point, used when restoring a save.
    pub fn set_spawn(&mut self, spawn: Point3<i32>) {
        self.spawn = spawn;
    }

    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates over every loaded chunk.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Retrieves the chunk at the given chunk coordinates, if it exists.
    pub fn get_chunk_at(&self, position: Point2<i32>) -> Option<&Chunk> {
        self.chunks.get(&chunk_key(position))
    }

    /// Generates the 3×3 block of chunks centered on the given chunk coordinates.
    ///
    /// Chunks that already exist are left untouched.
    ///
    /// # Returns
    /// The number of chunks that were generated.
    pub fn ensure_chunks_around(&mut self, chunk_x: i32, chunk_z: i32) -> usize {
        let mut generated = 0;
        for cx in chunk_x - 1..=chunk_x + 1 {
            for cz in chunk_z - 1..=chunk_z + 1 {
                if self.generate_chunk(cx, cz) {
                    generated += 1;
                }
            }
        }
        generated
    }

    /// Generates the terrain of one chunk from the height field.
    ///
    /// # Returns
    /// `false` if the chunk already existed, in which case nothing changes.
    pub fn generate_chunk(&mut self, cx: i32, cz: i32) -> bool {
        let position = Point2::new(cx, cz);
        let key = chunk_key(position);
        if self.chunks.contains_key(&key) {
            return false;
        }

        let chunk = Chunk::generate(position, &self.height_field);
        let positions = chunk.block_positions();
        self.chunks.insert(key, chunk);

        for block_position in positions {
            self.recompute_occlusion(block_position);
        }

        log::debug!(
            "Generated chunk ({}, {}) with {} blocks",
            cx,
            cz,
            self.chunks.get(&key).map_or(0, Chunk::block_count)
        );
        true
    }

    /// Looks up the cell at `position`, telling a missing chunk apart from an empty cell.
    pub fn lookup_block(&self, position: Point3<i32>) -> BlockLookup<'_> {
        match self.chunks.get(&chunk_key(chunk_position_of(position.x, position.z))) {
            None => BlockLookup::NoChunk,
            Some(chunk) => chunk
                .get_block(position)
                .map_or(BlockLookup::Empty, BlockLookup::Block),
        }
    }

    /// Returns the block at `position`, if any.
    pub fn get_block(&self, position: Point3<i32>) -> Option<&Block> {
        self.lookup_block(position).block()
    }

    fn get_block_mut(&mut self, position: Point3<i32>) -> Option<&mut Block> {
        self.chunks
            .get_mut(&chunk_key(chunk_position_of(position.x, position.z)))
            .and_then(|chunk| chunk.get_block_mut(position))
    }

    /// Places a block, creating the owning chunk if needed.
    ///
    /// # Returns
    /// `false` without changing anything if the cell is already occupied.
    pub fn add_block(&mut self, position: Point3<i32>, block_type: BlockType) -> bool {
        if self.get_block(position).is_some() {
            return false;
        }

        let chunk_position = chunk_position_of(position.x, position.z);
        let chunk = self
            .chunks
            .entry(chunk_key(chunk_position))
            .or_insert_with(|| Chunk::empty(chunk_position));
        chunk.insert(Block::new(position, block_type));

        self.recompute_occlusion(position);
        log::trace!("Added {} at {:?}", block_type.name(), position);
        true
    }

    /// Removes the block at `position`.
    ///
    /// The block is tombstoned first so the occlusion pass re-exposes the faces of its
    /// neighbors, then evicted from both the block map and the render cache.
    ///
    /// # Returns
    /// `false` if there was no block to remove.
    pub fn remove_block(&mut self, position: Point3<i32>) -> bool {
        match self.get_block_mut(position) {
            Some(block) => block.removed = true,
            None => return false,
        }

        self.recompute_occlusion(position);

        if let Some(chunk) = self
            .chunks
            .get_mut(&chunk_key(chunk_position_of(position.x, position.z)))
        {
            chunk.remove(position);
        }
        log::trace!("Removed block at {:?}", position);
        true
    }

    /// Recomputes the face masks of the block at `position` and of its six neighbors.
    ///
    /// Each touched block has its render-cache entry refreshed before returning.
    pub fn recompute_occlusion(&mut self, position: Point3<i32>) {
        let Some(mut block) = self.get_block(position).copied() else {
            return;
        };

        for (positive, negative) in FACE_PAIRS {
            for side in [positive, negative] {
                let neighbor_position = block.neighbor_position(side);
                let Some(neighbor) = self.get_block_mut(neighbor_position) else {
                    block.sides.set(side, true);
                    continue;
                };

                let (own_visible, neighbor_visible) = pair_visibility(&block, neighbor, side);
                block.sides.set(side, own_visible);
                neighbor.sides.set(side.opposite(), neighbor_visible);
                self.update_render_cache(neighbor_position);
            }
        }

        if let Some(stored) = self.get_block_mut(position) {
            stored.sides = block.sides;
        }
        self.update_render_cache(position);
    }

    /// Adds the block at `position` to its chunk's render cache if any face is visible,
    /// removes it otherwise.
    pub fn update_render_cache(&mut self, position: Point3<i32>) {
        if let Some(chunk) = self
            .chunks
            .get_mut(&chunk_key(chunk_position_of(position.x, position.z)))
        {
            chunk.refresh_render_entry(position);
        }
    }

    /// Checks the render-cache invariant for every loaded block.
    ///
    /// # Returns
    /// The positions of blocks whose cache membership disagrees with their face mask.
    pub fn render_cache_mismatches(&self) -> Vec<Point3<i32>> {
        self.chunks
            .values()
            .flat_map(|chunk| {
                chunk
                    .blocks()
                    .filter(move |block| {
                        block.is_render_eligible() != chunk.is_render_cached(block.position)
                    })
                    .map(|block| block.position)
            })
            .collect()
    }
}

/// Decides the visibility of the two faces shared by a block and one of its neighbors.
///
/// Rules, first match wins:
/// 1. either block tombstoned: both faces visible
/// 2. the lower block of a vertical pair is half height: both faces visible
/// 3. exactly one is transparent: the transparent face is hidden, the opaque one shown
/// 4. both transparent and of the same type: both hidden
/// 5. both transparent and of different types: both visible
/// 6. a half block beside a full one on a vertical face: the half face is hidden
/// 7. both opaque: both hidden
///
/// # Arguments
/// * `block` - The block whose face is `side`
/// * `neighbor` - The block across `side`
/// * `side` - Face of `block` that touches `neighbor`
///
/// # Returns
/// `(block face visible, neighbor face visible)`
pub fn pair_visibility(block: &Block, neighbor: &Block, side: BlockSide) -> (bool, bool) {
    let own = block.block_type;
    let other = neighbor.block_type;

    if block.removed || neighbor.removed {
        return (true, true);
    }

    let lower_is_half = match side {
        BlockSide::TOP => own.is_half(),
        BlockSide::BOTTOM => other.is_half(),
        _ => false,
    };
    if lower_is_half {
        return (true, true);
    }

    match (own.is_transparent(), other.is_transparent()) {
        (true, false) => return (false, true),
        (false, true) => return (true, false),
        (true, true) => {
            let same = own == other;
            return (!same, !same);
        }
        (false, false) => {}
    }

    if side.is_side() {
        match (own.is_half(), other.is_half()) {
            (true, false) => return (false, true),
            (false, true) => return (true, false),
            _ => {}
        }
    }

    (false, false)
}

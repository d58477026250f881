//! # Voxel World Model
//!
//! This module contains the voxel world: how blocks are typed, stored, generated and kept
//! visible or hidden.
//!
//! ## Architecture
//!
//! * **Block**: the closed catalog of block types, the six faces and the per-block face mask
//! * **Height field**: seeded terrain heights, memoized per 16×16 tile
//! * **Chunk**: a 16×16 column that owns its blocks and a cache of the render-eligible ones
//! * **World**: the sparse chunk map, on-demand generation, block CRUD and occlusion
//!
//! ## Data Flow
//!
//! 1. The player enters a new chunk and asks the world for the surrounding 3×3 chunks
//! 2. Missing chunks are generated from the height field
//! 3. Every inserted or removed block triggers an occlusion pass over it and its neighbors
//! 4. The rasterizer reads the render caches of the loaded chunks each frame

pub mod block;
pub mod chunk;
pub mod height_field;
pub mod world;

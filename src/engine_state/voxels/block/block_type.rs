//! # Block Type Module
//!
//! This module defines the closed catalog of block types in the voxel world.
//! It provides lookup by numeric id (the id stored in save files), lookup by name,
//! and the per-type properties the world and the rasterizer query: color, solidity,
//! transparency and the atlas tile used for each face.
//!
//! The catalog is immutable. Properties are answered by `match` tables and the
//! name index is a compile-time `phf` map, so nothing is initialized at runtime.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::{block_side::BlockSide, BlockTypeSize};

/// Enumerates all block types in the voxel world.
///
/// The discriminant is the stable id written to save files, so variants must never
/// be renumbered. The `FromPrimitive` derive converts ids back into types.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Plain stone, the lower half of every generated column.
    STONE = 1,
    /// Grass with distinct top, side and bottom textures.
    GRASS = 2,
    /// Dirt, found between the stone layer and the surface.
    DIRT = 3,
    COBBLESTONE = 4,
    PLANKS = 5,
    /// Wood log, bark on the sides and rings on top and bottom.
    WOOD = 6,
    BRICKS = 7,
    GRAVEL = 8,
    /// Sand, used as the surface inside the water table.
    SAND = 9,
    SANDSTONE = 10,
    OBSIDIAN = 11,
    GLASS = 12,
    LEAVES = 13,
    /// Water, transparent and not solid.
    WATER = 14,
    /// Lava, opaque but not solid.
    LAVA = 15,
    ICE = 16,
    SNOW = 17,
    STONEBLOCK = 18,
    COBWEB = 19,
    /// Bedrock, always the bottom layer of a column.
    BEDROCK = 20,
    GLOWSTONE = 21,
    DIAMONDORE = 22,
    NETHERRACK = 23,
    TNT = 24,
    CRAFT = 25,
}

/// Number of entries in the catalog.
pub const BLOCK_TYPE_COUNT: usize = 25;

/// Every block type, ordered by id.
pub const ALL_BLOCK_TYPES: [BlockType; BLOCK_TYPE_COUNT] = [
    BlockType::STONE,
    BlockType::GRASS,
    BlockType::DIRT,
    BlockType::COBBLESTONE,
    BlockType::PLANKS,
    BlockType::WOOD,
    BlockType::BRICKS,
    BlockType::GRAVEL,
    BlockType::SAND,
    BlockType::SANDSTONE,
    BlockType::OBSIDIAN,
    BlockType::GLASS,
    BlockType::LEAVES,
    BlockType::WATER,
    BlockType::LAVA,
    BlockType::ICE,
    BlockType::SNOW,
    BlockType::STONEBLOCK,
    BlockType::COBWEB,
    BlockType::BEDROCK,
    BlockType::GLOWSTONE,
    BlockType::DIAMONDORE,
    BlockType::NETHERRACK,
    BlockType::TNT,
    BlockType::CRAFT,
];

/// Name index of the catalog.
static BLOCK_TYPE_BY_NAME: phf::Map<&'static str, BlockType> = phf::phf_map! {
    "stone" => BlockType::STONE,
    "grass" => BlockType::GRASS,
    "dirt" => BlockType::DIRT,
    "cobblestone" => BlockType::COBBLESTONE,
    "planks" => BlockType::PLANKS,
    "wood" => BlockType::WOOD,
    "bricks" => BlockType::BRICKS,
    "gravel" => BlockType::GRAVEL,
    "sand" => BlockType::SAND,
    "sandstone" => BlockType::SANDSTONE,
    "obsidian" => BlockType::OBSIDIAN,
    "glass" => BlockType::GLASS,
    "leaves" => BlockType::LEAVES,
    "water" => BlockType::WATER,
    "lava" => BlockType::LAVA,
    "ice" => BlockType::ICE,
    "snow" => BlockType::SNOW,
    "stoneblock" => BlockType::STONEBLOCK,
    "cobweb" => BlockType::COBWEB,
    "bedrock" => BlockType::BEDROCK,
    "glowstone" => BlockType::GLOWSTONE,
    "diamondore" => BlockType::DIAMONDORE,
    "netherrack" => BlockType::NETHERRACK,
    "tnt" => BlockType::TNT,
    "craft" => BlockType::CRAFT,
};

impl BlockType {
    /// Converts a stored id into a `BlockType`.
    ///
    /// # Arguments
    /// * `id` - The id as found in a save file
    ///
    /// # Returns
    /// The matching type, or `None` if the id is not part of the catalog.
    pub fn from_id(id: u32) -> Option<Self> {
        FromPrimitive::from_u32(id)
    }

    /// Looks a type up by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_TYPE_BY_NAME.get(name).copied()
    }

    /// The stable numeric id of this type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// The lowercase name of this type, the inverse of [`BlockType::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            BlockType::STONE => "stone",
            BlockType::GRASS => "grass",
            BlockType::DIRT => "dirt",
            BlockType::COBBLESTONE => "cobblestone",
            BlockType::PLANKS => "planks",
            BlockType::WOOD => "wood",
            BlockType::BRICKS => "bricks",
            BlockType::GRAVEL => "gravel",
            BlockType::SAND => "sand",
            BlockType::SANDSTONE => "sandstone",
            BlockType::OBSIDIAN => "obsidian",
            BlockType::GLASS => "glass",
            BlockType::LEAVES => "leaves",
            BlockType::WATER => "water",
            BlockType::LAVA => "lava",
            BlockType::ICE => "ice",
            BlockType::SNOW => "snow",
            BlockType::STONEBLOCK => "stoneblock",
            BlockType::COBWEB => "cobweb",
            BlockType::BEDROCK => "bedrock",
            BlockType::GLOWSTONE => "glowstone",
            BlockType::DIAMONDORE => "diamondore",
            BlockType::NETHERRACK => "netherrack",
            BlockType::TNT => "tnt",
            BlockType::CRAFT => "craft",
        }
    }

    /// Flat display color as `0x00RRGGBB`, used by the untextured render mode.
    pub fn color(self) -> u32 {
        match self {
            BlockType::STONE => 0x828282,
            BlockType::GRASS => 0x006400,
            BlockType::DIRT => 0x703A00,
            BlockType::COBBLESTONE => 0x787878,
            BlockType::PLANKS => 0xE08907,
            BlockType::WOOD => 0x642E00,
            BlockType::BRICKS => 0xD14B1B,
            BlockType::GRAVEL => 0x5E6469,
            BlockType::SAND => 0xFCE781,
            BlockType::SANDSTONE => 0xFFEE88,
            BlockType::OBSIDIAN => 0x2C202F,
            BlockType::GLASS => 0xA3D8FF,
            BlockType::LEAVES => 0x029700,
            BlockType::WATER => 0x5E65E1,
            BlockType::LAVA => 0xFF1408,
            BlockType::ICE => 0x7CC8FF,
            BlockType::SNOW => 0xF5F9FB,
            BlockType::STONEBLOCK => 0x9E9E9E,
            BlockType::COBWEB => 0xFFFFFF,
            BlockType::TNT => 0x006400,
            BlockType::BEDROCK
            | BlockType::GLOWSTONE
            | BlockType::DIAMONDORE
            | BlockType::NETHERRACK
            | BlockType::CRAFT => 0x222222,
        }
    }

    /// Whether light passes through this type. Transparent faces are drawn at half
    /// opacity and never hide the faces of their neighbors.
    pub fn is_transparent(self) -> bool {
        matches!(
            self,
            BlockType::GLASS
                | BlockType::LEAVES
                | BlockType::WATER
                | BlockType::ICE
                | BlockType::COBWEB
        )
    }

    /// Whether the player collides with this type.
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockType::WATER | BlockType::LAVA)
    }

    /// Whether this type is a half-height block. No catalog entry is; the occlusion
    /// pass still honors the flag.
    pub fn is_half(self) -> bool {
        false
    }

    /// Atlas tile (column, row) shown on the given face of this type.
    ///
    /// # Arguments
    /// * `side` - The face being drawn
    ///
    /// # Returns
    /// The tile coordinates, in tiles, inside the 16-column texture atlas.
    pub fn texture(self, side: BlockSide) -> (u32, u32) {
        let by_face = |top: (u32, u32), sides: (u32, u32), bottom: (u32, u32)| match side {
            BlockSide::TOP => top,
            BlockSide::BOTTOM => bottom,
            _ => sides,
        };

        match self {
            BlockType::STONE => (1, 0),
            BlockType::GRASS => by_face((14, 0), (3, 0), (2, 0)),
            BlockType::DIRT => (2, 0),
            BlockType::COBBLESTONE => (0, 1),
            BlockType::PLANKS => (4, 0),
            BlockType::WOOD => by_face((5, 1), (4, 1), (5, 1)),
            BlockType::BRICKS => (7, 0),
            BlockType::GRAVEL => (3, 1),
            BlockType::SAND => (2, 1),
            BlockType::SANDSTONE => by_face((0, 11), (0, 12), (0, 13)),
            BlockType::OBSIDIAN => (5, 2),
            BlockType::GLASS => (1, 3),
            BlockType::LEAVES => (4, 3),
            BlockType::WATER => (14, 12),
            BlockType::LAVA => (14, 15),
            BlockType::ICE => (3, 4),
            BlockType::SNOW => (2, 4),
            BlockType::STONEBLOCK => by_face((6, 0), (5, 0), (6, 0)),
            BlockType::COBWEB => (11, 0),
            BlockType::BEDROCK => (1, 1),
            BlockType::GLOWSTONE => (9, 6),
            BlockType::DIAMONDORE => (2, 3),
            BlockType::NETHERRACK => (7, 6),
            BlockType::TNT => by_face((9, 0), (8, 0), (10, 0)),
            BlockType::CRAFT => by_face((11, 2), (11, 3), (12, 3)),
        }
    }

    /// Steps through the catalog in id order, wrapping at both ends. Used by the
    /// block-selection input.
    ///
    /// # Arguments
    /// * `steps` - Number of entries to move; negative values move backwards
    pub fn cycle(self, steps: i32) -> Self {
        let count = BLOCK_TYPE_COUNT as i32;
        let index = (self.id() as i32 - 1 + steps).rem_euclid(count);
        ALL_BLOCK_TYPES[index as usize]
    }
}

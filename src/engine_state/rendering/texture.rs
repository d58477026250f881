//! Texture atlas handling for the textured render mode.
//!
//! The atlas is a single image split into a 16-column grid of square tiles. A block face
//! names its tile by (column, row); see `BlockType::texture`.

use std::fmt;

use bytemuck::{Pod, Zeroable};

/// Number of tile columns in the atlas.
pub const ATLAS_COLUMNS: u32 = 16;

/// Texels with alpha below this are treated as holes and not drawn.
pub const ALPHA_CUTOFF: u8 = 128;

/// One RGBA8 texel as laid out in the decoded image.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Texel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Texel {
    /// The texel's color as `0x00RRGGBB`.
    #[inline]
    pub fn rgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Errors raised while loading an atlas.
#[derive(Debug)]
pub enum AtlasError {
    /// The image could not be decoded
    Decode(image::ImageError),
    /// The image file could not be read
    Io(std::io::Error),
    /// The image cannot be split into 16 square columns
    BadDimensions { width: u32, height: u32 },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::Decode(e) => write!(f, "failed to decode texture atlas: {}", e),
            AtlasError::Io(e) => write!(f, "failed to read texture atlas: {}", e),
            AtlasError::BadDimensions { width, height } => write!(
                f,
                "texture atlas of {}x{} cannot be split into {} square columns",
                width, height, ATLAS_COLUMNS
            ),
        }
    }
}

impl std::error::Error for AtlasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AtlasError::Decode(e) => Some(e),
            AtlasError::Io(e) => Some(e),
            AtlasError::BadDimensions { .. } => None,
        }
    }
}

impl From<image::ImageError> for AtlasError {
    fn from(e: image::ImageError) -> Self {
        AtlasError::Decode(e)
    }
}

impl From<std::io::Error> for AtlasError {
    fn from(e: std::io::Error) -> Self {
        AtlasError::Io(e)
    }
}

/// A decoded texture atlas.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    width: u32,
    height: u32,
    texels: Vec<Texel>,
}

impl TextureAtlas {
    /// Builds an atlas from raw RGBA8 bytes.
    ///
    /// # Arguments
    /// * `width`, `height` - Image size in pixels
    /// * `rgba` - `width * height * 4` bytes, row-major
    ///
    /// # Returns
    /// The atlas, or `BadDimensions` if the size does not describe a 16-column grid of at
    /// least one row or does not match the byte count.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, AtlasError> {
        let tile_size = width / ATLAS_COLUMNS;
        if width == 0
            || width % ATLAS_COLUMNS != 0
            || height < tile_size
            || rgba.len() != (width as usize) * (height as usize) * 4
        {
            return Err(AtlasError::BadDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            texels: bytemuck::cast_slice::<u8, Texel>(rgba).to_vec(),
        })
    }

    /// Decodes a PNG image.
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, AtlasError> {
        let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?.to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(width, height, image.as_raw())
    }

    /// Reads and decodes a PNG file.
    #[cfg(not(target_family = "wasm"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, AtlasError> {
        let bytes = std::fs::read(path)?;
        Self::from_png_bytes(&bytes)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Edge length of one tile in pixels.
    pub fn tile_size(&self) -> u32 {
        self.width / ATLAS_COLUMNS
    }

    /// Pixel coordinates of the top-left corner of a tile.
    pub fn tile_origin(&self, tile: (u32, u32)) -> (f32, f32) {
        let size = self.tile_size() as f32;
        (tile.0 as f32 * size, tile.1 as f32 * size)
    }

    /// Reads a texel, clamping the coordinates into the image.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> Texel {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        self.texels[y * self.width as usize + x]
    }
}

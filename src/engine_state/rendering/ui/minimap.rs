//! Height-field minimap drawn in the bottom-right corner.
//!
//! The map is centered on the player and rotated so the view direction points up. Every
//! node covers a 4x4 pixel cell. Shades come straight from the height field rather than the
//! loaded blocks, so terrain that was never generated still shows; per-chunk shade tiles are
//! kept in a small LRU cache.

use std::num::NonZeroUsize;

use cgmath::Point2;
use lru::LruCache;

use crate::engine_state::{
    rendering::framebuffer::Framebuffer,
    voxels::{
        chunk::{chunk_position_of, CHUNK_DIMENSION},
        height_field::HeightField,
    },
};

use super::primitives::{UiElement, UiRectangle};

/// Radius of the circular map in pixels.
pub const MINIMAP_RADIUS: i32 = 64;
/// Pixels per node along each axis.
pub const PIXELS_PER_NODE: f32 = 4.0;
/// Number of chunk tiles kept in the cache.
pub const TILE_CACHE_SIZE: usize = 64;

const MARKER_COLOR: u32 = 0xFF0000;

type ShadeTile = [u8; (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize];

/// Gray level for a normalized height: `16 * floor(16 * h)`.
pub fn height_shade(height: f32) -> u8 {
    (16.0 * (16.0 * height).floor()).clamp(0.0, 255.0) as u8
}

/// Minimap renderer with its tile cache.
pub struct Minimap {
    tiles: LruCache<(i32, i32), Box<ShadeTile>>,
    seed: i32,
}

impl Minimap {
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(TILE_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            tiles: LruCache::new(capacity),
            seed: 0,
        }
    }

    pub fn cached_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Shade of the column `(x, z)`.
    pub fn shade_at(&mut self, height_field: &HeightField, x: i32, z: i32) -> u8 {
        if height_field.seed() != self.seed {
            self.tiles.clear();
            self.seed = height_field.seed();
        }

        let chunk = chunk_position_of(x, z);
        let tile = self.tiles.get_or_insert((chunk.x, chunk.y), || {
            let mut tile = Box::new([0; (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize]);
            for local_z in 0..CHUNK_DIMENSION {
                for local_x in 0..CHUNK_DIMENSION {
                    let height = height_field.height(
                        chunk.x * CHUNK_DIMENSION + local_x,
                        chunk.y * CHUNK_DIMENSION + local_z,
                    );
                    tile[(local_z * CHUNK_DIMENSION + local_x) as usize] = height_shade(height);
                }
            }
            tile
        });

        let local_x = x.rem_euclid(CHUNK_DIMENSION);
        let local_z = z.rem_euclid(CHUNK_DIMENSION);
        tile[(local_z * CHUNK_DIMENSION + local_x) as usize]
    }

    /// Draws the map.
    ///
    /// # Arguments
    /// * `frame` - Target buffer
    /// * `height_field` - Terrain source
    /// * `center` - Player position on the ground plane as (x, z)
    /// * `yaw` - Player yaw in radians
    pub fn draw(
        &mut self,
        frame: &mut Framebuffer,
        height_field: &HeightField,
        center: Point2<f32>,
        yaw: f32,
    ) {
        let screen_x = frame.width() as i32 - MINIMAP_RADIUS;
        let screen_y = frame.height() as i32 - MINIMAP_RADIUS;
        let (sin, cos) = yaw.sin_cos();

        for offset_y in -MINIMAP_RADIUS..MINIMAP_RADIUS {
            for offset_x in -MINIMAP_RADIUS..MINIMAP_RADIUS {
                if offset_x * offset_x + offset_y * offset_y > MINIMAP_RADIUS * MINIMAP_RADIUS {
                    continue;
                }
                let px = screen_x + offset_x;
                let py = screen_y + offset_y;
                if px < 0 || py < 0 {
                    continue;
                }

                // Screen right follows the camera's right, screen up its forward.
                let sx = offset_x as f32 + 0.5;
                let sy = -(offset_y as f32 + 0.5);
                let world_x = center.x + (cos * sx + sin * sy) / PIXELS_PER_NODE;
                let world_z = center.y + (-sin * sx + cos * sy) / PIXELS_PER_NODE;

                let shade =
                    self.shade_at(height_field, world_x.floor() as i32, world_z.floor() as i32) as u32;
                frame.set_pixel(px as usize, py as usize, (shade << 16) | (shade << 8) | shade);
            }
        }

        UiRectangle::new((screen_x as f32, screen_y as f32), (4.0, 4.0), MARKER_COLOR).draw(frame);
    }
}

impl Default for Minimap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shades_step_by_sixteen() {
        assert_eq!(height_shade(0.0), 0);
        assert_eq!(height_shade(0.5), 128);
        assert_eq!(height_shade(0.999), 240);
        assert_eq!(height_shade(1.0), 255);
    }

    #[test]
    fn shades_match_the_height_field() {
        let height_field = HeightField::new(7);
        let mut minimap = Minimap::new();
        for (x, z) in [(0, 0), (-5, 17), (40, -33)] {
            assert_eq!(minimap.shade_at(&height_field, x, z), height_shade(height_field.height(x, z)));
        }
        assert_eq!(minimap.cached_tiles(), 3);
    }

    #[test]
    fn tile_cache_is_bounded() {
        let height_field = HeightField::new(1);
        let mut minimap = Minimap::new();
        for i in 0..(TILE_CACHE_SIZE as i32 + 10) {
            minimap.shade_at(&height_field, i * CHUNK_DIMENSION, 0);
        }
        assert_eq!(minimap.cached_tiles(), TILE_CACHE_SIZE);
    }

    #[test]
    fn map_is_round_and_marked() {
        let mut frame = Framebuffer::new(200, 200);
        frame.clear(0x123456);
        let mut minimap = Minimap::new();
        minimap.draw(&mut frame, &HeightField::new(3), Point2::new(0.5, 0.5), 0.3);
        // Corner of the bounding square lies outside the circle.
        assert_eq!(frame.pixel(200 - 2 * MINIMAP_RADIUS as usize, 200 - 2 * MINIMAP_RADIUS as usize), Some(0x123456));
        assert_eq!(frame.pixel(136, 136), Some(MARKER_COLOR));
        let pixel = frame.pixel(136, 100).unwrap_or(0x123456);
        assert_ne!(pixel, 0x123456);
        assert_eq!(pixel & 0xFF, (pixel >> 8) & 0xFF);
    }
}

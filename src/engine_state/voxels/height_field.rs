//! # Height Field
//!
//! Deterministic, seeded terrain height for every `(x, z)` column of the world.
//!
//! The plane is divided into 16×16 tiles. The four corners of a tile are sampled from an
//! integer hash noise, and the tile interior is filled by cosine interpolation along x and
//! then z. A tile is computed the first time any of its columns is queried and kept for the
//! lifetime of the height field.
//!
//! ## Resource Growth
//!
//! The tile cache is never evicted. Each tile costs 1 KiB, which is small next to the blocks
//! generated from it, but a long session that explores far will keep growing it.

use std::{cell::RefCell, collections::HashMap, f32::consts::PI};

use super::chunk::CHUNK_DIMENSION;

/// Edge length of a memoized tile, in columns.
pub const TILE_DIMENSION: i32 = CHUNK_DIMENSION;

/// A memoized 16×16 tile of heights, indexed `[local_x][local_z]`.
type HeightTile = [[f32; TILE_DIMENSION as usize]; TILE_DIMENSION as usize];

/// Seeded height generator with per-tile memoization.
///
/// Queries take `&self`; the tile cache uses interior mutability so the height field can be
/// shared by chunk generation and the minimap without exclusive access.
pub struct HeightField {
    seed: i32,
    tiles: RefCell<HashMap<(i32, i32), Box<HeightTile>>>,
}

impl HeightField {
    /// Creates an empty height field for the given seed.
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            tiles: RefCell::new(HashMap::new()),
        }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Number of tiles computed so far.
    pub fn cached_tiles(&self) -> usize {
        self.tiles.borrow().len()
    }

    /// Returns the terrain height of a column as a value in `[0, 1]`.
    ///
    /// # Arguments
    /// * `x` - World x coordinate of the column
    /// * `z` - World z coordinate of the column
    pub fn height(&self, x: i32, z: i32) -> f32 {
        let tile_x = x.div_euclid(TILE_DIMENSION);
        let tile_z = z.div_euclid(TILE_DIMENSION);
        let local_x = x.rem_euclid(TILE_DIMENSION) as usize;
        let local_z = z.rem_euclid(TILE_DIMENSION) as usize;

        if let Some(tile) = self.tiles.borrow().get(&(tile_x, tile_z)) {
            return tile[local_x][local_z];
        }

        let tile = self.build_tile(tile_x, tile_z);
        let height = tile[local_x][local_z];
        self.tiles.borrow_mut().insert((tile_x, tile_z), tile);
        height
    }

    /// Returns the terrain height of a column in blocks: `floor(10 * height + 5)`.
    pub fn absolute_height(&self, x: i32, z: i32) -> i32 {
        (10.0 * self.height(x, z) + 5.0).floor() as i32
    }

    /// Computes a full tile from its four corner samples.
    fn build_tile(&self, tile_x: i32, tile_z: i32) -> Box<HeightTile> {
        let x0 = tile_x.wrapping_mul(TILE_DIMENSION);
        let z0 = tile_z.wrapping_mul(TILE_DIMENSION);
        let x1 = x0.wrapping_add(TILE_DIMENSION);
        let z1 = z0.wrapping_add(TILE_DIMENSION);

        let near_left = noise(x0, z0, self.seed);
        let near_right = noise(x1, z0, self.seed);
        let far_left = noise(x0, z1, self.seed);
        let far_right = noise(x1, z1, self.seed);

        let mut tile = Box::new([[0.0; TILE_DIMENSION as usize]; TILE_DIMENSION as usize]);
        for (local_x, row) in tile.iter_mut().enumerate() {
            let tx = local_x as f32 / TILE_DIMENSION as f32;
            let near = cosine_interpolate(near_left, near_right, tx);
            let far = cosine_interpolate(far_left, far_right, tx);
            for (local_z, value) in row.iter_mut().enumerate() {
                let tz = local_z as f32 / TILE_DIMENSION as f32;
                *value = cosine_interpolate(near, far, tz).clamp(0.0, 1.0);
            }
        }

        log::trace!("Computed height tile ({}, {})", tile_x, tile_z);
        tile
    }
}

/// Integer hash noise in `[0, 1)` for a lattice point.
///
/// The seed is mixed additively with the coordinates so that seed 0 still varies by
/// position. All arithmetic wraps.
pub fn noise(x: i32, z: i32, seed: i32) -> f32 {
    let k = x
        .wrapping_add(z.wrapping_mul(57))
        .wrapping_add(seed.wrapping_mul(131));
    let n = (k << 13) ^ k;
    let mixed = n
        .wrapping_mul(
            n.wrapping_mul(n)
                .wrapping_mul(60493)
                .wrapping_add(19990303),
        )
        .wrapping_add(1376312589)
        & 0x7fff_ffff;
    (mixed as f64 / 2_147_483_648.0) as f32
}

/// Blends `a` into `b` with the smoothstep `(1 - cos(πt)) / 2`.
pub fn cosine_interpolate(a: f32, b: f32, t: f32) -> f32 {
    let f = (1.0 - (t * PI).cos()) * 0.5;
    a * (1.0 - f) + b * f
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_queries_return_identical_values() {
        for seed in [0, 1, -7, 123_456, i32::MAX] {
            let field = HeightField::new(seed);
            for (x, z) in [(0, 0), (15, 15), (16, 0), (-1, -1), (-17, 40), (1000, -1000)] {
                let first = field.height(x, z);
                let second = field.height(x, z);
                assert_eq!(first.to_bits(), second.to_bits());
                assert_eq!(first, HeightField::new(seed).height(x, z));
            }
        }
    }

    #[test]
    fn heights_stay_within_unit_range() {
        let field = HeightField::new(42);
        for x in -40..40 {
            for z in -40..40 {
                let h = field.height(x, z);
                assert!((0.0..=1.0).contains(&h), "height {} at {},{}", h, x, z);
                let absolute = field.absolute_height(x, z);
                assert!((5..=15).contains(&absolute));
                assert_eq!(absolute, (10.0 * h + 5.0).floor() as i32);
            }
        }
    }

    #[test]
    fn seed_zero_still_varies_by_position() {
        let samples: Vec<f32> = (0..8).map(|i| noise(i * 16, i * 32, 0)).collect();
        let first = samples[0];
        assert!(samples.iter().any(|s| (s - first).abs() > 1e-6));
    }

    #[test]
    fn different_seeds_give_different_terrain() {
        let a = HeightField::new(1);
        let b = HeightField::new(2);
        let differs = (0..64).any(|i| a.height(i * 16, 0) != b.height(i * 16, 0));
        assert!(differs);
    }

    #[test]
    fn tiles_are_memoized_once() {
        let field = HeightField::new(9);
        for x in 0..16 {
            for z in 0..16 {
                field.height(x, z);
            }
        }
        assert_eq!(field.cached_tiles(), 1);
        field.height(-1, 0);
        assert_eq!(field.cached_tiles(), 2);
    }

    #[test]
    fn tile_corners_match_noise_samples() {
        let field = HeightField::new(5);
        assert_eq!(field.height(32, 48), noise(32, 48, 5));
        assert_eq!(field.height(-16, 0), noise(-16, 0, 5));
    }

    #[test]
    fn cosine_interpolation_hits_its_endpoints() {
        assert_eq!(cosine_interpolate(0.2, 0.8, 0.0), 0.2);
        assert!((cosine_interpolate(0.2, 0.8, 1.0) - 0.8).abs() < 1e-6);
        assert!((cosine_interpolate(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }
}

//! # Polygon Rasterizer
//!
//! Scanline fills for the convex screen-space polygons produced by block faces, lines for
//! outlines and overlays, and affine texture mapping.
//!
//! ## Fill convention
//! A pixel is covered when its center lies inside the polygon. Spans are half-open on the
//! right, so two triangles sharing an edge never both cover a pixel on that edge and
//! translucent quads are not blended twice along their diagonal.
//!
//! ## Texture mapping
//! Perspective is approximated per triangle: an [`AffineTransform`] solved from the three
//! screen/texture correspondences maps each covered pixel back into the atlas. Lookups are
//! clamped to the triangle's tile so neighboring tiles never bleed in.

use cgmath::Point2;

use super::{
    framebuffer::Framebuffer,
    texture::{TextureAtlas, ALPHA_CUTOFF},
};

/// Signed doubled area of the triangle `(a, b, c)`; positive when `c` lies to the left of
/// `a -> b` in a y-up frame.
#[inline]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Tests whether `point` lies strictly inside a convex quad of either winding.
pub fn point_in_quad(quad: &[Point2<f32>; 4], point: Point2<f32>) -> bool {
    let mut positive = 0;
    let mut negative = 0;
    for i in 0..4 {
        let side = edge_function(quad[i], quad[(i + 1) % 4], point);
        if side > 0.0 {
            positive += 1;
        } else if side < 0.0 {
            negative += 1;
        }
    }
    positive == 4 || negative == 4
}

/// Visits the covered pixel spans of a convex polygon.
///
/// The callback receives `(y, x_start, x_end)` with `x_end` exclusive, already clipped to
/// the `width` x `height` target.
fn for_each_span(
    points: &[Point2<f32>],
    width: usize,
    height: usize,
    mut visit: impl FnMut(usize, usize, usize),
) {
    if points.len() < 3 || points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    let row_start = min_y.floor().max(0.0) as usize;
    let row_end = (max_y.ceil().max(0.0) as usize).min(height);

    for y in row_start..row_end {
        let sample = y as f32 + 0.5;
        let mut left = f32::INFINITY;
        let mut right = f32::NEG_INFINITY;

        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            let crosses = (a.y <= sample && sample < b.y) || (b.y <= sample && sample < a.y);
            if crosses {
                let x = a.x + (sample - a.y) * (b.x - a.x) / (b.y - a.y);
                left = left.min(x);
                right = right.max(x);
            }
        }

        if left > right {
            continue;
        }
        let x_start = (left - 0.5).ceil().max(0.0) as usize;
        let x_end = ((right - 0.5).ceil().max(0.0) as usize).min(width);
        if x_start < x_end {
            visit(y, x_start, x_end);
        }
    }
}

/// Fills a convex polygon with a solid color.
///
/// # Arguments
/// * `frame` - Target buffer
/// * `points` - Polygon corners in order; fewer than three draws nothing
/// * `color` - Fill color as `0x00RRGGBB`
/// * `alpha` - Opacity in `[0, 1]`
pub fn fill_polygon(frame: &mut Framebuffer, points: &[Point2<f32>], color: u32, alpha: f32) {
    let (width, height) = (frame.width(), frame.height());
    for_each_span(points, width, height, |y, x_start, x_end| {
        frame.blend_span(y, x_start, x_end, color, alpha);
    });
}

/// Draws a one pixel wide line.
pub fn draw_line(frame: &mut Framebuffer, from: Point2<f32>, to: Point2<f32>, color: u32) {
    if !(from.x.is_finite() && from.y.is_finite() && to.x.is_finite() && to.y.is_finite()) {
        return;
    }

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = dx.abs().max(dy.abs()).ceil();
    // Bound the walk for corners projected far outside the screen.
    let limit = (2 * (frame.width() + frame.height())) as f32;
    if steps > limit * 8.0 {
        return;
    }

    let steps = steps.max(1.0) as usize;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = (from.x + dx * t).floor();
        let y = (from.y + dy * t).floor();
        if x >= 0.0 && y >= 0.0 {
            frame.set_pixel(x as usize, y as usize, color);
        }
    }
}

/// Draws the closed outline through `points`.
pub fn draw_polygon_outline(frame: &mut Framebuffer, points: &[Point2<f32>], color: u32) {
    if points.len() < 2 {
        return;
    }
    for i in 0..points.len() {
        draw_line(frame, points[i], points[(i + 1) % points.len()], color);
    }
}

/// 2D affine map `x' = a*x + b*y + c`, `y' = d*x + e*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl AffineTransform {
    /// Solves the transform that maps each `src[i]` onto `dst[i]`.
    ///
    /// # Returns
    /// `None` when the source triangle is degenerate.
    pub fn solve(src: [Point2<f32>; 3], dst: [Point2<f32>; 3]) -> Option<Self> {
        let [u0, u1, u2] = src.map(|p| p.x as f64);
        let [v0, v1, v2] = src.map(|p| p.y as f64);
        let [x0, x1, x2] = dst.map(|p| p.x as f64);
        let [y0, y1, y2] = dst.map(|p| p.y as f64);

        let delta = u0 * v1 + v0 * u2 + u1 * v2 - v1 * u2 - v0 * u1 - u0 * v2;
        if !delta.is_finite() || delta.abs() < 1e-9 {
            return None;
        }

        let linear_x =
            |x0: f64, x1: f64, x2: f64| x0 * v1 + v0 * x2 + x1 * v2 - v1 * x2 - v0 * x1 - x0 * v2;
        let linear_y =
            |x0: f64, x1: f64, x2: f64| u0 * x1 + x0 * u2 + u1 * x2 - x1 * u2 - x0 * u1 - u0 * x2;
        let offset = |x0: f64, x1: f64, x2: f64| {
            u0 * v1 * x2 + v0 * x1 * u2 + x0 * u1 * v2 - x0 * v1 * u2 - v0 * u1 * x2 - u0 * x1 * v2
        };

        Some(Self {
            a: (linear_x(x0, x1, x2) / delta) as f32,
            b: (linear_y(x0, x1, x2) / delta) as f32,
            c: (offset(x0, x1, x2) / delta) as f32,
            d: (linear_x(y0, y1, y2) / delta) as f32,
            e: (linear_y(y0, y1, y2) / delta) as f32,
            f: (offset(y0, y1, y2) / delta) as f32,
        })
    }

    #[inline]
    pub fn apply(&self, point: Point2<f32>) -> Point2<f32> {
        Point2::new(
            self.a * point.x + self.b * point.y + self.c,
            self.d * point.x + self.e * point.y + self.f,
        )
    }
}

/// Draws a triangle textured from the atlas.
///
/// # Arguments
/// * `frame` - Target buffer
/// * `screen` - Triangle corners on screen
/// * `texture` - Matching atlas pixel coordinates
/// * `atlas` - Texture source
/// * `alpha` - Opacity applied on top of the texel's own cutout
///
/// # Returns
/// `false` if the triangle was degenerate and nothing was drawn.
pub fn draw_textured_triangle(
    frame: &mut Framebuffer,
    screen: [Point2<f32>; 3],
    texture: [Point2<f32>; 3],
    atlas: &TextureAtlas,
    alpha: f32,
) -> bool {
    let Some(transform) = AffineTransform::solve(screen, texture) else {
        return false;
    };

    let (min_u, max_u) = texture
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    let (min_v, max_v) = texture
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    let (u_lo, u_hi) = (min_u as i32, (max_u as i32 - 1).max(min_u as i32));
    let (v_lo, v_hi) = (min_v as i32, (max_v as i32 - 1).max(min_v as i32));

    let (width, height) = (frame.width(), frame.height());
    for_each_span(&screen, width, height, |y, x_start, x_end| {
        for x in x_start..x_end {
            let uv = transform.apply(Point2::new(x as f32 + 0.5, y as f32 + 0.5));
            let texel = atlas.texel(
                (uv.x.floor() as i32).clamp(u_lo, u_hi),
                (uv.y.floor() as i32).clamp(v_lo, v_hi),
            );
            if texel.a >= ALPHA_CUTOFF {
                frame.blend_pixel(x, y, texel.rgb(), alpha);
            }
        }
    });
    true
}

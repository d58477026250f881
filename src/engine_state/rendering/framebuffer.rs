//! # Framebuffer
//!
//! CPU-side color target the rasterizer draws into. Pixels are stored row-major as
//! `0x00RRGGBB`, the layout softbuffer presents directly.

/// Blends `src` over `dst` with the given opacity.
///
/// # Arguments
/// * `dst` - Existing pixel
/// * `src` - Incoming color
/// * `alpha` - Opacity of `src` in `[0, 1]`
#[inline]
pub fn blend(dst: u32, src: u32, alpha: f32) -> u32 {
    if alpha >= 1.0 {
        return src & 0x00FF_FFFF;
    }
    if alpha <= 0.0 {
        return dst;
    }

    let channel = |shift: u32| {
        let d = ((dst >> shift) & 0xFF) as f32;
        let s = ((src >> shift) & 0xFF) as f32;
        ((d + (s - d) * alpha).round() as u32).min(0xFF) << shift
    };
    channel(16) | channel(8) | channel(0)
}

/// Color buffer for software rendering.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    color: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            color: vec![0; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Fills the whole buffer with one color.
    pub fn clear(&mut self, clear_color: u32) {
        self.color.fill(clear_color);
    }

    /// Resizes the buffer. The contents are reset to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.color.clear();
        self.color.resize(width * height, 0);
    }

    /// Raw pixels, ready to be copied into a presentation surface.
    pub fn color_buffer_slice(&self) -> &[u32] {
        &self.color
    }

    /// Reads one pixel, `None` outside the buffer.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.color[y * self.width + x])
        } else {
            None
        }
    }

    /// Writes one pixel, ignoring coordinates outside the buffer.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.color[y * self.width + x] = color;
        }
    }

    /// Blends one pixel, ignoring coordinates outside the buffer.
    #[inline]
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: u32, alpha: f32) {
        if x < self.width && y < self.height {
            let index = y * self.width + x;
            self.color[index] = blend(self.color[index], color, alpha);
        }
    }

    /// Blends a horizontal run of pixels `[x_start, x_end)` on row `y`.
    pub fn blend_span(&mut self, y: usize, x_start: usize, x_end: usize, color: u32, alpha: f32) {
        if y >= self.height {
            return;
        }
        let x_end = x_end.min(self.width);
        if x_start >= x_end {
            return;
        }
        let row = y * self.width;
        for pixel in &mut self.color[row + x_start..row + x_end] {
            *pixel = blend(*pixel, color, alpha);
        }
    }

    /// Blends every pixel of the frame with `color`.
    pub fn blend_all(&mut self, color: u32, alpha: f32) {
        for pixel in &mut self.color {
            *pixel = blend(*pixel, color, alpha);
        }
    }

    /// Blends an axis-aligned rectangle clipped to the buffer.
    ///
    /// # Arguments
    /// * `x`, `y` - Top-left corner; may lie outside the buffer
    /// * `width`, `height` - Size in pixels
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32, alpha: f32) {
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x + width).min(self.width as i32);
        let y_end = (y + height).min(self.height as i32);
        if x_start >= x_end || y_start >= y_end {
            return;
        }
        for row in y_start..y_end {
            self.blend_span(row as usize, x_start as usize, x_end as usize, color, alpha);
        }
    }
}

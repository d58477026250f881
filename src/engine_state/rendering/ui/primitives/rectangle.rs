//! Rectangle UI primitive element.
//!
//! This module defines a simple rectangle UI element that can be positioned and sized on screen.

use crate::engine_state::rendering::framebuffer::Framebuffer;

use super::UiElement;

/// A simple rectangle UI element.
///
/// Represents a colored rectangle that can be positioned and sized on the screen.
/// Position and size are in pixels; the position names the rectangle's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiRectangle {
    /// Position of the rectangle center in pixels
    pub position: (f32, f32),
    /// Size of the rectangle in pixels
    pub size: (f32, f32),
    /// Color of the rectangle as `0x00RRGGBB`
    pub color: u32,
    /// Opacity in `[0, 1]`
    pub alpha: f32,
}

impl UiRectangle {
    /// Creates a new opaque rectangle with the given parameters.
    ///
    /// # Arguments
    /// * `position` - Center position of the rectangle in pixels
    /// * `size` - Size of the rectangle in pixels
    /// * `color` - Color of the rectangle
    ///
    /// # Returns
    /// A new `UiRectangle` instance
    pub fn new(position: (f32, f32), size: (f32, f32), color: u32) -> Self {
        Self {
            position,
            size,
            color,
            alpha: 1.0,
        }
    }

    /// Creates a rectangle from its top-left corner.
    pub fn from_corner(corner: (f32, f32), size: (f32, f32), color: u32) -> Self {
        Self::new((corner.0 + size.0 / 2.0, corner.1 + size.1 / 2.0), size, color)
    }

    /// Creates a rectangle centered on a screen of the given size.
    ///
    /// # Arguments
    /// * `screen` - Screen size in pixels
    /// * `size` - Size of the rectangle in pixels
    /// * `color` - Color of the rectangle
    ///
    /// # Returns
    /// A new `UiRectangle` instance centered on screen
    pub fn centered(screen: (usize, usize), size: (f32, f32), color: u32) -> Self {
        Self::new((screen.0 as f32 / 2.0, screen.1 as f32 / 2.0), size, color)
    }

    /// Returns a copy drawn at the given opacity.
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

impl UiElement for UiRectangle {
    fn draw(&self, frame: &mut Framebuffer) {
        let left = (self.position.0 - self.size.0 / 2.0).round() as i32;
        let top = (self.position.1 - self.size.1 / 2.0).round() as i32;
        frame.fill_rect(
            left,
            top,
            self.size.0.round() as i32,
            self.size.1.round() as i32,
            self.color,
            self.alpha,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rectangle_straddles_the_middle() {
        let mut frame = Framebuffer::new(10, 10);
        UiRectangle::centered((10, 10), (2.0, 2.0), 0xFFFFFF).draw(&mut frame);
        assert_eq!(frame.pixel(4, 4), Some(0xFFFFFF));
        assert_eq!(frame.pixel(5, 5), Some(0xFFFFFF));
        assert_eq!(frame.pixel(3, 4), Some(0));
        assert_eq!(frame.pixel(6, 5), Some(0));
    }

    #[test]
    fn corner_constructor_starts_at_the_corner() {
        let mut frame = Framebuffer::new(10, 10);
        UiRectangle::from_corner((0.0, 0.0), (3.0, 1.0), 0x00FF00).with_alpha(1.0).draw(&mut frame);
        assert_eq!(frame.pixel(0, 0), Some(0x00FF00));
        assert_eq!(frame.pixel(2, 0), Some(0x00FF00));
        assert_eq!(frame.pixel(3, 0), Some(0));
    }
}

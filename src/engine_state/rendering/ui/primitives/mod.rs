//! UI primitive elements for the voxel engine.
//!
//! This module defines the basic building blocks for overlay elements and the trait they
//! share. Elements draw themselves straight into the framebuffer after the world pass.

mod rectangle;
mod text;

use crate::engine_state::rendering::framebuffer::Framebuffer;

pub use rectangle::UiRectangle;
pub use text::{UiText, LINE_HEIGHT};

/// Trait for any UI element that can be drawn over the frame.
pub trait UiElement {
    /// Draws the element into `frame`, clipped to its bounds.
    fn draw(&self, frame: &mut Framebuffer);
}

//! UI rendering system for the voxel engine.
//!
//! Overlays are drawn straight into the framebuffer after the world pass: the crosshair
//! while the pointer is locked, then the HUD, the performance graph and the minimap, each
//! behind its own toggle.

mod hud;
mod minimap;
mod perf_graph;
mod primitives;

use cgmath::{Point2, Point3};

pub use hud::{draw_hud, hud_lines, HudInfo};
pub use minimap::{height_shade, Minimap, MINIMAP_RADIUS};
pub use perf_graph::{PerfGraph, DATA_POINTS, GRAPH_HEIGHT, GRAPH_WIDTH};
pub use primitives::{UiElement, UiRectangle, UiText};

use super::{framebuffer::Framebuffer, FrameStats};
use crate::engine_state::voxels::{block::block_type::BlockType, height_field::HeightField};

/// Crosshair edge length in pixels.
pub const CROSSHAIR_SIZE: f32 = 16.0;
const CROSSHAIR_COLOR: u32 = 0xFFFFFF;
const CROSSHAIR_THICKNESS: f32 = 2.0;

/// Per-frame inputs of the overlays.
pub struct OverlayContext<'a> {
    pub fps: u32,
    pub stats: FrameStats,
    pub position: Point3<f32>,
    pub yaw: f32,
    pub selected: BlockType,
    pub pointer_locked: bool,
    pub height_field: &'a HeightField,
}

/// Owns the overlay toggles and the state the overlays keep between frames.
pub struct UiManager {
    pub show_hud: bool,
    pub show_minimap: bool,
    pub show_perf_graph: bool,
    perf_graph: PerfGraph,
    minimap: Minimap,
}

impl UiManager {
    pub fn new(show_hud: bool, show_minimap: bool, show_perf_graph: bool) -> Self {
        Self {
            show_hud,
            show_minimap,
            show_perf_graph,
            perf_graph: PerfGraph::new(),
            minimap: Minimap::new(),
        }
    }

    /// Records the frame rate of the second that just ended.
    pub fn record_fps(&mut self, fps: u32) {
        self.perf_graph.push_sample(fps);
    }

    pub fn perf_graph(&self) -> &PerfGraph {
        &self.perf_graph
    }

    /// Draws every enabled overlay.
    pub fn draw(&mut self, frame: &mut Framebuffer, context: &OverlayContext<'_>) {
        if context.pointer_locked {
            let screen = (frame.width(), frame.height());
            for size in [
                (CROSSHAIR_SIZE, CROSSHAIR_THICKNESS),
                (CROSSHAIR_THICKNESS, CROSSHAIR_SIZE),
            ] {
                UiRectangle::centered(screen, size, CROSSHAIR_COLOR).draw(frame);
            }
        }

        if self.show_hud {
            draw_hud(
                frame,
                &HudInfo {
                    fps: context.fps,
                    stats: context.stats,
                    position: context.position,
                    selected: context.selected,
                },
            );
        }

        if self.show_perf_graph {
            self.perf_graph.draw(frame);
        }

        if self.show_minimap {
            self.minimap.draw(
                frame,
                context.height_field,
                Point2::new(context.position.x, context.position.z),
                context.yaw,
            );
        }
    }
}

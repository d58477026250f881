//! Text overlay with frame statistics and the player's state.

use cgmath::Point3;

use crate::engine_state::{
    rendering::{framebuffer::Framebuffer, FrameStats},
    voxels::block::block_type::BlockType,
};

use super::primitives::{UiElement, UiRectangle, UiText, LINE_HEIGHT};

const TEXT_COLOR: u32 = 0x000000;
const PANEL_COLOR: u32 = 0xFFFFFF;
const PANEL_ALPHA: f32 = 0.5;
const MARGIN: i32 = 2;

/// Everything the HUD shows for one frame.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub fps: u32,
    pub stats: FrameStats,
    /// Player feet position
    pub position: Point3<f32>,
    /// Block type placed by the next click
    pub selected: BlockType,
}

/// Formats the HUD, one string per line.
pub fn hud_lines(info: &HudInfo) -> Vec<String> {
    vec![
        format!("FPS: {}", info.fps),
        format!("Chunks: {}", info.stats.chunks),
        format!("Nodes: {}", info.stats.nodes),
        format!("Faces: {}", info.stats.faces),
        format!("Vertices: {}", info.stats.vertices),
        format!("X: {:.2}", info.position.x),
        format!("Y: {:.2}", info.position.y),
        format!("Z: {:.2}", info.position.z),
        format!("Type: {}", info.selected.name()),
    ]
}

/// Draws the HUD in the top-left corner over a translucent panel.
pub fn draw_hud(frame: &mut Framebuffer, info: &HudInfo) {
    let lines: Vec<UiText> = hud_lines(info)
        .into_iter()
        .enumerate()
        .map(|(i, line)| UiText::new((MARGIN, MARGIN + i as i32 * LINE_HEIGHT), line, TEXT_COLOR))
        .collect();

    let width = lines.iter().map(UiText::width).max().unwrap_or(0) + 2 * MARGIN;
    let height = lines.len() as i32 * LINE_HEIGHT + MARGIN;
    UiRectangle::from_corner((0.0, 0.0), (width as f32, height as f32), PANEL_COLOR)
        .with_alpha(PANEL_ALPHA)
        .draw(frame);

    for line in &lines {
        line.draw(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> HudInfo {
        HudInfo {
            fps: 58,
            stats: FrameStats {
                chunks: 4,
                nodes: 120,
                faces: 300,
                vertices: 410,
            },
            position: Point3::new(1.0, 12.345, -3.5),
            selected: BlockType::GLASS,
        }
    }

    #[test]
    fn lines_show_stats_and_position() {
        let lines = hud_lines(&info());
        assert_eq!(lines[0], "FPS: 58");
        assert_eq!(lines[3], "Faces: 300");
        assert_eq!(lines[5], "X: 1.00");
        assert_eq!(lines[6], "Y: 12.35");
        assert_eq!(lines[7], "Z: -3.50");
        assert_eq!(lines[8], "Type: glass");
    }

    #[test]
    fn hud_draws_text_over_the_panel() {
        let mut frame = Framebuffer::new(200, 200);
        frame.clear(0xFFFFFF);
        draw_hud(&mut frame, &info());
        assert!(frame.color_buffer_slice().iter().any(|&p| p == TEXT_COLOR));
        assert_eq!(frame.pixel(199, 199), Some(0xFFFFFF));
    }
}

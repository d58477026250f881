//! Frames-per-second history graph drawn in the top-right corner.

use std::collections::VecDeque;

use cgmath::Point2;

use crate::engine_state::rendering::{framebuffer::Framebuffer, rasterizer::draw_line};

use super::primitives::{UiElement, UiRectangle, UiText};

/// Graph panel width in pixels.
pub const GRAPH_WIDTH: i32 = 300;
/// Graph panel height in pixels, not counting the label below it.
pub const GRAPH_HEIGHT: i32 = 100;
/// Number of samples kept; one is taken per second.
pub const DATA_POINTS: usize = 20;
/// Frame rate drawn at the top edge of the panel.
pub const FULL_SCALE_FPS: f32 = 60.0;

const BACKGROUND_COLOR: u32 = 0xEEEEEE;
const GRID_COLOR: u32 = 0xCCCCCC;
const LINE_COLOR: u32 = 0x000000;

/// Rolling history of frame rates.
#[derive(Debug, Clone, Default)]
pub struct PerfGraph {
    samples: VecDeque<u32>,
}

impl PerfGraph {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(DATA_POINTS),
        }
    }

    /// Appends one sample, dropping the oldest once the history is full.
    pub fn push_sample(&mut self, fps: u32) {
        if self.samples.len() == DATA_POINTS {
            self.samples.pop_front();
        }
        self.samples.push_back(fps);
    }

    pub fn samples(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().copied()
    }

    /// Mean of the kept samples, truncated; zero when there are none.
    pub fn average(&self) -> u32 {
        if self.samples.is_empty() {
            return 0;
        }
        let total: u64 = self.samples.iter().map(|&fps| fps as u64).sum();
        (total / self.samples.len() as u64) as u32
    }

    /// Draws the panel anchored to the top-right corner of `frame`.
    pub fn draw(&self, frame: &mut Framebuffer) {
        let left = frame.width() as i32 - GRAPH_WIDTH;
        let interval = GRAPH_WIDTH / DATA_POINTS as i32;

        UiRectangle::from_corner(
            (left as f32, 0.0),
            (GRAPH_WIDTH as f32, GRAPH_HEIGHT as f32),
            BACKGROUND_COLOR,
        )
        .draw(frame);

        for i in 0..DATA_POINTS as i32 {
            let x = (left + i * interval) as f32;
            draw_line(
                frame,
                Point2::new(x, 0.0),
                Point2::new(x, GRAPH_HEIGHT as f32 - 1.0),
                GRID_COLOR,
            );
        }

        let points: Vec<Point2<f32>> = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, &fps)| {
                let height = GRAPH_HEIGHT as f32;
                let y = (height - fps as f32 * height / FULL_SCALE_FPS).clamp(0.0, height - 1.0);
                Point2::new((left + i as i32 * interval) as f32, y)
            })
            .collect();
        for pair in points.windows(2) {
            draw_line(frame, pair[0], pair[1], LINE_COLOR);
        }

        UiText::new(
            (left + 2, GRAPH_HEIGHT + 3),
            format!("AVG. FPS: {}", self.average()),
            LINE_COLOR,
        )
        .draw(frame);
    }
}

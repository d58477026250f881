//! Rendering system for the voxel engine.
//!
//! A painter's-algorithm software renderer. Each frame:
//!
//! 1. Chunks far behind the horizontal view direction are skipped
//! 2. Render-eligible blocks of the remaining chunks are culled by distance, by the view
//!    direction and by the frustum side planes, each block treated as a bounding sphere
//! 3. Survivors are sorted back to front
//! 4. Every visible, camera-facing face is projected and drawn flat or textured; fog layers
//!    are blended over the whole frame at fixed distance checkpoints on the way
//! 5. A pending click is hit-tested against each drawn face; the nearest face wins
//!
//! Overlays from [`ui`] are drawn afterwards by the engine.

use cgmath::{EuclideanSpace, InnerSpace, Point2, Point3, Rad, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use framebuffer::Framebuffer;
use frustum::Frustum;
use projection::Projector;
use rasterizer::{draw_polygon_outline, draw_textured_triangle, fill_polygon, point_in_quad};
use texture::TextureAtlas;

use super::{
    camera_state::{camera::Camera, Player},
    config::EngineConfig,
    voxels::{
        block::{
            block_side::{BlockSide, CORNER_OFFSETS},
            Block,
        },
        chunk::CHUNK_DIMENSION,
        world::World,
    },
};

pub mod framebuffer;
pub mod frustum;
pub mod projection;
pub mod rasterizer;
pub mod texture;
pub mod ui;

/// Chunks whose center lies further than this behind the eye, along the horizontal view
/// direction, are skipped. Covers the chunk's bounding cylinder (radius ~11.3).
pub const CHUNK_MARGIN: f32 = 13.0;
/// Radius of a block's bounding sphere.
pub const NODE_RADIUS: f32 = 0.866;
/// Color the frame is cleared to.
pub const CLEAR_COLOR: u32 = 0xFFFFFF;
/// Color of the fog layers.
pub const FOG_COLOR: u32 = 0xEEEEEE;
/// Opacity of one fog layer.
pub const FOG_ALPHA: f32 = 0.5;
/// Opacity of faces of transparent block types.
pub const TRANSPARENT_ALPHA: f32 = 0.5;
/// Face outline color in flat mode.
pub const OUTLINE_COLOR: u32 = 0x000000;

/// How block faces are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Solid block colors with black outlines
    Flat,
    /// Affine-mapped atlas tiles; falls back to `Flat` without an atlas
    #[default]
    Textured,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Flat => RenderMode::Textured,
            RenderMode::Textured => RenderMode::Flat,
        }
    }
}

/// Counters gathered while drawing one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Chunks that survived the behind-the-camera test
    pub chunks: usize,
    /// Blocks drawn
    pub nodes: usize,
    /// Faces drawn
    pub faces: usize,
    /// Distinct corners projected in front of the camera
    pub vertices: usize,
}

/// The face under a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickTarget {
    pub block: Point3<i32>,
    pub side: BlockSide,
}

impl ClickTarget {
    /// Cell a block placed against this face would occupy.
    pub fn placement_position(&self) -> Point3<i32> {
        self.block + self.side.normal()
    }
}

/// Camera and fog parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub focal_length: f32,
    /// Squared distance beyond which blocks are not drawn
    pub node_render_distance: f32,
    pub fog_start: f32,
    pub fog_step: f32,
    pub fog_limit: f32,
}

impl RenderSettings {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            focal_length: config.focal_length,
            node_render_distance: config.node_render_distance,
            fog_start: config.fog_start,
            fog_step: config.fog_step,
            fog_limit: config.fog_limit,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[derive(Debug, Clone, Copy)]
struct VisibleNode {
    block: Block,
    distance: f32,
}

/// Software renderer owning the frame it draws into.
pub struct Renderer {
    framebuffer: Framebuffer,
    atlas: Option<TextureAtlas>,
    mode: RenderMode,
    settings: RenderSettings,
    projector: Projector,
    visible: Vec<VisibleNode>,
}

impl Renderer {
    /// Creates a renderer with a frame of the given size and no atlas.
    pub fn new(width: usize, height: usize, settings: RenderSettings, mode: RenderMode) -> Self {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
        Self {
            framebuffer: Framebuffer::new(width, height),
            atlas: None,
            mode,
            settings,
            projector: Projector::new(camera.basis()),
            visible: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        log::debug!("Resizing frame to {}x{}", width, height);
        self.framebuffer.resize(width, height);
    }

    pub fn set_atlas(&mut self, atlas: Option<TextureAtlas>) {
        self.atlas = atlas;
    }

    pub fn has_atlas(&self) -> bool {
        self.atlas.is_some()
    }

    /// The selected mode.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// The mode actually used for drawing; textured mode needs an atlas.
    pub fn effective_mode(&self) -> RenderMode {
        match (self.mode, &self.atlas) {
            (RenderMode::Textured, Some(_)) => RenderMode::Textured,
            _ => RenderMode::Flat,
        }
    }

    pub fn toggle_mode(&mut self) -> RenderMode {
        self.mode = self.mode.toggled();
        log::info!("Render mode: {:?}", self.mode);
        self.mode
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// Draws the world as seen by the player.
    ///
    /// # Arguments
    /// * `world` - Blocks to draw
    /// * `player` - Source of the camera
    /// * `click` - Pending click, relative to the center of the frame
    ///
    /// # Returns
    /// The frame's statistics and the nearest face under the click, if any.
    pub fn render(
        &mut self,
        world: &World,
        player: &Player,
        click: Option<Point2<f32>>,
    ) -> (FrameStats, Option<ClickTarget>) {
        let mut stats = FrameStats::default();
        self.framebuffer.clear(CLEAR_COLOR);
        if self.framebuffer.width() == 0 || self.framebuffer.height() == 0 {
            return (stats, None);
        }

        let half_width = self.framebuffer.width() as f32 / 2.0;
        let half_height = self.framebuffer.height() as f32 / 2.0;
        let basis = player.camera.basis();
        let eye = player.eye();
        let focal_length = self.settings.focal_length;

        self.projector.begin_frame(eye, basis, focal_length, half_width, half_height);
        let frustum = Frustum::new(&basis, half_width, half_height, focal_length);

        let mut visible = std::mem::take(&mut self.visible);
        visible.clear();

        for chunk in world.chunks() {
            let center = Vector2::new(
                (chunk.position.x * CHUNK_DIMENSION) as f32 + CHUNK_DIMENSION as f32 / 2.0 - eye.x,
                (chunk.position.y * CHUNK_DIMENSION) as f32 + CHUNK_DIMENSION as f32 / 2.0 - eye.z,
            );
            if basis.forward_2d.dot(center) < -CHUNK_MARGIN {
                continue;
            }
            stats.chunks += 1;

            for block in chunk.render_blocks() {
                let relative = Vector3::new(
                    block.position.x as f32 + 0.5 - eye.x,
                    block.position.y as f32 + 0.5 - eye.y,
                    block.position.z as f32 + 0.5 - eye.z,
                );
                let distance = relative.magnitude2();
                if distance > self.settings.node_render_distance
                    || basis.forward.dot(relative) < -NODE_RADIUS
                    || !frustum.intersects_sphere(relative, NODE_RADIUS)
                {
                    continue;
                }
                visible.push(VisibleNode {
                    block: *block,
                    distance,
                });
            }
        }

        visible.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        stats.nodes = visible.len();

        let click = click.map(|offset| Point2::new(offset.x + half_width, offset.y + half_height));
        let mut target = None;
        let mut fog_checkpoint = self.settings.fog_start;
        let eye = eye.to_vec();

        for node in &visible {
            stats.faces += self.draw_node(&node.block, eye, click, &mut target);

            if fog_checkpoint < self.settings.fog_limit
                && node.distance < self.settings.node_render_distance - fog_checkpoint
            {
                self.framebuffer.blend_all(FOG_COLOR, FOG_ALPHA);
                fog_checkpoint += self.settings.fog_step;
            }
        }

        self.visible = visible;
        stats.vertices = self.projector.vertex_count();
        (stats, target)
    }

    /// Draws the camera-facing visible faces of one block.
    ///
    /// # Returns
    /// The number of faces drawn.
    fn draw_node(
        &mut self,
        block: &Block,
        eye: Vector3<f32>,
        click: Option<Point2<f32>>,
        target: &mut Option<ClickTarget>,
    ) -> usize {
        let origin = block.origin();
        let alpha = if block.block_type.is_transparent() {
            TRANSPARENT_ALPHA
        } else {
            1.0
        };
        let textured = self.effective_mode() == RenderMode::Textured;
        let mut faces = 0;

        for side in block.sides.iter() {
            if !side.faces_camera(origin, eye) {
                continue;
            }
            faces += 1;

            let projected = side.corners().map(|corner| {
                let offset = CORNER_OFFSETS[corner];
                self.projector.project(Point3::new(
                    origin.x + offset[0],
                    origin.y + offset[1],
                    origin.z + offset[2],
                ))
            });

            if let (Some(click), [Some(a), Some(b), Some(c), Some(d)]) = (click, projected) {
                if point_in_quad(&[a, b, c, d], click) {
                    *target = Some(ClickTarget {
                        block: block.position,
                        side,
                    });
                }
            }

            match (&self.atlas, textured) {
                (Some(atlas), true) => draw_textured_face(
                    &mut self.framebuffer,
                    atlas,
                    &projected,
                    block.block_type.texture(side),
                    alpha,
                ),
                _ => draw_flat_face(
                    &mut self.framebuffer,
                    &projected,
                    block.block_type.color(),
                    alpha,
                ),
            }
        }
        faces
    }
}

/// Fills the projected corners of a face and outlines them.
fn draw_flat_face(
    frame: &mut Framebuffer,
    corners: &[Option<Point2<f32>>; 4],
    color: u32,
    alpha: f32,
) {
    let points: Vec<Point2<f32>> = corners.iter().flatten().copied().collect();
    if points.len() >= 3 {
        fill_polygon(frame, &points, color, alpha);
    }
    draw_polygon_outline(frame, &points, OUTLINE_COLOR);
}

/// Draws a face as two affine-textured triangles.
///
/// Corners behind the camera drop the triangles that use them; the fallback triangles keep
/// as much of the face as three projected corners allow.
fn draw_textured_face(
    frame: &mut Framebuffer,
    atlas: &TextureAtlas,
    corners: &[Option<Point2<f32>>; 4],
    tile: (u32, u32),
    alpha: f32,
) {
    let (u, v) = atlas.tile_origin(tile);
    let size = atlas.tile_size() as f32;
    let texture = [
        Point2::new(u, v),
        Point2::new(u, v + size),
        Point2::new(u + size, v + size),
        Point2::new(u + size, v),
    ];

    let triangle = |indices: [usize; 3]| -> Option<([Point2<f32>; 3], [Point2<f32>; 3])> {
        let screen = [corners[indices[0]]?, corners[indices[1]]?, corners[indices[2]]?];
        Some((screen, indices.map(|i| texture[i])))
    };

    let first = triangle([0, 1, 2]).or_else(|| triangle([1, 2, 3]));
    let second = triangle([2, 3, 0]).or_else(|| triangle([0, 1, 3]));
    for (screen, tex) in [first, second].into_iter().flatten() {
        draw_textured_triangle(frame, screen, tex, atlas, alpha);
    }
}

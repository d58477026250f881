//! # Engine State Module
//!
//! The core engine module that owns the world, the player and the renderer and advances them
//! one tick per frame.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - The first-person player, its camera and collision
//! * `config` - Runtime settings
//! * `persistence` - Saving and loading the world
//! * `rendering` - The software rasterizer and its overlays
//! * `voxels` - Block types, terrain, chunks and the world model
//!
//! ## Tick
//!
//! Input sources never mutate engine state directly. They queue [`InputEvent`]s, and
//! [`EngineState::tick`] drains the queue once at the start of each frame before it advances
//! the player, draws the frame and applies the click resolved while drawing. All world and
//! player mutation therefore happens inside the tick.

use std::collections::HashSet;

use cgmath::Point2;

use camera_state::Player;
use config::EngineConfig;
use persistence::{
    load_world, platform_storage, report_user_error, save_world, SaveError, SaveStorage,
};
use rendering::{
    framebuffer::Framebuffer,
    texture::TextureAtlas,
    ui::{OverlayContext, UiManager},
    ClickTarget, FrameStats, RenderSettings, Renderer,
};
use voxels::{block::block_type::BlockType, world::World};

use crate::{
    application_state::input_state::{ClickButton, InputEvent, Intent, Toggle},
    core::EventQueue,
};

pub mod camera_state;
pub mod config;
pub mod persistence;
pub mod rendering;
pub mod voxels;

/// Counts frames and reports the frame rate once per second.
#[derive(Debug, Default)]
pub struct FpsCounter {
    elapsed: f32,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    /// Records one frame.
    ///
    /// # Returns
    /// The number of frames in the second that just ended, once a second has passed.
    pub fn frame(&mut self, dt: f32) -> Option<u32> {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed < 1.0 {
            return None;
        }

        self.fps = self.frames;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(self.fps)
    }

    /// Frame rate of the last completed second.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// The main state container for the voxel engine
///
/// This struct owns every subsystem and coordinates their interactions once per tick.
///
/// # Examples
///
/// ```ignore
/// let mut engine_state = EngineState::new(EngineConfig::load());
/// let mut events = EventQueue::new();
///
/// // Main loop
/// loop {
///     input_manager.emit_events(&mut events);
///     engine_state.tick(delta_time, &mut events);
///     present(engine_state.frame());
/// }
/// ```
pub struct EngineState {
    pub config: EngineConfig,
    /// The voxel world containing all chunk data
    pub world: World,
    /// The first-person player
    pub player: Player,
    pub renderer: Renderer,
    /// Overlay toggles and state
    pub ui: UiManager,
    /// Intents currently held by any input source
    held: HashSet<Intent>,
    /// Block type placed by the place click
    selected: BlockType,
    storage: Box<dyn SaveStorage>,
    /// Latest click of this tick; only one click is hit-tested per frame
    pending_click: Option<(ClickButton, Point2<f32>)>,
    /// Pointer rotation accumulated this tick as (yaw, pitch)
    look: (f32, f32),
    pointer_locked: bool,
    fps: FpsCounter,
    stats: FrameStats,
}

impl EngineState {
    /// Creates a new engine state with the platform's save storage.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine settings; sanitized before use
    ///
    /// # Returns
    ///
    /// A fully initialized `EngineState` with the player standing at the spawn point
    pub fn new(config: EngineConfig) -> Self {
        let storage = platform_storage(&config.save_dir);
        Self::with_storage(config, storage)
    }

    /// Creates a new engine state that saves into `storage`.
    pub fn with_storage(config: EngineConfig, storage: Box<dyn SaveStorage>) -> Self {
        let config = config.sanitized();
        let seed = config.resolved_seed();
        log::info!("Generating world with seed {}", seed);

        let mut world = World::new(seed);
        let player = Player::new(&mut world);
        let renderer = Renderer::new(
            config.width as usize,
            config.height as usize,
            RenderSettings::from_config(&config),
            config.render_mode,
        );
        let ui = UiManager::new(config.show_hud, config.show_minimap, config.show_perf_graph);

        Self {
            config,
            world,
            player,
            renderer,
            ui,
            held: HashSet::new(),
            selected: BlockType::STONE,
            storage,
            pending_click: None,
            look: (0.0, 0.0),
            pointer_locked: false,
            fps: FpsCounter::default(),
            stats: FrameStats::default(),
        }
    }

    /// Installs the texture atlas; without one the renderer draws flat colors.
    pub fn set_atlas(&mut self, atlas: Option<TextureAtlas>) {
        match &atlas {
            Some(atlas) => log::info!("Using {}x{} texture atlas", atlas.width(), atlas.height()),
            None => log::warn!("No texture atlas, drawing flat colors"),
        }
        self.renderer.set_atlas(atlas);
    }

    /// Resizes the frame when the window size changes
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width as usize, height as usize);
    }

    /// The last drawn frame.
    pub fn frame(&self) -> &Framebuffer {
        self.renderer.framebuffer()
    }

    /// Statistics of the last drawn frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn selected(&self) -> BlockType {
        self.selected
    }

    pub fn is_held(&self, intent: Intent) -> bool {
        self.held.contains(&intent)
    }

    /// Advances the engine by one frame.
    ///
    /// # Arguments
    ///
    /// * `dt` - Seconds since the previous tick; clamped to `max_frame_delta` for movement
    /// * `events` - Input recorded since the previous tick, drained here
    ///
    /// # Returns
    ///
    /// The statistics of the drawn frame
    pub fn tick(&mut self, dt: f32, events: &mut EventQueue<InputEvent>) -> FrameStats {
        for event in events.drain() {
            self.apply_event(event);
        }

        let step = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_delta)
        } else {
            0.0
        };
        let actions = self.player_action();
        self.player.update(step, &actions, &mut self.world);

        let click = self.pending_click.take();
        let (stats, target) = self
            .renderer
            .render(&self.world, &self.player, click.map(|(_, point)| point));
        if let (Some((button, _)), Some(target)) = (click, target) {
            self.resolve_click(button, target);
        }
        self.stats = stats;

        if let Some(fps) = self.fps.frame(dt.max(0.0)) {
            log::debug!("{} fps, {:?}", fps, stats);
            self.ui.record_fps(fps);
        }

        let context = OverlayContext {
            fps: self.fps.fps(),
            stats,
            position: self.player.position(),
            yaw: self.player.camera.yaw.0,
            selected: self.selected,
            pointer_locked: self.pointer_locked,
            height_field: self.world.height_field(),
        };
        self.ui.draw(self.renderer.framebuffer_mut(), &context);

        stats
    }

    fn apply_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::IntentPressed(intent) => {
                self.held.insert(intent);
            }
            InputEvent::IntentReleased(intent) => {
                self.held.remove(&intent);
            }
            InputEvent::ReleaseAll => self.held.clear(),
            InputEvent::Toggle(toggle) => self.apply_toggle(toggle),
            InputEvent::Look { dx, dy } => {
                let sensitivity = self.config.mouse_sensitivity;
                self.look.0 += dx * sensitivity;
                self.look.1 -= dy * sensitivity;
            }
            InputEvent::Click { button, x, y } => {
                self.pending_click = Some((button, Point2::new(x, y)));
            }
            InputEvent::SelectSlot(id) => match BlockType::from_id(id) {
                Some(block_type) => self.select(block_type),
                None => log::debug!("No block type with id {}", id),
            },
            InputEvent::SelectStep(steps) => self.select(self.selected.cycle(steps)),
            InputEvent::Save => {
                if let Err(e) = self.save() {
                    report_user_error(&format!("Could not save the world: {}", e));
                }
            }
            InputEvent::Load => {
                if let Err(e) = self.load() {
                    report_user_error(&format!("Could not load the world: {}", e));
                }
            }
            InputEvent::PointerLock(locked) => self.pointer_locked = locked,
        }
    }

    fn apply_toggle(&mut self, toggle: Toggle) {
        match toggle {
            Toggle::Gravity => {
                self.player.gravity = !self.player.gravity;
                log::info!("Gravity {}", on_off(self.player.gravity));
            }
            Toggle::Collision => {
                self.player.collision = !self.player.collision;
                log::info!("Collision {}", on_off(self.player.collision));
            }
            Toggle::RenderMode => {
                self.renderer.toggle_mode();
            }
            Toggle::Hud => self.ui.show_hud = !self.ui.show_hud,
            Toggle::Minimap => self.ui.show_minimap = !self.ui.show_minimap,
            Toggle::PerfGraph => self.ui.show_perf_graph = !self.ui.show_perf_graph,
        }
    }

    fn select(&mut self, block_type: BlockType) {
        self.selected = block_type;
        log::info!("Selected {}", block_type.name());
    }

    /// Builds this tick's player actions from the held intents and the pointer rotation.
    fn player_action(&mut self) -> PlayerAction {
        let held = |intent: Intent| self.held.contains(&intent);
        let look = std::mem::take(&mut self.look);

        PlayerAction {
            move_forward: held(Intent::Forward),
            move_backward: held(Intent::Back),
            move_left: held(Intent::StrafeLeft),
            move_right: held(Intent::StrafeRight),
            move_up: held(Intent::FlyUp),
            move_down: held(Intent::FlyDown),
            turn_left: held(Intent::TurnLeft),
            turn_right: held(Intent::TurnRight),
            look_up: held(Intent::LookUp),
            look_down: held(Intent::LookDown),
            jump: held(Intent::Jump),
            rotate_view: (look != (0.0, 0.0)).then_some(look),
        }
    }

    /// Places or removes a block at the clicked face.
    ///
    /// Placing into a cell the player occupies, or into an occupied cell, does nothing.
    fn resolve_click(&mut self, button: ClickButton, target: ClickTarget) {
        match button {
            ClickButton::Place => {
                let position = target.placement_position();
                if self.player.node_collision(position) {
                    log::debug!("Not placing a block inside the player at {:?}", position);
                    return;
                }
                self.world.add_block(position, self.selected);
            }
            ClickButton::Remove => {
                self.world.remove_block(target.block);
            }
        }
    }

    /// Saves the world under the configured save name.
    ///
    /// # Returns
    ///
    /// The number of blocks written
    pub fn save(&mut self) -> Result<usize, SaveError> {
        save_world(
            self.storage.as_mut(),
            &self.config.save_name,
            &self.world,
            &self.player,
        )
    }

    /// Replaces the world with the save stored under the configured save name.
    ///
    /// A failed load leaves the world untouched.
    pub fn load(&mut self) -> Result<usize, SaveError> {
        let restored = load_world(
            self.storage.as_ref(),
            &self.config.save_name,
            &mut self.world,
            &mut self.player,
        )?;
        self.pending_click = None;
        Ok(restored)
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Represents player actions for one tick
///
/// This struct contains flags for the movement and look intents held during the tick and
/// the pointer rotation accumulated since the previous one.
#[derive(Default, Debug, Clone)]
pub struct PlayerAction {
    /// Movement actions - true while the intent is held
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Flight, only used while gravity is off
    pub move_up: bool,
    pub move_down: bool,

    /// Keyboard turning at a fixed rate
    pub turn_left: bool,
    pub turn_right: bool,
    pub look_up: bool,
    pub look_down: bool,

    /// Jump, only used while gravity is on and the player is grounded
    pub jump: bool,

    /// Pointer rotation as (yaw, pitch) in radians - Some if the pointer moved
    pub rotate_view: Option<(f32, f32)>,
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Vector3};

    use super::*;
    use crate::engine_state::persistence::MemoryStorage;

    fn engine() -> EngineState {
        let config = EngineConfig {
            seed: Some(5),
            width: 200,
            height: 150,
            fog_limit: 0.0,
            ..Default::default()
        };
        EngineState::with_storage(config, Box::new(MemoryStorage::new()))
    }

    /// An engine whose world holds only the given blocks and whose player floats at the origin
    /// looking along +z.
    fn scene_engine(blocks: &[(Point3<i32>, BlockType)]) -> EngineState {
        let mut engine = engine();
        engine.player.gravity = false;
        engine.player.collision = false;
        engine
            .player
            .set_pose(Point3::new(0.5, 0.0, 0.5), Vector3::new(0.0, 0.0, 0.0), &mut engine.world);
        engine.world.reset(5);
        for (position, block_type) in blocks {
            engine.world.add_block(*position, *block_type);
        }
        engine
    }

    fn tick_with(engine: &mut EngineState, dt: f32, events: &[InputEvent]) -> FrameStats {
        let mut queue = EventQueue::new();
        queue.extend(events.iter().copied());
        engine.tick(dt, &mut queue)
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..9 {
            assert_eq!(counter.frame(0.1), None);
        }
        assert_eq!(counter.frame(0.15), Some(10));
        assert_eq!(counter.fps(), 10);
        assert_eq!(counter.frame(0.1), None);
    }

    #[test]
    fn held_intent_moves_until_released() {
        let mut engine = scene_engine(&[]);

        tick_with(&mut engine, 0.1, &[InputEvent::IntentPressed(Intent::Forward)]);
        assert!((engine.player.position().z - 1.0).abs() < 1e-4);

        tick_with(&mut engine, 0.1, &[]);
        assert!((engine.player.position().z - 1.5).abs() < 1e-4);

        tick_with(&mut engine, 0.1, &[InputEvent::IntentReleased(Intent::Forward)]);
        assert!((engine.player.position().z - 1.5).abs() < 1e-4);
        assert!(!engine.is_held(Intent::Forward));
    }

    #[test]
    fn release_all_drops_every_intent() {
        let mut engine = scene_engine(&[]);
        tick_with(
            &mut engine,
            0.0,
            &[
                InputEvent::IntentPressed(Intent::Forward),
                InputEvent::IntentPressed(Intent::StrafeLeft),
                InputEvent::ReleaseAll,
            ],
        );
        assert!(!engine.is_held(Intent::Forward));
        assert!(!engine.is_held(Intent::StrafeLeft));
    }

    #[test]
    fn large_frame_times_are_clamped() {
        let mut engine = scene_engine(&[]);
        let limit = engine.config.max_frame_delta;

        tick_with(&mut engine, 30.0, &[InputEvent::IntentPressed(Intent::Forward)]);
        let moved = engine.player.position().z - 0.5;
        assert!((moved - camera_state::SPEED * limit).abs() < 1e-4);
    }

    #[test]
    fn pointer_motion_turns_the_player() {
        let mut engine = scene_engine(&[]);
        tick_with(&mut engine, 0.0, &[InputEvent::Look { dx: 10.0, dy: -5.0 }]);

        let rotation = engine.player.rotation();
        assert!((rotation.y - 0.1).abs() < 1e-5);
        assert!((rotation.x - 0.05).abs() < 1e-5);
    }

    #[test]
    fn toggles_flip_engine_switches() {
        let mut engine = engine();
        let gravity = engine.player.gravity;
        let mode = engine.renderer.mode();

        tick_with(
            &mut engine,
            0.0,
            &[
                InputEvent::Toggle(Toggle::Gravity),
                InputEvent::Toggle(Toggle::RenderMode),
                InputEvent::Toggle(Toggle::Minimap),
            ],
        );
        assert_eq!(engine.player.gravity, !gravity);
        assert_eq!(engine.renderer.mode(), mode.toggled());
        assert!(engine.ui.show_minimap);
    }

    #[test]
    fn selection_follows_slots_and_steps() {
        let mut engine = engine();
        tick_with(&mut engine, 0.0, &[InputEvent::SelectSlot(3)]);
        assert_eq!(engine.selected(), BlockType::DIRT);

        tick_with(&mut engine, 0.0, &[InputEvent::SelectSlot(99)]);
        assert_eq!(engine.selected(), BlockType::DIRT);

        tick_with(&mut engine, 0.0, &[InputEvent::SelectStep(1)]);
        assert_eq!(engine.selected(), BlockType::COBBLESTONE);

        tick_with(&mut engine, 0.0, &[InputEvent::SelectStep(-4)]);
        assert_eq!(engine.selected(), BlockType::CRAFT);
    }

    #[test]
    fn remove_click_deletes_the_block_under_the_crosshair() {
        let block = Point3::new(0, 1, 4);
        let mut engine = scene_engine(&[(block, BlockType::STONE)]);

        tick_with(
            &mut engine,
            0.0,
            &[InputEvent::Click {
                button: ClickButton::Remove,
                x: 0.0,
                y: 0.0,
            }],
        );
        assert!(engine.world.get_block(block).is_none());
    }

    #[test]
    fn place_click_adds_the_selected_type_against_the_face() {
        let mut engine = scene_engine(&[(Point3::new(0, 1, 4), BlockType::STONE)]);

        tick_with(
            &mut engine,
            0.0,
            &[
                InputEvent::SelectSlot(7),
                InputEvent::Click {
                    button: ClickButton::Place,
                    x: 0.0,
                    y: 0.0,
                },
            ],
        );
        let placed = engine.world.get_block(Point3::new(0, 1, 3));
        assert_eq!(placed.map(|block| block.block_type), Some(BlockType::BRICKS));
    }

    #[test]
    fn click_into_the_sky_changes_nothing() {
        let mut engine = scene_engine(&[(Point3::new(0, 1, 4), BlockType::STONE)]);
        tick_with(
            &mut engine,
            0.0,
            &[InputEvent::Click {
                button: ClickButton::Remove,
                x: 0.0,
                y: -70.0,
            }],
        );
        assert!(engine.world.get_block(Point3::new(0, 1, 4)).is_some());
    }

    #[test]
    fn save_then_load_restores_the_pose() {
        let mut engine = engine();
        let saved = engine.player.position();
        tick_with(&mut engine, 0.0, &[InputEvent::Save]);

        let elsewhere = Point3::new(40.0, 30.0, 40.0);
        engine
            .player
            .set_pose(elsewhere, Vector3::new(0.0, 1.0, 0.0), &mut engine.world);
        tick_with(&mut engine, 0.0, &[InputEvent::Load]);

        let restored = engine.player.position();
        assert!((restored.x - saved.x).abs() < 0.01);
        assert!((restored.y - saved.y).abs() < 0.01);
        assert!((restored.z - saved.z).abs() < 0.01);
    }

    #[test]
    fn load_without_a_save_reports_not_found() {
        let mut engine = engine();
        assert!(matches!(engine.load(), Err(SaveError::NotFound(_))));
    }
}

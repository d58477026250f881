//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window, surface and atlas initialization
//! - Keyboard, mouse and touch input
//! - Pointer lock
//! - Application lifecycle events
//! - Presenting engine frames to the window

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;
pub mod touch_control;

use std::{num::NonZeroU32, sync::Arc};

use graphics_resources_builder::{Graphics, MaybeGraphics, WindowSurface};
use input_manager::InputManager;
use input_state::InputEvent;
use softbuffer::Context;
use touch_control::TouchBridge;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    core::EventQueue,
    engine_state::{config::EngineConfig, EngineState},
};

/// The main application state container that manages the application's lifecycle.
///
/// This struct holds the current state of the application, including graphics resources,
/// input handling, and window management. It implements `ApplicationHandler` to handle
/// window and device events.
pub struct ApplicationState {
    /// The current graphics state, which may be initializing, ready or moved
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Settings the engine is created with
    pub config: EngineConfig,
}

/// Represents the fully initialized and running state of the application.
///
/// This struct contains all the necessary components for the running application,
/// including the game engine state, window handle, and input management.
pub struct InitializedApplicationState {
    /// The core game engine state and logic
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Surface the engine's frames are copied into
    pub surface: WindowSurface,
    _context: Context<Arc<Window>>,

    /// Manages keyboard and mouse state
    pub input_manager: InputManager,

    /// Turns touch drags into movement intents
    pub touch_bridge: TouchBridge,

    /// Input waiting for the next engine tick
    pub events: EventQueue<InputEvent>,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: web_time::Instant,
}

impl ApplicationState {
    /// Initializes the application state with the finished graphics resources.
    ///
    /// This method transitions the application from the initialization phase to the running state
    /// by setting up the engine state and handing it the atlas.
    fn initialize_application_state(&mut self) {
        let MaybeGraphics::Graphics(gfx) =
            std::mem::replace(&mut self.graphics, MaybeGraphics::Moved)
        else {
            return;
        };
        let Graphics {
            window,
            context,
            surface,
            atlas,
        } = gfx;

        let size = window.inner_size();
        let mut engine_state = EngineState::new(self.config.clone());
        engine_state.set_atlas(atlas);
        if size.width > 0 && size.height > 0 {
            engine_state.resize(size.width, size.height);
        }

        let window_size = (size.width, size.height);
        self.state = Some(InitializedApplicationState {
            engine_state,
            window,
            surface,
            _context: context,
            input_manager: InputManager::new(window_size),
            touch_bridge: TouchBridge::new(self.config.touch_deadzone, window_size),
            events: EventQueue::new(),
            last_wait_time: web_time::Instant::now(),
        });
        log::info!("Application initialized");
    }
}

impl InitializedApplicationState {
    /// Copies the engine's last frame to the window.
    ///
    /// Surface errors are logged and the frame is skipped.
    fn present(&mut self) {
        let frame = self.engine_state.frame();
        let (Some(width), Some(height)) = (
            NonZeroU32::new(frame.width() as u32),
            NonZeroU32::new(frame.height() as u32),
        ) else {
            return;
        };

        if let Err(e) = self.surface.resize(width, height) {
            log::error!("Failed to resize surface: {}", e);
            return;
        }

        match self.surface.buffer_mut() {
            Ok(mut buffer) => {
                buffer.copy_from_slice(frame.color_buffer_slice());
                if let Err(e) = buffer.present() {
                    log::error!("Failed to present frame: {}", e);
                }
            }
            Err(e) => log::error!("Failed to acquire surface buffer: {}", e),
        }
    }

    /// Locks the pointer to the window for mouse look, or releases it.
    ///
    /// Falls back to confining the pointer where locking is unsupported.
    fn set_pointer_lock(&mut self, locked: bool) {
        let result = if locked {
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };

        match result {
            Ok(()) => {
                self.window.set_cursor_visible(!locked);
                self.input_manager.set_pointer_locked(locked);
                self.events.push(InputEvent::PointerLock(locked));
                log::info!("Pointer {}", if locked { "locked" } else { "released" });
            }
            Err(e) => log::warn!("Could not change pointer lock: {}", e),
        }
    }
}

impl ApplicationHandler<Graphics> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            if matches!(event, WindowEvent::CloseRequested) {
                event_loop.exit();
            }
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.resize(size.width, size.height);
                state.touch_bridge.resize((size.width, size.height));
            }
            WindowEvent::Focused(false) => {
                state.input_manager.release_all(&mut state.events);
            }
            WindowEvent::Touch(touch) => {
                state.touch_bridge.intake_touch(&touch, &mut state.events);
            }
            WindowEvent::RedrawRequested => state.present(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                if state.input_manager.pointer_locked() {
                    state.set_pointer_lock(false);
                } else if cfg!(not(target_family = "wasm")) {
                    event_loop.exit();
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => (),
        }
    }

    /// Handles device-level input events such as mouse motion.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    /// * `_device_id` - ID of the device that generated the event
    /// * `event` - The device event to process
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    /// Called when the application is resumed after being suspended.
    ///
    /// This method triggers the graphics initialization process if the application
    /// is still waiting for its graphics resources.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Handles the graphics initialization event and starts the application.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    /// * `graphics` - The initialized graphics resources
    fn user_event(&mut self, _event_loop: &ActiveEventLoop, graphics: Graphics) {
        self.graphics = MaybeGraphics::Graphics(graphics);
        self.initialize_application_state();
    }

    /// Called before the event loop goes to sleep.
    ///
    /// This method turns the input recorded since the last frame into events, ticks the
    /// engine and requests a redraw to present the new frame.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let now = web_time::Instant::now();
            let wait_dt = now - state.last_wait_time;

            if state.input_manager.emit_events(&mut state.events) {
                let locked = state.input_manager.pointer_locked();
                state.set_pointer_lock(!locked);
            }

            state.engine_state.tick(wait_dt.as_secs_f32(), &mut state.events);

            state.last_wait_time = now;
            state.window.request_redraw();
        }
    }
}

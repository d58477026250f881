//! # Input Manager
//!
//! This module turns window and device events into [`InputEvent`]s:
//! - Keyboard state tracking with per-frame transitions
//! - Click capture relative to the center of the window
//! - Pointer movement while the pointer is locked
//! - Mouse wheel steps for the block type selection
//!
//! Raw events are only recorded when they arrive. [`InputManager::emit_events`] converts the
//! recorded state into events once per frame.

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{
    ClickButton, InputEvent, KeyBinding, ProcessedInputState, RawInputState, KEY_BINDINGS,
};
use crate::core::EventQueue;

/// Pixel scroll distance that counts as one wheel step.
const PIXELS_PER_SCROLL_STEP: f64 = 50.0;

/// Manages the state of all input devices and processes input events.
///
/// This struct maintains the current state of keyboard and mouse inputs
/// and provides methods to process input events from the windowing system.
pub struct InputManager {
    /// Previous state of all bound keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all bound keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,

    /// Accumulated pointer movement since the last frame
    mouse_delta: Option<(f64, f64)>,
    /// Accumulated wheel movement in steps; fractional pixel scrolling carries over
    scroll: f64,
    /// Clicks recorded since the last frame, relative to the window center
    clicks: Vec<(ClickButton, f32, f32)>,

    cursor_position: (f64, f64),
    window_size: (u32, u32),
    pointer_locked: bool,
}

impl InputManager {
    /// Creates a new InputManager with default state.
    ///
    /// Initializes all bound keyboard keys to 'released' state.
    ///
    /// # Arguments
    /// * `window_size` - Inner size of the window in physical pixels
    ///
    /// # Returns
    /// A new `InputManager` instance with default state.
    pub fn new(window_size: (u32, u32)) -> Self {
        let mut keyboard_inputs_old = HashMap::new();
        let mut keyboard_inputs_new = HashMap::new();
        for (key_code, _) in KEY_BINDINGS {
            keyboard_inputs_old.insert(key_code, false);
            keyboard_inputs_new.insert(key_code, false);
        }

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_delta: None,
            scroll: 0.0,
            clicks: Vec::new(),
            cursor_position: (window_size.0 as f64 / 2.0, window_size.1 as f64 / 2.0),
            window_size,
            pointer_locked: false,
        }
    }

    /// Updates the old state with the current state to prepare for the next frame.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.set_key(*key, *state == ElementState::Pressed),
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.scroll += *y as f64,
                MouseScrollDelta::PixelDelta(position) => {
                    self.scroll += position.y / PIXELS_PER_SCROLL_STEP
                }
            },
            WindowEvent::MouseInput {
                button,
                state: ElementState::Pressed,
                ..
            } => {
                if let Some(click) = ClickButton::from_mouse(*button) {
                    self.record_click(click);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = (position.x, position.y);
            }
            WindowEvent::Resized(size) => {
                self.window_size = (size.width, size.height);
            }
            _ => {}
        }
    }

    /// Records whether a bound key is down. Unbound keys are ignored.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
        }
    }

    /// Accumulates the pointer movement delta.
    ///
    /// # Arguments
    /// * `delta` - The (x, y) delta of mouse movement since the last update
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (x, y) = self.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    /// Records a click at the cursor, or at the center while the pointer is locked.
    pub fn record_click(&mut self, button: ClickButton) {
        let (x, y) = if self.pointer_locked {
            (0.0, 0.0)
        } else {
            (
                (self.cursor_position.0 - self.window_size.0 as f64 / 2.0) as f32,
                (self.cursor_position.1 - self.window_size.1 as f64 / 2.0) as f32,
            )
        };
        self.clicks.push((button, x, y));
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Creates a processed input state from the current raw boolean states.
    ///
    /// # Returns
    /// A new `ProcessedInputState` with processed input states.
    pub fn create_processed_input_state(&mut self) -> ProcessedInputState {
        let mut keyboard_states = HashMap::new();
        for (key, &new_state) in self.keyboard_inputs_new.iter() {
            let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
            keyboard_states.insert(*key, RawInputState::from_raw_states(old_state, new_state));
        }

        let scroll_steps = self.scroll.trunc();
        self.scroll -= scroll_steps;

        ProcessedInputState {
            keyboard_states,
            mouse_delta: self.mouse_delta,
            scroll_steps: scroll_steps as i32,
        }
    }

    /// Converts the input recorded since the last frame into events and resets it.
    ///
    /// # Arguments
    /// * `queue` - Queue the engine drains at the start of its next tick
    ///
    /// # Returns
    /// `true` if the pointer lock key was pressed; locking is up to the window owner, which
    /// reports the outcome with [`InputManager::set_pointer_locked`].
    pub fn emit_events(&mut self, queue: &mut EventQueue<InputEvent>) -> bool {
        let processed = self.create_processed_input_state();
        let mut toggle_pointer_lock = false;

        for (key, binding) in KEY_BINDINGS {
            let state = processed.get_key_state(key);
            match binding {
                KeyBinding::Intent(intent) => {
                    if state.is_just_pressed() {
                        queue.push(InputEvent::IntentPressed(intent));
                    } else if state.is_just_released() {
                        queue.push(InputEvent::IntentReleased(intent));
                    }
                }
                _ if !state.is_just_pressed() => {}
                KeyBinding::Toggle(toggle) => queue.push(InputEvent::Toggle(toggle)),
                KeyBinding::Slot(slot) => queue.push(InputEvent::SelectSlot(slot)),
                KeyBinding::Save => queue.push(InputEvent::Save),
                KeyBinding::Load => queue.push(InputEvent::Load),
                KeyBinding::PointerLock => toggle_pointer_lock = true,
            }
        }

        if self.pointer_locked {
            if let Some((dx, dy)) = processed.get_mouse_delta() {
                queue.push(InputEvent::Look {
                    dx: dx as f32,
                    dy: dy as f32,
                });
            }
        }

        // Scrolling up moves back through the catalog.
        if processed.scroll_steps != 0 {
            queue.push(InputEvent::SelectStep(-processed.scroll_steps));
        }

        queue.extend(
            self.clicks
                .drain(..)
                .map(|(button, x, y)| InputEvent::Click { button, x, y }),
        );

        self.reset_inputs();
        toggle_pointer_lock
    }

    /// Marks every key as released and queues a release of all held intents.
    ///
    /// Used when the window loses focus, so no key stays stuck down.
    pub fn release_all(&mut self, queue: &mut EventQueue<InputEvent>) {
        for state in self
            .keyboard_inputs_new
            .values_mut()
            .chain(self.keyboard_inputs_old.values_mut())
        {
            *state = false;
        }
        self.clicks.clear();
        self.mouse_delta = None;
        queue.push(InputEvent::ReleaseAll);
    }

    /// Resets the per-frame input state.
    pub fn reset_inputs(&mut self) {
        self.move_old_states();
        self.mouse_delta = None;
    }
}

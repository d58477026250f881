//! # Input State
//!
//! This module defines the input vocabulary shared by the input sources and the engine.
//!
//! Window and touch callbacks never touch engine state. They translate raw device input into
//! [`InputEvent`]s and queue them; the engine drains the queue once at the start of each tick.
//!
//! ## Key Components
//! - `RawInputState`: per-frame transition of a key or button
//! - `Intent`: a held movement or look input
//! - `Toggle`: a one-shot engine switch
//! - `InputEvent`: everything the engine consumes

use std::collections::HashMap;

use winit::{event::MouseButton, keyboard::KeyCode};

/// Represents the state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Determines if the input was just released this frame
    pub fn is_just_released(&self) -> bool {
        matches!(self, RawInputState::Released)
    }

    /// Updates the input state based on the previous and current raw states
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// A movement or look input that stays on while its key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    LookUp,
    LookDown,
    Jump,
    FlyUp,
    FlyDown,
}

/// A switch flipped once per key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    Gravity,
    Collision,
    RenderMode,
    Hud,
    Minimap,
    PerfGraph,
}

/// What a click does to the clicked block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickButton {
    /// Place the selected block type against the clicked face
    Place,
    /// Remove the clicked block
    Remove,
}

impl ClickButton {
    /// The click action of a mouse button, if it has one.
    pub fn from_mouse(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(ClickButton::Place),
            MouseButton::Right => Some(ClickButton::Remove),
            _ => None,
        }
    }
}

/// An input for the engine to apply at the start of its next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    IntentPressed(Intent),
    IntentReleased(Intent),
    /// Releases every held intent
    ReleaseAll,
    Toggle(Toggle),
    /// Pointer movement in pixels while the pointer is locked
    Look { dx: f32, dy: f32 },
    /// A click at a position relative to the center of the frame
    Click { button: ClickButton, x: f32, y: f32 },
    /// Selects the block type with this id
    SelectSlot(u32),
    /// Moves the block type selection by this many catalog entries
    SelectStep(i32),
    Save,
    Load,
    /// The pointer was locked (`true`) or released (`false`)
    PointerLock(bool),
}

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    Intent(Intent),
    Toggle(Toggle),
    Slot(u32),
    Save,
    Load,
    PointerLock,
}

/// Keyboard layout; every key not listed is ignored.
pub const KEY_BINDINGS: [(KeyCode, KeyBinding); 32] = [
    (KeyCode::KeyW, KeyBinding::Intent(Intent::Forward)),
    (KeyCode::KeyS, KeyBinding::Intent(Intent::Back)),
    (KeyCode::KeyA, KeyBinding::Intent(Intent::StrafeLeft)),
    (KeyCode::KeyD, KeyBinding::Intent(Intent::StrafeRight)),
    (KeyCode::ArrowLeft, KeyBinding::Intent(Intent::TurnLeft)),
    (KeyCode::ArrowRight, KeyBinding::Intent(Intent::TurnRight)),
    (KeyCode::ArrowUp, KeyBinding::Intent(Intent::LookUp)),
    (KeyCode::ArrowDown, KeyBinding::Intent(Intent::LookDown)),
    (KeyCode::Space, KeyBinding::Intent(Intent::Jump)),
    (KeyCode::PageUp, KeyBinding::Intent(Intent::FlyUp)),
    (KeyCode::PageDown, KeyBinding::Intent(Intent::FlyDown)),
    (KeyCode::KeyE, KeyBinding::Intent(Intent::FlyUp)),
    (KeyCode::KeyQ, KeyBinding::Intent(Intent::FlyDown)),
    (KeyCode::KeyG, KeyBinding::Toggle(Toggle::Gravity)),
    (KeyCode::KeyC, KeyBinding::Toggle(Toggle::Collision)),
    (KeyCode::KeyT, KeyBinding::Toggle(Toggle::RenderMode)),
    (KeyCode::KeyH, KeyBinding::Toggle(Toggle::Hud)),
    (KeyCode::KeyM, KeyBinding::Toggle(Toggle::Minimap)),
    (KeyCode::KeyP, KeyBinding::Toggle(Toggle::PerfGraph)),
    (KeyCode::KeyL, KeyBinding::PointerLock),
    (KeyCode::Digit1, KeyBinding::Slot(1)),
    (KeyCode::Digit2, KeyBinding::Slot(2)),
    (KeyCode::Digit3, KeyBinding::Slot(3)),
    (KeyCode::Digit4, KeyBinding::Slot(4)),
    (KeyCode::Digit5, KeyBinding::Slot(5)),
    (KeyCode::Digit6, KeyBinding::Slot(6)),
    (KeyCode::Digit7, KeyBinding::Slot(7)),
    (KeyCode::Digit8, KeyBinding::Slot(8)),
    (KeyCode::Digit9, KeyBinding::Slot(9)),
    (KeyCode::Digit0, KeyBinding::Slot(10)),
    (KeyCode::F5, KeyBinding::Save),
    (KeyCode::F9, KeyBinding::Load),
];

/// Looks up what a key does.
pub fn binding_for(key: KeyCode) -> Option<KeyBinding> {
    KEY_BINDINGS
        .iter()
        .find(|(code, _)| *code == key)
        .map(|(_, binding)| *binding)
}

/// A snapshot of the processed input states with state transitions.
///
/// This struct provides access to the processed state of all input devices,
/// with key and button states translated into RawInputState enum values.
pub struct ProcessedInputState {
    /// Current state of all tracked keyboard keys
    pub keyboard_states: HashMap<KeyCode, RawInputState>,

    /// Mouse movement delta since the last frame (x, y)
    pub mouse_delta: Option<(f64, f64)>,

    /// Whole mouse wheel steps since the last frame; positive scrolls up
    pub scroll_steps: i32,
}

impl ProcessedInputState {
    /// Gets the state of a keyboard key
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// Gets the mouse movement delta since the last frame
    pub fn get_mouse_delta(&self) -> Option<(f64, f64)> {
        self.mouse_delta
    }
}

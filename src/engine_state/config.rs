//! # Engine Configuration
//!
//! Runtime settings for the engine. On native targets they are read from
//! `voxel-canvas.json` in the working directory; every field is optional and falls back to
//! its default. In the browser the defaults are used.
//!
//! Out-of-range values never fail the load: [`EngineConfig::sanitized`] replaces or clamps
//! them and logs a warning.

use serde::{Deserialize, Serialize};

use super::rendering::RenderMode;

/// File the native build reads its configuration from
pub const CONFIG_FILE: &str = "voxel-canvas.json";

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Terrain seed; a random one is picked when absent
    pub seed: Option<i32>,
    /// Initial surface width in pixels
    pub width: u32,
    /// Initial surface height in pixels
    pub height: u32,
    /// Pinhole focal length in pixels
    pub focal_length: f32,
    /// Squared distance beyond which nodes are not drawn
    pub node_render_distance: f32,
    /// First fog checkpoint
    pub fog_start: f32,
    /// Distance between fog checkpoints
    pub fog_step: f32,
    /// No fog layer is drawn at or beyond this checkpoint
    pub fog_limit: f32,
    /// Initial render mode
    pub render_mode: RenderMode,
    pub show_hud: bool,
    pub show_minimap: bool,
    pub show_perf_graph: bool,
    /// Longest frame time, in seconds, the player is advanced by in one tick
    pub max_frame_delta: f32,
    /// Touch drags shorter than this many pixels fire no movement
    pub touch_deadzone: f32,
    /// Radians of rotation per pixel of pointer movement
    pub mouse_sensitivity: f32,
    /// Atlas image path on native targets
    pub atlas_path: String,
    /// Atlas image URL in the browser
    pub atlas_url: String,
    /// Directory native saves are written to
    pub save_dir: String,
    /// Name of the save slot used by the save and load keys
    pub save_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            width: 800,
            height: 600,
            focal_length: 500.0,
            node_render_distance: 100.0,
            fog_start: 50.0,
            fog_step: 20.0,
            fog_limit: 80.0,
            render_mode: RenderMode::Textured,
            show_hud: true,
            show_minimap: false,
            show_perf_graph: false,
            max_frame_delta: 0.25,
            touch_deadzone: 25.0,
            mouse_sensitivity: 0.01,
            atlas_path: String::from("assets/textures/atlas.png"),
            atlas_url: String::from("assets/textures/atlas.png"),
            save_dir: String::from("saves"),
            save_name: String::from("world"),
        }
    }
}

impl EngineConfig {
    /// Loads the configuration for the current platform.
    ///
    /// A missing or malformed file yields the defaults; the result is always sanitized.
    pub fn load() -> Self {
        #[cfg(not(target_family = "wasm"))]
        {
            match std::fs::read_to_string(CONFIG_FILE) {
                Ok(content) => match Self::from_json(&content) {
                    Ok(config) => {
                        log::info!("Loaded configuration from {}", CONFIG_FILE);
                        config.sanitized()
                    }
                    Err(e) => {
                        log::error!("Failed to parse {}: {}", CONFIG_FILE, e);
                        Self::default()
                    }
                },
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
                Err(e) => {
                    log::error!("Failed to read {}: {}", CONFIG_FILE, e);
                    Self::default()
                }
            }
        }

        #[cfg(target_family = "wasm")]
        {
            Self::default()
        }
    }

    /// Parses a configuration document. Missing fields take their defaults.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// The seed to generate the world with.
    pub fn resolved_seed(&self) -> i32 {
        self.seed.unwrap_or_else(|| fastrand::i32(0..i32::MAX))
    }

    /// Returns a copy with every numeric field in its legal range.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.width == 0 {
            log::warn!("width must be positive, using {}", defaults.width);
            self.width = defaults.width;
        }
        if self.height == 0 {
            log::warn!("height must be positive, using {}", defaults.height);
            self.height = defaults.height;
        }

        self.focal_length = positive_or("focal_length", self.focal_length, defaults.focal_length);
        self.node_render_distance = positive_or(
            "node_render_distance",
            self.node_render_distance,
            defaults.node_render_distance,
        );
        self.fog_start = non_negative_or("fog_start", self.fog_start, defaults.fog_start);
        self.fog_step = positive_or("fog_step", self.fog_step, defaults.fog_step);
        self.fog_limit = non_negative_or("fog_limit", self.fog_limit, defaults.fog_limit);
        self.max_frame_delta =
            positive_or("max_frame_delta", self.max_frame_delta, defaults.max_frame_delta);
        if self.max_frame_delta > 1.0 {
            log::warn!("max_frame_delta {} is above one second, clamping", self.max_frame_delta);
            self.max_frame_delta = 1.0;
        }
        self.touch_deadzone =
            non_negative_or("touch_deadzone", self.touch_deadzone, defaults.touch_deadzone);
        self.mouse_sensitivity = positive_or(
            "mouse_sensitivity",
            self.mouse_sensitivity,
            defaults.mouse_sensitivity,
        );

        self
    }
}

fn positive_or(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("{} must be a positive number, got {}, using {}", name, value, default);
        default
    }
}

fn non_negative_or(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("{} must not be negative, got {}, using {}", name, value, default);
        default
    }
}

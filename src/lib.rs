#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Canvas
//!
//! A first-person voxel world drawn by a software rasterizer, running natively in a window or
//! in the browser on a `<canvas>` element.
//!
//! ## Key Modules
//!
//! * `application_state` - Window, surface, input and the application lifecycle
//! * `core` - The event queue between input sources and the engine
//! * `engine_state` - The world, the player, the rasterizer, configuration and persistence
//!
//! ## Architecture
//!
//! The crate keeps a clear separation between:
//! * Platform abstraction (native windows and the browser)
//! * Input translation into queued events
//! * The single-threaded engine tick that owns all world and player state
//! * Software rendering into a `0x00RRGGBB` framebuffer presented with `softbuffer`
//!
//! ## Usage
//!
//! ```no_run
//! // Native application initialization
//! fn main() {
//!     voxel_canvas::run();
//! }
//! ```
//!
//! In the browser, call the exported `run_web()` from JavaScript after the page holding the
//! `<canvas id="voxel-canvas">` element has loaded.

use application_state::{
    graphics_resources_builder::{Graphics, GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};
use engine_state::config::EngineConfig;
#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::wasm_bindgen;

use winit::event_loop::EventLoop;

use log::{error, info};

pub mod application_state;
pub mod core;
pub mod engine_state;

/// Id of the canvas element the browser build draws into.
#[cfg(target_family = "wasm")]
const CANVAS_ID: &str = "voxel-canvas";

/// Builds the application around the loaded configuration.
fn build_application(event_loop: &EventLoop<Graphics>) -> ApplicationState {
    let config = EngineConfig::load();

    #[cfg(not(target_family = "wasm"))]
    let atlas_source = config.atlas_path.clone();
    #[cfg(target_family = "wasm")]
    let atlas_source = config.atlas_url.clone();

    ApplicationState {
        graphics: MaybeGraphics::Builder(GraphicsBuilder::new(
            event_loop.create_proxy(),
            atlas_source,
            (config.width, config.height),
        )),
        state: None,
        config,
    }
}

/// Runs the native application until its window is closed.
#[cfg(not(target_family = "wasm"))]
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create event loop: {}", e);
            return;
        }
    };

    let mut state = build_application(&event_loop);

    if let Err(e) = event_loop.run_app(&mut state) {
        error!("Event loop ended with an error: {}", e);
    }
}

/// Starts the browser application on the page's canvas.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn run_web() {
    use winit::platform::web::EventLoopExtWebSys;

    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if console_log::init_with_level(log::Level::Info).is_ok() {
        info!("Logger initialized");
    }

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create event loop: {}", e);
            return;
        }
    };

    let state = build_application(&event_loop);

    event_loop.spawn_app(state);
}

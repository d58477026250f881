//! Native voxel-canvas binary.
//!
//! Opens a window over a freshly generated world. Settings come from `voxel-canvas.json`
//! in the working directory when it exists; any field left out keeps its default:
//!
//! ```json
//! {
//!     "seed": 1234,
//!     "width": 800,
//!     "height": 600,
//!     "render_mode": "Flat",
//!     "max_frame_delta": 0.25,
//!     "save_dir": "saves"
//! }
//! ```
//!
//! Log output is filtered through `RUST_LOG`, e.g. `RUST_LOG=voxel_canvas=debug`.

fn main() {
    #[cfg(not(target_family = "wasm"))]
    voxel_canvas::run();
}

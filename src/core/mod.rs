//! # Core Module
//!
//! Fundamental types shared by the application shell and the engine.
//!
//! ## Key Components
//! - `EventQueue`: single-writer FIFO that input callbacks push into and the engine tick
//!   drains once, so no state is mutated mid-frame
//!
//! ## Usage
//! ```rust
//! use voxel_canvas::core::EventQueue;
//!
//! let mut queue = EventQueue::new();
//! queue.push("pressed");
//! queue.push("released");
//! let drained: Vec<_> = queue.drain().collect();
//! assert_eq!(drained, ["pressed", "released"]);
//! assert!(queue.is_empty());
//! ```

pub mod event_queue;

pub use event_queue::EventQueue;

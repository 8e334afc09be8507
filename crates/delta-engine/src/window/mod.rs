//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and drives one frame per redraw.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};

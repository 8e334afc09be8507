//! Per-frame command encoding.
//!
//! The encoder owns the frame sequence (acquire, record, pass, draw, submit);
//! backends only translate individual steps into native calls.

mod backend;
mod encoder;
mod pass;

pub use backend::{FrameBackend, FramePipeline, FrameView, WgpuFrameBackend};
pub use encoder::{FrameEncoder, FrameReport, FrameState};
pub use pass::{CLEAR_COLOR, ColorAttachment, DrawCall};

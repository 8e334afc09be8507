//! Setup + per-frame context.
//!
//! Ties the device, surface, shader, pipeline and frame encoder together into
//! one explicit value instead of ambient global state.

mod ctx;

pub use ctx::{RenderContext, ensure_formats_match};

//! Delta engine crate.
//!
//! Sets up a wgpu device and surface, builds the triangle pipeline and
//! submits one draw per frame.

pub mod core;
pub mod device;
pub mod frame;
pub mod logging;
pub mod pipeline;
pub mod shader;
pub mod window;

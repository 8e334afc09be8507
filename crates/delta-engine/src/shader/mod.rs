//! Shader compilation.
//!
//! WGSL source is parsed and validated with naga, its entry points reflected,
//! and only then handed to the device.

mod module;
mod reflect;

pub use module::{EntryPoints, ShaderCompileError, ShaderModule};
pub use reflect::{ColorOutput, EntryPoint, ShaderReflection, ShaderStage};

/// Built-in triangle program: `vs` emits three table positions, `fs` paints red.
pub const TRIANGLE_WGSL: &str = include_str!("triangle.wgsl");

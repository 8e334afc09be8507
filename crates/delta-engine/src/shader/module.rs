use thiserror::Error;

use crate::device::DeviceContext;

use super::{ShaderReflection, ShaderStage};

/// Shader compilation failure with compiler diagnostics.
#[derive(Debug, Clone, Error)]
#[error("shader \"{label}\" failed to compile:\n{diagnostics}")]
pub struct ShaderCompileError {
    pub label: String,
    pub diagnostics: String,
}

/// Vertex and fragment entry point names a module is compiled for.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EntryPoints {
    pub vertex: String,
    pub fragment: String,
}

impl EntryPoints {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Compiled, immutable shader unit.
pub struct ShaderModule {
    label: String,
    module: wgpu::ShaderModule,
    entry_points: EntryPoints,
    reflection: ShaderReflection,
}

impl ShaderModule {
    /// Compiles WGSL source for `device`.
    ///
    /// The source is validated before anything is created on the device, so a
    /// rejected source never yields a partial module.
    pub fn compile(
        device: &DeviceContext,
        label: &str,
        source: &str,
        entry_points: EntryPoints,
    ) -> Result<Self, ShaderCompileError> {
        let reflection = ShaderReflection::from_wgsl(label, source)?;

        for (stage, name) in [
            (ShaderStage::Vertex, &entry_points.vertex),
            (ShaderStage::Fragment, &entry_points.fragment),
        ] {
            if !reflection.has_entry_point(stage, name) {
                log::warn!("shader \"{label}\" declares no {stage:?} entry point \"{name}\"");
            }
        }

        let module = device
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        log::debug!(
            "compiled shader \"{label}\" ({} entry points)",
            reflection.entry_points().len()
        );

        Ok(Self {
            label: label.to_string(),
            module,
            entry_points,
            reflection,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    /// Entry point names this module was compiled for.
    ///
    /// These are the caller's names; check `has_entry_point` before relying on them.
    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry_points
    }

    pub fn reflection(&self) -> &ShaderReflection {
        &self.reflection
    }

    pub fn has_entry_point(&self, stage: ShaderStage, name: &str) -> bool {
        self.reflection.has_entry_point(stage, name)
    }
}

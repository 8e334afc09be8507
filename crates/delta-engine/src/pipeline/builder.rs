use thiserror::Error;

use crate::device::DeviceContext;
use crate::shader::{ColorOutput, ShaderModule, ShaderReflection, ShaderStage};

/// Pipeline construction failure. No pipeline object exists after this.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum PipelineBuildError {
    #[error("shader \"{shader}\" has no {stage:?} entry point named \"{name}\"")]
    MissingEntryPoint {
        shader: String,
        stage: ShaderStage,
        name: String,
    },

    #[error("target format {0:?} cannot be rendered to by this device")]
    UnsupportedTargetFormat(wgpu::TextureFormat),

    #[error("target format {format:?} does not accept fragment output {output:?}")]
    IncompatibleTargetFormat {
        format: wgpu::TextureFormat,
        output: Option<ColorOutput>,
    },

    #[error("device rejected the pipeline: {0}")]
    Backend(String),
}

/// Immutable render pipeline bound to one target format.
///
/// Changing entry points or format means building a new pipeline.
pub struct Pipeline {
    pipeline: wgpu::RenderPipeline,
    vertex_entry: String,
    fragment_entry: String,
    target_format: wgpu::TextureFormat,
}

impl Pipeline {
    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }
}

/// Builds pipelines with the fixed "no vertex buffer" layout policy.
///
/// Geometry is generated in the vertex stage from `@builtin(vertex_index)`;
/// the binding layout is derived from the shader (`layout: None`).
pub struct PipelineBuilder<'a> {
    device: &'a DeviceContext,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(device: &'a DeviceContext) -> Self {
        Self { device }
    }

    pub fn build(
        &self,
        shader: &ShaderModule,
        vertex_entry: &str,
        fragment_entry: &str,
        target_format: wgpu::TextureFormat,
    ) -> Result<Pipeline, PipelineBuildError> {
        check_entry_points(shader.label(), shader.reflection(), vertex_entry, fragment_entry)?;
        let output = shader
            .reflection()
            .entry_point(ShaderStage::Fragment, fragment_entry)
            .and_then(|ep| ep.color_output);
        check_target_format(
            target_format,
            self.device.supports_render_target(target_format),
            output,
        )?;

        let label = format!("delta {} pipeline", shader.label());
        let device = self.device.device();

        // Validation errors past the checks above are returned, not raised.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label.as_str()),
            layout: None,

            vertex: wgpu::VertexState {
                module: shader.module(),
                entry_point: Some(vertex_entry),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: shader.module(),
                entry_point: Some(fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(scope.pop()) {
            log::error!("pipeline \"{label}\" rejected: {err}");
            return Err(PipelineBuildError::Backend(err.to_string()));
        }

        log::debug!("built pipeline \"{label}\" ({vertex_entry}/{fragment_entry} -> {target_format:?})");

        Ok(Pipeline {
            pipeline,
            vertex_entry: vertex_entry.to_string(),
            fragment_entry: fragment_entry.to_string(),
            target_format,
        })
    }
}

pub(crate) fn check_entry_points(
    shader: &str,
    reflection: &ShaderReflection,
    vertex_entry: &str,
    fragment_entry: &str,
) -> Result<(), PipelineBuildError> {
    for (stage, name) in [
        (ShaderStage::Vertex, vertex_entry),
        (ShaderStage::Fragment, fragment_entry),
    ] {
        if !reflection.has_entry_point(stage, name) {
            return Err(PipelineBuildError::MissingEntryPoint {
                shader: shader.to_string(),
                stage,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

pub(crate) fn check_target_format(
    format: wgpu::TextureFormat,
    renderable: bool,
    output: Option<ColorOutput>,
) -> Result<(), PipelineBuildError> {
    if !renderable || format.is_depth_stencil_format() {
        return Err(PipelineBuildError::UnsupportedTargetFormat(format));
    }

    let accepts = match format.sample_type(None, None) {
        Some(wgpu::TextureSampleType::Float { .. }) => Some(ColorOutput::Float),
        Some(wgpu::TextureSampleType::Sint) => Some(ColorOutput::Sint),
        Some(wgpu::TextureSampleType::Uint) => Some(ColorOutput::Uint),
        _ => None,
    };
    if accepts.is_none() || accepts != output {
        return Err(PipelineBuildError::IncompatibleTargetFormat { format, output });
    }
    Ok(())
}

use winit::window::Window;

use crate::device::{
    DeviceContext, DeviceInit, FrameError, SetupError, SurfaceBinder, SurfaceErrorAction,
};
use crate::frame::{FrameEncoder, FrameReport, WgpuFrameBackend};
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::shader::{EntryPoints, ShaderModule, TRIANGLE_WGSL};

/// Everything needed to render the triangle into one window.
///
/// Built once by [`RenderContext::new`]; frames are then driven through
/// [`RenderContext::render_frame`]. Contexts are independent of each other.
///
/// Lifetimes:
/// - `'w` is the window-borrow lifetime carried by the surface
pub struct RenderContext<'w> {
    device: DeviceContext,
    surface: SurfaceBinder<'w>,
    shader: ShaderModule,
    pipeline: Pipeline,
    encoder: FrameEncoder,
}

impl<'w> RenderContext<'w> {
    /// Runs the full setup sequence for `window` with the built-in triangle shader.
    pub async fn new(window: &'w Window, init: &DeviceInit) -> Result<Self, SetupError> {
        let size = window.inner_size();

        let instance = DeviceContext::create_instance(init);
        let surface = instance.create_surface(window)?;
        let device = DeviceContext::acquire(instance, Some(&surface), init).await?;
        let surface = SurfaceBinder::new(surface, size, init);

        Self::assemble(device, surface, TRIANGLE_WGSL, EntryPoints::new("vs", "fs"))
    }

    /// Configures `surface`, compiles `source` and builds the pipeline.
    ///
    /// The preferred surface format is used both for configuration and as the
    /// pipeline target; any disagreement fails here, before the first frame.
    pub fn assemble(
        device: DeviceContext,
        mut surface: SurfaceBinder<'w>,
        source: &str,
        entry_points: EntryPoints,
    ) -> Result<Self, SetupError> {
        let format = surface.preferred_format(&device)?;
        surface.configure(&device, format)?;

        let shader = ShaderModule::compile(&device, "triangle", source, entry_points)?;
        let pipeline = PipelineBuilder::new(&device).build(
            &shader,
            &shader.entry_points().vertex,
            &shader.entry_points().fragment,
            format,
        )?;

        ensure_formats_match(format, surface.format(), pipeline.target_format())?;
        log::info!("render context ready ({format:?})");

        Ok(Self {
            device,
            surface,
            shader,
            pipeline,
            encoder: FrameEncoder::new(),
        })
    }

    pub fn device(&self) -> &DeviceContext {
        &self.device
    }

    pub fn surface(&self) -> &SurfaceBinder<'w> {
        &self.surface
    }

    pub fn shader(&self) -> &ShaderModule {
        &self.shader
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn encoder(&self) -> &FrameEncoder {
        &self.encoder
    }

    /// Encodes and submits one frame to the surface.
    pub fn render_frame(&mut self) -> Result<FrameReport, FrameError> {
        let mut backend = WgpuFrameBackend::new(&self.device, &mut self.surface);
        self.encoder.encode(&mut backend, &self.pipeline)
    }

    /// Applies the default recovery policy for a failed frame.
    pub fn recover(&self, err: &FrameError) -> SurfaceErrorAction {
        self.surface.recover(&self.device, err)
    }
}

/// Checks that the preferred, configured and pipeline formats agree.
pub fn ensure_formats_match(
    preferred: wgpu::TextureFormat,
    configured: Option<wgpu::TextureFormat>,
    pipeline: wgpu::TextureFormat,
) -> Result<(), SetupError> {
    let Some(configured) = configured else {
        return Err(SetupError::UnsupportedFormat {
            requested: Some(preferred),
            supported: Vec::new(),
        });
    };
    for found in [configured, pipeline] {
        if found != preferred {
            return Err(SetupError::FormatMismatch {
                expected: preferred,
                found,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    #[test]
    fn matching_formats_pass() {
        assert!(ensure_formats_match(F::Bgra8UnormSrgb, Some(F::Bgra8UnormSrgb), F::Bgra8UnormSrgb).is_ok());
    }

    #[test]
    fn pipeline_format_mismatch_is_rejected() {
        let err = ensure_formats_match(F::Bgra8UnormSrgb, Some(F::Bgra8UnormSrgb), F::Rgba8Unorm)
            .unwrap_err();
        assert!(matches!(
            err,
            SetupError::FormatMismatch { expected: F::Bgra8UnormSrgb, found: F::Rgba8Unorm }
        ));
    }

    #[test]
    fn configured_format_mismatch_is_rejected() {
        let err = ensure_formats_match(F::Bgra8UnormSrgb, Some(F::Rgba8UnormSrgb), F::Bgra8UnormSrgb)
            .unwrap_err();
        assert!(matches!(err, SetupError::FormatMismatch { found: F::Rgba8UnormSrgb, .. }));
    }

    #[test]
    fn unconfigured_surface_is_rejected() {
        assert!(ensure_formats_match(F::Bgra8Unorm, None, F::Bgra8Unorm).is_err());
    }
}

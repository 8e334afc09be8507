use super::{DeviceContext, FrameError, TargetSource, TargetView};

/// Offscreen render target producing a new texture per acquisition.
///
/// Used for headless rendering (tests, captures). Nothing is presented.
pub struct OffscreenTarget {
    device: wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    /// Texture behind the most recently acquired view, kept for readback.
    last: Option<wgpu::Texture>,
}

impl OffscreenTarget {
    pub fn new(device: &DeviceContext, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        Self {
            device: device.device().clone(),
            format,
            width: width.max(1),
            height: height.max(1),
            last: None,
        }
    }

    /// Size of each acquired texture in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Texture behind the last acquired view. Created with `COPY_SRC`.
    pub fn last_texture(&self) -> Option<&wgpu::Texture> {
        self.last.as_ref()
    }
}

impl TargetSource for OffscreenTarget {
    fn target_format(&self) -> Option<wgpu::TextureFormat> {
        Some(self.format)
    }

    fn current_target_view(&mut self) -> Result<TargetView, FrameError> {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("delta offscreen target"),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.last = Some(texture);

        Ok(TargetView::new(self.format, view, None))
    }
}

use winit::dpi::PhysicalSize;

use super::{
    DeviceContext, DeviceInit, FrameError, SetupError, SurfaceErrorAction, TargetSource, TargetView,
};

/// Binds a native drawable to a device and pixel format.
///
/// The surface starts unconfigured; `configure` must succeed before any target
/// view can be requested.
pub struct SurfaceBinder<'w> {
    /// Surface bound to the window.
    ///
    /// Surface lifetime is tied to the window; the window must outlive the binder.
    surface: wgpu::Surface<'w>,

    /// Surface preferences (format policy, present/alpha mode, latency).
    init: DeviceInit,

    /// Drawable size in physical pixels. Fixed for the binder's lifetime.
    size: PhysicalSize<u32>,

    /// Active configuration; `None` until `configure` succeeds.
    config: Option<wgpu::SurfaceConfiguration>,
}

impl<'w> SurfaceBinder<'w> {
    pub fn new(surface: wgpu::Surface<'w>, size: PhysicalSize<u32>, init: &DeviceInit) -> Self {
        Self {
            surface,
            init: init.clone(),
            size,
            config: None,
        }
    }

    /// Returns the underlying wgpu surface.
    pub fn surface(&self) -> &wgpu::Surface<'w> {
        &self.surface
    }

    /// Returns the drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Returns the configured format, if configured.
    pub fn format(&self) -> Option<wgpu::TextureFormat> {
        self.config.as_ref().map(|c| c.format)
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Picks the presentation format this surface should be configured with.
    ///
    /// The same format must be used for `configure` and as the pipeline target.
    pub fn preferred_format(
        &self,
        device: &DeviceContext,
    ) -> Result<wgpu::TextureFormat, SetupError> {
        let caps = self.surface.get_capabilities(device.adapter());
        choose_surface_format(&caps.formats, self.init.prefer_srgb).ok_or(
            SetupError::UnsupportedFormat {
                requested: None,
                supported: caps.formats,
            },
        )
    }

    /// Configures the surface for `device` with `format`.
    ///
    /// `format` must be the one `preferred_format` returns. Re-applying the
    /// current format is allowed; switching to a different format after
    /// configuration is rejected.
    pub fn configure(
        &mut self,
        device: &DeviceContext,
        format: wgpu::TextureFormat,
    ) -> Result<(), SetupError> {
        if let Some(current) = self.format() {
            if current != format {
                return Err(SetupError::FormatMismatch {
                    expected: current,
                    found: format,
                });
            }
        }

        let caps = self.surface.get_capabilities(device.adapter());
        check_configure_format(&caps.formats, self.init.prefer_srgb, format)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: self.size.width.max(1),
            height: self.size.height.max(1),
            present_mode: self.init.present_mode,
            alpha_mode: choose_alpha_mode(&caps.alpha_modes, self.init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: self.init.desired_maximum_frame_latency,
        };

        self.surface.configure(device.device(), &config);
        log::info!(
            "surface configured: {:?} {}x{} ({:?})",
            config.format,
            config.width,
            config.height,
            config.present_mode
        );

        self.config = Some(config);
        Ok(())
    }

    /// Re-applies the active configuration (same format and size).
    pub fn reconfigure(&self, device: &DeviceContext) {
        if let Some(config) = self.config.as_ref() {
            self.surface.configure(device.device(), config);
        }
    }

    /// Converts a frame error into a recovery action, reconfiguring when needed.
    ///
    /// This is a caller policy; the frame encoder itself never retries.
    pub fn recover(&self, device: &DeviceContext, err: &FrameError) -> SurfaceErrorAction {
        if err.is_fatal() {
            return SurfaceErrorAction::Fatal;
        }
        if err.needs_reconfigure() && self.is_configured() {
            self.reconfigure(device);
            return SurfaceErrorAction::Reconfigured;
        }
        SurfaceErrorAction::SkipFrame
    }
}

impl TargetSource for SurfaceBinder<'_> {
    fn target_format(&self) -> Option<wgpu::TextureFormat> {
        self.format()
    }

    fn current_target_view(&mut self) -> Result<TargetView, FrameError> {
        let Some(config) = self.config.as_ref() else {
            return Err(FrameError::SurfaceNotConfigured);
        };

        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(TargetView::new(config.format, view, Some(surface_texture)))
    }
}

pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if formats.contains(&f) {
                return Some(f);
            }
        }
    }

    formats.first().copied()
}

/// Accepts `format` only if it is supported and is the preferred choice.
pub(crate) fn check_configure_format(
    supported: &[wgpu::TextureFormat],
    prefer_srgb: bool,
    format: wgpu::TextureFormat,
) -> Result<(), SetupError> {
    if !supported.contains(&format) {
        return Err(SetupError::UnsupportedFormat {
            requested: Some(format),
            supported: supported.to_vec(),
        });
    }
    match choose_surface_format(supported, prefer_srgb) {
        Some(preferred) if preferred != format => Err(SetupError::FormatMismatch {
            expected: preferred,
            found: format,
        }),
        _ => Ok(()),
    }
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

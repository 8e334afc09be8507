use std::sync::atomic::{AtomicU64, Ordering};

use super::FrameError;

/// Process-unique identity of an acquired target view.
///
/// Two acquisitions never share an id, even when they wrap the same swapchain image.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

impl ViewId {
    pub(crate) fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value (for logging).
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Represents a single acquired drawable.
///
/// This object is short-lived and valid only for the frame that acquired it.
/// Holding a surface texture prevents acquisition of subsequent frames.
pub struct TargetView {
    id: ViewId,
    format: wgpu::TextureFormat,
    view: wgpu::TextureView,
    surface_texture: Option<wgpu::SurfaceTexture>,
}

impl TargetView {
    pub(crate) fn new(
        format: wgpu::TextureFormat,
        view: wgpu::TextureView,
        surface_texture: Option<wgpu::SurfaceTexture>,
    ) -> Self {
        Self {
            id: ViewId::next(),
            format,
            view,
            surface_texture,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Presents the underlying surface texture, if any.
    ///
    /// Must only be called after the frame's commands were submitted. Dropping a
    /// view without presenting discards the texture instead.
    pub fn present(self) {
        if let Some(surface_texture) = self.surface_texture {
            surface_texture.present();
        }
    }
}

/// Something that yields a fresh render target every frame.
pub trait TargetSource {
    /// The configured target format, or `None` while unconfigured.
    fn target_format(&self) -> Option<wgpu::TextureFormat>;

    /// Acquires the drawable for the current frame.
    ///
    /// Each call invalidates the view returned by the previous call.
    fn current_target_view(&mut self) -> Result<TargetView, FrameError>;
}

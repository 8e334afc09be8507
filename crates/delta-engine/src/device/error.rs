use thiserror::Error;

use crate::pipeline::PipelineBuildError;
use crate::shader::ShaderCompileError;

use super::frame::ViewId;

/// Failure during one-shot setup (device, surface, shader, pipeline).
///
/// Every variant is fatal: setup stops at the first error.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no capable GPU device: {0}")]
    NoCapableDevice(String),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("surface format {requested:?} is not supported (supported: {supported:?})")]
    UnsupportedFormat {
        requested: Option<wgpu::TextureFormat>,
        supported: Vec<wgpu::TextureFormat>,
    },

    #[error("format mismatch: expected {expected:?}, found {found:?}")]
    FormatMismatch {
        expected: wgpu::TextureFormat,
        found: wgpu::TextureFormat,
    },

    #[error(transparent)]
    ShaderCompile(#[from] ShaderCompileError),

    #[error(transparent)]
    PipelineBuild(#[from] PipelineBuildError),
}

/// Failure while encoding a single frame.
///
/// A frame error aborts only the current frame; nothing is submitted.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("surface is not configured")]
    SurfaceNotConfigured,

    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("target view {0:?} was already used by a previous frame")]
    StaleTargetView(ViewId),

    #[error("target view format {view:?} does not match pipeline format {pipeline:?}")]
    FormatMismatch {
        view: wgpu::TextureFormat,
        pipeline: wgpu::TextureFormat,
    },
}

/// High-level response after a frame error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

impl FrameError {
    /// Whether the surface should be reconfigured before the next frame.
    pub fn needs_reconfigure(&self) -> bool {
        matches!(
            self,
            FrameError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
        )
    }

    /// Whether rendering cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FrameError::Surface(wgpu::SurfaceError::OutOfMemory)
                | FrameError::FormatMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_and_outdated_need_reconfigure() {
        assert!(FrameError::Surface(wgpu::SurfaceError::Lost).needs_reconfigure());
        assert!(FrameError::Surface(wgpu::SurfaceError::Outdated).needs_reconfigure());
        assert!(!FrameError::Surface(wgpu::SurfaceError::Timeout).needs_reconfigure());
        assert!(!FrameError::SurfaceNotConfigured.needs_reconfigure());
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert!(FrameError::Surface(wgpu::SurfaceError::OutOfMemory).is_fatal());
        assert!(!FrameError::Surface(wgpu::SurfaceError::Timeout).is_fatal());
        assert!(!FrameError::SurfaceNotConfigured.is_fatal());
    }

    #[test]
    fn format_mismatch_is_fatal() {
        let err = FrameError::FormatMismatch {
            view: wgpu::TextureFormat::Rgba8Unorm,
            pipeline: wgpu::TextureFormat::Bgra8Unorm,
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn setup_error_messages_name_the_formats() {
        let err = SetupError::FormatMismatch {
            expected: wgpu::TextureFormat::Bgra8UnormSrgb,
            found: wgpu::TextureFormat::Rgba8Unorm,
        };
        let msg = err.to_string();
        assert!(msg.contains("Bgra8UnormSrgb"), "{msg}");
        assert!(msg.contains("Rgba8Unorm"), "{msg}");
    }
}

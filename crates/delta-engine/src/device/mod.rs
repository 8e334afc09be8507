//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - handing out per-frame target views

mod context;
mod error;
mod frame;
mod init;
mod offscreen;
mod surface;

pub use context::DeviceContext;
pub use error::{FrameError, SetupError, SurfaceErrorAction};
pub use frame::{TargetSource, TargetView, ViewId};
pub use init::DeviceInit;
pub use offscreen::OffscreenTarget;
pub use surface::SurfaceBinder;

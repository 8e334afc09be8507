use crate::device::{DeviceContext, FrameError, TargetSource, TargetView, ViewId};
use crate::pipeline::Pipeline;

use super::{ColorAttachment, DrawCall};

/// A view the frame encoder can render into.
pub trait FrameView {
    fn id(&self) -> ViewId;
    fn format(&self) -> wgpu::TextureFormat;
}

/// A pipeline the frame encoder can bind.
pub trait FramePipeline {
    fn target_format(&self) -> wgpu::TextureFormat;
}

/// Command primitives the frame encoder sequences.
///
/// Each method maps onto one native call; ordering is owned by
/// [`super::FrameEncoder`], not by implementations.
pub trait FrameBackend {
    type View: FrameView;
    type Pipeline: FramePipeline;
    type Recording;
    type Pass;
    type Commands;

    fn acquire_view(&mut self) -> Result<Self::View, FrameError>;
    fn begin_recording(&mut self) -> Self::Recording;
    fn begin_pass(
        &mut self,
        recording: &mut Self::Recording,
        view: &Self::View,
        attachment: &ColorAttachment,
    ) -> Self::Pass;
    fn set_pipeline(&mut self, pass: &mut Self::Pass, pipeline: &Self::Pipeline);
    fn draw(&mut self, pass: &mut Self::Pass, draw: DrawCall);
    fn end_pass(&mut self, pass: Self::Pass);
    fn finish(&mut self, recording: Self::Recording) -> Self::Commands;
    fn submit(&mut self, commands: Self::Commands);
    fn present(&mut self, view: Self::View);
}

impl FrameView for TargetView {
    fn id(&self) -> ViewId {
        TargetView::id(self)
    }

    fn format(&self) -> wgpu::TextureFormat {
        TargetView::format(self)
    }
}

impl FramePipeline for Pipeline {
    fn target_format(&self) -> wgpu::TextureFormat {
        Pipeline::target_format(self)
    }
}

/// wgpu implementation over a device and any target source.
pub struct WgpuFrameBackend<'a, S: TargetSource> {
    device: &'a DeviceContext,
    target: &'a mut S,
}

impl<'a, S: TargetSource> WgpuFrameBackend<'a, S> {
    pub fn new(device: &'a DeviceContext, target: &'a mut S) -> Self {
        Self { device, target }
    }
}

impl<S: TargetSource> FrameBackend for WgpuFrameBackend<'_, S> {
    type View = TargetView;
    type Pipeline = Pipeline;
    type Recording = wgpu::CommandEncoder;
    type Pass = wgpu::RenderPass<'static>;
    type Commands = wgpu::CommandBuffer;

    fn acquire_view(&mut self) -> Result<TargetView, FrameError> {
        self.target.current_target_view()
    }

    fn begin_recording(&mut self) -> wgpu::CommandEncoder {
        self.device
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("delta frame encoder"),
            })
    }

    fn begin_pass(
        &mut self,
        recording: &mut wgpu::CommandEncoder,
        view: &TargetView,
        attachment: &ColorAttachment,
    ) -> wgpu::RenderPass<'static> {
        recording
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("delta triangle pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: view.view(),
                    resolve_target: None,
                    ops: attachment.operations(),
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            // The pass is ended explicitly before `finish`.
            .forget_lifetime()
    }

    fn set_pipeline(&mut self, pass: &mut wgpu::RenderPass<'static>, pipeline: &Pipeline) {
        pass.set_pipeline(pipeline.raw());
    }

    fn draw(&mut self, pass: &mut wgpu::RenderPass<'static>, draw: DrawCall) {
        pass.draw(0..draw.vertex_count, 0..draw.instance_count);
    }

    fn end_pass(&mut self, pass: wgpu::RenderPass<'static>) {
        drop(pass);
    }

    fn finish(&mut self, recording: wgpu::CommandEncoder) -> wgpu::CommandBuffer {
        recording.finish()
    }

    fn submit(&mut self, commands: wgpu::CommandBuffer) {
        self.device.queue().submit(std::iter::once(commands));
    }

    fn present(&mut self, view: TargetView) {
        view.present();
    }
}

use crate::device::{FrameError, ViewId};

use super::{ColorAttachment, DrawCall, FrameBackend, FramePipeline, FrameView};

/// Per-frame encoding state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameState {
    Idle,
    ViewAcquired,
    Encoding,
    PassOpen,
    PassClosed,
    Submitted,
}

/// Summary of one submitted frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameReport {
    /// Zero-based index among successfully submitted frames.
    pub frame_index: u64,
    /// View the frame was rendered into.
    pub view: ViewId,
    /// The single draw issued by the frame.
    pub draw: DrawCall,
}

/// Records and submits the triangle frame.
///
/// Each `encode` call runs the full acquire/record/submit sequence; a failure
/// before submission returns to `Idle` with nothing submitted and the view
/// discarded.
#[derive(Debug)]
pub struct FrameEncoder {
    state: FrameState,
    attachment: ColorAttachment,
    draw: DrawCall,
    last_view: Option<ViewId>,
    frames_submitted: u64,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self {
            state: FrameState::Idle,
            attachment: ColorAttachment::default(),
            draw: DrawCall::TRIANGLE,
            last_view: None,
            frames_submitted: 0,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Number of frames submitted so far.
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    pub fn attachment(&self) -> &ColorAttachment {
        &self.attachment
    }

    /// Encodes and submits one frame.
    ///
    /// Returns with the encoder back in `Idle` whether or not the frame was submitted.
    pub fn encode<B: FrameBackend>(
        &mut self,
        backend: &mut B,
        pipeline: &B::Pipeline,
    ) -> Result<FrameReport, FrameError> {
        let result = self.run(backend, pipeline);
        self.state = FrameState::Idle;

        if let Err(e) = &result {
            log::debug!("frame {} aborted: {e}", self.frames_submitted);
        }
        result
    }

    fn run<B: FrameBackend>(
        &mut self,
        backend: &mut B,
        pipeline: &B::Pipeline,
    ) -> Result<FrameReport, FrameError> {
        let view = backend.acquire_view()?;
        self.advance(FrameState::ViewAcquired);

        let view_id = view.id();
        if self.last_view == Some(view_id) {
            return Err(FrameError::StaleTargetView(view_id));
        }
        if view.format() != pipeline.target_format() {
            return Err(FrameError::FormatMismatch {
                view: view.format(),
                pipeline: pipeline.target_format(),
            });
        }

        let mut recording = backend.begin_recording();
        self.advance(FrameState::Encoding);

        let mut pass = backend.begin_pass(&mut recording, &view, &self.attachment);
        self.advance(FrameState::PassOpen);

        backend.set_pipeline(&mut pass, pipeline);
        backend.draw(&mut pass, self.draw);

        backend.end_pass(pass);
        self.advance(FrameState::PassClosed);

        let commands = backend.finish(recording);
        backend.submit(commands);
        self.advance(FrameState::Submitted);

        backend.present(view);

        let report = FrameReport {
            frame_index: self.frames_submitted,
            view: view_id,
            draw: self.draw,
        };
        self.last_view = Some(view_id);
        self.frames_submitted += 1;

        log::trace!("frame {} submitted (view {})", report.frame_index, view_id.get());
        Ok(report)
    }

    fn advance(&mut self, next: FrameState) {
        log::trace!("frame state {:?} -> {next:?}", self.state);
        self.state = next;
    }
}

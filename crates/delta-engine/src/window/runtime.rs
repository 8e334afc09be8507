use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::RenderContext;
use crate::device::{DeviceInit, SurfaceErrorAction};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "delta".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, sets up rendering and draws until the window closes.
    ///
    /// Setup failures and fatal frame errors end the loop and are returned.
    pub fn run(config: RuntimeConfig, init: DeviceInit) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, init);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    ctx: RenderContext<'this>,
}

struct AppState {
    config: RuntimeConfig,
    init: DeviceInit,

    entry: Option<WindowEntry>,
    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl AppState {
    fn new(config: RuntimeConfig, init: DeviceInit) -> Self {
        Self {
            config,
            init,
            entry: None,
            fatal: None,
            exit_requested: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let init = self.init.clone();

        // Setup runs to completion before the first frame is requested.
        let entry = WindowEntryTryBuilder {
            window,
            ctx_builder: |w| pollster::block_on(RenderContext::new(w, &init)),
        }
        .try_build()
        .context("render setup failed")?;

        Ok(entry)
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        entry.with_window(|w| w.pre_present_notify());

        let outcome = entry.with_ctx_mut(|ctx| match ctx.render_frame() {
            Ok(_) => None,
            Err(err) => Some((ctx.recover(&err), err)),
        });

        match outcome {
            None => {}
            Some((SurfaceErrorAction::Fatal, err)) => {
                self.fail(event_loop, anyhow::Error::new(err).context("fatal frame error"));
            }
            Some((SurfaceErrorAction::Reconfigured, err)) => {
                log::warn!("frame skipped, surface reconfigured: {err}");
            }
            Some((SurfaceErrorAction::SkipFrame, err)) => {
                log::warn!("frame skipped: {err}");
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; pacing comes from the surface present mode.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let ours = self
            .entry
            .as_ref()
            .is_some_and(|e| e.with_window(|w| w.id()) == window_id);
        if !ours {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => self.render(event_loop),

            _ => {}
        }
    }
}

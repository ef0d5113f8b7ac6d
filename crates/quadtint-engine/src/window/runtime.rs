use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Redraw every frame; otherwise only on resize and expose.
    pub continuous: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "quadtint".to_string(),
            initial_size: LogicalSize::new(960.0, 720.0),
            continuous: true,
        }
    }
}

/// Requests from the application, applied after the current callback.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
    error: Option<anyhow::Error>,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }

    /// Stops the loop and makes `Runtime::run` return `err`. Only the first
    /// failure is kept.
    pub fn fail(&mut self, err: anyhow::Error) {
        self.exit = true;
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }

    /// Folds the result of [`App::on_frame`](crate::core::App::on_frame) into
    /// the pending requests.
    fn settle(&mut self, outcome: Result<AppControl>) {
        match outcome {
            Ok(AppControl::Continue) => {}
            Ok(AppControl::Exit) => self.exit(),
            Err(err) => self.fail(err),
        }
    }
}

pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until it exits or the window closes.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            error: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    window: Option<WindowEntry>,
    exit_requested: bool,
    /// First failure from setup or a frame; returned from `Runtime::run`.
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        self.exit_requested = true;
        event_loop.exit();
    }

    fn redraw(&mut self, window_id: WindowId) -> RuntimeCtx {
        let mut runtime_ctx = RuntimeCtx::default();
        let (app, Some(entry)) = (&mut self.app, self.window.as_mut()) else {
            return runtime_ctx;
        };

        entry.with_mut(|fields| {
            let time = fields.clock.tick();
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                time,
                runtime: &mut runtime_ctx,
            };
            let outcome = app.on_frame(&mut ctx);
            ctx.runtime.settle(outcome);
        });
        runtime_ctx
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);
        if self.config.continuous {
            if let Some(entry) = &self.window {
                entry.with_window(|w| w.request_redraw());
            }
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

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.window = None;
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    log::debug!("resized to {}x{}", new_size.width, new_size.height);
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::Occluded(false) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_clock_mut(|c| c.reset());
                }
            }

            WindowEvent::RedrawRequested => {
                let mut requests = self.redraw(window_id);
                if let Some(err) = requests.error.take() {
                    self.fail(event_loop, err.context("frame failed"));
                } else if requests.exit {
                    self.exit_requested = true;
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn continue_leaves_the_loop_running() {
        let mut ctx = RuntimeCtx::default();
        ctx.settle(Ok(AppControl::Continue));
        assert!(!ctx.exit_requested());
        assert!(ctx.error.is_none());
    }

    #[test]
    fn exit_is_a_clean_stop() {
        let mut ctx = RuntimeCtx::default();
        ctx.settle(Ok(AppControl::Exit));
        assert!(ctx.exit_requested());
        assert!(ctx.error.is_none());
    }

    #[test]
    fn frame_error_stops_and_is_kept_for_run() {
        let mut ctx = RuntimeCtx::default();
        ctx.settle(Err(anyhow!("shader rejected")));
        ctx.settle(Err(anyhow!("second failure")));
        assert!(ctx.exit_requested());
        let err = ctx.error.take().expect("error recorded");
        assert_eq!(err.to_string(), "shader rejected");
    }

    #[test]
    fn explicit_fail_overrides_a_continue() {
        let mut ctx = RuntimeCtx::default();
        ctx.fail(anyhow!("texture upload failed"));
        ctx.settle(Ok(AppControl::Continue));
        assert!(ctx.exit_requested());
        assert!(ctx.error.is_some());
    }
}

//! Viewer application: owns the window, the GPU state and the camera input,
//! and drives one frame per redraw.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use corelib::{
    DVec2,
    config::ViewerConfig,
    input::{self, InputHandler, InputReaction},
    timing::{FpsCounter, fps_title},
};
use renderer::GpuState;
use wgpu::SurfaceError;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{
        DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
    },
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::assets;
use crate::phase::LoopPhase;

pub struct ViewerApp {
    config: ViewerConfig,
    backends: wgpu::Backends,
    phase: LoopPhase,
    gpu: Option<GpuState>,
    input: InputHandler,
    fps: FpsCounter,
    last_frame: Option<Instant>,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig, backends: wgpu::Backends) -> Self {
        let input = InputHandler::new(config.initial_camera());
        Self {
            config,
            backends,
            phase: LoopPhase::Uninitialized,
            gpu: None,
            input,
            fps: FpsCounter::new(),
            last_frame: None,
            error: None,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Outcome of the run: the first fatal error, if any.
    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<GpuState> {
        self.config.validate()?;

        let attributes = Window::default_attributes()
            .with_title(fps_title(0))
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let mesh = assets::load_mesh(&self.config)?;
        let texture = assets::load_texture(&self.config)?;

        let gpu = pollster::block_on(GpuState::new(window, self.backends, &mesh, &texture))
            .context("Failed to initialise renderer")?;
        Ok(gpu)
    }

    /// Keep the first fatal error for the caller to report and stop the loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        if self.error.is_none() {
            self.error = Some(err);
        } else {
            log::debug!("Further error after a fatal one: {err:#}");
        }
        self.request_shutdown(event_loop);
    }

    fn request_shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase.transition(LoopPhase::ShuttingDown) {
            log::info!("Close requested. Exiting event loop.");
        }
        event_loop.exit();
    }

    fn apply(&mut self, reaction: Option<InputReaction>, event_loop: &ActiveEventLoop) {
        let Some(reaction) = reaction else {
            return;
        };
        if reaction == InputReaction::RequestClose {
            self.request_shutdown(event_loop);
            return;
        }
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };
        let window = gpu.window();
        match reaction {
            InputReaction::CapturePointer => {
                window.set_cursor_visible(false);
                let locked = match window.set_cursor_grab(CursorGrabMode::Locked) {
                    Ok(()) => true,
                    Err(lock_err) => {
                        log::debug!("Pointer lock unavailable ({lock_err}); confining instead");
                        if let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined) {
                            log::warn!("Pointer could not be captured: {e}");
                        }
                        false
                    }
                };
                self.input.set_pointer_locked(locked);
            }
            InputReaction::ReleasePointer => {
                if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                    log::warn!("Pointer could not be released: {e}");
                }
                window.set_cursor_visible(true);
            }
            InputReaction::RequestClose => {}
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        if !self.phase.is_running() {
            return;
        }
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|t| now.duration_since(t).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        if let Some(fps) = self.fps.tick(dt) {
            gpu.window().set_title(&fps_title(fps));
        }

        let mvp = self.input.camera().matrix(&self.config.lens);
        match gpu.render(mvp) {
            Ok(()) => {}
            Err(e) if GpuState::is_surface_lost(&e) => {
                log::warn!("Surface {e}; reconfiguring");
                gpu.recreate_surface();
            }
            Err(SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow!("GPU out of memory"));
                return;
            }
            Err(e) => log::warn!("Skipping frame: {e}"),
        }
        gpu.window().request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase != LoopPhase::Uninitialized {
            return;
        }
        match self.init(event_loop) {
            Ok(gpu) => {
                gpu.window().request_redraw();
                self.gpu = Some(gpu);
                self.last_frame = Some(Instant::now());
                self.phase.transition(LoopPhase::Running);
            }
            Err(e) => self.fail(event_loop, e.context("Startup failed")),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.request_shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key, state, ..
                    },
                ..
            } => {
                let key = match logical_key {
                    Key::Named(NamedKey::Escape) => input::Key::Escape,
                    _ => input::Key::Other,
                };
                let reaction = self.input.on_key(key, state.is_pressed());
                self.apply(reaction, event_loop);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => input::Button::Left,
                    _ => input::Button::Other,
                };
                let reaction = self
                    .input
                    .on_mouse_button(button, state == ElementState::Pressed);
                self.apply(reaction, event_loop);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .on_cursor_moved(DVec2::new(position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.input.on_scroll_lines(y),
                MouseScrollDelta::PixelDelta(pos) => self.input.on_scroll_pixels(pos.y),
            },
            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    log::info!("Resized: {}x{}", size.width, size.height);
                    gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input.on_pointer_motion(DVec2::new(dx, dy));
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.phase.transition(LoopPhase::ShuttingDown);
        // Dropping the GPU state releases pipeline, buffers, texture,
        // surface and finally the window.
        self.gpu = None;
        self.phase.transition(LoopPhase::Terminated);
        log::info!("Viewer terminated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_app_starts_uninitialized_with_configured_zoom() {
        let cfg = ViewerConfig::from_args(["--zoom=12"]);
        let app = ViewerApp::new(cfg, wgpu::Backends::all());
        assert_eq!(app.phase(), LoopPhase::Uninitialized);
        assert_eq!(app.input.camera().zoom, 12.0);
        assert!(app.into_result().is_ok());
    }
}

//! Platform layer: windowing, event loop and the render loop lifecycle.
//!
//! - Continuous redraws (`ControlFlow::Poll`), one frame per `RedrawRequested`.
//! - Window events are routed to the camera input handler.
//! - Startup failures end the loop and are returned to the caller.

mod app;
pub mod assets;
pub mod phase;

use anyhow::{Context, Result};
use corelib::config::ViewerConfig;
use winit::event_loop::{ControlFlow, EventLoop};

pub use app::ViewerApp;

/// Open the viewer window and run until it is closed.
pub fn run_viewer(config: ViewerConfig, backends: wgpu::Backends) -> Result<()> {
    let event_loop: EventLoop<()> = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config, backends);
    event_loop
        .run_app(&mut app)
        .context("Event loop error")?;

    app.into_result()
}

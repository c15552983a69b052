//! Application window and event loop management.

use std::sync::Arc;
use std::time::Instant;

use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use slicevol_core::{Options, RgbaVolume};
use slicevol_render::RenderEngine;

use crate::controls::InputState;
use crate::error::{Result, ViewerError};
use crate::render_state::RenderState;

/// Window title for a frame that took `delta_time` seconds since the previous one.
pub(crate) fn frame_title(delta_time: f32) -> String {
    format!("Volume rendering {:.3} ms", delta_time * 1000.0)
}

/// The viewer application state.
pub struct App {
    options: Options,
    /// Host volume waiting for the first `resumed`; uploaded then dropped.
    pending_volume: Option<RgbaVolume>,
    window: Option<Arc<Window>>,
    state: Option<RenderState>,
    input: InputState,
    start: Instant,
    last_frame_time: Option<Instant>,
    error: Option<ViewerError>,
}

impl App {
    /// Creates the application for an already loaded volume.
    pub fn new(options: Options, volume: RgbaVolume) -> Self {
        Self {
            options,
            pending_volume: Some(volume),
            window: None,
            state: None,
            input: InputState::new(),
            start: Instant::now(),
            last_frame_time: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<ViewerError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        let window_attributes = Window::default_attributes()
            .with_title(self.options.window_title.clone())
            .with_inner_size(LogicalSize::new(
                self.options.window_width,
                self.options.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);

        // Not every platform supports locking; confining is the closest fallback.
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            log::warn!("cursor grab unavailable: {e}");
        }
        window.set_cursor_visible(false);

        Ok(window)
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Some(volume) = self.pending_volume.take() else {
            return Ok(());
        };

        let window = self.create_window(event_loop)?;
        let engine = RenderEngine::new_windowed(window.clone(), self.options.vsync).block_on()?;
        let state = RenderState::new(engine, self.options.clone(), volume)?;

        self.window = Some(window);
        self.state = Some(state);
        self.start = Instant::now();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta_time = self
            .last_frame_time
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame_time = Some(now);

        let input = self.input.snapshot();
        if input.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };
        state.update(&input, delta_time);

        let elapsed = now.duration_since(self.start).as_secs_f32();
        if let Err(e) = state.render_frame(elapsed) {
            self.fail(event_loop, e.into());
            return;
        }

        if let Some(window) = &self.window {
            window.set_title(&frame_title(delta_time));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(state) = &mut self.state {
                    state.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.input.clear_held();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.input.key_pressed(code),
                        ElementState::Released => self.input.key_released(code),
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.input.scrolled(lines);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        // Raw motion keeps working while the cursor is locked.
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input.mouse_moved(dx as f32, dy as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            state.release();
        }
        self.window = None;
    }
}

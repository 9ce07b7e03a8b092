//! # Application Module
//!
//! The `winit` host of the demo. [`App`] implements [`ApplicationHandler`] and ties the
//! window, the render session and the presentation of its status together.
//!
//! ## Lifecycle
//!
//! - **`resumed`**: creates the window (bound to the `canvas` element in the browser)
//!   and starts session initialization. Natively initialization is driven to completion
//!   with `pollster`. In the browser it runs on the JS event loop via
//!   `wasm_bindgen_futures::spawn_local` and the finished session is handed back through
//!   a oneshot channel, polled on every window event.
//! - **`window_event`**: forwards resizes, runs one scheduler tick per redraw, keeps
//!   the window title in sync with the session's [`Telemetry`], and requests the next
//!   redraw while the loop is alive.
//! - **Close / Escape / exit**: cancels the session, so no frame is submitted after the
//!   host has started tearing down.
//!
//! ## Presentation
//!
//! Status and frame rate are shown in the window title, formatted as
//! `"<title> | <status> | FPS: <n>"`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    window::Window,
};

use crate::cancel::CancellationToken;
use crate::clock::SystemClock;
use crate::config::RenderConfig;
use crate::error::InitError;
use crate::geometry::Geometry;
use crate::gpu::SurfaceRequest;
use crate::renderer::RenderSession;
use crate::scheduler::{FrameScheduler, SessionState, TickOutcome};
use crate::telemetry::{LogObserver, RenderObserver, Telemetry};

/// Formats the window title for a status and FPS reading.
pub fn window_title(prefix: &str, telemetry: &Telemetry) -> String {
    format!("{prefix} | {} | FPS: {}", telemetry.status(), telemetry.fps())
}

/// The demo application.
pub struct App {
    config: RenderConfig,

    window: Option<Arc<Window>>,

    scheduler: Option<FrameScheduler>,

    telemetry: Telemetry,

    observer: Arc<dyn RenderObserver>,

    cancel: CancellationToken,

    /// The title last written to the window, to avoid redundant updates.
    title: String,

    #[cfg(target_arch = "wasm32")]
    session_receiver:
        Option<futures::channel::oneshot::Receiver<Result<RenderSession, InitError>>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl App {
    pub fn new(config: RenderConfig) -> Self {
        let telemetry = Telemetry::new();
        let observer: Arc<dyn RenderObserver> = Arc::new((telemetry.clone(), LogObserver));
        Self {
            config,
            window: None,
            scheduler: None,
            telemetry,
            observer,
            cancel: CancellationToken::new(),
            title: String::new(),
            #[cfg(target_arch = "wasm32")]
            session_receiver: None,
        }
    }

    /// Shared status and FPS of the session.
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Hands a finished initialization to the scheduler.
    ///
    /// The failure status was already reported through the observer. A failure stops
    /// the scheduler, which ends the redraw chain in `window_event`.
    fn finish_initialization(&mut self, result: Result<RenderSession, InitError>) {
        let Some(scheduler) = self.scheduler.as_mut() else {
            return;
        };
        scheduler.finish_initialization(result);
        self.update_title();
    }

    fn update_title(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let title = window_title(&self.config.title, &self.telemetry);
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }

    fn shut_down(&mut self, reason: &str) {
        self.cancel.cancel();
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.stop(reason);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn poll_initialization(&mut self) {
        let Some(receiver) = self.session_receiver.as_mut() else {
            return;
        };
        match receiver.try_recv() {
            Ok(Some(result)) => {
                self.session_receiver = None;
                self.finish_initialization(result);
            }
            Ok(None) => {}
            Err(_) => {
                self.session_receiver = None;
                log::error!("Session initialization was dropped before completing");
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut attributes = Window::default_attributes().with_title(self.config.title.clone());

        #[cfg(not(target_arch = "wasm32"))]
        {
            attributes = attributes
                .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        }

        #[cfg(target_arch = "wasm32")]
        let canvas = {
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = wgpu::web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id("canvas"))
                .and_then(|element| element.dyn_into::<wgpu::web_sys::HtmlCanvasElement>().ok());
            if canvas.is_none() {
                log::warn!("No <canvas id=\"canvas\"> found, winit will create one");
            }
            attributes = attributes.with_canvas(canvas.clone());
            canvas
        };

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                log::error!("Failed to create window: {error}");
                self.observer
                    .on_status(&InitError::ContextUnavailable(error.to_string()).status());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        #[cfg(not(target_arch = "wasm32"))]
        let (width, height) = {
            let size = window.inner_size();
            (size.width, size.height)
        };

        #[cfg(target_arch = "wasm32")]
        let (width, height) = canvas
            .map(|canvas| (canvas.width(), canvas.height()))
            .unwrap_or((self.config.width, self.config.height));

        log::info!("Drawable size: ({width} x {height})");

        self.scheduler = Some(FrameScheduler::new(
            Box::new(SystemClock::new()),
            self.config.fps_window(),
            self.observer.clone(),
            self.cancel.clone(),
        ));

        let request = SurfaceRequest::new(window.clone(), width, height)
            .with_api_available(graphics_api_available());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let result = pollster::block_on(RenderSession::initialize(
                request,
                Geometry::for_build(),
                &self.config,
                self.observer.as_ref(),
                &self.cancel,
            ));
            self.finish_initialization(result);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let (sender, receiver) = futures::channel::oneshot::channel();
            self.session_receiver = Some(receiver);
            let config = self.config.clone();
            let observer = self.observer.clone();
            let cancel = self.cancel.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = RenderSession::initialize(
                    request,
                    Geometry::for_build(),
                    &config,
                    observer.as_ref(),
                    &cancel,
                )
                .await;
                if sender.send(result).is_err() {
                    log::error!("Failed to hand the render session to the application");
                }
            });
            self.update_title();
        }

        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        self.poll_initialization();

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    self.shut_down("escape pressed");
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                log::info!("Resizing renderer surface to: ({width}, {height})");
                if let Some(scheduler) = self.scheduler.as_mut() {
                    scheduler.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting...");
                self.shut_down("window closed");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Some(scheduler) = self.scheduler.as_mut() {
                    if let TickOutcome::Stopped = scheduler.tick() {
                        log::debug!("Redraw after the render loop stopped");
                    }
                }
                self.update_title();
            }
            _ => (),
        }

        let keep_drawing = self
            .scheduler
            .as_ref()
            .is_some_and(|scheduler| scheduler.state() != SessionState::Stopped);
        if keep_drawing {
            if let Some(window) = self.window.as_ref() {
                window.request_redraw();
            }
        }
    }

    fn exiting(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        self.shut_down("event loop exiting");
    }
}

/// Whether the host exposes a graphics API wgpu can use.
#[cfg(not(target_arch = "wasm32"))]
fn graphics_api_available() -> bool {
    true
}

/// Whether the page runs in a browser window at all. Whether it also offers WebGPU
/// is settled by adapter acquisition.
#[cfg(target_arch = "wasm32")]
fn graphics_api_available() -> bool {
    wgpu::web_sys::window().is_some()
}

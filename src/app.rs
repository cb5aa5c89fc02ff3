//! # Application Core (`app.rs`)
//!
//! The `App` drives the turntable from the `winit` event loop: it creates the window (a canvas on
//! the web), brings up the [`Renderer`], forwards input to `egui` and renders a frame on every
//! redraw.
//!
//! ## Platform-Specific Notes
//!
//! - **Desktop**: the renderer is built synchronously with `pollster` the first time the
//!   application resumes.
//! - **WebAssembly**: the renderer is built on the browser's executor and handed back through a
//!   `oneshot` channel; until it arrives, window events are ignored.
//!
//! ## Startup Failures
//!
//! If the window or renderer cannot be created, the error is logged, kept in the `App` and the
//! event loop is asked to exit. [`crate::run`] then returns it through
//! [`App::take_startup_error`].
//!
//! ## Inspector
//!
//! A small `egui` window shows the rotation angle, the frame time and the mesh totals, and lets
//! the user switch the rotation mode and speed while the mesh keeps spinning.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use std::sync::Arc;

use web_time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    window::{Theme, Window},
};

use crate::config::SceneConfig;
use crate::error::SetupError;
#[cfg(target_arch = "wasm32")]
use crate::error::SetupResult;
use crate::renderer::{FrameControl, Renderer};
use crate::rotation::RotationMode;

/// Refresh rate offered by the inspector's fixed-step option when the configuration has none.
const FIXED_STEP_FPS: u32 = 60;

/// Upper bound of the inspector's speed slider, in radians per second.
const MAX_ROTATION_SPEED: f32 = 5.0;

/// The application state driven by the `winit` event loop.
#[derive(Default)]
pub struct App {
    /// Configuration handed to the renderer at startup.
    config: SceneConfig,

    window: Option<Arc<Window>>,

    renderer: Option<Renderer>,

    gui_state: Option<egui_winit::State>,

    last_render_time: Option<Instant>,

    /// Receives the renderer built asynchronously on the web.
    #[cfg(target_arch = "wasm32")]
    renderer_receiver: Option<futures::channel::oneshot::Receiver<SetupResult<Renderer>>>,

    /// The surface size in physical pixels, used for the `egui` screen descriptor.
    last_size: (u32, u32),

    startup_error: Option<SetupError>,
}

impl App {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Takes the error that stopped the application from starting, if any.
    pub fn take_startup_error(&mut self) -> Option<SetupError> {
        self.startup_error.take()
    }

    fn fail_startup(&mut self, event_loop: &winit::event_loop::ActiveEventLoop, error: SetupError) {
        log::error!("Startup failed: {error}");
        self.startup_error = Some(error);
        event_loop.exit();
    }

    /// Picks up the renderer once the web executor has finished building it.
    #[cfg(target_arch = "wasm32")]
    fn poll_renderer(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let Some(receiver) = self.renderer_receiver.as_mut() else {
            return;
        };
        let received = match receiver.try_recv() {
            Ok(None) => return,
            Ok(Some(result)) => result,
            Err(futures::channel::oneshot::Canceled) => Err(SetupError::Abandoned),
        };
        self.renderer_receiver = None;
        match received {
            Ok(renderer) => {
                log::info!("Renderer ready");
                self.renderer = Some(renderer);
            }
            Err(error) => self.fail_startup(event_loop, error),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let mut attributes = Window::default_attributes();

        #[cfg(not(target_arch = "wasm32"))]
        {
            attributes = attributes.with_title("Turntable");
        }

        #[allow(unused_assignments)]
        #[cfg(target_arch = "wasm32")]
        let mut canvas_width = 0;

        #[allow(unused_assignments)]
        #[cfg(target_arch = "wasm32")]
        let mut canvas_height = 0;

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = wgpu::web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id("canvas"))
                .and_then(|element| {
                    element
                        .dyn_into::<wgpu::web_sys::HtmlCanvasElement>()
                        .ok()
                });
            let Some(canvas) = canvas else {
                self.fail_startup(event_loop, SetupError::MissingCanvas);
                return;
            };
            canvas_width = canvas.width();
            canvas_height = canvas.height();
            self.last_size = (canvas_width, canvas_height);
            attributes = attributes.with_canvas(Some(canvas));
        }

        if self.window.is_some() {
            return;
        }

        let window_handle = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                self.fail_startup(event_loop, error.into());
                return;
            }
        };
        self.window = Some(window_handle.clone());

        let gui_context = egui::Context::default();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let inner_size = window_handle.inner_size();
            self.last_size = (inner_size.width, inner_size.height);
        }

        #[cfg(target_arch = "wasm32")]
        {
            gui_context.set_pixels_per_point(window_handle.scale_factor() as f32);
        }

        let viewport_id = gui_context.viewport_id();

        let gui_state = egui_winit::State::new(
            gui_context,
            viewport_id,
            &window_handle,
            Some(window_handle.scale_factor() as _),
            Some(Theme::Dark),
            None,
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            let (width, height) = self.last_size;
            let config = self.config.clone();
            let result = pollster::block_on(async move {
                Renderer::new(window_handle.clone(), width, height, config).await
            });
            match result {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(error) => {
                    self.fail_startup(event_loop, error);
                    return;
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let (sender, receiver) = futures::channel::oneshot::channel();
            self.renderer_receiver = Some(receiver);
            log::info!("Canvas dimensions: ({canvas_width} x {canvas_height})");
            let config = self.config.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let renderer =
                    Renderer::new(window_handle.clone(), canvas_width, canvas_height, config)
                        .await;
                if sender.send(renderer).is_err() {
                    log::error!("Renderer finished after the application stopped waiting");
                }
            });
        }

        self.gui_state = Some(gui_state);
        self.last_render_time = Some(Instant::now());
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        self.poll_renderer(event_loop);

        let (Some(gui_state), Some(renderer), Some(window), Some(last_render_time)) = (
            self.gui_state.as_mut(),
            self.renderer.as_mut(),
            self.window.as_ref(),
            self.last_render_time.as_mut(),
        ) else {
            return;
        };

        if gui_state.on_window_event(window, &event).consumed {
            return;
        }

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
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                renderer.resize(width, height);
                if width > 0 && height > 0 {
                    self.last_size = (width, height);
                }
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting...");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();

                let delta_time = now - *last_render_time;
                *last_render_time = now;

                let gui_input = gui_state.take_egui_input(window);
                gui_state.egui_ctx().begin_pass(gui_input);

                #[cfg(not(target_arch = "wasm32"))]
                let title = "Turntable";

                #[cfg(feature = "webgpu")]
                let title = "Turntable (WebGPU)";

                #[cfg(feature = "webgl")]
                let title = "Turntable (WebGL)";

                let stats = renderer.scene().stats();
                let fixed_step = match renderer.scene().config().rotation_mode {
                    mode @ RotationMode::FixedStep { .. } => mode,
                    RotationMode::ElapsedTime => RotationMode::FixedStep {
                        target_fps: FIXED_STEP_FPS,
                    },
                };

                egui::Window::new(title).show(gui_state.egui_ctx(), |ui| {
                    let rotation = renderer.scene_mut().rotation_mut();

                    ui.label(format!("Angle: {:.1}°", rotation.angle().to_degrees()));
                    ui.label(format!(
                        "Frame time: {:.2} ms",
                        delta_time.as_secs_f32() * 1000.0
                    ));
                    ui.separator();

                    ui.label(format!(
                        "Meshes: {}  Submeshes: {}",
                        stats.meshes, stats.submeshes
                    ));
                    ui.label(format!(
                        "Vertices: {}  Triangles: {}  Lines: {}",
                        stats.vertices, stats.triangles, stats.lines
                    ));
                    ui.separator();

                    ui.horizontal(|ui| {
                        ui.radio_value(
                            &mut rotation.mode,
                            RotationMode::ElapsedTime,
                            "Elapsed time",
                        );
                        ui.radio_value(&mut rotation.mode, fixed_step, "Fixed step");
                    });
                    ui.add(
                        egui::Slider::new(&mut rotation.speed, 0.0..=MAX_ROTATION_SPEED)
                            .text("rad/s"),
                    );
                });

                let egui_winit::egui::FullOutput {
                    textures_delta,
                    shapes,
                    pixels_per_point,
                    platform_output,
                    ..
                } = gui_state.egui_ctx().end_pass();

                gui_state.handle_platform_output(window, platform_output);

                let paint_jobs = gui_state.egui_ctx().tessellate(shapes, pixels_per_point);

                let screen_descriptor = {
                    let (width, height) = self.last_size;
                    egui_wgpu::ScreenDescriptor {
                        size_in_pixels: [width, height],
                        pixels_per_point: window.scale_factor() as f32,
                    }
                };

                if renderer.render_frame(screen_descriptor, paint_jobs, textures_delta, delta_time)
                    == FrameControl::Exit
                {
                    event_loop.exit();
                    return;
                }
            }
            _ => (),
        }

        window.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_app_has_no_startup_error() {
        let mut app = App::new(SceneConfig::with_mesh_path("mesh.obj"));
        assert!(app.take_startup_error().is_none());
        assert!(app.renderer.is_none());
    }
}

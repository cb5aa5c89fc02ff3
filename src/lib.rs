//! # Turntable
//!
//! A small `wgpu` renderer that loads a mesh, spins it about the vertical axis in front of a fixed
//! camera and draws it every frame, with an `egui` inspector on top. It runs natively and, with
//! the `webgl` or `webgpu` feature, in the browser.
//!
//! ## Modules
//!
//! - [`transform`]: Builds scale, rotation, translation, orthographic and perspective matrices.
//! - [`scene`]: The frame orchestrator. Advances the rotation, composes model, view and
//!   projection, uploads the uniforms and issues one indexed draw per submesh.
//! - [`rotation`]: How the rotation angle advances, by elapsed time or by a fixed per-frame step.
//! - [`mesh`]: Reads Wavefront OBJ assets and uploads them as vertex and index buffers.
//! - [`config`]: The [`SceneConfig`] knobs: mesh source, scale, camera offset, projection,
//!   rotation and clear color.
//! - [`renderer`] and [`gpu`]: Surface, device and per-frame command encoding.
//! - [`app`]: The `winit` application handler and the inspector.
//! - [`vertex`], [`uniform_buffer`], [`uniform_binding`]: The data layouts shared with the shader.
//! - [`error`]: [`SetupError`], everything that can stop the renderer from starting.
//!
//! ## Coordinate Conventions
//!
//! Matrices are column-major and act on column vectors, so `a * b` applies `b` first. View space
//! is right-handed with the camera looking down -Z. The projections produce clip-space depth in
//! `[-w, w]`; `wgpu` keeps only `[0, w]`, so the effective near plane of a perspective projection
//! sits further out than the `near_z` it was built with.
//!
//! ## Example
//!
//! ```no_run
//! use turntable_core::SceneConfig;
//!
//! fn main() -> Result<(), turntable_core::SetupError> {
//!     turntable_core::run(SceneConfig::with_mesh_path("assets/container.obj"))
//! }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod gpu;
pub mod mesh;
pub mod renderer;
pub mod rotation;
pub mod scene;
pub mod transform;
pub mod uniform_binding;
pub mod uniform_buffer;
pub mod vertex;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use web_time::Duration;

pub use crate::app::App;
pub use crate::config::{MeshSource, Projection, SceneConfig};
pub use crate::error::{SetupError, SetupResult};
pub use crate::gpu::Gpu;
pub use crate::mesh::{MeshData, MeshStats};
pub use crate::renderer::Renderer;
pub use crate::rotation::{RotationMode, RotationState};
pub use crate::scene::{draw_plan, frame_uniforms, DrawCall, Scene};
pub use crate::uniform_binding::UniformBinding;
pub use crate::uniform_buffer::UniformBuffer;
pub use crate::vertex::Vertex;

/// The WGSL module every scene pipeline is built from.
///
/// The vertex stage (`vertex_main`) reads position, normal and texture coordinates at locations
/// 0, 1 and 2 and transforms them with the `model_view` and `projection` matrices bound at
/// group 0, binding 0. The fragment stage (`fragment_main`) shades with a single directional light
/// in view space over a faint checker pattern, so the rotation stays visible on flat faces.
pub const SHADER_SOURCE: &str = include_str!("shader_source.wgsl");

/// Installs the global logger.
///
/// Natively this is `env_logger` at `info`, overridable through `RUST_LOG`. In the browser, log
/// records and panics go to the developer console. Calling it more than once is harmless.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }

    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

/// Opens a window and runs the turntable until it is closed.
///
/// # Errors
///
/// Returns the [`SetupError`] that stopped the window or renderer from coming up. Once the first
/// frame has been rendered, the only way out is a normal exit and the result is `Ok`.
///
/// On the web the event loop is handed to the browser and this returns immediately; startup
/// errors are logged to the console instead.
pub fn run(config: SceneConfig) -> SetupResult<()> {
    init_logging();

    let event_loop = winit::event_loop::EventLoop::new()?;

    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut app = App::new(config);
        event_loop.run_app(&mut app)?;
        match app.take_startup_error() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;
        event_loop.spawn_app(App::new(config));
        Ok(())
    }
}

/// Browser entry point. Always draws the bundled mesh.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    if let Err(error) = run(SceneConfig::default()) {
        log::error!("{error}");
    }
}

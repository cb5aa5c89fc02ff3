//! # Setup Errors
//!
//! Everything that can go wrong while bringing the renderer up: the window, the GPU surface,
//! adapter and device, the mesh asset and the render pipelines. Once setup succeeds no further
//! error is surfaced; per-frame surface hiccups are handled inside the renderer.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results produced during setup.
pub type SetupResult<T> = Result<T, SetupError>;

/// A fault that prevents the renderer from starting.
///
/// None of these are retried. The application logs the error, leaves the event loop and hands
/// the value back to the caller of [`run`](crate::run).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to create the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create the window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("the page has no <canvas id=\"canvas\"> element to render into")]
    MissingCanvas,

    #[error("failed to create a rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no GPU adapter is compatible with the rendering surface")]
    NoAdapter,

    #[error("the rendering surface reports no supported texture formats")]
    UnsupportedSurface,

    #[error("failed to acquire a GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to read mesh asset '{}': {source}", path.display())]
    AssetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed mesh asset at line {line}: {message}")]
    AssetParse { line: usize, message: String },

    #[error("mesh asset contains no drawable geometry")]
    EmptyAsset,

    #[error("failed to build the render pipeline: {0}")]
    Pipeline(String),

    #[error("renderer initialization was abandoned before completing")]
    Abandoned,
}

impl SetupError {
    pub(crate) fn asset_parse(line: usize, message: impl Into<String>) -> Self {
        Self::AssetParse {
            line,
            message: message.into(),
        }
    }
}

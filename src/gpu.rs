//! # GPU Management Module
//!
//! The `gpu` module brings up the `wgpu` objects the renderer draws with and keeps the surface
//! configured as the window changes size.
//!
//! ## Overview
//!
//! [`Gpu::new_async`] walks the usual chain: instance, surface, adapter, device and queue, then
//! configures the surface with a format and present mode the adapter supports. Every step that
//! can fail returns a [`SetupError`] instead of panicking, so the application can report a
//! missing adapter or device to its host and shut down cleanly.
//!
//! ## Example Usage
//!
//! ```ignore
//! let gpu = Gpu::new_async(window, 1280, 720).await?;
//! let aspect = gpu.aspect_ratio();
//! ```

use wgpu::InstanceDescriptor;

use crate::error::{SetupError, SetupResult};

/// The GPU resources the renderer draws with.
///
/// # Fields
/// - `surface`: The presentable surface tied to the window or canvas.
/// - `device`: Creates buffers, textures, pipelines and command encoders.
/// - `queue`: Receives buffer writes and submitted command buffers.
/// - `surface_config`: The active surface configuration; its width and height track the window.
/// - `surface_format`: The color format of the surface textures.
pub struct Gpu {
    /// The surface associated with the GPU rendering target.
    ///
    /// Rendered frames are acquired from and presented to this surface.
    pub surface: wgpu::Surface<'static>,

    /// The logical device, used for every resource the scene creates.
    pub device: wgpu::Device,

    /// The command queue. Uniform writes and the per-frame command buffer go through it.
    pub queue: wgpu::Queue,

    /// The configuration settings for the rendering surface.
    ///
    /// Updated by [`Gpu::resize`] and reapplied by [`Gpu::reconfigure`] after the surface is
    /// lost.
    pub surface_config: wgpu::SurfaceConfiguration,

    /// The texture format of the rendering surface.
    ///
    /// A non-sRGB format is preferred, since `egui` expects to write already-encoded colors.
    pub surface_format: wgpu::TextureFormat,
}

impl Gpu {
    /// Calculates the aspect ratio of the rendering surface.
    ///
    /// A zero height is clamped to one, so a minimized window yields a finite ratio.
    pub fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height.max(1) as f32
    }

    /// Resizes the rendering surface to the specified dimensions.
    ///
    /// Zero-sized requests (a minimized window) are ignored: a surface cannot be configured with
    /// an empty extent, and the previous configuration stays valid until the window returns.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Reapplies the current configuration, recovering a lost or outdated surface.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Creates a depth texture for the GPU rendering pipeline.
    ///
    /// The texture uses `Depth32Float` and is sized to the given extent. It is recreated by the
    /// renderer whenever the surface is resized.
    pub fn create_depth_texture(&self, width: u32, height: u32) -> wgpu::TextureView {
        let texture = self.device.create_texture(
            &(wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Depth32Float,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            }),
        );
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Creates a new GPU context asynchronously.
    ///
    /// # Errors
    ///
    /// - [`SetupError::Surface`] if no surface can be created for `window`.
    /// - [`SetupError::NoAdapter`] if no adapter can present to that surface.
    /// - [`SetupError::Device`] if the adapter refuses the device request.
    /// - [`SetupError::UnsupportedSurface`] if the surface reports no formats for the adapter.
    pub async fn new_async(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> SetupResult<Self> {
        let instance = wgpu::Instance::new(&InstanceDescriptor::default());

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(SetupError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        log::info!(
            "Using adapter {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.device_type,
            adapter_info.backend
        );
        log::debug!("WGPU Adapter Features: {:#?}", adapter.features());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("WGPU Device"),
                    memory_hints: wgpu::MemoryHints::default(),
                    required_features: wgpu::Features::default(),
                    #[cfg(not(target_arch = "wasm32"))]
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    #[cfg(all(target_arch = "wasm32", feature = "webgpu"))]
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    #[cfg(all(target_arch = "wasm32", feature = "webgl"))]
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);

        let surface_format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb()) // egui wants a non-srgb surface texture
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(SetupError::UnsupportedSurface)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: surface_capabilities
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);
        log::info!(
            "Configured {:?} surface at {}x{}",
            surface_format,
            surface_config.width,
            surface_config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            surface_format,
        })
    }
}

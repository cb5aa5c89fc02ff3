//! # `renderer.rs` - Renderer Module
//!
//! The `Renderer` ties the GPU context, the depth buffer, the [`Scene`] and the `egui` overlay
//! together and turns one call to [`Renderer::render_frame`] into one presented frame.
//!
//! ## Frame
//!
//! 1. The scene advances its rotation and writes the frame's uniforms.
//! 2. `egui` textures and buffers are updated.
//! 3. The surface texture is acquired. A lost or outdated surface is reconfigured and the frame
//!    skipped, a timeout skips the frame, and an out-of-memory surface asks the application to
//!    exit.
//! 4. A single render pass clears color and depth, draws the scene, then draws `egui` on top.
//! 5. The encoder is submitted and the texture presented.
//!
//! ## Example
//!
//! ```ignore
//! let mut renderer = Renderer::new(window, width, height, SceneConfig::default()).await?;
//!
//! renderer.resize(new_width, new_height);
//! renderer.render_frame(screen_descriptor, paint_jobs, textures_delta, delta_time);
//! ```

use crate::config::SceneConfig;
use crate::error::SetupResult;
use crate::gpu::Gpu;
use crate::scene::Scene;

/// What to do with a frame whose surface texture could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured; the next frame should succeed.
    Reconfigure,

    /// Drop this frame and try again on the next redraw.
    SkipFrame,

    /// The surface cannot recover; the application should exit.
    Fatal,
}

/// Whether the application should keep rendering after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Exit,
}

impl SurfaceErrorAction {
    /// Classifies a failed `get_current_texture`.
    pub fn for_error(error: &wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            _ => Self::SkipFrame,
        }
    }
}

/// Draws the scene and the `egui` overlay into the window's surface.
pub struct Renderer {
    gpu: Gpu,

    /// Recreated with the surface on every resize.
    depth_texture_view: wgpu::TextureView,

    egui_renderer: egui_wgpu::Renderer,

    scene: Scene,
}

impl Renderer {
    /// The depth format shared by the depth texture, the scene pipelines and `egui`.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Brings up the GPU and loads the scene described by `config`.
    ///
    /// # Errors
    ///
    /// Any [`SetupError`](crate::SetupError) raised while creating the GPU context or the scene.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        config: SceneConfig,
    ) -> SetupResult<Self> {
        let gpu = Gpu::new_async(window, width, height).await?;

        let depth_texture_view = gpu.create_depth_texture(width, height);

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            Some(Self::DEPTH_FORMAT),
            1,
            false,
        );

        let scene = Scene::new(&gpu.device, gpu.surface_format, config).await?;

        Ok(Self {
            gpu,
            depth_texture_view,
            egui_renderer,
            scene,
        })
    }

    /// Resizes the surface and the depth buffer. Zero extents are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }
        log::info!("Resizing surface to {}x{}", width, height);
        self.gpu.resize(width, height);
        self.depth_texture_view = self.gpu.create_depth_texture(width, height);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Renders and presents one frame.
    ///
    /// The scene is updated even when the surface texture cannot be acquired, so the rotation
    /// keeps pace with the clock across skipped frames. Returns [`FrameControl::Exit`] only when
    /// the surface has run out of memory.
    pub fn render_frame(
        &mut self,
        screen_descriptor: egui_wgpu::ScreenDescriptor,
        paint_jobs: Vec<egui::epaint::ClippedPrimitive>,
        textures_delta: egui::TexturesDelta,
        delta_time: crate::Duration,
    ) -> FrameControl {
        let delta_time = delta_time.as_secs_f32();

        self.scene
            .update(&self.gpu.queue, self.gpu.aspect_ratio(), delta_time);

        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }

        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        let surface_texture = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(error) => {
                match SurfaceErrorAction::for_error(&error) {
                    SurfaceErrorAction::Reconfigure => {
                        log::warn!("Surface {:?}; reconfiguring and skipping frame", error);
                        self.gpu.reconfigure();
                    }
                    SurfaceErrorAction::SkipFrame => {
                        log::warn!("Failed to acquire surface texture ({:?}); skipping frame", error)
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("Surface {:?}; cannot continue rendering", error);
                        return FrameControl::Exit;
                    }
                }
                return FrameControl::Continue;
            }
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.egui_renderer.update_buffers(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        let surface_texture_view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.gpu.surface_format),
            ..Default::default()
        });

        encoder.insert_debug_marker("Render scene");

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.scene.config().clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.scene.render(&mut render_pass);

            self.egui_renderer.render(
                &mut render_pass.forget_lifetime(),
                &paint_jobs,
                &screen_descriptor,
            );
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        FrameControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_and_outdated_surfaces_are_reconfigured() {
        assert_eq!(
            SurfaceErrorAction::for_error(&wgpu::SurfaceError::Lost),
            SurfaceErrorAction::Reconfigure
        );
        assert_eq!(
            SurfaceErrorAction::for_error(&wgpu::SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigure
        );
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert_eq!(
            SurfaceErrorAction::for_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::Fatal
        );
    }

    #[test]
    fn transient_surface_errors_skip_the_frame() {
        for error in [wgpu::SurfaceError::Timeout, wgpu::SurfaceError::Other] {
            assert_eq!(
                SurfaceErrorAction::for_error(&error),
                SurfaceErrorAction::SkipFrame
            );
        }
    }
}

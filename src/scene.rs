//! # Scene
//!
//! The `scene` module owns everything the turntable draws: the uploaded meshes, one render
//! pipeline per primitive topology they use, the uniform binding and the rotation state.
//!
//! ## Overview
//!
//! Each frame the renderer calls [`Scene::update`] and then [`Scene::render`]:
//!
//! 1. `update` advances the [`RotationState`], builds the model, view and projection matrices
//!    through [`frame_uniforms`] and writes the packed [`UniformBuffer`] through the queue.
//! 2. `render` walks the precomputed [`draw_plan`]: meshes in load order, submeshes in load
//!    order, switching pipelines only when the topology changes.
//!
//! Both [`frame_uniforms`] and [`draw_plan`] are plain functions so the frame's math and draw
//! order can be checked without a GPU.
//!
//! ## Example Usage
//! ```ignore
//! let mut scene = Scene::new(&device, surface_format, SceneConfig::default()).await?;
//!
//! scene.update(&queue, aspect_ratio, delta_time);
//!
//! let mut render_pass = encoder.begin_render_pass(&render_pass_descriptor);
//! scene.render(&mut render_pass);
//! ```

use std::collections::HashMap;

use nalgebra_glm::Vec3;

use crate::config::SceneConfig;
use crate::error::{SetupError, SetupResult};
use crate::mesh::{self, GpuMesh, MeshStats, SubmeshLayout};
use crate::renderer::Renderer;
use crate::rotation::RotationState;
use crate::transform;
use crate::uniform_binding::UniformBinding;
use crate::uniform_buffer::UniformBuffer;
use crate::vertex::Vertex;
use crate::SHADER_SOURCE;

/// One indexed draw: which submesh of which mesh, and how to draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    /// Position of the mesh in load order.
    pub mesh: usize,

    /// Position of the submesh within its mesh.
    pub submesh: usize,

    pub layout: SubmeshLayout,
}

/// Flattens per-mesh submesh layouts into draw order.
///
/// Meshes are visited in load order and each mesh's submeshes in declaration order. Submeshes
/// with no indices produce no draw.
pub fn draw_plan(meshes: &[Vec<SubmeshLayout>]) -> Vec<DrawCall> {
    meshes
        .iter()
        .enumerate()
        .flat_map(|(mesh, submeshes)| {
            submeshes
                .iter()
                .enumerate()
                .filter(|(_, layout)| layout.index_count > 0)
                .map(move |(submesh, layout)| DrawCall {
                    mesh,
                    submesh,
                    layout: *layout,
                })
        })
        .collect()
}

/// Computes the uniform record for a frame with the mesh turned to `angle` radians.
///
/// The mesh is scaled, then turned about +Y by `-angle`, then pushed away from the camera by the
/// configured offset. `surface_aspect` only matters when the configuration does not pin the
/// aspect ratio.
pub fn frame_uniforms(config: &SceneConfig, angle: f32, surface_aspect: f32) -> UniformBuffer {
    let model = transform::rotate(&Vec3::y(), -angle) * transform::scale(config.model_scale);
    let view = transform::translate(&config.camera_offset);

    UniformBuffer {
        model_view: view * model,
        projection: config
            .projection
            .matrix(config.effective_aspect(surface_aspect)),
    }
}

/// The drawable state of the turntable.
pub struct Scene {
    config: SceneConfig,

    rotation: RotationState,

    meshes: Vec<GpuMesh>,

    /// Computed once at load; the meshes never change afterwards.
    plan: Vec<DrawCall>,

    /// The uniform buffer and the bind group exposing it at group 0, binding 0.
    pub uniform: UniformBinding,

    pipelines: HashMap<wgpu::PrimitiveTopology, wgpu::RenderPipeline>,

    stats: MeshStats,
}

impl Scene {
    /// Loads the configured mesh, uploads it and builds the pipelines it needs.
    ///
    /// Pipeline creation runs inside a validation error scope, so a shader or layout mismatch
    /// comes back as [`SetupError::Pipeline`] instead of surfacing through the device's
    /// uncaptured error handler.
    ///
    /// # Errors
    ///
    /// Any asset error from [`mesh::load`], or [`SetupError::Pipeline`].
    pub async fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        config: SceneConfig,
    ) -> SetupResult<Self> {
        let mesh_data = mesh::load(&config.mesh)?;
        let stats = MeshStats::from_meshes(&mesh_data);
        log::info!(
            "Loaded {} mesh(es): {} submeshes, {} vertices, {} triangles, {} lines",
            stats.meshes,
            stats.submeshes,
            stats.vertices,
            stats.triangles,
            stats.lines
        );

        let meshes: Vec<GpuMesh> = mesh_data.iter().map(|data| data.upload(device)).collect();

        let layouts: Vec<Vec<SubmeshLayout>> = meshes
            .iter()
            .map(|mesh| mesh.submeshes.iter().map(|submesh| submesh.layout).collect())
            .collect();
        let plan = draw_plan(&layouts);

        let uniform = UniformBinding::new(device);

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut pipelines = HashMap::new();
        for call in &plan {
            let topology = call.layout.topology;
            pipelines.entry(topology).or_insert_with(|| {
                log::debug!("Creating {:?} pipeline", topology);
                Self::create_pipeline(device, surface_format, &uniform, topology)
            });
        }
        if let Some(error) = device.pop_error_scope().await {
            return Err(SetupError::Pipeline(error.to_string()));
        }

        let rotation = config.rotation_state();

        Ok(Self {
            config,
            rotation,
            meshes,
            plan,
            uniform,
            pipelines,
            stats,
        })
    }

    /// Records the frame's draws into `renderpass`.
    pub fn render(&self, renderpass: &mut wgpu::RenderPass<'_>) {
        renderpass.set_bind_group(UniformBinding::GROUP, &self.uniform.bind_group, &[]);

        let mut bound_topology = None;
        let mut bound_mesh = None;

        for call in &self.plan {
            let topology = call.layout.topology;
            if bound_topology != Some(topology) {
                let Some(pipeline) = self.pipelines.get(&topology) else {
                    log::warn!("No pipeline for {:?}, skipping draw", topology);
                    continue;
                };
                renderpass.set_pipeline(pipeline);
                bound_topology = Some(topology);
            }

            let mesh = &self.meshes[call.mesh];
            if bound_mesh != Some(call.mesh) {
                renderpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                bound_mesh = Some(call.mesh);
            }

            let submesh = &mesh.submeshes[call.submesh];
            renderpass.set_index_buffer(submesh.index_buffer.slice(..), call.layout.index_format);
            renderpass.draw_indexed(0..call.layout.index_count, 0, 0..1);
        }
    }

    /// Advances the rotation and uploads the frame's uniforms.
    ///
    /// # Parameters
    ///
    /// - `queue`: Receives the uniform write.
    /// - `surface_aspect`: Width over height of the surface, used unless the configuration pins
    ///   the aspect ratio.
    /// - `delta_time`: Seconds since the previous frame.
    pub fn update(&mut self, queue: &wgpu::Queue, surface_aspect: f32, delta_time: f32) {
        let angle = self.rotation.advance(delta_time);
        self.uniform.update_buffer(
            queue,
            0,
            frame_uniforms(&self.config, angle, surface_aspect),
        );
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Lets the inspector change speed and mode without resetting the angle.
    pub fn rotation_mut(&mut self) -> &mut RotationState {
        &mut self.rotation
    }

    pub fn stats(&self) -> MeshStats {
        self.stats
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    fn create_pipeline(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        uniform: &UniformBinding,
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Turntable Shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(SHADER_SOURCE)),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&uniform.bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(match topology {
                wgpu::PrimitiveTopology::LineList => "Line Pipeline",
                _ => "Triangle Pipeline",
            }),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some("vertex_main"),
                buffers: &[Vertex::description(&Vertex::vertex_attributes())],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None, // list topologies only
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Renderer::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some("fragment_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm::{vec4, Vec4};

    const EPSILON: f32 = 1e-4;

    fn assert_close(actual: Vec4, expected: Vec4) {
        assert!(
            (actual - expected).norm() < EPSILON,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn layout(topology: wgpu::PrimitiveTopology, index_count: u32) -> SubmeshLayout {
        SubmeshLayout {
            topology,
            index_format: wgpu::IndexFormat::Uint16,
            index_count,
        }
    }

    #[test]
    fn unrotated_origin_sits_at_camera_offset() {
        let uniforms = frame_uniforms(&SceneConfig::default(), 0.0, 1.0);
        assert_close(
            uniforms.model_view * vec4(0.0, 0.0, 0.0, 1.0),
            vec4(0.0, 0.0, -45.0, 1.0),
        );
    }

    #[test]
    fn quarter_turn_swings_x_toward_camera() {
        let uniforms = frame_uniforms(&SceneConfig::default(), std::f32::consts::FRAC_PI_2, 1.0);
        // Scaled to x = 2, turned onto +Z, then pushed back 45 units.
        assert_close(
            uniforms.model_view * vec4(1.0, 0.0, 0.0, 1.0),
            vec4(0.0, 0.0, -43.0, 1.0),
        );
    }

    #[test]
    fn model_scale_applies_before_rotation() {
        let config = SceneConfig {
            model_scale: 3.0,
            ..SceneConfig::default()
        };
        let uniforms = frame_uniforms(&config, 0.0, 1.0);
        assert_close(
            uniforms.model_view * vec4(0.0, 1.0, 0.0, 1.0),
            vec4(0.0, 3.0, -45.0, 1.0),
        );
    }

    #[test]
    fn pinned_aspect_ignores_the_surface() {
        let config = SceneConfig::default();
        let wide = frame_uniforms(&config, 0.3, 16.0 / 9.0);
        let square = frame_uniforms(&config, 0.3, 1.0);
        assert_eq!(wide.projection, square.projection);
        assert_eq!(
            wide.projection,
            transform::perspective(std::f32::consts::FRAC_PI_3, 1.0, 0.1, 1000.0)
        );
    }

    #[test]
    fn free_aspect_follows_the_surface() {
        let config = SceneConfig {
            aspect_ratio: None,
            ..SceneConfig::default()
        };
        let uniforms = frame_uniforms(&config, 0.0, 2.0);
        assert_eq!(
            uniforms.projection,
            transform::perspective(std::f32::consts::FRAC_PI_3, 2.0, 0.1, 1000.0)
        );
    }

    #[test]
    fn draw_plan_keeps_load_order() {
        use wgpu::PrimitiveTopology::{LineList, TriangleList};

        let plan = draw_plan(&[
            vec![layout(TriangleList, 36), layout(LineList, 4)],
            vec![layout(TriangleList, 6)],
        ]);

        let order: Vec<(usize, usize)> = plan.iter().map(|call| (call.mesh, call.submesh)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(plan[1].layout.topology, LineList);
        assert_eq!(plan[2].layout.index_count, 6);
    }

    #[test]
    fn draw_plan_skips_empty_submeshes() {
        let plan = draw_plan(&[
            vec![layout(wgpu::PrimitiveTopology::TriangleList, 0)],
            vec![],
            vec![layout(wgpu::PrimitiveTopology::TriangleList, 3)],
        ]);
        assert_eq!(plan.len(), 1);
        assert_eq!((plan[0].mesh, plan[0].submesh), (2, 0));
    }

    #[test]
    fn bundled_mesh_plans_one_draw_per_group() {
        let meshes = mesh::parse_obj(crate::config::DEFAULT_MESH).unwrap();
        let layouts: Vec<Vec<SubmeshLayout>> = meshes
            .iter()
            .map(|mesh| {
                mesh.submeshes
                    .iter()
                    .map(|submesh| SubmeshLayout {
                        topology: submesh.topology,
                        index_format: mesh.index_format(),
                        index_count: submesh.indices.len() as u32,
                    })
                    .collect()
            })
            .collect();

        let plan = draw_plan(&layouts);
        assert_eq!(plan.len(), 2);
        assert_eq!(
            plan.iter().map(|call| call.layout.index_count).sum::<u32>(),
            36
        );
    }
}

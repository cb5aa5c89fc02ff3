//! # Uniform Binding Module
//!
//! This module defines the `UniformBinding` struct, which owns the GPU side of the per-frame
//! [`UniformBuffer`] record: the buffer it is written into, the bind group that exposes it to the
//! vertex shader, and the layout both the bind group and the render pipelines are built against.
//!
//! ## Overview
//!
//! The scene creates exactly one `UniformBinding`. Every frame it writes a fresh record through
//! [`UniformBinding::update_buffer`], and every submesh draw binds the same group at
//! [`UniformBinding::GROUP`]. The shader declares the matching slot:
//!
//! ```wgsl
//! @group(0) @binding(0)
//! var<uniform> uniforms: Uniforms;
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let uniform_binding = UniformBinding::new(&device);
//!
//! uniform_binding.update_buffer(&queue, 0, UniformBuffer::default());
//!
//! render_pass.set_bind_group(UniformBinding::GROUP, &uniform_binding.bind_group, &[]);
//! ```

use crate::uniform_buffer::UniformBuffer;

/// The uniform buffer, bind group and bind group layout for the transformation record.
///
/// # Fields
///
/// - `buffer`: The GPU buffer holding one [`UniformBuffer`]. Created with `UNIFORM | COPY_DST`
///   so the queue can overwrite it every frame.
/// - `bind_group`: Binds `buffer` at binding [`UniformBinding::BINDING`].
/// - `bind_group_layout`: Describes the single uniform entry, visible to the vertex stage. The
///   render pipelines are created against this layout.
pub struct UniformBinding {
    /// The GPU buffer that stores the current transformation record.
    ///
    /// Its size is exactly [`UniformBuffer::SIZE`] bytes; the memory layout must match the
    /// shader's `Uniforms` struct byte for byte.
    pub buffer: wgpu::Buffer,

    /// The bind group linking `buffer` to the pipeline.
    ///
    /// The same group is reused by every draw call of a frame, since all submeshes share one
    /// model-view and projection pair.
    pub bind_group: wgpu::BindGroup,

    /// The layout of `bind_group`.
    ///
    /// Declares one uniform buffer at binding `0`, visible to the vertex stage only. Render
    /// pipelines list this layout at index [`UniformBinding::GROUP`].
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl UniformBinding {
    /// The bind group index the uniform record is bound at.
    pub const GROUP: u32 = 0;

    /// The binding slot inside [`UniformBinding::GROUP`].
    pub const BINDING: u32 = 0;

    /// Creates the uniform buffer, its layout and its bind group.
    ///
    /// The buffer starts out zeroed; nothing sensible is drawn until the first
    /// [`UniformBinding::update_buffer`] call.
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Uniform Buffer"),
                contents: bytemuck::cast_slice(&[UniformBuffer::default()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        // A single vertex-stage uniform entry. No dynamic offsets: one record per frame.
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: Self::BINDING,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(UniformBuffer::SIZE as u64),
                },
                count: None,
            }],
            label: Some("uniform_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: Self::BINDING,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Writes `uniform_buffer` into the GPU buffer at `offset` bytes.
    ///
    /// The write is staged on the queue and lands before the next submitted command buffer
    /// executes, so it is safe to call right before encoding the frame that uses it.
    pub fn update_buffer(
        &self,
        queue: &wgpu::Queue,
        offset: wgpu::BufferAddress,
        uniform_buffer: UniformBuffer,
    ) {
        queue.write_buffer(
            &self.buffer,
            offset,
            bytemuck::cast_slice(&[uniform_buffer]),
        )
    }
}

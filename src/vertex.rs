//! # Vertex Module
//!
//! This module provides the `Vertex` struct: the interleaved per-vertex record every mesh is
//! uploaded as, and the `wgpu` buffer layout describing it to the render pipeline.
//!
//! # Layout
//!
//! | Location | Attribute  | Format      | Offset |
//! |----------|------------|-------------|--------|
//! | 0        | position   | `Float32x3` | 0      |
//! | 1        | normal     | `Float32x3` | 12     |
//! | 2        | tex_coords | `Float32x2` | 24     |
//!
//! The stride is 32 bytes. The shader's `VertexInput` struct declares the same three locations.
//!
//! # Usage
//!
//! ```ignore
//! let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
//!     label: Some("Vertex Buffer"),
//!     contents: bytemuck::cast_slice(&mesh.vertices),
//!     usage: wgpu::BufferUsages::VERTEX,
//! });
//!
//! let attributes = Vertex::vertex_attributes();
//! let layout = Vertex::description(&attributes);
//! ```

/// A single mesh vertex: position, normal and texture coordinates.
///
/// `#[repr(C)]` together with `bytemuck::Pod` lets a `&[Vertex]` be reinterpreted as the raw
/// bytes of a vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],

    /// Object-space normal. Expected to be unit length; the reader normalizes the normals it
    /// synthesizes but passes file-provided normals through unchanged.
    pub normal: [f32; 3],

    /// Texture coordinates. `[0.0, 0.0]` when the asset provides none.
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Size of one interleaved vertex in bytes.
    pub const STRIDE: wgpu::BufferAddress = std::mem::size_of::<Vertex>() as wgpu::BufferAddress;

    /// Returns the attribute list for the three vertex fields, at shader locations 0, 1 and 2.
    ///
    /// Offsets are derived by `wgpu::vertex_attr_array!` from the formats, so they come out as
    /// 0, 12 and 24.
    pub fn vertex_attributes() -> Vec<wgpu::VertexAttribute> {
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2].to_vec()
    }

    /// Returns the vertex buffer layout for the `Vertex` struct, stepping once per vertex.
    pub fn description(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}

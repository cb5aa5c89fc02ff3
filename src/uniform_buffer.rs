//! # Uniform Buffer
//!
//! This module defines the `UniformBuffer` struct, the per-draw record carrying the transformation
//! matrices from the CPU to the vertex shader.
//!
//! ## Overview
//!
//! The record holds two matrices rather than a single combined MVP:
//!
//! - **Model-view**: Places the mesh in view space. The scene composes it as
//!   `view * rotation * scale` every frame.
//! - **Projection**: Maps view space onto the clip volume.
//!
//! Keeping them apart lets the shader light the mesh in view space before projecting it.
//!
//! ## Memory Layout
//!
//! The struct is bound positionally: the WGSL side declares
//!
//! ```wgsl
//! struct Uniforms {
//!     model_view: mat4x4<f32>,
//!     projection: mat4x4<f32>,
//! }
//! ```
//!
//! and reads whatever bytes land at offsets `0` and `64`. Field order and the total size of
//! [`UniformBuffer::SIZE`] bytes must therefore never change without changing the shader too.
//!
//! - `#[repr(C)]`: Keeps the declared field order and packs the two matrices without padding.
//! - `bytemuck::Pod` and `bytemuck::Zeroable`: Allow the record to be cast to bytes and written
//!   straight into a `wgpu::Buffer`.

/// The transformation record uploaded to the uniform buffer once per frame.
///
/// # Example
///
/// ```
/// use turntable_core::UniformBuffer;
///
/// let uniforms = UniformBuffer {
///     model_view: nalgebra_glm::identity(),
///     projection: nalgebra_glm::identity(),
/// };
/// assert_eq!(bytemuck::bytes_of(&uniforms).len(), UniformBuffer::SIZE);
/// ```
#[repr(C)]
#[derive(Default, Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformBuffer {
    /// The combined model and view transform, `view * model`.
    ///
    /// Vertex positions and normals are multiplied by this matrix to move them into the
    /// camera's right-handed view space, where the camera sits at the origin looking down `-Z`.
    pub model_view: nalgebra_glm::Mat4,

    /// The projection from view space to clip space.
    ///
    /// Either a perspective or an orthographic projection built by the
    /// [`transform`](crate::transform) module.
    pub projection: nalgebra_glm::Mat4,
}

impl UniformBuffer {
    /// Size of the record in bytes, as declared by the shader's `Uniforms` struct.
    pub const SIZE: usize = 2 * 16 * std::mem::size_of::<f32>();
}

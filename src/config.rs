//! # Scene Configuration
//!
//! `SceneConfig` gathers the handful of knobs the scene exposes: which mesh to load, how big it
//! is drawn, where the camera sits, which projection is used and how the mesh spins. The
//! defaults reproduce the turntable look: a mesh scaled by two, 45 units in front of the camera,
//! seen through a 60 degree perspective with a square aspect ratio, turning at half a radian per
//! second.

use std::path::PathBuf;

use crate::rotation::{RotationMode, RotationState};
use crate::transform;

/// The Wavefront OBJ source bundled with the crate: a unit cube with normals and texture
/// coordinates.
pub const DEFAULT_MESH: &str = include_str!("../assets/container.obj");

/// Where the scene's mesh comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshSource {
    /// OBJ text compiled into the binary. Used on the web, where there is no file system.
    Embedded(&'static str),

    /// An OBJ file read at startup.
    Path(PathBuf),
}

/// The projection applied after the view transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// See [`transform::perspective`].
    Perspective {
        fov_radians: f32,
        near_z: f32,
        far_z: f32,
    },

    /// See [`transform::orthographic`]. `height` is the visible height; the width follows from
    /// the aspect ratio.
    Orthographic { height: f32, z_near: f32, z_far: f32 },
}

impl Projection {
    /// Builds the projection matrix for the given aspect ratio (width over height).
    pub fn matrix(&self, aspect: f32) -> nalgebra_glm::Mat4 {
        match *self {
            Projection::Perspective {
                fov_radians,
                near_z,
                far_z,
            } => transform::perspective(fov_radians, aspect, near_z, far_z),
            Projection::Orthographic {
                height,
                z_near,
                z_far,
            } => transform::orthographic(height * aspect, height, z_near, z_far),
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fov_radians: std::f32::consts::FRAC_PI_3,
            near_z: 0.1,
            far_z: 1000.0,
        }
    }
}

/// Configuration for a [`Scene`](crate::Scene).
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// The mesh to draw.
    pub mesh: MeshSource,

    /// Uniform scale applied to the mesh before it is rotated.
    pub model_scale: f32,

    /// The view translation. The camera stays at the origin; the world is pushed away from it.
    pub camera_offset: nalgebra_glm::Vec3,

    /// The projection.
    pub projection: Projection,

    /// Aspect ratio override. `None` follows the surface; `Some(1.0)` keeps the projection
    /// square whatever the window shape.
    pub aspect_ratio: Option<f32>,

    /// Rotation speed in radians per second.
    pub rotation_speed: f32,

    /// How the rotation advances from one frame to the next.
    pub rotation_mode: RotationMode,

    /// Background color the frame is cleared to.
    pub clear_color: wgpu::Color,
}

impl SceneConfig {
    /// Returns the default configuration with the mesh read from `path`.
    pub fn with_mesh_path(path: impl Into<PathBuf>) -> Self {
        Self {
            mesh: MeshSource::Path(path.into()),
            ..Self::default()
        }
    }

    /// The aspect ratio the projection is built with, given the surface's own ratio.
    pub fn effective_aspect(&self, surface_aspect: f32) -> f32 {
        self.aspect_ratio.unwrap_or(surface_aspect)
    }

    /// A fresh rotation state using this configuration's speed and mode.
    pub fn rotation_state(&self) -> RotationState {
        RotationState::new(self.rotation_speed, self.rotation_mode)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            mesh: MeshSource::Embedded(DEFAULT_MESH),
            model_scale: 2.0,
            camera_offset: nalgebra_glm::vec3(0.0, 0.0, -45.0),
            projection: Projection::default(),
            aspect_ratio: Some(1.0),
            rotation_speed: 0.5,
            rotation_mode: RotationMode::default(),
            clear_color: wgpu::Color {
                r: 0.19,
                g: 0.24,
                b: 0.42,
                a: 1.0,
            },
        }
    }
}

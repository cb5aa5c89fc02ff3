//! # Transform Builder
//!
//! The `transform` module constructs the 4x4 homogeneous matrices the scene feeds to the GPU every
//! frame: uniform scale, axis-angle rotation, translation, and the two projections.
//!
//! ## Conventions
//!
//! - Matrices are `nalgebra_glm::Mat4`, stored column-major.
//! - Vectors are columns, so `a * b` applies `b` first. A model-view matrix is therefore
//!   `view * rotation * scale`.
//! - View space is right-handed and the camera looks down `-Z`. Both projections map the
//!   near plane to clip `z = -w` and the far plane to clip `z = w`.
//!
//! ## Preconditions
//!
//! Every function here is total over well-formed input and none of them check their arguments.
//! Degenerate input (zero-width boxes, `z_far == z_near`, a zero aspect ratio) produces infinite or
//! NaN components rather than an error. `rotate` does not normalize its axis.
//!
//! ## Example
//!
//! ```
//! use nalgebra_glm as glm;
//! use turntable_core::transform;
//!
//! let model = transform::rotate(&glm::vec3(0.0, 1.0, 0.0), 0.25) * transform::scale(2.0);
//! let view = transform::translate(&glm::vec3(0.0, 0.0, -45.0));
//! let projection = transform::perspective(std::f32::consts::FRAC_PI_3, 1.0, 0.1, 1000.0);
//!
//! let clip = projection * view * model * glm::vec4(0.0, 0.0, 0.0, 1.0);
//! assert!((clip.w - 45.0).abs() < 1e-4);
//! ```

use nalgebra_glm::{vec4, Mat4, Vec3};

/// Builds a uniform scale matrix.
///
/// The first three diagonal entries are `s` and the fourth is `1`, so translations and the
/// homogeneous coordinate pass through untouched.
pub fn scale(s: f32) -> Mat4 {
    Mat4::from_columns(&[
        vec4(s, 0.0, 0.0, 0.0),
        vec4(0.0, s, 0.0, 0.0),
        vec4(0.0, 0.0, s, 0.0),
        vec4(0.0, 0.0, 0.0, 1.0),
    ])
}

/// Builds the rotation of `angle_radians` about `axis` using the Rodrigues formula.
///
/// With `c = cos θ`, `s = sin θ` and `t = 1 - c`, the upper 3x3 block is
/// `t * a * aᵀ + c * I + s * [a]ₓ`. The axis is used as given: it must be unit length for the
/// result to be a pure rotation.
pub fn rotate(axis: &Vec3, angle_radians: f32) -> Mat4 {
    let (x, y, z) = (axis.x, axis.y, axis.z);
    let c = angle_radians.cos();
    let s = angle_radians.sin();
    let t = 1.0 - c;

    Mat4::from_columns(&[
        vec4(t * x * x + c, t * x * y + z * s, t * x * z - y * s, 0.0),
        vec4(t * x * y - z * s, t * y * y + c, t * y * z + x * s, 0.0),
        vec4(t * x * z + y * s, t * y * z - x * s, t * z * z + c, 0.0),
        vec4(0.0, 0.0, 0.0, 1.0),
    ])
}

/// Builds a translation matrix with `offset` in the fourth column.
pub fn translate(offset: &Vec3) -> Mat4 {
    Mat4::from_columns(&[
        vec4(1.0, 0.0, 0.0, 0.0),
        vec4(0.0, 1.0, 0.0, 0.0),
        vec4(0.0, 0.0, 1.0, 0.0),
        vec4(offset.x, offset.y, offset.z, 1.0),
    ])
}

/// Builds an orthographic projection for a view volume of `width` by `height` centered on the
/// view axis.
///
/// This is [`orthographic_bounds`] with `left = -width / 2`, `right = width / 2`,
/// `bottom = -height / 2` and `top = height / 2`.
pub fn orthographic(width: f32, height: f32, z_near: f32, z_far: f32) -> Mat4 {
    let left = -width / 2.0;
    let right = width / 2.0;
    let bottom = -height / 2.0;
    let top = height / 2.0;

    orthographic_bounds(left, right, bottom, top, z_near, z_far)
}

/// Builds an orthographic projection mapping the box `[left, right] x [bottom, top]` and the
/// view-space depth range `[-z_near, -z_far]` onto the canonical clip volume.
pub fn orthographic_bounds(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    z_near: f32,
    z_far: f32,
) -> Mat4 {
    let inv_rl = 1.0 / (right - left);
    let inv_tb = 1.0 / (top - bottom);
    let inv_fn = 1.0 / (z_far - z_near);

    Mat4::from_columns(&[
        vec4(2.0 * inv_rl, 0.0, 0.0, 0.0),
        vec4(0.0, 2.0 * inv_tb, 0.0, 0.0),
        vec4(0.0, 0.0, -2.0 * inv_fn, 0.0),
        vec4(
            -(right + left) * inv_rl,
            -(top + bottom) * inv_tb,
            -(z_far + z_near) * inv_fn,
            1.0,
        ),
    ])
}

/// Builds a perspective projection from a vertical field of view.
///
/// `fov_radians` must lie in `(0, π)`, `aspect` (width over height) must be positive and
/// `0 < near_z < far_z`. Clip `w` receives `-z`, which is the positive distance in front of a
/// camera looking down `-Z`.
pub fn perspective(fov_radians: f32, aspect: f32, near_z: f32, far_z: f32) -> Mat4 {
    let y_scale = 1.0 / (fov_radians * 0.5).tan();
    let x_scale = y_scale / aspect;
    let z_range = far_z - near_z;
    let z_scale = -(far_z + near_z) / z_range;
    let wz_scale = -2.0 * far_z * near_z / z_range;

    Mat4::from_columns(&[
        vec4(x_scale, 0.0, 0.0, 0.0),
        vec4(0.0, y_scale, 0.0, 0.0),
        vec4(0.0, 0.0, z_scale, -1.0),
        vec4(0.0, 0.0, wz_scale, 0.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm::vec3;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};

    const EPS: f32 = 1e-5;

    fn assert_mat_close(a: &Mat4, b: &Mat4, eps: f32) {
        assert!((a - b).norm() < eps, "expected {b} but got {a}");
    }

    #[test]
    fn scale_scales_xyz_and_keeps_w() {
        for s in [0.5_f32, 1.0, 2.0, 17.25] {
            let v = scale(s) * vec4(1.0, 1.0, 1.0, 1.0);
            assert_eq!(v, vec4(s, s, s, 1.0));
        }
    }

    #[test]
    fn zero_angle_rotation_is_identity() {
        for axis in [vec3(0.0, 1.0, 0.0), vec3(1.0, 0.0, 0.0), vec3(0.3, -2.0, 5.0)] {
            assert_eq!(rotate(&axis, 0.0), Mat4::identity());
        }
    }

    #[test]
    fn rotation_is_undone_by_negated_angle() {
        let axes = [
            vec3(0.0, 1.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 0.0, 1.0),
            nalgebra_glm::normalize(&vec3(1.0, 2.0, -3.0)),
        ];
        for axis in axes {
            for angle in [0.1_f32, 1.0, FRAC_PI_2, 3.0, -2.5] {
                let product = rotate(&axis, angle) * rotate(&axis, -angle);
                assert_mat_close(&product, &Mat4::identity(), EPS);
            }
        }
    }

    #[test]
    fn quarter_turn_about_y_sends_x_to_negative_z() {
        let m = rotate(&vec3(0.0, 1.0, 0.0), FRAC_PI_2);
        let v = m * vec4(1.0, 0.0, 0.0, 0.0);
        assert!((v - vec4(0.0, 0.0, -1.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn rotation_agrees_with_glm() {
        let axis = nalgebra_glm::normalize(&vec3(-0.4, 0.7, 0.2));
        let ours = rotate(&axis, 1.3);
        let reference = nalgebra_glm::rotation(1.3, &axis);
        assert_mat_close(&ours, &reference, EPS);
    }

    #[test]
    fn translation_moves_origin() {
        let t = vec3(3.5, -2.0, -45.0);
        let p = translate(&t) * vec4(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p, vec4(t.x, t.y, t.z, 1.0));
    }

    #[test]
    fn translation_ignores_directions() {
        let d = translate(&vec3(9.0, 9.0, 9.0)) * vec4(1.0, 2.0, 3.0, 0.0);
        assert_eq!(d, vec4(1.0, 2.0, 3.0, 0.0));
    }

    #[test]
    fn projections_are_deterministic() {
        let a = perspective(FRAC_PI_3, 1.5, 0.1, 1000.0);
        let b = perspective(FRAC_PI_3, 1.5, 0.1, 1000.0);
        assert_eq!(a.as_slice(), b.as_slice());

        let a = orthographic(4.0, 3.0, 0.5, 20.0);
        let b = orthographic(4.0, 3.0, 0.5, 20.0);
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn orthographic_maps_box_corners_to_clip_corners() {
        let m = orthographic(2.0, 2.0, 0.0, 1.0);

        let near = m * vec4(1.0, 1.0, 0.0, 1.0);
        assert!((near - vec4(1.0, 1.0, -1.0, 1.0)).norm() < EPS);

        // The far plane sits at view-space z = -z_far.
        let far = m * vec4(1.0, 1.0, -1.0, 1.0);
        assert!((far - vec4(1.0, 1.0, 1.0, 1.0)).norm() < EPS);

        let opposite = m * vec4(-1.0, -1.0, 0.0, 1.0);
        assert!((opposite - vec4(-1.0, -1.0, -1.0, 1.0)).norm() < EPS);
    }

    #[test]
    fn off_center_orthographic_recenters_box() {
        let m = orthographic_bounds(2.0, 6.0, -1.0, 3.0, 1.0, 5.0);
        let center = m * vec4(4.0, 1.0, -3.0, 1.0);
        assert!((center - vec4(0.0, 0.0, 0.0, 1.0)).norm() < EPS);
    }

    #[test]
    fn perspective_maps_near_plane_to_negative_w() {
        let m = perspective(FRAC_PI_2, 1.0, 1.0, 2.0);

        let near = m * vec4(0.0, 0.0, -1.0, 1.0);
        assert!((near.w - 1.0).abs() < EPS);
        assert!((near.z + 1.0).abs() < EPS);

        let far = m * vec4(0.0, 0.0, -2.0, 1.0);
        assert!((far.w - 2.0).abs() < EPS);
        assert!((far.z / far.w - 1.0).abs() < EPS);
    }

    #[test]
    fn perspective_edges_of_fov_land_on_clip_edges() {
        // A 90 degree field of view spans y = ±d at distance d.
        let m = perspective(FRAC_PI_2, 2.0, 0.5, 50.0);
        let top = m * vec4(0.0, 10.0, -10.0, 1.0);
        assert!((top.y / top.w - 1.0).abs() < EPS);

        // Twice as wide as it is tall.
        let right = m * vec4(20.0, 0.0, -10.0, 1.0);
        assert!((right.x / right.w - 1.0).abs() < EPS);
    }

    #[test]
    fn composition_is_associative() {
        let a = rotate(&vec3(0.0, 1.0, 0.0), 0.7) * scale(2.0);
        let b = translate(&vec3(1.0, -4.0, 2.5)) * rotate(&vec3(1.0, 0.0, 0.0), -1.1);
        let c = perspective(PI / 4.0, 1.3, 0.2, 300.0);

        let left = (a * b) * c;
        let right = a * (b * c);
        assert!((left - right).norm() < 1e-4 * left.norm().max(1.0));
    }

    /// Matrices with entries in `[-10, 10)`, reproducible from `seed`.
    fn seeded_matrices(seed: u32, count: usize) -> Vec<Mat4> {
        let mut state = seed;
        let mut next = move || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 8) as f32 / (1u32 << 24) as f32 * 20.0 - 10.0
        };
        (0..count)
            .map(|_| Mat4::from_fn(|_, _| next()))
            .collect()
    }

    #[test]
    fn composition_is_associative_for_arbitrary_matrices() {
        for seed in [1, 7, 42, 2024, 0xDEAD] {
            let m = seeded_matrices(seed, 3);
            let left = (m[0] * m[1]) * m[2];
            let right = m[0] * (m[1] * m[2]);
            assert!(
                (left - right).norm() < 1e-4 * left.norm().max(1.0),
                "seed {seed}: {left} vs {right}"
            );
        }
    }

    #[test]
    fn composition_order_matters() {
        let s = scale(2.0);
        let t = translate(&vec3(1.0, 0.0, 0.0));
        let origin = vec4(0.0, 0.0, 0.0, 1.0);

        // `t * s` scales first, so the origin only picks up the translation.
        assert_eq!(t * s * origin, vec4(1.0, 0.0, 0.0, 1.0));
        assert_eq!(s * t * origin, vec4(2.0, 0.0, 0.0, 1.0));
    }
}

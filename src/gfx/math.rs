//! Transform math
//!
//! Pure matrix helpers used by the camera rig and scene objects. All matrices
//! are `cgmath` column-major `Matrix4<f32>` and follow the OpenGL clip-space
//! convention; [`OPENGL_TO_WGPU_MATRIX`] remaps depth for wgpu.

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, Rad, SquareMatrix, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Builds a right-handed view matrix looking from `eye` towards `target`.
///
/// The basis is orthogonalized Gram-Schmidt style from the backward vector
/// `eye - target`. The result is NaN when `eye == target` or when `up` is
/// parallel to the view direction; callers must rule both out.
pub fn look_at(eye: Vector3<f32>, target: Vector3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    let forward = (eye - target).normalize();
    let right = up.cross(forward).normalize();
    let up = forward.cross(right);

    #[rustfmt::skip]
    let view = Matrix4::new(
        right.x, up.x, forward.x, 0.0,
        right.y, up.y, forward.y, 0.0,
        right.z, up.z, forward.z, 0.0,
        -right.dot(eye), -up.dot(eye), -forward.dot(eye), 1.0,
    );
    view
}

/// Right-handed perspective projection with an OpenGL `[-1, 1]` depth range.
///
/// `aspect` must be positive.
pub fn perspective(fovy: Rad<f32>, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let f = 1.0 / (fovy.0 / 2.0).tan();

    #[rustfmt::skip]
    let projection = Matrix4::new(
        f / aspect, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0,
        0.0, 0.0, (far + near) / (near - far), -1.0,
        0.0, 0.0, 2.0 * near * far / (near - far), 0.0,
    );
    projection
}

/// Rotation about +Y by `angle` radians, turning +X towards +Z.
///
/// This is the same sense the orbit camera measures its azimuth in, so a
/// yaw and an azimuth of equal value point the same way.
pub fn rotation_y(angle: f32) -> Matrix3<f32> {
    Matrix3::from_angle_y(Rad(-angle))
}

/// Composes `T * R * S`: scale first, then rotate about +Y by `angle`
/// radians, then translate.
pub fn compose(translation: Vector3<f32>, angle: f32, scale: Vector3<f32>) -> Matrix4<f32> {
    let t = Matrix4::from_translation(translation);
    let r = Matrix4::from(rotation_y(angle));
    let s = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);
    t * r * s
}

/// Transpose of the inverse of `model`, for transforming normals.
///
/// A singular model (zero scale on some axis) has no meaningful normal
/// transform; identity is returned in that case.
pub fn normal_matrix(model: Matrix4<f32>) -> Matrix4<f32> {
    model
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix4::identity)
}

/// Normal matrix of `compose(_, angle, (s, s, s))` without a 4x4 inverse.
///
/// For a uniform scale the inverse transpose of the linear part is `R / s`.
/// Translation only affects the `w` row, which shaders discard for normals.
pub fn uniform_scale_normal_matrix(angle: f32, scale: f32) -> Matrix4<f32> {
    if scale == 0.0 {
        return Matrix4::identity();
    }
    Matrix4::from(rotation_y(angle) * (1.0 / scale))
}

pub fn matrix4_to_array(matrix: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix.into()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use cgmath::{Deg, Vector4};

    pub(crate) fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "expected {b}, got {a}");
    }

    pub(crate) fn assert_vec3_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert_close(a.x, b.x);
        assert_close(a.y, b.y);
        assert_close(a.z, b.z);
    }

    fn upper_left(m: Matrix4<f32>) -> Matrix3<f32> {
        Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
    }

    #[test]
    fn test_look_at_basis_is_orthonormal() {
        let eye = Vector3::new(50.0, 15.0, 0.0);
        let view = look_at(eye, Vector3::new(0.0, 15.0, 0.0), Vector3::unit_y());

        let right = Vector3::new(view.x.x, view.y.x, view.z.x);
        let up = Vector3::new(view.x.y, view.y.y, view.z.y);
        let forward = Vector3::new(view.x.z, view.y.z, view.z.z);

        for axis in [right, up, forward] {
            assert_close(axis.magnitude(), 1.0);
        }
        assert_close(right.dot(up), 0.0);
        assert_close(right.dot(forward), 0.0);
        assert_close(up.dot(forward), 0.0);

        // The eye maps to the view-space origin.
        let origin = view * eye.extend(1.0);
        assert_vec3_close(origin.truncate(), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_look_at_puts_target_in_front() {
        let eye = Vector3::new(3.0, 4.0, 5.0);
        let target = Vector3::new(-1.0, 0.5, 2.0);
        let view = look_at(eye, target, Vector3::unit_y());

        let in_view = view * target.extend(1.0);
        assert_close(in_view.x, 0.0);
        assert_close(in_view.y, 0.0);
        assert_close(in_view.z, -(eye - target).magnitude());
    }

    #[test]
    fn test_perspective_maps_near_and_far_planes() {
        let (near, far) = (0.01, 500.0);
        let projection = perspective(Rad::from(Deg(55.0)), 4.0 / 3.0, near, far);

        let near_point = projection * Vector4::new(0.0, 0.0, -near, 1.0);
        let far_point = projection * Vector4::new(0.0, 0.0, -far, 1.0);
        assert_close(near_point.z / near_point.w, -1.0);
        assert_close(far_point.z / far_point.w, 1.0);

        let f = 1.0 / (Rad::from(Deg(55.0f32)).0 / 2.0).tan();
        assert_close(projection.y.y, f);
        assert_close(projection.x.x, f * 3.0 / 4.0);
    }

    #[test]
    fn test_wgpu_remap_moves_depth_into_unit_range() {
        let projection =
            OPENGL_TO_WGPU_MATRIX * perspective(Rad::from(Deg(55.0)), 1.0, 0.01, 500.0);
        let near_point = projection * Vector4::new(0.0, 0.0, -0.01, 1.0);
        let far_point = projection * Vector4::new(0.0, 0.0, -500.0, 1.0);
        assert_close(near_point.z / near_point.w, 0.0);
        assert_close(far_point.z / far_point.w, 1.0);
    }

    #[test]
    fn test_wgpu_remap_keeps_screen_position() {
        let gl = perspective(Rad::from(Deg(55.0)), 4.0 / 3.0, 0.01, 500.0);
        let wgpu = OPENGL_TO_WGPU_MATRIX * gl;

        for point in [
            Vector4::new(10.0, 0.0, -50.0, 1.0),
            Vector4::new(-3.0, 7.5, -2.0, 1.0),
            Vector4::new(0.2, -0.4, -480.0, 1.0),
        ] {
            let a = gl * point;
            let b = wgpu * point;
            assert_close(b.w, a.w);
            assert_close(b.x / b.w, a.x / a.w);
            assert_close(b.y / b.w, a.y / a.w);
        }
    }

    #[test]
    fn test_rotation_y_turns_x_towards_z() {
        let r = rotation_y(std::f32::consts::FRAC_PI_2);
        assert_vec3_close(r * Vector3::unit_x(), Vector3::new(0.0, 0.0, 1.0));
        assert_vec3_close(r * Vector3::unit_z(), Vector3::new(-1.0, 0.0, 0.0));
        assert_vec3_close(r * Vector3::unit_y(), Vector3::unit_y());
    }

    #[test]
    fn test_compose_scales_then_rotates_then_translates() {
        let angle = std::f32::consts::FRAC_PI_2;
        let model = compose(
            Vector3::new(10.0, 0.0, 0.0),
            angle,
            Vector3::new(2.0, 1.0, 1.0),
        );

        // (1,0,0) -> scaled (2,0,0) -> rotated 90° about Y (0,0,2) -> translated.
        let p = model * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_vec3_close(p.truncate(), Vector3::new(10.0, 0.0, 2.0));
    }

    #[test]
    fn test_normal_matrix_of_uniform_scale_is_rotation() {
        let angle = 0.7;
        let scale = 3.0;
        let model = compose(
            Vector3::new(1.0, 2.0, 3.0),
            angle,
            Vector3::new(scale, scale, scale),
        );
        let rotation = rotation_y(angle);

        let normal = upper_left(normal_matrix(model)) * scale;
        for (col, expected) in [(normal.x, rotation.x), (normal.y, rotation.y), (normal.z, rotation.z)] {
            assert_vec3_close(col, expected);
        }
    }

    #[test]
    fn test_uniform_scale_fast_path_matches_general_inverse() {
        for (angle, scale) in [(0.0, 1.0), (1.3, 0.5), (-2.4, 7.0)] {
            let model = compose(
                Vector3::new(-4.0, 1.0, 9.0),
                angle,
                Vector3::new(scale, scale, scale),
            );
            let general = upper_left(normal_matrix(model));
            let fast = upper_left(uniform_scale_normal_matrix(angle, scale));
            for (a, b) in [(general.x, fast.x), (general.y, fast.y), (general.z, fast.z)] {
                assert_vec3_close(a, b);
            }
        }
    }

    #[test]
    fn test_normal_matrix_corrects_non_uniform_scale() {
        // A surface tilted 45° in XY, squashed along Y.
        let model = compose(Vector3::new(0.0, 0.0, 0.0), 0.0, Vector3::new(1.0, 0.5, 1.0));
        let tangent = (model * Vector4::new(1.0, -1.0, 0.0, 0.0)).truncate();
        let normal = (normal_matrix(model) * Vector4::new(1.0, 1.0, 0.0, 0.0)).truncate();
        assert_close(tangent.dot(normal), 0.0);
    }

    #[test]
    fn test_singular_model_falls_back_to_identity() {
        let model = compose(Vector3::new(0.0, 0.0, 0.0), 0.3, Vector3::new(0.0, 1.0, 1.0));
        assert_eq!(normal_matrix(model), Matrix4::identity());
    }
}

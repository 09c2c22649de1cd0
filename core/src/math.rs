//! Math type aliases and helper functions.
//!
//! Mesh data handed to the host is `f32`; transforms coming from the
//! generation engine are `f64` and keep double precision until they are
//! decomposed.

pub use nalgebra;

// ===== Mesh math (f32) =====

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

// ===== Transform math (f64) =====

/// 3D vector (f64).
pub type DVec3 = nalgebra::Vector3<f64>;

/// 3x3 matrix (f64).
pub type DMat3 = nalgebra::Matrix3<f64>;

/// 4x4 matrix (f64).
pub type DMat4 = nalgebra::Matrix4<f64>;

/// Quaternion (f64). Stored as `[x, y, z, w]` in memory.
pub type DQuat = nalgebra::Quaternion<f64>;

/// Column norms below this are treated as a collapsed axis.
pub const DEGENERATE_AXIS_EPSILON: f64 = 1e-12;

// ===== Helper functions =====

/// Swap the Y and Z components of a vector.
///
/// Converts between a Y-up and a Z-up frame. Applying it twice is the
/// identity.
pub fn swap_yz<T: nalgebra::Scalar + Copy>(v: nalgebra::Vector3<T>) -> nalgebra::Vector3<T> {
    nalgebra::Vector3::new(v.x, v.z, v.y)
}

/// Conjugate a rotation by the Y/Z swap.
///
/// The swap is a reflection, so the rotation axis is swapped and the angle
/// flips sign: `(x, y, z, w)` becomes `(-x, -z, -y, w)`. Self-inverse.
pub fn swap_yz_quat(q: DQuat) -> DQuat {
    DQuat::new(q.w, -q.i, -q.k, -q.j)
}

/// Build a 4x4 matrix from a flat array of four column vectors.
///
/// The generation engine reports transforms as four basis rows (x axis,
/// y axis, z axis, translation) of a row-vector matrix, which is the same
/// memory layout as four columns of a column-vector matrix.
pub fn dmat4_from_basis_rows(a: &[f64; 16]) -> DMat4 {
    DMat4::from_column_slice(a)
}

/// Split a 3x3 linear map into a proper rotation and a signed scale.
///
/// Scale is the column norms, negated when the determinant is negative so
/// that the rotation carries no reflection. The rotation is the nearest
/// orthonormal matrix to the normalized columns.
pub fn decompose_linear(m: &DMat3) -> (nalgebra::UnitQuaternion<f64>, DVec3) {
    let sign = if m.determinant() < 0.0 { -1.0 } else { 1.0 };
    let mut columns = [DVec3::zeros(); 3];
    let mut scale = DVec3::zeros();
    for i in 0..3 {
        let col = m.column(i).into_owned();
        let norm = col.norm();
        scale[i] = norm * sign;
        columns[i] = if norm > DEGENERATE_AXIS_EPSILON {
            col / norm * sign
        } else {
            let mut axis = DVec3::zeros();
            axis[i] = 1.0;
            axis
        };
    }
    let basis = DMat3::from_columns(&columns);
    let rotation = nalgebra::Rotation3::from_matrix_unchecked(nearest_rotation(&basis));
    (
        nalgebra::UnitQuaternion::from_rotation_matrix(&rotation),
        scale,
    )
}

/// Nearest proper rotation to `m` (orthogonal polar factor via SVD).
fn nearest_rotation(m: &DMat3) -> DMat3 {
    let svd = m.svd(true, true);
    let (Some(mut u), Some(v_t)) = (svd.u, svd.v_t) else {
        return DMat3::identity();
    };
    if (u * v_t).determinant() < 0.0 {
        // Singular values are sorted, so the last column is the weakest axis.
        u.column_mut(2).neg_mut();
    }
    u * v_t
}

/// Build a 4x4 TRS matrix from scale, rotation (quaternion), and translation.
pub fn dmat4_from_scale_rotation_translation(scale: DVec3, rotation: DQuat, translation: DVec3) -> DMat4 {
    let r = nalgebra::UnitQuaternion::new_normalize(rotation);
    let m = r.to_rotation_matrix();
    let rm = m.matrix();
    #[rustfmt::skip]
    let result = DMat4::new(
        rm[(0, 0)] * scale.x, rm[(0, 1)] * scale.y, rm[(0, 2)] * scale.z, translation.x,
        rm[(1, 0)] * scale.x, rm[(1, 1)] * scale.y, rm[(1, 2)] * scale.z, translation.y,
        rm[(2, 0)] * scale.x, rm[(2, 1)] * scale.y, rm[(2, 2)] * scale.z, translation.z,
        0.0,                  0.0,                  0.0,                  1.0,
    );
    result
}

/// Create a quaternion from x, y, z, w components.
pub fn dquat_from_xyzw(x: f64, y: f64, z: f64, w: f64) -> DQuat {
    nalgebra::Quaternion::new(w, x, y, z)
}

/// Convert a quaternion to a `[x, y, z, w]` array.
pub fn dquat_to_array(q: DQuat) -> [f64; 4] {
    [q.coords.x, q.coords.y, q.coords.z, q.coords.w]
}

/// Create a quaternion from a `[x, y, z, w]` array.
pub fn dquat_from_array(a: [f64; 4]) -> DQuat {
    nalgebra::Quaternion::new(a[3], a[0], a[1], a[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn rotate(q: DQuat, v: DVec3) -> DVec3 {
        nalgebra::UnitQuaternion::new_normalize(q) * v
    }

    #[test]
    fn swap_yz_is_self_inverse() {
        let v = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(swap_yz(v), DVec3::new(1.0, 3.0, 2.0));
        assert_eq!(swap_yz(swap_yz(v)), v);

        let q = dquat_from_xyzw(0.1, 0.2, 0.3, 0.9);
        assert_eq!(swap_yz_quat(swap_yz_quat(q)), q);
    }

    #[test]
    fn swapped_quaternion_rotates_swapped_vectors() {
        let q = nalgebra::UnitQuaternion::from_axis_angle(&DVec3::x_axis(), FRAC_PI_2)
            .into_inner();
        let v = DVec3::new(0.3, 1.0, -0.5);

        let expected = swap_yz(rotate(q, v));
        let actual = rotate(swap_yz_quat(q), swap_yz(v));
        assert!((expected - actual).norm() < 1e-12);
    }

    #[test]
    fn basis_rows_put_translation_last() {
        #[rustfmt::skip]
        let a = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            4.0, 5.0, 6.0, 1.0,
        ];
        let m = dmat4_from_basis_rows(&a);
        assert_eq!(m[(0, 3)], 4.0);
        assert_eq!(m[(1, 3)], 5.0);
        assert_eq!(m[(2, 3)], 6.0);
    }

    #[test]
    fn decompose_linear_reflection() {
        let m = DMat3::from_diagonal(&DVec3::new(2.0, -3.0, 4.0));
        let (rotation, scale) = decompose_linear(&m);

        let negatives = scale.iter().filter(|s| **s < 0.0).count();
        assert_eq!(negatives, 3);
        assert!((rotation.to_rotation_matrix().matrix().determinant() - 1.0).abs() < 1e-12);

        // Reassembling yields the original map.
        let rebuilt = rotation.to_rotation_matrix().matrix() * DMat3::from_diagonal(&scale);
        assert!((rebuilt - m).norm() < 1e-9);
    }

    #[test]
    fn decompose_linear_collapsed_axis() {
        let m = DMat3::from_diagonal(&DVec3::new(1.0, 0.0, 1.0));
        let (rotation, scale) = decompose_linear(&m);
        assert_eq!(scale, DVec3::new(1.0, 0.0, 1.0));
        assert!(rotation.angle().abs() < 1e-12);
    }

    #[test]
    fn trs_roundtrip() {
        let s = DVec3::new(2.0, 3.0, 4.0);
        let r = nalgebra::UnitQuaternion::from_axis_angle(&DVec3::y_axis(), 1.0).into_inner();
        let t = DVec3::new(5.0, 6.0, 7.0);
        let m = dmat4_from_scale_rotation_translation(s, r, t);

        let linear = m.fixed_view::<3, 3>(0, 0).into_owned();
        let (r2, s2) = decompose_linear(&linear);
        assert!((s - s2).norm() < 1e-9);
        let test = DVec3::new(1.0, 0.0, 0.0);
        assert!((rotate(r, test) - r2 * test).norm() < 1e-9);
    }

    #[test]
    fn quat_array_roundtrip() {
        let q = dquat_from_xyzw(0.1, 0.2, 0.3, 0.9);
        assert_eq!(dquat_to_array(q), [0.1, 0.2, 0.3, 0.9]);
        assert_eq!(dquat_from_array([0.1, 0.2, 0.3, 0.9]), q);
    }
}

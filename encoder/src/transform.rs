//! Decomposition of engine instance matrices into host TRS transforms.

use procbridge_core::math::{self, DVec3};
use procbridge_core::scene::InstanceTransform;

use crate::convert::CoordinateConversion;

/// Turns engine placement matrices into host-space [`InstanceTransform`]s.
///
/// The engine matrix maps engine-space points `v` to `M v`. The resulting
/// transform maps host-space points so that placing a converted vertex
/// gives the converted placed vertex: `host(k P v) == k P (M v)`, where `P`
/// swaps Y and Z and `k` is the unit scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceTransformDecomposer {
    conversion: CoordinateConversion,
}

impl InstanceTransformDecomposer {
    pub fn new(conversion: CoordinateConversion) -> Self {
        Self { conversion }
    }

    /// Decompose a matrix given as four basis rows (x axis, y axis, z axis,
    /// translation).
    ///
    /// A negative determinant is carried by the scale; the rotation is
    /// always proper.
    pub fn decompose(&self, transform: &[f64; 16]) -> InstanceTransform {
        let mut m = math::dmat4_from_basis_rows(transform);
        let w = m[(3, 3)];
        if w != 0.0 && w != 1.0 {
            m /= w;
        }

        let linear = m.fixed_view::<3, 3>(0, 0).into_owned();
        let (rotation, scale) = math::decompose_linear(&linear);
        let translation = DVec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);

        // Conjugating by the axis swap permutes scale axes along with the
        // rotation axes.
        let rotation = math::swap_yz_quat(rotation.into_inner());
        let scale = math::swap_yz(scale);
        let translation = self.conversion.translation(translation);

        InstanceTransform {
            translation: translation.into(),
            rotation: math::dquat_to_array(rotation),
            scale: scale.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procbridge_core::math::{DMat3, DMat4};

    fn rows(m: &DMat4) -> [f64; 16] {
        let mut a = [0.0; 16];
        a.copy_from_slice(m.as_slice());
        a
    }

    fn assert_close(a: [f64; 3], b: [f64; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    fn check_round_trip(m: &DMat4, unit_scale: f64) {
        let decomposer = InstanceTransformDecomposer::new(CoordinateConversion::new(unit_scale));
        let t = decomposer.decompose(&rows(m));
        for v in [
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.3, -2.0, 5.0),
        ] {
            let placed = m.transform_point(&nalgebra::Point3::from(v));
            let expected = math::swap_yz(placed.coords) * unit_scale;
            let host_v = math::swap_yz(v) * unit_scale;
            assert_close(t.transform_point(host_v.into()), expected.into());
        }
    }

    #[test]
    fn pure_translation() {
        let mut a = [0.0; 16];
        a[0] = 1.0;
        a[5] = 1.0;
        a[10] = 1.0;
        a[12] = 1.0;
        a[13] = 2.0;
        a[14] = 3.0;
        a[15] = 1.0;
        let t = InstanceTransformDecomposer::default().decompose(&a);
        assert_close(t.translation, [100.0, 300.0, 200.0]);
        assert_close(t.scale, [1.0, 1.0, 1.0]);
        assert!((t.rotation[3].abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_and_scale_round_trip() {
        let r = nalgebra::Rotation3::from_euler_angles(0.3, -1.1, 2.0);
        let m = nalgebra::Isometry3::from_parts(
            nalgebra::Translation3::new(4.0, -1.0, 2.5),
            nalgebra::UnitQuaternion::from_rotation_matrix(&r),
        )
        .to_homogeneous()
            * DMat4::new_nonuniform_scaling(&DVec3::new(2.0, 0.5, 3.0));
        check_round_trip(&m, 100.0);
    }

    #[test]
    fn reflection_goes_into_scale() {
        let mut linear = DMat3::identity();
        linear[(0, 0)] = -2.0;
        let mut m = linear.to_homogeneous();
        m[(1, 3)] = 5.0;

        let t = InstanceTransformDecomposer::new(CoordinateConversion::new(1.0))
            .decompose(&rows(&m));
        let negatives = t.scale.iter().filter(|s| **s < 0.0).count();
        assert!(negatives == 1 || negatives == 3);
        assert!(t.is_reflection());

        let q = nalgebra::UnitQuaternion::new_normalize(math::dquat_from_array(t.rotation));
        assert!((q.to_rotation_matrix().matrix().determinant() - 1.0).abs() < 1e-9);
        check_round_trip(&m, 1.0);
    }

    #[test]
    fn rotated_reflection_round_trip() {
        let r = nalgebra::Rotation3::from_axis_angle(&DVec3::z_axis(), 0.7);
        let m = r.to_homogeneous() * DMat4::new_nonuniform_scaling(&DVec3::new(1.0, -1.5, 2.0));
        check_round_trip(&m, 10.0);
    }

    #[test]
    fn homogeneous_weight_is_normalized() {
        let mut m = DMat4::identity() * 2.0;
        m[(0, 3)] = 2.0;
        let t = InstanceTransformDecomposer::new(CoordinateConversion::new(1.0))
            .decompose(&rows(&m));
        assert_close(t.scale, [1.0, 1.0, 1.0]);
        assert_close(t.translation, [1.0, 0.0, 0.0]);
    }
}

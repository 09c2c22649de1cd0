//! Instance transform type.

use crate::math::{self, DMat4, DVec3};

/// TRS transform of one placed instance, in host space.
///
/// Applied as scale, then rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    /// Translation [x, y, z].
    pub translation: [f64; 3],
    /// Rotation quaternion [x, y, z, w].
    pub rotation: [f64; 4],
    /// Scale [x, y, z]. Negative components encode reflection.
    pub scale: [f64; 3],
}

impl InstanceTransform {
    /// Identity transform: no translation, identity rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    };

    /// Returns this transform with a different translation.
    #[must_use]
    pub const fn with_translation(mut self, translation: [f64; 3]) -> Self {
        self.translation = translation;
        self
    }

    /// Returns this transform with a different rotation.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: [f64; 4]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns this transform with a different scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: [f64; 3]) -> Self {
        self.scale = scale;
        self
    }

    /// Compose into a column-vector 4x4 matrix.
    pub fn to_matrix(&self) -> DMat4 {
        math::dmat4_from_scale_rotation_translation(
            DVec3::from(self.scale),
            math::dquat_from_array(self.rotation),
            DVec3::from(self.translation),
        )
    }

    /// Apply the transform to a point.
    pub fn transform_point(&self, p: [f64; 3]) -> [f64; 3] {
        let m = self.to_matrix();
        let v = m.fixed_view::<3, 3>(0, 0) * DVec3::from(p) + m.fixed_view::<3, 1>(0, 3);
        [v.x, v.y, v.z]
    }

    /// Whether the scale flips handedness.
    pub fn is_reflection(&self) -> bool {
        self.scale.iter().filter(|s| **s < 0.0).count() % 2 == 1
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

//! Conversion from the generation engine's frame into the host frame.
//!
//! The engine is Y-up and works in metres; the host is Z-up and scales
//! lengths by a configurable unit factor. Texture space disagrees on the
//! vertical direction.

use procbridge_core::math::{self, DVec3};

/// Axis swap plus unit scale applied to everything entering the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateConversion {
    pub unit_scale: f64,
}

impl CoordinateConversion {
    pub fn new(unit_scale: f64) -> Self {
        Self { unit_scale }
    }

    /// Swap Y/Z and apply the unit scale.
    pub fn position(&self, p: [f64; 3]) -> [f32; 3] {
        let v = math::swap_yz(DVec3::from(p)) * self.unit_scale;
        [v.x as f32, v.y as f32, v.z as f32]
    }

    /// Swap Y/Z without scaling.
    pub fn normal(&self, n: [f64; 3]) -> [f32; 3] {
        let v = math::swap_yz(DVec3::from(n));
        [v.x as f32, v.y as f32, v.z as f32]
    }

    /// Flip the V coordinate.
    pub fn uv(&self, uv: [f64; 2]) -> [f32; 2] {
        [uv[0] as f32, -uv[1] as f32]
    }

    /// Position conversion kept in double precision, for transforms.
    pub fn translation(&self, t: DVec3) -> DVec3 {
        math::swap_yz(t) * self.unit_scale
    }
}

impl Default for CoordinateConversion {
    fn default() -> Self {
        Self::new(100.0)
    }
}

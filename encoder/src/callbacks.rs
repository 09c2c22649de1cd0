//! Callback protocol driven by the generation engine.
//!
//! The engine evaluates shape rules and reports results through these
//! calls, in shape order, on one thread. All slices are borrowed for the
//! duration of the call only.

use procbridge_core::attributes::AttributeMap;

use crate::error::EncoderResult;

/// Coordinates and per-corner indices of one UV set.
#[derive(Debug, Clone, Copy, Default)]
pub struct UvSet<'a> {
    /// Flat `(u, v)` pairs.
    pub coords: &'a [f64],
    /// One index per face corner into `coords` pairs. Empty when the set
    /// is unused.
    pub indices: &'a [u32],
}

/// Flat geometry of one generated mesh, as reported by the engine.
#[derive(Debug, Clone, Copy)]
pub struct MeshGeometry<'a> {
    pub name: &'a str,
    pub prototype_id: i32,
    /// Flat `(x, y, z)` positions.
    pub vertices: &'a [f64],
    /// Flat `(x, y, z)` normals.
    pub normals: &'a [f64],
    /// Corner count of each face.
    pub face_vertex_counts: &'a [u32],
    /// One position index per corner.
    pub vertex_indices: &'a [u32],
    /// One normal index per corner.
    pub normal_indices: &'a [u32],
    pub uv_sets: &'a [UvSet<'a>],
    /// Number of faces in each face group, consumed in order.
    pub face_ranges: &'a [u32],
    /// Material description of each face group.
    pub materials: &'a [AttributeMap],
}

impl<'a> MeshGeometry<'a> {
    /// Geometry with every stream empty.
    pub fn empty(name: &'a str, prototype_id: i32) -> Self {
        Self {
            name,
            prototype_id,
            vertices: &[],
            normals: &[],
            face_vertex_counts: &[],
            vertex_indices: &[],
            normal_indices: &[],
            uv_sets: &[],
            face_ranges: &[],
            materials: &[],
        }
    }
}

/// Receiver of generation events.
///
/// Attribute setters never fail. `add_mesh` and `add_instance` return an
/// error when the engine breaks the protocol; the receiver is unchanged in
/// that case.
pub trait GenerationCallbacks {
    fn attr_bool(&mut self, shape_id: i32, key: &str, value: bool);
    fn attr_float(&mut self, shape_id: i32, key: &str, value: f64);
    fn attr_string(&mut self, shape_id: i32, key: &str, value: &str);
    fn attr_bool_array(&mut self, shape_id: i32, key: &str, values: &[bool]);
    fn attr_float_array(&mut self, shape_id: i32, key: &str, values: &[f64]);
    fn attr_string_array(&mut self, shape_id: i32, key: &str, values: &[&str]);

    /// Build and register the mesh of a prototype.
    fn add_mesh(&mut self, geometry: &MeshGeometry<'_>) -> EncoderResult<()>;

    /// Record one placement of a registered prototype.
    ///
    /// `transform` holds four basis rows: x axis, y axis, z axis and
    /// translation, each with a trailing homogeneous component.
    fn add_instance(&mut self, prototype_id: i32, transform: &[f64; 16]) -> EncoderResult<()>;
}

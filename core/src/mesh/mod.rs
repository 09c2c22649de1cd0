//! CPU-side mesh types.
//!
//! - [`MeshDescription`] - Polygonal mesh with per-corner attributes, built incrementally
//! - [`CpuMesh`] - Finalized triangle mesh (vertex bytes, index bytes, sections)
//! - [`VertexLayout`] - Interleaved vertex attribute layout

mod data;
mod description;
mod layout;

pub use data::{CpuMesh, IndexFormat, MeshSection};
pub use description::{MeshDescription, PolygonGroupId, PolygonId, VertexId, VertexInstanceId};
pub use layout::{VertexAttribute, VertexAttributeFormat, VertexAttributeSemantic, VertexLayout};

//! # Procbridge Encoder
//!
//! Receiver side of a procedural shape-grammar engine's callback protocol.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`GenerationCallbacks`] - The calls the engine makes during a generation pass
//! - [`GeometryEncoder`] - Receiver that turns those calls into host data
//! - [`MeshAssembler`] - Flat geometry streams to polygonal meshes
//! - [`InstanceTransformDecomposer`] - Engine matrices to host TRS transforms
//! - [`MaterialBuilder`] - Face-group attributes to material instances
//! - [`PrototypeRegistry`] - Prototype meshes and their placements
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use procbridge_encoder::{
//!     EncoderSettings, FileImageLoader, GenerationCallbacks, GeometryEncoder, MeshGeometry,
//! };
//!
//! let mut encoder = GeometryEncoder::new(EncoderSettings::default(), Arc::new(FileImageLoader::new()));
//! let vertices = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let geometry = MeshGeometry {
//!     vertices: &vertices,
//!     face_vertex_counts: &[3],
//!     vertex_indices: &[0, 1, 2],
//!     face_ranges: &[1],
//!     ..MeshGeometry::empty("triangle", 0)
//! };
//! encoder.add_mesh(&geometry)?;
//! encoder.add_instance(0, &[
//!     1.0, 0.0, 0.0, 0.0,
//!     0.0, 1.0, 0.0, 0.0,
//!     0.0, 0.0, 1.0, 0.0,
//!     5.0, 0.0, 0.0, 1.0,
//! ])?;
//! for batch in encoder.take_instances() {
//!     println!("{}: {} placements", batch.mesh.name, batch.transforms.len());
//! }
//! # Ok::<(), procbridge_encoder::EncoderError>(())
//! ```

pub mod accumulator;
pub mod assembler;
pub mod callbacks;
pub mod convert;
pub mod encoder;
pub mod error;
pub mod image_loader;
pub mod material_builder;
pub mod registry;
pub mod settings;
pub mod transform;

pub use accumulator::{AttributeAccumulator, ShapeAttributes};
pub use assembler::MeshAssembler;
pub use callbacks::{GenerationCallbacks, MeshGeometry, UvSet};
pub use convert::CoordinateConversion;
pub use encoder::GeometryEncoder;
pub use error::{EncoderError, EncoderResult, ImageLoadError};
pub use image_loader::{FileImageLoader, ImageLoader};
pub use material_builder::MaterialBuilder;
pub use registry::{
    InstanceBatch, PrototypeHandle, PrototypeMesh, PrototypeRegistry, SharedPrototypeRegistry,
};
pub use settings::{EncoderSettings, MaterialBinding};
pub use transform::InstanceTransformDecomposer;

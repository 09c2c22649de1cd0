//! Placement types for instanced geometry.
//!
//! - [`InstanceTransform`] - Decomposed TRS transform in host space

mod types;

pub use types::InstanceTransform;

//! Typed attribute maps.
//!
//! The generation engine reports rule-evaluation output and material
//! descriptions as flat key/value maps. This module provides:
//!
//! - [`AttributeValue`] - Tagged value (bool, float, string and their arrays)
//! - [`AttributeMapBuilder`] - Mutable accumulator with last-write-wins setters
//! - [`AttributeMap`] - Immutable snapshot with typed, non-failing lookups

mod map;
mod value;

pub use map::{AttributeMap, AttributeMapBuilder};
pub use value::{AttributeKind, AttributeValue};

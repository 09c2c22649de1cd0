//! Per-shape accumulation of rule attribute events.

use std::collections::BTreeMap;

use procbridge_core::attributes::{AttributeMap, AttributeMapBuilder};

/// Collects attribute events for one shape's rule evaluation.
///
/// Setters overwrite any earlier value for the same key and never fail.
#[derive(Debug, Default)]
pub struct AttributeAccumulator {
    builder: AttributeMapBuilder,
}

impl AttributeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.builder.set_bool(key, value);
    }

    pub fn set_float(&mut self, key: &str, value: f64) {
        self.builder.set_float(key, value);
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        self.builder.set_string(key, value);
    }

    pub fn set_bool_array(&mut self, key: &str, values: &[bool]) {
        self.builder.set_bool_array(key, values);
    }

    pub fn set_float_array(&mut self, key: &str, values: &[f64]) {
        self.builder.set_float_array(key, values);
    }

    pub fn set_string_array<S: AsRef<str>>(&mut self, key: &str, values: &[S]) {
        self.builder.set_string_array(key, values);
    }

    pub fn len(&self) -> usize {
        self.builder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builder.is_empty()
    }

    /// Snapshot of the current values.
    pub fn attributes(&self) -> AttributeMap {
        self.builder.build()
    }

    /// Finish the scope, returning its values and leaving it empty.
    pub fn finish(&mut self) -> AttributeMap {
        self.builder.take()
    }
}

/// One [`AttributeAccumulator`] per shape id.
#[derive(Debug, Default)]
pub struct ShapeAttributes {
    scopes: BTreeMap<i32, AttributeAccumulator>,
}

impl ShapeAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator for `shape_id`, created on first use.
    pub fn scope(&mut self, shape_id: i32) -> &mut AttributeAccumulator {
        self.scopes.entry(shape_id).or_default()
    }

    /// Drain one shape's attributes. Unknown shapes yield `None`.
    pub fn take(&mut self, shape_id: i32) -> Option<AttributeMap> {
        self.scopes.remove(&shape_id).map(|mut acc| acc.finish())
    }

    /// Drain every shape's attributes in ascending shape id order.
    pub fn take_all(&mut self) -> Vec<(i32, AttributeMap)> {
        std::mem::take(&mut self.scopes)
            .into_iter()
            .map(|(id, mut acc)| (id, acc.finish()))
            .collect()
    }

    /// Number of shapes with an open scope.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

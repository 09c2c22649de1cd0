//! Attribute map and its builder.

use std::collections::BTreeMap;

use super::value::AttributeValue;

/// Mutable accumulator for attribute values.
///
/// Every setter overwrites a previous value stored under the same key,
/// regardless of its kind. Setters never fail.
///
/// # Example
///
/// ```
/// use procbridge_core::attributes::AttributeMapBuilder;
///
/// let mut builder = AttributeMapBuilder::new();
/// builder.set_float("height", 10.0);
/// builder.set_float("height", 12.5);
/// builder.set_string_array("diffuseMap", &["", "assets/brick.png"]);
///
/// let map = builder.take();
/// assert_eq!(map.get_float("height"), Some(12.5));
/// assert!(builder.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeMapBuilder {
    values: BTreeMap<String, AttributeValue>,
}

impl AttributeMapBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: AttributeValue) {
        match self.values.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(key.to_string(), value);
            }
        }
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, AttributeValue::Bool(value));
    }

    pub fn set_float(&mut self, key: &str, value: f64) {
        self.set(key, AttributeValue::Float(value));
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        self.set(key, AttributeValue::String(value.to_string()));
    }

    pub fn set_bool_array(&mut self, key: &str, values: &[bool]) {
        self.set(key, AttributeValue::BoolArray(values.to_vec()));
    }

    pub fn set_float_array(&mut self, key: &str, values: &[f64]) {
        self.set(key, AttributeValue::FloatArray(values.to_vec()));
    }

    pub fn set_string_array<S: AsRef<str>>(&mut self, key: &str, values: &[S]) {
        self.set(
            key,
            AttributeValue::StringArray(values.iter().map(|s| s.as_ref().to_string()).collect()),
        );
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Snapshot the current contents without clearing the builder.
    pub fn build(&self) -> AttributeMap {
        AttributeMap {
            values: self.values.clone(),
        }
    }

    /// Move the current contents into a map, leaving the builder empty.
    pub fn take(&mut self) -> AttributeMap {
        AttributeMap {
            values: std::mem::take(&mut self.values),
        }
    }

    /// Drop all accumulated values.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Immutable mapping from attribute name to typed value.
///
/// Lookups never fail: a missing key and a value of another kind both
/// read as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    values: BTreeMap<String, AttributeValue>,
}

impl AttributeMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_float()
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn get_bool_array(&self, key: &str) -> Option<&[bool]> {
        self.get(key)?.as_bool_array()
    }

    pub fn get_float_array(&self, key: &str) -> Option<&[f64]> {
        self.get(key)?.as_float_array()
    }

    pub fn get_string_array(&self, key: &str) -> Option<&[String]> {
        self.get(key)?.as_string_array()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Key/value pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, AttributeValue)> for AttributeMap {
    fn from_iter<T: IntoIterator<Item = (String, AttributeValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

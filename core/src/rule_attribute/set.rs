//! Collections of rule attributes.

use std::cmp::Ordering;

use crate::attributes::{AttributeMap, AttributeMapBuilder, AttributeValue};

use super::types::{RuleAttribute, RuleAttributeValue};

/// Rule attributes of one rule package, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleAttributeSet {
    attributes: Vec<RuleAttribute>,
}

impl RuleAttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build rule attributes from the evaluated default values of a rule.
    ///
    /// Only scalar values become rule attributes; array values are skipped.
    pub fn from_defaults(defaults: &AttributeMap) -> Self {
        let mut set = Self::new();
        for (key, value) in defaults.iter() {
            let value = match value {
                AttributeValue::Bool(v) => RuleAttributeValue::Bool(*v),
                AttributeValue::Float(v) => RuleAttributeValue::Float(*v),
                AttributeValue::String(v) => RuleAttributeValue::String(v.clone()),
                other => {
                    log::debug!("Skipping array attribute '{key}' ({:?})", other.kind());
                    continue;
                }
            };
            set.insert(RuleAttribute::new(key, value));
        }
        set
    }

    /// Insert an attribute, replacing one with the same name.
    pub fn insert(&mut self, attribute: RuleAttribute) {
        match self.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RuleAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RuleAttribute> {
        self.attributes.iter_mut().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleAttribute> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes in presentation order: group path, group order, order,
    /// then display name. Missing orders sort last.
    pub fn sorted(&self) -> Vec<&RuleAttribute> {
        let mut sorted: Vec<_> = self.attributes.iter().collect();
        sorted.sort_by(|a, b| {
            a.groups
                .cmp(&b.groups)
                .then_with(|| cmp_order(a.group_order, b.group_order))
                .then_with(|| cmp_order(a.order, b.order))
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        sorted
    }

    /// Current values as an attribute map for the next generation pass.
    pub fn to_attribute_map(&self) -> AttributeMap {
        let mut builder = AttributeMapBuilder::new();
        for attr in &self.attributes {
            match &attr.value {
                RuleAttributeValue::Bool(v) => builder.set_bool(&attr.name, *v),
                RuleAttributeValue::Float(v) => builder.set_float(&attr.name, *v),
                RuleAttributeValue::String(v) => builder.set_string(&attr.name, v),
            }
        }
        builder.take()
    }
}

fn cmp_order(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl<'a> IntoIterator for &'a RuleAttributeSet {
    type Item = &'a RuleAttribute;
    type IntoIter = std::slice::Iter<'a, RuleAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> AttributeMap {
        let mut builder = AttributeMapBuilder::new();
        builder.set_float("Default$height", 12.0);
        builder.set_string("Default$roofType", "gable");
        builder.set_bool("Default$hasBalcony", true);
        builder.set_float_array("Default$floorHeights", &[3.0, 3.5]);
        builder.take()
    }

    #[test]
    fn from_defaults_skips_arrays() {
        let set = RuleAttributeSet::from_defaults(&defaults());
        assert_eq!(set.len(), 3);
        assert!(set.get("Default$floorHeights").is_none());
        let height = set.get("Default$height").unwrap();
        assert_eq!(height.display_name, "height");
        assert_eq!(height.value, RuleAttributeValue::Float(12.0));
    }

    #[test]
    fn edited_values_round_trip_into_attribute_map() {
        let mut set = RuleAttributeSet::from_defaults(&defaults());
        set.get_mut("Default$height").unwrap().value = RuleAttributeValue::Float(20.0);

        let map = set.to_attribute_map();
        assert_eq!(map.get_float("Default$height"), Some(20.0));
        assert_eq!(map.get_string("Default$roofType"), Some("gable"));
        assert_eq!(map.get_bool("Default$hasBalcony"), Some(true));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn sorted_by_group_then_order_then_name() {
        let mut set = RuleAttributeSet::new();
        set.insert(RuleAttribute::new("z", RuleAttributeValue::Bool(true)));
        set.insert(
            RuleAttribute::new("b", RuleAttributeValue::Bool(true)).with_order(2),
        );
        set.insert(
            RuleAttribute::new("a", RuleAttributeValue::Bool(true)).with_order(1),
        );
        set.insert(
            RuleAttribute::new("g", RuleAttributeValue::Bool(true))
                .with_groups(vec!["Roof".into()]),
        );

        let names: Vec<_> = set.sorted().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "z", "g"]);
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut set = RuleAttributeSet::new();
        set.insert(RuleAttribute::new("x", RuleAttributeValue::Float(1.0)));
        set.insert(RuleAttribute::new("x", RuleAttributeValue::Float(2.0)));
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get("x").map(|a| a.value.clone()),
            Some(RuleAttributeValue::Float(2.0))
        );
    }
}

//! Rule attribute and annotation types.

use std::fmt;

/// Value of a rule attribute. Rule attributes are always scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleAttributeValue {
    Bool(bool),
    Float(f64),
    String(String),
}

impl RuleAttributeValue {
    /// Short name of the value kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for RuleAttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

/// Numeric range constraint for float attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeAnnotation {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Increment used by slider/spin widgets.
    pub step_size: f64,
    /// When set, values outside `[min, max]` are rejected by the editor.
    pub restricted: bool,
}

impl Default for RangeAnnotation {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            step_size: 0.1,
            restricted: true,
        }
    }
}

impl RangeAnnotation {
    /// Clamp `value` into the range when restricted.
    pub fn clamp(&self, value: f64) -> f64 {
        if !self.restricted {
            return value;
        }
        let mut v = value;
        if let Some(min) = self.min {
            v = v.max(min);
        }
        if let Some(max) = self.max {
            v = v.min(max);
        }
        v
    }
}

/// Allowed values of an enum annotation, matching the attribute's value kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumValues {
    Float(Vec<f64>),
    String(Vec<String>),
}

impl EnumValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `value` is one of the allowed values.
    pub fn contains(&self, value: &RuleAttributeValue) -> bool {
        match (self, value) {
            (Self::Float(values), RuleAttributeValue::Float(v)) => values.contains(v),
            (Self::String(values), RuleAttributeValue::String(v)) => values.contains(v),
            _ => false,
        }
    }
}

/// Fixed set of choices for float or string attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumAnnotation {
    pub values: EnumValues,
    pub restricted: bool,
}

impl EnumAnnotation {
    pub fn new(values: EnumValues) -> Self {
        Self {
            values,
            restricted: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilesystemMode {
    File,
    Directory,
    #[default]
    None,
}

/// File or directory picker for string attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilesystemAnnotation {
    pub mode: FilesystemMode,
    /// Accepted file extensions, without wildcard or leading dot.
    pub extensions: Vec<String>,
}

/// Editing hint attached to a rule attribute. At most one applies.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Range(RangeAnnotation),
    Enum(EnumAnnotation),
    Color,
    Filesystem(FilesystemAnnotation),
}

/// A named, typed, user-editable parameter of a generation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleAttribute {
    /// Fully qualified name as reported by the rule (e.g. `Style$height`).
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Group path, outermost first.
    pub groups: Vec<String>,
    pub order: Option<i32>,
    pub group_order: Option<i32>,
    pub hidden: bool,
    pub value: RuleAttributeValue,
    pub(crate) annotation: Option<Annotation>,
}

impl RuleAttribute {
    /// Create an attribute with a display name derived from `name`.
    pub fn new(name: impl Into<String>, value: RuleAttributeValue) -> Self {
        let name = name.into();
        let display_name = display_name_of(&name).to_string();
        Self {
            name,
            display_name,
            description: String::new(),
            groups: Vec::new(),
            order: None,
            group_order: None,
            hidden: false,
            value,
            annotation: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    /// Range annotation of a float attribute.
    pub fn range_annotation(&self) -> Option<&RangeAnnotation> {
        match (&self.value, &self.annotation) {
            (RuleAttributeValue::Float(_), Some(Annotation::Range(range))) => Some(range),
            _ => None,
        }
    }

    /// Enum annotation whose payload kind matches the value kind.
    pub fn enum_annotation(&self) -> Option<&EnumAnnotation> {
        match (&self.value, &self.annotation) {
            (RuleAttributeValue::Float(_), Some(Annotation::Enum(e)))
                if matches!(e.values, EnumValues::Float(_)) =>
            {
                Some(e)
            }
            (RuleAttributeValue::String(_), Some(Annotation::Enum(e)))
                if matches!(e.values, EnumValues::String(_)) =>
            {
                Some(e)
            }
            _ => None,
        }
    }

    /// Whether a string attribute carries a color annotation.
    pub fn color_annotation(&self) -> bool {
        matches!(
            (&self.value, &self.annotation),
            (RuleAttributeValue::String(_), Some(Annotation::Color))
        )
    }

    /// Filesystem annotation of a string attribute.
    pub fn filesystem_annotation(&self) -> Option<&FilesystemAnnotation> {
        match (&self.value, &self.annotation) {
            (RuleAttributeValue::String(_), Some(Annotation::Filesystem(fs))) => Some(fs),
            _ => None,
        }
    }
}

/// Strip the rule style prefix (`Style$`) from a fully qualified name.
pub fn display_name_of(name: &str) -> &str {
    match name.rfind('$') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

//! Applying rule annotations (`@Range`, `@Enum`, ...) to rule attributes.

use super::types::{
    Annotation, EnumAnnotation, EnumValues, FilesystemAnnotation, FilesystemMode, RangeAnnotation,
    RuleAttribute, RuleAttributeValue,
};

/// One argument of an annotation, optionally keyed (`min=0`).
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationArgument {
    pub key: Option<String>,
    pub value: RuleAttributeValue,
}

impl AnnotationArgument {
    pub fn positional(value: RuleAttributeValue) -> Self {
        Self { key: None, value }
    }

    pub fn keyed(key: impl Into<String>, value: RuleAttributeValue) -> Self {
        Self {
            key: Some(key.into()),
            value,
        }
    }
}

/// An annotation as reported by the rule info of a compiled rule package.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationSpec {
    /// Annotation name including the leading `@`.
    pub name: String,
    pub arguments: Vec<AnnotationArgument>,
}

impl AnnotationSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: AnnotationArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    fn keyed(&self, key: &str) -> Option<&RuleAttributeValue> {
        self.arguments
            .iter()
            .find(|a| a.key.as_deref().is_some_and(|k| k.eq_ignore_ascii_case(key)))
            .map(|a| &a.value)
    }

    fn positional(&self) -> impl Iterator<Item = &RuleAttributeValue> {
        self.arguments
            .iter()
            .filter(|a| a.key.is_none())
            .map(|a| &a.value)
    }
}

/// Errors raised while applying an annotation to a rule attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationError {
    /// The annotation does not apply to the attribute's value kind.
    WrongValueKind {
        annotation: String,
        attribute: String,
        kind: &'static str,
    },
    /// An argument has an unexpected type.
    InvalidArgument {
        annotation: String,
        argument: String,
    },
    /// A required argument is absent.
    MissingArgument { annotation: String },
}

impl std::fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongValueKind {
                annotation,
                attribute,
                kind,
            } => write!(
                f,
                "{annotation} cannot annotate {kind} attribute '{attribute}'"
            ),
            Self::InvalidArgument {
                annotation,
                argument,
            } => write!(f, "{annotation}: invalid argument {argument}"),
            Self::MissingArgument { annotation } => {
                write!(f, "{annotation}: missing argument")
            }
        }
    }
}

impl std::error::Error for AnnotationError {}

impl RuleAttribute {
    /// Apply one annotation reported by the rule info.
    ///
    /// Editing hints (`@Range`, `@Enum`, `@Color`, `@File`, `@Directory`)
    /// replace any previous hint. Unknown annotations are ignored.
    pub fn apply_annotation(&mut self, spec: &AnnotationSpec) -> Result<(), AnnotationError> {
        match spec.name.as_str() {
            "@Range" => {
                self.expect_kind(spec, |v| matches!(v, RuleAttributeValue::Float(_)))?;
                self.annotation = Some(Annotation::Range(parse_range(spec)?));
            }
            "@Enum" => {
                let values = match &self.value {
                    RuleAttributeValue::Float(_) => EnumValues::Float(
                        spec.positional()
                            .map(|v| float_arg(spec, v))
                            .collect::<Result<_, _>>()?,
                    ),
                    RuleAttributeValue::String(_) => EnumValues::String(
                        spec.positional()
                            .map(|v| string_arg(spec, v).map(str::to_string))
                            .collect::<Result<_, _>>()?,
                    ),
                    RuleAttributeValue::Bool(_) => return Err(self.wrong_kind(spec)),
                };
                let mut annotation = EnumAnnotation::new(values);
                if let Some(v) = spec.keyed("restricted") {
                    annotation.restricted = bool_arg(spec, v)?;
                }
                self.annotation = Some(Annotation::Enum(annotation));
            }
            "@Color" => {
                self.expect_kind(spec, |v| matches!(v, RuleAttributeValue::String(_)))?;
                self.annotation = Some(Annotation::Color);
            }
            "@File" | "@Directory" => {
                self.expect_kind(spec, |v| matches!(v, RuleAttributeValue::String(_)))?;
                let mode = if spec.name == "@File" {
                    FilesystemMode::File
                } else {
                    FilesystemMode::Directory
                };
                let extensions = spec
                    .positional()
                    .map(|v| string_arg(spec, v).map(normalize_extension))
                    .collect::<Result<Vec<_>, _>>()?;
                self.annotation = Some(Annotation::Filesystem(FilesystemAnnotation {
                    mode,
                    extensions,
                }));
            }
            "@Hidden" => self.hidden = true,
            "@Order" => {
                let v = spec.positional().next().ok_or_else(|| missing(spec))?;
                self.order = Some(float_arg(spec, v)? as i32);
            }
            "@Group" => {
                let mut groups = Vec::new();
                for v in spec.positional() {
                    match v {
                        RuleAttributeValue::String(g) => groups.push(g.clone()),
                        RuleAttributeValue::Float(order) => self.group_order = Some(*order as i32),
                        RuleAttributeValue::Bool(_) => return Err(invalid(spec, v)),
                    }
                }
                self.groups = groups;
            }
            "@Description" => {
                let v = spec.positional().next().ok_or_else(|| missing(spec))?;
                self.description = string_arg(spec, v)?.to_string();
            }
            other => {
                log::debug!("Ignoring annotation {other} on '{}'", self.name);
            }
        }
        Ok(())
    }

    /// Apply several annotations in order, stopping at the first failure.
    pub fn apply_annotations(&mut self, specs: &[AnnotationSpec]) -> Result<(), AnnotationError> {
        specs.iter().try_for_each(|spec| self.apply_annotation(spec))
    }

    fn expect_kind(
        &self,
        spec: &AnnotationSpec,
        accepts: impl Fn(&RuleAttributeValue) -> bool,
    ) -> Result<(), AnnotationError> {
        if accepts(&self.value) {
            Ok(())
        } else {
            Err(self.wrong_kind(spec))
        }
    }

    fn wrong_kind(&self, spec: &AnnotationSpec) -> AnnotationError {
        AnnotationError::WrongValueKind {
            annotation: spec.name.clone(),
            attribute: self.name.clone(),
            kind: self.value.kind_name(),
        }
    }
}

fn parse_range(spec: &AnnotationSpec) -> Result<RangeAnnotation, AnnotationError> {
    let mut range = RangeAnnotation::default();

    // Unkeyed form: @Range(min, max)
    let mut positional = spec.positional();
    if let Some(v) = positional.next() {
        range.min = Some(float_arg(spec, v)?);
    }
    if let Some(v) = positional.next() {
        range.max = Some(float_arg(spec, v)?);
    }

    if let Some(v) = spec.keyed("min") {
        range.min = Some(float_arg(spec, v)?);
    }
    if let Some(v) = spec.keyed("max") {
        range.max = Some(float_arg(spec, v)?);
    }
    if let Some(v) = spec.keyed("stepsize") {
        range.step_size = float_arg(spec, v)?;
    }
    if let Some(v) = spec.keyed("restricted") {
        range.restricted = bool_arg(spec, v)?;
    }
    Ok(range)
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('*').trim_start_matches('.').to_string()
}

fn float_arg(spec: &AnnotationSpec, v: &RuleAttributeValue) -> Result<f64, AnnotationError> {
    v.as_float().ok_or_else(|| invalid(spec, v))
}

fn bool_arg(spec: &AnnotationSpec, v: &RuleAttributeValue) -> Result<bool, AnnotationError> {
    v.as_bool().ok_or_else(|| invalid(spec, v))
}

fn string_arg<'a>(
    spec: &AnnotationSpec,
    v: &'a RuleAttributeValue,
) -> Result<&'a str, AnnotationError> {
    v.as_str().ok_or_else(|| invalid(spec, v))
}

fn invalid(spec: &AnnotationSpec, v: &RuleAttributeValue) -> AnnotationError {
    AnnotationError::InvalidArgument {
        annotation: spec.name.clone(),
        argument: format!("{} '{v}'", v.kind_name()),
    }
}

fn missing(spec: &AnnotationSpec) -> AnnotationError {
    AnnotationError::MissingArgument {
        annotation: spec.name.clone(),
    }
}

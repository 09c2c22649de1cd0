//! Rule attributes exposed to editing front-ends.
//!
//! A rule attribute is a named, typed parameter of a generation rule. Each
//! may carry one editing hint ([`Annotation`]): a numeric range, a fixed set
//! of choices, a color picker or a filesystem picker.
//!
//! - [`RuleAttribute`] - Attribute with display metadata and value
//! - [`AnnotationSpec`] - Raw annotation as reported by the rule info
//! - [`RuleAttributeSet`] - Attributes of one rule package

mod annotations;
mod set;
mod types;

pub use annotations::{AnnotationArgument, AnnotationError, AnnotationSpec};
pub use set::RuleAttributeSet;
pub use types::{
    Annotation, EnumAnnotation, EnumValues, FilesystemAnnotation, FilesystemMode, RangeAnnotation,
    RuleAttribute, RuleAttributeValue, display_name_of,
};

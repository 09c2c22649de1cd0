//! CPU-side material definitions with declaration/instance split.
//!
//! - [`CpuMaterial`] - **Declaration** (template) naming the parameters a
//!   material exposes. Shared via `Arc` across all instances built from it.
//! - [`CpuMaterialInstance`] - **Bindings** holding one optional value per
//!   declared parameter. `None` means the parameter is left unbound and the
//!   template's default applies.
//!
//! Supporting types:
//! - [`MaterialBindingDef`] - A single parameter slot definition
//! - [`MaterialValueType`] - Expected value type for a slot
//! - [`MaterialValue`] - Typed parameter value (float, vec3, vec4, texture)
//! - [`AlphaMode`] - Alpha rendering mode

use std::sync::Arc;

use crate::texture::CpuTexture;

/// Type of value expected in a material binding slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialValueType {
    Float,
    Vec3,
    Vec4,
    Texture,
}

/// Describes one parameter slot in a [`CpuMaterial`].
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialBindingDef {
    /// Parameter name (e.g. "diffuse_color", "normal_texture").
    pub name: String,
    pub value_type: MaterialValueType,
}

impl MaterialBindingDef {
    pub fn new(name: impl Into<String>, value_type: MaterialValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

/// A typed material parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialValue {
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Decoded texture, shared between instances that reference the same file.
    Texture(Arc<CpuTexture>),
}

impl MaterialValue {
    pub fn value_type(&self) -> MaterialValueType {
        match self {
            Self::Float(_) => MaterialValueType::Float,
            Self::Vec3(_) => MaterialValueType::Vec3,
            Self::Vec4(_) => MaterialValueType::Vec4,
            Self::Texture(_) => MaterialValueType::Texture,
        }
    }
}

/// Alpha rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    /// Alpha masking with cutoff threshold.
    Mask { cutoff: f32 },
    Blend,
}

/// CPU-side material declaration (template).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuMaterial {
    pub name: Option<String>,
    pub alpha_mode: AlphaMode,
    pub double_sided: bool,
    /// Parameter slots, in instance value order.
    pub bindings: Vec<MaterialBindingDef>,
}

impl CpuMaterial {
    /// Creates a new empty material (opaque, single-sided, no bindings).
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_alpha_mode(mut self, alpha_mode: AlphaMode) -> Self {
        self.alpha_mode = alpha_mode;
        self
    }

    #[must_use]
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    #[must_use]
    pub fn with_binding(mut self, name: impl Into<String>, value_type: MaterialValueType) -> Self {
        self.bindings.push(MaterialBindingDef::new(name, value_type));
        self
    }

    /// Template for materials described by procedural material attributes.
    ///
    /// | Index | Name | Type |
    /// |-------|------|------|
    /// | 0 | `diffuse_color` | Vec3 |
    /// | 1 | `opacity` | Float |
    /// | 2 | `emissive_color` | Vec3 |
    /// | 3 | `metallic` | Float |
    /// | 4 | `roughness` | Float |
    /// | 5 | `diffuse_texture` | Texture |
    /// | 6 | `opacity_texture` | Texture |
    /// | 7 | `normal_texture` | Texture |
    /// | 8 | `emissive_texture` | Texture |
    pub fn procedural() -> Self {
        use MaterialValueType::*;

        Self::new()
            .with_name("M_Procedural")
            .with_binding("diffuse_color", Vec3)
            .with_binding("opacity", Float)
            .with_binding("emissive_color", Vec3)
            .with_binding("metallic", Float)
            .with_binding("roughness", Float)
            .with_binding("diffuse_texture", Texture)
            .with_binding("opacity_texture", Texture)
            .with_binding("normal_texture", Texture)
            .with_binding("emissive_texture", Texture)
    }

    /// Find a binding definition by name.
    pub fn find_binding(&self, name: &str) -> Option<(usize, &MaterialBindingDef)> {
        self.bindings
            .iter()
            .enumerate()
            .find(|(_, b)| b.name == name)
    }
}

/// Material instance holding parameter values for a shared template.
///
/// `values[i]` corresponds to `material.bindings[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuMaterialInstance {
    pub material: Arc<CpuMaterial>,
    pub name: Option<String>,
    pub values: Vec<Option<MaterialValue>>,
}

impl CpuMaterialInstance {
    /// Create an instance with every parameter unbound.
    pub fn new(material: Arc<CpuMaterial>) -> Self {
        let values = vec![None; material.bindings.len()];
        Self {
            material,
            name: None,
            values,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Bind a parameter by name.
    ///
    /// Returns `false` if the template has no such parameter or declares a
    /// different value type; the instance is left unchanged.
    pub fn set(&mut self, name: &str, value: MaterialValue) -> bool {
        match self.material.find_binding(name) {
            Some((idx, def)) if def.value_type == value.value_type() => {
                self.values[idx] = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Get a bound value by parameter name.
    pub fn get(&self, name: &str) -> Option<&MaterialValue> {
        let (idx, _) = self.material.find_binding(name)?;
        self.values.get(idx)?.as_ref()
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            MaterialValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_vec3(&self, name: &str) -> Option<[f32; 3]> {
        match self.get(name)? {
            MaterialValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_texture(&self, name: &str) -> Option<&Arc<CpuTexture>> {
        match self.get(name)? {
            MaterialValue::Texture(t) => Some(t),
            _ => None,
        }
    }

    /// Iterator over all bound textures.
    pub fn textures(&self) -> impl Iterator<Item = &Arc<CpuTexture>> {
        self.values.iter().filter_map(|v| match v {
            Some(MaterialValue::Texture(t)) => Some(t),
            _ => None,
        })
    }

    /// Number of bound parameters.
    pub fn bound_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

//! Material instances from face-group attribute maps.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use procbridge_core::attributes::{AttributeMap, AttributeValue};
use procbridge_core::material::{CpuMaterial, CpuMaterialInstance, MaterialValue};
use procbridge_core::texture::CpuTexture;

use crate::image_loader::ImageLoader;

/// Attribute keys naming texture files, and the parameters they bind.
const TEXTURE_KEYS: &[(&str, &str)] = &[
    ("diffuseMap", "diffuse_texture"),
    ("opacityMap", "opacity_texture"),
    ("normalMap", "normal_texture"),
    ("emissiveMap", "emissive_texture"),
];

const COLOR_KEYS: &[(&str, &str)] = &[
    ("diffuseColor", "diffuse_color"),
    ("emissiveColor", "emissive_color"),
];

const SCALAR_KEYS: &[(&str, &str)] = &[
    ("opacity", "opacity"),
    ("metallic", "metallic"),
    ("roughness", "roughness"),
];

/// Builds [`CpuMaterialInstance`]s by binding recognized attributes onto a
/// material template.
///
/// Texture attributes are resolved through the [`ImageLoader`]. A texture
/// that fails to load leaves its parameter unbound and logs a warning;
/// building itself never fails.
pub struct MaterialBuilder {
    template: Arc<CpuMaterial>,
    loader: Arc<dyn ImageLoader>,
    cache: Option<HashMap<String, Arc<CpuTexture>>>,
}

impl MaterialBuilder {
    pub fn new(template: Arc<CpuMaterial>, loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            template,
            loader,
            cache: Some(HashMap::new()),
        }
    }

    /// Enable or disable decoding each texture URI only once.
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(HashMap::new);
        self
    }

    pub fn template(&self) -> &Arc<CpuMaterial> {
        &self.template
    }

    /// Number of distinct textures decoded so far (cache enabled only).
    pub fn cached_texture_count(&self) -> usize {
        self.cache.as_ref().map_or(0, HashMap::len)
    }

    /// Build an instance of the default template.
    pub fn build(&mut self, attributes: &AttributeMap) -> CpuMaterialInstance {
        let template = Arc::clone(&self.template);
        self.build_with_template(attributes, &template)
    }

    /// Build an instance of `template` from `attributes`.
    pub fn build_with_template(
        &mut self,
        attributes: &AttributeMap,
        template: &Arc<CpuMaterial>,
    ) -> CpuMaterialInstance {
        let mut instance = CpuMaterialInstance::new(Arc::clone(template));
        if let Some(name) = attributes.get_string("name") {
            instance.name = Some(name.to_string());
        }

        for (key, value) in attributes.iter() {
            if let Some(param) = lookup(TEXTURE_KEYS, key) {
                let Some(uri) = texture_uri(value) else {
                    continue;
                };
                if let Some(texture) = self.load_texture(uri) {
                    bind(&mut instance, key, param, MaterialValue::Texture(texture));
                }
            } else if let Some(param) = lookup(COLOR_KEYS, key) {
                match parse_color(value) {
                    Some(rgb) => bind(&mut instance, key, param, MaterialValue::Vec3(rgb)),
                    None => log::warn!("Ignoring malformed color attribute {key}: {value}"),
                }
            } else if let Some(param) = lookup(SCALAR_KEYS, key) {
                match value.as_float() {
                    Some(v) => bind(&mut instance, key, param, MaterialValue::Float(v as f32)),
                    None => log::warn!("Ignoring non-float attribute {key}: {value}"),
                }
            } else if key != "name" {
                log::debug!("Ignoring unrecognized material attribute {key}");
            }
        }

        instance
    }

    fn load_texture(&mut self, uri: &str) -> Option<Arc<CpuTexture>> {
        if let Some(texture) = self.cache.as_ref().and_then(|c| c.get(uri)) {
            return Some(Arc::clone(texture));
        }

        let texture = match self.loader.load(uri) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("Texture left unbound: {e}");
                return None;
            }
        };

        let texture = Arc::new(texture.with_name(texture_name(uri)));
        log::debug!(
            "Loaded texture {uri} ({}x{})",
            texture.width,
            texture.height
        );
        if let Some(cache) = &mut self.cache {
            cache.insert(uri.to_string(), Arc::clone(&texture));
        }
        Some(texture)
    }
}

impl std::fmt::Debug for MaterialBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialBuilder")
            .field("template", &self.template.name)
            .field("cached_textures", &self.cached_texture_count())
            .finish_non_exhaustive()
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, p)| *p)
}

fn bind(instance: &mut CpuMaterialInstance, key: &str, param: &str, value: MaterialValue) {
    if !instance.set(param, value) {
        log::debug!("Template has no parameter {param} for attribute {key}");
    }
}

/// First non-empty URI of a string array, or a plain string.
fn texture_uri(value: &AttributeValue) -> Option<&str> {
    let uri = match value {
        AttributeValue::String(s) => Some(s.as_str()),
        AttributeValue::StringArray(values) => values.iter().map(String::as_str).find(|s| !s.is_empty()),
        _ => None,
    };
    uri.filter(|s| !s.is_empty())
}

/// A float array of at least three components, or a `#rrggbb` string.
fn parse_color(value: &AttributeValue) -> Option<[f32; 3]> {
    match value {
        AttributeValue::FloatArray(v) if v.len() >= 3 => Some([v[0] as f32, v[1] as f32, v[2] as f32]),
        AttributeValue::String(s) => parse_hex_color(s),
        _ => None,
    }
}

fn parse_hex_color(s: &str) -> Option<[f32; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .ok()
            .map(|c| c as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn texture_name(uri: &str) -> String {
    let stem = Path::new(uri)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("T_{stem}")
}

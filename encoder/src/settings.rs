//! Encoder settings loaded from TOML.
//!
//! ```toml
//! unit_scale = 100.0
//! material_binding = "per_group"
//! cache_textures = true
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{EncoderError, EncoderResult};

/// Which attribute map describes the material of each face group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialBinding {
    /// Each face group uses its own material attribute map.
    #[default]
    PerGroup,
    /// Every face group uses the first group's map.
    FirstGroup,
}

/// Tunables for geometry encoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderSettings {
    /// Linear unit factor from engine units to host units.
    pub unit_scale: f64,
    pub material_binding: MaterialBinding,
    /// Decode each texture URI once per material builder.
    pub cache_textures: bool,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            unit_scale: 100.0,
            material_binding: MaterialBinding::PerGroup,
            cache_textures: true,
        }
    }
}

impl EncoderSettings {
    /// Parse settings from a TOML string. Missing fields take defaults.
    pub fn from_toml_str(content: &str) -> EncoderResult<Self> {
        let settings: Self =
            toml::from_str(content).map_err(|e| EncoderError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> EncoderResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EncoderError::Settings(format!("failed to read {}: {e}", path.display()))
        })?;
        let settings = Self::from_toml_str(&content)?;
        log::debug!("Loaded encoder settings from {}", path.display());
        Ok(settings)
    }

    #[must_use]
    pub fn with_unit_scale(mut self, unit_scale: f64) -> Self {
        self.unit_scale = unit_scale;
        self
    }

    #[must_use]
    pub fn with_material_binding(mut self, binding: MaterialBinding) -> Self {
        self.material_binding = binding;
        self
    }

    #[must_use]
    pub fn with_cache_textures(mut self, cache: bool) -> Self {
        self.cache_textures = cache;
        self
    }

    fn validate(&self) -> EncoderResult<()> {
        if !self.unit_scale.is_finite() || self.unit_scale <= 0.0 {
            return Err(EncoderError::Settings(format!(
                "unit_scale must be a positive finite number, got {}",
                self.unit_scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = EncoderSettings::default();
        assert_eq!(settings.unit_scale, 100.0);
        assert_eq!(settings.material_binding, MaterialBinding::PerGroup);
        assert!(settings.cache_textures);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            EncoderSettings::from_toml_str("").unwrap(),
            EncoderSettings::default()
        );
    }

    #[test]
    fn parse_all_fields() {
        let settings = EncoderSettings::from_toml_str(
            "unit_scale = 1.0\nmaterial_binding = \"first_group\"\ncache_textures = false\n",
        )
        .unwrap();
        assert_eq!(settings.unit_scale, 1.0);
        assert_eq!(settings.material_binding, MaterialBinding::FirstGroup);
        assert!(!settings.cache_textures);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            EncoderSettings::from_toml_str("unit_scale = -1.0"),
            Err(EncoderError::Settings(_))
        ));
        assert!(EncoderSettings::from_toml_str("material_binding = \"all\"").is_err());
        assert!(EncoderSettings::from_toml_str("unknown = 1").is_err());
    }

    #[test]
    fn load_missing_file() {
        let err = EncoderSettings::load(Path::new("/nonexistent/encoder.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}

//! The callback receiver tying attribute accumulation, mesh assembly and
//! prototype registration together.

use std::sync::Arc;

use procbridge_core::attributes::AttributeMap;
use procbridge_core::material::CpuMaterial;
use procbridge_core::rule_attribute::RuleAttributeSet;

use crate::accumulator::ShapeAttributes;
use crate::assembler::MeshAssembler;
use crate::callbacks::{GenerationCallbacks, MeshGeometry};
use crate::convert::CoordinateConversion;
use crate::error::{EncoderError, EncoderResult};
use crate::image_loader::ImageLoader;
use crate::material_builder::MaterialBuilder;
use crate::registry::{InstanceBatch, PrototypeMesh, PrototypeRegistry};
use crate::settings::EncoderSettings;
use crate::transform::InstanceTransformDecomposer;

/// Receives one generation pass and accumulates its results.
///
/// After the pass, per-shape attributes are drained with
/// [`take_shape_attributes`](Self::take_shape_attributes) and placements
/// with [`take_instances`](Self::take_instances).
#[derive(Debug)]
pub struct GeometryEncoder {
    settings: EncoderSettings,
    attributes: ShapeAttributes,
    registry: PrototypeRegistry,
    materials: MaterialBuilder,
    assembler: MeshAssembler,
    decomposer: InstanceTransformDecomposer,
}

impl GeometryEncoder {
    /// Create an encoder whose materials use [`CpuMaterial::procedural`].
    pub fn new(settings: EncoderSettings, loader: Arc<dyn ImageLoader>) -> Self {
        Self::with_template(settings, loader, Arc::new(CpuMaterial::procedural()))
    }

    pub fn with_template(
        settings: EncoderSettings,
        loader: Arc<dyn ImageLoader>,
        template: Arc<CpuMaterial>,
    ) -> Self {
        let conversion = CoordinateConversion::new(settings.unit_scale);
        let materials = MaterialBuilder::new(template, loader).with_cache(settings.cache_textures);
        Self {
            attributes: ShapeAttributes::new(),
            registry: PrototypeRegistry::new(),
            materials,
            assembler: MeshAssembler::new(conversion),
            decomposer: InstanceTransformDecomposer::new(conversion),
            settings,
        }
    }

    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    pub fn registry(&self) -> &PrototypeRegistry {
        &self.registry
    }

    /// Mesh registered under `prototype_id`.
    pub fn mesh(&self, prototype_id: i32) -> Option<&Arc<PrototypeMesh>> {
        self.registry.get(prototype_id)
    }

    /// Take every placement recorded so far, grouped by prototype.
    pub fn take_instances(&mut self) -> Vec<InstanceBatch> {
        self.registry.take_instances()
    }

    /// Drain the attributes reported for one shape.
    pub fn take_shape_attributes(&mut self, shape_id: i32) -> Option<AttributeMap> {
        self.attributes.take(shape_id)
    }

    pub fn take_all_shape_attributes(&mut self) -> Vec<(i32, AttributeMap)> {
        self.attributes.take_all()
    }

    /// Drain one shape's attributes as rule attributes for editing.
    ///
    /// Array values have no rule attribute form and are dropped.
    pub fn take_rule_attributes(&mut self, shape_id: i32) -> Option<RuleAttributeSet> {
        self.attributes
            .take(shape_id)
            .map(|attrs| RuleAttributeSet::from_defaults(&attrs))
    }

    /// Hand over the registry, ending the pass.
    pub fn into_registry(self) -> PrototypeRegistry {
        self.registry
    }
}

impl GenerationCallbacks for GeometryEncoder {
    fn attr_bool(&mut self, shape_id: i32, key: &str, value: bool) {
        self.attributes.scope(shape_id).set_bool(key, value);
    }

    fn attr_float(&mut self, shape_id: i32, key: &str, value: f64) {
        self.attributes.scope(shape_id).set_float(key, value);
    }

    fn attr_string(&mut self, shape_id: i32, key: &str, value: &str) {
        self.attributes.scope(shape_id).set_string(key, value);
    }

    fn attr_bool_array(&mut self, shape_id: i32, key: &str, values: &[bool]) {
        self.attributes.scope(shape_id).set_bool_array(key, values);
    }

    fn attr_float_array(&mut self, shape_id: i32, key: &str, values: &[f64]) {
        self.attributes.scope(shape_id).set_float_array(key, values);
    }

    fn attr_string_array(&mut self, shape_id: i32, key: &str, values: &[&str]) {
        self.attributes.scope(shape_id).set_string_array(key, values);
    }

    fn add_mesh(&mut self, geometry: &MeshGeometry<'_>) -> EncoderResult<()> {
        // Checked up front so a duplicate never loads textures.
        if self.registry.contains(geometry.prototype_id) {
            return Err(EncoderError::DuplicatePrototype(geometry.prototype_id));
        }
        let mesh = self.assembler.build(
            geometry,
            &mut self.materials,
            self.settings.material_binding,
        )?;
        self.registry.register(mesh)?;
        Ok(())
    }

    fn add_instance(&mut self, prototype_id: i32, transform: &[f64; 16]) -> EncoderResult<()> {
        if !self.registry.contains(prototype_id) {
            return Err(EncoderError::UnknownPrototype(prototype_id));
        }
        let transform = self.decomposer.decompose(transform);
        self.registry.add_instance(prototype_id, transform)
    }
}

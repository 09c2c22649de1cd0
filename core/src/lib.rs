//! # Procbridge Core
//!
//! Host-side data model for geometry produced by a procedural shape-grammar
//! engine: typed attribute maps, rule attributes, polygonal mesh
//! descriptions, materials, textures and decomposed instance transforms.

pub mod attributes;
pub mod material;
pub mod math;
pub mod mesh;
pub mod rule_attribute;
pub mod scene;
pub mod texture;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version once at host start-up.
pub fn init() {
    log::info!("Procbridge Core v{} initialized", VERSION);
}

//! Vertex layout definitions for finalized meshes.
//!
//! A layout describes how one interleaved vertex buffer is structured.
//! Procedural meshes always carry a position and a normal followed by a
//! variable number of texture coordinate sets, so layouts are built per
//! UV set count and shared via `Arc`.
//!
//! # Example
//!
//! ```
//! use procbridge_core::mesh::{VertexAttributeSemantic, VertexLayout};
//!
//! // position (12) + normal (12) + two UV sets (8 each)
//! let layout = VertexLayout::position_normal_uvs(2);
//! assert_eq!(layout.stride(), 40);
//! assert!(layout.has_semantic(VertexAttributeSemantic::TexCoord(1)));
//! ```

use std::sync::Arc;

/// Semantic meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeSemantic {
    /// Vertex position (float3).
    Position,
    /// Vertex normal (float3).
    Normal,
    /// Texture coordinates of the given UV set (float2).
    TexCoord(u32),
}

/// Format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
}

impl VertexAttributeFormat {
    /// Get the size in bytes of this format.
    pub fn size(&self) -> usize {
        match self {
            Self::Float2 => 8,
            Self::Float3 => 12,
        }
    }

    /// Number of `f32` components.
    pub fn components(&self) -> usize {
        self.size() / 4
    }
}

/// A single vertex attribute description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub semantic: VertexAttributeSemantic,
    pub format: VertexAttributeFormat,
    /// Byte offset within the vertex.
    pub offset: u32,
}

impl VertexAttribute {
    pub fn new(semantic: VertexAttributeSemantic, format: VertexAttributeFormat, offset: u32) -> Self {
        Self {
            semantic,
            format,
            offset,
        }
    }

    /// Create a position attribute (float3).
    pub fn position(offset: u32) -> Self {
        Self::new(
            VertexAttributeSemantic::Position,
            VertexAttributeFormat::Float3,
            offset,
        )
    }

    /// Create a normal attribute (float3).
    pub fn normal(offset: u32) -> Self {
        Self::new(
            VertexAttributeSemantic::Normal,
            VertexAttributeFormat::Float3,
            offset,
        )
    }

    /// Create a texcoord attribute (float2) for UV set `set`.
    pub fn texcoord(set: u32, offset: u32) -> Self {
        Self::new(
            VertexAttributeSemantic::TexCoord(set),
            VertexAttributeFormat::Float2,
            offset,
        )
    }
}

/// Layout of one interleaved vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexLayout {
    /// The vertex attributes in buffer order.
    pub attributes: Vec<VertexAttribute>,
    /// Optional label for debugging.
    pub label: Option<String>,
}

impl VertexLayout {
    /// Create a new empty vertex layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute at the current end of the vertex.
    #[must_use]
    pub fn with_attribute(mut self, attribute: VertexAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Set a debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Bytes per vertex.
    pub fn stride(&self) -> u32 {
        self.attributes
            .iter()
            .map(|a| a.offset + a.format.size() as u32)
            .max()
            .unwrap_or(0)
    }

    /// Number of UV sets carried by this layout.
    pub fn uv_set_count(&self) -> u32 {
        self.attributes
            .iter()
            .filter(|a| matches!(a.semantic, VertexAttributeSemantic::TexCoord(_)))
            .count() as u32
    }

    /// Check if this layout has a specific semantic.
    pub fn has_semantic(&self, semantic: VertexAttributeSemantic) -> bool {
        self.attributes.iter().any(|attr| attr.semantic == semantic)
    }

    /// Get an attribute by semantic.
    pub fn get_attribute(&self, semantic: VertexAttributeSemantic) -> Option<&VertexAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.semantic == semantic)
    }

    /// Position + normal + `uv_sets` texture coordinate sets.
    pub fn position_normal_uvs(uv_sets: u32) -> Arc<Self> {
        let mut layout = Self::new()
            .with_attribute(VertexAttribute::position(0))
            .with_attribute(VertexAttribute::normal(12));
        for set in 0..uv_sets {
            layout = layout.with_attribute(VertexAttribute::texcoord(set, 24 + set * 8));
        }
        Arc::new(layout.with_label(format!("position_normal_uv{uv_sets}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_attribute_format_size() {
        assert_eq!(VertexAttributeFormat::Float2.size(), 8);
        assert_eq!(VertexAttributeFormat::Float3.size(), 12);
        assert_eq!(VertexAttributeFormat::Float3.components(), 3);
    }

    #[test]
    fn test_position_normal_uvs() {
        let layout = VertexLayout::position_normal_uvs(0);
        assert_eq!(layout.stride(), 24);
        assert_eq!(layout.uv_set_count(), 0);

        let layout = VertexLayout::position_normal_uvs(3);
        assert_eq!(layout.stride(), 48);
        assert_eq!(layout.uv_set_count(), 3);
        assert_eq!(
            layout
                .get_attribute(VertexAttributeSemantic::TexCoord(2))
                .map(|a| a.offset),
            Some(40)
        );
        assert!(!layout.has_semantic(VertexAttributeSemantic::TexCoord(3)));
        assert_eq!(layout.label.as_deref(), Some("position_normal_uv3"));
    }

    #[test]
    fn test_empty_layout() {
        let layout = VertexLayout::new();
        assert_eq!(layout.stride(), 0);
    }
}

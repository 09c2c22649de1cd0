//! Finalized, renderable mesh data.
//!
//! - [`IndexFormat`] - Width of the stored triangle indices
//! - [`MeshSection`] - Index range drawn with one material slot
//! - [`CpuMesh`] - CPU-side triangle mesh holding raw vertex and index data

use std::sync::Arc;

use super::layout::{VertexAttributeSemantic, VertexLayout};

/// Width of the triangle indices stored in a [`CpuMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// `u16`, up to 65536 vertex instances.
    #[default]
    Uint16,
    /// `u32`, for larger meshes.
    Uint32,
}

impl IndexFormat {
    /// Bytes per index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }

    /// Smallest format able to address `vertex_count` vertices.
    pub fn for_vertex_count(vertex_count: usize) -> Self {
        if vertex_count <= u16::MAX as usize + 1 {
            Self::Uint16
        } else {
            Self::Uint32
        }
    }
}

/// A contiguous range of triangle indices drawn with one material slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshSection {
    /// First index of the range.
    pub first_index: u32,
    /// Number of indices (a multiple of 3).
    pub index_count: u32,
    /// Material slot of the polygon group this section came from.
    pub material_slot: usize,
}

impl MeshSection {
    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }
}

/// A CPU-side triangle-list mesh with one interleaved vertex buffer.
///
/// Produced by [`MeshDescription::finalize`](super::MeshDescription::finalize)
/// and handed to the host renderer as an opaque mesh.
#[derive(Clone)]
pub struct CpuMesh {
    layout: Arc<VertexLayout>,
    vertex_data: Vec<u8>,
    vertex_count: u32,
    index_data: Vec<u8>,
    index_format: IndexFormat,
    index_count: u32,
    sections: Vec<MeshSection>,
    label: Option<String>,
}

impl CpuMesh {
    /// Empty mesh using `layout` for its vertex buffer.
    pub fn new(layout: Arc<VertexLayout>) -> Self {
        Self {
            layout,
            vertex_data: Vec::new(),
            vertex_count: 0,
            index_data: Vec::new(),
            index_format: IndexFormat::Uint16,
            index_count: 0,
            sections: Vec::new(),
            label: None,
        }
    }

    /// Interleaved vertex bytes; the count follows from the layout stride.
    #[must_use]
    pub fn with_vertex_data(mut self, data: Vec<u8>) -> Self {
        let stride = self.layout.stride() as usize;
        if stride > 0 {
            self.vertex_count = (data.len() / stride) as u32;
        }
        self.vertex_data = data;
        self
    }

    #[must_use]
    pub fn with_indices_u16(mut self, indices: &[u16]) -> Self {
        self.index_data = bytemuck::cast_slice(indices).to_vec();
        self.index_format = IndexFormat::Uint16;
        self.index_count = indices.len() as u32;
        self
    }

    #[must_use]
    pub fn with_indices_u32(mut self, indices: &[u32]) -> Self {
        self.index_data = bytemuck::cast_slice(indices).to_vec();
        self.index_format = IndexFormat::Uint32;
        self.index_count = indices.len() as u32;
        self
    }

    #[must_use]
    pub fn with_sections(mut self, sections: Vec<MeshSection>) -> Self {
        self.sections = sections;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn layout(&self) -> &Arc<VertexLayout> {
        &self.layout
    }

    /// Raw interleaved vertex bytes.
    pub fn vertex_data(&self) -> &[u8] {
        &self.vertex_data
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Raw index bytes in [`Self::index_format`].
    pub fn index_data(&self) -> &[u8] {
        &self.index_data
    }

    pub fn index_format(&self) -> IndexFormat {
        self.index_format
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    pub fn sections(&self) -> &[MeshSection] {
        &self.sections
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0 && self.index_count == 0
    }

    /// Indices widened to `u32`.
    pub fn indices(&self) -> Vec<u32> {
        match self.index_format {
            IndexFormat::Uint16 => self
                .index_data
                .chunks_exact(2)
                .map(|b| u32::from(bytemuck::pod_read_unaligned::<u16>(b)))
                .collect(),
            IndexFormat::Uint32 => self
                .index_data
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<u32>)
                .collect(),
        }
    }

    /// Read one float attribute of every vertex.
    ///
    /// Returns `None` if the layout lacks the semantic or its width is not `N`.
    pub fn read_attribute<const N: usize>(
        &self,
        semantic: VertexAttributeSemantic,
    ) -> Option<Vec<[f32; N]>> {
        let attr = self.layout.get_attribute(semantic)?;
        if attr.format.components() != N {
            return None;
        }
        let floats: Vec<f32> = self
            .vertex_data
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect();
        let stride = self.layout.stride() as usize / 4;
        let offset = attr.offset as usize / 4;
        Some(
            floats
                .chunks_exact(stride)
                .map(|vertex| {
                    let mut out = [0.0; N];
                    out.copy_from_slice(&vertex[offset..offset + N]);
                    out
                })
                .collect(),
        )
    }

    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.read_attribute(VertexAttributeSemantic::Position)
            .unwrap_or_default()
    }

    pub fn normals(&self) -> Vec<[f32; 3]> {
        self.read_attribute(VertexAttributeSemantic::Normal)
            .unwrap_or_default()
    }

    /// Texture coordinates of UV set `set`, if present.
    pub fn uvs(&self, set: u32) -> Option<Vec<[f32; 2]>> {
        self.read_attribute(VertexAttributeSemantic::TexCoord(set))
    }
}

impl std::fmt::Debug for CpuMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuMesh")
            .field("label", &self.label)
            .field("vertex_count", &self.vertex_count)
            .field("index_count", &self.index_count)
            .field("index_format", &self.index_format)
            .field("sections", &self.sections.len())
            .field("layout", &self.layout.label)
            .finish()
    }
}

//! Editable polygonal mesh description.
//!
//! A [`MeshDescription`] mirrors how the generation engine thinks about
//! geometry: a pool of vertex positions, per-corner vertex instances that
//! carry normals and UVs, and polygons grouped by material. It is built
//! incrementally and turned into a renderable [`CpuMesh`] by
//! [`MeshDescription::finalize`].

use super::data::{CpuMesh, IndexFormat, MeshSection};
use super::layout::VertexLayout;

macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

element_id!(
    /// Index of a vertex position.
    VertexId
);
element_id!(
    /// Index of a per-corner vertex instance.
    VertexInstanceId
);
element_id!(
    /// Index of a polygon.
    PolygonId
);
element_id!(
    /// Index of a polygon group.
    PolygonGroupId
);

#[derive(Debug, Clone)]
struct VertexInstance {
    vertex: VertexId,
    normal: [f32; 3],
    uvs: Vec<[f32; 2]>,
}

#[derive(Debug, Clone)]
struct Polygon {
    group: PolygonGroupId,
    corners: Vec<VertexInstanceId>,
}

#[derive(Debug, Clone)]
struct PolygonGroup {
    material_slot: usize,
    polygons: Vec<PolygonId>,
}

/// Polygonal mesh under construction.
#[derive(Debug, Clone, Default)]
pub struct MeshDescription {
    uv_set_count: u32,
    positions: Vec<[f32; 3]>,
    instances: Vec<VertexInstance>,
    polygons: Vec<Polygon>,
    groups: Vec<PolygonGroup>,
}

impl MeshDescription {
    /// Create an empty description whose vertex instances carry
    /// `uv_set_count` UV sets.
    pub fn new(uv_set_count: u32) -> Self {
        Self {
            uv_set_count,
            ..Default::default()
        }
    }

    /// Reserve room for the expected element counts.
    pub fn reserve(&mut self, vertices: usize, instances: usize, polygons: usize) {
        self.positions.reserve(vertices);
        self.instances.reserve(instances);
        self.polygons.reserve(polygons);
    }

    pub fn create_vertex(&mut self, position: [f32; 3]) -> VertexId {
        self.positions.push(position);
        VertexId(self.positions.len() as u32 - 1)
    }

    /// Create a corner referencing `vertex`. Normal and UVs start zeroed.
    ///
    /// Returns `None` if `vertex` does not exist.
    pub fn create_vertex_instance(&mut self, vertex: VertexId) -> Option<VertexInstanceId> {
        if vertex.index() >= self.positions.len() {
            return None;
        }
        self.instances.push(VertexInstance {
            vertex,
            normal: [0.0; 3],
            uvs: vec![[0.0; 2]; self.uv_set_count as usize],
        });
        Some(VertexInstanceId(self.instances.len() as u32 - 1))
    }

    pub fn set_instance_normal(&mut self, instance: VertexInstanceId, normal: [f32; 3]) {
        if let Some(inst) = self.instances.get_mut(instance.index()) {
            inst.normal = normal;
        }
    }

    /// Set the UV of `instance` in UV set `set`. Out-of-range sets are ignored.
    pub fn set_instance_uv(&mut self, instance: VertexInstanceId, set: u32, uv: [f32; 2]) {
        if let Some(slot) = self
            .instances
            .get_mut(instance.index())
            .and_then(|inst| inst.uvs.get_mut(set as usize))
        {
            *slot = uv;
        }
    }

    pub fn create_polygon_group(&mut self, material_slot: usize) -> PolygonGroupId {
        self.groups.push(PolygonGroup {
            material_slot,
            polygons: Vec::new(),
        });
        PolygonGroupId(self.groups.len() as u32 - 1)
    }

    /// Create a polygon from an ordered corner cycle.
    ///
    /// Returns `None` if the group or any corner does not exist, or if fewer
    /// than three corners are given.
    pub fn create_polygon(
        &mut self,
        group: PolygonGroupId,
        corners: Vec<VertexInstanceId>,
    ) -> Option<PolygonId> {
        if corners.len() < 3
            || group.index() >= self.groups.len()
            || corners.iter().any(|c| c.index() >= self.instances.len())
        {
            return None;
        }
        let id = PolygonId(self.polygons.len() as u32);
        self.polygons.push(Polygon { group, corners });
        self.groups[group.index()].polygons.push(id);
        Some(id)
    }

    pub fn uv_set_count(&self) -> u32 {
        self.uv_set_count
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn vertex_instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn polygon_group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn vertex_position(&self, vertex: VertexId) -> Option<[f32; 3]> {
        self.positions.get(vertex.index()).copied()
    }

    pub fn instance_vertex(&self, instance: VertexInstanceId) -> Option<VertexId> {
        self.instances.get(instance.index()).map(|i| i.vertex)
    }

    pub fn instance_normal(&self, instance: VertexInstanceId) -> Option<[f32; 3]> {
        self.instances.get(instance.index()).map(|i| i.normal)
    }

    pub fn instance_uv(&self, instance: VertexInstanceId, set: u32) -> Option<[f32; 2]> {
        self.instances
            .get(instance.index())
            .and_then(|i| i.uvs.get(set as usize))
            .copied()
    }

    pub fn polygon_corners(&self, polygon: PolygonId) -> Option<&[VertexInstanceId]> {
        self.polygons.get(polygon.index()).map(|p| p.corners.as_slice())
    }

    pub fn polygon_group(&self, polygon: PolygonId) -> Option<PolygonGroupId> {
        self.polygons.get(polygon.index()).map(|p| p.group)
    }

    pub fn group_polygons(&self, group: PolygonGroupId) -> Option<&[PolygonId]> {
        self.groups.get(group.index()).map(|g| g.polygons.as_slice())
    }

    pub fn group_material_slot(&self, group: PolygonGroupId) -> Option<usize> {
        self.groups.get(group.index()).map(|g| g.material_slot)
    }

    /// Build a renderable triangle mesh.
    ///
    /// Each vertex instance becomes one interleaved vertex. Polygons are
    /// fan-triangulated from their first corner and emitted group by group,
    /// one [`MeshSection`] per polygon group.
    pub fn finalize(&self, label: &str) -> CpuMesh {
        let layout = VertexLayout::position_normal_uvs(self.uv_set_count);
        let floats_per_vertex = 6 + 2 * self.uv_set_count as usize;

        let mut vertex_floats = Vec::with_capacity(self.instances.len() * floats_per_vertex);
        for inst in &self.instances {
            vertex_floats.extend_from_slice(&self.positions[inst.vertex.index()]);
            vertex_floats.extend_from_slice(&inst.normal);
            for uv in &inst.uvs {
                vertex_floats.extend_from_slice(uv);
            }
        }

        let mut indices: Vec<u32> = Vec::new();
        let mut sections = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let first_index = indices.len() as u32;
            for polygon in &group.polygons {
                let corners = &self.polygons[polygon.index()].corners;
                for i in 1..corners.len() - 1 {
                    indices.push(corners[0].0);
                    indices.push(corners[i].0);
                    indices.push(corners[i + 1].0);
                }
            }
            sections.push(MeshSection {
                first_index,
                index_count: indices.len() as u32 - first_index,
                material_slot: group.material_slot,
            });
        }

        let mesh = CpuMesh::new(layout)
            .with_vertex_data(bytemuck::cast_slice(&vertex_floats).to_vec())
            .with_sections(sections)
            .with_label(label);

        match IndexFormat::for_vertex_count(self.instances.len()) {
            IndexFormat::Uint16 => {
                let narrow: Vec<u16> = indices.iter().map(|&i| i as u16).collect();
                mesh.with_indices_u16(&narrow)
            }
            IndexFormat::Uint32 => mesh.with_indices_u32(&indices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(desc: &mut MeshDescription, group: PolygonGroupId) -> PolygonId {
        let corners: Vec<_> = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
            .into_iter()
            .map(|p| {
                let v = desc.create_vertex(p);
                desc.create_vertex_instance(v).unwrap()
            })
            .collect();
        desc.create_polygon(group, corners).unwrap()
    }

    #[test]
    fn test_empty_description_finalizes() {
        let mesh = MeshDescription::new(1).finalize("empty");
        assert!(mesh.is_empty());
        assert!(mesh.sections().is_empty());
        assert_eq!(mesh.label(), Some("empty"));
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mut desc = MeshDescription::new(0);
        let group = desc.create_polygon_group(0);
        quad(&mut desc, group);

        let mesh = desc.finalize("quad");
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.index_format(), IndexFormat::Uint16);
        assert_eq!(mesh.sections().len(), 1);
    }

    #[test]
    fn test_sections_follow_groups() {
        let mut desc = MeshDescription::new(0);
        let a = desc.create_polygon_group(0);
        let b = desc.create_polygon_group(1);
        quad(&mut desc, b);
        quad(&mut desc, a);
        quad(&mut desc, b);

        let mesh = desc.finalize("groups");
        let sections = mesh.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!((sections[0].first_index, sections[0].index_count), (0, 6));
        assert_eq!((sections[1].first_index, sections[1].index_count), (6, 12));
        assert_eq!(sections[1].material_slot, 1);
        assert_eq!(desc.group_polygons(b).map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_instance_attributes_are_interleaved() {
        let mut desc = MeshDescription::new(2);
        let group = desc.create_polygon_group(0);
        let v = desc.create_vertex([1.0, 2.0, 3.0]);
        let corners: Vec<_> = (0..3)
            .map(|_| desc.create_vertex_instance(v).unwrap())
            .collect();
        desc.set_instance_normal(corners[1], [0.0, 0.0, 1.0]);
        desc.set_instance_uv(corners[1], 1, [0.5, -0.25]);
        desc.set_instance_uv(corners[1], 7, [9.0, 9.0]);
        desc.create_polygon(group, corners.clone()).unwrap();

        assert_eq!(desc.instance_uv(corners[1], 0), Some([0.0, 0.0]));
        let mesh = desc.finalize("attrs");
        assert_eq!(mesh.positions(), vec![[1.0, 2.0, 3.0]; 3]);
        assert_eq!(mesh.normals()[1], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.uvs(1).unwrap()[1], [0.5, -0.25]);
        assert_eq!(mesh.uvs(0).unwrap()[1], [0.0, 0.0]);
    }

    #[test]
    fn test_invalid_elements_are_rejected() {
        let mut desc = MeshDescription::new(0);
        let group = desc.create_polygon_group(0);
        assert!(desc.create_vertex_instance(VertexId(0)).is_none());

        let v = desc.create_vertex([0.0; 3]);
        let a = desc.create_vertex_instance(v).unwrap();
        let b = desc.create_vertex_instance(v).unwrap();
        assert!(desc.create_polygon(group, vec![a, b]).is_none());
        assert!(
            desc.create_polygon(group, vec![a, b, VertexInstanceId(5)])
                .is_none()
        );
        assert!(
            desc.create_polygon(PolygonGroupId(3), vec![a, b, a])
                .is_none()
        );
        assert_eq!(desc.polygon_count(), 0);
    }

    #[test]
    fn test_large_mesh_uses_u32_indices() {
        let mut desc = MeshDescription::new(0);
        let group = desc.create_polygon_group(0);
        let v = desc.create_vertex([0.0; 3]);
        let corners: Vec<_> = (0..70_000)
            .map(|_| desc.create_vertex_instance(v).unwrap())
            .collect();
        desc.create_polygon(group, corners).unwrap();

        let mesh = desc.finalize("big");
        assert_eq!(mesh.index_format(), IndexFormat::Uint32);
        assert_eq!(mesh.triangle_count(), 69_998);
    }
}

//! Assembly of engine geometry streams into host meshes.

use std::sync::Arc;

use procbridge_core::attributes::AttributeMap;
use procbridge_core::mesh::{MeshDescription, VertexId};

use crate::callbacks::MeshGeometry;
use crate::convert::CoordinateConversion;
use crate::error::{EncoderError, EncoderResult};
use crate::material_builder::MaterialBuilder;
use crate::registry::PrototypeMesh;
use crate::settings::MaterialBinding;

/// Builds [`MeshDescription`]s from the flat streams of [`MeshGeometry`].
///
/// Face groups partition one shared face stream: group `g` takes the next
/// `face_ranges[g]` faces, and each face takes the next
/// `face_vertex_counts[f]` entries of every corner index stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshAssembler {
    conversion: CoordinateConversion,
}

impl MeshAssembler {
    pub fn new(conversion: CoordinateConversion) -> Self {
        Self { conversion }
    }

    pub fn conversion(&self) -> &CoordinateConversion {
        &self.conversion
    }

    /// Convert geometry streams into a polygonal mesh description.
    ///
    /// Every stream length and index is checked before anything is built.
    /// Faces are kept as polygons; the description has one polygon group per
    /// face range, with material slot equal to the group index.
    pub fn assemble(&self, geometry: &MeshGeometry<'_>) -> EncoderResult<MeshDescription> {
        let corner_count = validate(geometry)?;

        let mut desc = MeshDescription::new(geometry.uv_sets.len() as u32);
        desc.reserve(
            geometry.vertices.len() / 3,
            corner_count,
            geometry.face_vertex_counts.len(),
        );

        for p in geometry.vertices.chunks_exact(3) {
            desc.create_vertex(self.conversion.position([p[0], p[1], p[2]]));
        }

        let mut face = 0usize;
        let mut corner = 0usize;
        for (group_index, &group_size) in geometry.face_ranges.iter().enumerate() {
            let group = desc.create_polygon_group(group_index);

            for _ in 0..group_size {
                let count = geometry.face_vertex_counts[face] as usize;
                let mut corners = Vec::with_capacity(count);

                for offset in corner..corner + count {
                    let vertex = geometry.vertex_indices[offset];
                    let instance = desc.create_vertex_instance(VertexId::new(vertex)).ok_or(
                        EncoderError::IndexOutOfRange {
                            stream: "vertex_indices",
                            index: vertex,
                            len: geometry.vertices.len() / 3,
                        },
                    )?;

                    if let Some(&n) = geometry.normal_indices.get(offset) {
                        let n = n as usize * 3;
                        let normal = &geometry.normals[n..n + 3];
                        desc.set_instance_normal(
                            instance,
                            self.conversion.normal([normal[0], normal[1], normal[2]]),
                        );
                    }

                    for (set, uvs) in geometry.uv_sets.iter().enumerate() {
                        if let Some(&i) = uvs.indices.get(offset) {
                            let i = i as usize * 2;
                            let uv = self.conversion.uv([uvs.coords[i], uvs.coords[i + 1]]);
                            desc.set_instance_uv(instance, set as u32, uv);
                        }
                    }

                    corners.push(instance);
                }

                desc.create_polygon(group, corners)
                    .ok_or(EncoderError::DegenerateFace {
                        face,
                        corners: count as u32,
                    })?;
                face += 1;
                corner += count;
            }
        }

        Ok(desc)
    }

    /// Assemble `geometry`, build its materials and finalize the mesh.
    ///
    /// Face groups without a material attribute map get a material built
    /// from an empty map.
    pub fn build(
        &self,
        geometry: &MeshGeometry<'_>,
        materials: &mut MaterialBuilder,
        binding: MaterialBinding,
    ) -> EncoderResult<PrototypeMesh> {
        let description = self.assemble(geometry)?;

        let group_count = geometry.face_ranges.len();
        if geometry.materials.len() < group_count && binding == MaterialBinding::PerGroup {
            log::warn!(
                "Mesh {} has {} face groups but {} material maps",
                geometry.name,
                group_count,
                geometry.materials.len()
            );
        }

        let empty = AttributeMap::new();
        let attributes_of = |group: usize| geometry.materials.get(group).unwrap_or(&empty);
        let group_materials = match binding {
            MaterialBinding::PerGroup => (0..group_count)
                .map(|group| Arc::new(materials.build(attributes_of(group))))
                .collect(),
            MaterialBinding::FirstGroup if group_count > 0 => {
                vec![Arc::new(materials.build(attributes_of(0))); group_count]
            }
            MaterialBinding::FirstGroup => Vec::new(),
        };

        let mesh = Arc::new(description.finalize(geometry.name));
        log::debug!(
            "Assembled mesh {} (prototype {}): {} vertices, {} corners, {} faces, {} groups",
            geometry.name,
            geometry.prototype_id,
            description.vertex_count(),
            description.vertex_instance_count(),
            description.polygon_count(),
            description.polygon_group_count()
        );

        Ok(PrototypeMesh {
            name: geometry.name.to_string(),
            prototype_id: geometry.prototype_id,
            description,
            mesh,
            materials: group_materials,
        })
    }
}

fn check_tuples(stream: &'static str, data: &[f64], arity: usize) -> EncoderResult<()> {
    if data.len() % arity != 0 {
        return Err(EncoderError::PartialTuple {
            stream,
            len: data.len(),
            arity,
        });
    }
    Ok(())
}

/// Corner index streams must cover every corner. Optional streams may
/// instead be empty.
fn check_corner_stream(
    stream: &'static str,
    indices: &[u32],
    corner_count: usize,
    optional: bool,
) -> EncoderResult<()> {
    if indices.len() != corner_count && !(optional && indices.is_empty()) {
        return Err(EncoderError::StreamLength {
            stream,
            expected: corner_count,
            actual: indices.len(),
        });
    }
    Ok(())
}

fn check_bounds(stream: &'static str, indices: &[u32], len: usize) -> EncoderResult<()> {
    match indices.iter().find(|&&i| i as usize >= len) {
        Some(&index) => Err(EncoderError::IndexOutOfRange { stream, index, len }),
        None => Ok(()),
    }
}

/// Check stream shapes and index ranges. Returns the corner count.
fn validate(geometry: &MeshGeometry<'_>) -> EncoderResult<usize> {
    check_tuples("vertices", geometry.vertices, 3)?;
    check_tuples("normals", geometry.normals, 3)?;
    for uvs in geometry.uv_sets {
        check_tuples("uv_coords", uvs.coords, 2)?;
    }

    let mut corner_count = 0usize;
    for (face, &corners) in geometry.face_vertex_counts.iter().enumerate() {
        if corners < 3 {
            return Err(EncoderError::DegenerateFace { face, corners });
        }
        corner_count += corners as usize;
    }

    let face_count = geometry.face_vertex_counts.len();
    let grouped: usize = geometry.face_ranges.iter().map(|&n| n as usize).sum();
    if grouped > face_count {
        return Err(EncoderError::FaceRangeOverflow {
            requested: grouped,
            available: face_count,
        });
    }
    if grouped < face_count {
        return Err(EncoderError::StreamLength {
            stream: "face_ranges",
            expected: face_count,
            actual: grouped,
        });
    }

    check_corner_stream("vertex_indices", geometry.vertex_indices, corner_count, false)?;
    check_corner_stream("normal_indices", geometry.normal_indices, corner_count, true)?;
    for uvs in geometry.uv_sets {
        check_corner_stream("uv_indices", uvs.indices, corner_count, true)?;
    }

    check_bounds("vertex_indices", geometry.vertex_indices, geometry.vertices.len() / 3)?;
    check_bounds("normal_indices", geometry.normal_indices, geometry.normals.len() / 3)?;
    for uvs in geometry.uv_sets {
        check_bounds("uv_indices", uvs.indices, uvs.coords.len() / 2)?;
    }

    Ok(corner_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::UvSet;
    use crate::image_loader::FileImageLoader;
    use procbridge_core::attributes::AttributeMapBuilder;
    use procbridge_core::material::CpuMaterial;
    use procbridge_core::mesh::{PolygonGroupId, PolygonId, VertexInstanceId};

    const TRIANGLE: [f64; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

    fn assembler() -> MeshAssembler {
        MeshAssembler::new(CoordinateConversion::new(100.0))
    }

    fn material_builder() -> MaterialBuilder {
        MaterialBuilder::new(
            Arc::new(CpuMaterial::procedural()),
            Arc::new(FileImageLoader::new()),
        )
    }

    fn triangle() -> MeshGeometry<'static> {
        MeshGeometry {
            vertices: &TRIANGLE,
            face_vertex_counts: &[3],
            vertex_indices: &[0, 1, 2],
            face_ranges: &[1],
            ..MeshGeometry::empty("triangle", 1)
        }
    }

    #[test]
    fn single_triangle() {
        let desc = assembler().assemble(&triangle()).unwrap();
        assert_eq!(desc.vertex_count(), 3);
        assert_eq!(desc.vertex_instance_count(), 3);
        assert_eq!(desc.polygon_count(), 1);
        assert_eq!(desc.polygon_group_count(), 1);
        assert_eq!(desc.vertex_position(VertexId::new(1)), Some([100.0, 0.0, 0.0]));
        assert_eq!(desc.vertex_position(VertexId::new(2)), Some([0.0, 0.0, 100.0]));
    }

    #[test]
    fn groups_consume_shared_face_stream() {
        // A quad and a triangle in group 0, one triangle in group 1.
        let vertices = [
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 0.0,
        ];
        let geometry = MeshGeometry {
            vertices: &vertices,
            face_vertex_counts: &[4, 3, 3],
            vertex_indices: &[0, 1, 2, 3, 1, 4, 2, 0, 2, 3],
            face_ranges: &[2, 1],
            ..MeshGeometry::empty("mixed", 2)
        };
        let desc = assembler().assemble(&geometry).unwrap();

        assert_eq!(desc.vertex_instance_count(), 10);
        assert_eq!(desc.polygon_count(), 3);
        assert_eq!(desc.group_polygons(PolygonGroupId::new(0)).map(<[_]>::len), Some(2));
        assert_eq!(desc.group_polygons(PolygonGroupId::new(1)).map(<[_]>::len), Some(1));
        assert_eq!(desc.polygon_corners(PolygonId::new(0)).map(<[_]>::len), Some(4));
        let last = desc.polygon_corners(PolygonId::new(2)).unwrap();
        assert_eq!(desc.instance_vertex(last[0]), Some(VertexId::new(0)));
        assert_eq!(desc.instance_vertex(last[2]), Some(VertexId::new(3)));
    }

    #[test]
    fn normals_swap_without_scaling() {
        let normals = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let geometry = MeshGeometry {
            normals: &normals,
            normal_indices: &[0, 1, 0],
            ..triangle()
        };
        let desc = assembler().assemble(&geometry).unwrap();
        assert_eq!(desc.instance_normal(VertexInstanceId::new(0)), Some([0.0, 0.0, 1.0]));
        assert_eq!(desc.instance_normal(VertexInstanceId::new(1)), Some([0.0, 1.0, 0.0]));
    }

    #[test]
    fn uv_sets_flip_v() {
        let coords = [0.0, 0.0, 1.0, 0.25, 0.5, 1.0];
        let uv_sets = [
            UvSet {
                coords: &coords,
                indices: &[0, 1, 2],
            },
            UvSet::default(),
        ];
        let geometry = MeshGeometry {
            uv_sets: &uv_sets,
            ..triangle()
        };
        let desc = assembler().assemble(&geometry).unwrap();
        assert_eq!(desc.uv_set_count(), 2);
        assert_eq!(desc.instance_uv(VertexInstanceId::new(1), 0), Some([1.0, -0.25]));
        assert_eq!(desc.instance_uv(VertexInstanceId::new(1), 1), Some([0.0, 0.0]));
    }

    #[test]
    fn empty_geometry_is_valid() {
        let desc = assembler()
            .assemble(&MeshGeometry::empty("nothing", 0))
            .unwrap();
        assert_eq!(desc.vertex_count(), 0);
        assert_eq!(desc.polygon_count(), 0);
        assert!(desc.finalize("nothing").is_empty());
    }

    #[test]
    fn out_of_range_vertex_index() {
        let geometry = MeshGeometry {
            vertex_indices: &[0, 1, 3],
            ..triangle()
        };
        assert_eq!(
            assembler().assemble(&geometry).unwrap_err(),
            EncoderError::IndexOutOfRange {
                stream: "vertex_indices",
                index: 3,
                len: 3
            }
        );
    }

    #[test]
    fn out_of_range_uv_index() {
        let coords = [0.0, 0.0];
        let uv_sets = [UvSet {
            coords: &coords,
            indices: &[0, 0, 1],
        }];
        let geometry = MeshGeometry {
            uv_sets: &uv_sets,
            ..triangle()
        };
        assert!(matches!(
            assembler().assemble(&geometry),
            Err(EncoderError::IndexOutOfRange { stream: "uv_indices", index: 1, .. })
        ));
    }

    #[test]
    fn malformed_streams() {
        let a = assembler();
        let short = MeshGeometry {
            vertices: &TRIANGLE[..8],
            ..triangle()
        };
        assert!(matches!(a.assemble(&short), Err(EncoderError::PartialTuple { .. })));

        let degenerate = MeshGeometry {
            face_vertex_counts: &[2],
            vertex_indices: &[0, 1],
            ..triangle()
        };
        assert_eq!(
            a.assemble(&degenerate).unwrap_err(),
            EncoderError::DegenerateFace { face: 0, corners: 2 }
        );

        let overflow = MeshGeometry {
            face_ranges: &[2],
            ..triangle()
        };
        assert_eq!(
            a.assemble(&overflow).unwrap_err(),
            EncoderError::FaceRangeOverflow {
                requested: 2,
                available: 1
            }
        );

        let ungrouped = MeshGeometry {
            face_ranges: &[],
            ..triangle()
        };
        assert!(matches!(
            a.assemble(&ungrouped),
            Err(EncoderError::StreamLength { stream: "face_ranges", .. })
        ));

        let missing_corner = MeshGeometry {
            vertex_indices: &[0, 1],
            ..triangle()
        };
        assert!(matches!(
            a.assemble(&missing_corner),
            Err(EncoderError::StreamLength { stream: "vertex_indices", .. })
        ));
    }

    #[test]
    fn build_binds_material_per_group() {
        let mut red = AttributeMapBuilder::new();
        red.set_string("diffuseColor", "#ff0000");
        let mut blue = AttributeMapBuilder::new();
        blue.set_string("diffuseColor", "#0000ff");
        let maps = [red.build(), blue.build()];

        let mut vertices = TRIANGLE.to_vec();
        vertices.extend_from_slice(&[1.0, 1.0, 0.0]);
        let geometry = MeshGeometry {
            vertices: &vertices,
            face_vertex_counts: &[3, 3],
            vertex_indices: &[0, 1, 2, 1, 3, 2],
            face_ranges: &[1, 1],
            materials: &maps,
            ..MeshGeometry::empty("two_groups", 9)
        };

        let mut builder = material_builder();
        let per_group = assembler()
            .build(&geometry, &mut builder, MaterialBinding::PerGroup)
            .unwrap();
        assert_eq!(per_group.materials.len(), 2);
        assert_eq!(per_group.materials[0].get_vec3("diffuse_color"), Some([1.0, 0.0, 0.0]));
        assert_eq!(per_group.materials[1].get_vec3("diffuse_color"), Some([0.0, 0.0, 1.0]));
        assert_eq!(per_group.mesh.sections().len(), 2);
        assert_eq!(per_group.mesh.sections()[1].material_slot, 1);
        assert_eq!(per_group.mesh.triangle_count(), 2);

        let first_group = assembler()
            .build(&geometry, &mut builder, MaterialBinding::FirstGroup)
            .unwrap();
        assert_eq!(first_group.materials.len(), 2);
        assert!(Arc::ptr_eq(&first_group.materials[0], &first_group.materials[1]));
        assert_eq!(first_group.materials[1].get_vec3("diffuse_color"), Some([1.0, 0.0, 0.0]));
    }

    #[test]
    fn build_without_material_maps() {
        let mut builder = material_builder();
        let mesh = assembler()
            .build(&triangle(), &mut builder, MaterialBinding::PerGroup)
            .unwrap();
        assert_eq!(mesh.materials.len(), 1);
        assert_eq!(mesh.materials[0].bound_count(), 0);
        assert_eq!(mesh.mesh.vertex_count(), 3);
        assert_eq!(mesh.mesh.label(), Some("triangle"));
    }
}

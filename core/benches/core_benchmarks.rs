use criterion::{Criterion, black_box, criterion_group, criterion_main};

use procbridge_core::attributes::AttributeMapBuilder;
use procbridge_core::mesh::{MeshDescription, VertexAttributeSemantic, VertexLayout};
use procbridge_core::rule_attribute::{RuleAttribute, RuleAttributeSet, RuleAttributeValue};

/// A strip of `n` quads sharing edges, one UV set.
fn quad_strip(n: u32) -> MeshDescription {
    let mut desc = MeshDescription::new(1);
    let group = desc.create_polygon_group(0);
    let vertices: Vec<_> = (0..=n)
        .flat_map(|i| [[i as f32, 0.0, 0.0], [i as f32, 1.0, 0.0]])
        .map(|p| desc.create_vertex(p))
        .collect();
    for i in 0..n as usize {
        let corners = [0, 2, 3, 1]
            .iter()
            .filter_map(|&k| desc.create_vertex_instance(vertices[2 * i + k]))
            .collect();
        desc.create_polygon(group, corners);
    }
    desc
}

// ---------------------------------------------------------------------------
// Mesh finalization
// ---------------------------------------------------------------------------

fn bench_finalize_small(c: &mut Criterion) {
    let desc = quad_strip(64);
    c.bench_function("finalize_quad_strip_64", |b| {
        b.iter(|| black_box(&desc).finalize("strip"));
    });
}

fn bench_finalize_large(c: &mut Criterion) {
    // Crosses the u16 index limit.
    let desc = quad_strip(20_000);
    c.bench_function("finalize_quad_strip_20000", |b| {
        b.iter(|| black_box(&desc).finalize("strip"));
    });
}

fn bench_vertex_layout_get_attribute(c: &mut Criterion) {
    let layout = VertexLayout::position_normal_uvs(2);
    c.bench_function("vertex_layout_get_attribute", |b| {
        b.iter(|| {
            black_box(layout.get_attribute(black_box(VertexAttributeSemantic::TexCoord(1))));
        });
    });
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

fn bench_attribute_map_build(c: &mut Criterion) {
    c.bench_function("attribute_map_build_64", |b| {
        b.iter(|| {
            let mut builder = AttributeMapBuilder::new();
            for i in 0..64 {
                builder.set_float(&format!("attr{i}"), i as f64);
            }
            black_box(builder.take())
        });
    });
}

fn bench_rule_attributes_sorted(c: &mut Criterion) {
    let mut set = RuleAttributeSet::new();
    for i in 0..256 {
        set.insert(
            RuleAttribute::new(format!("Default$attr{i}"), RuleAttributeValue::Float(i as f64))
                .with_groups(vec![format!("group{}", i % 7)])
                .with_order(255 - i),
        );
    }
    c.bench_function("rule_attributes_sorted_256", |b| {
        b.iter(|| black_box(set.sorted().len()));
    });
}

criterion_group!(
    benches,
    bench_finalize_small,
    bench_finalize_large,
    bench_vertex_layout_get_attribute,
    bench_attribute_map_build,
    bench_rule_attributes_sorted,
);
criterion_main!(benches);

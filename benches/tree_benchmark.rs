use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ifc_typetree::{
    CheckedMap, MetadataSet, ObjectRecord, TreeConfig, build_tree, state_of, toggle,
};
use std::hint::black_box;

const TYPES: [&str; 8] = [
    "IfcWall",
    "IfcWallStandardCase",
    "IfcDoor",
    "IfcWindow",
    "IfcSlab",
    "IfcBeam",
    "IfcColumn",
    "IfcFurnishingElement",
];

/// Generate metadata for a model with the given number of entities
fn generate_metadata(objects: usize) -> MetadataSet {
    MetadataSet::from_records((0..objects).map(|i| {
        ObjectRecord::new(
            format!("{:022x}", i),
            TYPES[i % TYPES.len()],
            format!("Element {}", i),
        )
    }))
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");

    for &objects in &[1_000, 10_000, 100_000] {
        let metadata = generate_metadata(objects);
        group.bench_with_input(
            BenchmarkId::new("objects", objects),
            &metadata,
            |b, metadata| {
                b.iter(|| black_box(build_tree(metadata, &TreeConfig::default())));
            },
        );
    }

    group.finish();
}

fn bench_state_of(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_of");

    for &objects in &[1_000, 10_000, 100_000] {
        let tree = build_tree(&generate_metadata(objects), &TreeConfig::default());
        // hide the last leaf of each type so every fold walks all children
        let mut checked = CheckedMap::initialized(&tree, true);
        for dir in tree.roots() {
            if let Some(last) = dir.children().last() {
                checked.set(last.key(), false);
            }
        }

        group.bench_with_input(
            BenchmarkId::new("objects", objects),
            &(tree, checked),
            |b, (tree, checked)| {
                b.iter(|| {
                    for dir in tree.roots() {
                        black_box(state_of(dir, checked));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_toggle_directory(c: &mut Criterion) {
    let tree = build_tree(&generate_metadata(100_000), &TreeConfig::default());
    let checked = CheckedMap::initialized(&tree, true);
    let wall = &tree.roots()[0];

    c.bench_function("toggle_directory_12500", |b| {
        b.iter(|| black_box(toggle(wall, false, &checked)));
    });
}

criterion_group!(benches, bench_build_tree, bench_state_of, bench_toggle_directory);
criterion_main!(benches);

//! Traversal benchmarks using divan
//!
//! Pre-order and breadth-first walks, path resolution and measurement lookup.

use octofhir_sr_model::{CodedConcept, ContentItem, RelationshipType, codes};
use octofhir_sr_query::{Navigator, SrPath, Walk, WalkOptions};
use rust_decimal::Decimal;

fn main() {
    divan::main();
}

fn report(groups: usize) -> ContentItem {
    let children = (0..groups)
        .map(|i| {
            ContentItem::container(
                codes::MEASUREMENT_GROUP,
                vec![
                    ContentItem::text(codes::TRACKING_IDENTIFIER, format!("lesion {}", i))
                        .with_relationship(RelationshipType::HasObsContext),
                    ContentItem::measurement(codes::FINDING, Decimal::new(i as i64, 1), CodedConcept::ucum("mm"))
                        .with_relationship(RelationshipType::Contains),
                ],
            )
            .with_relationship(RelationshipType::Contains)
        })
        .collect();
    ContentItem::container(codes::IMAGING_MEASUREMENTS, children)
}

#[divan::bench(args = [100, 1000, 10000])]
fn pre_order(bencher: divan::Bencher, groups: usize) {
    let root = report(groups);
    let walk = Walk::new(&root, WalkOptions::default());
    bencher.bench_local(|| walk.iter().count());
}

#[divan::bench(args = [100, 1000, 10000])]
fn breadth_first(bencher: divan::Bencher, groups: usize) {
    let root = report(groups);
    let walk = Walk::new(&root, WalkOptions::breadth_first());
    bencher.bench_local(|| walk.iter().count());
}

#[divan::bench]
fn resolve_path(bencher: divan::Bencher) {
    let root = report(1000);
    let nav = Navigator::from_item(&root);
    let path = SrPath::parse("/Measurement Group[999]/NUM").unwrap();
    bencher.bench_local(|| nav.resolve(divan::black_box(&path)));
}

#[divan::bench]
fn parse_path(bencher: divan::Bencher) {
    bencher.bench_local(|| SrPath::parse(divan::black_box("/Imaging Measurements/Measurement Group[3]/\"Long Axis\"")));
}

#[divan::bench(args = [100, 1000])]
fn missing_measurement(bencher: divan::Bencher, groups: usize) {
    let root = report(groups);
    let nav = Navigator::from_item(&root);
    let unit = CodedConcept::ucum("mm");
    bencher.bench_local(|| nav.measurement(divan::black_box(&unit)));
}

//! Extraction and routing on a synthetic street grid.
//!
//! Run with: cargo bench -p saferoute_core

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use saferoute_core::prelude::*;
use saferoute_core::routing;

const SIDE: i64 = 120;
/// Roughly 110 m between grid neighbours
const STEP_DEG: f64 = 0.001;

fn grid_id(row: i64, col: i64) -> NodeId {
    row * SIDE + col
}

/// Two-way grid with every fifth column flooded
fn build_grid() -> (NodeStore, EdgeSource, Vec<HazardPoint>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for row in 0..SIDE {
        for col in 0..SIDE {
            nodes.push(Node::new(
                grid_id(row, col),
                39.40 + row as f64 * STEP_DEG,
                -0.40 + col as f64 * STEP_DEG,
            ));
            let flood = if col % 5 == 0 { 0.3 } else { 0.0 };
            for (next_row, next_col) in [(row + 1, col), (row, col + 1)] {
                if next_row < SIDE && next_col < SIDE {
                    let (a, b) = (grid_id(row, col), grid_id(next_row, next_col));
                    edges.push(Edge::new(a, b, 110.0, 80.0, 1.0, flood));
                    edges.push(Edge::new(b, a, 110.0, 80.0, 1.0, flood));
                }
            }
        }
    }

    let hazards = (0..SIDE)
        .step_by(10)
        .map(|row| {
            HazardPoint::new(
                39.40 + row as f64 * STEP_DEG,
                -0.40 + 50.0 * STEP_DEG,
                HazardKind::Incident,
                "bench",
            )
        })
        .collect();

    (NodeStore::from_nodes(nodes), EdgeSource::from_edges(edges), hazards)
}

fn bench_pipeline(c: &mut Criterion) {
    let (nodes, edges, hazards) = build_grid();
    let model = RoutingModel::new(nodes, edges, hazards, Vec::new(), RoutingConfig::default())
        .expect("grid model");

    let mut group = c.benchmark_group("plan_route");
    for span in [10_i64, 40, 100] {
        let query = RouteQuery::new(
            Location::new(39.40, -0.40),
            Location::new(39.40 + span as f64 * STEP_DEG, -0.40 + span as f64 * STEP_DEG),
            routing::Criterion::Distance,
        );
        group.bench_with_input(BenchmarkId::from_parameter(span), &query, |b, query| {
            b.iter(|| plan_route(black_box(&model), black_box(query)));
        });
    }
    group.finish();
}

fn bench_routing(c: &mut Criterion) {
    let (nodes, edges, hazards) = build_grid();
    let (mut subgraph, _) = extract(
        grid_id(0, 0),
        grid_id(SIDE - 1, SIDE - 1),
        &nodes,
        &edges,
        RadiusPolicy::default(),
    )
    .expect("grid subgraph");
    penalize(&mut subgraph, &hazards);

    c.bench_function("route_corner_to_corner", |b| {
        b.iter(|| {
            route(
                black_box(&subgraph),
                grid_id(0, 0),
                grid_id(SIDE - 1, SIDE - 1),
                routing::Criterion::Time,
            )
        });
    });
}

criterion_group!(benches, bench_pipeline, bench_routing);
criterion_main!(benches);

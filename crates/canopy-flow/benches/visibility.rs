use canopy_flow::{
    ExpansionState, FlowData, FlowGraph, FlowLink, FlowNode, SankeyOptions, compute_visibility,
    layout_sankey,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

/// `sources` expandable groups of `fanout` plants, each feeding every sink.
fn build_flow(sources: usize, fanout: usize, sinks: usize) -> FlowGraph {
    let mut nodes = Vec::new();
    let mut links = Vec::new();
    for k in 0..sinks {
        nodes.push(FlowNode::new(format!("sink{k}"), format!("Sink {k}")));
    }
    for s in 0..sources {
        let group = format!("src{s}");
        nodes.push(FlowNode::new(group.clone(), group.clone()).expandable());
        for k in 0..sinks {
            links.push(FlowLink::aggregate(
                group.clone(),
                format!("sink{k}"),
                fanout as f64,
            ));
        }
        for p in 0..fanout {
            let plant = format!("{group}.{p}");
            nodes.push(FlowNode::new(plant.clone(), plant.clone()).with_parent(group.clone()));
            for k in 0..sinks {
                links.push(FlowLink::detail(plant.clone(), format!("sink{k}"), 1.0));
            }
        }
    }
    FlowGraph::new(FlowData { nodes, links }).expect("generated flow is valid")
}

fn bench_visibility(c: &mut Criterion) {
    let mut group = c.benchmark_group("flow");
    group.measurement_time(Duration::from_secs(5));

    for (name, sources, fanout, sinks) in [("s10_f10_k5", 10, 10, 5), ("s50_f20_k10", 50, 20, 10)] {
        let g = build_flow(sources, fanout, sinks);
        let mut expanded = ExpansionState::new();
        for s in (0..sources).step_by(2) {
            expanded.expand(&g, &format!("src{s}"));
        }

        group.bench_with_input(BenchmarkId::new("visibility", name), &g, |b, g| {
            b.iter(|| black_box(compute_visibility(black_box(g), &expanded)))
        });
        let visible = compute_visibility(&g, &expanded);
        group.bench_with_input(BenchmarkId::new("sankey", name), &g, |b, g| {
            b.iter(|| black_box(layout_sankey(black_box(g), &visible, &SankeyOptions::default())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_visibility);
criterion_main!(benches);

//! Aggregate-vs-detail value consistency.
//!
//! An aggregate link `s -> t` summarizes the flow from `s`'s children into `t`, so its value
//! should equal the sum of the links from those children to `t`.

use crate::model::{FlowGraph, LinkKind};
use serde::Serialize;

const RELATIVE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSumMismatch {
    pub link_index: usize,
    pub source: String,
    pub target: String,
    pub aggregate: f64,
    pub detail_sum: f64,
}

pub fn check_link_sums(graph: &FlowGraph) -> Vec<LinkSumMismatch> {
    let mut out = Vec::new();
    for (li, link) in graph.links().iter().enumerate() {
        if link.kind != LinkKind::Aggregate {
            continue;
        }
        let (source, target) = graph.link_endpoints(li);
        if !graph.node(source).expandable {
            continue;
        }
        let children = graph.children(source);
        let detail_sum: f64 = (0..graph.links().len())
            .filter(|&other| {
                let (s, t) = graph.link_endpoints(other);
                t == target && children.contains(&s)
            })
            .map(|other| graph.links()[other].value)
            .sum();

        let scale = link.value.abs().max(detail_sum.abs()).max(1.0);
        if (link.value - detail_sum).abs() > RELATIVE_TOLERANCE * scale {
            out.push(LinkSumMismatch {
                link_index: li,
                source: link.source.clone(),
                target: link.target.clone(),
                aggregate: link.value,
                detail_sum,
            });
        }
    }
    out
}

impl FlowGraph {
    pub fn check_link_sums(&self) -> Vec<LinkSumMismatch> {
        check_link_sums(self)
    }
}

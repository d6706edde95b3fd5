use crate::expansion::ExpansionState;
use crate::model::{FlowGraph, FlowIdx, FlowLink, LinkKind};
use serde::Serialize;

/// Nodes and links to render for one expansion state, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Visibility {
    pub nodes: Vec<String>,
    pub links: Vec<FlowLink>,
    /// Indices of `links` in [`FlowGraph::links`].
    pub link_indices: Vec<usize>,
}

impl Visibility {
    pub fn is_node_visible(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n == id)
    }

    pub fn has_link(&self, source: &str, target: &str) -> bool {
        self.links
            .iter()
            .any(|l| l.source == source && l.target == target)
    }
}

/// A node is visible when every expandable ancestor is expanded.
///
/// Ancestors that cannot be expanded (the root of a flow, for instance) never hide anything.
pub fn is_node_visible(graph: &FlowGraph, state: &ExpansionState, idx: FlowIdx) -> bool {
    graph.ancestors(idx).all(|a| {
        let n = graph.node(a);
        !n.expandable || state.is_expanded(&n.id)
    })
}

/// Derives the visible node and link sets.
///
/// A link is visible when both endpoints are visible and, if its source is expandable, its
/// [`LinkKind`] matches the source's state: detail links while expanded, aggregate links while
/// collapsed. Links from non-expandable sources ignore the tag.
pub fn compute_visibility(graph: &FlowGraph, state: &ExpansionState) -> Visibility {
    let visible: Vec<bool> = (0..graph.nodes().len())
        .map(|i| is_node_visible(graph, state, i))
        .collect();

    let mut out = Visibility {
        nodes: graph
            .nodes()
            .iter()
            .zip(&visible)
            .filter(|(_, v)| **v)
            .map(|(n, _)| n.id.clone())
            .collect(),
        ..Default::default()
    };

    for (li, link) in graph.links().iter().enumerate() {
        let (s, t) = graph.link_endpoints(li);
        if !(visible[s] && visible[t]) {
            continue;
        }
        let source = graph.node(s);
        if source.expandable {
            let expanded = state.is_expanded(&source.id);
            let wanted = if expanded {
                LinkKind::Detail
            } else {
                LinkKind::Aggregate
            };
            if link.kind != wanted {
                continue;
            }
        }
        out.links.push(link.clone());
        out.link_indices.push(li);
    }

    tracing::debug!(
        nodes = out.nodes.len(),
        links = out.links.len(),
        expanded = state.len(),
        "visibility recomputed"
    );
    out
}

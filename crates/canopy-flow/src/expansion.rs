//! Expansion state for a [`FlowGraph`], owned by the caller.
//!
//! The state is just the ordered set of expanded node ids. `expand` never cascades; `collapse`
//! also collapses every descendant, so re-expanding a node starts from a fully collapsed
//! subtree.

use crate::model::FlowGraph;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    expanded: IndexSet<String>,
}

impl ExpansionState {
    /// Empty state: everything collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the state with the expandable nodes flagged as pre-expanded in the data.
    pub fn from_graph(graph: &FlowGraph) -> Self {
        let expanded = graph
            .nodes()
            .iter()
            .filter(|n| n.expandable && n.expanded)
            .map(|n| n.id.clone())
            .collect();
        Self { expanded }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded_ids(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Expands `id` only. Returns `false` for unknown or non-expandable nodes.
    pub fn expand(&mut self, graph: &FlowGraph, id: &str) -> bool {
        match graph.get(id) {
            Some(n) if n.expandable => {
                self.expanded.insert(n.id.clone());
                tracing::trace!(id, "expand");
                true
            }
            _ => false,
        }
    }

    /// Collapses `id` and all of its descendants. Returns `false` for unknown nodes.
    pub fn collapse(&mut self, graph: &FlowGraph, id: &str) -> bool {
        let Some(idx) = graph.index_of(id) else {
            return false;
        };
        self.expanded.shift_remove(id);
        for d in graph.descendants(idx) {
            self.expanded.shift_remove(graph.node(d).id.as_str());
        }
        tracing::trace!(id, "collapse");
        true
    }

    /// Flips `id`; returns the new expansion flag.
    pub fn toggle(&mut self, graph: &FlowGraph, id: &str) -> bool {
        if self.is_expanded(id) {
            self.collapse(graph, id);
            false
        } else {
            self.expand(graph, id)
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }
}

//! Flow graph: a forest of expandable nodes plus value-carrying links.

use crate::error::{Error, Result};
use crate::integrity;
use canopy_geom::Config;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub type FlowIdx = usize;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "title", alias = "name")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub expandable: bool,
    /// Initial expansion; only meaningful for expandable nodes.
    #[serde(default)]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FlowNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn expandable(mut self) -> Self {
        self.expandable = true;
        self
    }

    pub fn pre_expanded(mut self) -> Self {
        self.expandable = true;
        self.expanded = true;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Which link set a link belongs to, relative to its (expandable) source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Shown while the source is expanded.
    #[default]
    Detail,
    /// Summary link shown while the source is collapsed.
    Aggregate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowLink {
    #[serde(default)]
    pub kind: LinkKind,
    pub source: String,
    pub target: String,
    pub value: f64,
}

impl FlowLink {
    pub fn detail(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            kind: LinkKind::Detail,
            source: source.into(),
            target: target.into(),
            value,
        }
    }

    pub fn aggregate(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            kind: LinkKind::Aggregate,
            ..Self::detail(source, target, value)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowData {
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub links: Vec<FlowLink>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject data whose aggregate links disagree with the sum of their detail links.
    pub strict_link_sums: bool,
}

impl LoadOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            strict_link_sums: cfg.get_bool("flow.strictLinkSums").unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowGraph {
    nodes: Vec<FlowNode>,
    index: FxHashMap<String, FlowIdx>,
    parents: Vec<Option<FlowIdx>>,
    children: Vec<Vec<FlowIdx>>,
    links: Vec<FlowLink>,
    link_endpoints: Vec<(FlowIdx, FlowIdx)>,
}

impl FlowGraph {
    pub fn new(data: FlowData) -> Result<Self> {
        Self::load(data, &LoadOptions::default())
    }

    pub fn load(data: FlowData, opts: &LoadOptions) -> Result<Self> {
        let FlowData { nodes, links } = data;

        let mut index: FxHashMap<String, FlowIdx> = FxHashMap::default();
        for (pos, n) in nodes.iter().enumerate() {
            if n.id.trim().is_empty() {
                return Err(Error::MissingField {
                    field: "id",
                    position: pos,
                });
            }
            if n.label.trim().is_empty() {
                return Err(Error::MissingField {
                    field: "label",
                    position: pos,
                });
            }
            if index.insert(n.id.clone(), pos).is_some() {
                return Err(Error::DuplicateId { id: n.id.clone() });
            }
        }

        let mut parents = Vec::with_capacity(nodes.len());
        let mut children = vec![Vec::new(); nodes.len()];
        for (i, n) in nodes.iter().enumerate() {
            let parent = match n.parent.as_deref() {
                None => None,
                Some(p) => Some(*index.get(p).ok_or_else(|| Error::DanglingParent {
                    id: n.id.clone(),
                    parent: p.to_string(),
                })?),
            };
            if let Some(p) = parent {
                children[p].push(i);
            }
            parents.push(parent);
        }

        for start in 0..nodes.len() {
            // A parent chain longer than the node count must revisit a node.
            let mut cur = parents[start];
            let mut steps = 0usize;
            while let Some(p) = cur {
                steps += 1;
                if p == start || steps > nodes.len() {
                    return Err(Error::ParentCycle {
                        id: nodes[start].id.clone(),
                    });
                }
                cur = parents[p];
            }
        }

        let mut link_endpoints = Vec::with_capacity(links.len());
        for (i, l) in links.iter().enumerate() {
            if !l.value.is_finite() || l.value < 0.0 {
                return Err(Error::InvalidValue {
                    index: i,
                    value: l.value,
                });
            }
            let resolve = |id: &str| {
                index.get(id).copied().ok_or_else(|| Error::DanglingLink {
                    index: i,
                    node_id: id.to_string(),
                })
            };
            link_endpoints.push((resolve(&l.source)?, resolve(&l.target)?));
        }

        let graph = Self {
            nodes,
            index,
            parents,
            children,
            links,
            link_endpoints,
        };

        let mismatches = integrity::check_link_sums(&graph);
        if let Some(first) = mismatches.first() {
            if opts.strict_link_sums {
                return Err(Error::LinkSumMismatch {
                    source_id: first.source.clone(),
                    target_id: first.target.clone(),
                    aggregate: first.aggregate,
                    detail: first.detail_sum,
                });
            }
            for m in &mismatches {
                tracing::warn!(
                    source = %m.source,
                    target = %m.target,
                    aggregate = m.aggregate,
                    detail = m.detail_sum,
                    "aggregate link does not match its detail links"
                );
            }
        }

        tracing::debug!(
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            "flow graph loaded"
        );
        Ok(graph)
    }

    pub fn from_json(text: &str, opts: &LoadOptions) -> Result<Self> {
        let data: FlowData = serde_json::from_str(text)?;
        Self::load(data, opts)
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[FlowLink] {
        &self.links
    }

    pub fn node(&self, idx: FlowIdx) -> &FlowNode {
        &self.nodes[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<FlowIdx> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&FlowNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn parent(&self, idx: FlowIdx) -> Option<FlowIdx> {
        self.parents[idx]
    }

    pub fn children(&self, idx: FlowIdx) -> &[FlowIdx] {
        &self.children[idx]
    }

    pub fn link_endpoints(&self, link: usize) -> (FlowIdx, FlowIdx) {
        self.link_endpoints[link]
    }

    pub fn ancestors(&self, idx: FlowIdx) -> impl Iterator<Item = FlowIdx> + '_ {
        std::iter::successors(self.parents[idx], move |&p| self.parents[p])
    }

    /// All descendants of `idx` (excluding `idx`), depth-first.
    pub fn descendants(&self, idx: FlowIdx) -> Vec<FlowIdx> {
        let mut out = Vec::new();
        let mut stack: Vec<FlowIdx> = self.children[idx].iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            out.push(i);
            stack.extend(self.children[i].iter().rev().copied());
        }
        out
    }

    /// Breadcrumb ids from the top-level ancestor down to `id` (inclusive).
    pub fn path_to(&self, id: &str) -> Option<Vec<String>> {
        let idx = self.index_of(id)?;
        let mut path: Vec<String> = self
            .ancestors(idx)
            .map(|i| self.nodes[i].id.clone())
            .collect();
        path.reverse();
        path.push(self.nodes[idx].id.clone());
        Some(path)
    }
}

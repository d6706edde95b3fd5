//! Arena-backed hierarchy.
//!
//! Input nodes may be nested (`children` arrays), flat (`parent` id references), or a mix of
//! both. Loading flattens everything into one node vector with an id index and a children
//! adjacency list, then validates the structure once: required fields, unique ids, resolvable
//! parents, exactly one root and no cycles. After loading the hierarchy is immutable.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type NodeIdx = usize;

/// One node of input data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "title", alias = "name")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn leaf(id: impl Into<String>, label: impl Into<String>, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::new(id, label)
        }
    }

    pub fn with_children(mut self, children: Vec<HierarchyNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    pub value: Option<f64>,
    pub color: Option<String>,
    pub parent: Option<NodeIdx>,
    pub children: Vec<NodeIdx>,
    pub depth: usize,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<TreeNode>,
    index: FxHashMap<String, NodeIdx>,
    root: NodeIdx,
}

struct Pending {
    id: String,
    label: String,
    value: Option<f64>,
    color: Option<String>,
    declared_parent: Option<String>,
    nested_parent: Option<usize>,
}

fn flatten(node: HierarchyNode, nested_parent: Option<usize>, out: &mut Vec<Pending>) {
    let idx = out.len();
    out.push(Pending {
        id: node.id.trim().to_string(),
        label: node.label,
        value: node.value,
        color: node.color,
        declared_parent: node.parent.map(|p| p.trim().to_string()),
        nested_parent,
    });
    for child in node.children {
        flatten(child, Some(idx), out);
    }
}

impl Hierarchy {
    pub fn from_root(root: HierarchyNode) -> Result<Self> {
        Self::from_nodes(vec![root])
    }

    pub fn from_nodes(nodes: Vec<HierarchyNode>) -> Result<Self> {
        let mut pending = Vec::new();
        for n in nodes {
            flatten(n, None, &mut pending);
        }

        let mut index: FxHashMap<String, NodeIdx> = FxHashMap::default();
        for (pos, p) in pending.iter().enumerate() {
            if p.id.is_empty() {
                return Err(Error::MissingField {
                    field: "id",
                    position: pos,
                });
            }
            if p.label.trim().is_empty() {
                return Err(Error::MissingField {
                    field: "label",
                    position: pos,
                });
            }
            if let Some(v) = p.value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::InvalidValue {
                        id: p.id.clone(),
                        value: v,
                    });
                }
            }
            if index.insert(p.id.clone(), pos).is_some() {
                return Err(Error::DuplicateId { id: p.id.clone() });
            }
        }

        let mut parents: Vec<Option<NodeIdx>> = Vec::with_capacity(pending.len());
        for p in &pending {
            let parent = match (p.nested_parent, p.declared_parent.as_deref()) {
                (Some(nested), Some(declared)) if pending[nested].id != declared => {
                    return Err(Error::ParentMismatch {
                        id: p.id.clone(),
                        nested_in: pending[nested].id.clone(),
                        declared: declared.to_string(),
                    });
                }
                (Some(nested), _) => Some(nested),
                (None, Some(declared)) => match index.get(declared) {
                    Some(&idx) => Some(idx),
                    None => {
                        return Err(Error::DanglingParent {
                            id: p.id.clone(),
                            parent: declared.to_string(),
                        });
                    }
                },
                (None, None) => None,
            };
            parents.push(parent);
        }

        let roots: Vec<NodeIdx> = (0..pending.len())
            .filter(|&i| parents[i].is_none())
            .collect();
        let root = match roots.as_slice() {
            [] => return Err(Error::NoRoot),
            [only] => *only,
            many => {
                return Err(Error::MultipleRoots {
                    roots: many.iter().map(|&i| pending[i].id.clone()).collect(),
                });
            }
        };

        let mut nodes: Vec<TreeNode> = pending
            .into_iter()
            .zip(parents.iter())
            .map(|(p, &parent)| TreeNode {
                id: p.id,
                label: p.label,
                value: p.value,
                color: p.color,
                parent,
                children: Vec::new(),
                depth: 0,
            })
            .collect();
        for (i, parent) in parents.iter().enumerate() {
            if let Some(parent) = *parent {
                nodes[parent].children.push(i);
            }
        }

        // Every node must be reachable from the root; anything left over sits on a cycle.
        let mut visited = vec![false; nodes.len()];
        let mut stack = vec![root];
        visited[root] = true;
        while let Some(i) = stack.pop() {
            let depth = nodes[i].depth;
            for c in nodes[i].children.clone() {
                if !visited[c] {
                    visited[c] = true;
                    nodes[c].depth = depth + 1;
                    stack.push(c);
                }
            }
        }
        if let Some(i) = visited.iter().position(|v| !v) {
            return Err(Error::Cycle {
                id: nodes[i].id.clone(),
            });
        }

        tracing::debug!(nodes = nodes.len(), root = %nodes[root].id, "hierarchy loaded");
        Ok(Self { nodes, index, root })
    }

    /// Loads from JSON: an object is a root node, an array is a list of nodes.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_array() {
            let nodes: Vec<HierarchyNode> = serde_json::from_value(value)?;
            Self::from_nodes(nodes)
        } else {
            let root: HierarchyNode = serde_json::from_value(value)?;
            Self::from_root(root)
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeIdx {
        self.root
    }

    pub fn node(&self, idx: NodeIdx) -> &TreeNode {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIdx> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Node indices in depth-first pre-order, children in input order.
    pub fn pre_order(&self) -> Vec<NodeIdx> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(i) = stack.pop() {
            out.push(i);
            stack.extend(self.nodes[i].children.iter().rev().copied());
        }
        out
    }

    /// Leaves in traversal order.
    pub fn leaves(&self) -> Vec<NodeIdx> {
        self.pre_order()
            .into_iter()
            .filter(|&i| self.nodes[i].is_leaf())
            .collect()
    }

    /// Number of leaves under each node (a leaf counts itself).
    pub fn leaf_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.nodes.len()];
        for i in self.pre_order().into_iter().rev() {
            let n = &self.nodes[i];
            counts[i] = if n.is_leaf() {
                1
            } else {
                n.children.iter().map(|&c| counts[c]).sum()
            };
        }
        counts
    }

    /// Total value per node: its own value (default 0) plus the totals of its children.
    pub fn summed_values(&self) -> Vec<f64> {
        let mut sums = vec![0.0f64; self.nodes.len()];
        for i in self.pre_order().into_iter().rev() {
            let n = &self.nodes[i];
            let children: f64 = n.children.iter().map(|&c| sums[c]).sum();
            sums[i] = n.value.unwrap_or(0.0) + children;
        }
        sums
    }

    /// Ancestors of `idx`, nearest first (excluding `idx`).
    pub fn ancestors(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        std::iter::successors(self.nodes[idx].parent, move |&p| self.nodes[p].parent)
    }

    /// Breadcrumb ids from the root down to `id` (inclusive).
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HierarchyNode {
        HierarchyNode::new("root", "Root").with_children(vec![
            HierarchyNode::new("a", "A").with_children(vec![
                HierarchyNode::leaf("a1", "A1", 3.0),
                HierarchyNode::leaf("a2", "A2", 1.0),
            ]),
            HierarchyNode::leaf("b", "B", 4.0),
        ])
    }

    #[test]
    fn nested_input_builds_adjacency_and_depths() {
        let h = Hierarchy::from_root(sample()).unwrap();
        assert_eq!(h.len(), 5);
        let a = h.index_of("a").unwrap();
        let ids: Vec<&str> = h.node(a).children.iter().map(|&c| h.node(c).id.as_str()).collect();
        assert_eq!(ids, ["a1", "a2"]);
        assert_eq!(h.get("a2").unwrap().depth, 2);
        assert_eq!(h.max_depth(), 2);
    }

    #[test]
    fn flat_input_resolves_parent_references() {
        let h = Hierarchy::from_nodes(vec![
            HierarchyNode::new("root", "Root"),
            HierarchyNode::leaf("x", "X", 1.0).with_parent("root"),
            HierarchyNode::leaf("y", "Y", 1.0).with_parent("x"),
        ])
        .unwrap();
        assert_eq!(h.path_to("y").unwrap(), ["root", "x", "y"]);
    }

    #[test]
    fn leaf_counts_and_sums_roll_up() {
        let h = Hierarchy::from_root(sample()).unwrap();
        let counts = h.leaf_counts();
        let sums = h.summed_values();
        assert_eq!(counts[h.root()], 3);
        assert_eq!(counts[h.index_of("a").unwrap()], 2);
        assert_eq!(sums[h.root()], 8.0);
        assert_eq!(sums[h.index_of("a").unwrap()], 4.0);
    }

    #[test]
    fn pre_order_follows_input_order() {
        let h = Hierarchy::from_root(sample()).unwrap();
        let ids: Vec<&str> = h.pre_order().into_iter().map(|i| h.node(i).id.as_str()).collect();
        assert_eq!(ids, ["root", "a", "a1", "a2", "b"]);
    }
}

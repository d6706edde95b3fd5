//! Radial cluster (dendrogram) layout.
//!
//! Leaves get equal angular slots in traversal order; every internal node sits at the mean
//! angle of its descendant leaves. Radius grows linearly with depth from `inner_radius` (root)
//! to `outer_radius` (leaves, which are all pulled to the outer ring).

use crate::hierarchy::{Hierarchy, NodeIdx};
use crate::radial::{PositionedNode, RadialLayout};
use canopy_geom::{Config, point, polar_to_cartesian};

const FULL_CIRCLE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterOptions {
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Angular gap, in degrees, between sibling subtrees of the root. Deeper levels use
    /// `separation / (depth + 1)`.
    pub separation: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            inner_radius: 0.0,
            outer_radius: 300.0,
            separation: 0.0,
            start_angle: 0.0,
            end_angle: 360.0,
        }
    }
}

impl ClusterOptions {
    pub fn from_config(cfg: &Config) -> Self {
        let d = Self::default();
        Self {
            inner_radius: cfg.get_f64("cluster.innerRadius").unwrap_or(d.inner_radius),
            outer_radius: cfg.get_f64("cluster.outerRadius").unwrap_or(d.outer_radius),
            separation: cfg
                .get_f64("cluster.separation")
                .map(|s| s.max(0.0))
                .unwrap_or(d.separation),
            start_angle: cfg.get_f64("cluster.startAngle").unwrap_or(d.start_angle),
            end_angle: cfg.get_f64("cluster.endAngle").unwrap_or(d.end_angle),
        }
    }
}

/// Splits `[a0, a1)` among `children` proportionally to `weights`, leaving `gap`-sized holes
/// between consecutive siblings (and one wrap-around hole for a full circle).
///
/// Returns one `(start, end)` span per child, in order. When `a1 < a0` the children run
/// counter-clockwise from `a0` and every span keeps that orientation.
pub(crate) fn split_span(a0: f64, a1: f64, weights: &[f64], gap: f64) -> Vec<(f64, f64)> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }
    let dir = if a1 < a0 { -1.0 } else { 1.0 };
    let span = (a1 - a0).abs();
    let full_circle = span + FULL_CIRCLE_EPSILON >= 360.0;
    let gap_count = match n {
        1 => 0,
        _ if full_circle => n,
        _ => n - 1,
    };

    let mut gap = gap.max(0.0);
    if gap_count > 0 && gap * gap_count as f64 > span / 2.0 {
        gap = span / 2.0 / gap_count as f64;
    }
    let usable = span - gap * gap_count as f64;

    let total_weight: f64 = weights.iter().sum();
    let mut cursor = if full_circle && gap_count > 0 {
        a0 + dir * gap / 2.0
    } else {
        a0
    };
    let mut out = Vec::with_capacity(n);
    for &w in weights {
        let share = if total_weight > 0.0 {
            usable * w / total_weight
        } else {
            usable / n as f64
        };
        out.push((cursor, cursor + dir * share));
        cursor += dir * (share + gap);
    }
    out
}

pub fn cluster(h: &Hierarchy, opts: &ClusterOptions) -> RadialLayout {
    let n = h.len();
    let leaf_counts = h.leaf_counts();
    let max_depth = h.max_depth();
    let order = h.pre_order();

    let mut spans = vec![(0.0f64, 0.0f64); n];
    spans[h.root()] = (opts.start_angle, opts.end_angle);
    // Parents precede children in pre-order, so every parent span is known when reached.
    for &i in &order {
        let node = h.node(i);
        if node.is_leaf() {
            continue;
        }
        let (a0, a1) = spans[i];
        let weights: Vec<f64> = node
            .children
            .iter()
            .map(|&c| leaf_counts[c] as f64)
            .collect();
        let gap = opts.separation / (node.depth as f64 + 1.0);
        for (&c, span) in node.children.iter().zip(split_span(a0, a1, &weights, gap)) {
            spans[c] = span;
        }
    }

    let mut angle_sum = vec![0.0f64; n];
    for &i in order.iter().rev() {
        let node = h.node(i);
        angle_sum[i] = if node.is_leaf() {
            (spans[i].0 + spans[i].1) / 2.0
        } else {
            node.children.iter().map(|&c| angle_sum[c]).sum()
        };
    }

    let radius_of = |i: NodeIdx| -> f64 {
        let node = h.node(i);
        if node.is_leaf() && max_depth > 0 {
            return opts.outer_radius;
        }
        if max_depth == 0 {
            return opts.inner_radius;
        }
        opts.inner_radius
            + (opts.outer_radius - opts.inner_radius) * node.depth as f64 / max_depth as f64
    };

    let center = point(0.0, 0.0);
    let nodes = order
        .iter()
        .map(|&i| {
            let node = h.node(i);
            let angle = angle_sum[i] / leaf_counts[i] as f64;
            let radius = radius_of(i);
            let p = polar_to_cartesian(center, radius, angle);
            tracing::trace!(id = %node.id, angle, radius, "cluster node");
            PositionedNode {
                node_id: node.id.clone(),
                parent_id: node.parent.map(|p| h.node(p).id.clone()),
                depth: node.depth,
                x: p.x,
                y: p.y,
                angle: Some(angle),
                angle_start: Some(spans[i].0),
                angle_end: Some(spans[i].1),
                radius: Some(radius),
                inner_radius: None,
                value: None,
            }
        })
        .collect();

    tracing::debug!(nodes = n, leaves = leaf_counts[h.root()], max_depth, "cluster layout");
    RadialLayout::new(nodes, center)
}

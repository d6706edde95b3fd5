//! Sunburst (radial partition) layout.
//!
//! Each depth gets a ring of equal thickness; a node's angular span is proportional to its
//! summed value within its parent. The root fills the center disc.

use crate::cluster::split_span;
use crate::hierarchy::Hierarchy;
use crate::radial::{PositionedNode, RadialLayout};
use canopy_geom::{Config, point, polar_to_cartesian};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionOptions {
    /// Outer radius of the deepest ring.
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Angle, in degrees, trimmed from each arc (half on each side).
    pub pad_angle: f64,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            radius: 300.0,
            start_angle: 0.0,
            end_angle: 360.0,
            pad_angle: 0.0,
        }
    }
}

impl PartitionOptions {
    pub fn from_config(cfg: &Config) -> Self {
        let d = Self::default();
        Self {
            radius: cfg.get_f64("partition.radius").unwrap_or(d.radius),
            start_angle: cfg.get_f64("partition.startAngle").unwrap_or(d.start_angle),
            end_angle: cfg.get_f64("partition.endAngle").unwrap_or(d.end_angle),
            pad_angle: cfg
                .get_f64("partition.padAngle")
                .map(|p| p.max(0.0))
                .unwrap_or(d.pad_angle),
        }
    }
}

pub fn partition(h: &Hierarchy, opts: &PartitionOptions) -> RadialLayout {
    let n = h.len();
    let sums = h.summed_values();
    let leaf_counts = h.leaf_counts();
    let order = h.pre_order();
    let ring = opts.radius / (h.max_depth() as f64 + 1.0);

    let mut spans = vec![(0.0f64, 0.0f64); n];
    spans[h.root()] = (opts.start_angle, opts.end_angle);
    for &i in &order {
        let node = h.node(i);
        if node.is_leaf() {
            continue;
        }
        let by_value = sums[i] > 0.0;
        let weights: Vec<f64> = node
            .children
            .iter()
            .map(|&c| {
                if by_value {
                    sums[c]
                } else {
                    leaf_counts[c] as f64
                }
            })
            .collect();
        let (a0, a1) = spans[i];
        for (&c, span) in node.children.iter().zip(split_span(a0, a1, &weights, 0.0)) {
            spans[c] = span;
        }
    }

    let center = point(0.0, 0.0);
    let nodes = order
        .iter()
        .map(|&i| {
            let node = h.node(i);
            let (mut a0, mut a1) = spans[i];
            if node.depth > 0 && opts.pad_angle > 0.0 {
                let pad = (opts.pad_angle / 2.0).min((a1 - a0) / 2.0);
                a0 += pad;
                a1 -= pad;
            }
            let inner = ring * node.depth as f64;
            let outer = inner + ring;
            let angle = (a0 + a1) / 2.0;
            let centroid = if node.depth == 0 {
                center
            } else {
                polar_to_cartesian(center, (inner + outer) / 2.0, angle)
            };
            PositionedNode {
                node_id: node.id.clone(),
                parent_id: node.parent.map(|p| h.node(p).id.clone()),
                depth: node.depth,
                x: centroid.x,
                y: centroid.y,
                angle: Some(angle),
                angle_start: Some(a0),
                angle_end: Some(a1),
                radius: Some(outer),
                inner_radius: Some(inner),
                value: Some(sums[i]),
            }
        })
        .collect();

    tracing::debug!(nodes = n, total = sums[h.root()], ring, "partition layout");
    RadialLayout::new(nodes, center)
}

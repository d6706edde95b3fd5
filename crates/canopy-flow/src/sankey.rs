//! Column (sankey) layout of the visible part of a flow graph.
//!
//! Follows d3-sankey: columns from longest-path depth, value scaling shared by every column,
//! then a few rounds of relaxation that pull nodes toward their weighted neighbours while
//! keeping each column free of overlaps.

use crate::error::{Error, Result};
use crate::model::{FlowGraph, LinkKind};
use crate::visibility::Visibility;
use canopy_geom::{Bounds, Config, Path, sankey_link_path};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeAlign {
    Left,
    Right,
    #[default]
    Justify,
    Center,
}

impl NodeAlign {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("left") => Self::Left,
            Some(s) if s.eq_ignore_ascii_case("right") => Self::Right,
            Some(s) if s.eq_ignore_ascii_case("center") => Self::Center,
            _ => Self::Justify,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SankeyOptions {
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    pub node_padding: f64,
    pub iterations: usize,
    pub align: NodeAlign,
}

impl Default for SankeyOptions {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            node_width: 10.0,
            node_padding: 10.0,
            iterations: 6,
            align: NodeAlign::Justify,
        }
    }
}

impl SankeyOptions {
    pub fn from_config(cfg: &Config) -> Self {
        let d = Self::default();
        Self {
            width: cfg.get_f64("sankey.width").unwrap_or(d.width).max(0.0),
            height: cfg.get_f64("sankey.height").unwrap_or(d.height).max(0.0),
            node_width: cfg
                .get_f64("sankey.nodeWidth")
                .unwrap_or(d.node_width)
                .max(0.0),
            node_padding: cfg
                .get_f64("sankey.nodePadding")
                .unwrap_or(d.node_padding)
                .max(0.0),
            iterations: cfg.get_usize("sankey.iterations").unwrap_or(d.iterations),
            align: NodeAlign::parse(cfg.get_str("sankey.nodeAlignment")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyNode {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub depth: usize,
    pub height: usize,
    pub layer: usize,
    pub value: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLink {
    /// Index into [`FlowGraph::links`].
    pub index: usize,
    pub kind: LinkKind,
    pub source: String,
    pub target: String,
    pub value: f64,
    pub width: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLayout {
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    pub node_padding: f64,
    pub bounds: Bounds,
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

impl SankeyLayout {
    pub fn node(&self, id: &str) -> Option<&SankeyNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Centerline of `link`, from the right edge of its source to the left edge of its target.
    pub fn link_path(&self, link: &SankeyLink) -> Option<Path> {
        let s = self.node(&link.source)?;
        let t = self.node(&link.target)?;
        Some(sankey_link_path(s.x1, link.y0, t.x0, link.y1))
    }

    pub fn link_paths(&self) -> Vec<(usize, Path)> {
        self.links
            .iter()
            .filter_map(|l| self.link_path(l).map(|p| (l.index, p)))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    source_links: Vec<usize>,
    target_links: Vec<usize>,
    value: f64,
    depth: usize,
    height: usize,
    layer: usize,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

#[derive(Debug, Clone)]
struct Link {
    order: usize,
    source: usize,
    target: usize,
    value: f64,
    width: f64,
    y0: f64,
    y1: f64,
}

fn f64_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Lays out the nodes and links of `visible` in columns.
pub fn layout_sankey(
    graph: &FlowGraph,
    visible: &Visibility,
    opts: &SankeyOptions,
) -> Result<SankeyLayout> {
    tracing::debug!(
        nodes = visible.nodes.len(),
        links = visible.links.len(),
        "sankey layout start"
    );

    let mut slot: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, id) in visible.nodes.iter().enumerate() {
        slot.insert(id.as_str(), i);
    }

    let mut nodes = vec![Node::default(); visible.nodes.len()];
    let mut links = Vec::with_capacity(visible.links.len());
    for (order, l) in visible.links.iter().enumerate() {
        let (Some(&source), Some(&target)) =
            (slot.get(l.source.as_str()), slot.get(l.target.as_str()))
        else {
            tracing::trace!(source = %l.source, target = %l.target, "skipping link to hidden node");
            continue;
        };
        let li = links.len();
        links.push(Link {
            order,
            source,
            target,
            value: l.value,
            width: 0.0,
            y0: 0.0,
            y1: 0.0,
        });
        nodes[source].source_links.push(li);
        nodes[target].target_links.push(li);
    }

    for n in &mut nodes {
        let out_sum: f64 = n.source_links.iter().map(|&li| links[li].value).sum();
        let in_sum: f64 = n.target_links.iter().map(|&li| links[li].value).sum();
        n.value = out_sum.max(in_sum);
    }

    let mut layout = Columns {
        nodes,
        links,
        py: 0.0,
    };
    layout.compute_depths()?;
    layout.compute_heights()?;
    let mut columns = layout.assign_columns(opts);
    layout.initialize_breadths(&columns, opts);

    for i in 0..opts.iterations {
        let alpha = 0.99_f64.powi(i as i32);
        let beta = (1.0 - alpha).max((i as f64 + 1.0) / opts.iterations as f64);
        layout.relax_right_to_left(&mut columns, alpha, beta, opts.height);
        layout.relax_left_to_right(&mut columns, alpha, beta, opts.height);
    }
    layout.compute_link_breadths();

    let Columns { nodes, links, py } = layout;
    let out_nodes = nodes
        .iter()
        .zip(&visible.nodes)
        .map(|(n, id)| {
            let data = graph.get(id);
            SankeyNode {
                id: id.clone(),
                label: data.map(|d| d.label.clone()).unwrap_or_else(|| id.clone()),
                color: data.and_then(|d| d.color.clone()),
                depth: n.depth,
                height: n.height,
                layer: n.layer,
                value: n.value,
                x0: n.x0,
                x1: n.x1,
                y0: n.y0,
                y1: n.y1,
            }
        })
        .collect();
    let out_links = links
        .iter()
        .map(|l| {
            let src = &visible.links[l.order];
            SankeyLink {
                index: visible
                    .link_indices
                    .get(l.order)
                    .copied()
                    .unwrap_or(l.order),
                kind: src.kind,
                source: src.source.clone(),
                target: src.target.clone(),
                value: l.value,
                width: l.width,
                y0: l.y0,
                y1: l.y1,
            }
        })
        .collect();

    tracing::debug!(node_padding = py, "sankey layout done");
    Ok(SankeyLayout {
        width: opts.width,
        height: opts.height,
        node_width: opts.node_width,
        node_padding: py,
        bounds: Bounds::new(0.0, 0.0, opts.width, opts.height),
        nodes: out_nodes,
        links: out_links,
    })
}

struct Columns {
    nodes: Vec<Node>,
    links: Vec<Link>,
    /// Effective vertical padding between nodes of one column.
    py: f64,
}

impl Columns {
    /// Longest distance from a source; more rounds than nodes means a cycle.
    fn compute_depths(&mut self) -> Result<()> {
        let n = self.nodes.len();
        let mut current: Vec<usize> = (0..n).collect();
        let mut seen = vec![false; n];
        let mut x = 0usize;
        while !current.is_empty() {
            let mut next = Vec::new();
            for &ni in &current {
                self.nodes[ni].depth = x;
                for &li in &self.nodes[ni].source_links {
                    let t = self.links[li].target;
                    if !seen[t] {
                        seen[t] = true;
                        next.push(t);
                    }
                }
            }
            x += 1;
            if x > n {
                return Err(Error::CircularLink);
            }
            current = next;
            seen.fill(false);
        }
        Ok(())
    }

    fn compute_heights(&mut self) -> Result<()> {
        let n = self.nodes.len();
        let mut current: Vec<usize> = (0..n).collect();
        let mut seen = vec![false; n];
        let mut x = 0usize;
        while !current.is_empty() {
            let mut next = Vec::new();
            for &ni in &current {
                self.nodes[ni].height = x;
                for &li in &self.nodes[ni].target_links {
                    let s = self.links[li].source;
                    if !seen[s] {
                        seen[s] = true;
                        next.push(s);
                    }
                }
            }
            x += 1;
            if x > n {
                return Err(Error::CircularLink);
            }
            current = next;
            seen.fill(false);
        }
        Ok(())
    }

    fn assign_columns(&mut self, opts: &SankeyOptions) -> Vec<Vec<usize>> {
        let count = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0) + 1;
        let kx = if count <= 1 {
            0.0
        } else {
            (opts.width - opts.node_width) / (count as f64 - 1.0)
        };

        let mut columns = vec![Vec::new(); count];
        for i in 0..self.nodes.len() {
            let n = &self.nodes[i];
            let last = count as i64 - 1;
            let raw = match opts.align {
                NodeAlign::Left => n.depth as i64,
                NodeAlign::Right => last - n.height as i64,
                NodeAlign::Justify if n.source_links.is_empty() => last,
                NodeAlign::Justify => n.depth as i64,
                NodeAlign::Center if !n.target_links.is_empty() => n.depth as i64,
                NodeAlign::Center if !n.source_links.is_empty() => {
                    n.source_links
                        .iter()
                        .map(|&li| self.nodes[self.links[li].target].depth)
                        .min()
                        .unwrap_or(0) as i64
                        - 1
                }
                NodeAlign::Center => 0,
            };
            let layer = raw.clamp(0, last) as usize;
            let n = &mut self.nodes[i];
            n.layer = layer;
            n.x0 = layer as f64 * kx;
            n.x1 = n.x0 + opts.node_width;
            columns[layer].push(i);
        }
        columns
    }

    fn initialize_breadths(&mut self, columns: &[Vec<usize>], opts: &SankeyOptions) {
        let height = opts.height;
        let max_len = columns.iter().map(Vec::len).max().unwrap_or(0);
        self.py = if max_len <= 1 {
            opts.node_padding
        } else {
            opts.node_padding.min(height / (max_len as f64 - 1.0))
        };
        let py = self.py;

        let mut ky = f64::INFINITY;
        for col in columns {
            let sum: f64 = col.iter().map(|&ni| self.nodes[ni].value).sum();
            if sum > 0.0 {
                ky = ky.min((height - (col.len() as f64 - 1.0) * py) / sum);
            }
        }
        if !ky.is_finite() || ky < 0.0 {
            ky = 0.0;
        }
        for l in &mut self.links {
            l.width = l.value * ky;
        }

        for col in columns {
            let mut y = 0.0;
            for &ni in col {
                let n = &mut self.nodes[ni];
                n.y0 = y;
                n.y1 = y + n.value * ky;
                y = n.y1 + py;
            }
            let offset = (height - y + py) / (col.len() as f64 + 1.0);
            for (i, &ni) in col.iter().enumerate() {
                let adj = offset * (i as f64 + 1.0);
                self.nodes[ni].y0 += adj;
                self.nodes[ni].y1 += adj;
            }
            self.reorder_column_links(col);
        }
    }

    fn sort_by_target_y0(&self, node_y0: &[f64], link_indices: &mut [usize]) {
        link_indices.sort_by(|&a, &b| {
            f64_cmp(node_y0[self.links[a].target], node_y0[self.links[b].target])
                .then_with(|| self.links[a].order.cmp(&self.links[b].order))
        });
    }

    fn sort_by_source_y0(&self, node_y0: &[f64], link_indices: &mut [usize]) {
        link_indices.sort_by(|&a, &b| {
            f64_cmp(node_y0[self.links[a].source], node_y0[self.links[b].source])
                .then_with(|| self.links[a].order.cmp(&self.links[b].order))
        });
    }

    fn node_y0s(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.y0).collect()
    }

    fn reorder_column_links(&mut self, column: &[usize]) {
        let y0s = self.node_y0s();
        for &ni in column {
            let mut out = std::mem::take(&mut self.nodes[ni].source_links);
            self.sort_by_target_y0(&y0s, &mut out);
            self.nodes[ni].source_links = out;
            let mut inc = std::mem::take(&mut self.nodes[ni].target_links);
            self.sort_by_source_y0(&y0s, &mut inc);
            self.nodes[ni].target_links = inc;
        }
    }

    /// Re-sorts the link lists of every neighbour of `ni` after it moved.
    fn reorder_node_links(&mut self, ni: usize) {
        let y0s = self.node_y0s();
        for li in self.nodes[ni].target_links.clone() {
            let s = self.links[li].source;
            let mut out = std::mem::take(&mut self.nodes[s].source_links);
            self.sort_by_target_y0(&y0s, &mut out);
            self.nodes[s].source_links = out;
        }
        for li in self.nodes[ni].source_links.clone() {
            let t = self.links[li].target;
            let mut inc = std::mem::take(&mut self.nodes[t].target_links);
            self.sort_by_source_y0(&y0s, &mut inc);
            self.nodes[t].target_links = inc;
        }
    }

    fn target_top(&self, source: usize, target: usize) -> f64 {
        let s = &self.nodes[source];
        let mut y = s.y0 - (s.source_links.len() as f64 - 1.0) * self.py / 2.0;
        for &li in &s.source_links {
            if self.links[li].target == target {
                break;
            }
            y += self.links[li].width + self.py;
        }
        for &li in &self.nodes[target].target_links {
            if self.links[li].source == source {
                break;
            }
            y -= self.links[li].width;
        }
        y
    }

    fn source_top(&self, source: usize, target: usize) -> f64 {
        let t = &self.nodes[target];
        let mut y = t.y0 - (t.target_links.len() as f64 - 1.0) * self.py / 2.0;
        for &li in &t.target_links {
            if self.links[li].source == source {
                break;
            }
            y += self.links[li].width + self.py;
        }
        for &li in &self.nodes[source].source_links {
            if self.links[li].target == target {
                break;
            }
            y -= self.links[li].width;
        }
        y
    }

    fn shift(&mut self, ni: usize, dy: f64) {
        self.nodes[ni].y0 += dy;
        self.nodes[ni].y1 += dy;
    }

    fn relax_left_to_right(
        &mut self,
        columns: &mut [Vec<usize>],
        alpha: f64,
        beta: f64,
        height: f64,
    ) {
        for column in columns.iter_mut().skip(1) {
            for &target in column.iter() {
                let mut y = 0.0;
                let mut w = 0.0;
                for &li in &self.nodes[target].target_links {
                    let source = self.links[li].source;
                    let v = self.links[li].value
                        * (self.nodes[target].layer as f64 - self.nodes[source].layer as f64);
                    y += self.target_top(source, target) * v;
                    w += v;
                }
                if w > 0.0 {
                    let dy = (y / w - self.nodes[target].y0) * alpha;
                    self.shift(target, dy);
                    self.reorder_node_links(target);
                }
            }
            self.sort_column(column);
            self.resolve_collisions(column, 0.0, height, beta);
        }
    }

    fn relax_right_to_left(
        &mut self,
        columns: &mut [Vec<usize>],
        alpha: f64,
        beta: f64,
        height: f64,
    ) {
        let count = columns.len();
        for column in columns.iter_mut().take(count.saturating_sub(1)).rev() {
            for &source in column.iter() {
                let mut y = 0.0;
                let mut w = 0.0;
                for &li in &self.nodes[source].source_links {
                    let target = self.links[li].target;
                    let v = self.links[li].value
                        * (self.nodes[target].layer as f64 - self.nodes[source].layer as f64);
                    y += self.source_top(source, target) * v;
                    w += v;
                }
                if w > 0.0 {
                    let dy = (y / w - self.nodes[source].y0) * alpha;
                    self.shift(source, dy);
                    self.reorder_node_links(source);
                }
            }
            self.sort_column(column);
            self.resolve_collisions(column, 0.0, height, beta);
        }
    }

    fn sort_column(&self, column: &mut [usize]) {
        column.sort_by(|&a, &b| {
            f64_cmp(self.nodes[a].y0, self.nodes[b].y0).then_with(|| a.cmp(&b))
        });
    }

    /// Pushes nodes apart from the middle of the column outwards, then back inside the extent.
    fn resolve_collisions(&mut self, column: &[usize], y0_extent: f64, y1_extent: f64, alpha: f64) {
        if column.is_empty() {
            return;
        }
        let mid = column.len() / 2;
        let subject = column[mid];
        let (above, below) = (&column[..mid], &column[mid + 1..]);
        self.push_up(above, self.nodes[subject].y0 - self.py, alpha);
        self.push_down(below, self.nodes[subject].y1 + self.py, alpha);
        self.push_up(column, y1_extent, alpha);
        self.push_down(column, y0_extent, alpha);
    }

    fn push_down(&mut self, nodes: &[usize], mut y: f64, alpha: f64) {
        for &ni in nodes {
            let dy = (y - self.nodes[ni].y0) * alpha;
            if dy > 1e-6 {
                self.shift(ni, dy);
            }
            y = self.nodes[ni].y1 + self.py;
        }
    }

    fn push_up(&mut self, nodes: &[usize], mut y: f64, alpha: f64) {
        for &ni in nodes.iter().rev() {
            let dy = (self.nodes[ni].y1 - y) * alpha;
            if dy > 1e-6 {
                self.shift(ni, -dy);
            }
            y = self.nodes[ni].y0 - self.py;
        }
    }

    fn compute_link_breadths(&mut self) {
        for ni in 0..self.nodes.len() {
            let mut y0 = self.nodes[ni].y0;
            let mut y1 = self.nodes[ni].y0;
            for &li in &self.nodes[ni].source_links {
                let l = &mut self.links[li];
                l.y0 = y0 + l.width / 2.0;
                y0 += l.width;
            }
            for &li in &self.nodes[ni].target_links {
                let l = &mut self.links[li];
                l.y1 = y1 + l.width / 2.0;
                y1 += l.width;
            }
        }
    }
}

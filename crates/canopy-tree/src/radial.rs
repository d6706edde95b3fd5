use canopy_geom::{
    Bounds, Path, Point, annular_sector_path, bounding_box, point, polar_to_cartesian, size,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Layout output for one hierarchy node.
///
/// Angles are degrees clockwise from 12 o'clock; `x`/`y` are relative to the layout center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub node_id: String,
    pub parent_id: Option<String>,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub angle: Option<f64>,
    pub angle_start: Option<f64>,
    pub angle_end: Option<f64>,
    pub radius: Option<f64>,
    pub inner_radius: Option<f64>,
    pub value: Option<f64>,
}

impl PositionedNode {
    pub fn position(&self) -> Point {
        point(self.x, self.y)
    }

    pub fn angular_span(&self) -> Option<f64> {
        Some(self.angle_end? - self.angle_start?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialLayout {
    pub center: Point,
    /// Nodes in hierarchy pre-order.
    pub nodes: Vec<PositionedNode>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl RadialLayout {
    pub(crate) fn new(nodes: Vec<PositionedNode>, center: Point) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.node_id.clone(), i))
            .collect();
        Self {
            center,
            nodes,
            index,
        }
    }

    pub fn get(&self, id: &str) -> Option<&PositionedNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Bounding box over node positions, treating each node as a point.
    pub fn bounds(&self, padding: f64) -> Bounds {
        let pts: Vec<Point> = self.nodes.iter().map(|n| n.position()).collect();
        bounding_box(&pts, padding, size(0.0, 0.0))
    }

    /// Ring-slice outline for a node that carries both radii and an angular span.
    pub fn arc_path(&self, id: &str) -> Option<Path> {
        let n = self.get(id)?;
        Some(annular_sector_path(
            self.center,
            n.inner_radius?,
            n.radius?,
            n.angle_start?,
            n.angle_end?,
        ))
    }

    /// Curved parent-to-child links (d3 `linkRadial` shape), in pre-order of the child.
    pub fn link_paths(&self) -> Vec<(String, String, Path)> {
        self.nodes
            .iter()
            .filter_map(|child| {
                let parent = self.get(child.parent_id.as_deref()?)?;
                Some((
                    parent.node_id.clone(),
                    child.node_id.clone(),
                    self.radial_link(parent, child)?,
                ))
            })
            .collect()
    }

    fn radial_link(&self, parent: &PositionedNode, child: &PositionedNode) -> Option<Path> {
        let (pa, pr) = (parent.angle?, parent.radius?);
        let (ca, cr) = (child.angle?, child.radius?);
        let mid = (pr + cr) / 2.0;
        Some(Path::new().move_to(parent.position()).cubic_to(
            polar_to_cartesian(self.center, mid, pa),
            polar_to_cartesian(self.center, mid, ca),
            child.position(),
        ))
    }
}

use crate::geom::{Point, Size, point};
use serde::{Deserialize, Serialize};

/// Edge of a rectangular node that a connection attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Picks the side facing `angle_deg` (y-down, `atan2` convention, range `(-180, 180]`).
    ///
    /// Each side owns a 90° quadrant centered on its cardinal direction; lower bounds are
    /// inclusive and upper bounds exclusive, so exact 45° boundaries resolve consistently.
    pub fn facing(angle_deg: f64) -> Self {
        if (-45.0..45.0).contains(&angle_deg) {
            Side::Right
        } else if (45.0..135.0).contains(&angle_deg) {
            Side::Bottom
        } else if (-135.0..-45.0).contains(&angle_deg) {
            Side::Top
        } else {
            Side::Left
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Midpoint of this edge for a node whose top-left corner is `pos`.
    pub fn midpoint(self, pos: Point, dims: Size) -> Point {
        match self {
            Side::Top => point(pos.x + dims.width / 2.0, pos.y),
            Side::Right => point(pos.x + dims.width, pos.y + dims.height / 2.0),
            Side::Bottom => point(pos.x + dims.width / 2.0, pos.y + dims.height),
            Side::Left => point(pos.x, pos.y + dims.height / 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionAnchors {
    pub start: Point,
    pub end: Point,
    pub start_side: Side,
    pub end_side: Side,
}

pub fn center_of(pos: Point, dims: Size) -> Point {
    point(pos.x + dims.width / 2.0, pos.y + dims.height / 2.0)
}

/// Anchors for a connection between two equally-sized nodes given by their top-left corners.
///
/// The start anchor sits on the side of `from` that faces `to`; the end anchor on the opposite
/// side of `to`.
pub fn connection_anchors(from: Point, to: Point, dims: Size) -> ConnectionAnchors {
    connection_anchors_sized(from, dims, to, dims)
}

/// Like [`connection_anchors`], for nodes of different sizes.
pub fn connection_anchors_sized(
    from: Point,
    from_dims: Size,
    to: Point,
    to_dims: Size,
) -> ConnectionAnchors {
    let a = center_of(from, from_dims);
    let b = center_of(to, to_dims);
    let angle = (b.y - a.y).atan2(b.x - a.x).to_degrees();
    let start_side = Side::facing(angle);
    let end_side = start_side.opposite();
    ConnectionAnchors {
        start: start_side.midpoint(from, from_dims),
        end: end_side.midpoint(to, to_dims),
        start_side,
        end_side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::size;

    #[test]
    fn quadrant_boundaries_are_lower_inclusive() {
        assert_eq!(Side::facing(0.0), Side::Right);
        assert_eq!(Side::facing(-45.0), Side::Right);
        assert_eq!(Side::facing(45.0), Side::Bottom);
        assert_eq!(Side::facing(135.0), Side::Left);
        assert_eq!(Side::facing(180.0), Side::Left);
        assert_eq!(Side::facing(-135.0), Side::Top);
        assert_eq!(Side::facing(-135.1), Side::Left);
    }

    #[test]
    fn anchors_face_each_other_horizontally() {
        let dims = size(100.0, 50.0);
        let a = connection_anchors(point(0.0, 0.0), point(300.0, 20.0), dims);
        assert_eq!(a.start_side, Side::Right);
        assert_eq!(a.end_side, Side::Left);
        assert_eq!(a.start, point(100.0, 25.0));
        assert_eq!(a.end, point(300.0, 45.0));
    }

    #[test]
    fn anchors_face_each_other_vertically() {
        let dims = size(100.0, 50.0);
        let a = connection_anchors(point(0.0, 300.0), point(10.0, 0.0), dims);
        assert_eq!(a.start_side, Side::Top);
        assert_eq!(a.start, point(50.0, 300.0));
        assert_eq!(a.end, point(60.0, 50.0));
    }

    #[test]
    fn sized_anchors_use_each_node_size() {
        let a = connection_anchors_sized(
            point(0.0, 0.0),
            size(100.0, 100.0),
            point(200.0, 25.0),
            size(50.0, 50.0),
        );
        assert_eq!(a.start_side, Side::Right);
        assert_eq!(a.start, point(100.0, 50.0));
        assert_eq!(a.end, point(200.0, 50.0));
    }
}

//! Path strings for connection lines, arcs and flow bands.
//!
//! Paths are built as a list of [`PathCommand`]s and rendered through `Display` using the SVG
//! path mini-language (`M`, `L`, `C`, `A`, `Z`), with d3-style compact number formatting.

use crate::anchor::connection_anchors;
use crate::geom::{Point, Size, point, size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card footprint assumed when a caller does not supply one.
pub const DEFAULT_NODE_SIZE: (f64, f64) = (280.0, 120.0);

const BEZIER_MIN_OFFSET: f64 = 50.0;
const FULL_CIRCLE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    ArcTo {
        radius: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn cubic_to(mut self, ctrl1: Point, ctrl2: Point, to: Point) -> Self {
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
        self
    }

    pub fn arc_to(mut self, radius: f64, large_arc: bool, sweep: bool, to: Point) -> Self {
        self.commands.push(PathCommand::ArcTo {
            radius,
            large_arc,
            sweep,
            to,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn start_point(&self) -> Option<Point> {
        match self.commands.first()? {
            PathCommand::MoveTo(p) => Some(*p),
            _ => None,
        }
    }

    /// The pen position after the last drawing command.
    pub fn end_point(&self) -> Option<Point> {
        self.commands.iter().rev().find_map(|c| match c {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
            PathCommand::CubicTo { to, .. } | PathCommand::ArcTo { to, .. } => Some(*to),
            PathCommand::Close => None,
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cmd in &self.commands {
            match cmd {
                PathCommand::MoveTo(p) => write!(f, "M{},{}", fmt_num(p.x), fmt_num(p.y))?,
                PathCommand::LineTo(p) => write!(f, "L{},{}", fmt_num(p.x), fmt_num(p.y))?,
                PathCommand::CubicTo { ctrl1, ctrl2, to } => write!(
                    f,
                    "C{},{},{},{},{},{}",
                    fmt_num(ctrl1.x),
                    fmt_num(ctrl1.y),
                    fmt_num(ctrl2.x),
                    fmt_num(ctrl2.y),
                    fmt_num(to.x),
                    fmt_num(to.y)
                )?,
                PathCommand::ArcTo {
                    radius,
                    large_arc,
                    sweep,
                    to,
                } => write!(
                    f,
                    "A{r},{r},0,{},{},{},{}",
                    u8::from(*large_arc),
                    u8::from(*sweep),
                    fmt_num(to.x),
                    fmt_num(to.y),
                    r = fmt_num(*radius)
                )?,
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

/// Formats a coordinate with at most 3 fractional digits, no trailing zeros and no `-0`.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    if v.abs() < 0.0005 {
        return "0".to_string();
    }

    // Round half-up at 3 digits, like d3-path.
    let scaled = v * 1000.0;
    let mut r = (scaled + 0.5).floor() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }

    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStyle {
    Straight,
    #[default]
    Bezier,
    Orthogonal,
}

impl ConnectionStyle {
    /// Parses a style name; anything unrecognized (or absent) falls back to [`Self::Bezier`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("straight") => ConnectionStyle::Straight,
            Some("orthogonal") => ConnectionStyle::Orthogonal,
            _ => ConnectionStyle::Bezier,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStyle::Straight => "straight",
            ConnectionStyle::Bezier => "bezier",
            ConnectionStyle::Orthogonal => "orthogonal",
        }
    }
}

impl FromStr for ConnectionStyle {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(Some(s)))
    }
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

pub fn straight_path(start: Point, end: Point) -> Path {
    Path::new().move_to(start).line_to(end)
}

/// Cubic bezier bending along the dominant axis.
///
/// The control offset is `min(|dx|, |dy|) * 0.5 + 50`.
pub fn bezier_path(start: Point, end: Point) -> Path {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let offset = dx.abs().min(dy.abs()) * 0.5 + BEZIER_MIN_OFFSET;

    let (ctrl1, ctrl2) = if dx.abs() > dy.abs() {
        let o = offset * sign(dx);
        (point(start.x + o, start.y), point(end.x - o, end.y))
    } else {
        let o = offset * sign(dy);
        (point(start.x, start.y + o), point(end.x, end.y - o))
    };

    Path::new().move_to(start).cubic_to(ctrl1, ctrl2, end)
}

/// Three-segment polyline through the midpoint of the dominant axis.
pub fn orthogonal_path(start: Point, end: Point) -> Path {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let p = Path::new().move_to(start);
    let p = if dx.abs() > dy.abs() {
        let mid_x = (start.x + end.x) / 2.0;
        p.line_to(point(mid_x, start.y)).line_to(point(mid_x, end.y))
    } else {
        let mid_y = (start.y + end.y) / 2.0;
        p.line_to(point(start.x, mid_y)).line_to(point(end.x, mid_y))
    };
    p.line_to(end)
}

pub fn path_between(start: Point, end: Point, style: ConnectionStyle) -> Path {
    match style {
        ConnectionStyle::Straight => straight_path(start, end),
        ConnectionStyle::Bezier => bezier_path(start, end),
        ConnectionStyle::Orthogonal => orthogonal_path(start, end),
    }
}

/// Path string connecting two nodes given by their top-left corners.
pub fn connection_path(
    from: Point,
    to: Point,
    style: ConnectionStyle,
    dims: Option<Size>,
) -> String {
    let dims = dims.unwrap_or_else(|| size(DEFAULT_NODE_SIZE.0, DEFAULT_NODE_SIZE.1));
    let anchors = connection_anchors(from, to, dims);
    path_between(anchors.start, anchors.end, style).to_string()
}

/// Annular sector (ring slice) between two angles, in degrees clockwise from 12 o'clock.
///
/// `inner_radius == 0` produces a pie wedge. Spans of a full circle are drawn as two half
/// arcs, since a single SVG arc cannot start and end on the same point.
pub fn annular_sector_path(
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    start_deg: f64,
    end_deg: f64,
) -> Path {
    use crate::geom::polar_to_cartesian as polar;

    let span = (end_deg - start_deg).abs();
    let inner_radius = inner_radius.max(0.0);
    let outer_radius = outer_radius.max(inner_radius);

    if span + FULL_CIRCLE_EPSILON >= 360.0 {
        let top = polar(center, outer_radius, start_deg);
        let bottom = polar(center, outer_radius, start_deg + 180.0);
        let mut p = Path::new()
            .move_to(top)
            .arc_to(outer_radius, true, true, bottom)
            .arc_to(outer_radius, true, true, top);
        if inner_radius > 0.0 {
            let itop = polar(center, inner_radius, start_deg);
            let ibottom = polar(center, inner_radius, start_deg + 180.0);
            p = p
                .move_to(itop)
                .arc_to(inner_radius, true, false, ibottom)
                .arc_to(inner_radius, true, false, itop);
        }
        return p.close();
    }

    let (a0, a1) = if end_deg >= start_deg {
        (start_deg, end_deg)
    } else {
        (end_deg, start_deg)
    };
    let large = span > 180.0;

    let p = Path::new()
        .move_to(polar(center, outer_radius, a0))
        .arc_to(outer_radius, large, true, polar(center, outer_radius, a1));
    let p = if inner_radius > 0.0 {
        p.line_to(polar(center, inner_radius, a1)).arc_to(
            inner_radius,
            large,
            false,
            polar(center, inner_radius, a0),
        )
    } else {
        p.line_to(center)
    };
    p.close()
}

/// Horizontal flow-band centerline between a source's right edge and a target's left edge.
pub fn sankey_link_path(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
    let mid_x = (x0 + x1) / 2.0;
    Path::new().move_to(point(x0, y0)).cubic_to(
        point(mid_x, y0),
        point(mid_x, y1),
        point(x1, y1),
    )
}

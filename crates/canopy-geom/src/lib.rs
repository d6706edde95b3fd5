#![forbid(unsafe_code)]

//! Geometry primitives shared by the canopy layout crates.
//!
//! Everything here is pure computation: degenerate input (empty slices, zero-sized bounds)
//! yields degenerate but well-typed output instead of an error.

pub mod anchor;
pub mod bounds;
pub mod config;
pub mod drag;
pub mod geom;
pub mod path;
pub mod viewport;

pub use anchor::{
    ConnectionAnchors, Side, center_of, connection_anchors, connection_anchors_sized,
};
pub use bounds::{Bounds, bounding_box, bounding_box_of_rects};
pub use config::Config;
pub use drag::DragGesture;
pub use geom::{Point, Rect, Size, Vector, point, polar_to_cartesian, size, vector};
pub use path::{
    ConnectionStyle, Path, PathCommand, annular_sector_path, bezier_path, connection_path,
    orthogonal_path, path_between, sankey_link_path, straight_path,
};
pub use viewport::{Viewport, ZoomLimits, center_translation, fit_to_view, fit_zoom};

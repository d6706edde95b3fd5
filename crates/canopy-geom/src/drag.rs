//! Pure position updates for pointer drags.
//!
//! A UI-layer drag controller calls [`DragGesture::begin`] on pointer-down, then
//! [`DragGesture::update`] on every move and [`DragGesture::end`] on release. Pointer positions
//! are in screen space; node positions are in world space.

use crate::geom::{Point, Vector, point, vector};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pointer_origin: Point,
    node_origin: Point,
    zoom: f64,
    grid: Option<f64>,
}

impl DragGesture {
    pub fn begin(pointer: Point, node_position: Point, zoom: f64) -> Self {
        Self {
            pointer_origin: pointer,
            node_origin: node_position,
            zoom: if zoom > 0.0 && zoom.is_finite() { zoom } else { 1.0 },
            grid: None,
        }
    }

    /// Snaps every produced position to a grid of `spacing` world units.
    pub fn with_grid(mut self, spacing: f64) -> Self {
        self.grid = (spacing > 0.0 && spacing.is_finite()).then_some(spacing);
        self
    }

    /// World-space displacement since the gesture began.
    pub fn delta(&self, pointer: Point) -> Vector {
        vector(
            (pointer.x - self.pointer_origin.x) / self.zoom,
            (pointer.y - self.pointer_origin.y) / self.zoom,
        )
    }

    pub fn update(&self, pointer: Point) -> Point {
        let p = self.node_origin + self.delta(pointer);
        match self.grid {
            Some(spacing) => snap_to_grid(p, spacing),
            None => p,
        }
    }

    pub fn end(self, pointer: Point) -> Point {
        self.update(pointer)
    }
}

pub fn snap_to_grid(p: Point, spacing: f64) -> Point {
    point(
        (p.x / spacing).round() * spacing,
        (p.y / spacing).round() * spacing,
    )
}

/// Applies one world-space delta to every position in `positions`.
pub fn translate_all(positions: &mut [Point], delta: Vector) {
    for p in positions {
        *p += delta;
    }
}

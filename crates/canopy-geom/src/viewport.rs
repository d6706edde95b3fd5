//! Pan/zoom state of a rendering surface and the fit-to-view math that drives it.

use crate::bounds::Bounds;
use crate::config::Config;
use crate::geom::{Point, point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    /// Largest allowed zoom factor.
    pub max_zoom_in: f64,
    /// Smallest allowed zoom factor.
    pub max_zoom_out: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            max_zoom_in: 2.0,
            max_zoom_out: 0.1,
        }
    }
}

impl ZoomLimits {
    pub fn from_config(cfg: &Config) -> Self {
        let d = Self::default();
        Self {
            max_zoom_in: cfg.get_f64("viewport.maxZoomIn").unwrap_or(d.max_zoom_in),
            max_zoom_out: cfg.get_f64("viewport.maxZoomOut").unwrap_or(d.max_zoom_out),
        }
    }

    /// Clamps `zoom` into the limits. Swapped limits are tolerated; NaN maps to `max_zoom_in`.
    pub fn clamp(&self, zoom: f64) -> f64 {
        let (lo, hi) = if self.max_zoom_out <= self.max_zoom_in {
            (self.max_zoom_out, self.max_zoom_in)
        } else {
            (self.max_zoom_in, self.max_zoom_out)
        };
        if zoom.is_nan() {
            return hi;
        }
        zoom.max(lo).min(hi)
    }
}

/// Translation (`x`, `y`) and scale of the content layer: `screen = world * zoom + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self { x, y, zoom }
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        point(p.x * self.zoom + self.x, p.y * self.zoom + self.y)
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        if self.zoom == 0.0 {
            return point(p.x - self.x, p.y - self.y);
        }
        point((p.x - self.x) / self.zoom, (p.y - self.y) / self.zoom)
    }

    pub fn pan(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.zoom)
    }

    /// Changes the zoom while keeping the world point under `screen_anchor` fixed.
    pub fn zoom_at(self, screen_anchor: Point, zoom: f64, limits: &ZoomLimits) -> Self {
        let zoom = limits.clamp(zoom);
        let world = self.screen_to_world(screen_anchor);
        Self::new(
            screen_anchor.x - world.x * zoom,
            screen_anchor.y - world.y * zoom,
            zoom,
        )
    }
}

/// Largest zoom that fits `bounds` inside the viewport, clamped to `limits`.
///
/// Zero-sized bounds produce an infinite ratio, which clamps to `limits.max_zoom_in`.
pub fn fit_zoom(
    bounds: &Bounds,
    viewport_width: f64,
    viewport_height: f64,
    limits: &ZoomLimits,
) -> f64 {
    let scale_x = viewport_width / bounds.width;
    let scale_y = viewport_height / bounds.height;
    limits.clamp(scale_x.min(scale_y))
}

/// Translation that centers `bounds`, scaled by `zoom`, within the viewport.
pub fn center_translation(
    bounds: &Bounds,
    viewport_width: f64,
    viewport_height: f64,
    zoom: f64,
) -> Point {
    point(
        (viewport_width - bounds.width * zoom) / 2.0 - bounds.x * zoom,
        (viewport_height - bounds.height * zoom) / 2.0 - bounds.y * zoom,
    )
}

/// Viewport that fits and centers `bounds`.
pub fn fit_to_view(
    bounds: &Bounds,
    viewport_width: f64,
    viewport_height: f64,
    limits: &ZoomLimits,
) -> Viewport {
    let zoom = fit_zoom(bounds, viewport_width, viewport_height, limits);
    let t = center_translation(bounds, viewport_width, viewport_height, zoom);
    tracing::trace!(zoom, x = t.x, y = t.y, "fit_to_view");
    Viewport::new(t.x, t.y, zoom)
}

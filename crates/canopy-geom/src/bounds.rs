use crate::geom::{Point, Rect, Size, point, size};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in content (world) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.origin.x, rect.origin.y, rect.size.width, rect.size.height)
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(point(self.x, self.y), size(self.width, self.height))
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        point(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Returns `true` when `other` lies fully inside `self` (edges inclusive).
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    pub fn inflate(self, padding: f64) -> Self {
        Self::new(
            self.x - padding,
            self.y - padding,
            self.width + padding * 2.0,
            self.height + padding * 2.0,
        )
    }
}

/// Bounding box over elements that all share the same footprint.
///
/// `positions` are top-left corners; every element covers `position..position + dims`. The
/// result is expanded by `padding` on each side. An empty slice yields [`Bounds::ZERO`].
pub fn bounding_box(positions: &[Point], padding: f64, dims: Size) -> Bounds {
    bounding_box_of_rects(positions.iter().map(|p| Rect::new(*p, dims)), padding)
}

/// Bounding box over elements with individual sizes.
pub fn bounding_box_of_rects(rects: impl IntoIterator<Item = Rect>, padding: f64) -> Bounds {
    let mut it = rects.into_iter();
    let Some(first) = it.next() else {
        return Bounds::ZERO;
    };

    let mut min_x = first.origin.x;
    let mut min_y = first.origin.y;
    let mut max_x = first.origin.x + first.size.width;
    let mut max_y = first.origin.y + first.size.height;
    for r in it {
        min_x = min_x.min(r.origin.x);
        min_y = min_y.min(r.origin.y);
        max_x = max_x.max(r.origin.x + r.size.width);
        max_y = max_y.max(r.origin.y + r.size.height);
    }

    Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y).inflate(padding)
}

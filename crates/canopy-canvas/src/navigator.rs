//! Drill-in/drill-out navigation over a [`Canvas`].
//!
//! The navigator holds the ids of the entered cards, top level first. The cards on screen are
//! the children of the last entered card (or the top level when nothing is entered).

use crate::card::{Canvas, Card, Level};
use canopy_geom::path::DEFAULT_NODE_SIZE;
use canopy_geom::{
    Bounds, Config, ConnectionStyle, Size, Viewport, ZoomLimits, bounding_box_of_rects,
    connection_anchors_sized, fit_to_view, path_between,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasOptions {
    /// Size used for cards that do not carry their own.
    pub card_size: Size,
    /// Margin kept around the cards when fitting a level into the viewport.
    pub fit_padding: f64,
    pub connection_style: ConnectionStyle,
    pub zoom: ZoomLimits,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            card_size: Size::new(DEFAULT_NODE_SIZE.0, DEFAULT_NODE_SIZE.1),
            fit_padding: 50.0,
            connection_style: ConnectionStyle::Bezier,
            zoom: ZoomLimits::default(),
        }
    }
}

impl CanvasOptions {
    pub fn from_config(cfg: &Config) -> Self {
        let d = Self::default();
        Self {
            card_size: Size::new(
                cfg.get_f64("canvas.cardWidth")
                    .unwrap_or(d.card_size.width)
                    .max(0.0),
                cfg.get_f64("canvas.cardHeight")
                    .unwrap_or(d.card_size.height)
                    .max(0.0),
            ),
            fit_padding: cfg
                .get_f64("canvas.fitPadding")
                .unwrap_or(d.fit_padding)
                .max(0.0),
            connection_style: ConnectionStyle::parse(cfg.get_str("canvas.connectionStyle")),
            zoom: ZoomLimits::from_config(cfg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub id: String,
    pub title: String,
}

/// A connection of the current level, routed between its two cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedConnection {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub style: ConnectionStyle,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct Navigator<'a> {
    canvas: &'a Canvas,
    options: CanvasOptions,
    path: Vec<String>,
    focused: Option<String>,
}

impl<'a> Navigator<'a> {
    /// Starts at the level holding the canvas' default card, or at the top level.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self::with_options(canvas, CanvasOptions::default())
    }

    pub fn with_options(canvas: &'a Canvas, options: CanvasOptions) -> Self {
        let mut nav = Self {
            canvas,
            options,
            path: Vec::new(),
            focused: None,
        };
        if let Some(id) = canvas.default_card_id() {
            nav.jump_to(id);
        }
        nav
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    /// Ids of the entered cards, top level first.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Card highlighted by the last [`jump_to`](Self::jump_to), if still on screen.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn current_level(&self) -> Level<'a> {
        let canvas: &'a Canvas = self.canvas;
        canvas.level(&self.path).unwrap_or(Level {
            cards: &[],
            connections: &[],
        })
    }

    pub fn current_cards(&self) -> &'a [Card] {
        self.current_level().cards
    }

    /// Enters a card of the current level. Cards without children cannot be entered.
    pub fn enter(&mut self, card_id: &str) -> bool {
        let Some(card) = self.current_cards().iter().find(|c| c.id == card_id) else {
            return false;
        };
        if !card.has_children() {
            return false;
        }
        self.path.push(card.id.clone());
        self.focused = None;
        tracing::debug!(card = card_id, depth = self.path.len(), "enter card");
        true
    }

    /// Leaves the current card. Returns `false` at the top level.
    pub fn back(&mut self) -> bool {
        let Some(left) = self.path.pop() else {
            return false;
        };
        tracing::debug!(card = %left, depth = self.path.len(), "leave card");
        self.focused = Some(left);
        true
    }

    /// Truncates the path to its first `prefix_len` entries (a breadcrumb click).
    pub fn go_to_path(&mut self, prefix_len: usize) -> bool {
        if prefix_len > self.path.len() {
            return false;
        }
        if prefix_len < self.path.len() {
            self.focused = Some(self.path[prefix_len].clone());
            self.path.truncate(prefix_len);
        }
        true
    }

    /// Moves to the level that shows `card_id` and focuses it.
    pub fn jump_to(&mut self, card_id: &str) -> bool {
        let Some((card, mut crumbs)) = self.canvas.find(card_id) else {
            return false;
        };
        crumbs.pop();
        self.path = crumbs;
        self.focused = Some(card.id.clone());
        tracing::debug!(card = card_id, depth = self.path.len(), "jump to card");
        true
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut level: &[Card] = self.canvas.cards();
        let mut out = Vec::with_capacity(self.path.len());
        for id in &self.path {
            let Some(card) = level.iter().find(|c| &c.id == id) else {
                break;
            };
            out.push(Breadcrumb {
                id: card.id.clone(),
                title: card.title.clone(),
            });
            level = &card.children;
        }
        out
    }

    /// Padded bounding box of the cards on screen.
    pub fn current_bounds(&self) -> Bounds {
        bounding_box_of_rects(
            self.current_cards()
                .iter()
                .map(|c| c.rect(self.options.card_size)),
            self.options.fit_padding,
        )
    }

    /// Viewport that fits the cards on screen into a `width` x `height` surface.
    pub fn fit_current(&self, width: f64, height: f64) -> Viewport {
        fit_to_view(&self.current_bounds(), width, height, &self.options.zoom)
    }

    /// Routes every connection of the current level. A connection's own style wins over
    /// `style`.
    pub fn connection_paths(&self, style: ConnectionStyle) -> Vec<RoutedConnection> {
        let level = self.current_level();
        let size = self.options.card_size;
        level
            .connections
            .iter()
            .filter_map(|c| {
                let from = level.cards.iter().find(|k| k.id == c.from)?;
                let to = level.cards.iter().find(|k| k.id == c.to)?;
                let anchors = connection_anchors_sized(
                    from.position(),
                    from.size(size),
                    to.position(),
                    to.size(size),
                );
                let style = c.style_override().unwrap_or(style);
                Some(RoutedConnection {
                    from: c.from.clone(),
                    to: c.to.clone(),
                    label: c.label.clone(),
                    style,
                    path: path_between(anchors.start, anchors.end, style).to_string(),
                })
            })
            .collect()
    }
}

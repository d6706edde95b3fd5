//! Card tree of a nested knowledge map.
//!
//! Every card may contain child cards, shown as the next level when the card is entered.
//! Connections link cards that share a level.

use crate::error::{Error, Result};
use canopy_geom::{ConnectionStyle, Point, Rect, Size, point};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "label", alias = "name")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Card>,
    /// Connections between this card's children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<Connection>,
}

impl Card {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Card>) -> Self {
        self.children = children;
        self
    }

    pub fn with_connections(mut self, connections: Vec<Connection>) -> Self {
        self.connections = connections;
        self
    }

    pub fn position(&self) -> Point {
        point(self.x, self.y)
    }

    /// Own size, with missing dimensions taken from `default`.
    pub fn size(&self, default: Size) -> Size {
        Size::new(
            self.width.unwrap_or(default.width),
            self.height.unwrap_or(default.height),
        )
    }

    pub fn rect(&self, default: Size) -> Rect {
        Rect::new(self.position(), self.size(default))
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A labelled edge between two cards of the same level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Style name; unknown names route as bezier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: ConnectionStyle) -> Self {
        self.style = Some(style.as_str().to_string());
        self
    }

    /// The connection's own style, if it names one.
    pub fn style_override(&self) -> Option<ConnectionStyle> {
        self.style.as_deref().map(|s| ConnectionStyle::parse(Some(s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasData {
    #[serde(default)]
    pub cards: Vec<Card>,
    /// Connections between top-level cards.
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_card_id: Option<String>,
}

/// Cards and connections of one level of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level<'a> {
    pub cards: &'a [Card],
    pub connections: &'a [Connection],
}

/// A validated card tree: ids are unique, connections stay within one level and the entry
/// card (if any) exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    cards: Vec<Card>,
    connections: Vec<Connection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_card_id: Option<String>,
}

impl Canvas {
    pub fn new(data: CanvasData) -> Result<Self> {
        let mut seen = FxHashSet::default();
        validate_level(&data.cards, &data.connections, "root", "cards", &mut seen)?;

        if let Some(id) = data.default_card_id.as_deref() {
            if !seen.contains(id) {
                return Err(Error::DanglingDefaultCard { id: id.to_string() });
            }
        }

        tracing::debug!(
            cards = seen.len(),
            default_card = data.default_card_id.as_deref(),
            "canvas loaded"
        );
        Ok(Self {
            cards: data.cards,
            connections: data.connections,
            default_card_id: data.default_card_id,
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::new(serde_json::from_str(text)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Self::new(serde_json::from_value(value)?)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn default_card_id(&self) -> Option<&str> {
        self.default_card_id.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<(&Card, Vec<String>)> {
        find_card_by_id(&self.cards, id)
    }

    pub fn cards_at_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&[Card]> {
        cards_at_path(&self.cards, path)
    }

    /// The level reached by entering each id of `path` in turn.
    pub fn level<S: AsRef<str>>(&self, path: &[S]) -> Option<Level<'_>> {
        let Some((last, parents)) = path.split_last() else {
            return Some(Level {
                cards: &self.cards,
                connections: &self.connections,
            });
        };
        let last = last.as_ref();
        let card = cards_at_path(&self.cards, parents)?
            .iter()
            .find(|c| c.id == last)?;
        Some(Level {
            cards: &card.children,
            connections: &card.connections,
        })
    }
}

fn validate_level<'a>(
    cards: &'a [Card],
    connections: &[Connection],
    scope: &str,
    location: &str,
    seen: &mut FxHashSet<&'a str>,
) -> Result<()> {
    for (i, card) in cards.iter().enumerate() {
        let here = format!("{location}[{i}]");
        if card.id.trim().is_empty() {
            return Err(Error::MissingField {
                field: "id",
                location: here,
            });
        }
        if card.title.trim().is_empty() {
            return Err(Error::MissingField {
                field: "title",
                location: here,
            });
        }
        if !seen.insert(card.id.as_str()) {
            return Err(Error::DuplicateId {
                id: card.id.clone(),
            });
        }
        let bad = |v: Option<f64>| v.is_some_and(|v| !v.is_finite() || v < 0.0);
        if bad(card.width) || bad(card.height) {
            return Err(Error::InvalidSize {
                id: card.id.clone(),
                width: card.width.unwrap_or(0.0),
                height: card.height.unwrap_or(0.0),
            });
        }
    }

    for c in connections {
        for end in [&c.from, &c.to] {
            if !cards.iter().any(|card| &card.id == end) {
                return Err(Error::DanglingConnection {
                    scope: scope.to_string(),
                    from: c.from.clone(),
                    to: c.to.clone(),
                    missing: end.clone(),
                });
            }
        }
    }

    for (i, card) in cards.iter().enumerate() {
        validate_level(
            &card.children,
            &card.connections,
            &card.id,
            &format!("{location}[{i}].children"),
            seen,
        )?;
    }
    tracing::trace!(scope, cards = cards.len(), "validated level");
    Ok(())
}

/// Finds a card anywhere in the tree, with its breadcrumb ids (top level first, the card's own
/// id last).
pub fn find_card_by_id<'a>(cards: &'a [Card], id: &str) -> Option<(&'a Card, Vec<String>)> {
    for card in cards {
        if card.id == id {
            return Some((card, vec![card.id.clone()]));
        }
        if let Some((found, mut path)) = find_card_by_id(&card.children, id) {
            path.insert(0, card.id.clone());
            return Some((found, path));
        }
    }
    None
}

/// Cards shown at the level reached by entering each id of `path` in turn.
///
/// An empty path is the top level. Returns `None` as soon as an id is not found at its level.
pub fn cards_at_path<'a, S: AsRef<str>>(cards: &'a [Card], path: &[S]) -> Option<&'a [Card]> {
    let mut level = cards;
    for id in path {
        let id = id.as_ref();
        level = &level.iter().find(|c| c.id == id)?.children;
    }
    Some(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_override_parses_leniently() {
        assert_eq!(Connection::new("a", "b").style_override(), None);
        let c = Connection {
            style: Some("zigzag".into()),
            ..Connection::new("a", "b")
        };
        assert_eq!(c.style_override(), Some(ConnectionStyle::Bezier));
        let c = Connection::new("a", "b").with_style(ConnectionStyle::Orthogonal);
        assert_eq!(c.style_override(), Some(ConnectionStyle::Orthogonal));
    }

    #[test]
    fn card_size_falls_back_per_dimension() {
        let c = Card {
            width: Some(100.0),
            ..Card::new("a", "A")
        };
        let s = c.size(Size::new(280.0, 120.0));
        assert_eq!((s.width, s.height), (100.0, 120.0));
    }
}

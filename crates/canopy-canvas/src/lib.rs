#![forbid(unsafe_code)]

//! Nested, zoomable card maps.
//!
//! A [`Canvas`] is a validated tree of [`Card`]s. A [`Navigator`] walks into and out of cards
//! and produces what a renderer needs for the current level: the cards, a fitted
//! [`Viewport`](canopy_geom::Viewport) and routed connection paths.

pub mod card;
pub mod error;
pub mod navigator;
pub mod search;

pub use card::{Canvas, CanvasData, Card, Connection, Level, cards_at_path, find_card_by_id};
pub use error::{DataLoadErrorKind, Error, Result};
pub use navigator::{Breadcrumb, CanvasOptions, Navigator, RoutedConnection};
pub use search::{CardHit, search_cards};

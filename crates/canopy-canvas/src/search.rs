//! Fuzzy search over card titles and descriptions.

use crate::card::{Canvas, Card};
use canopy_tree::fuzzy_rank;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardHit {
    pub card_id: String,
    pub title: String,
    pub score: u32,
    /// Breadcrumb ids, top level first; the last one is the card itself.
    pub path: Vec<String>,
}

/// Ranks every card of `canvas` against `query`, best first; ties keep depth-first order.
pub fn search_cards(canvas: &Canvas, query: &str, limit: Option<usize>) -> Vec<CardHit> {
    let mut flat: Vec<(&Card, Vec<String>)> = Vec::new();
    collect(canvas.cards(), &mut Vec::new(), &mut flat);

    let ranked = fuzzy_rank(
        query,
        flat.iter().enumerate().map(|(i, (card, _))| {
            let mut haystacks = vec![card.title.as_str()];
            haystacks.extend(card.description.as_deref());
            (i, haystacks)
        }),
    );

    let hits: Vec<CardHit> = ranked
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(i, score)| {
            let (card, path) = &flat[i];
            CardHit {
                card_id: card.id.clone(),
                title: card.title.clone(),
                score,
                path: path.clone(),
            }
        })
        .collect();
    tracing::debug!(query, hits = hits.len(), "card search");
    hits
}

fn collect<'a>(
    cards: &'a [Card],
    prefix: &mut Vec<String>,
    out: &mut Vec<(&'a Card, Vec<String>)>,
) {
    for card in cards {
        prefix.push(card.id.clone());
        out.push((card, prefix.clone()));
        collect(&card.children, prefix, out);
        prefix.pop();
    }
}

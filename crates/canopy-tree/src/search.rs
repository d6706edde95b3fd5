//! Fuzzy label search.

use crate::hierarchy::Hierarchy;
use nucleo_matcher::{
    Config, Matcher, Utf32Str,
    pattern::{CaseMatching, Normalization, Pattern},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub node_id: String,
    pub label: String,
    pub score: u32,
    /// Breadcrumb ids from the root down to the hit (inclusive).
    pub path: Vec<String>,
}

/// Scores `items` against `query`, best first; ties keep input order.
///
/// Each item is a key plus one or more haystacks; the best-scoring haystack wins. An empty
/// (or whitespace-only) query matches nothing.
pub fn fuzzy_rank<'a, K, I>(query: &str, items: I) -> Vec<(K, u32)>
where
    I: IntoIterator<Item = (K, Vec<&'a str>)>,
{
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
    let mut buf = Vec::new();

    let mut matches: Vec<(K, u32)> = items
        .into_iter()
        .filter_map(|(key, haystacks)| {
            haystacks
                .into_iter()
                .filter_map(|text| pattern.score(Utf32Str::new(text, &mut buf), &mut matcher))
                .max()
                .map(|score| (key, score))
        })
        .collect();

    matches.sort_by(|a, b| b.1.cmp(&a.1));
    matches
}

/// Searches node labels (and ids) in traversal order.
pub fn search(h: &Hierarchy, query: &str, limit: Option<usize>) -> Vec<SearchHit> {
    let order = h.pre_order();
    let ranked = fuzzy_rank(
        query,
        order.into_iter().map(|i| {
            let n = h.node(i);
            (i, vec![n.label.as_str(), n.id.as_str()])
        }),
    );

    let hits: Vec<SearchHit> = ranked
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .filter_map(|(i, score)| {
            let n = h.node(i);
            Some(SearchHit {
                node_id: n.id.clone(),
                label: n.label.clone(),
                score,
                path: h.path_to(&n.id)?,
            })
        })
        .collect();
    tracing::debug!(query, hits = hits.len(), "hierarchy search");
    hits
}

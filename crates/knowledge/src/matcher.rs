//! Context matching: direct FAQ lookup plus per-category relevance ranking.
//!
//! `match_context` is a pure function of the knowledge base and the
//! normalized question. It never fails: an empty or absent store produces an
//! empty result.

use crate::classifier::normalize;
use crate::model::{Category, FaqEntry};
use crate::store::KnowledgeBase;

/// An entry with its relevance score within one category.
///
/// The score is the count of **distinct** category keywords found in the
/// entry's answer text.
#[derive(Debug, Clone)]
pub struct RankedEntry<'a> {
    pub entry: &'a FaqEntry,
    pub score: usize,
}

/// The outcome of matching one question against the knowledge base.
#[derive(Debug, Clone, Default)]
pub struct MatchResult<'a> {
    /// Entries whose stored phrasings overlap the question, in document
    /// encounter order, deduplicated by entry.
    pub direct: Vec<&'a FaqEntry>,

    /// Categories whose keywords appear in the question itself.
    pub relevant_categories: Vec<Category>,

    /// Per-category relevance lists (only non-empty ones), each sorted
    /// descending by score; ties keep encounter order.
    pub by_category: Vec<(Category, Vec<RankedEntry<'a>>)>,
}

impl MatchResult<'_> {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether any direct match exists.
    pub fn has_direct_matches(&self) -> bool {
        !self.direct.is_empty()
    }

    /// Whether the result carries no knowledge content at all.
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.by_category.is_empty()
    }
}

/// Match a normalized question against the knowledge base.
pub fn match_context<'a>(base: &'a KnowledgeBase, question: &str) -> MatchResult<'a> {
    if base.is_empty() || question.is_empty() {
        return MatchResult::empty();
    }

    let relevant_categories: Vec<Category> = Category::ALL
        .into_iter()
        .filter(|c| c.keywords().iter().any(|k| question.contains(k)))
        .collect();

    let mut by_category = Vec::new();
    for category in Category::ALL {
        let mut ranked: Vec<RankedEntry<'a>> = base
            .entries()
            .filter_map(|entry| {
                let answer = normalize(&entry.answer);
                let score = category
                    .keywords()
                    .iter()
                    .filter(|k| answer.contains(**k))
                    .count();
                (score > 0).then_some(RankedEntry { entry, score })
            })
            .collect();

        // Stable sort: equal scores keep document encounter order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        if !ranked.is_empty() {
            by_category.push((category, ranked));
        }
    }

    // Iterating entries in the outer loop dedupes by construction: an entry
    // matched via several phrasings still appears once, at its first
    // encounter position.
    let direct: Vec<&'a FaqEntry> = base
        .entries()
        .filter(|entry| {
            entry.phrasings().any(|p| {
                let phrasing = normalize(p);
                !phrasing.is_empty()
                    && (question.contains(&phrasing) || phrasing.contains(question))
            })
        })
        .collect();

    MatchResult {
        direct,
        relevant_categories,
        by_category,
    }
}

use crate::types::{Item, SeenStore};
use std::collections::HashSet;
use tracing::debug;

/// Source label prefixes that earn the trust bonus.
pub const DEFAULT_TRUSTED_PREFIXES: &[&str] = &[
    "Agencia Brasil",
    "Agência Brasil",
    "Gov.br",
    "Receita Federal",
    "Senado",
    "Câmara",
    "Ministério da Fazenda",
];

const KEYWORD_WEIGHT: u32 = 2;
const TRUSTED_SOURCE_BONUS: u32 = 1;
const TIMESTAMP_BONUS: u32 = 1;

/// Keyword relevance scorer.
///
/// `score = 2 * matched keywords + 1 if trusted source + 1 if timestamped`
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    keywords: Vec<String>,
    trusted_prefixes: Vec<String>,
}

impl RelevanceScorer {
    pub fn new(keywords: &[String], trusted_prefixes: Vec<String>) -> Self {
        // Blank keywords would match every item
        let keywords = keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .map(|k| k.to_lowercase())
            .collect();

        Self {
            keywords,
            trusted_prefixes,
        }
    }

    pub fn with_default_trust(keywords: &[String]) -> Self {
        Self::new(
            keywords,
            DEFAULT_TRUSTED_PREFIXES.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn is_trusted(&self, source: &str) -> bool {
        self.trusted_prefixes.iter().any(|p| source.starts_with(p.as_str()))
    }

    pub fn keyword_matches(&self, item: &Item) -> u32 {
        let haystack = format!("{} {}", item.title, item.url).to_lowercase();
        self.keywords
            .iter()
            .filter(|k| haystack.contains(k.as_str()))
            .count() as u32
    }

    pub fn score(&self, item: &Item) -> u32 {
        let mut score = KEYWORD_WEIGHT * self.keyword_matches(item);
        if self.is_trusted(&item.source) {
            score += TRUSTED_SOURCE_BONUS;
        }
        if item.has_timestamp() {
            score += TIMESTAMP_BONUS;
        }
        score
    }

    pub fn score_all(&self, items: &mut [Item]) {
        for item in items.iter_mut() {
            item.score = self.score(item);
        }
    }
}

/// Drop items already delivered in a previous run, plus repeats within this run.
/// Returns the surviving items and how many were dropped as already seen.
pub fn filter_unseen(items: Vec<Item>, seen: &SeenStore) -> (Vec<Item>, usize) {
    let mut already_seen = 0usize;
    let mut in_run = HashSet::new();
    let mut fresh = Vec::with_capacity(items.len());

    for item in items {
        if seen.contains(&item.identity) {
            debug!("Already seen: {} ({})", item.title, item.url);
            already_seen += 1;
            continue;
        }
        if !in_run.insert(item.identity.clone()) {
            debug!("Repeated in this run: {} ({})", item.title, item.url);
            continue;
        }
        fresh.push(item);
    }

    (fresh, already_seen)
}

/// Highest score first; equal scores keep their collection order.
pub fn rank_items(mut items: Vec<Item>, limit: usize) -> Vec<Item> {
    // sort_by is stable
    items.sort_by(|a, b| b.score.cmp(&a.score));
    items.truncate(limit);
    items
}

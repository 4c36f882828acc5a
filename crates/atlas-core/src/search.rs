// crates/atlas-core/src/search.rs

//! Ranked free-text search over the corpus.
//!
//! Each record gets the score of the first rule it satisfies:
//!
//! | rule             | score |
//! |------------------|-------|
//! | exact code       | 100   |
//! | exact name       | 90    |
//! | name starts with | 80    |
//! | name contains    | 60    |
//! | word prefix      | 40    |
//!
//! Hits are ordered by score (descending), then name (ordinal ascending).

use crate::model::{CountryRecord, Corpus};
use crate::text::{fold_case, fold_key};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const MIN_MAX_RESULTS: usize = 1;
pub const MAX_MAX_RESULTS: usize = 50;
/// Shortest term the word-prefix rule applies to.
pub const WORD_PREFIX_MIN_LEN: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactCode,
    ExactName,
    NameStartsWith,
    NameContains,
    WordPrefix,
}

impl MatchType {
    pub fn score(self) -> u32 {
        match self {
            MatchType::ExactCode => 100,
            MatchType::ExactName => 90,
            MatchType::NameStartsWith => 80,
            MatchType::NameContains => 60,
            MatchType::WordPrefix => 40,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub record: CountryRecord,
    pub score: u32,
    pub match_type: MatchType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub term: String,
    pub hits: Vec<SearchHit>,
    /// Matches before truncation.
    pub total_matches: usize,
    /// Set when the page is full, so more results may exist.
    pub has_more: bool,
    pub match_type_counts: BTreeMap<MatchType, usize>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.record.name.as_str()).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: usize,
    /// Compare on transliterated keys, so "aland" reaches "Åland Islands".
    pub fold_accents: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: crate::validate::DEFAULT_MAX_RESULTS,
            fold_accents: false,
        }
    }
}

/// Search `corpus` for `term`.
///
/// `max_results` is expected in `[1, 50]`; values outside are clamped.
///
/// ```rust
/// use atlas_core::{search, Corpus, CountryRecord};
///
/// let corpus = Corpus::new(vec![
///     CountryRecord::new("US", "United States"),
///     CountryRecord::new("GB", "United Kingdom"),
/// ]);
/// let result = search("United", &corpus, 10);
/// assert_eq!(result.names(), vec!["United Kingdom", "United States"]);
/// ```
pub fn search(term: &str, corpus: &Corpus, max_results: usize) -> SearchResult {
    search_with(
        term,
        corpus,
        &SearchOptions {
            max_results,
            ..SearchOptions::default()
        },
    )
}

pub fn search_with(term: &str, corpus: &Corpus, options: &SearchOptions) -> SearchResult {
    let term = term.trim();
    let max_results = options.max_results.clamp(MIN_MAX_RESULTS, MAX_MAX_RESULTS);
    let fold: fn(&str) -> String = if options.fold_accents {
        fold_key
    } else {
        fold_case
    };
    let needle = fold(term);

    let mut hits: Vec<SearchHit> = if needle.is_empty() {
        Vec::new()
    } else {
        corpus
            .iter()
            .filter_map(|record| {
                classify(&needle, record, fold).map(|match_type| SearchHit {
                    record: record.clone(),
                    score: match_type.score(),
                    match_type,
                })
            })
            .collect()
    };

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.record.name.cmp(&b.record.name))
    });
    let total_matches = hits.len();
    hits.truncate(max_results);

    let mut match_type_counts = BTreeMap::new();
    for hit in &hits {
        *match_type_counts.entry(hit.match_type).or_insert(0) += 1;
    }

    debug!(term, total_matches, returned = hits.len(), "country search");

    SearchResult {
        term: term.to_owned(),
        has_more: hits.len() == max_results,
        total_matches,
        hits,
        match_type_counts,
    }
}

/// First rule that matches wins.
fn classify(needle: &str, record: &CountryRecord, fold: fn(&str) -> String) -> Option<MatchType> {
    if fold(&record.code) == needle {
        return Some(MatchType::ExactCode);
    }
    let name = fold(&record.name);
    if name == needle {
        Some(MatchType::ExactName)
    } else if name.starts_with(needle) {
        Some(MatchType::NameStartsWith)
    } else if name.contains(needle) {
        Some(MatchType::NameContains)
    } else if matches_word_prefix(needle, &name) {
        Some(MatchType::WordPrefix)
    } else {
        None
    }
}

/// Some whitespace token of the name starts with the term. Both sides are
/// expected folded already.
fn matches_word_prefix(term: &str, name: &str) -> bool {
    term.chars().count() >= WORD_PREFIX_MIN_LEN
        && name.split_whitespace().any(|w| w.starts_with(term))
}

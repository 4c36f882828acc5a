// crates/atlas-core/src/resolver.rs

//! # Country Resolution
//!
//! Maps a caller-supplied code (or name) onto a [`CountryRecord`] using a
//! fixed fallback chain:
//!
//! 1. exact code (3-letter codes go through the [`AliasTable`] first)
//! 2. case variants of a 2-letter code (`us`, `US`, `Us`)
//! 3. case-insensitive scan of every code
//! 4. similarity-ranked suggestions
//!
//! A miss is a value ([`ResolutionResult::NotFound`]) carrying suggestions,
//! never an error. Code lookups never auto-accept a fuzzy match.

use crate::alias::AliasTable;
use crate::model::{CountryRecord, Corpus};
use crate::text::{calculate_string_similarity, fold_case, title_case};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

static DEFAULT_RESOLVER: Lazy<CountryResolver> = Lazy::new(CountryResolver::default);

/// How a [`ResolutionResult::Found`] was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    ExactCode,
    CaseInsensitive,
    AlternativeFormat,
    /// Only produced by name resolution.
    Fuzzy,
}

/// A ranked alternative offered when resolution misses.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Suggestion {
    pub record: CountryRecord,
    pub similarity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionResult {
    Found {
        record: CountryRecord,
        match_method: MatchMethod,
    },
    NotFound {
        suggestions: Vec<Suggestion>,
    },
}

impl ResolutionResult {
    fn found(record: &CountryRecord, match_method: MatchMethod) -> Self {
        ResolutionResult::Found {
            record: record.clone(),
            match_method,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionResult::Found { .. })
    }

    pub fn record(&self) -> Option<&CountryRecord> {
        match self {
            ResolutionResult::Found { record, .. } => Some(record),
            ResolutionResult::NotFound { .. } => None,
        }
    }

    pub fn match_method(&self) -> Option<MatchMethod> {
        match self {
            ResolutionResult::Found { match_method, .. } => Some(*match_method),
            ResolutionResult::NotFound { .. } => None,
        }
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            ResolutionResult::Found { .. } => &[],
            ResolutionResult::NotFound { suggestions } => suggestions,
        }
    }
}

/// A query as seen by the resolver: the raw input and its normalized form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionQuery {
    pub raw: String,
    pub normalized: String,
}

impl ResolutionQuery {
    /// Trimmed and uppercased.
    pub fn for_code(raw: &str) -> Self {
        Self {
            raw: raw.to_owned(),
            normalized: raw.trim().to_uppercase(),
        }
    }

    /// Trimmed only.
    pub fn for_name(raw: &str) -> Self {
        Self {
            raw: raw.to_owned(),
            normalized: raw.trim().to_owned(),
        }
    }
}

/// Tunables for the fallback chain.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolverConfig {
    /// Suggestions must score strictly above this.
    pub fuzzy_threshold: f64,
    pub max_suggestions: usize,
    /// Offered when nothing scores above the threshold.
    pub fallback_codes: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            fallback_codes: vec!["US".into(), "GB".into(), "DE".into()],
        }
    }
}

/// Stateless resolver. The corpus is passed per call so one resolver can
/// serve any number of corpora and threads.
#[derive(Clone, Debug, Default)]
pub struct CountryResolver {
    aliases: AliasTable,
    config: ResolverConfig,
}

impl CountryResolver {
    pub fn new(aliases: AliasTable, config: ResolverConfig) -> Self {
        Self { aliases, config }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve an alpha-2 (or common alpha-3) code.
    ///
    /// ```rust
    /// use atlas_core::{Corpus, CountryRecord, CountryResolver, MatchMethod};
    ///
    /// let corpus = Corpus::new(vec![CountryRecord::new("US", "United States")]);
    /// let resolver = CountryResolver::default();
    ///
    /// let hit = resolver.resolve_by_code("USA", &corpus);
    /// assert_eq!(hit.record().map(|r| r.code()), Some("US"));
    /// assert_eq!(hit.match_method(), Some(MatchMethod::ExactCode));
    /// ```
    pub fn resolve_by_code(&self, query: &str, corpus: &Corpus) -> ResolutionResult {
        let query = ResolutionQuery::for_code(query);
        let code = query.normalized.as_str();
        let len = code.chars().count();

        // 1. Exact
        let key = if len == 3 {
            self.aliases.lookup(code).unwrap_or(code)
        } else {
            code
        };
        if let Some(record) = corpus.get(key) {
            debug!(query = %query.raw, code = %record.code, "exact code match");
            return ResolutionResult::found(record, MatchMethod::ExactCode);
        }

        // 2. Case variants of the original input
        if len == 2 {
            let trimmed = query.raw.trim();
            let variants = [trimmed.to_lowercase(), trimmed.to_uppercase(), title_case(trimmed)];
            for variant in &variants {
                if let Some(record) = corpus.get(variant) {
                    debug!(query = %query.raw, code = %record.code, "alternative format match");
                    return ResolutionResult::found(record, MatchMethod::AlternativeFormat);
                }
            }
        }

        // 3. Corpora that are not uppercase-normalized
        if let Some(record) = corpus.iter().find(|r| r.code.eq_ignore_ascii_case(key)) {
            debug!(query = %query.raw, code = %record.code, "case-insensitive match");
            return ResolutionResult::found(record, MatchMethod::CaseInsensitive);
        }

        // 4. Suggestions only, scored against what the caller typed
        let suggestions = self.rank(corpus, |r| {
            calculate_string_similarity(code, &r.code.to_uppercase())
        });
        debug!(
            query = %query.raw,
            suggestions = suggestions.len(),
            "no code match"
        );
        ResolutionResult::NotFound {
            suggestions: self.or_fallback(suggestions, corpus),
        }
    }

    /// Resolve a country by display name.
    ///
    /// Exact (case-insensitive) name equality is `Found{CaseInsensitive}`.
    /// Otherwise the closest name is accepted as `Found{Fuzzy}` only when it
    /// scores above the threshold.
    pub fn resolve_by_name(&self, query: &str, corpus: &Corpus) -> ResolutionResult {
        let query = ResolutionQuery::for_name(query);
        let needle = fold_case(&query.normalized);

        if !needle.is_empty() {
            if let Some(record) = corpus.iter().find(|r| fold_case(&r.name) == needle) {
                debug!(query = %query.raw, code = %record.code, "exact name match");
                return ResolutionResult::found(record, MatchMethod::CaseInsensitive);
            }
        }

        let mut scored: Vec<Suggestion> = corpus
            .iter()
            .map(|r| Suggestion {
                record: r.clone(),
                similarity: calculate_string_similarity(&needle, &fold_case(&r.name)),
            })
            .filter(|s| s.similarity > 0.0)
            .collect();
        scored.sort_by(by_similarity);

        if let Some(best) = scored.first() {
            if best.similarity > self.config.fuzzy_threshold {
                debug!(
                    query = %query.raw,
                    code = %best.record.code,
                    similarity = best.similarity,
                    "fuzzy name match"
                );
                return ResolutionResult::found(&best.record, MatchMethod::Fuzzy);
            }
        }

        scored.truncate(self.config.max_suggestions);
        ResolutionResult::NotFound {
            suggestions: self.or_fallback(scored, corpus),
        }
    }

    /// Code-or-name front door: 2–3 ASCII letters are treated as a code,
    /// anything else as a name.
    pub fn resolve(&self, query: &str, corpus: &Corpus) -> ResolutionResult {
        if looks_like_code(query) {
            self.resolve_by_code(query, corpus)
        } else {
            self.resolve_by_name(query, corpus)
        }
    }

    fn rank<F>(&self, corpus: &Corpus, score: F) -> Vec<Suggestion>
    where
        F: Fn(&CountryRecord) -> f64,
    {
        let mut out: Vec<Suggestion> = corpus
            .iter()
            .filter_map(|r| {
                let similarity = score(r);
                (similarity > self.config.fuzzy_threshold).then(|| Suggestion {
                    record: r.clone(),
                    similarity,
                })
            })
            .collect();
        out.sort_by(by_similarity);
        out.truncate(self.config.max_suggestions);
        out
    }

    fn or_fallback(&self, suggestions: Vec<Suggestion>, corpus: &Corpus) -> Vec<Suggestion> {
        if !suggestions.is_empty() {
            return suggestions;
        }
        self.config
            .fallback_codes
            .iter()
            .filter_map(|code| corpus.find_by_code(code))
            .map(|record| Suggestion {
                record: record.clone(),
                similarity: 0.0,
            })
            .collect()
    }
}

/// Similarity descending, then code ascending for a stable order.
fn by_similarity(a: &Suggestion, b: &Suggestion) -> Ordering {
    b.similarity
        .partial_cmp(&a.similarity)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.record.code.cmp(&b.record.code))
}

fn looks_like_code(query: &str) -> bool {
    let q = query.trim();
    (2..=3).contains(&q.len()) && q.bytes().all(|b| b.is_ascii_alphabetic())
}

/// [`CountryResolver::resolve_by_code`] with the built-in alias table and
/// default configuration.
pub fn resolve_by_code(query: &str, corpus: &Corpus) -> ResolutionResult {
    DEFAULT_RESOLVER.resolve_by_code(query, corpus)
}

/// [`CountryResolver::resolve`] with the built-in alias table and default
/// configuration.
pub fn resolve(query: &str, corpus: &Corpus) -> ResolutionResult {
    DEFAULT_RESOLVER.resolve(query, corpus)
}

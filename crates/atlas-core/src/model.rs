// crates/atlas-core/src/model.rs
use serde::{Deserialize, Serialize};

/// One entry of the country corpus.
///
/// `code` is the canonical ISO 3166-1 alpha-2 key ("US", "DE") and `name` the
/// display name. Both are fixed once the corpus is loaded.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryRecord {
    pub code: String,
    pub name: String,
}

impl CountryRecord {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The static reference list of countries.
///
/// Ordered, read-only after construction and cheap to share behind an
/// `Arc`. Loaders (see [`crate::loader`]) validate and uppercase codes;
/// [`Corpus::new`] takes records exactly as given.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    records: Vec<CountryRecord>,
}

impl Corpus {
    pub fn new(records: Vec<CountryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CountryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact, case-sensitive lookup on `code`.
    pub fn get(&self, code: &str) -> Option<&CountryRecord> {
        self.records.iter().find(|r| r.code == code)
    }

    /// Case-insensitive lookup on `code`.
    pub fn find_by_code(&self, code: &str) -> Option<&CountryRecord> {
        let code = code.trim();
        self.records
            .iter()
            .find(|r| r.code.eq_ignore_ascii_case(code))
    }

    /// Returns a new corpus restricted to the given codes (case-insensitive),
    /// keeping the original order.
    pub fn filter_codes(&self, codes: &[&str]) -> Corpus {
        if codes.is_empty() {
            return self.clone();
        }
        let records = self
            .records
            .iter()
            .filter(|r| codes.iter().any(|c| r.code.eq_ignore_ascii_case(c.trim())))
            .cloned()
            .collect();
        Corpus { records }
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            countries: self.records.len(),
        }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a CountryRecord;
    type IntoIter = std::slice::Iter<'a, CountryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<CountryRecord> for Corpus {
    fn from_iter<T: IntoIterator<Item = CountryRecord>>(iter: T) -> Self {
        Corpus::new(iter.into_iter().collect())
    }
}

/// Simple aggregate statistics for a loaded corpus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CorpusStats {
    pub countries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Corpus {
        vec![
            CountryRecord::new("US", "United States"),
            CountryRecord::new("DE", "Germany"),
            CountryRecord::new("FR", "France"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn get_is_case_sensitive() {
        let corpus = sample();
        assert!(corpus.get("US").is_some());
        assert!(corpus.get("us").is_none());
    }

    #[test]
    fn find_by_code_ignores_case_and_whitespace() {
        let corpus = sample();
        assert_eq!(corpus.find_by_code(" de ").map(|r| r.name()), Some("Germany"));
    }

    #[test]
    fn filter_keeps_order() {
        let corpus = sample().filter_codes(&["fr", "US"]);
        let codes: Vec<_> = corpus.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["US", "FR"]);
    }

    #[test]
    fn empty_filter_is_identity() {
        assert_eq!(sample().filter_codes(&[]).len(), 3);
    }
}

// crates/atlas-core/src/text.rs

//! String helpers shared by the resolver and the search engine.

/// Convert a string into a folded key suitable for accent-insensitive
/// comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Åland` -> `Aland`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use atlas_core::text::fold_key;
///
/// assert_eq!(fold_key("Côte d'Ivoire"), "cote d'ivoire");
/// assert_eq!(fold_key("Türkiye"), "turkiye");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Case folding without transliteration.
#[inline]
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// `"us"` -> `"Us"`.
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Unit-cost edit distance (insert, delete, substitute), counted in `char`s.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows of the DP matrix.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Normalized Levenshtein similarity in `[0.0, 1.0]`.
///
/// `(max_len - distance) / max_len`. The comparison is case-sensitive:
/// callers fold case first when they want `"us"` and `"US"` to be equal.
///
/// ```rust
/// use atlas_core::text::calculate_string_similarity;
///
/// assert_eq!(calculate_string_similarity("US", "US"), 1.0);
/// assert_eq!(calculate_string_similarity("", "US"), 0.0);
/// assert!(calculate_string_similarity("us", "US") < 1.0);
/// ```
pub fn calculate_string_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein_distance(a, b);
    (max_len - distance) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }

    #[test]
    fn distance_counts_chars_not_bytes() {
        assert_eq!(levenshtein_distance("Åland", "Aland"), 1);
    }

    #[test]
    fn similarity_bounds() {
        let words = ["US", "USA", "GB", "Germany", "germany", "x", "Åland", "zz"];
        for a in words {
            for b in words {
                let s = calculate_string_similarity(a, b);
                assert!((0.0..=1.0).contains(&s), "{a} vs {b} = {s}");
            }
            assert_eq!(calculate_string_similarity(a, a), 1.0);
        }
    }

    #[test]
    fn similarity_empty_is_zero() {
        assert_eq!(calculate_string_similarity("", "x"), 0.0);
        assert_eq!(calculate_string_similarity("x", ""), 0.0);
        assert_eq!(calculate_string_similarity("", ""), 0.0);
    }

    #[test]
    fn similarity_is_case_sensitive() {
        assert_eq!(calculate_string_similarity("us", "US"), 0.0);
        assert_eq!(calculate_string_similarity("Us", "US"), 0.5);
        assert_eq!(
            calculate_string_similarity(&fold_case("us"), &fold_case("US")),
            1.0
        );
    }

    #[test]
    fn similarity_uses_longer_length() {
        // one insertion over three chars
        let s = calculate_string_similarity("US", "USA");
        assert!((s - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn title_case_variants() {
        assert_eq!(title_case("us"), "Us");
        assert_eq!(title_case("US"), "Us");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn fold_key_transliterates() {
        assert_eq!(fold_key("Åland Islands"), "aland islands");
        assert_eq!(fold_key("Curaçao"), "curacao");
    }
}

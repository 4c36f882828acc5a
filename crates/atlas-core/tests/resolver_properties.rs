use atlas_core::prelude::*;
use atlas_core::resolver::resolve_by_code;

fn small_corpus() -> Corpus {
    Corpus::new(vec![
        CountryRecord::new("US", "United States"),
        CountryRecord::new("GB", "United Kingdom"),
        CountryRecord::new("DE", "Germany"),
        CountryRecord::new("FR", "France"),
    ])
}

#[test]
fn every_code_in_the_bundled_corpus_resolves_exactly() {
    let corpus = Corpus::load().unwrap();
    for record in corpus {
        for query in [record.code.clone(), record.code.to_lowercase()] {
            let r = resolve_by_code(&query, corpus);
            assert!(
                matches!(
                    r.match_method(),
                    Some(MatchMethod::ExactCode | MatchMethod::CaseInsensitive | MatchMethod::AlternativeFormat)
                ),
                "{query} -> {r:?}"
            );
            assert_eq!(r.record(), Some(record));
        }
    }
}

#[test]
fn alpha3_usa_resolves_to_us() {
    let r = resolve_by_code("USA", &small_corpus());
    assert_eq!(r.record().map(|r| r.code.as_str()), Some("US"));
}

#[test]
fn every_alias_in_the_common_table_lands_in_the_bundled_corpus() {
    let corpus = Corpus::load().unwrap();
    for alpha3 in ["USA", "GBR", "DEU", "FRA", "JPN", "ZAF", "NZL", "CHE"] {
        assert!(resolve_by_code(alpha3, corpus).is_found(), "{alpha3}");
    }
}

#[test]
fn resolution_is_idempotent() {
    let corpus = small_corpus();
    let resolver = CountryResolver::default();
    for q in ["US", "usa", "XX", "GBX", "", "Germny"] {
        let first = resolver.resolve(q, &corpus);
        for _ in 0..3 {
            assert_eq!(resolver.resolve(q, &corpus), first);
        }
    }
}

#[test]
fn a_miss_always_offers_something_when_the_corpus_has_common_countries() {
    let corpus = Corpus::load().unwrap();
    let r = resolve_by_code("QQ", corpus);
    assert!(!r.is_found());
    assert!(!r.suggestions().is_empty());
}

#[test]
fn fuzzy_code_matches_are_never_auto_accepted() {
    // "GBX" is one edit from GB but not a known alias
    let r = resolve_by_code("GBX", &small_corpus());
    assert!(!r.is_found());
    assert_eq!(r.suggestions()[0].record.code, "GB");
}

#[test]
fn search_united_orders_ties_by_name() {
    let r = search("United", &small_corpus(), 10);
    assert_eq!(r.names(), vec!["United Kingdom", "United States"]);
    assert!(r.hits.iter().all(|h| h.match_type == MatchType::NameStartsWith));
}

#[test]
fn search_truncates_and_signals_more() {
    let corpus = Corpus::load().unwrap();
    let r = search("island", corpus, 2);
    assert_eq!(r.len(), 2);
    assert!(r.has_more);
    assert!(r.total_matches > 2);
}

#[test]
fn search_exact_code_on_bundled_corpus() {
    let corpus = Corpus::load().unwrap();
    let r = search("ch", corpus, 5);
    assert_eq!(r.hits[0].record.name, "Switzerland");
    assert_eq!(r.hits[0].score, 100);
}

#[test]
fn search_scores_never_increase_across_tiers() {
    let corpus = Corpus::load().unwrap();
    let r = search("ch", corpus, 50);
    let scores: Vec<u32> = r.hits.iter().map(|h| h.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
    for tier in [100, 80, 60] {
        assert!(scores.contains(&tier), "no {tier} in {scores:?}");
    }
    assert_eq!(r.hits[0].record.code, "CH");
}

#[test]
fn similarity_properties() {
    let words = ["US", "GB", "United States", "Åland", "x"];
    for a in words {
        assert_eq!(calculate_string_similarity(a, a), 1.0);
        assert_eq!(calculate_string_similarity("", a), 0.0);
        for b in words {
            let s = calculate_string_similarity(a, b);
            assert!((0.0..=1.0).contains(&s));
        }
    }
    assert_ne!(calculate_string_similarity("us", "US"), 1.0);
}

//! Basic usage example for atlas-rs
//!
//! This example demonstrates how to:
//! - Load the bundled country corpus
//! - Resolve codes (ISO2, ISO3, any case) and names
//! - Run a ranked search
//! - Compare strings with the similarity measure

use atlas_rs::prelude::*;

fn main() -> Result<()> {
    println!("=== atlas-rs Basic Usage Example ===\n");

    let corpus = Corpus::load()?;
    println!("Loaded {} countries\n", corpus.len());

    // Example 1: code resolution
    println!("--- Example 1: Resolve by code ---");
    let resolver = CountryResolver::default();
    for query in ["DE", "usa", "gb", "GBX"] {
        match resolver.resolve_by_code(query, corpus) {
            ResolutionResult::Found {
                record,
                match_method,
            } => println!("  {query:>4} -> {} ({}) via {match_method:?}", record.name(), record.code()),
            ResolutionResult::NotFound { suggestions } => {
                let codes: Vec<&str> = suggestions.iter().map(|s| s.record.code()).collect();
                println!("  {query:>4} -> not found, did you mean {codes:?}?");
            }
        }
    }
    println!();

    // Example 2: name resolution tolerates typos
    println!("--- Example 2: Resolve by name ---");
    for query in ["germany", "Swizerland", "Atlantis"] {
        let result = resolver.resolve(query, corpus);
        match result.record() {
            Some(record) => println!("  {query} -> {}", record.name()),
            None => println!("  {query} -> {} suggestion(s)", result.suggestions().len()),
        }
    }
    println!();

    // Example 3: ranked search
    println!("--- Example 3: Search ---");
    let result = search("united", corpus, 5);
    for hit in &result.hits {
        println!("  {:>3} {} ({:?})", hit.score, hit.record.name(), hit.match_type);
    }
    println!("  total matches: {}, more: {}\n", result.total_matches, result.has_more);

    let folded = search_with(
        "cote",
        corpus,
        &SearchOptions {
            max_results: 5,
            fold_accents: true,
        },
    );
    println!("  accent-folded 'cote': {:?}\n", folded.names());

    // Example 4: similarity
    println!("--- Example 4: Similarity ---");
    for (a, b) in [("USA", "US"), ("Germany", "Germny"), ("us", "US")] {
        println!("  {a} ~ {b}: {:.3}", calculate_string_similarity(a, b));
    }

    Ok(())
}

//! Error handling example for atlas-rs
//!
//! No-match is data, bad input is an error, and every tool answer is an
//! envelope either way.

use atlas_rs::envelope;
use atlas_rs::prelude::*;
use atlas_rs::validate::{parse_bounding_box, validate_country_query, validate_search_term};

fn main() -> Result<()> {
    println!("=== atlas-rs Error Handling Example ===\n");

    // Example 1: loading a corpus that is not there
    println!("--- Example 1: Loading a missing corpus ---");
    match Corpus::load_from_path("does/not/exist.json.gz") {
        Ok(c) => println!("  unexpectedly loaded {} countries", c.len()),
        Err(e) => println!("  ✗ {e}"),
    }
    println!();

    let corpus = Corpus::load()?;

    // Example 2: invalid input never reaches the resolver
    println!("--- Example 2: Validating codes ---");
    for raw in ["", "A", "ABCD", "12", " de "] {
        match validate_country_query(raw) {
            Ok(code) => println!("  {raw:?} -> ok ({code})"),
            Err(e) => println!("  {raw:?} -> {}", envelope::failure("country_info", e)),
        }
    }
    println!();

    // Example 3: a miss is a NotFound with suggestions, not an error
    println!("--- Example 3: Unknown codes ---");
    for code in ["XX", "QQ", "GBX"] {
        let result = resolve_by_code(code, corpus);
        println!("  {}", envelope::resolution("country_info", code, &result));
    }
    println!();

    // Example 4: other validators
    println!("--- Example 4: Search terms and bounding boxes ---");
    if let Err(e) = validate_search_term("a") {
        println!("  search 'a': {e}");
    }
    match parse_bounding_box("170,-10,-170,10") {
        Ok(bbox) => println!("  bbox crosses antimeridian: {}", bbox.crosses_antimeridian()),
        Err(e) => println!("  bbox: {e}"),
    }
    if let Err(e) = parse_bounding_box("0,50,10,40") {
        println!("  bbox: {e}");
    }

    Ok(())
}

//! atlas-cli: command-line front-end for atlas-core
//!
//! Resolves countries, searches the corpus and geolocates IP addresses
//! from the terminal. Every command prints plain text by default, or the
//! same JSON envelope the tool back-end returns with `--json`.
//!
//! Usage examples
//! --------------
//!
//! - Corpus summary
//!   $ atlas stats
//!
//! - Resolve a code (ISO2 or common ISO3, any case)
//!   $ atlas country usa
//!   $ atlas --json country GBX
//!
//! - Resolve a code or a name
//!   $ atlas resolve "Swizerland"
//!
//! - Ranked search
//!   $ atlas search united --max 3
//!   $ atlas search aland --fold-accents
//!
//! - Batch IP geolocation (needs AZURE_MAPS_SUBSCRIPTION_KEY)
//!   $ atlas locate 8.8.8.8 1.1.1.1 2001:4860:4860::8888
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `warn`).
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use atlas_core::envelope;
use atlas_core::prelude::*;
use atlas_core::validate::{clamp_max_results, validate_country_query, validate_search_term};
use clap::Parser;
use serde_json::json;
use std::borrow::Cow;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let corpus = load_corpus(args.input.as_deref(), args.filter.as_deref())?;
    let resolver = CountryResolver::default();
    let as_json = args.json;

    match args.command {
        Commands::Stats => {
            let stats = corpus.stats();
            if as_json {
                println!("{}", envelope::success("corpus_stats", &stats));
            } else {
                println!("Corpus statistics:");
                println!("  Countries: {}", stats.countries);
            }
        }

        Commands::Countries => {
            if as_json {
                println!("{}", envelope::success("list_countries", corpus.records()));
            } else {
                for c in corpus.iter() {
                    println!("{} ({})", c.name(), c.code());
                }
            }
        }

        Commands::Country { code } => {
            let code = match validate_country_query(&code) {
                Ok(code) => code,
                Err(e) => return reject(as_json, "country_info", e),
            };
            let result = resolver.resolve_by_code(&code, &corpus);
            print_resolution(as_json, "country_info", &code, &result);
        }

        Commands::Resolve { query } => {
            let result = resolver.resolve(&query, &corpus);
            print_resolution(as_json, "resolve_country", &query, &result);
        }

        Commands::Search {
            term,
            max,
            fold_accents,
        } => {
            let term = match validate_search_term(&term) {
                Ok(term) => term,
                Err(e) => return reject(as_json, "search_countries", e),
            };
            let options = SearchOptions {
                max_results: clamp_max_results(max),
                fold_accents,
            };
            let result = search_with(&term, &corpus, &options);
            if as_json {
                println!("{}", envelope::success("search_countries", &result));
            } else if result.is_empty() {
                println!("No countries found matching: {term}");
            } else {
                for hit in &result.hits {
                    println!(
                        "{:>3}  {} ({})  {:?}",
                        hit.score, hit.record.name, hit.record.code, hit.match_type
                    );
                }
                if result.has_more {
                    println!("... {} matches in total, raise --max to see more", result.total_matches);
                }
            }
        }

        Commands::Similarity { a, b } => {
            let similarity = calculate_string_similarity(&a, &b);
            if as_json {
                let body = json!({ "a": a, "b": b, "similarity": similarity });
                println!("{}", envelope::success("string_similarity", &body));
            } else {
                println!("{similarity:.4}");
            }
        }

        #[cfg(feature = "http")]
        Commands::Locate {
            ips,
            concurrency,
            subscription_key,
        } => locate(as_json, corpus.into_owned(), resolver, ips, concurrency, subscription_key)?,

        #[cfg(not(feature = "http"))]
        Commands::Locate { .. } => {
            anyhow::bail!("atlas-cli was built without the `http` feature; `locate` is unavailable")
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Bundled corpus unless `--input` points elsewhere, optionally narrowed by `--filter`.
fn load_corpus(input: Option<&str>, filter: Option<&str>) -> anyhow::Result<Cow<'static, Corpus>> {
    let corpus = match input {
        Some(path) => Cow::Owned(
            Corpus::load_from_path(path).with_context(|| format!("loading corpus from {path}"))?,
        ),
        None => Cow::Borrowed(Corpus::load().context("loading the bundled corpus")?),
    };

    let codes: Vec<&str> = filter
        .map(|s| s.split(',').map(str::trim).filter(|x| !x.is_empty()).collect())
        .unwrap_or_default();
    if codes.is_empty() {
        Ok(corpus)
    } else {
        Ok(Cow::Owned(corpus.filter_codes(&codes)))
    }
}

/// Invalid input is an envelope in JSON mode and a process error otherwise.
fn reject(as_json: bool, tool: &str, err: AtlasError) -> anyhow::Result<()> {
    if as_json {
        println!("{}", envelope::failure(tool, &err));
        Ok(())
    } else {
        Err(err.into())
    }
}

fn print_resolution(as_json: bool, tool: &str, query: &str, result: &ResolutionResult) {
    if as_json {
        println!("{}", envelope::resolution(tool, query, result));
        return;
    }
    match result {
        ResolutionResult::Found {
            record,
            match_method,
        } => {
            println!("Country: {}", record.name());
            println!("Code: {}", record.code());
            println!("Matched by: {match_method:?}");
        }
        ResolutionResult::NotFound { suggestions } => {
            eprintln!("No country found for: {query}");
            if !suggestions.is_empty() {
                eprintln!("Did you mean:");
                for s in suggestions {
                    eprintln!("  {} ({})  {:.2}", s.record.name(), s.record.code(), s.similarity);
                }
            }
        }
    }
}

#[cfg(feature = "http")]
fn locate(
    as_json: bool,
    corpus: Corpus,
    resolver: CountryResolver,
    ips: Vec<String>,
    concurrency: Option<usize>,
    subscription_key: Option<String>,
) -> anyhow::Result<()> {
    use std::sync::Arc;

    let mut config = AtlasConfig::from_env()?;
    if let Some(key) = subscription_key.filter(|k| !k.trim().is_empty()) {
        config.subscription_key = Some(key);
    }
    if let Some(limit) = concurrency {
        config.concurrency_limit = limit;
    }
    tracing::debug!(?config, "locate");

    let locator = AzureMapsIpLocator::new(&config)?;
    let processor = BatchProcessor::new(config.concurrency_limit)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting the async runtime")?;
    let outcome = runtime.block_on(locate_batch(
        Arc::new(locator),
        Arc::new(resolver),
        Arc::new(corpus),
        &ips,
        processor,
    ));

    let items = match outcome {
        Ok(items) => items,
        Err(e) => return reject(as_json, "ip_geolocation_batch", e),
    };
    let report = BatchReport::from_items(&items);

    if as_json {
        let body = json!({ "summary": report, "results": items });
        println!("{}", envelope::success("ip_geolocation_batch", &body));
        return Ok(());
    }

    for item in &items {
        match &item.outcome {
            Ok(located) => println!(
                "{}  {}  {}",
                item.input,
                located.country_code.as_deref().unwrap_or("--"),
                located.country_name.as_deref().unwrap_or("unknown")
            ),
            Err(e) => println!("{}  error: {e}", item.input),
        }
    }
    println!(
        "{} addresses, {} located, {} failed",
        report.total, report.succeeded, report.failed
    );
    Ok(())
}

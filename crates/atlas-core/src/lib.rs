// crates/atlas-core/src/lib.rs

//! # atlas-core
//!
//! The engine behind a catalog of mapping tools:
//!
//! - [`CountryResolver`]: code → country resolution with alias, case and
//!   similarity fallbacks
//! - [`search`]: ranked country search over a [`Corpus`]
//! - [`BatchProcessor`]: bounded-concurrency fan-out used for batch IP lookups
//! - [`validate`], [`envelope`]: input sanitation and JSON response shaping
//! - [`geolocation`]: IP → country through Azure Maps (feature `http`)

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod alias;
pub mod batch;
pub mod config;
pub mod envelope;
pub mod error;
pub mod geolocation;
pub mod loader; // The public loader
pub mod model;
pub mod resolver;
pub mod search;
pub mod text;
pub mod validate;

// Re-exports
pub use crate::alias::AliasTable;
pub use crate::batch::{process_batch, BatchItem, BatchProcessor, BatchReport};
pub use crate::config::AtlasConfig;
pub use crate::error::{AtlasError, Result};
pub use crate::model::{CorpusStats, CountryRecord, Corpus};
pub use crate::resolver::{
    resolve, resolve_by_code, CountryResolver, MatchMethod, ResolutionQuery, ResolutionResult,
    ResolverConfig, Suggestion,
};
pub use crate::search::{search, search_with, MatchType, SearchHit, SearchOptions, SearchResult};
pub use crate::text::calculate_string_similarity;

pub mod prelude {
    pub use crate::geolocation::{locate_batch, IpLocation, IpLocator, LocatedIp};
    #[cfg(feature = "http")]
    pub use crate::geolocation::AzureMapsIpLocator;
    pub use crate::{
        calculate_string_similarity, process_batch, resolve, resolve_by_code, search, search_with,
        AliasTable, AtlasConfig, AtlasError, BatchItem, BatchProcessor, BatchReport, Corpus, CountryRecord,
        CountryResolver, MatchMethod, MatchType, ResolutionResult, ResolverConfig, Result,
        SearchOptions, SearchResult,
    };
}

// crates/atlas-core/src/loader/mod.rs

//! # Corpus Loader
//!
//! Handles the physical layer (file I/O, optional Gzip) and turns the JSON
//! payload `[{"code": "US", "name": "United States"}, ...]` into a validated
//! [`Corpus`].

use crate::error::{AtlasError, Result};
use crate::model::{CountryRecord, Corpus};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub mod common_io;

/// Bundled ISO 3166-1 alpha-2 list.
const EMBEDDED_CORPUS: &str = include_str!("../../data/countries.json");

static CORPUS_CACHE: OnceCell<Corpus> = OnceCell::new();

impl Corpus {
    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    pub fn default_dataset_filename() -> &'static str {
        "countries.json"
    }

    /// The bundled corpus, parsed once per process.
    pub fn load() -> Result<&'static Corpus> {
        CORPUS_CACHE.get_or_try_init(|| Self::from_json_str(EMBEDDED_CORPUS))
    }

    /// Loads a `.json` or `.json.gz` corpus from disk.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Corpus> {
        let path = path.as_ref();
        let reader = common_io::open_stream(path)?;
        let corpus = Self::from_json_reader(reader)?;
        debug!(path = %path.display(), countries = corpus.len(), "corpus loaded");
        Ok(corpus)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Corpus> {
        let records: Vec<CountryRecord> = serde_json::from_reader(reader)?;
        Self::from_records(records)
    }

    pub fn from_json_str(json: &str) -> Result<Corpus> {
        let records: Vec<CountryRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Validates and normalizes loader input.
    ///
    /// Codes must be two ASCII letters and are uppercased; names are trimmed
    /// and must not be empty. Later duplicates of a code are dropped.
    pub fn from_records(records: Vec<CountryRecord>) -> Result<Corpus> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut out = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let code = record.code.trim();
            if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
                return Err(AtlasError::invalid(
                    "corpus",
                    format!("entry {index}: code '{}' is not two ASCII letters", record.code),
                ));
            }
            let name = record.name.trim();
            if name.is_empty() {
                return Err(AtlasError::invalid(
                    "corpus",
                    format!("entry {index}: country {code} has an empty name"),
                ));
            }
            let code = code.to_ascii_uppercase();
            if !seen.insert(code.clone()) {
                warn!(%code, "duplicate corpus entry dropped");
                continue;
            }
            out.push(CountryRecord::new(code, name));
        }

        Ok(Corpus::new(out))
    }
}

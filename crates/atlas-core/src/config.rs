// crates/atlas-core/src/config.rs
use crate::batch::DEFAULT_CONCURRENCY_LIMIT;
use crate::error::{AtlasError, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_SUBSCRIPTION_KEY: &str = "AZURE_MAPS_SUBSCRIPTION_KEY";
pub const ENV_BASE_URL: &str = "AZURE_MAPS_BASE_URL";
pub const ENV_CONCURRENCY: &str = "ATLAS_BATCH_CONCURRENCY";
pub const ENV_CORPUS_PATH: &str = "ATLAS_CORPUS_PATH";

pub const DEFAULT_BASE_URL: &str = "https://atlas.microsoft.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime settings for the tool back-end.
#[derive(Clone, PartialEq, Eq)]
pub struct AtlasConfig {
    pub subscription_key: Option<String>,
    pub base_url: String,
    pub concurrency_limit: usize,
    /// `None` means the bundled corpus.
    pub corpus_path: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            subscription_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            corpus_path: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for AtlasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasConfig")
            .field("subscription_key", &self.subscription_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("concurrency_limit", &self.concurrency_limit)
            .field("corpus_path", &self.corpus_path)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl AtlasConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let mut config = AtlasConfig {
            subscription_key: get(ENV_SUBSCRIPTION_KEY),
            corpus_path: get(ENV_CORPUS_PATH).map(PathBuf::from),
            ..AtlasConfig::default()
        };
        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(raw) = get(ENV_CONCURRENCY) {
            config.concurrency_limit = raw.parse().map_err(|_| {
                AtlasError::Config(format!("{ENV_CONCURRENCY}='{raw}' is not a positive integer"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency_limit == 0 {
            return Err(AtlasError::Config("concurrency limit must be at least 1".into()));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(AtlasError::Config(format!(
                "base url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn require_subscription_key(&self) -> Result<&str> {
        self.subscription_key.as_deref().ok_or_else(|| {
            AtlasError::Config(format!("{ENV_SUBSCRIPTION_KEY} is not set"))
        })
    }
}

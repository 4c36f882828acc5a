// crates/atlas-core/src/geolocation.rs

//! # IP Geolocation
//!
//! Country-level IP lookups, one at a time through an [`IpLocator`] or many
//! at once through [`locate_batch`], which validates and de-duplicates the
//! addresses and fans them out over a [`BatchProcessor`].

use crate::batch::{BatchItem, BatchProcessor};
use crate::error::Result;
use crate::model::Corpus;
use crate::resolver::CountryResolver;
use crate::validate::{dedup_ips, parse_ip};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "http")]
pub use azure::AzureMapsIpLocator;

/// What a locator knows about one address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpLocation {
    pub ip: IpAddr,
    /// ISO alpha-2, when the service could place the address.
    pub country_code: Option<String>,
}

/// A located address with the country name filled in from the corpus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedIp {
    pub ip: String,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
}

#[async_trait]
pub trait IpLocator: Send + Sync {
    async fn locate(&self, ip: IpAddr) -> Result<IpLocation>;
}

/// Locate a list of raw address strings.
///
/// Blank and duplicate entries are dropped first (case-insensitive); more
/// than [`MAX_BATCH_IPS`](crate::validate::MAX_BATCH_IPS) distinct addresses
/// or an empty list fails the whole call. Malformed addresses come back as
/// per-item errors without reaching the locator.
pub async fn locate_batch<L>(
    locator: Arc<L>,
    resolver: Arc<CountryResolver>,
    corpus: Arc<Corpus>,
    raw_ips: &[String],
    processor: BatchProcessor,
) -> Result<Vec<BatchItem<String, LocatedIp>>>
where
    L: IpLocator + ?Sized + 'static,
{
    let ips = dedup_ips(raw_ips)?;
    debug!(count = ips.len(), limit = processor.concurrency_limit(), "locating batch");

    let items = processor
        .run(ips, move |raw: String| {
            let locator = Arc::clone(&locator);
            let resolver = Arc::clone(&resolver);
            let corpus = Arc::clone(&corpus);
            async move {
                let ip = parse_ip(&raw)?;
                let location = locator.locate(ip).await?;
                let country_name = location
                    .country_code
                    .as_deref()
                    .and_then(|code| resolver.resolve_by_code(code, &corpus).record().cloned())
                    .map(|record| record.name);
                Ok::<_, crate::error::AtlasError>(LocatedIp {
                    ip: location.ip.to_string(),
                    country_code: location.country_code,
                    country_name,
                })
            }
        })
        .await;

    Ok(items)
}

#[cfg(feature = "http")]
mod azure {
    use super::{IpLocation, IpLocator};
    use crate::config::AtlasConfig;
    use crate::error::{AtlasError, Result};
    use async_trait::async_trait;
    use reqwest::{Client, Url};
    use serde::Deserialize;
    use std::net::IpAddr;
    use tracing::debug;

    const GEOLOCATION_PATH: &str = "/geolocation/ip/json";
    const API_VERSION: &str = "1.0";

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct GeolocationResponse {
        pub country_region: Option<CountryRegion>,
        pub ip_address: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct CountryRegion {
        pub iso_code: Option<String>,
    }

    /// Azure Maps `Geolocation - Get IP To Location`.
    #[derive(Clone)]
    pub struct AzureMapsIpLocator {
        client: Client,
        base_url: String,
        subscription_key: String,
    }

    impl std::fmt::Debug for AzureMapsIpLocator {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("AzureMapsIpLocator")
                .field("base_url", &self.base_url)
                .finish_non_exhaustive()
        }
    }

    impl AzureMapsIpLocator {
        pub fn new(config: &AtlasConfig) -> Result<Self> {
            config.validate()?;
            let subscription_key = config.require_subscription_key()?.to_owned();
            let client = Client::builder().timeout(config.request_timeout).build()?;
            Ok(Self {
                client,
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                subscription_key,
            })
        }

        pub(super) fn request_url(&self, ip: IpAddr) -> Result<Url> {
            let endpoint = format!("{}{GEOLOCATION_PATH}", self.base_url);
            let ip = ip.to_string();
            Url::parse_with_params(
                &endpoint,
                &[
                    ("api-version", API_VERSION),
                    ("ip", ip.as_str()),
                    ("subscription-key", self.subscription_key.as_str()),
                ],
            )
            .map_err(|e| AtlasError::Config(format!("invalid geolocation url '{endpoint}': {e}")))
        }
    }

    pub(super) fn into_location(ip: IpAddr, body: GeolocationResponse) -> Result<IpLocation> {
        if let Some(echoed) = body.ip_address.as_deref() {
            if echoed.parse::<IpAddr>().ok() != Some(ip) {
                return Err(AtlasError::Upstream(format!(
                    "asked for {ip} but the service answered for {echoed}"
                )));
            }
        }
        let country_code = body
            .country_region
            .and_then(|r| r.iso_code)
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty());
        Ok(IpLocation { ip, country_code })
    }

    #[async_trait]
    impl IpLocator for AzureMapsIpLocator {
        async fn locate(&self, ip: IpAddr) -> Result<IpLocation> {
            let url = self.request_url(ip)?;
            debug!(%ip, "geolocation request");
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(AtlasError::Upstream(format!(
                    "geolocation for {ip} failed with {status}: {}",
                    detail.chars().take(200).collect::<String>()
                )));
            }
            let body: GeolocationResponse = response.json().await?;
            into_location(ip, body)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchReport;
    use crate::error::AtlasError;
    use crate::model::CountryRecord;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TableLocator {
        table: HashMap<IpAddr, &'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IpLocator for TableLocator {
        async fn locate(&self, ip: IpAddr) -> Result<IpLocation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.table.get(&ip) {
                Some(code) => Ok(IpLocation {
                    ip,
                    country_code: Some((*code).to_owned()),
                }),
                None => Err(AtlasError::Upstream(format!("no data for {ip}"))),
            }
        }
    }

    fn fixture() -> (Arc<TableLocator>, Arc<CountryResolver>, Arc<Corpus>) {
        let table: HashMap<IpAddr, &'static str> = HashMap::from([
            ("8.8.8.8".parse().unwrap(), "US"),
            ("2001:db8::1".parse().unwrap(), "DE"),
            ("203.0.113.9".parse().unwrap(), "ZZ"),
        ]);
        let corpus = Corpus::new(vec![
            CountryRecord::new("US", "United States"),
            CountryRecord::new("DE", "Germany"),
        ]);
        (
            Arc::new(TableLocator {
                table,
                calls: AtomicUsize::new(0),
            }),
            Arc::new(CountryResolver::default()),
            Arc::new(corpus),
        )
    }

    #[tokio::test]
    async fn batch_mixes_successes_and_failures() {
        let (locator, resolver, corpus) = fixture();
        let raw: Vec<String> = ["8.8.8.8", "not-an-ip", "2001:DB8::1", "2001:db8::1", "192.0.2.1", "203.0.113.9"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let items = locate_batch(
            Arc::clone(&locator),
            resolver,
            corpus,
            &raw,
            BatchProcessor::default(),
        )
        .await
        .unwrap();

        // the lowercase duplicate is dropped before the batch starts
        assert_eq!(items.len(), 5);
        assert_eq!(
            BatchReport::from_items(&items),
            BatchReport { total: 5, succeeded: 3, failed: 2 }
        );

        let us = items[0].value().unwrap();
        assert_eq!(us.country_name.as_deref(), Some("United States"));

        assert!(items[1].error().unwrap().contains("ip address"));

        let de = items[2].value().unwrap();
        assert_eq!(de.ip, "2001:db8::1");
        assert_eq!(de.country_name.as_deref(), Some("Germany"));

        assert!(items[3].error().unwrap().contains("no data"));

        // located, but not in the corpus
        let zz = items[4].value().unwrap();
        assert_eq!(zz.country_code.as_deref(), Some("ZZ"));
        assert_eq!(zz.country_name, None);

        // the malformed address never reached the locator
        assert_eq!(locator.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let (locator, resolver, corpus) = fixture();
        let err = locate_batch(locator, resolver, corpus, &[], BatchProcessor::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AtlasError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn works_through_a_trait_object() {
        let (locator, resolver, corpus) = fixture();
        let locator: Arc<dyn IpLocator> = locator;
        let items = locate_batch(
            locator,
            resolver,
            corpus,
            &["8.8.8.8".to_string()],
            BatchProcessor::new(1).unwrap(),
        )
        .await
        .unwrap();
        assert!(items[0].is_ok());
    }
}

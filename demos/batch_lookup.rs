//! Batch lookup example for atlas-rs
//!
//! Fans a list of IP addresses out over a bounded number of concurrent
//! lookups. A fixed table stands in for the Azure Maps service so the
//! example runs offline; swap in `AzureMapsIpLocator::new(&config)?` to go
//! live.

use async_trait::async_trait;
use atlas_rs::prelude::*;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

struct FixedTable(HashMap<IpAddr, &'static str>);

#[async_trait]
impl IpLocator for FixedTable {
    async fn locate(&self, ip: IpAddr) -> Result<IpLocation> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        match self.0.get(&ip) {
            Some(code) => Ok(IpLocation {
                ip,
                country_code: Some((*code).to_owned()),
            }),
            None => Err(AtlasError::Upstream(format!("no location for {ip}"))),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== atlas-rs Batch Lookup Example ===\n");

    let table: HashMap<IpAddr, &'static str> = [
        ("8.8.8.8", "US"),
        ("1.1.1.1", "AU"),
        ("2001:4860:4860::8888", "US"),
        ("81.2.69.142", "GB"),
    ]
    .into_iter()
    .filter_map(|(ip, code)| ip.parse().ok().map(|ip| (ip, code)))
    .collect();

    let ips: Vec<String> = [
        "8.8.8.8",
        "1.1.1.1",
        "8.8.8.8",
        "not-an-ip",
        "81.2.69.142",
        "203.0.113.7",
        "2001:4860:4860::8888",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let items = locate_batch(
        Arc::new(FixedTable(table)),
        Arc::new(CountryResolver::default()),
        Arc::new(Corpus::load()?.clone()),
        &ips,
        BatchProcessor::new(2)?,
    )
    .await?;

    for item in &items {
        match &item.outcome {
            Ok(located) => println!(
                "  ✓ {:<22} {}",
                item.input,
                located.country_name.as_deref().unwrap_or("unknown")
            ),
            Err(e) => println!("  ✗ {:<22} {e}", item.input),
        }
    }

    let report = BatchReport::from_items(&items);
    println!(
        "\n{} distinct addresses, {} located, {} failed",
        report.total, report.succeeded, report.failed
    );
    Ok(())
}

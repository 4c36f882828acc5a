// crates/atlas-core/src/validate.rs

//! Input sanitation run by the tool layer before anything reaches the
//! resolver, the search engine or the network.

use crate::error::{AtlasError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::IpAddr;

pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const MIN_SEARCH_TERM_LEN: usize = 2;
pub const MAX_BATCH_IPS: usize = 100;

/// A trimmed 2–3 letter code, uppercased.
pub fn validate_country_query(raw: &str) -> Result<String> {
    let q = raw.trim();
    if q.is_empty() {
        return Err(AtlasError::invalid("country code", "must not be empty"));
    }
    if !q.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(AtlasError::invalid(
            "country code",
            format!("'{q}' must contain letters only"),
        ));
    }
    if !(2..=3).contains(&q.len()) {
        return Err(AtlasError::invalid(
            "country code",
            format!("'{q}' must be 2 or 3 letters"),
        ));
    }
    Ok(q.to_uppercase())
}

pub fn validate_search_term(raw: &str) -> Result<String> {
    let term = raw.trim();
    if term.chars().count() < MIN_SEARCH_TERM_LEN {
        return Err(AtlasError::invalid(
            "search term",
            format!("must be at least {MIN_SEARCH_TERM_LEN} characters"),
        ));
    }
    Ok(term.to_owned())
}

/// Missing means [`DEFAULT_MAX_RESULTS`]; anything else is clamped to `[1, 50]`.
pub fn clamp_max_results(requested: Option<i64>) -> usize {
    match requested {
        None => DEFAULT_MAX_RESULTS,
        Some(n) => n.clamp(
            crate::search::MIN_MAX_RESULTS as i64,
            crate::search::MAX_MAX_RESULTS as i64,
        ) as usize,
    }
}

pub fn parse_ip(raw: &str) -> Result<IpAddr> {
    let s = raw.trim();
    s.parse::<IpAddr>()
        .map_err(|_| AtlasError::invalid("ip address", format!("'{s}' is not a valid IPv4 or IPv6 address")))
}

/// Trim, drop blanks and remove duplicates, keeping the first occurrence and
/// the original order.
///
/// Addresses compare by value (`2001:db8::1` equals `2001:0DB8::1`);
/// entries that do not parse compare case-insensitively.
pub fn dedup_ips<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let out: Vec<String> = raw
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(dedup_key(s)))
        .map(str::to_owned)
        .collect();

    if out.is_empty() {
        return Err(AtlasError::invalid("ip addresses", "at least one address is required"));
    }
    if out.len() > MAX_BATCH_IPS {
        return Err(AtlasError::invalid(
            "ip addresses",
            format!("{} addresses given, at most {MAX_BATCH_IPS} allowed", out.len()),
        ));
    }
    Ok(out)
}

fn dedup_key(s: &str) -> String {
    match s.parse::<IpAddr>() {
        Ok(ip) => ip.to_string(),
        Err(_) => s.to_ascii_lowercase(),
    }
}

/// `true/false`, `yes/no`, `1/0`, `on/off`, case-insensitive.
pub fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        other => Err(AtlasError::invalid(
            "boolean",
            format!("'{other}' is not one of true/false, yes/no, 1/0, on/off"),
        )),
    }
}

pub fn validate_latitude(lat: f64) -> Result<f64> {
    if lat.is_finite() && (-90.0..=90.0).contains(&lat) {
        Ok(lat)
    } else {
        Err(AtlasError::invalid("latitude", format!("{lat} is outside [-90, 90]")))
    }
}

pub fn validate_longitude(lon: f64) -> Result<f64> {
    if lon.is_finite() && (-180.0..=180.0).contains(&lon) {
        Ok(lon)
    } else {
        Err(AtlasError::invalid("longitude", format!("{lon} is outside [-180, 180]")))
    }
}

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(f64, f64)> {
    Ok((validate_latitude(lat)?, validate_longitude(lon)?))
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// `min_lon > max_lon` means the box wraps the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let lat_ok = (self.min_lat..=self.max_lat).contains(&lat);
        let lon_ok = if self.crosses_antimeridian() {
            lon >= self.min_lon || lon <= self.max_lon
        } else {
            (self.min_lon..=self.max_lon).contains(&lon)
        };
        lat_ok && lon_ok
    }
}

/// Parse `"minLon,minLat,maxLon,maxLat"`.
pub fn parse_bounding_box(raw: &str) -> Result<BoundingBox> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(AtlasError::invalid(
            "bounding box",
            format!("expected 4 comma-separated numbers, got {}", parts.len()),
        ));
    }
    let mut nums = [0f64; 4];
    for (slot, part) in nums.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|_| AtlasError::invalid("bounding box", format!("'{part}' is not a number")))?;
    }
    let [min_lon, min_lat, max_lon, max_lat] = nums;
    validate_longitude(min_lon)?;
    validate_longitude(max_lon)?;
    validate_latitude(min_lat)?;
    validate_latitude(max_lat)?;
    if min_lat > max_lat {
        return Err(AtlasError::invalid(
            "bounding box",
            format!("min latitude {min_lat} is above max latitude {max_lat}"),
        ));
    }
    Ok(BoundingBox {
        min_lon,
        min_lat,
        max_lon,
        max_lat,
    })
}

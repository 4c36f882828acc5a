//! atlas-cli
//! =========
//!
//! Command-line interface for the `atlas-core` country resolver, search and
//! batch IP geolocation.
//!
//! The binary (`atlas-cli`) is the deliverable; this library target only
//! carries the documentation page.
//!
//! Quick start
//! -----------
//!
//! ```text
//! atlas-cli --help
//! atlas-cli country usa
//! atlas-cli --json search united --max 3
//! AZURE_MAPS_SUBSCRIPTION_KEY=... atlas-cli locate 8.8.8.8 1.1.1.1
//! ```
//!
//! For programmatic access use the [`atlas-core`] crate directly.
//!
//! [`atlas-core`]: https://docs.rs/atlas-core
#![cfg_attr(docsrs, feature(doc_cfg))]

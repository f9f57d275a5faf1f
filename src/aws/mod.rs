//! AWS backend interaction
//!
//! Everything below the adapter layer: credentials and request signing,
//! the HTTP wrapper, and the SimpleDB action client.
//!
//! # Module Structure
//!
//! - [`auth`] - Credentials from service config plus SigV2 request signing
//! - [`http`] - HTTP utilities for the query API
//! - [`client`] - SimpleDB client, one per adapter instance

pub mod auth;
pub mod client;
pub mod http;

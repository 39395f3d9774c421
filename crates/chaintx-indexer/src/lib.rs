//! chaintx-indexer — a [`StatusOracle`](chaintx_core::StatusOracle) backed by
//! an indexer's `GET /v2/transactions/{txid}` endpoint.
//!
//! - [`IndexerClient`] — the HTTP client
//! - [`IndexerConfig`] — address, API token and timeout
//! - [`ConfigError`] — why a client could not be built

pub mod client;
pub mod config;

pub use client::{IndexerClient, API_TOKEN_HEADER};
pub use config::{ConfigError, IndexerConfig};

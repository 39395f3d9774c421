//! Indexer client configuration.

use std::time::Duration;

use thiserror::Error;

/// Connection settings for [`IndexerClient`](crate::IndexerClient).
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Base URL of the indexer, e.g. `http://localhost:8980`.
    pub address: String,
    /// API token sent as `X-Indexer-API-Token`, if any.
    pub token: Option<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl IndexerConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            token: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The client could not be set up from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no indexer address supplied")]
    MissingAddress,

    #[error("invalid indexer address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed creating the indexer client: {0}")]
    Client(String),
}

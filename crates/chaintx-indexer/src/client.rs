//! `IndexerClient` — transaction status lookups against an indexer REST API.

use async_trait::async_trait;
use chaintx_core::{OracleError, StatusOracle, TxId, TxStatus};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::{ConfigError, IndexerConfig};

/// Header carrying the indexer API token.
pub const API_TOKEN_HEADER: &str = "X-Indexer-API-Token";

/// Body of a successful `GET /v2/transactions/{txid}`.
#[derive(Debug, Deserialize)]
struct LookupTransactionResponse {
    #[serde(rename = "current-round")]
    current_round: Option<u64>,
    transaction: FoundTransaction,
}

/// The `transaction` object; it must be present and non-null.
#[derive(Debug, Deserialize)]
struct FoundTransaction {
    #[serde(rename = "confirmed-round")]
    confirmed_round: Option<u64>,
}

/// HTTP status oracle backed by an indexer.
///
/// One `GET` per lookup. A `404` means the transaction is not on-chain; no
/// retry is attempted on any failure.
pub struct IndexerClient {
    base: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl IndexerClient {
    pub fn new(config: IndexerConfig) -> Result<Self, ConfigError> {
        let address = config.address.trim();
        if address.is_empty() {
            return Err(ConfigError::MissingAddress);
        }

        let url = Url::parse(address).map_err(|e| ConfigError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidAddress {
                address: address.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
            token: config.token.filter(|t| !t.is_empty()),
            http,
        })
    }

    /// The normalized base URL.
    pub fn address(&self) -> &str {
        &self.base
    }

    fn transaction_url(&self, txid: &TxId) -> String {
        format!("{}/v2/transactions/{}", self.base, txid)
    }
}

#[async_trait]
impl StatusOracle for IndexerClient {
    async fn lookup(&self, txid: &TxId) -> Result<TxStatus, OracleError> {
        let mut req = self.http.get(self.transaction_url(txid));
        if let Some(token) = &self.token {
            req = req.header(API_TOKEN_HEADER, token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| OracleError::Http(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(txid = %txid, "transaction not found");
            return Ok(TxStatus::NotSent);
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| OracleError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let found: LookupTransactionResponse = serde_json::from_slice(&body)
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;
        debug!(
            txid = %txid,
            current_round = ?found.current_round,
            confirmed_round = ?found.transaction.confirmed_round,
            "transaction found"
        );
        Ok(TxStatus::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_address_is_rejected() {
        assert!(matches!(
            IndexerClient::new(IndexerConfig::new("  ")),
            Err(ConfigError::MissingAddress)
        ));
    }

    #[test]
    fn bad_address_is_rejected() {
        assert!(matches!(
            IndexerClient::new(IndexerConfig::new("not a url")),
            Err(ConfigError::InvalidAddress { .. })
        ));
        assert!(matches!(
            IndexerClient::new(IndexerConfig::new("ftp://indexer.example")),
            Err(ConfigError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn lookup_url_joins_base_path() {
        let client = IndexerClient::new(IndexerConfig::new("https://indexer.example/api/")).unwrap();
        assert_eq!(
            client.transaction_url(&TxId::new("ABC")),
            "https://indexer.example/api/v2/transactions/ABC"
        );

        let client = IndexerClient::new(IndexerConfig::new("http://localhost:8980")).unwrap();
        assert_eq!(client.address(), "http://localhost:8980");
    }

    #[test]
    fn lookup_body_requires_a_transaction_object() {
        let found: LookupTransactionResponse = serde_json::from_str(
            r#"{"current-round":10,"transaction":{"id":"ABC","confirmed-round":7}}"#,
        )
        .unwrap();
        assert_eq!(found.transaction.confirmed_round, Some(7));

        for body in [
            r#"{"current-round":10,"transaction":null}"#,
            r#"{"current-round":10}"#,
            r#"{"transaction":"ABC"}"#,
        ] {
            assert!(serde_json::from_str::<LookupTransactionResponse>(body).is_err(), "{body}");
        }
    }

    #[test]
    fn empty_token_is_not_sent() {
        let client =
            IndexerClient::new(IndexerConfig::new("http://localhost:8980").with_token("")).unwrap();
        assert!(client.token.is_none());
    }
}

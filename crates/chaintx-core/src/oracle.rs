//! The `StatusOracle` trait — answers whether a transaction is on-chain.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::OracleError;
use crate::record::TxId;

/// On-chain status of a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// The transaction was found on-chain.
    Sent,
    /// The service reported the transaction as not found.
    NotSent,
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sent => write!(f, "sent"),
            Self::NotSent => write!(f, "not sent"),
        }
    }
}

/// A remote lookup service for transaction status.
///
/// Each call is one independent round-trip: no batching, caching or retry.
/// "Not found" must be reported as [`TxStatus::NotSent`]; every other failure
/// is an [`OracleError`].
#[async_trait]
pub trait StatusOracle: Send + Sync {
    async fn lookup(&self, txid: &TxId) -> Result<TxStatus, OracleError>;
}

#[async_trait]
impl<T: StatusOracle + ?Sized> StatusOracle for Arc<T> {
    async fn lookup(&self, txid: &TxId) -> Result<TxStatus, OracleError> {
        (**self).lookup(txid).await
    }
}

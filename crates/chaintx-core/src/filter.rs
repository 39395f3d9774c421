//! Keep only the groups and transactions that have not landed on-chain.
//!
//! A group is checked through its first member only: group commitment is
//! all-or-nothing, so one lookup per group classifies every member.
//!
//! `concurrency` bounds the number of lookups in flight. Results are consumed
//! in input order, so the outcome does not depend on it; `1` is strictly
//! sequential. The first failed lookup aborts the filter.

use futures::stream::{self, StreamExt, TryStreamExt};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::FilterError;
use crate::group::Group;
use crate::oracle::{StatusOracle, TxStatus};
use crate::record::{GroupId, SignedTxnRecord};

/// Return the groups whose first transaction is not on-chain.
pub async fn filter_unsent_groups<O>(
    groups: IndexMap<GroupId, Group>,
    oracle: &O,
    concurrency: usize,
) -> Result<IndexMap<GroupId, Group>, FilterError>
where
    O: StatusOracle + ?Sized,
{
    let statuses: Vec<TxStatus> = stream::iter(groups.values())
        .map(|group| async move {
            let txid = group.first().txid();
            let status = oracle
                .lookup(txid)
                .await
                .map_err(|source| FilterError::Group {
                    group: group.id(),
                    txid: txid.clone(),
                    source,
                })?;
            debug!(group = %group.id(), txid = %txid, members = group.len(), %status, "group status");
            Ok::<_, FilterError>(status)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok(groups
        .into_iter()
        .zip(statuses)
        .filter(|(_, status)| *status == TxStatus::NotSent)
        .map(|(entry, _)| entry)
        .collect())
}

/// Return the individual transactions that are not on-chain.
pub async fn filter_unsent_txs<O>(
    txs: Vec<SignedTxnRecord>,
    oracle: &O,
    concurrency: usize,
) -> Result<Vec<SignedTxnRecord>, FilterError>
where
    O: StatusOracle + ?Sized,
{
    let statuses: Vec<TxStatus> = stream::iter(txs.iter())
        .map(|tx| async move {
            let txid = tx.txid();
            let status = oracle
                .lookup(txid)
                .await
                .map_err(|source| FilterError::Transaction {
                    txid: txid.clone(),
                    source,
                })?;
            debug!(txid = %txid, %status, "transaction status");
            Ok::<_, FilterError>(status)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok(txs
        .into_iter()
        .zip(statuses)
        .filter(|(_, status)| *status == TxStatus::NotSent)
        .map(|(tx, _)| tx)
        .collect())
}

//! Partitioning decoded records into atomic groups and individual transactions.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{DecodeError, GroupError};
use crate::record::{GroupId, SignedTxnRecord};

/// A non-empty run of transactions sharing one group digest, in stream order.
///
/// All members commit atomically on-chain, so the first member stands in for
/// the whole group when checking status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    txns: Vec<SignedTxnRecord>,
}

impl Group {
    /// Open a group with its first member.
    pub fn new(id: GroupId, first: SignedTxnRecord) -> Self {
        Self {
            id,
            txns: vec![first],
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn push(&mut self, txn: SignedTxnRecord) {
        self.txns.push(txn);
    }

    /// The member whose status represents the group.
    ///
    /// # Panics
    /// If the group is empty, which construction rules out.
    pub fn first(&self) -> &SignedTxnRecord {
        match self.txns.first() {
            Some(txn) => txn,
            None => panic!("group {} has no transactions", self.id),
        }
    }

    pub fn txns(&self) -> &[SignedTxnRecord] {
        &self.txns
    }

    pub fn len(&self) -> usize {
        self.txns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }

    pub fn into_txns(self) -> Vec<SignedTxnRecord> {
        self.txns
    }
}

/// The contents of one transaction file, split by commitment unit.
///
/// Groups keep first-seen order so flattening is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxBatch {
    pub groups: IndexMap<GroupId, Group>,
    pub individuals: Vec<SignedTxnRecord>,
}

impl TxBatch {
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    /// Total number of transactions, grouped or not.
    pub fn txn_count(&self) -> usize {
        self.groups.values().map(Group::len).sum::<usize>() + self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.individuals.is_empty()
    }

    /// Flatten into one list: grouped transactions first (group by group),
    /// then individual transactions.
    pub fn into_records(self) -> Vec<SignedTxnRecord> {
        let mut out = Vec::with_capacity(self.txn_count());
        for group in self.groups.into_values() {
            out.extend(group.into_txns());
        }
        out.extend(self.individuals);
        out
    }
}

/// Partition a decoded stream in one pass.
///
/// Members of a group must be contiguous in the stream; a group digest that
/// reappears after another unit was seen fails with
/// [`GroupError::NonContiguous`] instead of being merged. The first decode
/// error aborts the partition.
pub fn group_records<I>(records: I) -> Result<TxBatch, GroupError>
where
    I: IntoIterator<Item = Result<SignedTxnRecord, DecodeError>>,
{
    let mut batch = TxBatch::default();
    let mut open: Option<GroupId> = None;

    for (index, record) in records.into_iter().enumerate() {
        let record = record?;
        match record.group() {
            None => {
                batch.individuals.push(record);
                open = None;
            }
            Some(gid) if open == Some(gid) => {
                if let Some(group) = batch.groups.get_mut(&gid) {
                    group.push(record);
                }
            }
            Some(gid) => {
                if batch.groups.contains_key(&gid) {
                    return Err(GroupError::NonContiguous { group: gid, index });
                }
                trace!(group = %gid, index, "new group");
                batch.groups.insert(gid, Group::new(gid, record));
                open = Some(gid);
            }
        }
    }

    Ok(batch)
}

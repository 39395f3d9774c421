//! chaintx-core — find the signed transactions that never landed on-chain.
//!
//! # Overview
//!
//! A transaction log is a file of back-to-back msgpack signed transactions.
//! This crate:
//!
//! - [`codec`] — streams [`SignedTxnRecord`]s out of a log and encodes them back
//! - [`group`] — splits records into atomic [`Group`]s and individual transactions
//! - [`StatusOracle`] — the lookup seam for "is this transaction on-chain?"
//! - [`filter`] — keeps the unsent groups (checked via their first member) and
//!   unsent individual transactions
//! - [`writer`] — writes the unsent subset to `<input>.unsent`
//! - [`Processor`] — runs the whole pipeline over a list of files

pub mod codec;
pub mod error;
pub mod filter;
pub mod group;
pub mod oracle;
pub mod processor;
pub mod record;
pub mod writer;

#[cfg(test)]
mod fixtures;

pub use codec::{encode_records, TxDecoder};
pub use error::{DecodeError, FileError, FilterError, GroupError, OracleError, WriteError};
pub use filter::{filter_unsent_groups, filter_unsent_txs};
pub use group::{group_records, Group, TxBatch};
pub use oracle::{StatusOracle, TxStatus};
pub use processor::{read_tx_file, FileReport, FileStage, Processor, ProcessorConfig, RunSummary};
pub use record::{GroupId, SignedTxnRecord, TxId, GROUP_ID_LEN};
pub use writer::{unsent_path, write_records, OUTPUT_SUFFIX};

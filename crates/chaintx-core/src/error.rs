//! Error types for the decode → group → classify → write pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::{GroupId, TxId};

/// Errors raised while decoding a transaction log.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The underlying reader failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The msgpack stream is truncated or malformed.
    #[error("error while decoding txn #{index}: {source}")]
    Msgpack {
        index: usize,
        #[source]
        source: rmpv::decode::Error,
    },

    /// The record is valid msgpack but not a signed transaction.
    #[error("malformed txn #{index}: {reason}")]
    Malformed { index: usize, reason: String },
}

/// Errors raised while partitioning decoded records into groups.
#[derive(Debug, Error)]
pub enum GroupError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A group id reappeared after a different group or an individual
    /// transaction had already been seen.
    #[error("group {group} is not contiguous: txn #{index} reopens it")]
    NonContiguous { group: GroupId, index: usize },
}

/// Errors from a transaction status lookup.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Transport failure (connection refused, timeout, TLS, …).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with a status other than success or not-found.
    #[error("unexpected HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A success response whose body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A status lookup failed while filtering; no partial result is returned.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("failed getting status of tx {txid} in group {group}: {source}")]
    Group {
        group: GroupId,
        txid: TxId,
        #[source]
        source: OracleError,
    },

    #[error("failed getting status of tx {txid}: {source}")]
    Transaction {
        txid: TxId,
        #[source]
        source: OracleError,
    },
}

/// Persisting the unsent transactions failed.
#[derive(Debug, Error)]
#[error("failed to write txs to {}: {source}", .path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Processing a single transaction file failed.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("error while opening {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error while reading {}: {source}", .path.display())]
    Group {
        path: PathBuf,
        #[source]
        source: GroupError,
    },

    #[error("error while classifying {}: {source}", .path.display())]
    Filter {
        path: PathBuf,
        #[source]
        source: FilterError,
    },

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl FileError {
    /// The path this error refers to; the output path for write failures.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Open { path, .. } | Self::Group { path, .. } | Self::Filter { path, .. } => path,
            Self::Write(err) => &err.path,
        }
    }
}

//! Shared helpers: msgpack fixtures and a scripted status oracle.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chaintx_core::{OracleError, SignedTxnRecord, StatusOracle, TxDecoder, TxId, TxStatus};
use rmpv::Value;

/// A canonically encoded signed payment transaction.
pub fn signed_txn(seed: u8, group: Option<[u8; 32]>) -> Vec<u8> {
    let mut txn = vec![
        (Value::from("amt"), Value::from(5_000 + u64::from(seed))),
        (Value::from("fee"), Value::from(1_000u64)),
        (Value::from("fv"), Value::from(41_000_000u64)),
        (Value::from("gh"), Value::Binary(vec![0x48; 32])),
    ];
    if let Some(gid) = group {
        txn.push((Value::from("grp"), Value::Binary(gid.to_vec())));
    }
    txn.extend([
        (Value::from("lv"), Value::from(41_001_000u64)),
        (Value::from("rcv"), Value::Binary(vec![seed; 32])),
        (Value::from("snd"), Value::Binary(vec![0x5A; 32])),
        (Value::from("type"), Value::from("pay")),
    ]);
    let stx = Value::Map(vec![
        (Value::from("sig"), Value::Binary(vec![seed; 64])),
        (Value::from("txn"), Value::Map(txn)),
    ]);
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, &stx).unwrap();
    buf
}

pub fn txid_of(encoded: &[u8]) -> TxId {
    TxDecoder::new(encoded).next().unwrap().unwrap().txid().clone()
}

pub fn decode_file(path: &Path) -> Vec<SignedTxnRecord> {
    let bytes = std::fs::read(path).unwrap();
    TxDecoder::new(bytes.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

pub fn write_log(dir: &Path, name: &str, records: &[Vec<u8>]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, records.concat()).unwrap();
    path
}

/// Answers from fixed sets and records every lookup.
#[derive(Default)]
pub struct MockOracle {
    sent: HashSet<TxId>,
    failing: HashSet<TxId>,
    all_sent: bool,
    calls: Mutex<Vec<TxId>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every lookup answers `Sent`.
    pub fn everything_sent() -> Self {
        Self {
            all_sent: true,
            ..Self::default()
        }
    }

    pub fn with_sent(mut self, txid: TxId) -> Self {
        self.sent.insert(txid);
        self
    }

    pub fn with_failure(mut self, txid: TxId) -> Self {
        self.failing.insert(txid);
        self
    }

    pub fn calls(&self) -> Vec<TxId> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusOracle for MockOracle {
    async fn lookup(&self, txid: &TxId) -> Result<TxStatus, OracleError> {
        self.calls.lock().unwrap().push(txid.clone());
        if self.failing.contains(txid) {
            return Err(OracleError::Http("connection refused".into()));
        }
        if self.all_sent || self.sent.contains(txid) {
            Ok(TxStatus::Sent)
        } else {
            Ok(TxStatus::NotSent)
        }
    }
}

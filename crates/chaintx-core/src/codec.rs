//! MessagePack framing for signed transaction logs.
//!
//! A log is a plain concatenation of msgpack maps, one per signed
//! transaction, with no header, length prefix or checksum. Each map carries
//! the unsigned transaction under `"txn"`; the group digest, when present,
//! lives at `txn.grp`.
//!
//! Records are re-encoded with minimal-width markers in their original key
//! order, so canonically encoded input round-trips byte for byte.

use std::io::BufRead;

use bytes::Bytes;
use rmpv::Value;

use crate::error::DecodeError;
use crate::record::{GroupId, SignedTxnRecord, TxId, GROUP_ID_LEN};

const TXN_KEY: &str = "txn";
const GROUP_KEY: &str = "grp";

/// Streams [`SignedTxnRecord`]s out of a reader until it is exhausted.
///
/// End of input between two records ends the sequence; anything else that
/// stops a record from decoding yields one error, after which the decoder
/// is fused.
pub struct TxDecoder<R> {
    reader: R,
    index: usize,
    failed: bool,
}

impl<R: BufRead> TxDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            index: 0,
            failed: false,
        }
    }

    /// Number of records successfully decoded so far.
    pub fn records_read(&self) -> usize {
        self.index
    }

    fn at_end(&mut self) -> Result<bool, DecodeError> {
        Ok(self.reader.fill_buf()?.is_empty())
    }
}

impl<R: BufRead> Iterator for TxDecoder<R> {
    type Item = Result<SignedTxnRecord, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = match self.at_end() {
            Ok(true) => return None,
            Ok(false) => {
                let index = self.index;
                rmpv::decode::read_value(&mut self.reader)
                    .map_err(|source| DecodeError::Msgpack { index, source })
                    .and_then(|value| record_from_value(index, &value))
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => self.index += 1,
            Err(_) => self.failed = true,
        }
        Some(result)
    }
}

/// Concatenate the encodings of `records` in iteration order.
pub fn encode_records<'a, I>(records: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a SignedTxnRecord>,
{
    let mut out = Vec::new();
    for record in records {
        out.extend_from_slice(record.encoded());
    }
    out
}

fn record_from_value(index: usize, value: &Value) -> Result<SignedTxnRecord, DecodeError> {
    let Value::Map(fields) = value else {
        return Err(malformed(index, "record is not a map"));
    };
    let txn = lookup(fields, TXN_KEY).ok_or_else(|| malformed(index, "missing \"txn\""))?;
    let Value::Map(txn_fields) = txn else {
        return Err(malformed(index, "\"txn\" is not a map"));
    };

    let group = match lookup(txn_fields, GROUP_KEY) {
        None => None,
        Some(Value::Binary(raw)) => {
            let digest: [u8; GROUP_ID_LEN] = raw.as_slice().try_into().map_err(|_| {
                malformed(index, format!("\"grp\" is {} bytes, want {GROUP_ID_LEN}", raw.len()))
            })?;
            Some(GroupId(digest))
        }
        Some(_) => return Err(malformed(index, "\"grp\" is not binary")),
    };

    let txid = TxId::from_unsigned_txn(&encode_value(index, txn)?);
    let encoded = Bytes::from(encode_value(index, value)?);
    Ok(SignedTxnRecord::new(encoded, group, txid))
}

fn lookup<'a>(fields: &'a [(Value, Value)], key: &str) -> Option<&'a Value> {
    fields
        .iter()
        .find(|(k, _)| k.as_str() == Some(key))
        .map(|(_, v)| v)
}

fn encode_value(index: usize, value: &Value) -> Result<Vec<u8>, DecodeError> {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, value)
        .map_err(|e| malformed(index, format!("cannot re-encode: {e}")))?;
    Ok(buf)
}

fn malformed(index: usize, reason: impl Into<String>) -> DecodeError {
    DecodeError::Malformed {
        index,
        reason: reason.into(),
    }
}

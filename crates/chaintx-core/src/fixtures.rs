//! Canonical msgpack signed transactions for unit tests.

use rmpv::Value;

use crate::codec::TxDecoder;
use crate::record::{SignedTxnRecord, GROUP_ID_LEN};

/// A payment transaction with sorted keys, as a wallet would sign it.
pub fn signed_txn_value(seed: u8, group: Option<[u8; GROUP_ID_LEN]>) -> Value {
    let mut txn = vec![
        (Value::from("amt"), Value::from(1_000 + u64::from(seed))),
        (Value::from("fee"), Value::from(1_000u64)),
        (Value::from("fv"), Value::from(30_000_000u64)),
    ];
    if let Some(gid) = group {
        txn.push((Value::from("grp"), Value::Binary(gid.to_vec())));
    }
    txn.extend([
        (Value::from("lv"), Value::from(30_001_000u64)),
        (Value::from("rcv"), Value::Binary(vec![seed; 32])),
        (Value::from("snd"), Value::Binary(vec![0xAA; 32])),
        (Value::from("type"), Value::from("pay")),
    ]);
    Value::Map(vec![
        (Value::from("sig"), Value::Binary(vec![seed; 64])),
        (Value::from("txn"), Value::Map(txn)),
    ])
}

pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, value).unwrap();
    buf
}

pub fn signed_txn(seed: u8, group: Option<[u8; GROUP_ID_LEN]>) -> Vec<u8> {
    encode(&signed_txn_value(seed, group))
}

pub fn record(seed: u8, group: Option<[u8; GROUP_ID_LEN]>) -> SignedTxnRecord {
    TxDecoder::new(signed_txn(seed, group).as_slice())
        .next()
        .unwrap()
        .unwrap()
}

//! Signed transaction records and the identifiers extracted from them.

use bytes::Bytes;
use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha512_256};

/// Length in bytes of a group digest.
pub const GROUP_ID_LEN: usize = 32;

/// Domain separation prefix hashed in front of an unsigned transaction.
const TXID_DOMAIN: &[u8] = b"TX";

/// The digest shared by every transaction of an atomic group.
///
/// The all-zero digest means "not grouped" and is never stored on a
/// [`SignedTxnRecord`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub [u8; GROUP_ID_LEN]);

impl GroupId {
    pub const ZERO: Self = Self([0u8; GROUP_ID_LEN]);

    pub fn is_zero(&self) -> bool {
        self.0 == Self::ZERO.0
    }

    pub fn as_bytes(&self) -> &[u8; GROUP_ID_LEN] {
        &self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&BASE32_NOPAD.encode(&self.0))
    }
}

impl std::fmt::Debug for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GroupId({self})")
    }
}

/// Canonical transaction identifier, the key used for status lookups.
///
/// Computed as `base32(SHA-512/256("TX" || msgpack(txn)))` without padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId(String);

impl TxId {
    /// Wrap an already-computed identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the identifier from the encoded unsigned transaction.
    ///
    /// The bytes are hashed as given. They must be the canonical encoding
    /// (sorted keys, empty fields omitted) for the result to match the
    /// identifier the network assigned.
    pub fn from_unsigned_txn(encoded_txn: &[u8]) -> Self {
        let mut hasher = Sha512_256::new();
        hasher.update(TXID_DOMAIN);
        hasher.update(encoded_txn);
        Self(BASE32_NOPAD.encode(&hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One decoded signed transaction.
///
/// The record keeps its msgpack encoding so it can be written back without
/// touching fields this crate does not interpret. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTxnRecord {
    encoded: Bytes,
    group: Option<GroupId>,
    txid: TxId,
}

impl SignedTxnRecord {
    pub(crate) fn new(encoded: Bytes, group: Option<GroupId>, txid: TxId) -> Self {
        Self {
            encoded,
            group: group.filter(|g| !g.is_zero()),
            txid,
        }
    }

    /// The group this transaction belongs to, `None` for individual transactions.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn txid(&self) -> &TxId {
        &self.txid
    }

    /// The record's msgpack encoding.
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_group_is_dropped() {
        let rec = SignedTxnRecord::new(Bytes::new(), Some(GroupId::ZERO), TxId::new("A"));
        assert_eq!(rec.group(), None);

        let gid = GroupId([7u8; GROUP_ID_LEN]);
        let rec = SignedTxnRecord::new(Bytes::new(), Some(gid), TxId::new("A"));
        assert_eq!(rec.group(), Some(gid));
    }

    #[test]
    fn txid_shape() {
        let id = TxId::from_unsigned_txn(&[0x80]);
        // 32-byte digest → 52 base32 characters without padding
        assert_eq!(id.as_str().len(), 52);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c)));
    }

    #[test]
    fn txid_is_domain_separated() {
        let payload = [0x81, 0xa3, b'a', b'm', b't', 0x01];
        let id = TxId::from_unsigned_txn(&payload);

        let mut plain = Sha512_256::new();
        plain.update(payload);
        assert_ne!(id.as_str(), BASE32_NOPAD.encode(&plain.finalize()));

        let mut prefixed = Sha512_256::new();
        prefixed.update(b"TX");
        prefixed.update(payload);
        assert_eq!(id.as_str(), BASE32_NOPAD.encode(&prefixed.finalize()));
    }

    #[test]
    fn txid_hashes_encoding_as_given() {
        // {"amt": 1, "fee": 2} and the same map with keys swapped
        let sorted = [0x82, 0xa3, b'a', b'm', b't', 0x01, 0xa3, b'f', b'e', b'e', 0x02];
        let swapped = [0x82, 0xa3, b'f', b'e', b'e', 0x02, 0xa3, b'a', b'm', b't', 0x01];
        assert_ne!(
            TxId::from_unsigned_txn(&sorted),
            TxId::from_unsigned_txn(&swapped)
        );
    }

    #[test]
    fn group_id_display_is_base32() {
        let gid = GroupId([0xffu8; GROUP_ID_LEN]);
        assert_eq!(gid.to_string(), BASE32_NOPAD.encode(&[0xffu8; GROUP_ID_LEN]));
        assert!(GroupId::ZERO.is_zero());
        assert!(!gid.is_zero());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Raw SHA-256 digest bytes. Empty for the genesis block's predecessor.
pub type BlockHash = Vec<u8>;

/// A ledger record bound to its predecessor by `prev_hash`.
///
/// The `hash` field covers `prev_hash`, `payload` and `timestamp`; any change
/// to those fields after construction is detected by [`Block::verify`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    /// Creation time in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Opaque application data.
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
    /// Hash of the previous block in the chain.
    #[serde(with = "hex::serde")]
    pub prev_hash: BlockHash,
    /// Digest of this block's contents.
    #[serde(with = "hex::serde")]
    pub hash: BlockHash,
}

impl Block {
    /// Create a new block stamped with the current time; hash is computed automatically.
    pub fn new(payload: Vec<u8>, prev_hash: BlockHash) -> Self {
        Self::with_timestamp(payload, prev_hash, Utc::now().timestamp())
    }

    /// Create a block with an explicit timestamp (for testing / determinism).
    pub fn with_timestamp(payload: Vec<u8>, prev_hash: BlockHash, timestamp: i64) -> Self {
        let hash = compute_hash(&prev_hash, &payload, timestamp);
        Self {
            timestamp,
            payload,
            prev_hash,
            hash,
        }
    }

    /// Verify the block's integrity.
    pub fn verify(&self) -> bool {
        compute_hash(&self.prev_hash, &self.payload, self.timestamp) == self.hash
    }

    /// The creation time as a UTC instant, if the timestamp is in range.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// First 8 hex characters of the hash.
    pub fn short_hash(&self) -> String {
        let mut s = hex::encode(&self.hash);
        s.truncate(8);
        s
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prev. hash: {}", hex::encode(&self.prev_hash))?;
        writeln!(f, "Data:       {}", String::from_utf8_lossy(&self.payload))?;
        writeln!(f, "Hash:       {}", hex::encode(&self.hash))?;
        Ok(())
    }
}

/// Compute the SHA-256 digest of `prev_hash ++ payload ++ timestamp`.
///
/// The timestamp is encoded as its decimal string. Fields are joined without
/// separators, so the boundary between `prev_hash` and `payload` cannot be
/// recovered from the digest input.
pub fn compute_hash(prev_hash: &[u8], payload: &[u8], timestamp: i64) -> BlockHash {
    let mut hasher = Sha256::new();
    hasher.update(prev_hash);
    hasher.update(payload);
    hasher.update(timestamp.to_string().as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let h1 = compute_hash(b"prev", b"data", 1_700_000_000);
        let h2 = compute_hash(b"prev", b"data", 1_700_000_000);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 32);
    }

    #[test]
    fn hash_matches_concatenated_digest() {
        let expected = Sha256::digest(b"prevdata1700000000").to_vec();
        assert_eq!(compute_hash(b"prev", b"data", 1_700_000_000), expected);
    }

    #[test]
    fn empty_inputs_hash_timestamp_only() {
        let expected = Sha256::digest(b"0").to_vec();
        assert_eq!(compute_hash(b"", b"", 0), expected);
    }

    #[test]
    fn negative_timestamp_encoded_with_sign() {
        let expected = Sha256::digest(b"x-5").to_vec();
        assert_eq!(compute_hash(b"", b"x", -5), expected);
    }

    #[test]
    fn field_boundary_is_not_part_of_digest() {
        // Moving a byte across the prev_hash/payload boundary yields the same input.
        let h1 = compute_hash(b"abc", b"def", 42);
        let h2 = compute_hash(b"ab", b"cdef", 42);
        assert_eq!(h1, h2);
    }

    #[test]
    fn new_block_verifies() {
        let b = Block::new(b"hello".to_vec(), Vec::new());
        assert!(b.verify());
        assert!(b.prev_hash.is_empty());
        assert_eq!(b.hash.len(), 32);
    }

    #[test]
    fn stored_hash_rederives_from_fields() {
        let b = Block::with_timestamp(b"payload".to_vec(), vec![7; 32], 1_234);
        assert_eq!(compute_hash(&b.prev_hash, &b.payload, b.timestamp), b.hash);
    }

    #[test]
    fn tampered_payload_fails_verify() {
        let mut b = Block::with_timestamp(b"original".to_vec(), Vec::new(), 10);
        b.payload = b"tampered".to_vec();
        assert!(!b.verify());
    }

    #[test]
    fn tampered_timestamp_fails_verify() {
        let mut b = Block::with_timestamp(b"data".to_vec(), Vec::new(), 10);
        b.timestamp += 1;
        assert!(!b.verify());
    }

    #[test]
    fn tampered_prev_hash_fails_verify() {
        let mut b = Block::with_timestamp(b"data".to_vec(), vec![1; 32], 10);
        b.prev_hash[0] ^= 0xff;
        assert!(!b.verify());
    }

    #[test]
    fn tampered_hash_fails_verify() {
        let mut b = Block::with_timestamp(b"data".to_vec(), Vec::new(), 10);
        b.hash[0] ^= 0x01;
        assert!(!b.verify());
    }

    #[test]
    fn created_at_converts_seconds() {
        let b = Block::with_timestamp(Vec::new(), Vec::new(), 86_400);
        let dt = b.created_at().unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "1970-01-02");
    }

    #[test]
    fn short_hash_is_eight_hex_chars() {
        let b = Block::with_timestamp(b"x".to_vec(), Vec::new(), 1);
        let short = b.short_hash();
        assert_eq!(short.len(), 8);
        assert!(hex::encode(&b.hash).starts_with(&short));
    }

    #[test]
    fn display_shows_three_fields() {
        let b = Block::with_timestamp(b"Send 1 BTC".to_vec(), vec![0xab, 0xcd], 1);
        let text = b.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("abcd"));
        assert!(lines[1].ends_with("Send 1 BTC"));
        assert!(lines[2].ends_with(&hex::encode(&b.hash)));
    }

    #[test]
    fn serializes_bytes_as_hex() {
        let b = Block::with_timestamp(b"hi".to_vec(), vec![0x01, 0x02], 5);
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["payload"], "6869");
        assert_eq!(json["prev_hash"], "0102");
        assert_eq!(json["timestamp"], 5);
        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, b);
    }
}

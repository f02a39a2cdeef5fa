// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TX_HASH_BYTES: usize = 32;

/// A 32-byte transaction hash, rendered as `0x`-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxHash(pub [u8; TX_HASH_BYTES]);

impl TxHash {
    pub fn zero() -> Self {
        Self([0; TX_HASH_BYTES])
    }

    /// A fabricated hash for simulated receipts.
    pub fn random() -> Self {
        Self(rand::thread_rng().gen())
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(encoded: &str) -> Result<Self, &'static str> {
        let stripped = encoded.strip_prefix("0x").ok_or("hash must be 0x prefixed")?;
        if stripped.len() != TX_HASH_BYTES * 2 {
            return Err("invalid hash length");
        }
        let mut buf = [0; TX_HASH_BYTES];
        hex::decode_to_slice(stripped, &mut buf).map_err(|_| "invalid hash hex")?;
        Ok(Self(buf))
    }
}

impl Serialize for TxHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        String::serialize(&self.to_hex(), serializer)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = String::deserialize(deserializer)?;
        TxHash::from_hex(&string).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("TxHash").field(&self.to_hex()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_codec() {
        let hash = TxHash([0xab; 32]);
        let encoded = hash.to_hex();
        assert_eq!(encoded.len(), 66);
        assert_eq!(TxHash::from_hex(&encoded).unwrap(), hash);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(TxHash::from_hex("abab").is_err());
        assert!(TxHash::from_hex("0xabab").is_err());
        assert!(TxHash::from_hex(&format!("0x{}", "zz".repeat(32))).is_err());
    }

    #[test]
    fn random_hashes_are_distinct() {
        assert_ne!(TxHash::random(), TxHash::random());
    }
}

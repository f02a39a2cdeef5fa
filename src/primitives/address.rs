// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

pub const ADDRESS_BYTES: usize = 20;

/// A 20-byte EVM account address.
///
/// The string form is `0x`-prefixed hex with an EIP-55 mixed-case checksum.
/// Parsing accepts all-lowercase and all-uppercase input without a checksum
/// check; mixed-case input must carry a valid checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl Address {
    pub fn zero() -> Self {
        Self([0; ADDRESS_BYTES])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; ADDRESS_BYTES]
    }

    pub fn to_bytes(&self) -> [u8; ADDRESS_BYTES] {
        self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
        if bytes.len() != ADDRESS_BYTES {
            return Err("invalid address length");
        }
        let mut buf = [0; ADDRESS_BYTES];
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    pub fn from_hex(encoded: &str) -> Result<Self, &'static str> {
        let stripped = encoded.strip_prefix("0x").ok_or("address must be 0x prefixed")?;
        if stripped.len() != ADDRESS_BYTES * 2 {
            return Err("invalid address length");
        }
        let mut buf = [0; ADDRESS_BYTES];
        hex::decode_to_slice(stripped, &mut buf).map_err(|_| "invalid address hex")?;
        let address = Self(buf);

        let has_upper = stripped.bytes().any(|b| b.is_ascii_uppercase());
        let has_lower = stripped.bytes().any(|b| b.is_ascii_lowercase());
        if has_upper && has_lower && encoded != address.to_checksum_string() {
            return Err("invalid address checksum");
        }

        Ok(address)
    }

    /// EIP-55 mixed-case encoding: a hex letter is uppercased when the
    /// corresponding nibble of `keccak256(lowercase_hex)` is >= 8.
    pub fn to_checksum_string(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = Keccak256::digest(lower.as_bytes());
        let mut out = String::with_capacity(2 + ADDRESS_BYTES * 2);
        out.push_str("0x");

        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                digest[i / 2] >> 4
            } else {
                digest[i / 2] & 0x0f
            };

            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }

        out
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        String::serialize(&self.to_checksum_string(), serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = String::deserialize(deserializer)?;
        Address::from_hex(&string).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_checksum_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Address")
            .field(&self.to_checksum_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test addresses from the EIP-55 reference vectors.
    const CHECKSUMMED: &[&str] = &[
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn checksum_encoding_matches_reference_vectors() {
        for expected in CHECKSUMMED {
            let address = Address::from_hex(&expected.to_lowercase()).unwrap();
            assert_eq!(&address.to_checksum_string(), expected);
        }
    }

    #[test]
    fn checksummed_input_roundtrips() {
        for encoded in CHECKSUMMED {
            let address = Address::from_hex(encoded).unwrap();
            assert_eq!(&address.to_string(), encoded);
        }
    }

    #[test]
    fn bad_checksum_is_rejected() {
        // Flip the case of the first letter of a valid checksummed address
        let bad = "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert_eq!(Address::from_hex(bad), Err("invalid address checksum"));
    }

    #[test]
    fn lowercase_and_uppercase_skip_the_checksum() {
        let lower = CHECKSUMMED[0].to_lowercase();
        let upper = format!("0x{}", lower.trim_start_matches("0x").to_uppercase());
        assert_eq!(
            Address::from_hex(&lower).unwrap(),
            Address::from_hex(&upper).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(Address::from_hex("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
        assert!(Address::from_hex("0x5aAeb6").is_err());
        assert!(Address::from_hex("0xzz5aAeb6053F3E94C9b9A09f33669435E7Ef1Be").is_err());
    }

    #[test]
    fn zero_address() {
        let zero = Address::zero();
        assert!(zero.is_zero());
        assert_eq!(
            zero.to_checksum_string(),
            "0x0000000000000000000000000000000000000000"
        );
        assert!(!Address::from_hex(CHECKSUMMED[0]).unwrap().is_zero());
    }

    #[test]
    fn serde_uses_the_string_form() {
        let address = Address::from_hex(CHECKSUMMED[1]).unwrap();
        let encoded = serde_json::to_string(&address).unwrap();
        assert_eq!(encoded, format!("\"{}\"", CHECKSUMMED[1]));
        let decoded: Address = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, address);
    }
}

// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! Calldata encoding for the three vault contract entry points. All
//! arguments are static types, so encoding is selector + 32-byte words.

use sha3::{Digest, Keccak256};

use crate::primitives::{Address, GriefTier};

pub const WORD_BYTES: usize = 32;

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// First four bytes of the Keccak-256 hash of the canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

pub fn distribute_yield(author: &Address, tier: GriefTier) -> Vec<u8> {
    let mut data = selector("distributeYield(address,uint8)").to_vec();
    push_address_word(&mut data, author);
    push_uint_word(&mut data, u128::from(tier.get()));
    data
}

pub fn transfer_admin(new_admin: &Address) -> Vec<u8> {
    let mut data = selector("transferAdmin(address)").to_vec();
    push_address_word(&mut data, new_admin);
    data
}

pub fn balance_of(owner: &Address) -> Vec<u8> {
    let mut data = selector("balanceOf(address)").to_vec();
    push_address_word(&mut data, owner);
    data
}

/// Decodes a single unsigned return word. The value must fit in a u128.
pub fn decode_uint_word(data: &[u8]) -> Result<u128, &'static str> {
    if data.len() != WORD_BYTES {
        return Err("return data is not a single word");
    }
    if data[..16].iter().any(|b| *b != 0) {
        return Err("return value overflows u128");
    }
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&data[16..]);
    Ok(u128::from_be_bytes(buf))
}

fn push_address_word(out: &mut Vec<u8>, address: &Address) {
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(&address.to_bytes());
}

fn push_uint_word(out: &mut Vec<u8>, value: u128) {
    out.extend_from_slice(&[0u8; 16]);
    out.extend_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_empty_vector() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn well_known_selectors() {
        // Reference values from the ERC-20 ABI
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(
            selector("transfer(address,uint256)"),
            [0xa9, 0x05, 0x9c, 0xbb]
        );
    }

    #[test]
    fn distribute_yield_layout() {
        let author =
            Address::from_hex("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        let tier = GriefTier::new(4).unwrap();
        let data = distribute_yield(&author, tier);

        assert_eq!(data.len(), 4 + 2 * WORD_BYTES);
        assert_eq!(data[..4], selector("distributeYield(address,uint8)"));
        // Address is right-aligned in the first word
        assert_eq!(data[4..16], [0u8; 12]);
        assert_eq!(data[16..36], author.to_bytes());
        // Tier is right-aligned in the second word
        assert_eq!(data[36..67], [0u8; 31]);
        assert_eq!(data[67], 4);
    }

    #[test]
    fn balance_of_layout() {
        let owner = Address::zero();
        let data = balance_of(&owner);
        assert_eq!(data.len(), 4 + WORD_BYTES);
        assert_eq!(data[..4], [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(data[4..], [0u8; 32]);
    }

    #[test]
    fn decode_uint_word_roundtrip() {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&42u128.to_be_bytes());
        assert_eq!(decode_uint_word(&word), Ok(42));
    }

    #[test]
    fn decode_uint_word_rejects_oversized_values() {
        let word = [0xff; 32];
        assert_eq!(
            decode_uint_word(&word),
            Err("return value overflows u128")
        );
        assert!(decode_uint_word(&[0u8; 31]).is_err());
    }
}

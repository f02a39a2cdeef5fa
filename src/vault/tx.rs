// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! Legacy (type-0) transaction encoding and EIP-155 signing. The vault
//! submits with fixed gas constants, so the pre-EIP-1559 format is all
//! that is needed.

use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroizing;

use super::abi::keccak256;
use crate::primitives::{Address, ADDRESS_BYTES};

#[derive(Debug, Clone)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: Address,
    pub value: u128,
    pub data: Vec<u8>,
}

impl LegacyTransaction {
    /// Keccak-256 of the EIP-155 signing payload
    /// `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`.
    pub fn sighash(&self, chain_id: u64) -> [u8; 32] {
        keccak256(&self.signing_payload(chain_id))
    }

    pub(crate) fn signing_payload(&self, chain_id: u64) -> Vec<u8> {
        let mut items = self.base_items();
        items.push(encode_uint(u128::from(chain_id)));
        items.push(encode_uint(0));
        items.push(encode_uint(0));
        encode_list(&items)
    }

    fn base_items(&self) -> Vec<Vec<u8>> {
        vec![
            encode_uint(u128::from(self.nonce)),
            encode_uint(self.gas_price),
            encode_uint(u128::from(self.gas_limit)),
            encode_bytes(&self.to.to_bytes()),
            encode_uint(self.value),
            encode_bytes(&self.data),
        ]
    }
}

/// Holds the distribution wallet key and signs vault transactions.
pub struct TxSigner {
    secp: Secp256k1<All>,
    secret: SecretKey,
    address: Address,
}

impl TxSigner {
    /// `key_hex` is the raw 32-byte signing key, optionally `0x`-prefixed.
    pub fn from_hex(key_hex: &str) -> Result<Self, &'static str> {
        let stripped = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        let bytes =
            Zeroizing::new(hex::decode(stripped).map_err(|_| "invalid private key hex")?);
        let secret = SecretKey::from_slice(&bytes).map_err(|_| "invalid private key")?;
        let secp = Secp256k1::new();
        let public = PublicKey::from_secret_key(&secp, &secret);
        let address = public_key_address(&public);
        Ok(Self {
            secp,
            secret,
            address,
        })
    }

    /// The address transactions are sent from.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the raw signed transaction bytes for `eth_sendRawTransaction`.
    pub fn sign(&self, tx: &LegacyTransaction, chain_id: u64) -> Result<Vec<u8>, &'static str> {
        let message = Message::from_digest_slice(&tx.sighash(chain_id))
            .map_err(|_| "invalid signing hash")?;
        let signature = self.secp.sign_ecdsa_recoverable(&message, &self.secret);
        let (recovery_id, compact) = signature.serialize_compact();

        // EIP-155 recovery id encoding
        let v = chain_id * 2 + 35 + recovery_id.to_i32() as u64;

        let mut items = tx.base_items();
        items.push(encode_uint(u128::from(v)));
        items.push(encode_bytes(trim_leading_zeros(&compact[..32])));
        items.push(encode_bytes(trim_leading_zeros(&compact[32..])));
        Ok(encode_list(&items))
    }
}

fn public_key_address(public: &PublicKey) -> Address {
    let uncompressed = public.serialize_uncompressed();
    // Skip the 0x04 point prefix; the address is the low 20 bytes of the hash
    let digest = keccak256(&uncompressed[1..]);
    let mut buf = [0u8; ADDRESS_BYTES];
    buf.copy_from_slice(&digest[12..]);
    Address(buf)
}

fn encode_length(len: usize, offset: u8) -> Vec<u8> {
    if len <= 55 {
        vec![offset + len as u8]
    } else {
        let len_bytes = (len as u64).to_be_bytes();
        let len_bytes = trim_leading_zeros(&len_bytes);
        let mut out = vec![offset + 55 + len_bytes.len() as u8];
        out.extend_from_slice(len_bytes);
        out
    }
}

fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        return bytes.to_vec();
    }
    let mut out = encode_length(bytes.len(), 0x80);
    out.extend_from_slice(bytes);
    out
}

fn encode_uint(value: u128) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    encode_bytes(trim_leading_zeros(&bytes))
}

fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len: usize = items.iter().map(Vec::len).sum();
    let mut out = encode_length(payload_len, 0xc0);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|b| *b != 0) {
        Some(i) => &bytes[i..],
        None => &[],
    }
}

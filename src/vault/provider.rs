// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! Minimal Ethereum JSON-RPC client covering the five methods the vault
//! wrapper needs. Quantities travel as 0x-prefixed hex strings.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::VaultError;
use crate::primitives::{Address, TxHash};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A JSON-RPC hex quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(pub u64);

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = String::deserialize(deserializer)?;
        let stripped = string
            .strip_prefix("0x")
            .ok_or_else(|| serde::de::Error::custom("quantity must be 0x prefixed"))?;
        u64::from_str_radix(stripped, 16)
            .map(Quantity)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Quantity,
    pub gas_used: Quantity,
    #[serde(default)]
    pub status: Option<Quantity>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcEnvelope<T> {
    #[serde(default = "Option::default")]
    result: Option<T>,
    #[serde(default = "Option::default")]
    error: Option<JsonRpcError>,
}

pub struct Provider {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl Provider {
    pub fn new(url: &str) -> Result<Self, VaultError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            url: url.to_owned(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn chain_id(&self) -> Result<u64, VaultError> {
        let quantity: Quantity = self.request("eth_chainId", json!([])).await?;
        Ok(quantity.0)
    }

    pub async fn transaction_count(
        &self,
        address: &Address,
        block: &str,
    ) -> Result<u64, VaultError> {
        let quantity: Quantity = self
            .request(
                "eth_getTransactionCount",
                json!([address.to_checksum_string(), block]),
            )
            .await?;
        Ok(quantity.0)
    }

    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, VaultError> {
        self.request(
            "eth_sendRawTransaction",
            json!([format!("0x{}", hex::encode(raw))]),
        )
        .await
    }

    pub async fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, VaultError> {
        let result: String = self
            .request(
                "eth_call",
                json!([
                    {
                        "to": to.to_checksum_string(),
                        "data": format!("0x{}", hex::encode(data)),
                    },
                    "latest",
                ]),
            )
            .await?;
        hex::decode(result.trim_start_matches("0x"))
            .map_err(|err| VaultError::Response(format!("eth_call returned invalid hex: {err}")))
    }

    pub async fn transaction_receipt(
        &self,
        hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, VaultError> {
        self.request_nullable("eth_getTransactionReceipt", json!([hash.to_hex()]))
            .await
    }

    /// Polls until the transaction is mined or the attempt budget runs out.
    pub async fn wait_for_receipt(
        &self,
        hash: &TxHash,
        attempts: u32,
        interval: Duration,
    ) -> Result<TransactionReceipt, VaultError> {
        for _ in 0..attempts {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            tokio::time::sleep(interval).await;
        }
        Err(VaultError::ReceiptTimeout(*hash))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, VaultError> {
        self.request_nullable(method, params)
            .await?
            .ok_or_else(|| VaultError::Response(format!("{method} returned no result")))
    }

    async fn request_nullable<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<T>, VaultError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let envelope: JsonRpcEnvelope<T> = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = envelope.error {
            return Err(VaultError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(envelope.result)
    }
}

// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! The yield distribution wrapper. Translates validated requests into
//! `distributeYield(author, griefTier)` contract calls against the GTT
//! vault, or fabricates contract-shaped receipts when no vault address
//! is configured (development mode).
//!
//! Distributions are intentionally not idempotent: two identical
//! requests produce two distinct on-chain distributions.

pub mod abi;
pub mod provider;
pub mod tx;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::*;
use parking_lot::RwLock;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

pub use provider::{Provider, TransactionReceipt};
pub use tx::{LegacyTransaction, TxSigner};

use crate::primitives::{Address, Amount, GriefTier, TxHash};
use crate::settings::SETTINGS;

/// Hours a tier stays on cooldown for an address after a claim.
pub const CLAIM_COOLDOWN_HOURS: i64 = 24;

const WEI_PER_GWEI: u128 = 1_000_000_000;

#[derive(Debug, Error)]
pub enum VaultError {
    /// Rejected before any network call is attempted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed provider response: {0}")]
    Response(String),

    #[error("transaction signing failed: {0}")]
    Signing(&'static str),

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("timed out waiting for receipt of {0}")]
    ReceiptTimeout(TxHash),
}

impl VaultError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Validation failures map to HTTP 400, everything else to 500.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// The record produced by one distribution call. Serialized verbatim into
/// HTTP responses, so the key set must stay identical between live and
/// simulated mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    pub yield_amount: Amount,
    pub status: String,
    pub network: String,
    pub timestamp: DateTime<Utc>,
    pub claimed_by: Address,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub id: String,
    pub grief_tier: u8,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
    pub transaction_hash: TxHash,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStatus {
    pub grief_tier: u8,
    pub yield_amount: Amount,
    pub can_claim: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_claim_time: Option<DateTime<Utc>>,
    pub cooldown_hours: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultInfo {
    pub admin_address: Address,
    pub token_address: Address,
    pub network: String,
    pub status: String,
}

/// Everything needed to reach the chain in live mode.
pub struct LiveEndpoint {
    provider: Provider,
    signer: TxSigner,
    chain_id: u64,
    gas_limit: u64,
    gas_price: u128,
    receipt_attempts: u32,
    receipt_interval: Duration,
    // Serializes fetch-nonce/sign/send so concurrent requests cannot
    // race on nonce assignment.
    submit_lock: Mutex<()>,
}

impl LiveEndpoint {
    pub fn new(
        provider: Provider,
        signer: TxSigner,
        chain_id: u64,
        gas_limit: u64,
        gas_price_gwei: u64,
        receipt_attempts: u32,
        receipt_interval: Duration,
    ) -> Self {
        Self {
            provider,
            signer,
            chain_id,
            gas_limit,
            gas_price: u128::from(gas_price_gwei) * WEI_PER_GWEI,
            receipt_attempts,
            receipt_interval,
            submit_lock: Mutex::new(()),
        }
    }
}

enum Mode {
    Live(LiveEndpoint),
    Simulated,
}

pub struct YieldVault {
    vault_address: Address,
    token_address: Address,
    claim_address: Address,
    network: String,
    mode: Mode,
    ledger: RwLock<Vec<ClaimRecord>>,
    cooldowns: RwLock<HashMap<(Address, u8), DateTime<Utc>>>,
}

impl YieldVault {
    /// Development-mode vault. Every call succeeds with a fabricated
    /// receipt shaped exactly like the live one.
    pub fn simulated(token_address: Address, claim_address: Address, network: &str) -> Self {
        Self {
            vault_address: Address::zero(),
            token_address,
            claim_address,
            network: network.to_owned(),
            mode: Mode::Simulated,
            ledger: RwLock::new(Vec::new()),
            cooldowns: RwLock::new(HashMap::new()),
        }
    }

    pub fn live(
        vault_address: Address,
        token_address: Address,
        claim_address: Address,
        network: &str,
        endpoint: LiveEndpoint,
    ) -> Result<Self, VaultError> {
        if vault_address.is_zero() {
            return Err(VaultError::invalid("vault address is the zero address"));
        }
        Ok(Self {
            vault_address,
            token_address,
            claim_address,
            network: network.to_owned(),
            mode: Mode::Live(endpoint),
            ledger: RwLock::new(Vec::new()),
            cooldowns: RwLock::new(HashMap::new()),
        })
    }

    /// Builds the vault the daemon runs with. A zero
    /// `GTT_YIELD_VAULT_ADDRESS` short-circuits into simulated mode.
    pub fn from_settings() -> anyhow::Result<Self> {
        let vault_address = Address::from_hex(&SETTINGS.vault.vault_address)
            .map_err(anyhow::Error::msg)?;
        let token_address = Address::from_hex(&SETTINGS.vault.token_address)
            .map_err(anyhow::Error::msg)?;
        let claim_address = Address::from_hex(&SETTINGS.vault.claim_address)
            .map_err(anyhow::Error::msg)?;
        let network = &SETTINGS.node.network_name;

        if vault_address.is_zero() {
            return Ok(Self::simulated(token_address, claim_address, network));
        }

        let key = SETTINGS
            .vault
            .private_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("ETH_PRIVATE_KEY is required in live mode"))?;
        let signer = TxSigner::from_hex(key).map_err(anyhow::Error::msg)?;
        let provider = Provider::new(&SETTINGS.vault.provider_url)?;
        let endpoint = LiveEndpoint::new(
            provider,
            signer,
            SETTINGS.vault.chain_id,
            SETTINGS.vault.gas_limit,
            SETTINGS.vault.gas_price_gwei,
            SETTINGS.vault.receipt_poll_attempts,
            Duration::from_millis(SETTINGS.vault.receipt_poll_interval_ms),
        );

        Ok(Self::live(
            vault_address,
            token_address,
            claim_address,
            network,
            endpoint,
        )?)
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.mode, Mode::Simulated)
    }

    pub fn claim_address(&self) -> Address {
        self.claim_address
    }

    pub fn info(&self) -> VaultInfo {
        let (admin_address, status) = match &self.mode {
            Mode::Live(endpoint) => (endpoint.signer.address(), "live".to_owned()),
            Mode::Simulated => (self.claim_address, "development".to_owned()),
        };
        VaultInfo {
            admin_address,
            token_address: self.token_address,
            network: self.network.clone(),
            status,
        }
    }

    /// Distributes `griefTier * 10` GTT to `author`. Tier validation
    /// happens before any network call is attempted.
    pub async fn distribute(
        &self,
        author: Address,
        grief_tier: u8,
    ) -> Result<Distribution, VaultError> {
        let tier = GriefTier::new(grief_tier).map_err(VaultError::invalid)?;
        let amount = tier.yield_amount();

        let distribution = match &self.mode {
            Mode::Simulated => self.simulate_receipt(author, amount),
            Mode::Live(endpoint) => {
                let receipt = self
                    .send_contract_call(endpoint, abi::distribute_yield(&author, tier))
                    .await?;
                Distribution {
                    transaction_hash: receipt.transaction_hash,
                    block_number: receipt.block_number.0,
                    gas_used: receipt.gas_used.0,
                    yield_amount: amount,
                    status: "confirmed".to_owned(),
                    network: self.network.clone(),
                    timestamp: Utc::now(),
                    claimed_by: author,
                }
            }
        };

        info!(
            "Distributed {} GTT to {} at tier {} in {}",
            amount, author, tier, distribution.transaction_hash
        );
        self.record(&distribution, tier);
        Ok(distribution)
    }

    /// Distributes to the daemon's configured claim address.
    pub async fn claim(&self, grief_tier: u8) -> Result<Distribution, VaultError> {
        if self.claim_address.is_zero() {
            return Err(VaultError::invalid("no claim address configured"));
        }
        self.distribute(self.claim_address, grief_tier).await
    }

    /// Rotates the vault admin. Returns the transaction hash only; the
    /// caller is expected to watch the chain for the effect.
    pub async fn update_admin(&self, new_admin: Address) -> Result<TxHash, VaultError> {
        if new_admin.is_zero() {
            return Err(VaultError::invalid(
                "new admin cannot be the zero address",
            ));
        }
        match &self.mode {
            Mode::Simulated => Ok(TxHash::random()),
            Mode::Live(endpoint) => {
                let receipt = self
                    .send_contract_call(endpoint, abi::transfer_admin(&new_admin))
                    .await?;
                Ok(receipt.transaction_hash)
            }
        }
    }

    /// GTT balance of the claim address. Live mode reads
    /// `balanceOf(address)` off the token contract; simulated mode sums
    /// the in-memory ledger.
    pub async fn balance(&self) -> Result<Amount, VaultError> {
        match &self.mode {
            Mode::Simulated => {
                let ledger = self.ledger.read();
                let mut total = Amount::zero();
                for record in ledger.iter() {
                    total = total
                        .checked_add(record.amount)
                        .ok_or_else(|| VaultError::Response("balance overflow".to_owned()))?;
                }
                Ok(total)
            }
            Mode::Live(endpoint) => {
                let data = endpoint
                    .provider
                    .call(&self.token_address, &abi::balance_of(&self.claim_address))
                    .await?;
                let wei = abi::decode_uint_word(&data)
                    .map_err(|err| VaultError::Response(err.to_owned()))?;
                Amount::from_wei(wei).map_err(|err| VaultError::Response(err.to_owned()))
            }
        }
    }

    /// Per-tier claim availability for the claim address.
    pub fn claim_status(&self) -> Vec<TierStatus> {
        let cooldowns = self.cooldowns.read();
        let now = Utc::now();

        GriefTier::all()
            .map(|tier| {
                let next = cooldowns
                    .get(&(self.claim_address, tier.get()))
                    .copied()
                    .filter(|until| *until > now);
                TierStatus {
                    grief_tier: tier.get(),
                    yield_amount: tier.yield_amount(),
                    can_claim: next.is_none(),
                    next_claim_time: next,
                    cooldown_hours: CLAIM_COOLDOWN_HOURS,
                }
            })
            .collect()
    }

    /// Distributions performed by this daemon instance, most recent first.
    pub fn claim_history(&self) -> Vec<ClaimRecord> {
        let ledger = self.ledger.read();
        ledger.iter().rev().cloned().collect()
    }

    async fn send_contract_call(
        &self,
        endpoint: &LiveEndpoint,
        data: Vec<u8>,
    ) -> Result<TransactionReceipt, VaultError> {
        // One submission at a time
        let _guard = endpoint.submit_lock.lock().await;

        let from = endpoint.signer.address();
        let nonce = endpoint
            .provider
            .transaction_count(&from, "pending")
            .await?;
        let tx = LegacyTransaction {
            nonce,
            gas_price: endpoint.gas_price,
            gas_limit: endpoint.gas_limit,
            to: self.vault_address,
            value: 0,
            data,
        };
        let raw = endpoint
            .signer
            .sign(&tx, endpoint.chain_id)
            .map_err(VaultError::Signing)?;
        let hash = endpoint.provider.send_raw_transaction(&raw).await?;
        debug!("Submitted vault transaction {} with nonce {}", hash, nonce);

        let receipt = endpoint
            .provider
            .wait_for_receipt(&hash, endpoint.receipt_attempts, endpoint.receipt_interval)
            .await?;
        if let Some(status) = receipt.status {
            if status.0 == 0 {
                return Err(VaultError::Reverted(receipt.transaction_hash));
            }
        }
        Ok(receipt)
    }

    fn simulate_receipt(&self, author: Address, amount: Amount) -> Distribution {
        let mut rng = rand::thread_rng();
        Distribution {
            transaction_hash: TxHash::random(),
            block_number: rng.gen_range(45_000_000..48_000_000),
            gas_used: rng.gen_range(60_000..120_000),
            yield_amount: amount,
            status: "simulated".to_owned(),
            network: self.network.clone(),
            timestamp: Utc::now(),
            claimed_by: author,
        }
    }

    fn record(&self, distribution: &Distribution, tier: GriefTier) {
        let id = hex::encode(rand::thread_rng().gen::<[u8; 8]>());
        self.ledger.write().push(ClaimRecord {
            id,
            grief_tier: tier.get(),
            amount: distribution.yield_amount,
            timestamp: distribution.timestamp,
            transaction_hash: distribution.transaction_hash,
        });
        self.cooldowns.write().insert(
            (distribution.claimed_by, tier.get()),
            distribution.timestamp + ChronoDuration::hours(CLAIM_COOLDOWN_HOURS),
        );
    }
}

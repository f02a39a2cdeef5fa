// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! # GuardianChain Vault
//! The GTT yield-vault daemon. Exposes an HTTP JSON API that validates
//! `{authorAddress, griefTier}` requests and submits
//! `distributeYield(author, griefTier)` transactions to the external GTT
//! vault contract on Polygon.
//!
//! ## Behavior
//! * **Yield formula**: a distribution at grief tier `n` mints exactly
//!   `n * 10` GTT. Tiers outside `[1, 5]` are rejected before any network
//!   call is attempted.
//! * **Development mode**: when `GTT_YIELD_VAULT_ADDRESS` is the zero
//!   address (the default), every endpoint short-circuits into a simulated
//!   branch that fabricates receipts with the exact response shape of the
//!   live branch, so clients cannot tell the modes apart structurally.
//! * **Fixed fees**: live transactions are legacy (type-0) with fixed gas
//!   limit and gas price constants from the configuration. There is no fee
//!   estimation and no resubmission of stuck transactions.
//! * **No dedup**: distributions are not idempotent. Two identical
//!   requests produce two distinct on-chain distributions.
//!
//! ## Configuration
//! Settings load from `GuardianChain/config.toml` under the platform
//! config directory, with `guardianchain_*` environment overrides. The
//! deployment variables `GTT_YIELD_VAULT_ADDRESS`, `GTT_TOKEN_ADDRESS`,
//! `POLYGON_RPC_URL` and `ETH_PRIVATE_KEY` take precedence over both.

pub mod global;
pub mod primitives;
pub mod settings;
pub mod vault;

#[cfg(feature = "rpc")]
pub mod rpc;

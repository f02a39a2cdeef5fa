// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::primitives::Amount;

pub const MIN_GRIEF_TIER: u8 = 1;
pub const MAX_GRIEF_TIER: u8 = 5;

/// GTT minted per grief tier step. This is the single authoritative yield
/// formula; a distribution at tier `n` mints exactly `n * 10` GTT.
pub const YIELD_PER_TIER: u8 = 10;

/// A grief tier, validated to the [1, 5] range at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GriefTier(u8);

impl GriefTier {
    pub fn new(tier: u8) -> Result<Self, &'static str> {
        if !(MIN_GRIEF_TIER..=MAX_GRIEF_TIER).contains(&tier) {
            return Err("grief tier must be an integer between 1 and 5");
        }
        Ok(Self(tier))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = GriefTier> {
        (MIN_GRIEF_TIER..=MAX_GRIEF_TIER).map(GriefTier)
    }

    /// Yield minted for a distribution at this tier.
    pub fn yield_amount(self) -> Amount {
        Amount::new(Decimal::from(self.0) * Decimal::from(YIELD_PER_TIER))
    }
}

impl TryFrom<u8> for GriefTier {
    type Error = &'static str;

    fn try_from(tier: u8) -> Result<Self, Self::Error> {
        Self::new(tier)
    }
}

impl fmt::Display for GriefTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

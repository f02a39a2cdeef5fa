// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The GTT token carries the standard 18 decimals on chain.
pub const GTT_DECIMALS: u32 = 18;

/// A quantity of whole GTT tokens.
///
/// Contract calldata and `balanceOf` return values use 18-decimal base
/// units ("wei"); everything above the ABI layer works in whole tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn to_wei(self) -> Result<u128, &'static str> {
        let scaled = self
            .0
            .checked_mul(Decimal::from(10u64.pow(GTT_DECIMALS)))
            .ok_or("amount out of range")?;
        if !scaled.fract().is_zero() {
            return Err("amount has sub-wei precision");
        }
        scaled.to_u128().ok_or("amount out of range")
    }

    pub fn from_wei(wei: u128) -> Result<Self, &'static str> {
        let mantissa = i128::try_from(wei).map_err(|_| "amount out of range")?;
        if mantissa > Decimal::MAX.mantissa() {
            return Err("amount out of range");
        }
        Ok(Self(
            Decimal::from_i128_with_scale(mantissa, GTT_DECIMALS).normalize(),
        ))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn wei_conversion_roundtrips() {
        let amount = Amount::new(dec!(30));
        let wei = amount.to_wei().unwrap();
        assert_eq!(wei, 30_000_000_000_000_000_000);
        assert_eq!(Amount::from_wei(wei).unwrap(), amount);
    }

    #[test]
    fn fractional_tokens_convert_exactly() {
        let amount = Amount::new(dec!(0.5));
        assert_eq!(amount.to_wei().unwrap(), 500_000_000_000_000_000);
    }

    #[test]
    fn sub_wei_precision_is_rejected() {
        // 19 decimal places cannot be represented on chain
        let amount = Amount::new(Decimal::from_i128_with_scale(1, 19));
        assert_eq!(amount.to_wei(), Err("amount has sub-wei precision"));
    }

    #[test]
    fn oversized_balances_are_rejected() {
        assert!(Amount::from_wei(u128::MAX).is_err());
    }

    #[test]
    fn sums_accumulate() {
        let total = Amount::new(dec!(10))
            .checked_add(Amount::new(dec!(20)))
            .unwrap();
        assert_eq!(total.value(), dec!(30));
    }
}

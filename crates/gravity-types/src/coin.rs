//! Coins and denominations.
//!
//! Amounts are `Decimal` but a coin amount is always a non-negative integer
//! in the denom's base unit. [`Coin::new`] normalizes the scale so that equal
//! amounts render (and hash) identically on every replica.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    EthAddress,
    constants::{MAX_DENOM_LEN, MIN_DENOM_LEN},
};

/// Type alias for denomination identifiers (e.g., "uatom", "gravity0x...").
pub type Denom = String;

/// Why a coin could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinError {
    #[error("invalid denom {0:?}")]
    InvalidDenom(String),

    #[error("negative amount {0}")]
    NegativeAmount(Decimal),

    #[error("fractional amount {0}")]
    FractionalAmount(Decimal),
}

/// Check a denom against `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let invalid = || CoinError::InvalidDenom(denom.to_string());
    if !(MIN_DENOM_LEN..=MAX_DENOM_LEN).contains(&denom.len()) {
        return Err(invalid());
    }
    let mut chars = denom.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-')) {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Voucher denom minted for an Ethereum-originated token: `{prefix}{contract}`.
#[must_use]
pub fn voucher_denom(prefix: &str, contract: &EthAddress) -> Denom {
    format!("{prefix}{contract}")
}

/// A single-denomination amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: Denom,
    pub amount: Decimal,
}

impl Coin {
    /// Build a validated coin.
    ///
    /// # Errors
    /// Returns [`CoinError`] for a malformed denom or a negative/fractional amount.
    pub fn new(denom: impl Into<Denom>, amount: Decimal) -> Result<Self, CoinError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CoinError::NegativeAmount(amount));
        }
        if !amount.fract().is_zero() {
            return Err(CoinError::FractionalAmount(amount));
        }
        Ok(Self {
            denom,
            amount: amount.normalize(),
        })
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

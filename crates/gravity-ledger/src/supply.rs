//! Supply conservation invariant checker.
//!
//! Mathematical invariant enforced after every state transition:
//! ```text
//! ∀ denom: Σ(holdings) == Σ(genesis) + Σ(minted)
//! ```
//!
//! Deposits of host-native coins only move escrowed funds, so they never
//! change supply. Voucher deposits mint and raise it by exactly the amount
//! credited.

use std::collections::BTreeMap;

use gravity_types::{BankError, Denom};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

/// Tracks per-denom issuance and validates it against actual holdings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyConservation {
    /// Coins present at genesis, per denom.
    genesis: BTreeMap<Denom, Decimal>,
    /// Coins minted since genesis, per denom.
    minted: BTreeMap<Denom, Decimal>,
}

/// Actual holdings disagree with recorded issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyViolation {
    pub denom: Denom,
    pub expected: Decimal,
    pub actual: Decimal,
}

impl std::fmt::Display for SupplyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "denom {}: actual supply {} != expected {}",
            self.denom, self.actual, self.expected
        )
    }
}

impl SupplyConservation {
    /// Create a new supply conservation tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record coins that exist from genesis.
    pub fn record_genesis(&mut self, denom: &str, amount: Decimal) -> Result<(), BankError> {
        self.check_headroom(denom, amount)?;
        add(&mut self.genesis, denom, amount)
    }

    /// Record freshly minted coins.
    pub fn record_mint(&mut self, denom: &str, amount: Decimal) -> Result<(), BankError> {
        self.check_headroom(denom, amount)?;
        add(&mut self.minted, denom, amount)
    }

    // Total supply must stay representable, not just each counter.
    fn check_headroom(&self, denom: &str, amount: Decimal) -> Result<(), BankError> {
        self.expected_supply(denom)
            .checked_add(amount)
            .map(|_| ())
            .ok_or_else(|| BankError::Overflow {
                denom: denom.to_string(),
            })
    }

    /// Expected total supply for a denom: genesis + minted.
    #[must_use]
    pub fn expected_supply(&self, denom: &str) -> Decimal {
        self.total_genesis(denom) + self.total_minted(denom)
    }

    #[must_use]
    pub fn total_genesis(&self, denom: &str) -> Decimal {
        self.genesis.get(denom).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn total_minted(&self, denom: &str) -> Decimal {
        self.minted.get(denom).copied().unwrap_or(Decimal::ZERO)
    }

    /// Verify that actual holdings match expected supply for `denom`.
    pub fn verify(&self, denom: &str, actual_supply: Decimal) -> Result<(), SupplyViolation> {
        let expected = self.expected_supply(denom);
        if actual_supply != expected {
            return Err(SupplyViolation {
                denom: denom.to_string(),
                expected,
                actual: actual_supply,
            });
        }
        Ok(())
    }

    /// All tracked denoms, sorted.
    #[must_use]
    pub fn tracked_denoms(&self) -> Vec<Denom> {
        let mut denoms: Vec<Denom> = self.genesis.keys().cloned().collect();
        denoms.extend(self.minted.keys().cloned());
        denoms.sort();
        denoms.dedup();
        denoms
    }

    pub(crate) fn hash_into(&self, hasher: &mut Sha256) {
        for map in [&self.genesis, &self.minted] {
            hasher.update((map.len() as u64).to_le_bytes());
            for (denom, amount) in map {
                crate::state::put_bytes(hasher, denom.as_bytes());
                crate::state::put_bytes(hasher, amount.normalize().to_string().as_bytes());
            }
        }
    }
}

fn add(map: &mut BTreeMap<Denom, Decimal>, denom: &str, amount: Decimal) -> Result<(), BankError> {
    let entry = map.entry(denom.to_string()).or_insert(Decimal::ZERO);
    *entry = entry.checked_add(amount).ok_or_else(|| BankError::Overflow {
        denom: denom.to_string(),
    })?;
    Ok(())
}

//! Bank state: account and module holdings, supply, denom metadata.
//!
//! Tracks per-(holder, denom) balances. All mutations are atomic: either the
//! full operation succeeds or the bank is unchanged. Zero balances are not
//! stored, so two banks holding the same coins are equal (and hash equally)
//! regardless of the history that produced them.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use gravity_types::{AccAddress, BankError, BankKeeper, Coin, Denom, Metadata};
use rust_decimal::Decimal;
use sha2::Sha256;

use crate::{
    state::put_bytes,
    supply::{SupplyConservation, SupplyViolation},
};

/// Who holds a balance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Holder {
    Account(AccAddress),
    /// A module-owned holding such as the bridge escrow.
    Module(String),
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(addr) => write!(f, "account:{addr}"),
            Self::Module(name) => write!(f, "module:{name}"),
        }
    }
}

/// In-memory bank keeper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bank {
    holdings: BTreeMap<(Holder, Denom), Decimal>,
    supply: SupplyConservation,
    metadata: BTreeMap<Denom, Metadata>,
    /// Module holdings allowed to mint.
    minters: BTreeSet<String>,
}

impl Bank {
    /// Create a new empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `module` to mint coins.
    pub fn grant_mint_permission(&mut self, module: impl Into<String>) {
        self.minters.insert(module.into());
    }

    #[must_use]
    pub fn can_mint(&self, module: &str) -> bool {
        self.minters.contains(module)
    }

    /// Publish metadata for the denom named by `metadata.base`.
    pub fn set_denom_metadata(&mut self, metadata: Metadata) {
        self.metadata.insert(metadata.base.clone(), metadata);
    }

    /// Genesis credit to an account. Counts towards supply.
    pub fn fund_account(&mut self, account: AccAddress, coin: &Coin) -> Result<(), BankError> {
        self.fund(Holder::Account(account), coin)
    }

    /// Genesis credit to a module holding. Counts towards supply.
    pub fn fund_module(&mut self, module: &str, coin: &Coin) -> Result<(), BankError> {
        self.fund(Holder::Module(module.to_string()), coin)
    }

    fn fund(&mut self, holder: Holder, coin: &Coin) -> Result<(), BankError> {
        let credited = self.credited_balance(&holder, coin)?;
        self.supply.record_genesis(&coin.denom, coin.amount)?;
        self.store(holder, &coin.denom, credited);
        Ok(())
    }

    /// Balance of any holder.
    #[must_use]
    pub fn balance(&self, holder: &Holder, denom: &str) -> Decimal {
        self.holdings
            .get(&(holder.clone(), denom.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn account_balance(&self, account: &AccAddress, denom: &str) -> Decimal {
        self.balance(&Holder::Account(*account), denom)
    }

    #[must_use]
    pub fn module_balance(&self, module: &str, denom: &str) -> Decimal {
        self.balance(&Holder::Module(module.to_string()), denom)
    }

    /// Recorded total supply of a denom.
    #[must_use]
    pub fn total_supply(&self, denom: &str) -> Decimal {
        self.supply.expected_supply(denom)
    }

    /// Coins of `denom` minted since genesis.
    #[must_use]
    pub fn total_minted(&self, denom: &str) -> Decimal {
        self.supply.total_minted(denom)
    }

    /// Sum of all holdings of a denom.
    #[must_use]
    pub fn holdings_total(&self, denom: &str) -> Decimal {
        self.holdings
            .iter()
            .filter(|((_, d), _)| d == denom)
            .map(|(_, amount)| *amount)
            .sum()
    }

    /// Verify supply conservation for a given denom.
    pub fn verify_supply(&self, denom: &str) -> Result<(), SupplyViolation> {
        self.supply.verify(denom, self.holdings_total(denom))
    }

    /// Verify supply conservation for every denom ever issued.
    pub fn verify_all_supply(&self) -> Result<(), SupplyViolation> {
        self.supply
            .tracked_denoms()
            .iter()
            .try_for_each(|denom| self.verify_supply(denom))
    }

    fn credited_balance(&self, holder: &Holder, coin: &Coin) -> Result<Decimal, BankError> {
        self.balance(holder, &coin.denom)
            .checked_add(coin.amount)
            .ok_or_else(|| BankError::Overflow {
                denom: coin.denom.clone(),
            })
    }

    fn debited_balance(&self, holder: &Holder, coin: &Coin) -> Result<Decimal, BankError> {
        let available = self.balance(holder, &coin.denom);
        if available < coin.amount {
            return Err(BankError::InsufficientFunds {
                holder: holder.to_string(),
                denom: coin.denom.clone(),
                needed: coin.amount,
                available,
            });
        }
        Ok(available - coin.amount)
    }

    fn store(&mut self, holder: Holder, denom: &str, amount: Decimal) {
        let key = (holder, denom.to_string());
        if amount.is_zero() {
            self.holdings.remove(&key);
        } else {
            self.holdings.insert(key, amount.normalize());
        }
    }

    pub(crate) fn hash_into(&self, hasher: &mut Sha256) {
        use sha2::Digest;

        hasher.update((self.holdings.len() as u64).to_le_bytes());
        for ((holder, denom), amount) in &self.holdings {
            put_bytes(hasher, holder.to_string().as_bytes());
            put_bytes(hasher, denom.as_bytes());
            put_bytes(hasher, amount.to_string().as_bytes());
        }
        self.supply.hash_into(hasher);

        hasher.update((self.metadata.len() as u64).to_le_bytes());
        for (denom, md) in &self.metadata {
            put_bytes(hasher, denom.as_bytes());
            put_bytes(hasher, md.display.as_bytes());
            put_bytes(hasher, md.name.as_bytes());
            put_bytes(hasher, md.symbol.as_bytes());
            put_bytes(hasher, md.description.as_bytes());
            hasher.update((md.denom_units.len() as u64).to_le_bytes());
            for unit in &md.denom_units {
                put_bytes(hasher, unit.denom.as_bytes());
                hasher.update(unit.exponent.to_le_bytes());
                hasher.update((unit.aliases.len() as u64).to_le_bytes());
                for alias in &unit.aliases {
                    put_bytes(hasher, alias.as_bytes());
                }
            }
        }

        hasher.update((self.minters.len() as u64).to_le_bytes());
        for module in &self.minters {
            put_bytes(hasher, module.as_bytes());
        }
    }
}

impl BankKeeper for Bank {
    fn denom_metadata(&self, denom: &str) -> Option<&Metadata> {
        self.metadata.get(denom)
    }

    fn mint_coins(&mut self, module: &str, coin: &Coin) -> Result<(), BankError> {
        if !self.can_mint(module) {
            return Err(BankError::MintNotPermitted {
                module: module.to_string(),
            });
        }
        let holder = Holder::Module(module.to_string());
        let credited = self.credited_balance(&holder, coin)?;
        self.supply.record_mint(&coin.denom, coin.amount)?;
        self.store(holder, &coin.denom, credited);
        Ok(())
    }

    fn send_from_module(
        &mut self,
        module: &str,
        recipient: &AccAddress,
        coin: &Coin,
    ) -> Result<(), BankError> {
        let from = Holder::Module(module.to_string());
        let to = Holder::Account(*recipient);
        let debited = self.debited_balance(&from, coin)?;
        let credited = self.credited_balance(&to, coin)?;
        self.store(from, &coin.denom, debited);
        self.store(to, &coin.denom, credited);
        Ok(())
    }
}

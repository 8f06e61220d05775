//! ERC20 <-> denom map.
//!
//! Bindings are create-once: a denom maps to at most one contract and a
//! contract to at most one denom. Nothing here ever updates or removes one.

use std::collections::BTreeMap;

use gravity_types::{Denom, Erc20Registration, EthAddress, TokenRegistry};
use sha2::{Digest, Sha256};

use crate::state::put_bytes;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Erc20DenomMap {
    by_denom: BTreeMap<Denom, Erc20Registration>,
    by_contract: BTreeMap<EthAddress, Denom>,
}

impl Erc20DenomMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn registration(&self, denom: &str) -> Option<&Erc20Registration> {
        self.by_denom.get(denom)
    }

    /// All registrations ordered by denom.
    pub fn iter(&self) -> impl Iterator<Item = &Erc20Registration> {
        self.by_denom.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_denom.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_denom.is_empty()
    }

    pub(crate) fn hash_into(&self, hasher: &mut Sha256) {
        hasher.update((self.by_denom.len() as u64).to_le_bytes());
        for reg in self.by_denom.values() {
            put_bytes(hasher, reg.denom.as_bytes());
            hasher.update(reg.contract.as_bytes());
            hasher.update(reg.height.to_le_bytes());
            hasher.update(reg.registered_at.timestamp().to_le_bytes());
            hasher.update(reg.registered_at.timestamp_subsec_nanos().to_le_bytes());
        }
    }
}

impl TokenRegistry for Erc20DenomMap {
    fn denom_for_contract(&self, contract: &EthAddress) -> Option<&str> {
        self.by_contract.get(contract).map(String::as_str)
    }

    fn contract_for_denom(&self, denom: &str) -> Option<EthAddress> {
        self.by_denom.get(denom).map(|reg| reg.contract)
    }

    fn bind(&mut self, registration: Erc20Registration) -> bool {
        if self.by_denom.contains_key(&registration.denom)
            || self.by_contract.contains_key(&registration.contract)
        {
            return false;
        }
        self.by_contract
            .insert(registration.contract, registration.denom.clone());
        self.by_denom.insert(registration.denom.clone(), registration);
        true
    }
}

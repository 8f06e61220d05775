//! Narrow capabilities the attestation engine consumes from the host ledger.
//!
//! Each component receives only the keepers it needs. The runtime exposes
//! all of them at once through [`AttestationContext::keepers`], which hands
//! out disjoint borrows of a single transactional state so that nothing the
//! engine writes escapes a discarded transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccAddress, BankError, BlockHeader, BridgeEvent, Coin, EthAddress, EventId, Metadata};

/// Read access to finalized Ethereum events.
pub trait EventStore {
    fn event(&self, id: &EventId) -> Option<&BridgeEvent>;
}

/// Balances, module holdings and denom metadata.
pub trait BankKeeper {
    fn denom_metadata(&self, denom: &str) -> Option<&Metadata>;

    /// Mint `coin` into the module holding `module`.
    fn mint_coins(&mut self, module: &str, coin: &Coin) -> Result<(), BankError>;

    /// Move `coin` from the module holding `module` to `recipient`.
    fn send_from_module(
        &mut self,
        module: &str,
        recipient: &AccAddress,
        coin: &Coin,
    ) -> Result<(), BankError>;

    /// Release escrowed host-native coins to `recipient`.
    fn release_from_escrow(
        &mut self,
        escrow: &str,
        recipient: &AccAddress,
        coin: &Coin,
    ) -> Result<(), BankError> {
        self.send_from_module(escrow, recipient, coin)
    }
}

/// A binding between a host denom and the ERC20 that represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Registration {
    pub denom: String,
    pub contract: EthAddress,
    pub height: u64,
    pub registered_at: DateTime<Utc>,
}

/// The ERC20 <-> denom map.
pub trait TokenRegistry {
    fn denom_for_contract(&self, contract: &EthAddress) -> Option<&str>;

    fn contract_for_denom(&self, denom: &str) -> Option<EthAddress>;

    /// Store a binding. Returns `false` and leaves the map untouched if the
    /// denom or the contract is already bound.
    fn bind(&mut self, registration: Erc20Registration) -> bool;
}

/// Outgoing batches awaiting execution.
pub trait BatchLedger {
    /// Record that batch `batch_nonce` of `contract` executed on Ethereum.
    /// Returns `true` if a pending batch was removed.
    fn mark_executed(&mut self, contract: &EthAddress, batch_nonce: u64) -> bool;
}

/// Every keeper of one transaction, borrowed disjointly.
pub struct Keepers<'a> {
    pub header: &'a BlockHeader,
    pub events: &'a dyn EventStore,
    pub bank: &'a mut dyn BankKeeper,
    pub tokens: &'a mut dyn TokenRegistry,
    pub batches: &'a mut dyn BatchLedger,
}

/// The transactional state an attestation is applied against.
pub trait AttestationContext {
    fn keepers(&mut self) -> Keepers<'_>;
}

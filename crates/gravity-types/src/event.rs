//! Ethereum events and the attestations that finalize them.
//!
//! Observers vote on claims about Ethereum events. Once quorum is reached
//! the voting subsystem stores the event and hands the runtime an
//! [`Attestation`] referencing it by [`EventId`]. The attestation handler
//! reads the event and applies its effect; it never mutates the event.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{EthAddress, constants::EVENT_ID_DOMAIN};

// ---------------------------------------------------------------------------
// EventId
// ---------------------------------------------------------------------------

/// Identifier of a stored Ethereum event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EventId(pub [u8; 32]);

impl EventId {
    /// Deterministic id from the event nonce and the event contents.
    ///
    /// Every replica that stores the same event under the same nonce derives
    /// the same id.
    #[must_use]
    pub fn derive(event_nonce: u64, event: &BridgeEvent) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(EVENT_ID_DOMAIN);
        hasher.update(event_nonce.to_le_bytes());
        event.hash_into(&mut hasher);
        let mut id = [0u8; 32];
        id.copy_from_slice(&hasher.finalize());
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// Attestation
// ---------------------------------------------------------------------------

/// A quorum-finalized claim that an Ethereum event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub event_id: EventId,
    /// Nonce of the event on the Ethereum bridge contract.
    pub event_nonce: u64,
}

impl Attestation {
    #[must_use]
    pub fn new(event_id: EventId, event_nonce: u64) -> Self {
        Self {
            event_id,
            event_nonce,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Tokens locked in the Ethereum bridge contract for a host-ledger receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositEvent {
    pub token_contract: EthAddress,
    pub amount: Decimal,
    /// Host-ledger receiver, encoded by the host chain's address codec.
    pub cosmos_receiver: String,
    pub ethereum_sender: EthAddress,
}

/// An outgoing batch was executed on Ethereum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawEvent {
    pub token_contract: EthAddress,
    pub batch_nonce: u64,
}

/// An ERC20 representing a host denom was deployed by the bridge contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20DeployedEvent {
    pub token_contract: EthAddress,
    pub cosmos_denom: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u64,
}

/// An arbitrary logic call was executed by the bridge contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicCallExecutedEvent {
    #[serde(with = "hex_bytes")]
    pub invalidation_id: Vec<u8>,
    pub invalidation_nonce: u64,
}

/// Every Ethereum event kind the bridge observes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    Deposit(DepositEvent),
    Withdraw(WithdrawEvent),
    Erc20Deployed(Erc20DeployedEvent),
    LogicCallExecuted(LogicCallExecutedEvent),
}

impl BridgeEvent {
    /// Stable kind tag (matches the serde tag).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deposit(_) => "deposit",
            Self::Withdraw(_) => "withdraw",
            Self::Erc20Deployed(_) => "erc20_deployed",
            Self::LogicCallExecuted(_) => "logic_call_executed",
        }
    }

    /// Name of the concrete event type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Deposit(_) => "DepositEvent",
            Self::Withdraw(_) => "WithdrawEvent",
            Self::Erc20Deployed(_) => "Erc20DeployedEvent",
            Self::LogicCallExecuted(_) => "LogicCallExecutedEvent",
        }
    }

    #[must_use]
    pub fn token_contract(&self) -> Option<&EthAddress> {
        match self {
            Self::Deposit(e) => Some(&e.token_contract),
            Self::Withdraw(e) => Some(&e.token_contract),
            Self::Erc20Deployed(e) => Some(&e.token_contract),
            Self::LogicCallExecuted(_) => None,
        }
    }

    /// Feed a canonical encoding of the event into `hasher`.
    ///
    /// Variable-length fields are length-prefixed so distinct events never
    /// share an encoding.
    pub fn hash_into(&self, hasher: &mut Sha256) {
        fn put_str(hasher: &mut Sha256, s: &[u8]) {
            hasher.update((s.len() as u64).to_le_bytes());
            hasher.update(s);
        }

        put_str(hasher, self.kind().as_bytes());
        match self {
            Self::Deposit(e) => {
                hasher.update(e.token_contract.as_bytes());
                put_str(hasher, e.amount.normalize().to_string().as_bytes());
                put_str(hasher, e.cosmos_receiver.as_bytes());
                hasher.update(e.ethereum_sender.as_bytes());
            }
            Self::Withdraw(e) => {
                hasher.update(e.token_contract.as_bytes());
                hasher.update(e.batch_nonce.to_le_bytes());
            }
            Self::Erc20Deployed(e) => {
                hasher.update(e.token_contract.as_bytes());
                put_str(hasher, e.cosmos_denom.as_bytes());
                put_str(hasher, e.name.as_bytes());
                put_str(hasher, e.symbol.as_bytes());
                hasher.update(e.decimals.to_le_bytes());
            }
            Self::LogicCallExecuted(e) => {
                put_str(hasher, &e.invalidation_id);
                hasher.update(e.invalidation_nonce.to_le_bytes());
            }
        }
    }
}

impl From<DepositEvent> for BridgeEvent {
    fn from(e: DepositEvent) -> Self {
        Self::Deposit(e)
    }
}

impl From<WithdrawEvent> for BridgeEvent {
    fn from(e: WithdrawEvent) -> Self {
        Self::Withdraw(e)
    }
}

impl From<Erc20DeployedEvent> for BridgeEvent {
    fn from(e: Erc20DeployedEvent) -> Self {
        Self::Erc20Deployed(e)
    }
}

impl From<LogicCallExecutedEvent> for BridgeEvent {
    fn from(e: LogicCallExecutedEvent) -> Self {
        Self::LogicCallExecuted(e)
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

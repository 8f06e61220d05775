//! Error types for the Gravity attestation engine.
//!
//! All errors use the `GB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Attestation / dispatch errors
//! - 2xx: Custody (deposit settlement) errors
//! - 3xx: ERC20 registration / metadata errors
//! - 9xx: General / internal errors
//!
//! Every error is terminal for the attestation being applied. The runtime
//! discards the whole in-progress state transition when one is returned.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AddressError, CoinError, EthAddress, EventId, MetadataError};

/// Failures reported by the bank subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("insufficient funds in {holder}: need {needed}{denom}, have {available}{denom}")]
    InsufficientFunds {
        holder: String,
        denom: String,
        needed: Decimal,
        available: Decimal,
    },

    #[error("module account {module} has no mint permission")]
    MintNotPermitted { module: String },

    #[error("amount overflow for {denom}")]
    Overflow { denom: String },
}

/// Central error enum for all attestation operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // =================================================================
    // Attestation / Dispatch (1xx)
    // =================================================================
    /// The attestation references an event that is not stored.
    #[error("GB_ERR_100: Event not found: {0}")]
    EventNotFound(EventId),

    /// No handler exists for this event kind.
    #[error("GB_ERR_101: Unsupported event type {kind}: {type_name}")]
    UnsupportedEventType {
        kind: &'static str,
        type_name: &'static str,
    },

    /// Applying an attestation's effect failed.
    #[error("GB_ERR_102: Attestation for {kind} event (nonce {event_nonce}) failed")]
    AttestationFailed {
        event_nonce: u64,
        kind: &'static str,
        #[source]
        source: Box<BridgeError>,
    },

    // =================================================================
    // Custody (2xx)
    // =================================================================
    /// The deposit receiver could not be decoded.
    #[error("GB_ERR_200: Invalid receiver address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },

    /// The deposit amount or denom does not form a valid coin.
    #[error("GB_ERR_201: Invalid coin: {0}")]
    InvalidCoin(#[source] CoinError),

    /// Minting vouchers failed.
    #[error("GB_ERR_202: Mint of {coin} failed: {source}")]
    MintFailed {
        coin: String,
        #[source]
        source: BankError,
    },

    /// Moving coins to the receiver failed.
    #[error("GB_ERR_203: Transfer of {coin} to {recipient} failed: {source}")]
    TransferFailed {
        coin: String,
        recipient: String,
        #[source]
        source: BankError,
    },

    // =================================================================
    // Registration / Metadata (3xx)
    // =================================================================
    /// The denom or the contract is already bound.
    #[error("GB_ERR_300: ERC20 contract {contract} already registered for denom {denom}")]
    AlreadyRegistered { denom: String, contract: EthAddress },

    /// The denom's metadata is missing or malformed.
    #[error("GB_ERR_301: Invalid metadata for denom {denom}: {source}")]
    InvalidMetadata {
        denom: String,
        #[source]
        source: MetadataError,
    },

    #[error("GB_ERR_302: ERC20 name {name:?} does not match denom display {display:?}")]
    NameMismatch { name: String, display: String },

    #[error("GB_ERR_303: ERC20 symbol {symbol:?} does not match denom {expected:?}")]
    SymbolMismatch { symbol: String, expected: String },

    #[error("GB_ERR_304: ERC20 decimals {erc20} does not match denom decimals {denom}")]
    DecimalsMismatch { erc20: u64, denom: u32 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("GB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("GB_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, bad values, etc.).
    #[error("GB_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// A transaction was opened on a state version that has since moved on.
    #[error("GB_ERR_903: Stale transaction: opened at version {base}, state is at {current}")]
    StaleTransaction { base: u64, current: u64 },
}

impl BridgeError {
    /// The innermost error, unwrapping attestation context.
    #[must_use]
    pub fn root_cause(&self) -> &BridgeError {
        let mut err = self;
        while let Self::AttestationFailed { source, .. } = err {
            err = source.as_ref();
        }
        err
    }
}

impl From<CoinError> for BridgeError {
    fn from(err: CoinError) -> Self {
        Self::InvalidCoin(err)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BridgeError>;

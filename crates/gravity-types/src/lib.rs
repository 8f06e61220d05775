//! # gravity-types
//!
//! Shared types, errors, and configuration for the **Gravity** attestation engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Addresses**: [`EthAddress`], [`AccAddress`], [`AddressCodec`]
//! - **Coins**: [`Coin`], [`Denom`], voucher denom synthesis
//! - **Metadata**: [`Metadata`], [`DenomUnit`]
//! - **Events**: [`BridgeEvent`] and its variants, [`EventId`], [`Attestation`]
//! - **Batches**: [`OutgoingBatch`]
//! - **Block context**: [`BlockHeader`]
//! - **Configuration**: [`BridgeConfig`], [`MetadataPolicy`]
//! - **Keepers**: [`EventStore`], [`BankKeeper`], [`TokenRegistry`], [`BatchLedger`], [`AttestationContext`]
//! - **Errors**: [`BridgeError`] with `GB_ERR_` prefix codes
//! - **Constants**: system-wide names and defaults

pub mod address;
pub mod batch;
pub mod block;
pub mod coin;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod keeper;
pub mod metadata;

pub use address::*;
pub use batch::*;
pub use block::*;
pub use coin::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use keeper::*;
pub use metadata::*;

// Constants are accessed via `gravity_types::constants::FOO`.
